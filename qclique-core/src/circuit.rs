//! QAOA Circuit Construction for Maximum Clique
//!
//! The circuit alternates a cost layer and a mixer layer on top of a uniform
//! superposition over all node-inclusion subsets:
//!
//! |ψ(γ,β)⟩ = [W(β) V(γ)]^p H^{⊗n} |0⟩^n
//!
//! where:
//! - V(γ) = Π_{(i,j)∈E} CP_{ij}(−γ) · Π_{(i,j)∈Ē} CP_{ij}(penalty·γ)
//! - W(β) = Π_i H_i P_i(2β) H_i
//!
//! CP only acts on |11⟩, so each edge term fires exactly when both
//! endpoints are selected: edges are rewarded, non-edges are penalized.
//!
//! # Example
//!
//! ```
//! use qclique_core::circuit::CircuitBuilder;
//! use qclique_core::graph::instances;
//! use qclique_core::state::RegisterLayout;
//!
//! let graph = instances::demo_graph();
//! let builder = CircuitBuilder::new(RegisterLayout::new(1, graph.n_nodes()), 1);
//! let circuit = builder.build(&graph, 0.5, 0.25).unwrap();
//! assert_eq!(circuit.len(), 4 + 5 + 1 + 3 * 4);
//! ```

use crate::error::{QcliqueError, Result};
use crate::graph::Graph;
use crate::state::RegisterLayout;

// =============================================================================
// Gate Program
// =============================================================================

/// One circuit instruction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateOp {
    /// Hadamard
    Hadamard { qubit: usize },
    /// Controlled phase diag(1, 1, 1, e^{iθ})
    ControlledPhase {
        control: usize,
        target: usize,
        angle: f64,
    },
    /// Phase diag(1, e^{iθ})
    Phase { qubit: usize, angle: f64 },
}

impl GateOp {
    /// Qubits touched by the instruction
    pub fn qubits(&self) -> Vec<usize> {
        match *self {
            GateOp::Hadamard { qubit } | GateOp::Phase { qubit, .. } => vec![qubit],
            GateOp::ControlledPhase {
                control, target, ..
            } => vec![control, target],
        }
    }
}

/// Immutable gate program over a register layout
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    layout: RegisterLayout,
    ops: Vec<GateOp>,
}

impl Circuit {
    /// Register the program runs on
    pub fn layout(&self) -> RegisterLayout {
        self.layout
    }

    /// Total qubit count, ancillas included
    pub fn n_qubits(&self) -> usize {
        self.layout.total_qubits()
    }

    /// Instructions in execution order
    pub fn ops(&self) -> &[GateOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of two-qubit instructions
    pub fn two_qubit_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, GateOp::ControlledPhase { .. }))
            .count()
    }
}

// =============================================================================
// Circuit Builder
// =============================================================================

/// Builds the max-clique QAOA program for a fixed layout and depth
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    /// Register layout
    layout: RegisterLayout,
    /// Number of cost/mixer layers (p)
    depth: usize,
}

impl CircuitBuilder {
    /// Create a builder for `depth` layers
    pub fn new(layout: RegisterLayout, depth: usize) -> Self {
        Self { layout, depth }
    }

    /// Get the layout
    pub fn layout(&self) -> RegisterLayout {
        self.layout
    }

    /// Get number of layers
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Build the circuit for angles (γ, β).
    ///
    /// The same (γ, β) pair drives every layer.
    pub fn build(&self, graph: &Graph, gamma: f64, beta: f64) -> Result<Circuit> {
        if graph.n_nodes() != self.layout.n_input {
            return Err(QcliqueError::InvalidGraph(format!(
                "graph has {} nodes but the register has {} input qubits",
                graph.n_nodes(),
                self.layout.n_input
            )));
        }

        let mut ops = Vec::with_capacity(self.op_count(graph));

        // Initial state: |+⟩ on every input qubit
        for q in self.layout.input_qubits() {
            ops.push(GateOp::Hadamard { qubit: q });
        }

        for _layer in 0..self.depth {
            self.push_cost_layer(&mut ops, graph, gamma);
            self.push_mixer_layer(&mut ops, beta);
        }

        Ok(Circuit {
            layout: self.layout,
            ops,
        })
    }

    /// Cost layer V(γ)
    fn push_cost_layer(&self, ops: &mut Vec<GateOp>, graph: &Graph, gamma: f64) {
        for edge in graph.edges() {
            ops.push(GateOp::ControlledPhase {
                control: self.layout.qubit_of(edge.u),
                target: self.layout.qubit_of(edge.v),
                angle: -gamma,
            });
        }

        let penalty = graph.penalty() as f64;
        for edge in graph.complement_edges() {
            ops.push(GateOp::ControlledPhase {
                control: self.layout.qubit_of(edge.u),
                target: self.layout.qubit_of(edge.v),
                angle: penalty * gamma,
            });
        }
    }

    /// Mixer layer W(β) = H P(2β) H per input qubit
    fn push_mixer_layer(&self, ops: &mut Vec<GateOp>, beta: f64) {
        for q in self.layout.input_qubits() {
            ops.push(GateOp::Hadamard { qubit: q });
            ops.push(GateOp::Phase {
                qubit: q,
                angle: 2.0 * beta,
            });
            ops.push(GateOp::Hadamard { qubit: q });
        }
    }

    /// Instruction count of a built circuit
    pub fn op_count(&self, graph: &Graph) -> usize {
        let n = self.layout.n_input;
        let pairs = graph.n_edges() + graph.complement_edges().len();
        n + self.depth * (pairs + 3 * n)
    }
}

// =============================================================================
// Tests
// =============================================================================
