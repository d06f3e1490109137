//! QAOA evaluation pipeline
//!
//! Ties the pieces together for one (γ, β) point:
//! 1. Build the max-clique circuit for the graph
//! 2. Simulate it on a fresh statevector
//! 3. Sample shots and marginalize away the ancillas
//! 4. Score the selections into an expectation value
//!
//! # Example
//!
//! ```
//! use qclique_core::graph::instances;
//! use qclique_core::qaoa::{QaoaConfig, QaoaRunner};
//!
//! let config = QaoaConfig::default().with_seed(42);
//! let mut runner = QaoaRunner::new(instances::demo_graph(), config).unwrap();
//! let eval = runner.evaluate(instances::REFERENCE_GAMMA, instances::REFERENCE_BETA).unwrap();
//! assert_eq!(eval.counts.total(), 1024);
//! ```

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::circuit::{Circuit, CircuitBuilder};
use crate::error::{QcliqueError, Result};
use crate::expectation::{exact_expectation, expectation_value, marginalize};
use crate::graph::Graph;
use crate::measurement::{Counts, Selection, DEFAULT_SHOTS};
use crate::simulator::StatevectorSimulator;
use crate::state::{RegisterLayout, DEFAULT_MAX_QUBITS};

// =============================================================================
// Constants
// =============================================================================

/// Default number of QAOA layers
pub const DEFAULT_DEPTH: usize = 1;

/// Default number of ancilla qubits ahead of the input register
pub const DEFAULT_ANCILLAS: usize = 1;

// =============================================================================
// Configuration
// =============================================================================

/// Circuit and sampling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QaoaConfig {
    /// Number of cost/mixer layers (p)
    pub depth: usize,
    /// Measurement shots per evaluation
    pub shots: usize,
    /// Reserved ancilla qubits
    pub n_ancilla: usize,
    /// Largest register the simulator may allocate
    pub max_qubits: usize,
    /// Seed for measurement sampling; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for QaoaConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            shots: DEFAULT_SHOTS,
            n_ancilla: DEFAULT_ANCILLAS,
            max_qubits: DEFAULT_MAX_QUBITS,
            seed: None,
        }
    }
}

impl QaoaConfig {
    /// Set number of layers
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Set shots per evaluation
    pub fn with_shots(mut self, shots: usize) -> Self {
        self.shots = shots;
        self
    }

    /// Set ancilla count
    pub fn with_ancillas(mut self, n_ancilla: usize) -> Self {
        self.n_ancilla = n_ancilla;
        self
    }

    /// Set the qubit budget
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.depth == 0 {
            return Err(QcliqueError::InvalidConfig("depth must be at least 1".into()));
        }
        if self.shots == 0 {
            return Err(QcliqueError::InvalidConfig("shots must be at least 1".into()));
        }
        Ok(())
    }

    /// Register layout for a graph with `n_nodes` nodes
    pub fn layout(&self, n_nodes: usize) -> RegisterLayout {
        RegisterLayout::new(self.n_ancilla, n_nodes)
    }
}

// =============================================================================
// Evaluation
// =============================================================================

/// Result of one (γ, β) evaluation
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub gamma: f64,
    pub beta: f64,
    /// Input-only counts, ancillas marginalized away
    pub counts: Counts<Selection>,
    /// Expected clique score
    pub expectation: f64,
}

impl Evaluation {
    /// Most frequently sampled selection that forms a clique
    pub fn best_clique(&self, graph: &Graph) -> Option<(Selection, usize)> {
        self.counts
            .most_frequent(self.counts.len())
            .into_iter()
            .filter(|(s, _)| s.size() > 0)
            .find(|(s, _)| s.is_clique(graph))
    }
}

// =============================================================================
// Runner
// =============================================================================

/// Evaluates the QAOA objective for a fixed graph
pub struct QaoaRunner<R: Rng = StdRng> {
    graph: Graph,
    config: QaoaConfig,
    builder: CircuitBuilder,
    simulator: StatevectorSimulator,
    rng: R,
}

impl QaoaRunner<StdRng> {
    /// Create a runner seeded from `config.seed`
    pub fn new(graph: Graph, config: QaoaConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(graph, config, rng)
    }
}

impl<R: Rng> QaoaRunner<R> {
    /// Create a runner drawing samples from `rng`
    pub fn with_rng(graph: Graph, config: QaoaConfig, rng: R) -> Result<Self> {
        config.validate()?;

        let layout = config.layout(graph.n_nodes());
        layout.check_limit(config.max_qubits)?;

        Ok(Self {
            builder: CircuitBuilder::new(layout, config.depth),
            simulator: StatevectorSimulator::new(config.max_qubits),
            graph,
            config,
            rng,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &QaoaConfig {
        &self.config
    }

    pub fn layout(&self) -> RegisterLayout {
        self.builder.layout()
    }

    /// Circuit for (γ, β)
    pub fn circuit(&self, gamma: f64, beta: f64) -> Result<Circuit> {
        self.builder.build(&self.graph, gamma, beta)
    }

    /// Sample the circuit for (γ, β) and score it
    pub fn evaluate(&mut self, gamma: f64, beta: f64) -> Result<Evaluation> {
        let circuit = self.circuit(gamma, beta)?;
        let raw = self
            .simulator
            .run_shots(&circuit, self.config.shots, &mut self.rng)?;
        let counts = marginalize(&raw);
        let expectation = expectation_value(&counts, &self.graph);

        Ok(Evaluation {
            gamma,
            beta,
            counts,
            expectation,
        })
    }

    /// Sampled expectation value at (γ, β)
    pub fn expectation(&mut self, gamma: f64, beta: f64) -> Result<f64> {
        Ok(self.evaluate(gamma, beta)?.expectation)
    }

    /// Noise-free expectation value at (γ, β)
    pub fn exact_expectation(&self, gamma: f64, beta: f64) -> Result<f64> {
        let circuit = self.circuit(gamma, beta)?;
        let state = self.simulator.run(&circuit)?;
        Ok(exact_expectation(&state, circuit.layout(), &self.graph))
    }
}

// =============================================================================
// Tests
// =============================================================================
