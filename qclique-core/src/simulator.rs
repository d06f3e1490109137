//! Dense statevector execution of gate programs

use rand::Rng;
use tracing::debug;

use crate::circuit::Circuit;
use crate::error::Result;
use crate::measurement::{sample_measurement, Counts, Outcome};
use crate::state::{RegisterLayout, StateVector, DEFAULT_MAX_QUBITS};

/// Executes circuits on a fresh statevector per run.
#[derive(Debug, Clone, Copy)]
pub struct StatevectorSimulator {
    /// Largest register the simulator will allocate
    max_qubits: usize,
}

impl Default for StatevectorSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_QUBITS)
    }
}

impl StatevectorSimulator {
    pub fn new(max_qubits: usize) -> Self {
        Self { max_qubits }
    }

    pub fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    /// Run `circuit` from |0...0>.
    ///
    /// Total probability is checked after every gate and renormalized if it
    /// drifts past the tolerance.
    pub fn run(&self, circuit: &Circuit) -> Result<StateVector> {
        circuit.layout().check_limit(self.max_qubits)?;
        let mut state = StateVector::new(circuit.n_qubits(), self.max_qubits)?;

        for (step, op) in circuit.ops().iter().enumerate() {
            state.apply(op);
            if let Some(drift) = state.renormalize_if_drifted() {
                debug!(step, ?op, drift, "renormalized statevector");
            }
        }

        Ok(state)
    }

    /// Run `circuit` and draw `shots` measurement samples of the whole register.
    pub fn run_shots<R: Rng>(
        &self,
        circuit: &Circuit,
        shots: usize,
        rng: &mut R,
    ) -> Result<Counts<Outcome>> {
        let state = self.run(circuit)?;
        Ok(self.sample(&state, circuit.layout(), shots, rng))
    }

    /// Sample an already prepared state
    pub fn sample<R: Rng>(
        &self,
        state: &StateVector,
        layout: RegisterLayout,
        shots: usize,
        rng: &mut R,
    ) -> Counts<Outcome> {
        sample_measurement(state, layout, shots, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::CircuitBuilder;
    use crate::error::QcliqueError;
    use crate::graph::{instances, Graph};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_run_preserves_norm() {
        let graph = instances::demo_graph();
        let circuit = CircuitBuilder::new(RegisterLayout::new(1, 4), 2)
            .build(&graph, 1.7, 0.9)
            .unwrap();

        let state = StatevectorSimulator::default().run(&circuit).unwrap();
        assert_eq!(state.dimension(), 32);
        assert!((state.total_probability() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_ancilla_stays_zero() {
        let graph = instances::demo_graph();
        let circuit = CircuitBuilder::new(RegisterLayout::new(1, 4), 1)
            .build(&graph, 0.4, 1.1)
            .unwrap();

        let state = StatevectorSimulator::default().run(&circuit).unwrap();
        assert!(state.marginal_probability(0) < 1e-12);
    }

    #[test]
    fn test_overflow_reported_before_allocation() {
        let graph = Graph::new(10).unwrap();
        let circuit = CircuitBuilder::new(RegisterLayout::new(1, 10), 1)
            .build(&graph, 0.1, 0.1)
            .unwrap();

        let err = StatevectorSimulator::new(8).run(&circuit).unwrap_err();
        assert_eq!(
            err,
            QcliqueError::SimulationOverflow {
                requested: 11,
                limit: 8
            }
        );
    }

    #[test]
    fn test_run_shots_counts() {
        let graph = instances::demo_graph();
        let circuit = CircuitBuilder::new(RegisterLayout::new(1, 4), 1)
            .build(&graph, 0.4, 1.1)
            .unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let counts = StatevectorSimulator::default()
            .run_shots(&circuit, 512, &mut rng)
            .unwrap();
        assert_eq!(counts.total(), 512);
        assert_eq!(counts.shots(), 512);
    }
}
