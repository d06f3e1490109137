use ndarray::Array2;
use num_complex::Complex64;

use crate::circuit::GateOp;
use crate::state::StateVector;

/// Applies a 2x2 unitary to qubit `qubit`.
pub fn apply_single_qubit_gate(state: &mut StateVector, qubit: usize, gate: &Array2<Complex64>) {
    debug_assert!(qubit < state.num_qubits, "qubit {} out of range", qubit);

    // View the vector as (outer, 2, inner) blocks: inner = 2^qubit is the
    // stride of the target bit, so each chunk of 2*inner amplitudes pairs
    // index i (bit clear) with i + inner (bit set).
    let inner = 1usize << qubit;

    let u00 = gate[[0, 0]];
    let u01 = gate[[0, 1]];
    let u10 = gate[[1, 0]];
    let u11 = gate[[1, 1]];

    for mut chunk in state.amplitudes.exact_chunks_mut(2 * inner) {
        for i in 0..inner {
            let alpha = chunk[i];
            let beta = chunk[i + inner];

            chunk[i] = u00 * alpha + u01 * beta;
            chunk[i + inner] = u10 * alpha + u11 * beta;
        }
    }
}

/// H on `qubit`
pub fn apply_hadamard(state: &mut StateVector, qubit: usize) {
    apply_single_qubit_gate(state, qubit, &gates::hadamard());
}

/// diag(1, e^{iθ}) on `qubit`
pub fn apply_phase(state: &mut StateVector, qubit: usize, angle: f64) {
    debug_assert!(qubit < state.num_qubits, "qubit {} out of range", qubit);

    let bit = 1usize << qubit;
    let phase = Complex64::from_polar(1.0, angle);

    for (i, amp) in state.amplitudes.indexed_iter_mut() {
        if i & bit != 0 {
            *amp *= phase;
        }
    }
}

/// diag(1, 1, 1, e^{iθ}) on (control, target).
///
/// Symmetric in its two qubits: only |11> picks up the phase.
pub fn apply_controlled_phase(state: &mut StateVector, control: usize, target: usize, angle: f64) {
    debug_assert!(control < state.num_qubits && target < state.num_qubits);
    debug_assert_ne!(control, target);

    let mask = (1usize << control) | (1usize << target);
    let phase = Complex64::from_polar(1.0, angle);

    for (i, amp) in state.amplitudes.indexed_iter_mut() {
        if i & mask == mask {
            *amp *= phase;
        }
    }
}

impl StateVector {
    pub fn apply_hadamard(&mut self, qubit: usize) {
        apply_hadamard(self, qubit);
    }

    pub fn apply_phase(&mut self, qubit: usize, angle: f64) {
        apply_phase(self, qubit, angle);
    }

    pub fn apply_controlled_phase(&mut self, control: usize, target: usize, angle: f64) {
        apply_controlled_phase(self, control, target, angle);
    }

    /// Dispatch a single circuit instruction
    pub fn apply(&mut self, op: &GateOp) {
        match *op {
            GateOp::Hadamard { qubit } => self.apply_hadamard(qubit),
            GateOp::Phase { qubit, angle } => self.apply_phase(qubit, angle),
            GateOp::ControlledPhase {
                control,
                target,
                angle,
            } => self.apply_controlled_phase(control, target, angle),
        }
    }
}

/// Gate matrices used by the kernels
pub mod gates {
    use ndarray::{array, Array2};
    use num_complex::Complex64;
    use std::f64::consts::FRAC_1_SQRT_2;

    /// Hadamard gate
    pub fn hadamard() -> Array2<Complex64> {
        let h = FRAC_1_SQRT_2;
        array![
            [Complex64::new(h, 0.0), Complex64::new(h, 0.0)],
            [Complex64::new(h, 0.0), Complex64::new(-h, 0.0)]
        ]
    }

    /// Phase gate P(θ) = diag(1, e^{iθ})
    pub fn phase(theta: f64) -> Array2<Complex64> {
        array![
            [Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)],
            [Complex64::new(0.0, 0.0), Complex64::from_polar(1.0, theta)]
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DEFAULT_MAX_QUBITS;
    use std::f64::consts::PI;

    const EPSILON: f64 = 1e-12;

    fn zero_state(n: usize) -> StateVector {
        StateVector::new(n, DEFAULT_MAX_QUBITS).unwrap()
    }

    #[test]
    fn test_hadamard_superposition() {
        let mut state = zero_state(1);
        state.apply_hadamard(0);
        assert!((state.probability(0) - 0.5).abs() < EPSILON);
        assert!((state.probability(1) - 0.5).abs() < EPSILON);

        // H is self-inverse
        state.apply_hadamard(0);
        assert!((state.probability(0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_hadamard_targets_correct_bit() {
        let mut state = zero_state(3);
        state.apply_hadamard(2);
        assert!((state.probability(0b000) - 0.5).abs() < EPSILON);
        assert!((state.probability(0b100) - 0.5).abs() < EPSILON);
        assert!(state.probability(0b001) < EPSILON);
    }

    #[test]
    fn test_phase_only_touches_set_bit() {
        let mut state = zero_state(2);
        state.apply_hadamard(0);
        state.apply_phase(0, PI / 2.0);

        let expected = Complex64::new(0.0, std::f64::consts::FRAC_1_SQRT_2);
        assert!((state.amplitudes[1] - expected).norm() < EPSILON);
        assert!((state.amplitudes[0].im).abs() < EPSILON);
    }

    #[test]
    fn test_phase_matches_matrix_kernel() {
        let mut fast = zero_state(3);
        let mut dense = zero_state(3);
        for q in 0..3 {
            fast.apply_hadamard(q);
            dense.apply_hadamard(q);
        }
        fast.apply_phase(1, 0.7);
        apply_single_qubit_gate(&mut dense, 1, &gates::phase(0.7));

        for i in 0..fast.dimension() {
            assert!((fast.amplitudes[i] - dense.amplitudes[i]).norm() < EPSILON);
        }
    }

    #[test]
    fn test_controlled_phase_only_on_11() {
        let mut state = zero_state(3);
        for q in 0..3 {
            state.apply_hadamard(q);
        }
        state.apply_controlled_phase(0, 2, PI);

        let a = 1.0 / 8f64.sqrt();
        for i in 0..8usize {
            let expected = if i & 0b101 == 0b101 { -a } else { a };
            assert!((state.amplitudes[i].re - expected).abs() < EPSILON, "index {}", i);
        }
    }

    #[test]
    fn test_controlled_phase_symmetric() {
        let mut a = zero_state(2);
        let mut b = zero_state(2);
        for q in 0..2 {
            a.apply_hadamard(q);
            b.apply_hadamard(q);
        }
        a.apply_controlled_phase(0, 1, 1.3);
        b.apply_controlled_phase(1, 0, 1.3);
        for i in 0..4 {
            assert!((a.amplitudes[i] - b.amplitudes[i]).norm() < EPSILON);
        }
    }

    #[test]
    fn test_mixer_with_zero_beta_is_identity() {
        let mut state = zero_state(2);
        state.apply_hadamard(0);
        let before = state.amplitudes.clone();

        state.apply_hadamard(1);
        state.apply_phase(1, 0.0);
        state.apply_hadamard(1);

        for i in 0..4 {
            assert!((state.amplitudes[i] - before[i]).norm() < EPSILON);
        }
    }

    #[test]
    fn test_mixer_with_half_pi_beta_flips() {
        // H P(π) H = X
        let mut state = zero_state(1);
        state.apply_hadamard(0);
        state.apply_phase(0, PI);
        state.apply_hadamard(0);
        assert!((state.probability(1) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_apply_dispatch() {
        let mut state = zero_state(2);
        state.apply(&GateOp::Hadamard { qubit: 0 });
        state.apply(&GateOp::Hadamard { qubit: 1 });
        state.apply(&GateOp::ControlledPhase {
            control: 0,
            target: 1,
            angle: PI,
        });
        state.apply(&GateOp::Phase {
            qubit: 0,
            angle: PI,
        });
        assert!((state.total_probability() - 1.0).abs() < 1e-9);
        assert!((state.amplitudes[3].re - 0.5).abs() < EPSILON);
        assert!((state.amplitudes[1].re + 0.5).abs() < EPSILON);
    }
}
