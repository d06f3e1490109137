use ndarray::Array1;
use num_complex::Complex64;

use crate::error::{QcliqueError, Result};

/// Largest register simulated by default (2^24 amplitudes, 256 MiB)
pub const DEFAULT_MAX_QUBITS: usize = 24;

/// Tolerance on total probability mass before renormalizing
pub const NORM_TOLERANCE: f64 = 1e-9;

/// Qubit register layout: leading ancillas, then one input qubit per node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegisterLayout {
    pub n_ancilla: usize,
    pub n_input: usize,
}

impl RegisterLayout {
    pub fn new(n_ancilla: usize, n_input: usize) -> Self {
        Self { n_ancilla, n_input }
    }

    pub fn total_qubits(&self) -> usize {
        self.n_ancilla + self.n_input
    }

    /// Qubit carrying the selection bit of `node`
    #[inline]
    pub fn qubit_of(&self, node: usize) -> usize {
        self.n_ancilla + node
    }

    /// Qubits `n_ancilla..total_qubits`, in node order
    pub fn input_qubits(&self) -> std::ops::Range<usize> {
        self.n_ancilla..self.total_qubits()
    }

    /// Fail if the register would not fit in `max_qubits`
    pub fn check_limit(&self, max_qubits: usize) -> Result<()> {
        let requested = self.total_qubits();
        if requested > max_qubits || requested >= usize::BITS as usize {
            return Err(QcliqueError::SimulationOverflow {
                requested,
                limit: max_qubits,
            });
        }
        Ok(())
    }
}

/// Dense statevector of the full register.
///
/// Index mapping: bit `q` of a basis index is the value of qubit `q`,
/// so qubit 0 is the least significant bit.
#[derive(Debug, Clone)]
pub struct StateVector {
    pub num_qubits: usize,
    pub amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// Creates |0...0> on `num_qubits` qubits, refusing registers above `max_qubits`.
    pub fn new(num_qubits: usize, max_qubits: usize) -> Result<Self> {
        if num_qubits > max_qubits || num_qubits >= usize::BITS as usize {
            return Err(QcliqueError::SimulationOverflow {
                requested: num_qubits,
                limit: max_qubits,
            });
        }

        let mut amplitudes = Array1::<Complex64>::zeros(1usize << num_qubits);
        amplitudes[0] = Complex64::new(1.0, 0.0);

        Ok(StateVector {
            num_qubits,
            amplitudes,
        })
    }

    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Bytes held by the amplitude buffer
    pub fn memory_bytes(&self) -> usize {
        self.dimension() * std::mem::size_of::<Complex64>()
    }

    pub fn probability(&self, index: usize) -> f64 {
        if index < self.dimension() {
            self.amplitudes[index].norm_sqr()
        } else {
            0.0
        }
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    pub fn total_probability(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    pub fn normalize(&mut self) {
        let norm_sq = self.total_probability();
        if norm_sq > 1e-10 {
            let norm = norm_sq.sqrt();
            self.amplitudes.mapv_inplace(|c| c / norm);
        }
    }

    /// Renormalizes if the total probability drifted past [`NORM_TOLERANCE`].
    /// Returns the drift that was corrected.
    pub fn renormalize_if_drifted(&mut self) -> Option<f64> {
        let drift = (self.total_probability() - 1.0).abs();
        if drift > NORM_TOLERANCE {
            self.normalize();
            Some(drift)
        } else {
            None
        }
    }

    /// Marginal probability of qubit `qubit` being |1>.
    pub fn marginal_probability(&self, qubit: usize) -> f64 {
        let bit = 1 << qubit;
        self.amplitudes
            .indexed_iter()
            .filter(|(i, _)| i & bit != 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }
}
