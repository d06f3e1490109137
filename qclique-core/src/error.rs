//! Error types for QAOA clique simulation
//!
//! Covers the failures a caller can observe:
//! - Graph validation (bad node indices, empty graphs)
//! - Simulation limits (statevector too large)
//! - Optimizer outcomes (zero gradient, iteration cap)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for qclique operations
pub type Result<T> = std::result::Result<T, QcliqueError>;

/// One of the two circuit angles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Angle {
    Gamma,
    Beta,
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Angle::Gamma => write!(f, "gamma"),
            Angle::Beta => write!(f, "beta"),
        }
    }
}

/// Error type for circuit construction, simulation and optimization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QcliqueError {
    // ==========================================================================
    // Input Errors
    // ==========================================================================
    /// Graph is unusable for circuit construction
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ==========================================================================
    // Simulation Errors
    // ==========================================================================
    /// Requested register exceeds the configured statevector budget
    #[error("Simulation of {requested} qubits exceeds the configured limit of {limit} qubits")]
    SimulationOverflow { requested: usize, limit: usize },

    // ==========================================================================
    // Optimizer Errors
    // ==========================================================================
    /// Finite-difference estimate is exactly zero, so it has no direction
    #[error("Gradient with respect to {parameter} is exactly zero")]
    ZeroGradient { parameter: Angle },

    /// Iteration cap reached before the stop threshold
    #[error(
        "No convergence after {iterations} iterations; best observed gamma={best_gamma:.6}, \
         beta={best_beta:.6}, expectation={best_value:.6}"
    )]
    NonConvergence {
        best_gamma: f64,
        best_beta: f64,
        best_value: f64,
        iterations: usize,
    },
}

impl QcliqueError {
    /// Check if the error is a soft optimizer outcome rather than bad input
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            QcliqueError::ZeroGradient { .. } | QcliqueError::NonConvergence { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_recoverable() {
        assert!(QcliqueError::ZeroGradient {
            parameter: Angle::Beta
        }
        .is_recoverable());
        assert!(!QcliqueError::InvalidGraph("empty".into()).is_recoverable());
        assert!(!QcliqueError::SimulationOverflow {
            requested: 30,
            limit: 24
        }
        .is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = QcliqueError::SimulationOverflow {
            requested: 30,
            limit: 24,
        };
        assert_eq!(
            err.to_string(),
            "Simulation of 30 qubits exceeds the configured limit of 24 qubits"
        );

        let err = QcliqueError::ZeroGradient {
            parameter: Angle::Gamma,
        };
        assert_eq!(err.to_string(), "Gradient with respect to gamma is exactly zero");
    }
}
