//! # qclique-core
//!
//! Classical statevector simulation of a QAOA circuit that approximates the
//! maximum clique of a small graph.
//!
//! - `graph`: graph model with derived complement and penalty
//! - `circuit`: gate program and the clique circuit builder
//! - `state` / `ops`: dense statevector and gate kernels
//! - `simulator` / `measurement`: execution and shot sampling
//! - `expectation`: marginalization and clique scoring
//! - `qaoa`: configuration and the end-to-end evaluation pipeline

pub mod circuit;
pub mod error;
pub mod expectation;
pub mod graph;
pub mod measurement;
pub mod ops;
pub mod qaoa;
pub mod simulator;
pub mod state;

pub use circuit::{Circuit, CircuitBuilder, GateOp};
pub use error::{Angle, QcliqueError, Result};
pub use expectation::{best_score, clique_score, exact_expectation, expectation_value, marginalize};
pub use graph::{instances, Edge, Graph};
pub use measurement::{sample_measurement, Counts, HistogramEntry, Outcome, Selection, DEFAULT_SHOTS};
pub use qaoa::{Evaluation, QaoaConfig, QaoaRunner, DEFAULT_ANCILLAS, DEFAULT_DEPTH};
pub use simulator::StatevectorSimulator;
pub use state::{RegisterLayout, StateVector, DEFAULT_MAX_QUBITS, NORM_TOLERANCE};
