//! Parameter search for the clique QAOA
//!
//! - [`optimizer`]: alternating finite-difference gradient ascent over (γ, β)
//! - [`sweep`]: one-dimensional expectation curves
//! - [`config`]: JSON run configuration

pub mod config;
pub mod optimizer;
pub mod sweep;

pub use config::RunConfig;
pub use optimizer::{
    BestPoint, Gradient, IterationRecord, OptimizationResult, OptimizerConfig, ParameterOptimizer,
    BETA_PERIOD, DEFAULT_EPSILON, DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITER, DEFAULT_THRESHOLD,
    GAMMA_PERIOD,
};
pub use sweep::{
    linspace, sweep, sweep_beta, sweep_gamma, SweepMode, SweepPoint, SweepResult,
    DEFAULT_SWEEP_POINTS,
};
