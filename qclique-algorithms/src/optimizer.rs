//! Finite-difference gradient ascent over (γ, β)
//!
//! The optimizer alternates between the two angles. Each iteration moves
//! one angle along its central-difference gradient and re-estimates that
//! gradient at the new point:
//!
//! ```text
//!   start ──► estimate dγ, dβ
//!              │
//!              ▼
//!   ┌──► GAMMA: γ ← (γ + dγ·η) mod 2π, re-estimate dγ ──┐
//!   │                                                   │
//!   └─── BETA:  β ← (β + dβ·η) mod π,  re-estimate dβ ◄─┘
//!
//!   stop when (|dγ| + |dβ|) / 2 ≤ τ, or at the iteration cap
//! ```
//!
//! The objective is noisy and non-convex, so reaching the cap is expected
//! on some inputs; the result then carries the best point observed.

use std::f64::consts::PI;

use qclique_core::{Angle, QaoaRunner, QcliqueError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

// =============================================================================
// Constants
// =============================================================================

/// Default finite-difference step ε
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Default learning rate η
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Default stop threshold τ on the mean gradient magnitude
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Default iteration cap
pub const DEFAULT_MAX_ITER: usize = 200;

/// Default starting angles
pub const DEFAULT_INITIAL_GAMMA: f64 = 2.0;
pub const DEFAULT_INITIAL_BETA: f64 = 2.0;

/// γ wraps modulo 2π
pub const GAMMA_PERIOD: f64 = 2.0 * PI;

/// β wraps modulo π
pub const BETA_PERIOD: f64 = PI;

// =============================================================================
// Configuration
// =============================================================================

/// Optimizer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Finite-difference step ε
    pub epsilon: f64,
    /// Learning rate η
    pub learning_rate: f64,
    /// Stop threshold τ
    pub threshold: f64,
    /// Maximum number of update steps
    pub max_iter: usize,
    /// Starting γ
    pub initial_gamma: f64,
    /// Starting β
    pub initial_beta: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            learning_rate: DEFAULT_LEARNING_RATE,
            threshold: DEFAULT_THRESHOLD,
            max_iter: DEFAULT_MAX_ITER,
            initial_gamma: DEFAULT_INITIAL_GAMMA,
            initial_beta: DEFAULT_INITIAL_BETA,
        }
    }
}

impl OptimizerConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn with_start(mut self, gamma: f64, beta: f64) -> Self {
        self.initial_gamma = gamma;
        self.initial_beta = beta;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(QcliqueError::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(QcliqueError::InvalidConfig(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.threshold >= 0.0) {
            return Err(QcliqueError::InvalidConfig(format!(
                "threshold must be non-negative, got {}",
                self.threshold
            )));
        }
        if self.max_iter == 0 {
            return Err(QcliqueError::InvalidConfig(
                "max_iter must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Gradient
// =============================================================================

/// Central-difference estimate for one angle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub parameter: Angle,
    pub value: f64,
}

impl Gradient {
    /// Sign of the estimate; a zero estimate has no direction.
    pub fn direction(&self) -> Result<f64> {
        if self.value == 0.0 {
            Err(QcliqueError::ZeroGradient {
                parameter: self.parameter,
            })
        } else {
            Ok(self.value.signum())
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.value.abs()
    }
}

/// Highest objective value seen at any evaluated point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestPoint {
    pub gamma: f64,
    pub beta: f64,
    pub value: f64,
}

/// One update step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: usize,
    /// Angle updated in this step
    pub step: Angle,
    pub gamma: f64,
    pub beta: f64,
    pub d_gamma: f64,
    pub d_beta: f64,
    /// True if the gradient was zero and the angle was held
    pub held: bool,
}

/// Result of an optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Final γ
    pub gamma: f64,
    /// Final β
    pub beta: f64,
    /// Last gradient estimates
    pub d_gamma: f64,
    pub d_beta: f64,
    /// Update steps taken
    pub iterations: usize,
    /// Objective evaluations spent
    pub evaluations: usize,
    /// Whether the stop threshold was met
    pub converged: bool,
    /// Best point observed during the run
    pub best: BestPoint,
    pub history: Vec<IterationRecord>,
}

impl OptimizationResult {
    /// Final (γ, β), or `NonConvergence` carrying the best point observed
    pub fn into_converged(self) -> Result<(f64, f64)> {
        if self.converged {
            Ok((self.gamma, self.beta))
        } else {
            Err(QcliqueError::NonConvergence {
                best_gamma: self.best.gamma,
                best_beta: self.best.beta,
                best_value: self.best.value,
                iterations: self.iterations,
            })
        }
    }

    /// Mean gradient magnitude at the end of the run
    pub fn mean_gradient(&self) -> f64 {
        (self.d_gamma.abs() + self.d_beta.abs()) / 2.0
    }
}

// =============================================================================
// Optimizer
// =============================================================================

/// Objective wrapper that counts evaluations and tracks the best point
struct Tracked<F> {
    objective: F,
    best: BestPoint,
    evaluations: usize,
}

impl<F> Tracked<F>
where
    F: FnMut(f64, f64) -> Result<f64>,
{
    fn new(objective: F, gamma: f64, beta: f64) -> Self {
        Self {
            objective,
            best: BestPoint {
                gamma,
                beta,
                value: f64::NEG_INFINITY,
            },
            evaluations: 0,
        }
    }

    fn eval(&mut self, gamma: f64, beta: f64) -> Result<f64> {
        let value = (self.objective)(gamma, beta)?;
        self.evaluations += 1;
        if value > self.best.value {
            self.best = BestPoint { gamma, beta, value };
        }
        Ok(value)
    }

    /// [f(x+ε) − f(x−ε)] / 2ε along `parameter`
    fn central_difference(
        &mut self,
        parameter: Angle,
        gamma: f64,
        beta: f64,
        epsilon: f64,
    ) -> Result<Gradient> {
        let (plus, minus) = match parameter {
            Angle::Gamma => (
                self.eval(gamma + epsilon, beta)?,
                self.eval(gamma - epsilon, beta)?,
            ),
            Angle::Beta => (
                self.eval(gamma, beta + epsilon)?,
                self.eval(gamma, beta - epsilon)?,
            ),
        };
        Ok(Gradient {
            parameter,
            value: (plus - minus) / (2.0 * epsilon),
        })
    }
}

/// Alternating finite-difference gradient ascent
#[derive(Debug, Clone)]
pub struct ParameterOptimizer {
    config: OptimizerConfig,
}

impl ParameterOptimizer {
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Maximize the QAOA expectation of `runner`'s graph
    pub fn optimize_qaoa<R: Rng>(&self, runner: &mut QaoaRunner<R>) -> Result<OptimizationResult> {
        self.optimize(|gamma, beta| runner.expectation(gamma, beta))
    }

    /// Maximize an arbitrary objective f(γ, β)
    pub fn optimize<F>(&self, objective: F) -> Result<OptimizationResult>
    where
        F: FnMut(f64, f64) -> Result<f64>,
    {
        let cfg = &self.config;
        let mut gamma = cfg.initial_gamma;
        let mut beta = cfg.initial_beta;
        let mut f = Tracked::new(objective, gamma, beta);

        let mut d_gamma = f.central_difference(Angle::Gamma, gamma, beta, cfg.epsilon)?;
        let mut d_beta = f.central_difference(Angle::Beta, gamma, beta, cfg.epsilon)?;

        info!(
            gamma,
            beta,
            d_gamma = d_gamma.value,
            d_beta = d_beta.value,
            "starting gradient ascent"
        );

        let mut step = Angle::Gamma;
        let mut iterations = 0;
        let mut history = Vec::new();
        let mean = |a: &Gradient, b: &Gradient| (a.magnitude() + b.magnitude()) / 2.0;

        while mean(&d_gamma, &d_beta) > cfg.threshold {
            if iterations >= cfg.max_iter {
                break;
            }

            let held = match step {
                Angle::Gamma => {
                    let held = match d_gamma.direction() {
                        Ok(sign) => {
                            gamma = (gamma + sign * d_gamma.magnitude() * cfg.learning_rate)
                                .rem_euclid(GAMMA_PERIOD);
                            false
                        }
                        Err(QcliqueError::ZeroGradient { .. }) => true,
                        Err(err) => return Err(err),
                    };
                    d_gamma = f.central_difference(Angle::Gamma, gamma, beta, cfg.epsilon)?;
                    held
                }
                Angle::Beta => {
                    let held = match d_beta.direction() {
                        Ok(sign) => {
                            beta = (beta + sign * d_beta.magnitude() * cfg.learning_rate)
                                .rem_euclid(BETA_PERIOD);
                            false
                        }
                        Err(QcliqueError::ZeroGradient { .. }) => true,
                        Err(err) => return Err(err),
                    };
                    d_beta = f.central_difference(Angle::Beta, gamma, beta, cfg.epsilon)?;
                    held
                }
            };

            if held {
                debug!(iteration = iterations, %step, "zero gradient, holding parameter");
            }
            debug!(
                iteration = iterations,
                %step,
                gamma,
                beta,
                d_gamma = d_gamma.value,
                d_beta = d_beta.value,
                "step"
            );

            history.push(IterationRecord {
                iteration: iterations,
                step,
                gamma,
                beta,
                d_gamma: d_gamma.value,
                d_beta: d_beta.value,
                held,
            });

            iterations += 1;
            step = match step {
                Angle::Gamma => Angle::Beta,
                Angle::Beta => Angle::Gamma,
            };
        }

        let converged = mean(&d_gamma, &d_beta) <= cfg.threshold;
        if converged {
            info!(iterations, gamma, beta, "gradient ascent converged");
        } else {
            warn!(
                iterations,
                best_gamma = f.best.gamma,
                best_beta = f.best.beta,
                best_value = f.best.value,
                "iteration cap reached without meeting the stop threshold"
            );
        }

        Ok(OptimizationResult {
            gamma,
            beta,
            d_gamma: d_gamma.value,
            d_beta: d_beta.value,
            iterations,
            evaluations: f.evaluations,
            converged,
            best: f.best,
            history,
        })
    }

    /// Run from each start point and keep the run with the highest final
    /// expectation. Returns that run and its expectation.
    pub fn optimize_multistart<R: Rng>(
        &self,
        runner: &mut QaoaRunner<R>,
        starts: &[(f64, f64)],
    ) -> Result<(OptimizationResult, f64)> {
        let mut best: Option<(OptimizationResult, f64)> = None;

        for &(gamma, beta) in starts {
            let optimizer = Self::new(self.config.clone().with_start(gamma, beta))?;
            let result = optimizer.optimize_qaoa(runner)?;
            let value = runner.expectation(result.gamma, result.beta)?;
            debug!(gamma, beta, value, "multistart run finished");

            if best.as_ref().map_or(true, |(_, v)| value > *v) {
                best = Some((result, value));
            }
        }

        best.ok_or_else(|| QcliqueError::InvalidConfig("no start points given".into()))
    }
}

// =============================================================================
// Tests
// =============================================================================
