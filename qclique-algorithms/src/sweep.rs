//! One-dimensional parameter sweeps
//!
//! Holds one angle fixed and evaluates the expectation over an evenly
//! spaced grid of the other: γ over [0, 2π], β over [0, π].
//! Results serialize to JSON for plotting.

use std::f64::consts::PI;

use qclique_core::{Angle, QaoaRunner, QcliqueError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default number of grid points
pub const DEFAULT_SWEEP_POINTS: usize = 100;

/// Evenly spaced points over [start, end], both ends included
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// How each grid point is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMode {
    /// Shot-sampled expectation
    #[default]
    Sampled,
    /// Expectation from the statevector probabilities
    Exact,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    pub value: f64,
    pub expectation: f64,
}

/// Expectation curve along one angle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Swept angle
    pub angle: Angle,
    /// Value of the other angle
    pub fixed: f64,
    pub mode: SweepMode,
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    /// Point with the highest expectation
    pub fn argmax(&self) -> Option<SweepPoint> {
        self.points
            .iter()
            .copied()
            .fold(None, |best: Option<SweepPoint>, p| match best {
                Some(b) if b.expectation >= p.expectation => Some(b),
                _ => Some(p),
            })
    }

    /// (γ, β) of a sweep point
    pub fn angles_at(&self, point: &SweepPoint) -> (f64, f64) {
        match self.angle {
            Angle::Gamma => (point.value, self.fixed),
            Angle::Beta => (self.fixed, point.value),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| QcliqueError::InvalidConfig(format!("sweep serialization failed: {}", e)))
    }

    /// Tab-separated `value expectation` rows
    pub fn to_tsv(&self) -> String {
        let mut out = format!("{}\texpectation\n", self.angle);
        for p in &self.points {
            out.push_str(&format!("{:.6}\t{:.6}\n", p.value, p.expectation));
        }
        out
    }
}

/// Upper end of the sweep range for `angle`
pub fn sweep_range(angle: Angle) -> f64 {
    match angle {
        Angle::Gamma => 2.0 * PI,
        Angle::Beta => PI,
    }
}

/// Sweep `angle` with the other angle fixed at `fixed`
pub fn sweep<R: Rng>(
    runner: &mut QaoaRunner<R>,
    angle: Angle,
    fixed: f64,
    n_points: usize,
    mode: SweepMode,
) -> Result<SweepResult> {
    if n_points == 0 {
        return Err(QcliqueError::InvalidConfig(
            "sweep needs at least one point".into(),
        ));
    }

    info!(%angle, fixed, n_points, ?mode, "sweeping");

    let mut points = Vec::with_capacity(n_points);
    for value in linspace(0.0, sweep_range(angle), n_points) {
        let (gamma, beta) = match angle {
            Angle::Gamma => (value, fixed),
            Angle::Beta => (fixed, value),
        };
        let expectation = match mode {
            SweepMode::Sampled => runner.expectation(gamma, beta)?,
            SweepMode::Exact => runner.exact_expectation(gamma, beta)?,
        };
        debug!(gamma, beta, expectation, "sweep point");
        points.push(SweepPoint { value, expectation });
    }

    Ok(SweepResult {
        angle,
        fixed,
        mode,
        points,
    })
}

/// γ over [0, 2π] at fixed β
pub fn sweep_gamma<R: Rng>(
    runner: &mut QaoaRunner<R>,
    beta: f64,
    n_points: usize,
    mode: SweepMode,
) -> Result<SweepResult> {
    sweep(runner, Angle::Gamma, beta, n_points, mode)
}

/// β over [0, π] at fixed γ
pub fn sweep_beta<R: Rng>(
    runner: &mut QaoaRunner<R>,
    gamma: f64,
    n_points: usize,
    mode: SweepMode,
) -> Result<SweepResult> {
    sweep(runner, Angle::Beta, gamma, n_points, mode)
}
