//! Configuration options for the CFR solver.
//!
//! This module provides the run-wide configuration and the per-run
//! statistics the solver reports.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How iterates are weighted in the running average of realization plans.
///
/// The scheme is fixed for a whole run; mixing schemes would make the
/// normalizer disagree with the accumulated weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weighting {
    /// Iteration `t` contributes with weight `t`; normalized by `T(T+1)/2`.
    ///
    /// Emphasizes later iterates. Older tooling calls this "exponential".
    #[default]
    #[serde(alias = "exponential")]
    Linear,

    /// Every iteration contributes with weight 1; normalized by `T`.
    Uniform,
}

impl Weighting {
    /// Weight of iteration `iteration` in the running sum.
    pub fn weight(self, iteration: u64) -> f64 {
        match self {
            Weighting::Linear => iteration as f64,
            Weighting::Uniform => 1.0,
        }
    }

    /// Sum of the weights of iterations `1..=iteration`.
    pub fn normalizer(self, iteration: u64) -> f64 {
        let t = iteration as f64;
        match self {
            Weighting::Linear => t * (t + 1.0) / 2.0,
            Weighting::Uniform => t,
        }
    }
}

/// Configuration for the CFR solver.
///
/// # Example
/// ```
/// use treeplex_cfr::cfr::{CfrConfig, Weighting};
///
/// let config = CfrConfig::default()
///     .with_iterations(1_000)
///     .with_weighting(Weighting::Uniform);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CfrConfig {
    /// Iteration budget for [`CfrSolver::solve`](crate::cfr::CfrSolver::solve),
    /// counting the initial uniform iterate as iteration 1.
    pub iterations: u64,

    /// Averaging scheme for the output plans.
    pub weighting: Weighting,

    /// Stop `solve` as soon as the epsilon-Nash gap drops below
    /// [`SMALL_EPSILON`](crate::cfr::SMALL_EPSILON).
    pub stop_on_epsilon: bool,
}

impl Default for CfrConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            weighting: Weighting::Linear,
            stop_on_epsilon: true,
        }
    }
}

impl CfrConfig {
    /// Create a new CfrConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the iteration budget.
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder method: set the averaging scheme.
    pub fn with_weighting(mut self, weighting: Weighting) -> Self {
        self.weighting = weighting;
        self
    }

    /// Builder method: set whether `solve` stops early at a small gap.
    pub fn with_early_stop(mut self, enable: bool) -> Self {
        self.stop_on_epsilon = enable;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Statistics tracked during one solver run.
///
/// Owned by a single solver, so repeated or concurrent runs never mix their
/// samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CfrStats {
    /// Total number of iterations completed, including the initial one.
    pub iterations: u64,

    /// Total time spent iterating (in seconds).
    pub elapsed_seconds: f64,

    /// Iterations per second.
    pub iterations_per_second: f64,

    /// Most recent epsilon-Nash gap.
    pub gap: Option<f64>,

    /// Gap after every iteration, in iteration order.
    pub gap_history: Vec<GapSample>,
}

/// The epsilon-Nash gap measured after one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GapSample {
    /// Iteration number when this measurement was taken.
    pub iteration: u64,
    /// Gap of the average plans after that iteration.
    pub gap: f64,
}

impl CfrStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update iterations per second based on elapsed time.
    pub fn update_rate(&mut self) {
        if self.elapsed_seconds > 0.0 {
            self.iterations_per_second = self.iterations as f64 / self.elapsed_seconds;
        }
    }

    /// Record a gap measurement.
    pub fn record_gap(&mut self, iteration: u64, gap: f64) {
        self.gap = Some(gap);
        self.gap_history.push(GapSample { iteration, gap });
    }
}
