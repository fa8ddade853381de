//! Annealing configuration and inverse-temperature schedules.

use crate::error::{Error, Result};

/// Spacing of the inverse temperatures between `beta0` and `beta1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BetaSchedule {
    /// Equal differences between consecutive levels.
    #[default]
    Linear,

    /// Equal ratios between consecutive levels. Requires `beta0 > 0`.
    Geometric,
}

/// Configuration for [`AnnealRunner`](super::AnnealRunner).
///
/// Temperatures are given as inverse temperatures `β = 1/T`, so the schedule
/// goes from `beta0` (hot) up to `beta1` (cold).
///
/// # Examples
///
/// ```
/// use ksat_anneal::sa::{AnnealConfig, BetaSchedule};
///
/// let config = AnnealConfig::default()
///     .with_mcmc_steps(500)
///     .with_anneal_steps(50)
///     .with_betas(0.5, 8.0)
///     .with_schedule(BetaSchedule::Geometric)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Metropolis proposals per temperature level.
    pub mcmc_steps: usize,

    /// Number of temperature levels. 0 runs a single level at `beta0`.
    pub anneal_steps: usize,

    /// First (smallest) inverse temperature.
    pub beta0: f64,

    /// Last (largest) inverse temperature.
    pub beta1: f64,

    /// Spacing between levels.
    pub schedule: BetaSchedule,

    /// Seed for move proposals and acceptance draws.
    pub seed: Option<u64>,

    /// Stop once a zero-cost state has been found.
    pub early_stopping: bool,

    /// Cross-check every incremental delta against full recomputation.
    pub debug_delta_cost: bool,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            mcmc_steps: 1000,
            anneal_steps: 100,
            beta0: 0.1,
            beta1: 10.0,
            schedule: BetaSchedule::Linear,
            seed: None,
            early_stopping: true,
            debug_delta_cost: false,
        }
    }
}

impl AnnealConfig {
    pub fn with_mcmc_steps(mut self, n: usize) -> Self {
        self.mcmc_steps = n;
        self
    }

    pub fn with_anneal_steps(mut self, n: usize) -> Self {
        self.anneal_steps = n;
        self
    }

    pub fn with_betas(mut self, beta0: f64, beta1: f64) -> Self {
        self.beta0 = beta0;
        self.beta1 = beta1;
        self
    }

    pub fn with_schedule(mut self, schedule: BetaSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// `true` selects [`BetaSchedule::Geometric`], `false`
    /// [`BetaSchedule::Linear`].
    pub fn with_logspace(self, logspace: bool) -> Self {
        self.with_schedule(if logspace {
            BetaSchedule::Geometric
        } else {
            BetaSchedule::Linear
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_early_stopping(mut self, on: bool) -> Self {
        self.early_stopping = on;
        self
    }

    pub fn with_debug_delta_cost(mut self, on: bool) -> Self {
        self.debug_delta_cost = on;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.mcmc_steps == 0 {
            return Err(Error::InvalidConfig("mcmc_steps must be positive".into()));
        }
        if !self.beta0.is_finite() || !self.beta1.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "betas must be finite, got {} and {}",
                self.beta0, self.beta1
            )));
        }
        if self.beta0 < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "beta0 must be non-negative, got {}",
                self.beta0
            )));
        }
        if self.beta0 > self.beta1 {
            return Err(Error::InvalidConfig(format!(
                "beta0 ({}) must not exceed beta1 ({})",
                self.beta0, self.beta1
            )));
        }
        if self.schedule == BetaSchedule::Geometric && self.beta0 <= 0.0 {
            return Err(Error::InvalidConfig(
                "geometric schedule requires beta0 > 0".into(),
            ));
        }
        Ok(())
    }

    /// The inverse temperatures of each level, in the order they are run.
    ///
    /// Both endpoints are included. With `anneal_steps` 0 or 1 the schedule
    /// is the single value `beta0`.
    pub fn betas(&self) -> Vec<f64> {
        let n = self.anneal_steps;
        if n <= 1 {
            return vec![self.beta0];
        }
        let last = (n - 1) as f64;
        (0..n)
            .map(|i| {
                if i == 0 {
                    return self.beta0;
                }
                if i == n - 1 {
                    return self.beta1;
                }
                let t = i as f64 / last;
                let beta = match self.schedule {
                    BetaSchedule::Linear => self.beta0 + t * (self.beta1 - self.beta0),
                    // Interpolated in log space; the ratio beta1 / beta0 may overflow.
                    BetaSchedule::Geometric => {
                        let (l0, l1) = (self.beta0.ln(), self.beta1.ln());
                        (l0 + t * (l1 - l0)).exp()
                    }
                };
                beta.min(self.beta1).max(self.beta0)
            })
            .collect()
    }
}
