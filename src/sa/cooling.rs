//! Cooling schedules.
//!
//! # References
//!
//! - Geometric: standard textbook approach
//! - Logarithmic: Geman & Geman (1984)
//! - Cauchy: Szu & Hartley (1987), "Fast simulated annealing"
//! - Modified Cauchy: Lundy & Mees (1986)

use rand::Rng;

use crate::error::CohortError;

/// Inputs a schedule may read when computing the next temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoolingStep {
    /// Current temperature.
    pub temperature: f64,
    /// Temperature at the start of the run.
    pub initial_temperature: f64,
    /// Temperature below which the run stops.
    pub final_temperature: f64,
    /// Number of temperature levels completed before this one, from 0.
    pub level: usize,
    /// Inner iterations per temperature level.
    pub iterations_per_level: usize,
}

/// Temperature update applied once per temperature level.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoolingSchedule {
    /// `T' = T - level * beta`, with `beta ~ U(0.8, 0.99)` drawn on every
    /// update.
    Linear,

    /// Geometric (exponential) cooling: `T' = alpha * T`.
    Geometric {
        /// Cooling factor in (0, 1).
        alpha: f64,
    },

    /// `T' = T0 / (1 + alpha * ln(1 + level))`.
    ///
    /// Very slow. A run without `max_iterations` is rejected when reaching
    /// the final temperature would take more than a million levels.
    Logarithmic {
        /// Positive scale factor.
        alpha: f64,
    },

    /// `T' = T0 / (1 + level)`.
    Cauchy,

    /// `T' = T / (1 + beta * T)` with
    /// `beta = T0 - Tf / (L - 1) * T0 * Tf`.
    ModifiedCauchy,
}

impl Default for CoolingSchedule {
    fn default() -> Self {
        CoolingSchedule::Geometric { alpha: 0.95 }
    }
}

/// Lower bound of the linear schedule's per-update decay factor.
const LINEAR_BETA_MIN: f64 = 0.8;
/// Upper bound (exclusive) of the linear schedule's decay factor.
const LINEAR_BETA_MAX: f64 = 0.99;
/// Most temperature levels a logarithmic run may need when no iteration
/// budget is set.
const MAX_UNBUDGETED_LEVELS: f64 = 1e6;

impl CoolingSchedule {
    /// Builds a schedule from a numeric menu option.
    ///
    /// | code | schedule | `values` |
    /// |---|---|---|
    /// | 1 | linear | - |
    /// | 3 | logarithmic | `[alpha]` |
    /// | 4 | Cauchy | - |
    /// | 5 | modified Cauchy | - |
    /// | 6 | geometric | `[alpha]` |
    ///
    /// Any other code is a configuration error.
    ///
    /// The logarithmic schedule cools so slowly that a run usually needs
    /// [`AnnealingConfig::max_iterations`](crate::sa::AnnealingConfig) set;
    /// without it the run is refused once the temperatures are known.
    pub fn from_option(code: u8, values: &[f64]) -> Result<Self, CohortError> {
        let alpha = || {
            values.first().copied().ok_or_else(|| {
                CohortError::InvalidConfig(format!("cooling option {code} requires an alpha value"))
            })
        };
        let schedule = match code {
            1 => CoolingSchedule::Linear,
            3 => CoolingSchedule::Logarithmic { alpha: alpha()? },
            4 => CoolingSchedule::Cauchy,
            5 => CoolingSchedule::ModifiedCauchy,
            6 => CoolingSchedule::Geometric { alpha: alpha()? },
            other => return Err(CohortError::UnknownCoolingOption(other)),
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Human-readable schedule name.
    pub fn name(&self) -> &'static str {
        match self {
            CoolingSchedule::Linear => "linear",
            CoolingSchedule::Geometric { .. } => "geometric",
            CoolingSchedule::Logarithmic { .. } => "logarithmic",
            CoolingSchedule::Cauchy => "cauchy",
            CoolingSchedule::ModifiedCauchy => "modified-cauchy",
        }
    }

    /// Checks the schedule's own parameters.
    pub fn validate(&self) -> Result<(), CohortError> {
        match *self {
            CoolingSchedule::Geometric { alpha } => {
                if !(alpha > 0.0 && alpha < 1.0) {
                    return Err(CohortError::InvalidConfig(format!(
                        "geometric alpha must be in (0, 1), got {alpha}"
                    )));
                }
            }
            CoolingSchedule::Logarithmic { alpha } => {
                if !(alpha > 0.0 && alpha.is_finite()) {
                    return Err(CohortError::InvalidConfig(format!(
                        "logarithmic alpha must be positive, got {alpha}"
                    )));
                }
            }
            CoolingSchedule::Linear
            | CoolingSchedule::Cauchy
            | CoolingSchedule::ModifiedCauchy => {}
        }
        Ok(())
    }

    /// Checks parameters that depend on the run: the modified Cauchy
    /// schedule needs `L >= 2` and a positive `beta`; the logarithmic
    /// schedule needs an iteration budget (`max_iterations > 0`) unless it
    /// reaches the final temperature within a million levels.
    pub fn validate_for_run(
        &self,
        initial_temperature: f64,
        final_temperature: f64,
        iterations_per_level: usize,
        max_iterations: usize,
    ) -> Result<(), CohortError> {
        self.validate()?;
        match *self {
            CoolingSchedule::ModifiedCauchy => {
                if iterations_per_level < 2 {
                    return Err(CohortError::InvalidConfig(
                        "modified cauchy requires at least 2 iterations per level".into(),
                    ));
                }
                let beta = modified_cauchy_beta(
                    initial_temperature,
                    final_temperature,
                    iterations_per_level,
                );
                if beta <= 0.0 {
                    return Err(CohortError::InvalidConfig(format!(
                        "modified cauchy beta must be positive, got {beta}"
                    )));
                }
            }
            CoolingSchedule::Logarithmic { alpha } if max_iterations == 0 => {
                // T0 / (1 + alpha * ln(1 + k)) < Tf  <=>  ln(1 + k) > (T0 / Tf - 1) / alpha
                let exponent = (initial_temperature / final_temperature - 1.0) / alpha;
                if exponent.is_nan() || exponent > MAX_UNBUDGETED_LEVELS.ln() {
                    return Err(CohortError::InvalidConfig(format!(
                        "logarithmic cooling from {initial_temperature} to {final_temperature} \
                         needs about e^{exponent:.1} levels; set max_iterations"
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Computes the temperature for the next level.
    pub fn next_temperature<R: Rng>(&self, step: &CoolingStep, rng: &mut R) -> f64 {
        let level = step.level as f64;
        match *self {
            CoolingSchedule::Linear => {
                let beta = rng.random_range(LINEAR_BETA_MIN..LINEAR_BETA_MAX);
                step.temperature - level * beta
            }
            CoolingSchedule::Geometric { alpha } => step.temperature * alpha,
            CoolingSchedule::Logarithmic { alpha } => {
                step.initial_temperature / (1.0 + alpha * (1.0 + level).ln())
            }
            CoolingSchedule::Cauchy => step.initial_temperature / (1.0 + level),
            CoolingSchedule::ModifiedCauchy => {
                let beta = modified_cauchy_beta(
                    step.initial_temperature,
                    step.final_temperature,
                    step.iterations_per_level,
                );
                step.temperature / (1.0 + beta * step.temperature)
            }
        }
    }
}

fn modified_cauchy_beta(t0: f64, tf: f64, iterations_per_level: usize) -> f64 {
    t0 - tf / (iterations_per_level as f64 - 1.0) * t0 * tf
}
