//! Annealing configuration.

use super::cooling::CoolingSchedule;
use crate::error::CohortError;
use crate::objective::ObjectiveWeights;

/// How the neighbor generator's random stream is seeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReseedPolicy {
    /// One stream, seeded once at the start of the run.
    #[default]
    PerRun,

    /// A fresh stream seeded with the run seed on every proposal.
    ///
    /// Every proposal from the same state draws the same sibling and the
    /// same destination, so exploration only comes from state changes.
    /// Kept for reproducing results of earlier runs that seeded this way.
    PerCall,
}

/// Configuration for an annealing run.
///
/// # Examples
///
/// ```
/// use u_cohort::objective::ObjectiveWeights;
/// use u_cohort::sa::{AnnealingConfig, CoolingSchedule};
///
/// let config = AnnealingConfig::default()
///     .with_iterations_per_level(50)
///     .with_final_temperature(0.01)
///     .with_cooling(CoolingSchedule::Geometric { alpha: 0.9 })
///     .with_weights(ObjectiveWeights::from_component(70.0))
///     .with_max_siblings_per_section(25)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealingConfig {
    /// Candidate moves evaluated at each temperature level (`L`).
    pub iterations_per_level: usize,

    /// The run stops once the temperature drops below this (`Tf`).
    pub final_temperature: f64,

    /// Cooling schedule.
    pub cooling: CoolingSchedule,

    /// Weights of the component and individual risk terms.
    pub weights: ObjectiveWeights,

    /// A move is rejected when the destination roster already has this
    /// many students.
    pub max_siblings_per_section: usize,

    /// Random seed. `None` draws one, which is reported in the result.
    pub seed: Option<u64>,

    /// Seeding of the neighbor generator.
    pub reseed: ReseedPolicy,

    /// Hard budget on candidate evaluations. 0 = no limit.
    pub max_iterations: usize,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        Self {
            iterations_per_level: 100,
            final_temperature: 1e-3,
            cooling: CoolingSchedule::default(),
            weights: ObjectiveWeights::default(),
            max_siblings_per_section: 30,
            seed: None,
            reseed: ReseedPolicy::default(),
            max_iterations: 0,
        }
    }
}

impl AnnealingConfig {
    pub fn with_iterations_per_level(mut self, n: usize) -> Self {
        self.iterations_per_level = n;
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = t;
        self
    }

    pub fn with_cooling(mut self, cooling: CoolingSchedule) -> Self {
        self.cooling = cooling;
        self
    }

    pub fn with_weights(mut self, weights: ObjectiveWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_max_siblings_per_section(mut self, n: usize) -> Self {
        self.max_siblings_per_section = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_reseed(mut self, reseed: ReseedPolicy) -> Self {
        self.reseed = reseed;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    /// Validates the parameters that do not depend on the instance.
    pub fn validate(&self) -> Result<(), CohortError> {
        if self.iterations_per_level == 0 {
            return Err(CohortError::InvalidConfig(
                "iterations_per_level must be positive".into(),
            ));
        }
        if !(self.final_temperature > 0.0 && self.final_temperature.is_finite()) {
            return Err(CohortError::InvalidConfig(format!(
                "final_temperature must be positive and finite, got {}",
                self.final_temperature
            )));
        }
        if self.max_siblings_per_section == 0 {
            return Err(CohortError::InvalidConfig(
                "max_siblings_per_section must be positive".into(),
            ));
        }
        self.cooling.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnnealingConfig::default();
        assert_eq!(config.iterations_per_level, 100);
        assert_eq!(config.reseed, ReseedPolicy::PerRun);
        assert_eq!(config.weights, ObjectiveWeights::default());
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_validate_ok() {
        assert!(AnnealingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_iterations() {
        let config = AnnealingConfig::default().with_iterations_per_level(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_final_temperature() {
        assert!(AnnealingConfig::default()
            .with_final_temperature(0.0)
            .validate()
            .is_err());
        assert!(AnnealingConfig::default()
            .with_final_temperature(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_capacity() {
        let config = AnnealingConfig::default().with_max_siblings_per_section(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_alpha() {
        let config =
            AnnealingConfig::default().with_cooling(CoolingSchedule::Geometric { alpha: 1.5 });
        assert!(config.validate().is_err());
    }
}
