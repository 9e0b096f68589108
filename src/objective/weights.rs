//! Percentage weights of the two risk terms.

use crate::error::CohortError;

/// Component weight used when the supplied percentages are unusable.
pub const DEFAULT_COMPONENT_WEIGHT: f64 = 60.0;

/// Individual weight used when the supplied percentages are unusable.
pub const DEFAULT_INDIVIDUAL_WEIGHT: f64 = 40.0;

/// Relative importance of component risk versus individual exposure, as
/// percentages that normally sum to 100.
///
/// # Examples
///
/// ```
/// use u_cohort::objective::ObjectiveWeights;
///
/// let w = ObjectiveWeights::from_component(75.0);
/// assert_eq!(w.individual(), 25.0);
///
/// // Out of range: falls back to the 60/40 split.
/// let w = ObjectiveWeights::from_component(140.0);
/// assert_eq!(w, ObjectiveWeights::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveWeights {
    component: f64,
    individual: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            component: DEFAULT_COMPONENT_WEIGHT,
            individual: DEFAULT_INDIVIDUAL_WEIGHT,
        }
    }
}

fn in_range(p: f64) -> bool {
    (0.0..=100.0).contains(&p)
}

impl ObjectiveWeights {
    /// Strict constructor: both percentages in [0, 100], summing to 100.
    pub fn new(component: f64, individual: f64) -> Result<Self, CohortError> {
        let sums_to_100 = (component + individual - 100.0).abs() < 1e-9;
        if in_range(component) && in_range(individual) && sums_to_100 {
            Ok(Self {
                component,
                individual,
            })
        } else {
            Err(CohortError::InvalidWeights {
                component,
                individual,
            })
        }
    }

    /// Lenient constructor: invalid input is replaced by the 60/40 split.
    pub fn from_percentages(component: f64, individual: f64) -> Self {
        Self::new(component, individual).unwrap_or_else(|err| {
            tracing::warn!(%err, "falling back to default objective weights");
            Self::default()
        })
    }

    /// Takes the component percentage and gives the remainder to the
    /// individual term. Out-of-range input falls back to 60/40.
    pub fn from_component(component: f64) -> Self {
        Self::from_percentages(component, 100.0 - component)
    }

    /// Weights taken as given, without range or sum checks.
    ///
    /// Useful for isolating one term (`unchecked(100.0, 0.0)`) or for
    /// sensitivity studies.
    pub fn unchecked(component: f64, individual: f64) -> Self {
        Self {
            component,
            individual,
        }
    }

    pub fn component(&self) -> f64 {
        self.component
    }

    pub fn individual(&self) -> f64 {
        self.individual
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_split() {
        let w = ObjectiveWeights::default();
        assert_eq!(w.component(), 60.0);
        assert_eq!(w.individual(), 40.0);
    }

    #[test]
    fn test_new_valid() {
        let w = ObjectiveWeights::new(30.0, 70.0).unwrap();
        assert_eq!(w.component(), 30.0);
    }

    #[test]
    fn test_new_rejects_bad_sum() {
        assert!(ObjectiveWeights::new(30.0, 30.0).is_err());
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(ObjectiveWeights::new(-10.0, 110.0).is_err());
    }

    #[test]
    fn test_from_percentages_falls_back() {
        assert_eq!(
            ObjectiveWeights::from_percentages(120.0, -20.0),
            ObjectiveWeights::default()
        );
    }

    #[test]
    fn test_from_component_edges() {
        assert_eq!(ObjectiveWeights::from_component(0.0).individual(), 100.0);
        assert_eq!(ObjectiveWeights::from_component(100.0).individual(), 0.0);
        assert_eq!(
            ObjectiveWeights::from_component(-1.0),
            ObjectiveWeights::default()
        );
    }
}
