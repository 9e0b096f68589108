//! Contagion risk objective.
//!
//! The score of a section graph combines two terms:
//!
//! - **Component risk**: the sum of squared component sizes. One outbreak
//!   inside a large linked cluster reaches every section of the cluster, so
//!   large clusters are penalized quadratically.
//! - **Individual exposure**: for each section, its share of the student
//!   body times the size of its component; the term is the population
//!   variance of these values, i.e. how unevenly exposure is spread.
//!
//! Both terms are weighted by percentages and scaled by 0.1:
//!
//! ```text
//! score = 0.1 * w_c * Σ|C|² + 0.1 * w_i * Var{ (students(n) / N) * |C(n)| }
//! ```
//!
//! Lower is better.

mod weights;

pub use weights::{ObjectiveWeights, DEFAULT_COMPONENT_WEIGHT, DEFAULT_INDIVIDUAL_WEIGHT};

use crate::graph::SectionGraph;

/// The two unweighted terms of the objective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBreakdown {
    /// Sum of squared component sizes.
    pub component: f64,
    /// Variance of per-section exposure.
    pub individual: f64,
}

impl RiskBreakdown {
    /// Combines the terms with the given weights.
    pub fn score(&self, weights: &ObjectiveWeights) -> f64 {
        0.1 * weights.component() * self.component + 0.1 * weights.individual() * self.individual
    }
}

/// Computes both terms for a graph.
///
/// An empty graph yields zero for both terms. With `total_students == 0`
/// every section's share is taken as zero.
pub fn breakdown(graph: &SectionGraph, total_students: usize) -> RiskBreakdown {
    let components = graph.connected_components();

    let component = components
        .iter()
        .map(|c| (c.len() * c.len()) as f64)
        .sum::<f64>();

    let exposures: Vec<f64> = components
        .iter()
        .flat_map(|c| {
            let size = c.len() as f64;
            c.iter().map(move |key| {
                let enrolled = graph.students(key).map_or(0, <[_]>::len);
                share(enrolled, total_students) * size
            })
        })
        .collect();

    RiskBreakdown {
        component,
        individual: variance(&exposures),
    }
}

/// Scores a graph. Pure and deterministic.
///
/// # Examples
///
/// ```
/// use u_cohort::graph::{SectionGraph, SectionKey};
/// use u_cohort::objective::{evaluate, ObjectiveWeights};
///
/// let mut graph = SectionGraph::new();
/// graph.add_section(SectionKey::new("1", "ESO", "A"), vec![1, 2, 3]);
///
/// // One isolated section: component term 1, no variance.
/// let score = evaluate(&graph, &ObjectiveWeights::default(), 3);
/// assert!((score - 6.0).abs() < 1e-12);
/// ```
pub fn evaluate(graph: &SectionGraph, weights: &ObjectiveWeights, total_students: usize) -> f64 {
    breakdown(graph, total_students).score(weights)
}

fn share(enrolled: usize, total_students: usize) -> f64 {
    if total_students == 0 {
        0.0
    } else {
        enrolled as f64 / total_students as f64
    }
}

/// Population variance. Empty and single-value inputs have zero variance.
fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SectionKey;

    fn key(section: &str) -> SectionKey {
        SectionKey::new("1", "ESO", section)
    }

    /// A–B linked, C isolated; rosters of 2, 2 and 1 students.
    fn linked_graph() -> SectionGraph {
        let mut g = SectionGraph::new();
        g.add_section(key("A"), vec![1, 2]);
        g.add_section(key("B"), vec![3, 4]);
        g.add_section(key("C"), vec![5]);
        g.link(&key("A"), &key("B"), 1).unwrap();
        g
    }

    #[test]
    fn test_variance() {
        assert_eq!(variance(&[]), 0.0);
        assert_eq!(variance(&[3.5]), 0.0);
        assert!((variance(&[1.0, 2.0, 3.0, 4.0]) - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_single_section() {
        let mut g = SectionGraph::new();
        g.add_section(key("A"), vec![1, 2]);
        let b = breakdown(&g, 2);
        assert_eq!(b.component, 1.0);
        assert_eq!(b.individual, 0.0);
    }

    #[test]
    fn test_empty_graph() {
        let b = breakdown(&SectionGraph::new(), 0);
        assert_eq!(b.component, 0.0);
        assert_eq!(b.individual, 0.0);
    }

    #[test]
    fn test_breakdown_linked() {
        let b = breakdown(&linked_graph(), 5);
        // Components {A, B} and {C}: 4 + 1.
        assert_eq!(b.component, 5.0);
        // Exposures: 0.4*2, 0.4*2, 0.2*1 = 0.8, 0.8, 0.2; mean 0.6.
        let expected = (0.04 + 0.04 + 0.16) / 3.0;
        assert!((b.individual - expected).abs() < 1e-12);
    }

    #[test]
    fn test_weight_isolation() {
        let g = linked_graph();
        let b = breakdown(&g, 5);
        let only_component = evaluate(&g, &ObjectiveWeights::unchecked(100.0, 0.0), 5);
        let only_individual = evaluate(&g, &ObjectiveWeights::unchecked(0.0, 100.0), 5);
        assert!((only_component - 10.0 * b.component).abs() < 1e-12);
        assert!((only_individual - 10.0 * b.individual).abs() < 1e-12);
    }

    #[test]
    fn test_splitting_clusters_lowers_score() {
        let linked = linked_graph();
        let w = ObjectiveWeights::default();

        let mut none = SectionGraph::new();
        none.add_section(key("A"), vec![1, 2]);
        none.add_section(key("B"), vec![3, 4]);
        none.add_section(key("C"), vec![5]);

        assert!(evaluate(&none, &w, 5) < evaluate(&linked, &w, 5));
    }

    #[test]
    fn test_zero_students_share_is_zero() {
        let b = breakdown(&linked_graph(), 0);
        assert_eq!(b.individual, 0.0);
    }
}
