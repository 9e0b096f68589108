//! Problem instance and solution state.

use crate::error::CohortError;
use crate::graph::SectionGraph;
use crate::registry::SiblingRegistry;

/// Input to an annealing run.
///
/// The instance is never modified; every run works on its own copy.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instance {
    /// Initial section graph, with edge weights equal to split-sibling
    /// counts.
    pub graph: SectionGraph,
    /// Siblings and their initial sections.
    pub registry: SiblingRegistry,
    /// Size of the student body, the denominator of each section's share.
    pub total_students: usize,
}

impl Instance {
    pub fn new(graph: SectionGraph, registry: SiblingRegistry, total_students: usize) -> Self {
        Self {
            graph,
            registry,
            total_students,
        }
    }

    /// Checks the preconditions of a run.
    ///
    /// Besides the emptiness checks, the rosters must list each student
    /// once and add up to `total_students`.
    pub fn validate(&self) -> Result<(), CohortError> {
        if self.graph.is_empty() {
            return Err(CohortError::EmptyGraph);
        }
        if self.registry.is_empty() {
            return Err(CohortError::EmptyRegistry);
        }
        if self.total_students == 0 {
            return Err(CohortError::NoStudents);
        }
        if let Some((student, key)) = self.graph.duplicate_student() {
            return Err(CohortError::PopulationMismatch(format!(
                "student {student} appears more than once (again in {key})"
            )));
        }
        let population = self.graph.population_size();
        if population != self.total_students {
            return Err(CohortError::PopulationMismatch(format!(
                "sections hold {population} students but total_students is {}",
                self.total_students
            )));
        }
        if self.graph.section_labels().len() < 2 {
            return Err(CohortError::NoAlternativeSection);
        }
        self.registry.check_against(&self.graph)
    }

    pub(crate) fn initial_assignment(&self) -> Assignment {
        Assignment {
            graph: self.graph.clone(),
            registry: self.registry.clone(),
        }
    }
}

/// A solution: section rosters and links, with the registry in step.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub graph: SectionGraph,
    pub registry: SiblingRegistry,
}
