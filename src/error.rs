//! Error types for section assignment.

use thiserror::Error;

use crate::graph::{SectionKey, StudentId};

/// Errors raised while validating inputs or applying moves.
///
/// Capacity violations during neighbor generation are not errors; they are
/// reported as [`MoveOutcome::CapacityExceeded`](crate::neighbor::MoveOutcome).
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CohortError {
    /// The sibling registry has no records to move.
    #[error("sibling registry is empty")]
    EmptyRegistry,

    /// The section graph has no nodes.
    #[error("section graph has no sections")]
    EmptyGraph,

    /// The total student count is zero.
    #[error("total student count must be positive")]
    NoStudents,

    /// Every section in the graph carries the same label, so a sibling
    /// has nowhere else to go.
    #[error("graph has fewer than two distinct section labels")]
    NoAlternativeSection,

    /// A registry record names a section that is not a node of the graph.
    #[error("section {0} is not in the graph")]
    UnknownSection(SectionKey),

    /// A registry record places a student in a section whose roster does
    /// not contain them.
    #[error("student {student} is not listed in section {section}")]
    StudentNotInSection {
        student: StudentId,
        section: SectionKey,
    },

    /// The graph rosters do not cover the expected population exactly once.
    #[error("population mismatch: {0}")]
    PopulationMismatch(String),

    /// Objective weights outside [0, 100] or not summing to 100.
    #[error("invalid objective weights {component}/{individual}: each in [0, 100], summing to 100")]
    InvalidWeights { component: f64, individual: f64 },

    /// Cooling menu code with no matching schedule.
    #[error("unknown cooling option {0}")]
    UnknownCoolingOption(u8),

    /// Any other configuration problem.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
