//! Neighbor generation: move one sibling to another section.
//!
//! # Move
//!
//! 1. Pick a sibling record uniformly at random
//! 2. Pick a new section label uniformly among the graph's labels other
//!    than the record's current one
//! 3. Reject if the destination section does not exist for the sibling's
//!    grade and year group, or is already at capacity
//! 4. Otherwise move the student between rosters, re-route every link of
//!    the origin section to the destination, and update the record
//!
//! The caller's graph is never touched: the candidate is a fresh copy. The
//! registry is updated only when the move is applied, so a rejected move
//! leaves both registry and graph exactly as they were.

use rand::Rng;

use crate::error::CohortError;
use crate::graph::{SectionGraph, SectionKey, StudentId};
use crate::registry::SiblingRegistry;

/// What happened to a proposed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The sibling was moved and the origin's links re-routed.
    Applied {
        student: StudentId,
        from: SectionKey,
        to: SectionKey,
        /// Number of links that were re-routed from `from` to `to`.
        rerouted_links: usize,
    },

    /// The destination already holds `max_siblings_per_section` students.
    CapacityExceeded {
        student: StudentId,
        to: SectionKey,
    },

    /// The drawn label has no section in the sibling's grade and year group.
    UnknownSection {
        student: StudentId,
        to: SectionKey,
    },
}

impl MoveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MoveOutcome::Applied { .. })
    }
}

/// A candidate graph and the move that produced it.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub graph: SectionGraph,
    pub outcome: MoveOutcome,
}

/// Proposes a neighbor of `graph` by reassigning one sibling.
///
/// On an applied move, every record of the chosen student in `registry`
/// is updated to the new section. On a rejected move, the returned graph
/// equals `graph` and the registry is unchanged.
///
/// # Errors
///
/// - [`CohortError::EmptyRegistry`] if there is nobody to move
/// - [`CohortError::NoAlternativeSection`] if the graph has a single label
/// - [`CohortError::UnknownSection`] / [`CohortError::StudentNotInSection`]
///   if the registry disagrees with the graph about the sibling's origin
///
/// # Examples
///
/// ```
/// use u_cohort::graph::{SectionGraph, SectionKey};
/// use u_cohort::neighbor::propose;
/// use u_cohort::random::create_rng;
/// use u_cohort::registry::{SiblingRecord, SiblingRegistry};
///
/// let a = SectionKey::new("1", "ESO", "A");
/// let b = SectionKey::new("1", "ESO", "B");
/// let mut graph = SectionGraph::new();
/// graph.add_section(a.clone(), vec![1]);
/// graph.add_section(b.clone(), vec![2]);
/// graph.link(&a, &b, 1).unwrap();
///
/// let mut registry: SiblingRegistry =
///     [SiblingRecord::new(1, "1", "ESO", "A")].into_iter().collect();
///
/// let proposal = propose(&mut registry, &graph, 5, &mut create_rng(0)).unwrap();
/// assert!(proposal.outcome.is_applied());
/// assert_eq!(registry.get(0).unwrap().section, "B");
/// assert_eq!(graph.students(&a), Some(&[1][..]));
/// ```
pub fn propose<R: Rng>(
    registry: &mut SiblingRegistry,
    graph: &SectionGraph,
    max_siblings_per_section: usize,
    rng: &mut R,
) -> Result<Proposal, CohortError> {
    if registry.is_empty() {
        return Err(CohortError::EmptyRegistry);
    }

    let pos = rng.random_range(0..registry.len());
    let record = registry.get(pos).ok_or(CohortError::EmptyRegistry)?;
    let student = record.student;
    let origin = record.section_key();

    let alternatives: Vec<&str> = graph
        .section_labels()
        .into_iter()
        .filter(|label| *label != record.section)
        .collect();
    if alternatives.is_empty() {
        return Err(CohortError::NoAlternativeSection);
    }
    let label = alternatives[rng.random_range(0..alternatives.len())];
    let destination = origin.with_section(label);

    let mut candidate = graph.clone();

    let Some(roster) = candidate.students(&destination) else {
        tracing::trace!(student, to = %destination, "move rejected: no such section");
        return Ok(Proposal {
            graph: candidate,
            outcome: MoveOutcome::UnknownSection {
                student,
                to: destination,
            },
        });
    };

    if roster.len() >= max_siblings_per_section {
        tracing::trace!(
            student,
            to = %destination,
            occupancy = roster.len(),
            "move rejected: section at capacity"
        );
        return Ok(Proposal {
            graph: candidate,
            outcome: MoveOutcome::CapacityExceeded {
                student,
                to: destination,
            },
        });
    }

    candidate.move_student(student, &origin, &destination)?;
    let rerouted_links = candidate.reroute_links(&origin, &destination);
    registry.reassign(student, &destination.section);

    tracing::trace!(student, from = %origin, to = %destination, rerouted_links, "move applied");

    Ok(Proposal {
        graph: candidate,
        outcome: MoveOutcome::Applied {
            student,
            from: origin,
            to: destination,
            rerouted_links,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::registry::SiblingRecord;

    fn key(section: &str) -> SectionKey {
        SectionKey::new("1", "ESO", section)
    }

    /// A = {1, 2}, B = {3}, C = {4}; siblings 1 (in A) and 3 (in B),
    /// linked A–B with weight 1.
    fn fixture() -> (SiblingRegistry, SectionGraph) {
        let mut g = SectionGraph::new();
        g.add_section(key("A"), vec![1, 2]);
        g.add_section(key("B"), vec![3]);
        g.add_section(key("C"), vec![4]);
        g.link(&key("A"), &key("B"), 1).unwrap();
        let reg = [
            SiblingRecord::new(1, "1", "ESO", "A"),
            SiblingRecord::new(3, "1", "ESO", "B"),
        ]
        .into_iter()
        .collect();
        (reg, g)
    }

    #[test]
    fn test_applied_move_updates_graph_and_registry() {
        let (mut reg, g) = fixture();
        let before = reg.clone();
        let p = propose(&mut reg, &g, 10, &mut create_rng(3)).unwrap();

        let MoveOutcome::Applied {
            student, from, to, ..
        } = &p.outcome
        else {
            panic!("expected an applied move, got {:?}", p.outcome);
        };
        assert_ne!(from, to);
        assert!(p.graph.students(to).unwrap().contains(student));
        assert!(!p.graph.students(from).unwrap().contains(student));

        let changed: Vec<_> = reg
            .records()
            .iter()
            .zip(before.records())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].0.section_key(), *to);
    }

    #[test]
    fn test_caller_graph_untouched() {
        let (reg, g) = fixture();
        let snapshot = g.clone();
        for seed in 0..20 {
            let mut scratch = reg.clone();
            propose(&mut scratch, &g, 10, &mut create_rng(seed)).unwrap();
        }
        assert_eq!(g, snapshot);
    }

    #[test]
    fn test_weight_conserved() {
        let (mut reg, g) = fixture();
        let mut current = g;
        for seed in 0..50 {
            let p = propose(&mut reg, &current, 10, &mut create_rng(seed)).unwrap();
            assert_eq!(p.graph.total_link_weight(), current.total_link_weight());
            current = p.graph;
        }
    }

    #[test]
    fn test_capacity_rejection_is_transactional() {
        let (mut reg, g) = fixture();
        let before = reg.clone();
        // Every section already holds at least one student.
        let p = propose(&mut reg, &g, 1, &mut create_rng(11)).unwrap();
        assert!(matches!(p.outcome, MoveOutcome::CapacityExceeded { .. }));
        assert_eq!(p.graph, g);
        assert_eq!(reg, before);
    }

    #[test]
    fn test_unknown_destination_rejected() {
        let mut g = SectionGraph::new();
        g.add_section(key("A"), vec![1]);
        g.add_section(SectionKey::new("2", "ESO", "B"), vec![2]);
        let mut reg: SiblingRegistry = [SiblingRecord::new(1, "1", "ESO", "A")]
            .into_iter()
            .collect();
        let p = propose(&mut reg, &g, 10, &mut create_rng(0)).unwrap();
        assert_eq!(
            p.outcome,
            MoveOutcome::UnknownSection {
                student: 1,
                to: key("B")
            }
        );
        assert_eq!(p.graph, g);
        assert_eq!(reg.get(0).unwrap().section, "A");
    }

    #[test]
    fn test_empty_registry() {
        let (_, g) = fixture();
        let err = propose(&mut SiblingRegistry::new(), &g, 10, &mut create_rng(0)).unwrap_err();
        assert_eq!(err, CohortError::EmptyRegistry);
    }

    #[test]
    fn test_single_label() {
        let mut g = SectionGraph::new();
        g.add_section(key("A"), vec![1]);
        let mut reg: SiblingRegistry = [SiblingRecord::new(1, "1", "ESO", "A")]
            .into_iter()
            .collect();
        let err = propose(&mut reg, &g, 10, &mut create_rng(0)).unwrap_err();
        assert_eq!(err, CohortError::NoAlternativeSection);
    }

    #[test]
    fn test_inconsistent_registry() {
        let (_, g) = fixture();
        let mut reg: SiblingRegistry = [SiblingRecord::new(4, "1", "ESO", "A")]
            .into_iter()
            .collect();
        let err = propose(&mut reg, &g, 10, &mut create_rng(0)).unwrap_err();
        assert_eq!(
            err,
            CohortError::StudentNotInSection {
                student: 4,
                section: key("A")
            }
        );
        assert_eq!(reg.get(0).unwrap().section, "A");
    }

    #[test]
    fn test_student_with_two_records_moves_both() {
        let mut g = SectionGraph::new();
        g.add_section(key("A"), vec![1, 2]);
        g.add_section(key("B"), vec![3]);
        g.add_section(key("C"), vec![5]);
        g.link(&key("A"), &key("B"), 1).unwrap();
        g.link(&key("A"), &key("C"), 1).unwrap();
        let reg: SiblingRegistry = [
            SiblingRecord::new(1, "1", "ESO", "A"),
            SiblingRecord::new(3, "1", "ESO", "B"),
            SiblingRecord::new(1, "1", "ESO", "A"),
            SiblingRecord::new(5, "1", "ESO", "C"),
        ]
        .into_iter()
        .collect();

        for seed in 0..20 {
            let mut reg = reg.clone();
            let mut current = g.clone();
            for _ in 0..30 {
                let p = propose(&mut reg, &current, 10, &mut create_rng(seed)).unwrap();
                current = p.graph;
                reg.check_against(&current).unwrap();
            }
            let sections: Vec<_> = reg
                .records()
                .iter()
                .filter(|r| r.student == 1)
                .map(|r| r.section.clone())
                .collect();
            assert_eq!(sections[0], sections[1]);
        }
    }

    #[test]
    fn test_same_seed_same_move() {
        let (mut reg_a, g) = fixture();
        let (mut reg_b, _) = fixture();
        let a = propose(&mut reg_a, &g, 10, &mut create_rng(42)).unwrap();
        let b = propose(&mut reg_b, &g, 10, &mut create_rng(42)).unwrap();
        assert_eq!(a.outcome, b.outcome);
        assert_eq!(a.graph, b.graph);
        assert_eq!(reg_a, reg_b);
    }
}
