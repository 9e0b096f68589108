//! Weighted undirected graph of class sections.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

use super::types::{SectionKey, StudentId};
use crate::error::CohortError;

/// A sibling link as seen from outside the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<'a> {
    pub a: &'a SectionKey,
    pub b: &'a SectionKey,
    /// Number of sibling pairs split between `a` and `b`.
    pub weight: u32,
}

/// Class sections with their rosters, linked by split-sibling counts.
///
/// Links are undirected and stored with endpoints in key order. A link is
/// present only while its weight is positive. The graph is plain data and
/// cheap enough to clone; candidate states in the annealing loop are
/// independent copies.
///
/// # Examples
///
/// ```
/// use u_cohort::graph::{SectionGraph, SectionKey};
///
/// let a = SectionKey::new("1", "ESO", "A");
/// let b = SectionKey::new("1", "ESO", "B");
///
/// let mut graph = SectionGraph::new();
/// graph.add_section(a.clone(), vec![1, 2]);
/// graph.add_section(b.clone(), vec![3]);
/// graph.link(&a, &b, 1).unwrap();
///
/// assert_eq!(graph.weight(&b, &a), Some(1));
/// assert_eq!(graph.connected_components().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionGraph {
    sections: BTreeMap<SectionKey, Vec<StudentId>>,
    links: BTreeMap<(SectionKey, SectionKey), u32>,
}

fn link_key(a: &SectionKey, b: &SectionKey) -> (SectionKey, SectionKey) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

impl SectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a section with its roster. Adding an existing section appends
    /// the students to its roster.
    pub fn add_section(&mut self, key: SectionKey, students: Vec<StudentId>) {
        self.sections.entry(key).or_default().extend(students);
    }

    /// Adds `weight` split sibling pairs between two sections.
    ///
    /// A zero weight leaves the graph unchanged. Both sections must exist.
    pub fn link(&mut self, a: &SectionKey, b: &SectionKey, weight: u32) -> Result<(), CohortError> {
        for key in [a, b] {
            if !self.sections.contains_key(key) {
                return Err(CohortError::UnknownSection(key.clone()));
            }
        }
        if weight > 0 {
            *self.links.entry(link_key(a, b)).or_insert(0) += weight;
        }
        Ok(())
    }

    pub fn contains_section(&self, key: &SectionKey) -> bool {
        self.sections.contains_key(key)
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Section keys in key order.
    pub fn sections(&self) -> impl Iterator<Item = &SectionKey> {
        self.sections.keys()
    }

    /// Roster of a section, in enrollment order.
    pub fn students(&self, key: &SectionKey) -> Option<&[StudentId]> {
        self.sections.get(key).map(Vec::as_slice)
    }

    /// Distinct section labels across all grades and year groups, sorted.
    pub fn section_labels(&self) -> Vec<&str> {
        self.sections
            .keys()
            .map(|k| k.section.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Weight of the link between two sections, if one exists.
    pub fn weight(&self, a: &SectionKey, b: &SectionKey) -> Option<u32> {
        self.links.get(&link_key(a, b)).copied()
    }

    pub fn links(&self) -> impl Iterator<Item = Link<'_>> {
        self.links.iter().map(|((a, b), &weight)| Link { a, b, weight })
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Sum of all link weights.
    pub fn total_link_weight(&self) -> u64 {
        self.links.values().map(|&w| u64::from(w)).sum()
    }

    /// Number of students across all rosters.
    pub fn population_size(&self) -> usize {
        self.sections.values().map(Vec::len).sum()
    }

    /// Connected components, each listed in key order. Sections without
    /// links form singleton components; self-loops do not connect anything.
    pub fn connected_components(&self) -> Vec<Vec<&SectionKey>> {
        let mut adjacency: BTreeMap<&SectionKey, Vec<&SectionKey>> =
            self.sections.keys().map(|k| (k, Vec::new())).collect();
        for (a, b) in self.links.keys() {
            if a == b {
                continue;
            }
            if let Some(list) = adjacency.get_mut(a) {
                list.push(b);
            }
            if let Some(list) = adjacency.get_mut(b) {
                list.push(a);
            }
        }

        let mut seen: HashSet<&SectionKey> = HashSet::with_capacity(self.sections.len());
        let mut components = Vec::new();
        for start in self.sections.keys() {
            if !seen.insert(start) {
                continue;
            }
            let mut component = vec![start];
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                for &next in adjacency.get(node).into_iter().flatten() {
                    if seen.insert(next) {
                        component.push(next);
                        queue.push_back(next);
                    }
                }
            }
            component.sort();
            components.push(component);
        }
        components
    }

    /// First student found on more than one roster, with the section where
    /// they show up again.
    pub fn duplicate_student(&self) -> Option<(StudentId, &SectionKey)> {
        let mut seen = HashSet::with_capacity(self.population_size());
        self.sections.iter().find_map(|(key, roster)| {
            roster
                .iter()
                .find(|&&student| !seen.insert(student))
                .map(|&student| (student, key))
        })
    }

    /// Verifies that the rosters hold every expected student exactly once
    /// and nobody else.
    pub fn check_population(&self, expected: &[StudentId]) -> Result<(), CohortError> {
        let mut remaining: HashSet<StudentId> = expected.iter().copied().collect();
        if remaining.len() != expected.len() {
            return Err(CohortError::PopulationMismatch(
                "expected roster contains duplicates".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(expected.len());
        for (key, roster) in &self.sections {
            for &student in roster {
                if !seen.insert(student) {
                    return Err(CohortError::PopulationMismatch(format!(
                        "student {student} appears more than once (again in {key})"
                    )));
                }
                if !remaining.remove(&student) {
                    return Err(CohortError::PopulationMismatch(format!(
                        "student {student} in {key} is not in the expected roster"
                    )));
                }
            }
        }
        match remaining.iter().min() {
            Some(missing) => Err(CohortError::PopulationMismatch(format!(
                "student {missing} is missing from every section"
            ))),
            None => Ok(()),
        }
    }

    /// Moves a student between rosters: removed from `from`, appended to `to`.
    pub(crate) fn move_student(
        &mut self,
        student: StudentId,
        from: &SectionKey,
        to: &SectionKey,
    ) -> Result<(), CohortError> {
        if !self.sections.contains_key(to) {
            return Err(CohortError::UnknownSection(to.clone()));
        }
        let origin = self
            .sections
            .get_mut(from)
            .ok_or_else(|| CohortError::UnknownSection(from.clone()))?;
        let index = origin
            .iter()
            .position(|&s| s == student)
            .ok_or_else(|| CohortError::StudentNotInSection {
                student,
                section: from.clone(),
            })?;
        origin.remove(index);
        if let Some(destination) = self.sections.get_mut(to) {
            destination.push(student);
        }
        Ok(())
    }

    /// Re-routes every link touching `origin` so it touches `destination`
    /// instead, merging with links `destination` already has.
    ///
    /// Each removed link loses the unit contributed by the moved sibling and
    /// regains it on the destination side, so the link carries its full
    /// weight across and the total weight is unchanged. Returns the number of
    /// links re-routed.
    pub(crate) fn reroute_links(&mut self, origin: &SectionKey, destination: &SectionKey) -> usize {
        let touching: Vec<((SectionKey, SectionKey), u32)> = self
            .links
            .iter()
            .filter(|((a, b), _)| a == origin || b == origin)
            .map(|(key, &weight)| (key.clone(), weight))
            .collect();

        for (key, _) in &touching {
            self.links.remove(key);
        }

        for ((a, b), weight) in &touching {
            let other = if a == origin { b } else { a };
            let other = if other == origin { destination } else { other };
            *self.links.entry(link_key(destination, other)).or_insert(0) += *weight;
        }

        touching.len()
    }
}
