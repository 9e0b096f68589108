//! Sibling registry.
//!
//! The ordered list of students who have siblings in the school, each with
//! the section they currently attend. The neighbor generator picks records
//! from here by position and keeps them in step with the graph rosters.

use crate::error::CohortError;
use crate::graph::{SectionGraph, SectionKey, StudentId};

/// A student with siblings and their current section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiblingRecord {
    pub student: StudentId,
    /// First key part: the grade the student is enrolled in.
    pub grade: String,
    /// Second key part: the year group within the grade.
    pub year_group: String,
    /// Current section label.
    pub section: String,
}

impl SiblingRecord {
    pub fn new(
        student: StudentId,
        grade: impl Into<String>,
        year_group: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            student,
            grade: grade.into(),
            year_group: year_group.into(),
            section: section.into(),
        }
    }

    /// Key of the section node this record currently points at.
    pub fn section_key(&self) -> SectionKey {
        SectionKey::new(&self.grade, &self.year_group, &self.section)
    }
}

/// Ordered, positionally indexed sibling records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SiblingRegistry {
    records: Vec<SiblingRecord>,
}

impl SiblingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SiblingRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SiblingRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[SiblingRecord] {
        &self.records
    }

    /// Moves a student to a new section label. A student with several
    /// siblings has one record per sibling pair; all of them move.
    pub(crate) fn reassign(&mut self, student: StudentId, section: &str) {
        for record in self.records.iter_mut().filter(|r| r.student == student) {
            record.section = section.to_owned();
        }
    }

    /// Checks that every record points at an existing section whose roster
    /// lists the student.
    pub fn check_against(&self, graph: &SectionGraph) -> Result<(), CohortError> {
        for record in &self.records {
            let key = record.section_key();
            let roster = graph
                .students(&key)
                .ok_or_else(|| CohortError::UnknownSection(key.clone()))?;
            if !roster.contains(&record.student) {
                return Err(CohortError::StudentNotInSection {
                    student: record.student,
                    section: key,
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<SiblingRecord> for SiblingRegistry {
    fn from_iter<I: IntoIterator<Item = SiblingRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> SectionGraph {
        let mut g = SectionGraph::new();
        g.add_section(SectionKey::new("1", "ESO", "A"), vec![1, 2]);
        g.add_section(SectionKey::new("1", "ESO", "B"), vec![3]);
        g
    }

    #[test]
    fn test_section_key_from_record() {
        let r = SiblingRecord::new(1, "1", "ESO", "A");
        assert_eq!(r.section_key(), SectionKey::new("1", "ESO", "A"));
    }

    #[test]
    fn test_reassign_changes_section_only() {
        let mut reg: SiblingRegistry = [SiblingRecord::new(1, "1", "ESO", "A")]
            .into_iter()
            .collect();
        reg.reassign(1, "B");
        assert_eq!(reg.get(0), Some(&SiblingRecord::new(1, "1", "ESO", "B")));
        reg.reassign(5, "C");
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(0).unwrap().section, "B");
    }

    #[test]
    fn test_reassign_moves_every_record_of_student() {
        let mut reg: SiblingRegistry = [
            SiblingRecord::new(1, "1", "ESO", "A"),
            SiblingRecord::new(3, "1", "ESO", "B"),
            SiblingRecord::new(1, "1", "ESO", "A"),
        ]
        .into_iter()
        .collect();
        reg.reassign(1, "C");
        assert_eq!(reg.get(0).unwrap().section, "C");
        assert_eq!(reg.get(1).unwrap().section, "B");
        assert_eq!(reg.get(2).unwrap().section, "C");
    }

    #[test]
    fn test_check_against_consistent() {
        let reg: SiblingRegistry = [
            SiblingRecord::new(1, "1", "ESO", "A"),
            SiblingRecord::new(3, "1", "ESO", "B"),
        ]
        .into_iter()
        .collect();
        assert!(reg.check_against(&graph()).is_ok());
    }

    #[test]
    fn test_check_against_wrong_section() {
        let reg: SiblingRegistry = [SiblingRecord::new(3, "1", "ESO", "A")]
            .into_iter()
            .collect();
        assert_eq!(
            reg.check_against(&graph()),
            Err(CohortError::StudentNotInSection {
                student: 3,
                section: SectionKey::new("1", "ESO", "A"),
            })
        );
    }

    #[test]
    fn test_check_against_unknown_section() {
        let reg: SiblingRegistry = [SiblingRecord::new(1, "1", "ESO", "Z")]
            .into_iter()
            .collect();
        assert!(matches!(
            reg.check_against(&graph()),
            Err(CohortError::UnknownSection(_))
        ));
    }
}
