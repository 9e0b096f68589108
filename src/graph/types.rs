//! Identifiers used by the section graph.

use std::fmt;

/// Student identifier as issued by the enrollment system.
pub type StudentId = u64;

/// Composite identity of a class section: grade, year group and section
/// label (e.g. `("1", "ESO", "A")`).
///
/// Keys order lexicographically on the triple, so every map keyed by
/// sections iterates deterministically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionKey {
    pub grade: String,
    pub year_group: String,
    pub section: String,
}

impl SectionKey {
    pub fn new(
        grade: impl Into<String>,
        year_group: impl Into<String>,
        section: impl Into<String>,
    ) -> Self {
        Self {
            grade: grade.into(),
            year_group: year_group.into(),
            section: section.into(),
        }
    }

    /// The same grade and year group with a different section label.
    pub fn with_section(&self, section: impl Into<String>) -> Self {
        Self {
            grade: self.grade.clone(),
            year_group: self.year_group.clone(),
            section: section.into(),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.grade, self.year_group, self.section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_concatenates_parts() {
        assert_eq!(SectionKey::new("1", "ESO", "B").to_string(), "1ESOB");
    }

    #[test]
    fn test_with_section_keeps_grade_and_year() {
        let key = SectionKey::new("2", "BACH", "A");
        let moved = key.with_section("C");
        assert_eq!(moved, SectionKey::new("2", "BACH", "C"));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = SectionKey::new("1", "ESO", "A");
        let b = SectionKey::new("1", "ESO", "B");
        let c = SectionKey::new("2", "ESO", "A");
        assert!(a < b);
        assert!(b < c);
    }
}
