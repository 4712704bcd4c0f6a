//! Subject model - a node of the curriculum graph.

use serde::{Deserialize, Serialize};
use crate::id::SubjectId;
use crate::term::Term;

/// Category assigned to subjects added without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// A unit of curriculum with its prerequisite edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique identifier within the template
    pub id: SubjectId,

    /// Display name
    pub name: String,

    /// Aggregation tag
    pub category: String,

    /// Curriculum period
    pub term: Term,

    /// Subjects that must be completed first
    #[serde(default)]
    pub prerequisites: Vec<SubjectId>,
}

impl Subject {
    /// Create a subject without prerequisites.
    pub fn new(
        id: impl Into<SubjectId>,
        name: impl Into<String>,
        category: impl Into<String>,
        term: impl Into<Term>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            term: term.into(),
            prerequisites: Vec::new(),
        }
    }

    /// Set the prerequisites, dropping repeated ids but keeping first-seen order.
    pub fn with_prerequisites<I, T>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<SubjectId>,
    {
        self.prerequisites.clear();
        for id in prerequisites {
            let id = id.into();
            if !self.prerequisites.contains(&id) {
                self.prerequisites.push(id);
            }
        }
        self
    }

    /// Whether this subject has no prerequisites.
    pub fn is_entry_point(&self) -> bool {
        self.prerequisites.is_empty()
    }

    /// Whether `id` is a direct prerequisite.
    pub fn requires(&self, id: &SubjectId) -> bool {
        self.prerequisites.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerequisites_are_deduplicated_in_order() {
        let subject = Subject::new("algo1", "Algorithms 1", "programming", 3)
            .with_prerequisites(["prog2", "fundcomp", "prog2"]);
        assert_eq!(
            subject.prerequisites,
            vec![SubjectId::from("prog2"), SubjectId::from("fundcomp")]
        );
        assert!(subject.requires(&"fundcomp".into()));
        assert!(!subject.is_entry_point());
    }

    #[test]
    fn test_missing_prerequisites_field_defaults_to_empty() {
        let subject: Subject = serde_json::from_str(
            r#"{"id":"calc","name":"Calculus","category":"math","term":1}"#,
        )
        .unwrap();
        assert!(subject.is_entry_point());
        assert_eq!(subject.term.as_str(), "1");
    }
}
