//! Template model - a user's curriculum definition.

use serde::{Deserialize, Serialize};
use crate::id::{SubjectId, TemplateId, UserId};
use crate::subject::{Subject, DEFAULT_CATEGORY};
use crate::term::{Term, TermError};
use crate::validate::ModelError;
use crate::Time;

/// Descriptive metadata of a curriculum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    /// Institution offering the program
    pub institution: String,

    /// Program (degree) name
    pub program: String,

    /// Country or region
    pub region: String,

    /// Number of ordinary terms
    pub term_count: u32,

    /// Intermediate terms, e.g. `5.5`
    #[serde(default)]
    pub intermediate_terms: Vec<Term>,

    /// Display palette selector
    pub palette: String,
}

impl TemplateMetadata {
    /// Parse a comma-separated term list, skipping blank entries.
    pub fn parse_term_list(list: &str) -> Result<Vec<Term>, TermError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Term::parse)
            .collect()
    }
}

impl Default for TemplateMetadata {
    fn default() -> Self {
        Self {
            institution: String::new(),
            program: String::new(),
            region: String::new(),
            term_count: 8,
            intermediate_terms: Vec::new(),
            palette: "default".to_string(),
        }
    }
}

/// A curriculum template: the subject graph owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Unique identifier
    pub id: TemplateId,

    /// Owning user
    pub owner: UserId,

    /// Descriptive metadata
    pub metadata: TemplateMetadata,

    /// Categories in order of first appearance
    #[serde(default)]
    pub categories: Vec<String>,

    /// The subject graph
    #[serde(default)]
    pub subjects: Vec<Subject>,

    /// When created
    pub created_at: Time,

    /// Last updated
    pub updated_at: Time,
}

impl Template {
    /// Create an empty template.
    pub fn new(owner: impl Into<UserId>, metadata: TemplateMetadata) -> Self {
        let now = chrono::Utc::now();
        Self {
            id: TemplateId::generate(),
            owner: owner.into(),
            metadata,
            categories: Vec::new(),
            subjects: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Look up a subject by id.
    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| &s.id == id)
    }

    /// Whether the template contains `id`.
    pub fn contains(&self, id: &SubjectId) -> bool {
        self.subject(id).is_some()
    }

    /// Add a subject.
    ///
    /// The id must be new and every prerequisite must already exist, so a
    /// valid template stays valid. A blank category becomes
    /// [`DEFAULT_CATEGORY`]; unseen categories are appended to
    /// [`Template::categories`].
    pub fn add_subject(&mut self, mut subject: Subject) -> Result<(), ModelError> {
        if self.contains(&subject.id) {
            return Err(ModelError::DuplicateId(subject.id));
        }
        if let Some(missing) = subject.prerequisites.iter().find(|p| !self.contains(p)) {
            return Err(ModelError::DanglingReference {
                subject: subject.id.clone(),
                missing: missing.clone(),
            });
        }

        let category = subject.category.trim();
        subject.category = if category.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            category.to_string()
        };
        self.register_category(&subject.category);
        self.subjects.push(subject);
        self.touch();
        Ok(())
    }

    /// Remove a subject and every prerequisite edge pointing at it.
    ///
    /// Categories are append-only and keep their entry even when the last
    /// subject of a category is removed.
    pub fn remove_subject(&mut self, id: &SubjectId) -> Result<Subject, ModelError> {
        let index = self
            .subjects
            .iter()
            .position(|s| &s.id == id)
            .ok_or_else(|| ModelError::UnknownSubject(id.clone()))?;
        let removed = self.subjects.remove(index);
        for subject in &mut self.subjects {
            subject.prerequisites.retain(|p| p != id);
        }
        self.touch();
        Ok(removed)
    }

    /// Ordinary terms `1..=term_count` plus intermediate terms, sorted.
    pub fn available_terms(&self) -> Vec<Term> {
        let mut terms: Vec<Term> = (1..=self.metadata.term_count).map(Term::ordinal).collect();
        terms.extend(self.metadata.intermediate_terms.iter().cloned());
        terms.sort();
        terms.dedup();
        terms
    }

    /// Subjects that list `id` as a direct prerequisite.
    pub fn dependents_of(&self, id: &SubjectId) -> Vec<&Subject> {
        self.subjects.iter().filter(|s| s.requires(id)).collect()
    }

    /// Refresh the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }

    fn register_category(&mut self, category: &str) {
        if !self.categories.iter().any(|c| c == category) {
            self.categories.push(category.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template() -> Template {
        Template::new("user-1", TemplateMetadata::default())
    }

    #[test]
    fn test_categories_append_once_in_first_seen_order() {
        let mut t = template();
        t.add_subject(Subject::new("a", "A", "math", 1)).unwrap();
        t.add_subject(Subject::new("b", "B", "programming", 1)).unwrap();
        t.add_subject(Subject::new("c", "C", "math", 2)).unwrap();
        assert_eq!(t.categories, vec!["math", "programming"]);
    }

    #[test]
    fn test_blank_category_becomes_general() {
        let mut t = template();
        t.add_subject(Subject::new("a", "A", "  ", 1)).unwrap();
        assert_eq!(t.subjects[0].category, DEFAULT_CATEGORY);
        assert_eq!(t.categories, vec![DEFAULT_CATEGORY]);
    }

    #[test]
    fn test_add_rejects_duplicate_and_dangling() {
        let mut t = template();
        t.add_subject(Subject::new("a", "A", "math", 1)).unwrap();

        let err = t.add_subject(Subject::new("a", "Again", "math", 1)).unwrap_err();
        assert_eq!(err, ModelError::DuplicateId("a".into()));

        let err = t
            .add_subject(Subject::new("b", "B", "math", 2).with_prerequisites(["zzz"]))
            .unwrap_err();
        assert!(matches!(err, ModelError::DanglingReference { .. }));
        assert_eq!(t.subjects.len(), 1);
    }

    #[test]
    fn test_remove_strips_prerequisite_edges() {
        let mut t = template();
        t.add_subject(Subject::new("a", "A", "math", 1)).unwrap();
        t.add_subject(Subject::new("b", "B", "math", 2).with_prerequisites(["a"]))
            .unwrap();
        t.add_subject(Subject::new("c", "C", "math", 3).with_prerequisites(["a", "b"]))
            .unwrap();

        let dependents: Vec<_> = t.dependents_of(&"a".into()).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(dependents, vec!["b", "c"]);

        let removed = t.remove_subject(&"a".into()).unwrap();
        assert_eq!(removed.id.as_str(), "a");
        assert!(t.subjects[0].prerequisites.is_empty());
        assert_eq!(t.subjects[1].prerequisites, vec![SubjectId::from("b")]);
        assert!(t.dependents_of(&"a".into()).is_empty());
        assert_eq!(t.categories, vec!["math"]);
        assert!(crate::validate(&t).is_ok());

        let err = t.remove_subject(&"a".into()).unwrap_err();
        assert_eq!(err, ModelError::UnknownSubject("a".into()));
    }

    #[test]
    fn test_available_terms_sorted_numerically() {
        let mut t = template();
        t.metadata.term_count = 10;
        t.metadata.intermediate_terms = TemplateMetadata::parse_term_list("7.5, ,5.5").unwrap();
        let terms: Vec<_> = t.available_terms().iter().map(|t| t.to_string()).collect();
        assert_eq!(
            terms,
            vec!["1", "2", "3", "4", "5", "5.5", "6", "7", "7.5", "8", "9", "10"]
        );
    }

    #[test]
    fn test_parse_term_list_rejects_bad_entries() {
        assert!(TemplateMetadata::parse_term_list("5.5, soon").is_err());
        assert!(TemplateMetadata::parse_term_list("").unwrap().is_empty());
    }
}
