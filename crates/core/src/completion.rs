//! Completion state - the subjects a user has marked done.
//!
//! Stored independently of the template so clearing it never touches the
//! subject graph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::id::SubjectId;
use crate::subject::Subject;

/// Set of completed subject ids for one template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionSet(BTreeSet<SubjectId>);

impl CompletionSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is marked complete.
    pub fn contains(&self, id: &SubjectId) -> bool {
        self.0.contains(id)
    }

    /// Mark `id` complete. Returns `false` if it already was.
    pub fn mark(&mut self, id: SubjectId) -> bool {
        self.0.insert(id)
    }

    /// Unmark `id`. Returns `false` if it was not marked.
    pub fn unmark(&mut self, id: &SubjectId) -> bool {
        self.0.remove(id)
    }

    /// Flip `id` and return its new state (`true` = completed).
    pub fn toggle(&mut self, id: &SubjectId) -> bool {
        if self.0.remove(id) {
            false
        } else {
            self.0.insert(id.clone());
            true
        }
    }

    /// Remove every id.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Number of marked ids.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate ids in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &SubjectId> {
        self.0.iter()
    }

    /// Whether every id of `self` is also in `other`.
    pub fn is_subset(&self, other: &CompletionSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Drop ids that name none of `subjects`. Returns how many were dropped.
    pub fn retain_known(&mut self, subjects: &[Subject]) -> usize {
        let before = self.0.len();
        self.0.retain(|id| subjects.iter().any(|s| &s.id == id));
        before - self.0.len()
    }
}

impl<T: Into<SubjectId>> FromIterator<T> for CompletionSet {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a CompletionSet {
    type Item = &'a SubjectId;
    type IntoIter = std::collections::btree_set::Iter<'a, SubjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
