//! Lock analysis.
//!
//! This module explains the locked part of a partition:
//! - which prerequisites each locked subject is still missing
//! - which subjects a single completion would unlock
//! - how many locked subjects are one completion away

use pensum_core::{CompletionSet, Subject, SubjectId, Term};
use serde::Serialize;

use crate::resolver::{resolve, unmet_prerequisites};

/// Why one subject is locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockExplanation {
    /// The locked subject
    pub subject: SubjectId,
    /// Its term, for ordering
    pub term: Term,
    /// Prerequisites not yet completed, in declaration order
    pub missing: Vec<SubjectId>,
}

/// Lock statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LockStats {
    /// Locked subjects
    pub locked: usize,
    /// Locked subjects missing exactly one prerequisite
    pub one_step_away: usize,
}

/// Result of lock analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LockAnalysis {
    /// One entry per locked subject, by term then declaration order
    pub explanations: Vec<LockExplanation>,
    /// Lock statistics
    pub stats: LockStats,
}

/// Explain every locked subject.
pub fn explain_locks(subjects: &[Subject], completed: &CompletionSet) -> LockAnalysis {
    let partition = resolve(subjects, completed);

    let mut explanations: Vec<LockExplanation> = subjects
        .iter()
        .filter(|s| partition.locked.contains(&s.id))
        .map(|s| LockExplanation {
            subject: s.id.clone(),
            term: s.term.clone(),
            missing: unmet_prerequisites(s, &partition).into_iter().cloned().collect(),
        })
        .collect();
    // stable: declaration order survives within a term
    explanations.sort_by(|a, b| a.term.cmp(&b.term));

    let stats = LockStats {
        locked: explanations.len(),
        one_step_away: explanations.iter().filter(|e| e.missing.len() == 1).count(),
    };

    LockAnalysis { explanations, stats }
}

/// Subjects that would go from locked to eligible if `candidate` were completed.
///
/// Empty when `candidate` is already completed or names no subject.
pub fn unlocked_by(
    subjects: &[Subject],
    completed: &CompletionSet,
    candidate: &SubjectId,
) -> Vec<SubjectId> {
    if completed.contains(candidate) || !subjects.iter().any(|s| &s.id == candidate) {
        return Vec::new();
    }

    let before = resolve(subjects, completed);
    let mut with_candidate = completed.clone();
    with_candidate.mark(candidate.clone());
    let after = resolve(subjects, &with_candidate);

    subjects
        .iter()
        .map(|s| &s.id)
        .filter(|id| before.locked.contains(*id) && after.eligible.contains(*id))
        .cloned()
        .collect()
}
