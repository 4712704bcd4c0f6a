//! Unlock resolution: which subjects are completed, eligible or locked.
//!
//! Resolution is a pure function of the subject list and the completion set.
//! There is no incremental mode; every toggle recomputes the whole partition,
//! which is cheap at curriculum scale (tens to low hundreds of subjects).

use pensum_core::{CompletionSet, Subject, SubjectId};
use serde::Serialize;
use std::collections::BTreeSet;

/// Where a subject stands for a given completion set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectStatus {
    /// Marked complete by the user
    Completed,
    /// Not completed, every prerequisite completed
    Eligible,
    /// Not completed, at least one prerequisite unmet
    Locked,
}

/// Every subject of a template in exactly one of three sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Partition {
    /// Subjects in the completion set
    pub completed: BTreeSet<SubjectId>,
    /// Subjects ready to be taken
    pub eligible: BTreeSet<SubjectId>,
    /// Subjects waiting on prerequisites
    pub locked: BTreeSet<SubjectId>,
}

impl Partition {
    /// Status of `id`, or `None` if it is not a subject of the template.
    pub fn status_of(&self, id: &SubjectId) -> Option<SubjectStatus> {
        if self.completed.contains(id) {
            Some(SubjectStatus::Completed)
        } else if self.eligible.contains(id) {
            Some(SubjectStatus::Eligible)
        } else if self.locked.contains(id) {
            Some(SubjectStatus::Locked)
        } else {
            None
        }
    }

    /// Number of subjects across the three sets.
    pub fn len(&self) -> usize {
        self.completed.len() + self.eligible.len() + self.locked.len()
    }

    /// Whether the partition covers no subject.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Completed or eligible subjects, i.e. everything not locked.
    pub fn reachable(&self) -> BTreeSet<SubjectId> {
        self.completed.union(&self.eligible).cloned().collect()
    }
}

/// Partition `subjects` given the ids in `completed`.
///
/// A completed subject stays completed even when its prerequisites are not
/// (completion is never revoked). Completion ids naming no subject are
/// ignored, both as completions and as satisfied prerequisites, so a
/// prerequisite that names no subject keeps its dependent locked.
///
/// Entry points (no prerequisites) are eligible immediately. The rest are
/// scanned repeatedly until a pass makes no new subject eligible. Eligibility
/// only reads the completed subjects, which are fixed for the call, so the
/// scan settles after one confirming pass; worst case is O(V·E).
pub fn resolve(subjects: &[Subject], completed: &CompletionSet) -> Partition {
    let mut done: BTreeSet<SubjectId> = BTreeSet::new();
    let mut eligible: BTreeSet<SubjectId> = BTreeSet::new();
    let mut pending: Vec<&Subject> = Vec::new();

    for subject in subjects {
        if completed.contains(&subject.id) {
            done.insert(subject.id.clone());
        } else if subject.is_entry_point() {
            eligible.insert(subject.id.clone());
        } else {
            pending.push(subject);
        }
    }

    loop {
        let before = pending.len();
        pending.retain(|subject| {
            let satisfied = subject.prerequisites.iter().all(|p| done.contains(p));
            if satisfied {
                eligible.insert(subject.id.clone());
            }
            !satisfied
        });
        if pending.len() == before {
            break;
        }
    }

    Partition {
        completed: done,
        eligible,
        locked: pending.into_iter().map(|s| s.id.clone()).collect(),
    }
}

/// Prerequisites of `subject` not completed in `partition`, in declaration order.
///
/// A prerequisite naming no subject is always unmet.
pub fn unmet_prerequisites<'a>(subject: &'a Subject, partition: &Partition) -> Vec<&'a SubjectId> {
    subject
        .prerequisites
        .iter()
        .filter(|p| !partition.completed.contains(*p))
        .collect()
}
