//! Structural validation of curriculum graphs.
//!
//! Checks run in a fixed order: duplicate ids, then dangling prerequisite
//! references, then prerequisite cycles. Cycle detection only follows edges
//! to known subjects, so it is meaningful once references are valid.

use std::collections::{HashMap, HashSet};
use crate::id::SubjectId;
use crate::subject::Subject;
use crate::template::Template;

/// Errors raised by model validation and template editing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// The prerequisite graph contains a cycle
    #[error("prerequisite cycle: {}", join_path(.path))]
    Cycle {
        /// Subjects on the cycle, first id repeated at the end
        path: Vec<SubjectId>,
    },

    /// A prerequisite points at a subject that does not exist
    #[error("subject '{subject}' requires unknown subject '{missing}'")]
    DanglingReference {
        /// Subject declaring the prerequisite
        subject: SubjectId,
        /// The unknown prerequisite id
        missing: SubjectId,
    },

    /// Two subjects share an id
    #[error("duplicate subject id '{0}'")]
    DuplicateId(SubjectId),

    /// An operation named a subject the template does not contain
    #[error("unknown subject '{0}'")]
    UnknownSubject(SubjectId),
}

fn join_path(path: &[SubjectId]) -> String {
    path.iter()
        .map(SubjectId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Validate a template's subject graph.
pub fn validate(template: &Template) -> Result<(), ModelError> {
    validate_subjects(&template.subjects)
}

/// Validate a subject list, failing on the first violation.
pub fn validate_subjects(subjects: &[Subject]) -> Result<(), ModelError> {
    if let Some(id) = duplicate_ids(subjects).into_iter().next() {
        return Err(ModelError::DuplicateId(id));
    }
    if let Some(err) = dangling_references(subjects).into_iter().next() {
        return Err(err);
    }
    if let Some(path) = CycleFinder::new(subjects).find_all().into_iter().next() {
        return Err(ModelError::Cycle { path });
    }
    Ok(())
}

/// Collect every violation instead of stopping at the first.
pub fn violations(subjects: &[Subject]) -> Vec<ModelError> {
    let mut errors: Vec<ModelError> = duplicate_ids(subjects)
        .into_iter()
        .map(ModelError::DuplicateId)
        .collect();
    errors.extend(dangling_references(subjects));
    errors.extend(
        CycleFinder::new(subjects)
            .find_all()
            .into_iter()
            .map(|path| ModelError::Cycle { path }),
    );
    errors
}

/// Each repeated id once, in order of its second appearance.
fn duplicate_ids(subjects: &[Subject]) -> Vec<SubjectId> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut dups = Vec::new();
    for subject in subjects {
        if !seen.insert(&subject.id) && reported.insert(&subject.id) {
            dups.push(subject.id.clone());
        }
    }
    dups
}

fn dangling_references(subjects: &[Subject]) -> Vec<ModelError> {
    let known: HashSet<&SubjectId> = subjects.iter().map(|s| &s.id).collect();
    subjects
        .iter()
        .flat_map(|subject| {
            subject
                .prerequisites
                .iter()
                .filter(|p| !known.contains(p))
                .map(|missing| ModelError::DanglingReference {
                    subject: subject.id.clone(),
                    missing: missing.clone(),
                })
        })
        .collect()
}

/// Depth-first search for back edges in the prerequisite graph.
struct CycleFinder<'a> {
    order: Vec<&'a SubjectId>,
    graph: HashMap<&'a SubjectId, &'a Subject>,
    visited: HashSet<&'a SubjectId>,
    on_stack: HashSet<&'a SubjectId>,
    path: Vec<&'a SubjectId>,
    cycles: Vec<Vec<SubjectId>>,
}

impl<'a> CycleFinder<'a> {
    fn new(subjects: &'a [Subject]) -> Self {
        let mut graph = HashMap::new();
        let mut order = Vec::new();
        for subject in subjects {
            // First declaration wins when ids repeat.
            if !graph.contains_key(&subject.id) {
                graph.insert(&subject.id, subject);
                order.push(&subject.id);
            }
        }
        Self {
            order,
            graph,
            visited: HashSet::new(),
            on_stack: HashSet::new(),
            path: Vec::new(),
            cycles: Vec::new(),
        }
    }

    /// Every cycle reachable from any subject, in declaration order.
    fn find_all(mut self) -> Vec<Vec<SubjectId>> {
        let order = std::mem::take(&mut self.order);
        for id in order {
            if !self.visited.contains(id) {
                self.visit(id);
            }
        }
        self.cycles
    }

    fn visit(&mut self, node: &'a SubjectId) {
        self.visited.insert(node);
        self.on_stack.insert(node);
        self.path.push(node);

        if let Some(subject) = self.graph.get(node).copied() {
            for dep in &subject.prerequisites {
                if !self.graph.contains_key(dep) {
                    continue;
                }
                if self.on_stack.contains(dep) {
                    if let Some(start) = self.path.iter().position(|id| *id == dep) {
                        let mut cycle: Vec<SubjectId> =
                            self.path[start..].iter().map(|id| (*id).clone()).collect();
                        cycle.push(dep.clone());
                        self.cycles.push(cycle);
                    }
                } else if !self.visited.contains(dep) {
                    self.visit(dep);
                }
            }
        }

        self.path.pop();
        self.on_stack.remove(node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str, prereqs: &[&str]) -> Subject {
        Subject::new(id, id.to_uppercase(), "core", 1).with_prerequisites(prereqs.iter().copied())
    }

    #[test]
    fn test_valid_chain() {
        let subjects = vec![subject("a", &[]), subject("b", &["a"]), subject("c", &["a", "b"])];
        assert_eq!(validate_subjects(&subjects), Ok(()));
        assert!(violations(&subjects).is_empty());
    }

    #[test]
    fn test_empty_graph_is_valid() {
        assert_eq!(validate_subjects(&[]), Ok(()));
    }

    #[test]
    fn test_duplicate_id() {
        let subjects = vec![subject("a", &[]), subject("a", &[])];
        assert_eq!(
            validate_subjects(&subjects),
            Err(ModelError::DuplicateId("a".into()))
        );
    }

    #[test]
    fn test_dangling_reference() {
        let subjects = vec![subject("a", &[]), subject("b", &["ghost"])];
        assert_eq!(
            validate_subjects(&subjects),
            Err(ModelError::DanglingReference {
                subject: "b".into(),
                missing: "ghost".into(),
            })
        );
    }

    #[test]
    fn test_cycle_reports_path() {
        let subjects = vec![subject("a", &["c"]), subject("b", &["a"]), subject("c", &["b"])];
        let err = validate_subjects(&subjects).unwrap_err();
        match &err {
            ModelError::Cycle { path } => {
                let ids: Vec<_> = path.iter().map(SubjectId::as_str).collect();
                assert_eq!(ids, vec!["a", "c", "b", "a"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
        assert_eq!(err.to_string(), "prerequisite cycle: a -> c -> b -> a");
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let subjects = vec![subject("a", &["a"])];
        assert!(matches!(
            validate_subjects(&subjects),
            Err(ModelError::Cycle { .. })
        ));
    }

    #[test]
    fn test_duplicates_reported_before_dangling() {
        let subjects = vec![subject("a", &["zzz"]), subject("a", &[])];
        assert!(matches!(
            validate_subjects(&subjects),
            Err(ModelError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_violations_collects_everything() {
        let subjects = vec![
            subject("a", &[]),
            subject("a", &[]),
            subject("b", &["x", "y"]),
            subject("c", &["d"]),
            subject("d", &["c"]),
        ];
        let errors = violations(&subjects);
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], ModelError::DuplicateId("a".into()));
        assert!(matches!(errors[1], ModelError::DanglingReference { .. }));
        assert!(matches!(errors[2], ModelError::DanglingReference { .. }));
        assert!(matches!(errors[3], ModelError::Cycle { .. }));
    }
}
