//! Progress statistics derived from `(subjects, completed)`.
//!
//! Everything here is pure. Group orders are deterministic: categories follow
//! first appearance among subjects, terms follow numeric value.

use pensum_core::{CompletionSet, Subject, Term, DEFAULT_CATEGORY};
use serde::Serialize;
use std::collections::HashMap;

/// Aggregation settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressConfig {
    /// Share of subjects the next milestone asks for (0.0..=1.0)
    pub milestone_ratio: f64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            milestone_ratio: 0.5,
        }
    }
}

/// Completion counts for one group of subjects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    /// Subjects in the group
    pub total: usize,
    /// Completed subjects in the group
    pub completed: usize,
    /// `round(completed / total * 100)`, 0 for an empty group
    pub percentage: u8,
}

impl GroupStats {
    fn record(&mut self, done: bool) {
        self.total += 1;
        if done {
            self.completed += 1;
        }
        self.percentage = percentage(self.completed, self.total);
    }
}

/// Stats for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    /// Category tag
    pub category: String,
    /// Counts
    #[serde(flatten)]
    pub stats: GroupStats,
}

/// Stats for one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermStats {
    /// Term, grouped by its exact representation
    pub term: Term,
    /// Counts
    #[serde(flatten)]
    pub stats: GroupStats,
}

/// Whole-curriculum counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OverallStats {
    /// Subjects in the template
    pub total_subjects: usize,
    /// Completed subjects of the template
    pub total_completed: usize,
    /// Overall percentage, 0 with no subjects
    pub overall_percentage: u8,
}

/// Distance to the next completion milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "remaining", rename_all = "snake_case")]
pub enum Milestone {
    /// This many more completions are needed
    Remaining(usize),
    /// The threshold is already met
    Reached,
    /// The template has no subjects
    NoSubjects,
}

/// Display-ready statistics for a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressReport {
    /// Per category, in order of first appearance
    pub by_category: Vec<CategoryStats>,
    /// Per term, sorted by numeric value
    pub by_term: Vec<TermStats>,
    /// Totals
    pub overall: OverallStats,
    /// Highest percentage; ties go to the earlier category
    pub best_category: Option<CategoryStats>,
    /// Completions needed for the milestone
    pub next_milestone: Milestone,
}

/// `round(done / total * 100)`; 0 when `total` is 0.
pub fn percentage(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (done as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Aggregate with the default configuration.
pub fn aggregate(subjects: &[Subject], completed: &CompletionSet) -> ProgressReport {
    aggregate_with(subjects, completed, &ProgressConfig::default())
}

/// Aggregate statistics for `subjects`.
///
/// Only completion ids that name one of `subjects` are counted.
pub fn aggregate_with(
    subjects: &[Subject],
    completed: &CompletionSet,
    config: &ProgressConfig,
) -> ProgressReport {
    let by_category = category_stats(subjects, completed);
    let by_term = term_stats(subjects, completed);

    let total_subjects = subjects.len();
    let total_completed = subjects.iter().filter(|s| completed.contains(&s.id)).count();
    let overall = OverallStats {
        total_subjects,
        total_completed,
        overall_percentage: percentage(total_completed, total_subjects),
    };

    ProgressReport {
        best_category: best_category(&by_category).cloned(),
        next_milestone: next_milestone(total_subjects, total_completed, config.milestone_ratio),
        by_category,
        by_term,
        overall,
    }
}

/// Per-category stats in order of first appearance.
///
/// Subjects with a blank category count under [`DEFAULT_CATEGORY`].
pub fn category_stats(subjects: &[Subject], completed: &CompletionSet) -> Vec<CategoryStats> {
    let mut stats: Vec<CategoryStats> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for subject in subjects {
        let category = match subject.category.trim() {
            "" => DEFAULT_CATEGORY,
            tag => tag,
        };
        let slot = *index.entry(category).or_insert_with(|| {
            stats.push(CategoryStats {
                category: category.to_string(),
                stats: GroupStats::default(),
            });
            stats.len() - 1
        });
        stats[slot].stats.record(completed.contains(&subject.id));
    }
    stats
}

/// Per-term stats keyed by exact representation, sorted numerically.
pub fn term_stats(subjects: &[Subject], completed: &CompletionSet) -> Vec<TermStats> {
    let mut groups: HashMap<&str, TermStats> = HashMap::new();

    for subject in subjects {
        groups
            .entry(subject.term.as_str())
            .or_insert_with(|| TermStats {
                term: subject.term.clone(),
                stats: GroupStats::default(),
            })
            .stats
            .record(completed.contains(&subject.id));
    }

    let mut stats: Vec<TermStats> = groups.into_values().collect();
    stats.sort_by(|a, b| a.term.cmp(&b.term));
    stats
}

/// Category with the highest percentage; the first one wins ties.
pub fn best_category(stats: &[CategoryStats]) -> Option<&CategoryStats> {
    stats.iter().fold(None, |best: Option<&CategoryStats>, current| match best {
        Some(b) if b.stats.percentage >= current.stats.percentage => Some(b),
        _ => Some(current),
    })
}

/// `ceil(total * ratio) - completed`, or why nothing is left to do.
pub fn next_milestone(total: usize, completed: usize, ratio: f64) -> Milestone {
    if total == 0 {
        return Milestone::NoSubjects;
    }
    let target = (total as f64 * ratio.clamp(0.0, 1.0)).ceil() as usize;
    if target > completed {
        Milestone::Remaining(target - completed)
    } else {
        Milestone::Reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str, category: &str, term: &str) -> Subject {
        Subject::new(id, id, category, Term::parse(term).unwrap())
    }

    fn done(list: &[&str]) -> CompletionSet {
        list.iter().copied().collect()
    }

    /// 10 subjects, 4 of them math; 3 completed, 2 of those math.
    fn ten_subjects() -> Vec<Subject> {
        vec![
            subject("m1", "math", "1"),
            subject("m2", "math", "1"),
            subject("m3", "math", "2"),
            subject("m4", "math", "3"),
            subject("p1", "programming", "1"),
            subject("p2", "programming", "2"),
            subject("p3", "programming", "2"),
            subject("s1", "systems", "3"),
            subject("s2", "systems", "5.5"),
            subject("s3", "systems", "10"),
        ]
    }

    #[test]
    fn test_math_scenario() {
        let report = aggregate(&ten_subjects(), &done(&["m1", "m2", "p1"]));

        let math = report.by_category.iter().find(|c| c.category == "math").unwrap();
        assert_eq!(math.stats, GroupStats { total: 4, completed: 2, percentage: 50 });

        assert_eq!(report.overall.total_subjects, 10);
        assert_eq!(report.overall.total_completed, 3);
        assert_eq!(report.overall.overall_percentage, 30);
        assert_eq!(report.next_milestone, Milestone::Remaining(2));
    }

    #[test]
    fn test_category_order_is_first_appearance() {
        let report = aggregate(&ten_subjects(), &done(&[]));
        let order: Vec<_> = report.by_category.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(order, vec!["math", "programming", "systems"]);
    }

    #[test]
    fn test_terms_sorted_numerically_and_keyed_by_text() {
        let report = aggregate(&ten_subjects(), &done(&["s2"]));
        let order: Vec<_> = report.by_term.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(order, vec!["1", "2", "3", "5.5", "10"]);

        let mini = report.by_term.iter().find(|t| t.term.as_str() == "5.5").unwrap();
        assert_eq!(mini.stats, GroupStats { total: 1, completed: 1, percentage: 100 });

        let first = &report.by_term[0];
        assert_eq!(first.stats.total, 3);
    }

    #[test]
    fn test_equal_value_terms_stay_separate_groups() {
        let subjects = vec![subject("a", "x", "5"), subject("b", "x", "5.0")];
        let report = aggregate(&subjects, &done(&[]));
        assert_eq!(report.by_term.len(), 2);
        assert_eq!(report.by_term[0].term.as_str(), "5");
        assert_eq!(report.by_term[1].term.as_str(), "5.0");
    }

    #[test]
    fn test_best_category_tie_goes_to_first() {
        let subjects = vec![
            subject("a", "alpha", "1"),
            subject("b", "alpha", "1"),
            subject("c", "beta", "1"),
            subject("d", "beta", "1"),
            subject("e", "gamma", "1"),
        ];
        let report = aggregate(&subjects, &done(&["a", "c"]));
        assert_eq!(report.best_category.unwrap().category, "alpha");

        let report = aggregate(&subjects, &done(&["a", "c", "d"]));
        assert_eq!(report.best_category.unwrap().category, "beta");
    }

    #[test]
    fn test_blank_category_counts_as_general() {
        let subjects = vec![
            subject("a", "", "1"),
            subject("b", DEFAULT_CATEGORY, "1"),
            subject("c", "  ", "2"),
            subject("d", "math", "2"),
        ];
        let report = aggregate(&subjects, &done(&["a"]));
        assert_eq!(report.by_category.len(), 2);
        assert_eq!(report.by_category[0].category, DEFAULT_CATEGORY);
        assert_eq!(report.by_category[0].stats, GroupStats { total: 3, completed: 1, percentage: 33 });
    }

    #[test]
    fn test_empty_template() {
        let report = aggregate(&[], &done(&["ghost"]));
        assert_eq!(report.overall, OverallStats::default());
        assert!(report.by_category.is_empty());
        assert!(report.by_term.is_empty());
        assert!(report.best_category.is_none());
        assert_eq!(report.next_milestone, Milestone::NoSubjects);
    }

    #[test]
    fn test_stale_completions_not_counted() {
        let report = aggregate(&ten_subjects(), &done(&["m1", "deleted"]));
        assert_eq!(report.overall.total_completed, 1);
        assert_eq!(report.overall.overall_percentage, 10);
    }

    #[test]
    fn test_milestone_rounding_and_reached() {
        assert_eq!(next_milestone(7, 0, 0.5), Milestone::Remaining(4));
        assert_eq!(next_milestone(7, 4, 0.5), Milestone::Reached);
        assert_eq!(next_milestone(10, 9, 0.5), Milestone::Reached);
        assert_eq!(next_milestone(8, 0, 0.25), Milestone::Remaining(2));
        assert_eq!(next_milestone(0, 0, 0.5), Milestone::NoSubjects);
    }

    #[test]
    fn test_percentages_rounded_and_bounded() {
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 5), 100);

        for total in 1..=12 {
            for done in 0..=total {
                assert!(percentage(done, total) <= 100);
            }
        }
    }

    #[test]
    fn test_custom_milestone_ratio() {
        let config = ProgressConfig { milestone_ratio: 0.75 };
        let report = aggregate_with(&ten_subjects(), &done(&["m1"]), &config);
        assert_eq!(report.next_milestone, Milestone::Remaining(7));
    }

    #[test]
    fn test_report_serializes_flat_group_stats() {
        let report = aggregate(&ten_subjects(), &done(&["m1"]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["by_category"][0]["category"], "math");
        assert_eq!(json["by_category"][0]["total"], 4);
        assert_eq!(json["by_term"][3]["term"], "5.5");
        assert_eq!(json["next_milestone"]["status"], "remaining");
        assert_eq!(json["next_milestone"]["remaining"], 4);
    }
}
