//! Progress tracking for pensum.
//!
//! Unlock resolution, progress statistics, lock analysis, and the async
//! tracker that applies user intents against a template store.

#![warn(missing_docs)]

pub mod resolver;
pub mod aggregator;
pub mod lock;
pub mod tracker;

pub use resolver::{resolve, unmet_prerequisites, Partition, SubjectStatus};
pub use aggregator::{
    aggregate, aggregate_with, best_category, category_stats, next_milestone, percentage,
    term_stats, CategoryStats, GroupStats, Milestone, OverallStats, ProgressConfig,
    ProgressReport, TermStats,
};
pub use lock::{explain_locks, unlocked_by, LockAnalysis, LockExplanation, LockStats};
pub use tracker::{CurriculumTracker, CurriculumView, Result, TrackerConfig, TrackerError};
