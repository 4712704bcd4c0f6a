//! pensum core data models.
//!
//! This crate defines the curriculum graph (subjects, templates, terms), the
//! completion state tracked per template, and the structural validation that
//! must pass before eligibility is resolved.

#![warn(missing_docs)]

// Core identities
mod id;

// Curriculum graph
mod term;
mod subject;
mod template;
mod validate;

// Per-template state
mod completion;

// Seed data
mod defaults;

// Re-exports
pub use id::*;

pub use term::{Term, TermError};
pub use subject::{Subject, DEFAULT_CATEGORY};
pub use template::{Template, TemplateMetadata};
pub use validate::{validate, validate_subjects, violations, ModelError};
pub use completion::CompletionSet;
pub use defaults::default_template;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
