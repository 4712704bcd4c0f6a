//! Template store abstraction.

use async_trait::async_trait;
use pensum_core::{CompletionSet, Template, TemplateId, UserId};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Id cannot be used as a storage key
    #[error("Invalid id: {0:?}")]
    InvalidId(String),
}

/// Durable key-value storage for templates and their completion sets.
///
/// Completion sets are keyed by template id but stored apart from the
/// template, so clearing one never rewrites the other. Deleting a template
/// does not touch its completion set; callers discard both.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    // === Template operations ===

    /// Save a template (create or update).
    async fn save_template(&mut self, template: &Template) -> Result<()>;

    /// Load a template by ID, failing with [`StorageError::NotFound`].
    async fn load_template(&self, id: &TemplateId) -> Result<Template>;

    /// List all templates.
    async fn list_templates(&self) -> Result<Vec<Template>>;

    /// Delete a template. Deleting a missing template is not an error.
    async fn delete_template(&mut self, id: &TemplateId) -> Result<()>;

    /// List the templates owned by `owner`, oldest first.
    async fn list_templates_for(&self, owner: &UserId) -> Result<Vec<Template>> {
        let mut templates: Vec<Template> = self
            .list_templates()
            .await?
            .into_iter()
            .filter(|t| &t.owner == owner)
            .collect();
        templates.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(templates)
    }

    // === Completion state ===

    /// Load the completion set of a template; empty when none was saved.
    async fn load_completion_set(&self, id: &TemplateId) -> Result<CompletionSet>;

    /// Replace the completion set of a template.
    async fn save_completion_set(&mut self, id: &TemplateId, set: &CompletionSet) -> Result<()>;

    /// Discard the completion set of a template.
    async fn clear_completion_set(&mut self, id: &TemplateId) -> Result<()>;
}
