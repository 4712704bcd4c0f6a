//! Curriculum tracking service.

use chrono::Utc;
use pensum_core::{
    default_template, validate, CompletionSet, ModelError, Subject, SubjectId, Template,
    TemplateId, TemplateMetadata, Time, UserId,
};
use pensum_storage::{StorageError, TemplateStore};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregator::{aggregate_with, ProgressConfig, ProgressReport};
use crate::lock::{explain_locks, LockAnalysis};
use crate::resolver::{resolve, Partition};

/// Errors raised by the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// The template graph or an edit is invalid
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The store failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Tracker result type.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Configuration for the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Aggregation settings
    pub progress: ProgressConfig,
    /// Drop completion ids naming no subject before building a view
    pub prune_stale_completions: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            progress: ProgressConfig::default(),
            prune_stale_completions: true,
        }
    }
}

/// Everything a client needs to render one template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurriculumView {
    /// The validated template
    pub template: Template,
    /// Its completion set
    pub completed: CompletionSet,
    /// Completed / eligible / locked
    pub partition: Partition,
    /// Progress statistics
    pub report: ProgressReport,
    /// When the view was computed
    pub generated_at: Time,
}

/// Applies user intents against a [`TemplateStore`].
///
/// Every read validates the template before anything is resolved, so a
/// corrupted or hand-edited file surfaces as [`TrackerError::Model`].
pub struct CurriculumTracker<S: TemplateStore> {
    storage: S,
    config: TrackerConfig,
}

impl<S: TemplateStore> CurriculumTracker<S> {
    /// Create a new tracker.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            config: TrackerConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    /// The underlying store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give the store back.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Create and persist an empty template.
    pub async fn create_template(
        &mut self,
        owner: impl Into<UserId>,
        metadata: TemplateMetadata,
    ) -> Result<Template> {
        let template = Template::new(owner, metadata);
        self.storage.save_template(&template).await?;
        info!(template = %template.id, owner = %template.owner, "Created template");
        Ok(template)
    }

    /// Create and persist a template seeded with the default curriculum.
    pub async fn create_default_template(&mut self, owner: impl Into<UserId>) -> Result<Template> {
        let template = default_template(owner);
        validate(&template)?;
        self.storage.save_template(&template).await?;
        info!(
            template = %template.id,
            owner = %template.owner,
            subjects = template.subjects.len(),
            "Created default template"
        );
        Ok(template)
    }

    /// Load and validate a template.
    pub async fn template(&self, id: &TemplateId) -> Result<Template> {
        let template = self.storage.load_template(id).await?;
        if let Err(err) = validate(&template) {
            debug!(template = %id, error = %err, "Template failed validation");
            return Err(err.into());
        }
        Ok(template)
    }

    /// Templates owned by `owner`, oldest first.
    pub async fn templates_for(&self, owner: &UserId) -> Result<Vec<Template>> {
        Ok(self.storage.list_templates_for(owner).await?)
    }

    /// Add a subject to a template.
    pub async fn add_subject(&mut self, id: &TemplateId, subject: Subject) -> Result<Template> {
        let mut template = self.template(id).await?;
        let subject_id = subject.id.clone();
        template.add_subject(subject)?;
        self.storage.save_template(&template).await?;
        info!(template = %id, subject = %subject_id, "Added subject");
        Ok(template)
    }

    /// Remove a subject, its incoming edges and its completion mark.
    pub async fn remove_subject(&mut self, id: &TemplateId, subject: &SubjectId) -> Result<Subject> {
        let mut template = self.template(id).await?;
        let removed = template.remove_subject(subject)?;
        self.storage.save_template(&template).await?;

        let mut completed = self.storage.load_completion_set(id).await?;
        if completed.unmark(subject) {
            self.storage.save_completion_set(id, &completed).await?;
        }
        info!(template = %id, subject = %subject, "Removed subject");
        Ok(removed)
    }

    /// Delete a template and its completion set.
    pub async fn delete_template(&mut self, id: &TemplateId) -> Result<()> {
        // surfaces NotFound before anything is deleted
        self.storage.load_template(id).await?;
        self.storage.delete_template(id).await?;
        self.storage.clear_completion_set(id).await?;
        info!(template = %id, "Deleted template");
        Ok(())
    }

    /// Flip the completion mark of a subject; returns whether it is now completed.
    pub async fn toggle_completion(&mut self, id: &TemplateId, subject: &SubjectId) -> Result<bool> {
        let states = self
            .toggle_completions(id, std::slice::from_ref(subject))
            .await?;
        Ok(states.first().copied().unwrap_or_default())
    }

    /// Flip several completion marks in order, saving once.
    ///
    /// Every id is checked first; one unknown id leaves the stored set
    /// untouched. Returns the new state of each toggle.
    pub async fn toggle_completions(
        &mut self,
        id: &TemplateId,
        subjects: &[SubjectId],
    ) -> Result<Vec<bool>> {
        let template = self.template(id).await?;
        if let Some(unknown) = subjects.iter().find(|s| !template.contains(s)) {
            return Err(ModelError::UnknownSubject(unknown.clone()).into());
        }

        let mut completed = self.storage.load_completion_set(id).await?;
        let states: Vec<bool> = subjects.iter().map(|s| completed.toggle(s)).collect();
        self.storage.save_completion_set(id, &completed).await?;
        for (subject, now_completed) in subjects.iter().zip(&states) {
            info!(template = %id, subject = %subject, completed = *now_completed, "Toggled completion");
        }
        Ok(states)
    }

    /// Forget every completion of a template.
    pub async fn clear_completions(&mut self, id: &TemplateId) -> Result<()> {
        self.template(id).await?;
        self.storage.clear_completion_set(id).await?;
        info!(template = %id, "Cleared completions");
        Ok(())
    }

    /// Resolve and aggregate a template.
    pub async fn view(&self, id: &TemplateId) -> Result<CurriculumView> {
        let template = self.template(id).await?;
        let mut completed = self.storage.load_completion_set(id).await?;

        if self.config.prune_stale_completions {
            let dropped = completed.retain_known(&template.subjects);
            if dropped > 0 {
                warn!(template = %id, dropped, "Ignoring stale completion ids");
            }
        }

        let partition = resolve(&template.subjects, &completed);
        let report = aggregate_with(&template.subjects, &completed, &self.config.progress);
        debug!(
            template = %id,
            completed = partition.completed.len(),
            eligible = partition.eligible.len(),
            locked = partition.locked.len(),
            "Resolved template"
        );

        Ok(CurriculumView {
            template,
            completed,
            partition,
            report,
            generated_at: Utc::now(),
        })
    }

    /// Explain every locked subject of a template.
    pub async fn locks(&self, id: &TemplateId) -> Result<LockAnalysis> {
        let template = self.template(id).await?;
        let completed = self.storage.load_completion_set(id).await?;
        Ok(explain_locks(&template.subjects, &completed))
    }
}
