//! In-memory storage, for tests and throwaway sessions.

use std::collections::HashMap;
use pensum_core::{CompletionSet, Template, TemplateId};
use super::{Result, StorageError, TemplateStore};

/// `HashMap`-backed store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    templates: HashMap<TemplateId, Template>,
    completions: HashMap<TemplateId, CompletionSet>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TemplateStore for MemoryStorage {
    async fn save_template(&mut self, template: &Template) -> Result<()> {
        self.templates.insert(template.id.clone(), template.clone());
        Ok(())
    }

    async fn load_template(&self, id: &TemplateId) -> Result<Template> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("template {}", id)))
    }

    async fn list_templates(&self) -> Result<Vec<Template>> {
        Ok(self.templates.values().cloned().collect())
    }

    async fn delete_template(&mut self, id: &TemplateId) -> Result<()> {
        self.templates.remove(id);
        Ok(())
    }

    async fn load_completion_set(&self, id: &TemplateId) -> Result<CompletionSet> {
        Ok(self.completions.get(id).cloned().unwrap_or_default())
    }

    async fn save_completion_set(&mut self, id: &TemplateId, set: &CompletionSet) -> Result<()> {
        self.completions.insert(id.clone(), set.clone());
        Ok(())
    }

    async fn clear_completion_set(&mut self, id: &TemplateId) -> Result<()> {
        self.completions.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pensum_core::{TemplateMetadata, UserId};

    #[tokio::test]
    async fn test_in_memory_storage() {
        let mut storage = MemoryStorage::new();
        let template = Template::new("user-1", TemplateMetadata::default());

        storage.save_template(&template).await.unwrap();
        let loaded = storage.load_template(&template.id).await.unwrap();
        assert_eq!(loaded.id, template.id);

        let owned = storage.list_templates_for(&UserId::from("user-1")).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert!(storage
            .list_templates_for(&UserId::from("someone-else"))
            .await
            .unwrap()
            .is_empty());

        storage.delete_template(&template.id).await.unwrap();
        assert!(matches!(
            storage.load_template(&template.id).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_completion_sets_are_per_template() {
        let mut storage = MemoryStorage::new();
        let a = TemplateId::from("a");
        let b = TemplateId::from("b");

        let set: CompletionSet = ["x"].into_iter().collect();
        storage.save_completion_set(&a, &set).await.unwrap();

        assert_eq!(storage.load_completion_set(&a).await.unwrap(), set);
        assert!(storage.load_completion_set(&b).await.unwrap().is_empty());

        storage.clear_completion_set(&a).await.unwrap();
        assert!(storage.load_completion_set(&a).await.unwrap().is_empty());
    }
}
