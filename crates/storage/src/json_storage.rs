//! JSON file storage implementation.
//!
//! Stores each template as `templates/<id>.json` and its completion set as
//! `completions/<id>.json` under a root directory (`.pensum` by default),
//! and keeps a small per-template meta marker (version + updated_at) that
//! is bumped on every template save.

use std::path::{Path, PathBuf};
use pensum_core::{CompletionSet, Template, TemplateId};
use super::{Result, StorageError, TemplateStore};
use tokio::fs;
use tracing::debug;

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, creating the directories it needs under `root`.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(root.join("templates")).await?;
        fs::create_dir_all(root.join("completions")).await?;
        fs::create_dir_all(root.join("meta").join("templates")).await?;

        debug!(root = %root.display(), "opened JSON storage");
        Ok(Self { root })
    }

    /// Current version of a template; 0 if it was never saved.
    pub async fn version(&self, id: &TemplateId) -> Result<u64> {
        let key = storage_key(id)?;
        Ok(read_meta_version(&self.meta_path(key)).await)
    }

    fn template_path(&self, key: &str) -> PathBuf {
        self.root.join("templates").join(format!("{}.json", key))
    }

    fn completion_path(&self, key: &str) -> PathBuf {
        self.root.join("completions").join(format!("{}.json", key))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.root.join("meta").join("templates").join(format!("{}.meta.json", key))
    }

    /// Read and increment the per-template version, return the new version.
    async fn bump_version(&self, key: &str) -> Result<u64> {
        let path = self.meta_path(key);
        let version = read_meta_version(&path).await + 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }
}

#[async_trait::async_trait]
impl TemplateStore for JsonStorage {
    async fn save_template(&mut self, template: &Template) -> Result<()> {
        let key = storage_key(&template.id)?;
        let json = serde_json::to_string_pretty(template)?;
        fs::write(self.template_path(key), json.as_bytes()).await?;

        let version = self.bump_version(key).await?;
        debug!(template = %template.id, version, "saved template");
        Ok(())
    }

    async fn load_template(&self, id: &TemplateId) -> Result<Template> {
        let key = storage_key(id)?;
        read_json(&self.template_path(key))
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("template {}", id)))
    }

    async fn list_templates(&self) -> Result<Vec<Template>> {
        list_dir(&self.root.join("templates")).await
    }

    async fn delete_template(&mut self, id: &TemplateId) -> Result<()> {
        let key = storage_key(id)?;
        remove_if_exists(&self.template_path(key)).await?;
        remove_if_exists(&self.meta_path(key)).await?;
        debug!(template = %id, "deleted template");
        Ok(())
    }

    async fn load_completion_set(&self, id: &TemplateId) -> Result<CompletionSet> {
        let key = storage_key(id)?;
        Ok(read_json(&self.completion_path(key)).await?.unwrap_or_default())
    }

    async fn save_completion_set(&mut self, id: &TemplateId, set: &CompletionSet) -> Result<()> {
        let key = storage_key(id)?;
        let json = serde_json::to_string(set)?;
        fs::write(self.completion_path(key), json.as_bytes()).await?;
        Ok(())
    }

    async fn clear_completion_set(&mut self, id: &TemplateId) -> Result<()> {
        let key = storage_key(id)?;
        remove_if_exists(&self.completion_path(key)).await
    }
}

/// Template ids become file names, so they must not escape the root.
fn storage_key(id: &TemplateId) -> Result<&str> {
    let key = id.as_str();
    if key.is_empty()
        || key == "."
        || key.contains("..")
        || key.contains(['/', '\\', '\0'])
    {
        return Err(StorageError::InvalidId(key.to_string()));
    }
    Ok(key)
}

async fn read_meta_version(path: &Path) -> u64 {
    match fs::read_to_string(path).await {
        Ok(s) => serde_json::from_str::<serde_json::Value>(&s)
            .ok()
            .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
            .unwrap_or(0),
        Err(_) => 0,
    }
}

async fn remove_if_exists(path: &Path) -> Result<()> {
    fs::remove_file(path).await.or_else(|e| {
        if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
    })?;
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&entry.path()).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => debug!(path = %entry.path().display(), error = %e, "skipping unreadable entry"),
        }
    }
    Ok(items)
}
