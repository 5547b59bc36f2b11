use super::SettingsError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

/// Key/value blob storage for settings records
#[cfg_attr(any(test, feature = "testing"), automock)]
#[async_trait::async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Raw stored blob for `key`, `None` if never written
    async fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// One `<key>.json` file per record under a settings directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait::async_trait]
impl SettingsStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}

/// In-process storage, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let storage = Self::new();
        storage
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// Current raw blob, bypassing the async trait
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }
}

#[async_trait::async_trait]
impl SettingsStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get("github_settings").await.unwrap(), None);

        storage.set("github_settings", "{\"organization\":\"acme\"}").await.unwrap();

        assert_eq!(
            storage.get("github_settings").await.unwrap().as_deref(),
            Some("{\"organization\":\"acme\"}")
        );
        assert!(dir.path().join("nested/github_settings.json").exists());
    }
}
