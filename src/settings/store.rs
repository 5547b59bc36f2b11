use super::obfuscation::{obfuscate, reveal};
use super::storage::SettingsStorage;
use super::{
    GitHubSettings, SettingsError, WorkflowConfig, WorkflowSettings, GITHUB_SETTINGS_KEY,
    WORKFLOW_SETTINGS_KEY,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Workflow entries as found on disk: older versions stored bare ids
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredWorkflowEntry {
    Config(WorkflowConfig),
    LegacyId(String),
    LegacyNumericId(u64),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWorkflowSettings {
    #[serde(default)]
    workflow_ids: Vec<StoredWorkflowEntry>,
}

/// Reads and writes the two settings records
#[derive(Clone)]
pub struct SettingsStore {
    storage: Arc<dyn SettingsStorage>,
}

impl SettingsStore {
    pub fn new(storage: Arc<dyn SettingsStorage>) -> Self {
        Self { storage }
    }

    /// Connection settings with the token revealed; defaults if never saved
    pub async fn load_github_settings(&self) -> Result<GitHubSettings, SettingsError> {
        let Some(raw) = self.storage.get(GITHUB_SETTINGS_KEY).await? else {
            debug!("No GitHub settings stored yet");
            return Ok(GitHubSettings::default());
        };

        let mut settings: GitHubSettings = serde_json::from_str(&raw)?;
        settings.token = reveal(&settings.token);
        Ok(settings)
    }

    pub async fn save_github_settings(&self, settings: &GitHubSettings) -> Result<(), SettingsError> {
        let mut masked = settings.clone();
        masked.token = obfuscate(&settings.token);
        let raw = serde_json::to_string(&masked)?;
        self.storage.set(GITHUB_SETTINGS_KEY, &raw).await
    }

    /// Tracked workflows, migrating bare-id entries to the object shape.
    ///
    /// A migration is written back immediately so later reads see the new
    /// shape.
    pub async fn load_workflow_settings(&self) -> Result<WorkflowSettings, SettingsError> {
        let Some(raw) = self.storage.get(WORKFLOW_SETTINGS_KEY).await? else {
            return Ok(WorkflowSettings::default());
        };

        let stored: StoredWorkflowSettings = serde_json::from_str(&raw)?;
        let mut migrated = 0usize;
        let workflow_ids = stored
            .workflow_ids
            .into_iter()
            .map(|entry| match entry {
                StoredWorkflowEntry::Config(config) => config,
                StoredWorkflowEntry::LegacyId(id) => {
                    migrated += 1;
                    WorkflowConfig::from_legacy_id(&id)
                }
                StoredWorkflowEntry::LegacyNumericId(id) => {
                    migrated += 1;
                    WorkflowConfig::from_legacy_id(&id.to_string())
                }
            })
            .collect();

        let settings = WorkflowSettings { workflow_ids };
        if migrated > 0 {
            info!(migrated, "Migrated legacy workflow settings to object shape");
            self.save_workflow_settings(&settings).await?;
        }
        Ok(settings)
    }

    pub async fn save_workflow_settings(&self, settings: &WorkflowSettings) -> Result<(), SettingsError> {
        let raw = serde_json::to_string(settings)?;
        self.storage.set(WORKFLOW_SETTINGS_KEY, &raw).await
    }

    /// Returns `false` if a workflow with the same id is already tracked
    pub async fn add_workflow(&self, workflow: WorkflowConfig) -> Result<bool, SettingsError> {
        let mut settings = self.load_workflow_settings().await?;
        if settings.workflow_ids.iter().any(|wf| wf.id == workflow.id) {
            return Ok(false);
        }
        settings.workflow_ids.push(workflow);
        self.save_workflow_settings(&settings).await?;
        Ok(true)
    }

    /// Replace the workflow with the same id; unknown ids are left alone
    pub async fn update_workflow(&self, workflow: WorkflowConfig) -> Result<bool, SettingsError> {
        let mut settings = self.load_workflow_settings().await?;
        let Some(existing) = settings.workflow_ids.iter_mut().find(|wf| wf.id == workflow.id) else {
            return Ok(false);
        };
        *existing = workflow;
        self.save_workflow_settings(&settings).await?;
        Ok(true)
    }

    pub async fn delete_workflow(&self, workflow_id: &str) -> Result<bool, SettingsError> {
        let mut settings = self.load_workflow_settings().await?;
        let before = settings.workflow_ids.len();
        settings.workflow_ids.retain(|wf| wf.id != workflow_id);
        if settings.workflow_ids.len() == before {
            return Ok(false);
        }
        self.save_workflow_settings(&settings).await?;
        Ok(true)
    }

    pub async fn add_member(&self, handle: &str) -> Result<bool, SettingsError> {
        let mut settings = self.load_github_settings().await?;
        let handle = handle.trim();
        if handle.is_empty()
            || settings
                .tracked_members
                .iter()
                .any(|member| member.eq_ignore_ascii_case(handle))
        {
            return Ok(false);
        }
        settings.tracked_members.push(handle.to_string());
        self.save_github_settings(&settings).await?;
        Ok(true)
    }

    pub async fn remove_member(&self, handle: &str) -> Result<bool, SettingsError> {
        let mut settings = self.load_github_settings().await?;
        let before = settings.tracked_members.len();
        settings
            .tracked_members
            .retain(|member| !member.eq_ignore_ascii_case(handle.trim()));
        if settings.tracked_members.len() == before {
            return Ok(false);
        }
        self.save_github_settings(&settings).await?;
        Ok(true)
    }
}
