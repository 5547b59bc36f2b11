use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_STEM: &str = "team-pulse";
pub const ENV_PREFIX: &str = "TEAM_PULSE";

/// Runtime configuration for team-pulse
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardConfig {
    pub github: GitHubConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GitHubConfig {
    /// API root used when the stored settings leave `baseUrl` empty
    pub base_url: String,
    /// Fallback token when the stored settings have none
    pub token: Option<String>,
    /// Pull requests fetched per member
    pub result_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HttpConfig {
    /// In-flight requests per fan-out
    pub max_concurrency: usize,
    pub requests_per_second: u32,
    pub burst_capacity: u32,
    /// 0 disables the response cache
    pub cache_ttl_seconds: u64,
    pub cache_capacity: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding `github_settings.json` and `workflow_settings.json`
    pub settings_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub json_logs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            requests_per_second: 10,
            burst_capacity: 20,
            cache_ttl_seconds: 60,
            cache_capacity: 1000,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            github: GitHubConfig {
                base_url: crate::http::DEFAULT_BASE_URL.to_string(),
                token: None, // GITHUB_TOKEN is consulted in load()
                result_limit: 10,
            },
            http: HttpConfig::default(),
            storage: StorageConfig {
                settings_dir: PathBuf::from(".team-pulse"),
            },
            observability: ObservabilityConfig {
                log_level: "warn".to_string(),
                json_logs: false,
            },
        }
    }
}

impl DashboardConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. `team-pulse.toml` in the working directory
    /// 3. Environment variables (`TEAM_PULSE__HTTP__MAX_CONCURRENCY=8`)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        let file = dir.join(format!("{CONFIG_FILE_STEM}.toml"));
        if file.exists() {
            builder = builder.add_source(File::from(file));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let mut loaded: DashboardConfig = builder.build()?.try_deserialize()?;

        if loaded.github.token.is_none() {
            loaded.github.token = std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty());
        }

        Ok(loaded)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env from the working directory if it exists
    pub fn load_env_file() -> Result<bool> {
        Self::load_env_file_from(".env")
    }

    /// Returns whether a file was found and applied. Runs before logging is
    /// set up, so callers report the outcome themselves.
    pub fn load_env_file_from<P: AsRef<Path>>(path: P) -> Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(false);
        }
        dotenvy::from_path(path)?;
        Ok(true)
    }
}
