use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, File};
use serde::Deserialize;

use super::Environment;
use crate::infrastructure::speech::DEFAULT_SPEECH_BASE_URL;
use crate::infrastructure::telegram::DEFAULT_API_BASE_URL;

const ENV_PREFIX: &str = "APP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid environment: {0}")]
    Environment(String),
    #[error("missing mandatory settings: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
    #[error("invalid settings: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub telegram: TelegramSettings,
    pub google: GoogleSettings,
    pub storage: StorageSettings,
    pub access: AccessSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub api_base_url: String,
    pub poll_timeout_secs: u64,
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_timeout_secs: 30,
        }
    }
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("bot_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GoogleSettings {
    pub credentials_file: Option<PathBuf>,
    pub project_id: String,
    pub recognizer_name: String,
    pub speech_base_url: String,
    pub language_codes: Vec<String>,
    pub model: String,
    pub poll_initial_interval_ms: u64,
    pub poll_max_interval_ms: u64,
    pub operation_timeout_secs: u64,
}

impl Default for GoogleSettings {
    fn default() -> Self {
        Self {
            credentials_file: None,
            project_id: String::new(),
            recognizer_name: String::new(),
            speech_base_url: DEFAULT_SPEECH_BASE_URL.to_string(),
            language_codes: vec!["ru-RU".to_string(), "en-GB".to_string()],
            model: "long".to_string(),
            poll_initial_interval_ms: 1_000,
            poll_max_interval_ms: 10_000,
            operation_timeout_secs: 30 * 60,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    #[default]
    Gcs,
    Local,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub bucket: Option<String>,
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AccessSettings {
    pub enabled: bool,
    pub allowed_users: Vec<String>,
}

impl Default for AccessSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_users: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub remote_threshold_secs: f64,
    pub always_remote: bool,
    pub run_timeout_secs: u64,
    pub max_concurrent_runs: usize,
    pub ffmpeg_path: PathBuf,
    pub scratch_dir: Option<PathBuf>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            remote_threshold_secs: 60.0,
            always_remote: false,
            run_timeout_secs: 40 * 60,
            max_concurrent_runs: 1,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            scratch_dir: None,
        }
    }
}

impl PipelineSettings {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,voicescribe=debug".to_string(),
            json: false,
        }
    }
}

impl Settings {
    /// Layers `path`, its environment overlay and `APP__*` variables, then
    /// validates the result.
    ///
    /// Both files are optional so a deployment can be configured from the
    /// environment alone.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let environment = Environment::from_env().map_err(SettingsError::Environment)?;

        let configuration = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(File::from(environment.overlay_path(path)).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("access.allowed_users")
                    .with_list_parse_key("google.language_codes")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = configuration.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reports every missing mandatory field at once, then any out-of-range
    /// values.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut missing = Vec::new();

        if self.telegram.bot_token.trim().is_empty() {
            missing.push("telegram.bot_token");
        }
        if self
            .google
            .credentials_file
            .as_ref()
            .is_none_or(|p| p.as_os_str().is_empty())
        {
            missing.push("google.credentials_file");
        }
        if self.google.project_id.trim().is_empty() {
            missing.push("google.project_id");
        }
        if self.google.recognizer_name.trim().is_empty() {
            missing.push("google.recognizer_name");
        }
        match self.storage.provider {
            StorageProviderSetting::Gcs => {
                if self.storage.bucket.as_deref().is_none_or(|b| b.trim().is_empty()) {
                    missing.push("storage.bucket");
                }
            }
            StorageProviderSetting::Local => {
                if self
                    .storage
                    .local_path
                    .as_ref()
                    .is_none_or(|p| p.as_os_str().is_empty())
                {
                    missing.push("storage.local_path");
                }
            }
        }
        if self.access.enabled && self.access.allowed_users.iter().all(|u| u.trim().is_empty()) {
            missing.push("access.allowed_users");
        }
        if !missing.is_empty() {
            return Err(SettingsError::Missing(missing));
        }

        let mut invalid = Vec::new();
        let threshold = self.pipeline.remote_threshold_secs;
        if !threshold.is_finite() || threshold <= 0.0 {
            invalid.push(format!(
                "pipeline.remote_threshold_secs must be a positive number, got {threshold}"
            ));
        }
        if self.pipeline.max_concurrent_runs == 0 {
            invalid.push("pipeline.max_concurrent_runs must be at least 1".to_string());
        }
        if self.pipeline.run_timeout_secs == 0 {
            invalid.push("pipeline.run_timeout_secs must be at least 1".to_string());
        }
        if self.google.language_codes.is_empty() {
            invalid.push("google.language_codes must not be empty".to_string());
        }
        if self.google.poll_initial_interval_ms == 0
            || self.google.poll_max_interval_ms < self.google.poll_initial_interval_ms
        {
            invalid.push(
                "google.poll_max_interval_ms must be at least poll_initial_interval_ms (> 0)"
                    .to_string(),
            );
        }
        if !invalid.is_empty() {
            return Err(SettingsError::Invalid(invalid));
        }

        Ok(())
    }
}
