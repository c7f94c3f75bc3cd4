use crate::presentation::config::LoggingSettings;

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub filter: String,
    pub json_format: bool,
}

impl From<&LoggingSettings> for TracingConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            filter: settings.level.clone(),
            json_format: settings.json,
        }
    }
}
