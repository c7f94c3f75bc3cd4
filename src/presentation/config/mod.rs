mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AccessSettings, GoogleSettings, LoggingSettings, PipelineSettings, Settings, SettingsError,
    StorageProviderSetting, StorageSettings, TelegramSettings,
};
