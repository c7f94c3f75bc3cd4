use std::path::{Path, PathBuf};

use voicescribe::presentation::config::{Settings, SettingsError, StorageProviderSetting};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn given_complete_yaml_when_loading_then_values_and_defaults_are_applied() {
    let settings = Settings::load(&fixture("config.valid.yaml")).unwrap();

    assert_eq!(settings.telegram.bot_token, "123456:fixture-token");
    assert_eq!(settings.telegram.poll_timeout_secs, 25);
    assert_eq!(settings.telegram.api_base_url, "https://api.telegram.org");
    assert_eq!(settings.google.language_codes, vec!["ru-RU", "en-GB"]);
    assert_eq!(settings.google.model, "long");
    assert_eq!(settings.storage.provider, StorageProviderSetting::Gcs);
    assert_eq!(settings.storage.bucket.as_deref(), Some("voice-staging"));
    assert_eq!(settings.access.allowed_users, vec!["alice", "bob"]);
    assert!(settings.access.enabled);
    assert_eq!(settings.pipeline.remote_threshold_secs, 45.5);
    assert_eq!(settings.pipeline.max_concurrent_runs, 2);
    assert!(!settings.pipeline.always_remote);
    assert_eq!(settings.pipeline.ffmpeg_path, PathBuf::from("ffmpeg"));
    assert!(settings.logging.json);
}

#[test]
fn given_sparse_yaml_when_loading_then_every_missing_field_is_reported() {
    let err = Settings::load(&fixture("config.missing.yaml")).unwrap_err();

    let SettingsError::Missing(fields) = err else {
        panic!("expected missing fields, got {err}");
    };
    assert_eq!(
        fields,
        vec![
            "telegram.bot_token",
            "google.credentials_file",
            "google.project_id",
            "google.recognizer_name",
            "storage.local_path",
            "access.allowed_users",
        ]
    );
}

#[test]
fn given_open_gate_yaml_when_loading_then_allow_list_not_required() {
    let settings = Settings::load(&fixture("config.open_gate.yaml")).unwrap();

    assert!(!settings.access.enabled);
    assert_eq!(settings.storage.provider, StorageProviderSetting::Local);
    assert_eq!(settings.google.language_codes, vec!["de-DE"]);
}

fn valid_settings() -> Settings {
    let mut settings = Settings::default();
    settings.telegram.bot_token = "token".into();
    settings.google.credentials_file = Some(PathBuf::from("key.json"));
    settings.google.project_id = "p".into();
    settings.google.recognizer_name = "r".into();
    settings.storage.bucket = Some("b".into());
    settings.access.allowed_users = vec!["alice".into()];
    settings
}

#[test]
fn given_valid_settings_when_validating_then_ok() {
    assert!(valid_settings().validate().is_ok());
}

#[test]
fn given_non_positive_threshold_when_validating_then_invalid() {
    for threshold in [0.0, -5.0, f64::NAN, f64::INFINITY] {
        let mut settings = valid_settings();
        settings.pipeline.remote_threshold_secs = threshold;

        assert!(
            matches!(settings.validate(), Err(SettingsError::Invalid(_))),
            "{threshold}"
        );
    }
}

#[test]
fn given_zero_concurrency_when_validating_then_invalid() {
    let mut settings = valid_settings();
    settings.pipeline.max_concurrent_runs = 0;

    let err = settings.validate().unwrap_err();

    assert!(err.to_string().contains("max_concurrent_runs"));
}

#[test]
fn given_settings_when_debug_printed_then_bot_token_redacted() {
    let mut settings = valid_settings();
    settings.telegram.bot_token = "super-secret-token".into();

    let printed = format!("{settings:?}");

    assert!(!printed.contains("super-secret-token"));
    assert!(printed.contains("<redacted>"));
}
