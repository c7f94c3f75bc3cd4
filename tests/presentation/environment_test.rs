use std::path::{Path, PathBuf};

use voicescribe::presentation::config::Environment;

#[test]
fn given_known_names_when_parsing_then_environment_matches() {
    assert_eq!(Environment::try_from("PROD".to_string()), Ok(Environment::Prod));
    assert_eq!(Environment::try_from("production".to_string()), Ok(Environment::Prod));
    assert_eq!(Environment::try_from("test".to_string()), Ok(Environment::Test));
    assert_eq!(Environment::try_from(String::new()), Ok(Environment::Local));
}

#[test]
fn given_unknown_name_when_parsing_then_error_names_variable() {
    let err = Environment::try_from("staging".to_string()).unwrap_err();

    assert!(err.contains("APP_ENVIRONMENT"));
}

#[test]
fn given_base_file_when_building_overlay_then_environment_inserted_before_extension() {
    let overlay = Environment::Prod.overlay_path(Path::new("/etc/voicescribe/config.yaml"));

    assert_eq!(overlay, PathBuf::from("/etc/voicescribe/config.prod.yaml"));
}
