use indoc::indoc;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::*;

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.default_timeout().unwrap(), Duration::from_secs(3));
    assert!(settings.remind_keys);
    assert_eq!(settings.message_duration(), Duration::from_millis(1500));
    assert_eq!(settings.inject_method, InjectMethod::Type);
}

#[test]
fn test_yaml() {
    let settings = parse_settings(
        indoc! {"
            default_timeout_secs: 1.5
            remind_keys: false
            inject_method: clipboard
        "},
        ConfigFiletype::Yaml,
    )
    .unwrap();
    assert_eq!(settings.default_timeout().unwrap(), Duration::from_millis(1500));
    assert!(!settings.remind_keys);
    assert_eq!(settings.inject_method, InjectMethod::Clipboard);
    assert_eq!(settings.message_duration_ms, 1500);
}

#[test]
fn test_toml() {
    let settings = parse_settings(
        indoc! {"
            default_timeout_secs = 10
            message_duration_ms = 250
        "},
        ConfigFiletype::Toml,
    )
    .unwrap_or_else(|e| panic!("{e:#}"));
    assert_eq!(settings.default_timeout().unwrap(), Duration::from_secs(10));
    assert_eq!(settings.message_duration(), Duration::from_millis(250));
    assert!(settings.remind_keys);
}

#[test]
fn test_empty_document_is_default() {
    assert_eq!(parse_settings("", ConfigFiletype::Yaml).unwrap(), Settings::default());
    assert_eq!(parse_settings("\n", ConfigFiletype::Toml).unwrap(), Settings::default());
}

#[test]
fn test_unknown_field_is_rejected() {
    let result = parse_settings(
        indoc! {"
            remind_keys: true
            keymap: []
        "},
        ConfigFiletype::Yaml,
    );
    assert!(result.is_err());
}

#[test]
fn test_non_positive_timeout_is_rejected() {
    assert!(parse_settings("default_timeout_secs: 0", ConfigFiletype::Yaml).is_err());
    assert!(parse_settings("default_timeout_secs: -2", ConfigFiletype::Yaml).is_err());
}

#[test]
fn test_file_ext() {
    assert_eq!(get_file_ext(Path::new("chords.toml")), ConfigFiletype::Toml);
    assert_eq!(get_file_ext(Path::new("chords.TOML")), ConfigFiletype::Toml);
    assert_eq!(get_file_ext(Path::new("chords.yml")), ConfigFiletype::Yaml);
    assert_eq!(get_file_ext(Path::new("chords")), ConfigFiletype::Yaml);
}

#[test]
fn test_load_merges_left_to_right() {
    let dir = std::env::temp_dir().join(format!("ahk-chord-settings-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let base: PathBuf = dir.join("base.yaml");
    let overlay: PathBuf = dir.join("overlay.toml");
    fs::write(
        &base,
        indoc! {"
            default_timeout_secs: 2
            remind_keys: false
        "},
    )
    .unwrap();
    fs::write(&overlay, "default_timeout_secs = 4.0\n").unwrap();

    let settings = load_settings(&[base, overlay]).unwrap();
    assert_eq!(settings.default_timeout().unwrap(), Duration::from_secs(4));
    assert!(!settings.remind_keys);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_load_reports_missing_file() {
    let missing = PathBuf::from("/nonexistent/ahk-chord/settings.yaml");
    let err = load_settings(&[missing]).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read"));
}
