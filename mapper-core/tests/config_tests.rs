use mapper_core::config::{load_config, AppConfig, ConfigError, ConfigOverrides};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn defaults_apply_without_file() {
    let cfg = load_config(None, &ConfigOverrides::default()).unwrap();
    let defaults = AppConfig::default();

    assert_eq!(cfg.meta_url, defaults.meta_url);
    assert_eq!(cfg.maven_url, defaults.maven_url);
    assert_eq!(cfg.sync_interval(), Duration::from_secs(86_400));
    assert_eq!(cfg.download_interval(), Duration::from_secs(10));
}

#[test]
fn default_tracks_a_single_version() {
    let cfg = load_config(None, &ConfigOverrides::default()).unwrap();

    assert_eq!(cfg.tracked_versions, vec!["1.16.1".to_string()]);
    assert_eq!(AppConfig::default().tracked_versions, cfg.tracked_versions);
}

#[test]
fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
mappings_dir = "/srv/mappings"
tracked_versions = ["1.16.1", "1.16.2"]
submit_window_secs = 30
"#
    )
    .unwrap();

    let cfg = load_config(Some(file.path()), &ConfigOverrides::default()).unwrap();

    assert_eq!(cfg.mappings_dir, PathBuf::from("/srv/mappings"));
    assert_eq!(cfg.tracked_versions, vec!["1.16.1", "1.16.2"]);
    assert_eq!(cfg.submit_window(), Duration::from_secs(30));
}

#[test]
fn cli_overrides_take_precedence() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "bind_address = \"127.0.0.1:9000\"").unwrap();

    let overrides = ConfigOverrides {
        bind_address: Some("127.0.0.1:7000".into()),
        mappings_dir: Some(PathBuf::from("cache")),
    };
    let cfg = load_config(Some(file.path()), &overrides).unwrap();

    assert_eq!(cfg.bind_address, "127.0.0.1:7000");
    assert_eq!(cfg.mappings_dir, PathBuf::from("cache"));
}

#[test]
fn missing_file_is_reported() {
    let err = load_config(
        Some(std::path::Path::new("does/not/exist.toml")),
        &ConfigOverrides::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::MissingFile(_)));
}
