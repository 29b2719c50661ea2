use mapper_core::config::ConfigError;
use mapper_core::downloader::SyncError;
use mapper_core::errors::AppError;
use mapper_core::parser::ParseError;
use std::path::PathBuf;

#[test]
fn app_error_from_sync_io() {
    let io_err = std::io::Error::new(std::io::ErrorKind::Other, "fail");
    let app: AppError = SyncError::Io(io_err).into();
    assert!(matches!(app, AppError::Sync(SyncError::Io(_))));
}

#[test]
fn app_error_from_missing_archive_entry() {
    let app: AppError = SyncError::MissingEntry("mappings/mappings.tiny").into();
    assert_eq!(
        app.to_string(),
        "sync error: archive does not contain mappings/mappings.tiny"
    );
}

#[test]
fn parse_error_names_the_file() {
    let err = ParseError::Io {
        path: PathBuf::from("mappings/1.16.1/mappings.tiny"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    };
    assert!(err.to_string().contains("mappings/1.16.1/mappings.tiny"));
    let app: AppError = err.into();
    assert!(matches!(app, AppError::Parse(_)));
}

#[test]
fn app_error_from_config() {
    let app: AppError = ConfigError::MissingFile(PathBuf::from("mapper.toml")).into();
    assert!(matches!(app, AppError::Config(ConfigError::MissingFile(_))));
}
