use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("sync error: {0}")]
    Sync(#[from] crate::downloader::SyncError),
    #[error("parse error: {0}")]
    Parse(#[from] crate::parser::ParseError),
    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}
