use ::config as config_rs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:5501";
pub const DEFAULT_META_URL: &str = "https://meta.fabricmc.net/v2/versions/yarn";
pub const DEFAULT_MAVEN_URL: &str = "https://maven.fabricmc.net/net/fabricmc/yarn/";
/// Game versions synced when no list is configured.
pub const DEFAULT_TRACKED_VERSIONS: &[&str] = &["1.16.1"];

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_address: String,
    pub mappings_dir: PathBuf,
    pub meta_url: String,
    pub maven_url: String,
    /// Game versions to keep in sync. An explicitly empty list tracks every version the meta
    /// endpoint lists, which means hundreds of archives on disk and tables in memory.
    pub tracked_versions: Vec<String>,
    pub sync_interval_secs: u64,
    /// Pause between two archive downloads.
    pub download_interval_secs: u64,
    /// Window in which a client may make one accepted submission. Zero disables the limit.
    pub submit_window_secs: u64,
}

impl AppConfig {
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs)
    }

    pub fn download_interval(&self) -> Duration {
        Duration::from_secs(self.download_interval_secs)
    }

    pub fn submit_window(&self) -> Duration {
        Duration::from_secs(self.submit_window_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            mappings_dir: PathBuf::from("mappings"),
            meta_url: DEFAULT_META_URL.to_string(),
            maven_url: DEFAULT_MAVEN_URL.to_string(),
            tracked_versions: DEFAULT_TRACKED_VERSIONS
                .iter()
                .map(|v| v.to_string())
                .collect(),
            sync_interval_secs: 60 * 60 * 24,
            download_interval_secs: 10,
            submit_window_secs: 10,
        }
    }
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_address: Option<String>,
    pub mappings_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    MissingFile(PathBuf),
    #[error("config error: {0}")]
    Config(#[from] config_rs::ConfigError),
}

/// Builds the configuration from defaults, an optional file, `MAPPER_*` environment
/// variables and CLI overrides, in increasing order of precedence.
pub fn load_config(
    path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();

    let mut builder = config_rs::Config::builder()
        .set_default("bind_address", defaults.bind_address)?
        .set_default("mappings_dir", defaults.mappings_dir.to_string_lossy().into_owned())?
        .set_default("meta_url", defaults.meta_url)?
        .set_default("maven_url", defaults.maven_url)?
        .set_default("tracked_versions", defaults.tracked_versions)?
        .set_default("sync_interval_secs", defaults.sync_interval_secs as i64)?
        .set_default("download_interval_secs", defaults.download_interval_secs as i64)?
        .set_default("submit_window_secs", defaults.submit_window_secs as i64)?;

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()));
        }
        builder = builder.add_source(config_rs::File::from(path));
    }

    builder = builder.add_source(
        config_rs::Environment::with_prefix("MAPPER")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("tracked_versions"),
    );

    if let Some(bind) = &overrides.bind_address {
        builder = builder.set_override("bind_address", bind.clone())?;
    }
    if let Some(dir) = &overrides.mappings_dir {
        builder = builder.set_override("mappings_dir", dir.to_string_lossy().into_owned())?;
    }

    Ok(builder.build()?.try_deserialize()?)
}
