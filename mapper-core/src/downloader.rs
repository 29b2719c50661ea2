//! Keeps `<root>/<version>/mappings.tiny` in step with the Yarn builds published on the
//! Fabric maven.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::parser::MAPPINGS_FILE;

pub const INFO_FILE: &str = "info.txt";

/// Location of the mapping file inside a Yarn `-v2.jar`.
const ARCHIVE_ENTRY: &str = "mappings/mappings.tiny";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("archive does not contain {0}")]
    MissingEntry(&'static str),
    #[error("corrupt info file {path}: {source}")]
    CorruptInfo {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("tokio task error: {0}")]
    Tokio(#[from] tokio::task::JoinError),
}

/// One entry of the meta endpoint's Yarn version list. Also the content of `info.txt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YarnVersion {
    pub game_version: String,
    pub separator: String,
    pub build: u32,
    #[serde(default)]
    pub maven: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub stable: bool,
}

impl YarnVersion {
    /// `1.16.1+build.21`
    pub fn artifact_version(&self) -> String {
        format!("{}{}{}", self.game_version, self.separator, self.build)
    }

    pub fn jar_url(&self, maven_base: &str) -> String {
        let artifact = self.artifact_version();
        format!(
            "{}/{}/yarn-{}-v2.jar",
            maven_base.trim_end_matches('/'),
            artifact,
            artifact
        )
    }
}

#[derive(Debug)]
pub enum VersionStatus {
    /// The local copy already matches the remote build.
    Current,
    /// A new archive was downloaded and extracted this cycle.
    Updated,
    Failed(SyncError),
}

#[derive(Debug)]
pub struct VersionOutcome {
    pub version: String,
    pub status: VersionStatus,
}

/// Per-version results of one sync cycle.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<VersionOutcome>,
}

impl SyncReport {
    pub fn updated(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, VersionStatus::Updated))
            .map(|o| o.version.as_str())
    }

    pub fn current(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, VersionStatus::Current))
            .map(|o| o.version.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &SyncError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            VersionStatus::Failed(e) => Some((o.version.as_str(), e)),
            _ => None,
        })
    }
}

pub struct MappingDownloader {
    meta_url: String,
    maven_url: String,
    root: PathBuf,
    tracked: HashSet<String>,
    client: Client,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl MappingDownloader {
    pub fn new(meta_url: String, maven_url: String, root: PathBuf) -> Self {
        Self {
            meta_url,
            maven_url,
            root,
            tracked: HashSet::new(),
            client: Client::new(),
            limiter: None,
        }
    }

    pub fn from_config(cfg: &AppConfig) -> Self {
        Self::new(cfg.meta_url.clone(), cfg.maven_url.clone(), cfg.mappings_dir.clone())
            .with_tracked_versions(cfg.tracked_versions.iter().cloned())
            .with_download_interval(cfg.download_interval())
    }

    /// Restricts syncing to the given game versions. An empty set tracks all of them.
    pub fn with_tracked_versions(mut self, versions: impl IntoIterator<Item = String>) -> Self {
        self.tracked = versions.into_iter().collect();
        self
    }

    /// Spaces archive downloads at least `interval` apart. Zero disables pacing.
    pub fn with_download_interval(mut self, interval: Duration) -> Self {
        self.limiter = Quota::with_period(interval).map(RateLimiter::direct);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fetches the remote version list, keeping the newest build of each tracked game version.
    pub async fn fetch_versions(&self) -> Result<Vec<YarnVersion>, SyncError> {
        let versions: Vec<YarnVersion> = self
            .client
            .get(&self.meta_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        // The endpoint lists builds newest first.
        let mut seen = HashSet::new();
        Ok(versions
            .into_iter()
            .filter(|v| self.tracked.is_empty() || self.tracked.contains(&v.game_version))
            .filter(|v| seen.insert(v.game_version.clone()))
            .collect())
    }

    /// Brings every tracked version up to date. Only a failure to fetch the version list is
    /// an error; per-version failures are reported in the [`SyncReport`].
    pub async fn sync(&self) -> Result<SyncReport, SyncError> {
        let versions = self.fetch_versions().await?;
        let mut report = SyncReport::default();

        for remote in &versions {
            let status = match self.is_current(remote).await {
                Ok(true) => {
                    debug!(version = %remote.game_version, build = remote.build, "Mappings up to date");
                    VersionStatus::Current
                }
                Ok(false) => match self.download(remote).await {
                    Ok(()) => VersionStatus::Updated,
                    Err(e) => {
                        warn!(version = %remote.game_version, error = %e, "Failed to download mappings");
                        VersionStatus::Failed(e)
                    }
                },
                Err(e) => {
                    warn!(version = %remote.game_version, error = %e, "Skipping version this cycle");
                    VersionStatus::Failed(e)
                }
            };
            report.outcomes.push(VersionOutcome {
                version: remote.game_version.clone(),
                status,
            });
        }

        Ok(report)
    }

    /// Reads the build recorded in `info.txt`. `None` when the version was never completely
    /// synced.
    pub async fn local_build(&self, game_version: &str) -> Result<Option<u32>, SyncError> {
        let dir = self.root.join(game_version);
        let info_path = dir.join(INFO_FILE);
        if !info_path.exists() || !dir.join(MAPPINGS_FILE).exists() {
            return Ok(None);
        }

        let data = tokio::fs::read_to_string(&info_path).await?;
        let info: YarnVersion = serde_json::from_str(&data).map_err(|source| {
            SyncError::CorruptInfo {
                path: info_path.clone(),
                source,
            }
        })?;
        Ok(Some(info.build))
    }

    async fn is_current(&self, remote: &YarnVersion) -> Result<bool, SyncError> {
        let local = self.local_build(&remote.game_version).await?;
        if let Some(build) = local {
            if build != remote.build {
                info!(
                    version = %remote.game_version,
                    current = build,
                    latest = remote.build,
                    "Builds don't match, updating"
                );
            }
        }
        Ok(local == Some(remote.build))
    }

    async fn download(&self, remote: &YarnVersion) -> Result<(), SyncError> {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }

        let url = remote.jar_url(&self.maven_url);
        info!(version = %remote.game_version, url = %url, "Downloading mappings");

        let bytes = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let dir = self.root.join(&remote.game_version);
        tokio::fs::create_dir_all(&dir).await?;

        let target = dir.clone();
        tokio::task::spawn_blocking(move || extract_mappings(&bytes, &target)).await??;

        // Written last: a version only counts as current once its mapping file is in place.
        let info = serde_json::to_string_pretty(remote)?;
        tokio::fs::write(dir.join(INFO_FILE), info).await?;
        info!(version = %remote.game_version, build = remote.build, "Mappings updated");
        Ok(())
    }
}

/// Pulls `mappings/mappings.tiny` out of a Yarn jar into `dir/mappings.tiny`, replacing the
/// previous file only once the new one is fully written.
pub fn extract_mappings(archive: &[u8], dir: &Path) -> Result<(), SyncError> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;
    let mut entry = match zip.by_name(ARCHIVE_ENTRY) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(SyncError::MissingEntry(ARCHIVE_ENTRY))
        }
        Err(e) => return Err(e.into()),
    };

    let mut content = Vec::new();
    entry.read_to_end(&mut content)?;

    let partial = dir.join(format!("{}.part", MAPPINGS_FILE));
    let mut file = std::fs::File::create(&partial)?;
    file.write_all(&content)?;
    file.sync_all()?;
    drop(file);

    std::fs::rename(&partial, dir.join(MAPPINGS_FILE))?;
    Ok(())
}
