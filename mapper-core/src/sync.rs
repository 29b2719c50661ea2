//! Download → parse → publish pipeline, run once at startup and then on a timer.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::downloader::{MappingDownloader, SyncError, SyncReport, VersionStatus, INFO_FILE};
use crate::mapping::VersionRegistry;
use crate::metrics::Metrics;
use crate::parser::{self, MAPPINGS_FILE};

pub struct SyncPipeline {
    downloader: MappingDownloader,
    registry: Arc<VersionRegistry>,
    metrics: Option<Arc<Metrics>>,
}

impl SyncPipeline {
    pub fn new(downloader: MappingDownloader, registry: Arc<VersionRegistry>) -> Self {
        Self {
            downloader,
            registry,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Runs one cycle. Versions downloaded this cycle are reparsed and republished; versions
    /// that failed keep their published tables, and are loaded from an earlier complete sync
    /// on disk if nothing is published yet.
    pub async fn run_once(&self) -> Result<SyncReport, SyncError> {
        if let Some(metrics) = &self.metrics {
            metrics.sync_runs_total.inc();
        }

        let report = match self.downloader.sync().await {
            Ok(report) => report,
            Err(e) => {
                if let Some(metrics) = &self.metrics {
                    metrics.sync_failures_total.inc();
                }
                return Err(e);
            }
        };

        let root = self.downloader.root();
        for outcome in &report.outcomes {
            let version = outcome.version.as_str();
            let needs_load = match &outcome.status {
                VersionStatus::Updated => true,
                VersionStatus::Current => !self.is_populated(version),
                VersionStatus::Failed(_) => {
                    if let Some(metrics) = &self.metrics {
                        metrics.sync_failures_total.inc();
                    }
                    !self.is_populated(version) && has_complete_copy(root, version)
                }
            };

            if needs_load {
                self.load(root, version).await;
            }
        }

        if let Some(metrics) = &self.metrics {
            metrics.loaded_versions.set(self.registry.len() as i64);
        }
        info!(
            updated = report.updated().count(),
            current = report.current().count(),
            failed = report.failed().count(),
            "Sync cycle finished"
        );
        Ok(report)
    }

    /// Runs a cycle immediately and then every `interval`. Errors are logged and the next
    /// cycle retries.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                if let Err(e) = self.run_once().await {
                    error!(error = %e, "Failed to fetch remote mapping versions");
                }
            }
        })
    }

    fn is_populated(&self, version: &str) -> bool {
        self.registry
            .get(version)
            .map_or(false, |table| !table.is_empty())
    }

    async fn load(&self, root: &Path, version: &str) {
        match parser::load_version(root, version).await {
            Ok((table, stats)) => {
                info!(
                    version,
                    classes = stats.classes,
                    methods = stats.methods,
                    fields = stats.fields,
                    skipped = stats.skipped,
                    "Published mappings"
                );
                self.registry.install(version, table);
            }
            Err(e) => warn!(version, error = %e, "Failed to parse mappings"),
        }
    }
}

fn has_complete_copy(root: &Path, version: &str) -> bool {
    let dir = root.join(version);
    dir.join(INFO_FILE).exists() && dir.join(MAPPINGS_FILE).exists()
}

/// Registers every version with a complete copy under `root` and loads its tables, so the
/// service can answer before the first network sync finishes. Returns the versions loaded.
pub async fn load_cached(registry: &VersionRegistry, root: &Path) -> Vec<String> {
    let mut entries = match tokio::fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(e) => {
            info!(dir = %root.display(), error = %e, "No cached mappings");
            return Vec::new();
        }
    };

    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let name = entry.file_name().to_string_lossy().into_owned();
                if has_complete_copy(root, &name) && !registry.contains(&name) {
                    registry.register(&name);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(dir = %root.display(), error = %e, "Failed to scan cached mappings");
                break;
            }
        }
    }

    parser::load_all(registry, root)
        .await
        .into_iter()
        .filter_map(|(version, result)| match result {
            Ok(_) => Some(version),
            Err(e) => {
                warn!(version = %version, error = %e, "Failed to load cached mappings");
                None
            }
        })
        .collect()
}
