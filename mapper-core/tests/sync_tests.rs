mod common;

use mapper_core::downloader::{MappingDownloader, INFO_FILE};
use mapper_core::mapping::{MappingTable, VersionRegistry};
use mapper_core::metrics::Metrics;
use mapper_core::remapper::map_text;
use mapper_core::sync::{load_cached, SyncPipeline};
use mockito::Server;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn pipeline(server: &Server, root: &TempDir, registry: Arc<VersionRegistry>) -> SyncPipeline {
    let downloader = MappingDownloader::new(
        format!("{}/v2/versions/yarn", server.url()),
        format!("{}/maven/", server.url()),
        root.path().to_path_buf(),
    )
    .with_download_interval(Duration::ZERO);
    SyncPipeline::new(downloader, registry)
}

fn write_complete_copy(root: &TempDir, version: &str, build: u32, tiny: &str) {
    let dir = root.path().join(version);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("mappings.tiny"), tiny).unwrap();
    std::fs::write(
        dir.join(INFO_FILE),
        format!(
            r#"{{"gameVersion":"{}","separator":"+build.","build":{}}}"#,
            version, build
        ),
    )
    .unwrap();
}

#[tokio::test]
async fn sync_publishes_downloaded_versions() {
    let mut server = Server::new_async().await;
    let root = TempDir::new().unwrap();
    let registry = Arc::new(VersionRegistry::new());
    let metrics = Arc::new(Metrics::new().unwrap());

    let _meta = server
        .mock("GET", "/v2/versions/yarn")
        .with_status(200)
        .with_body(common::meta_json(&[("1.16.1", 21)]))
        .create_async()
        .await;
    let _jar = server
        .mock("GET", common::jar_path("1.16.1", 21).as_str())
        .with_status(200)
        .with_body(common::build_jar(common::SAMPLE_TINY))
        .create_async()
        .await;

    let report = pipeline(&server, &root, registry.clone())
        .with_metrics(metrics.clone())
        .run_once()
        .await
        .unwrap();

    assert_eq!(report.updated().count(), 1);
    assert_eq!(registry.list_versions(), vec!["1.16.1"]);
    assert_eq!(
        map_text(&registry, "1.16.1", "net.minecraft.class_1.method_42").as_deref(),
        Some("net.minecraft.entity.MyEntity.tick")
    );
    assert_eq!(metrics.sync_runs_total.get(), 1);
    assert_eq!(metrics.loaded_versions.get(), 1);
}

#[tokio::test]
async fn failed_update_keeps_published_table() {
    let mut server = Server::new_async().await;
    let root = TempDir::new().unwrap();
    let registry = Arc::new(VersionRegistry::new());

    let mut old = MappingTable::new();
    old.record_method("method_42", "oldTick");
    registry.install("1.16.1", old);
    write_complete_copy(&root, "1.16.1", 20, "c\tnet/minecraft/class_1\tnet/minecraft/Old\n");

    let _meta = server
        .mock("GET", "/v2/versions/yarn")
        .with_status(200)
        .with_body(common::meta_json(&[("1.16.1", 21)]))
        .create_async()
        .await;
    let _jar = server
        .mock("GET", common::jar_path("1.16.1", 21).as_str())
        .with_status(503)
        .create_async()
        .await;

    let report = pipeline(&server, &root, registry.clone()).run_once().await.unwrap();

    assert_eq!(report.failed().count(), 1);
    assert_eq!(map_text(&registry, "1.16.1", "method_42").as_deref(), Some("oldTick"));
}

#[tokio::test]
async fn failed_update_falls_back_to_stale_copy_on_disk() {
    let mut server = Server::new_async().await;
    let root = TempDir::new().unwrap();
    let registry = Arc::new(VersionRegistry::new());
    write_complete_copy(&root, "1.16.1", 20, common::SAMPLE_TINY);

    let _meta = server
        .mock("GET", "/v2/versions/yarn")
        .with_status(200)
        .with_body(common::meta_json(&[("1.16.1", 21)]))
        .create_async()
        .await;
    let _jar = server
        .mock("GET", common::jar_path("1.16.1", 21).as_str())
        .with_status(404)
        .create_async()
        .await;

    pipeline(&server, &root, registry.clone()).run_once().await.unwrap();

    assert_eq!(map_text(&registry, "1.16.1", "field_7").as_deref(), Some("age"));
}

#[tokio::test]
async fn meta_failure_counts_and_changes_nothing() {
    let mut server = Server::new_async().await;
    let root = TempDir::new().unwrap();
    let registry = Arc::new(VersionRegistry::new());
    let metrics = Arc::new(Metrics::new().unwrap());

    let _meta = server
        .mock("GET", "/v2/versions/yarn")
        .with_status(502)
        .create_async()
        .await;

    let result = pipeline(&server, &root, registry.clone())
        .with_metrics(metrics.clone())
        .run_once()
        .await;

    assert!(result.is_err());
    assert!(registry.is_empty());
    assert_eq!(metrics.sync_failures_total.get(), 1);
}

#[tokio::test]
async fn cached_versions_load_without_network() {
    let root = TempDir::new().unwrap();
    write_complete_copy(&root, "1.16.1", 21, common::SAMPLE_TINY);
    // No info file: an interrupted download that must not be served.
    std::fs::create_dir_all(root.path().join("1.15.2")).unwrap();
    std::fs::write(root.path().join("1.15.2/mappings.tiny"), common::SAMPLE_TINY).unwrap();

    let registry = VersionRegistry::new();
    let loaded = load_cached(&registry, root.path()).await;

    assert_eq!(loaded, vec!["1.16.1"]);
    assert_eq!(registry.list_versions(), vec!["1.16.1"]);
    assert_eq!(map_text(&registry, "1.16.1", "class_2").as_deref(), Some("Part"));
}

#[tokio::test]
async fn missing_cache_directory_loads_nothing() {
    let root = TempDir::new().unwrap();
    let registry = VersionRegistry::new();
    let loaded = load_cached(&registry, &root.path().join("absent")).await;
    assert!(loaded.is_empty());
    assert!(registry.is_empty());
}
