use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, BufWriter};
use tracing::{info, warn};

use mapper_api::{api::start_server, state::AppState};
use mapper_core::{
    config::{load_config, AppConfig, ConfigOverrides},
    downloader::MappingDownloader,
    errors::AppError,
    metrics::Metrics,
    parser,
    sync::{load_cached, SyncPipeline},
    Remapper, VersionRegistry,
};

#[derive(Parser)]
#[command(name = "mapper")]
#[command(about = "Remaps intermediary names in Minecraft logs to Yarn names")]
pub struct Cli {
    /// Config file (toml, json or yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Address the HTTP server binds to
    #[arg(long, global = true)]
    pub bind: Option<String>,
    /// Directory holding one subdirectory of mappings per game version
    #[arg(long, global = true)]
    pub mappings_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sync mappings in the background and serve the HTTP API
    Serve,
    /// Run one sync cycle and print what changed
    Sync,
    /// Remap a log file with mappings already on disk
    Map {
        #[arg(short, long)]
        game_version: String,
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn load_config(&self) -> Result<AppConfig> {
        let overrides = ConfigOverrides {
            bind_address: self.bind.clone(),
            mappings_dir: self.mappings_dir.clone(),
        };
        load_config(self.config.as_deref(), &overrides)
            .map_err(AppError::from)
            .context("failed to load configuration")
    }
}

fn sync_pipeline(cfg: &AppConfig, registry: Arc<VersionRegistry>) -> SyncPipeline {
    SyncPipeline::new(MappingDownloader::from_config(cfg), registry)
}

pub async fn serve_command(cfg: AppConfig) -> Result<()> {
    let registry = Arc::new(VersionRegistry::new());
    let metrics = Arc::new(Metrics::new().map_err(AppError::from)?);

    let cached = load_cached(&registry, &cfg.mappings_dir).await;
    info!(versions = cached.len(), "Loaded cached mappings");

    let pipeline =
        Arc::new(sync_pipeline(&cfg, Arc::clone(&registry)).with_metrics(Arc::clone(&metrics)));
    let _sync_task = pipeline.spawn(cfg.sync_interval());

    info!(bind = %cfg.bind_address, "Starting Minecraft Mapper API server");
    let state = AppState::new(registry, metrics);
    start_server(&cfg.bind_address, state, cfg.submit_window())
        .await
        .with_context(|| format!("server on {} failed", cfg.bind_address))
}

pub async fn sync_command(cfg: AppConfig) -> Result<()> {
    let registry = Arc::new(VersionRegistry::new());
    let report = sync_pipeline(&cfg, Arc::clone(&registry))
        .run_once()
        .await
        .map_err(AppError::from)?;

    for version in report.updated() {
        println!("updated  {version}");
    }
    for version in report.current() {
        println!("current  {version}");
    }
    for (version, error) in report.failed() {
        warn!(version, error = %error, "Version failed to sync");
        println!("failed   {version}: {error}");
    }
    println!("{} versions loaded", registry.len());
    Ok(())
}

pub async fn map_command(
    cfg: AppConfig,
    game_version: String,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let (table, _) = parser::load_version(&cfg.mappings_dir, &game_version)
        .await
        .map_err(AppError::from)
        .with_context(|| format!("no usable mappings for {game_version}"))?;
    let remapper = Remapper::new(Arc::new(table));

    let reader: Box<dyn AsyncBufRead + Unpin> = match &input {
        Some(path) => Box::new(BufReader::new(open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let writer: Box<dyn AsyncWrite + Unpin> = match &output {
        Some(path) => Box::new(BufWriter::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(tokio::io::stdout())),
    };

    let substitutions = remapper
        .remap_stream(reader, writer)
        .await
        .context("failed to remap log")?;
    info!(version = %game_version, substitutions, "Remapped log");
    Ok(())
}

async fn open(path: &Path) -> Result<tokio::fs::File> {
    tokio::fs::File::open(path)
        .await
        .with_context(|| format!("cannot open {}", path.display()))
}
