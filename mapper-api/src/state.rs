use std::sync::Arc;

use mapper_core::{metrics::Metrics, VersionRegistry};

/// Shared handles every handler reads from. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<VersionRegistry>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(registry: Arc<VersionRegistry>, metrics: Arc<Metrics>) -> Self {
        Self { registry, metrics }
    }
}
