use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

/// Service counters, registered on a private Prometheus registry.
pub struct Metrics {
    pub submissions_total: IntCounter,
    pub rejected_submissions_total: IntCounter,
    pub unknown_version_total: IntCounter,
    pub substitutions_total: IntCounter,
    pub sync_runs_total: IntCounter,
    pub sync_failures_total: IntCounter,
    pub loaded_versions: IntGauge,
    registry: Registry,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let submissions_total =
            IntCounter::new("mapper_submissions_total", "Logs accepted for remapping")?;
        let rejected_submissions_total = IntCounter::new(
            "mapper_rejected_submissions_total",
            "Submissions rejected as empty or invalid",
        )?;
        let unknown_version_total = IntCounter::new(
            "mapper_unknown_version_total",
            "Submissions naming a version with no mappings",
        )?;
        let substitutions_total = IntCounter::new(
            "mapper_substitutions_total",
            "Intermediary identifiers replaced with mapped names",
        )?;
        let sync_runs_total = IntCounter::new("mapper_sync_runs_total", "Sync cycles started")?;
        let sync_failures_total = IntCounter::new(
            "mapper_sync_failures_total",
            "Failed sync cycles and failed version updates",
        )?;
        let loaded_versions =
            IntGauge::new("mapper_loaded_versions", "Game versions with published mappings")?;

        registry.register(Box::new(submissions_total.clone()))?;
        registry.register(Box::new(rejected_submissions_total.clone()))?;
        registry.register(Box::new(unknown_version_total.clone()))?;
        registry.register(Box::new(substitutions_total.clone()))?;
        registry.register(Box::new(sync_runs_total.clone()))?;
        registry.register(Box::new(sync_failures_total.clone()))?;
        registry.register(Box::new(loaded_versions.clone()))?;

        Ok(Self {
            submissions_total,
            rejected_submissions_total,
            unknown_version_total,
            substitutions_total,
            sync_runs_total,
            sync_failures_total,
            loaded_versions,
            registry,
        })
    }

    /// Prometheus text exposition of every registered metric.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
