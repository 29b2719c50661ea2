#![allow(dead_code)]

use std::sync::Arc;

use mapper_api::state::AppState;
use mapper_core::{metrics::Metrics, MappingTable, VersionRegistry};

pub const VERSION: &str = "1.16.1";

pub fn sample_table() -> MappingTable {
    let mut table = MappingTable::new();
    table.record_class("net/minecraft/class_1", "net/minecraft/entity/MyEntity");
    table.record_class(
        "net/minecraft/class_1$class_2",
        "net/minecraft/entity/MyEntity$Part",
    );
    table.record_method("method_42", "tick");
    table.record_field("field_7", "age");
    table
}

pub fn test_state() -> AppState {
    let registry = Arc::new(VersionRegistry::new());
    registry.install(VERSION, sample_table());
    let metrics = Arc::new(Metrics::new().unwrap());
    AppState::new(registry, metrics)
}
