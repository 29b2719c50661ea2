pub mod config;
pub mod downloader;
pub mod errors;
pub mod logger;
pub mod mapping;
pub mod metrics;
pub mod parser;
pub mod remapper;
pub mod sync;

pub use mapping::{MappingTable, VersionRegistry};
pub use remapper::{map_text, IdentifierKind, Remapper};
