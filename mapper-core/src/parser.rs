//! Reader for Yarn's tab-separated `mappings.tiny` files.
//!
//! Every line is trimmed and split on tabs. Class lines (`c`) carry one name per namespace,
//! method and field lines (`m`, `f`) carry a descriptor first. Lines with the wrong number of
//! columns for their kind are skipped; other record kinds (parameters, locals, comments) are
//! ignored.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::mapping::{MappingTable, VersionRegistry};

pub const MAPPINGS_FILE: &str = "mappings.tiny";

const CLASS: &str = "c";
const METHOD: &str = "m";
const FIELD: &str = "f";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Counters collected while parsing one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub classes: usize,
    pub methods: usize,
    pub fields: usize,
    /// Class, method or field lines with the wrong column count or an empty name.
    pub skipped: usize,
}

/// Column layout of the name section of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    namespaces: usize,
    intermediary: usize,
    named: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            namespaces: 2,
            intermediary: 0,
            named: 1,
        }
    }
}

impl Layout {
    /// `tiny  2  0  intermediary  named [...]`
    fn from_header(columns: &[&str]) -> Option<Self> {
        if columns.len() < 5 || columns[0] != "tiny" {
            return None;
        }
        let namespaces = &columns[3..];
        Some(Self {
            namespaces: namespaces.len(),
            intermediary: namespaces.iter().position(|ns| *ns == "intermediary")?,
            named: namespaces.iter().position(|ns| *ns == "named")?,
        })
    }
}

/// Incremental tiny parser; feed it lines, then take the finished table.
#[derive(Debug, Default)]
pub struct TinyParser {
    layout: Layout,
    table: MappingTable,
    stats: ParseStats,
    started: bool,
}

impl TinyParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed_line(&mut self, line: &str) {
        let columns: Vec<&str> = line.trim().split('\t').collect();

        if !self.started {
            self.started = true;
            if let Some(layout) = Layout::from_header(&columns) {
                self.layout = layout;
                return;
            }
        }

        let Layout {
            namespaces,
            intermediary,
            named,
        } = self.layout;

        match columns[0] {
            CLASS if columns.len() == 1 + namespaces => {
                let (unmapped, mapped) = (columns[1 + intermediary], columns[1 + named]);
                if mapped.is_empty() {
                    self.stats.skipped += 1;
                } else {
                    self.table.record_class(unmapped, mapped);
                    self.stats.classes += 1;
                }
            }
            METHOD if columns.len() == 2 + namespaces => {
                let (unmapped, mapped) = (columns[2 + intermediary], columns[2 + named]);
                if mapped.is_empty() {
                    self.stats.skipped += 1;
                } else {
                    self.table.record_method(unmapped, mapped);
                    self.stats.methods += 1;
                }
            }
            FIELD if columns.len() == 2 + namespaces => {
                let (unmapped, mapped) = (columns[2 + intermediary], columns[2 + named]);
                if mapped.is_empty() {
                    self.stats.skipped += 1;
                } else {
                    self.table.record_field(unmapped, mapped);
                    self.stats.fields += 1;
                }
            }
            CLASS | METHOD | FIELD => self.stats.skipped += 1,
            _ => {}
        }
    }

    pub fn finish(self) -> (MappingTable, ParseStats) {
        (self.table, self.stats)
    }
}

pub fn parse_str(content: &str) -> (MappingTable, ParseStats) {
    let mut parser = TinyParser::new();
    for line in content.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

pub async fn parse_stream<R>(reader: R) -> std::io::Result<(MappingTable, ParseStats)>
where
    R: AsyncBufRead + Unpin,
{
    let mut parser = TinyParser::new();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        parser.feed_line(&line);
    }
    Ok(parser.finish())
}

pub fn mappings_path(root: &Path, version: &str) -> PathBuf {
    root.join(version).join(MAPPINGS_FILE)
}

/// Parses `<root>/<version>/mappings.tiny` into a fresh table.
pub async fn load_version(
    root: &Path,
    version: &str,
) -> Result<(MappingTable, ParseStats), ParseError> {
    let path = mappings_path(root, version);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;

    let (table, stats) = parse_stream(BufReader::new(file))
        .await
        .map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;

    if stats.skipped > 0 {
        debug!(version, skipped = stats.skipped, "Skipped malformed mapping lines");
    }
    Ok((table, stats))
}

/// Loads the mapping file of every registered version and publishes each table whole.
/// Versions whose file cannot be read keep their current tables.
pub async fn load_all(
    registry: &VersionRegistry,
    root: &Path,
) -> Vec<(String, Result<ParseStats, ParseError>)> {
    let mut results = Vec::new();
    for version in registry.list_versions() {
        let result = load_version(root, &version).await.map(|(table, stats)| {
            info!(
                version = %version,
                classes = stats.classes,
                methods = stats.methods,
                fields = stats.fields,
                "Finished parsing mappings"
            );
            registry.install(&version, table);
            stats
        });
        results.push((version, result));
    }
    results
}
