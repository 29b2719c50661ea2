use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::mapping::{MappingTable, VersionRegistry};

static FULL_CLASS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"net\.minecraft\.class_[1-9][0-9]*(?:\$class_[1-9][0-9]*)*").unwrap()
});

static METHOD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"method_[1-9][0-9]*").unwrap());

static SHORT_CLASS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"class_[1-9][0-9]*").unwrap());

static FIELD_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"field_[1-9][0-9]*").unwrap());

/// The lexical classes of intermediary identifiers, each mapped through its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    FullClass,
    Method,
    ShortClass,
    Field,
}

impl IdentifierKind {
    /// Order in which substitution passes run. Full classes must precede short classes so the
    /// short pass never sees the `class_N` suffix of a qualified name that was already mapped.
    pub const PASS_ORDER: [IdentifierKind; 4] = [
        IdentifierKind::FullClass,
        IdentifierKind::Method,
        IdentifierKind::ShortClass,
        IdentifierKind::Field,
    ];

    pub fn regex(self) -> &'static Regex {
        match self {
            IdentifierKind::FullClass => &FULL_CLASS_REGEX,
            IdentifierKind::Method => &METHOD_REGEX,
            IdentifierKind::ShortClass => &SHORT_CLASS_REGEX,
            IdentifierKind::Field => &FIELD_REGEX,
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::FullClass => write!(f, "full_class"),
            IdentifierKind::Method => write!(f, "method"),
            IdentifierKind::ShortClass => write!(f, "short_class"),
            IdentifierKind::Field => write!(f, "field"),
        }
    }
}

/// Result of remapping one text blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remapped {
    pub text: String,
    /// Number of identifier occurrences that were replaced.
    pub substitutions: usize,
}

/// Runs a single pass: every match of `kind`'s pattern is looked up in the matching table and
/// replaced when found. Misses are written back verbatim and mapped names are inserted
/// literally.
pub fn remap_pass(text: &str, kind: IdentifierKind, table: &MappingTable) -> (String, usize) {
    let lookup = table.table(kind);
    if lookup.is_empty() {
        return (text.to_string(), 0);
    }

    let mut substitutions = 0;
    let output = kind
        .regex()
        .replace_all(text, |caps: &Captures| {
            let matched = &caps[0];
            match lookup.get(matched) {
                Some(mapped) => {
                    substitutions += 1;
                    mapped.clone()
                }
                None => matched.to_string(),
            }
        })
        .into_owned();
    (output, substitutions)
}

/// Applies all four passes in [`IdentifierKind::PASS_ORDER`].
pub fn remap(text: &str, table: &MappingTable) -> Remapped {
    let mut intermediate = text.to_string();
    let mut substitutions = 0;
    for kind in IdentifierKind::PASS_ORDER {
        let (next, count) = remap_pass(&intermediate, kind, table);
        intermediate = next;
        substitutions += count;
    }
    Remapped {
        text: intermediate,
        substitutions,
    }
}

/// Remaps `text` with the tables published for `version`, or `None` if the version is unknown.
pub fn map_text(registry: &VersionRegistry, version: &str, text: &str) -> Option<String> {
    Remapper::for_version(registry, version).map(|remapper| remapper.remap_text(text))
}

/// Remapper bound to one snapshot of a version's tables.
#[derive(Debug, Clone)]
pub struct Remapper {
    table: Arc<MappingTable>,
}

impl Remapper {
    pub fn new(table: Arc<MappingTable>) -> Self {
        Self { table }
    }

    pub fn for_version(registry: &VersionRegistry, version: &str) -> Option<Self> {
        registry.get(version).map(Self::new)
    }

    pub fn remap_text(&self, input: &str) -> String {
        remap(input, &self.table).text
    }

    pub fn remap_counted(&self, input: &str) -> Remapped {
        remap(input, &self.table)
    }

    /// Remaps a log line by line. Line endings (`\n`, `\r\n`, or none on the last line) are
    /// written back as read. Returns the total number of substitutions.
    pub async fn remap_stream<R, W>(&self, mut reader: R, mut writer: W) -> std::io::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut substitutions = 0;
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                break;
            }
            // No identifier pattern spans a line break, so the ending passes through untouched.
            let remapped = self.remap_counted(&line);
            substitutions += remapped.substitutions;
            writer.write_all(remapped.text.as_bytes()).await?;
        }
        writer.flush().await?;
        Ok(substitutions)
    }
}
