//! Version-scoped identifier tables and the registry that publishes them.
//!
//! A [`MappingTable`] is built privately (by the tiny parser or through the registry's staging
//! area) and only ever handed to readers as an immutable `Arc` snapshot. Publishing replaces the
//! whole snapshot, so a reader holds either the previous table or the new one.

use parking_lot::{Mutex, RwLock};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use crate::remapper::IdentifierKind;

/// The four identifier tables of a single game version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    full_classes: HashMap<String, String>,
    short_classes: HashMap<String, String>,
    methods: HashMap<String, String>,
    fields: HashMap<String, String>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a class mapping and, when the intermediary name carries a `class_N` token,
    /// the derived short-name mapping.
    ///
    /// Both slash (`net/minecraft/class_1`) and dot forms are accepted; keys and values are
    /// stored in dot form.
    pub fn record_class(&mut self, unmapped: &str, mapped: &str) {
        let unmapped = unmapped.replace('/', ".");
        let mapped = mapped.replace('/', ".");

        // Inner classes carry several tokens; only the innermost one names this class.
        if let Some(token) = IdentifierKind::ShortClass.regex().find_iter(&unmapped).last() {
            self.short_classes
                .insert(token.as_str().to_string(), short_name(&mapped).to_string());
        }

        self.full_classes.insert(unmapped, mapped);
    }

    pub fn record_method(&mut self, unmapped: impl Into<String>, mapped: impl Into<String>) {
        self.methods.insert(unmapped.into(), mapped.into());
    }

    pub fn record_field(&mut self, unmapped: impl Into<String>, mapped: impl Into<String>) {
        self.fields.insert(unmapped.into(), mapped.into());
    }

    /// Table consulted by the substitution pass for `kind`.
    pub fn table(&self, kind: IdentifierKind) -> &HashMap<String, String> {
        match kind {
            IdentifierKind::FullClass => &self.full_classes,
            IdentifierKind::Method => &self.methods,
            IdentifierKind::ShortClass => &self.short_classes,
            IdentifierKind::Field => &self.fields,
        }
    }

    pub fn lookup(&self, kind: IdentifierKind, token: &str) -> Option<&str> {
        self.table(kind).get(token).map(String::as_str)
    }

    /// Total number of entries across all four tables.
    pub fn len(&self) -> usize {
        self.full_classes.len() + self.short_classes.len() + self.methods.len() + self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `net.minecraft.entity.Outer$Inner` -> `Inner`
fn short_name(mapped: &str) -> &str {
    let simple = mapped.rsplit('.').next().unwrap_or(mapped);
    simple.rsplit('$').next().unwrap_or(simple)
}

/// Process-wide store of published mapping tables, keyed by exact game version.
///
/// Lock order is always `staging` before `published`.
#[derive(Debug, Default)]
pub struct VersionRegistry {
    published: RwLock<HashMap<String, Arc<MappingTable>>>,
    staging: Mutex<HashMap<String, MappingTable>>,
}

impl VersionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates (or resets) `version` with empty tables. Any prior tables and any pending
    /// staged records for the version are discarded.
    pub fn register(&self, version: &str) {
        let mut staging = self.staging.lock();
        staging.remove(version);
        self.published
            .write()
            .insert(version.to_string(), Arc::new(MappingTable::new()));
    }

    /// Snapshot of the published table for an exact version match.
    pub fn get(&self, version: &str) -> Option<Arc<MappingTable>> {
        self.published.read().get(version).cloned()
    }

    pub fn contains(&self, version: &str) -> bool {
        self.published.read().contains_key(version)
    }

    /// Every registered version, sorted for stable output.
    pub fn list_versions(&self) -> Vec<String> {
        let mut versions: Vec<String> = self.published.read().keys().cloned().collect();
        versions.sort();
        versions
    }

    pub fn len(&self) -> usize {
        self.published.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stages a class mapping for `version`. Ignored when the version is not registered.
    /// Staged records become visible on [`commit`](Self::commit).
    pub fn record_class(&self, version: &str, unmapped: &str, mapped: &str) {
        self.stage(version, |table| table.record_class(unmapped, mapped));
    }

    pub fn record_method(&self, version: &str, unmapped: &str, mapped: &str) {
        self.stage(version, |table| table.record_method(unmapped, mapped));
    }

    pub fn record_field(&self, version: &str, unmapped: &str, mapped: &str) {
        self.stage(version, |table| table.record_field(unmapped, mapped));
    }

    /// Publishes the staged table for `version`. Returns false when nothing was staged.
    pub fn commit(&self, version: &str) -> bool {
        let mut staging = self.staging.lock();
        match staging.remove(version) {
            Some(table) => {
                self.published
                    .write()
                    .insert(version.to_string(), Arc::new(table));
                true
            }
            None => false,
        }
    }

    /// Publishes a fully built table, replacing whatever `version` held before.
    pub fn install(&self, version: &str, table: MappingTable) {
        let mut staging = self.staging.lock();
        staging.remove(version);
        self.published
            .write()
            .insert(version.to_string(), Arc::new(table));
    }

    fn stage<F>(&self, version: &str, apply: F)
    where
        F: FnOnce(&mut MappingTable),
    {
        let mut staging = self.staging.lock();
        let table = match staging.entry(version.to_string()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => match self.published.read().get(version) {
                // Copy-on-write: start from the currently published contents.
                Some(current) => entry.insert(MappingTable::clone(current)),
                None => return,
            },
        };
        apply(table);
    }
}
