use std::cmp::Ordering;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod fingerprint;

pub use fingerprint::fingerprint;

/// Workspace-wide result alias.
pub type Result<T> = color_eyre::eyre::Result<T>;

/// Identity of a catalog row. Unique within one catalog file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId {
    pub namespace: String,
    pub key: String,
}

impl EntryId {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.namespace.is_empty() {
            "<root>"
        } else {
            self.namespace.as_str()
        };
        write!(f, "({}, {})", ns, self.key)
    }
}

/// Entry as produced by the log collector. Untrusted: the key may be empty
/// and the same identity may appear more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub namespace: String,
    pub key: String,
    pub source: Option<String>,
}

impl RawEntry {
    pub fn new(namespace: &str, key: &str, source: Option<&str>) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
            source: source.map(str::to_string),
        }
    }
}

/// One translation unit of a language catalog.
///
/// Serialized with the on-disk field names: `importedSource` is stored as
/// `locresImport` and `importedFingerprint` as `importedHash`; both are
/// omitted from the record when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogEntry {
    pub namespace: String,
    pub key: String,
    pub source: Option<String>,
    pub translated: Option<String>,
    #[serde(
        rename = "locresImport",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub imported_source: Option<String>,
    #[serde(
        rename = "importedHash",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub imported_fingerprint: Option<u32>,
}

impl CatalogEntry {
    /// Fresh pending row with no import provenance.
    pub fn new(namespace: &str, key: &str, source: Option<&str>) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: key.to_string(),
            source: source.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn id(&self) -> EntryId {
        EntryId::new(self.namespace.clone(), self.key.clone())
    }

    /// True when a non-blank translation is recorded.
    pub fn has_translation(&self) -> bool {
        self.translated
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Text translation work is keyed by: the imported source when present,
    /// otherwise the collected source. Both trimmed; blank counts as absent.
    pub fn effective_source(&self) -> Option<&str> {
        non_blank(self.imported_source.as_deref()).or_else(|| non_blank(self.source.as_deref()))
    }

    /// Drop imported provenance together with the translation it backed.
    pub fn invalidate_import(&mut self) {
        self.imported_source = None;
        self.imported_fingerprint = None;
        self.translated = None;
    }

    /// Catalog order: namespace first, then key.
    pub fn cmp_identity(&self, other: &Self) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.key.cmp(&other.key))
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|t| !t.is_empty())
}

/// Sort rows into canonical catalog order.
pub fn sort_entries(entries: &mut [CatalogEntry]) {
    entries.sort_by(CatalogEntry::cmp_identity);
}

/// A historical catalog snapshot points at a Git LFS object that is not
/// present locally.
#[derive(Debug, Clone, Error)]
#[error("missing Git LFS object {oid} for {label}")]
pub struct LfsObjectMissing {
    pub oid: String,
    /// `<path>@<ref>` of the snapshot that referenced the object.
    pub label: String,
}

impl LfsObjectMissing {
    pub fn remediation(&self) -> &'static str {
        "Run `git lfs pull` followed by `git lfs checkout` to materialise the file."
    }
}
