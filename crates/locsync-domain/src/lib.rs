use locsync_core::CatalogEntry;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MergeStats {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
}

impl MergeStats {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.updated == 0 && self.removed == 0
    }
}

/// Outcome of syncing collected entries into one language catalog.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SyncSummary {
    pub schema_version: u32,
    pub language: String,
    pub catalog: String,
    pub stats: MergeStats,
    /// Rows touched by this run (merge, reconciliation or sanitization).
    pub written: usize,
    pub total: usize,
    pub pending: usize,
    /// All translations were reset to pending.
    pub reset: bool,
    /// Up to five identities that were not in the catalog before this run.
    pub new_samples: Vec<String>,
}

/// Catalog fields compared by the differ, named as on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DiffField {
    #[serde(rename = "source")]
    Source,
    #[serde(rename = "translated")]
    Translated,
    #[serde(rename = "locresImport")]
    ImportedSource,
    #[serde(rename = "importedHash")]
    ImportedFingerprint,
}

impl DiffField {
    pub const ALL: [DiffField; 4] = [
        DiffField::Source,
        DiffField::Translated,
        DiffField::ImportedSource,
        DiffField::ImportedFingerprint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiffField::Source => "source",
            DiffField::Translated => "translated",
            DiffField::ImportedSource => "locresImport",
            DiffField::ImportedFingerprint => "importedHash",
        }
    }
}

/// Field value normalized for comparison; absent and null are the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(u32),
    Null,
}

impl From<Option<&str>> for FieldValue {
    fn from(v: Option<&str>) -> Self {
        v.map_or(FieldValue::Null, |s| FieldValue::Text(s.to_string()))
    }
}

impl From<Option<u32>> for FieldValue {
    fn from(v: Option<u32>) -> Self {
        v.map_or(FieldValue::Null, FieldValue::Number)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldChange {
    pub field: DiffField,
    pub before: FieldValue,
    pub after: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ChangedEntry {
    pub item: CatalogEntry,
    pub baseline: CatalogEntry,
    pub changes: Vec<FieldChange>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiffReport {
    pub added: Vec<CatalogEntry>,
    pub removed: Vec<CatalogEntry>,
    pub changed: Vec<ChangedEntry>,
}

impl DiffReport {
    pub fn total(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DiffCounts {
    pub added: usize,
    pub removed: usize,
    pub changed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiffMetadata {
    pub file_path: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub generated_at: String,
    pub counts: DiffCounts,
}

/// Full diff report as written by `diff --output`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DiffDocument {
    pub metadata: DiffMetadata,
    #[serde(flatten)]
    pub report: DiffReport,
}

/// One group of pending rows sharing the same source text, as handed to a
/// translator. `translated` is empty on export and filled in on the way back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PendingItem {
    pub id: usize,
    pub namespace: String,
    pub key: String,
    pub source: String,
    pub occurrences: usize,
    #[serde(default)]
    pub translated: String,
}

/// Record decoded from an upstream locres by the external importer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    #[serde(default)]
    pub namespace: String,
    pub key: String,
    pub text: String,
    pub source_hash: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ImportSummary {
    pub updated: usize,
    pub added: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ApplySummary {
    /// Distinct source texts that received a translation.
    pub groups: usize,
    /// Catalog rows updated.
    pub entries: usize,
    /// Groups given up on after exhausting retries.
    pub failed: usize,
    pub cancelled: bool,
}

/// Row handed to the external locres/PAK packer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackRecord {
    pub namespace: String,
    pub key: String,
    pub text: String,
    pub source_hash: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_change_serializes_with_disk_names() {
        let c = FieldChange {
            field: DiffField::ImportedFingerprint,
            before: FieldValue::Null,
            after: FieldValue::Number(42),
        };
        let s = serde_json::to_string(&c).unwrap();
        assert_eq!(s, r#"{"field":"importedHash","before":null,"after":42}"#);
    }

    #[test]
    fn diff_document_flattens_report() {
        let doc = DiffDocument {
            metadata: DiffMetadata {
                file_path: "translations/vi.ndjson".into(),
                reference: "HEAD".into(),
                generated_at: "2024-01-01T00:00:00Z".into(),
                counts: DiffCounts {
                    added: 0,
                    removed: 0,
                    changed: 0,
                },
            },
            report: DiffReport::default(),
        };
        let v: serde_json::Value = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["metadata"]["ref"], "HEAD");
        assert_eq!(v["metadata"]["filePath"], "translations/vi.ndjson");
        assert!(v["added"].as_array().unwrap().is_empty());
    }

    #[test]
    fn pending_item_reads_back_without_translation() {
        let item: PendingItem = serde_json::from_str(
            r#"{"id":0,"namespace":"UI","key":"k","source":"确定","occurrences":2}"#,
        )
        .unwrap();
        assert_eq!(item.translated, "");
    }
}
