use crate::Result;
use locsync_catalog::util::write_atomic;
use locsync_core::{CatalogEntry, EntryId};
use locsync_domain::{
    ChangedEntry, DiffCounts, DiffDocument, DiffField, DiffMetadata, DiffReport, FieldChange,
    FieldValue,
};
use std::collections::BTreeMap;
use std::path::Path;

fn field_value(e: &CatalogEntry, field: DiffField) -> FieldValue {
    match field {
        DiffField::Source => e.source.as_deref().into(),
        DiffField::Translated => e.translated.as_deref().into(),
        DiffField::ImportedSource => e.imported_source.as_deref().into(),
        DiffField::ImportedFingerprint => e.imported_fingerprint.into(),
    }
}

fn index(entries: &[CatalogEntry]) -> BTreeMap<EntryId, &CatalogEntry> {
    entries.iter().map(|e| (e.id(), e)).collect()
}

/// Compare `current` against `baseline` by identity.
///
/// Output sections are in catalog order whatever the input order was.
pub fn diff_catalogs(current: &[CatalogEntry], baseline: &[CatalogEntry]) -> DiffReport {
    let cur = index(current);
    let base = index(baseline);
    let mut report = DiffReport::default();

    for (id, item) in &cur {
        let Some(before) = base.get(id) else {
            report.added.push((*item).clone());
            continue;
        };
        let changes: Vec<FieldChange> = DiffField::ALL
            .iter()
            .filter_map(|&field| {
                let b = field_value(before, field);
                let a = field_value(item, field);
                (a != b).then_some(FieldChange {
                    field,
                    before: b,
                    after: a,
                })
            })
            .collect();
        if !changes.is_empty() {
            report.changed.push(ChangedEntry {
                item: (*item).clone(),
                baseline: (*before).clone(),
                changes,
            });
        }
    }
    report.removed = base
        .iter()
        .filter(|(id, _)| !cur.contains_key(*id))
        .map(|(_, e)| (*e).clone())
        .collect();
    report
}

pub fn diff_document(report: DiffReport, file_path: &str, reference: &str) -> DiffDocument {
    DiffDocument {
        metadata: DiffMetadata {
            file_path: file_path.to_string(),
            reference: reference.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            counts: DiffCounts {
                added: report.added.len(),
                removed: report.removed.len(),
                changed: report.changed.len(),
            },
        },
        report,
    }
}

/// Write the full report as pretty JSON.
pub fn write_diff_report(path: &Path, doc: &DiffDocument) -> Result<()> {
    let mut body = serde_json::to_string_pretty(doc)?;
    body.push('\n');
    write_atomic(path, body.as_bytes())?;
    tracing::info!(event = "diff_report_written", path = %path.display(), total = doc.report.total());
    Ok(())
}
