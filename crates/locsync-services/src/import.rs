use locsync_core::{fingerprint, sort_entries, CatalogEntry, EntryId};
use locsync_domain::{ImportRecord, ImportSummary};
use std::collections::HashMap;

/// Apply decoded upstream records to a catalog.
///
/// A known row takes the upstream text only if the record was produced from
/// the row's current source; the fingerprint is then not kept since it has
/// just been checked. Unknown identities become new rows that carry the
/// record's fingerprint until a collector run supplies their source.
pub fn apply_import_records(
    entries: &mut Vec<CatalogEntry>,
    records: &[ImportRecord],
) -> ImportSummary {
    let mut index: HashMap<EntryId, usize> =
        entries.iter().enumerate().map(|(i, e)| (e.id(), i)).collect();
    let mut summary = ImportSummary::default();

    for rec in records {
        let id = EntryId::new(rec.namespace.as_str(), rec.key.as_str());
        match index.get(&id) {
            Some(&pos) => {
                let row = &mut entries[pos];
                let matches = row
                    .source
                    .as_deref()
                    .filter(|s| !s.trim().is_empty())
                    .is_some_and(|s| fingerprint(s) == rec.source_hash);
                if matches {
                    row.imported_source = Some(rec.text.clone());
                    row.imported_fingerprint = None;
                    summary.updated += 1;
                } else {
                    tracing::debug!(event = "import_skipped", id = %id, hash = rec.source_hash);
                    summary.skipped += 1;
                }
            }
            None => {
                entries.push(CatalogEntry {
                    imported_source: Some(rec.text.clone()),
                    imported_fingerprint: Some(rec.source_hash),
                    ..CatalogEntry::new(&rec.namespace, &rec.key, None)
                });
                index.insert(id, entries.len() - 1);
                summary.added += 1;
            }
        }
    }
    sort_entries(entries);
    tracing::info!(
        event = "import_applied",
        updated = summary.updated,
        added = summary.added,
        skipped = summary.skipped
    );
    summary
}
