use locsync_core::{fingerprint, CatalogEntry};

/// Invalidate imported translations whose recorded fingerprint no longer
/// matches the current source. Returns the positions that were cleared.
///
/// Rows missing any of `source`, `imported_source` or `imported_fingerprint`
/// are left alone, so a second pass never finds anything to do.
pub fn reconcile(entries: &mut [CatalogEntry]) -> Vec<usize> {
    let mut changed = Vec::new();
    for (idx, e) in entries.iter_mut().enumerate() {
        let (Some(source), Some(_), Some(recorded)) = (
            e.source.as_deref(),
            e.imported_source.as_deref(),
            e.imported_fingerprint,
        ) else {
            continue;
        };
        if fingerprint(source) != recorded {
            tracing::debug!(event = "import_invalidated", id = %e.id(), recorded);
            e.invalidate_import();
            changed.push(idx);
        }
    }
    changed
}
