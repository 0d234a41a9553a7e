use locsync_config::SkipRules;
use locsync_core::{fingerprint, CatalogEntry};
use locsync_domain::PackRecord;

/// Rows the packer should ship: translated, not skipped, and with a source
/// hash the game can match against.
pub fn export_for_pack(entries: &[CatalogEntry], rules: &SkipRules) -> Vec<PackRecord> {
    entries
        .iter()
        .filter(|e| e.has_translation() && !rules.skips(e))
        .filter_map(|e| {
            let source_hash = e
                .imported_fingerprint
                .or_else(|| e.source.as_deref().map(fingerprint))?;
            Some(PackRecord {
                namespace: e.namespace.clone(),
                key: e.key.clone(),
                text: e.translated.clone()?,
                source_hash,
            })
        })
        .collect()
}
