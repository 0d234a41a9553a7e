use crate::reconcile::reconcile;
use locsync_config::SkipRules;
use locsync_core::{fingerprint, sort_entries, CatalogEntry, EntryId, RawEntry};
use locsync_domain::MergeStats;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// Drop catalog rows the collector no longer reports.
    pub prune_orphans: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Sorted, reconciled and sanitized rows.
    pub entries: Vec<CatalogEntry>,
    pub stats: MergeStats,
    /// Positions in `entries` whose content differs from what was loaded.
    pub changed: BTreeSet<usize>,
}

/// Fold freshly collected entries into an existing catalog.
///
/// Rows with an unchanged source are carried over as they are. A changed
/// source drops the translation; imported provenance survives only if its
/// fingerprint matches the new source. Orphans are kept unless
/// `prune_orphans` is set.
pub fn merge_collected(
    collected: &[RawEntry],
    existing: Vec<CatalogEntry>,
    rules: &SkipRules,
    opts: MergeOptions,
) -> MergeOutcome {
    let mut remaining: HashMap<EntryId, CatalogEntry> =
        existing.into_iter().map(|e| (e.id(), e)).collect();

    // rows without a key can never be loaded back, so they are never merged
    let mut last_seen: HashMap<EntryId, usize> = HashMap::new();
    let mut keyless = 0usize;
    for (pos, raw) in collected.iter().enumerate() {
        if raw.key.is_empty() {
            keyless += 1;
            continue;
        }
        last_seen.insert(EntryId::new(raw.namespace.as_str(), raw.key.as_str()), pos);
    }
    if keyless > 0 {
        tracing::debug!(event = "merge_keyless_dropped", count = keyless);
    }

    let mut stats = MergeStats::default();
    let mut touched: HashSet<EntryId> = HashSet::new();
    let mut merged = Vec::with_capacity(remaining.len() + last_seen.len());

    for (pos, raw) in collected.iter().enumerate() {
        let id = EntryId::new(raw.namespace.as_str(), raw.key.as_str());
        if last_seen.get(&id) != Some(&pos) {
            continue;
        }
        match remaining.remove(&id) {
            None => {
                merged.push(CatalogEntry::new(&raw.namespace, &raw.key, raw.source.as_deref()));
                stats.added += 1;
                touched.insert(id);
            }
            Some(current) if current.source == raw.source => merged.push(current),
            Some(mut current) => {
                let import_still_valid = match (raw.source.as_deref(), current.imported_fingerprint)
                {
                    (Some(src), Some(recorded)) => {
                        current.imported_source.is_some() && fingerprint(src) == recorded
                    }
                    _ => false,
                };
                current.source = raw.source.clone();
                current.translated = None;
                if !import_still_valid {
                    current.imported_source = None;
                    current.imported_fingerprint = None;
                }
                merged.push(current);
                stats.updated += 1;
                touched.insert(id);
            }
        }
    }

    if opts.prune_orphans {
        stats.removed = remaining.len();
        if stats.removed > 0 {
            tracing::debug!(event = "orphans_pruned", count = stats.removed);
        }
    } else {
        merged.extend(remaining.into_values());
    }

    sort_entries(&mut merged);
    let mut changed: BTreeSet<usize> = merged
        .iter()
        .enumerate()
        .filter(|(_, e)| touched.contains(&e.id()))
        .map(|(idx, _)| idx)
        .collect();
    changed.extend(reconcile(&mut merged));
    changed.extend(rules.sanitize(&mut merged));

    tracing::debug!(
        event = "merge_done",
        added = stats.added,
        updated = stats.updated,
        removed = stats.removed,
        changed = changed.len()
    );
    MergeOutcome {
        entries: merged,
        stats,
        changed,
    }
}

/// Put every row back to pending. Returns how many lost a translation.
pub fn reset_translations(entries: &mut [CatalogEntry]) -> usize {
    entries
        .iter_mut()
        .filter_map(|e| e.translated.take())
        .count()
}
