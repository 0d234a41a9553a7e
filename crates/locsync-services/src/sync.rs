use crate::merge::{merge_collected, reset_translations, MergeOptions};
use crate::pending::count_pending;
use crate::Result;
use locsync_catalog::{load_catalog, save_catalog};
use locsync_config::SkipRules;
use locsync_core::{EntryId, RawEntry};
use locsync_domain::{SyncSummary, SCHEMA_VERSION};
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

const NEW_SAMPLE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Reset every translation to pending and rewrite the whole file.
    pub force: bool,
    pub prune_orphans: bool,
}

/// Drop collected entries whose source matches `exclude`. Returns the kept
/// entries and how many were dropped.
pub fn filter_collected(collected: &[RawEntry], exclude: &Regex) -> (Vec<RawEntry>, usize) {
    let (dropped, kept): (Vec<&RawEntry>, Vec<&RawEntry>) = collected
        .iter()
        .partition(|e| e.source.as_deref().is_some_and(|s| exclude.is_match(s)));
    (kept.into_iter().cloned().collect(), dropped.len())
}

/// Merge `collected` into the catalog at `path` and persist it if anything
/// changed.
pub fn sync_catalog(
    path: &Path,
    language: &str,
    collected: &[RawEntry],
    rules: &SkipRules,
    opts: SyncOptions,
) -> Result<SyncSummary> {
    let existing = load_catalog(path, rules)?;
    let known: HashSet<EntryId> = existing.iter().map(|e| e.id()).collect();
    let mut new_samples: Vec<String> = Vec::new();
    let mut seen: HashSet<EntryId> = HashSet::new();
    for raw in collected.iter().filter(|r| !r.key.is_empty()) {
        if new_samples.len() >= NEW_SAMPLE_LIMIT {
            break;
        }
        let id = EntryId::new(raw.namespace.as_str(), raw.key.as_str());
        if !known.contains(&id) && seen.insert(id.clone()) {
            new_samples.push(id.to_string());
        }
    }

    let outcome = merge_collected(
        collected,
        existing,
        rules,
        MergeOptions {
            prune_orphans: opts.prune_orphans,
        },
    );
    let mut entries = outcome.entries;
    let mut written = outcome.changed.len();

    if opts.force {
        let cleared = reset_translations(&mut entries);
        tracing::info!(event = "translations_reset", language, cleared);
        written = entries.len();
        save_catalog(path, &entries)?;
    } else if !outcome.changed.is_empty() || outcome.stats.removed > 0 {
        save_catalog(path, &entries)?;
    }

    let summary = SyncSummary {
        schema_version: SCHEMA_VERSION,
        language: language.to_string(),
        catalog: path.display().to_string(),
        stats: outcome.stats,
        written,
        total: entries.len(),
        pending: count_pending(&entries, rules),
        reset: opts.force,
        new_samples,
    };
    tracing::info!(
        event = "sync_summary",
        language,
        added = summary.stats.added,
        updated = summary.stats.updated,
        removed = summary.stats.removed,
        written = summary.written,
        total = summary.total,
        pending = summary.pending
    );
    Ok(summary)
}
