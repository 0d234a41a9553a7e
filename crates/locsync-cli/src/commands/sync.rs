use color_eyre::eyre::{bail, WrapErr};
use locsync_config::{CatalogKind, Project};
use locsync_domain::SyncSummary;
use locsync_services::{filter_collected, sync_catalog, SyncOptions};
use std::path::Path;

pub fn run_sync(
    project: &Project,
    collected_path: &Path,
    force: bool,
    prune: bool,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "sync_args", collected = ?collected_path, force, prune);
    let rules = project.skip_rules()?;
    let mut collected = locsync_catalog::load_collected(collected_path)?;
    if collected.is_empty() {
        bail!("{} contains no collected entries", collected_path.display());
    }

    let sync_cfg = project.config().sync.clone().unwrap_or_default();
    if let Some(pattern) = sync_cfg.exclude_source_pattern.as_deref() {
        let re = regex::Regex::new(pattern)
            .wrap_err_with(|| format!("invalid sync.exclude_source_pattern {pattern:?}"))?;
        let (kept, dropped) = filter_collected(&collected, &re);
        if dropped > 0 {
            crate::ui_info!("Skipped {dropped} collected entries matching exclude_source_pattern.");
        }
        collected = kept;
    }

    let opts = SyncOptions {
        force,
        prune_orphans: prune || sync_cfg.prune_orphans.unwrap_or(false),
    };
    for language in project.languages() {
        let path = project.catalog_path(language, CatalogKind::Locres);
        let summary = sync_catalog(&path, language, &collected, rules, opts)?;
        report(&summary);
    }
    Ok(())
}

fn report(s: &SyncSummary) {
    let tag = format!("[{}]", s.language);
    if !s.new_samples.is_empty() {
        crate::ui_out!("{tag} New identities: {}", s.new_samples.join(", "));
    }
    if s.reset {
        crate::ui_out!("{tag} All translations have been reset to pending.");
    }
    let mut parts = Vec::new();
    if s.stats.added > 0 {
        parts.push(format!("added {}", s.stats.added));
    }
    if s.stats.updated > 0 {
        parts.push(format!("updated {}", s.stats.updated));
    }
    if s.stats.removed > 0 {
        parts.push(format!("removed {}", s.stats.removed));
    }
    if parts.is_empty() {
        crate::ui_out!("{tag} Catalog is already in sync.");
    } else {
        crate::ui_out!("{tag} Catalog changes: {}.", parts.join(", "));
    }
    crate::ui_out!("{tag} Lines written this run: {}.", s.written);
    crate::ui_out!(
        "{tag} Total entries: {}. Pending translations: {}.",
        s.total,
        s.pending
    );
}
