use crate::CatalogArgs;
use locsync_catalog::util::truncate_chars;
use locsync_config::Project;
use locsync_services::{build_translation_queue, pending_items};
use std::path::PathBuf;

const PREVIEW: usize = 10;

pub fn run_pending(
    project: &Project,
    catalog: &CatalogArgs,
    out: Option<PathBuf>,
    limit: Option<usize>,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "pending_args", catalog = ?catalog, out = ?out, limit = ?limit);
    let target = super::catalog_target(project, catalog)?;
    let rules = project.skip_rules()?;
    let entries = locsync_catalog::load_catalog(&target.path, rules)?;
    let groups = build_translation_queue(&entries, rules, limit);
    let rows: usize = groups.iter().map(|g| g.occurrence_count()).sum();
    let tag = target.tag();

    if let Some(out) = out {
        locsync_catalog::exchange::write_pending(&out, &pending_items(&groups))?;
        crate::ui_ok!(
            "{tag} Wrote {} pending groups ({rows} rows) to {}",
            groups.len(),
            out.display()
        );
        return Ok(());
    }

    if groups.is_empty() {
        crate::ui_ok!("{tag} Nothing to translate.");
        return Ok(());
    }
    crate::ui_out!("{tag} Pending: {rows} rows in {} groups.", groups.len());
    for g in groups.iter().take(PREVIEW) {
        crate::ui_out!(
            "  #{} ({}, {}) x{}: {}",
            g.id,
            if g.namespace.is_empty() { "<root>" } else { g.namespace.as_str() },
            g.key,
            g.occurrence_count(),
            truncate_chars(&g.source, 80)
        );
    }
    if groups.len() > PREVIEW {
        crate::ui_out!("  … and {} more", groups.len() - PREVIEW);
    }
    Ok(())
}
