use crate::CatalogArgs;
use locsync_config::Project;
use std::path::Path;

pub fn run_import(
    project: &Project,
    records_path: &Path,
    catalog: &CatalogArgs,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "import_args", records = ?records_path, catalog = ?catalog);
    let target = super::catalog_target(project, catalog)?;
    let rules = project.skip_rules()?;
    let records = locsync_catalog::exchange::load_import_records(records_path)?;
    let mut entries = locsync_catalog::load_catalog(&target.path, rules)?;
    let summary = locsync_services::apply_import_records(&mut entries, &records);
    locsync_catalog::save_catalog(&target.path, &entries)?;
    crate::ui_ok!(
        "{} Imported {} records: updated {}, added {}, skipped {}.",
        target.tag(),
        records.len(),
        summary.updated,
        summary.added,
        summary.skipped
    );
    Ok(())
}
