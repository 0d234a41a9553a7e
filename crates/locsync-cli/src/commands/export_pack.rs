use crate::CatalogArgs;
use locsync_config::Project;
use std::path::Path;

pub fn run_export_pack(project: &Project, catalog: &CatalogArgs, out: &Path) -> color_eyre::Result<()> {
    tracing::debug!(event = "export_pack_args", catalog = ?catalog, out = ?out);
    let target = super::catalog_target(project, catalog)?;
    let rules = project.skip_rules()?;
    let entries = locsync_catalog::load_catalog(&target.path, rules)?;
    let records = locsync_services::export_for_pack(&entries, rules);
    locsync_catalog::exchange::write_pack_records(out, &records)?;
    crate::ui_ok!(
        "{} Exported {} of {} entries to {}",
        target.tag(),
        records.len(),
        entries.len(),
        out.display()
    );
    Ok(())
}
