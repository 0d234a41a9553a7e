use crate::CatalogArgs;
use locsync_config::Project;

pub fn run_reconcile(project: &Project, catalog: &CatalogArgs) -> color_eyre::Result<()> {
    tracing::debug!(event = "reconcile_args", catalog = ?catalog);
    let target = super::catalog_target(project, catalog)?;
    let rules = project.skip_rules()?;
    let mut entries = locsync_catalog::load_catalog(&target.path, rules)?;
    let changed = locsync_services::reconcile(&mut entries);
    if changed.is_empty() {
        crate::ui_ok!("{} Imported translations are consistent.", target.tag());
        return Ok(());
    }
    locsync_catalog::save_catalog(&target.path, &entries)?;
    crate::ui_ok!(
        "{} Invalidated {} stale imported translations.",
        target.tag(),
        changed.len()
    );
    Ok(())
}
