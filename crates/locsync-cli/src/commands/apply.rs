use crate::CatalogArgs;
use locsync_config::Project;
use locsync_services::{
    build_translation_queue, CancellationToken, DriverOptions, TranslationDriver, TranslatorKind,
};
use std::path::Path;

pub fn run_apply(
    project: &Project,
    filled: &Path,
    catalog: &CatalogArgs,
    checkpoint: Option<usize>,
) -> color_eyre::Result<()> {
    tracing::debug!(event = "apply_args", filled = ?filled, catalog = ?catalog, checkpoint = ?checkpoint);
    let target = super::catalog_target(project, catalog)?;
    let rules = project.skip_rules()?;
    let translator = TranslatorKind::from_filled_file(filled)?;

    let mut entries = locsync_catalog::load_catalog(&target.path, rules)?;
    let groups = build_translation_queue(&entries, rules, None);
    let tag = target.tag();
    if groups.is_empty() {
        crate::ui_ok!("{tag} Nothing to translate.");
        return Ok(());
    }

    let cfg = project.config().translate.clone().unwrap_or_default();
    let defaults = DriverOptions::default();
    let options = DriverOptions {
        batch_size: cfg.batch_size.unwrap_or(defaults.batch_size),
        concurrency: cfg.concurrency.unwrap_or(defaults.concurrency),
        checkpoint: checkpoint.or(cfg.checkpoint).unwrap_or(defaults.checkpoint),
        max_attempts: cfg.max_attempts.unwrap_or(defaults.max_attempts),
        ..defaults
    };

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_token.cancel()) {
        tracing::warn!(event = "ctrlc_handler_failed", error = %e);
    }

    let driver = TranslationDriver::new(&translator, options, cancel);
    let summary = driver.run(&mut entries, &groups, &target.language, |rows| {
        locsync_catalog::save_catalog(&target.path, rows)
    })?;

    if summary.cancelled {
        crate::ui_warn!("{tag} Interrupted; progress so far has been saved.");
    }
    if summary.failed > 0 {
        crate::ui_warn!("{tag} {} groups failed after retries.", summary.failed);
    }
    crate::ui_ok!(
        "{tag} Applied {} translations to {} entries in {}",
        summary.groups,
        summary.entries,
        target.path.display()
    );
    crate::ui_out!(
        "{tag} Pending translations: {}.",
        locsync_services::count_pending(&entries, rules)
    );
    Ok(())
}
