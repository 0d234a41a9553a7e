use locsync_config::{CatalogKind, Project};
use locsync_services::count_pending;

pub fn run_status(project: &Project, language: Option<String>) -> color_eyre::Result<()> {
    tracing::debug!(event = "status_args", language = ?language);
    let rules = project.skip_rules()?;
    let languages = match language {
        Some(code) => vec![super::resolve_language(project, Some(&code))?],
        None => project.languages().to_vec(),
    };

    for lang in &languages {
        for kind in [CatalogKind::Locres, CatalogKind::FmtString] {
            let path = project.catalog_path(lang, kind);
            // the FormatString catalog is optional
            if kind == CatalogKind::FmtString && !path.exists() {
                continue;
            }
            let entries = locsync_catalog::load_catalog(&path, rules)?;
            let translated = entries.iter().filter(|e| e.has_translation()).count();
            let pending = count_pending(&entries, rules);
            crate::ui_out!(
                "[{lang}] {}: total {}, translated {translated}, pending {pending}",
                path.display(),
                entries.len()
            );
        }
    }
    Ok(())
}
