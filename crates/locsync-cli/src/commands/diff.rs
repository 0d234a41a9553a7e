use crate::CatalogArgs;
use color_eyre::eyre::Result;
use locsync_catalog::util::truncate_chars;
use locsync_catalog::GitSnapshot;
use locsync_config::Project;
use locsync_core::{CatalogEntry, LfsObjectMissing};
use locsync_domain::{DiffReport, FieldValue};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

const MAX_VALUE_CHARS: usize = 200;

pub fn run_diff(
    project: &Project,
    file: Option<PathBuf>,
    catalog: &CatalogArgs,
    reference: Option<String>,
    limit: Option<usize>,
    output: Option<PathBuf>,
    use_color: bool,
) -> Result<ExitCode> {
    tracing::debug!(event = "diff_args", file = ?file, catalog = ?catalog, reference = ?reference, limit = ?limit, output = ?output);
    let diff_cfg = project.config().diff.clone().unwrap_or_default();
    let reference = reference
        .or(diff_cfg.default_ref)
        .unwrap_or_else(|| "HEAD".to_string());
    let max_display = limit.or(diff_cfg.max_display).unwrap_or(10);

    let target = match file {
        Some(f) => f,
        None => super::catalog_target(project, catalog)?.path,
    };
    let rules = project.skip_rules()?;
    let current = locsync_catalog::load_catalog(&target, rules)?;

    let snapshot = GitSnapshot::discover(project.root())?;
    let relpath = snapshot.relative_path(&target)?;
    let baseline = match snapshot.load_catalog_at(&reference, &relpath, rules) {
        Ok(Some(rows)) => rows,
        Ok(None) => {
            crate::ui_warn!("No baseline for {relpath} at {reference}; comparing against an empty catalog.");
            Vec::new()
        }
        Err(e) => {
            if let Some(missing) = e.downcast_ref::<LfsObjectMissing>() {
                crate::ui_err!("Missing Git LFS object {} for {}.", missing.oid, missing.label);
                crate::ui_info!("{}", missing.remediation());
                return Ok(ExitCode::FAILURE);
            }
            return Err(e);
        }
    };

    let report = locsync_services::diff_catalogs(&current, &baseline);
    if let Some(out) = output {
        let doc = locsync_services::diff_document(report.clone(), &relpath, &reference);
        locsync_services::write_diff_report(&out, &doc)?;
        crate::ui_ok!("Full diff written to {}", out.display());
    }

    if report.is_empty() {
        crate::ui_ok!("No differences between {relpath} and {reference}.");
        return Ok(ExitCode::SUCCESS);
    }
    print_report(&report, &relpath, &reference, max_display, use_color);
    Ok(ExitCode::FAILURE)
}

fn print_report(report: &DiffReport, relpath: &str, reference: &str, max: usize, color: bool) {
    crate::ui_out!(
        "Diff of {relpath} against {reference}: added {}, removed {}, changed {}",
        report.added.len(),
        report.removed.len(),
        report.changed.len()
    );
    let shown = |len: usize| if max == 0 { len } else { len.min(max) };

    if !report.added.is_empty() {
        crate::ui_out!("");
        crate::ui_out!("Added ({}):", report.added.len());
        for e in report.added.iter().take(shown(report.added.len())) {
            crate::ui_out!("{}", header('+', e, color));
            print_entry_fields(e);
        }
        more(report.added.len(), max);
    }
    if !report.removed.is_empty() {
        crate::ui_out!("");
        crate::ui_out!("Removed ({}):", report.removed.len());
        for e in report.removed.iter().take(shown(report.removed.len())) {
            crate::ui_out!("{}", header('-', e, color));
            print_entry_fields(e);
        }
        more(report.removed.len(), max);
    }
    if !report.changed.is_empty() {
        crate::ui_out!("");
        crate::ui_out!("Changed ({}):", report.changed.len());
        for c in report.changed.iter().take(shown(report.changed.len())) {
            crate::ui_out!("{}", header('~', &c.item, color));
            for ch in &c.changes {
                crate::ui_out!(
                    "    {}: {} -> {}",
                    ch.field.as_str(),
                    format_value(&ch.before),
                    format_value(&ch.after)
                );
            }
        }
        more(report.changed.len(), max);
    }
}

fn header(mark: char, e: &CatalogEntry, color: bool) -> String {
    let line = format!("  {mark} {}", e.id());
    if !color {
        return line;
    }
    match mark {
        '+' => line.green().to_string(),
        '-' => line.red().to_string(),
        _ => line.yellow().to_string(),
    }
}

fn print_entry_fields(e: &CatalogEntry) {
    crate::ui_out!("    source: {}", format_value(&e.source.as_deref().into()));
    crate::ui_out!("    translated: {}", format_value(&e.translated.as_deref().into()));
}

fn more(len: usize, max: usize) {
    if max > 0 && len > max {
        crate::ui_out!("  … {} more", len - max);
    }
}

fn format_value(v: &FieldValue) -> String {
    match v {
        FieldValue::Null => "null".to_string(),
        FieldValue::Number(n) => n.to_string(),
        FieldValue::Text(s) if s.is_empty() => "\"\"".to_string(),
        FieldValue::Text(s) => {
            let quoted = serde_json::to_string(s).unwrap_or_else(|_| format!("{s:?}"));
            truncate_chars(&quoted, MAX_VALUE_CHARS)
        }
    }
}
