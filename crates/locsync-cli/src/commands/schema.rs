use std::fs;

pub fn run_schema(out_dir: std::path::PathBuf) -> color_eyre::Result<()> {
    tracing::debug!(event = "schema_args", out_dir = ?out_dir);
    fs::create_dir_all(&out_dir)?;
    macro_rules! dump {
        ($ty:ty, $name:literal) => {{
            let schema = schemars::schema_for!($ty);
            let path = out_dir.join($name);
            let f = std::fs::File::create(&path)?;
            serde_json::to_writer_pretty(f, &schema)?;
        }};
    }
    dump!(locsync_core::CatalogEntry, "catalog_entry.schema.json");
    dump!(locsync_domain::SyncSummary, "sync_summary.schema.json");
    dump!(locsync_domain::DiffDocument, "diff_report.schema.json");
    dump!(locsync_domain::PendingItem, "pending_item.schema.json");
    dump!(locsync_domain::ImportRecord, "import_record.schema.json");
    dump!(locsync_domain::ImportSummary, "import_summary.schema.json");
    dump!(locsync_domain::ApplySummary, "apply_summary.schema.json");
    dump!(locsync_domain::PackRecord, "pack_record.schema.json");
    crate::ui_ok!("Schemas written to {}", out_dir.display());
    Ok(())
}
