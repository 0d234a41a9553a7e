//! Files exchanged with tools outside the catalog: decoded upstream records
//! coming in, pending work going out and back, and rows for the packer.

use crate::util::{truncate_chars, write_atomic};
use crate::Result;
use color_eyre::eyre::WrapErr;
use locsync_domain::{ImportRecord, PackRecord, PendingItem};
use std::path::Path;

/// Upstream records, either as one JSON array or as NDJSON.
pub fn load_import_records(path: &Path) -> Result<Vec<ImportRecord>> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading import records from {}", path.display()))?;
    parse_import_records(&raw, &path.display().to_string())
}

pub fn parse_import_records(raw: &str, label: &str) -> Result<Vec<ImportRecord>> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw).wrap_err_with(|| format!("{label}: invalid record array"));
    }
    let mut out = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<ImportRecord>(line) {
            Ok(rec) => out.push(rec),
            Err(e) => tracing::warn!(
                event = "import_line_invalid",
                file = label,
                line = idx + 1,
                error = %e,
                content = %truncate_chars(line, 200)
            ),
        }
    }
    Ok(out)
}

pub fn write_pending(path: &Path, items: &[PendingItem]) -> Result<()> {
    let mut body = serde_json::to_string_pretty(items)?;
    body.push('\n');
    write_atomic(path, body.as_bytes())
}

/// Read back a pending export, typically with `translated` filled in.
pub fn load_pending(path: &Path) -> Result<Vec<PendingItem>> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).wrap_err_with(|| format!("{}: invalid pending file", path.display()))
}

pub fn write_pack_records(path: &Path, records: &[PackRecord]) -> Result<()> {
    let mut body = String::new();
    for r in records {
        body.push_str(&serde_json::to_string(r)?);
        body.push('\n');
    }
    write_atomic(path, body.as_bytes())
}
