use crate::record::LooseRecord;
use crate::util::{truncate_chars, write_atomic};
use crate::Result;
use color_eyre::eyre::WrapErr;
use locsync_config::SkipRules;
use locsync_core::{CatalogEntry, EntryId};
use std::collections::BTreeMap;
use std::path::Path;

const MAX_LOGGED_LINE: usize = 200;

/// Decode catalog bytes. `label` names the source in diagnostics.
///
/// Lines are decoded one at a time; a line that is not UTF-8 or not a JSON
/// object is logged and skipped. Later lines win over earlier ones with the
/// same identity. The result is sanitized with `rules` and sorted.
pub fn parse_catalog(content: &[u8], label: &str, rules: &SkipRules) -> Vec<CatalogEntry> {
    let mut by_id: BTreeMap<EntryId, CatalogEntry> = BTreeMap::new();
    let mut invalid = 0usize;
    for (idx, raw) in content.split(|b| *b == b'\n').enumerate() {
        let decoded = std::str::from_utf8(raw).map(str::trim);
        if matches!(decoded, Ok("")) {
            continue;
        }
        let parsed = decoded
            .map_err(|e| e.to_string())
            .and_then(|line| serde_json::from_str::<LooseRecord>(line).map_err(|e| e.to_string()));
        match parsed {
            Ok(rec) => {
                if let Some(entry) = rec.into_entry() {
                    by_id.insert(entry.id(), entry);
                }
            }
            Err(error) => {
                invalid += 1;
                tracing::warn!(
                    event = "catalog_line_invalid",
                    file = label,
                    line = idx + 1,
                    error = %error,
                    content = %truncate_chars(String::from_utf8_lossy(raw).trim(), MAX_LOGGED_LINE)
                );
            }
        }
    }
    let mut entries: Vec<CatalogEntry> = by_id.into_values().collect();
    rules.sanitize(&mut entries);
    tracing::debug!(event = "catalog_parsed", file = label, entries = entries.len(), invalid);
    entries
}

/// Load a catalog file. A missing file is an empty catalog.
pub fn load_catalog(path: &Path, rules: &SkipRules) -> Result<Vec<CatalogEntry>> {
    let content = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(event = "catalog_missing", path = %path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e).wrap_err_with(|| format!("reading {}", path.display())),
    };
    Ok(parse_catalog(&content, &path.display().to_string(), rules))
}

/// Serialize in catalog order, one compact record per line.
pub fn render_catalog(entries: &[CatalogEntry]) -> Result<String> {
    let mut sorted: Vec<&CatalogEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.cmp_identity(b));
    let mut out = String::new();
    for e in sorted {
        out.push_str(&serde_json::to_string(e)?);
        out.push('\n');
    }
    Ok(out)
}

pub fn save_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<()> {
    let body = render_catalog(entries)?;
    write_atomic(path, body.as_bytes()).wrap_err_with(|| format!("writing {}", path.display()))?;
    tracing::debug!(event = "catalog_saved", path = %path.display(), entries = entries.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rankdetail_rules() -> SkipRules {
        SkipRules::from_json_str(
            r#"{"rules":[{"namespace":"RankDetail"}]}"#,
            Path::new("rules.json"),
        )
        .unwrap()
    }

    #[test]
    fn bad_lines_are_skipped_not_fatal() {
        let content = "{\"namespace\":\"UI\",\"key\":\"a\",\"source\":\"甲\",\"translated\":null}\r\n\
                       not json\n\
                       \n\
                       [1,2]\n\
                       {\"key\":\"b\",\"source\":\"乙\",\"translated\":\"B\"}\n";
        let entries = parse_catalog(content.as_bytes(), "test", &SkipRules::empty());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].namespace, "");
        assert_eq!(entries[0].key, "b");
        assert_eq!(entries[1].key, "a");
    }

    #[test]
    fn line_with_invalid_utf8_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vi.ndjson");
        let mut bytes = b"{\"namespace\":\"UI\",\"key\":\"a\",\"source\":\"x\",\"translated\":null}\n".to_vec();
        bytes.extend_from_slice(b"{\"namespace\":\"UI\",\"key\":\"bad\",\"source\":\"\xff\xfe\"}\n");
        bytes.extend_from_slice("{\"namespace\":\"UI\",\"key\":\"c\",\"source\":\"乙\",\"translated\":\"B\"}\r\n".as_bytes());
        std::fs::write(&path, &bytes).unwrap();

        let entries = load_catalog(&path, &SkipRules::empty()).unwrap();
        let keys: Vec<_> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert_eq!(entries[1].translated.as_deref(), Some("B"));
    }

    #[test]
    fn duplicates_last_line_wins() {
        let content = "{\"namespace\":\"UI\",\"key\":\"a\",\"source\":\"old\",\"translated\":null}\n\
                       {\"namespace\":\"UI\",\"key\":\"a\",\"source\":\"new\",\"translated\":null}\n";
        let entries = parse_catalog(content.as_bytes(), "test", &SkipRules::empty());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].source.as_deref(), Some("new"));
    }

    #[test]
    fn load_sanitizes_skipped_rows() {
        let content = "{\"namespace\":\"RankDetail\",\"key\":\"r\",\"source\":\"1\",\"translated\":\"one\"}\n";
        let entries = parse_catalog(content.as_bytes(), "test", &rankdetail_rules());
        assert_eq!(entries[0].translated, None);
    }

    #[test]
    fn missing_file_is_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let entries = load_catalog(&dir.path().join("vi.ndjson"), &SkipRules::empty()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn save_output_is_order_independent() {
        let mut a = CatalogEntry::new("UI", "btn_ok", Some("确定"));
        a.translated = Some("OK".into());
        let b = CatalogEntry::new("", "title", Some("标题"));
        let mut c = CatalogEntry::new("UI", "btn_cancel", Some("取消"));
        c.imported_source = Some("取消".into());
        c.imported_fingerprint = Some(locsync_core::fingerprint("取消"));

        let one = render_catalog(&[a.clone(), b.clone(), c.clone()]).unwrap();
        let two = render_catalog(&[c, a, b]).unwrap();
        assert_eq!(one, two);
        assert!(one.starts_with("{\"namespace\":\"\",\"key\":\"title\""));
        assert!(one.ends_with('\n'));
        assert_eq!(render_catalog(&[]).unwrap(), "");
    }

    #[test]
    fn save_then_load_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("translations/vi.ndjson");
        let mut e = CatalogEntry::new("UI", "k", Some("文本"));
        e.translated = Some("Văn bản".into());
        e.imported_source = Some("文本".into());
        e.imported_fingerprint = Some(locsync_core::fingerprint("文本"));
        save_catalog(&path, &[e.clone()]).unwrap();
        let back = load_catalog(&path, &SkipRules::empty()).unwrap();
        assert_eq!(back, vec![e]);
    }
}
