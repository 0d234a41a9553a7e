use crate::Result;
use color_eyre::eyre::{bail, WrapErr};
use locsync_core::RawEntry;
use serde_json::Value;
use std::path::Path;

/// Read the collector's output: a JSON array of `{namespace, key, source}`.
pub fn load_collected(path: &Path) -> Result<Vec<RawEntry>> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("reading collected entries from {}", path.display()))?;
    parse_collected(&raw, &path.display().to_string())
}

/// Entries without a usable key are dropped; anything else is kept as-is,
/// duplicates included. Wrongly-typed `namespace`/`source` become `""`/null.
pub fn parse_collected(raw: &str, label: &str) -> Result<Vec<RawEntry>> {
    let doc: Value =
        serde_json::from_str(raw).wrap_err_with(|| format!("{label}: invalid JSON"))?;
    let Value::Array(items) = doc else {
        bail!("{label}: expected a JSON array of collected entries");
    };
    let total = items.len();
    let entries: Vec<RawEntry> = items
        .iter()
        .filter_map(|item| {
            let key = item.get("key")?.as_str().filter(|k| !k.is_empty())?;
            Some(RawEntry {
                namespace: item
                    .get("namespace")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                key: key.to_string(),
                source: item.get("source").and_then(Value::as_str).map(str::to_string),
            })
        })
        .collect();
    if entries.len() < total {
        tracing::debug!(
            event = "collected_dropped",
            file = label,
            dropped = total - entries.len()
        );
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_valid_and_drops_keyless() {
        let raw = r#"[
            {"namespace":"UI","key":"btn_ok","source":"确定"},
            {"namespace":"UI","key":"","source":"空"},
            {"key":"title","source":3},
            "garbage",
            {"namespace":null,"source":"no key"}
        ]"#;
        let got = parse_collected(raw, "collected.json").unwrap();
        assert_eq!(
            got,
            vec![
                RawEntry::new("UI", "btn_ok", Some("确定")),
                RawEntry::new("", "title", None),
            ]
        );
    }

    #[test]
    fn non_array_is_an_error() {
        let err = parse_collected(r#"{"entries":[]}"#, "c.json").unwrap_err();
        assert!(err.to_string().contains("expected a JSON array"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_collected(&dir.path().join("nope.json")).is_err());
    }
}
