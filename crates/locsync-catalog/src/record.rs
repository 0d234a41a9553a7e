use locsync_core::CatalogEntry;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One catalog line as written by any version of the tooling.
///
/// Absent, `null` and wrongly-typed fields all collapse to `None`; only a
/// line that is not a JSON object fails to decode.
#[derive(Debug, Deserialize)]
pub(crate) struct LooseRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    namespace: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    key: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    source: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    translated: Option<String>,
    #[serde(rename = "locresImport", default, deserialize_with = "lenient_string")]
    imported_source: Option<String>,
    #[serde(rename = "importedHash", default, deserialize_with = "lenient_hash")]
    imported_fingerprint: Option<u32>,
}

impl LooseRecord {
    /// `None` when the record has no usable key.
    pub(crate) fn into_entry(self) -> Option<CatalogEntry> {
        let key = self.key.filter(|k| !k.is_empty())?;
        let imported_source = self.imported_source;
        // a fingerprint is meaningless without the imported text it vouches for
        let imported_fingerprint = if imported_source.is_some() {
            self.imported_fingerprint
        } else {
            None
        };
        Some(CatalogEntry {
            namespace: self.namespace.unwrap_or_default(),
            key,
            source: self.source,
            translated: self.translated,
            imported_source,
            imported_fingerprint,
        })
    }
}

fn lenient_string<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(de)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_hash<'de, D>(de: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(parse_hash(&Value::deserialize(de)?))
}

pub(crate) fn parse_hash(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()).or_else(|| {
            // writers that only have doubles emit `123.0`
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(f))
                .map(|f| f as u32)
        }),
        Value::String(s) => {
            let s = s.trim();
            match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => s.parse::<u32>().ok(),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(line: &str) -> Option<CatalogEntry> {
        serde_json::from_str::<LooseRecord>(line)
            .ok()
            .and_then(LooseRecord::into_entry)
    }

    #[test]
    fn wrong_types_collapse_to_defaults() {
        let e = decode(r#"{"namespace":5,"key":"k","source":["x"],"translated":true}"#).unwrap();
        assert_eq!(e.namespace, "");
        assert_eq!(e.source, None);
        assert_eq!(e.translated, None);
    }

    #[test]
    fn empty_or_missing_key_is_rejected() {
        assert!(decode(r#"{"namespace":"UI","key":""}"#).is_none());
        assert!(decode(r#"{"namespace":"UI"}"#).is_none());
        assert!(decode(r#"{"namespace":"UI","key":7}"#).is_none());
    }

    #[test]
    fn hash_forms() {
        assert_eq!(parse_hash(&json!(42)), Some(42));
        assert_eq!(parse_hash(&json!("42")), Some(42));
        assert_eq!(parse_hash(&json!("0xFF")), Some(255));
        assert_eq!(parse_hash(&json!(-1)), None);
        assert_eq!(parse_hash(&json!(4_294_967_296u64)), None);
        assert_eq!(parse_hash(&json!(1.5)), None);
        assert_eq!(parse_hash(&json!(123.0)), Some(123));
        assert_eq!(parse_hash(&json!(4294967295.0)), Some(u32::MAX));
        assert_eq!(parse_hash(&json!(4294967296.0)), None);
        assert_eq!(parse_hash(&json!(-2.0)), None);
        assert_eq!(parse_hash(&json!("abc")), None);
    }

    #[test]
    fn hash_without_import_text_is_dropped() {
        let e = decode(r#"{"key":"k","importedHash":7}"#).unwrap();
        assert_eq!(e.imported_fingerprint, None);
        let e = decode(r#"{"key":"k","locresImport":"x","importedHash":"7"}"#).unwrap();
        assert_eq!(e.imported_fingerprint, Some(7));
    }
}
