use std::path::Path;

pub const DEFAULT_LANGUAGE: &str = "vi";

/// Read the supported language list (a JSON array of codes).
///
/// Best effort: a missing, malformed or empty file yields `["vi"]`.
pub fn load_languages(path: &Path) -> Vec<String> {
    let parsed = std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str::<Vec<serde_json::Value>>(&raw).ok());
    let cleaned: Vec<String> = parsed
        .unwrap_or_default()
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    if cleaned.is_empty() {
        tracing::debug!(event = "languages_fallback", path = %path.display());
        vec![DEFAULT_LANGUAGE.to_string()]
    } else {
        cleaned
    }
}
