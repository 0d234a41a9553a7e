use crate::ConfigError;
use locsync_core::CatalogEntry;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRule {
    namespace: Option<String>,
    key_regex: Option<String>,
    source_pattern: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRules {
    #[serde(default)]
    rules: Vec<RawRule>,
}

/// A rule matches when every field it specifies matches.
#[derive(Debug, Clone)]
pub struct SkipRule {
    pub namespace: Option<String>,
    pub key_regex: Option<Regex>,
    pub source_pattern: Option<Regex>,
}

impl SkipRule {
    pub fn matches(&self, namespace: &str, key: &str, source: Option<&str>) -> bool {
        if let Some(ns) = &self.namespace {
            if ns != namespace {
                return false;
            }
        }
        if let Some(re) = &self.key_regex {
            if !re.is_match(key) {
                return false;
            }
        }
        if let Some(re) = &self.source_pattern {
            match source {
                Some(s) if re.is_match(s) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Ordered skip rules. An entry is skipped when any rule matches.
#[derive(Debug, Clone, Default)]
pub struct SkipRules {
    rules: Vec<SkipRule>,
}

impl SkipRules {
    /// No rules: nothing is skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load `{ "rules": [...] }` from disk. A missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw, path)
    }

    pub fn from_json_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let parsed: RawRules = serde_json::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        let compile = |pattern: Option<String>| -> Result<Option<Regex>, ConfigError> {
            pattern
                .map(|p| {
                    Regex::new(&p).map_err(|source| ConfigError::Regex {
                        path: origin.to_path_buf(),
                        pattern: p.clone(),
                        source,
                    })
                })
                .transpose()
        };
        let mut rules = Vec::with_capacity(parsed.rules.len());
        for r in parsed.rules {
            rules.push(SkipRule {
                namespace: r.namespace,
                key_regex: compile(r.key_regex)?,
                source_pattern: compile(r.source_pattern)?,
            });
        }
        tracing::debug!(event = "skip_rules_loaded", path = %origin.display(), rules = rules.len());
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn should_skip(&self, namespace: &str, key: &str, source: Option<&str>) -> bool {
        self.rules.iter().any(|r| r.matches(namespace, key, source))
    }

    pub fn skips(&self, entry: &CatalogEntry) -> bool {
        self.should_skip(&entry.namespace, &entry.key, entry.source.as_deref())
    }

    /// Strip translations from skip-matched rows. Returns the indices touched.
    pub fn sanitize(&self, entries: &mut [CatalogEntry]) -> Vec<usize> {
        if self.rules.is_empty() {
            return Vec::new();
        }
        let mut touched = Vec::new();
        for (idx, e) in entries.iter_mut().enumerate() {
            if e.translated.is_some() && self.skips(e) {
                e.translated = None;
                touched.push(idx);
            }
        }
        touched
    }
}
