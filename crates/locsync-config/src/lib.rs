use serde::Deserialize;
use std::path::{Path, PathBuf};

mod languages;
mod project;
mod skip;

pub use languages::{load_languages, DEFAULT_LANGUAGE};
pub use project::{CatalogKind, Project};
pub use skip::{SkipRule, SkipRules};

pub const CONFIG_FILE_NAME: &str = "locsync.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocSyncConfig {
    pub translations_dir: Option<String>,
    pub languages_file: Option<String>,
    pub skip_rules_file: Option<String>,
    pub sync: Option<SyncCfg>,
    pub diff: Option<DiffCfg>,
    pub translate: Option<TranslateCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncCfg {
    /// Collected entries whose source matches are dropped before merging.
    pub exclude_source_pattern: Option<String>,
    pub prune_orphans: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffCfg {
    pub max_display: Option<usize>,
    pub default_ref: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranslateCfg {
    pub batch_size: Option<usize>,
    pub concurrency: Option<usize>,
    pub checkpoint: Option<usize>,
    pub max_attempts: Option<u32>,
}

impl LocSyncConfig {
    pub fn translations_dir(&self) -> &str {
        self.translations_dir.as_deref().unwrap_or("translations")
    }

    pub fn languages_file(&self) -> &str {
        self.languages_file.as_deref().unwrap_or("languages.json")
    }

    pub fn skip_rules_file(&self) -> &str {
        self.skip_rules_file
            .as_deref()
            .unwrap_or("config/translation-skip.json")
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid regular expression {pattern:?} in {path}: {source}")]
    Regex {
        path: PathBuf,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Load `locsync.toml` from `root`, then from `$CONFIG/locsync/`. Values from
/// the project file win; unreadable or malformed files are ignored.
pub fn load_config(root: &Path) -> LocSyncConfig {
    let mut merged = LocSyncConfig::default();
    let mut candidates = vec![root.join(CONFIG_FILE_NAME)];
    if let Some(base) = dirs::config_dir() {
        candidates.push(base.join("locsync").join(CONFIG_FILE_NAME));
    }
    for path in candidates {
        let Ok(s) = std::fs::read_to_string(&path) else {
            continue;
        };
        match toml::from_str::<LocSyncConfig>(&s) {
            Ok(cfg) => merged = merge(merged, cfg),
            Err(e) => {
                tracing::warn!(event = "config_parse_failed", path = %path.display(), error = %e)
            }
        }
    }
    merged
}

fn merge(mut a: LocSyncConfig, b: LocSyncConfig) -> LocSyncConfig {
    if a.translations_dir.is_none() {
        a.translations_dir = b.translations_dir;
    }
    if a.languages_file.is_none() {
        a.languages_file = b.languages_file;
    }
    if a.skip_rules_file.is_none() {
        a.skip_rules_file = b.skip_rules_file;
    }
    a.sync = merge_opt(a.sync, b.sync, merge_sync);
    a.diff = merge_opt(a.diff, b.diff, merge_diff);
    a.translate = merge_opt(a.translate, b.translate, merge_translate);
    a
}

fn merge_opt<T>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_sync(mut a: SyncCfg, b: SyncCfg) -> SyncCfg {
    if a.exclude_source_pattern.is_none() {
        a.exclude_source_pattern = b.exclude_source_pattern;
    }
    if a.prune_orphans.is_none() {
        a.prune_orphans = b.prune_orphans;
    }
    a
}

fn merge_diff(mut a: DiffCfg, b: DiffCfg) -> DiffCfg {
    if a.max_display.is_none() {
        a.max_display = b.max_display;
    }
    if a.default_ref.is_none() {
        a.default_ref = b.default_ref;
    }
    a
}

fn merge_translate(mut a: TranslateCfg, b: TranslateCfg) -> TranslateCfg {
    if a.batch_size.is_none() {
        a.batch_size = b.batch_size;
    }
    if a.concurrency.is_none() {
        a.concurrency = b.concurrency;
    }
    if a.checkpoint.is_none() {
        a.checkpoint = b.checkpoint;
    }
    if a.max_attempts.is_none() {
        a.max_attempts = b.max_attempts;
    }
    a
}
