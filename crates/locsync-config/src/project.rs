use crate::{load_config, load_languages, ConfigError, LocSyncConfig, SkipRules};
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

/// Which per-language catalog a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    /// `<lang>.ndjson`, strings collected from the client log.
    Locres,
    /// `<lang>.fmtstring.ndjson`, FormatString table strings.
    FmtString,
}

impl CatalogKind {
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::Locres => "locres",
            CatalogKind::FmtString => "fmtstring",
        }
    }

    fn file_name(&self, language: &str) -> String {
        match self {
            CatalogKind::Locres => format!("{language}.ndjson"),
            CatalogKind::FmtString => format!("{language}.fmtstring.ndjson"),
        }
    }
}

/// Explicit project context handed to commands and services.
///
/// Skip rules and the language list are read on first use and cached for the
/// lifetime of the value; `reload` drops both caches and re-reads the config.
#[derive(Debug)]
pub struct Project {
    root: PathBuf,
    config: LocSyncConfig,
    skip_rules: OnceCell<SkipRules>,
    languages: OnceCell<Vec<String>>,
}

impl Project {
    /// Open a project rooted at `root`, loading `locsync.toml` layers.
    pub fn open(root: &Path) -> Self {
        Self::with_config(root, load_config(root))
    }

    pub fn with_config(root: &Path, config: LocSyncConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            skip_rules: OnceCell::new(),
            languages: OnceCell::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &LocSyncConfig {
        &self.config
    }

    pub fn resolve(&self, rel: impl AsRef<Path>) -> PathBuf {
        let rel = rel.as_ref();
        if rel.is_absolute() {
            rel.to_path_buf()
        } else {
            self.root.join(rel)
        }
    }

    pub fn translations_dir(&self) -> PathBuf {
        self.resolve(self.config.translations_dir())
    }

    pub fn catalog_path(&self, language: &str, kind: CatalogKind) -> PathBuf {
        self.translations_dir().join(kind.file_name(language))
    }

    /// Skip rules, loaded once. Failing to load them is fatal for the caller.
    pub fn skip_rules(&self) -> Result<&SkipRules, ConfigError> {
        self.skip_rules
            .get_or_try_init(|| SkipRules::load(&self.resolve(self.config.skip_rules_file())))
    }

    pub fn languages(&self) -> &[String] {
        self.languages
            .get_or_init(|| load_languages(&self.resolve(self.config.languages_file())))
    }

    /// Validate a user-supplied language code against the supported list.
    pub fn require_language(&self, code: &str) -> Option<String> {
        let code = code.trim().to_lowercase();
        self.languages().iter().find(|l| **l == code).cloned()
    }

    pub fn reload(&mut self) {
        self.config = load_config(&self.root);
        self.skip_rules = OnceCell::new();
        self.languages = OnceCell::new();
    }
}
