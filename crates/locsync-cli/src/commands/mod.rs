pub mod apply;
pub mod diff;
pub mod export_pack;
pub mod import;
pub mod pending;
pub mod reconcile;
pub mod schema;
pub mod status;
pub mod sync;

use crate::CatalogArgs;
use color_eyre::eyre::{bail, eyre, Result};
use locsync_config::{CatalogKind, Project};
use std::path::PathBuf;

/// A catalog file picked by `--language` / `--fmtstring`.
pub struct CatalogTarget {
    pub language: String,
    pub kind: CatalogKind,
    pub path: PathBuf,
}

impl CatalogTarget {
    pub fn tag(&self) -> String {
        match self.kind {
            CatalogKind::Locres => format!("[{}]", self.language),
            CatalogKind::FmtString => format!("[{}/{}]", self.language, self.kind.label()),
        }
    }
}

pub fn resolve_language(project: &Project, requested: Option<&str>) -> Result<String> {
    match requested {
        Some(code) => project.require_language(code).ok_or_else(|| {
            eyre!(
                "unsupported language {code:?}; known: {}",
                project.languages().join(", ")
            )
        }),
        None => match project.languages().first() {
            Some(first) => Ok(first.clone()),
            None => bail!("no languages configured"),
        },
    }
}

pub fn catalog_target(project: &Project, args: &CatalogArgs) -> Result<CatalogTarget> {
    let language = resolve_language(project, args.language.as_deref())?;
    let kind = if args.fmtstring {
        CatalogKind::FmtString
    } else {
        CatalogKind::Locres
    };
    let path = project.catalog_path(&language, kind);
    Ok(CatalogTarget {
        language,
        kind,
        path,
    })
}
