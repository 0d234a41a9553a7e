use crate::store::parse_catalog;
use crate::Result;
use color_eyre::eyre::{bail, eyre, WrapErr};
use locsync_config::SkipRules;
use locsync_core::{CatalogEntry, LfsObjectMissing};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const LFS_VERSION_LINE: &str = "version https://git-lfs.github.com/spec/v1";
// pointer files are tiny; anything larger is real content
const LFS_POINTER_MAX: usize = 1024;

/// A Git LFS pointer stored in place of the real file content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfsPointer {
    pub oid: String,
    pub size: Option<u64>,
}

impl LfsPointer {
    pub fn parse(text: &str) -> Option<Self> {
        if text.len() > LFS_POINTER_MAX {
            return None;
        }
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        if lines.next()? != LFS_VERSION_LINE {
            return None;
        }
        let mut oid = None;
        let mut size = None;
        for line in lines {
            if let Some(hex) = line.strip_prefix("oid sha256:") {
                oid = Some(hex.trim().to_string());
            } else if let Some(n) = line.strip_prefix("size ") {
                size = n.trim().parse().ok();
            }
        }
        let oid = oid.filter(|o| o.len() > 4 && o.chars().all(|c| c.is_ascii_hexdigit()))?;
        Some(Self { oid, size })
    }

    /// Pointer held in raw blob bytes, if they are one.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        std::str::from_utf8(bytes).ok().and_then(Self::parse)
    }

    /// Location inside `<git-dir>/lfs/objects`.
    pub fn object_path(&self, git_dir: &Path) -> PathBuf {
        git_dir
            .join("lfs")
            .join("objects")
            .join(&self.oid[0..2])
            .join(&self.oid[2..4])
            .join(&self.oid)
    }
}

/// Read-only view of catalog files as they were at some Git revision.
#[derive(Debug, Clone)]
pub struct GitSnapshot {
    repo_root: PathBuf,
}

impl GitSnapshot {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// Find the work tree containing `start`.
    pub fn discover(start: &Path) -> Result<Self> {
        let out = git(start, &["rev-parse", "--show-toplevel"])?;
        if !out.status.success() {
            bail!(
                "{} is not inside a Git work tree: {}",
                start.display(),
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        let top = String::from_utf8_lossy(&out.stdout).trim().to_string();
        Ok(Self::new(top))
    }

    /// Path of `file` relative to the work tree, with `/` separators. The file
    /// itself need not exist, its directory must.
    pub fn relative_path(&self, file: &Path) -> Result<String> {
        let root = std::fs::canonicalize(&self.repo_root)?;
        let name = file
            .file_name()
            .ok_or_else(|| eyre!("{} has no file name", file.display()))?;
        let dir = match file.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let abs = std::fs::canonicalize(dir)
            .wrap_err_with(|| format!("resolving {}", dir.display()))?
            .join(name);
        let rel = abs
            .strip_prefix(&root)
            .map_err(|_| eyre!("{} is outside {}", file.display(), root.display()))?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(parts.join("/"))
    }

    /// Raw content of `relpath` at `reference`; `None` when Git has no such
    /// blob. Bytes are not decoded here so one bad line cannot fail the read.
    pub fn show(&self, reference: &str, relpath: &str) -> Result<Option<Vec<u8>>> {
        let object = format!("{reference}:{relpath}");
        let out = git(&self.repo_root, &["show", &object])?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            if out.status.code() == Some(128) || stderr.contains("fatal:") {
                tracing::debug!(event = "git_show_no_baseline", object = %object, stderr = %stderr.trim());
                return Ok(None);
            }
            bail!("git show {object} failed: {}", stderr.trim());
        }
        match LfsPointer::detect(&out.stdout) {
            Some(ptr) => self
                .resolve_lfs(&ptr, &out.stdout, format!("{relpath}@{reference}"))
                .map(Some),
            None => Ok(Some(out.stdout)),
        }
    }

    /// Catalog rows at `reference`, or `None` when there is no baseline.
    pub fn load_catalog_at(
        &self,
        reference: &str,
        relpath: &str,
        rules: &SkipRules,
    ) -> Result<Option<Vec<CatalogEntry>>> {
        let label = format!("{relpath}@{reference}");
        Ok(self
            .show(reference, relpath)?
            .map(|content| parse_catalog(&content, &label, rules)))
    }

    fn git_dir(&self) -> Result<PathBuf> {
        let out = git(&self.repo_root, &["rev-parse", "--git-common-dir"])?;
        if !out.status.success() {
            bail!("cannot locate .git for {}", self.repo_root.display());
        }
        let dir = PathBuf::from(String::from_utf8_lossy(&out.stdout).trim());
        Ok(if dir.is_absolute() {
            dir
        } else {
            self.repo_root.join(dir)
        })
    }

    fn resolve_lfs(&self, ptr: &LfsPointer, pointer: &[u8], label: String) -> Result<Vec<u8>> {
        if let Ok(git_dir) = self.git_dir() {
            let object = ptr.object_path(&git_dir);
            if let Ok(bytes) = std::fs::read(&object) {
                // a truncated download does not count as the object
                if ptr.size.map_or(true, |size| size == bytes.len() as u64) {
                    tracing::debug!(event = "lfs_local_object", oid = %ptr.oid);
                    return Ok(bytes);
                }
                tracing::warn!(
                    event = "lfs_local_object_size_mismatch",
                    oid = %ptr.oid,
                    expected = ?ptr.size,
                    actual = bytes.len()
                );
            }
        }
        match self.smudge(pointer) {
            Some(bytes) if LfsPointer::detect(&bytes).is_none() => {
                tracing::debug!(event = "lfs_smudged", oid = %ptr.oid);
                Ok(bytes)
            }
            _ => Err(LfsObjectMissing {
                oid: ptr.oid.clone(),
                label,
            }
            .into()),
        }
    }

    fn smudge(&self, pointer: &[u8]) -> Option<Vec<u8>> {
        let mut child = Command::new("git")
            .args(["lfs", "smudge"])
            .current_dir(&self.repo_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .ok()?;
        child.stdin.take()?.write_all(pointer).ok()?;
        let out = child.wait_with_output().ok()?;
        if !out.status.success() || out.stdout.is_empty() {
            return None;
        }
        Some(out.stdout)
    }
}

fn git(dir: &Path, args: &[&str]) -> Result<Output> {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .wrap_err("failed to run git")
}
