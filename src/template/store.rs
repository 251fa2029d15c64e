//! Filesystem-backed template store.
//!
//! Templates live under a single root directory. A template identifier is a
//! relative path to the SVG markup (e.g. `match.svg` or `sports/match.svg`);
//! its configuration is the sibling file with a `.json` extension.
//!
//! Identifiers that would resolve outside the root are rejected, both
//! lexically (`..`, absolute paths) and after symlink resolution.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{PlacardError, Result};

use super::config::TemplateConfig;

/// Read-only access to templates under a root directory.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Load the raw markup for `id`.
    pub async fn load_markup(&self, id: &str) -> Result<String> {
        let path = self.resolve(id)?;
        self.ensure_within_root(&path, id).await?;

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(PlacardError::TemplateNotFound(id.to_string())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PlacardError::TemplateNotFound(id.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        Ok(tokio::fs::read_to_string(&path).await?)
    }

    /// Load the configuration for `id`, or `None` if the template has none.
    pub async fn load_config(&self, id: &str) -> Result<Option<TemplateConfig>> {
        let path = self.resolve(id)?.with_extension("json");
        self.ensure_within_root(&path, id).await?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let config = TemplateConfig::from_json(&content).map_err(|e| match e {
            PlacardError::InvalidConfig(msg) => {
                PlacardError::InvalidConfig(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        Ok(Some(config))
    }

    /// Map an identifier to a path under the root without touching the disk.
    fn resolve(&self, id: &str) -> Result<PathBuf> {
        if id.trim().is_empty() {
            return Err(PlacardError::InvalidPath(
                "template identifier is empty".to_string(),
            ));
        }

        let relative = Path::new(id);
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            return Err(PlacardError::InvalidPath(id.to_string()));
        }

        Ok(self.root.join(relative))
    }

    /// Reject paths that escape the root through symlinks.
    ///
    /// Paths that do not exist yet are accepted here; the caller reports them
    /// as missing.
    async fn ensure_within_root(&self, path: &Path, id: &str) -> Result<()> {
        let Ok(resolved) = tokio::fs::canonicalize(path).await else {
            return Ok(());
        };
        let root = tokio::fs::canonicalize(&self.root).await?;
        if resolved.starts_with(&root) {
            Ok(())
        } else {
            Err(PlacardError::InvalidPath(id.to_string()))
        }
    }
}
