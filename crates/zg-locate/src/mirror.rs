//! Locator over a mirrored directory of term JSON files.

use crate::error::{LocateError, LocateResult};
use crate::traits::Locator;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use zg_core::{TermId, TermOrigin, TermRecord};

/// Finds term records by file stem under a mirror directory.
///
/// The directory is indexed once, at construction. A term matches a file
/// whose stem equals the trimmed id; when no stem matches exactly, the first
/// case-insensitive match wins.
#[derive(Debug, Clone)]
pub struct MirrorLocator {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl MirrorLocator {
    /// Index every `*.json` file below `root`.
    ///
    /// A missing directory yields an empty index.
    pub fn open(root: impl Into<PathBuf>) -> LocateResult<Self> {
        let root = root.into();
        if !root.is_dir() {
            log::warn!(
                "Mirror directory {} does not exist, mirror lookups will miss",
                root.display()
            );
            return Ok(Self {
                root,
                files: Vec::new(),
            });
        }

        let pattern = format!(
            "{}/**/*.json",
            glob::Pattern::escape(&root.to_string_lossy())
        );
        let entries = glob::glob(&pattern).map_err(|e| LocateError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(e) => {
                    log::warn!("Skipping unreadable mirror entry: {}", e);
                    None
                }
            })
            .collect();
        files.sort();

        log::debug!("Indexed {} term files under {}", files.len(), root.display());
        Ok(Self { root, files })
    }

    /// Mirror directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of indexed files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Path of the file holding `term`, if any.
    pub fn find(&self, term: &str) -> Option<&Path> {
        let term = term.trim();
        if term.is_empty() {
            return None;
        }

        let stem = |path: &PathBuf| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        self.files
            .iter()
            .find(|path| stem(path) == term)
            .or_else(|| {
                let lowered = term.to_lowercase();
                self.files
                    .iter()
                    .find(|path| stem(path).to_lowercase() == lowered)
            })
            .map(PathBuf::as_path)
    }
}

#[async_trait]
impl Locator for MirrorLocator {
    async fn fetch(&self, id: &TermId) -> LocateResult<Option<TermRecord>> {
        let Some(path) = self.find(id) else {
            return Ok(None);
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| LocateError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let body = serde_json::from_str(&content).map_err(|source| LocateError::MalformedJson {
            path: path.display().to_string(),
            source,
        })?;

        log::debug!("Found term {} in mirror at {}", id, path.display());
        Ok(Some(
            TermRecord::new(id.clone(), TermOrigin::Mirror, body)
                .with_display_name(path.display().to_string()),
        ))
    }

    fn name(&self) -> &'static str {
        "mirror"
    }
}

#[cfg(test)]
#[path = "mirror_test.rs"]
mod tests;
