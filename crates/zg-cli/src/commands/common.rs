//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use zg_core::config::CONFIG_FILE_NAMES;
use zg_core::Config;
use zg_graph::{CypherScriptSink, DuckDbGraphSink, GraphSink};
use zg_locate::AtlasCredentials;
use zg_pipeline::CatalogAccess;

use crate::cli::{GlobalArgs, SinkKind};

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that destructors (open stores, buffered writers) run first.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Configuration plus the directory its relative paths resolve against.
pub(crate) struct Project {
    pub(crate) root: PathBuf,
    pub(crate) config: Config,
}

impl Project {
    /// Resolve a configured path against the project root
    pub(crate) fn path(&self, path: &Path) -> PathBuf {
        self.config.resolve(&self.root, path)
    }
}

/// Load `zonegraph.yml` from `--config` or the project directory.
///
/// Without an explicit `--config` a project without a config file runs on
/// defaults.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);

    let config = match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load config from {}", path))?,
        None if CONFIG_FILE_NAMES.iter().any(|n| root.join(n).exists()) => {
            Config::load_from_dir(&root).context("Failed to load project config")?
        }
        None => {
            log::debug!(
                "No {} in {}, using defaults",
                CONFIG_FILE_NAMES[0],
                root.display()
            );
            Config::default()
        }
    };

    Ok(Project { root, config })
}

/// Catalog URL and credentials from flags or the environment.
pub(crate) fn catalog_access(global: &GlobalArgs) -> CatalogAccess {
    let credentials = match (&global.atlas_username, &global.atlas_password) {
        (Some(username), Some(password)) => Some(AtlasCredentials {
            username: username.clone(),
            password: password.clone(),
        }),
        (Some(_), None) | (None, Some(_)) => {
            log::warn!("Catalog credentials need both a username and a password, ignoring");
            None
        }
        (None, None) => None,
    };

    CatalogAccess {
        url: global.atlas_url.clone(),
        credentials,
    }
}

/// Open the selected graph store.
pub(crate) fn open_sink(kind: SinkKind, project: &Project) -> Result<Box<dyn GraphSink>> {
    match kind {
        SinkKind::Duckdb => {
            let path = project.path(&project.config.graph.path);
            let sink = DuckDbGraphSink::open(&path)
                .with_context(|| format!("Failed to open graph store at {}", path.display()))?;
            Ok(Box::new(sink))
        }
        SinkKind::Cypher => {
            let path = project.path(&project.config.graph.cypher_script);
            Ok(Box::new(CypherScriptSink::new(path)))
        }
    }
}

/// Split a comma-separated list, dropping blanks.
pub(crate) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        assert_eq!(parse_list(" A, ,B ,"), vec!["A", "B"]);
        assert!(parse_list("").is_empty());
    }
}
