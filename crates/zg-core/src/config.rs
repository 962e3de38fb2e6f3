//! Configuration types and parsing for zonegraph.yml

use crate::error::{CoreError, CoreResult};
use crate::zone::Zone;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File names searched by [`Config::load_from_dir`]
pub const CONFIG_FILE_NAMES: [&str; 2] = ["zonegraph.yml", "zonegraph.yaml"];

/// Main configuration from zonegraph.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// CSV inventory listing the terms to process (`atlas_term` column)
    #[serde(default = "default_terms_csv")]
    pub terms_csv: PathBuf,

    /// Mirrored term repository
    #[serde(default)]
    pub mirror: MirrorConfig,

    /// Live metadata catalog
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Upper bound for fetching one term, in seconds
    #[serde(default = "default_locator_timeout_secs")]
    pub locator_timeout_secs: u64,

    /// Terms fetched and extracted concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// SQL parsing settings
    #[serde(default)]
    pub sql: SqlConfig,

    /// Values a `$NAME` placeholder may take in table names.
    ///
    /// Used when matching pre/post query tables against candidates.
    #[serde(default = "default_placeholders")]
    pub placeholders: BTreeMap<String, Vec<String>>,

    /// Zone vocabulary extensions
    #[serde(default)]
    pub zones: ZonesConfig,

    /// Graph store settings
    #[serde(default)]
    pub graph: GraphConfig,

    /// Output file locations
    #[serde(default)]
    pub output: OutputConfig,
}

/// Mirrored term repository (one JSON file per term)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MirrorConfig {
    /// Root directory of the mirror
    #[serde(default = "default_mirror_dir")]
    pub dir: PathBuf,

    /// Glob (relative to `dir`) whose file stems are added to the term list
    #[serde(default = "default_listing_glob")]
    pub listing_glob: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            dir: default_mirror_dir(),
            listing_glob: default_listing_glob(),
        }
    }
}

/// Live catalog endpoint. Credentials are never read from this file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Base URL of the catalog API (e.g. `https://atlas:21000/api/atlas/v2`)
    #[serde(default)]
    pub url: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// SQL dialect used for parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Apache Hive / Impala
    Hive,
    /// Databricks / Spark SQL
    Databricks,
    /// Microsoft SQL Server
    MsSql,
    /// MySQL
    MySql,
    /// PostgreSQL
    Postgres,
    /// Permissive generic dialect
    Generic,
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dialect::Hive => "hive",
            Dialect::Databricks => "databricks",
            Dialect::MsSql => "mssql",
            Dialect::MySql => "mysql",
            Dialect::Postgres => "postgres",
            Dialect::Generic => "generic",
        };
        f.write_str(name)
    }
}

/// SQL parsing settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SqlConfig {
    /// Dialects tried in order until one parses
    #[serde(default = "default_dialects")]
    pub dialects: Vec<Dialect>,

    /// Schema used to qualify unqualified table names
    #[serde(default)]
    pub default_schema: Option<String>,
}

impl Default for SqlConfig {
    fn default() -> Self {
        Self {
            dialects: default_dialects(),
            default_schema: None,
        }
    }
}

/// Zone vocabulary extensions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZonesConfig {
    /// Extra schema tokens mapped to zones (e.g. `stg: Raw`)
    #[serde(default)]
    pub tokens: BTreeMap<String, Zone>,
}

/// Graph store settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphConfig {
    /// DuckDB file holding the property graph
    #[serde(default = "default_graph_path")]
    pub path: PathBuf,

    /// Cypher script written by the cypher sink
    #[serde(default = "default_cypher_script")]
    pub cypher_script: PathBuf,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            path: default_graph_path(),
            cypher_script: default_cypher_script(),
        }
    }
}

/// Output file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Plan-only lineage export
    #[serde(default = "default_plan_csv")]
    pub plan_csv: PathBuf,

    /// Failure report
    #[serde(default = "default_failures_csv")]
    pub failures_csv: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            plan_csv: default_plan_csv(),
            failures_csv: default_failures_csv(),
        }
    }
}

fn default_terms_csv() -> PathBuf {
    PathBuf::from("terms.csv")
}

fn default_mirror_dir() -> PathBuf {
    PathBuf::from("nifi-flows-repo")
}

fn default_listing_glob() -> String {
    "Prod/*/*.json".to_string()
}

fn default_locator_timeout_secs() -> u64 {
    60
}

fn default_concurrency() -> usize {
    4
}

fn default_dialects() -> Vec<Dialect> {
    vec![
        Dialect::Hive,
        Dialect::Databricks,
        Dialect::MsSql,
        Dialect::Generic,
    ]
}

fn default_placeholders() -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    map.insert(
        "ENTIDAD".to_string(),
        ["bsc", "bsj", "ber", "bsf"].map(String::from).to_vec(),
    );
    map.insert("SUBENTORNO".to_string(), ["pr", "de"].map(String::from).to_vec());
    map
}

fn default_graph_path() -> PathBuf {
    PathBuf::from("target/zonegraph.duckdb")
}

fn default_cypher_script() -> PathBuf {
    PathBuf::from("target/zonegraph.cypher")
}

fn default_plan_csv() -> PathBuf {
    PathBuf::from("target/lineage_plan.csv")
}

fn default_failures_csv() -> PathBuf {
    PathBuf::from("target/failures.csv")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terms_csv: default_terms_csv(),
            mirror: MirrorConfig::default(),
            catalog: CatalogConfig::default(),
            locator_timeout_secs: default_locator_timeout_secs(),
            concurrency: default_concurrency(),
            sql: SqlConfig::default(),
            placeholders: default_placeholders(),
            zones: ZonesConfig::default(),
            graph: GraphConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml(&content)
    }

    /// Load configuration from a directory.
    /// Looks for zonegraph.yml or zonegraph.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|p| p.exists())
            .map(|p| Self::load(&p))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> CoreResult<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.concurrency == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "concurrency must be at least 1".to_string(),
            });
        }
        if self.locator_timeout_secs == 0 {
            return Err(CoreError::ConfigInvalid {
                message: "locator_timeout_secs must be at least 1".to_string(),
            });
        }
        if self.sql.dialects.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "sql.dialects cannot be empty".to_string(),
            });
        }
        if let Some(schema) = &self.sql.default_schema {
            if schema.trim().is_empty() {
                return Err(CoreError::ConfigInvalid {
                    message: "sql.default_schema cannot be blank".to_string(),
                });
            }
        }
        for (name, values) in &self.placeholders {
            if name.is_empty() || values.iter().any(|v| v.is_empty()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("placeholder '{}' has an empty name or value", name),
                });
            }
        }
        if self.mirror.listing_glob.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "mirror.listing_glob cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Resolve a configured path against the project root
    pub fn resolve(&self, root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
