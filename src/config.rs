//! Run configuration: warehouse coordinates, directory layout, sync
//! rules. Everything the original operator scripts hard-coded lives in
//! a TOML file next to the working directory (or wherever `--config`
//! points), with the warehouse URL overridable from the environment so
//! credentials stay out of checkouts.

use crate::sync::{DuplicatePolicy, DEFAULT_EXCLUDES};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "procsync.toml";
pub const WAREHOUSE_URL_ENV: &str = "PROCSYNC_WAREHOUSE_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub warehouse: WarehouseConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WarehouseConfig {
    /// Connection URL. Prefer the environment variable for anything
    /// with credentials in it.
    #[serde(default)]
    pub url: Option<String>,
    /// Catalog whose information schema is dumped.
    pub database: String,
    /// Schema filter for dumps; `--all-schemas` bypasses it.
    pub schema: String,
}

impl WarehouseConfig {
    pub fn url(&self) -> Result<String> {
        if let Ok(url) = std::env::var(WAREHOUSE_URL_ENV) {
            if !url.is_empty() {
                return Ok(url);
            }
        }
        self.url.clone().ok_or_else(|| {
            anyhow!("No warehouse URL configured: set [warehouse].url or {WAREHOUSE_URL_ENV}")
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathsConfig {
    repo_root: String,
    snapshot_dir: String,
}

impl PathsConfig {
    pub fn repo_root(&self) -> PathBuf {
        expand(&self.repo_root)
    }

    pub fn snapshot_dir(&self) -> PathBuf {
        expand(&self.snapshot_dir)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Directory-name globs pruned from the repository-side search.
    pub exclude: Vec<String>,
    pub on_duplicate: DuplicatePolicy,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            exclude: DEFAULT_EXCLUDES.iter().map(|g| g.to_string()).collect(),
            on_duplicate: DuplicatePolicy::Error,
        }
    }
}

impl Config {
    /// Load from `explicit` when given, else `./procsync.toml`.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        Ok(config)
    }
}

fn expand(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_sync_defaults() {
        let raw = r#"
            [warehouse]
            database = "DWH"
            schema = "AIR_TEST"

            [paths]
            repo_root = "/tmp/dwh"
            snapshot_dir = "/tmp/dwh/save_from_warehouse"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.warehouse.database, "DWH");
        assert!(config.warehouse.url.is_none());
        assert_eq!(config.sync.on_duplicate, DuplicatePolicy::Error);
        assert!(!config.sync.exclude.is_empty());
    }

    #[test]
    fn parses_sync_overrides() {
        let raw = r#"
            [warehouse]
            database = "DWH"
            schema = "AIR_TEST"

            [paths]
            repo_root = "/tmp/dwh"
            snapshot_dir = "/tmp/snap"

            [sync]
            exclude = ["archive"]
            on_duplicate = "all"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.sync.exclude, vec!["archive"]);
        assert_eq!(config.sync.on_duplicate, DuplicatePolicy::All);
    }

    #[test]
    fn expands_tilde_in_paths() {
        let raw = r#"
            [warehouse]
            database = "DWH"
            schema = "AIR_TEST"

            [paths]
            repo_root = "~/dwh"
            snapshot_dir = "/tmp/snap"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert!(!config.paths.repo_root().to_string_lossy().contains('~'));
    }
}
