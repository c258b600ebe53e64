//! Overwrites repository routine files whose production snapshot
//! counterparts differ in canonical form.
//!
//! The sync is asymmetric on purpose: an existing repository file can be
//! overwritten, but a snapshot file with no same-named counterpart is
//! never copied in. Placing new routines in the repository is an
//! editorial decision, not a sync concern.

use crate::canonical::Canonicalizer;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory-name globs excluded from the repository-side search.
/// Matched per path component, case-insensitively.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "*_not_found*",
    "*_unused*",
    "bkp_*",
    "release*",
    "save_from_*",
    "old",
    "not_used",
    "activate quarter",
    "musor*",
];

/// What to do when one snapshot file matches several repository files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Abort the run naming the colliding paths.
    Error,
    /// Compare and overwrite every match independently.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Same,
    TakenFromProd,
}

/// One compared pair, reported and discarded.
#[derive(Debug, Serialize)]
pub struct FileComparison {
    pub file_name: String,
    pub directory: PathBuf,
    pub status: SyncStatus,
}

#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub results: Vec<FileComparison>,
    /// Snapshot files with no same-named counterpart anywhere in the
    /// repository tree. Never copied in; counted so the asymmetry is
    /// visible.
    pub unmatched: usize,
}

/// Compiled per-component exclusion rules.
pub struct ExcludeRules {
    patterns: Vec<Pattern>,
}

impl ExcludeRules {
    pub fn new(globs: &[String]) -> Result<Self> {
        let patterns = globs
            .iter()
            .map(|g| Pattern::new(g).with_context(|| format!("Invalid exclude pattern '{g}'")))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// A path is excluded when any of its components matches any rule.
    fn is_excluded(&self, relative: &Path) -> bool {
        let options = MatchOptions {
            case_sensitive: false,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        relative.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            self.patterns
                .iter()
                .any(|pattern| pattern.matches_with(&name, options))
        })
    }
}

pub struct SyncEngine {
    canonicalizer: Canonicalizer,
    excludes: ExcludeRules,
    policy: DuplicatePolicy,
}

impl SyncEngine {
    pub fn new(exclude_globs: &[String], policy: DuplicatePolicy) -> Result<Self> {
        Ok(Self {
            canonicalizer: Canonicalizer::new()?,
            excludes: ExcludeRules::new(exclude_globs)?,
            policy,
        })
    }

    /// Compare every file under `snapshot_dir` against its same-named
    /// counterparts under `repo_root`, overwriting counterparts that
    /// differ in canonical form.
    pub fn run(&self, snapshot_dir: &Path, repo_root: &Path) -> Result<SyncReport> {
        let index = self.index_repo(repo_root)?;
        let mut results = Vec::new();
        let mut unmatched = 0;

        for entry in WalkDir::new(snapshot_dir).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("Failed to walk {}", snapshot_dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let snapshot_path = entry.path();
            let file_name = entry.file_name().to_string_lossy().to_string();

            let Some(matches) = index.get(&file_name.to_lowercase()) else {
                unmatched += 1;
                continue;
            };

            if matches.len() > 1 && self.policy == DuplicatePolicy::Error {
                let listing: Vec<String> =
                    matches.iter().map(|p| p.display().to_string()).collect();
                bail!(
                    "Ambiguous sync target for '{}': matches {}",
                    file_name,
                    listing.join(", ")
                );
            }

            for repo_path in matches {
                results.push(self.compare_pair(snapshot_path, repo_path)?);
            }
        }

        Ok(SyncReport { results, unmatched })
    }

    fn compare_pair(&self, snapshot_path: &Path, repo_path: &Path) -> Result<FileComparison> {
        let file_name = repo_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let directory = repo_path.parent().unwrap_or(repo_path).to_path_buf();

        let new_form = self.canonicalizer.read_canonical(snapshot_path);
        let old_form = self.canonicalizer.read_canonical(repo_path);

        let status = if new_form != old_form {
            fs::copy(snapshot_path, repo_path).with_context(|| {
                format!(
                    "Failed to overwrite {} with {}",
                    repo_path.display(),
                    snapshot_path.display()
                )
            })?;
            SyncStatus::TakenFromProd
        } else {
            SyncStatus::Same
        };

        Ok(FileComparison {
            file_name,
            directory,
            status,
        })
    }

    /// Index the repository tree by lower-cased file name, pruning
    /// excluded directories whole.
    fn index_repo(&self, repo_root: &Path) -> Result<BTreeMap<String, Vec<PathBuf>>> {
        let mut index: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

        let walker = WalkDir::new(repo_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if !entry.file_type().is_dir() {
                    return true;
                }
                let relative = entry.path().strip_prefix(repo_root).unwrap_or(entry.path());
                !self.excludes.is_excluded(relative)
            });

        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {}", repo_root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let key = entry.file_name().to_string_lossy().to_lowercase();
            index.entry(key).or_default().push(entry.path().to_path_buf());
        }

        Ok(index)
    }
}
