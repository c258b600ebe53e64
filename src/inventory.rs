//! Routine-name inventory of a directory tree, and the set diff between
//! two inventories.

use crate::naming::{is_routine_file, normalize_name};
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use walkdir::WalkDir;

/// Collect canonical routine names under `root`.
///
/// Files anywhere below `exclude` are ignored; everything else with a
/// routine-looking name contributes its normalized identifier. Duplicate
/// identifiers collapse (set semantics).
pub fn collect_names(root: &Path, exclude: Option<&Path>) -> Result<HashSet<String>> {
    let mut names = HashSet::new();

    for entry in WalkDir::new(root) {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if exclude.is_some_and(|excluded| path.starts_with(excluded)) {
            continue;
        }
        if is_routine_file(path) {
            names.insert(normalize_name(path));
        }
    }

    Ok(names)
}

/// Three-way partition of two name sets, each part sorted for display.
#[derive(Debug, Serialize)]
pub struct NameDiff {
    pub in_both: Vec<String>,
    pub only_left: Vec<String>,
    pub only_right: Vec<String>,
}

pub fn compare_names(left: &HashSet<String>, right: &HashSet<String>) -> NameDiff {
    let mut in_both: Vec<String> = left.intersection(right).cloned().collect();
    let mut only_left: Vec<String> = left.difference(right).cloned().collect();
    let mut only_right: Vec<String> = right.difference(left).cloned().collect();
    in_both.sort();
    only_left.sort();
    only_right.sort();

    NameDiff {
        in_both,
        only_left,
        only_right,
    }
}
