//! Filename and identifier normalization shared by the dump and compare paths.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Stems that mark a file as a routine source file.
pub const ROUTINE_PREFIXES: &[&str] = &["SP_", "FN_"];

/// Fallback base name when normalization strips a routine name to nothing.
const FALLBACK_BASE: &str = "proc";

/// Characters that survive [`normalize_filename`] unchanged.
fn is_retained(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '(' | ')' | '.' | ',' | '-')
}

/// Reduce a routine name to a filesystem-safe base filename.
///
/// Runs of disallowed characters collapse to a single underscore, as do
/// runs of underscores themselves; leading and trailing underscores are
/// trimmed. A name with nothing left maps to a fixed fallback.
pub fn normalize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.trim().chars() {
        let mapped = if is_retained(c) { c } else { '_' };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        FALLBACK_BASE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Resolve a path under `dir` that does not exist yet.
///
/// Tries `base.ext`, then `base_2.ext` through `base_9999.ext`, and as a
/// last resort appends a short digest of the base name.
pub fn unique_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    let first = dir.join(format!("{base}{ext}"));
    if !first.exists() {
        return first;
    }

    for i in 2..10_000 {
        let candidate = dir.join(format!("{base}_{i}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
    }

    let digest = format!("{:x}", Sha256::digest(base.as_bytes()));
    dir.join(format!("{base}_{}{ext}", &digest[..10]))
}

/// Whether a path looks like a routine source file (`SP_*.sql` / `FN_*.sql`).
pub fn is_routine_file(path: &Path) -> bool {
    let sql = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("sql"));
    if !sql {
        return false;
    }

    match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) => {
            let stem = stem.to_uppercase();
            ROUTINE_PREFIXES.iter().any(|p| stem.starts_with(p))
        }
        None => false,
    }
}

/// Canonical routine identifier for a file.
///
/// `SP_REFRESH_FCT.sql` and `SP_REFRESH_FCT__abcd.sql` both map to
/// `SP_REFRESH_FCT`: the stem is upper-cased and any `__`-delimited
/// disambiguator is dropped.
pub fn normalize_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_uppercase();
    match stem.split_once("__") {
        Some((head, _)) => head.to_string(),
        None => stem,
    }
}
