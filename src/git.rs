//! Low-level git operations
//!
//! Everything goes through the `git` binary; the repository is only ever
//! read (blame, metadata), never committed to.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Check if `root` is inside a git working tree.
pub fn is_git_repo(root: &Path) -> Result<bool> {
    let output = Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .current_dir(root)
        .output()
        .context("Failed to check if directory is a git repository")?;

    Ok(output.status.success())
}

/// Author attributed to the first line of `file` at the branch tip.
pub fn blame_first_line_author(root: &Path, file: &Path) -> Result<String> {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let output = Command::new("git")
        .args(["blame", "--porcelain", "-L", "1,1", "HEAD", "--"])
        .arg(relative)
        .current_dir(root)
        .output()
        .context("Failed to run git blame")?;

    if !output.status.success() {
        bail!(
            "git blame failed for {}: {}",
            relative.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(author) = line.strip_prefix("author ") {
            return Ok(author.trim().to_string());
        }
    }

    bail!("git blame returned no author for {}", relative.display())
}
