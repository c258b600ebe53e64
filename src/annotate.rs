//! Prepends a provenance header to routine files tracked in the
//! repository: last committing author from blame, an activity
//! classification derived from the name, and an execution example.

use crate::activity;
use crate::git;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GitState {
    InGit,
    NotInGit,
}

impl fmt::Display for GitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GitState::InGit => write!(f, "IN GIT"),
            GitState::NotInGit => write!(f, "NOT IN GIT"),
        }
    }
}

/// One processed routine, reported and discarded.
#[derive(Debug, Serialize)]
pub struct AnnotationRecord {
    pub file_name: String,
    pub state: GitState,
    pub author: String,
}

/// Parse a procedures list: one `SCHEMA NAME` pair per line, whitespace
/// separated. Blank and malformed lines are skipped.
pub fn parse_procedure_list(raw: &str) -> Vec<(String, String)> {
    raw.lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(schema), Some(name), None) => {
                    Some((schema.to_string(), name.to_string()))
                }
                _ => None,
            }
        })
        .collect()
}

/// Depth-first search for a file whose stem equals `name` exactly,
/// skipping `.git`. First hit wins.
pub fn find_routine_file(root: &Path, name: &str) -> Result<Option<PathBuf>> {
    let entries =
        fs::read_dir(root).with_context(|| format!("Failed to read {}", root.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read {}", root.display()))?;
        let path = entry.path();
        if path.is_file() {
            if path.file_stem().and_then(|s| s.to_str()) == Some(name) {
                return Ok(Some(path));
            }
        } else if path.is_dir() {
            if path.file_name().and_then(|n| n.to_str()) == Some(".git") {
                continue;
            }
            if let Some(found) = find_routine_file(&path, name)? {
                return Ok(Some(found));
            }
        }
    }
    Ok(None)
}

/// House style for author names written by old tooling in all-lowercase:
/// uppercase exactly the first two characters, nothing else. Mixed-case
/// names pass through untouched.
fn apply_author_house_style(author: &str) -> String {
    let has_cased = author
        .chars()
        .any(|c| c.is_lowercase() || c.is_uppercase());
    let any_upper = author.chars().any(|c| c.is_uppercase());
    if !has_cased || any_upper {
        return author.to_string();
    }

    author
        .chars()
        .enumerate()
        .flat_map(|(i, c)| {
            let mapped: Vec<char> = if i < 2 {
                c.to_uppercase().collect()
            } else {
                vec![c]
            };
            mapped
        })
        .collect()
}

fn comment_block(
    project_name: &str,
    relative_dir: &Path,
    file_stem: &str,
    author: &str,
    schema: &str,
) -> String {
    let activity = activity::classify(file_stem);
    let execution_example = if file_stem.starts_with("FN_") {
        format!("SELECT * FROM TABLE({file_stem}()) AS my_table;")
    } else {
        format!("CALL {file_stem}();")
    };
    let url = format!("{project_name}{MAIN_SEPARATOR}{}", relative_dir.display());

    format!(
        "/*===============================================================================
URL..................: {url}
Activity.............: {activity}
Description..........:
Owner................: {author}

Execution Example....:
   SET SCHEMA {schema};
   SET PATH = ADMIN, {schema};
   {execution_example}
===============================================================================*/"
    )
}

pub struct Annotator {
    root: PathBuf,
    project_name: String,
}

impl Annotator {
    pub fn new(root: &Path) -> Self {
        let project_name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self {
            root: root.to_path_buf(),
            project_name,
        }
    }

    /// Annotate every `(schema, name)` pair that resolves to a file.
    /// Missing files become NOT_IN_GIT records, not errors.
    pub fn process(&self, procedures: &[(String, String)]) -> Result<Vec<AnnotationRecord>> {
        let mut records = Vec::new();

        for (schema, name) in procedures {
            match find_routine_file(&self.root, name)? {
                Some(file) => {
                    let author = self.annotate_file(&file, name, schema)?;
                    records.push(AnnotationRecord {
                        file_name: name.clone(),
                        state: GitState::InGit,
                        author,
                    });
                }
                None => records.push(AnnotationRecord {
                    file_name: name.clone(),
                    state: GitState::NotInGit,
                    author: String::new(),
                }),
            }
        }

        Ok(records)
    }

    /// Blame, build the header, rewrite the file in place. Returns the
    /// (house-styled) author name.
    fn annotate_file(&self, file: &Path, name: &str, schema: &str) -> Result<String> {
        let author = apply_author_house_style(&git::blame_first_line_author(&self.root, file)?);

        let relative_dir = file
            .parent()
            .and_then(|parent| parent.strip_prefix(&self.root).ok())
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let block = comment_block(&self.project_name, relative_dir, name, &author, schema);

        let original = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        fs::write(file, format!("{block}\n{original}"))
            .with_context(|| format!("Failed to rewrite {}", file.display()))?;

        Ok(author)
    }
}
