use anyhow::{bail, Context, Result};
use colored::*;
use std::fs;
use std::io::Read;
use std::path::Path;

use procsync::annotate::{Annotator, GitState};
use procsync::config::Config;
use procsync::{annotate, git};

pub fn execute(config: &Config, list: &Path, json: bool) -> Result<()> {
    let raw = if list == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read procedures list from stdin")?;
        buffer
    } else {
        fs::read_to_string(list)
            .with_context(|| format!("Failed to read procedures list {}", list.display()))?
    };

    let procedures = annotate::parse_procedure_list(&raw);
    if procedures.is_empty() {
        bail!("No 'SCHEMA NAME' pairs found in {}", list.display());
    }

    let repo_root = config.paths.repo_root();
    if !git::is_git_repo(&repo_root)? {
        bail!("{} is not a git repository", repo_root.display());
    }

    let records = Annotator::new(&repo_root).process(&procedures)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    for record in &records {
        match record.state {
            GitState::InGit => println!(
                "{}, {}, {}",
                record.file_name,
                record.state.to_string().green(),
                record.author
            ),
            GitState::NotInGit => println!(
                "{}, {}",
                record.file_name,
                record.state.to_string().red()
            ),
        }
    }

    Ok(())
}
