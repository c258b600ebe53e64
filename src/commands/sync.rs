use anyhow::Result;
use colored::*;

use procsync::config::Config;
use procsync::sync::{DuplicatePolicy, SyncEngine, SyncStatus};

pub fn execute(config: &Config, on_duplicate: Option<DuplicatePolicy>, json: bool) -> Result<()> {
    let policy = on_duplicate.unwrap_or(config.sync.on_duplicate);
    let engine = SyncEngine::new(&config.sync.exclude, policy)?;
    let report = engine.run(&config.paths.snapshot_dir(), &config.paths.repo_root())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for item in &report.results {
        let status = match item.status {
            SyncStatus::Same => "SAME".green(),
            SyncStatus::TakenFromProd => "TAKEN FROM PROD".yellow(),
        };
        println!(
            "File: {}, Directory: {}, Status: {}",
            item.file_name,
            item.directory.display(),
            status
        );
    }

    let overwritten = report
        .results
        .iter()
        .filter(|r| r.status == SyncStatus::TakenFromProd)
        .count();
    println!(
        "\n{} compared, {} taken from prod, {} without a repo counterpart",
        report.results.len(),
        overwritten,
        report.unmatched
    );

    Ok(())
}
