use anyhow::Result;
use colored::*;

use procsync::config::Config;
use procsync::inventory;

pub fn execute(config: &Config, json: bool) -> Result<()> {
    let snapshot_dir = config.paths.snapshot_dir();
    let repo_root = config.paths.repo_root();

    let snapshot_names = inventory::collect_names(&snapshot_dir, None)?;
    let repo_names = inventory::collect_names(&repo_root, Some(&snapshot_dir))?;
    let diff = inventory::compare_names(&snapshot_names, &repo_names);

    if json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
        return Ok(());
    }

    print_table("✅ In both (repo & snapshot)", &diff.in_both);
    print_table("❄️ Only in snapshot (not in repo)", &diff.only_left);
    print_table("❌ Only in repo (not in snapshot)", &diff.only_right);

    println!("\nSummary");
    println!("-------");
    println!("Snapshot: {}", snapshot_names.len());
    println!("Repo:     {}", repo_names.len());
    println!("Both:     {}", diff.in_both.len());

    Ok(())
}

fn print_table(title: &str, rows: &[String]) {
    println!("\n{}", title.bold());
    println!("{}", "-".repeat(title.chars().count()));
    if rows.is_empty() {
        println!("(empty)");
        return;
    }
    for row in rows {
        println!("{row}");
    }
}
