use anyhow::Result;
use colored::*;

use procsync::config::Config;
use procsync::dump;
use procsync::warehouse::Warehouse;

pub fn execute(config: &Config, all_schemas: bool, json: bool) -> Result<()> {
    let url = config.warehouse.url()?;
    let catalog = &config.warehouse.database;
    let schema = if all_schemas {
        None
    } else {
        Some(config.warehouse.schema.as_str())
    };

    if !json {
        match schema {
            Some(schema) => println!(
                "{}",
                format!("\n❄️  Dumping routines from {catalog}.{schema}").bright_cyan()
            ),
            None => println!(
                "{}",
                format!("\n❄️  Dumping routines from {catalog} (all schemas)").bright_cyan()
            ),
        }
    }

    let mut warehouse = Warehouse::connect(&url)?;
    let records = warehouse.fetch_definitions(catalog, schema)?;

    let snapshot_dir = config.paths.snapshot_dir();
    dump::ensure_clean_dir(&snapshot_dir)?;
    let report = dump::write_definitions(&snapshot_dir, &records)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for name in &report.empty_definitions {
        println!("{} {} (empty definition)", "SKIP".yellow(), name);
    }
    println!("Found rows (incl. overloads): {}", report.found);
    println!(
        "{} {} saved, {} skipped → {}",
        "Done.".green(),
        report.saved,
        report.skipped,
        snapshot_dir.display()
    );

    Ok(())
}
