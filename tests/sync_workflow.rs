//! End-to-end run over a fixture tree: write a snapshot the way `dump`
//! does, inventory both sides, then sync the differences back into the
//! repository.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use procsync::dump::{ensure_clean_dir, write_definitions};
use procsync::inventory::{collect_names, compare_names};
use procsync::sync::{DuplicatePolicy, SyncEngine, SyncStatus, DEFAULT_EXCLUDES};
use procsync::warehouse::ProcedureRecord;

fn record(name: &str, definition: &str) -> ProcedureRecord {
    ProcedureRecord {
        catalog: "DWH".to_string(),
        schema: "AIR_TEST".to_string(),
        name: name.to_string(),
        definition: definition.to_string(),
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn dump_compare_sync_round() {
    let scratch = tempfile::tempdir().unwrap();
    let repo = scratch.path().join("dwh");
    let snapshot = repo.join("save_from_warehouse");

    // Repository checkout: one stale routine, one current, one that the
    // warehouse no longer has.
    write(
        &repo.join("etl/SP_LOAD_FCT.sql"),
        "-- DWH.AIR_TEST.SP_LOAD_FCT\n\nBEGIN\nSELECT 1;\nEND;",
    );
    write(
        &repo.join("api/SP_GET_BALANCE.sql"),
        "-- DWH.AIR_TEST.SP_GET_BALANCE\n\nBEGIN\nSELECT b FROM t;\nEND;",
    );
    write(&repo.join("api/SP_RETIRED.sql"), "BEGIN END;");

    // Warehouse snapshot: SP_LOAD_FCT changed, SP_GET_BALANCE differs
    // only by comment, SP_BRAND_NEW has no repo counterpart.
    ensure_clean_dir(&snapshot).unwrap();
    let report = write_definitions(
        &snapshot,
        &[
            record("SP_LOAD_FCT", "BEGIN\nSELECT 2;\nEND;"),
            record(
                "SP_GET_BALANCE",
                "BEGIN\n-- refreshed by deploy\nSELECT b FROM t;\nEND;",
            ),
            record("SP_BRAND_NEW", "BEGIN END;"),
        ],
    )
    .unwrap();
    assert_eq!(report.saved, 3);

    // Name inventory agrees on the overlap.
    let snapshot_names = collect_names(&snapshot, None).unwrap();
    let repo_names = collect_names(&repo, Some(&snapshot)).unwrap();
    let diff = compare_names(&snapshot_names, &repo_names);
    assert_eq!(diff.in_both, vec!["SP_GET_BALANCE", "SP_LOAD_FCT"]);
    assert_eq!(diff.only_left, vec!["SP_BRAND_NEW"]);
    assert_eq!(diff.only_right, vec!["SP_RETIRED"]);

    // Sync overwrites only the real difference.
    let excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|g| g.to_string()).collect();
    let engine = SyncEngine::new(&excludes, DuplicatePolicy::Error).unwrap();
    let report = engine.run(&snapshot, &repo).unwrap();

    let statuses: HashSet<(String, SyncStatus)> = report
        .results
        .iter()
        .map(|r| (r.file_name.clone(), r.status))
        .collect();
    assert!(statuses.contains(&("SP_LOAD_FCT.sql".to_string(), SyncStatus::TakenFromProd)));
    assert!(statuses.contains(&("SP_GET_BALANCE.sql".to_string(), SyncStatus::Same)));

    // The overwritten file now carries the snapshot bytes, header included.
    let loaded = fs::read_to_string(repo.join("etl/SP_LOAD_FCT.sql")).unwrap();
    assert_eq!(loaded, "-- DWH.AIR_TEST.SP_LOAD_FCT\n\nBEGIN\nSELECT 2;\nEND;");

    // Comment-only drift leaves the repository copy alone.
    let balance = fs::read_to_string(repo.join("api/SP_GET_BALANCE.sql")).unwrap();
    assert!(!balance.contains("refreshed by deploy"));

    // The unmatched routine was never copied in.
    assert_eq!(report.unmatched, 1);
    assert!(collect_names(&repo, Some(&snapshot))
        .unwrap()
        .eq(&repo_names));
}
