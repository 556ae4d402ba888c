//! Saving a report and analyzing it later

use reach_bench::config::HarnessConfig;
use reach_bench::experiment::ExperimentRunner;
use reach_bench::report::{NoopObserver, Report, ReportEmitter};
use reach_bench::store::MemoryGraphStore;
use std::fs::{self, File};
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("reach-bench-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn run_report() -> Report {
    let store = MemoryGraphStore::builder()
        .edges([(1, 2), (2, 3), (3, 1)])
        .vertex(1, "Ada Lovelace")
        .vertex(2, "Alan Turing")
        .build()
        .unwrap();
    let config = HarnessConfig::builder()
        .explicit_seed_ids([1, 2])
        .depths([0, 1])
        .iterations_per_cell(2)
        .build()
        .unwrap();
    ExperimentRunner::new(&store, config)
        .unwrap()
        .run(&mut NoopObserver)
        .unwrap()
}

#[test]
fn test_saved_report_renders_summary() {
    let dir = scratch_dir("analyze");
    let report = run_report();
    let path = ReportEmitter::default_path(&dir, &report);
    ReportEmitter::write_json(&report, File::create(&path).unwrap()).unwrap();

    let loaded = Report::from_json_file(&path).unwrap();
    assert_eq!(loaded, report);

    let summary = ReportEmitter::render_summary(&loaded);
    assert!(summary.contains("Test Configuration:"));
    assert!(summary.contains("Total tests: 5"));
    assert!(summary.contains("Start points: 2"));
    assert!(summary.contains("maxDepth=0 (2 cells)"));
    assert!(summary.contains("2 start value(s)"));

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_latest_report_is_newest_by_name() {
    let dir = scratch_dir("latest");
    for name in [
        "reach_bench_results_20240101T000000Z.json",
        "reach_bench_results_20240301T120000Z.json",
        "reach_bench_results_20240215T093000Z.json",
        "reach_bench_results_20991231T000000Z.txt",
        "notes.json",
    ] {
        File::create(dir.join(name)).unwrap();
    }

    let latest = ReportEmitter::latest_in(&dir).unwrap();
    assert_eq!(
        latest,
        Some(dir.join("reach_bench_results_20240301T120000Z.json"))
    );

    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_no_saved_reports() {
    let dir = scratch_dir("empty");
    assert_eq!(ReportEmitter::latest_in(&dir).unwrap(), None);
    fs::remove_dir_all(dir).ok();
}

#[test]
fn test_missing_report_file() {
    let result = Report::from_json_file(scratch_dir("missing").join("nope.json"));
    assert!(matches!(result, Err(reach_bench::Error::Io(_))));
}
