//! Folder-level batch tests
//!
//! Builds a scratch folder of recordings (good, broken, hidden, non-log and
//! nested) and runs the scanner and batch processor over it.

use std::fs;
use std::path::{Path, PathBuf};

use bta_cli::batch::{BatchProcessor, TrimExport};
use bta_cli::scanner::{find_recordings, ScanError};
use bta_common::{AnalysisParameters, Confidence, Recording};
use tempfile::TempDir;

/// Helper: a log with one accelerometer spike at index 10
fn log_text(spike: i64) -> String {
    let mut text = String::from("5, 0, 0, 0\n4, 1148, -4011, 48\n");
    for i in 0..30 {
        let z = if i == 10 { spike } else { 4096 };
        text.push_str(&format!("2, 100, -100, {}\n", z));
        text.push_str(&format!("1, {}, 0, 0\n", i));
    }
    text.push_str(&format!("7, {}, 0, 0\n", 70 * 256 + 20));
    text
}

fn write(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// Helper: the scratch folder
fn recording_folder() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write(&root.join("a_strong.csv"), &log_text(42000));
    write(&root.join("b_medium.CSV"), &log_text(31000));
    write(&root.join("c_broken.csv"), "2, 1, 2, x\n");
    write(&root.join("notes.txt"), "not a log\n");
    write(&root.join(".hidden.csv"), &log_text(42000));
    write(&root.join(".cache").join("d.csv"), &log_text(42000));
    write(&root.join("day2").join("e_low.csv"), &log_text(23000));
    dir
}

fn names(files: &[PathBuf]) -> Vec<String> {
    files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_scan_top_level_only() {
    let dir = recording_folder();
    let files = find_recordings(dir.path(), false).unwrap();
    assert_eq!(names(&files), vec!["a_strong.csv", "b_medium.CSV", "c_broken.csv"]);
}

#[test]
fn test_scan_recursive_skips_hidden() {
    let dir = recording_folder();
    let files = find_recordings(dir.path(), true).unwrap();
    assert_eq!(
        names(&files),
        vec!["a_strong.csv", "b_medium.CSV", "c_broken.csv", "e_low.csv"]
    );
}

#[test]
fn test_scan_file_root_rejected() {
    let dir = recording_folder();
    let result = find_recordings(&dir.path().join("notes.txt"), false);
    assert!(matches!(result, Err(ScanError::NotADirectory(_))));
}

#[test]
fn test_batch_report() {
    let dir = recording_folder();
    let files = find_recordings(dir.path(), true).unwrap();
    let report = BatchProcessor::new(AnalysisParameters::default()).process(&files);

    let analysed: Vec<&str> = report.recordings.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(analysed, vec!["a_strong", "b_medium", "e_low"]);

    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].file.ends_with("c_broken.csv"));

    let strong = &report.recordings[0];
    assert_eq!(strong.shot.point.index, 10);
    assert_eq!(strong.shot.confidence, Confidence::VeryHigh);
    assert!(strong.calibration_recorded);
    assert_eq!(strong.calibration, [1148.0 / 4096.0, -4011.0 / 4096.0, 48.0 / 4096.0]);
    // Compressed (20, 70, 0), (0, 0, 0): peak ~56.9 g
    assert_eq!(strong.hig_shot.point.index, 0);
    assert_eq!(strong.hig_shot.confidence, Confidence::VeryHigh);

    let count = |c: Confidence| {
        report
            .confidence_counts
            .iter()
            .find(|cc| cc.confidence == c)
            .map(|cc| cc.count)
            .unwrap()
    };
    assert_eq!(count(Confidence::VeryHigh), 1);
    assert_eq!(count(Confidence::Medium), 1);
    assert_eq!(count(Confidence::Low), 1);
    assert_eq!(count(Confidence::NoShot), 0);
}

#[test]
fn test_trim_export_writes_reloadable_copies() {
    let dir = recording_folder();
    let out = TempDir::new().unwrap();
    let files = find_recordings(dir.path(), false).unwrap();

    let report = BatchProcessor::new(AnalysisParameters::default())
        .with_trim_export(TrimExport {
            dir: out.path().to_path_buf(),
            radius: 3,
        })
        .process(&files);
    assert_eq!(report.recordings.len(), 2);

    let trimmed = Recording::from_file(&out.path().join("a_strong.csv")).unwrap();
    assert_eq!(trimmed.accel().len(), 7);
    assert_eq!(trimmed.shot().index(), 3);
    assert_eq!(trimmed.shot().confidence, Confidence::VeryHigh);
    assert!(trimmed.calibration_recorded());
    assert_eq!(trimmed.calibration().axes(), [1148.0, -4011.0, 48.0]);
    assert!(!out.path().join("c_broken.csv").exists());
}
