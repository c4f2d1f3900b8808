//! Trimmed copies of recordings
//!
//! A trimmed copy keeps `radius` accelerometer and gyro samples either side
//! of the primary shot, plus all high-g samples, the calibration and the
//! handedness setting. The copy is itself a valid recording log.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use bta_common::Recording;

/// Write `<dir>/<name>.csv` around the primary shot, returning its path
pub fn write_trimmed(recording: &Recording, dir: &Path, radius: usize) -> io::Result<PathBuf> {
    let index = recording.shot().index();
    let start = index.saturating_sub(radius);
    let end = index.saturating_add(radius).saturating_add(1);

    fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.csv", recording.name()));

    let mut writer = BufWriter::new(File::create(&path)?);
    for record in recording.records_window(start, Some(end)) {
        writeln!(writer, "{}", record)?;
    }
    writer.flush()?;

    tracing::debug!(
        recording = %recording.name(),
        start,
        end,
        path = %path.display(),
        "Trimmed copy written"
    );
    Ok(path)
}
