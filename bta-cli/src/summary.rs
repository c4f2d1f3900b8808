//! Per-recording summaries and the batch report
//!
//! The report is the hand-off to downstream reporting tools: one summary per
//! analysed recording, the files that failed, and how many recordings landed
//! in each confidence level.

use std::io::Write;
use std::path::PathBuf;

use bta_common::recording::WINDOW_RADIUS;
use bta_common::{Channel, Confidence, Handedness, IndexedSample, Recording, ShotCandidate};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CliResult;

/// One located sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplePoint {
    pub index: usize,
    /// Raw magnitude (LSB)
    pub magnitude: f64,
    /// Magnitude in physical units
    pub magnitude_unit: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<IndexedSample> for SamplePoint {
    fn from(indexed: IndexedSample) -> Self {
        let sample = indexed.sample;
        Self {
            index: indexed.index,
            magnitude: sample.magnitude(),
            magnitude_unit: sample.magnitude_unit(),
            x: sample.x(),
            y: sample.y(),
            z: sample.z(),
        }
    }
}

/// Detector output with the magnitudes around it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotSummary {
    #[serde(flatten)]
    pub point: SamplePoint,
    pub confidence: Confidence,
    pub confidence_level: u8,
    /// Raw magnitudes at offsets -4..=4 (null outside the channel)
    pub window: [Option<f64>; 2 * WINDOW_RADIUS + 1],
}

impl ShotSummary {
    fn new(recording: &Recording, channel: Channel, candidate: ShotCandidate) -> Self {
        Self {
            point: candidate.sample.into(),
            confidence: candidate.confidence,
            confidence_level: candidate.confidence.level(),
            window: recording.magnitude_window(channel, candidate.index()),
        }
    }
}

/// Accelerometer peaks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakSummary {
    pub magnitude: SamplePoint,
    pub window: [Option<f64>; 2 * WINDOW_RADIUS + 1],
    pub abs_x: SamplePoint,
    pub abs_y: SamplePoint,
    pub abs_z: SamplePoint,
}

/// Summary of one analysed recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordingSummary {
    pub name: String,
    /// Accelerometer sample count
    pub samples: usize,
    pub handedness: Handedness,
    /// Calibration in physical units
    pub calibration: [f64; 3],
    pub calibration_recorded: bool,
    pub peak: PeakSummary,
    pub shot: ShotSummary,
    pub alt_shot: ShotSummary,
    /// High-g peak; its `window` is read from the accelerometer channel
    pub hig_shot: ShotSummary,
    /// High-g channel magnitudes around the high-g peak
    pub hig_window: [Option<f64>; 2 * WINDOW_RADIUS + 1],
}

impl RecordingSummary {
    pub fn from_recording(recording: &Recording) -> Self {
        let max_accel = recording.max_accel();
        let hig_shot = recording.hig_shot();

        Self {
            name: recording.name().to_string(),
            samples: recording.accel().len(),
            handedness: recording.handedness(),
            calibration: recording.calibration().unit_axes(),
            calibration_recorded: recording.calibration_recorded(),
            peak: PeakSummary {
                magnitude: max_accel.into(),
                window: recording.magnitude_window(Channel::Accel, max_accel.index),
                abs_x: recording.max_accel_x().into(),
                abs_y: recording.max_accel_y().into(),
                abs_z: recording.max_accel_z().into(),
            },
            shot: ShotSummary::new(recording, Channel::Accel, recording.shot()),
            alt_shot: ShotSummary::new(recording, Channel::Accel, recording.alt_shot()),
            hig_shot: ShotSummary::new(recording, Channel::Accel, hig_shot),
            hig_window: recording.magnitude_window(Channel::HiG, hig_shot.index()),
        }
    }
}

/// File that could not be analysed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedFile {
    pub file: PathBuf,
    pub error: String,
}

/// Number of recordings whose primary shot has a given confidence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceCount {
    pub confidence: Confidence,
    pub count: usize,
}

/// Result of one batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub generated_at: DateTime<Utc>,
    pub recordings: Vec<RecordingSummary>,
    pub failures: Vec<FailedFile>,
    /// Every confidence level, lowest first
    pub confidence_counts: Vec<ConfidenceCount>,
}

impl BatchReport {
    pub fn new(recordings: Vec<RecordingSummary>, failures: Vec<FailedFile>) -> Self {
        let confidence_counts = Confidence::ALL
            .iter()
            .map(|&confidence| ConfidenceCount {
                confidence,
                count: recordings
                    .iter()
                    .filter(|r| r.shot.confidence == confidence)
                    .count(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            recordings,
            failures,
            confidence_counts,
        }
    }

    /// Recordings whose primary shot has the given confidence
    pub fn ranked(&self, confidence: Confidence) -> impl Iterator<Item = &RecordingSummary> {
        self.recordings
            .iter()
            .filter(move |r| r.shot.confidence == confidence)
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json<W: Write>(&self, mut writer: W) -> CliResult<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
