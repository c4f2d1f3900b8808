//! Recording assembly
//!
//! A [`Recording`] is built once from a decoded record batch in three phases:
//! 1. Partition records into channels, apply the calibration fallback
//! 2. Extract per-channel maxima
//! 3. Run both detectors and settle the primary shot
//!
//! Every field is set by the time construction returns; there is no
//! mutation API afterward.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::maxima::Maxima;
use crate::params::AnalysisParameters;
use crate::record::{self, decode_compressed, Record};
use crate::sample::{Channel, ChannelKind, IndexedSample, Sample};
use crate::shot::{demote_ambiguous, Confidence, HiGDetector, ShotCandidate, ShotDetector};

/// Offsets either side of a sample covered by [`Recording::magnitude_window`]
pub const WINDOW_RADIUS: usize = 4;

/// Archer handedness the device was mounted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    /// Decode the settings record value (1 = left, anything else = right)
    pub fn from_code(code: i64) -> Self {
        if code == 1 {
            Handedness::Left
        } else {
            Handedness::Right
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Handedness::Right => 0,
            Handedness::Left => 1,
        }
    }

    /// Calibration used when a log carries none
    ///
    /// Values are already in g and are not converted again.
    pub fn default_calibration(&self) -> Sample {
        let axes = match self {
            Handedness::Left => [0.280273, -0.979248, 0.011719],
            Handedness::Right => [-0.280273, -0.979248, -0.011719],
        };
        Sample::prescaled(ChannelKind::Calibration, axes)
    }
}

/// Channels after partitioning, before calibration fallback
#[derive(Debug, Default)]
struct Partition {
    gyro: Vec<Sample>,
    accel: Vec<Sample>,
    hig: Vec<Sample>,
    calibration: Option<Sample>,
    handedness: Handedness,
}

impl Partition {
    fn from_records(records: &[Record]) -> Self {
        let mut partition = Self::default();

        for record in records {
            match *record {
                Record::Gyro(axes) => partition.gyro.push(Sample::new(ChannelKind::Gyro, axes)),
                Record::Accel(axes) => partition.accel.push(Sample::new(ChannelKind::Accel, axes)),
                Record::HiG(axes) => partition.hig.push(Sample::new(ChannelKind::HiG, axes)),
                Record::Calibration(axes) => {
                    partition.calibration = Some(Sample::new(ChannelKind::Calibration, axes));
                }
                Record::Settings(handedness) => partition.handedness = handedness,
                Record::HiGCompressed(packed) => {
                    for axes in decode_compressed(packed) {
                        partition.hig.push(Sample::new(ChannelKind::HiG, axes));
                    }
                }
            }
        }

        partition
    }
}

/// Detector outputs of one recording
#[derive(Debug, Clone, Copy)]
struct Shots {
    shot: ShotCandidate,
    alt_shot: ShotCandidate,
    hig_shot: ShotCandidate,
}

impl Shots {
    fn detect(
        accel: &[Sample],
        maxima: &Maxima,
        params: &AnalysisParameters,
    ) -> Result<Self> {
        let detector = ShotDetector::new().with_thresholds(params.shot)?;
        let hig_detector = HiGDetector::new().with_thresholds(params.hig)?;

        let primary = detector.detect(accel, 0)?;
        let alt_offset = primary.index().saturating_add(params.shot_separation);
        let alt_shot = detector.detect(accel, alt_offset)?;

        let mut shot = demote_ambiguous(primary, &alt_shot);
        if shot.confidence != primary.confidence {
            tracing::debug!(
                shot_index = shot.index(),
                alt_index = alt_shot.index(),
                "Primary shot demoted by stronger alternate"
            );
        }

        // A missed shot falls back to the accelerometer peak
        if shot.confidence == Confidence::NoShot {
            shot = ShotCandidate::new(maxima.accel, Confidence::NoShot);
        }

        Ok(Self {
            shot,
            alt_shot,
            hig_shot: hig_detector.classify_peak(maxima.hig),
        })
    }
}

/// One analysed sensor log
#[derive(Debug, Clone)]
pub struct Recording {
    name: String,
    gyro: Vec<Sample>,
    accel: Vec<Sample>,
    hig: Vec<Sample>,
    calibration: Sample,
    calibration_recorded: bool,
    handedness: Handedness,
    maxima: Maxima,
    shots: Shots,
}

impl Recording {
    /// Build a recording with default analysis parameters
    pub fn from_records(name: impl Into<String>, records: &[Record]) -> Result<Self> {
        Self::from_records_with(name, records, &AnalysisParameters::default())
    }

    /// Build a recording from a decoded record batch
    ///
    /// Fails with [`Error::EmptyChannel`] if any of the three channels has no
    /// samples, or [`Error::Config`] if `params` are invalid.
    pub fn from_records_with(
        name: impl Into<String>,
        records: &[Record],
        params: &AnalysisParameters,
    ) -> Result<Self> {
        let name = name.into();

        let partition = Partition::from_records(records);
        let calibration_recorded = partition.calibration.is_some();
        let calibration = partition
            .calibration
            .unwrap_or_else(|| partition.handedness.default_calibration());

        tracing::debug!(
            recording = %name,
            gyro = partition.gyro.len(),
            accel = partition.accel.len(),
            hig = partition.hig.len(),
            handedness = ?partition.handedness,
            calibration_recorded,
            "Records partitioned"
        );

        let maxima = Maxima::analyze(&partition.gyro, &partition.accel, &partition.hig)?;
        let shots = Shots::detect(&partition.accel, &maxima, params)?;

        tracing::debug!(
            recording = %name,
            shot_index = shots.shot.index(),
            shot_confidence = %shots.shot.confidence,
            alt_index = shots.alt_shot.index(),
            alt_confidence = %shots.alt_shot.confidence,
            hig_index = shots.hig_shot.index(),
            hig_confidence = %shots.hig_shot.confidence,
            "Shot detection complete"
        );

        Ok(Self {
            name,
            gyro: partition.gyro,
            accel: partition.accel,
            hig: partition.hig,
            calibration,
            calibration_recorded,
            handedness: partition.handedness,
            maxima,
            shots,
        })
    }

    /// Read and analyse a recording file with default parameters
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_file_with(path, &AnalysisParameters::default())
    }

    /// Read and analyse a recording file
    ///
    /// The recording is named after the file stem. A malformed line fails the
    /// whole file with [`Error::Unreadable`].
    pub fn from_file_with(path: &Path, params: &AnalysisParameters) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::FileIo {
            file: path.to_path_buf(),
            source,
        })?;

        let records = record::parse_records(&text).map_err(|source| Error::Unreadable {
            file: path.to_path_buf(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self::from_records_with(name, &records, params)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gyro(&self) -> &[Sample] {
        &self.gyro
    }

    pub fn accel(&self) -> &[Sample] {
        &self.accel
    }

    pub fn hig(&self) -> &[Sample] {
        &self.hig
    }

    pub fn channel(&self, channel: Channel) -> &[Sample] {
        match channel {
            Channel::Gyro => &self.gyro,
            Channel::Accel => &self.accel,
            Channel::HiG => &self.hig,
        }
    }

    pub fn calibration(&self) -> &Sample {
        &self.calibration
    }

    /// Whether the calibration came from the log rather than the default
    pub fn calibration_recorded(&self) -> bool {
        self.calibration_recorded
    }

    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    pub fn maxima(&self) -> &Maxima {
        &self.maxima
    }

    pub fn max_gyro(&self) -> IndexedSample {
        self.maxima.gyro
    }

    pub fn max_accel(&self) -> IndexedSample {
        self.maxima.accel
    }

    pub fn max_hig(&self) -> IndexedSample {
        self.maxima.hig
    }

    pub fn max_accel_x(&self) -> IndexedSample {
        self.maxima.accel_x
    }

    pub fn max_accel_y(&self) -> IndexedSample {
        self.maxima.accel_y
    }

    pub fn max_accel_z(&self) -> IndexedSample {
        self.maxima.accel_z
    }

    /// Settled primary shot
    pub fn shot(&self) -> ShotCandidate {
        self.shots.shot
    }

    /// Alternate shot found past the primary
    pub fn alt_shot(&self) -> ShotCandidate {
        self.shots.alt_shot
    }

    pub fn hig_shot(&self) -> ShotCandidate {
        self.shots.hig_shot
    }

    /// Raw axes of `channel[start..end]`
    ///
    /// `end` defaults to the channel length and is clamped to it. An empty
    /// list is returned when `start >= end`.
    pub fn axis_range(&self, channel: Channel, start: usize, end: Option<usize>) -> Vec<[f64; 3]> {
        let samples = self.channel(channel);
        let end = end.map_or(samples.len(), |e| e.min(samples.len()));
        if start >= end {
            return Vec::new();
        }
        samples[start..end].iter().map(Sample::axes).collect()
    }

    pub fn gyro_range(&self, start: usize, end: Option<usize>) -> Vec<[f64; 3]> {
        self.axis_range(Channel::Gyro, start, end)
    }

    pub fn accel_range(&self, start: usize, end: Option<usize>) -> Vec<[f64; 3]> {
        self.axis_range(Channel::Accel, start, end)
    }

    pub fn hig_range(&self, start: usize, end: Option<usize>) -> Vec<[f64; 3]> {
        self.axis_range(Channel::HiG, start, end)
    }

    /// Raw magnitudes at offsets -4..=4 around `center`
    pub fn magnitude_window(&self, channel: Channel, center: usize) -> [Option<f64>; 2 * WINDOW_RADIUS + 1] {
        let samples = self.channel(channel);
        let mut window = [None; 2 * WINDOW_RADIUS + 1];

        for (slot, value) in window.iter_mut().enumerate() {
            *value = (center + slot)
                .checked_sub(WINDOW_RADIUS)
                .and_then(|i| samples.get(i))
                .map(Sample::magnitude);
        }

        window
    }

    /// Records for a trimmed copy of this recording
    ///
    /// Accel and gyro are cut to `[start, end)`. When `end` is `None` or
    /// exactly the accel length, gyro runs to its own end; any other `end`
    /// cuts gyro too. All high-g samples and the handedness setting follow.
    /// The calibration line is written only if the log carried one, so a
    /// reloaded copy falls back to the same default.
    pub fn records_window(&self, start: usize, end: Option<usize>) -> Vec<Record> {
        let accel_end = end.map_or(self.accel.len(), |e| e.min(self.accel.len()));
        let gyro_end = match end {
            Some(e) if e != self.accel.len() => e.min(self.gyro.len()),
            _ => self.gyro.len(),
        };

        let mut records = Vec::new();
        records.extend(
            self.accel_range(start, Some(accel_end))
                .into_iter()
                .map(Record::Accel),
        );
        records.extend(
            self.gyro_range(start, Some(gyro_end))
                .into_iter()
                .map(Record::Gyro),
        );
        records.extend(self.hig.iter().map(|s| Record::HiG(s.axes())));
        if self.calibration_recorded {
            records.push(Record::Calibration(self.calibration.axes()));
        }
        records.push(Record::Settings(self.handedness));
        records
    }
}
