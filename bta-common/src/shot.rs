//! Shot release detection
//!
//! Two independent detectors:
//! - [`ShotDetector`] scans the accelerometer channel for the first sample
//!   that climbs a threshold ladder, with a consecutive-pair rule for the
//!   lowest tier.
//! - [`HiGDetector`] takes the global high-g peak and grades it on its own
//!   ladder in physical units.
//!
//! [`demote_ambiguous`] settles a primary shot against an alternate shot found
//! further along the same channel.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::maxima::{find_max, Statistic};
use crate::params::{HiGThresholds, ShotThresholds};
use crate::sample::{Channel, IndexedSample, Sample};

/// Detection certainty, ordered from no shot to very high
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Confidence {
    #[default]
    NoShot,
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Confidence {
    /// All levels, lowest first
    pub const ALL: [Confidence; 6] = [
        Confidence::NoShot,
        Confidence::VeryLow,
        Confidence::Low,
        Confidence::Medium,
        Confidence::High,
        Confidence::VeryHigh,
    ];

    /// Numeric level (0 = no shot, 5 = very high)
    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::NoShot => "No Shot",
            Confidence::VeryLow => "Very Low",
            Confidence::Low => "Low",
            Confidence::Medium => "Medium",
            Confidence::High => "High",
            Confidence::VeryHigh => "Very High",
        }
    }

    pub fn is_shot(&self) -> bool {
        *self != Confidence::NoShot
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected (or placeholder) shot position with its confidence
///
/// A `NoShot` candidate points at a placeholder sample; check the confidence
/// before trusting the index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotCandidate {
    pub sample: IndexedSample,
    pub confidence: Confidence,
}

impl ShotCandidate {
    pub fn new(sample: IndexedSample, confidence: Confidence) -> Self {
        Self { sample, confidence }
    }

    /// `NoShot` candidate at index 0 of the channel
    pub fn placeholder(first: Sample) -> Self {
        Self::new(IndexedSample::new(first, 0), Confidence::NoShot)
    }

    pub fn index(&self) -> usize {
        self.sample.index
    }

    /// Raw magnitude of the candidate sample
    pub fn magnitude(&self) -> f64 {
        self.sample.sample.magnitude()
    }
}

/// Accelerometer shot detector
#[derive(Debug, Clone, Default)]
pub struct ShotDetector {
    thresholds: ShotThresholds,
}

impl ShotDetector {
    /// Create detector with the default ladder
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the ladder
    pub fn with_thresholds(mut self, thresholds: ShotThresholds) -> Result<Self> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    pub fn thresholds(&self) -> &ShotThresholds {
        &self.thresholds
    }

    /// Grade one sample given the magnitude of the sample before it
    ///
    /// Tiers are checked highest first; the pair rule only applies when no
    /// single-sample tier matched.
    pub fn classify(&self, previous: f64, current: f64) -> Option<Confidence> {
        let t = &self.thresholds;

        if current >= t.very_high {
            Some(Confidence::VeryHigh)
        } else if current >= t.high {
            Some(Confidence::High)
        } else if current >= t.medium {
            Some(Confidence::Medium)
        } else if current >= t.low {
            Some(Confidence::Low)
        } else if (previous >= t.pair_strong || current >= t.pair_strong)
            && previous + current >= t.pair_sum
        {
            Some(Confidence::VeryLow)
        } else {
            None
        }
    }

    /// Scan `accel` from `offset` and return the first sample that grades
    ///
    /// The pair rule's previous magnitude starts at `accel[offset - 1]` (or 0
    /// at the start of the channel) and follows the scan. When nothing
    /// grades, the result is a `NoShot` placeholder at index 0 of the whole
    /// channel, not at `offset`.
    pub fn detect(&self, accel: &[Sample], offset: usize) -> Result<ShotCandidate> {
        let first = accel.first().ok_or(Error::EmptyChannel {
            channel: Channel::Accel,
        })?;

        let mut previous = if offset > 0 && offset < accel.len() {
            accel[offset - 1].magnitude()
        } else {
            0.0
        };

        for (index, sample) in accel.iter().enumerate().skip(offset) {
            let current = sample.magnitude();
            if let Some(confidence) = self.classify(previous, current) {
                return Ok(ShotCandidate::new(IndexedSample::new(*sample, index), confidence));
            }
            previous = current;
        }

        Ok(ShotCandidate::placeholder(*first))
    }
}

/// Demote a primary shot that a later, stronger alternate contradicts
///
/// When both candidates are shots and the alternate has the larger raw
/// magnitude, the primary keeps its index but drops to `VeryLow`.
pub fn demote_ambiguous(shot: ShotCandidate, alt_shot: &ShotCandidate) -> ShotCandidate {
    if shot.confidence.is_shot()
        && alt_shot.confidence.is_shot()
        && alt_shot.magnitude() > shot.magnitude()
    {
        ShotCandidate::new(shot.sample, Confidence::VeryLow)
    } else {
        shot
    }
}

/// High-g shot detector
#[derive(Debug, Clone, Default)]
pub struct HiGDetector {
    thresholds: HiGThresholds,
}

impl HiGDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(mut self, thresholds: HiGThresholds) -> Result<Self> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    /// Grade a unit magnitude (strictly greater than each tier)
    pub fn classify(&self, magnitude_unit: f64) -> Confidence {
        let t = &self.thresholds;

        if magnitude_unit > t.very_high {
            Confidence::VeryHigh
        } else if magnitude_unit > t.high {
            Confidence::High
        } else if magnitude_unit > t.medium {
            Confidence::Medium
        } else if magnitude_unit > t.low {
            Confidence::Low
        } else if magnitude_unit > t.very_low {
            Confidence::VeryLow
        } else {
            Confidence::NoShot
        }
    }

    /// Grade an already located high-g peak
    pub fn classify_peak(&self, peak: IndexedSample) -> ShotCandidate {
        let confidence = self.classify(peak.sample.magnitude_unit());
        ShotCandidate::new(peak, confidence)
    }

    /// Find the high-g peak (first on ties) and grade it
    pub fn detect(&self, hig: &[Sample]) -> Result<ShotCandidate> {
        let peak = find_max(Channel::HiG, hig, Statistic::Magnitude)?;
        Ok(self.classify_peak(peak))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::ChannelKind;

    /// Accelerometer channel whose raw magnitudes are exactly `magnitudes`
    fn accel(magnitudes: &[f64]) -> Vec<Sample> {
        magnitudes
            .iter()
            .map(|m| Sample::new(ChannelKind::Accel, [0.0, 0.0, *m]))
            .collect()
    }

    fn hig(raw_z: &[f64]) -> Vec<Sample> {
        raw_z
            .iter()
            .map(|z| Sample::new(ChannelKind::HiG, [0.0, 0.0, *z]))
            .collect()
    }

    #[test]
    fn test_confidence_ordering() {
        assert!(Confidence::NoShot < Confidence::VeryLow);
        assert!(Confidence::High < Confidence::VeryHigh);
        assert_eq!(Confidence::default(), Confidence::NoShot);
        assert_eq!(Confidence::Medium.level(), 3);
        assert_eq!(Confidence::VeryLow.to_string(), "Very Low");
    }

    #[test]
    fn test_ladder_tiers() {
        let detector = ShotDetector::new();
        assert_eq!(detector.classify(0.0, 40000.0), Some(Confidence::VeryHigh));
        assert_eq!(detector.classify(0.0, 39999.0), Some(Confidence::High));
        assert_eq!(detector.classify(0.0, 35000.0), Some(Confidence::High));
        assert_eq!(detector.classify(0.0, 30000.0), Some(Confidence::Medium));
        assert_eq!(detector.classify(0.0, 22000.0), Some(Confidence::Low));
        assert_eq!(detector.classify(0.0, 21999.0), None);
    }

    #[test]
    fn test_pair_rule() {
        let detector = ShotDetector::new();
        // Strong previous sample carries a weak current one
        assert_eq!(detector.classify(18000.0, 12000.0), Some(Confidence::VeryLow));
        // Strong current sample, weak previous
        assert_eq!(detector.classify(12000.0, 18000.0), Some(Confidence::VeryLow));
        // Sum reached but neither sample strong
        assert_eq!(detector.classify(16000.0, 16000.0), None);
        // Strong but sum short
        assert_eq!(detector.classify(17000.0, 11999.0), None);
    }

    #[test]
    fn test_first_very_high_sample() {
        let mut magnitudes = vec![1000.0; 10];
        magnitudes[5] = 41000.0;
        let shot = ShotDetector::new().detect(&accel(&magnitudes), 0).unwrap();
        assert_eq!(shot.index(), 5);
        assert_eq!(shot.confidence, Confidence::VeryHigh);
    }

    #[test]
    fn test_first_match_wins_over_stronger_later_sample() {
        let magnitudes = [1000.0, 23000.0, 45000.0];
        let shot = ShotDetector::new().detect(&accel(&magnitudes), 0).unwrap();
        assert_eq!(shot.index(), 1);
        assert_eq!(shot.confidence, Confidence::Low);
    }

    #[test]
    fn test_pair_detection_in_scan() {
        let magnitudes = [1000.0, 1000.0, 18000.0, 12000.0, 1000.0];
        let shot = ShotDetector::new().detect(&accel(&magnitudes), 0).unwrap();
        assert_eq!(shot.index(), 3);
        assert_eq!(shot.confidence, Confidence::VeryLow);
    }

    #[test]
    fn test_offset_seeds_previous_magnitude() {
        let magnitudes = [1000.0, 18000.0, 12000.0, 1000.0];
        let shot = ShotDetector::new().detect(&accel(&magnitudes), 2).unwrap();
        assert_eq!(shot.index(), 2);
        assert_eq!(shot.confidence, Confidence::VeryLow);
    }

    #[test]
    fn test_no_shot_points_at_index_zero() {
        let samples = accel(&[500.0, 1000.0, 2000.0, 1500.0]);
        let shot = ShotDetector::new().detect(&samples, 0).unwrap();
        assert_eq!(shot.confidence, Confidence::NoShot);
        assert_eq!(shot.index(), 0);
        assert_eq!(shot.sample.sample, samples[0]);
    }

    #[test]
    fn test_no_shot_ignores_offset() {
        let samples = accel(&[500.0, 1000.0, 2000.0, 1500.0]);
        let shot = ShotDetector::new().detect(&samples, 2).unwrap();
        assert_eq!(shot.confidence, Confidence::NoShot);
        assert_eq!(shot.index(), 0);
    }

    #[test]
    fn test_offset_past_end() {
        let samples = accel(&[50000.0, 1000.0]);
        let shot = ShotDetector::new().detect(&samples, 40).unwrap();
        assert_eq!(shot.confidence, Confidence::NoShot);
        assert_eq!(shot.index(), 0);
    }

    #[test]
    fn test_empty_accel_fails() {
        let err = ShotDetector::new().detect(&[], 0).unwrap_err();
        assert!(matches!(err, Error::EmptyChannel { channel: Channel::Accel }));
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = ShotThresholds {
            low: 5000.0,
            ..ShotThresholds::default()
        };
        let detector = ShotDetector::new().with_thresholds(thresholds).unwrap();
        let shot = detector.detect(&accel(&[1000.0, 6000.0]), 0).unwrap();
        assert_eq!(shot.index(), 1);
        assert_eq!(shot.confidence, Confidence::Low);
    }

    #[test]
    fn test_invalid_thresholds_rejected() {
        let thresholds = ShotThresholds {
            high: 45000.0,
            ..ShotThresholds::default()
        };
        assert!(ShotDetector::new().with_thresholds(thresholds).is_err());
    }

    #[test]
    fn test_demotion_keeps_index() {
        let samples = accel(&[23000.0, 31000.0]);
        let shot = ShotCandidate::new(IndexedSample::new(samples[0], 0), Confidence::Low);
        let alt = ShotCandidate::new(IndexedSample::new(samples[1], 1), Confidence::Medium);

        let resolved = demote_ambiguous(shot, &alt);
        assert_eq!(resolved.confidence, Confidence::VeryLow);
        assert_eq!(resolved.index(), 0);
    }

    #[test]
    fn test_no_demotion_when_alt_weaker_or_missing() {
        let samples = accel(&[31000.0, 23000.0]);
        let shot = ShotCandidate::new(IndexedSample::new(samples[0], 0), Confidence::Medium);

        let weaker = ShotCandidate::new(IndexedSample::new(samples[1], 1), Confidence::Low);
        assert_eq!(demote_ambiguous(shot, &weaker).confidence, Confidence::Medium);

        let missing = ShotCandidate::placeholder(samples[0]);
        assert_eq!(demote_ambiguous(shot, &missing).confidence, Confidence::Medium);
    }

    #[test]
    fn test_hig_ladder() {
        let detector = HiGDetector::new();
        assert_eq!(detector.classify(50.1), Confidence::VeryHigh);
        assert_eq!(detector.classify(50.0), Confidence::High);
        assert_eq!(detector.classify(45.0), Confidence::High);
        assert_eq!(detector.classify(30.5), Confidence::Medium);
        assert_eq!(detector.classify(20.5), Confidence::Low);
        assert_eq!(detector.classify(10.5), Confidence::VeryLow);
        assert_eq!(detector.classify(10.0), Confidence::NoShot);
    }

    #[test]
    fn test_hig_detect_uses_unit_peak() {
        // raw 57.6 -> 45 in units
        let samples = hig(&[10.0, 57.6, -20.0]);
        let shot = HiGDetector::new().detect(&samples).unwrap();
        assert_eq!(shot.index(), 1);
        assert_eq!(shot.confidence, Confidence::High);
    }

    #[test]
    fn test_hig_monotonic() {
        let base = [10.0, 57.6, -20.0, 30.0];
        let detector = HiGDetector::new();
        let mut last = detector.detect(&hig(&base)).unwrap().confidence;

        for scale in [1.1, 1.5, 2.0, 3.0] {
            let scaled: Vec<f64> = base.iter().map(|v| v * scale).collect();
            let confidence = detector.detect(&hig(&scaled)).unwrap().confidence;
            assert!(confidence >= last);
            last = confidence;
        }
        assert_eq!(last, Confidence::VeryHigh);
    }

    #[test]
    fn test_hig_empty_fails() {
        assert!(HiGDetector::new().detect(&[]).is_err());
    }
}
