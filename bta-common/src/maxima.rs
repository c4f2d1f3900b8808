//! Per-channel maxima
//!
//! Each statistic is a single linear scan. Ties keep the first sample seen.

use crate::error::{Error, Result};
use crate::sample::{Channel, IndexedSample, Sample};

/// Quantity a maximum is taken over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Magnitude,
    AbsX,
    AbsY,
    AbsZ,
}

impl Statistic {
    pub fn value(&self, sample: &Sample) -> f64 {
        match self {
            Statistic::Magnitude => sample.magnitude(),
            Statistic::AbsX => sample.abs_x(),
            Statistic::AbsY => sample.abs_y(),
            Statistic::AbsZ => sample.abs_z(),
        }
    }
}

/// Find the sample with the greatest statistic
///
/// Fails with [`Error::EmptyChannel`] when `samples` is empty.
pub fn find_max(channel: Channel, samples: &[Sample], statistic: Statistic) -> Result<IndexedSample> {
    let mut iter = samples.iter().enumerate();
    let (_, first) = iter.next().ok_or(Error::EmptyChannel { channel })?;

    let mut best = IndexedSample::new(*first, 0);
    let mut best_value = statistic.value(first);
    for (index, sample) in iter {
        let value = statistic.value(sample);
        if value > best_value {
            best = IndexedSample::new(*sample, index);
            best_value = value;
        }
    }

    Ok(best)
}

/// Maxima of one recording, computed once at assembly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Maxima {
    pub gyro: IndexedSample,
    pub accel: IndexedSample,
    pub hig: IndexedSample,
    pub accel_x: IndexedSample,
    pub accel_y: IndexedSample,
    pub accel_z: IndexedSample,
}

impl Maxima {
    /// Scan all three channels
    pub fn analyze(gyro: &[Sample], accel: &[Sample], hig: &[Sample]) -> Result<Self> {
        Ok(Self {
            gyro: find_max(Channel::Gyro, gyro, Statistic::Magnitude)?,
            accel: find_max(Channel::Accel, accel, Statistic::Magnitude)?,
            hig: find_max(Channel::HiG, hig, Statistic::Magnitude)?,
            accel_x: find_max(Channel::Accel, accel, Statistic::AbsX)?,
            accel_y: find_max(Channel::Accel, accel, Statistic::AbsY)?,
            accel_z: find_max(Channel::Accel, accel, Statistic::AbsZ)?,
        })
    }
}
