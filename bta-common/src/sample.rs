//! Three-axis sensor samples
//!
//! A [`Sample`] keeps the raw reading exactly as logged (fixed-point LSB
//! counts) next to its value in physical units. Threshold comparisons use
//! the raw magnitude; display and calibration use the unit values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sensor stream a sample belongs to, including the single calibration reading
///
/// Each kind carries its own LSB-to-unit conversion:
/// - Gyro: `v * 1000 / 65536` (degrees)
/// - Accel, Calibration: `v / 4096` (g)
/// - HiG: `v * 200 / 256` (g)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Gyro,
    Accel,
    HiG,
    Calibration,
}

impl ChannelKind {
    /// Conversion ratio as (numerator, denominator)
    fn unit_ratio(&self) -> (f64, f64) {
        match self {
            ChannelKind::Gyro => (1000.0, 65536.0),
            ChannelKind::Accel | ChannelKind::Calibration => (1.0, 4096.0),
            ChannelKind::HiG => (200.0, 256.0),
        }
    }

    /// Convert a raw LSB value into physical units
    pub fn to_unit(&self, raw: f64) -> f64 {
        let (numerator, denominator) = self.unit_ratio();
        raw * numerator / denominator
    }

    /// Physical unit label
    pub fn unit_label(&self) -> &'static str {
        match self {
            ChannelKind::Gyro => "deg",
            ChannelKind::Accel | ChannelKind::HiG | ChannelKind::Calibration => "g",
        }
    }
}

/// One of the three sample streams owned by a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Gyro,
    Accel,
    #[serde(rename = "hig")]
    HiG,
}

impl Channel {
    pub fn kind(&self) -> ChannelKind {
        match self {
            Channel::Gyro => ChannelKind::Gyro,
            Channel::Accel => ChannelKind::Accel,
            Channel::HiG => ChannelKind::HiG,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Gyro => "gyro",
            Channel::Accel => "accel",
            Channel::HiG => "hig",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single three-axis reading
///
/// Magnitude is the Euclidean norm of the raw axes, computed once before any
/// unit conversion. Fields are private so a sample cannot drift from its
/// derived values after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    kind: ChannelKind,
    x: f64,
    y: f64,
    z: f64,
    magnitude: f64,
    x_unit: f64,
    y_unit: f64,
    z_unit: f64,
    magnitude_unit: f64,
}

impl Sample {
    /// Create sample from raw LSB axes, converting with the kind's ratio
    pub fn new(kind: ChannelKind, axes: [f64; 3]) -> Self {
        Self::build(kind, axes, |v| kind.to_unit(v))
    }

    /// Create sample whose axes are already in physical units
    ///
    /// Unit values equal the given axes; no LSB conversion is applied. Used
    /// for the built-in calibration defaults, which are authored in g.
    pub fn prescaled(kind: ChannelKind, axes: [f64; 3]) -> Self {
        Self::build(kind, axes, |v| v)
    }

    fn build(kind: ChannelKind, axes: [f64; 3], convert: impl Fn(f64) -> f64) -> Self {
        let [x, y, z] = axes;
        let magnitude = (x * x + y * y + z * z).sqrt();

        Self {
            kind,
            x,
            y,
            z,
            magnitude,
            x_unit: convert(x),
            y_unit: convert(y),
            z_unit: convert(z),
            magnitude_unit: convert(magnitude),
        }
    }

    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    /// Raw axes as logged
    pub fn axes(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Raw magnitude (LSB)
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn x_unit(&self) -> f64 {
        self.x_unit
    }

    pub fn y_unit(&self) -> f64 {
        self.y_unit
    }

    pub fn z_unit(&self) -> f64 {
        self.z_unit
    }

    /// Axes in physical units
    pub fn unit_axes(&self) -> [f64; 3] {
        [self.x_unit, self.y_unit, self.z_unit]
    }

    /// Magnitude in physical units
    pub fn magnitude_unit(&self) -> f64 {
        self.magnitude_unit
    }

    pub fn abs_x(&self) -> f64 {
        self.x.abs()
    }

    pub fn abs_y(&self) -> f64 {
        self.y.abs()
    }

    pub fn abs_z(&self) -> f64 {
        self.z.abs()
    }

    /// Sum of absolute raw axes
    pub fn vector_sum(&self) -> f64 {
        self.abs_x() + self.abs_y() + self.abs_z()
    }
}

/// Sample paired with its position in the owning channel
///
/// The index is captured when the pair is built and never recomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedSample {
    pub sample: Sample,
    pub index: usize,
}

impl IndexedSample {
    pub fn new(sample: Sample, index: usize) -> Self {
        Self { sample, index }
    }
}
