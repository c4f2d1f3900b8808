//! # BTA Common Library
//!
//! Recording model and shot detection for bow-mounted inertial sensor logs:
//! - Sample model with per-channel unit conversion
//! - Record line parsing (including compressed high-g records)
//! - Recording assembly: partition, calibration fallback, maxima
//! - Accelerometer shot detector with alternate-shot disambiguation
//! - High-g shot detector
//! - Analysis parameters (threshold ladders)

pub mod error;
pub mod maxima;
pub mod params;
pub mod record;
pub mod recording;
pub mod sample;
pub mod shot;

pub use error::{Error, Result};
pub use params::AnalysisParameters;
pub use record::Record;
pub use recording::{Handedness, Recording};
pub use sample::{Channel, ChannelKind, IndexedSample, Sample};
pub use shot::{Confidence, ShotCandidate};
