//! Record lines of a sensor log
//!
//! Every line is `type, x, y, z`. Type codes:
//!
//! | code | record                                   |
//! |------|------------------------------------------|
//! | 1    | gyro sample                              |
//! | 2    | accelerometer sample                     |
//! | 3    | high-g sample                            |
//! | 4    | calibration reading                      |
//! | 5    | handedness setting (`x` = 0 right, 1 left) |
//! | 7    | compressed high-g (two samples per line) |
//!
//! Other codes are skipped without error.

use std::fmt;

use thiserror::Error;

use crate::recording::Handedness;

pub const TYPE_GYRO: i64 = 1;
pub const TYPE_ACCEL: i64 = 2;
pub const TYPE_HIG: i64 = 3;
pub const TYPE_CALIBRATION: i64 = 4;
pub const TYPE_SETTINGS: i64 = 5;
pub const TYPE_HIG_COMPRESSED: i64 = 7;

const FIELD_COUNT: usize = 4;
const COLUMNS: [&str; FIELD_COUNT] = ["type", "x", "y", "z"];

/// Valid range of one unpacked high-g scalar
const HIG_LOWER: i64 = -128;
const HIG_UPPER: i64 = 127;

/// Record line parse errors (line numbers are 1-based)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// Line does not have exactly four comma-separated fields
    #[error("line {line}: expected 4 fields, found {found}")]
    WrongFieldCount { line: usize, found: usize },

    /// Field is not a number
    #[error("line {line}: {column} field is not numeric: {value:?}")]
    NotNumeric {
        line: usize,
        column: &'static str,
        value: String,
    },

    /// Field must be an integer for this record type
    #[error("line {line}: {column} field is not an integer: {value:?}")]
    NotInteger {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// One decoded record line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Record {
    Gyro([f64; 3]),
    Accel([f64; 3]),
    HiG([f64; 3]),
    Calibration([f64; 3]),
    Settings(Handedness),
    /// Three packed fields, each holding two signed bytes
    HiGCompressed([i64; 3]),
}

impl Record {
    pub fn type_code(&self) -> i64 {
        match self {
            Record::Gyro(_) => TYPE_GYRO,
            Record::Accel(_) => TYPE_ACCEL,
            Record::HiG(_) => TYPE_HIG,
            Record::Calibration(_) => TYPE_CALIBRATION,
            Record::Settings(_) => TYPE_SETTINGS,
            Record::HiGCompressed(_) => TYPE_HIG_COMPRESSED,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.type_code();
        match self {
            Record::Gyro([x, y, z]) | Record::Accel([x, y, z]) | Record::HiG([x, y, z]) => {
                write!(f, "{}, {}, {}, {}", code, *x as i64, *y as i64, *z as i64)
            }
            Record::Calibration([x, y, z]) => write!(f, "{}, {:?}, {:?}, {:?}", code, x, y, z),
            Record::Settings(handedness) => write!(f, "{}, {}, 0, 0", code, handedness.code()),
            Record::HiGCompressed([x, y, z]) => write!(f, "{}, {}, {}, {}", code, x, y, z),
        }
    }
}

/// Parse one record line
///
/// Returns `Ok(None)` for unrecognised type codes. The value fields must be
/// numeric on every line, whatever the type.
pub fn parse_line(text: &str, line: usize) -> Result<Option<Record>, ParseError> {
    let fields: Vec<&str> = text.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(ParseError::WrongFieldCount {
            line,
            found: fields.len(),
        });
    }

    let type_code = parse_integer(fields[0], line, COLUMNS[0])?;
    let mut values = [0.0; 3];
    for (i, value) in values.iter_mut().enumerate() {
        *value = parse_number(fields[i + 1], line, COLUMNS[i + 1])?;
    }

    let record = match type_code {
        TYPE_GYRO => Record::Gyro(values),
        TYPE_ACCEL => Record::Accel(values),
        TYPE_HIG => Record::HiG(values),
        TYPE_CALIBRATION => Record::Calibration(values),
        TYPE_SETTINGS => {
            let code = parse_integer(fields[1], line, COLUMNS[1])?;
            Record::Settings(Handedness::from_code(code))
        }
        TYPE_HIG_COMPRESSED => {
            let mut packed = [0i64; 3];
            for (i, value) in packed.iter_mut().enumerate() {
                *value = parse_integer(fields[i + 1], line, COLUMNS[i + 1])?;
            }
            Record::HiGCompressed(packed)
        }
        _ => return Ok(None),
    };

    Ok(Some(record))
}

/// Parse a whole log
///
/// The first malformed line aborts the parse. A blank line is malformed;
/// only the final line terminator may be omitted or present.
pub fn parse_records(text: &str) -> Result<Vec<Record>, ParseError> {
    let mut records = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if let Some(record) = parse_line(line, i + 1)? {
            records.push(record);
        }
    }

    Ok(records)
}

fn parse_number(value: &str, line: usize, column: &'static str) -> Result<f64, ParseError> {
    value.parse::<f64>().map_err(|_| ParseError::NotNumeric {
        line,
        column,
        value: value.to_string(),
    })
}

fn parse_integer(value: &str, line: usize, column: &'static str) -> Result<i64, ParseError> {
    value.parse::<i64>().map_err(|_| {
        if value.parse::<f64>().is_ok() {
            ParseError::NotInteger {
                line,
                column,
                value: value.to_string(),
            }
        } else {
            ParseError::NotNumeric {
                line,
                column,
                value: value.to_string(),
            }
        }
    })
}

/// Split a packed field into (low, high) scalars
///
/// The low byte is sign-extended. The high part is whatever remains above
/// the low byte, so a field that overflows its 16-bit container yields a
/// high scalar outside the signed byte range.
pub fn unpack_pair(packed: i64) -> [i64; 2] {
    let low = packed as u8 as i8 as i64;
    let high = packed >> 8;
    [low, high]
}

/// Replace an out-of-range high-g scalar with zero
pub fn limit_hig(value: i64) -> f64 {
    if !(HIG_LOWER..=HIG_UPPER).contains(&value) {
        0.0
    } else {
        value as f64
    }
}

/// Decode a compressed high-g line into its two raw triples
///
/// Interleaving: first = (f1.lo, f1.hi, f2.lo), second = (f2.hi, f3.lo, f3.hi).
pub fn decode_compressed(packed: [i64; 3]) -> [[f64; 3]; 2] {
    let [x0, x1] = unpack_pair(packed[0]);
    let [y0, y1] = unpack_pair(packed[1]);
    let [z0, z1] = unpack_pair(packed[2]);

    [
        [limit_hig(x0), limit_hig(x1), limit_hig(y0)],
        [limit_hig(y1), limit_hig(z0), limit_hig(z1)],
    ]
}
