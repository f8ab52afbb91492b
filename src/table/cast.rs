//! Coordinate coercion for loosely-typed metadata sources.
//!
//! Acquisition coordinates are non-negative integers, but upstream sources
//! can deliver them as floats or strings. The policy: a float is accepted
//! and rounded to the nearest integer with a warning, NaN and non-numeric
//! text are rejected.

use log::warn;

use super::CastError;

/// A coordinate value before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<i64> for CoordValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for CoordValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for CoordValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Coerce a loosely-typed coordinate into a non-negative integer.
pub fn validate_and_cast(field: &str, value: CoordValue) -> Result<u32, CastError> {
    match value {
        CoordValue::Int(v) => {
            if v < 0 {
                return Err(CastError::Negative {
                    field: field.to_string(),
                    value: v,
                });
            }
            u32::try_from(v).map_err(|_| CastError::OutOfRange {
                field: field.to_string(),
                value: v.to_string(),
            })
        }
        CoordValue::Float(v) => {
            if v.is_nan() {
                return Err(CastError::Nan {
                    field: field.to_string(),
                });
            }
            warn!("metadata field '{field}' is float ({v}); rounding to nearest integer");
            let rounded = v.round();
            if rounded < 0.0 {
                return Err(CastError::Negative {
                    field: field.to_string(),
                    value: rounded as i64,
                });
            }
            if rounded > f64::from(u32::MAX) {
                return Err(CastError::OutOfRange {
                    field: field.to_string(),
                    value: v.to_string(),
                });
            }
            Ok(rounded as u32)
        }
        CoordValue::Text(s) => {
            let trimmed = s.trim();
            if trimmed.contains('.') {
                match trimmed.parse::<f64>() {
                    Ok(f) => validate_and_cast(field, CoordValue::Float(f)),
                    Err(_) => Err(CastError::NonNumeric {
                        field: field.to_string(),
                        value: s.clone(),
                    }),
                }
            } else {
                match trimmed.parse::<i64>() {
                    Ok(i) => validate_and_cast(field, CoordValue::Int(i)),
                    Err(_) => Err(CastError::NonNumeric {
                        field: field.to_string(),
                        value: s.clone(),
                    }),
                }
            }
        }
    }
}
