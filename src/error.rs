//! Configuration errors.

use std::fmt;

/// Rejected game configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    FieldTooSmall { width: f64, height: f64 },
    NonPositive { name: &'static str, value: f64 },
    NonFinite { name: &'static str },
    ZeroDuration { name: &'static str },
    JumpNotUpward { value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldTooSmall { width, height } => {
                write!(f, "field too small: {width}x{height}")
            }
            Self::NonPositive { name, value } => {
                write!(f, "{name} must be positive, got {value}")
            }
            Self::NonFinite { name } => write!(f, "{name} must be a finite number"),
            Self::ZeroDuration { name } => write!(f, "{name} must be longer than zero"),
            Self::JumpNotUpward { value } => {
                write!(f, "jump velocity must be negative (upward), got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
