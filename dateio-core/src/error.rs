//! Structured errors
//!
//! Every failure path in dateio surfaces as one of these values. Nothing
//! panics and nothing degrades into a hidden "invalid date" sentinel: an
//! input that cannot be understood is reported together with what kind of
//! value it was.

use std::convert::Infallible;
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
    pub const INVALID_COMPONENTS: &str = "INVALID_COMPONENTS";
    pub const INVALID_QUANTITY: &str = "INVALID_QUANTITY";
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNKNOWN_TOKEN: &str = "UNKNOWN_TOKEN";
    pub const UNKNOWN_FIELD: &str = "UNKNOWN_FIELD";
    pub const INVALID_VALUE: &str = "INVALID_VALUE";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const INVALID_LOCALE: &str = "INVALID_LOCALE";
    pub const OUT_OF_RANGE: &str = "OUT_OF_RANGE";
}

/// Errors that can occur with dateio operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("Cannot parse {kind} input {input:?} as a date")]
    Parse { input: String, kind: &'static str },

    #[error("Invalid date components {components:?}: {reason}")]
    Components {
        components: Vec<i64>,
        reason: &'static str,
    },

    #[error("Invalid quantity {input:?} ({kind})")]
    InvalidQuantity { input: String, kind: &'static str },

    #[error("Unknown unit: {0:?} (expected one of ms, s, i, h, d, w, m, y)")]
    UnknownUnit(String),

    #[error("Unknown format token: {0:?}")]
    UnknownToken(String),

    #[error("Unknown field: {0:?} (expected one of y, m, d, w, h, i, s, ms, u, U)")]
    UnknownField(String),

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },

    #[error("{field} accepts 1 to {max} values, got {got}")]
    ArgCount {
        field: &'static str,
        max: usize,
        got: usize,
    },

    #[error("Invalid locale: {0}")]
    Locale(String),

    #[error("Date out of range: {0}")]
    OutOfRange(String),
}

impl Error {
    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Self::Parse { .. } => codes::PARSE_ERROR,
            Self::Components { .. } => codes::INVALID_COMPONENTS,
            Self::InvalidQuantity { .. } => codes::INVALID_QUANTITY,
            Self::UnknownUnit(_) => codes::UNKNOWN_UNIT,
            Self::UnknownToken(_) => codes::UNKNOWN_TOKEN,
            Self::UnknownField(_) => codes::UNKNOWN_FIELD,
            Self::InvalidValue { .. } => codes::INVALID_VALUE,
            Self::ArgCount { .. } => codes::ARG_COUNT,
            Self::Locale(_) => codes::INVALID_LOCALE,
            Self::OutOfRange(_) => codes::OUT_OF_RANGE,
        }
    }

    // ========== Common Error Constructors ==========

    pub fn parse(input: impl Into<String>, kind: &'static str) -> Self {
        Self::Parse { input: input.into(), kind }
    }

    pub fn components(components: &[i64], reason: &'static str) -> Self {
        Self::Components { components: components.to_vec(), reason }
    }

    pub fn invalid_quantity(input: impl Into<String>, kind: &'static str) -> Self {
        Self::InvalidQuantity { input: input.into(), kind }
    }

    pub fn out_of_range(details: impl Into<String>) -> Self {
        Self::OutOfRange(details.into())
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
