//! dateio Core - Fundamental types
//!
//! This crate provides the core types used throughout dateio:
//! - `Instant`: epoch milliseconds within the native date range
//! - `Zone`: where wall-clock fields are read from (system local or fixed offset)
//! - `Components`: decomposed wall-clock fields
//! - `calendar`: proleptic Gregorian arithmetic with native overflow rules
//! - `Error`: structured errors with machine-readable codes

pub mod calendar;
mod error;
mod instant;

pub use error::{codes, Error};
pub use instant::{Components, Instant, Zone};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::calendar::{days_in_month, is_leap_year};
    pub use crate::{Components, Error, Instant, Zone};
}
