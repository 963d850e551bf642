//! dateio - Lightweight date value objects
//!
//! Parse heterogeneous inputs into a [`DateIo`], read and write calendar
//! fields with 1-based months and 0-based weekdays, render templates,
//! step through the calendar and measure differences.
//!
//! ```
//! use dateio::{dateio, Unit};
//!
//! let d = dateio("2016-01-31 09:30")?;
//! let next = d.add("1m")?;
//! assert_eq!(next.format("Y-M-D H:I"), "2016-02-29 09:30");
//! assert_eq!(next.diff(&d, Unit::Month)?, 1);
//! assert!(d.is_same(&next, Unit::Year));
//! # Ok::<(), dateio::Error>(())
//! ```
//!
//! Values are read through a [`Config`]: a locale table and a wall-clock
//! [`Zone`]. [`dateio`] and [`DateIo::new`] snapshot the process-wide locale
//! (see [`configure_locale`]); [`DateIo::with_config`] takes an explicit one.

mod compare;
pub mod config;
mod date;
mod diff;
pub mod field;
pub mod format;
mod input;
pub mod locale;
mod manipulate;
mod parse;
pub mod unit;

pub use config::Config;
pub use date::DateIo;
pub use field::{Field, FieldValue, Token};
pub use format::{Template, DEFAULT_FORMAT};
pub use input::Input;
pub use locale::{Locale, LocalePatch, Periods};
pub use unit::{Quantity, Unit};

pub use dateio_core::{codes, Components, Error, Instant, Zone};

use std::sync::Arc;

/// Build a value from any input using the global configuration
pub fn dateio(input: impl Into<Input>) -> Result<DateIo, Error> {
    DateIo::new(input)
}

/// Current process-wide locale table
pub fn locale() -> Arc<Locale> {
    locale::global()
}

/// Merge a patch into the process-wide locale table
///
/// Values created afterwards use the new table; existing values keep the
/// one they were created with.
pub fn configure_locale(patch: LocalePatch) -> Result<Arc<Locale>, Error> {
    locale::configure(patch)
}

/// Restore the built-in process-wide locale table
pub fn reset_locale() -> Arc<Locale> {
    locale::reset()
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{dateio, Config, DateIo, Error, Field, Locale, LocalePatch, Quantity, Token, Unit, Zone};
}
