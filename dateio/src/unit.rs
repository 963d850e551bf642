//! Units and signed quantities for arithmetic, snapping and differences

use dateio_core::calendar::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND, MS_PER_WEEK};
use dateio_core::Error;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

/// A unit of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    pub const ALL: [Unit; 8] = [
        Unit::Millisecond,
        Unit::Second,
        Unit::Minute,
        Unit::Hour,
        Unit::Day,
        Unit::Week,
        Unit::Month,
        Unit::Year,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Millisecond => "ms",
            Unit::Second => "s",
            Unit::Minute => "i",
            Unit::Hour => "h",
            Unit::Day => "d",
            Unit::Week => "w",
            Unit::Month => "m",
            Unit::Year => "y",
        }
    }

    /// Fixed length in milliseconds
    ///
    /// Months and years have no fixed length; the 30-day and 365-day values
    /// here only price the fractional part of a calendar step.
    pub fn millis(self) -> f64 {
        let ms = match self {
            Unit::Millisecond => 1,
            Unit::Second => MS_PER_SECOND,
            Unit::Minute => MS_PER_MINUTE,
            Unit::Hour => MS_PER_HOUR,
            Unit::Day => MS_PER_DAY,
            Unit::Week => MS_PER_WEEK,
            Unit::Month => 30 * MS_PER_DAY,
            Unit::Year => 365 * MS_PER_DAY,
        };
        ms as f64
    }

    /// Months per unit for the calendar units, `None` for fixed-length ones
    pub fn months(self) -> Option<i64> {
        match self {
            Unit::Month => Some(1),
            Unit::Year => Some(12),
            _ => None,
        }
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.symbol() == s)
            .ok_or_else(|| Error::UnknownUnit(s.to_string()))
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Quantity
// ============================================================================

/// A signed, possibly fractional amount of a unit, e.g. `-3.5i`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantity {
    pub amount: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(amount: f64, unit: Unit) -> Self {
        Self { amount, unit }
    }

    /// Parse `[+-]digits[.digits][unit]`, using `fallback` when the text
    /// carries no unit suffix
    ///
    /// The integer part may be omitted (`.45h`), the fraction may not end
    /// the number (`5.` is rejected).
    pub fn parse_with_unit(text: &str, fallback: Unit) -> Result<Self, Error> {
        let invalid = || Error::invalid_quantity(text, "string");

        let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
        let number_len = unsigned
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(unsigned.len());
        let (number, suffix) = unsigned.split_at(number_len);

        let (whole, fraction) = match number.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (number, None),
        };
        let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        let well_formed = match fraction {
            Some(fraction) => (whole.is_empty() || digits(whole)) && digits(fraction),
            None => digits(whole),
        };
        if !well_formed {
            return Err(invalid());
        }

        let unit = if suffix.is_empty() {
            fallback
        } else {
            suffix.parse().map_err(|_| invalid())?
        };
        let sign_len = text.len() - unsigned.len();
        let amount: f64 = text[..sign_len + number_len].parse().map_err(|_| invalid())?;
        Ok(Self { amount, unit })
    }
}

impl FromStr for Quantity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_unit(s, Unit::Millisecond)
    }
}

impl TryFrom<&str> for Quantity {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        text.parse()
    }
}

impl TryFrom<String> for Quantity {
    type Error = Error;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// Text with a fallback unit, as in `("2", Unit::Year)`
impl TryFrom<(&str, Unit)> for Quantity {
    type Error = Error;

    fn try_from((text, unit): (&str, Unit)) -> Result<Self, Self::Error> {
        Quantity::parse_with_unit(text, unit)
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(self) -> Self::Output {
        Quantity::new(-self.amount, self.unit)
    }
}

impl From<f64> for Quantity {
    fn from(amount: f64) -> Self {
        Quantity::new(amount, Unit::Millisecond)
    }
}

impl From<i64> for Quantity {
    fn from(amount: i64) -> Self {
        Quantity::new(amount as f64, Unit::Millisecond)
    }
}

impl From<i32> for Quantity {
    fn from(amount: i32) -> Self {
        Quantity::new(amount as f64, Unit::Millisecond)
    }
}

impl From<(i32, Unit)> for Quantity {
    fn from((amount, unit): (i32, Unit)) -> Self {
        Quantity::new(amount as f64, unit)
    }
}

impl From<(f64, Unit)> for Quantity {
    fn from((amount, unit): (f64, Unit)) -> Self {
        Quantity::new(amount, unit)
    }
}

impl From<(i64, Unit)> for Quantity {
    fn from((amount, unit): (i64, Unit)) -> Self {
        Quantity::new(amount as f64, unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit)
    }
}
