//! Field and token vocabulary
//!
//! [`Field`] names a writable calendar component. [`Token`] is the closed
//! set of format symbols; each one reads exactly one field and renders it
//! with a fixed convention (raw number, zero padded, or a locale label).

use dateio_core::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Field
// ============================================================================

/// A calendar component that can be read and written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Year,
    /// 1-12
    Month,
    /// Day of month
    Day,
    /// 0-6, 0 = Sunday; writes move by whole days
    Weekday,
    Hour,
    Minute,
    Second,
    Millisecond,
    EpochMillis,
    EpochSeconds,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Year,
        Field::Month,
        Field::Day,
        Field::Weekday,
        Field::Hour,
        Field::Minute,
        Field::Second,
        Field::Millisecond,
        Field::EpochMillis,
        Field::EpochSeconds,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Field::Year => "y",
            Field::Month => "m",
            Field::Day => "d",
            Field::Weekday => "w",
            Field::Hour => "h",
            Field::Minute => "i",
            Field::Second => "s",
            Field::Millisecond => "ms",
            Field::EpochMillis => "u",
            Field::EpochSeconds => "U",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Field::Year => "year",
            Field::Month => "month",
            Field::Day => "day",
            Field::Weekday => "weekday",
            Field::Hour => "hour",
            Field::Minute => "minute",
            Field::Second => "second",
            Field::Millisecond => "millisecond",
            Field::EpochMillis => "epoch milliseconds",
            Field::EpochSeconds => "epoch seconds",
        }
    }

    /// How many values a composite write accepts
    ///
    /// Year takes (year, month, day), month takes (month, day), and each
    /// time field takes itself plus every finer time field.
    pub fn max_values(self) -> usize {
        match self {
            Field::Year => 3,
            Field::Month => 2,
            Field::Hour => 4,
            Field::Minute => 3,
            Field::Second => 2,
            Field::Day
            | Field::Weekday
            | Field::Millisecond
            | Field::EpochMillis
            | Field::EpochSeconds => 1,
        }
    }
}

impl FromStr for Field {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| field.symbol() == s)
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Token
// ============================================================================

/// A format symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    /// `Y` year, at least 4 digits
    YearPadded,
    /// `y` year
    Year,
    /// `M` month 01-12
    MonthPadded,
    /// `m` month 1-12
    Month,
    /// `Mo` locale month name
    MonthName,
    /// `mo` locale short month name
    MonthShortName,
    /// `D` day 01-31
    DayPadded,
    /// `d` day 1-31
    Day,
    /// `W` locale weekday name
    WeekdayName,
    /// `w` weekday 0-6
    Weekday,
    /// `H` hour 00-23
    HourPadded,
    /// `h` hour 0-23
    Hour,
    /// `I` minute 00-59
    MinutePadded,
    /// `i` minute 0-59
    Minute,
    /// `S` second 00-59
    SecondPadded,
    /// `s` second 0-59
    Second,
    /// `MS` millisecond 000-999
    MillisecondPadded,
    /// `ms` millisecond 0-999
    Millisecond,
    /// `a` locale period of day
    Period,
    /// `A` locale period of day, upper case
    PeriodUpper,
    /// `u` epoch milliseconds
    EpochMillis,
    /// `U` epoch seconds, rounded
    EpochSeconds,
}

impl Token {
    pub const ALL: [Token; 22] = [
        Token::YearPadded,
        Token::Year,
        Token::MonthPadded,
        Token::Month,
        Token::MonthName,
        Token::MonthShortName,
        Token::DayPadded,
        Token::Day,
        Token::WeekdayName,
        Token::Weekday,
        Token::HourPadded,
        Token::Hour,
        Token::MinutePadded,
        Token::Minute,
        Token::SecondPadded,
        Token::Second,
        Token::MillisecondPadded,
        Token::Millisecond,
        Token::Period,
        Token::PeriodUpper,
        Token::EpochMillis,
        Token::EpochSeconds,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Token::YearPadded => "Y",
            Token::Year => "y",
            Token::MonthPadded => "M",
            Token::Month => "m",
            Token::MonthName => "Mo",
            Token::MonthShortName => "mo",
            Token::DayPadded => "D",
            Token::Day => "d",
            Token::WeekdayName => "W",
            Token::Weekday => "w",
            Token::HourPadded => "H",
            Token::Hour => "h",
            Token::MinutePadded => "I",
            Token::Minute => "i",
            Token::SecondPadded => "S",
            Token::Second => "s",
            Token::MillisecondPadded => "MS",
            Token::Millisecond => "ms",
            Token::Period => "a",
            Token::PeriodUpper => "A",
            Token::EpochMillis => "u",
            Token::EpochSeconds => "U",
        }
    }

    /// The field this token reads; period tokens read the hour
    pub fn field(self) -> Field {
        match self {
            Token::YearPadded | Token::Year => Field::Year,
            Token::MonthPadded | Token::Month | Token::MonthName | Token::MonthShortName => Field::Month,
            Token::DayPadded | Token::Day => Field::Day,
            Token::WeekdayName | Token::Weekday => Field::Weekday,
            Token::HourPadded | Token::Hour | Token::Period | Token::PeriodUpper => Field::Hour,
            Token::MinutePadded | Token::Minute => Field::Minute,
            Token::SecondPadded | Token::Second => Field::Second,
            Token::MillisecondPadded | Token::Millisecond => Field::Millisecond,
            Token::EpochMillis => Field::EpochMillis,
            Token::EpochSeconds => Field::EpochSeconds,
        }
    }

    /// Zero-pad width for the padded numeric tokens
    pub fn width(self) -> Option<usize> {
        match self {
            Token::YearPadded => Some(4),
            Token::MillisecondPadded => Some(3),
            Token::MonthPadded
            | Token::DayPadded
            | Token::HourPadded
            | Token::MinutePadded
            | Token::SecondPadded => Some(2),
            _ => None,
        }
    }
}

impl FromStr for Token {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Token::ALL
            .into_iter()
            .find(|token| token.symbol() == s)
            .ok_or_else(|| Error::UnknownToken(s.to_string()))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// FieldValue
// ============================================================================

/// What a token reads as: a number or display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_symbols() {
        assert_eq!("y".parse::<Field>(), Ok(Field::Year));
        assert_eq!("ms".parse::<Field>(), Ok(Field::Millisecond));
        assert_eq!("U".parse::<Field>(), Ok(Field::EpochSeconds));
        assert_eq!("D".parse::<Field>(), Err(Error::UnknownField("D".to_string())));
        assert!("".parse::<Field>().is_err());
        assert!("Unknown String".parse::<Field>().is_err());
    }

    #[test]
    fn test_token_symbols_are_unique() {
        for (i, a) in Token::ALL.iter().enumerate() {
            for b in &Token::ALL[i + 1..] {
                assert_ne!(a.symbol(), b.symbol());
            }
            assert_eq!(a.symbol().parse::<Token>(), Ok(*a));
        }
        assert!("sdf".parse::<Token>().is_err());
    }

    #[test]
    fn test_token_fields() {
        assert_eq!(Token::MonthName.field(), Field::Month);
        assert_eq!(Token::PeriodUpper.field(), Field::Hour);
        assert_eq!(Token::YearPadded.width(), Some(4));
        assert_eq!(Token::Year.width(), None);
    }

    #[test]
    fn test_field_value() {
        assert_eq!(FieldValue::Number(7).to_string(), "7");
        assert_eq!(FieldValue::Text("07".into()).as_text(), Some("07"));
        assert_eq!(FieldValue::Text("07".into()).as_number(), None);
        assert_eq!(serde_json::to_string(&FieldValue::Number(3)).unwrap(), "3");
    }
}
