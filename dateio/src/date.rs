//! The date value object
//!
//! A [`DateIo`] is an [`Instant`] plus the [`Config`] it is read through.
//! Values are immutable: every writer returns a new value and leaves the
//! receiver untouched, so `Clone` is the whole story for copies.

use crate::config::Config;
use crate::field::{Field, FieldValue, Token};
use crate::input::Input;
use crate::unit::{Quantity, Unit};
use dateio_core::calendar::{days_from_civil, make_date, make_day, make_time, MS_PER_MINUTE, MS_PER_SECOND};
use dateio_core::{Components, Error, Instant};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::time::SystemTime;

/// A point in time with calendar accessors
#[derive(Debug, Clone)]
pub struct DateIo {
    instant: Instant,
    config: Config,
}

impl DateIo {
    // ========== Construction ==========

    /// The current time, read through the global configuration
    pub fn now() -> Self {
        Self::from_instant(Instant::now(), Config::global())
    }

    /// Normalize any input using the global configuration
    pub fn new(input: impl Into<Input>) -> Result<Self, Error> {
        Self::with_config(input, Config::global())
    }

    /// Normalize any input using an explicit configuration
    pub fn with_config(input: impl Into<Input>, config: Config) -> Result<Self, Error> {
        let instant = input.into().normalize(config.zone())?;
        Ok(Self { instant, config })
    }

    pub fn from_instant(instant: Instant, config: Config) -> Self {
        Self { instant, config }
    }

    /// From seconds since the Unix epoch
    pub fn from_unix_seconds(seconds: f64) -> Result<Self, Error> {
        Self::new(Input::Number(seconds * 1000.0))
    }

    /// A new value from any input, keeping this value's configuration
    pub fn init(&self, input: impl Into<Input>) -> Result<Self, Error> {
        Self::with_config(input, self.config.clone())
    }

    pub(crate) fn at(&self, instant: Instant) -> Self {
        Self { instant, config: self.config.clone() }
    }

    /// Resolve wall-clock milliseconds through this value's zone
    pub(crate) fn at_wall(&self, wall: Option<i64>) -> Result<Self, Error> {
        let wall = wall.ok_or_else(|| Error::out_of_range("calendar fields"))?;
        Ok(self.at(self.config.zone().from_wall(wall)?))
    }

    // ========== Accessors ==========

    pub fn instant(&self) -> Instant {
        self.instant
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wall-clock fields in this value's zone
    pub fn components(&self) -> Components {
        self.config.zone().components(self.instant)
    }

    pub fn year(&self) -> i64 {
        self.components().year
    }

    /// 1-12
    pub fn month(&self) -> u32 {
        self.components().month
    }

    pub fn day(&self) -> u32 {
        self.components().day
    }

    /// 0-6, 0 = Sunday
    pub fn weekday(&self) -> u32 {
        self.components().weekday
    }

    pub fn hour(&self) -> u32 {
        self.components().hour
    }

    pub fn minute(&self) -> u32 {
        self.components().minute
    }

    pub fn second(&self) -> u32 {
        self.components().second
    }

    pub fn millisecond(&self) -> u32 {
        self.components().millisecond
    }

    pub fn epoch_millis(&self) -> i64 {
        self.instant.as_millis()
    }

    /// Epoch seconds, rounded half up
    pub fn epoch_seconds(&self) -> i64 {
        (self.instant.as_millis() + 500).div_euclid(MS_PER_SECOND)
    }

    /// Epoch milliseconds, for arithmetic and sorting
    pub fn value_of(&self) -> i64 {
        self.instant.as_millis()
    }

    pub fn to_system_time(&self) -> SystemTime {
        self.instant.to_system_time()
    }

    // ========== Tokens ==========

    /// Read a token in its display convention
    pub fn get(&self, token: Token) -> FieldValue {
        let c = self.components();
        let locale = self.config.locale();
        let number = match token {
            Token::YearPadded | Token::Year => c.year,
            Token::MonthPadded | Token::Month => c.month as i64,
            Token::DayPadded | Token::Day => c.day as i64,
            Token::Weekday => c.weekday as i64,
            Token::HourPadded | Token::Hour => c.hour as i64,
            Token::MinutePadded | Token::Minute => c.minute as i64,
            Token::SecondPadded | Token::Second => c.second as i64,
            Token::MillisecondPadded | Token::Millisecond => c.millisecond as i64,
            Token::EpochMillis => self.epoch_millis(),
            Token::EpochSeconds => self.epoch_seconds(),
            Token::MonthName => return FieldValue::Text(locale.month(c.month).to_string()),
            Token::MonthShortName => return FieldValue::Text(locale.month_short(c.month).to_string()),
            Token::WeekdayName => return FieldValue::Text(locale.weekday(c.weekday).to_string()),
            Token::Period => return FieldValue::Text(locale.period(c.hour, c.minute)),
            Token::PeriodUpper => return FieldValue::Text(locale.period(c.hour, c.minute).to_uppercase()),
        };
        match token.width() {
            Some(width) => FieldValue::Text(format!("{:0width$}", number, width = width)),
            None => FieldValue::Number(number),
        }
    }

    /// Write a field, optionally with the finer fields that travel with it
    ///
    /// `set(Field::Year, &[2020.0, 2.0, 29.0])` writes year, month and day at
    /// once; `set(Field::Hour, &[9.0, 30.0])` writes hour and minute. Every
    /// value is checked before anything is written, and fractional values
    /// are truncated. Epoch seconds are scaled to milliseconds first, so
    /// `1.5` is 1500 ms.
    pub fn set(&self, field: Field, values: &[f64]) -> Result<Self, Error> {
        if values.is_empty() || values.len() > field.max_values() {
            return Err(Error::ArgCount {
                field: field.name(),
                max: field.max_values(),
                got: values.len(),
            });
        }
        if let Some(&value) = values.iter().find(|v| !v.is_finite()) {
            return Err(Error::InvalidValue { field: field.name(), value });
        }
        if field == Field::EpochSeconds {
            let millis = (values[0] * MS_PER_SECOND as f64).trunc();
            return Instant::from_millis(millis as i64).map(|instant| self.at(instant));
        }
        let values: Vec<i64> = values.iter().map(|v| v.trunc() as i64).collect();
        self.write(field, &values)
    }

    fn write(&self, field: Field, values: &[i64]) -> Result<Self, Error> {
        let c = self.components();
        let value = |i: usize, current: i64| values.get(i).copied().unwrap_or(current);
        let days = days_from_civil(c.year, c.month, c.day);
        let time = c.time_of_day();
        let (month0, day) = (c.month as i64 - 1, c.day as i64);
        let (hour, minute, second, ms) = (c.hour as i64, c.minute as i64, c.second as i64, c.millisecond as i64);

        let wall = match field {
            Field::Year => value(1, month0 + 1)
                .checked_sub(1)
                .and_then(|month0| make_day(value(0, c.year), month0, value(2, day)))
                .and_then(|days| make_date(days, time)),
            Field::Month => value(0, month0 + 1)
                .checked_sub(1)
                .and_then(|month0| make_day(c.year, month0, value(1, day)))
                .and_then(|days| make_date(days, time)),
            Field::Day => make_day(c.year, month0, value(0, day)).and_then(|days| make_date(days, time)),
            Field::Weekday => {
                let delta = value(0, 0) as f64 - c.weekday as f64;
                return self.add_quantity(Quantity::new(delta, Unit::Day));
            }
            Field::Hour => make_time(value(0, hour), value(1, minute), value(2, second), value(3, ms))
                .and_then(|time| make_date(days, time)),
            Field::Minute => make_time(hour, value(0, minute), value(1, second), value(2, ms))
                .and_then(|time| make_date(days, time)),
            Field::Second => make_time(hour, minute, value(0, second), value(1, ms)).and_then(|time| make_date(days, time)),
            Field::Millisecond => make_time(hour, minute, second, value(0, ms)).and_then(|time| make_date(days, time)),
            Field::EpochMillis => return Instant::from_millis(values[0]).map(|instant| self.at(instant)),
            Field::EpochSeconds => {
                let millis = values[0]
                    .checked_mul(MS_PER_SECOND)
                    .ok_or_else(|| Error::out_of_range(format!("{} s since epoch", values[0])))?;
                return Instant::from_millis(millis).map(|instant| self.at(instant));
            }
        };
        self.at_wall(wall)
    }

    // ========== Field Writers ==========

    /// Set the year; Feb 29 in a common year overflows to Mar 1
    pub fn with_year(&self, year: i64) -> Result<Self, Error> {
        self.write(Field::Year, &[year])
    }

    /// Set the month (1-12); out-of-range months roll into adjacent years
    pub fn with_month(&self, month: i64) -> Result<Self, Error> {
        self.write(Field::Month, &[month])
    }

    /// Set the day of month; 0 is the last day of the previous month
    pub fn with_day(&self, day: i64) -> Result<Self, Error> {
        self.write(Field::Day, &[day])
    }

    /// Move by whole days to the given weekday of the current week
    pub fn with_weekday(&self, weekday: i64) -> Result<Self, Error> {
        self.write(Field::Weekday, &[weekday])
    }

    pub fn with_hour(&self, hour: i64) -> Result<Self, Error> {
        self.write(Field::Hour, &[hour])
    }

    pub fn with_minute(&self, minute: i64) -> Result<Self, Error> {
        self.write(Field::Minute, &[minute])
    }

    pub fn with_second(&self, second: i64) -> Result<Self, Error> {
        self.write(Field::Second, &[second])
    }

    pub fn with_millisecond(&self, millisecond: i64) -> Result<Self, Error> {
        self.write(Field::Millisecond, &[millisecond])
    }

    pub fn with_epoch_millis(&self, millis: i64) -> Result<Self, Error> {
        self.write(Field::EpochMillis, &[millis])
    }

    pub fn with_epoch_seconds(&self, seconds: i64) -> Result<Self, Error> {
        self.write(Field::EpochSeconds, &[seconds])
    }
}

// ============================================================================
// Display: the native date string shape
// ============================================================================

const WEEKDAY_ABBR: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_ABBR: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// `Wed May 02 2018 11:12:13 GMT+0800`
impl fmt::Display for DateIo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.components();
        let offset = self.config.zone().offset_millis(self.instant) / MS_PER_MINUTE;
        let sign = if offset < 0 { '-' } else { '+' };
        let offset = offset.abs();
        write!(
            f,
            "{} {} {:02} {:04} {:02}:{:02}:{:02} GMT{}{:02}{:02}",
            WEEKDAY_ABBR[c.weekday as usize % 7],
            MONTH_ABBR[(c.month as usize + 11) % 12],
            c.day,
            c.year,
            c.hour,
            c.minute,
            c.second,
            sign,
            offset / 60,
            offset % 60,
        )
    }
}

// ============================================================================
// Identity is the instant
// ============================================================================

impl PartialEq for DateIo {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl Eq for DateIo {}

impl PartialOrd for DateIo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateIo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.instant.cmp(&other.instant)
    }
}

impl Hash for DateIo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.instant.hash(state);
    }
}

impl Serialize for DateIo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.instant.serialize(serializer)
    }
}

/// Epoch milliseconds, read through the global configuration
impl<'de> Deserialize<'de> for DateIo {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Instant::deserialize(deserializer).map(|instant| Self::from_instant(instant, Config::global()))
    }
}

impl From<DateIo> for SystemTime {
    fn from(date: DateIo) -> Self {
        date.to_system_time()
    }
}

impl TryFrom<&str> for DateIo {
    type Error = Error;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::locale::{Locale, LocalePatch};
    use dateio_core::Zone;

    /// UTC with the built-in locale, isolated from global changes
    pub(crate) fn utc(input: impl Into<Input>) -> DateIo {
        DateIo::with_config(input, Config::new(Locale::default()).with_zone(Zone::UTC)).unwrap()
    }

    #[test]
    fn test_readers() {
        let d = utc("2019-10-11T10:13:19.123Z");
        assert_eq!(d.year(), 2019);
        assert_eq!(d.month(), 10);
        assert_eq!(d.day(), 11);
        assert_eq!(d.weekday(), 5);
        assert_eq!((d.hour(), d.minute(), d.second(), d.millisecond()), (10, 13, 19, 123));
        assert_eq!(d.epoch_millis(), 1_570_788_799_123);
        assert_eq!(d.value_of(), 1_570_788_799_123);
    }

    #[test]
    fn test_epoch_seconds_rounds() {
        assert_eq!(utc("2019-10-11T10:13:19.123Z").epoch_seconds(), 1_570_788_799);
        assert_eq!(utc(1_570_788_799_500_i64).epoch_seconds(), 1_570_788_800);
        assert_eq!(utc(-1500_i64).epoch_seconds(), -1);
        assert_eq!(utc("2019-10-11T10:13:19.123Z").get(Token::EpochSeconds), FieldValue::Number(1_570_788_799));
    }

    #[test]
    fn test_month_is_one_based() {
        for month in 1..=12 {
            let d = utc([2018, month, 15]);
            assert_eq!(d.month(), month as u32);
            assert_eq!(d.get(Token::Month), FieldValue::Number(month as i64));
        }
    }

    #[test]
    fn test_padded_tokens() {
        let d = utc([987, 5, 2, 1, 2, 3, 4]);
        assert_eq!(d.get(Token::YearPadded), FieldValue::Text("0987".into()));
        assert_eq!(d.get(Token::MonthPadded), FieldValue::Text("05".into()));
        assert_eq!(d.get(Token::DayPadded), FieldValue::Text("02".into()));
        assert_eq!(d.get(Token::HourPadded), FieldValue::Text("01".into()));
        assert_eq!(d.get(Token::MinutePadded), FieldValue::Text("02".into()));
        assert_eq!(d.get(Token::SecondPadded), FieldValue::Text("03".into()));
        assert_eq!(d.get(Token::MillisecondPadded), FieldValue::Text("004".into()));
        assert_eq!(d.get(Token::Millisecond), FieldValue::Number(4));
    }

    #[test]
    fn test_period_buckets() {
        let at = |time: &str| utc(format!("2018-05-02 {}", time)).get(Token::Period);
        assert_eq!(at("01:10:00"), FieldValue::Text("凌晨".into()));
        assert_eq!(at("08:40:12"), FieldValue::Text("上午".into()));
        assert_eq!(at("16:40:12"), FieldValue::Text("下午".into()));
        assert_eq!(at("21:40:12"), FieldValue::Text("晚上".into()));
    }

    #[test]
    fn test_locale_labels() {
        let locale = Locale::default()
            .merge(LocalePatch::new().with_periods(["am", "pm"]).with_weekdays([
                "Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday",
            ]))
            .unwrap();
        let config = Config::new(locale).with_zone(Zone::UTC);
        let d = DateIo::with_config("2018-05-02 13:10", config).unwrap();
        assert_eq!(d.get(Token::Period).to_string(), "pm");
        assert_eq!(d.get(Token::PeriodUpper).to_string(), "PM");
        assert_eq!(d.get(Token::WeekdayName).to_string(), "Wednesday");
        assert_eq!(d.get(Token::MonthName).to_string(), "五月");
        assert_eq!(d.get(Token::MonthShortName).to_string(), "5月");
    }

    #[test]
    fn test_set_composite() {
        let d = utc("2018-05-02 11:12:13.432");
        let moved = d.set(Field::Year, &[2020.0, 2.0, 29.0]).unwrap();
        assert_eq!(moved.format("Y-M-D H:I:S.MS"), "2020-02-29 11:12:13.432");
        let moved = d.set(Field::Hour, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(moved.format("H:I:S.MS"), "01:02:03.004");
        let moved = d.set(Field::Month, &[12.0, 25.0]).unwrap();
        assert_eq!(moved.format("Y-M-D"), "2018-12-25");
        // the receiver is untouched
        assert_eq!(d.format("Y-M-D"), "2018-05-02");
    }

    #[test]
    fn test_set_validates_everything_first() {
        let d = utc("2018-05-02");
        assert!(matches!(d.set(Field::Year, &[2020.0, f64::NAN]), Err(Error::InvalidValue { .. })));
        assert!(matches!(d.set(Field::Day, &[1.0, 2.0]), Err(Error::ArgCount { max: 1, got: 2, .. })));
        assert!(matches!(d.set(Field::Hour, &[]), Err(Error::ArgCount { .. })));
        assert_eq!("D".parse::<Field>(), Err(Error::UnknownField("D".into())));
    }

    #[test]
    fn test_setter_overflow() {
        let d = utc("2016-02-29 10:00");
        // Feb 29 in a common year overflows to Mar 1
        assert_eq!(d.with_year(2017).unwrap().format("Y-M-D H"), "2017-03-01 10");
        // day 0 is the last day of the previous month
        assert_eq!(d.with_day(0).unwrap().format("Y-M-D"), "2016-01-31");
        assert_eq!(d.with_month(13).unwrap().format("Y-M-D"), "2017-01-29");
        assert_eq!(d.with_minute(90).unwrap().format("H:I"), "11:30");
        assert!(d.with_year(1_000_000_000).is_err());
        assert!(d.with_year(i64::MIN).is_err());
        assert!(d.set(Field::Year, &[-1e300]).is_err());
        assert!(d.set(Field::Month, &[-1e300]).is_err());
    }

    #[test]
    fn test_set_weekday_moves_by_days() {
        // 2018-05-02 is a Wednesday
        let d = utc("2018-05-02 11:12:13");
        let sunday = d.with_weekday(0).unwrap();
        assert_eq!(sunday.format("Y-M-D H:I:S"), "2018-04-29 11:12:13");
        assert_eq!(sunday.weekday(), 0);
        assert_eq!(d.with_weekday(6).unwrap().format("Y-M-D"), "2018-05-05");
        assert_eq!(d.with_weekday(3).unwrap(), d);
    }

    #[test]
    fn test_epoch_writers() {
        let d = utc(0_i64);
        assert_eq!(d.with_epoch_seconds(1_570_788_799).unwrap().epoch_millis(), 1_570_788_799_000);
        assert_eq!(d.set(Field::EpochSeconds, &[1.5]).unwrap().epoch_millis(), 1500);
        assert_eq!(
            d.set(Field::EpochSeconds, &[-0.0015]).unwrap(),
            DateIo::from_unix_seconds(-0.0015).unwrap()
        );
        assert!(d.set(Field::EpochSeconds, &[1e300]).is_err());
        assert_eq!(d.with_epoch_millis(42).unwrap().epoch_millis(), 42);
        assert!(d.with_epoch_seconds(i64::MAX).is_err());
    }

    #[test]
    fn test_init_keeps_config() {
        let config = Config::new(Locale::default()).with_zone(Zone::Fixed(3600));
        let d = DateIo::with_config(0_i64, config).unwrap();
        let other = d.init("2018-05-02").unwrap();
        assert_eq!(other.config().zone(), Zone::Fixed(3600));
        assert_eq!(other.format("Y-M-D H"), "2018-05-02 00");
        assert!(d.init("otherString").is_err());
    }

    #[test]
    fn test_display_shape_parses_back() {
        let config = Config::new(Locale::default()).with_zone(Zone::Fixed(3600));
        let d = DateIo::with_config("2019-02-11T10:01:37.000Z", config.clone()).unwrap();
        assert_eq!(d.to_string(), "Mon Feb 11 2019 11:01:37 GMT+0100");
        let back = DateIo::with_config(d.to_string(), config).unwrap();
        assert_eq!(back, d);

        let west = Config::new(Locale::default()).with_zone(Zone::Fixed(-(5 * 3600 + 30 * 60)));
        let d = DateIo::with_config("2019-02-11T10:01:37.000Z", west).unwrap();
        assert_eq!(d.to_string(), "Mon Feb 11 2019 04:31:37 GMT-0530");
    }

    #[test]
    fn test_ordering_and_serde() {
        let a = utc(1000_i64);
        let b = utc(2000_i64);
        assert!(a < b);
        assert_eq!(a.clone().max(b.clone()), b);
        assert_eq!(serde_json::to_string(&a).unwrap(), "1000");
        let back: DateIo = serde_json::from_str("2000").unwrap();
        assert_eq!(back, b);
    }

    #[test]
    fn test_conversions() {
        let d = utc(1_234_567_i64);
        assert_eq!(DateIo::new(d.to_system_time()).unwrap(), d);
        assert_eq!(utc(&d), d);
        assert_eq!(DateIo::from_unix_seconds(1_570_788_799.5).unwrap().epoch_millis(), 1_570_788_799_500);
    }
}
