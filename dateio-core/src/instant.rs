//! Instants, wall-clock zones and decomposed components
//!
//! An [`Instant`] is milliseconds since the Unix epoch, limited to the
//! ±8.64e15 ms range a native date can address (±100,000,000 days).
//! Calendar fields are never stored: they are read by mapping the instant
//! onto a wall clock through a [`Zone`] and decomposing the result.

use crate::calendar::{civil_from_days, weekday_from_days, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND};
use crate::Error;
use chrono::{DateTime, Local, MappedLocalTime, NaiveDateTime, Offset, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

// ============================================================================
// Instant
// ============================================================================

/// A point in time with millisecond resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Instant {
    millis: i64,
}

impl Instant {
    /// Largest representable distance from the epoch, in milliseconds
    pub const MAX_MILLIS: i64 = 8_640_000_000_000_000;

    pub const EPOCH: Instant = Instant { millis: 0 };

    /// Create an instant from milliseconds since the Unix epoch
    pub fn from_millis(millis: i64) -> Result<Self, Error> {
        if millis.unsigned_abs() > Self::MAX_MILLIS as u64 {
            return Err(Error::out_of_range(format!("{} ms since epoch", millis)));
        }
        Ok(Self { millis })
    }

    /// Current system time
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now()).unwrap_or(Self::EPOCH)
    }

    /// Convert a `SystemTime`, truncating below millisecond resolution
    pub fn from_system_time(time: SystemTime) -> Result<Self, Error> {
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()),
            Err(before) => i64::try_from(before.duration().as_millis()).map(|ms| -ms),
        };
        millis
            .map_err(|_| Error::out_of_range("system time"))
            .and_then(Self::from_millis)
    }

    /// Milliseconds since the Unix epoch
    pub fn as_millis(self) -> i64 {
        self.millis
    }

    pub fn to_system_time(self) -> SystemTime {
        let magnitude = Duration::from_millis(self.millis.unsigned_abs());
        if self.millis >= 0 {
            UNIX_EPOCH + magnitude
        } else {
            UNIX_EPOCH - magnitude
        }
    }

    /// Shift by a signed number of milliseconds
    pub fn checked_add_millis(self, delta: i64) -> Result<Self, Error> {
        self.millis
            .checked_add(delta)
            .ok_or_else(|| Error::out_of_range(format!("{} + {} ms", self.millis, delta)))
            .and_then(Self::from_millis)
    }
}

impl TryFrom<i64> for Instant {
    type Error = Error;

    fn try_from(millis: i64) -> Result<Self, Self::Error> {
        Self::from_millis(millis)
    }
}

impl From<Instant> for i64 {
    fn from(instant: Instant) -> Self {
        instant.millis
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}

// ============================================================================
// Zone
// ============================================================================

/// Source of the wall-clock offset used to read and write calendar fields
///
/// `Local` follows the operating system's zone, including its daylight
/// saving transitions. `Fixed` applies the same offset (in seconds east of
/// UTC) everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    #[default]
    Local,
    Fixed(i32),
}

impl Zone {
    pub const UTC: Zone = Zone::Fixed(0);

    /// Wall-clock offset in milliseconds at the given instant
    pub fn offset_millis(self, instant: Instant) -> i64 {
        match self {
            Zone::Fixed(secs) => secs as i64 * MS_PER_SECOND,
            Zone::Local => local_offset_at(instant.as_millis()),
        }
    }

    /// Wall-clock milliseconds (epoch-relative, zone applied)
    pub fn to_wall(self, instant: Instant) -> i64 {
        instant.as_millis() + self.offset_millis(instant)
    }

    /// Decompose an instant into wall-clock fields
    pub fn components(self, instant: Instant) -> Components {
        Components::from_wall_millis(self.to_wall(instant))
    }

    /// Resolve wall-clock milliseconds back to an instant
    ///
    /// Ambiguous local times (clocks turned back) resolve to the earlier
    /// instant. Local times skipped by a transition use the offset in
    /// effect just before it.
    pub fn from_wall(self, wall: i64) -> Result<Instant, Error> {
        let offset = match self {
            Zone::Fixed(secs) => secs as i64 * MS_PER_SECOND,
            Zone::Local => local_offset_for_wall(wall),
        };
        wall.checked_sub(offset)
            .ok_or_else(|| Error::out_of_range(format!("wall clock {} ms", wall)))
            .and_then(Instant::from_millis)
    }
}

fn naive_from_millis(millis: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

fn local_offset_at(millis: i64) -> i64 {
    match naive_from_millis(millis) {
        Some(utc) => Local.offset_from_utc_datetime(&utc).fix().local_minus_utc() as i64 * MS_PER_SECOND,
        None => 0,
    }
}

fn local_offset_for_wall(wall: i64) -> i64 {
    let Some(naive) = naive_from_millis(wall) else {
        return 0;
    };
    match Local.offset_from_local_datetime(&naive) {
        MappedLocalTime::Single(offset) | MappedLocalTime::Ambiguous(offset, _) => {
            offset.fix().local_minus_utc() as i64 * MS_PER_SECOND
        }
        MappedLocalTime::None => {
            // Skipped by a forward transition: the offset an hour earlier
            // is the one that was in effect before the gap.
            let before = local_offset_at(wall - MS_PER_HOUR);
            tracing::debug!(wall, offset_ms = before, "local time falls in a transition gap");
            before
        }
    }
}

// ============================================================================
// Components
// ============================================================================

/// Decomposed wall-clock fields
///
/// `month` is 1-12, `weekday` is 0-6 with 0 = Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Components {
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub weekday: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl Components {
    pub fn from_wall_millis(wall: i64) -> Self {
        let days = wall.div_euclid(MS_PER_DAY);
        let within = wall.rem_euclid(MS_PER_DAY);
        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            weekday: weekday_from_days(days),
            hour: (within / MS_PER_HOUR) as u32,
            minute: ((within % MS_PER_HOUR) / MS_PER_MINUTE) as u32,
            second: ((within % MS_PER_MINUTE) / MS_PER_SECOND) as u32,
            millisecond: (within % MS_PER_SECOND) as u32,
        }
    }

    /// Milliseconds elapsed since wall-clock midnight
    pub fn time_of_day(&self) -> i64 {
        self.hour as i64 * MS_PER_HOUR
            + self.minute as i64 * MS_PER_MINUTE
            + self.second as i64 * MS_PER_SECOND
            + self.millisecond as i64
    }
}

// ============================================================================
// Tests
// ============================================================================
