//! Proleptic Gregorian calendar arithmetic
//!
//! Pure integer functions over "days since the Unix epoch" and
//! "milliseconds within a day". Nothing here knows about time zones;
//! callers feed wall-clock values in and get wall-clock values out.
//!
//! `make_day` and `make_time` accept out-of-range components and normalize
//! them the way a native date constructor does: month 12 is January of the
//! next year, day 0 is the last day of the previous month, minute 90 is
//! 1h30m. They only fail when the result cannot be represented.

// ============================================================================
// Constants
// ============================================================================

pub const MS_PER_SECOND: i64 = 1_000;
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
pub const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

/// Days in each month (non-leap year)
const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days from 0000-03-01 to 1970-01-01
const UNIX_EPOCH_DAYS: i64 = 719_468;

/// Years beyond this are far outside the representable instant range and
/// are rejected before they can overflow the era arithmetic.
const MAX_ABS_YEAR: i64 = 1_000_000;

// ============================================================================
// Calendar rules
// ============================================================================

/// Check if year is a leap year
pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Get days in a month (month is 1-12; anything else yields 0)
pub fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        m @ 1..=12 => DAYS_IN_MONTH[(m - 1) as usize],
        _ => 0,
    }
}

/// Day of week for a day count, 0 = Sunday
pub fn weekday_from_days(days: i64) -> u32 {
    // 1970-01-01 was a Thursday
    (days + 4).rem_euclid(7) as u32
}

/// Convert civil date to days since Unix epoch
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
pub fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400; // [0, 399]
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146_097 + doe - UNIX_EPOCH_DAYS
}

/// Convert days since Unix epoch to civil date
/// Algorithm from Howard Hinnant: http://howardhinnant.github.io/date_algorithms.html
pub fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + UNIX_EPOCH_DAYS;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097; // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32; // [1, 31]
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32; // [1, 12]
    let year = if m <= 2 { y + 1 } else { y };
    (year, m, d)
}

// ============================================================================
// Native-style construction
// ============================================================================

/// Days since epoch for (year, zero-based month, day of month), with
/// month and day overflow carried into the larger fields.
pub fn make_day(year: i64, month0: i64, day: i64) -> Option<i64> {
    let year = year.checked_add(month0.div_euclid(12))?;
    if year.unsigned_abs() > MAX_ABS_YEAR as u64 {
        return None;
    }
    let month = (month0.rem_euclid(12) + 1) as u32;
    days_from_civil(year, month, 1).checked_add(day.checked_sub(1)?)
}

/// Milliseconds for a time of day; components may exceed their natural range.
pub fn make_time(hour: i64, minute: i64, second: i64, millisecond: i64) -> Option<i64> {
    hour.checked_mul(MS_PER_HOUR)?
        .checked_add(minute.checked_mul(MS_PER_MINUTE)?)?
        .checked_add(second.checked_mul(MS_PER_SECOND)?)?
        .checked_add(millisecond)
}

/// Combine a day count and a time of day into milliseconds since epoch
pub fn make_date(days: i64, time: i64) -> Option<i64> {
    days.checked_mul(MS_PER_DAY)?.checked_add(time)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_year() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2016));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert!(!is_leap_year(2100));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 1), 31);
        assert_eq!(days_in_month(2023, 4), 30);
        assert_eq!(days_in_month(2023, 13), 0);
    }

    #[test]
    fn test_civil_conversion() {
        assert_eq!(days_from_civil(1970, 1, 1), 0);
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(-1), (1969, 12, 31));
        let days = days_from_civil(2000, 2, 29);
        assert_eq!(civil_from_days(days), (2000, 2, 29));
        assert_eq!(civil_from_days(days_from_civil(-44, 3, 15)), (-44, 3, 15));
    }

    #[test]
    fn test_weekday() {
        assert_eq!(weekday_from_days(0), 4);
        // 2000-01-02 was a Sunday
        assert_eq!(weekday_from_days(days_from_civil(2000, 1, 2)), 0);
        assert_eq!(weekday_from_days(days_from_civil(1969, 12, 28)), 0);
    }

    #[test]
    fn test_make_day_overflow() {
        // month 12 (zero-based) is January of the next year
        assert_eq!(make_day(2018, 12, 1), Some(days_from_civil(2019, 1, 1)));
        // month -1 is December of the previous year
        assert_eq!(make_day(2018, -1, 1), Some(days_from_civil(2017, 12, 1)));
        // day 0 is the last day of the previous month
        assert_eq!(make_day(2016, 2, 0), Some(days_from_civil(2016, 2, 29)));
        // February 30 rolls into March
        assert_eq!(make_day(2019, 1, 30), Some(days_from_civil(2019, 3, 2)));
        assert_eq!(make_day(i64::MAX, 0, 1), None);
        assert_eq!(make_day(i64::MIN, 0, 1), None);
        assert_eq!(make_day(i64::MIN + 1, -1, 1), None);
    }

    #[test]
    fn test_make_time() {
        assert_eq!(make_time(1, 30, 0, 5), Some(MS_PER_HOUR + 30 * MS_PER_MINUTE + 5));
        assert_eq!(make_time(0, 90, 0, 0), Some(90 * MS_PER_MINUTE));
        assert_eq!(make_time(0, 0, -1, 0), Some(-MS_PER_SECOND));
        assert_eq!(make_time(i64::MAX, 0, 0, 0), None);
    }
}
