//! Differences between two values

use crate::date::DateIo;
use crate::input::Input;
use crate::unit::Unit;
use dateio_core::Error;

impl DateIo {
    /// `self - other` in whole units, truncated toward zero
    pub fn diff(&self, other: impl Into<Input>, unit: Unit) -> Result<i64, Error> {
        self.diff_float(other, unit).map(|value| value.trunc() as i64)
    }

    /// `self - other` in fractional units
    ///
    /// Months and years are measured on the calendar: whole months between
    /// the two, plus the fraction of the straddling month that remains, so
    /// Jan 15 to Feb 15 is exactly one month whatever the month lengths.
    /// Years are months divided by 12. Every other unit divides the
    /// millisecond difference by the unit's fixed length.
    pub fn diff_float(&self, other: impl Into<Input>, unit: Unit) -> Result<f64, Error> {
        let other = self.init(other)?;
        match unit.months() {
            Some(per_unit) => Ok(month_diff(self, &other)? / per_unit as f64),
            None => Ok((self.epoch_millis() - other.epoch_millis()) as f64 / unit.millis()),
        }
    }
}

/// Months from `b` to `a`, fractional
fn month_diff(a: &DateIo, b: &DateIo) -> Result<f64, Error> {
    // measured from the later day of month so month-end anchors stay valid
    if a.day() < b.day() {
        return month_diff(b, a).map(|months| -months);
    }
    let whole = (b.year() - a.year()) * 12 + (b.month() as i64 - a.month() as i64);
    let anchor = a.add_months(whole)?;
    let remainder = (b.epoch_millis() - anchor.epoch_millis()) as f64;
    let step = if remainder < 0.0 { whole - 1 } else { whole + 1 };
    let next = a.add_months(step)?;
    let month_len = (next.epoch_millis() - anchor.epoch_millis()).abs() as f64;

    let months = -(whole as f64 + remainder / month_len);
    Ok(if months == 0.0 || months.is_nan() { 0.0 } else { months })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::tests::utc;

    #[test]
    fn test_calendar_month_diff() {
        assert_eq!(utc("2016-02-15").diff("2016-01-15", Unit::Month), Ok(1));
        assert_eq!(utc("2016-01-15").diff("2016-02-15", Unit::Month), Ok(-1));
        assert_eq!(utc("2018-07-08").diff("2018-07-08", Unit::Month), Ok(0));
        assert_eq!(utc("2018-09-08").diff("2018-08-08", Unit::Month), Ok(1));
        assert_eq!(utc("2018-07-08").diff("2018-08-08", Unit::Month), Ok(-1));
        assert_eq!(utc("2018-03-31").diff("2018-02-28", Unit::Month), Ok(1));
    }

    #[test]
    fn test_fractional_months() {
        // 15 days back from Jul 16 is half of the 30 days back to Jun 16
        let months = utc("2018-07-16").diff_float("2018-07-01", Unit::Month).unwrap();
        assert_eq!(months, 0.5);
        let months = utc("2018-07-01").diff_float("2018-07-16", Unit::Month).unwrap();
        assert_eq!(months, -0.5);
        // the straddling month sets the scale, not a fixed 30 days
        let months = utc("2018-06-16").diff_float("2018-06-01", Unit::Month).unwrap();
        assert_eq!(months, 15.0 / 31.0);
        // 1.5 months truncates to 1
        assert_eq!(utc("2018-07-16").diff("2018-06-01", Unit::Month), Ok(1));
        assert_eq!(utc("2018-07-08").diff_float("2018-07-08", Unit::Month), Ok(0.0));
    }

    #[test]
    fn test_year_diff() {
        assert_eq!(utc("2020-05-02").diff("2018-05-02", Unit::Year), Ok(2));
        assert_eq!(utc("2018-05-02").diff("2020-05-02", Unit::Year), Ok(-2));
        assert_eq!(utc("2018-11-02").diff_float("2018-05-02", Unit::Year), Ok(0.5));
        assert_eq!(utc("2019-05-01").diff("2018-05-02", Unit::Year), Ok(0));
    }

    #[test]
    fn test_fixed_unit_diff() {
        let a = utc("2018-05-02 11:12:13.432");
        let b = utc("2018-04-24 18:22:40.012");
        let ms = a.epoch_millis() - b.epoch_millis();
        assert_eq!(a.diff(&b, Unit::Millisecond), Ok(ms));
        assert_eq!(a.diff(&b, Unit::Second), Ok(ms / 1000));
        assert_eq!(a.diff(&b, Unit::Minute), Ok(ms / 60_000));
        assert_eq!(a.diff(&b, Unit::Hour), Ok(ms / 3_600_000));
        assert_eq!(a.diff(&b, Unit::Day), Ok(7));
        assert_eq!(a.diff(&b, Unit::Week), Ok(1));
        assert_eq!(b.diff(&a, Unit::Day), Ok(-7));
        assert_eq!(a.diff_float(&b, Unit::Day), Ok(ms as f64 / 86_400_000.0));
        assert_eq!(a.diff(&b, Unit::default()), Ok(ms));
    }

    #[test]
    fn test_diff_normalizes_other() {
        let a = utc("2018-05-02");
        assert_eq!(a.diff(a.epoch_millis() - 1000, Unit::Second), Ok(1));
        assert!(a.diff("otherString", Unit::Day).is_err());
    }
}
