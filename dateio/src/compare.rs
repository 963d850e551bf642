//! Comparison and calendar queries

use crate::date::DateIo;
use crate::input::Input;
use crate::unit::Unit;
use dateio_core::calendar;

impl DateIo {
    /// Whether both values fall in the same period of `unit`
    ///
    /// `Unit::Millisecond` compares instants. Input that cannot be
    /// normalized is never the same.
    pub fn is_same(&self, other: impl Into<Input>, unit: Unit) -> bool {
        let Ok(other) = self.init(other) else {
            return false;
        };
        match (self.start_of(unit), other.start_of(unit)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_leap_year(&self) -> bool {
        calendar::is_leap_year(self.year())
    }

    /// Length of the current month in days
    pub fn days_in_month(&self) -> u32 {
        let c = self.components();
        calendar::days_in_month(c.year, c.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::tests::utc;

    #[test]
    fn test_is_same_is_reflexive() {
        let d = utc("2018-05-02 11:12:13.432");
        for unit in Unit::ALL {
            assert!(d.is_same(&d, unit), "{}", unit);
        }
    }

    #[test]
    fn test_is_same_by_unit() {
        let d = utc("2018-05-02 11:12:13.432");
        assert!(!d.is_same("2018-05-02 11:12:13", Unit::Millisecond));
        assert!(d.is_same("2018-05-02 11:12:13", Unit::Second));
        assert!(d.is_same("2018-05-02 11:59", Unit::Hour));
        assert!(!d.is_same("2018-05-02 12:00", Unit::Hour));
        assert!(d.is_same("2018-05-31", Unit::Month));
        assert!(d.is_same("2018-12-31", Unit::Year));
        assert!(!d.is_same("2019-01-01", Unit::Year));
        // Sunday Apr 29 and Saturday May 5 bound the same week
        assert!(d.is_same("2018-04-29", Unit::Week));
        assert!(d.is_same("2018-05-05 23:59", Unit::Week));
        assert!(!d.is_same("2018-05-06", Unit::Week));
    }

    #[test]
    fn test_is_same_never_fails() {
        let d = utc("2018-05-02");
        assert!(!d.is_same("otherString", Unit::Day));
        assert!(!d.is_same(Vec::<i64>::new(), Unit::Day));
    }

    #[test]
    fn test_leap_years() {
        assert!(utc("2016-02-01").is_leap_year());
        assert!(utc("2000-02-01").is_leap_year());
        assert!(!utc("1900-02-01").is_leap_year());
        assert!(!utc("2018-02-01").is_leap_year());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(utc("2016-02-10").days_in_month(), 29);
        assert_eq!(utc("2018-02-10").days_in_month(), 28);
        assert_eq!(utc("2018-04-10").days_in_month(), 30);
        assert_eq!(utc("2018-12-31").days_in_month(), 31);
    }
}
