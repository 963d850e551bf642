//! Calendar arithmetic: adding quantities and snapping to period boundaries

use crate::date::DateIo;
use crate::unit::{Quantity, Unit};
use dateio_core::calendar::{
    days_from_civil, days_in_month, make_date, make_day, MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_SECOND,
};
use dateio_core::{Error, Instant};

impl DateIo {
    // ========== Add / Subtract ==========

    /// Add a signed quantity
    ///
    /// Accepts anything convertible to a [`Quantity`]: a number of
    /// milliseconds, an `(amount, Unit)` pair, or text such as `"1m"` or
    /// `"-3.5i"`. Months and years step the calendar: the whole part moves
    /// the month field and clamps the day to the target month's length
    /// (Jan 31 + 1 month is the last day of February). A fractional
    /// remainder is then priced at 30 days per month or 365 days per year.
    /// Every other unit is a fixed number of milliseconds.
    pub fn add<Q>(&self, quantity: Q) -> Result<Self, Error>
    where
        Q: TryInto<Quantity>,
        Error: From<Q::Error>,
    {
        self.add_quantity(quantity.try_into()?)
    }

    /// Subtract a signed quantity; the negation of [`DateIo::add`]
    pub fn subtract<Q>(&self, quantity: Q) -> Result<Self, Error>
    where
        Q: TryInto<Quantity>,
        Error: From<Q::Error>,
    {
        let quantity: Quantity = quantity.try_into()?;
        self.add_quantity(-quantity)
    }

    pub(crate) fn add_quantity(&self, quantity: Quantity) -> Result<Self, Error> {
        let Quantity { amount, unit } = quantity;
        if !amount.is_finite() {
            return Err(Error::invalid_quantity(amount.to_string(), "number"));
        }
        match unit.months() {
            Some(per_unit) => {
                let whole = amount.trunc();
                let months = whole * per_unit as f64;
                if months.abs() > 1e12 {
                    return Err(Error::out_of_range(format!("{} months", months)));
                }
                self.add_months(months as i64)?
                    .shift((amount - whole) * unit.millis())
            }
            None => self.shift(amount * unit.millis()),
        }
    }

    /// Move by whole calendar months, clamping the day of month
    pub(crate) fn add_months(&self, months: i64) -> Result<Self, Error> {
        if months == 0 {
            return Ok(self.clone());
        }
        let c = self.components();
        let total = (c.month as i64 - 1)
            .checked_add(months)
            .ok_or_else(|| Error::out_of_range(format!("{} months", months)))?;
        let year = c.year.checked_add(total.div_euclid(12));
        let wall = year.and_then(|year| {
            let month = (total.rem_euclid(12) + 1) as u32;
            let day = c.day.min(days_in_month(year, month));
            make_date(make_day(year, month as i64 - 1, day as i64)?, c.time_of_day())
        });
        self.at_wall(wall)
    }

    /// Shift the instant by milliseconds, truncated toward zero
    fn shift(&self, millis: f64) -> Result<Self, Error> {
        let millis = millis.trunc();
        if millis.abs() > 2.0 * Instant::MAX_MILLIS as f64 {
            return Err(Error::out_of_range(format!("{} ms", millis)));
        }
        Ok(self.at(self.instant().checked_add_millis(millis as i64)?))
    }

    // ========== Period Boundaries ==========

    /// First millisecond of the period containing this value
    ///
    /// Weeks start on Sunday. `Unit::Millisecond` returns the value as is.
    pub fn start_of(&self, unit: Unit) -> Result<Self, Error> {
        self.snap(unit, false)
    }

    /// Last millisecond of the period containing this value
    ///
    /// Weeks end on Saturday. `Unit::Millisecond` returns the value as is.
    pub fn end_of(&self, unit: Unit) -> Result<Self, Error> {
        self.snap(unit, true)
    }

    fn snap(&self, unit: Unit, end: bool) -> Result<Self, Error> {
        let c = self.components();
        let today = days_from_civil(c.year, c.month, c.day);
        let hour = c.hour as i64 * MS_PER_HOUR;
        let minute = hour + c.minute as i64 * MS_PER_MINUTE;
        let second = minute + c.second as i64 * MS_PER_SECOND;

        // (first day, start of the time span, span length)
        let (days, time, span) = match unit {
            Unit::Millisecond => return Ok(self.clone()),
            Unit::Second => (today, second, MS_PER_SECOND),
            Unit::Minute => (today, minute, MS_PER_MINUTE),
            Unit::Hour => (today, hour, MS_PER_HOUR),
            Unit::Day => (today, 0, MS_PER_DAY),
            Unit::Week => {
                let sunday = today - c.weekday as i64;
                (if end { sunday + 6 } else { sunday }, 0, MS_PER_DAY)
            }
            Unit::Month => {
                let last = days_in_month(c.year, c.month) as i64;
                (today - c.day as i64 + if end { last } else { 1 }, 0, MS_PER_DAY)
            }
            Unit::Year => {
                let (month, day) = if end { (12, 31) } else { (1, 1) };
                (days_from_civil(c.year, month, day), 0, MS_PER_DAY)
            }
        };
        let time = if end { time + span - 1 } else { time };
        self.at_wall(make_date(days, time))
    }
}
