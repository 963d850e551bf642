//! Construction inputs and their normalization to an instant

use crate::date::DateIo;
use crate::parse;
use dateio_core::calendar::{make_date, make_day, make_time};
use dateio_core::{Error, Instant, Zone};
use std::time::SystemTime;

/// Anything a date value can be built from
///
/// `Components` is `[year, month (1-12), day, hour, minute, second,
/// millisecond]`; missing trailing parts default to month 1, day 1 and
/// zero time, and out-of-range parts overflow into the larger fields
/// (`[2018, 13]` is January 2019). A single element is a year.
#[derive(Debug, Clone)]
pub enum Input {
    /// The current time
    Absent,
    /// Epoch milliseconds
    Millis(i64),
    /// Epoch milliseconds, truncated; NaN means the current time
    Number(f64),
    Text(String),
    Components(Vec<i64>),
    Date(DateIo),
    System(SystemTime),
}

impl Input {
    /// Kind name used in error reports
    pub fn kind(&self) -> &'static str {
        match self {
            Input::Absent => "absent",
            Input::Millis(_) | Input::Number(_) => "number",
            Input::Text(_) => "string",
            Input::Components(_) => "components",
            Input::Date(_) => "dateio",
            Input::System(_) => "system time",
        }
    }

    /// Resolve to an instant, reading wall-clock inputs in `zone`
    pub(crate) fn normalize(self, zone: Zone) -> Result<Instant, Error> {
        let kind = self.kind();
        let instant = match self {
            Input::Absent => Ok(Instant::now()),
            Input::Millis(millis) => Instant::from_millis(millis),
            Input::Number(n) if n.is_nan() => Ok(Instant::now()),
            Input::Number(n) if n.is_infinite() => Err(Error::parse(n.to_string(), kind)),
            Input::Number(n) => {
                let millis = n.trunc();
                if millis.abs() > Instant::MAX_MILLIS as f64 {
                    Err(Error::out_of_range(format!("{} ms since epoch", n)))
                } else {
                    Instant::from_millis(millis as i64)
                }
            }
            Input::Text(text) => parse::parse(&text, zone),
            Input::Components(parts) => from_components(&parts, zone),
            Input::Date(date) => Ok(date.instant()),
            Input::System(time) => Instant::from_system_time(time),
        }?;
        tracing::trace!(kind, millis = instant.as_millis(), "normalized input");
        Ok(instant)
    }
}

fn from_components(parts: &[i64], zone: Zone) -> Result<Instant, Error> {
    if parts.is_empty() {
        return Err(Error::components(parts, "at least a year is required"));
    }
    if parts.len() > 7 {
        return Err(Error::components(parts, "at most 7 components are accepted"));
    }
    let part = |i: usize, default: i64| parts.get(i).copied().unwrap_or(default);
    let wall = part(1, 1)
        .checked_sub(1)
        .and_then(|month0| make_day(parts[0], month0, part(2, 1)))
        .and_then(|days| make_date(days, make_time(part(3, 0), part(4, 0), part(5, 0), part(6, 0))?));
    match wall {
        Some(wall) => zone.from_wall(wall),
        None => Err(Error::components(parts, "out of range")),
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<()> for Input {
    fn from(_: ()) -> Self {
        Input::Absent
    }
}

impl From<i64> for Input {
    fn from(millis: i64) -> Self {
        Input::Millis(millis)
    }
}

impl From<i32> for Input {
    fn from(millis: i32) -> Self {
        Input::Millis(millis as i64)
    }
}

impl From<f64> for Input {
    fn from(millis: f64) -> Self {
        Input::Number(millis)
    }
}

impl From<Instant> for Input {
    fn from(instant: Instant) -> Self {
        Input::Millis(instant.as_millis())
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<&String> for Input {
    fn from(text: &String) -> Self {
        Input::Text(text.clone())
    }
}

impl From<Vec<i64>> for Input {
    fn from(parts: Vec<i64>) -> Self {
        Input::Components(parts)
    }
}

impl From<&[i64]> for Input {
    fn from(parts: &[i64]) -> Self {
        Input::Components(parts.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for Input {
    fn from(parts: [i64; N]) -> Self {
        Input::Components(parts.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for Input {
    fn from(parts: [i32; N]) -> Self {
        Input::Components(parts.iter().map(|&p| p as i64).collect())
    }
}

impl From<DateIo> for Input {
    fn from(date: DateIo) -> Self {
        Input::Date(date)
    }
}

impl From<&DateIo> for Input {
    fn from(date: &DateIo) -> Self {
        Input::Date(date.clone())
    }
}

impl From<SystemTime> for Input {
    fn from(time: SystemTime) -> Self {
        Input::System(time)
    }
}

impl<T: Into<Input>> From<Option<T>> for Input {
    fn from(input: Option<T>) -> Self {
        input.map_or(Input::Absent, Into::into)
    }
}
