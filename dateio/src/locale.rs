//! Locale tables
//!
//! A locale supplies the display strings behind the `W`, `a`/`A`, `Mo` and
//! `mo` tokens. Tables are immutable once built; changing one means merging
//! a [`LocalePatch`] into it, which produces a new table. The process-wide
//! table lives behind [`global`] / [`configure`] and is what
//! `Config::global()` snapshots.

use dateio_core::Error;
use serde::de::Deserializer;
use serde::ser::{Error as _, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Computes a period-of-day label from (hour, minute)
pub type PeriodFn = Arc<dyn Fn(u32, u32) -> String + Send + Sync>;

/// How the `a` / `A` tokens name the part of the day
#[derive(Clone)]
pub enum Periods {
    /// Equal subdivisions of the 24-hour day, earliest first
    Buckets(Vec<String>),
    /// A function of hour and minute; bypasses bucket counting
    Custom(PeriodFn),
}

impl Periods {
    pub fn custom(f: impl Fn(u32, u32) -> String + Send + Sync + 'static) -> Self {
        Periods::Custom(Arc::new(f))
    }

    /// Label for a wall-clock hour and minute
    pub fn label(&self, hour: u32, minute: u32) -> String {
        match self {
            Periods::Custom(f) => f(hour, minute),
            Periods::Buckets(names) => {
                let index = (hour as usize * names.len()) / 24;
                names.get(index).cloned().unwrap_or_default()
            }
        }
    }
}

impl fmt::Debug for Periods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Periods::Buckets(names) => f.debug_tuple("Buckets").field(names).finish(),
            Periods::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

impl PartialEq for Periods {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Periods::Buckets(a), Periods::Buckets(b)) => a == b,
            (Periods::Custom(a), Periods::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for Periods {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Periods::Buckets(names) => names.serialize(serializer),
            Periods::Custom(_) => Err(S::Error::custom("a period function cannot be serialized")),
        }
    }
}

impl<'de> Deserialize<'de> for Periods {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<String>::deserialize(deserializer).map(Periods::Buckets)
    }
}

// ============================================================================
// Locale
// ============================================================================

/// Display strings for weekday, month and period-of-day tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Locale {
    /// Indexed by weekday, 0 = Sunday
    pub weekdays: Vec<String>,
    /// Indexed by zero-based month
    pub months: Vec<String>,
    pub months_short: Vec<String>,
    #[serde(rename = "interval")]
    pub periods: Periods,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            weekdays: strings(&["日", "一", "二", "三", "四", "五", "六"]),
            months: strings(&[
                "一月", "二月", "三月", "四月", "五月", "六月",
                "七月", "八月", "九月", "十月", "十一月", "十二月",
            ]),
            months_short: strings(&[
                "1月", "2月", "3月", "4月", "5月", "6月",
                "7月", "8月", "9月", "10月", "11月", "12月",
            ]),
            // Four periods by default; patch with more or fewer as needed
            periods: Periods::Buckets(strings(&["凌晨", "上午", "下午", "晚上"])),
        }
    }
}

impl Locale {
    pub fn weekday(&self, weekday: u32) -> &str {
        self.weekdays.get(weekday as usize).map(String::as_str).unwrap_or("")
    }

    /// Long month name for a 1-based month
    pub fn month(&self, month: u32) -> &str {
        name_at(&self.months, month)
    }

    /// Short month name for a 1-based month
    pub fn month_short(&self, month: u32) -> &str {
        name_at(&self.months_short, month)
    }

    pub fn period(&self, hour: u32, minute: u32) -> String {
        self.periods.label(hour, minute)
    }

    /// Shallow merge: every key present in the patch replaces the current one
    pub fn merge(&self, patch: LocalePatch) -> Result<Locale, Error> {
        let merged = Locale {
            weekdays: patch.weekdays.unwrap_or_else(|| self.weekdays.clone()),
            months: patch.months.unwrap_or_else(|| self.months.clone()),
            months_short: patch.months_short.unwrap_or_else(|| self.months_short.clone()),
            periods: patch.periods.unwrap_or_else(|| self.periods.clone()),
        };
        merged.validate()?;
        Ok(merged)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.weekdays.len() != 7 {
            return Err(Error::Locale(format!("expected 7 weekdays, got {}", self.weekdays.len())));
        }
        if self.months.len() != 12 {
            return Err(Error::Locale(format!("expected 12 months, got {}", self.months.len())));
        }
        if self.months_short.len() != 12 {
            return Err(Error::Locale(format!(
                "expected 12 short months, got {}",
                self.months_short.len()
            )));
        }
        if let Periods::Buckets(names) = &self.periods {
            if names.is_empty() {
                return Err(Error::Locale("at least one period of day is required".to_string()));
            }
        }
        Ok(())
    }
}

fn name_at(names: &[String], month: u32) -> &str {
    month
        .checked_sub(1)
        .and_then(|index| names.get(index as usize))
        .map(String::as_str)
        .unwrap_or("")
}

// ============================================================================
// LocalePatch
// ============================================================================

/// A partial locale, merged key-by-key over an existing table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocalePatch {
    pub weekdays: Option<Vec<String>>,
    pub months: Option<Vec<String>>,
    pub months_short: Option<Vec<String>>,
    #[serde(rename = "interval")]
    pub periods: Option<Periods>,
}

impl LocalePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a patch from JSON, e.g. `{"interval": ["a.m.", "p.m."]}`
    pub fn from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(|e| Error::Locale(e.to_string()))
    }

    pub fn with_weekdays<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.weekdays = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_months<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.months = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_months_short<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.months_short = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_periods<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.periods = Some(Periods::Buckets(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn with_period_fn(mut self, f: impl Fn(u32, u32) -> String + Send + Sync + 'static) -> Self {
        self.periods = Some(Periods::custom(f));
        self
    }

    fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        if self.weekdays.is_some() {
            keys.push("weekdays");
        }
        if self.months.is_some() {
            keys.push("months");
        }
        if self.months_short.is_some() {
            keys.push("monthsShort");
        }
        if self.periods.is_some() {
            keys.push("interval");
        }
        keys
    }
}

// ============================================================================
// Process-wide table
// ============================================================================

fn table() -> &'static RwLock<Arc<Locale>> {
    static GLOBAL: OnceLock<RwLock<Arc<Locale>>> = OnceLock::new();
    GLOBAL.get_or_init(|| RwLock::new(Arc::new(Locale::default())))
}

/// Snapshot of the process-wide locale
pub fn global() -> Arc<Locale> {
    table().read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Merge a patch into the process-wide locale and return the new table
///
/// Values created afterwards (and configs snapshotted afterwards) see the
/// change; existing values keep the table they were created with.
pub fn configure(patch: LocalePatch) -> Result<Arc<Locale>, Error> {
    let keys = patch.keys();
    let mut current = table().write().unwrap_or_else(PoisonError::into_inner);
    let merged = Arc::new(current.merge(patch)?);
    *current = Arc::clone(&merged);
    tracing::debug!(?keys, "global locale reconfigured");
    Ok(merged)
}

/// Restore the process-wide locale to the built-in defaults
pub fn reset() -> Arc<Locale> {
    let fresh = Arc::new(Locale::default());
    *table().write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&fresh);
    tracing::debug!("global locale reset to defaults");
    fresh
}

// ============================================================================
// Tests
// ============================================================================
