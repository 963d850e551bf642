//! Configuration carried by every date value

use crate::locale::{self, Locale};
use dateio_core::Zone;
use std::sync::Arc;

/// Locale table and wall-clock zone used by a date value
///
/// `Config::global()` snapshots the process-wide locale; `Config::new()`
/// builds an isolated configuration that never observes global changes.
#[derive(Debug, Clone)]
pub struct Config {
    locale: Arc<Locale>,
    zone: Zone,
}

impl Config {
    pub fn new(locale: Locale) -> Self {
        Self {
            locale: Arc::new(locale),
            zone: Zone::Local,
        }
    }

    /// Current process-wide locale with the system zone
    pub fn global() -> Self {
        Self {
            locale: locale::global(),
            zone: Zone::Local,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<Arc<Locale>>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::global()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocalePatch;

    #[test]
    fn test_builder() {
        let locale = Locale::default()
            .merge(LocalePatch::new().with_periods(["am", "pm"]))
            .unwrap();
        let config = Config::new(locale).with_zone(Zone::Fixed(3600));
        assert_eq!(config.zone(), Zone::Fixed(3600));
        assert_eq!(config.locale().period(13, 0), "pm");
    }

    #[test]
    fn test_isolated_by_default() {
        let config = Config::new(Locale::default());
        assert_eq!(config.zone(), Zone::Local);
        assert_eq!(config.locale(), &Locale::default());
    }
}
