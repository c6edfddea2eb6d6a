//! Console display settings.
//!
//! Controls the timezone used for the header clock and for calendar-month
//! rollups, how long toast notices stay visible, and how often the clock ticks.

use crate::errors::{Error, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::time::Duration;

const SECONDS_PER_HOUR: i32 = 3600;

/// `[display]` table of config.toml
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Offset from UTC in whole hours, GMT+6 unless configured
    pub utc_offset_hours: i32,
    /// Seconds before a toast notice is dismissed
    pub toast_seconds: u64,
    /// Milliseconds between clock refreshes
    pub clock_tick_millis: u64,
    /// Year of the month preselected on the statement screen
    pub statement_year: i32,
    /// Month (1-12) preselected on the statement screen
    pub statement_month: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 6,
            toast_seconds: 4,
            clock_tick_millis: 1000,
            statement_year: 2026,
            statement_month: 1,
        }
    }
}

impl DisplayConfig {
    /// Fixed offset for the configured hours.
    ///
    /// # Errors
    /// Returns an error when the offset is outside -23..=23 hours.
    pub fn offset(&self) -> Result<FixedOffset> {
        self.utc_offset_hours
            .checked_mul(SECONDS_PER_HOUR)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| Error::Config {
                message: format!("utc_offset_hours out of range: {}", self.utc_offset_hours),
            })
    }

    #[must_use]
    pub const fn toast_delay(&self) -> Duration {
        Duration::from_secs(self.toast_seconds)
    }

    #[must_use]
    pub const fn clock_tick(&self) -> Duration {
        Duration::from_millis(self.clock_tick_millis)
    }

    /// Checks every value can be used by the console.
    pub fn validate(&self) -> Result<()> {
        self.offset()?;
        if self.clock_tick_millis == 0 {
            return Err(Error::Config {
                message: "clock_tick_millis must be greater than zero".to_string(),
            });
        }
        if !(1..=12).contains(&self.statement_month) {
            return Err(Error::Config {
                message: format!("statement_month out of range: {}", self.statement_month),
            });
        }
        Ok(())
    }
}
