//! Simulated clock for the Hamlet village.
//!
//! The clock holds the current simulated timestamp and a fixed step. It
//! only ever moves forward, by exactly one step per call to
//! [`SimClock::advance`]. Daily planning keys off the calendar date and
//! micro planning off the `HH:MM` label.

use chrono::{Local, NaiveDate, NaiveDateTime, TimeDelta};

use crate::config::TimeConfig;

/// Format used for the `start` field of the time configuration.
pub const START_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Hour of day the clock starts at when no start is configured.
const DEFAULT_START_HOUR: u32 = 6;

/// Errors that can occur while constructing a clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The configured step is zero, negative, or too large.
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// The configured start timestamp could not be parsed.
    #[error("invalid start time {value:?}: {source}")]
    InvalidStart {
        /// The raw configured value.
        value: String,
        /// The underlying parse error.
        source: chrono::ParseError,
    },
}

/// Monotonic simulated clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    /// The current simulated timestamp.
    current: NaiveDateTime,
    /// How far one step moves the clock.
    step: TimeDelta,
}

impl SimClock {
    /// Create a clock at `start` advancing by `step`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `step` is not positive.
    pub fn new(start: NaiveDateTime, step: TimeDelta) -> Result<Self, ClockError> {
        if step <= TimeDelta::zero() {
            return Err(ClockError::InvalidConfig {
                reason: "step must be positive".to_owned(),
            });
        }
        Ok(Self {
            current: start,
            step,
        })
    }

    /// Create a clock from the `time` configuration section.
    ///
    /// An empty `start` means today at 06:00 local time.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError`] if the step is zero or the start cannot be parsed.
    pub fn from_config(config: &TimeConfig) -> Result<Self, ClockError> {
        let start = if config.start.trim().is_empty() {
            default_start()?
        } else {
            NaiveDateTime::parse_from_str(config.start.trim(), START_FORMAT).map_err(|source| {
                ClockError::InvalidStart {
                    value: config.start.clone(),
                    source,
                }
            })?
        };
        let step = TimeDelta::try_minutes(i64::from(config.step_minutes)).ok_or_else(|| {
            ClockError::InvalidConfig {
                reason: "step_minutes is out of range".to_owned(),
            }
        })?;
        Self::new(start, step)
    }

    /// Advance by one step and return the new time.
    ///
    /// Saturates at the largest representable timestamp.
    pub fn advance(&mut self) -> NaiveDateTime {
        self.current = self
            .current
            .checked_add_signed(self.step)
            .unwrap_or(NaiveDateTime::MAX);
        self.current
    }

    /// The current simulated timestamp.
    pub const fn current_time(&self) -> NaiveDateTime {
        self.current
    }

    /// The configured step size.
    pub const fn step_size(&self) -> TimeDelta {
        self.step
    }

    /// The current simulated calendar date.
    pub fn today(&self) -> NaiveDate {
        self.current.date()
    }

    /// The current time of day formatted `HH:MM`.
    pub fn time_label(&self) -> String {
        self.current.format("%H:%M").to_string()
    }

    /// The current date formatted `YYYY-MM-DD`.
    pub fn date_label(&self) -> String {
        self.current.format("%Y-%m-%d").to_string()
    }
}

/// Today at 06:00 in local time.
fn default_start() -> Result<NaiveDateTime, ClockError> {
    Local::now()
        .date_naive()
        .and_hms_opt(DEFAULT_START_HOUR, 0, 0)
        .ok_or_else(|| ClockError::InvalidConfig {
            reason: "cannot build default start time".to_owned(),
        })
}
