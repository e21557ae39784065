#![warn(missing_docs)]
//! # king-gallery-countdown
//!
//! ## Purpose
//! Computes the countdown shown above the gallery.
//!
//! ## Responsibilities
//! - Resolve the next October 26 midnight relative to "now".
//! - Break the remaining time into days, hours, minutes and seconds.
//!
//! ## Data flow
//! Caller supplies the current time -> [`Countdown::starting_at`] fixes the
//! target -> [`Countdown::remaining`] is polled once per tick.
//!
//! ## Error model
//! Only calendar overflow (a target year outside `time`'s range) fails, as
//! [`CountdownError`].
//!
//! ## Example
//! ```rust
//! use king_gallery_countdown::Countdown;
//! use time::macros::datetime;
//!
//! let countdown = Countdown::starting_at(datetime!(2025-10-25 12:00 UTC)).unwrap();
//! let left = countdown.remaining(datetime!(2025-10-25 12:00 UTC));
//! assert_eq!((left.days, left.hours), (0, 12));
//! ```

use std::fmt;

use thiserror::Error;
use time::{Date, Month, OffsetDateTime};

/// Month of the countdown target.
pub const TARGET_MONTH: Month = Month::October;

/// Day of month of the countdown target.
pub const TARGET_DAY: u8 = 26;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Remaining time split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeLeft {
    /// Whole days.
    pub days: i64,
    /// Hours past the whole days, `0..24`.
    pub hours: u8,
    /// Minutes past the whole hours, `0..60`.
    pub minutes: u8,
    /// Seconds past the whole minutes, `0..60`.
    pub seconds: u8,
}

impl TimeLeft {
    /// Splits a second count; negative counts clamp to zero.
    pub fn from_seconds(total: i64) -> Self {
        if total <= 0 {
            return Self::default();
        }

        Self {
            days: total / SECONDS_PER_DAY,
            hours: ((total % SECONDS_PER_DAY) / SECONDS_PER_HOUR) as u8,
            minutes: ((total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE) as u8,
            seconds: (total % SECONDS_PER_MINUTE) as u8,
        }
    }

    /// Returns `true` once every unit is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Units as two-digit, zero-padded strings: days, hours, minutes, seconds.
    pub fn padded(&self) -> [String; 4] {
        [
            format!("{:02}", self.days),
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        ]
    }
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [days, hours, minutes, seconds] = self.padded();
        write!(f, "{days} days {hours}:{minutes}:{seconds}")
    }
}

/// Countdown to a fixed target instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    target: OffsetDateTime,
}

impl Countdown {
    /// Counts down to an explicit instant.
    pub fn to(target: OffsetDateTime) -> Self {
        Self { target }
    }

    /// Counts down to the next target date after `now`.
    ///
    /// # Errors
    /// Returns [`CountdownError::OutOfRange`] when the target year cannot be
    /// represented.
    pub fn starting_at(now: OffsetDateTime) -> Result<Self, CountdownError> {
        next_target(now).map(Self::to)
    }

    /// Target instant.
    pub fn target(&self) -> OffsetDateTime {
        self.target
    }

    /// Time left at `now`; zero once the target has passed.
    pub fn remaining(&self, now: OffsetDateTime) -> TimeLeft {
        time_left(now, self.target)
    }

    /// Returns `true` once `now` reaches the target.
    pub fn is_finished(&self, now: OffsetDateTime) -> bool {
        now >= self.target
    }
}

/// Time left from `now` until `target`; zero once `target` is reached.
pub fn time_left(now: OffsetDateTime, target: OffsetDateTime) -> TimeLeft {
    TimeLeft::from_seconds((target - now).whole_seconds())
}

/// Returns October 26 at midnight in `now`'s offset, this year if still ahead
/// and next year otherwise.
///
/// # Errors
/// Returns [`CountdownError::OutOfRange`] for unrepresentable years.
pub fn next_target(now: OffsetDateTime) -> Result<OffsetDateTime, CountdownError> {
    let this_year = target_in_year(now, now.year())?;
    if this_year < now {
        return target_in_year(now, now.year() + 1);
    }
    Ok(this_year)
}

fn target_in_year(now: OffsetDateTime, year: i32) -> Result<OffsetDateTime, CountdownError> {
    let date = Date::from_calendar_date(year, TARGET_MONTH, TARGET_DAY)
        .map_err(|error| CountdownError::OutOfRange(error.to_string()))?;
    Ok(date.midnight().assume_offset(now.offset()))
}

/// Countdown errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CountdownError {
    /// Target date cannot be represented.
    #[error("countdown target out of range: {0}")]
    OutOfRange(String),
}
