//! Day and time-interval primitives for conflict checking.

use std::str::FromStr;

use chrono::{NaiveTime, Weekday};

use crate::generator::GenerateError;
use crate::models::Session;

/// Parse a weekday label case-insensitively ("monday", "Mon", "TUESDAY").
pub fn parse_day(label: &str) -> Result<Weekday, GenerateError> {
    Weekday::from_str(label.trim()).map_err(|_| GenerateError::UnknownDay(label.to_string()))
}

/// The time footprint of one session: a weekday plus a half-open
/// [start, end) interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeBlock {
    pub day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeBlock {
    pub fn from_session(session: &Session) -> Result<Self, GenerateError> {
        Ok(Self {
            day: parse_day(&session.day)?,
            start: session.start_time,
            end: session.end_time,
        })
    }

    /// Half-open interval intersection on the same weekday.
    ///
    /// Touching endpoints (one block ending exactly when the other starts)
    /// do not conflict.
    pub fn conflicts_with(&self, other: &TimeBlock) -> bool {
        self.day == other.day && self.start < other.end && other.start < self.end
    }
}
