//! Job-list filters
//!
//! A filter bundles up to three constraints on the job list: a set of phases,
//! a lower bound on creation time and a cap on the number of entries. They
//! are always encoded in the order `PHASE*`, `AFTER?`, `LAST?`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::domain::phase::Phase;
use crate::dto::{ParamValue, QueryParam, is_digits};
use crate::error::{FilterRejection, Result, UwsError};

/// Output format for `AFTER` and `DESTRUCTION` timestamps (UTC, microseconds, no offset)
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Filters for the job-list endpoint, as supplied by a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFilter {
    /// Phase names; a job matches if it is in any of them
    #[serde(default)]
    pub phases: Vec<String>,
    /// Only jobs created after this timestamp (offset-aware or naive)
    pub after: Option<String>,
    /// Only the most recent N jobs
    pub last: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phases.push(phase.into());
        self
    }

    pub fn with_after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn with_last(mut self, last: impl Into<String>) -> Self {
        self.last = Some(last.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty() && self.after.is_none() && self.last.is_none()
    }

    /// Validate and encode the filter
    ///
    /// # Errors
    /// `InvalidFilter` on the first unknown phase, unparsable timestamp or
    /// `last` value that is not a non-negative integer.
    pub fn encode(&self) -> Result<Vec<QueryParam>> {
        let mut params = Vec::with_capacity(self.phases.len() + 2);

        for phase in &self.phases {
            let parsed = phase
                .parse::<Phase>()
                .map_err(|_| UwsError::invalid_filter(FilterRejection::UnknownPhase, phase))?;
            params.push(("PHASE", ParamValue::from(parsed)));
        }

        if let Some(after) = &self.after {
            params.push(("AFTER", ParamValue::Text(normalize_timestamp(after)?)));
        }

        if let Some(last) = &self.last {
            params.push(("LAST", ParamValue::Int(parse_last(last)?)));
        }

        Ok(params)
    }

    /// Encode the filter for a server speaking `version`
    ///
    /// Like [`ListFilter::encode`], and also rejects phases the version does
    /// not define (e.g. `ARCHIVED` against a 1.0 service).
    pub fn encode_for_version(&self, version: &str) -> Result<Vec<QueryParam>> {
        let params = self.encode()?;

        for phase in &self.phases {
            let known = phase
                .parse::<Phase>()
                .map_err(|_| UwsError::invalid_filter(FilterRejection::UnknownPhase, phase))?;
            if !known.legal_in_version(version) {
                return Err(UwsError::invalid_filter(
                    FilterRejection::PhaseNotInVersion,
                    phase,
                ));
            }
        }

        Ok(params)
    }
}

/// Normalize a user timestamp to UTC civil time with six fractional digits
///
/// Accepts `YYYY-MM-DD`, optionally followed by `T` (or a space) and
/// `HH:MM[:SS[.fff]]`, optionally followed by `Z` or a numeric offset such
/// as `+2:00`, `+02:00`, `-0530` or `+02`.
///
/// # Errors
/// `InvalidFilter` with `BadTimestamp` when the input does not parse.
///
/// # Example
/// ```
/// use uws_core::dto::normalize_timestamp;
///
/// assert_eq!(
///     normalize_timestamp("2015-10-03T01:12+2:00").unwrap(),
///     "2015-10-02T23:12:00.000000"
/// );
/// ```
pub fn normalize_timestamp(input: &str) -> Result<String> {
    parse_timestamp(input.trim())
        .map(|utc| utc.format(TIMESTAMP_FORMAT).to_string())
        .ok_or_else(|| UwsError::invalid_filter(FilterRejection::BadTimestamp, input))
}

fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let (date, time) = match input.split_once(['T', ' ']) {
        Some((date, time)) => (date, Some(time)),
        None => (input, None),
    };

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let Some(time) = time else {
        return Some(date.and_time(NaiveTime::MIN));
    };

    let (clock, offset_seconds) = split_offset(time)?;
    let clock = NaiveTime::parse_from_str(clock, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M"))
        .ok()?;

    date.and_time(clock)
        .checked_sub_signed(TimeDelta::try_seconds(offset_seconds)?)
}

/// Split `HH:MM...` from a trailing UTC offset, returning the offset in seconds
fn split_offset(time: &str) -> Option<(&str, i64)> {
    if let Some(clock) = time.strip_suffix(['Z', 'z']) {
        return Some((clock, 0));
    }

    let Some(at) = time.find(['+', '-']) else {
        return Some((time, 0));
    };
    let (clock, offset) = time.split_at(at);
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let digits = &offset[1..];

    let (hours, minutes) = match digits.split_once(':') {
        Some(parts) => parts,
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "00"),
    };
    if !is_digits(hours) || hours.len() > 2 || !is_digits(minutes) || minutes.len() != 2 {
        return None;
    }

    let hours: i64 = hours.parse().ok()?;
    let minutes: i64 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    Some((clock, sign * (hours * 3600 + minutes * 60)))
}

fn parse_last(last: &str) -> Result<i64> {
    let reject = || UwsError::invalid_filter(FilterRejection::BadLast, last);
    if !is_digits(last) {
        return Err(reject());
    }
    last.parse::<i64>().map_err(|_| reject())
}
