//! Long-poll wait requests
//!
//! A wait asks the server to hold the job request until the job leaves the
//! given phase or the timeout expires. Encoded as `WAIT` followed by an
//! optional `PHASE`.

use serde::{Deserialize, Serialize};

use crate::domain::phase::Phase;
use crate::dto::{ParamValue, QueryParam, is_digits};
use crate::error::{FilterRejection, Result, UwsError};

/// A blocking job request, as supplied by a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitRequest {
    /// Seconds to wait; the sign is passed through, negative values have
    /// server-defined meaning (typically "wait as long as allowed")
    pub wait: String,
    /// Only block while the job is in this (active) phase
    pub phase: Option<String>,
}

impl WaitRequest {
    pub fn new(wait: impl Into<String>) -> Self {
        Self {
            wait: wait.into(),
            phase: None,
        }
    }

    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = Some(phase.into());
        self
    }

    /// Validate and encode the wait
    ///
    /// # Errors
    /// `InvalidFilter` when `wait` is not an integer, the phase is unknown,
    /// or the phase is not active (a job never leaves `COMPLETED`, so a wait
    /// on it would only ever time out).
    pub fn encode(&self) -> Result<Vec<QueryParam>> {
        let wait = parse_wait(&self.wait)?;
        let mut params = vec![("WAIT", ParamValue::Int(wait))];

        if let Some(phase) = &self.phase {
            let parsed = phase
                .parse::<Phase>()
                .map_err(|_| UwsError::invalid_filter(FilterRejection::UnknownPhase, phase))?;
            if !parsed.is_active() {
                return Err(UwsError::invalid_filter(
                    FilterRejection::PhaseNotWaitable,
                    phase,
                ));
            }
            params.push(("PHASE", ParamValue::from(parsed)));
        }

        Ok(params)
    }

    /// The wait in seconds; negative means "as long as the service allows"
    ///
    /// # Errors
    /// `InvalidFilter` with `BadWait` when `wait` is not an integer.
    pub fn seconds(&self) -> Result<i64> {
        parse_wait(&self.wait)
    }
}

fn parse_wait(wait: &str) -> Result<i64> {
    let reject = || UwsError::invalid_filter(FilterRejection::BadWait, wait);
    let magnitude = wait.strip_prefix('-').unwrap_or(wait);
    if !is_digits(magnitude) {
        return Err(reject());
    }
    wait.parse::<i64>().map_err(|_| reject())
}
