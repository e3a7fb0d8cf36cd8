//! Job phases
//!
//! The closed set of UWS execution phases, which of them are active (a job in
//! that phase can still move, so a long-poll wait on it is meaningful) and
//! which protocol versions define each one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UwsError;

/// Execution phase of a UWS job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Completed,
    Pending,
    Queued,
    Executing,
    Error,
    Aborted,
    Unknown,
    Held,
    Suspended,
    Archived,
}

impl Phase {
    /// Every legal phase
    pub const ALL: [Phase; 10] = [
        Phase::Completed,
        Phase::Pending,
        Phase::Queued,
        Phase::Executing,
        Phase::Error,
        Phase::Aborted,
        Phase::Unknown,
        Phase::Held,
        Phase::Suspended,
        Phase::Archived,
    ];

    /// Wire name of the phase
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Completed => "COMPLETED",
            Phase::Pending => "PENDING",
            Phase::Queued => "QUEUED",
            Phase::Executing => "EXECUTING",
            Phase::Error => "ERROR",
            Phase::Aborted => "ABORTED",
            Phase::Unknown => "UNKNOWN",
            Phase::Held => "HELD",
            Phase::Suspended => "SUSPENDED",
            Phase::Archived => "ARCHIVED",
        }
    }

    /// Whether a blocking wait can be placed on this phase
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Pending | Phase::Queued | Phase::Executing)
    }

    /// Protocol versions that define this phase
    pub fn versions(self) -> &'static [&'static str] {
        match self {
            Phase::Archived => &["1.1"],
            _ => &["1.0", "1.1"],
        }
    }

    /// Whether this phase exists in the given protocol version
    pub fn legal_in_version(self, version: &str) -> bool {
        self.versions().iter().any(|v| *v == version)
    }
}

/// Whether `phase` is the wire name of a legal phase
pub fn is_legal(phase: &str) -> bool {
    phase.parse::<Phase>().is_ok()
}

impl FromStr for Phase {
    type Err = UwsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == s)
            .ok_or_else(|| UwsError::InvalidArgument(format!("unknown phase '{}'", s)))
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
