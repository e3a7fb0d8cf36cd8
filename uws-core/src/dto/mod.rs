//! Request parameter encoding
//!
//! Turns loosely typed user input (job-list filters, long-poll waits) into the
//! ordered query parameters a UWS server expects. All validation happens up
//! front: an encoder either returns the complete list or an error, never a
//! partial list.

pub mod filter;
pub mod wait;

pub use filter::{ListFilter, normalize_timestamp};
pub use wait::WaitRequest;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::phase::Phase;

/// Value of a single query parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Text(String),
}

/// One `(KEY, value)` query parameter; order in a list is significant
pub type QueryParam = (&'static str, ParamValue);

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<Phase> for ParamValue {
    fn from(phase: Phase) -> Self {
        ParamValue::Text(phase.as_str().to_string())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::Text(value) => f.write_str(value),
        }
    }
}

/// Render parameters as string pairs for a URL query or form body
pub fn to_pairs(params: &[QueryParam]) -> Vec<(String, String)> {
    params
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Non-empty run of ASCII digits
pub(crate) fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}
