//! Error types for UWS parsing and request encoding

use std::fmt;
use thiserror::Error;

/// Result type alias for UWS core operations
pub type Result<T> = std::result::Result<T, UwsError>;

/// Reason a job-list filter or wait request was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterRejection {
    /// Phase name outside the closed set of UWS phases
    UnknownPhase,
    /// Timestamp that cannot be parsed
    BadTimestamp,
    /// `LAST` value that is not a non-negative integer
    BadLast,
    /// `WAIT` value that is not an integer
    BadWait,
    /// Phase the job can never leave, so a wait on it is never signalled
    PhaseNotWaitable,
    /// Phase that the target protocol version does not define
    PhaseNotInVersion,
}

impl fmt::Display for FilterRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRejection::UnknownPhase => write!(f, "unknown phase"),
            FilterRejection::BadTimestamp => write!(f, "bad timestamp"),
            FilterRejection::BadLast => write!(f, "last must be a non-negative integer"),
            FilterRejection::BadWait => write!(f, "wait must be an integer"),
            FilterRejection::PhaseNotWaitable => write!(f, "phase not waitable"),
            FilterRejection::PhaseNotInVersion => write!(f, "phase not defined in this UWS version"),
        }
    }
}

/// Errors raised while parsing UWS documents or encoding client requests
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UwsError {
    /// The document does not declare a supported UWS (or xlink) namespace
    #[error("No supported {vocabulary} namespace found in xml response (expected {expected})")]
    ProtocolMismatch {
        /// Vocabulary that was looked for ("UWS" or "xlink")
        vocabulary: &'static str,
        /// Namespace URI that would have been accepted
        expected: &'static str,
    },

    /// A protocol-required element is absent
    #[error("Mandatory element {0} could not be found in xml response")]
    MissingMandatoryField(String),

    /// A present element or attribute has unusable content
    #[error("Malformed element {element}: {reason}")]
    MalformedElement {
        /// Element the problem was found on
        element: String,
        /// What was wrong with it
        reason: String,
    },

    /// Ill-typed or empty value passed to a from-values constructor
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// User-facing filter or wait input failed validation
    #[error("Invalid filter, {reason}: '{value}'")]
    InvalidFilter {
        /// Why the input was rejected
        reason: FilterRejection,
        /// The offending input
        value: String,
    },

    /// Input is not UTF-8 or not well-formed XML
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}

impl UwsError {
    /// Create a malformed-element error
    pub fn malformed(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedElement {
            element: element.into(),
            reason: reason.into(),
        }
    }

    /// Create a filter rejection for the given input
    pub fn invalid_filter(reason: FilterRejection, value: impl Into<String>) -> Self {
        Self::InvalidFilter {
            reason,
            value: value.into(),
        }
    }

    /// Whether the fault lies with the values the caller supplied
    pub fn is_client_fault(&self) -> bool {
        matches!(self, Self::InvalidFilter { .. } | Self::InvalidArgument(_))
    }

    /// Whether the fault lies with a non-conformant server response
    pub fn is_server_fault(&self) -> bool {
        matches!(
            self,
            Self::ProtocolMismatch { .. }
                | Self::MissingMandatoryField(_)
                | Self::MalformedElement { .. }
                | Self::MalformedDocument(_)
        )
    }

    /// The rejection reason, if this is a filter error
    pub fn filter_rejection(&self) -> Option<FilterRejection> {
        match self {
            Self::InvalidFilter { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}
