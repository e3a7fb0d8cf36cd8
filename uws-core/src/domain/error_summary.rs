//! Error summaries reported for failed jobs

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, UwsError};
use crate::xml::{self, ElementResolver, Fields, UwsElement};

/// Summary of the error a job ran into
///
/// A job without an error carries no summary at all rather than an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSummary {
    /// "transient" or "fatal" per the protocol, free text in practice
    #[serde(rename = "type")]
    pub error_type: String,
    pub has_detail: bool,
    pub messages: Vec<String>,
}

impl ErrorSummary {
    pub const TRANSIENT: &'static str = "transient";
    pub const FATAL: &'static str = "fatal";

    pub fn new(
        error_type: impl Into<String>,
        has_detail: bool,
        messages: Vec<String>,
    ) -> Result<Self> {
        let error_type = error_type.into();
        if error_type.is_empty() {
            return Err(UwsError::InvalidArgument(
                "error summary type cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            error_type,
            has_detail,
            messages,
        })
    }

    /// Read an `<errorSummary>` element and its `<message>` children
    pub fn from_xml(node: Node<'_, '_>, resolver: &dyn ElementResolver) -> Result<Self> {
        let error_type = node.attribute("type").unwrap_or(Self::TRANSIENT);
        let has_detail = xml::parse_bool(node.attribute("hasDetail"));

        let messages = Fields::new(node, resolver)
            .children(UwsElement::Message)
            .map(|message| message.text().unwrap_or_default().trim().to_string())
            .collect();

        Ok(Self {
            error_type: error_type.to_string(),
            has_detail,
            messages,
        })
    }

    pub fn is_fatal(&self) -> bool {
        self.error_type == Self::FATAL
    }
}

impl fmt::Display for ErrorSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Error Summary - type '{}' hasDetail: {} - message: {}",
            self.error_type,
            self.has_detail,
            self.messages.join("\n")
        )
    }
}
