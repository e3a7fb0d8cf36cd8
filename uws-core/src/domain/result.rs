//! Job results

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::reference::Reference;
use crate::error::{Result, UwsError};
use crate::xml;

/// A result produced by a job, addressed by an xlink reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobResult {
    pub id: String,
    pub reference: Reference,
}

impl JobResult {
    pub fn new(id: impl Into<String>, reference: Reference) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(UwsError::InvalidArgument(
                "result id cannot be empty".to_string(),
            ));
        }

        Ok(Self { id, reference })
    }

    /// Read a `<result id=".." xlink:href=".."/>` element
    pub fn from_xml(node: Node<'_, '_>) -> Result<Self> {
        let id = node
            .attribute("id")
            .ok_or_else(|| UwsError::malformed(xml::tag_of(node), "result without id"))?;

        Ok(Self {
            id: id.to_string(),
            reference: Reference::from_xml(node)?,
        })
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Result id '{}' reference: {}", self.id, self.reference)
    }
}
