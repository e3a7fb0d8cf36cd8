//! Job parameters

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, UwsError};
use crate::xml;

/// A parameter submitted with a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    pub value: String,
    pub by_reference: bool,
    pub is_post: bool,
}

impl Parameter {
    /// A plain inline parameter
    pub fn new(id: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(UwsError::InvalidArgument(
                "parameter id cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            id,
            value: value.into(),
            by_reference: false,
            is_post: false,
        })
    }

    /// Mark the value as a URL to be dereferenced by the server
    pub fn with_by_reference(mut self, by_reference: bool) -> Self {
        self.by_reference = by_reference;
        self
    }

    /// Mark the parameter as submitted through POST
    pub fn with_is_post(mut self, is_post: bool) -> Self {
        self.is_post = is_post;
        self
    }

    /// Read a `<parameter id="..">value</parameter>` element
    pub fn from_xml(node: Node<'_, '_>) -> Result<Self> {
        let id = node
            .attribute("id")
            .ok_or_else(|| UwsError::malformed(xml::tag_of(node), "parameter without id"))?;
        let value = node.text().ok_or_else(|| {
            UwsError::malformed(xml::tag_of(node), format!("parameter '{}' has no value", id))
        })?;

        // Schema spelling first, then the underscore form some services emit
        let by_reference = xml::parse_bool(
            node.attribute("byReference")
                .or_else(|| node.attribute("by_reference")),
        );
        let is_post = xml::parse_bool(node.attribute("isPost").or_else(|| node.attribute("is_post")));

        Ok(Self {
            id: id.to_string(),
            value: value.to_string(),
            by_reference,
            is_post,
        })
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Parameter id '{}' byRef: {} is_post: {} - value: {}",
            self.id, self.by_reference, self.is_post, self.value
        )
    }
}
