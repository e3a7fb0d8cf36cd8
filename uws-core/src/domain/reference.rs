//! Typed hyperlinks carried as xlink attributes

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, UwsError};
use crate::xml::{self, XLINK_NAMESPACE};

/// An xlink hyperlink (`xlink:type` + `xlink:href`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "type")]
    pub link_type: String,
    pub href: String,
}

impl Reference {
    /// Link type used when none is given
    pub const SIMPLE: &'static str = "simple";

    /// A simple link to `href`
    pub fn new(href: impl Into<String>) -> Result<Self> {
        Self::with_type(href, Self::SIMPLE)
    }

    /// A link with an explicit xlink type
    ///
    /// The href is kept as given, even when empty; only the type is checked.
    pub fn with_type(href: impl Into<String>, link_type: impl Into<String>) -> Result<Self> {
        let href = href.into();
        let link_type = link_type.into();

        if link_type.is_empty() {
            return Err(UwsError::InvalidArgument(
                "reference type cannot be empty".to_string(),
            ));
        }

        Ok(Self { link_type, href })
    }

    /// Read the xlink attribute pair of an element
    ///
    /// # Errors
    /// `ProtocolMismatch` when the xlink namespace is not in scope,
    /// `MalformedElement` when either attribute is missing.
    pub fn from_xml(node: Node<'_, '_>) -> Result<Self> {
        xml::require_xlink(node)?;

        let link_type = node
            .attribute((XLINK_NAMESPACE, "type"))
            .ok_or_else(|| UwsError::malformed(xml::tag_of(node), "missing xlink:type"))?;
        let href = node
            .attribute((XLINK_NAMESPACE, "href"))
            .ok_or_else(|| UwsError::malformed(xml::tag_of(node), "missing xlink:href"))?;

        Ok(Self {
            link_type: link_type.to_string(),
            href: href.to_string(),
        })
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href)
    }
}
