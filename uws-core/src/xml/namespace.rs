//! Namespace resolution
//!
//! Every UWS element name has to be qualified by its namespace before lookup,
//! since bare names collide with other vocabularies embedded in the same
//! document. A resolver is bound once per parsed document and handed to every
//! model constructor that reads elements.

use roxmltree::Node;
use std::fmt;

use crate::error::{Result, UwsError};

/// Namespace of UWS 1.0 and 1.1 documents
pub const UWS_1_NAMESPACE: &str = "http://www.ivoa.net/xml/UWS/v1.0";

/// Namespace of xlink hyperlink attributes
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// Namespaces this crate can parse, in order of preference
const SUPPORTED_NAMESPACES: &[&str] = &[UWS_1_NAMESPACE];

/// The fixed set of UWS elements read by the models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UwsElement {
    Jobs,
    JobRef,
    Phase,
    JobId,
    RunId,
    OwnerId,
    Quote,
    CreationTime,
    StartTime,
    EndTime,
    ExecutionDuration,
    Destruction,
    Parameters,
    Results,
    ErrorSummary,
    Message,
    JobInfo,
}

impl UwsElement {
    /// Local (unqualified) element name as it appears on the wire
    pub fn local_name(self) -> &'static str {
        match self {
            UwsElement::Jobs => "jobs",
            UwsElement::JobRef => "jobref",
            UwsElement::Phase => "phase",
            UwsElement::JobId => "jobId",
            UwsElement::RunId => "runId",
            UwsElement::OwnerId => "ownerId",
            UwsElement::Quote => "quote",
            UwsElement::CreationTime => "creationTime",
            UwsElement::StartTime => "startTime",
            UwsElement::EndTime => "endTime",
            UwsElement::ExecutionDuration => "executionDuration",
            UwsElement::Destruction => "destruction",
            UwsElement::Parameters => "parameters",
            UwsElement::Results => "results",
            UwsElement::ErrorSummary => "errorSummary",
            UwsElement::Message => "message",
            UwsElement::JobInfo => "jobInfo",
        }
    }
}

impl fmt::Display for UwsElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.local_name())
    }
}

/// Produces namespace-qualified names for UWS elements
pub trait ElementResolver: Send + Sync {
    /// Namespace URI the resolver is bound to
    fn namespace(&self) -> &'static str;

    /// `(namespace, local name)` pair for an element, usable as a roxmltree lookup key
    fn qualified(&self, element: UwsElement) -> (&'static str, &'static str) {
        (self.namespace(), element.local_name())
    }

    /// Clark notation (`{namespace}local`) for error messages
    fn clark_name(&self, element: UwsElement) -> String {
        format!("{{{}}}{}", self.namespace(), element.local_name())
    }
}

/// Resolver bound to the UWS namespace a document declares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UwsNamespace {
    uri: &'static str,
}

impl UwsNamespace {
    /// Select the supported UWS namespace from the namespaces in scope at `node`
    ///
    /// # Errors
    /// Returns `ProtocolMismatch` if none of the supported namespace URIs is declared.
    pub fn resolve(node: Node<'_, '_>) -> Result<Self> {
        SUPPORTED_NAMESPACES
            .iter()
            .find(|uri| declares(node, uri))
            .map(|uri| Self { uri })
            .ok_or(UwsError::ProtocolMismatch {
                vocabulary: "UWS",
                expected: UWS_1_NAMESPACE,
            })
    }
}

impl ElementResolver for UwsNamespace {
    fn namespace(&self) -> &'static str {
        self.uri
    }
}

/// Whether `uri` is bound to some prefix (or the default namespace) at `node`
pub fn declares(node: Node<'_, '_>, uri: &str) -> bool {
    node.namespaces().any(|ns| ns.uri() == uri)
}

/// Fail with `ProtocolMismatch` unless the xlink namespace is in scope at `node`
pub fn require_xlink(node: Node<'_, '_>) -> Result<()> {
    if declares(node, XLINK_NAMESPACE) {
        Ok(())
    } else {
        Err(UwsError::ProtocolMismatch {
            vocabulary: "xlink",
            expected: XLINK_NAMESPACE,
        })
    }
}
