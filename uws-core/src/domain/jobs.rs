//! Job list domain types
//!
//! The job-list endpoint returns summaries (`jobref` elements), not full jobs.
//! Phase values in a list are kept exactly as the server sent them, so a
//! newer server's phases do not break listing.

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::domain::phase::{self, Phase};
use crate::domain::reference::Reference;
use crate::error::{Result, UwsError};
use crate::xml::{self, ElementResolver, Fields, UwsElement, UwsNamespace};

/// One page of the job list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jobs {
    pub version: String,
    pub job_refs: Vec<JobRef>,
}

/// Summary entry for a job in a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRef {
    pub id: String,
    /// Phase names as reported, normally exactly one
    pub phases: Vec<String>,
    pub reference: Reference,
    pub run_id: Option<String>,
    pub owner_id: Option<String>,
    pub creation_time: Option<String>,
}

impl Jobs {
    /// An empty list
    pub fn new() -> Self {
        Self {
            version: xml::DEFAULT_VERSION.to_string(),
            job_refs: Vec::new(),
        }
    }

    /// Parse a job-list document
    ///
    /// # Errors
    /// `ProtocolMismatch` for a document outside the UWS (or xlink) namespace,
    /// `MalformedElement` for a `jobref` without id or hyperlink.
    pub fn parse(xml: impl AsRef<[u8]>) -> Result<Self> {
        let text = xml::decode(xml.as_ref())?;
        let doc = xml::parse_document(text)?;
        let root = doc.root_element();
        let ns = UwsNamespace::resolve(root)?;

        let job_refs = Fields::new(root, &ns)
            .children(UwsElement::JobRef)
            .map(|node| JobRef::from_xml(node, &ns))
            .collect::<Result<Vec<_>>>()?;

        let jobs = Self {
            version: xml::version_of(root),
            job_refs,
        };
        debug!(
            "Parsed job list (version {}, {} job(s))",
            jobs.version,
            jobs.job_refs.len()
        );

        Ok(jobs)
    }

    pub fn add_job(&mut self, job_ref: JobRef) {
        self.job_refs.push(job_ref);
    }

    /// Add an entry with a simple link to `href`
    pub fn add(
        &mut self,
        id: impl Into<String>,
        href: impl Into<String>,
        phase: Phase,
    ) -> Result<()> {
        let job_ref = JobRef::new(id, vec![phase], Reference::new(href)?)?;
        self.job_refs.push(job_ref);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.job_refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.job_refs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobRef> {
        self.job_refs.iter()
    }
}

impl Default for Jobs {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a Jobs {
    type Item = &'a JobRef;
    type IntoIter = std::slice::Iter<'a, JobRef>;

    fn into_iter(self) -> Self::IntoIter {
        self.job_refs.iter()
    }
}

impl fmt::Display for Jobs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for job_ref in &self.job_refs {
            writeln!(f, "{}", job_ref)?;
        }
        Ok(())
    }
}

impl JobRef {
    /// Build an entry from known values
    ///
    /// # Errors
    /// `InvalidArgument` for an empty id or an empty phase list.
    pub fn new(
        id: impl Into<String>,
        phases: impl IntoIterator<Item = Phase>,
        reference: Reference,
    ) -> Result<Self> {
        let id = id.into();
        let phases: Vec<String> = phases.into_iter().map(|p| p.to_string()).collect();

        if id.is_empty() {
            return Err(UwsError::InvalidArgument("jobref id cannot be empty".to_string()));
        }
        if phases.is_empty() {
            return Err(UwsError::InvalidArgument(format!(
                "jobref '{}' needs at least one phase",
                id
            )));
        }

        Ok(Self {
            id,
            phases,
            reference,
            run_id: None,
            owner_id: None,
            creation_time: None,
        })
    }

    /// Read a `jobref` element
    pub fn from_xml(node: Node<'_, '_>, resolver: &dyn ElementResolver) -> Result<Self> {
        let fields = Fields::new(node, resolver);

        let id = node
            .attribute("id")
            .ok_or_else(|| UwsError::malformed(xml::tag_of(node), "jobref without id"))?
            .to_string();

        let phases: Vec<String> = fields
            .children(UwsElement::Phase)
            .filter_map(|p| p.text())
            .map(|p| p.trim().to_string())
            .collect();
        for unknown in phases.iter().filter(|p| !phase::is_legal(p)) {
            warn!("Job {} reports unrecognised phase '{}'", id, unknown);
        }

        // UWS 1.0 carries these as attributes, 1.1 as child elements
        let run_id = attribute_or_child(node, &fields, "runId", UwsElement::RunId);
        let owner_id = attribute_or_child(node, &fields, "ownerId", UwsElement::OwnerId);
        let creation_time =
            attribute_or_child(node, &fields, "creationTime", UwsElement::CreationTime);

        Ok(Self {
            reference: Reference::from_xml(node)?,
            id,
            phases,
            run_id,
            owner_id,
            creation_time,
        })
    }

    /// Parse a document whose root is a single `jobref`
    pub fn parse(xml: impl AsRef<[u8]>) -> Result<Self> {
        let text = xml::decode(xml.as_ref())?;
        let doc = xml::parse_document(text)?;
        let root = doc.root_element();
        let ns = UwsNamespace::resolve(root)?;

        Self::from_xml(root, &ns)
    }

    /// First reported phase name
    pub fn phase(&self) -> Option<&str> {
        self.phases.first().map(String::as_str)
    }

    /// First reported phase, if it is one this crate knows
    pub fn known_phase(&self) -> Option<Phase> {
        self.phase().and_then(|p| p.parse().ok())
    }

    /// Overwrite the locally held phase
    ///
    /// Local bookkeeping only: the server is not contacted and a later
    /// fetch may report something else.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phases = vec![phase.to_string()];
    }
}

fn attribute_or_child(
    node: Node<'_, '_>,
    fields: &Fields<'_, '_>,
    attribute: &str,
    element: UwsElement,
) -> Option<String> {
    node.attribute(attribute)
        .map(str::to_string)
        .or_else(|| fields.optional(element))
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Job '{}' in phase '{}'", self.id, self.phases.join(", "))?;
        if let Some(created) = &self.creation_time {
            write!(f, " created at '{}'", created)?;
        }
        write!(f, " - {}", self.reference)
    }
}
