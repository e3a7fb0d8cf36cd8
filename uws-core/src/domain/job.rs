//! Job domain types
//!
//! A `Job` is a snapshot of what the server reported for one job at fetch
//! time. It is built in one go from a response document and is never half
//! populated: a missing mandatory element fails the whole parse.

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::error_summary::ErrorSummary;
use crate::domain::parameter::Parameter;
use crate::domain::phase::Phase;
use crate::domain::reference::Reference;
use crate::domain::result::JobResult;
use crate::error::{Result, UwsError};
use crate::xml::{self, Fields, UwsElement, UwsNamespace};

/// Full representation of a single UWS job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Protocol version declared by the document
    pub version: String,
    pub job_id: String,
    pub run_id: Option<String>,
    pub owner_id: Option<String>,
    /// Current phase, held as a list of one
    pub phases: Vec<Phase>,
    pub quote: Option<String>,
    pub creation_time: Option<String>,
    /// Present in every document, nil until the job starts
    pub start_time: Option<String>,
    /// Present in every document, nil until the job ends
    pub end_time: Option<String>,
    /// Maximum run time in seconds, 0 meaning unlimited
    pub execution_duration: u64,
    pub destruction: Option<String>,
    pub parameters: Vec<Parameter>,
    pub results: Vec<JobResult>,
    pub error_summary: Option<ErrorSummary>,
    pub job_info: Vec<JobInfo>,
}

/// An opaque `jobInfo` child, kept as its source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobInfo {
    pub namespace: Option<String>,
    pub name: String,
    pub xml: String,
}

impl JobInfo {
    fn from_xml(node: Node<'_, '_>) -> Self {
        let source = node.document().input_text();
        Self {
            namespace: node.tag_name().namespace().map(str::to_string),
            name: node.tag_name().name().to_string(),
            xml: source[node.range()].to_string(),
        }
    }
}

impl Job {
    /// A local, pending job with no server state yet
    pub fn new(job_id: impl Into<String>) -> Result<Self> {
        let job_id = job_id.into();
        if job_id.is_empty() {
            return Err(UwsError::InvalidArgument("job id cannot be empty".to_string()));
        }

        Ok(Self {
            version: xml::DEFAULT_VERSION.to_string(),
            job_id,
            run_id: None,
            owner_id: None,
            phases: vec![Phase::Pending],
            quote: None,
            creation_time: None,
            start_time: None,
            end_time: None,
            execution_duration: 0,
            destruction: None,
            parameters: Vec::new(),
            results: Vec::new(),
            error_summary: None,
            job_info: Vec::new(),
        })
    }

    /// Parse a job document
    ///
    /// Accepts raw response bytes or already decoded text.
    ///
    /// # Errors
    /// - `ProtocolMismatch` if the document does not use the UWS namespace
    /// - `MissingMandatoryField` if a required element is absent
    /// - `MalformedElement` if an element has unusable content
    /// - `MalformedDocument` if the input is not UTF-8 XML
    pub fn parse(xml: impl AsRef<[u8]>) -> Result<Self> {
        let text = xml::decode(xml.as_ref())?;
        let doc = xml::parse_document(text)?;
        let root = doc.root_element();
        let ns = UwsNamespace::resolve(root)?;
        let fields = Fields::new(root, &ns);

        let job_id = fields.mandatory_value(UwsElement::JobId)?;
        let phase = parse_phase(&fields.mandatory_value(UwsElement::Phase)?)?;
        let start_time = fields.mandatory(UwsElement::StartTime)?;
        let end_time = fields.mandatory(UwsElement::EndTime)?;
        let execution_duration =
            parse_duration(&fields.mandatory_value(UwsElement::ExecutionDuration)?)?;
        let destruction = fields.mandatory(UwsElement::Destruction)?;

        let parameters = match fields.child(UwsElement::Parameters) {
            Some(container) => xml::elements(container)
                .map(Parameter::from_xml)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let results = match fields.child(UwsElement::Results) {
            Some(container) => xml::elements(container)
                .map(JobResult::from_xml)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let error_summary = fields
            .child(UwsElement::ErrorSummary)
            .map(|node| ErrorSummary::from_xml(node, &ns))
            .transpose()?;

        let job_info = fields
            .child(UwsElement::JobInfo)
            .map(|container| xml::elements(container).map(JobInfo::from_xml).collect())
            .unwrap_or_default();

        let job = Self {
            version: xml::version_of(root),
            job_id,
            run_id: fields.optional(UwsElement::RunId),
            owner_id: fields.optional(UwsElement::OwnerId),
            phases: vec![phase],
            quote: fields.optional(UwsElement::Quote),
            creation_time: fields.optional(UwsElement::CreationTime),
            start_time,
            end_time,
            execution_duration,
            destruction,
            parameters,
            results,
            error_summary,
            job_info,
        };

        debug!(
            "Parsed job {} (version {}, phase {}, {} parameter(s), {} result(s))",
            job.job_id,
            job.version,
            phase,
            job.parameters.len(),
            job.results.len()
        );

        Ok(job)
    }

    /// Current phase
    pub fn phase(&self) -> Option<Phase> {
        self.phases.first().copied()
    }

    /// Overwrite the locally held phase
    ///
    /// This is bookkeeping on the snapshot only. Nothing is sent to the
    /// server and the value says nothing about the server's current state.
    pub fn set_phase(&mut self, phase: Phase) {
        self.phases = vec![phase];
    }

    pub fn add_parameter(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    pub fn add_result(&mut self, result: JobResult) {
        self.results.push(result);
    }

    /// Add a result pointing at `href` with a simple link
    pub fn add_result_link(&mut self, id: impl Into<String>, href: impl Into<String>) -> Result<()> {
        let result = JobResult::new(id, Reference::new(href)?)?;
        self.results.push(result);
        Ok(())
    }

    /// All parameters with the given id, in submission order
    pub fn parameters_named<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Parameter> {
        self.parameters.iter().filter(move |p| p.id == id)
    }

    pub fn result(&self, id: &str) -> Option<&JobResult> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn has_error(&self) -> bool {
        self.error_summary.is_some()
    }
}

fn parse_phase(text: &str) -> Result<Phase> {
    text.parse::<Phase>()
        .map_err(|_| UwsError::malformed("phase", format!("unknown phase '{}'", text)))
}

fn parse_duration(text: &str) -> Result<u64> {
    text.parse::<u64>().map_err(|_| {
        UwsError::malformed(
            "executionDuration",
            format!("'{}' is not a non-negative integer", text),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_JOB: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"
         xmlns:xlink="http://www.w3.org/1999/xlink"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
         version="1.1">
  <uws:jobId>1438356843.4617</uws:jobId>
  <uws:runId>nightly</uws:runId>
  <uws:ownerId>adrian</uws:ownerId>
  <uws:phase>COMPLETED</uws:phase>
  <uws:quote>2015-07-31T15:34:04</uws:quote>
  <uws:creationTime>2015-07-31T15:34:03</uws:creationTime>
  <uws:startTime>2015-07-31T15:34:05</uws:startTime>
  <uws:endTime>2015-07-31T15:34:08</uws:endTime>
  <uws:executionDuration>30</uws:executionDuration>
  <uws:destruction>2015-08-30T15:34:03</uws:destruction>
  <uws:parameters>
    <uws:parameter id="query">SELECT TOP 10 * FROM stars</uws:parameter>
    <uws:parameter id="format" by_reference="false" is_post="true">votable</uws:parameter>
    <uws:parameter id="query">SELECT 1</uws:parameter>
  </uws:parameters>
  <uws:results>
    <uws:result id="votable" xlink:type="simple" xlink:href="http://example.com/uws/1/results/votable"/>
    <uws:result id="csv" xlink:type="simple" xlink:href="http://example.com/uws/1/results/csv"/>
  </uws:results>
  <uws:jobInfo>
    <stats rows="10"/>
    <note>done</note>
  </uws:jobInfo>
</uws:job>"#;

    const PENDING_JOB: &str = r#"<uws:job xmlns:uws="http://www.ivoa.net/xml/UWS/v1.0"
         xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <uws:jobId>42</uws:jobId>
  <uws:phase>PENDING</uws:phase>
  <uws:startTime xsi:nil="true"/>
  <uws:endTime xsi:nil="true"/>
  <uws:executionDuration>0</uws:executionDuration>
  <uws:destruction>2015-08-30T15:34:03</uws:destruction>
</uws:job>"#;

    #[test]
    fn test_parse_full_job() {
        let job = Job::parse(FULL_JOB).unwrap();

        assert_eq!(job.version, "1.1");
        assert_eq!(job.job_id, "1438356843.4617");
        assert_eq!(job.run_id.as_deref(), Some("nightly"));
        assert_eq!(job.owner_id.as_deref(), Some("adrian"));
        assert_eq!(job.phases, vec![Phase::Completed]);
        assert_eq!(job.quote.as_deref(), Some("2015-07-31T15:34:04"));
        assert_eq!(job.creation_time.as_deref(), Some("2015-07-31T15:34:03"));
        assert_eq!(job.start_time.as_deref(), Some("2015-07-31T15:34:05"));
        assert_eq!(job.end_time.as_deref(), Some("2015-07-31T15:34:08"));
        assert_eq!(job.execution_duration, 30);
        assert_eq!(job.destruction.as_deref(), Some("2015-08-30T15:34:03"));
        assert!(job.error_summary.is_none());
    }

    #[test]
    fn test_parse_keeps_parameter_order_and_duplicates() {
        let job = Job::parse(FULL_JOB.as_bytes()).unwrap();

        let ids: Vec<&str> = job.parameters.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["query", "format", "query"]);
        assert!(job.parameters[1].is_post);
        assert_eq!(job.parameters_named("query").count(), 2);
    }

    #[test]
    fn test_parse_results() {
        let job = Job::parse(FULL_JOB).unwrap();

        assert_eq!(job.results.len(), 2);
        assert_eq!(job.results[0].id, "votable");
        assert_eq!(
            job.result("csv").map(|r| r.reference.href.as_str()),
            Some("http://example.com/uws/1/results/csv")
        );
    }

    #[test]
    fn test_parse_keeps_job_info_verbatim() {
        let job = Job::parse(FULL_JOB).unwrap();

        assert_eq!(job.job_info.len(), 2);
        assert_eq!(job.job_info[0].name, "stats");
        assert_eq!(job.job_info[0].xml, r#"<stats rows="10"/>"#);
        assert_eq!(job.job_info[1].xml, "<note>done</note>");
        assert_eq!(job.job_info[1].namespace, None);
    }

    #[test]
    fn test_parse_pending_job_with_nil_times() {
        let job = Job::parse(PENDING_JOB).unwrap();

        assert_eq!(job.version, "1.0");
        assert_eq!(job.phase(), Some(Phase::Pending));
        assert_eq!(job.start_time, None);
        assert_eq!(job.end_time, None);
        assert_eq!(job.run_id, None);
        assert!(job.parameters.is_empty());
        assert!(job.results.is_empty());
        assert!(job.job_info.is_empty());
    }

    #[test]
    fn test_missing_destruction_is_mandatory_field_error() {
        let xml = PENDING_JOB.replace(
            "<uws:destruction>2015-08-30T15:34:03</uws:destruction>",
            "",
        );
        let err = Job::parse(xml).unwrap_err();
        assert!(
            matches!(&err, UwsError::MissingMandatoryField(name) if name.ends_with("destruction")),
            "unexpected error: {:?}",
            err
        );
    }

    #[test]
    fn test_missing_start_time_is_mandatory_field_error() {
        let xml = PENDING_JOB.replace(r#"<uws:startTime xsi:nil="true"/>"#, "");
        assert!(matches!(
            Job::parse(xml),
            Err(UwsError::MissingMandatoryField(_))
        ));
    }

    #[test]
    fn test_absent_error_summary_is_none() {
        let job = Job::parse(PENDING_JOB).unwrap();
        assert_eq!(job.error_summary, None);
        assert!(!job.has_error());
    }

    #[test]
    fn test_empty_error_summary_is_present() {
        let xml = PENDING_JOB.replace(
            "</uws:job>",
            r#"<uws:errorSummary type="transient" hasDetail="false"/></uws:job>"#,
        );
        let job = Job::parse(xml).unwrap();
        let summary = job.error_summary.expect("error summary should be present");
        assert!(summary.messages.is_empty());
        assert_eq!(summary.error_type, "transient");
    }

    #[test]
    fn test_error_summary_messages() {
        let xml = PENDING_JOB
            .replace("PENDING", "ERROR")
            .replace(
                "</uws:job>",
                r#"<uws:errorSummary type="fatal" hasDetail="true"><uws:message>Syntax error</uws:message></uws:errorSummary></uws:job>"#,
            );
        let job = Job::parse(xml).unwrap();
        assert_eq!(job.phase(), Some(Phase::Error));
        let summary = job.error_summary.unwrap();
        assert!(summary.is_fatal());
        assert_eq!(summary.messages, vec!["Syntax error"]);
    }

    #[test]
    fn test_non_numeric_duration_is_malformed() {
        let xml = PENDING_JOB.replace(
            "<uws:executionDuration>0</uws:executionDuration>",
            "<uws:executionDuration>ten</uws:executionDuration>",
        );
        assert!(matches!(
            Job::parse(xml),
            Err(UwsError::MalformedElement { element, .. }) if element == "executionDuration"
        ));

        let xml = PENDING_JOB.replace(
            "<uws:executionDuration>0</uws:executionDuration>",
            "<uws:executionDuration>-5</uws:executionDuration>",
        );
        assert!(matches!(
            Job::parse(xml),
            Err(UwsError::MalformedElement { .. })
        ));
    }

    #[test]
    fn test_unknown_phase_is_malformed() {
        let xml = PENDING_JOB.replace("PENDING", "SLEEPING");
        assert!(matches!(
            Job::parse(xml),
            Err(UwsError::MalformedElement { .. })
        ));
    }

    #[test]
    fn test_wrong_namespace_is_protocol_mismatch() {
        let xml = PENDING_JOB.replace(
            "http://www.ivoa.net/xml/UWS/v1.0",
            "http://www.ivoa.net/xml/UWS/v2.0",
        );
        assert!(matches!(
            Job::parse(xml),
            Err(UwsError::ProtocolMismatch { .. })
        ));
    }

    #[test]
    fn test_result_without_xlink_namespace_is_protocol_mismatch() {
        let xml = PENDING_JOB.replace(
            "</uws:job>",
            r#"<uws:results><uws:result id="r" href="http://x"/></uws:results></uws:job>"#,
        );
        assert!(matches!(
            Job::parse(xml),
            Err(UwsError::ProtocolMismatch { vocabulary: "xlink", .. })
        ));
    }

    #[test]
    fn test_local_job_and_set_phase() {
        let mut job = Job::new("local").unwrap();
        assert_eq!(job.phase(), Some(Phase::Pending));

        job.add_parameter(Parameter::new("n", "1").unwrap());
        job.add_result_link("out", "http://x/out").unwrap();
        job.set_phase(Phase::Queued);

        assert_eq!(job.phases, vec![Phase::Queued]);
        assert_eq!(job.parameters.len(), 1);
        assert_eq!(job.results[0].reference.link_type, "simple");
    }

    #[test]
    fn test_serializes_to_json() {
        let job = Job::parse(FULL_JOB).unwrap();
        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["phases"][0], "COMPLETED");
        assert_eq!(json["results"][0]["reference"]["type"], "simple");
        assert!(json["error_summary"].is_null());
    }
}
