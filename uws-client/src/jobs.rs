//! Job-related UWS endpoints

use std::time::Duration;

use tracing::debug;
use uws_core::UwsError;
use uws_core::domain::{Job, Jobs, Phase};
use uws_core::dto::{ListFilter, WaitRequest, normalize_timestamp};

use crate::UwsClient;
use crate::error::{ClientError, Result};
use crate::server::JobServer;

impl<S: JobServer> UwsClient<S> {
    // =============================================================================
    // Job Queries
    // =============================================================================

    /// List jobs matching a filter
    ///
    /// The filter is validated before anything is sent.
    pub async fn get_job_list(&self, filter: &ListFilter) -> Result<Jobs> {
        let params = filter.encode()?;
        let body = self.server.get("", &params).await?;

        Ok(Jobs::parse(body)?)
    }

    /// List jobs with a filter checked against the service's protocol version
    ///
    /// The version is the one a previous listing reported (`Jobs::version`);
    /// a phase that version does not define is rejected before sending.
    ///
    /// # Arguments
    /// * `filter` - Phases, creation time and count to filter on
    /// * `version` - UWS version of the service, e.g. "1.0"
    pub async fn get_job_list_for_version(&self, filter: &ListFilter, version: &str) -> Result<Jobs> {
        let params = filter.encode_for_version(version)?;
        let body = self.server.get("", &params).await?;

        Ok(Jobs::parse(body)?)
    }

    /// Get the current state of a job
    pub async fn get_job(&self, job_id: &str) -> Result<Job> {
        let body = self.server.get(&job_path(job_id, None)?, &[]).await?;

        Ok(Job::parse(body)?)
    }

    /// Get a job, letting the server block until it leaves its phase
    ///
    /// # Arguments
    /// * `job_id` - The job to fetch
    /// * `wait` - Maximum wait and, optionally, the active phase to wait on
    ///
    /// A negative wait leaves the request open for as long as the service
    /// allows; otherwise the transport timeout is extended by the wait.
    pub async fn get_job_waiting(&self, job_id: &str, wait: &WaitRequest) -> Result<Job> {
        let params = wait.encode()?;
        let limit = u64::try_from(wait.seconds()?).ok().map(Duration::from_secs);
        debug!("Waiting on job {} ({} s)", job_id, wait.wait);
        let body = self
            .server
            .get_blocking(&job_path(job_id, None)?, &params, limit)
            .await?;

        Ok(Job::parse(body)?)
    }

    /// Get only the phase of a job
    pub async fn get_phase(&self, job_id: &str) -> Result<Phase> {
        let body = self
            .server
            .get(&job_path(job_id, Some("phase"))?, &[])
            .await?;

        let text = String::from_utf8_lossy(&body);
        let text = text.trim();
        text.parse::<Phase>().map_err(|_| {
            ClientError::from(UwsError::malformed("phase", format!("unknown phase '{}'", text)))
        })
    }

    // =============================================================================
    // Job Lifecycle
    // =============================================================================

    /// Create a job in the PENDING phase
    ///
    /// # Arguments
    /// * `parameters` - Service-specific parameters, in submission order
    ///
    /// # Returns
    /// The created job, as reported by the service
    pub async fn new_job(&self, parameters: &[(String, String)]) -> Result<Job> {
        let body = self.server.post("", parameters).await?;

        Ok(Job::parse(body)?)
    }

    /// Add or replace parameters of a pending job
    pub async fn set_parameters(&self, job_id: &str, parameters: &[(String, String)]) -> Result<Job> {
        if parameters.is_empty() {
            return Err(ClientError::InvalidRequest(
                "at least one parameter is required".to_string(),
            ));
        }

        let body = self
            .server
            .post(&job_path(job_id, Some("parameters"))?, parameters)
            .await?;

        Ok(Job::parse(body)?)
    }

    /// Start a pending job
    pub async fn run_job(&self, job_id: &str) -> Result<Job> {
        self.post_phase(job_id, "RUN").await
    }

    /// Abort a job
    pub async fn abort_job(&self, job_id: &str) -> Result<Job> {
        self.post_phase(job_id, "ABORT").await
    }

    /// Delete a job and its results
    pub async fn delete_job(&self, job_id: &str) -> Result<()> {
        self.server.delete(&job_path(job_id, None)?).await?;

        Ok(())
    }

    /// Change when the service destroys the job
    ///
    /// The timestamp is checked and normalized to UTC like an `after` filter.
    pub async fn set_destruction(&self, job_id: &str, timestamp: &str) -> Result<Job> {
        let destruction = normalize_timestamp(timestamp)?;
        let form = [("DESTRUCTION".to_string(), destruction)];
        let body = self
            .server
            .post(&job_path(job_id, Some("destruction"))?, &form)
            .await?;

        Ok(Job::parse(body)?)
    }

    /// Change the maximum run time of a job, in seconds (0 = unlimited)
    pub async fn set_execution_duration(&self, job_id: &str, seconds: u64) -> Result<Job> {
        let form = [("EXECUTIONDURATION".to_string(), seconds.to_string())];
        let body = self
            .server
            .post(&job_path(job_id, Some("executionduration"))?, &form)
            .await?;

        Ok(Job::parse(body)?)
    }

    async fn post_phase(&self, job_id: &str, action: &str) -> Result<Job> {
        let form = [("PHASE".to_string(), action.to_string())];
        let body = self
            .server
            .post(&job_path(job_id, Some("phase"))?, &form)
            .await?;

        Ok(Job::parse(body)?)
    }
}

/// Path of a job (or one of its sub-resources) relative to the job list
fn job_path(job_id: &str, resource: Option<&str>) -> Result<String> {
    let job_id = job_id.trim_matches('/');
    if job_id.is_empty() {
        return Err(ClientError::InvalidRequest("job id cannot be empty".to_string()));
    }

    Ok(match resource {
        Some(resource) => format!("{}/{}", job_id, resource),
        None => job_id.to_string(),
    })
}
