//! Job command handlers
//!
//! Handles single-job commands: inspection, blocking waits, creation and the
//! lifecycle transitions a UWS service accepts.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use tracing::info;
use uws_client::UwsClient;
use uws_core::domain::Job;
use uws_core::dto::WaitRequest;

use super::{colorize_phase, print_json};
use crate::config::Config;

/// Job subcommands
#[derive(Subcommand, Debug)]
pub enum JobCommands {
    /// Show job details
    Show {
        /// Job ID
        id: String,

        /// Let the service block for up to N seconds while the job is active (-1 = service maximum)
        #[arg(long, value_name = "N", allow_hyphen_values = true)]
        wait: Option<String>,

        /// Only block while the job is in this phase
        #[arg(long, requires = "wait")]
        phase: Option<String>,
    },
    /// Show only the job phase
    Phase {
        /// Job ID
        id: String,
    },
    /// Create a new job
    New {
        /// Job parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Start the job right after creating it
        #[arg(long)]
        run: bool,
    },
    /// Set parameters of a pending job
    Params {
        /// Job ID
        id: String,

        /// Job parameter (repeatable)
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val, required = true)]
        params: Vec<(String, String)>,
    },
    /// Start a job
    Run {
        /// Job ID
        id: String,
    },
    /// Abort a job
    Abort {
        /// Job ID
        id: String,
    },
    /// Delete a job and its results
    Delete {
        /// Job ID
        id: String,
    },
    /// Change the destruction time of a job
    Destruction {
        /// Job ID
        id: String,

        /// New destruction time (offsets are converted to UTC)
        timestamp: String,
    },
    /// Change the maximum execution time of a job
    Duration {
        /// Job ID
        id: String,

        /// Seconds, 0 for unlimited
        seconds: u64,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
///
/// # Arguments
/// * `command` - The job command to execute
/// * `config` - The CLI configuration
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = config.client()?;

    match command {
        JobCommands::Show { id, wait, phase } => show_job(&client, config, &id, wait, phase).await,
        JobCommands::Phase { id } => show_phase(&client, config, &id).await,
        JobCommands::New { params, run } => new_job(&client, config, &params, run).await,
        JobCommands::Params { id, params } => {
            let job = client
                .set_parameters(&id, &params)
                .await
                .with_context(|| format!("Failed to set parameters of job {}", id))?;
            report(config, &job, "Parameters updated")
        }
        JobCommands::Run { id } => {
            let job = client
                .run_job(&id)
                .await
                .with_context(|| format!("Failed to run job {}", id))?;
            report(config, &job, "Job started")
        }
        JobCommands::Abort { id } => {
            let job = client
                .abort_job(&id)
                .await
                .with_context(|| format!("Failed to abort job {}", id))?;
            report(config, &job, "Job aborted")
        }
        JobCommands::Delete { id } => delete_job(&client, config, &id).await,
        JobCommands::Destruction { id, timestamp } => {
            let job = client
                .set_destruction(&id, &timestamp)
                .await
                .with_context(|| format!("Failed to set destruction of job {}", id))?;
            report(config, &job, "Destruction time updated")
        }
        JobCommands::Duration { id, seconds } => {
            let job = client
                .set_execution_duration(&id, seconds)
                .await
                .with_context(|| format!("Failed to set execution duration of job {}", id))?;
            report(config, &job, "Execution duration updated")
        }
    }
}

/// Get and display a single job, optionally blocking on its phase
async fn show_job(
    client: &UwsClient,
    config: &Config,
    id: &str,
    wait: Option<String>,
    phase: Option<String>,
) -> Result<()> {
    let job = match wait {
        Some(wait) => {
            let request = WaitRequest { wait, phase };
            client.get_job_waiting(id, &request).await
        }
        None => client.get_job(id).await,
    }
    .with_context(|| format!("Failed to get job {}", id))?;

    if config.json {
        return print_json(&job);
    }

    print_job_details(&job);
    Ok(())
}

async fn show_phase(client: &UwsClient, config: &Config, id: &str) -> Result<()> {
    let phase = client
        .get_phase(id)
        .await
        .with_context(|| format!("Failed to get phase of job {}", id))?;

    if config.json {
        return print_json(&phase);
    }

    println!("{}", colorize_phase(phase.as_str()));
    Ok(())
}

/// Create a job and optionally start it
async fn new_job(
    client: &UwsClient,
    config: &Config,
    params: &[(String, String)],
    run: bool,
) -> Result<()> {
    let mut job = client.new_job(params).await.context("Failed to create job")?;
    info!("Created job {}", job.job_id);

    if run {
        job = client
            .run_job(&job.job_id)
            .await
            .with_context(|| format!("Job {} was created but could not be started", job.job_id))?;
    }

    report(config, &job, if run { "Job created and started" } else { "Job created" })
}

async fn delete_job(client: &UwsClient, config: &Config, id: &str) -> Result<()> {
    client
        .delete_job(id)
        .await
        .with_context(|| format!("Failed to delete job {}", id))?;

    if config.json {
        return print_json(&serde_json::json!({ "deleted": id }));
    }

    println!("{} Job {} deleted", "✓".green(), id.cyan());
    Ok(())
}

/// Print the job returned by a state-changing request
fn report(config: &Config, job: &Job, message: &str) -> Result<()> {
    if config.json {
        return print_json(job);
    }

    println!("{} {}", "✓".green(), message);
    println!();
    print_job_details(job);
    Ok(())
}

/// Print detailed job information
fn print_job_details(job: &Job) {
    let phase = job
        .phase()
        .map(|p| colorize_phase(p.as_str()))
        .unwrap_or_else(|| "-".dimmed());

    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.job_id.cyan());
    println!("  Phase:       {}", phase);
    if let Some(run_id) = &job.run_id {
        println!("  Run ID:      {}", run_id);
    }
    if let Some(owner) = &job.owner_id {
        println!("  Owner:       {}", owner);
    }
    if let Some(created) = &job.creation_time {
        println!("  Created:     {}", created);
    }
    println!("  Started:     {}", or_dash(&job.start_time));
    println!("  Ended:       {}", or_dash(&job.end_time));
    if let Some(quote) = &job.quote {
        println!("  Quote:       {}", quote);
    }
    match job.execution_duration {
        0 => println!("  Max runtime: unlimited"),
        seconds => println!("  Max runtime: {}s", seconds),
    }
    println!("  Destruction: {}", or_dash(&job.destruction));

    if !job.parameters.is_empty() {
        println!("\n{}", "Parameters:".bold());
        for parameter in &job.parameters {
            let marker = if parameter.by_reference { " (by reference)" } else { "" };
            println!("  {} = {}{}", parameter.id.cyan(), parameter.value, marker.dimmed());
        }
    }

    if !job.results.is_empty() {
        println!("\n{}", "Results:".bold());
        for result in &job.results {
            println!("  {} {}", result.id.cyan(), result.reference.href.dimmed());
        }
    }

    if let Some(summary) = &job.error_summary {
        let kind = if summary.is_fatal() {
            summary.error_type.red()
        } else {
            summary.error_type.yellow()
        };
        println!("\n{} ({})", "Error:".bold().red(), kind);
        for message in &summary.messages {
            println!("  {}", message);
        }
        if summary.has_detail {
            println!("  {}", "More detail is available from the service".dimmed());
        }
    }

    if !job.job_info.is_empty() {
        println!("\n{}", "Job info:".bold());
        for info in &job.job_info {
            println!("  {}", info.name.cyan());
        }
    }
}

fn or_dash(value: &Option<String>) -> ColoredString {
    match value {
        Some(value) => value.normal(),
        None => "-".dimmed(),
    }
}

/// Parse a `key=value` pair; the value may itself contain `=`
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;

    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }

    Ok((key.to_string(), value.to_string()))
}
