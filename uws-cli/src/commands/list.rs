//! List command handler

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use uws_core::domain::JobRef;
use uws_core::dto::ListFilter;

use super::{colorize_phase, print_json};
use crate::config::Config;

/// Filters for the job list
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only jobs in this phase (repeatable)
    #[arg(long = "phase", value_name = "PHASE")]
    phases: Vec<String>,

    /// Only jobs created after this timestamp (offsets are converted to UTC)
    #[arg(long)]
    after: Option<String>,

    /// Only the N most recently created jobs
    #[arg(long, value_name = "N")]
    last: Option<String>,

    /// UWS version of the service; phases it does not define are rejected
    #[arg(long, value_name = "VERSION")]
    protocol_version: Option<String>,
}

impl ListArgs {
    fn filter(&self) -> ListFilter {
        ListFilter {
            phases: self.phases.clone(),
            after: self.after.clone(),
            last: self.last.clone(),
        }
    }
}

/// List jobs matching the given filters
pub async fn handle_list_command(args: ListArgs, config: &Config) -> Result<()> {
    let client = config.client()?;
    let filter = args.filter();
    let jobs = match &args.protocol_version {
        Some(version) => client.get_job_list_for_version(&filter, version).await,
        None => client.get_job_list(&filter).await,
    }
    .context("Failed to list jobs")?;

    if config.json {
        return print_json(&jobs);
    }

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job_ref in &jobs {
            print_job_ref(job_ref);
        }
    }

    Ok(())
}

fn print_job_ref(job_ref: &JobRef) {
    let phases: Vec<String> = job_ref
        .phases
        .iter()
        .map(|p| colorize_phase(p).to_string())
        .collect();

    println!("  {} Job {}", "▸".cyan(), job_ref.id.bold());
    println!("    Phase:   {}", phases.join(", "));
    if let Some(created) = &job_ref.creation_time {
        println!("    Created: {}", created.dimmed());
    }
    if let Some(owner) = &job_ref.owner_id {
        println!("    Owner:   {}", owner);
    }
    println!("    Link:    {}", job_ref.reference.href.dimmed());
    println!();
}
