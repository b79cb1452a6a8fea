// SPDX-License-Identifier: MIT

//! Shared text/JSON output formatting for CLI commands.

use clap::ValueEnum;
use scanforge_core::Job;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn print_job(job: &Job, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(job).unwrap_or_else(|_| "{}".to_string()));
        }
        OutputFormat::Text => {
            println!("job {} [{}]", job.id, job.status);
            if let Some(result) = &job.result {
                println!("result: {result}");
            }
            if let Some(error) = &job.error {
                println!("error: {} ({:?})", error.message, error.code);
            }
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
