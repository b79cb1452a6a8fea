// SPDX-License-Identifier: MIT

//! Thin CLI entry point over the job server library — enough to drive a
//! single scan job end to end from a terminal. A real deployment would
//! front the library with an HTTP/WebSocket API instead.

mod exit_error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use exit_error::ExitError;
use output::{print_job, OutputFormat};
use scanforge_cache::ScanCache;
use scanforge_core::SystemClock;
use scanforge_report::{ExternalReportGenerator, ReportCoordinator, ReportFormat};
use scanforge_scan::{ExternalScannerShim, ScanResult, ScanServiceConfig};
use scanforge_server::{EventEmitter, Handler, JobServer, JobServerConfig, ScanHandler};
use scanforge_store::JobStore;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Parser)]
#[command(name = "scanforge", about = "Duplicate-detection job orchestrator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single scan job against a repository and print the result.
    Scan {
        /// Path to the repository to scan.
        repository: PathBuf,

        /// Path to the external pattern-detection executable.
        #[arg(long)]
        scanner: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Path to an external report-rendering executable. When set, a
        /// successful scan also produces a report artifact; failures here
        /// are logged and never fail the scan.
        #[arg(long)]
        report_generator: Option<PathBuf>,

        /// Directory report artifacts are written under.
        #[arg(long, default_value = "reports")]
        reports_dir: PathBuf,

        #[arg(long, default_value = "markdown")]
        report_format: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(err) = run().await {
        if let Some(exit) = err.downcast_ref::<ExitError>() {
            eprintln!("{exit}");
            std::process::exit(exit.code);
        }
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Scan { repository, scanner, format, report_generator, reports_dir, report_format } => {
            run_scan(repository, scanner, format, report_generator, reports_dir, report_format).await
        }
    }
}

async fn run_scan(
    repository: PathBuf,
    scanner: PathBuf,
    format: OutputFormat,
    report_generator: Option<PathBuf>,
    reports_dir: PathBuf,
    report_format: String,
) -> Result<()> {
    let store = Arc::new(JobStore::new());
    let cache = Arc::new(ScanCache::new(SystemClock));
    let detector = Arc::new(ExternalScannerShim::new(scanner));
    let events = EventEmitter::new();
    let scan_handler: Arc<ScanHandler<SystemClock>> =
        Arc::new(ScanHandler::new(cache, detector, ScanServiceConfig::default(), events.clone()));

    let mut handlers: HashMap<String, Arc<dyn Handler>> = HashMap::new();
    handlers.insert("scan".to_string(), scan_handler);

    let server = JobServer::new(JobServerConfig {
        clock: SystemClock,
        max_concurrent: 1,
        store,
        handlers,
        default_handler: None,
        events,
    });
    server.start();

    let job = server.create_job(
        format!("cli-scan-{}", std::process::id()),
        "scan",
        "cli",
        serde_json::json!({ "repository_path": repository.to_string_lossy() }),
    );

    loop {
        let current = server.get_job(&job.id).ok_or_else(|| ExitError::new(1, "job vanished from the queue"))?;
        if current.status.is_terminal() {
            server.stop().await;
            print_job(&current, format);
            if current.status == scanforge_core::JobStatus::Failed {
                return Err(ExitError::new(1, "scan failed").into());
            }
            if let Some(generator_path) = report_generator {
                write_report(&current.id, current.result.clone(), generator_path, reports_dir, report_format).await;
            }
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

async fn write_report(
    job_id: &str,
    result: Option<serde_json::Value>,
    generator_path: PathBuf,
    reports_dir: PathBuf,
    report_format: String,
) {
    let Some(format) = ReportFormat::parse(&report_format) else {
        warn!(job_id, report_format, "unknown report format, skipping report generation");
        return;
    };
    let Some(result) = result else {
        warn!(job_id, "scan completed with no result, skipping report generation");
        return;
    };
    let scan: ScanResult = match serde_json::from_value(result) {
        Ok(scan) => scan,
        Err(e) => {
            warn!(job_id, error = %e, "scan result malformed, skipping report generation");
            return;
        }
    };

    let generator = Arc::new(ExternalReportGenerator::new(generator_path));
    let coordinator = ReportCoordinator::new(reports_dir, generator, SystemClock);
    match coordinator.generate_report(job_id, &scan, format).await {
        Ok(artifact) => println!("report written to {}", artifact.path.display()),
        Err(e) => warn!(job_id, error = %e, "report generation failed"),
    }
}
