//! Webmetric CLI
//!
//! Runs a single web metric measurement, or checks a metric definition
//! without sending a request.
//!
//! # Usage
//!
//! ```bash
//! webmetric --help
//! webmetric run --url http://localhost:8080/stats --json-path '$.count' --success 'result >= 5'
//! webmetric run --metric metric.json
//! webmetric validate --metric metric.json
//! ```
//!
//! `run` prints the measurement as JSON on stdout and exits with 0
//! (Successful), 1 (Failed), 2 (Inconclusive) or 3 (Error).

#![deny(unsafe_code)]

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::MetricArgs;
use std::process::ExitCode;
use tracing::{debug, info};
use webmetric::condition::parse_condition;
use webmetric::extract::JsonPathExtractor;
use webmetric::models::{AnalysisRun, MetricSpec, Phase};
use webmetric::provider::{build_request, new_provider};

/// Webmetric - probe a JSON endpoint and classify the result
#[derive(Parser)]
#[command(name = "webmetric")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true, env = "WEBMETRIC_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take one measurement and print it
    Run(MetricArgs),
    /// Check a metric definition without sending a request
    Validate(MetricArgs),
}

/// Exit code reported for a measurement phase.
fn exit_code(phase: Phase) -> u8 {
    match phase {
        Phase::Successful => 0,
        Phase::Failed => 1,
        Phase::Inconclusive => 2,
        Phase::Error => 3,
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn run(args: &MetricArgs) -> Result<Phase> {
    let metric = args.resolve()?;
    let provider = new_provider(&metric)?;

    info!(metric = %metric.name, provider = provider.provider_type(), "Running measurement");

    let measurement = provider.run(&AnalysisRun::default(), &metric).await;
    println!("{}", serde_json::to_string_pretty(&measurement)?);

    info!(metric = %metric.name, phase = %measurement.phase, "Measurement finished");
    Ok(measurement.phase)
}

/// Collects every problem with a metric definition.
fn check(metric: &MetricSpec) -> Vec<String> {
    let mut problems = Vec::new();

    match metric.web() {
        Some(web) => {
            if let Err(e) = build_request(web) {
                problems.push(e.to_string());
            }
            if let Err(e) = JsonPathExtractor::compile(&web.json_path) {
                problems.push(e.to_string());
            }
        }
        None => problems.push("metric has no web provider configuration".to_string()),
    }

    for (label, condition) in [
        ("success", &metric.success_condition),
        ("failure", &metric.failure_condition),
    ] {
        if condition.is_empty() {
            continue;
        }
        if let Err(e) = parse_condition(condition) {
            problems.push(format!("{label} condition '{condition}': {e}"));
        }
    }

    problems
}

fn validate(args: &MetricArgs) -> Result<bool> {
    let metric = args.resolve()?;
    let problems = check(&metric);

    if problems.is_empty() {
        println!("Metric '{}' is valid", metric.name);
        return Ok(true);
    }

    for problem in &problems {
        println!("{problem}");
    }
    debug!(metric = %metric.name, count = problems.len(), "Metric definition has problems");
    Ok(false)
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let outcome = match &cli.command {
        Commands::Run(args) => run(args).await.map(exit_code),
        Commands::Validate(args) => validate(args).map(|valid| u8::from(!valid)),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_code(Phase::Error))
        }
    }
}
