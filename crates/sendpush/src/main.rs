mod cli;
mod settings;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pushover::Pushover;

use cli::Args;

fn run(args: &Args) -> Result<ExitCode> {
    let settings = settings::load_settings(&args.config)?;
    let job = settings::resolve(args, &settings)?;

    let client = Pushover::new(job.app_key.as_str()).context("building client")?;
    let resp = client
        .push_with_blocking(&job.title, &job.message, &job.options)
        .context("sending push")?;

    if resp.is_accepted() {
        println!("{}", resp.request);
        return Ok(ExitCode::SUCCESS);
    }

    tracing::debug!(status = resp.status, request_id = %resp.request, "rejected");
    for error in &resp.errors {
        eprintln!("rejected: {}", error);
    }
    Ok(ExitCode::FAILURE)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Parse failures print usage and exit with status 2.
    let args = Args::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
