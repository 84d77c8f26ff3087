//! Radiowatch CLI - command-line client for Radiowatch capture devices.
//!
//! Talks to a single device's HTTP management API: recording control,
//! analysis queueing, alert extraction, and system stats.

mod cli;
mod commands;
mod error;
mod output;
mod settings;

use std::sync::Arc;

use clap::error::{ContextKind, ErrorKind};
use clap::{CommandFactory, Parser};

use radiowatch_core::client::{DeviceClient, StderrTrace};

use cli::{Cli, Commands};
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => handle_parse_error(err),
    };

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_codes::GENERAL_ERROR);
        }
    }
}

/// Help and version short-circuit to success; everything else is a usage
/// error.
fn handle_parse_error(err: clap::Error) -> ! {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            let _ = err.print();
            std::process::exit(exit_codes::SUCCESS);
        }
        ErrorKind::InvalidSubcommand => {
            let token = err
                .get(ContextKind::InvalidSubcommand)
                .map(|v| v.to_string())
                .unwrap_or_default();
            eprintln!("Unknown command: {}", token);
            eprintln!("{}", Cli::command().render_help());
            std::process::exit(exit_codes::GENERAL_ERROR);
        }
        _ => {
            let _ = err.print();
            std::process::exit(exit_codes::GENERAL_ERROR);
        }
    }
}

async fn run(cli: Cli) -> Result<i32, CliError> {
    let config_path = settings::default_path()?;
    let file = settings::load(&config_path)?;

    let overrides = settings::Overrides {
        host: cli.host.clone(),
        basic_auth_user: cli.basic_auth_user.clone(),
        basic_auth_password: cli.basic_auth_password.clone(),
        json: cli.json,
        verbose: cli.verbose,
    };
    let resolved = settings::resolve(&file, &overrides);

    let host = match resolved.host.clone() {
        Some(host) => host,
        None => {
            eprintln!("Error: --host is required");
            eprintln!("{}", Cli::command().render_help());
            return Ok(exit_codes::GENERAL_ERROR);
        }
    };

    let client = DeviceClient::new(
        &host,
        resolved.basic_auth_user.clone(),
        resolved.basic_auth_password.clone(),
        resolved.verbose,
        Arc::new(StderrTrace),
    )?;

    match cli.command {
        Commands::Alerts(args) => commands::run_alerts(args, &client, resolved.json).await,
        Commands::Recording(args) => commands::run_recording(args, &client, resolved.json).await,
        Commands::Analysis(args) => commands::run_analysis(args, &client, resolved.json).await,
        Commands::Config(args) => commands::run_config(args, &config_path, resolved.json),
        Commands::Stats => commands::run_stats(&client, resolved.json).await,
    }
}
