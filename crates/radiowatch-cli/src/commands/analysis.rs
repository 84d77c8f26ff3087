//! Analysis queue commands.

use radiowatch_core::client::DeviceClient;

use crate::cli::{AnalysisArgs, AnalysisCommands, AnalysisRunArgs};
use crate::error::{exit_codes, CliError};
use crate::output::get_formatter;

/// Run the analysis command
pub async fn run_analysis(
    args: AnalysisArgs,
    client: &DeviceClient,
    json: bool,
) -> Result<i32, CliError> {
    match args.command {
        AnalysisCommands::Status => run_status(client, json).await,
        AnalysisCommands::Run(args) => run_queue(args, client, json).await,
    }
}

async fn run_status(client: &DeviceClient, json: bool) -> Result<i32, CliError> {
    let status = client.analysis_status().await?;
    let formatter = get_formatter(json);
    println!("{}", formatter.format_analysis_status(&status));
    Ok(exit_codes::SUCCESS)
}

async fn run_queue(
    args: AnalysisRunArgs,
    client: &DeviceClient,
    json: bool,
) -> Result<i32, CliError> {
    let formatter = get_formatter(json);

    if args.all {
        // Strictly sequential; the first failure aborts the sequence. The
        // in-progress recording is excluded since the device is still
        // writing it.
        let manifest = client.manifest().await?;
        for entry in &manifest.entries {
            client.start_analysis(&entry.name).await?;
        }

        let status = client.analysis_status().await?;
        println!("{}", formatter.format_analysis_status(&status));
    } else {
        let name = args.name.as_deref().ok_or_else(|| {
            CliError::InvalidArgument("analysis run requires a recording name or --all".to_string())
        })?;

        let status = client.start_analysis(name).await?;
        println!("{}", formatter.format_analysis_status(&status));
    }

    Ok(exit_codes::SUCCESS)
}
