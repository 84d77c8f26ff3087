//! Recording control and retrieval commands.

use std::path::PathBuf;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use radiowatch_core::client::DeviceClient;

use crate::cli::{RecordingArgs, RecordingCommands, RecordingDownloadArgs};
use crate::error::{exit_codes, CliError};
use crate::output::get_formatter;

/// Run the recording command
pub async fn run_recording(
    args: RecordingArgs,
    client: &DeviceClient,
    json: bool,
) -> Result<i32, CliError> {
    match args.command {
        RecordingCommands::List => run_list(client, json).await,
        RecordingCommands::Download(args) => run_download(args, client, json).await,
        RecordingCommands::Delete(args) => run_delete(&args.name, client, json).await,
        RecordingCommands::Stop => run_stop(client, json).await,
        RecordingCommands::Start => run_start(client, json).await,
    }
}

async fn run_list(client: &DeviceClient, json: bool) -> Result<i32, CliError> {
    let manifest = client.manifest().await?;
    let formatter = get_formatter(json);
    println!("{}", formatter.format_manifest(&manifest));
    Ok(exit_codes::SUCCESS)
}

async fn run_download(
    args: RecordingDownloadArgs,
    client: &DeviceClient,
    json: bool,
) -> Result<i32, CliError> {
    let format = args.format.to_core();
    let path = match args.output {
        Some(output) => PathBuf::from(output),
        None => PathBuf::from(format!("{}.{}", args.name, format.extension())),
    };

    // Exclusive create: never clobber an existing file.
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => CliError::InvalidArgument(format!(
                "Refusing to overwrite existing file: {}",
                path.display()
            )),
            _ => CliError::Io(e),
        })?;

    let spinner = if json { None } else { Some(download_spinner(&args.name)) };

    let result = client.download_recording(&args.name, format, &mut file).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match result {
        Ok(written) => {
            drop(file);
            let formatter = get_formatter(json);
            println!("{}", formatter.format_download(&args.name, &path, written));
            Ok(exit_codes::SUCCESS)
        }
        Err(e) => {
            // Remove the partial file before surfacing the error.
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            Err(e.into())
        }
    }
}

fn download_spinner(name: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Downloading {}...", name));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

async fn run_delete(name: &str, client: &DeviceClient, json: bool) -> Result<i32, CliError> {
    client.delete_recording(name).await?;
    let formatter = get_formatter(json);
    println!(
        "{}",
        formatter.format_message(&format!("Deleted recording {}", name))
    );
    Ok(exit_codes::SUCCESS)
}

async fn run_stop(client: &DeviceClient, json: bool) -> Result<i32, CliError> {
    client.stop_recording().await?;
    let formatter = get_formatter(json);
    println!("{}", formatter.format_message("Recording stopped"));
    Ok(exit_codes::SUCCESS)
}

async fn run_start(client: &DeviceClient, json: bool) -> Result<i32, CliError> {
    client.start_recording().await?;
    let formatter = get_formatter(json);
    println!("{}", formatter.format_message("Recording started"));
    Ok(exit_codes::SUCCESS)
}
