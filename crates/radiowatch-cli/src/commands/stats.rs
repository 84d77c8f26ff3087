//! System stats command.

use radiowatch_core::client::DeviceClient;

use crate::error::{exit_codes, CliError};
use crate::output::get_formatter;

/// Run the stats command
pub async fn run_stats(client: &DeviceClient, json: bool) -> Result<i32, CliError> {
    let stats = client.system_stats().await?;
    let formatter = get_formatter(json);
    println!("{}", formatter.format_stats(&stats));
    Ok(exit_codes::SUCCESS)
}
