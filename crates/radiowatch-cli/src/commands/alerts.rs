//! Alerts command implementation.

use chrono::{DateTime, NaiveDateTime, Utc};

use radiowatch_core::alerts::{self, Alert, Severity};
use radiowatch_core::client::DeviceClient;

use crate::cli::AlertsArgs;
use crate::error::{exit_codes, CliError};
use crate::output::get_formatter;

/// Run the alerts command.
///
/// The exit code reflects the filtered result set: `--after`/`--latest`
/// can suppress high-severity alerts and thereby lower it.
pub async fn run_alerts(
    args: AlertsArgs,
    client: &DeviceClient,
    json: bool,
) -> Result<i32, CliError> {
    let report = match &args.recording {
        Some(name) => client.analysis_report(name).await?,
        None => client.live_report().await?,
    };

    let mut list = alerts::extract_alerts(&report.rows, &report.metadata);

    let after = match &args.after {
        Some(raw) => Some(parse_after(raw)?),
        None => None,
    };
    if let Some(threshold) = after {
        list = alerts::filter_after(list, threshold);
    }
    if args.latest {
        list = alerts::latest_only(list, &report.rows, after.is_some());
    }

    let formatter = get_formatter(json);
    println!("{}", formatter.format_alerts(&list));

    Ok(severity_exit_code(&list))
}

/// RFC 3339 first, then naive `YYYY-MM-DD HH:MM:SS` taken as UTC.
fn parse_after(raw: &str) -> Result<DateTime<Utc>, CliError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    Err(CliError::InvalidArgument(format!(
        "--after expects RFC 3339 or \"YYYY-MM-DD HH:MM:SS\", got: {}",
        raw
    )))
}

/// An empty list exits 0; otherwise the worst severity picks the code.
fn severity_exit_code(alerts: &[Alert]) -> i32 {
    match alerts::max_severity(alerts) {
        None | Some(Severity::Informational) => exit_codes::SUCCESS,
        Some(Severity::Low) => exit_codes::ALERT_LOW,
        Some(Severity::Medium) => exit_codes::ALERT_MEDIUM,
        Some(Severity::High) => exit_codes::ALERT_HIGH,
    }
}
