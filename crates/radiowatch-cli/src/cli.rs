//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

use radiowatch_core::client::RecordingFormat;

/// Radiowatch - command-line client for Radiowatch capture devices
#[derive(Parser, Debug)]
#[command(name = "radiowatch")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// Device host, e.g. 10.0.0.1:8080 (http:// is assumed when no scheme is given)
    #[arg(long, global = true, env = "RADIOWATCH_HOST")]
    pub host: Option<String>,

    /// HTTP basic auth username
    #[arg(long, global = true)]
    pub basic_auth_user: Option<String>,

    /// HTTP basic auth password
    #[arg(long, global = true)]
    pub basic_auth_password: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Trace HTTP requests and raw response bodies on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract severity-ranked alerts from an analysis report
    Alerts(AlertsArgs),

    /// Recording control and retrieval
    Recording(RecordingArgs),

    /// Analysis queue management
    Analysis(AnalysisArgs),

    /// Local client configuration
    Config(ConfigArgs),

    /// Device system statistics
    Stats,
}

// ==================== Alerts ====================

#[derive(Args, Debug)]
pub struct AlertsArgs {
    /// Read the report of a stored recording instead of the live report
    #[arg(long, value_name = "NAME")]
    pub recording: Option<String>,

    /// Keep only alerts carrying the most recent packet timestamp
    #[arg(long)]
    pub latest: bool,

    /// Keep only alerts strictly after this timestamp (RFC 3339 or "YYYY-MM-DD HH:MM:SS")
    #[arg(long, value_name = "TS")]
    pub after: Option<String>,
}

// ==================== Recording ====================

#[derive(Args, Debug)]
pub struct RecordingArgs {
    #[command(subcommand)]
    pub command: RecordingCommands,
}

#[derive(Subcommand, Debug)]
pub enum RecordingCommands {
    /// List recordings on the device
    List,

    /// Download a recording to a local file
    Download(RecordingDownloadArgs),

    /// Delete a recording from the device
    Delete(RecordingDeleteArgs),

    /// Stop the in-progress recording
    Stop,

    /// Start a new recording
    Start,
}

#[derive(Args, Debug)]
pub struct RecordingDownloadArgs {
    /// Recording name
    pub name: String,

    /// Download format
    #[arg(long, value_enum, default_value = "qmdl")]
    pub format: FormatArg,

    /// Destination file (default: <name>.<format>)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FormatArg {
    Qmdl,
    Pcap,
    Zip,
}

impl FormatArg {
    pub fn to_core(self) -> RecordingFormat {
        match self {
            FormatArg::Qmdl => RecordingFormat::Qmdl,
            FormatArg::Pcap => RecordingFormat::Pcap,
            FormatArg::Zip => RecordingFormat::Zip,
        }
    }
}

#[derive(Args, Debug)]
pub struct RecordingDeleteArgs {
    /// Recording name
    pub name: String,
}

// ==================== Analysis ====================

#[derive(Args, Debug)]
pub struct AnalysisArgs {
    #[command(subcommand)]
    pub command: AnalysisCommands,
}

#[derive(Subcommand, Debug)]
pub enum AnalysisCommands {
    /// Show the analysis queue status
    Status,

    /// Queue analysis of stored recordings
    Run(AnalysisRunArgs),
}

#[derive(Args, Debug)]
pub struct AnalysisRunArgs {
    /// Recording name to queue
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    pub name: Option<String>,

    /// Queue every stored recording, then show the queue status
    #[arg(long)]
    pub all: bool,
}

// ==================== Config ====================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the config file values and path
    Show,

    /// Set a config file key
    Set(ConfigSetArgs),
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Key: host, basic_auth_user, basic_auth_password, json, verbose
    pub key: String,

    /// Value (true/false for json and verbose)
    pub value: String,
}
