use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// OpenLigaDB Proxy
///
/// Executes one proxy operation against the upstream sports data API and
/// prints the normalized JSON envelope on stdout. Outbound calls share a
/// token-bucket rate limiter and retry transient upstream failures with
/// exponential backoff.
///
/// Supported operations: ListLeagues, GetLeagueMatches, GetTeam, GetMatch.
///
/// Examples:
///   sports_proxy ListLeagues
///   sports_proxy GetLeagueMatches -p leagueId=bl1
///   sports_proxy --request '{"operationType":"GetTeam","payload":{"teamId":"40"}}'
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Operation to execute (ListLeagues, GetLeagueMatches, GetTeam, GetMatch)
    pub operation: Option<String>,

    /// Payload field as KEY=VALUE, repeatable (e.g. -p leagueId=bl1)
    #[arg(short = 'p', long = "payload", value_name = "KEY=VALUE", value_parser = parse_payload_entry)]
    pub payload: Vec<(String, String)>,

    /// Full request envelope as JSON instead of a positional operation,
    /// e.g. '{"operationType":"GetTeam","payload":{"teamId":"40"}}'
    #[arg(long = "request", value_name = "JSON", conflicts_with = "operation")]
    pub request: Option<String>,

    /// Override the upstream base URL for this invocation only
    #[arg(long = "base-url", help_heading = "Configuration", value_name = "URL")]
    pub base_url: Option<String>,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Update the upstream base URL in the config file
    #[arg(long = "set-base-url", help_heading = "Configuration", value_name = "URL")]
    pub new_base_url: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// Mirror diagnostic logs to stderr in addition to the log file.
    /// The response envelope on stdout stays machine-readable either way.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}

/// Parses one `-p KEY=VALUE` payload entry.
fn parse_payload_entry(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("payload entry must look like KEY=VALUE, got '{s}'")),
    }
}
