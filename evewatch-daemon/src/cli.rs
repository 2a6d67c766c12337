//! CLI argument definitions for evewatch-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Evewatch alert dashboard daemon.
///
/// Tails a Suricata `eve.json` stream, persists alert events, and
/// serves aggregation queries for the dashboard.
#[derive(Parser, Debug)]
#[command(name = "evewatch-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to evewatch.toml configuration file.
    #[arg(short, long, default_value = "/etc/evewatch/evewatch.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_args() {
        let cli = DaemonCli::parse_from(["evewatch-daemon"]);
        assert_eq!(cli.config, PathBuf::from("/etc/evewatch/evewatch.toml"));
        assert!(cli.log_level.is_none());
        assert!(cli.log_format.is_none());
        assert!(!cli.validate);
    }

    #[test]
    fn parses_overrides() {
        let cli = DaemonCli::parse_from([
            "evewatch-daemon",
            "--config",
            "/tmp/evewatch.toml",
            "--log-level",
            "debug",
            "--log-format",
            "pretty",
            "--validate",
        ]);
        assert_eq!(cli.config, PathBuf::from("/tmp/evewatch.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_format.as_deref(), Some("pretty"));
        assert!(cli.validate);
    }

    #[test]
    fn rejects_unknown_flag() {
        let result = DaemonCli::try_parse_from(["evewatch-daemon", "--no-such-flag"]);
        assert!(result.is_err());
    }
}
