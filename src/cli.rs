//! CLI arguments and subcommands for herakles-dashboard-api.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::net::IpAddr;
use std::path::PathBuf;

/// Log level options for CLI parsing
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Configuration format options for output
#[derive(Debug, Clone, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "herakles-dashboard-api",
    about = "HTTP/JSON host telemetry API for dashboards",
    long_about = "HTTP/JSON host telemetry API for dashboards.\n\n\
                  Serves CPU, memory, disk, network and temperature readings, network and \
                  disk throughput, the busiest processes and network interface addresses. \
                  Rates are computed from the counter deltas between consecutive requests.",
    author = "Michael Moll <exporter@herakles.now> - Herakles",
    version = "0.1.0",
    propagate_version = true,
    after_help = "Project: https://github.com/cansp-dev/herakles-dashboard-api | More info: https://www.herakles.now | Support: exporter@herakles.now"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// HTTP listen port
    #[arg(short = 'p', long)]
    pub port: Option<u16>,

    /// Bind to specific interface/IP
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Parallel threads for process sweeps (0 = auto)
    #[arg(long)]
    pub parallelism: Option<usize>,

    /// Maximum number of processes to scan
    #[arg(long)]
    pub max_processes: Option<usize>,

    /// Number of processes returned by /api/top_processes
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Disable /health endpoint
    #[arg(long)]
    pub disable_health: bool,

    /// Do not send permissive CORS headers
    #[arg(long)]
    pub disable_cors: bool,

    /// Enable TLS/SSL for HTTPS
    #[arg(long)]
    pub enable_tls: bool,

    /// Path to TLS certificate file (PEM format)
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,

    /// Path to TLS private key file (PEM format)
    #[arg(long)]
    pub tls_key: Option<PathBuf>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate configuration and system requirements
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },

    /// Sample the live system and print computed rates
    Test {
        /// Seconds between the two samples
        #[arg(short = 'i', long, default_value_t = 1.0)]
        interval: f64,

        /// Also list network interfaces
        #[arg(long)]
        verbose: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_server_flags() {
        let args = Args::parse_from([
            "herakles-dashboard-api",
            "--port",
            "8081",
            "--bind",
            "127.0.0.1",
            "--top-n",
            "5",
            "--disable-cors",
        ]);
        assert_eq!(args.port, Some(8081));
        assert_eq!(args.top_n, Some(5));
        assert!(args.disable_cors);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_parse_test_subcommand() {
        let args = Args::parse_from(["herakles-dashboard-api", "test", "-i", "0.5"]);
        match args.command {
            Some(Commands::Test { interval, verbose }) => {
                assert_eq!(interval, 0.5);
                assert!(!verbose);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
