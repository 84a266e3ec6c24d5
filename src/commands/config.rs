//! Config command implementation.
//!
//! Generates configuration files in various formats.

use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    let output = match output {
        Some(path) => path,
        None => PathBuf::from(default_file_name(&format)),
    };

    let mut content = render_config(&config, &format)?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

fn default_file_name(format: &ConfigFormat) -> &'static str {
    match format {
        ConfigFormat::Yaml => "herakles-dashboard-api.yaml",
        ConfigFormat::Json => "herakles-dashboard-api.json",
        ConfigFormat::Toml => "herakles-dashboard-api.toml",
    }
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# Herakles Dashboard API Configuration
# ====================================
#
# Server Configuration
# --------------------
# bind: "0.0.0.0"              # Bind IP (0.0.0.0 = all interfaces)
# port: 5000                   # HTTP port
#
# Collection
# ----------
# parallelism: null            # Threads for process sweeps (null = auto)
# max_processes: null          # Maximum processes to scan
# top_n_processes: 10          # Entries returned by /api/top_processes
# cpu_sample_ms: 1000          # Window for system-wide CPU percent (1-10000)
# disk_usage_path: "/"         # Filesystem reported in disk_* fields
#
# Feature Flags
# -------------
# enable_health: true          # Enable /health endpoint
# enable_cors: true            # Send Access-Control-Allow-Origin: *
#
# Logging
# -------
# log_level: "info"            # off, error, warn, info, debug, trace
#
# TLS/SSL Configuration
# ---------------------
# enable_tls: false            # Enable HTTPS (default: false)
# tls_cert_path: null          # Path to TLS certificate (PEM format)
# tls_key_path: null           # Path to TLS private key (PEM format)
"#;

    format!("{comments}\n{yaml}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use std::path::Path;
    use tempfile::tempdir;

    #[test]
    fn test_commented_yaml_still_parses() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("api.yaml");

        command_config(Some(path.clone()), ConfigFormat::Yaml, true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# Herakles Dashboard API Configuration"));
        let cfg = parse_config(&content, Path::new("api.yaml")).unwrap();
        assert_eq!(cfg.port, Some(5000));
    }

    #[test]
    fn test_toml_output() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("api.toml");

        command_config(Some(path.clone()), ConfigFormat::Toml, true).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.starts_with('#'));
        let cfg = parse_config(&content, &path).unwrap();
        assert_eq!(cfg.top_n_processes(), 10);
    }
}
