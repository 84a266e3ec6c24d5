//! Startup requirement validation for herakles-dashboard-api.
//!
//! This module checks that the kernel interfaces the API reads from are
//! present and readable before the server starts. Failures are reported but
//! never stop the server.

use nix::unistd::geteuid;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::collectors::{diskstats::DISKSTATS_PATH, netdev::NETDEV_PATH};

/// Files every endpoint depends on.
const REQUIRED_FILES: [&str; 5] = [
    "/proc/stat",
    "/proc/meminfo",
    "/proc/uptime",
    NETDEV_PATH,
    DISKSTATS_PATH,
];

/// Validate all runtime requirements
pub fn validate_requirements() -> Result<(), ValidationError> {
    info!("🔍 Validating runtime requirements...");

    check_user_privileges();
    check_proc_mounted(Path::new("/proc"))?;
    check_counter_files(&REQUIRED_FILES)?;
    check_disk_usage_path_hint();

    info!("✅ All runtime requirements validated");
    Ok(())
}

/// Check if running with sufficient privileges
fn check_user_privileges() {
    if !geteuid().is_root() {
        warn!("⚠️  Not running as root - processes of other users may be skipped");
        warn!("   Their CPU time is not readable without privileges");
    } else {
        info!("✅ Running as root (uid=0)");
    }
}

/// Check that /proc is a mounted procfs with process entries.
fn check_proc_mounted(root: &Path) -> Result<(), ValidationError> {
    let has_pid_dirs = fs::read_dir(root)
        .map_err(|e| ValidationError::ProcUnavailable(e.to_string()))?
        .flatten()
        .any(|entry| entry.file_name().to_string_lossy().parse::<u32>().is_ok());

    if !has_pid_dirs {
        error!("❌ {} contains no process directories", root.display());
        error!("   Is procfs mounted? Solution: mount -t proc proc /proc");
        return Err(ValidationError::ProcUnavailable(format!(
            "no process entries under {}",
            root.display()
        )));
    }

    info!("✅ {} is mounted", root.display());
    Ok(())
}

/// Check that all counter files can be read.
fn check_counter_files(files: &[&str]) -> Result<(), ValidationError> {
    for file in files {
        match fs::read_to_string(file) {
            Ok(_) => debug!("{} is readable", file),
            Err(e) => {
                error!("❌ Cannot read {}: {}", file, e);
                return Err(ValidationError::CounterFileUnreadable {
                    path: file.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }
    info!("✅ Kernel counter files are readable");
    Ok(())
}

fn check_disk_usage_path_hint() {
    if !Path::new("/sys/block").exists() {
        warn!("⚠️  /sys/block not found - disk throughput will report 0");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("/proc is not available: {0}")]
    ProcUnavailable(String),

    #[error("Cannot read {path}: {reason}")]
    CounterFileUnreadable { path: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_proc_without_pids_is_rejected() {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("sys")).unwrap();
        assert!(matches!(
            check_proc_mounted(dir.path()),
            Err(ValidationError::ProcUnavailable(_))
        ));

        fs::create_dir_all(dir.path().join("1")).unwrap();
        assert!(check_proc_mounted(dir.path()).is_ok());
    }

    #[test]
    fn test_missing_counter_file() {
        let err = check_counter_files(&["/nonexistent/counter"]).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/counter"));
    }

    #[test]
    fn test_live_proc_requirements() {
        assert!(check_proc_mounted(Path::new("/proc")).is_ok());
        assert!(check_counter_files(&["/proc/stat", "/proc/meminfo"]).is_ok());
    }
}
