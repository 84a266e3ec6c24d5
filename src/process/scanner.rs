//! Process scanning utilities for discovering and reading process entries from /proc.
//!
//! This module provides functions to scan the /proc filesystem for process
//! entries and read the per-process fields shown in the top-processes list.

use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};

use herakles_dashboard_api::{ProcessRecord, SourceError};

use crate::process::cpu::parse_cpu_time_seconds;

/// Page size in bytes (for statm conversion).
pub static PAGE_SIZE: Lazy<u64> = Lazy::new(|| {
    // SAFETY: sysconf is safe to call with _SC_PAGESIZE
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size > 0 {
        size as u64
    } else {
        4096
    }
});

/// Process entry representing a directory in /proc filesystem.
#[derive(Debug, Clone)]
pub struct ProcEntry {
    pub pid: u32,
    pub proc_path: PathBuf,
}

/// Scans /proc directory for process entries with numeric PIDs.
pub fn collect_proc_entries(root: &Path, max: Option<usize>) -> Result<Vec<ProcEntry>, SourceError> {
    let entries = fs::read_dir(root).map_err(|e| SourceError::io(root, e))?;

    let mut out = Vec::new();
    for entry in entries.flatten() {
        let p = entry.path();
        let pid: u32 = match p.file_name().and_then(|s| s.to_str()).map(str::parse::<u32>) {
            Some(Ok(v)) => v,
            _ => continue,
        };
        out.push(ProcEntry { pid, proc_path: p });
        if let Some(maxp) = max {
            if out.len() >= maxp {
                break;
            }
        }
    }
    out.sort_by_key(|e| e.pid);
    Ok(out)
}

/// Reads process name from comm file or extracts from cmdline.
pub fn read_process_name(proc_path: &Path) -> Option<String> {
    let comm = proc_path.join("comm");
    if let Ok(s) = fs::read_to_string(&comm) {
        let t = s.trim();
        if !t.is_empty() {
            return Some(t.into());
        }
    }

    let args = read_cmdline(proc_path);
    args.first()
        .and_then(|first| Path::new(first).file_name())
        .and_then(|name| name.to_str())
        .map(|s| s.to_string())
}

/// Reads the NUL-separated argument vector. Kernel threads and zombies have
/// an empty cmdline.
pub fn read_cmdline(proc_path: &Path) -> Vec<String> {
    match fs::read(proc_path.join("cmdline")) {
        Ok(content) => parse_cmdline(&content),
        Err(_) => Vec::new(),
    }
}

pub fn parse_cmdline(content: &[u8]) -> Vec<String> {
    content
        .split(|&b| b == 0u8)
        .filter(|s| !s.is_empty())
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect()
}

/// Reads resident set size in bytes from /proc/<pid>/statm (second field, pages).
pub fn read_rss_bytes(proc_path: &Path) -> Result<u64, SourceError> {
    let statm_path = proc_path.join("statm");
    let content = fs::read_to_string(&statm_path).map_err(|e| SourceError::io(&statm_path, e))?;
    let pages: u64 = content
        .split_whitespace()
        .nth(1)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| SourceError::parse(&statm_path, "missing resident field"))?;
    Ok(pages * *PAGE_SIZE)
}

/// Reads one process. Any failure means the process exited or is not
/// accessible and is reported for this entry only.
pub fn read_process(entry: &ProcEntry, total_memory_bytes: u64) -> Result<ProcessRecord, SourceError> {
    let cpu_time_seconds = parse_cpu_time_seconds(&entry.proc_path)?;
    let rss = read_rss_bytes(&entry.proc_path)?;
    let name = read_process_name(&entry.proc_path).ok_or_else(|| {
        SourceError::Unavailable(format!("process {} has no readable name", entry.pid))
    })?;

    let memory_percent = if total_memory_bytes > 0 {
        rss as f64 / total_memory_bytes as f64 * 100.0
    } else {
        0.0
    };

    Ok(ProcessRecord {
        pid: entry.pid,
        name,
        memory_percent,
        cpu_time_seconds,
        cmdline: read_cmdline(&entry.proc_path),
    })
}
