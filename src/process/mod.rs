//! Process-related modules for CPU time parsing and process discovery.
//!
//! This module provides:
//! - `cpu`: CPU time parsing from /proc/<pid>/stat
//! - `scanner`: Process discovery and per-process field reading

pub mod cpu;
pub mod scanner;

// Re-export commonly used types
pub use scanner::{collect_proc_entries, read_process};
