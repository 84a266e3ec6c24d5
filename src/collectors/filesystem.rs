//! Filesystem usage collector.
//!
//! Reports size and usage of the filesystem holding a given path, computed
//! from libc statvfs the same way `df` does.

use std::ffi::CString;
use std::mem;

use herakles_dashboard_api::SourceError;

/// Usage of a single mounted filesystem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilesystemUsage {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
}

impl FilesystemUsage {
    /// Builds usage from raw statvfs block counts.
    pub fn from_blocks(block_size: u64, blocks: u64, free: u64, available: u64) -> Self {
        Self {
            total_bytes: block_size.saturating_mul(blocks),
            used_bytes: block_size.saturating_mul(blocks.saturating_sub(free)),
            available_bytes: block_size.saturating_mul(available),
        }
    }

    /// Used space relative to what non-root users can see (used + available),
    /// rounded to one decimal.
    pub fn percent(&self) -> f64 {
        let visible = self.used_bytes.saturating_add(self.available_bytes);
        if visible == 0 {
            return 0.0;
        }
        let percent = self.used_bytes as f64 / visible as f64 * 100.0;
        (percent * 10.0).round() / 10.0
    }
}

/// Gets filesystem usage for `path` using libc statvfs.
pub fn read_usage(path: &str) -> Result<FilesystemUsage, SourceError> {
    let c_path =
        CString::new(path).map_err(|e| SourceError::parse(path, format!("Invalid path: {e}")))?;

    // SAFETY: statvfs is a plain C struct valid when zeroed, and c_path is a
    // valid NUL-terminated string for the duration of the call.
    let stat = unsafe {
        let mut stat: libc::statvfs = mem::zeroed();
        if libc::statvfs(c_path.as_ptr(), &mut stat) != 0 {
            return Err(SourceError::io(path, std::io::Error::last_os_error()));
        }
        stat
    };

    Ok(FilesystemUsage::from_blocks(
        stat.f_frsize as u64,
        stat.f_blocks as u64,
        stat.f_bfree as u64,
        stat.f_bavail as u64,
    ))
}
