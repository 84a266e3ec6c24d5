//! Collectors module for system metrics.
//!
//! This module contains the collectors for system-level metrics such as
//! disk I/O, filesystem usage, network counters and addresses, and thermal
//! sensors.

pub mod diskstats;
pub mod filesystem;
pub mod interfaces;
pub mod netdev;
pub mod thermal;
