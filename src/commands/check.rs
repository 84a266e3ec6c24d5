//! Check command implementation.
//!
//! Validates system requirements and configuration.

use std::path::Path;

use crate::collectors::{diskstats, filesystem, netdev, thermal};
use crate::config::{validate_effective_config, Config};
use crate::process::collect_proc_entries;
use crate::system;

/// Validates system requirements and configuration.
pub fn command_check(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Herakles Dashboard API - System Check");
    println!("========================================");

    let mut all_ok = true;

    // Check /proc filesystem
    println!("\n📁 Checking /proc filesystem...");
    match collect_proc_entries(Path::new("/proc"), Some(5)) {
        Ok(entries) if !entries.is_empty() => {
            println!("   ✅ Can read {} process entries", entries.len());
        }
        Ok(_) => {
            println!("   ❌ Cannot read any process entries from /proc");
            all_ok = false;
        }
        Err(e) => {
            println!("   ❌ /proc filesystem not accessible: {}", e);
            all_ok = false;
        }
    }

    // Check counter sources
    println!("\n📶 Checking counter sources...");
    match system::read_cpu_stat() {
        Ok(_) => println!("   ✅ CPU times readable"),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }
    match system::read_memory_info() {
        Ok(mem) => println!("   ✅ Memory info readable ({:.1}% in use)", mem.percent()),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }
    match netdev::read_netdev_stats() {
        Ok(stats) => println!("   ✅ Network counters for {} interfaces", stats.len()),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }
    match diskstats::read_diskstats() {
        Ok(stats) => println!("   ✅ Disk counters for {} block devices", stats.len()),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }
    match filesystem::read_usage(config.disk_usage_path()) {
        Ok(usage) => println!(
            "   ✅ Filesystem {} is {:.1}% used",
            config.disk_usage_path(),
            usage.percent()
        ),
        Err(e) => {
            println!("   ❌ {}", e);
            all_ok = false;
        }
    }

    // Sensors are optional
    println!("\n🌡️  Checking temperature sensors...");
    match thermal::read_cpu_temperature() {
        Some(t) => println!("   ✅ CPU temperature: {:.1}°C", t),
        None => println!("   ⚠️  No CPU sensor found - cpu_temp will report N/A"),
    }

    // Check configuration
    println!("\n⚙️  Checking configuration...");
    match validate_effective_config(config) {
        Ok(_) => {
            println!("   ✅ Configuration is valid");
        }
        Err(e) => {
            println!("   ❌ Configuration invalid: {}", e);
            all_ok = false;
        }
    }

    println!("\n📋 Summary:");
    if all_ok {
        println!("   ✅ All checks passed - system is ready");
        Ok(())
    } else {
        println!("   ❌ Some checks failed - please review warnings");
        std::process::exit(1);
    }
}
