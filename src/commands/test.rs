//! Test command implementation.
//!
//! Samples the live system twice and prints the rates computed between the
//! two samples.

use std::sync::Arc;
use std::time::{Duration, Instant};

use herakles_dashboard_api::format::{format_bytes, format_percent, format_speed};
use herakles_dashboard_api::TelemetryEngine;

use crate::collectors::interfaces::read_interfaces;
use crate::config::Config;
use crate::procfs::ProcfsSource;

/// Tests rate computation against the running system.
pub async fn command_test(
    interval: f64,
    verbose: bool,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("🧪 Herakles Dashboard API - Test Mode");
    println!("=====================================");

    if !interval.is_finite() || interval <= 0.0 {
        return Err(format!("interval must be a positive number of seconds, got {interval}").into());
    }

    let source = Arc::new(ProcfsSource::new(config.max_processes));
    let start = Instant::now();
    let engine = TelemetryEngine::new(source, config.top_n_processes())?;
    println!(
        "\n🔄 Baseline sampled in {:.2}ms",
        start.elapsed().as_secs_f64() * 1000.0
    );

    println!("   ⏳ Waiting {:.2}s for the second sample...", interval);
    tokio::time::sleep(Duration::from_secs_f64(interval)).await;

    let (net, totals) = engine.network_rates().await?;
    let (disk, _) = engine.disk_rates().await?;
    let top = engine.top_processes().await?;

    println!("\n📶 Network:");
    println!("   ├─ Upload:   {}", format_speed(net.first_per_sec));
    println!("   ├─ Download: {}", format_speed(net.second_per_sec));
    println!("   ├─ Sent:     {}", format_bytes(totals.first));
    println!("   └─ Received: {}", format_bytes(totals.second));

    println!("\n💽 Disk:");
    println!("   ├─ Read:  {}", format_speed(disk.first_per_sec));
    println!("   └─ Write: {}", format_speed(disk.second_per_sec));

    println!(
        "\n📊 Process sweep: {} processes, {} new, {} skipped, {:.3}s interval",
        top.stats.processes, top.stats.new_processes, top.stats.skipped, top.stats.elapsed_seconds
    );
    println!("\n🔥 Top {} processes by CPU:", top.processes.len());
    println!("   {:>7}  {:>6}  {:>6}  NAME", "PID", "CPU", "MEM");
    for p in &top.processes {
        println!(
            "   {:>7}  {:>6}  {:>6}  {}",
            p.pid,
            format_percent(p.cpu_percent),
            format_percent(p.memory_percent),
            p.name
        );
    }

    if verbose {
        println!("\n🌐 Network interfaces:");
        for iface in read_interfaces()? {
            println!(
                "   ├─ {} ({:?}, {})",
                iface.name, iface.status, iface.mac_address
            );
            for ip in &iface.ip_addresses {
                println!("   │  └─ {:?} {}", ip.family, ip.address);
            }
        }
    }

    println!("\n✅ Test completed successfully");
    Ok(())
}
