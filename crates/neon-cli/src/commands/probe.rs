//! Capability probe diagnostics

use anyhow::{bail, Result};
use neon_particles::{BusyLoopProbe, TierProbe};
use std::time::Duration;

pub fn run(runs: u32, window_ms: u64) -> Result<()> {
    if window_ms == 0 {
        bail!("--window-ms must be at least 1");
    }
    let mut probe = BusyLoopProbe::with_window(Duration::from_millis(window_ms));

    println!(
        "Probing for {} run(s) of {} ms (medium >= {} ops, high >= {} ops)",
        runs, window_ms, probe.medium_threshold, probe.high_threshold
    );
    for i in 1..=runs {
        let tier = probe.classify();
        let count = probe.last_count().unwrap_or(0);
        println!("  run {:>3}: {:<6} ({} ops)", i, tier.as_str(), count);
    }
    Ok(())
}
