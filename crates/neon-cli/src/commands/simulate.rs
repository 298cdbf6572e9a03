//! Headless simulation command

use crate::script::{ControlAction, Script};
use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use neon_core::{RecordingSurface, Surface};
use neon_particles::{
    BusyLoopProbe, FixedTier, ParticleConfig, ParticleKind, ParticleOptions, ParticleSystem, Tier,
};
use neon_runtime::{EventBus, RuntimeSystem};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TierArg {
    /// Run the capability probe
    Auto,
    Low,
    Medium,
    High,
}

impl TierArg {
    fn fixed(self) -> Option<Tier> {
        match self {
            TierArg::Auto => None,
            TierArg::Low => Some(Tier::Low),
            TierArg::Medium => Some(Tier::Medium),
            TierArg::High => Some(Tier::High),
        }
    }
}

/// Options shared by every command that drives the engine
#[derive(Debug, Clone, Args)]
pub struct RunOptions {
    /// Number of frames to simulate
    #[arg(long, default_value = "600")]
    pub frames: u64,

    /// Simulated frames per second
    #[arg(long, default_value = "60")]
    pub fps: f64,

    /// Performance tier, or auto to probe this machine
    #[arg(long, value_enum, default_value = "auto")]
    pub tier: TierArg,

    /// Viewport width
    #[arg(long, default_value = "1280")]
    pub width: u32,

    /// Viewport height
    #[arg(long, default_value = "720")]
    pub height: u32,

    /// Engine config (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scripted host input (TOML)
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// PRNG seed; overrides the config
    #[arg(long)]
    pub seed: Option<u32>,
}

pub fn run(options: RunOptions) -> Result<()> {
    let surface = RecordingSurface::new(options.width as f32, options.height as f32);
    let system = run_session(&options, Box::new(surface))?;
    print_summary(&system);
    Ok(())
}

/// Build a system around `surface`, play the script and run all frames
pub fn run_session(options: &RunOptions, surface: Box<dyn Surface>) -> Result<ParticleSystem> {
    if !(options.fps.is_finite() && options.fps > 0.0) {
        bail!("--fps must be positive, got {}", options.fps);
    }

    let mut config = match &options.config {
        Some(path) => ParticleConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ParticleConfig::default(),
    };
    config.seed = options.seed.or(config.seed).or_else(|| Some(time_seed()));

    let mut script = match &options.script {
        Some(path) => Script::load(path)?,
        None => Script::default(),
    };

    let mut system = ParticleSystem::new(config).with_surface(move || Ok(surface));
    system = match options.tier.fixed() {
        Some(tier) => system.with_probe(FixedTier(tier)),
        None => system.with_probe(BusyLoopProbe::new()),
    };
    system.initialize()?;
    if system.is_inert() {
        bail!("Particle system has no drawing surface");
    }

    println!(
        "Simulating {} frame(s) at {} fps on a {}x{} viewport (tier: {})",
        options.frames,
        options.fps,
        options.width,
        options.height,
        system.tier()
    );

    let frame_interval = 1.0 / options.fps;
    let report_every = options.fps.round().max(1.0) as u64;
    let mut bus = EventBus::new();
    let mut timestamp = 0.0;

    for frame in 0..options.frames {
        let mut controls = Vec::new();
        for step in script.take_due(frame) {
            if let Some(event) = step.event {
                bus.push(event);
            }
            if let Some(control) = &step.control {
                controls.push(control.clone());
            }
        }
        for event in bus.drain() {
            system.handle_event(&event)?;
        }
        for control in &controls {
            apply_control(&mut system, control);
        }

        if let Some(token) = system.pending_frame() {
            system.on_frame(token, timestamp)?;
        }
        timestamp += frame_interval;

        if (frame + 1) % report_every == 0 {
            println!(
                "  t={:>6.2}s  particles={:<4} float={:<4} energy={:<4} circuit={:<4} spark={:<4} data={:<4}",
                timestamp,
                system.particle_count(),
                system.count_kind(ParticleKind::Float),
                system.count_kind(ParticleKind::Energy),
                system.count_kind(ParticleKind::Circuit),
                system.count_kind(ParticleKind::Spark),
                system.count_kind(ParticleKind::Data),
            );
        }
    }

    Ok(system)
}

fn apply_control(system: &mut ParticleSystem, control: &ControlAction) {
    match control {
        ControlAction::SetTier { tier } => system.set_performance_tier(tier),
        ControlAction::RedetectTier => {
            system.redetect_tier();
        }
        ControlAction::Clear => system.clear_particles(),
        ControlAction::AddParticle { x, y, kind } => match kind.parse::<ParticleKind>() {
            Ok(kind) => system.add_particle(*x, *y, kind, &ParticleOptions::default()),
            Err(err) => warn!(%err, "skipping scripted particle"),
        },
    }
}

pub fn print_summary(system: &ParticleSystem) {
    let stats = system.stats();
    println!("\nFinal state (tier: {}):", system.tier());
    println!("  Particles:     {}", system.particle_count());
    for kind in ParticleKind::ALL {
        println!("    {:<10} {}", kind, system.count_kind(kind));
    }
    println!("  Frames:        {}", stats.frames);
    println!("  Spawned:       {}", stats.spawned);
    println!("  Removed:       {}", stats.removed);
    if stats.skipped_draws > 0 {
        println!("  Skipped draws: {}", stats.skipped_draws);
    }
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
        .unwrap_or(0xDEAD_BEEF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(tier: TierArg) -> RunOptions {
        RunOptions {
            frames: 120,
            fps: 60.0,
            tier,
            width: 640,
            height: 480,
            config: None,
            script: None,
            seed: Some(11),
        }
    }

    #[test]
    fn fixed_tier_session_runs_all_frames() {
        let surface = RecordingSurface::new(640.0, 480.0);
        let system = run_session(&options(TierArg::Low), Box::new(surface)).unwrap();
        assert_eq!(system.tier(), Tier::Low);
        assert_eq!(system.stats().frames, 120);
        assert_eq!(system.count_kind(ParticleKind::Data), 0);
    }

    #[test]
    fn same_seed_same_outcome() {
        let run = || {
            let surface = RecordingSurface::new(640.0, 480.0);
            let system = run_session(&options(TierArg::High), Box::new(surface)).unwrap();
            system
                .particles()
                .iter()
                .map(|p| (p.position.x, p.position.y))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn demo_config_is_valid() {
        let config = ParticleConfig::from_toml_str(include_str!("../../../../demos/neon.toml")).unwrap();
        assert_eq!(config.seed, Some(2024));
        assert_eq!(config.population, ParticleConfig::default().population);
    }

    #[test]
    fn rejects_zero_fps() {
        let mut opts = options(TierArg::Low);
        opts.fps = 0.0;
        let surface = RecordingSurface::new(640.0, 480.0);
        assert!(run_session(&opts, Box::new(surface)).is_err());
    }

    #[test]
    fn controls_reach_the_system() {
        let surface = RecordingSurface::new(640.0, 480.0);
        let mut system = ParticleSystem::new(ParticleConfig::default())
            .with_probe(FixedTier(Tier::High))
            .with_surface(move || Ok(Box::new(surface) as Box<dyn Surface>));
        system.initialize().unwrap();

        apply_control(&mut system, &ControlAction::Clear);
        assert_eq!(system.particle_count(), 0);

        apply_control(
            &mut system,
            &ControlAction::AddParticle {
                x: 5.0,
                y: 5.0,
                kind: "circuit".into(),
            },
        );
        apply_control(
            &mut system,
            &ControlAction::AddParticle {
                x: 5.0,
                y: 5.0,
                kind: "plasma".into(),
            },
        );
        assert_eq!(system.count_kind(ParticleKind::Circuit), 1);
        assert_eq!(system.particle_count(), 1);

        apply_control(&mut system, &ControlAction::SetTier { tier: "ultra".into() });
        assert_eq!(system.tier(), Tier::High);
        apply_control(&mut system, &ControlAction::SetTier { tier: "medium".into() });
        assert_eq!(system.tier(), Tier::Medium);
    }
}
