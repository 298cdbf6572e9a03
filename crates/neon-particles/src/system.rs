//! The particle system manager
//!
//! Owns the live particles, the drawing surface and the frame loop, and
//! translates host events into spawns and state changes. All work happens
//! synchronously inside `handle_event` and `on_frame`.

use crate::config::ParticleConfig;
use crate::particle::{Particle, ParticleKind, ParticleOptions, SimContext};
use crate::pool::ParticlePool;
use crate::rand::ParticleRng;
use crate::tier::{BusyLoopProbe, Tier, TierProbe};
use neon_core::{Result, Surface, Vec2, Viewport};
use neon_runtime::{
    FrameLoop, FrameScheduler, FrameToken, HostEvent, ManualScheduler, PointerState, RuntimeSystem,
};
use std::f32::consts::TAU;
use tracing::{debug, info, warn};

/// Seed used when the config does not provide one
const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

/// Creates the drawing surface during `initialize`
pub type SurfaceFactory = Box<dyn FnOnce() -> Result<Box<dyn Surface>>>;

/// Counters accumulated since initialization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub spawned: u64,
    pub removed: u64,
    pub skipped_draws: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Uninitialized,
    Active,
    /// Surface creation failed; every call is a no-op
    Inert,
    /// Shut down by the host; every call is a no-op
    ShutDown,
}

/// Manages the live particle collection and drives it from host events
pub struct ParticleSystem {
    config: ParticleConfig,
    tier: Tier,
    probe: Box<dyn TierProbe>,
    pool: ParticlePool,
    pointer: PointerState,
    viewport: Viewport,
    surface: Option<Box<dyn Surface>>,
    surface_factory: Option<SurfaceFactory>,
    frames: FrameLoop,
    rng: ParticleRng,
    lifecycle: Lifecycle,
    stats: FrameStats,
}

impl ParticleSystem {
    /// Create an uninitialized system with the busy-loop probe and a manual
    /// frame scheduler. Call `initialize` to seed particles and start the loop.
    pub fn new(config: ParticleConfig) -> Self {
        let seed = config.seed.unwrap_or(DEFAULT_SEED);
        Self {
            config,
            tier: Tier::default(),
            probe: Box::new(BusyLoopProbe::new()),
            pool: ParticlePool::default(),
            pointer: PointerState::new(),
            viewport: Viewport::default(),
            surface: None,
            surface_factory: None,
            frames: FrameLoop::new(Box::new(ManualScheduler::new())),
            rng: ParticleRng::new(seed),
            lifecycle: Lifecycle::Uninitialized,
            stats: FrameStats::default(),
        }
    }

    pub fn with_probe(mut self, probe: impl TierProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn with_scheduler(mut self, scheduler: impl FrameScheduler + 'static) -> Self {
        self.frames = FrameLoop::new(Box::new(scheduler));
        self
    }

    /// Surface created on `initialize`. Without one the system goes inert.
    pub fn with_surface<F>(mut self, factory: F) -> Self
    where
        F: FnOnce() -> Result<Box<dyn Surface>> + 'static,
    {
        self.surface_factory = Some(Box::new(factory));
        self
    }

    // ── Control surface ──

    /// Insert one particle. Non-finite coordinates are replaced by a random
    /// point in the viewport.
    pub fn add_particle(&mut self, x: f32, y: f32, kind: ParticleKind, options: &ParticleOptions) {
        if !self.is_active() {
            return;
        }
        let position = self.sanitize_position(x, y);
        self.spawn(position, kind, options);
    }

    /// Set the tier by name. Unknown names are ignored.
    pub fn set_performance_tier(&mut self, name: &str) {
        if !self.is_active() {
            return;
        }
        match name.parse::<Tier>() {
            Ok(tier) => self.set_tier(tier),
            Err(err) => debug!(%err, "ignoring tier override"),
        }
    }

    pub fn set_tier(&mut self, tier: Tier) {
        if !self.is_active() {
            return;
        }
        if tier != self.tier {
            info!(from = %self.tier, to = %tier, "performance tier set");
        }
        self.tier = tier;
        self.reserve_for_tier();
    }

    /// Re-run the capability probe and adopt its result
    pub fn redetect_tier(&mut self) -> Tier {
        if self.is_active() {
            self.detect_tier();
        }
        self.tier
    }

    pub fn particle_count(&self) -> usize {
        if self.is_active() {
            self.pool.len()
        } else {
            0
        }
    }

    /// Remove every particle; the next frame draws nothing
    pub fn clear_particles(&mut self) {
        if !self.is_active() {
            return;
        }
        self.stats.removed += self.pool.len() as u64;
        self.pool.clear();
    }

    // ── Queries ──

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn particles(&self) -> &[Particle] {
        self.pool.as_slice()
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    pub fn is_inert(&self) -> bool {
        self.lifecycle == Lifecycle::Inert
    }

    pub fn count_kind(&self, kind: ParticleKind) -> usize {
        self.pool.count_kind(kind)
    }

    /// Population the current tier aims for
    pub fn target_population(&self) -> usize {
        self.config.population.get(self.tier)
    }

    // ── Lifecycle ──

    fn is_active(&self) -> bool {
        self.lifecycle == Lifecycle::Active
    }

    fn detect_tier(&mut self) {
        self.tier = self.probe.classify();
        info!(tier = %self.tier, probe = self.probe.name(), "performance tier detected");
        self.reserve_for_tier();
    }

    fn reserve_for_tier(&mut self) {
        let ceiling = self.spark_ceiling().ceil() as usize + self.config.spark.burst;
        self.pool.reserve(ceiling.saturating_sub(self.pool.len()));
    }

    /// Seed the ambient population for the current tier
    fn seed_population(&mut self) {
        let target = self.target_population() as f32;
        let mix = self.config.mix;
        let shares = [
            (ParticleKind::Float, mix.float),
            (ParticleKind::Energy, mix.energy),
            (ParticleKind::Circuit, mix.circuit),
            (ParticleKind::Data, mix.data),
        ];
        let options = ParticleOptions::default();
        for (kind, share) in shares {
            if !self.tier.allows(kind) {
                continue;
            }
            let count = (target * share).round() as usize;
            for _ in 0..count {
                let position = self.rng.point_in(self.viewport.width, self.viewport.height);
                self.spawn(position, kind, &options);
            }
        }
    }

    fn spawn(&mut self, position: Vec2, kind: ParticleKind, options: &ParticleOptions) {
        let particle = Particle::spawn(position, kind, options, &self.config.style, &mut self.rng);
        self.pool.push(particle);
        self.stats.spawned += 1;
    }

    fn sanitize_position(&mut self, x: f32, y: f32) -> Vec2 {
        let x = if x.is_finite() {
            x
        } else {
            self.rng.range(0.0, self.viewport.width)
        };
        let y = if y.is_finite() {
            y
        } else {
            self.rng.range(0.0, self.viewport.height)
        };
        Vec2::new(x, y)
    }

    // ── Input handlers ──

    fn on_pointer_move(&mut self, x: f32, y: f32) {
        let Some(speed) = self.pointer.process_move(x, y) else {
            return;
        };
        let spark = self.config.spark;
        if speed > spark.speed_threshold && self.rng.chance(spark.chance) {
            self.spawn_sparks(Vec2::new(x, y));
        }
    }

    /// Kept fractional so an odd target is not rounded down
    fn spark_ceiling(&self) -> f32 {
        self.target_population() as f32 * self.config.spark.ceiling_factor
    }

    /// Short-lived sparks at `position`, refused at the population ceiling
    fn spawn_sparks(&mut self, position: Vec2) {
        if self.pool.len() as f32 >= self.spark_ceiling() {
            return;
        }
        let options = ParticleOptions::default();
        for _ in 0..self.config.spark.burst {
            self.spawn(position, ParticleKind::Spark, &options);
        }
    }

    /// Radial burst of Energy particles evenly spaced around a circle
    fn spawn_click_burst(&mut self, x: f32, y: f32) {
        let position = Vec2::new(x, y);
        if !position.is_finite() {
            return;
        }
        let count = self.config.click_burst.get(self.tier);
        let click = self.config.click;
        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let speed = self.rng.range(click.speed_min, click.speed_max);
            let options = ParticleOptions::default()
                .with_velocity(Vec2::from_angle(angle) * speed)
                .with_max_life(click.max_life)
                .with_size(self.rng.range(click.size_min, click.size_max));
            self.spawn(position, ParticleKind::Energy, &options);
        }
    }

    fn on_resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport::new(width, height).sanitized();
        self.viewport = viewport;
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(viewport.width, viewport.height);
        }
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
    }

    fn on_visibility_changed(&mut self, hidden: bool) {
        if hidden {
            if self.frames.pause() {
                info!("particle loop paused");
            }
        } else if self.frames.start() {
            info!("particle loop resumed");
        }
    }

    // ── Frame ──

    /// Step every particle and drop the dead ones
    fn step(&mut self, delta_time: f32) {
        let mut ctx = SimContext {
            pointer: &self.pointer,
            viewport: self.viewport,
            rng: &mut self.rng,
        };
        let removed = self
            .pool
            .update_and_compact(|particle| particle.update(delta_time, &mut ctx));
        self.stats.removed += removed as u64;
    }

    fn render(&mut self) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.clear();
        for particle in self.pool.iter() {
            if let Err(err) = particle.render(&mut **surface) {
                self.stats.skipped_draws += 1;
                debug!(%err, kind = %particle.kind(), "skipping particle draw");
            }
        }
        if let Err(err) = surface.present() {
            warn!(%err, "failed to present particle frame");
        }
    }

    /// Top up Float particles from below the viewport, a few per tick
    fn maintain_population(&mut self) {
        let goal = (self.target_population() as f32 * self.config.mix.float).round() as usize;
        let floats = self.pool.count_kind(ParticleKind::Float);
        if floats >= goal {
            return;
        }
        let needed = (goal - floats).min(self.config.maintenance.max_per_tick);
        let options = ParticleOptions::default();
        for _ in 0..needed {
            let x = self.rng.range(0.0, self.viewport.width);
            let y = self.viewport.height + crate::boundary::MARGIN;
            self.spawn(Vec2::new(x, y), ParticleKind::Float, &options);
        }
    }
}

impl RuntimeSystem for ParticleSystem {
    fn initialize(&mut self) -> Result<()> {
        if self.lifecycle != Lifecycle::Uninitialized {
            return Ok(());
        }

        let surface = match self.surface_factory.take() {
            Some(factory) => factory(),
            None => Err(neon_core::NeonError::SurfaceUnavailable(
                "no surface factory configured".into(),
            )),
        };
        let surface = match surface {
            Ok(surface) => surface,
            Err(err) => {
                warn!(%err, "particle rendering disabled");
                self.lifecycle = Lifecycle::Inert;
                return Ok(());
            }
        };

        self.viewport = surface.size().sanitized();
        self.surface = Some(surface);
        self.lifecycle = Lifecycle::Active;

        self.detect_tier();
        self.seed_population();
        self.frames.start();
        info!(
            particles = self.pool.len(),
            width = self.viewport.width,
            height = self.viewport.height,
            "particle system initialized"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: &HostEvent) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        debug!(kind = event.kind(), "host event");
        match *event {
            HostEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            HostEvent::PointerLeave => self.pointer.process_leave(),
            HostEvent::Click { x, y } => self.spawn_click_burst(x, y),
            HostEvent::Resize { width, height } => self.on_resize(width, height),
            HostEvent::VisibilityChanged { hidden } => self.on_visibility_changed(hidden),
        }
        Ok(())
    }

    fn on_frame(&mut self, token: FrameToken, timestamp: f64) -> Result<()> {
        if !self.is_active() {
            return Ok(());
        }
        let Some(delta_time) = self.frames.begin_frame(token, timestamp) else {
            return Ok(());
        };

        self.step(delta_time as f32);
        self.render();
        self.maintain_population();
        self.stats.frames += 1;

        self.frames.end_frame();
        Ok(())
    }

    fn pending_frame(&self) -> Option<FrameToken> {
        self.frames.pending()
    }

    fn shutdown(&mut self) -> Result<()> {
        self.lifecycle = Lifecycle::ShutDown;
        self.frames.pause();
        self.pool.clear();
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "particles"
    }
}
