//! Neon Particles - Interactive decorative particle engine
//!
//! Provides the particle simulation and its manager:
//! - Five particle kinds (float, energy, circuit, spark, data) with per-kind
//!   behavior tables for init, update hooks, boundaries and drawing
//! - Pointer repulsion and magnetic attraction
//! - Swap-remove particle pool for O(1) kill
//! - Performance tiers chosen by a replaceable capability probe
//! - `ParticleSystem`, which reacts to host events and drives the frame loop

mod behavior;
pub mod boundary;
pub mod config;
pub mod forces;
pub mod particle;
pub mod pool;
pub mod rand;
pub mod render;
pub mod system;
pub mod tier;

pub use config::{
    ClickConfig, MaintenanceConfig, MixConfig, Palette, ParticleConfig, ParticleStyle, SparkConfig,
    TierTable,
};
pub use particle::{Glyph, KindState, Particle, ParticleKind, ParticleOptions, SimContext};
pub use pool::ParticlePool;
pub use system::{FrameStats, ParticleSystem, SurfaceFactory};
pub use tier::{BusyLoopProbe, FixedTier, Tier, TierProbe};
