//! Particle entity: shared kinematic core plus per-kind state

use crate::behavior::{behavior, PHASE_STEP};
use crate::boundary;
use crate::config::ParticleStyle;
use crate::forces::{pointer_force, DEFAULT_REPULSION_RADIUS};
use crate::rand::ParticleRng;
use neon_core::{Color, NeonError, Surface, Vec2, Viewport};
use neon_runtime::PointerState;
use std::fmt;
use std::str::FromStr;

/// Behavior variant of a particle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParticleKind {
    /// Gentle upward ambient drift
    #[default]
    Float,
    /// Pulsing glow, slow downward drift, magnetic pull toward the pointer
    Energy,
    /// Horizontal traveling pulse that wraps screen edges
    Circuit,
    /// Short-lived ember with gravity
    Spark,
    /// Near-static flickering binary glyph
    Data,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 5] = [
        ParticleKind::Float,
        ParticleKind::Energy,
        ParticleKind::Circuit,
        ParticleKind::Spark,
        ParticleKind::Data,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticleKind::Float => "float",
            ParticleKind::Energy => "energy",
            ParticleKind::Circuit => "circuit",
            ParticleKind::Spark => "spark",
            ParticleKind::Data => "data",
        }
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParticleKind {
    type Err = NeonError;

    fn from_str(s: &str) -> neon_core::Result<Self> {
        ParticleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| NeonError::InvalidKind(s.to_string()))
    }
}

/// Symbol shown by a Data particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Zero,
    One,
}

impl Glyph {
    pub fn as_char(&self) -> char {
        match self {
            Glyph::Zero => '0',
            Glyph::One => '1',
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Glyph::Zero => Glyph::One,
            Glyph::One => Glyph::Zero,
        }
    }
}

/// Per-kind state carried next to the kinematic core
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KindState {
    Float,
    Energy { glow: f32 },
    Circuit,
    Spark,
    Data { glyph: Glyph },
}

impl KindState {
    fn initial(kind: ParticleKind) -> Self {
        match kind {
            ParticleKind::Float => KindState::Float,
            ParticleKind::Energy => KindState::Energy { glow: 1.0 },
            ParticleKind::Circuit => KindState::Circuit,
            ParticleKind::Spark => KindState::Spark,
            ParticleKind::Data => KindState::Data { glyph: Glyph::Zero },
        }
    }

    pub fn kind(&self) -> ParticleKind {
        match self {
            KindState::Float => ParticleKind::Float,
            KindState::Energy { .. } => ParticleKind::Energy,
            KindState::Circuit => ParticleKind::Circuit,
            KindState::Spark => ParticleKind::Spark,
            KindState::Data { .. } => ParticleKind::Data,
        }
    }
}

/// Optional overrides applied on top of the kind defaults.
///
/// Values that are non-finite or out of range are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParticleOptions {
    pub size: Option<f32>,
    pub opacity: Option<f32>,
    pub color: Option<Color>,
    pub velocity: Option<Vec2>,
    pub magnetic_strength: Option<f32>,
    pub repulsion_radius: Option<f32>,
    pub max_life: Option<f32>,
}

impl ParticleOptions {
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_max_life(mut self, max_life: f32) -> Self {
        self.max_life = Some(max_life);
        self
    }

    pub fn with_magnetic_strength(mut self, strength: f32) -> Self {
        self.magnetic_strength = Some(strength);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    fn apply(&self, particle: &mut Particle) {
        if let Some(size) = positive(self.size) {
            particle.size = size;
        }
        if let Some(opacity) = self.opacity.filter(|o| o.is_finite()) {
            particle.opacity = opacity.clamp(0.0, 1.0);
        }
        if let Some(color) = self.color {
            particle.color = color;
        }
        if let Some(velocity) = self.velocity.filter(|v| v.is_finite()) {
            particle.velocity = velocity;
        }
        if let Some(strength) = self.magnetic_strength.filter(|s| s.is_finite() && *s >= 0.0) {
            particle.magnetic_strength = strength;
        }
        if let Some(radius) = positive(self.repulsion_radius) {
            particle.repulsion_radius = radius;
        }
        if let Some(max_life) = self.max_life.filter(|l| *l > 0.0 && !l.is_nan()) {
            particle.set_max_life(max_life);
        }
    }
}

fn positive(value: Option<f32>) -> Option<f32> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

/// What a particle can see of the world during one update step
pub struct SimContext<'a> {
    pub pointer: &'a PointerState,
    pub viewport: Viewport,
    pub rng: &'a mut ParticleRng,
}

/// A single simulated entity.
///
/// Velocity and acceleration are in surface units per frame; age and life
/// are in seconds.
#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub color: Color,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Accumulator for periodic effects (glow pulsing)
    pub phase: f32,
    pub magnetic_strength: f32,
    pub repulsion_radius: f32,
    pub state: KindState,
    /// Only non-zero while an update step is running
    acceleration: Vec2,
    age: f32,
    max_life: f32,
    /// Remaining life, `max(0, max_life - age)`
    life: f32,
}

impl Particle {
    /// Create a particle of `kind` at `position`.
    ///
    /// Randomized base defaults are overridden by the kind's defaults, which
    /// are in turn overridden by `options`.
    pub fn spawn(
        position: Vec2,
        kind: ParticleKind,
        options: &ParticleOptions,
        style: &ParticleStyle,
        rng: &mut ParticleRng,
    ) -> Self {
        let mut particle = Self {
            position,
            velocity: Vec2::new(rng.range(-1.0, 1.0), rng.range(-1.0, 1.0)),
            size: rng.range(2.0, 6.0),
            opacity: rng.range(0.2, 1.0),
            color: style.palette.random(rng),
            rotation: 0.0,
            rotation_speed: rng.range(-0.05, 0.05),
            phase: rng.angle(),
            magnetic_strength: 0.0,
            repulsion_radius: DEFAULT_REPULSION_RADIUS,
            state: KindState::initial(kind),
            acceleration: Vec2::ZERO,
            age: 0.0,
            max_life: f32::INFINITY,
            life: f32::INFINITY,
        };

        let behavior = behavior(kind);
        (behavior.init)(&mut particle, style, rng);
        options.apply(&mut particle);
        (behavior.constrain)(&mut particle);
        particle
    }

    pub fn kind(&self) -> ParticleKind {
        self.state.kind()
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn max_life(&self) -> f32 {
        self.max_life
    }

    /// Remaining life in seconds
    pub fn remaining_life(&self) -> f32 {
        self.life
    }

    /// Remaining life as a fraction of max life (1.0 for unbounded life)
    pub fn life_fraction(&self) -> f32 {
        if self.max_life.is_infinite() {
            1.0
        } else if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Queue an acceleration for the running step
    pub fn accelerate(&mut self, acceleration: Vec2) {
        self.acceleration += acceleration;
    }

    pub(crate) fn set_max_life(&mut self, max_life: f32) {
        self.max_life = max_life;
        self.life = (max_life - self.age).max(0.0);
    }

    /// Force remaining life to zero
    pub(crate) fn expire(&mut self) {
        self.age = self.max_life;
        self.life = 0.0;
    }

    /// Advance one step. Returns false when the particle must be removed.
    pub fn update(&mut self, delta_time: f32, ctx: &mut SimContext<'_>) -> bool {
        let dt = if delta_time.is_finite() && delta_time > 0.0 {
            delta_time
        } else {
            0.0
        };
        self.age = (self.age + dt).min(self.max_life);
        self.life = (self.max_life - self.age).max(0.0);
        if self.life <= 0.0 {
            self.acceleration = Vec2::ZERO;
            return false;
        }

        self.rotation += self.rotation_speed;
        self.phase += PHASE_STEP;

        let behavior = behavior(self.kind());
        (behavior.step)(self, ctx.rng);

        if ctx.pointer.is_active() {
            self.acceleration += pointer_force(
                self.position,
                ctx.pointer.position,
                self.repulsion_radius,
                self.magnetic_strength,
            );
        }

        self.velocity += self.acceleration;
        (behavior.constrain)(self);
        self.position += self.velocity;

        let alive = boundary::apply(self, ctx.viewport);
        self.acceleration = Vec2::ZERO;
        alive
    }

    /// Draw the particle. Never mutates simulation state.
    pub fn render(&self, surface: &mut dyn Surface) -> neon_core::Result<()> {
        (behavior(self.kind()).render)(self, surface)
    }
}
