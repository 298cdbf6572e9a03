//! Per-kind behavior table
//!
//! Every [`ParticleKind`] maps to one static [`Behavior`] record holding its
//! hooks. The particle core dispatches through the table instead of matching
//! on the kind in every method.

use crate::config::ParticleStyle;
use crate::forces::{energy_drift, glow_pulse, spark_gravity};
use crate::particle::{Glyph, KindState, Particle, ParticleKind};
use crate::rand::ParticleRng;
use crate::render;
use neon_core::{Result, Surface, Vec2};

/// Phase accumulator increment per step
pub const PHASE_STEP: f32 = 0.05;
/// Per-step probability that a Data glyph flips
pub const DATA_FLIP_CHANCE: f32 = 0.01;
/// Slowest horizontal speed a Circuit pulse may travel at
pub const CIRCUIT_MIN_SPEED: f32 = 0.5;
/// Life of a Spark in seconds
pub const SPARK_LIFE: f32 = 0.3;

/// Hooks for one particle kind
pub struct Behavior {
    /// Apply kind defaults at spawn time (before caller options)
    pub init: fn(&mut Particle, &ParticleStyle, &mut ParticleRng),
    /// Queue intrinsic forces and update visual state, once per step
    pub step: fn(&mut Particle, &mut ParticleRng),
    /// Clamp velocity after forces were integrated
    pub constrain: fn(&mut Particle),
    /// Issue draw calls
    pub render: fn(&Particle, &mut dyn Surface) -> Result<()>,
    /// Wrap to the opposite side at left/right edges instead of bouncing
    pub wraps_horizontally: bool,
    /// Removed when falling past the bottom margin instead of recycling
    pub dies_below: bool,
}

static FLOAT: Behavior = Behavior {
    init: init_float,
    step: no_step,
    constrain: no_constraint,
    render: render::render_float,
    wraps_horizontally: false,
    dies_below: false,
};

static ENERGY: Behavior = Behavior {
    init: init_energy,
    step: step_energy,
    constrain: no_constraint,
    render: render::render_energy,
    wraps_horizontally: false,
    dies_below: false,
};

static CIRCUIT: Behavior = Behavior {
    init: init_circuit,
    step: no_step,
    constrain: constrain_circuit,
    render: render::render_circuit,
    wraps_horizontally: true,
    dies_below: false,
};

static SPARK: Behavior = Behavior {
    init: init_spark,
    step: step_spark,
    constrain: no_constraint,
    render: render::render_spark,
    wraps_horizontally: false,
    dies_below: true,
};

static DATA: Behavior = Behavior {
    init: init_data,
    step: step_data,
    constrain: no_constraint,
    render: render::render_data,
    wraps_horizontally: false,
    dies_below: false,
};

/// Look up the hooks for `kind`
pub fn behavior(kind: ParticleKind) -> &'static Behavior {
    match kind {
        ParticleKind::Float => &FLOAT,
        ParticleKind::Energy => &ENERGY,
        ParticleKind::Circuit => &CIRCUIT,
        ParticleKind::Spark => &SPARK,
        ParticleKind::Data => &DATA,
    }
}

fn no_step(_: &mut Particle, _: &mut ParticleRng) {}

fn no_constraint(_: &mut Particle) {}

// ── Float ──

fn init_float(p: &mut Particle, _: &ParticleStyle, rng: &mut ParticleRng) {
    p.velocity = Vec2::new(rng.range(-0.15, 0.15), -rng.range(0.2, 0.7));
}

// ── Energy ──

fn init_energy(p: &mut Particle, style: &ParticleStyle, rng: &mut ParticleRng) {
    p.size = rng.range(3.0, 9.0);
    p.color = style.palette.primary;
    p.magnetic_strength = style.energy_magnetic_strength;
    p.state = KindState::Energy { glow: 1.0 };
}

fn step_energy(p: &mut Particle, _: &mut ParticleRng) {
    p.state = KindState::Energy {
        glow: glow_pulse(p.phase),
    };
    p.accelerate(energy_drift());
}

// ── Circuit ──

fn init_circuit(p: &mut Particle, style: &ParticleStyle, rng: &mut ParticleRng) {
    p.size = 2.0;
    p.opacity = 0.6;
    p.color = style.palette.tertiary;
    p.velocity = Vec2::new(rng.sign(), 0.0);
}

fn constrain_circuit(p: &mut Particle) {
    p.velocity.y = 0.0;
    if p.velocity.x.abs() < CIRCUIT_MIN_SPEED {
        // signum(0.0) is 1.0, so a stalled pulse restarts to the right
        p.velocity.x = p.velocity.x.signum() * CIRCUIT_MIN_SPEED;
    }
}

// ── Spark ──

fn init_spark(p: &mut Particle, style: &ParticleStyle, rng: &mut ParticleRng) {
    p.size = rng.range(1.0, 4.0);
    p.velocity = Vec2::new(rng.range(-2.0, 2.0), -rng.range(1.0, 4.0));
    p.color = style.palette.accent;
    p.set_max_life(SPARK_LIFE);
}

fn step_spark(p: &mut Particle, _: &mut ParticleRng) {
    p.accelerate(spark_gravity());
    p.opacity = p.life_fraction();
}

// ── Data ──

fn init_data(p: &mut Particle, style: &ParticleStyle, rng: &mut ParticleRng) {
    p.size = 1.0;
    p.opacity = 0.8;
    p.color = style.palette.secondary;
    p.velocity = Vec2::new(rng.range(-0.1, 0.1), rng.range(-0.1, 0.1));
    let glyph = if rng.chance(0.5) { Glyph::One } else { Glyph::Zero };
    p.state = KindState::Data { glyph };
}

fn step_data(p: &mut Particle, rng: &mut ParticleRng) {
    if let KindState::Data { glyph } = p.state {
        if rng.chance(DATA_FLIP_CHANCE) {
            p.state = KindState::Data {
                glyph: glyph.flipped(),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particle::{ParticleOptions, SimContext};
    use neon_core::Viewport;
    use neon_runtime::PointerState;

    fn spawn(kind: ParticleKind, rng: &mut ParticleRng) -> Particle {
        Particle::spawn(
            Vec2::new(300.0, 300.0),
            kind,
            &ParticleOptions::default(),
            &ParticleStyle::default(),
            rng,
        )
    }

    fn run(p: &mut Particle, rng: &mut ParticleRng, steps: usize) -> bool {
        let pointer = PointerState::new();
        let mut ctx = SimContext {
            pointer: &pointer,
            viewport: Viewport::new(600.0, 600.0),
            rng,
        };
        (0..steps).all(|_| p.update(1.0 / 60.0, &mut ctx))
    }

    #[test]
    fn table_matches_kind() {
        assert!(behavior(ParticleKind::Circuit).wraps_horizontally);
        assert!(behavior(ParticleKind::Spark).dies_below);
        for kind in [ParticleKind::Float, ParticleKind::Energy, ParticleKind::Data] {
            assert!(!behavior(kind).wraps_horizontally);
            assert!(!behavior(kind).dies_below);
        }
    }

    #[test]
    fn float_drifts_upward() {
        let mut rng = ParticleRng::new(5);
        for _ in 0..50 {
            let p = spawn(ParticleKind::Float, &mut rng);
            assert!(p.velocity.y < 0.0);
            assert!(p.velocity.x.abs() <= 0.15);
        }
    }

    #[test]
    fn energy_defaults_and_pulse() {
        let style = ParticleStyle::default();
        let mut rng = ParticleRng::new(9);
        let mut p = spawn(ParticleKind::Energy, &mut rng);
        assert_eq!(p.color, style.palette.primary);
        assert!(p.magnetic_strength > 0.0);
        assert!(p.max_life().is_infinite());

        p.velocity = Vec2::ZERO;
        run(&mut p, &mut rng, 1);
        let KindState::Energy { glow } = p.state else {
            panic!("expected energy state");
        };
        assert!((glow - glow_pulse(p.phase)).abs() < 1e-6);
        // Drift pulls downward
        assert!(p.velocity.y > 0.0);
    }

    #[test]
    fn circuit_moves_strictly_horizontally() {
        let mut rng = ParticleRng::new(21);
        for _ in 0..20 {
            let p = spawn(ParticleKind::Circuit, &mut rng);
            assert_eq!(p.velocity.y, 0.0);
            assert_eq!(p.velocity.x.abs(), 1.0);
        }

        let mut p = spawn(ParticleKind::Circuit, &mut rng);
        let y = p.position.y;
        run(&mut p, &mut rng, 120);
        assert_eq!(p.position.y, y);
    }

    #[test]
    fn circuit_never_stalls() {
        let mut rng = ParticleRng::new(2);
        let options = ParticleOptions::default().with_velocity(Vec2::new(-0.1, 3.0));
        let mut p = Particle::spawn(
            Vec2::new(300.0, 300.0),
            ParticleKind::Circuit,
            &options,
            &ParticleStyle::default(),
            &mut rng,
        );
        assert_eq!(p.velocity, Vec2::new(-CIRCUIT_MIN_SPEED, 0.0));

        p.velocity = Vec2::ZERO;
        run(&mut p, &mut rng, 1);
        assert_eq!(p.velocity.x, CIRCUIT_MIN_SPEED);
    }

    #[test]
    fn spark_is_short_lived_and_fades() {
        let mut rng = ParticleRng::new(13);
        let mut p = spawn(ParticleKind::Spark, &mut rng);
        assert_eq!(p.max_life(), SPARK_LIFE);
        assert!(p.velocity.y < 0.0);

        let vy = p.velocity.y;
        assert!(run(&mut p, &mut rng, 6));
        assert!(p.velocity.y > vy, "gravity should slow the launch");
        assert!((p.opacity - p.life_fraction()).abs() < 1e-6);
        assert!(p.opacity < 1.0);

        // 0.3 s at 60 Hz is 18 steps
        assert!(!run(&mut p, &mut rng, 20));
    }

    #[test]
    fn data_glyph_flickers() {
        let mut rng = ParticleRng::new(77);
        let mut p = spawn(ParticleKind::Data, &mut rng);
        let KindState::Data { glyph: first } = p.state else {
            panic!("expected data state");
        };
        let mut flipped = false;
        for _ in 0..2000 {
            run(&mut p, &mut rng, 1);
            if let KindState::Data { glyph } = p.state {
                flipped |= glyph != first;
            }
        }
        assert!(flipped);
        assert!(p.velocity.length() < 0.15);
    }
}
