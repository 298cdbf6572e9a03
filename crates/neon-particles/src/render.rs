//! Per-kind draw calls
//!
//! Each function only reads the particle. Alpha is `opacity * life_fraction`.

use crate::particle::{KindState, Particle};
use neon_core::{DrawCommand, Result, Surface, Vec2};

fn alpha(p: &Particle) -> f32 {
    (p.opacity * p.life_fraction()).clamp(0.0, 1.0)
}

/// Soft glow with a solid core
pub fn render_float(p: &Particle, surface: &mut dyn Surface) -> Result<()> {
    let alpha = alpha(p);
    surface.draw(&DrawCommand::RadialGlow {
        center: p.position,
        radius: p.size * 2.0,
        color: p.color,
        mid_stop: 0.7,
        mid_alpha: 0.5,
        alpha,
    })?;
    surface.draw(&DrawCommand::FillCircle {
        center: p.position,
        radius: p.size,
        color: p.color,
        alpha,
    })
}

/// Glow sized by the pulse, core breathing ±30% with the phase
pub fn render_energy(p: &Particle, surface: &mut dyn Surface) -> Result<()> {
    let glow = match p.state {
        KindState::Energy { glow } => glow,
        _ => 1.0,
    };
    let alpha = alpha(p);
    surface.draw(&DrawCommand::RadialGlow {
        center: p.position,
        radius: p.size * (2.0 + glow),
        color: p.color,
        mid_stop: 0.5,
        mid_alpha: 0.375,
        alpha,
    })?;
    surface.draw(&DrawCommand::FillCircle {
        center: p.position,
        radius: energy_core_radius(p),
        color: p.color,
        alpha,
    })
}

pub fn energy_core_radius(p: &Particle) -> f32 {
    p.size * (0.8 + p.phase.sin() * 0.3)
}

/// Outlined node with a trace through it, rotated with the particle
pub fn render_circuit(p: &Particle, surface: &mut dyn Surface) -> Result<()> {
    let alpha = alpha(p);
    surface.draw(&DrawCommand::StrokeRect {
        center: p.position,
        half_extent: p.size,
        rotation: p.rotation,
        line_width: 1.0,
        color: p.color,
        alpha,
    })?;
    let arm = Vec2::from_angle(p.rotation) * (p.size * 3.0);
    surface.draw(&DrawCommand::Line {
        from: p.position - arm,
        to: p.position + arm,
        width: 1.0,
        round_cap: false,
        color: p.color,
        alpha,
    })
}

/// Trail opposite the direction of travel plus a small core
pub fn render_spark(p: &Particle, surface: &mut dyn Surface) -> Result<()> {
    let alpha = alpha(p);
    surface.draw(&DrawCommand::Line {
        from: p.position,
        to: p.position - p.velocity * 3.0,
        width: p.size,
        round_cap: true,
        color: p.color,
        alpha,
    })?;
    surface.draw(&DrawCommand::FillCircle {
        center: p.position,
        radius: p.size * 0.5,
        color: p.color,
        alpha,
    })
}

pub fn render_data(p: &Particle, surface: &mut dyn Surface) -> Result<()> {
    let glyph = match p.state {
        KindState::Data { glyph } => glyph.as_char(),
        _ => '0',
    };
    surface.draw(&DrawCommand::Text {
        position: p.position,
        glyph,
        font_size: p.size * 4.0,
        color: p.color,
        alpha: alpha(p),
    })
}
