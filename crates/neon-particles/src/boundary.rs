//! Viewport edge policy
//!
//! A band of [`MARGIN`] units surrounds the viewport. Crossing it:
//! - left/right: wrapping kinds teleport to the opposite edge, others clamp and bounce
//! - top: every particle re-enters from the bottom
//! - bottom: kinds that die below are expired, others re-enter from the top

use crate::behavior::behavior;
use crate::particle::Particle;
use neon_core::Viewport;

/// Width of the band beyond each viewport edge
pub const MARGIN: f32 = 50.0;

/// Apply the edge policy. Returns false if the particle was expired.
pub fn apply(particle: &mut Particle, viewport: Viewport) -> bool {
    let rules = behavior(particle.kind());
    let left = -MARGIN;
    let right = viewport.width + MARGIN;
    let top = -MARGIN;
    let bottom = viewport.height + MARGIN;

    if particle.position.x < left {
        if rules.wraps_horizontally {
            particle.position.x = right;
        } else {
            particle.position.x = left;
            particle.velocity.x = particle.velocity.x.abs();
        }
    } else if particle.position.x > right {
        if rules.wraps_horizontally {
            particle.position.x = left;
        } else {
            particle.position.x = right;
            particle.velocity.x = -particle.velocity.x.abs();
        }
    }

    if particle.position.y < top {
        particle.position.y = bottom;
    } else if particle.position.y > bottom {
        if rules.dies_below {
            particle.expire();
            return false;
        }
        particle.position.y = top;
    }

    true
}
