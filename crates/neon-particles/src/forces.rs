//! Stateless acceleration contributions
//!
//! Accelerations are in surface units per frame². The pointer terms follow a
//! two-zone model: linear repulsion inside the repulsion radius, inverse-square
//! attraction out to [`MAGNETIC_RANGE`]. The zones never overlap.

use neon_core::Vec2;

/// Default radius inside which the pointer pushes particles away
pub const DEFAULT_REPULSION_RADIUS: f32 = 50.0;
/// Scale applied to the linear repulsion falloff
pub const REPULSION_GAIN: f32 = 0.1;
/// Outer edge of the magnetic attraction zone
pub const MAGNETIC_RANGE: f32 = 150.0;
/// Downward drift applied to Energy particles every step
pub const ENERGY_DRIFT: f32 = 0.001;
/// Gravity applied to Spark particles every step
pub const SPARK_GRAVITY: f32 = 0.05;

/// Acceleration on a particle at `position` caused by the pointer at `pointer`.
///
/// Inside `repulsion_radius` the particle is pushed directly away with
/// magnitude `REPULSION_GAIN * (r - d) / r`. Otherwise, within
/// [`MAGNETIC_RANGE`] and with a positive `magnetic_strength`, it is pulled
/// toward the pointer with magnitude `magnetic_strength / d²`.
pub fn pointer_force(
    position: Vec2,
    pointer: Vec2,
    repulsion_radius: f32,
    magnetic_strength: f32,
) -> Vec2 {
    let to_pointer = pointer - position;
    let distance = to_pointer.length();
    if !distance.is_finite() || distance <= f32::EPSILON {
        // Direction is undefined on top of the pointer
        return Vec2::ZERO;
    }
    let direction = to_pointer / distance;

    if distance < repulsion_radius {
        let falloff = (repulsion_radius - distance) / repulsion_radius;
        -direction * falloff * REPULSION_GAIN
    } else if distance < MAGNETIC_RANGE && magnetic_strength > 0.0 {
        direction * (magnetic_strength / (distance * distance))
    } else {
        Vec2::ZERO
    }
}

/// Constant downward pull for Energy particles
pub fn energy_drift() -> Vec2 {
    Vec2::new(0.0, ENERGY_DRIFT)
}

/// Constant gravity for Spark particles (positive y is down)
pub fn spark_gravity() -> Vec2 {
    Vec2::new(0.0, SPARK_GRAVITY)
}

/// Glow intensity in [0, 1] oscillating with the phase accumulator
pub fn glow_pulse(phase: f32) -> f32 {
    0.5 + phase.sin() * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTER: Vec2 = Vec2::new(100.0, 100.0);

    #[test]
    fn repulsion_points_away_from_pointer() {
        let position = Vec2::new(120.0, 100.0); // d = 20
        let accel = pointer_force(position, POINTER, 50.0, 0.0);
        let pointer_to_particle = position - POINTER;
        assert!(accel.dot(pointer_to_particle) > 0.0);
        assert!(accel.dot(POINTER - position) < 0.0);
        // Purely along the separation axis
        assert!(accel.y.abs() < 1e-6);
        let expected = REPULSION_GAIN * (50.0 - 20.0) / 50.0;
        assert!((accel.length() - expected).abs() < 1e-6);
    }

    #[test]
    fn repulsion_grows_as_distance_shrinks() {
        let mut previous = 0.0;
        for d in [49.0, 40.0, 30.0, 20.0, 10.0, 1.0] {
            let accel = pointer_force(POINTER + Vec2::new(0.0, d), POINTER, 50.0, 0.0);
            assert!(accel.length() > previous, "d = {d}");
            previous = accel.length();
        }
    }

    #[test]
    fn repulsion_vanishes_at_radius() {
        let accel = pointer_force(POINTER + Vec2::new(50.0, 0.0), POINTER, 50.0, 0.0);
        assert_eq!(accel, Vec2::ZERO);
    }

    #[test]
    fn magnetic_zone_attracts_with_inverse_square() {
        let position = POINTER - Vec2::new(100.0, 0.0);
        let accel = pointer_force(position, POINTER, 50.0, 0.1);
        assert!(accel.x > 0.0);
        assert!((accel.length() - 0.1 / 10_000.0).abs() < 1e-9);
    }

    #[test]
    fn magnetic_needs_strength_and_range() {
        let near = POINTER - Vec2::new(100.0, 0.0);
        assert_eq!(pointer_force(near, POINTER, 50.0, 0.0), Vec2::ZERO);

        let far = POINTER - Vec2::new(150.0, 0.0);
        assert_eq!(pointer_force(far, POINTER, 50.0, 0.1), Vec2::ZERO);
    }

    #[test]
    fn repulsion_takes_precedence_over_attraction() {
        let position = POINTER + Vec2::new(10.0, 0.0);
        let accel = pointer_force(position, POINTER, 50.0, 5.0);
        assert!(accel.x > 0.0, "should push away, got {accel:?}");
    }

    #[test]
    fn coincident_pointer_is_inert() {
        assert_eq!(pointer_force(POINTER, POINTER, 50.0, 1.0), Vec2::ZERO);
    }

    #[test]
    fn glow_pulse_range() {
        for i in 0..64 {
            let g = glow_pulse(i as f32 * 0.3);
            assert!((0.0..=1.0).contains(&g));
        }
    }
}
