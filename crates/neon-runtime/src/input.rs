//! Pointer state shared with the simulation

use neon_core::Vec2;

/// Last known pointer position and whether it is over the surface.
///
/// Written only by the engine's input handlers, read by every particle's
/// interaction step.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Current pointer position in surface units
    pub position: Vec2,
    /// Cleared when the pointer leaves the surface
    active: bool,
    /// Previous move sample, used to estimate pointer speed
    last_sample: Option<Vec2>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move and return the distance travelled since the
    /// previous sample (`None` for the first sample).
    pub fn process_move(&mut self, x: f32, y: f32) -> Option<f32> {
        let sample = Vec2::new(x, y);
        if !sample.is_finite() {
            return None;
        }
        self.position = sample;
        self.active = true;
        self.last_sample
            .replace(sample)
            .map(|previous| previous.distance(sample))
    }

    /// Pointer left the surface: interaction forces are suspended and the
    /// next sample starts a fresh speed measurement
    pub fn process_leave(&mut self) {
        self.active = false;
        self.last_sample = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
