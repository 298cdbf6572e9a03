//! Drawing surface abstraction
//!
//! The engine never talks to a concrete graphics API. Each frame it clears a
//! [`Surface`], issues [`DrawCommand`]s in surface coordinates, then presents.
//! Hosts implement the trait over a canvas, a software raster, or nothing at all.

use crate::error::Result;
use crate::types::{Color, Viewport};
use glam::Vec2;

/// One primitive draw call. Coordinates are in surface units, alpha in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Radial gradient disc: `color` at the center, `color` at `mid_alpha`
    /// at `mid_stop` (fraction of the radius), transparent at the rim.
    RadialGlow {
        center: Vec2,
        radius: f32,
        color: Color,
        mid_stop: f32,
        mid_alpha: f32,
        alpha: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    /// Outlined square rotated by `rotation` radians around its center
    StrokeRect {
        center: Vec2,
        half_extent: f32,
        rotation: f32,
        line_width: f32,
        color: Color,
        alpha: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        round_cap: bool,
        color: Color,
        alpha: f32,
    },
    /// A single glyph centered on `position`
    Text {
        position: Vec2,
        glyph: char,
        font_size: f32,
        color: Color,
        alpha: f32,
    },
}

/// Something the engine can draw into
pub trait Surface {
    /// Current drawable size
    fn size(&self) -> Viewport;

    /// Resize the drawable area. Drawn content may be discarded.
    fn resize(&mut self, width: f32, height: f32);

    /// Erase everything drawn so far
    fn clear(&mut self);

    /// Issue one draw call
    fn draw(&mut self, command: &DrawCommand) -> Result<()>;

    /// Finish the frame
    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Surface that keeps the draw calls of the current frame in memory.
///
/// Used by headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
    frames_presented: u64,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            viewport: Viewport::new(width, height).sanitized(),
            commands: Vec::new(),
            frames_presented: 0,
        }
    }

    /// Draw calls issued since the last `clear`
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height).sanitized();
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        self.commands.push(command.clone());
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.frames_presented += 1;
        Ok(())
    }
}
