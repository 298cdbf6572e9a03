//! Neon Core - Foundational types for the Neon particle engine
//!
//! This crate provides the types that all other Neon crates depend on:
//! - `Color`, `Viewport` - Visual and spatial types (`Vec2` re-exported from glam)
//! - `Surface` / `DrawCommand` - The drawing seam renderers implement
//! - Error types and Result alias

mod error;
mod surface;
mod types;

pub use error::{NeonError, Result};
pub use glam::Vec2;
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use types::{Color, Viewport};
