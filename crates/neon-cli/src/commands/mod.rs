//! CLI command implementations

pub mod probe;
pub mod render;
pub mod simulate;
