//! Headless simulation rendered to a PNG image

use super::simulate::{self, RunOptions};
use crate::raster::RasterSurface;
use anyhow::{Context, Result};
use clap::Args;
use neon_core::Color;

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub run: RunOptions,

    /// Output image path
    #[arg(short, long, default_value = "particles.png")]
    pub output: String,

    /// Background color behind the particles
    #[arg(long, default_value = "#0a0a12")]
    pub background: Color,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let surface = RasterSurface::new(args.run.width, args.run.height, args.background);
    let image = surface.image();

    let system = simulate::run_session(&args.run, Box::new(surface))?;
    simulate::print_summary(&system);

    let image = image.borrow();
    image
        .save(&args.output)
        .context(format!("Failed to save image to {}", args.output))?;

    println!(
        "\nRendered {}x{} image to {}",
        image.width(),
        image.height(),
        args.output
    );

    Ok(())
}
