//! Spiral Canvas Application (Desktop)
//!
//! Draws the spiral with the default constants and keeps the window open
//! until it is closed.

use spiral_canvas::{CanvasSurface, SpiralDrawer, SpiralParams, WindowConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    log::info!("🚀 Starting spiral canvas");

    let mut surface = CanvasSurface::new(WindowConfig::default())?;
    let mut drawer = SpiralDrawer::new(SpiralParams::default());
    drawer.draw(&mut surface)?;

    Ok(())
}
