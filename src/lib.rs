//! Spiral Canvas Library
//!
//! This crate draws a filled inward spiral with a turtle-graphics cursor:
//! forward by a shrinking step, turn by a fixed angle, repeat until the step
//! counter reaches zero.
//!
//! The drawing logic only talks to the [`DrawingSurface`] trait. A
//! [`RecordingSurface`] captures the command trace; a [`CanvasSurface`]
//! rasterizes the drawing and shows it in a wgpu window until it is closed.

mod app;
mod color;
pub mod constants;
mod error;
mod raster;
mod renderer;
mod spiral;
mod surface;
mod turtle;
mod window;

pub use app::{Animation, App};
pub use color::Color;
pub use error::{Result, SpiralError};
pub use raster::{rasterize, Canvas, FillRule, Viewport};
pub use renderer::Renderer;
pub use spiral::{RunOutcome, SpiralDrawer, SpiralParams, SpiralPhase, StepCounter, Termination};
pub use surface::{CanvasSurface, Command, DrawingSurface, RecordingSurface};
pub use turtle::{Drawing, Shape, ShapeKind, Turtle};
pub use window::{AppWrapper, WindowConfig};
