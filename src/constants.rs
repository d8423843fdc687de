//! Drawing constants and default values.

use crate::color::Color;

// === Spiral ===

/// Initial step counter value. Also sets the start position `(-n0, -n0)`.
pub const INITIAL_STEP: i64 = 400;

/// Amount subtracted from the step counter after every iteration.
/// `INITIAL_STEP` must be an exact multiple of this or the loop never ends.
pub const STEP_DECREMENT: i64 = 10;

/// Left turn after every forward move, in degrees.
pub const TURN_ANGLE: f64 = 45.0;

/// Outline color.
pub const PEN_COLOR: Color = Color::BLACK;

/// Fill color.
pub const FILL_COLOR: Color = Color::GRAY;

/// Pen width in pixels.
pub const PEN_WIDTH: f64 = 1.0;

// === Window ===

pub const WINDOW_TITLE: &str = "Spiral Canvas";

pub const WINDOW_WIDTH: u32 = 960;

pub const WINDOW_HEIGHT: u32 = 960;

/// Canvas background.
pub const BACKGROUND_COLOR: Color = Color::WHITE;

/// Pixels kept free around the drawing when fitting it to the window.
pub const VIEWPORT_MARGIN: f64 = 24.0;

/// Shapes revealed per frame while animating.
pub const SHAPES_PER_FRAME: usize = 1;
