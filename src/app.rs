//! Application State and Logic
//!
//! This module holds the finished drawing and the reveal animation, and
//! rasterizes it for the renderer. It's independent of the windowing system,
//! so it can be driven and tested without a display.

use crate::color::Color;
use crate::raster::{self, Canvas, FillRule, Viewport};
use crate::turtle::Drawing;
use crate::Renderer;

/// How the drawing appears once the window opens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Animation {
    /// Whole drawing on the first frame
    Instant,
    /// Reveal `shapes_per_frame` shapes per frame, in drawing order
    Animated { shapes_per_frame: usize },
}

/// Main application state
pub struct App {
    drawing: Drawing,
    background: Color,
    fill_rule: FillRule,
    animation: Animation,
    margin: f64,
    /// Shapes currently visible
    revealed: usize,
    canvas: Canvas,
    viewport: Viewport,
    /// Canvas needs re-rasterizing and uploading
    dirty: bool,
}

impl App {
    /// Create the app for a finished drawing and a pixel size
    pub fn new(
        drawing: Drawing,
        background: Color,
        fill_rule: FillRule,
        animation: Animation,
        margin: f64,
        size: [u32; 2],
    ) -> Self {
        let revealed = match animation {
            Animation::Instant => drawing.len(),
            Animation::Animated { .. } => 0,
        };
        let viewport = Self::viewport_for(&drawing, size, margin);

        Self {
            drawing,
            background,
            fill_rule,
            animation,
            margin,
            revealed,
            canvas: Canvas::new(size[0], size[1], background),
            viewport,
            dirty: true,
        }
    }

    fn viewport_for(drawing: &Drawing, size: [u32; 2], margin: f64) -> Viewport {
        match drawing.bounds() {
            Some(bounds) => Viewport::fit(bounds, size[0], size[1], margin),
            None => Viewport::centered(size[0], size[1]),
        }
    }

    /// Advance the reveal by one frame. Returns true while more frames are needed.
    pub fn update(&mut self) -> bool {
        if let Animation::Animated { shapes_per_frame } = self.animation {
            if self.revealed < self.drawing.len() {
                self.revealed = (self.revealed + shapes_per_frame.max(1)).min(self.drawing.len());
                self.dirty = true;
            }
        }
        !self.is_complete()
    }

    /// All shapes are visible
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.drawing.len()
    }

    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Re-fit the drawing to a new pixel size
    pub fn resize(&mut self, size: [u32; 2]) {
        if size[0] == 0 || size[1] == 0 {
            return;
        }
        self.canvas = Canvas::new(size[0], size[1], self.background);
        self.viewport = Self::viewport_for(&self.drawing, size, self.margin);
        self.dirty = true;
    }

    /// Rasterize the visible shapes if anything changed
    pub fn rasterize(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.canvas.clear(self.background);
        raster::rasterize(
            &self.drawing,
            self.revealed,
            &self.viewport,
            self.fill_rule,
            &mut self.canvas,
        );
        self.dirty = false;
        log::debug!(
            "Rasterized {}/{} shapes at {}x{}",
            self.revealed,
            self.drawing.len(),
            self.canvas.width(),
            self.canvas.height()
        );
        true
    }

    /// Render the application (called each frame)
    pub fn render(&mut self, renderer: &mut Renderer) {
        if self.rasterize() {
            renderer.upload_canvas(&self.canvas);
        }
        renderer.render();
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turtle::Turtle;

    fn three_lines() -> Drawing {
        let mut turtle = Turtle::new();
        for _ in 0..3 {
            turtle.forward(10.0);
            turtle.left(120.0);
        }
        turtle.take_drawing()
    }

    #[test]
    fn test_instant_shows_everything() {
        let app = App::new(
            three_lines(),
            Color::WHITE,
            FillRule::EvenOdd,
            Animation::Instant,
            2.0,
            [32, 32],
        );
        assert!(app.is_complete());
        assert_eq!(app.revealed(), 3);
    }

    #[test]
    fn test_animated_reveal_advances_per_frame() {
        let mut app = App::new(
            three_lines(),
            Color::WHITE,
            FillRule::EvenOdd,
            Animation::Animated { shapes_per_frame: 2 },
            2.0,
            [32, 32],
        );
        assert_eq!(app.revealed(), 0);

        assert!(app.update());
        assert_eq!(app.revealed(), 2);

        assert!(!app.update());
        assert_eq!(app.revealed(), 3);

        // stays complete
        assert!(!app.update());
        assert_eq!(app.revealed(), 3);
    }

    #[test]
    fn test_rasterize_only_when_dirty() {
        let mut app = App::new(
            three_lines(),
            Color::WHITE,
            FillRule::EvenOdd,
            Animation::Instant,
            2.0,
            [32, 32],
        );
        assert!(app.rasterize());
        assert!(!app.rasterize());

        app.resize([64, 48]);
        assert!(app.rasterize());
        assert_eq!(app.canvas().width(), 64);
        assert_eq!(app.canvas().height(), 48);

        let inked = app
            .canvas()
            .pixels()
            .iter()
            .filter(|p| **p == Color::BLACK.to_linear_rgba())
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn test_zero_resize_is_ignored() {
        let mut app = App::new(
            Drawing::new(),
            Color::WHITE,
            FillRule::EvenOdd,
            Animation::Instant,
            0.0,
            [8, 8],
        );
        app.resize([0, 10]);
        assert_eq!(app.canvas().width(), 8);
    }
}
