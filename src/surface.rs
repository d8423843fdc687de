//! Drawing Surfaces
//!
//! [`DrawingSurface`] is the command contract the spiral drawer issues against.
//! Implement it to draw somewhere else (a window, a command log, a file).
//!
//! - [`RecordingSurface`] keeps the ordered command trace and returns from
//!   `done` immediately.
//! - [`CanvasSurface`] drives a [`Turtle`] and shows the result in a window,
//!   blocking in `done` until the window is closed.

use crate::color::Color;
use crate::error::{Result, SpiralError};
use crate::turtle::{Drawing, Turtle};
use crate::window::{self, WindowConfig};
use winit::event_loop::EventLoop;

/// Commands a drawing surface must accept.
///
/// Drawing commands are fire-and-forget; the surface tracks cursor state.
/// Only `done` can fail, because it is where a window surface meets the
/// display.
pub trait DrawingSurface {
    /// Stop drawing lines on moves.
    fn pen_up(&mut self);

    /// Draw lines on moves.
    fn pen_down(&mut self);

    /// Move to an absolute position.
    fn goto(&mut self, x: f64, y: f64);

    /// Set the outline and fill colors.
    fn color(&mut self, pen: Color, fill: Color);

    /// Start collecting a fill path.
    fn begin_fill(&mut self);

    /// Close the fill path and paint it with the fill color.
    fn end_fill(&mut self);

    /// Move along the current heading.
    fn forward(&mut self, distance: f64);

    /// Turn counterclockwise by `degrees`.
    fn left(&mut self, degrees: f64);

    /// Turn clockwise by `degrees`.
    fn right(&mut self, degrees: f64);

    /// Block until the surface is dismissed.
    fn done(&mut self) -> Result<()>;
}

/// One recorded drawing command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    PenUp,
    PenDown,
    Goto { x: f64, y: f64 },
    Color { pen: Color, fill: Color },
    BeginFill,
    EndFill,
    Forward(f64),
    Left(f64),
    Right(f64),
}

/// Surface that records commands instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<Command>,
    done_calls: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of times `done` was called
    pub fn done_calls(&self) -> usize {
        self.done_calls
    }

    /// Distances of every `Forward`, in order
    pub fn forward_distances(&self) -> Vec<f64> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Forward(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    /// Net counterclockwise turn in degrees, without wrapping
    pub fn total_turn(&self) -> f64 {
        self.commands
            .iter()
            .map(|c| match c {
                Command::Left(a) => *a,
                Command::Right(a) => -*a,
                _ => 0.0,
            })
            .sum()
    }

    /// Replay the trace through a turtle cursor
    pub fn replay(&self) -> Turtle {
        let mut turtle = Turtle::new();
        for command in &self.commands {
            match *command {
                Command::PenUp => turtle.pen_up(),
                Command::PenDown => turtle.pen_down(),
                Command::Goto { x, y } => turtle.goto(x, y),
                Command::Color { pen, fill } => turtle.set_color(pen, fill),
                Command::BeginFill => turtle.begin_fill(),
                Command::EndFill => turtle.end_fill(),
                Command::Forward(d) => turtle.forward(d),
                Command::Left(a) => turtle.left(a),
                Command::Right(a) => turtle.right(a),
            }
        }
        turtle
    }

    fn record(&mut self, command: Command) {
        log::trace!("{:?}", command);
        self.commands.push(command);
    }
}

impl DrawingSurface for RecordingSurface {
    fn pen_up(&mut self) {
        self.record(Command::PenUp);
    }

    fn pen_down(&mut self) {
        self.record(Command::PenDown);
    }

    fn goto(&mut self, x: f64, y: f64) {
        self.record(Command::Goto { x, y });
    }

    fn color(&mut self, pen: Color, fill: Color) {
        self.record(Command::Color { pen, fill });
    }

    fn begin_fill(&mut self) {
        self.record(Command::BeginFill);
    }

    fn end_fill(&mut self) {
        self.record(Command::EndFill);
    }

    fn forward(&mut self, distance: f64) {
        self.record(Command::Forward(distance));
    }

    fn left(&mut self, degrees: f64) {
        self.record(Command::Left(degrees));
    }

    fn right(&mut self, degrees: f64) {
        self.record(Command::Right(degrees));
    }

    fn done(&mut self) -> Result<()> {
        self.done_calls += 1;
        Ok(())
    }
}

/// Surface that draws into a desktop window
///
/// The event loop is created up front so a missing display fails at
/// construction, before anything is drawn. Commands build a [`Drawing`];
/// `done` opens the window, animates the drawing and blocks until the
/// user closes it.
pub struct CanvasSurface {
    turtle: Turtle,
    config: WindowConfig,
    event_loop: Option<EventLoop<()>>,
}

impl CanvasSurface {
    pub fn new(config: WindowConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        log::info!("🪟 Event loop created");

        let mut turtle = Turtle::new();
        turtle.set_pen_width(config.pen_width);

        Ok(Self {
            turtle,
            config,
            event_loop: Some(event_loop),
        })
    }

    pub fn turtle(&self) -> &Turtle {
        &self.turtle
    }

    pub fn drawing(&self) -> &Drawing {
        self.turtle.drawing()
    }
}

impl DrawingSurface for CanvasSurface {
    fn pen_up(&mut self) {
        self.turtle.pen_up();
    }

    fn pen_down(&mut self) {
        self.turtle.pen_down();
    }

    fn goto(&mut self, x: f64, y: f64) {
        self.turtle.goto(x, y);
    }

    fn color(&mut self, pen: Color, fill: Color) {
        self.turtle.set_color(pen, fill);
    }

    fn begin_fill(&mut self) {
        self.turtle.begin_fill();
    }

    fn end_fill(&mut self) {
        self.turtle.end_fill();
    }

    fn forward(&mut self, distance: f64) {
        self.turtle.forward(distance);
    }

    fn left(&mut self, degrees: f64) {
        self.turtle.left(degrees);
    }

    fn right(&mut self, degrees: f64) {
        self.turtle.right(degrees);
    }

    fn done(&mut self) -> Result<()> {
        let event_loop = self.event_loop.take().ok_or(SpiralError::AlreadyClosed)?;
        let drawing = self.turtle.take_drawing();
        log::info!("Drawing finished with {} shapes, showing window", drawing.len());
        window::run(event_loop, drawing, self.config.clone())
    }
}
