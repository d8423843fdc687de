//! Turtle Cursor
//!
//! This module holds the stateful drawing cursor: position, heading, pen and
//! fill status. Movement is turned into a [`Drawing`], a display list of line
//! segments and fill polygons that the rasterizer can replay.
//!
//! Coordinates follow turtle "standard" mode: origin at the center, y up,
//! heading 0 pointing east and increasing counterclockwise.

use crate::color::Color;
use crate::constants::{FILL_COLOR, PEN_COLOR, PEN_WIDTH};

/// A single drawn primitive
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeKind {
    /// Straight stroke between two world points
    Line {
        from: [f64; 2],
        to: [f64; 2],
        color: Color,
        width: f64,
    },
    /// Closed filled polygon
    Polygon { points: Vec<[f64; 2]>, color: Color },
}

/// A primitive plus its paint order
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Paint order. A fill polygon takes the key of its `begin_fill`, so it
    /// paints beneath every line drawn after that point.
    pub z: u64,
    pub kind: ShapeKind,
}

/// Shapes in completion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drawing {
    shapes: Vec<Shape>,
}

impl Drawing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// World-space bounding box `[min_x, min_y, max_x, max_y]`, or `None` when empty.
    pub fn bounds(&self) -> Option<[f64; 4]> {
        let mut points = self.shapes.iter().flat_map(|shape| match &shape.kind {
            ShapeKind::Line { from, to, .. } => vec![*from, *to],
            ShapeKind::Polygon { points, .. } => points.clone(),
        });

        let first = points.next()?;
        let init = [first[0], first[1], first[0], first[1]];
        Some(points.fold(init, |b, p| {
            [b[0].min(p[0]), b[1].min(p[1]), b[2].max(p[0]), b[3].max(p[1])]
        }))
    }
}

/// Open fill path between `begin_fill` and `end_fill`
#[derive(Debug, Clone)]
struct FillPath {
    z: u64,
    points: Vec<[f64; 2]>,
}

/// The drawing cursor
#[derive(Debug, Clone)]
pub struct Turtle {
    position: [f64; 2],
    /// Degrees in [0, 360)
    heading: f64,
    pen_down: bool,
    pen_color: Color,
    fill_color: Color,
    pen_width: f64,
    fill: Option<FillPath>,
    next_z: u64,
    drawing: Drawing,
}

impl Turtle {
    /// Cursor at the origin, heading east, pen down, not filling
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0],
            heading: 0.0,
            pen_down: true,
            pen_color: PEN_COLOR,
            fill_color: FILL_COLOR,
            pen_width: PEN_WIDTH,
            fill: None,
            next_z: 0,
            drawing: Drawing::new(),
        }
    }

    pub fn position(&self) -> [f64; 2] {
        self.position
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn is_down(&self) -> bool {
        self.pen_down
    }

    pub fn is_filling(&self) -> bool {
        self.fill.is_some()
    }

    pub fn pen_color(&self) -> Color {
        self.pen_color
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    /// Take the finished display list, leaving the cursor state intact
    pub fn take_drawing(&mut self) -> Drawing {
        std::mem::take(&mut self.drawing)
    }

    pub fn pen_up(&mut self) {
        self.pen_down = false;
    }

    pub fn pen_down(&mut self) {
        self.pen_down = true;
    }

    pub fn set_color(&mut self, pen: Color, fill: Color) {
        self.pen_color = pen;
        self.fill_color = fill;
    }

    pub fn set_pen_width(&mut self, width: f64) {
        self.pen_width = width;
    }

    /// Move along the current heading
    pub fn forward(&mut self, distance: f64) {
        let radians = self.heading.to_radians();
        let target = [
            self.position[0] + distance * radians.cos(),
            self.position[1] + distance * radians.sin(),
        ];
        self.move_to(target);
    }

    /// Turn counterclockwise
    pub fn left(&mut self, degrees: f64) {
        let heading = (self.heading + degrees).rem_euclid(360.0);
        // rem_euclid rounds tiny negative headings up to 360.0
        self.heading = if heading >= 360.0 { 0.0 } else { heading };
    }

    /// Turn clockwise
    pub fn right(&mut self, degrees: f64) {
        self.left(-degrees);
    }

    /// Absolute move
    pub fn goto(&mut self, x: f64, y: f64) {
        self.move_to([x, y]);
    }

    /// Start a fill path at the current position. An unfinished path is dropped.
    pub fn begin_fill(&mut self) {
        if self.fill.is_some() {
            log::debug!("begin_fill while filling, discarding open fill path");
        }
        let z = self.allocate_z();
        self.fill = Some(FillPath {
            z,
            points: vec![self.position],
        });
    }

    /// Close the fill path and paint it. No-op without a matching `begin_fill`.
    pub fn end_fill(&mut self) {
        let Some(path) = self.fill.take() else {
            return;
        };

        if path.points.len() > 2 {
            log::debug!("Fill closed with {} vertices", path.points.len());
            self.drawing.push(Shape {
                z: path.z,
                kind: ShapeKind::Polygon {
                    points: path.points,
                    color: self.fill_color,
                },
            });
        } else {
            log::debug!("Fill with {} vertices has no area, skipped", path.points.len());
        }
    }

    fn move_to(&mut self, target: [f64; 2]) {
        if self.pen_down {
            let z = self.allocate_z();
            self.drawing.push(Shape {
                z,
                kind: ShapeKind::Line {
                    from: self.position,
                    to: target,
                    color: self.pen_color,
                    width: self.pen_width,
                },
            });
        }
        if let Some(path) = &mut self.fill {
            path.points.push(target);
        }
        self.position = target;
    }

    fn allocate_z(&mut self) -> u64 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: [f64; 2], b: [f64; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9
    }

    #[test]
    fn test_forward_follows_heading() {
        let mut turtle = Turtle::new();
        turtle.forward(100.0);
        assert!(approx_eq(turtle.position(), [100.0, 0.0]));

        turtle.left(90.0);
        turtle.forward(50.0);
        assert!(approx_eq(turtle.position(), [100.0, 50.0]));
    }

    #[test]
    fn test_heading_wraps() {
        let mut turtle = Turtle::new();
        for _ in 0..9 {
            turtle.left(45.0);
        }
        assert!((turtle.heading() - 45.0).abs() < 1e-9);

        turtle.right(90.0);
        assert!((turtle.heading() - 315.0).abs() < 1e-9);
    }

    #[test]
    fn test_tiny_turn_stays_below_full_circle() {
        let mut turtle = Turtle::new();
        turtle.left(-1e-20);
        assert_eq!(turtle.heading(), 0.0);

        turtle.right(1e-20);
        assert!((0.0..360.0).contains(&turtle.heading()));
    }

    #[test]
    fn test_pen_up_moves_draw_nothing() {
        let mut turtle = Turtle::new();
        turtle.pen_up();
        turtle.goto(-400.0, -400.0);
        turtle.forward(10.0);
        assert!(turtle.drawing().is_empty());

        turtle.pen_down();
        turtle.forward(10.0);
        assert_eq!(turtle.drawing().len(), 1);
    }

    #[test]
    fn test_fill_polygon_collects_every_move() {
        let mut turtle = Turtle::new();
        turtle.begin_fill();
        for _ in 0..4 {
            turtle.forward(10.0);
            turtle.left(90.0);
        }
        turtle.end_fill();

        let polygons: Vec<_> = turtle
            .drawing()
            .shapes()
            .iter()
            .filter_map(|s| match &s.kind {
                ShapeKind::Polygon { points, color } => Some((points.clone(), *color)),
                _ => None,
            })
            .collect();

        assert_eq!(polygons.len(), 1);
        let (points, color) = &polygons[0];
        // start point plus one vertex per forward
        assert_eq!(points.len(), 5);
        assert_eq!(*color, Color::GRAY);
        assert!(!turtle.is_filling());
    }

    #[test]
    fn test_fill_paints_beneath_later_lines() {
        let mut turtle = Turtle::new();
        turtle.forward(5.0);
        turtle.begin_fill();
        turtle.forward(5.0);
        turtle.left(120.0);
        turtle.forward(5.0);
        turtle.end_fill();

        let shapes = turtle.drawing().shapes();
        // completion order: three lines, then the polygon
        assert_eq!(shapes.len(), 4);
        assert!(matches!(shapes[3].kind, ShapeKind::Polygon { .. }));
        assert!(shapes[3].z < shapes[1].z);
        assert!(shapes[0].z < shapes[3].z);
    }

    #[test]
    fn test_end_fill_without_begin_is_noop() {
        let mut turtle = Turtle::new();
        turtle.end_fill();
        assert!(turtle.drawing().is_empty());
    }

    #[test]
    fn test_degenerate_fill_is_skipped() {
        let mut turtle = Turtle::new();
        turtle.pen_up();
        turtle.begin_fill();
        turtle.forward(10.0);
        turtle.end_fill();
        assert!(turtle.drawing().is_empty());
    }

    #[test]
    fn test_bounds() {
        let mut turtle = Turtle::new();
        assert_eq!(turtle.drawing().bounds(), None);

        turtle.goto(10.0, -5.0);
        turtle.goto(-3.0, 7.0);
        assert_eq!(turtle.drawing().bounds(), Some([-3.0, -5.0, 10.0, 7.0]));
    }
}
