//! CPU Rasterizer
//!
//! Paints a [`Drawing`] into a linear-RGBA pixel canvas. Polygons use a
//! scanline fill sampled at pixel centers; lines are stepped one pixel at a
//! time with a square pen.
//!
//! World coordinates (turtle space: origin at center, y up) are mapped to
//! pixels (origin top-left, y down) by a [`Viewport`].

use crate::color::Color;
use crate::turtle::{Drawing, Shape, ShapeKind};

/// Which regions of a self-overlapping polygon are inside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Inside when a ray crosses an odd number of edges. Matches how the Tk
    /// canvas fills self-overlapping turtle paths.
    #[default]
    EvenOdd,
    /// Inside when the winding number is non-zero
    NonZero,
}

/// World → pixel mapping: uniform scale, y flipped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Pixels per world unit
    pub scale: f64,
    /// Pixel position of the world origin
    pub origin: [f64; 2],
}

impl Viewport {
    /// One world unit per pixel, world origin at the center
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            scale: 1.0,
            origin: [width as f64 / 2.0, height as f64 / 2.0],
        }
    }

    /// Fit `bounds` (`[min_x, min_y, max_x, max_y]`) into the pixel area,
    /// keeping aspect ratio and `margin` pixels free on every side.
    pub fn fit(bounds: [f64; 4], width: u32, height: u32, margin: f64) -> Self {
        let [min_x, min_y, max_x, max_y] = bounds;
        let world_w = (max_x - min_x).max(f64::EPSILON);
        let world_h = (max_y - min_y).max(f64::EPSILON);
        let avail_w = (width as f64 - 2.0 * margin).max(1.0);
        let avail_h = (height as f64 - 2.0 * margin).max(1.0);
        let scale = (avail_w / world_w).min(avail_h / world_h);

        let center = [(min_x + max_x) / 2.0, (min_y + max_y) / 2.0];
        Self {
            scale,
            origin: [
                width as f64 / 2.0 - center[0] * scale,
                height as f64 / 2.0 + center[1] * scale,
            ],
        }
    }

    pub fn to_pixel(&self, world: [f64; 2]) -> [f64; 2] {
        [
            self.origin[0] + world[0] * self.scale,
            self.origin[1] - world[1] * self.scale,
        ]
    }
}

/// Linear RGBA pixel buffer, row-major from the top-left
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background.to_linear_rgba(); (width * height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn clear(&mut self, background: Color) {
        self.pixels.fill(background.to_linear_rgba());
    }

    /// Composite `color` over one pixel. Out-of-bounds pixels are ignored.
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: [f32; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as usize) * self.width as usize + x as usize;
        let dst = self.pixels[idx];
        let a = color[3];
        self.pixels[idx] = [
            color[0] * a + dst[0] * (1.0 - a),
            color[1] * a + dst[1] * (1.0 - a),
            color[2] * a + dst[2] * (1.0 - a),
            a + dst[3] * (1.0 - a),
        ];
    }

    /// Scanline polygon fill in pixel coordinates
    pub fn fill_polygon(&mut self, points: &[[f64; 2]], color: Color, rule: FillRule) {
        if points.len() < 3 {
            return;
        }
        let linear = color.to_linear_rgba();

        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[1]), hi.max(p[1]))
            });
        let row_start = (min_y - 0.5).ceil().max(0.0) as i64;
        let row_end = (max_y - 0.5).floor().min(self.height as f64 - 1.0) as i64;

        // (x, winding) crossings of the current scanline
        let mut crossings: Vec<(f64, i32)> = Vec::new();

        for row in row_start..=row_end {
            let y = row as f64 + 0.5;
            crossings.clear();

            for i in 0..points.len() {
                let a = points[i];
                let b = points[(i + 1) % points.len()];
                // half-open so shared vertices count once
                let (upward, downward) = (a[1] <= y && b[1] > y, b[1] <= y && a[1] > y);
                if upward || downward {
                    let t = (y - a[1]) / (b[1] - a[1]);
                    let x = a[0] + t * (b[0] - a[0]);
                    crossings.push((x, if upward { 1 } else { -1 }));
                }
            }
            crossings.sort_by(|l, r| l.0.total_cmp(&r.0));

            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                let inside = match rule {
                    FillRule::EvenOdd => winding % 2 != 0,
                    FillRule::NonZero => winding != 0,
                };
                if !inside {
                    continue;
                }
                // pixel centers within [x0, x1)
                let x_start = (pair[0].0 - 0.5).ceil() as i64;
                let x_end = (pair[1].0 - 0.5).ceil() as i64;
                for x in x_start.max(0)..x_end.min(self.width as i64) {
                    self.blend_pixel(x, row, linear);
                }
            }
        }
    }

    /// Line in pixel coordinates with a square pen of `width` pixels
    pub fn draw_line(&mut self, from: [f64; 2], to: [f64; 2], color: Color, width: f64) {
        let linear = color.to_linear_rgba();
        let pen = width.max(1.0).round() as i64;
        let half = (pen - 1) / 2;

        // Stepping is per pixel, so only walk the part the pen can touch
        let reach = pen as f64;
        let bounds = [
            -reach,
            -reach,
            self.width as f64 + reach,
            self.height as f64 + reach,
        ];
        let Some((from, to)) = clip_segment(from, to, bounds) else {
            return;
        };

        let dx = to[0] - from[0];
        let dy = to[1] - from[1];
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;

        let mut last = None;
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = (from[0] + dx * t).floor() as i64;
            let y = (from[1] + dy * t).floor() as i64;
            if last == Some((x, y)) {
                continue;
            }
            last = Some((x, y));
            for py in (y - half)..(y - half + pen) {
                for px in (x - half)..(x - half + pen) {
                    self.blend_pixel(px, py, linear);
                }
            }
        }
    }
}

/// Clip a segment to `[min_x, min_y, max_x, max_y]` (Liang-Barsky).
/// Returns `None` when nothing of it is inside or a coordinate is not finite.
fn clip_segment(from: [f64; 2], to: [f64; 2], bounds: [f64; 4]) -> Option<([f64; 2], [f64; 2])> {
    if !from.iter().chain(to.iter()).all(|v| v.is_finite()) {
        return None;
    }
    let [min_x, min_y, max_x, max_y] = bounds;
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];

    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, from[0] - min_x),
        (dx, max_x - from[0]),
        (-dy, from[1] - min_y),
        (dy, max_y - from[1]),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let r = q / p;
            if p < 0.0 {
                t0 = t0.max(r);
            } else {
                t1 = t1.min(r);
            }
        }
    }
    if t0 > t1 {
        return None;
    }

    Some((
        [from[0] + dx * t0, from[1] + dy * t0],
        [from[0] + dx * t1, from[1] + dy * t1],
    ))
}

/// Paint the first `shape_count` shapes of `drawing` (completion order) in z order.
pub fn rasterize(
    drawing: &Drawing,
    shape_count: usize,
    viewport: &Viewport,
    rule: FillRule,
    canvas: &mut Canvas,
) {
    let count = shape_count.min(drawing.len());
    let mut visible: Vec<&Shape> = drawing.shapes()[..count].iter().collect();
    visible.sort_by_key(|shape| shape.z);

    for shape in visible {
        match &shape.kind {
            ShapeKind::Line {
                from,
                to,
                color,
                width,
            } => {
                canvas.draw_line(
                    viewport.to_pixel(*from),
                    viewport.to_pixel(*to),
                    *color,
                    *width,
                );
            }
            ShapeKind::Polygon { points, color } => {
                let pixels: Vec<[f64; 2]> = points.iter().map(|p| viewport.to_pixel(*p)).collect();
                canvas.fill_polygon(&pixels, *color, rule);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::turtle::Turtle;

    fn is_color(canvas: &Canvas, x: u32, y: u32, color: Color) -> bool {
        canvas.pixel(x, y) == Some(color.to_linear_rgba())
    }

    /// Two overlapping squares traced as one path
    fn double_square() -> Vec<[f64; 2]> {
        vec![
            [1.0, 1.0],
            [7.0, 1.0],
            [7.0, 7.0],
            [1.0, 7.0],
            [1.0, 1.0],
            [7.0, 1.0],
            [7.0, 7.0],
            [1.0, 7.0],
        ]
    }

    #[test]
    fn test_fill_square() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        canvas.fill_polygon(
            &[[2.0, 2.0], [6.0, 2.0], [6.0, 6.0], [2.0, 6.0]],
            Color::BLACK,
            FillRule::EvenOdd,
        );

        assert!(is_color(&canvas, 2, 2, Color::BLACK));
        assert!(is_color(&canvas, 5, 5, Color::BLACK));
        assert!(is_color(&canvas, 6, 6, Color::WHITE));
        assert!(is_color(&canvas, 1, 3, Color::WHITE));

        let filled = canvas
            .pixels()
            .iter()
            .filter(|p| **p == Color::BLACK.to_linear_rgba())
            .count();
        assert_eq!(filled, 16);
    }

    #[test]
    fn test_even_odd_leaves_double_cover_empty() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        canvas.fill_polygon(&double_square(), Color::BLACK, FillRule::EvenOdd);
        assert!(is_color(&canvas, 4, 4, Color::WHITE));
    }

    #[test]
    fn test_non_zero_fills_double_cover() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        canvas.fill_polygon(&double_square(), Color::BLACK, FillRule::NonZero);
        assert!(is_color(&canvas, 4, 4, Color::BLACK));
        assert!(is_color(&canvas, 8, 8, Color::WHITE));
    }

    #[test]
    fn test_polygon_clipped_to_canvas() {
        let mut canvas = Canvas::new(4, 4, Color::WHITE);
        canvas.fill_polygon(
            &[[-10.0, -10.0], [10.0, -10.0], [10.0, 10.0], [-10.0, 10.0]],
            Color::rgb(255, 0, 0),
            FillRule::EvenOdd,
        );
        assert!(canvas.pixels().iter().all(|p| *p == Color::rgb(255, 0, 0).to_linear_rgba()));
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        canvas.draw_line([1.5, 4.5], [8.5, 4.5], Color::BLACK, 1.0);

        for x in 1..=8 {
            assert!(is_color(&canvas, x, 4, Color::BLACK), "x = {}", x);
        }
        assert!(is_color(&canvas, 0, 4, Color::WHITE));
        assert!(is_color(&canvas, 9, 4, Color::WHITE));
        assert!(is_color(&canvas, 4, 3, Color::WHITE));
    }

    #[test]
    fn test_huge_line_is_clipped_to_canvas() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        // Would take 2e12 steps unclipped
        canvas.draw_line([-1e12, 4.5], [1e12, 4.5], Color::BLACK, 1.0);

        for x in 0..10 {
            assert!(is_color(&canvas, x, 4, Color::BLACK), "x = {}", x);
        }
        assert!(is_color(&canvas, 4, 3, Color::WHITE));
        assert!(is_color(&canvas, 4, 5, Color::WHITE));
    }

    #[test]
    fn test_off_canvas_line_paints_nothing() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        canvas.draw_line([-1e12, -50.0], [1e12, -50.0], Color::BLACK, 1.0);
        canvas.draw_line([f64::NAN, 1.0], [5.0, 5.0], Color::BLACK, 1.0);

        let white = Color::WHITE.to_linear_rgba();
        assert!(canvas.pixels().iter().all(|p| *p == white));
    }

    #[test]
    fn test_clip_segment() {
        let bounds = [0.0, 0.0, 10.0, 10.0];
        let (from, to) = clip_segment([-10.0, 5.0], [20.0, 5.0], bounds).unwrap();
        assert!((from[0] - 0.0).abs() < 1e-9 && from[1] == 5.0);
        assert!((to[0] - 10.0).abs() < 1e-9 && to[1] == 5.0);
        assert_eq!(
            clip_segment([2.0, 2.0], [8.0, 8.0], bounds),
            Some(([2.0, 2.0], [8.0, 8.0]))
        );
        assert_eq!(clip_segment([-5.0, -5.0], [-1.0, 20.0], bounds), None);
        assert_eq!(clip_segment([f64::INFINITY, 0.0], [1.0, 1.0], bounds), None);
    }

    #[test]
    fn test_wide_line_covers_rows() {
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        canvas.draw_line([2.5, 5.5], [7.5, 5.5], Color::BLACK, 3.0);

        assert!(is_color(&canvas, 4, 4, Color::BLACK));
        assert!(is_color(&canvas, 4, 5, Color::BLACK));
        assert!(is_color(&canvas, 4, 6, Color::BLACK));
        assert!(is_color(&canvas, 4, 7, Color::WHITE));
    }

    #[test]
    fn test_viewport_centered() {
        let viewport = Viewport::centered(200, 100);
        assert_eq!(viewport.to_pixel([0.0, 0.0]), [100.0, 50.0]);
        // y up in world, down in pixels
        assert_eq!(viewport.to_pixel([10.0, 10.0]), [110.0, 40.0]);
    }

    #[test]
    fn test_viewport_fit_keeps_bounds_inside() {
        let bounds = [-600.0, -400.0, 300.0, 500.0];
        let viewport = Viewport::fit(bounds, 400, 200, 10.0);

        let low = viewport.to_pixel([bounds[0], bounds[1]]);
        let high = viewport.to_pixel([bounds[2], bounds[3]]);
        assert!(low[0] >= 10.0 - 1e-9 && high[0] <= 390.0 + 1e-9);
        // height is the tight axis
        assert!((low[1] - 190.0).abs() < 1e-9);
        assert!((high[1] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_rasterize_paints_fill_under_outline() {
        let mut turtle = Turtle::new();
        turtle.pen_up();
        turtle.goto(-3.0, -3.0);
        turtle.set_color(Color::BLACK, Color::GRAY);
        turtle.begin_fill();
        turtle.pen_down();
        for _ in 0..4 {
            turtle.forward(6.0);
            turtle.left(90.0);
        }
        turtle.end_fill();

        let drawing = turtle.drawing();
        let viewport = Viewport::centered(10, 10);
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        rasterize(drawing, drawing.len(), &viewport, FillRule::EvenOdd, &mut canvas);

        // interior gray, bottom edge (world y = -3 → pixel row 8) black on top
        assert!(is_color(&canvas, 5, 5, Color::GRAY));
        assert!(is_color(&canvas, 4, 8, Color::BLACK));
        assert!(is_color(&canvas, 0, 0, Color::WHITE));
    }

    #[test]
    fn test_rasterize_partial_reveal_hides_fill() {
        let mut turtle = Turtle::new();
        turtle.pen_up();
        turtle.goto(-3.0, -3.0);
        turtle.pen_down();
        turtle.begin_fill();
        turtle.goto(3.0, -3.0);
        turtle.goto(3.0, 3.0);
        turtle.goto(-3.0, 3.0);
        turtle.end_fill();

        let drawing = turtle.drawing();
        let viewport = Viewport::centered(10, 10);
        let mut canvas = Canvas::new(10, 10, Color::WHITE);
        // lines only; the polygon completes last
        rasterize(drawing, drawing.len() - 1, &viewport, FillRule::EvenOdd, &mut canvas);

        assert!(is_color(&canvas, 5, 5, Color::WHITE));
    }
}
