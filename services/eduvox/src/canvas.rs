//! A canvas that keeps a turtle in memory and writes its picture to a PNG.

use eduvox_core::{Canvas, CanvasError, CanvasState, Color, Point, Stroke, Turtle};
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CANVAS_WIDTH: u32 = 800;
pub const CANVAS_HEIGHT: u32 = 600;
pub const BACKGROUND: Color = Color::WHITE;

/// Rasterizes strokes onto a white image, origin at the centre, y up.
pub fn render(strokes: &[Stroke], width: u32, height: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb(BACKGROUND.0));
    let max = (f64::from(width) - 1.0, f64::from(height) - 1.0);
    for stroke in strokes {
        let from = to_pixel(stroke.from, width, height);
        let to = to_pixel(stroke.to, width, height);
        let Some((from, to)) = clip_segment(from, to, max) else {
            continue;
        };
        draw_line(&mut img, rounded(from), rounded(to), Rgb(stroke.color.0));
    }
    img
}

fn to_pixel(point: Point, width: u32, height: u32) -> (f64, f64) {
    (
        point.x + f64::from(width) / 2.0,
        f64::from(height) / 2.0 - point.y,
    )
}

fn rounded((x, y): (f64, f64)) -> (i64, i64) {
    (x.round() as i64, y.round() as i64)
}

/// Liang-Barsky clipping against `[0, max.0] x [0, max.1]`.
///
/// Returns `None` when the segment misses the rectangle entirely.
fn clip_segment(
    from: (f64, f64),
    to: (f64, f64),
    max: (f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    if ![from.0, from.1, to.0, to.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (to.0 - from.0, to.1 - from.1);
    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;

    for (p, q) in [
        (-dx, from.0),
        (dx, max.0 - from.0),
        (-dy, from.1),
        (dy, max.1 - from.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }
        if t_enter > t_exit {
            return None;
        }
    }

    Some((
        (from.0 + t_enter * dx, from.1 + t_enter * dy),
        (from.0 + t_exit * dx, from.1 + t_exit * dy),
    ))
}

/// Bresenham line. Endpoints are expected inside the image.
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if x >= 0 && y >= 0 && x < i64::from(img.width()) && y < i64::from(img.height()) {
            img.put_pixel(x as u32, y as u32, color);
        }
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Turtle canvas presented as an image file that is rewritten on every update.
pub struct PngCanvas {
    turtle: Turtle,
    path: PathBuf,
    width: u32,
    height: u32,
}

impl PngCanvas {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            turtle: Turtle::new(),
            path: path.into(),
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn turtle(&self) -> &Turtle {
        &self.turtle
    }
}

impl Canvas for PngCanvas {
    fn forward(&mut self, units: f64) {
        self.turtle.forward(units);
    }

    fn turn_left(&mut self, degrees: f64) {
        self.turtle.turn_left(degrees);
    }

    fn circle(&mut self, radius: f64) {
        self.turtle.circle(radius);
    }

    fn clear_all(&mut self) {
        self.turtle.clear_all();
    }

    fn goto(&mut self, x: f64, y: f64) {
        self.turtle.goto(x, y);
    }

    fn set_heading(&mut self, degrees: f64) {
        self.turtle.set_heading(degrees);
    }

    fn pen_up(&mut self) {
        self.turtle.pen_up();
    }

    fn pen_down(&mut self) {
        self.turtle.pen_down();
    }

    fn set_color(&mut self, color: Color) {
        self.turtle.set_color(color);
    }

    fn set_speed(&mut self, level: u8) {
        self.turtle.set_speed(level);
    }

    fn state(&self) -> CanvasState {
        self.turtle.state()
    }

    fn update(&mut self) -> Result<(), CanvasError> {
        let img = render(self.turtle.strokes(), self.width, self.height);
        img.save(&self.path)
            .map_err(|e| CanvasError::Render(e.to_string()))?;
        debug!(
            path = %self.path.display(),
            strokes = self.turtle.strokes().len(),
            speed = self.turtle.speed(),
            "Canvas written"
        );
        Ok(())
    }
}
