//! The drawing surface capability and an in-memory turtle that implements it.

use tracing::debug;

/// An RGB pen color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);
    pub const WHITE: Color = Color([255, 255, 255]);
    pub const LIGHT_GRAY: Color = Color([211, 211, 211]);
}

/// A point in canvas coordinates: origin at the centre, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One line segment left behind by the pen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub from: Point,
    pub to: Point,
    pub color: Color,
}

/// Snapshot of the drawing cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasState {
    pub position: Point,
    /// Degrees in `[0, 360)`, counter-clockwise from the positive x axis.
    pub heading: f64,
    pub pen_down: bool,
    pub color: Color,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            position: Point::ORIGIN,
            heading: 0.0,
            pen_down: true,
            color: Color::BLACK,
        }
    }
}

/// Failure to present the canvas to the user.
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("failed to render canvas: {0}")]
    Render(String),
    #[error("canvas I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A stateful 2D drawing surface driven turtle-style.
///
/// All drawing operations are infallible; only `update`, which pushes the
/// current picture to wherever the user sees it, can fail.
#[cfg_attr(test, mockall::automock)]
pub trait Canvas {
    fn forward(&mut self, units: f64);
    fn turn_left(&mut self, degrees: f64);
    /// Draws a full circle whose centre lies `radius` units to the left.
    fn circle(&mut self, radius: f64);
    /// Erases everything drawn so far. The cursor is not moved.
    fn clear_all(&mut self);
    fn goto(&mut self, x: f64, y: f64);
    fn set_heading(&mut self, degrees: f64);
    fn pen_up(&mut self);
    fn pen_down(&mut self);
    fn set_color(&mut self, color: Color);
    /// Animation speed, `0` being fastest.
    fn set_speed(&mut self, level: u8);
    fn state(&self) -> CanvasState;
    /// Presents the current drawing.
    fn update(&mut self) -> Result<(), CanvasError>;
}

/// In-memory turtle that records every stroke it draws.
#[derive(Debug, Clone, Default)]
pub struct Turtle {
    state: CanvasState,
    speed: u8,
    strokes: Vec<Stroke>,
}

impl Turtle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    fn move_to(&mut self, to: Point) {
        let from = self.state.position;
        if self.state.pen_down {
            self.strokes.push(Stroke {
                from,
                to,
                color: self.state.color,
            });
        }
        self.state.position = to;
    }

    fn rotate(&mut self, degrees: f64) {
        self.state.heading = normalize_degrees(self.state.heading + degrees);
    }
}

impl Canvas for Turtle {
    fn forward(&mut self, units: f64) {
        let radians = self.state.heading.to_radians();
        let Point { x, y } = self.state.position;
        self.move_to(Point::new(x + units * radians.cos(), y + units * radians.sin()));
    }

    fn turn_left(&mut self, degrees: f64) {
        self.rotate(degrees);
    }

    fn circle(&mut self, radius: f64) {
        // Regular polygon approximation; more sides for bigger circles.
        let steps = 1 + (11.0 + radius.abs() / 6.0).min(59.0) as u32;
        let mut turn = 360.0 / f64::from(steps);
        let mut chord = 2.0 * radius * (turn / 2.0).to_radians().sin();
        if radius < 0.0 {
            turn = -turn;
            chord = -chord;
        }
        let start_heading = self.state.heading;
        let start_position = self.state.position;

        self.rotate(turn / 2.0);
        for _ in 0..steps {
            self.forward(chord);
            self.rotate(turn);
        }
        // Snap back to the start to avoid accumulating float drift.
        self.state.position = start_position;
        self.state.heading = start_heading;
        debug!(radius, steps, "Drew circle");
    }

    fn clear_all(&mut self) {
        debug!(strokes = self.strokes.len(), "Clearing canvas");
        self.strokes.clear();
    }

    fn goto(&mut self, x: f64, y: f64) {
        self.move_to(Point::new(x, y));
    }

    fn set_heading(&mut self, degrees: f64) {
        self.state.heading = normalize_degrees(degrees);
    }

    fn pen_up(&mut self) {
        self.state.pen_down = false;
    }

    fn pen_down(&mut self) {
        self.state.pen_down = true;
    }

    fn set_color(&mut self, color: Color) {
        self.state.color = color;
    }

    fn set_speed(&mut self, level: u8) {
        self.speed = level;
    }

    fn state(&self) -> CanvasState {
        self.state
    }

    fn update(&mut self) -> Result<(), CanvasError> {
        Ok(())
    }
}

fn normalize_degrees(degrees: f64) -> f64 {
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can return exactly 360.0 for tiny negative inputs.
    if normalized >= 360.0 { 0.0 } else { normalized }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert!(
            (actual.x - expected.x).abs() < EPS && (actual.y - expected.y).abs() < EPS,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn starts_at_origin_facing_east_with_pen_down() {
        let turtle = Turtle::new();
        assert_eq!(turtle.state(), CanvasState::default());
        assert!(turtle.strokes().is_empty());
    }

    #[test]
    fn forward_follows_heading() {
        let mut turtle = Turtle::new();
        turtle.forward(10.0);
        assert_point_eq(turtle.state().position, Point::new(10.0, 0.0));

        turtle.turn_left(90.0);
        turtle.forward(5.0);
        assert_point_eq(turtle.state().position, Point::new(10.0, 5.0));
        assert_eq!(turtle.strokes().len(), 2);
    }

    #[test]
    fn pen_up_moves_without_drawing() {
        let mut turtle = Turtle::new();
        turtle.pen_up();
        turtle.goto(30.0, 40.0);
        assert!(turtle.strokes().is_empty());
        turtle.pen_down();
        turtle.set_color(Color::LIGHT_GRAY);
        turtle.goto(0.0, 0.0);
        assert_eq!(turtle.strokes().len(), 1);
        assert_eq!(turtle.strokes()[0].color, Color::LIGHT_GRAY);
    }

    #[test]
    fn heading_is_normalized() {
        let mut turtle = Turtle::new();
        turtle.turn_left(450.0);
        assert!((turtle.state().heading - 90.0).abs() < EPS);
        turtle.set_heading(-90.0);
        assert!((turtle.state().heading - 270.0).abs() < EPS);
        turtle.turn_left(90.0);
        assert_eq!(turtle.state().heading, 0.0);
    }

    #[test]
    fn circle_returns_to_start_and_stays_left() {
        let mut turtle = Turtle::new();
        turtle.turn_left(30.0);
        let before = turtle.state();
        turtle.circle(50.0);
        let after = turtle.state();

        assert_point_eq(after.position, before.position);
        assert_eq!(after.heading, before.heading);
        // 1 + min(11 + 50/6, 59) = 20 sides
        assert_eq!(turtle.strokes().len(), 20);

        // Centre is 50 units to the left of a turtle heading 30 degrees.
        let centre = Point::new(-50.0 * 30f64.to_radians().sin(), 50.0 * 30f64.to_radians().cos());
        for stroke in turtle.strokes() {
            let r = (stroke.to.x - centre.x).hypot(stroke.to.y - centre.y);
            assert!((r - 50.0).abs() < 1e-6, "vertex off circle: {r}");
        }
    }

    #[test]
    fn large_circles_cap_their_side_count() {
        let mut turtle = Turtle::new();
        turtle.circle(1000.0);
        assert_eq!(turtle.strokes().len(), 60);
    }

    #[test]
    fn clear_keeps_the_cursor() {
        let mut turtle = Turtle::new();
        turtle.forward(25.0);
        turtle.turn_left(45.0);
        let before = turtle.state();
        turtle.clear_all();
        assert!(turtle.strokes().is_empty());
        assert_eq!(turtle.state(), before);
    }

    #[test]
    fn speed_is_recorded() {
        let mut turtle = Turtle::new();
        turtle.set_speed(0);
        assert_eq!(turtle.speed(), 0);
        assert!(turtle.update().is_ok());
    }
}
