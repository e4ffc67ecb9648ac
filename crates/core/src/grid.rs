//! Reference grid drawn underneath the user's shapes.

use crate::canvas::{Canvas, Color};

/// Grid geometry in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpec {
    pub cell_size: i32,
    pub width: i32,
    pub height: i32,
}

impl GridSpec {
    pub const DEFAULT_CELL_SIZE: i32 = 10;
    pub const DEFAULT_WIDTH: i32 = 800;
    pub const DEFAULT_HEIGHT: i32 = 600;

    /// X coordinates of the vertical lines, left to right.
    pub fn columns(&self) -> Vec<i32> {
        axis_positions(self.width, self.cell_size)
    }

    /// Y coordinates of the horizontal lines, bottom to top.
    pub fn rows(&self) -> Vec<i32> {
        axis_positions(self.height, self.cell_size)
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            cell_size: Self::DEFAULT_CELL_SIZE,
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
        }
    }
}

/// Positions from `floor(-extent/2)` through `floor(extent/2)` inclusive.
fn axis_positions(extent: i32, step: i32) -> Vec<i32> {
    if step <= 0 {
        return Vec::new();
    }
    let start = (-extent).div_euclid(2);
    let end = extent.div_euclid(2) + step;
    (start..end).step_by(step as usize).collect()
}

/// Draws the grid in light gray, then leaves the cursor at the origin,
/// heading 0, black pen down.
///
/// Calling it again redraws the same lines and ends in the same state.
pub fn draw_grid<C: Canvas + ?Sized>(canvas: &mut C, spec: &GridSpec) {
    canvas.set_speed(0);
    canvas.pen_up();
    canvas.set_color(Color::LIGHT_GRAY);

    let top = f64::from(spec.height.div_euclid(2));
    for x in spec.columns() {
        canvas.goto(f64::from(x), top);
        canvas.set_heading(270.0);
        canvas.pen_down();
        canvas.forward(f64::from(spec.height));
        canvas.pen_up();
    }

    let left = f64::from((-spec.width).div_euclid(2));
    for y in spec.rows() {
        canvas.goto(left, f64::from(y));
        canvas.set_heading(0.0);
        canvas.pen_down();
        canvas.forward(f64::from(spec.width));
        canvas.pen_up();
    }

    canvas.set_color(Color::BLACK);
    canvas.goto(0.0, 0.0);
    canvas.pen_down();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{CanvasState, Point, Turtle};

    #[test]
    fn default_spec_matches_the_window() {
        let spec = GridSpec::default();
        assert_eq!(spec.cell_size, 10);
        assert_eq!((spec.width, spec.height), (800, 600));
        assert_eq!(spec.columns().len(), 81);
        assert_eq!(spec.rows().len(), 61);
        assert_eq!(spec.columns().first(), Some(&-400));
        assert_eq!(spec.columns().last(), Some(&400));
    }

    #[test]
    fn odd_extents_floor_like_integer_division() {
        let spec = GridSpec {
            cell_size: 10,
            width: 25,
            height: 25,
        };
        assert_eq!(spec.columns(), vec![-13, -3, 7, 17]);
    }

    #[test]
    fn grid_lines_are_gray_and_span_the_canvas() {
        let mut turtle = Turtle::new();
        let spec = GridSpec {
            cell_size: 100,
            width: 200,
            height: 100,
        };
        draw_grid(&mut turtle, &spec);

        let gray: Vec<_> = turtle
            .strokes()
            .iter()
            .filter(|s| s.color == Color::LIGHT_GRAY)
            .collect();
        // 3 vertical lines plus 2 horizontal lines
        assert_eq!(gray.len(), 5);
        assert_eq!(gray[0].from, Point::new(-100.0, 50.0));
        assert!((gray[0].to.y - -50.0).abs() < 1e-9);
        assert_eq!(gray[3].from, Point::new(-100.0, -50.0));
        assert!((gray[3].to.x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn ends_at_origin_with_pen_down_and_black_pen() {
        let mut turtle = Turtle::new();
        turtle.forward(42.0);
        turtle.turn_left(33.0);
        draw_grid(&mut turtle, &GridSpec::default());

        assert_eq!(turtle.state(), CanvasState::default());
        assert_eq!(turtle.speed(), 0);
    }

    #[test]
    fn drawing_twice_is_idempotent() {
        let spec = GridSpec::default();
        let mut turtle = Turtle::new();

        draw_grid(&mut turtle, &spec);
        let first_state = turtle.state();
        let first_strokes = turtle.strokes().to_vec();

        draw_grid(&mut turtle, &spec);
        assert_eq!(turtle.state(), first_state);
        assert!(turtle.state().pen_down);
        assert_eq!(turtle.state().position, Point::ORIGIN);
        assert_eq!(&turtle.strokes()[first_strokes.len()..], &first_strokes[..]);
    }

    #[test]
    fn non_positive_cell_size_only_resets_the_cursor() {
        let mut turtle = Turtle::new();
        turtle.pen_up();
        turtle.goto(5.0, 5.0);
        draw_grid(
            &mut turtle,
            &GridSpec {
                cell_size: 0,
                ..GridSpec::default()
            },
        );
        assert!(turtle.strokes().is_empty());
        assert_eq!(turtle.state(), CanvasState::default());
    }
}
