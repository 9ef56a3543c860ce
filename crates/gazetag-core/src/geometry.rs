use serde::{Deserialize, Serialize};

/// Coordinate value recorded in place of a real gaze position when the
/// tracker lost the eye or the sample line was malformed.
pub const INVALID_COORD: f64 = 999_999_999.0;

/// A recorded gaze position in screen pixel coordinates.
///
/// A point carrying [`INVALID_COORD`] in either axis is an invalid sample;
/// it is contained in no rectangle and never classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GazePoint {
    pub x: f64,
    pub y: f64,
}

impl GazePoint {
    /// The invalid-sample marker (sentinel in both axes).
    pub const INVALID: GazePoint = GazePoint {
        x: INVALID_COORD,
        y: INVALID_COORD,
    };

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.x == INVALID_COORD || self.y == INVALID_COORD
    }
}

/// An axis-aligned rectangle with inclusive bounds on all four sides.
///
/// Bounds are expected to satisfy `x_min <= x_max` and `y_min <= y_max`;
/// this is not validated at construction since malformed rectangles are a
/// configuration error, not a runtime one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Returns true if the point lies within the inclusive bounds.
    /// An invalid point is inside no rectangle.
    #[must_use]
    pub fn contains(&self, point: GazePoint) -> bool {
        if point.is_invalid() {
            return false;
        }
        self.x_min <= point.x
            && point.x <= self.x_max
            && self.y_min <= point.y
            && point.y <= self.y_max
    }
}

/// Screen resolution of a recording session, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Screen {
    pub max_x: f64,
    pub max_y: f64,
}

impl Screen {
    #[must_use]
    pub const fn new(max_x: f64, max_y: f64) -> Self {
        Self { max_x, max_y }
    }

    /// Display area of the left-hand video: `[0, 0, ⌊max_x/2⌋, max_y]`.
    #[must_use]
    pub fn left_half(&self) -> Rect {
        Rect::new(0.0, 0.0, (self.max_x / 2.0).trunc(), self.max_y.trunc())
    }

    /// Display area of the right-hand video: `[⌊max_x/2⌋+1, 0, max_x, max_y]`.
    #[must_use]
    pub fn right_half(&self) -> Rect {
        Rect::new(
            (self.max_x / 2.0).trunc() + 1.0,
            0.0,
            self.max_x.trunc(),
            self.max_y.trunc(),
        )
    }
}

/// Which half of the screen a video occupies in a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Suffix used when composing region-registry keys.
    #[must_use]
    pub fn suffix(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }

    #[must_use]
    pub fn display_half(&self, screen: Screen) -> Rect {
        match self {
            Side::Left => screen.left_half(),
            Side::Right => screen.right_half(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_inclusive_bounds() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        assert!(rect.contains(GazePoint::new(5.0, 5.0)));
        assert!(rect.contains(GazePoint::new(0.0, 0.0)), "min corner is inside");
        assert!(rect.contains(GazePoint::new(10.0, 10.0)), "max corner is inside");
        assert!(!rect.contains(GazePoint::new(11.0, 5.0)));
        assert!(!rect.contains(GazePoint::new(5.0, -0.5)));
    }

    #[test]
    fn test_invalid_point_is_inside_nothing() {
        let everything = Rect::new(f64::MIN, f64::MIN, f64::MAX, f64::MAX);

        assert!(!everything.contains(GazePoint::INVALID));
        assert!(!everything.contains(GazePoint::new(INVALID_COORD, 100.0)));
        assert!(!everything.contains(GazePoint::new(100.0, INVALID_COORD)));
    }

    #[test]
    fn test_display_halves_split_at_midpoint() {
        let screen = Screen::new(1281.0, 1024.0);

        assert_eq!(screen.left_half(), Rect::new(0.0, 0.0, 640.0, 1024.0));
        assert_eq!(screen.right_half(), Rect::new(641.0, 0.0, 1281.0, 1024.0));

        // The split leaves no gap a gaze sample could fall through, apart
        // from the open pixel column between 640 and 641.
        assert!(screen.left_half().contains(GazePoint::new(640.0, 512.0)));
        assert!(screen.right_half().contains(GazePoint::new(641.0, 512.0)));
    }

    #[test]
    fn test_display_halves_truncate_fractional_resolution() {
        let screen = Screen::new(1280.5, 1024.9);

        assert_eq!(screen.left_half(), Rect::new(0.0, 0.0, 640.0, 1024.0));
        assert_eq!(screen.right_half(), Rect::new(641.0, 0.0, 1280.0, 1024.0));
    }
}
