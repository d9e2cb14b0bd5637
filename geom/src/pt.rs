use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Angle;

/// A point in world space, in semantic units. The y axis grows downward,
/// matching screen drawing order rather than a Cartesian grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pt2D {
    x: f64,
    y: f64,
}

impl Pt2D {
    pub fn new(x: f64, y: f64) -> Pt2D {
        if !x.is_finite() || !y.is_finite() {
            panic!("Bad Pt2D ({}, {})", x, y);
        }
        Pt2D { x, y }
    }

    pub fn x(self) -> f64 {
        self.x
    }

    pub fn y(self) -> f64 {
        self.y
    }

    pub fn offset(self, dx: f64, dy: f64) -> Pt2D {
        Pt2D::new(self.x + dx, self.y + dy)
    }

    /// Walk `dist` units along `theta`. Negative distances walk backwards.
    /// The y component is negated, so angle 90 heads up the screen.
    pub fn project_away(self, dist: f64, theta: Angle) -> Pt2D {
        let (sin, cos) = theta.to_radians().sin_cos();
        Pt2D::new(self.x + dist * cos, self.y - dist * sin)
    }

    /// Rotate about `pivot` by `theta`, counter-clockwise on screen. The y
    /// offset is flipped into y-up coordinates, rotated, and flipped back.
    pub fn rotate_around(self, pivot: Pt2D, theta: Angle) -> Pt2D {
        let (sin, cos) = theta.to_radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = -(self.y - pivot.y);
        Pt2D::new(
            pivot.x + dx * cos - dy * sin,
            pivot.y - (dx * sin + dy * cos),
        )
    }

    pub fn dist_to(self, other: Pt2D) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// The angle from this point towards `to`, under the same y-flipped
    /// convention as `rotate_around`.
    pub fn angle_to(self, to: Pt2D) -> Angle {
        Angle::radians((-(to.y - self.y)).atan2(to.x - self.x))
    }

    pub fn center(pts: &[Pt2D]) -> Pt2D {
        assert!(!pts.is_empty());
        let mut x = 0.0;
        let mut y = 0.0;
        for pt in pts {
            x += pt.x;
            y += pt.y;
        }
        let len = pts.len() as f64;
        Pt2D::new(x / len, y / len)
    }
}

impl fmt::Display for Pt2D {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Pt2D({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_ccw_on_screen() {
        let pivot = Pt2D::new(10.0, 10.0);
        // A point to the right of the pivot swings up the screen under a
        // positive quarter turn.
        let pt = Pt2D::new(15.0, 10.0).rotate_around(pivot, Angle::degrees(90.0));
        assert!((pt.x() - 10.0).abs() < 1e-9);
        assert!((pt.y() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn project_away_heads_up_at_90() {
        let pt = Pt2D::new(0.0, 100.0).project_away(30.0, Angle::degrees(90.0));
        assert!((pt.x() - 0.0).abs() < 1e-9);
        assert!((pt.y() - 70.0).abs() < 1e-9);
    }
}
