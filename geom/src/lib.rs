//! Screen-space geometry for the intersection simulation: points, angles in
//! degrees, world bounds, and oriented rectangles with a Separating Axis
//! Theorem overlap test.
//!
//! Everything here uses the drawing convention: y grows downward, and a
//! positive rotation is counter-clockwise as seen on screen. The two facts
//! are reconciled by flipping the y offset around every rotation.

mod angle;
mod bounds;
mod oriented_rect;
mod pt;

pub use crate::angle::Angle;
pub use crate::bounds::Bounds;
pub use crate::oriented_rect::OrientedRect;
pub use crate::pt::Pt2D;

/// Below this distance, two points or edge lengths are considered degenerate.
pub const EPSILON_DIST: f64 = 1e-9;
