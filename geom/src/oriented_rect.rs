use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::{Angle, Pt2D, EPSILON_DIST};

/// A rectangle defined by center, size, and rotation, rather than
/// axis-aligned bounds. Corners are derived on demand, so they always agree
/// with the center/size/angle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    center: Pt2D,
    width: f64,
    height: f64,
    angle: Angle,
}

impl OrientedRect {
    pub fn from_center(center: Pt2D, width: f64, height: f64, angle: Angle) -> OrientedRect {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            panic!("Bad OrientedRect {}x{}", width, height);
        }
        OrientedRect {
            center,
            width,
            height,
            angle,
        }
    }

    /// Reconstructs a rectangle from four corners in (top-left, top-right,
    /// bottom-right, bottom-left) order. The input needn't be a perfect
    /// rectangle; the result is re-squared from the top and left edges, with
    /// the center at the midpoint of the tl/br diagonal.
    pub fn from_corners(tl: Pt2D, tr: Pt2D, br: Pt2D, bl: Pt2D) -> Result<OrientedRect> {
        let width = tl.dist_to(tr);
        let height = tl.dist_to(bl);
        if width <= EPSILON_DIST || height <= EPSILON_DIST {
            bail!(
                "Degenerate corners for an OrientedRect: {}, {}, {}, {}",
                tl,
                tr,
                br,
                bl
            );
        }
        Ok(OrientedRect::from_center(
            Pt2D::center(&[tl, br]),
            width,
            height,
            tl.angle_to(tr),
        ))
    }

    pub fn center(&self) -> Pt2D {
        self.center
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn angle(&self) -> Angle {
        self.angle
    }

    /// The four corners, always in (top-left, top-right, bottom-right,
    /// bottom-left) order. Edge vectors come from consecutive pairs, so the
    /// order matters.
    pub fn corners(&self) -> [Pt2D; 4] {
        let w = self.width / 2.0;
        let h = self.height / 2.0;
        let c = self.center;
        [
            c.offset(-w, -h),
            c.offset(w, -h),
            c.offset(w, h),
            c.offset(-w, h),
        ]
        .map(|pt| pt.rotate_around(c, self.angle))
    }

    /// Separating Axis Theorem over both rectangles' edge normals -- 8
    /// candidate axes, not deduplicated, since the two rectangles aren't
    /// generally parallel. Projection ranges that exactly touch count as
    /// overlapping.
    pub fn intersects(&self, other: &OrientedRect) -> bool {
        let own = self.corners();
        let theirs = other.corners();
        for pts in [&own, &theirs] {
            for i in 0..4 {
                let p1 = pts[i];
                let p2 = pts[(i + 1) % 4];
                let axis = (-(p2.y() - p1.y()), p2.x() - p1.x());
                let (min1, max1) = project_onto(axis, &own);
                let (min2, max2) = project_onto(axis, &theirs);
                if max1 < min2 || max2 < min1 {
                    return false;
                }
            }
        }
        true
    }

    /// Builds the forward "sensor" rectangle: anchored at this rect's
    /// trailing edge, extended `length` units along its forward direction,
    /// with the two leading corners fanned outward by `fov_degs` around
    /// their trailing corners. Deterministic in the inputs.
    pub fn project(&self, length: f64, fov_degs: f64) -> Result<OrientedRect> {
        if length <= 0.0 {
            bail!("Can't project {} forward by {}", self, length);
        }
        let [tl, _, _, bl] = self.corners();
        let front_tl = tl
            .project_away(length, self.angle)
            .rotate_around(tl, Angle::degrees(fov_degs));
        let front_bl = bl
            .project_away(length, self.angle)
            .rotate_around(bl, Angle::degrees(-fov_degs));
        OrientedRect::from_corners(tl, front_tl, front_bl, bl)
    }

    /// `project`, for callers that guarantee a positive length.
    pub fn must_project(&self, length: f64, fov_degs: f64) -> OrientedRect {
        self.project(length, fov_degs).unwrap()
    }
}

fn project_onto(axis: (f64, f64), pts: &[Pt2D; 4]) -> (f64, f64) {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for pt in pts {
        let scalar = pt.x() * axis.0 + pt.y() * axis.1;
        min = min.min(scalar);
        max = max.max(scalar);
    }
    (min, max)
}

impl fmt::Display for OrientedRect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "OrientedRect({} {}x{} at {})",
            self.center, self.width, self.height, self.angle
        )
    }
}
