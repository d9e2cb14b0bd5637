use std::fmt;

use serde::{Deserialize, Serialize};

/// An angle in degrees, stored raw. Positive angles rotate counter-clockwise
/// on screen under the inverted-y convention used across this workspace.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    pub fn degrees(degs: f64) -> Angle {
        if !degs.is_finite() {
            panic!("Bad Angle {}", degs);
        }
        Angle(degs)
    }

    pub fn radians(rads: f64) -> Angle {
        Angle::degrees(rads.to_degrees())
    }

    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }

    /// The raw value, which may lie outside [0, 360).
    pub fn raw_degrees(self) -> f64 {
        self.0
    }

    /// Wraps into [0, 360).
    pub fn normalized_degrees(self) -> f64 {
        let d = self.0 % 360.0;
        if d < 0.0 {
            d + 360.0
        } else {
            d
        }
    }

    pub fn normalize(self) -> Angle {
        Angle(self.normalized_degrees())
    }

    pub fn rotate_degs(self, degrees: f64) -> Angle {
        Angle::degrees(self.0 + degrees)
    }

    pub fn opposite(self) -> Angle {
        Angle::degrees(self.0 + 180.0)
    }

    /// The signed shortest rotation from `self` to `other`, in (-180, 180].
    pub fn shortest_rotation_towards(self, other: Angle) -> f64 {
        let mut diff = (other.0 - self.0) % 360.0;
        if diff < 0.0 {
            diff += 360.0;
        }
        if diff > 180.0 {
            diff -= 360.0;
        }
        diff
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.0)
    }
}
