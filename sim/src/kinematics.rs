use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of vehicle types. Per-class constants live in an
/// exhaustive match, so an unknown class can't exist at runtime.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub enum VehicleClass {
    Car,
    Bus,
    Bike,
}

/// Motion and size constants for one vehicle class. Speeds are in
/// units/second; `length` is the extent along the heading, `width` across
/// it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub max_speed: f64,
    pub accel: f64,
    pub width: f64,
    pub length: f64,
}

impl VehicleClass {
    pub fn spec(self) -> VehicleSpec {
        match self {
            VehicleClass::Car => VehicleSpec {
                max_speed: 75.0,
                accel: 20.0,
                width: 22.0,
                length: 54.0,
            },
            VehicleClass::Bus => VehicleSpec {
                max_speed: 45.0,
                accel: 12.0,
                width: 26.0,
                length: 76.0,
            },
            VehicleClass::Bike => VehicleSpec {
                max_speed: 105.0,
                accel: 28.0,
                width: 17.0,
                length: 38.0,
            },
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VehicleClass::Car => write!(f, "car"),
            VehicleClass::Bus => write!(f, "bus"),
            VehicleClass::Bike => write!(f, "bike"),
        }
    }
}
