use anyhow::{bail, Result};
use geom::{Angle, Bounds, OrientedRect, Pt2D};
use serde::{Deserialize, Serialize};

use crate::VehicleClass;

/// Which way an agent travels when it enters the world. Up-bound traffic
/// enters from the bottom edge, and so on.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub enum EntryDirection {
    Up,
    Down,
    Left,
    Right,
}

impl EntryDirection {
    /// Right-bound traffic is 0 degrees, up 90, left 180, down 270, matching
    /// the counter-clockwise-on-screen rotation convention.
    pub fn heading(self) -> Angle {
        match self {
            EntryDirection::Right => Angle::ZERO,
            EntryDirection::Up => Angle::degrees(90.0),
            EntryDirection::Left => Angle::degrees(180.0),
            EntryDirection::Down => Angle::degrees(270.0),
        }
    }
}

/// What an agent intends to do at the junction. Left is the sharp turn,
/// right the moderate one. One-shot: consumed when the turn begins.
#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub enum TurnPlan {
    Left,
    Right,
    Straight,
}

/// One request from the outside world to add an agent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnRequest {
    pub class: VehicleClass,
    pub entry: EntryDirection,
    /// 1 and 2 are the near lanes, -1 and -2 the far ones.
    pub lane: i8,
    pub plan: TurnPlan,
}

/// The spawn point for one approach, as a pure function of entry direction
/// and lane. No offset table gets mutated as a side effect; callers can
/// compute this as often as they like.
pub fn spawn_center(entry: EntryDirection, lane: i8, world: &Bounds) -> Result<Pt2D> {
    let offset = lane_offset(lane)?;
    let mid = world.center();
    // The small nudges line each approach up with its drawn lane.
    Ok(match entry {
        EntryDirection::Up => Pt2D::new(mid.x() - offset + 5.0, world.max_y),
        EntryDirection::Down => Pt2D::new(mid.x() + offset - 20.0, world.min_y),
        EntryDirection::Left => Pt2D::new(world.max_x, mid.y() + offset - 35.0),
        EntryDirection::Right => Pt2D::new(world.min_x, mid.y() - offset - 10.0),
    })
}

fn lane_offset(lane: i8) -> Result<f64> {
    Ok(match lane {
        1 => 25.0,
        2 => 50.0,
        -1 => 0.0,
        -2 => -25.0,
        _ => bail!("Unknown lane {}", lane),
    })
}

/// The thin trigger rectangle where traffic heading `entry` begins its
/// planned turn: a line across the road on the near side of the junction,
/// hand-placed for the drawn intersection.
pub(crate) fn turn_trigger(entry: EntryDirection) -> OrientedRect {
    match entry {
        EntryDirection::Right => {
            OrientedRect::from_center(Pt2D::new(560.0, 340.0), 100.0, 1.0, Angle::degrees(90.0))
        }
        EntryDirection::Left => {
            OrientedRect::from_center(Pt2D::new(700.0, 340.0), 100.0, 1.0, Angle::degrees(90.0))
        }
        EntryDirection::Up => {
            OrientedRect::from_center(Pt2D::new(630.0, 400.0), 100.0, 1.0, Angle::ZERO)
        }
        EntryDirection::Down => {
            OrientedRect::from_center(Pt2D::new(630.0, 270.0), 100.0, 1.0, Angle::ZERO)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Bounds {
        Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x: 1280.0,
            max_y: 720.0,
        }
    }

    #[test]
    fn spawn_points_sit_on_the_world_edge() {
        let world = world();
        for entry in [
            EntryDirection::Up,
            EntryDirection::Down,
            EntryDirection::Left,
            EntryDirection::Right,
        ] {
            for lane in [1, 2, -1, -2] {
                let pt = spawn_center(entry, lane, &world).unwrap();
                assert!(world.contains(pt), "{:?} lane {} spawns at {}", entry, lane, pt);
                let on_edge = pt.x() == world.min_x
                    || pt.x() == world.max_x
                    || pt.y() == world.min_y
                    || pt.y() == world.max_y;
                assert!(on_edge, "{:?} lane {} spawns at {}", entry, lane, pt);
            }
        }
    }

    #[test]
    fn lanes_are_spaced_25_apart() {
        let world = world();
        let x = |lane| {
            spawn_center(EntryDirection::Up, lane, &world)
                .unwrap()
                .x()
        };
        assert_eq!(x(2), x(1) - 25.0);
        assert_eq!(x(-1), x(1) + 25.0);
        assert_eq!(x(-2), x(-1) + 25.0);
    }

    #[test]
    fn unknown_lane_is_rejected() {
        assert!(spawn_center(EntryDirection::Up, 3, &world()).is_err());
        assert!(spawn_center(EntryDirection::Up, 0, &world()).is_err());
    }

    #[test]
    fn triggers_cross_their_approach() {
        // A right-bound car driving down the middle of its lane crosses the
        // vertical trigger west of the junction.
        let trigger = turn_trigger(EntryDirection::Right);
        let car = OrientedRect::from_center(Pt2D::new(560.0, 325.0), 54.0, 22.0, Angle::ZERO);
        assert!(car.intersects(&trigger));

        let before = OrientedRect::from_center(Pt2D::new(400.0, 325.0), 54.0, 22.0, Angle::ZERO);
        assert!(!before.intersects(&trigger));
    }
}
