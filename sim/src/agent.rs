use geom::{Angle, OrientedRect, Pt2D};
use serde::{Deserialize, Serialize};

use crate::{AgentID, EntryDirection, TurnPlan, VehicleClass};

/// Where an agent is and which way it points. Owned exclusively by its
/// Agent; everybody else only reads it through snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub center: Pt2D,
    pub heading: Angle,
}

/// A pending heading change, consumed incrementally over multiple ticks.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnIntent {
    pub active: bool,
    pub target: Angle,
    pub rate_degs: f64,
}

impl TurnIntent {
    pub fn none() -> TurnIntent {
        TurnIntent {
            active: false,
            target: Angle::ZERO,
            rate_degs: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentID,
    pub class: VehicleClass,
    pub pose: Pose,
    /// Signed; negative means reversing.
    pub speed: f64,
    pub turn: TurnIntent,
    /// 1 and 2 are the near lanes, -1 and -2 the far ones.
    pub lane: i8,
    pub entry: EntryDirection,
    pub plan: TurnPlan,
}

impl Agent {
    /// The bounding rectangle for the current pose, long side along the
    /// heading.
    pub fn rect(&self) -> OrientedRect {
        let spec = self.class.spec();
        OrientedRect::from_center(self.pose.center, spec.length, spec.width, self.pose.heading)
    }

    /// The forward sensor rectangle, or None when the sensor is disabled by
    /// a non-positive length.
    pub fn sensor(&self, length: f64, fov_degs: f64) -> Option<OrientedRect> {
        if length <= 0.0 {
            return None;
        }
        Some(self.rect().must_project(length, fov_degs))
    }

    /// Begin rotating `relative_degs` away from the current heading, at up
    /// to `rate_degs` per second (scaled by speed each tick).
    pub fn set_turn(&mut self, relative_degs: f64, rate_degs: f64) {
        self.turn = TurnIntent {
            active: true,
            target: self.pose.heading.rotate_degs(relative_degs),
            rate_degs,
        };
    }

    /// One tick of longitudinal control. First match wins: a physical
    /// overlap means a hard stop, a sensor hit brakes and then backs away,
    /// and a clear road accelerates toward the class max.
    pub(crate) fn update_speed(
        &mut self,
        dt: f64,
        rect_collision: bool,
        projection_collision: bool,
        brake_force: f64,
    ) {
        if rect_collision {
            self.speed = 0.0;
        } else if projection_collision {
            self.reverse(dt, brake_force);
        } else {
            self.accelerate(dt);
        }
    }

    fn accelerate(&mut self, dt: f64) {
        let spec = self.class.spec();
        let mut accel = spec.accel;
        // Recover from reverse faster.
        if self.speed < 0.0 {
            accel *= 3.0;
        }
        self.speed += accel * dt;
        if self.speed > spec.max_speed {
            self.speed = spec.max_speed;
        }
    }

    fn brake(&mut self, dt: f64, force: f64) {
        self.speed -= self.class.spec().accel * dt * force;
        // Braking alone never flips into reverse.
        if self.speed < 0.0 {
            self.speed = 0.0;
        }
    }

    fn reverse(&mut self, dt: f64, brake_force: f64) {
        let spec = self.class.spec();
        if self.speed > 0.0 {
            self.brake(dt, brake_force);
        } else if self.speed > -spec.max_speed {
            self.speed -= spec.accel * dt * 10.0;
        }
        if self.speed < -spec.max_speed {
            self.speed = -spec.max_speed;
        }
    }

    /// Rotate toward the turn target by at most this tick's budget. The
    /// budget scales with speed, so a stationary agent doesn't turn. Once
    /// the remainder fits in one tick, snap to the target instead of
    /// oscillating around it.
    pub(crate) fn update_turning(&mut self, dt: f64) {
        if !self.turn.active {
            return;
        }
        let spec = self.class.spec();
        let diff = self
            .pose
            .heading
            .shortest_rotation_towards(self.turn.target);
        let budget = self.turn.rate_degs * dt * (self.speed / spec.max_speed);

        if diff > 0.0 {
            let step = budget.min(diff);
            self.pose.heading = self.pose.heading.rotate_degs(step);
        } else {
            let step = budget.min(-diff);
            self.pose.heading = self.pose.heading.rotate_degs(-step);
        }
        self.pose.heading = self.pose.heading.normalize();

        if diff.abs() <= budget {
            self.pose.heading = self.turn.target.normalize();
            self.turn.active = false;
        }
    }

    pub(crate) fn integrate_position(&mut self, dt: f64) {
        self.pose.center = self
            .pose
            .center
            .project_away(self.speed * dt, self.pose.heading);
    }
}
