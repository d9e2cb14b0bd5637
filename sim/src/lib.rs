//! A single-threaded, tick-based vehicle simulation around one intersection.
//! Each tick, every agent's oriented bounding rectangle and forward sensor
//! rectangle are tested against a pre-tick snapshot of everybody else, and
//! the results gate acceleration, braking, reversal, and turning. Collisions
//! only gate speed; there's no impulse or momentum response.

mod agent;
mod events;
mod generator;
mod kinematics;
mod sim;
mod spawn;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::agent::{Agent, Pose, TurnIntent};
pub use crate::events::Event;
pub use crate::generator::ScenarioGenerator;
pub use crate::kinematics::{VehicleClass, VehicleSpec};
pub use crate::sim::{AgentSummary, SimOptions, Simulation, TickSummary};
pub use crate::spawn::{EntryDirection, SpawnRequest, TurnPlan};

#[derive(
    Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
pub struct AgentID(pub usize);

impl fmt::Display for AgentID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Agent #{}", self.0)
    }
}
