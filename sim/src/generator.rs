use rand::seq::SliceRandom;
use rand::Rng;
use rand_xorshift::XorShiftRng;
use serde::{Deserialize, Serialize};

use crate::{EntryDirection, SpawnRequest, TurnPlan, VehicleClass};

/// A way to generate random but reproducible spawn traffic. Feed it the same
/// seeded rng and it emits the same requests.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScenarioGenerator {
    /// Chance per tick of emitting one request.
    pub spawn_chance: f64,
    pub percent_buses: f64,
    pub percent_bikes: f64,
    /// Chance a spawned vehicle plans to turn at the junction.
    pub percent_turning: f64,
}

impl ScenarioGenerator {
    pub fn small_run() -> ScenarioGenerator {
        ScenarioGenerator {
            spawn_chance: 0.02,
            percent_buses: 0.1,
            percent_bikes: 0.2,
            percent_turning: 0.5,
        }
    }

    /// Maybe emit one spawn request this tick.
    pub fn next_request(&self, rng: &mut XorShiftRng) -> Option<SpawnRequest> {
        if !rng.gen_bool(self.spawn_chance) {
            return None;
        }
        let class = if rng.gen_bool(self.percent_buses) {
            VehicleClass::Bus
        } else if rng.gen_bool(self.percent_bikes) {
            VehicleClass::Bike
        } else {
            VehicleClass::Car
        };
        let entry = *[
            EntryDirection::Up,
            EntryDirection::Down,
            EntryDirection::Left,
            EntryDirection::Right,
        ]
        .choose(rng)
        .unwrap();
        let lane = *[1, 2, -1, -2].choose(rng).unwrap();
        let plan = if rng.gen_bool(self.percent_turning) {
            *[TurnPlan::Left, TurnPlan::Right].choose(rng).unwrap()
        } else {
            TurnPlan::Straight
        };
        Some(SpawnRequest {
            class,
            entry,
            lane,
            plan,
        })
    }
}
