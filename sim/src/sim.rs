use std::collections::{BTreeMap, VecDeque};

use anyhow::{bail, Result};
use geom::{Bounds, OrientedRect};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::spawn::{self, SpawnRequest};
use crate::{
    Agent, AgentID, EntryDirection, Event, Pose, TurnIntent, TurnPlan, VehicleClass,
};

/// Options controlling the simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimOptions {
    /// Agents that cleanly drive out of these bounds get pruned.
    pub bounds: Bounds,
    /// How far ahead of each agent the sensor rectangle reaches. A
    /// non-positive length disables sensing entirely.
    pub sensor_length: f64,
    /// How far outward the sensor's leading corners fan, in degrees.
    pub sensor_fov_degs: f64,
    /// Multiplier on deceleration while braking in response to a sensor hit.
    pub brake_force: f64,
}

impl Default for SimOptions {
    fn default() -> SimOptions {
        SimOptions {
            bounds: Bounds {
                min_x: 0.0,
                min_y: 0.0,
                max_x: 1280.0,
                max_y: 720.0,
            },
            // Measured from the trailing edge, so this has to exceed the
            // longest vehicle to look past its own nose.
            sensor_length: 120.0,
            sensor_fov_degs: 10.0,
            brake_force: 10.0,
        }
    }
}

/// The Simulation exclusively owns every agent and advances them all in
/// lockstep, synchronous ticks. There's no module-level shared state; drop
/// the Simulation and the whole world goes with it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Simulation {
    opts: SimOptions,
    agents: BTreeMap<AgentID, Agent>,
    spawn_queue: VecDeque<SpawnRequest>,
    id_counter: usize,
    time: f64,
    step_count: usize,
}

/// What one agent looked like at the end of a tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentSummary {
    pub id: AgentID,
    pub pose: Pose,
    pub speed: f64,
    pub class: VehicleClass,
    pub collided: bool,
}

/// Everything a collaborator needs to render or audit one tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TickSummary {
    pub time: f64,
    pub agents: Vec<AgentSummary>,
    pub events: Vec<Event>,
}

impl Simulation {
    pub fn new(opts: SimOptions) -> Simulation {
        Simulation {
            opts,
            agents: BTreeMap::new(),
            spawn_queue: VecDeque::new(),
            id_counter: 0,
            time: 0.0,
            step_count: 0,
        }
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn get_agent(&self, id: AgentID) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Try to add an agent right now. Fails when the spawn pose overlaps a
    /// live agent; retrying after a backoff is the caller's job.
    pub fn spawn(&mut self, req: SpawnRequest) -> Result<AgentID> {
        let center = spawn::spawn_center(req.entry, req.lane, &self.opts.bounds)?;
        let agent = Agent {
            id: AgentID(self.id_counter),
            class: req.class,
            pose: Pose {
                center,
                heading: req.entry.heading(),
            },
            speed: 0.0,
            turn: TurnIntent::none(),
            lane: req.lane,
            entry: req.entry,
            plan: req.plan,
        };
        let rect = agent.rect();
        for other in self.agents.values() {
            if rect.intersects(&other.rect()) {
                bail!(
                    "spawn of a {} heading {:?} blocked by {}",
                    req.class,
                    req.entry,
                    other.id
                );
            }
        }
        let id = agent.id;
        self.id_counter += 1;
        self.agents.insert(id, agent);
        Ok(id)
    }

    /// Queue a request to be tried at the start of the next tick.
    pub fn queue_spawn(&mut self, req: SpawnRequest) {
        self.spawn_queue.push_back(req);
    }

    /// The demo roster: one car per approach, each with a turn plan.
    pub fn seed_initial_roster(&mut self) {
        for (entry, plan) in [
            (EntryDirection::Right, TurnPlan::Right),
            (EntryDirection::Left, TurnPlan::Left),
            (EntryDirection::Up, TurnPlan::Right),
            (EntryDirection::Down, TurnPlan::Right),
        ] {
            let req = SpawnRequest {
                class: VehicleClass::Car,
                entry,
                lane: 1,
                plan,
            };
            if let Err(err) = self.spawn(req) {
                warn!("initial roster: {}", err);
            }
        }
    }

    /// Advance the whole world by `dt` seconds. All collision tests read a
    /// snapshot of pre-tick rectangles, so the outcome doesn't depend on
    /// agent iteration order.
    pub fn tick(&mut self, dt: f64) -> TickSummary {
        let mut events = Vec::new();

        // New arrivals first, so they take part in this tick's sensing.
        while let Some(req) = self.spawn_queue.pop_front() {
            match self.spawn(req) {
                Ok(id) => {
                    debug!("{} spawned", id);
                    events.push(Event::AgentSpawned(id));
                }
                Err(err) => {
                    warn!("spawn rejected: {}", err);
                    events.push(Event::SpawnRejected(req));
                }
            }
        }

        let snapshot: Vec<(AgentID, OrientedRect, Option<OrientedRect>)> = self
            .agents
            .values()
            .map(|a| {
                (
                    a.id,
                    a.rect(),
                    a.sensor(self.opts.sensor_length, self.opts.sensor_fov_degs),
                )
            })
            .collect();

        let mut summaries = Vec::new();
        for (agent, (id, own_rect, own_sensor)) in self.agents.values_mut().zip(&snapshot) {
            debug_assert_eq!(agent.id, *id);

            let mut rect_collision = false;
            let mut projection_collision = false;
            for (other_id, other_rect, _) in &snapshot {
                if *other_id == agent.id {
                    continue;
                }
                if own_rect.intersects(other_rect) {
                    rect_collision = true;
                    if agent.id < *other_id {
                        events.push(Event::Collision(agent.id, *other_id));
                    }
                }
                if let Some(sensor) = own_sensor {
                    if sensor.intersects(other_rect) {
                        projection_collision = true;
                    }
                }
            }

            // Crossing the trigger line consumes the one-shot turn plan.
            if !agent.turn.active && agent.plan != TurnPlan::Straight {
                let trigger = spawn::turn_trigger(agent.entry);
                if own_rect.intersects(&trigger) {
                    match agent.plan {
                        TurnPlan::Left => agent.set_turn(90.0, 50.0),
                        TurnPlan::Right => agent.set_turn(-90.0, 32.0),
                        TurnPlan::Straight => {}
                    }
                    debug!("{} begins its {:?} turn", agent.id, agent.plan);
                    agent.plan = TurnPlan::Straight;
                }
            }

            agent.update_speed(dt, rect_collision, projection_collision, self.opts.brake_force);
            agent.update_turning(dt);
            agent.integrate_position(dt);

            summaries.push(AgentSummary {
                id: agent.id,
                pose: agent.pose,
                speed: agent.speed,
                class: agent.class,
                collided: rect_collision,
            });
        }

        // Prune clean exits: out of bounds at full speed means the agent
        // drove off the edge, rather than stalling or reversing over it.
        let bounds = self.opts.bounds.clone();
        self.agents.retain(|id, agent| {
            let keep = bounds.contains(agent.pose.center)
                || agent.speed != agent.class.spec().max_speed;
            if !keep {
                info!("{} left the world", id);
                events.push(Event::AgentRemoved(*id));
            }
            keep
        });

        self.time += dt;
        self.step_count += 1;

        TickSummary {
            time: self.time,
            agents: summaries,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use geom::{Angle, Pt2D};

    use super::*;

    const DT: f64 = 1.0 / 60.0;

    fn place(sim: &mut Simulation, class: VehicleClass, x: f64, y: f64, heading: f64) -> AgentID {
        let id = AgentID(sim.id_counter);
        sim.id_counter += 1;
        sim.agents.insert(
            id,
            Agent {
                id,
                class,
                pose: Pose {
                    center: Pt2D::new(x, y),
                    heading: Angle::degrees(heading),
                },
                speed: 0.0,
                turn: TurnIntent::none(),
                lane: 1,
                entry: EntryDirection::Right,
                plan: TurnPlan::Straight,
            },
        );
        id
    }

    fn request(entry: EntryDirection) -> SpawnRequest {
        SpawnRequest {
            class: VehicleClass::Car,
            entry,
            lane: 1,
            plan: TurnPlan::Straight,
        }
    }

    #[test]
    fn overlapping_spawn_is_rejected() {
        let mut sim = Simulation::new(SimOptions::default());
        sim.spawn(request(EntryDirection::Right)).unwrap();
        assert!(sim.spawn(request(EntryDirection::Right)).is_err());
        assert_eq!(sim.num_agents(), 1);

        // A different approach doesn't conflict.
        sim.spawn(request(EntryDirection::Left)).unwrap();
        assert_eq!(sim.num_agents(), 2);
    }

    #[test]
    fn queued_spawn_rejection_becomes_an_event() {
        let mut sim = Simulation::new(SimOptions::default());
        sim.queue_spawn(request(EntryDirection::Right));
        sim.queue_spawn(request(EntryDirection::Right));
        let summary = sim.tick(DT);

        assert_eq!(sim.num_agents(), 1);
        assert!(summary
            .events
            .iter()
            .any(|ev| matches!(ev, Event::AgentSpawned(_))));
        assert!(summary
            .events
            .iter()
            .any(|ev| matches!(ev, Event::SpawnRejected(_))));
    }

    #[test]
    fn lone_agent_reaches_max_speed_and_stays_there() {
        let mut sim = Simulation::new(SimOptions::default());
        // Far from all the world's edges and triggers, heading up.
        let id = place(&mut sim, VehicleClass::Bike, 200.0, 600.0, 90.0);
        let max = VehicleClass::Bike.spec().max_speed;

        let mut last = 0.0;
        for _ in 0..120 {
            sim.tick(DT);
            let speed = sim.get_agent(id).map(|a| a.speed).unwrap_or(max);
            assert!(speed >= last);
            assert!(speed <= max);
            last = speed;
        }
    }

    #[test]
    fn overlapping_agents_hard_stop_and_report_once() {
        let mut sim = Simulation::new(SimOptions::default());
        let a = place(&mut sim, VehicleClass::Car, 200.0, 200.0, 0.0);
        let b = place(&mut sim, VehicleClass::Car, 210.0, 200.0, 0.0);
        sim.agents.get_mut(&a).unwrap().speed = 50.0;
        sim.agents.get_mut(&b).unwrap().speed = -20.0;

        let summary = sim.tick(DT);

        assert_eq!(sim.get_agent(a).unwrap().speed, 0.0);
        assert_eq!(sim.get_agent(b).unwrap().speed, 0.0);
        let collisions: Vec<&Event> = summary
            .events
            .iter()
            .filter(|ev| matches!(ev, Event::Collision(_, _)))
            .collect();
        assert_eq!(collisions, vec![&Event::Collision(a, b)]);
        assert!(summary.agents.iter().all(|s| s.collided));
    }

    #[test]
    fn sensor_slows_a_follower_before_contact() {
        let mut sim = Simulation::new(SimOptions::default());
        let follower = place(&mut sim, VehicleClass::Car, 200.0, 200.0, 0.0);
        // Stopped leader a bit past the follower's nose, inside sensor range
        // but outside physical contact.
        let blocker = place(&mut sim, VehicleClass::Car, 290.0, 200.0, 0.0);
        sim.agents.get_mut(&follower).unwrap().speed = 30.0;

        let summary = sim.tick(DT);

        let agent = sim.get_agent(follower).unwrap();
        assert!(agent.speed < 30.0);
        assert!(agent.speed >= 0.0);
        // No physical contact happened.
        assert!(!summary
            .events
            .iter()
            .any(|ev| matches!(ev, Event::Collision(_, _))));
        // The blocker's own sensor looks away from the follower, so it
        // accelerates freely.
        assert!(sim.get_agent(blocker).unwrap().speed > 0.0);
    }

    #[test]
    fn clean_exit_is_pruned_stall_is_not() {
        let mut sim = Simulation::new(SimOptions::default());
        let max = VehicleClass::Car.spec().max_speed;

        let gone = place(&mut sim, VehicleClass::Car, 2000.0, 200.0, 0.0);
        sim.agents.get_mut(&gone).unwrap().speed = max;
        // Also out of bounds, but not at full speed: maybe still recovering
        // from a reverse, so keep it.
        let stalled = place(&mut sim, VehicleClass::Car, 2000.0, 400.0, 0.0);
        sim.agents.get_mut(&stalled).unwrap().speed = max / 2.0;

        let summary = sim.tick(DT);

        assert!(sim.get_agent(gone).is_none());
        assert!(sim.get_agent(stalled).is_some());
        assert!(summary.events.contains(&Event::AgentRemoved(gone)));
    }

    #[test]
    fn turn_plan_fires_once_at_the_trigger() {
        let mut sim = Simulation::new(SimOptions::default());
        // On top of the right-bound trigger line, moving at speed.
        let id = place(&mut sim, VehicleClass::Car, 560.0, 325.0, 0.0);
        {
            let agent = sim.agents.get_mut(&id).unwrap();
            agent.speed = VehicleClass::Car.spec().max_speed;
            agent.plan = TurnPlan::Right;
        }

        sim.tick(DT);

        let agent = sim.get_agent(id).unwrap();
        assert!(agent.turn.active);
        assert_eq!(
            agent.turn.target.normalized_degrees(),
            270.0
        );
        // The plan is consumed, so finishing the turn on the trigger can't
        // re-arm it.
        assert_eq!(agent.plan, TurnPlan::Straight);
    }

    #[test]
    fn tick_results_are_reproducible() {
        let run = || {
            let mut sim = Simulation::new(SimOptions::default());
            sim.seed_initial_roster();
            let mut last = None;
            for _ in 0..300 {
                last = Some(sim.tick(DT));
            }
            last.unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a.agents, b.agents);
        assert_eq!(a.events, b.events);
    }
}
