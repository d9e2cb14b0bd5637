//! Runs the intersection simulation without any UI, for batch runs and
//! debugging. Given the same flags, a run is fully reproducible.

use anyhow::Result;
use log::info;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use structopt::StructOpt;

use sim::{Event, ScenarioGenerator, SimOptions, Simulation};

#[derive(StructOpt)]
#[structopt(name = "headless", about = "Simulates traffic without rendering it")]
struct Flags {
    /// How many ticks to run
    #[structopt(long, default_value = "600")]
    ticks: usize,
    /// Seconds of simulated time per tick
    #[structopt(long, default_value = "0.016666666666666666")]
    dt: f64,
    /// Seed for the spawn generator
    #[structopt(long, default_value = "42")]
    rng_seed: u64,
    /// Skip the fixed four-car starting roster
    #[structopt(long)]
    empty: bool,
    /// Print a JSON summary of every tick to STDOUT
    #[structopt(long)]
    json: bool,
}

fn main() -> Result<()> {
    let flags = Flags::from_args();
    setup_logger();

    let mut rng = XorShiftRng::seed_from_u64(flags.rng_seed);
    let generator = ScenarioGenerator::small_run();
    let mut sim = Simulation::new(SimOptions::default());
    if !flags.empty {
        sim.seed_initial_roster();
    }

    let mut total_events = 0;
    for _ in 0..flags.ticks {
        if let Some(req) = generator.next_request(&mut rng) {
            sim.queue_spawn(req);
        }
        let summary = sim.tick(flags.dt);
        for ev in &summary.events {
            if let Event::Collision(a, b) = ev {
                info!("{} and {} are in contact", a, b);
            }
        }
        total_events += summary.events.len();
        if flags.json {
            println!("{}", serde_json::to_string(&summary)?);
        }
    }

    info!(
        "done after {} ticks (t={:.1}s) with {} agents live, {} events",
        sim.step_count(),
        sim.time(),
        sim.num_agents(),
        total_events
    );
    Ok(())
}

/// Intercept messages from the `log` crate and print them, defaulting to
/// info level unless RUST_LOG says otherwise.
fn setup_logger() {
    use env_logger::{Builder, Env};
    Builder::from_env(Env::default().default_filter_or("info")).init();
}
