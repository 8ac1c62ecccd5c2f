//! Finger God - headless scenario runner
//!
//! Loads a scenario (or generates a seeded skirmish), runs it for a number of
//! ticks and prints every event as a JSON line or as text.

use std::path::PathBuf;

use clap::Parser;
use finger_god::core::error::Result;
use finger_god::events::SimEvent;
use finger_god::scenario::Scenario;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "finger-god")]
#[command(about = "Run a unit group scenario and print its events")]
struct Args {
    /// Scenario file; a random skirmish is generated when absent
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Seed for the generated skirmish
    #[arg(long)]
    seed: Option<u64>,

    /// Groups per side in the generated skirmish
    #[arg(long, default_value_t = 3)]
    groups: usize,

    /// Override the scenario's tick count
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario's tick length in seconds
    #[arg(long)]
    dt: Option<f32>,

    /// Output format: json or text
    #[arg(long, default_value = "json")]
    format: String,
}

/// Final line of JSON output
#[derive(Serialize)]
struct Summary {
    scenario: String,
    ticks: u64,
    events: usize,
    surviving_groups: usize,
    active_battles: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("finger_god=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let scenario = match &args.scenario {
        Some(path) => Scenario::load(path)?,
        None => {
            let seed = args.seed.unwrap_or_else(rand::random);
            tracing::info!(seed, "generating skirmish");
            Scenario::random_skirmish(seed, 16, 10, args.groups)
        }
    };
    let ticks = args.ticks.unwrap_or(scenario.ticks);
    let dt = args.dt.unwrap_or(scenario.dt);

    let (mut sim, _) = scenario.build()?;
    let mut total = 0;
    for _ in 0..ticks {
        for event in sim.tick(dt)? {
            print_event(&event, &args.format, sim.current_tick())?;
            total += 1;
        }
    }

    let summary = Summary {
        scenario: scenario.name.clone(),
        ticks,
        events: total,
        surviving_groups: sim.groups().len(),
        active_battles: sim.battles().active_count(),
    };
    if args.format == "json" {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        println!(
            "{}: {} events over {} ticks, {} groups left, {} battles ongoing",
            summary.scenario,
            summary.events,
            summary.ticks,
            summary.surviving_groups,
            summary.active_battles
        );
    }
    Ok(())
}

fn print_event(event: &SimEvent, format: &str, tick: u64) -> Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string(event)?);
    } else {
        println!("[{tick:>5}] {event}");
    }
    Ok(())
}
