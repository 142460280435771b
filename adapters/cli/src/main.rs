#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Road Defence level headlessly.

mod level_file;
mod placement;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use road_defence_core::{Command, Event, SimulationConfig, DEFAULT_FPS, DEFAULT_TILE_LENGTH};
use road_defence_world::{self as world, query, World};

use crate::placement::Placement;

/// Runs a level from a TOML description until it ends or the tick limit is hit.
#[derive(Debug, Parser)]
#[command(name = "road-defence", version, about)]
struct CliArgs {
    /// Path to the level file.
    level: PathBuf,
    /// Simulated frames per second; each frame advances the field by one tick.
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: f64,
    /// Side length of a tile in world units.
    #[arg(long, default_value_t = DEFAULT_TILE_LENGTH)]
    tile_length: f64,
    /// Seed used to pick among several start tiles.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Stops the run after this many ticks even if the level has not ended.
    #[arg(long, default_value_t = 100_000)]
    max_ticks: u64,
    /// Defender placed before the level starts, as kind@column,row[+buff...].
    #[arg(long = "place", value_name = "PLACEMENT")]
    placements: Vec<Placement>,
    /// Prints every event reported by the world.
    #[arg(long)]
    events: bool,
}

/// Entry point for the Road Defence command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    let level = level_file::load(&args.level)?;
    let config = SimulationConfig::from_fps(args.tile_length, args.fps)
        .context("invalid simulation parameters")?;
    let mut world = World::new(config, &level, args.seed).context("level cannot be played")?;

    let mut session = Session {
        world: &mut world,
        print_events: args.events,
    };
    for placement in &args.placements {
        for command in placement.commands() {
            session.apply(command)?;
        }
    }
    session.apply(Command::Start)?;

    let mut ticks = 0;
    while query::outcome(session.world).is_none() && ticks < args.max_ticks {
        session.apply(Command::Tick {
            dt: config.tick_interval(),
        })?;
        ticks += 1;
    }

    report(&world, ticks);
    Ok(())
}

struct Session<'a> {
    world: &'a mut World,
    print_events: bool,
}

impl Session<'_> {
    fn apply(&mut self, command: Command) -> Result<()> {
        let mut events = Vec::new();
        let result = world::apply(self.world, command, &mut events);
        if self.print_events {
            for event in &events {
                print_event(query::clock(self.world), event);
            }
        }
        result.context("simulation halted")
    }
}

fn print_event(clock: std::time::Duration, event: &Event) {
    if !matches!(event, Event::TimeAdvanced { .. }) {
        println!("[{:>8}ms] {event:?}", clock.as_millis());
    }
}

fn report(world: &World, ticks: u64) {
    let outcome = query::outcome(world)
        .map_or_else(|| "undecided".to_owned(), |outcome| format!("{outcome:?}"));
    println!("outcome: {outcome}");
    println!("ticks: {ticks}");
    println!("clock: {}ms", query::clock(world).as_millis());
    println!("life points: {}", query::life_points(world));
    println!("remaining hostiles: {}", query::remaining_hostiles(world));
    if let Some(arrival) = query::next_arrival(world) {
        println!("next arrival: {}ms", arrival.as_millis());
    }
    println!("defenders standing: {}", query::defender_view(world).iter().count());
}
