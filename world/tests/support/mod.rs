#![allow(dead_code)]

use std::time::Duration;

use road_defence_core::{
    Command, Direction, Event, GridDescriptor, HostileKind, LevelDescriptor, LevelSettings,
    RemapDescriptor, RoadDescriptor, RoadRole, SimulationConfig, SpawnDescriptor,
};
use road_defence_world::{self as world, World};

pub const TILE: f64 = 10.0;

pub fn heading(direction: Direction) -> RemapDescriptor {
    let mut remap = RemapDescriptor::default();
    match direction {
        Direction::North => remap.north = Some(direction),
        Direction::East => remap.east = Some(direction),
        Direction::South => remap.south = Some(direction),
        Direction::West => remap.west = Some(direction),
    }
    remap
}

pub fn road(row: u32, column: u32, role: RoadRole, remap: RemapDescriptor) -> RoadDescriptor {
    RoadDescriptor {
        row,
        column,
        remap,
        role,
    }
}

/// Two-row level: an eastbound road along row 0 ending in an objective, ground on row 1.
pub fn corridor(length: u32, life_points: u32, spawns: Vec<SpawnDescriptor>) -> LevelDescriptor {
    let roads = (0..length)
        .map(|column| {
            let role = if column == 0 {
                RoadRole::Start
            } else if column + 1 == length {
                RoadRole::Objective
            } else {
                RoadRole::Normal
            };
            road(0, column, role, heading(Direction::East))
        })
        .collect();

    LevelDescriptor {
        roster: Vec::new(),
        grid: GridDescriptor {
            rows: 2,
            columns: length,
            roads,
        },
        spawns,
        settings: LevelSettings { life_points },
    }
}

pub fn spawn(hostile: HostileKind, arrival_ms: u64) -> SpawnDescriptor {
    SpawnDescriptor {
        hostile,
        arrival_ms,
        buffs: Vec::new(),
    }
}

pub fn build(level: &LevelDescriptor, tick_ms: u64) -> World {
    let config = SimulationConfig::new(TILE, Duration::from_millis(tick_ms)).expect("config");
    World::new(config, level, 7).expect("world")
}

pub fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, command, &mut events).expect("command succeeds");
    events
}

pub fn start(world: &mut World) {
    let events = run(world, Command::Start);
    assert_eq!(events, vec![Event::SimulationStarted]);
}

pub fn tick(world: &mut World, ms: u64) -> Vec<Event> {
    run(
        world,
        Command::Tick {
            dt: Duration::from_millis(ms),
        },
    )
}

pub fn ticks(world: &mut World, ms: u64, count: usize) -> Vec<Event> {
    (0..count).flat_map(|_| tick(world, ms)).collect()
}
