//! Error taxonomy surfaced to the host application.

use thiserror::Error;

use crate::{DefenderKind, HostileId, TileIndex};

/// Problems detected while loading a level or constructing the world.
///
/// These are fatal at load time: a world is never built from data that fails
/// validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Tile length must be positive and finite.
    #[error("tile length must be positive and finite, got {0}")]
    InvalidTileLength(f64),
    /// Tick interval must cover at least one millisecond.
    #[error("tick interval must be at least one millisecond")]
    InvalidTickInterval,
    /// Refresh rate must be positive and finite.
    #[error("frames per second must be positive and finite, got {0}")]
    InvalidFps(f64),
    /// The grid has no tiles.
    #[error("grid dimensions {rows}x{columns} contain no tiles")]
    EmptyGrid {
        /// Requested number of rows.
        rows: u32,
        /// Requested number of columns.
        columns: u32,
    },
    /// A road tile lies outside the grid.
    #[error("road tile {tile} lies outside the grid")]
    RoadOutOfBounds {
        /// Offending tile.
        tile: TileIndex,
    },
    /// A road tile was described twice.
    #[error("road tile {tile} is described more than once")]
    DuplicateRoad {
        /// Offending tile.
        tile: TileIndex,
    },
    /// Hostiles are queued but no start tile exists.
    #[error("level queues hostiles but has no start tile")]
    MissingStartTile,
    /// Hostiles are queued but no objective tile exists.
    #[error("level queues hostiles but has no objective tile")]
    MissingObjectiveTile,
    /// Initial life points must be positive.
    #[error("initial life points must be positive")]
    InvalidLifePoints,
    /// Spawn arrivals must be non-decreasing.
    #[error("spawn entry {index} arrives at {arrival_ms}ms, before the previous entry at {previous_ms}ms")]
    UnsortedSpawnQueue {
        /// Position of the offending entry.
        index: usize,
        /// Arrival time of the offending entry.
        arrival_ms: u64,
        /// Arrival time of the preceding entry.
        previous_ms: u64,
    },
    /// A combat profile violates its construction rules.
    #[error("invalid combat profile: {0}")]
    InvalidProfile(&'static str),
    /// The roster names the same defender kind twice.
    #[error("roster lists {0:?} more than once")]
    DuplicateRosterEntry(DefenderKind),
}

/// Inconsistent game state that indicates a logic or data bug.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvariantViolation {
    /// A hostile stopped moving somewhere other than an objective tile.
    #[error("hostile {hostile:?} stopped at {tile:?} without reaching a protected objective")]
    StoppedOffObjective {
        /// Hostile that stopped.
        hostile: HostileId,
        /// Tile the hostile stopped on, if it is inside the grid.
        tile: Option<TileIndex>,
    },
    /// A hostile moved onto ground or off the grid.
    #[error("hostile {hostile:?} left the road network at ({x}, {y})")]
    HostileLeftRoad {
        /// Hostile that left the road.
        hostile: HostileId,
        /// Horizontal world coordinate of the offending position.
        x: f64,
        /// Vertical world coordinate of the offending position.
        y: f64,
    },
    /// A defender operation targeted a tile without a defender.
    #[error("tile {tile} has no defender")]
    MissingDefender {
        /// Tile named by the request.
        tile: TileIndex,
    },
}

/// Errors returned by the world's `apply` entry point.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// The command exposed inconsistent state; the world halted.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
    /// The world halted after an earlier invariant violation.
    #[error("simulation halted after an invariant violation")]
    Halted,
}
