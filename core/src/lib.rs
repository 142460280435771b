#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Road Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! happened. The immutable [`RoadGrid`], the [`Combatant`] status model and the
//! [`Entity`] capability trait live here so that systems can operate on them
//! without depending on the world crate.

use std::{fmt, time::Duration};

use glam::DVec2;
use serde::{Deserialize, Serialize};

mod combatant;
mod config;
mod error;
mod grid;
mod level;
mod roster;
mod status;

pub use combatant::{AttackAction, CombatProfile, Combatant, Entity, Health};
pub use config::{SimulationConfig, DEFAULT_FPS, DEFAULT_TILE_LENGTH};
pub use error::{ConfigError, InvariantViolation, SimulationError};
pub use grid::{RoadGrid, RoadRemap, Tile, TileKind};
pub use level::{
    BuffGrant, GridDescriptor, LevelDescriptor, LevelSettings, RemapDescriptor, RoadDescriptor,
    RoadRole, SpawnDescriptor,
};
pub use roster::{DefenderKind, HostileKind, HostileTemplate};
pub use status::{
    Buff, Element, StatusReport, CONTINUOUS_DAMAGE_PERIOD, MAX_PLAYER_BUFFS, PERMANENT_BUFF,
};

/// Tolerance applied when comparing continuous positions in world units.
pub const POSITION_TOLERANCE: f64 = 1e-7;

/// Reports whether two positions coincide within [`POSITION_TOLERANCE`].
#[must_use]
pub fn points_coincide(first: DVec2, second: DVec2) -> bool {
    (first.x - second.x).abs() <= POSITION_TOLERANCE
        && (first.y - second.y).abs() <= POSITION_TOLERANCE
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resumes ticking after a pause or on first start.
    Start,
    /// Suspends ticking between two ticks.
    Pause,
    /// Runs one field update covering the provided simulated duration.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests placement of a defender on the provided tile.
    PlaceDefender {
        /// Type of defender to construct.
        kind: DefenderKind,
        /// Tile the defender should occupy.
        tile: TileIndex,
    },
    /// Requests removal of the defender standing on the provided tile.
    RemoveDefender {
        /// Tile whose defender should be removed.
        tile: TileIndex,
    },
    /// Grants the buff to the defender on the tile, or revokes it when present.
    ToggleDefenderBuff {
        /// Tile whose defender is targeted.
        tile: TileIndex,
        /// Buff to toggle.
        buff: Buff,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that ticking resumed.
    SimulationStarted,
    /// Confirms that ticking was suspended.
    SimulationPaused,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Simulation clock after the tick.
        clock: Duration,
    },
    /// Confirms that a queued hostile entered the field.
    HostileSpawned {
        /// Identifier assigned to the hostile.
        hostile: HostileId,
        /// Kind of hostile that spawned.
        kind: HostileKind,
        /// Start tile the hostile appeared on.
        tile: TileIndex,
    },
    /// Reports a resolved attack between two entities.
    AttackLanded {
        /// Entity that performed the attack.
        attacker: EntityId,
        /// Entity that received the attack.
        target: EntityId,
        /// Health actually removed from the target.
        damage: u32,
        /// Element carried by the attack, if any.
        element: Option<Element>,
        /// Visual effect a renderer may play for the attack.
        effect: Option<AttackEffect>,
    },
    /// Reports health lost to an active corrosion buff.
    CorrosionApplied {
        /// Entity that lost health.
        entity: EntityId,
        /// Health removed during the tick.
        damage: u32,
    },
    /// Reports health lost to continuous elemental damage.
    ContinuousDamageApplied {
        /// Entity that lost health.
        entity: EntityId,
        /// Health removed during the tick.
        damage: u32,
    },
    /// Reports that a buff ran out on an entity.
    BuffExpired {
        /// Entity that carried the buff.
        entity: EntityId,
        /// Buff that expired.
        buff: Buff,
    },
    /// Reports that an entity died and was removed from the field.
    EntityDied {
        /// Entity that died.
        entity: EntityId,
    },
    /// Reports that a hostile reached a protected objective.
    ObjectiveReached {
        /// Hostile that arrived.
        hostile: HostileId,
        /// Objective tile the hostile arrived on.
        tile: TileIndex,
        /// Life points remaining after the arrival.
        life_points: u32,
    },
    /// Confirms that a defender was placed.
    DefenderPlaced {
        /// Identifier assigned to the defender.
        defender: DefenderId,
        /// Kind of defender placed.
        kind: DefenderKind,
        /// Tile the defender occupies.
        tile: TileIndex,
    },
    /// Confirms that a defender was removed by the player.
    DefenderRemoved {
        /// Identifier of the removed defender.
        defender: DefenderId,
        /// Tile the defender occupied.
        tile: TileIndex,
    },
    /// Reports that a placement request was ignored.
    DefenderPlacementRejected {
        /// Kind of defender requested.
        kind: DefenderKind,
        /// Tile requested for placement.
        tile: TileIndex,
        /// Specific reason the placement was ignored.
        reason: PlacementError,
    },
    /// Confirms that a player buff was granted or revoked.
    DefenderBuffToggled {
        /// Defender whose buffs changed.
        defender: DefenderId,
        /// Buff that was toggled.
        buff: Buff,
        /// Whether the buff is active after the toggle.
        active: bool,
    },
    /// Reports that a player buff could not be granted.
    DefenderBuffRejected {
        /// Defender targeted by the request.
        defender: DefenderId,
        /// Buff requested.
        buff: Buff,
        /// Specific reason the request was ignored.
        reason: BuffToggleError,
    },
    /// Announces the terminal outcome of the level.
    GameEnded {
        /// Outcome the host must present.
        outcome: Outcome,
    },
}

/// Terminal outcome of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Every hostile was dealt with while life points remained.
    Win,
    /// Life points were exhausted.
    Lose,
}

/// Visual effect descriptors emitted with attacks for external renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackEffect {
    /// Short-range thrust drawn between attacker and target.
    MeleeStrike,
    /// Projectile travelling from attacker to target.
    RangedShot,
    /// Heavy ground impact around the target.
    Slam,
}

/// Reasons a defender placement request may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested tile lies outside the grid.
    OutOfBounds,
    /// Another defender already occupies the tile.
    Occupied,
    /// The defender kind cannot stand on the tile's kind.
    IncompatibleTile,
    /// The level does not offer the requested defender kind.
    NotInRoster,
    /// The level already ended.
    GameOver,
}

/// Reasons a player buff request may be ignored by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuffToggleError {
    /// The defender already carries the maximum number of player buffs.
    TooManyBuffs,
    /// The defender already carries a different elemental infusion.
    ConflictingInfusion,
    /// Only beneficial buffs may be granted by the player.
    HarmfulBuff,
}

/// Compass directions available to hostiles travelling the road network.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Inbound directions probed, in order, to derive a freshly spawned heading.
    pub const SPAWN_PROBE_ORDER: [Direction; 4] =
        [Self::West, Self::South, Self::East, Self::North];

    /// Column offset of a single step in this direction.
    #[must_use]
    pub const fn column_delta(self) -> i32 {
        match self {
            Self::East => 1,
            Self::West => -1,
            Self::North | Self::South => 0,
        }
    }

    /// Row offset of a single step in this direction.
    #[must_use]
    pub const fn row_delta(self) -> i32 {
        match self {
            Self::South => 1,
            Self::North => -1,
            Self::East | Self::West => 0,
        }
    }

    /// Unit vector in world space, with rows growing downwards.
    #[must_use]
    pub fn unit(self) -> DVec2 {
        DVec2::new(f64::from(self.column_delta()), f64::from(self.row_delta()))
    }

    /// Reports whether travel decreases a coordinate.
    #[must_use]
    pub const fn is_negative_axis(self) -> bool {
        matches!(self, Self::North | Self::West)
    }

    pub(crate) const fn slot(self) -> usize {
        match self {
            Self::North => 0,
            Self::East => 1,
            Self::South => 2,
            Self::West => 3,
        }
    }
}

/// Location of a single grid tile expressed as column and row indices.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileIndex {
    column: u32,
    row: u32,
}

impl TileIndex {
    /// Creates a new tile index.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(row {}, column {})", self.row, self.column)
    }
}

/// Unique identifier assigned to a hostile.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct HostileId(u32);

impl HostileId {
    /// Creates a new hostile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a defender.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DefenderId(u32);

impl DefenderId {
    /// Creates a new defender identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Identifier of any entity on the field.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EntityId {
    /// A mobile hostile.
    Hostile(HostileId),
    /// A stationary defender.
    Defender(DefenderId),
}
