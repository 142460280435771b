//! Serializable description of a level as authored on disk.

use std::{collections::BTreeSet, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Buff, ConfigError, DefenderKind, Direction, HostileKind, RoadRemap};

/// Complete level: battlefield, arrivals, settings and defender roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelDescriptor {
    /// Defender kinds the player may place; empty offers every kind.
    #[serde(default)]
    pub roster: Vec<DefenderKind>,
    /// Battlefield layout.
    pub grid: GridDescriptor,
    /// Hostile arrivals ordered by arrival time.
    #[serde(default)]
    pub spawns: Vec<SpawnDescriptor>,
    /// Level-wide settings.
    pub settings: LevelSettings,
}

impl LevelDescriptor {
    /// Checks the level-wide rules that do not depend on runtime parameters.
    ///
    /// Grid geometry is validated when the [`crate::RoadGrid`] is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.settings.life_points == 0 {
            return Err(ConfigError::InvalidLifePoints);
        }

        let mut previous_ms = 0;
        for (index, spawn) in self.spawns.iter().enumerate() {
            if spawn.arrival_ms < previous_ms {
                return Err(ConfigError::UnsortedSpawnQueue {
                    index,
                    arrival_ms: spawn.arrival_ms,
                    previous_ms,
                });
            }
            previous_ms = spawn.arrival_ms;
        }

        if !self.spawns.is_empty() {
            let has_role =
                |role: RoadRole| self.grid.roads.iter().any(|road| road.role == role);
            if !has_role(RoadRole::Start) {
                return Err(ConfigError::MissingStartTile);
            }
            if !has_role(RoadRole::Objective) {
                return Err(ConfigError::MissingObjectiveTile);
            }
        }

        let mut seen = BTreeSet::new();
        for kind in &self.roster {
            if !seen.insert(*kind) {
                return Err(ConfigError::DuplicateRosterEntry(*kind));
            }
        }

        Ok(())
    }

    /// Defender kinds available to the player, honouring the empty-means-all rule.
    #[must_use]
    pub fn offered_defenders(&self) -> Vec<DefenderKind> {
        if self.roster.is_empty() {
            DefenderKind::ALL.to_vec()
        } else {
            self.roster.clone()
        }
    }
}

/// Grid dimensions and the road tiles laid over the ground.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridDescriptor {
    /// Number of tile rows.
    pub rows: u32,
    /// Number of tile columns.
    pub columns: u32,
    /// Road tiles; every other tile is ground.
    #[serde(default)]
    pub roads: Vec<RoadDescriptor>,
}

/// Single road tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoadDescriptor {
    /// Row of the tile.
    pub row: u32,
    /// Column of the tile.
    pub column: u32,
    /// Outbound direction per inbound direction.
    #[serde(default)]
    pub remap: RemapDescriptor,
    /// Role the tile plays for hostiles.
    #[serde(default)]
    pub role: RoadRole,
}

/// Authored remap table keyed by the direction a hostile arrives travelling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemapDescriptor {
    /// Exit for hostiles travelling north.
    #[serde(default)]
    pub north: Option<Direction>,
    /// Exit for hostiles travelling east.
    #[serde(default)]
    pub east: Option<Direction>,
    /// Exit for hostiles travelling south.
    #[serde(default)]
    pub south: Option<Direction>,
    /// Exit for hostiles travelling west.
    #[serde(default)]
    pub west: Option<Direction>,
}

impl RemapDescriptor {
    /// Converts the authored table into the grid's lookup form.
    #[must_use]
    pub fn to_remap(&self) -> RoadRemap {
        [
            (Direction::North, self.north),
            (Direction::East, self.east),
            (Direction::South, self.south),
            (Direction::West, self.west),
        ]
        .into_iter()
        .fold(RoadRemap::empty(), |remap, (inbound, outbound)| {
            match outbound {
                Some(outbound) => remap.with(inbound, outbound),
                None => remap,
            }
        })
    }
}

/// Role of a road tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoadRole {
    /// Ordinary road.
    #[default]
    Normal,
    /// Hostiles spawn here.
    Start,
    /// Hostiles reaching this tile cost a life point.
    Objective,
}

/// One queued hostile arrival.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpawnDescriptor {
    /// Kind of hostile that arrives.
    pub hostile: HostileKind,
    /// Simulation time of the arrival in milliseconds.
    pub arrival_ms: u64,
    /// Buffs the hostile carries when it enters the field.
    #[serde(default)]
    pub buffs: Vec<BuffGrant>,
}

impl SpawnDescriptor {
    /// Arrival time as a duration.
    #[must_use]
    pub const fn arrival(&self) -> Duration {
        Duration::from_millis(self.arrival_ms)
    }
}

/// Buff granted together with its duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuffGrant {
    /// Buff to grant.
    pub buff: Buff,
    /// Duration of the grant in milliseconds.
    pub duration_ms: u64,
}

impl BuffGrant {
    /// Duration of the grant.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Level-wide settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelSettings {
    /// Life points the player starts with.
    pub life_points: u32,
}
