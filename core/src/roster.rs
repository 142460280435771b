//! Built-in hostile and defender kinds with their combat statistics.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{AttackEffect, CombatProfile, TileKind};

/// Hostile kinds that may appear in a spawn queue.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HostileKind {
    /// Fast, passive runner.
    Boar,
    /// Slow brute that smashes defenders in its way.
    Ogre,
}

impl HostileKind {
    /// Every hostile kind in declaration order.
    pub const ALL: [HostileKind; 2] = [Self::Boar, Self::Ogre];

    /// Built-in template for this kind.
    #[must_use]
    pub const fn template(self) -> HostileTemplate {
        match self {
            Self::Boar => HostileTemplate {
                kind: self,
                profile: CombatProfile::builtin(100, 0, Duration::ZERO, 0.0, true),
                speed_tiles_per_second: 1.5,
            },
            Self::Ogre => HostileTemplate {
                kind: self,
                profile: CombatProfile::builtin(300, 20, Duration::from_millis(1_000), 1.0, true),
                speed_tiles_per_second: 0.5,
            },
        }
    }

    /// Visual effect attached to attacks by this kind.
    #[must_use]
    pub const fn attack_effect(self) -> Option<AttackEffect> {
        match self {
            Self::Boar => None,
            Self::Ogre => Some(AttackEffect::Slam),
        }
    }
}

/// Blueprint a hostile is created from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HostileTemplate {
    kind: HostileKind,
    profile: CombatProfile,
    speed_tiles_per_second: f64,
}

impl HostileTemplate {
    /// Kind of hostile produced.
    #[must_use]
    pub const fn kind(&self) -> HostileKind {
        self.kind
    }

    /// Combat statistics of the hostile.
    #[must_use]
    pub const fn profile(&self) -> &CombatProfile {
        &self.profile
    }

    /// Travel speed in world units per second.
    #[must_use]
    pub fn speed_world(&self, tile_length: f64) -> f64 {
        self.speed_tiles_per_second * tile_length
    }
}

/// Defender kinds the player may place.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DefenderKind {
    /// Sturdy melee fighter that may also block roads.
    Knight,
    /// Fragile archer that hostiles cannot reach.
    Elf,
}

impl DefenderKind {
    /// Every defender kind in declaration order.
    pub const ALL: [DefenderKind; 2] = [Self::Knight, Self::Elf];

    /// Combat statistics for this kind.
    #[must_use]
    pub const fn profile(self) -> CombatProfile {
        match self {
            Self::Knight => {
                CombatProfile::builtin(100, 15, Duration::from_millis(500), 1.0, true)
            }
            Self::Elf => CombatProfile::builtin(1, 8, Duration::from_millis(700), 3.0, false),
        }
    }

    /// Visual effect attached to attacks by this kind.
    #[must_use]
    pub const fn attack_effect(self) -> AttackEffect {
        match self {
            Self::Knight => AttackEffect::MeleeStrike,
            Self::Elf => AttackEffect::RangedShot,
        }
    }

    /// Whether the kind may stand on a tile of the provided kind.
    #[must_use]
    pub const fn accepts(self, tile: TileKind) -> bool {
        match (self, tile) {
            (_, TileKind::Start | TileKind::Objective) => false,
            (Self::Knight, TileKind::Ground | TileKind::Road) => true,
            (Self::Elf, TileKind::Ground) => true,
            (Self::Elf, TileKind::Road) => false,
        }
    }
}
