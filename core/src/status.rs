//! Timed buffs and elemental auras.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cadence at which continuous damage fires.
pub const CONTINUOUS_DAMAGE_PERIOD: Duration = Duration::from_millis(1_000);

/// Duration used for buffs granted by the player, which last until revoked.
pub const PERMANENT_BUFF: Duration = Duration::MAX;

/// Maximum number of player-granted buffs a defender may carry at once.
pub const MAX_PLAYER_BUFFS: usize = 2;

const CORROSION_PER_SECOND: u32 = 10;
const BURNING_PER_SECOND: u32 = 10;

/// Elements that may linger on an entity as an aura.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Fans continuous damage.
    Fire,
    /// Douses continuous damage.
    Water,
    /// Leaves continuous damage untouched.
    Ice,
}

impl Element {
    /// Applies the aura's modifier to a base continuous damage rate.
    #[must_use]
    pub const fn modify_continuous_rate(self, rate: u32) -> u32 {
        match self {
            Self::Fire => rate.saturating_mul(2),
            Self::Water => 0,
            Self::Ice => rate,
        }
    }
}

/// Timed status effects that may be applied to any entity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Buff {
    /// Loses health every tick while active.
    Corroded,
    /// Feeds the continuous damage rate.
    Burning,
    /// Attacks carry fire.
    FireInfusion,
    /// Attacks carry water.
    WaterInfusion,
    /// Attacks carry ice.
    IceInfusion,
}

impl Buff {
    /// Element carried by the bearer's attacks while this buff is active.
    #[must_use]
    pub const fn infusion(self) -> Option<Element> {
        match self {
            Self::FireInfusion => Some(Element::Fire),
            Self::WaterInfusion => Some(Element::Water),
            Self::IceInfusion => Some(Element::Ice),
            Self::Corroded | Self::Burning => None,
        }
    }

    /// Whether the player may grant this buff to a defender.
    #[must_use]
    pub const fn is_beneficial(self) -> bool {
        self.infusion().is_some()
    }

    /// Contribution to the bearer's continuous damage rate, per second.
    #[must_use]
    pub const fn continuous_damage_per_second(self) -> u32 {
        match self {
            Self::Burning => BURNING_PER_SECOND,
            _ => 0,
        }
    }

    /// Health lost per second of activity, applied every tick.
    #[must_use]
    pub const fn corrosion_per_second(self) -> u32 {
        match self {
            Self::Corroded => CORROSION_PER_SECOND,
            _ => 0,
        }
    }
}

/// Summary of one `update_status` pass on an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// Health removed by corrosion during the pass.
    pub corrosion: u32,
    /// Health removed by continuous damage during the pass.
    pub continuous: u32,
    /// Number of times continuous damage fired during the pass.
    pub continuous_hits: u32,
    /// Buffs that expired during the pass, in buff order.
    pub expired: Vec<Buff>,
}
