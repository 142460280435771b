#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Recharge-gated attack resolution between entities.

use glam::DVec2;
use road_defence_core::{AttackAction, Buff, Entity, EntityId, POSITION_TOLERANCE};

/// Whether `target` lies within `range_tiles` of `origin` in world units.
#[must_use]
pub fn within_range(origin: DVec2, target: DVec2, range_tiles: f64, tile_length: f64) -> bool {
    origin.distance(target) <= range_tiles * tile_length + POSITION_TOLERANCE
}

/// Attacks the nearest targetable candidate if the attacker is ready.
///
/// Candidates that are dead, immune or out of range are skipped; equally
/// distant candidates are ordered by entity id. On success the attacker's
/// recharge counter restarts, [`Entity::attack`] runs on the attacker and
/// [`Entity::attacked`] on the target, and the resolved action is returned.
pub fn try_attack<'a, A, T, I>(
    attacker: &mut A,
    candidates: I,
    tile_length: f64,
) -> Option<AttackAction>
where
    A: Entity + ?Sized,
    T: Entity + 'a,
    I: IntoIterator<Item = &'a mut T>,
{
    let combatant = attacker.combatant();
    if !combatant.is_alive() || !combatant.profile().can_attack() || !combatant.ready_to_attack()
    {
        return None;
    }

    let origin = attacker.position();
    let range = combatant.profile().attack_range();

    let mut best: Option<(Ranked, &'a mut T)> = None;
    for candidate in candidates {
        if !candidate.combatant().is_targetable() {
            continue;
        }

        let position = candidate.position();
        if !within_range(origin, position, range, tile_length) {
            continue;
        }

        let ranked = Ranked {
            distance: origin.distance(position),
            id: candidate.id(),
        };
        let replace = best
            .as_ref()
            .map_or(true, |(existing, _)| ranked.precedes(existing));
        if replace {
            best = Some((ranked, candidate));
        }
    }

    let (ranked, target) = best?;

    let combatant = attacker.combatant_mut();
    combatant.reset_recharge();
    let damage = combatant.profile().damage();
    let element = combatant.element_infusion_buff().and_then(Buff::infusion);

    let mut action = AttackAction::new(attacker.id(), ranked.id, damage, element);
    attacker.attack(&mut action);
    target.attacked(&mut action);
    Some(action)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Ranked {
    distance: f64,
    id: EntityId,
}

impl Ranked {
    fn precedes(&self, other: &Self) -> bool {
        if (self.distance - other.distance).abs() > POSITION_TOLERANCE {
            return self.distance < other.distance;
        }

        self.id < other.id
    }
}
