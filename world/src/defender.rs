use glam::DVec2;
use road_defence_core::{
    AttackAction, Buff, BuffToggleError, Combatant, DefenderId, DefenderKind, Entity, EntityId,
    TileIndex, MAX_PLAYER_BUFFS, PERMANENT_BUFF,
};

/// Stationary defender bound to a single tile.
#[derive(Clone, Debug)]
pub(crate) struct Defender {
    id: DefenderId,
    kind: DefenderKind,
    tile: TileIndex,
    position: DVec2,
    combatant: Combatant,
}

impl Defender {
    pub(crate) fn new(id: DefenderId, kind: DefenderKind, tile: TileIndex, position: DVec2) -> Self {
        Self {
            id,
            kind,
            tile,
            position,
            combatant: Combatant::new(kind.profile()),
        }
    }

    pub(crate) const fn defender_id(&self) -> DefenderId {
        self.id
    }

    pub(crate) const fn kind(&self) -> DefenderKind {
        self.kind
    }

    pub(crate) const fn tile(&self) -> TileIndex {
        self.tile
    }

    /// Revokes `buff` when active, otherwise grants it until revoked.
    ///
    /// Returns whether the buff is active afterwards. Harmful buffs are never
    /// toggled by the player.
    pub(crate) fn toggle_buff(&mut self, buff: Buff) -> Result<bool, BuffToggleError> {
        if !buff.is_beneficial() {
            return Err(BuffToggleError::HarmfulBuff);
        }
        if self.combatant.has_buff(buff) {
            self.combatant.remove_buff(buff);
            return Ok(false);
        }

        if self.combatant.buffs().count() >= MAX_PLAYER_BUFFS {
            return Err(BuffToggleError::TooManyBuffs);
        }
        if buff.infusion().is_some() && self.combatant.element_infusion_buff().is_some() {
            return Err(BuffToggleError::ConflictingInfusion);
        }

        self.combatant.add_buff(buff, PERMANENT_BUFF);
        Ok(true)
    }
}

impl Entity for Defender {
    fn id(&self) -> EntityId {
        EntityId::Defender(self.id)
    }

    fn position(&self) -> DVec2 {
        self.position
    }

    fn combatant(&self) -> &Combatant {
        &self.combatant
    }

    fn combatant_mut(&mut self) -> &mut Combatant {
        &mut self.combatant
    }

    fn attack(&mut self, action: &mut AttackAction) {
        action.set_effect(self.kind.attack_effect());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn knight() -> Defender {
        Defender::new(
            DefenderId::new(0),
            DefenderKind::Knight,
            TileIndex::new(0, 0),
            DVec2::ZERO,
        )
    }

    #[test]
    fn toggling_twice_restores_the_buff_set() {
        let mut defender = knight();
        assert_eq!(defender.toggle_buff(Buff::FireInfusion), Ok(true));
        assert!(defender.combatant().has_buff(Buff::FireInfusion));
        assert_eq!(defender.toggle_buff(Buff::FireInfusion), Ok(false));
        assert_eq!(defender.combatant().buffs().count(), 0);
    }

    #[test]
    fn only_one_infusion_at_a_time() {
        let mut defender = knight();
        assert_eq!(defender.toggle_buff(Buff::IceInfusion), Ok(true));
        assert_eq!(
            defender.toggle_buff(Buff::WaterInfusion),
            Err(BuffToggleError::ConflictingInfusion)
        );
        assert_eq!(defender.toggle_buff(Buff::IceInfusion), Ok(false));
        assert_eq!(defender.toggle_buff(Buff::WaterInfusion), Ok(true));
    }

    #[test]
    fn harmful_buffs_cannot_be_granted() {
        let mut defender = knight();
        for buff in [Buff::Corroded, Buff::Burning] {
            assert_eq!(defender.toggle_buff(buff), Err(BuffToggleError::HarmfulBuff));
        }
        assert_eq!(defender.combatant().buffs().count(), 0);
    }

    #[test]
    fn buffs_from_other_sources_count_towards_the_limit() {
        let mut defender = knight();
        defender.combatant_mut().add_buff(Buff::Corroded, Duration::from_millis(500));
        defender.combatant_mut().add_buff(Buff::Burning, Duration::from_millis(500));
        assert_eq!(
            defender.toggle_buff(Buff::FireInfusion),
            Err(BuffToggleError::TooManyBuffs)
        );
        assert!(!defender.combatant().has_buff(Buff::FireInfusion));
    }
}
