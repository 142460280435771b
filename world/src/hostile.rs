use glam::DVec2;
use road_defence_core::{
    AttackAction, Combatant, Entity, EntityId, HostileId, HostileKind, HostileTemplate,
};
use road_defence_system_movement::Motion;

/// Mobile hostile following the road network.
#[derive(Clone, Debug)]
pub(crate) struct Hostile {
    id: HostileId,
    kind: HostileKind,
    motion: Motion,
    speed: f64,
    combatant: Combatant,
}

impl Hostile {
    pub(crate) fn new(
        id: HostileId,
        template: &HostileTemplate,
        motion: Motion,
        tile_length: f64,
    ) -> Self {
        Self {
            id,
            kind: template.kind(),
            motion,
            speed: template.speed_world(tile_length),
            combatant: Combatant::new(*template.profile()),
        }
    }

    pub(crate) const fn hostile_id(&self) -> HostileId {
        self.id
    }

    pub(crate) const fn kind(&self) -> HostileKind {
        self.kind
    }

    pub(crate) const fn motion(&self) -> &Motion {
        &self.motion
    }

    pub(crate) fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }

    /// Travel speed in world units per second.
    pub(crate) const fn speed(&self) -> f64 {
        self.speed
    }
}

impl Entity for Hostile {
    fn id(&self) -> EntityId {
        EntityId::Hostile(self.id)
    }

    fn position(&self) -> DVec2 {
        self.motion.position()
    }

    fn combatant(&self) -> &Combatant {
        &self.combatant
    }

    fn combatant_mut(&mut self) -> &mut Combatant {
        &mut self.combatant
    }

    fn attack(&mut self, action: &mut AttackAction) {
        if let Some(effect) = self.kind.attack_effect() {
            action.set_effect(effect);
        }
    }
}
