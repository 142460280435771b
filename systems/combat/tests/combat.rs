use std::time::Duration;

use glam::DVec2;
use road_defence_core::{
    AttackAction, AttackEffect, Buff, CombatProfile, Combatant, DefenderId, DefenderKind, Element,
    Entity, EntityId, Health, HostileId, HostileKind,
};
use road_defence_system_combat::try_attack;

const TILE: f64 = 48.0;

struct Fighter {
    id: EntityId,
    position: DVec2,
    combatant: Combatant,
    effect: Option<AttackEffect>,
}

impl Fighter {
    fn defender(id: u32, kind: DefenderKind, column: f64, row: f64) -> Self {
        Self {
            id: EntityId::Defender(DefenderId::new(id)),
            position: DVec2::new(column * TILE, row * TILE),
            combatant: Combatant::new(kind.profile()),
            effect: Some(kind.attack_effect()),
        }
    }

    fn hostile(id: u32, kind: HostileKind, column: f64, row: f64) -> Self {
        Self {
            id: EntityId::Hostile(HostileId::new(id)),
            position: DVec2::new(column * TILE, row * TILE),
            combatant: Combatant::new(*kind.template().profile()),
            effect: kind.attack_effect(),
        }
    }

    fn health(&self) -> u32 {
        self.combatant.health().get()
    }
}

impl Entity for Fighter {
    fn id(&self) -> EntityId {
        self.id
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
        if let Some(effect) = self.effect {
            action.set_effect(effect);
        }
    }
}

fn tick(attacker: &mut Fighter, targets: &mut [Fighter], dt: Duration) -> Option<AttackAction> {
    attacker.combatant_mut().recharge(dt);
    try_attack(attacker, targets.iter_mut(), TILE)
}

#[test]
fn knight_attacks_twice_in_a_second_of_short_ticks() {
    let mut knight = Fighter::defender(0, DefenderKind::Knight, 1.0, 1.0);
    let mut targets = vec![Fighter::hostile(0, HostileKind::Boar, 2.0, 1.0)];

    let mut attack_ticks = Vec::new();
    for index in 1..=10 {
        if tick(&mut knight, &mut targets, Duration::from_millis(100)).is_some() {
            attack_ticks.push(index);
        }
    }

    assert_eq!(attack_ticks, vec![5, 10]);
    assert_eq!(targets[0].health(), 70);
    assert_eq!(knight.combatant().recharged(), Duration::ZERO);
}

#[test]
fn nearest_target_is_chosen_and_ties_use_ids() {
    let mut elf = Fighter::defender(0, DefenderKind::Elf, 0.0, 0.0);
    elf.combatant_mut().recharge(Duration::from_millis(700));
    let mut targets = vec![
        Fighter::hostile(7, HostileKind::Boar, 2.0, 0.0),
        Fighter::hostile(5, HostileKind::Boar, 0.0, 2.0),
        Fighter::hostile(3, HostileKind::Boar, 3.0, 0.0),
    ];

    let action = try_attack(&mut elf, targets.iter_mut(), TILE).expect("attack");

    assert_eq!(action.target(), EntityId::Hostile(HostileId::new(5)));
    assert_eq!(action.damage(), 8);
    assert_eq!(action.dealt(), 8);
    assert_eq!(action.effect(), Some(AttackEffect::RangedShot));
    assert_eq!(targets[1].health(), 92);
    assert_eq!(targets[0].health(), 100);
}

#[test]
fn immune_dead_and_distant_candidates_are_skipped() {
    let mut ogre = Fighter::hostile(0, HostileKind::Ogre, 0.0, 0.0);
    ogre.combatant_mut().recharge(Duration::from_secs(1));

    let elf = Fighter::defender(1, DefenderKind::Elf, 1.0, 0.0);
    let mut fallen = Fighter::defender(2, DefenderKind::Knight, 0.0, 1.0);
    let _ = fallen.combatant_mut().take_damage(500);
    let distant = Fighter::defender(3, DefenderKind::Knight, 2.0, 0.0);
    let mut targets = vec![elf, fallen, distant];

    assert!(try_attack(&mut ogre, targets.iter_mut(), TILE).is_none());
    assert_eq!(ogre.combatant().recharged(), Duration::from_secs(1));

    targets.push(Fighter::defender(4, DefenderKind::Knight, 1.0, 0.0));
    let action = try_attack(&mut ogre, targets.iter_mut(), TILE).expect("attack");
    assert_eq!(action.target(), EntityId::Defender(DefenderId::new(4)));
    assert_eq!(action.effect(), Some(AttackEffect::Slam));
    assert_eq!(targets[3].health(), 80);
    assert_eq!(ogre.combatant().recharged(), Duration::ZERO);
}

#[test]
fn passive_and_recharging_attackers_do_nothing() {
    let mut boar = Fighter::hostile(0, HostileKind::Boar, 0.0, 0.0);
    boar.combatant_mut().recharge(Duration::from_secs(10));
    let mut targets = vec![Fighter::defender(0, DefenderKind::Knight, 1.0, 0.0)];
    assert!(try_attack(&mut boar, targets.iter_mut(), TILE).is_none());

    let mut knight = Fighter::defender(1, DefenderKind::Knight, 0.0, 0.0);
    knight.combatant_mut().recharge(Duration::from_millis(499));
    let mut hostiles = vec![Fighter::hostile(1, HostileKind::Boar, 1.0, 0.0)];
    assert!(try_attack(&mut knight, hostiles.iter_mut(), TILE).is_none());
    assert_eq!(hostiles[0].health(), 100);
}

#[test]
fn infused_attacks_overwrite_the_target_aura() {
    let mut knight = Fighter::defender(0, DefenderKind::Knight, 0.0, 0.0);
    knight
        .combatant_mut()
        .add_buff(Buff::WaterInfusion, Duration::from_secs(60));
    knight.combatant_mut().recharge(Duration::from_millis(500));

    let mut target = Fighter::hostile(0, HostileKind::Ogre, 1.0, 0.0);
    target.combatant_mut().apply_aura(Element::Fire);
    let mut targets = vec![target];

    let action = try_attack(&mut knight, targets.iter_mut(), TILE).expect("attack");

    assert_eq!(action.element(), Some(Element::Water));
    assert_eq!(targets[0].combatant().aura(), Some(Element::Water));
    assert_eq!(targets[0].combatant().health(), Health::new(285));
}

#[test]
fn profiles_without_element_leave_aura_untouched() {
    let profile = CombatProfile::new(50, 5, Duration::from_millis(100), 2.0, true).expect("profile");
    let mut attacker = Fighter {
        id: EntityId::Defender(DefenderId::new(9)),
        position: DVec2::ZERO,
        combatant: Combatant::new(profile),
        effect: None,
    };
    attacker.combatant_mut().recharge(Duration::from_millis(100));

    let mut target = Fighter::hostile(0, HostileKind::Boar, 0.0, 2.0);
    target.combatant_mut().apply_aura(Element::Ice);
    let mut targets = vec![target];

    let action = try_attack(&mut attacker, targets.iter_mut(), TILE).expect("attack");

    assert_eq!(action.effect(), None);
    assert_eq!(action.element(), None);
    assert_eq!(targets[0].combatant().aura(), Some(Element::Ice));
}
