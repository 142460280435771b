//! Shared combat and status state for every entity on the field.

use std::{collections::BTreeMap, time::Duration};

use glam::DVec2;

use crate::{
    AttackEffect, Buff, ConfigError, Element, EntityId, StatusReport, CONTINUOUS_DAMAGE_PERIOD,
};

/// Health value of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable combat parameters of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombatProfile {
    max_health: u32,
    damage: u32,
    recharge_time: Duration,
    attack_range: f64,
    attackable: bool,
}

impl CombatProfile {
    /// Creates a validated combat profile.
    ///
    /// A profile with zero damage is passive and never attacks; any other
    /// profile needs a positive recharge time and a positive attack range.
    pub fn new(
        max_health: u32,
        damage: u32,
        recharge_time: Duration,
        attack_range: f64,
        attackable: bool,
    ) -> Result<Self, ConfigError> {
        if max_health == 0 {
            return Err(ConfigError::InvalidProfile("max health must be positive"));
        }
        if !attack_range.is_finite() || attack_range < 0.0 {
            return Err(ConfigError::InvalidProfile(
                "attack range must be finite and non-negative",
            ));
        }
        if damage > 0 && recharge_time.is_zero() {
            return Err(ConfigError::InvalidProfile(
                "attacking profiles need a recharge time",
            ));
        }
        if damage > 0 && attack_range == 0.0 {
            return Err(ConfigError::InvalidProfile(
                "attacking profiles need an attack range",
            ));
        }

        Ok(Self::builtin(
            max_health,
            damage,
            recharge_time,
            attack_range,
            attackable,
        ))
    }

    pub(crate) const fn builtin(
        max_health: u32,
        damage: u32,
        recharge_time: Duration,
        attack_range: f64,
        attackable: bool,
    ) -> Self {
        Self {
            max_health,
            damage,
            recharge_time,
            attack_range,
            attackable,
        }
    }

    /// Upper bound on the entity's health.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Raw damage dealt per attack.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Time the entity must recharge between attacks.
    #[must_use]
    pub const fn recharge_time(&self) -> Duration {
        self.recharge_time
    }

    /// Attack radius measured in tiles.
    #[must_use]
    pub const fn attack_range(&self) -> f64 {
        self.attack_range
    }

    /// Whether other entities may target this one.
    #[must_use]
    pub const fn attackable(&self) -> bool {
        self.attackable
    }

    /// Whether the profile describes an entity that attacks at all.
    #[must_use]
    pub const fn can_attack(&self) -> bool {
        self.damage > 0
    }
}

/// Mutable combat state: health, recharge, buffs, aura and continuous damage.
#[derive(Clone, Debug, PartialEq)]
pub struct Combatant {
    profile: CombatProfile,
    health: Health,
    recharged: Duration,
    buffs: BTreeMap<Buff, Duration>,
    aura: Option<Element>,
    continuous_damage_counter: Duration,
    /// Corrosion owed below one health point, in health-milliseconds.
    corrosion_remainder: u64,
}

impl Combatant {
    /// Creates a combatant at full health with an empty recharge counter.
    #[must_use]
    pub fn new(profile: CombatProfile) -> Self {
        Self {
            health: Health::new(profile.max_health()),
            profile,
            recharged: Duration::ZERO,
            buffs: BTreeMap::new(),
            aura: None,
            continuous_damage_counter: Duration::ZERO,
            corrosion_remainder: 0,
        }
    }

    /// Combat parameters the combatant was built from.
    #[must_use]
    pub const fn profile(&self) -> &CombatProfile {
        &self.profile
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> Health {
        self.health
    }

    /// Whether health remains above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health.get() > 0
    }

    /// Whether other entities may target this one right now.
    #[must_use]
    pub const fn is_targetable(&self) -> bool {
        self.profile.attackable() && self.is_alive()
    }

    /// Time recharged since the last attack.
    #[must_use]
    pub const fn recharged(&self) -> Duration {
        self.recharged
    }

    /// Whether enough time has been recharged to attack.
    #[must_use]
    pub fn ready_to_attack(&self) -> bool {
        self.recharged >= self.profile.recharge_time()
    }

    /// Advances the recharge counter by one tick.
    pub fn recharge(&mut self, dt: Duration) {
        self.recharged = self.recharged.saturating_add(dt);
    }

    /// Restarts the recharge counter after an attack.
    pub fn reset_recharge(&mut self) {
        self.recharged = Duration::ZERO;
    }

    /// Removes health, clamping at zero, and returns the amount removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.health.get();
        let after = before.saturating_sub(amount);
        self.health = Health::new(after);
        before - after
    }

    /// Adds `duration` to the buff, inserting it when absent.
    pub fn add_buff(&mut self, buff: Buff, duration: Duration) {
        let remaining = self.buffs.entry(buff).or_insert(Duration::ZERO);
        *remaining = remaining.saturating_add(duration);
    }

    /// Removes the buff if present.
    pub fn remove_buff(&mut self, buff: Buff) {
        let _ = self.buffs.remove(&buff);
    }

    /// Whether the buff is active.
    #[must_use]
    pub fn has_buff(&self, buff: Buff) -> bool {
        self.buffs.contains_key(&buff)
    }

    /// Remaining duration of the buff, if active.
    #[must_use]
    pub fn buff_remaining(&self, buff: Buff) -> Option<Duration> {
        self.buffs.get(&buff).copied()
    }

    /// Active buffs with their remaining durations, in buff order.
    pub fn buffs(&self) -> impl Iterator<Item = (Buff, Duration)> + '_ {
        self.buffs.iter().map(|(buff, remaining)| (*buff, *remaining))
    }

    /// Active elemental infusion buff, if any.
    #[must_use]
    pub fn element_infusion_buff(&self) -> Option<Buff> {
        self.buffs.keys().copied().find(|buff| buff.infusion().is_some())
    }

    /// Element currently lingering on the combatant.
    #[must_use]
    pub const fn aura(&self) -> Option<Element> {
        self.aura
    }

    /// Replaces any existing aura with `element`.
    pub fn apply_aura(&mut self, element: Element) {
        self.aura = Some(element);
    }

    /// Time accumulated toward the next continuous damage hit.
    #[must_use]
    pub const fn continuous_damage_counter(&self) -> Duration {
        self.continuous_damage_counter
    }

    /// Damage dealt per continuous damage hit under the current buffs and aura.
    #[must_use]
    pub fn continuous_damage_rate(&self) -> u32 {
        let base = self
            .buffs
            .keys()
            .fold(0u32, |rate, buff| {
                rate.saturating_add(buff.continuous_damage_per_second())
            });
        match self.aura {
            Some(element) => element.modify_continuous_rate(base),
            None => base,
        }
    }

    /// Runs the once-per-tick status update.
    ///
    /// Buff durations decay first and per-tick buff effects apply before
    /// expired buffs are dropped; continuous damage is then accounted against
    /// the surviving buff set. Corrosion below one health point carries over to
    /// the next tick, so short ticks still wear the bearer down.
    pub fn update_status(&mut self, dt: Duration) -> StatusReport {
        let mut report = StatusReport::default();

        let mut corrosion_per_second = 0u64;
        for (buff, remaining) in self.buffs.iter_mut() {
            *remaining = remaining.saturating_sub(dt);
            corrosion_per_second =
                corrosion_per_second.saturating_add(u64::from(buff.corrosion_per_second()));
        }

        if corrosion_per_second == 0 {
            self.corrosion_remainder = 0;
        } else {
            let elapsed_ms = u64::try_from(dt.as_millis()).unwrap_or(u64::MAX);
            let owed = corrosion_per_second
                .saturating_mul(elapsed_ms)
                .saturating_add(self.corrosion_remainder);
            self.corrosion_remainder = owed % 1_000;
            let corrosion = owed / 1_000;
            if corrosion > 0 {
                report.corrosion = self.take_damage(u32::try_from(corrosion).unwrap_or(u32::MAX));
            }
        }

        self.buffs.retain(|buff, remaining| {
            if remaining.is_zero() {
                report.expired.push(*buff);
                false
            } else {
                true
            }
        });

        let rate = self.continuous_damage_rate();
        if rate == 0 {
            self.continuous_damage_counter = Duration::ZERO;
            return report;
        }

        self.continuous_damage_counter = self.continuous_damage_counter.saturating_add(dt);
        while self.continuous_damage_counter >= CONTINUOUS_DAMAGE_PERIOD {
            self.continuous_damage_counter -= CONTINUOUS_DAMAGE_PERIOD;
            report.continuous = report.continuous.saturating_add(self.take_damage(rate));
            report.continuous_hits += 1;
        }

        report
    }
}

/// A single attack travelling from attacker to target.
#[derive(Clone, Debug, PartialEq)]
pub struct AttackAction {
    attacker: EntityId,
    target: EntityId,
    damage: u32,
    element: Option<Element>,
    effect: Option<AttackEffect>,
    dealt: u32,
}

impl AttackAction {
    /// Creates an attack carrying the attacker's raw damage and element.
    #[must_use]
    pub const fn new(
        attacker: EntityId,
        target: EntityId,
        damage: u32,
        element: Option<Element>,
    ) -> Self {
        Self {
            attacker,
            target,
            damage,
            element,
            effect: None,
            dealt: 0,
        }
    }

    /// Entity performing the attack.
    #[must_use]
    pub const fn attacker(&self) -> EntityId {
        self.attacker
    }

    /// Entity receiving the attack.
    #[must_use]
    pub const fn target(&self) -> EntityId {
        self.target
    }

    /// Raw damage carried by the attack.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Element carried by the attack.
    #[must_use]
    pub const fn element(&self) -> Option<Element> {
        self.element
    }

    /// Visual effect attached by the attacker.
    #[must_use]
    pub const fn effect(&self) -> Option<AttackEffect> {
        self.effect
    }

    /// Health actually removed from the target.
    #[must_use]
    pub const fn dealt(&self) -> u32 {
        self.dealt
    }

    /// Attaches a visual effect for renderers.
    pub fn set_effect(&mut self, effect: AttackEffect) {
        self.effect = Some(effect);
    }

    /// Records the health removed from the target.
    pub fn record_dealt(&mut self, dealt: u32) {
        self.dealt = dealt;
    }
}

/// Capability set shared by every entity variant on the field.
///
/// Implementors expose their [`Combatant`] state and world position; the
/// provided methods implement the base combat contract, and variants override
/// [`Entity::attack`] or [`Entity::attacked`] to decorate attacks without
/// changing the damage they deal.
pub trait Entity {
    /// Identifier of the entity.
    fn id(&self) -> EntityId;

    /// Tile-anchored position in world units.
    fn position(&self) -> DVec2;

    /// Shared combat state.
    fn combatant(&self) -> &Combatant;

    /// Mutable shared combat state.
    fn combatant_mut(&mut self) -> &mut Combatant;

    /// Invoked on the attacker once a target has been chosen.
    fn attack(&mut self, _action: &mut AttackAction) {}

    /// Invoked on the target after [`Entity::attack`].
    ///
    /// The base contract removes the raw damage (clamped at zero) and replaces
    /// the aura when the attack carries an element.
    fn attacked(&mut self, action: &mut AttackAction) {
        let combatant = self.combatant_mut();
        let dealt = combatant.take_damage(action.damage());
        if let Some(element) = action.element() {
            combatant.apply_aura(element);
        }
        action.record_dealt(dealt);
    }

    /// Once-per-tick buff decay and continuous damage.
    fn update_status(&mut self, dt: Duration) -> StatusReport {
        self.combatant_mut().update_status(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(max_health: u32) -> CombatProfile {
        CombatProfile::new(max_health, 0, Duration::ZERO, 0.0, true).expect("valid profile")
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn attacking_profiles_require_recharge_and_range() {
        assert!(CombatProfile::new(10, 5, Duration::ZERO, 1.0, true).is_err());
        assert!(CombatProfile::new(10, 5, ms(100), 0.0, true).is_err());
        assert!(CombatProfile::new(10, 5, ms(100), -1.0, true).is_err());
        assert!(CombatProfile::new(0, 0, Duration::ZERO, 0.0, true).is_err());
        assert!(CombatProfile::new(10, 0, Duration::ZERO, 0.0, true).is_ok());
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut combatant = Combatant::new(profile(30));
        assert_eq!(combatant.take_damage(12), 12);
        assert_eq!(combatant.health(), Health::new(18));
        assert_eq!(combatant.take_damage(50), 18);
        assert_eq!(combatant.health(), Health::new(0));
        assert!(!combatant.is_alive());
    }

    #[test]
    fn recharge_gates_readiness() {
        let attacker = CombatProfile::new(10, 3, ms(300), 1.0, true).expect("profile");
        let mut combatant = Combatant::new(attacker);
        combatant.recharge(ms(200));
        assert!(!combatant.ready_to_attack());
        combatant.recharge(ms(100));
        assert!(combatant.ready_to_attack());
        combatant.reset_recharge();
        assert_eq!(combatant.recharged(), Duration::ZERO);
        assert!(!combatant.ready_to_attack());
    }

    #[test]
    fn buffs_accumulate_duration() {
        let mut combatant = Combatant::new(profile(100));
        combatant.add_buff(Buff::Corroded, ms(1_000));
        let _ = combatant.update_status(ms(200));
        combatant.add_buff(Buff::Corroded, ms(500));
        assert_eq!(combatant.buff_remaining(Buff::Corroded), Some(ms(1_300)));
    }

    #[test]
    fn removing_missing_buff_is_a_no_op() {
        let mut combatant = Combatant::new(profile(100));
        combatant.remove_buff(Buff::Burning);
        assert!(!combatant.has_buff(Buff::Burning));
        combatant.add_buff(Buff::Burning, ms(100));
        combatant.remove_buff(Buff::Burning);
        combatant.remove_buff(Buff::Burning);
        assert_eq!(combatant.buffs().count(), 0);
    }

    #[test]
    fn aura_is_overwritten_not_stacked() {
        let mut combatant = Combatant::new(profile(100));
        combatant.apply_aura(Element::Fire);
        combatant.apply_aura(Element::Ice);
        assert_eq!(combatant.aura(), Some(Element::Ice));
    }

    #[test]
    fn infusion_buff_is_reported() {
        let mut combatant = Combatant::new(profile(100));
        assert_eq!(combatant.element_infusion_buff(), None);
        combatant.add_buff(Buff::Burning, ms(100));
        combatant.add_buff(Buff::WaterInfusion, ms(100));
        assert_eq!(combatant.element_infusion_buff(), Some(Buff::WaterInfusion));
    }

    #[test]
    fn burning_fires_twice_over_two_and_a_half_seconds() {
        let mut combatant = Combatant::new(profile(100));
        combatant.add_buff(Buff::Burning, ms(2_500));

        let mut hits = 0;
        let mut expired = Vec::new();
        for _ in 0..5 {
            let report = combatant.update_status(ms(500));
            hits += report.continuous_hits;
            expired.extend(report.expired);
        }

        assert_eq!(hits, 2);
        assert_eq!(expired, vec![Buff::Burning]);
        assert_eq!(combatant.health(), Health::new(80));
        assert_eq!(combatant.continuous_damage_counter(), Duration::ZERO);

        let report = combatant.update_status(ms(500));
        assert_eq!(report.continuous_hits, 0);
        assert_eq!(combatant.health(), Health::new(80));
    }

    #[test]
    fn zero_rate_pins_counter() {
        let mut combatant = Combatant::new(profile(100));
        combatant.add_buff(Buff::Burning, ms(5_000));
        let _ = combatant.update_status(ms(600));
        assert_eq!(combatant.continuous_damage_counter(), ms(600));

        combatant.apply_aura(Element::Water);
        let report = combatant.update_status(ms(600));
        assert_eq!(report.continuous_hits, 0);
        assert_eq!(combatant.continuous_damage_counter(), Duration::ZERO);
    }

    #[test]
    fn fire_aura_doubles_continuous_damage() {
        let mut combatant = Combatant::new(profile(100));
        combatant.add_buff(Buff::Burning, ms(5_000));
        combatant.apply_aura(Element::Fire);
        let report = combatant.update_status(ms(1_000));
        assert_eq!(report.continuous, 20);
        assert_eq!(combatant.health(), Health::new(80));
    }

    #[test]
    fn corrosion_applies_on_the_expiring_tick() {
        let mut combatant = Combatant::new(profile(100));
        combatant.add_buff(Buff::Corroded, ms(200));

        let first = combatant.update_status(ms(100));
        assert_eq!(first.corrosion, 1);
        assert!(first.expired.is_empty());

        let second = combatant.update_status(ms(100));
        assert_eq!(second.corrosion, 1);
        assert_eq!(second.expired, vec![Buff::Corroded]);
        assert_eq!(combatant.health(), Health::new(98));

        let third = combatant.update_status(ms(100));
        assert_eq!(third.corrosion, 0);
    }

    #[test]
    fn corrosion_accumulates_across_short_ticks() {
        let mut combatant = Combatant::new(profile(200));
        combatant.add_buff(Buff::Corroded, ms(10_000));

        let mut corrosion = 0;
        for tick in 1..=625 {
            let report = combatant.update_status(ms(16));
            corrosion += report.corrosion;
            if tick == 6 {
                assert_eq!(corrosion, 0);
            }
            if tick == 7 {
                assert_eq!(corrosion, 1);
            }
        }

        assert_eq!(corrosion, 100);
        assert_eq!(combatant.health(), Health::new(100));
        assert!(!combatant.has_buff(Buff::Corroded));
    }

    #[test]
    fn corrosion_carry_is_dropped_once_the_buff_ends() {
        let mut combatant = Combatant::new(profile(100));
        combatant.add_buff(Buff::Corroded, ms(50));
        let report = combatant.update_status(ms(50));
        assert_eq!(report.corrosion, 0);
        assert_eq!(report.expired, vec![Buff::Corroded]);

        let _ = combatant.update_status(ms(50));
        combatant.add_buff(Buff::Corroded, ms(50));
        let report = combatant.update_status(ms(50));
        assert_eq!(report.corrosion, 0);
        assert_eq!(combatant.health(), Health::new(100));
    }

    struct Dummy {
        combatant: Combatant,
    }

    impl Entity for Dummy {
        fn id(&self) -> EntityId {
            EntityId::Hostile(crate::HostileId::new(1))
        }

        fn position(&self) -> DVec2 {
            DVec2::ZERO
        }

        fn combatant(&self) -> &Combatant {
            &self.combatant
        }

        fn combatant_mut(&mut self) -> &mut Combatant {
            &mut self.combatant
        }
    }

    #[test]
    fn base_attacked_applies_damage_and_aura() {
        let mut dummy = Dummy {
            combatant: Combatant::new(profile(100)),
        };
        let mut action = AttackAction::new(
            EntityId::Defender(crate::DefenderId::new(0)),
            dummy.id(),
            130,
            Some(Element::Fire),
        );

        dummy.attacked(&mut action);

        assert_eq!(action.dealt(), 100);
        assert_eq!(dummy.combatant().health(), Health::new(0));
        assert_eq!(dummy.combatant().aura(), Some(Element::Fire));
    }
}
