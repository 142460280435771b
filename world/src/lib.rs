#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battlefield state for Road Defence.
//!
//! The world owns every hostile, defender and counter of a running level and
//! is mutated exclusively through [`apply`]. Each [`Command::Tick`] runs one
//! field update in a fixed order: spawn, move, interact, status, reap,
//! objective check and end check.

use std::{collections::BTreeMap, time::Duration};

use road_defence_core::{
    AttackAction, Buff, Command, ConfigError, DefenderId, DefenderKind, Entity, EntityId, Event,
    HostileId, InvariantViolation, LevelDescriptor, Outcome, PlacementError, RoadGrid,
    SimulationConfig, SimulationError, StatusReport, TileIndex,
};
use road_defence_system_combat::try_attack;
use road_defence_system_movement::{advance, travel_distance, Motion, MovementError};
use road_defence_system_spawning::{SpawnQueue, StartSelector};

mod defender;
mod hostile;

use defender::Defender;
use hostile::Hostile;

/// Lifecycle of a world between commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
    /// Ticks are ignored until the host starts the simulation.
    Paused,
    /// Ticks advance the field.
    Running,
    /// The level finished; ticks are ignored.
    Ended(Outcome),
    /// An invariant violation stopped the world; every command fails.
    Halted,
}

/// Represents the authoritative Road Defence world state.
#[derive(Debug)]
pub struct World {
    config: SimulationConfig,
    grid: RoadGrid,
    roster: Vec<DefenderKind>,
    hostiles: BTreeMap<HostileId, Hostile>,
    defenders: BTreeMap<DefenderId, Defender>,
    occupancy: OccupancyGrid,
    spawns: SpawnQueue,
    starts: StartSelector,
    life_points: u32,
    clock: Duration,
    state: SimulationState,
    next_hostile: u32,
    next_defender: u32,
}

impl World {
    /// Builds a paused world for `level`.
    ///
    /// `seed` fixes the start tile chosen for each hostile when the level has
    /// several start tiles.
    pub fn new(
        config: SimulationConfig,
        level: &LevelDescriptor,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        level.validate()?;
        let grid = RoadGrid::from_descriptor(&level.grid, config.tile_length())?;
        let spawns = SpawnQueue::from_descriptors(&level.spawns);

        Ok(Self {
            occupancy: OccupancyGrid::new(grid.columns(), grid.rows()),
            config,
            grid,
            roster: level.offered_defenders(),
            hostiles: BTreeMap::new(),
            defenders: BTreeMap::new(),
            spawns,
            starts: StartSelector::new(seed),
            life_points: level.settings.life_points,
            clock: Duration::ZERO,
            state: SimulationState::Paused,
            next_hostile: 0,
            next_defender: 0,
        })
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> Result<(), InvariantViolation> {
        self.clock = self.clock.saturating_add(dt);
        out_events.push(Event::TimeAdvanced {
            dt,
            clock: self.clock,
        });

        self.spawn_due(out_events);
        self.move_hostiles(dt)?;
        self.interact(dt, out_events);
        self.update_statuses(dt, out_events);
        self.reap(out_events);
        self.resolve_objectives(out_events)?;
        self.check_end(out_events);
        Ok(())
    }

    fn spawn_due(&mut self, out_events: &mut Vec<Event>) {
        for arrival in self.spawns.drain_due(self.clock) {
            let Some(tile) = self
                .starts
                .pick(self.grid.start_tiles())
                .and_then(|index| self.grid.tile(index))
            else {
                log::warn!("dropping arrival at {:?}: level has no start tile", arrival.arrival());
                continue;
            };

            let id = HostileId::new(self.next_hostile);
            self.next_hostile = self.next_hostile.saturating_add(1);

            let motion = Motion::spawn(&self.grid, tile);
            let mut hostile = Hostile::new(id, arrival.template(), motion, self.grid.tile_length());
            for grant in arrival.buffs() {
                hostile.combatant_mut().add_buff(grant.buff, grant.duration());
            }

            log::debug!(
                "spawned {:?} {:?} on {} heading {:?}",
                hostile.kind(),
                id,
                tile.index(),
                motion.heading()
            );
            out_events.push(Event::HostileSpawned {
                hostile: id,
                kind: hostile.kind(),
                tile: tile.index(),
            });
            let _ = self.hostiles.insert(id, hostile);
        }
    }

    fn move_hostiles(&mut self, dt: Duration) -> Result<(), InvariantViolation> {
        for hostile in self.hostiles.values_mut() {
            let distance = travel_distance(hostile.speed(), dt);
            let id = hostile.hostile_id();
            advance(&self.grid, hostile.motion_mut(), distance).map_err(
                |MovementError::OffRoad { position }| InvariantViolation::HostileLeftRoad {
                    hostile: id,
                    x: position.x,
                    y: position.y,
                },
            )?;
        }
        Ok(())
    }

    fn interact(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let tile_length = self.grid.tile_length();

        for defender in self.defenders.values_mut() {
            if !defender.combatant().is_alive() {
                continue;
            }
            defender.combatant_mut().recharge(dt);
            if let Some(action) = try_attack(defender, self.hostiles.values_mut(), tile_length) {
                out_events.push(attack_landed(&action));
            }
        }

        for hostile in self.hostiles.values_mut() {
            let combatant = hostile.combatant();
            if !combatant.is_alive() || !combatant.profile().can_attack() {
                continue;
            }
            hostile.combatant_mut().recharge(dt);
            if let Some(action) = try_attack(hostile, self.defenders.values_mut(), tile_length) {
                out_events.push(attack_landed(&action));
            }
        }
    }

    fn update_statuses(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for hostile in self.hostiles.values_mut() {
            if hostile.combatant().is_alive() {
                let report = hostile.update_status(dt);
                report_status(hostile.id(), report, out_events);
            }
        }

        for defender in self.defenders.values_mut() {
            if defender.combatant().is_alive() {
                let report = defender.update_status(dt);
                report_status(defender.id(), report, out_events);
            }
        }
    }

    fn reap(&mut self, out_events: &mut Vec<Event>) {
        let fallen: Vec<HostileId> = self
            .hostiles
            .values()
            .filter(|hostile| !hostile.combatant().is_alive())
            .map(Hostile::hostile_id)
            .collect();
        for id in fallen {
            let _ = self.hostiles.remove(&id);
            log::debug!("hostile {id:?} died");
            out_events.push(Event::EntityDied {
                entity: EntityId::Hostile(id),
            });
        }

        let fallen: Vec<DefenderId> = self
            .defenders
            .values()
            .filter(|defender| !defender.combatant().is_alive())
            .map(Defender::defender_id)
            .collect();
        for id in fallen {
            if let Some(defender) = self.defenders.remove(&id) {
                self.occupancy.vacate(defender.tile());
                log::debug!("defender {id:?} died on {}", defender.tile());
            }
            out_events.push(Event::EntityDied {
                entity: EntityId::Defender(id),
            });
        }
    }

    fn resolve_objectives(&mut self, out_events: &mut Vec<Event>) -> Result<(), InvariantViolation> {
        let stopped: Vec<(HostileId, Option<TileIndex>)> = self
            .hostiles
            .values()
            .filter(|hostile| hostile.motion().is_stopped())
            .map(|hostile| {
                (
                    hostile.hostile_id(),
                    self.grid.locate(hostile.motion().position()),
                )
            })
            .collect();

        for (id, tile) in stopped {
            let Some(objective) = tile.filter(|index| self.grid.is_objective(*index)) else {
                return Err(InvariantViolation::StoppedOffObjective { hostile: id, tile });
            };

            let _ = self.hostiles.remove(&id);
            self.life_points = self.life_points.saturating_sub(1);
            log::debug!(
                "hostile {id:?} reached objective {objective}; {} life points left",
                self.life_points
            );
            out_events.push(Event::ObjectiveReached {
                hostile: id,
                tile: objective,
                life_points: self.life_points,
            });
        }

        Ok(())
    }

    fn check_end(&mut self, out_events: &mut Vec<Event>) {
        let outcome = if self.life_points == 0 {
            Outcome::Lose
        } else if self.hostiles.is_empty() && self.spawns.is_empty() {
            Outcome::Win
        } else {
            return;
        };

        log::info!("level ended at {:?} with {outcome:?}", self.clock);
        self.state = SimulationState::Ended(outcome);
        out_events.push(Event::GameEnded { outcome });
    }

    fn place_defender(&mut self, kind: DefenderKind, tile: TileIndex, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.check_placement(kind, tile) {
            log::warn!("rejected {kind:?} on {tile}: {reason:?}");
            out_events.push(Event::DefenderPlacementRejected { kind, tile, reason });
            return;
        }

        let id = DefenderId::new(self.next_defender);
        self.next_defender = self.next_defender.saturating_add(1);

        let defender = Defender::new(id, kind, tile, self.grid.anchor(tile));
        self.occupancy.occupy(id, tile);
        let _ = self.defenders.insert(id, defender);

        log::debug!("placed {kind:?} {id:?} on {tile}");
        out_events.push(Event::DefenderPlaced {
            defender: id,
            kind,
            tile,
        });
    }

    fn check_placement(&self, kind: DefenderKind, tile: TileIndex) -> Result<(), PlacementError> {
        if matches!(self.state, SimulationState::Ended(_)) {
            return Err(PlacementError::GameOver);
        }
        if !self.roster.contains(&kind) {
            return Err(PlacementError::NotInRoster);
        }

        let Some(target) = self.grid.tile(tile) else {
            return Err(PlacementError::OutOfBounds);
        };
        if self.occupancy.occupant(tile).is_some() {
            return Err(PlacementError::Occupied);
        }
        if !kind.accepts(target.kind()) {
            return Err(PlacementError::IncompatibleTile);
        }

        Ok(())
    }

    fn remove_defender(
        &mut self,
        tile: TileIndex,
        out_events: &mut Vec<Event>,
    ) -> Result<(), InvariantViolation> {
        let id = self.defender_on(tile)?;
        let _ = self.defenders.remove(&id);
        self.occupancy.vacate(tile);

        log::debug!("removed defender {id:?} from {tile}");
        out_events.push(Event::DefenderRemoved { defender: id, tile });
        Ok(())
    }

    fn toggle_defender_buff(
        &mut self,
        tile: TileIndex,
        buff: Buff,
        out_events: &mut Vec<Event>,
    ) -> Result<(), InvariantViolation> {
        let id = self.defender_on(tile)?;
        let defender = self
            .defenders
            .get_mut(&id)
            .ok_or(InvariantViolation::MissingDefender { tile })?;

        match defender.toggle_buff(buff) {
            Ok(active) => out_events.push(Event::DefenderBuffToggled {
                defender: id,
                buff,
                active,
            }),
            Err(reason) => {
                log::warn!("rejected {buff:?} for defender {id:?}: {reason:?}");
                out_events.push(Event::DefenderBuffRejected {
                    defender: id,
                    buff,
                    reason,
                });
            }
        }
        Ok(())
    }

    fn defender_on(&self, tile: TileIndex) -> Result<DefenderId, InvariantViolation> {
        self.occupancy
            .occupant(tile)
            .filter(|id| self.defenders.contains_key(id))
            .ok_or(InvariantViolation::MissingDefender { tile })
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Ticks are ignored unless the world is running. An invariant violation halts
/// the world: the violation is returned once and every later command fails
/// with [`SimulationError::Halted`].
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), SimulationError> {
    if world.state == SimulationState::Halted {
        return Err(SimulationError::Halted);
    }

    let result = match command {
        Command::Start => {
            if world.state == SimulationState::Paused {
                world.state = SimulationState::Running;
                out_events.push(Event::SimulationStarted);
            }
            Ok(())
        }
        Command::Pause => {
            if world.state == SimulationState::Running {
                world.state = SimulationState::Paused;
                out_events.push(Event::SimulationPaused);
            }
            Ok(())
        }
        Command::Tick { dt } => {
            if world.state == SimulationState::Running {
                world.tick(dt, out_events)
            } else {
                Ok(())
            }
        }
        Command::PlaceDefender { kind, tile } => {
            world.place_defender(kind, tile, out_events);
            Ok(())
        }
        Command::RemoveDefender { tile } => world.remove_defender(tile, out_events),
        Command::ToggleDefenderBuff { tile, buff } => {
            world.toggle_defender_buff(tile, buff, out_events)
        }
    };

    result.map_err(|violation| {
        log::warn!("halting simulation: {violation}");
        world.state = SimulationState::Halted;
        SimulationError::from(violation)
    })
}

fn attack_landed(action: &AttackAction) -> Event {
    log::trace!(
        "{:?} hit {:?} for {}",
        action.attacker(),
        action.target(),
        action.dealt()
    );
    Event::AttackLanded {
        attacker: action.attacker(),
        target: action.target(),
        damage: action.dealt(),
        element: action.element(),
        effect: action.effect(),
    }
}

fn report_status(entity: EntityId, report: StatusReport, out_events: &mut Vec<Event>) {
    if report.corrosion > 0 {
        out_events.push(Event::CorrosionApplied {
            entity,
            damage: report.corrosion,
        });
    }
    if report.continuous > 0 {
        out_events.push(Event::ContinuousDamageApplied {
            entity,
            damage: report.continuous,
        });
    }
    for buff in report.expired {
        out_events.push(Event::BuffExpired { entity, buff });
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::DVec2;
    use road_defence_core::{
        Buff, DefenderId, DefenderKind, Direction, Element, Entity, Health, HostileId,
        HostileKind, Outcome, RoadGrid, SimulationConfig, TileIndex,
    };

    use super::{Defender, Hostile, SimulationState, World};

    /// Remaining life points of the player.
    #[must_use]
    pub fn life_points(world: &World) -> u32 {
        world.life_points
    }

    /// Simulated time elapsed since the level started.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(world: &World) -> SimulationState {
        world.state
    }

    /// Terminal outcome, once the level has ended.
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        match world.state {
            SimulationState::Ended(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Runtime parameters the world was built with.
    #[must_use]
    pub fn config(world: &World) -> &SimulationConfig {
        &world.config
    }

    /// Immutable battlefield layout.
    #[must_use]
    pub fn grid(world: &World) -> &RoadGrid {
        &world.grid
    }

    /// Defender kinds the player may place.
    #[must_use]
    pub fn roster(world: &World) -> &[DefenderKind] {
        &world.roster
    }

    /// Number of hostiles currently on the field.
    #[must_use]
    pub fn active_hostiles(world: &World) -> usize {
        world.hostiles.len()
    }

    /// Number of hostiles still waiting to spawn.
    #[must_use]
    pub fn queued_hostiles(world: &World) -> usize {
        world.spawns.len()
    }

    /// Simulation time at which the next queued hostile arrives.
    #[must_use]
    pub fn next_arrival(world: &World) -> Option<Duration> {
        world.spawns.next_arrival()
    }

    /// Number of hostiles the player still has to deal with.
    #[must_use]
    pub fn remaining_hostiles(world: &World) -> usize {
        active_hostiles(world) + queued_hostiles(world)
    }

    /// Captures a read-only view of the hostiles on the field.
    #[must_use]
    pub fn hostile_view(world: &World) -> HostileView {
        HostileView {
            snapshots: world.hostiles.values().map(HostileSnapshot::capture).collect(),
        }
    }

    /// Captures a read-only view of the placed defenders.
    #[must_use]
    pub fn defender_view(world: &World) -> DefenderView {
        DefenderView {
            snapshots: world
                .defenders
                .values()
                .map(DefenderSnapshot::capture)
                .collect(),
        }
    }

    /// Snapshot of the defender standing on `tile`, if any.
    #[must_use]
    pub fn defender_at(world: &World, tile: TileIndex) -> Option<DefenderSnapshot> {
        world
            .occupancy
            .occupant(tile)
            .and_then(|id| world.defenders.get(&id))
            .map(DefenderSnapshot::capture)
    }

    /// Read-only snapshot describing all hostiles ordered by id.
    #[derive(Clone, Debug, PartialEq)]
    pub struct HostileView {
        snapshots: Vec<HostileSnapshot>,
    }

    impl HostileView {
        /// Iterator over the captured hostile snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &HostileSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<HostileSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single hostile's state.
    #[derive(Clone, Debug, PartialEq)]
    pub struct HostileSnapshot {
        /// Unique identifier assigned to the hostile.
        pub id: HostileId,
        /// Kind of hostile.
        pub kind: HostileKind,
        /// Position in world units.
        pub position: DVec2,
        /// Current heading; `None` once stopped.
        pub heading: Option<Direction>,
        /// Current health.
        pub health: Health,
        /// Upper bound on health.
        pub max_health: u32,
        /// Element lingering on the hostile.
        pub aura: Option<Element>,
        /// Active buffs with their remaining durations.
        pub buffs: Vec<(Buff, Duration)>,
    }

    impl HostileSnapshot {
        fn capture(hostile: &Hostile) -> Self {
            let combatant = hostile.combatant();
            Self {
                id: hostile.hostile_id(),
                kind: hostile.kind(),
                position: hostile.motion().position(),
                heading: hostile.motion().heading(),
                health: combatant.health(),
                max_health: combatant.profile().max_health(),
                aura: combatant.aura(),
                buffs: combatant.buffs().collect(),
            }
        }
    }

    /// Read-only snapshot describing all defenders ordered by id.
    #[derive(Clone, Debug, PartialEq)]
    pub struct DefenderView {
        snapshots: Vec<DefenderSnapshot>,
    }

    impl DefenderView {
        /// Iterator over the captured defender snapshots in deterministic order.
        pub fn iter(&self) -> impl Iterator<Item = &DefenderSnapshot> {
            self.snapshots.iter()
        }

        /// Consumes the view, yielding the underlying snapshots.
        pub fn into_vec(self) -> Vec<DefenderSnapshot> {
            self.snapshots
        }
    }

    /// Immutable representation of a single defender's state.
    #[derive(Clone, Debug, PartialEq)]
    pub struct DefenderSnapshot {
        /// Unique identifier assigned to the defender.
        pub id: DefenderId,
        /// Kind of defender.
        pub kind: DefenderKind,
        /// Tile the defender occupies.
        pub tile: TileIndex,
        /// Current health.
        pub health: Health,
        /// Time recharged since the last attack.
        pub recharged: Duration,
        /// Element lingering on the defender.
        pub aura: Option<Element>,
        /// Active buffs with their remaining durations.
        pub buffs: Vec<(Buff, Duration)>,
    }

    impl DefenderSnapshot {
        fn capture(defender: &Defender) -> Self {
            let combatant = defender.combatant();
            Self {
                id: defender.defender_id(),
                kind: defender.kind(),
                tile: defender.tile(),
                health: combatant.health(),
                recharged: combatant.recharged(),
                aura: combatant.aura(),
                buffs: combatant.buffs().collect(),
            }
        }
    }
}

#[derive(Clone, Debug)]
struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<DefenderId>>,
}

impl OccupancyGrid {
    fn new(columns: u32, rows: u32) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; capacity],
        }
    }

    fn occupant(&self, tile: TileIndex) -> Option<DefenderId> {
        self.index(tile)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    fn occupy(&mut self, defender: DefenderId, tile: TileIndex) {
        if let Some(slot) = self.index(tile).and_then(|index| self.cells.get_mut(index)) {
            *slot = Some(defender);
        }
    }

    fn vacate(&mut self, tile: TileIndex) {
        if let Some(slot) = self.index(tile).and_then(|index| self.cells.get_mut(index)) {
            *slot = None;
        }
    }

    fn index(&self, tile: TileIndex) -> Option<usize> {
        if tile.column() < self.columns && tile.row() < self.rows {
            let row = usize::try_from(tile.row()).ok()?;
            let column = usize::try_from(tile.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
