#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Time-ordered hostile arrivals and deterministic start tile selection.

use std::{collections::VecDeque, time::Duration};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use road_defence_core::{BuffGrant, HostileTemplate, SpawnDescriptor, TileIndex};

/// One hostile waiting to enter the field.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrival {
    template: HostileTemplate,
    arrival: Duration,
    buffs: Vec<BuffGrant>,
}

impl Arrival {
    /// Creates an arrival of `template` at simulation time `arrival`.
    #[must_use]
    pub fn new(template: HostileTemplate, arrival: Duration, buffs: Vec<BuffGrant>) -> Self {
        Self {
            template,
            arrival,
            buffs,
        }
    }

    /// Blueprint of the arriving hostile.
    #[must_use]
    pub const fn template(&self) -> &HostileTemplate {
        &self.template
    }

    /// Simulation time at which the hostile enters the field.
    #[must_use]
    pub const fn arrival(&self) -> Duration {
        self.arrival
    }

    /// Buffs applied to the hostile when it spawns.
    #[must_use]
    pub fn buffs(&self) -> &[BuffGrant] {
        &self.buffs
    }
}

/// Arrivals ordered by non-decreasing arrival time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpawnQueue {
    entries: VecDeque<Arrival>,
}

impl SpawnQueue {
    /// Creates a queue ordered by arrival time.
    ///
    /// Arrivals sharing a time keep their relative order. Level data is checked
    /// for ordering by [`road_defence_core::LevelDescriptor::validate`].
    #[must_use]
    pub fn new(mut arrivals: Vec<Arrival>) -> Self {
        arrivals.sort_by_key(Arrival::arrival);
        Self {
            entries: arrivals.into(),
        }
    }

    /// Builds a queue of built-in hostiles from level data.
    #[must_use]
    pub fn from_descriptors(spawns: &[SpawnDescriptor]) -> Self {
        Self::new(
            spawns
                .iter()
                .map(|spawn| {
                    Arrival::new(spawn.hostile.template(), spawn.arrival(), spawn.buffs.clone())
                })
                .collect(),
        )
    }

    /// Removes and returns every arrival due at or before `clock`, in order.
    pub fn drain_due(&mut self, clock: Duration) -> Vec<Arrival> {
        let due = self
            .entries
            .iter()
            .take_while(|arrival| arrival.arrival <= clock)
            .count();
        self.entries.drain(..due).collect()
    }

    /// Arrival time of the next queued hostile.
    #[must_use]
    pub fn next_arrival(&self) -> Option<Duration> {
        self.entries.front().map(Arrival::arrival)
    }

    /// Number of hostiles still queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether every queued hostile has entered the field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Seeded chooser of the start tile each hostile spawns on.
#[derive(Clone, Debug)]
pub struct StartSelector {
    rng: ChaCha8Rng,
}

impl StartSelector {
    /// Creates a selector whose choices are fixed by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Picks one of `starts`; the generator is only consulted when there is a choice.
    pub fn pick(&mut self, starts: &[TileIndex]) -> Option<TileIndex> {
        match starts {
            [] => None,
            [only] => Some(*only),
            _ => starts.get(self.rng.gen_range(0..starts.len())).copied(),
        }
    }
}
