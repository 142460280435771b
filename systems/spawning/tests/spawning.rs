use std::time::Duration;

use road_defence_core::{Buff, BuffGrant, HostileKind, SpawnDescriptor, TileIndex};
use road_defence_system_spawning::{SpawnQueue, StartSelector};

fn spawn(hostile: HostileKind, arrival_ms: u64) -> SpawnDescriptor {
    SpawnDescriptor {
        hostile,
        arrival_ms,
        buffs: Vec::new(),
    }
}

#[test]
fn arrivals_are_released_once_the_clock_reaches_them() {
    let mut burning = spawn(HostileKind::Ogre, 250);
    burning.buffs.push(BuffGrant {
        buff: Buff::Burning,
        duration_ms: 1_000,
    });
    let mut queue = SpawnQueue::from_descriptors(&[
        spawn(HostileKind::Boar, 0),
        spawn(HostileKind::Boar, 0),
        burning,
        spawn(HostileKind::Boar, 900),
    ]);

    let first = queue.drain_due(Duration::ZERO);
    assert_eq!(first.len(), 2);
    assert_eq!(queue.len(), 2);

    assert!(queue.drain_due(Duration::from_millis(249)).is_empty());
    assert_eq!(queue.next_arrival(), Some(Duration::from_millis(250)));

    let second = queue.drain_due(Duration::from_millis(250));
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].template().kind(), HostileKind::Ogre);
    assert_eq!(second[0].buffs()[0].buff, Buff::Burning);

    let rest = queue.drain_due(Duration::from_secs(5));
    assert_eq!(rest.len(), 1);
    assert!(queue.is_empty());
    assert_eq!(queue.next_arrival(), None);
}

#[test]
fn start_selection_is_reproducible_per_seed() {
    let starts = [
        TileIndex::new(0, 0),
        TileIndex::new(0, 4),
        TileIndex::new(0, 8),
    ];

    let picks = |seed: u64| {
        let mut selector = StartSelector::new(seed);
        (0..32)
            .map(|_| selector.pick(&starts).expect("start"))
            .collect::<Vec<_>>()
    };

    let first = picks(42);
    assert_eq!(first, picks(42));
    assert!(first.iter().all(|tile| starts.contains(tile)));
    assert!(
        starts.iter().all(|tile| first.contains(tile)),
        "32 draws should visit every start tile"
    );
}
