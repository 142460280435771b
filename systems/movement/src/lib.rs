#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Path-following movement for hostiles travelling the road network.
//!
//! Hostiles move in continuous world coordinates but change heading only on
//! tile anchors, where the remap table of the tile whose anchor was reached
//! decides the outbound direction. Each tick's travel distance is spent in
//! sub-steps of at most half a tile so that a single sub-step never crosses
//! more than one tile edge.

use std::time::Duration;

use glam::DVec2;
use road_defence_core::{
    points_coincide, Direction, RoadGrid, Tile, TileIndex, TileKind, POSITION_TOLERANCE,
};
use thiserror::Error;

/// Failures raised while advancing a hostile.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum MovementError {
    /// The hostile stands on, or would step onto, ground or a position outside the grid.
    #[error("position {position} lies off the road network")]
    OffRoad {
        /// Offending world position.
        position: DVec2,
    },
}

/// Continuous position and heading of a single hostile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    position: DVec2,
    heading: Option<Direction>,
}

impl Motion {
    /// Creates a motion state; a missing heading means the hostile has stopped.
    #[must_use]
    pub const fn new(position: DVec2, heading: Option<Direction>) -> Self {
        Self { position, heading }
    }

    /// Creates the motion state of a hostile entering the field on `tile`.
    ///
    /// The hostile stands on the tile anchor and takes the first outbound
    /// direction found while probing inbound directions in
    /// [`Direction::SPAWN_PROBE_ORDER`].
    #[must_use]
    pub fn spawn(grid: &RoadGrid, tile: &Tile) -> Self {
        Self::new(grid.anchor(tile.index()), initial_heading(tile))
    }

    /// Position in world units.
    #[must_use]
    pub const fn position(&self) -> DVec2 {
        self.position
    }

    /// Current heading, or `None` once the hostile has stopped.
    #[must_use]
    pub const fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Whether the hostile has stopped moving.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.heading.is_none()
    }
}

/// Heading a hostile adopts when it appears on `tile`.
#[must_use]
pub fn initial_heading(tile: &Tile) -> Option<Direction> {
    Direction::SPAWN_PROBE_ORDER
        .into_iter()
        .find_map(|inbound| tile.remap().outbound(inbound))
}

/// Distance in world units covered at `speed` world units per second during `dt`.
///
/// Time is counted in whole milliseconds.
#[must_use]
pub fn travel_distance(speed: f64, dt: Duration) -> f64 {
    speed * dt.as_millis() as f64 / 1_000.0
}

/// Advances `motion` by `distance` world units along the road network.
///
/// Movement ends early once the hostile stops, either because it reached an
/// objective tile or because a remap table had no exit for its heading.
pub fn advance(
    grid: &RoadGrid,
    motion: &mut Motion,
    distance: f64,
) -> Result<(), MovementError> {
    let half_tile = grid.tile_length() / 2.0;
    let mut remaining = distance;

    while remaining > POSITION_TOLERANCE {
        let Some(heading) = motion.heading else {
            break;
        };

        let mut step = half_tile.min(remaining);
        remaining -= step;

        let current = road_at(grid, motion.position)?;
        let candidate = motion.position + heading.unit() * step;
        let candidate_index = grid.locate(candidate);

        if candidate_index == Some(current.index()) {
            motion.position = candidate;
            let anchor = grid.anchor(current.index());
            if points_coincide(candidate, anchor) {
                motion.position = anchor;
                motion.heading = exit(current, heading);
            }
            continue;
        }

        if heading.is_negative_axis() {
            // Leaving through the near edge passes the current tile's anchor.
            let anchor = grid.anchor(current.index());
            step -= manhattan(anchor, motion.position);
            if !points_coincide(motion.position, anchor) {
                motion.heading = current.remap().outbound(heading);
            }
            motion.position = anchor;

            if current.kind() == TileKind::Objective {
                motion.heading = None;
                break;
            }

            let continued = half_tile.min(step.max(0.0));
            step -= continued;
            if let Some(next) = motion.heading {
                let position = motion.position + next.unit() * continued;
                let _ = road_at(grid, position)?;
                motion.position = position;
            }
        } else {
            let entered = candidate_index
                .and_then(|index| grid.road(index))
                .ok_or(MovementError::OffRoad {
                    position: candidate,
                })?;
            let anchor = grid.anchor(entered.index());
            step -= manhattan(anchor, motion.position);
            motion.position = anchor;
            motion.heading = exit(entered, heading);

            if motion.heading.is_none() {
                break;
            }
        }

        if step > POSITION_TOLERANCE {
            remaining += step;
        }
    }

    Ok(())
}

fn exit(tile: &Tile, inbound: Direction) -> Option<Direction> {
    if tile.kind() == TileKind::Objective {
        return None;
    }

    tile.remap().outbound(inbound)
}

fn road_at(grid: &RoadGrid, position: DVec2) -> Result<&Tile, MovementError> {
    grid.locate(position)
        .and_then(|index: TileIndex| grid.road(index))
        .ok_or(MovementError::OffRoad { position })
}

fn manhattan(first: DVec2, second: DVec2) -> f64 {
    let gap = (first - second).abs();
    gap.x + gap.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use road_defence_core::{GridDescriptor, RemapDescriptor, RoadDescriptor, RoadRole};

    fn grid(roads: Vec<RoadDescriptor>, rows: u32, columns: u32) -> RoadGrid {
        RoadGrid::from_descriptor(
            &GridDescriptor {
                rows,
                columns,
                roads,
            },
            10.0,
        )
        .expect("grid")
    }

    fn east(row: u32, column: u32, role: RoadRole) -> RoadDescriptor {
        RoadDescriptor {
            row,
            column,
            remap: RemapDescriptor {
                east: Some(Direction::East),
                ..RemapDescriptor::default()
            },
            role,
        }
    }

    #[test]
    fn travel_distance_uses_whole_milliseconds() {
        let distance = travel_distance(72.0, Duration::from_micros(16_900));
        assert!((distance - 72.0 * 0.016).abs() < 1e-12);
    }

    #[test]
    fn spawn_probes_west_before_other_directions() {
        let roads = vec![RoadDescriptor {
            row: 0,
            column: 0,
            remap: RemapDescriptor {
                north: Some(Direction::North),
                east: Some(Direction::South),
                ..RemapDescriptor::default()
            },
            role: RoadRole::Start,
        }];
        let grid = grid(roads, 1, 1);
        let tile = grid.tile(TileIndex::new(0, 0)).expect("tile");
        // West and South have no exit; East is probed before North.
        assert_eq!(initial_heading(tile), Some(Direction::South));
        assert_eq!(Motion::spawn(&grid, tile).position(), DVec2::ZERO);
    }

    #[test]
    fn positive_crossing_takes_entered_tile_heading() {
        let grid = grid(
            vec![
                east(0, 0, RoadRole::Start),
                east(0, 1, RoadRole::Normal),
                east(0, 2, RoadRole::Objective),
            ],
            1,
            3,
        );
        let mut motion = Motion::new(DVec2::ZERO, Some(Direction::East));
        advance(&grid, &mut motion, 20.0).expect("advance");
        assert_eq!(motion.position(), DVec2::new(20.0, 0.0));
        assert!(motion.is_stopped());
    }

    #[test]
    fn stopped_motion_does_not_move() {
        let grid = grid(vec![east(0, 0, RoadRole::Normal)], 1, 1);
        let mut motion = Motion::new(DVec2::ZERO, None);
        advance(&grid, &mut motion, 50.0).expect("advance");
        assert_eq!(motion.position(), DVec2::ZERO);
    }
}
