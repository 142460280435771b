//! Immutable tile grid and road graph of a level.

use std::collections::BTreeMap;

use glam::DVec2;

use crate::{ConfigError, Direction, GridDescriptor, RoadRole, TileIndex, POSITION_TOLERANCE};

/// Role of a tile on the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    /// Open ground hostiles never walk on.
    Ground,
    /// Ordinary road segment.
    Road,
    /// Road segment where hostiles spawn.
    Start,
    /// Road segment hostiles try to reach.
    Objective,
}

impl TileKind {
    /// Whether hostiles may travel over the tile.
    #[must_use]
    pub const fn is_road(self) -> bool {
        !matches!(self, Self::Ground)
    }
}

/// Mapping from inbound travel direction to outbound travel direction.
///
/// A missing entry is the zero vector: a hostile arriving that way stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct RoadRemap {
    exits: [Option<Direction>; 4],
}

impl RoadRemap {
    /// Creates a remap table without any exits.
    #[must_use]
    pub const fn empty() -> Self {
        Self { exits: [None; 4] }
    }

    /// Returns a copy of the table routing `inbound` to `outbound`.
    #[must_use]
    pub const fn with(mut self, inbound: Direction, outbound: Direction) -> Self {
        self.exits[inbound.slot()] = Some(outbound);
        self
    }

    /// Outbound direction for a hostile travelling `inbound`, if any.
    #[must_use]
    pub const fn outbound(&self, inbound: Direction) -> Option<Direction> {
        self.exits[inbound.slot()]
    }
}

/// A single cell of the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    index: TileIndex,
    kind: TileKind,
    remap: RoadRemap,
}

impl Tile {
    /// Location of the tile.
    #[must_use]
    pub const fn index(&self) -> TileIndex {
        self.index
    }

    /// Role of the tile.
    #[must_use]
    pub const fn kind(&self) -> TileKind {
        self.kind
    }

    /// Direction remap table; empty for ground.
    #[must_use]
    pub const fn remap(&self) -> &RoadRemap {
        &self.remap
    }
}

/// Immutable per-level grid of tiles stored in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadGrid {
    columns: u32,
    rows: u32,
    tile_length: f64,
    tiles: Vec<Tile>,
    starts: Vec<TileIndex>,
    objectives: Vec<TileIndex>,
}

impl RoadGrid {
    /// Builds the grid described by a level, scaled by `tile_length`.
    ///
    /// Start and objective lists keep the order roads appear in the descriptor.
    pub fn from_descriptor(
        descriptor: &GridDescriptor,
        tile_length: f64,
    ) -> Result<Self, ConfigError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(ConfigError::InvalidTileLength(tile_length));
        }

        let (rows, columns) = (descriptor.rows, descriptor.columns);
        let capacity = usize::try_from(u64::from(rows) * u64::from(columns)).unwrap_or(0);
        if capacity == 0 {
            return Err(ConfigError::EmptyGrid { rows, columns });
        }

        let mut roads: BTreeMap<TileIndex, (TileKind, RoadRemap)> = BTreeMap::new();
        let mut starts = Vec::new();
        let mut objectives = Vec::new();
        for road in &descriptor.roads {
            let tile = TileIndex::new(road.column, road.row);
            if road.row >= rows || road.column >= columns {
                return Err(ConfigError::RoadOutOfBounds { tile });
            }

            let kind = match road.role {
                RoadRole::Normal => TileKind::Road,
                RoadRole::Start => {
                    starts.push(tile);
                    TileKind::Start
                }
                RoadRole::Objective => {
                    objectives.push(tile);
                    TileKind::Objective
                }
            };

            if roads.insert(tile, (kind, road.remap.to_remap())).is_some() {
                return Err(ConfigError::DuplicateRoad { tile });
            }
        }

        let mut tiles = Vec::with_capacity(capacity);
        for row in 0..rows {
            for column in 0..columns {
                let index = TileIndex::new(column, row);
                let (kind, remap) = roads
                    .get(&index)
                    .copied()
                    .unwrap_or((TileKind::Ground, RoadRemap::empty()));
                tiles.push(Tile { index, kind, remap });
            }
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            tiles,
            starts,
            objectives,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a tile in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f64 {
        self.tile_length
    }

    /// Tile at the provided index, if inside the grid.
    #[must_use]
    pub fn tile(&self, index: TileIndex) -> Option<&Tile> {
        self.offset(index).and_then(|offset| self.tiles.get(offset))
    }

    /// Road tile at the provided index; `None` for ground or out of bounds.
    #[must_use]
    pub fn road(&self, index: TileIndex) -> Option<&Tile> {
        self.tile(index).filter(|tile| tile.kind().is_road())
    }

    /// Every tile in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Tiles hostiles spawn on.
    #[must_use]
    pub fn start_tiles(&self) -> &[TileIndex] {
        &self.starts
    }

    /// Tiles hostiles try to reach.
    #[must_use]
    pub fn objective_tiles(&self) -> &[TileIndex] {
        &self.objectives
    }

    /// Whether the tile is a protected objective.
    #[must_use]
    pub fn is_objective(&self, index: TileIndex) -> bool {
        self.tile(index)
            .map_or(false, |tile| tile.kind() == TileKind::Objective)
    }

    /// Anchor point of the tile in world units: its corner with the smallest
    /// coordinates.
    #[must_use]
    pub fn anchor(&self, index: TileIndex) -> DVec2 {
        DVec2::new(
            f64::from(index.column()) * self.tile_length,
            f64::from(index.row()) * self.tile_length,
        )
    }

    /// Tile containing a world position, if it lies inside the grid.
    ///
    /// Positions within [`POSITION_TOLERANCE`] below an anchor snap up onto
    /// that anchor's tile.
    #[must_use]
    pub fn locate(&self, position: DVec2) -> Option<TileIndex> {
        let column = ((position.x + POSITION_TOLERANCE) / self.tile_length).floor();
        let row = ((position.y + POSITION_TOLERANCE) / self.tile_length).floor();
        if column < 0.0 || row < 0.0 {
            return None;
        }
        if column >= f64::from(self.columns) || row >= f64::from(self.rows) {
            return None;
        }

        Some(TileIndex::new(column as u32, row as u32))
    }

    fn offset(&self, index: TileIndex) -> Option<usize> {
        if index.column() >= self.columns || index.row() >= self.rows {
            return None;
        }

        let row = usize::try_from(index.row()).ok()?;
        let column = usize::try_from(index.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}
