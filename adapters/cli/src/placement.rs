use std::str::FromStr;

use road_defence_core::{Buff, Command, DefenderKind, TileIndex};
use serde::de::{
    value::{Error as ValueError, StrDeserializer},
    DeserializeOwned, IntoDeserializer,
};
use thiserror::Error;

/// Defender placed before the level starts, written `kind@column,row[+buff...]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Placement {
    kind: DefenderKind,
    tile: TileIndex,
    buffs: Vec<Buff>,
}

impl Placement {
    /// Commands that place the defender and grant its buffs.
    pub(crate) fn commands(&self) -> impl Iterator<Item = Command> + '_ {
        let place = Command::PlaceDefender {
            kind: self.kind,
            tile: self.tile,
        };
        std::iter::once(place).chain(self.buffs.iter().map(move |buff| {
            Command::ToggleDefenderBuff {
                tile: self.tile,
                buff: *buff,
            }
        }))
    }
}

/// Errors raised while parsing a placement argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum PlacementParseError {
    /// The `@` separating the kind from the tile is missing.
    #[error("expected kind@column,row, got '{0}'")]
    MissingTile(String),
    /// The defender kind is not recognised.
    #[error("unknown defender kind '{0}'")]
    UnknownKind(String),
    /// The tile coordinates could not be parsed.
    #[error("could not parse tile '{0}'")]
    InvalidTile(String),
    /// A buff name is not recognised.
    #[error("unknown buff '{0}'")]
    UnknownBuff(String),
}

impl FromStr for Placement {
    type Err = PlacementParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, rest) = value
            .trim()
            .split_once('@')
            .ok_or_else(|| PlacementParseError::MissingTile(value.to_owned()))?;
        let kind = parse_name::<DefenderKind>(kind)
            .ok_or_else(|| PlacementParseError::UnknownKind(kind.to_owned()))?;

        let mut parts = rest.split('+');
        let tile = parts.next().unwrap_or_default();
        let tile = parse_tile(tile)
            .ok_or_else(|| PlacementParseError::InvalidTile(tile.to_owned()))?;
        let buffs = parts
            .map(|name| {
                parse_name::<Buff>(name)
                    .ok_or_else(|| PlacementParseError::UnknownBuff(name.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { kind, tile, buffs })
    }
}

/// Resolves a closed enum from the same lowercase names level files use.
fn parse_name<T: DeserializeOwned>(name: &str) -> Option<T> {
    let deserializer: StrDeserializer<'_, ValueError> = name.trim().into_deserializer();
    T::deserialize(deserializer).ok()
}

fn parse_tile(tile: &str) -> Option<TileIndex> {
    let (column, row) = tile.split_once(',')?;
    let column = column.trim().parse().ok()?;
    let row = row.trim().parse().ok()?;
    Some(TileIndex::new(column, row))
}
