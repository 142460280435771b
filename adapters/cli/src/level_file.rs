use std::{fs, path::Path};

use anyhow::{Context, Result};
use road_defence_core::{ConfigError, LevelDescriptor};
use thiserror::Error;

/// Errors raised while turning level text into a descriptor.
#[derive(Debug, Error)]
pub(crate) enum LevelFileError {
    /// The text is not a well-formed level document.
    #[error("could not parse level document: {0}")]
    Malformed(#[from] toml::de::Error),
    /// The document parsed but describes an unusable level.
    #[error("level data is invalid: {0}")]
    Invalid(#[from] ConfigError),
}

/// Parses and validates a level document.
pub(crate) fn parse(text: &str) -> Result<LevelDescriptor, LevelFileError> {
    let level: LevelDescriptor = toml::from_str(text)?;
    level.validate()?;
    Ok(level)
}

/// Reads the level stored at `path`.
pub(crate) fn load(path: &Path) -> Result<LevelDescriptor> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to load level {}", path.display()))
}
