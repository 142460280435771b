//! Immutable runtime parameters shared by the grid and the scheduler.

use std::time::Duration;

use crate::ConfigError;

/// Side length of a tile in world units used by adapters when none is supplied.
pub const DEFAULT_TILE_LENGTH: f64 = 48.0;

/// Refresh rate used by adapters when none is supplied.
pub const DEFAULT_FPS: f64 = 59.0;

/// Runtime parameters fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    tile_length: f64,
    tick_interval: Duration,
}

impl SimulationConfig {
    /// Creates a configuration from an explicit tile length and tick interval.
    pub fn new(tile_length: f64, tick_interval: Duration) -> Result<Self, ConfigError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(ConfigError::InvalidTileLength(tile_length));
        }

        if tick_interval.is_zero() {
            return Err(ConfigError::InvalidTickInterval);
        }

        Ok(Self {
            tile_length,
            tick_interval,
        })
    }

    /// Creates a configuration whose tick interval is derived from a refresh rate.
    ///
    /// The interval is truncated to whole milliseconds, so 59 frames per second
    /// ticks every 16ms.
    pub fn from_fps(tile_length: f64, fps: f64) -> Result<Self, ConfigError> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(ConfigError::InvalidFps(fps));
        }

        let millis = (1_000.0 / fps).floor();
        if millis < 1.0 {
            return Err(ConfigError::InvalidTickInterval);
        }

        Self::new(tile_length, Duration::from_millis(millis as u64))
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f64 {
        self.tile_length
    }

    /// Simulated time covered by one field update.
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}
