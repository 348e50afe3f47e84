//! Configuration errors.
//!
//! Everything is checked once when a `Simulation` is built. Systems then treat the
//! tunables as trusted and never re-validate in the tick loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("`{field}` must be a probability in [0, 1], got {value}")]
    NotAProbability { field: &'static str, value: f32 },

    #[error("`{field}` weights must contain at least one positive entry")]
    NoPositiveWeight { field: &'static str },

    #[error("`{field}` has no firing pattern")]
    MissingPattern { field: &'static str },

    #[error("`{field}` cost must be within 0..={budget}, got {value}")]
    Cost { field: &'static str, value: f32, budget: f32 },

    #[error("`{archetype}` needs at least one boss phase")]
    NoBossPhases { archetype: &'static str },

    #[error("{archetype} boss phase {index}: thresholds must start at 1.0 and strictly decrease")]
    PhaseThresholds { archetype: &'static str, index: usize },

    #[error("wave weight table must be non-empty, start at wave 1 and be sorted by wave")]
    WaveTable,

    #[error("projectile pool `{pool}` needs a non-zero capacity")]
    EmptyPool { pool: &'static str },

    #[error("player lives: starting {starting} must be in 1..={max}")]
    Lives { starting: u32, max: u32 },

    #[error("playfield {width}x{height} leaves no room for spawn margin {margin}")]
    Playfield { width: f32, height: f32, margin: f32 },

    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
