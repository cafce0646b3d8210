use thiserror::Error;

/// Construction-time configuration failures. These fail fast at
/// `Scenario::build_world`; nothing inside a tick can raise them.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("world dimensions must be positive, got {width}x{height}")]
    Dimensions { width: i32, height: i32 },

    #[error("{species}: lifespan must be positive")]
    Lifespan { species: &'static str },

    #[error("{species}: initial health must be positive")]
    InitialHealth { species: &'static str },

    #[error("{species}: reproduction threshold must be positive")]
    ReproductionThreshold { species: &'static str },

    #[error("vegetation: regrowth rate is a percentage, got {0}")]
    RegrowthRate(u32),

    #[error("vegetation: spawn chance must be within [0, 1], got {0}")]
    SpawnChance(f64),
}
