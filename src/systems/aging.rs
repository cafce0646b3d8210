use anyhow::Result;

use crate::{engine::System, rng::SystemRng, world::World};

/// The base lifecycle step, run for every entity before any species
/// behavior: advance age, die at end of lifespan. Later systems skip
/// whatever this one killed.
pub struct AgingSystem;

impl AgingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AgingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AgingSystem {
    fn name(&self) -> &str {
        "aging"
    }

    fn run(&mut self, world: &mut World, _rng: &mut SystemRng<'_>) -> Result<()> {
        for id in world.live_ids() {
            if let Some(entity) = world.entity_mut(id) {
                entity.grow_older();
            }
        }
        Ok(())
    }
}
