use anyhow::Result;

use crate::{engine::System, rng::SystemRng, world::World};

/// Hunger and starvation bookkeeping shared by both animal variants. Every
/// animal pays one health per tick whether or not it feeds later in the
/// same tick; hitting zero health is death on the spot, and the behavior
/// systems will not touch the corpse.
pub struct MetabolismSystem;

impl MetabolismSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MetabolismSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MetabolismSystem {
    fn name(&self) -> &str {
        "metabolism"
    }

    fn run(&mut self, world: &mut World, _rng: &mut SystemRng<'_>) -> Result<()> {
        for id in world.live_ids() {
            let entity = match world.entity_mut(id) {
                Some(entity) => entity,
                None => continue,
            };
            if entity.is_dead() || !entity.kind().is_animal() {
                continue;
            }
            if let Some(state) = entity.animal_mut() {
                state.hunger += 1;
            }
            entity.health = entity.health.saturating_sub(1);
            if entity.health == 0 {
                entity.kill();
            }
        }
        Ok(())
    }
}
