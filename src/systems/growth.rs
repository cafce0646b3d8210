use anyhow::Result;
use rand::Rng;

use crate::{engine::System, entity::Kind, rng::SystemRng, world::World};

/// Vegetation dynamics: stochastic regrowth of standing plants and
/// sprouting of new plants on empty cells.
pub struct GrowthSystem;

impl GrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for GrowthSystem {
    fn name(&self) -> &str {
        "growth"
    }

    fn run(&mut self, world: &mut World, rng: &mut SystemRng<'_>) -> Result<()> {
        for id in world.live_ids_of(Kind::Vegetation) {
            let entity = match world.entity_mut(id) {
                Some(entity) => entity,
                None => continue,
            };
            let (max_health, regrowth_rate) = match entity.vegetation() {
                Some(veg) => (veg.max_health, veg.regrowth_rate),
                None => continue,
            };
            if entity.health < max_health && rng.percent(regrowth_rate) {
                entity.health += 1;
            }
        }

        let spawn_chance = world.params.vegetation.spawn_chance;
        if spawn_chance > 0.0 {
            let grid = world.grid();
            for pos in grid.positions() {
                if world.cell_is_empty(pos) && rng.gen_bool(spawn_chance) {
                    world.queue_spawn(Kind::Vegetation, pos);
                }
            }
        }
        Ok(())
    }
}
