use anyhow::Result;
use rand::seq::SliceRandom;

use crate::{
    engine::System,
    entity::{EntityId, Kind},
    grid::CARDINAL,
    rng::SystemRng,
    world::World,
};

use super::try_spawn_offspring;

/// Predator behavior: reproduce when hungry enough, kill adjacent prey,
/// otherwise close in on the nearest herbivore, otherwise wander into
/// empty cells.
pub struct CarnivoreSystem;

impl CarnivoreSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CarnivoreSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for CarnivoreSystem {
    fn name(&self) -> &str {
        "carnivores"
    }

    fn run(&mut self, world: &mut World, rng: &mut SystemRng<'_>) -> Result<()> {
        for id in world.live_ids_of(Kind::Carnivore) {
            let state = match world.entity(id).filter(|e| !e.is_dead()) {
                Some(entity) => entity.animal().cloned(),
                None => continue,
            };
            let state = match state {
                Some(state) => state,
                None => continue,
            };

            if state.hunger >= state.reproduction_threshold {
                let cap = world.params.carnivore.max_population;
                try_spawn_offspring(world, rng, id, Kind::Carnivore, cap);
            }

            act(world, rng, id);
        }
        Ok(())
    }
}

fn act(world: &mut World, rng: &mut SystemRng<'_>, id: EntityId) {
    let position = match world.entity(id).filter(|e| !e.is_dead()) {
        Some(entity) => entity.position,
        None => return,
    };
    let grid = world.grid();

    // Hunt: prey sharing the cell or a cardinal neighbor dies first.
    let mut cells = vec![position];
    cells.extend(grid.neighbors(position));
    for cell in cells {
        if let Some(prey) = world.live_occupant_of(cell, Kind::Herbivore) {
            consume(world, id, prey);
            world.move_entity(id, cell);
            return;
        }
    }

    // Chase the nearest herbivore, eating whatever prey the step lands on
    // (a diagonal step can reach cells the hunt pass above did not cover).
    if let Some(prey_pos) = world
        .find_nearest(id, Kind::Herbivore)
        .and_then(|prey| world.entity(prey))
        .map(|e| e.position)
    {
        let target = grid.clamp(position.toward(prey_pos));
        if target == position {
            return;
        }
        if let Some(prey) = world.live_occupant_of(target, Kind::Herbivore) {
            consume(world, id, prey);
            world.move_entity(id, target);
        } else if !world.cell_blocks_animal(target) {
            world.move_entity(id, target);
        }
        return;
    }

    // Wander, but only into truly empty cells.
    let mut dirs = CARDINAL;
    dirs.shuffle(rng);
    for (dx, dy) in dirs {
        let target = position.step(dx, dy);
        if grid.contains(target) && world.cell_is_empty(target) {
            world.move_entity(id, target);
            return;
        }
    }
}

/// A kill transfers half the prey's health, as measured at this instant,
/// and removes the prey from the world at end of tick.
fn consume(world: &mut World, id: EntityId, prey_id: EntityId) {
    let gain = match world.entity(prey_id).filter(|p| !p.is_dead()) {
        Some(prey) => prey.food_value(),
        None => return,
    };
    if let Some(prey) = world.entity_mut(prey_id) {
        prey.kill();
    }
    if let Some(me) = world.entity_mut(id) {
        me.health += gain;
        if let Some(state) = me.animal_mut() {
            state.hunger = 0;
        }
    }
}
