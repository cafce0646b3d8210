use anyhow::Result;
use rand::seq::SliceRandom;

use crate::{
    engine::System,
    entity::{EntityId, Kind},
    grid::{Position, CARDINAL},
    rng::SystemRng,
    world::World,
};

use super::try_spawn_offspring;

/// Grazer behavior: reproduce when hungry enough, then eat or move.
/// Priorities are graze in place, flee the nearest predator, walk toward
/// the nearest plant, wander. Entering a cell that holds a live plant
/// always grazes it.
pub struct HerbivoreSystem;

impl HerbivoreSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HerbivoreSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for HerbivoreSystem {
    fn name(&self) -> &str {
        "herbivores"
    }

    fn run(&mut self, world: &mut World, rng: &mut SystemRng<'_>) -> Result<()> {
        for id in world.live_ids_of(Kind::Herbivore) {
            let state = match world.entity(id).filter(|e| !e.is_dead()) {
                Some(entity) => entity.animal().cloned(),
                None => continue,
            };
            let state = match state {
                Some(state) => state,
                None => continue,
            };

            if state.hunger >= state.reproduction_threshold {
                let cap = world.params.herbivore.max_population;
                try_spawn_offspring(world, rng, id, Kind::Herbivore, cap);
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

    // Graze in place: own cell first, then cardinal neighbors.
    let mut cells = vec![position];
    cells.extend(grid.neighbors(position));
    for cell in cells {
        if let Some(plant) = world.live_occupant_of(cell, Kind::Vegetation) {
            graze(world, id, plant);
            return;
        }
    }

    // Flee the nearest predator while it is close, even if that means
    // standing pinned against a wall.
    let flee_distance = world.params.herbivore.flee_distance;
    if flee_distance > 0 {
        if let Some(threat_pos) = world
            .find_nearest(id, Kind::Carnivore)
            .and_then(|threat| world.entity(threat))
            .map(|e| e.position)
        {
            if grid.distance(position, threat_pos) <= flee_distance {
                let target = grid.clamp(position.away_from(threat_pos));
                if target != position && !world.cell_blocks_animal(target) {
                    enter_cell(world, id, target);
                }
                return;
            }
        }
    }

    // Head for the nearest plant.
    if let Some(plant_pos) = world
        .find_nearest(id, Kind::Vegetation)
        .and_then(|plant| world.entity(plant))
        .map(|e| e.position)
    {
        let target = grid.clamp(position.toward(plant_pos));
        if target != position && !world.cell_blocks_animal(target) {
            enter_cell(world, id, target);
        }
        return;
    }

    // Wander: first cardinal neighbor not blocked by another animal.
    let mut dirs = CARDINAL;
    dirs.shuffle(rng);
    for (dx, dy) in dirs {
        let target = position.step(dx, dy);
        if !grid.contains(target) || world.cell_blocks_animal(target) {
            continue;
        }
        enter_cell(world, id, target);
        return;
    }
}

fn enter_cell(world: &mut World, id: EntityId, cell: Position) {
    world.move_entity(id, cell);
    if let Some(plant) = world.live_occupant_of(cell, Kind::Vegetation) {
        graze(world, id, plant);
    }
}

/// One bite: the plant yields its configured food value, the grazer gains
/// that much health and forgets its hunger. The plant may survive the bite
/// and regrow later.
fn graze(world: &mut World, id: EntityId, plant_id: EntityId) {
    let gain = match world.entity(plant_id).filter(|p| !p.is_dead()) {
        Some(plant) => plant.food_value(),
        None => return,
    };
    if let Some(plant) = world.entity_mut(plant_id) {
        plant.be_eaten(gain);
    }
    if let Some(me) = world.entity_mut(id) {
        me.health += gain;
        if let Some(state) = me.animal_mut() {
            state.hunger = 0;
        }
    }
}
