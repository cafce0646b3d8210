mod aging;
mod bookkeeping;
mod carnivore;
mod growth;
mod herbivore;
mod metabolism;

pub use aging::AgingSystem;
pub use bookkeeping::BookkeepingSystem;
pub use carnivore::CarnivoreSystem;
pub use growth::GrowthSystem;
pub use herbivore::HerbivoreSystem;
pub use metabolism::MetabolismSystem;

use crate::{
    entity::{EntityId, Kind},
    rng::SystemRng,
    world::World,
};

/// Reproduction scaffold shared by both animal variants: respect the
/// species cap (live plus already-queued), find a shuffled empty adjacent
/// cell, queue the offspring, and charge the parent by resetting its hunger.
/// Any missing precondition is a silent no-op and leaves hunger untouched,
/// so the parent retries next tick.
pub(crate) fn try_spawn_offspring(
    world: &mut World,
    rng: &mut SystemRng<'_>,
    parent: EntityId,
    kind: Kind,
    cap: Option<u32>,
) -> bool {
    if let Some(cap) = cap {
        if world.count(kind) + world.pending_count(kind) >= cap as usize {
            return false;
        }
    }
    let position = match world.entity(parent) {
        Some(entity) => entity.position,
        None => return false,
    };
    let cell = match world.find_empty_adjacent(position, rng) {
        Some(cell) => cell,
        None => return false,
    };
    world.queue_spawn(kind, cell);
    if let Some(state) = world.entity_mut(parent).and_then(|e| e.animal_mut()) {
        state.hunger = 0;
    }
    true
}
