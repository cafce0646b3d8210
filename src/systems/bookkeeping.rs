use anyhow::Result;

use crate::{engine::System, rng::SystemRng, world::World};

/// Final phase of every tick: prune the dead, admit the newborns, record
/// births and deaths for the tick summary.
pub struct BookkeepingSystem;

impl BookkeepingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BookkeepingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &str {
        "bookkeeping"
    }

    fn run(&mut self, world: &mut World, _rng: &mut SystemRng<'_>) -> Result<()> {
        world.finish_tick();
        Ok(())
    }
}
