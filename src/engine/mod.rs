use std::path::PathBuf;

use anyhow::Result;

use crate::{
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    world::{PopulationCounts, World, WorldSnapshot},
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn push_system(&mut self, system: impl System + 'static) {
        self.systems.push(Box::new(system));
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    /// Advance the world by exactly one step. Systems run in registration
    /// order, each over its own named RNG stream; the world's deferred
    /// spawns and removals are applied by the bookkeeping system before the
    /// tick counter advances.
    pub fn tick(&mut self, world: &mut World) -> Result<TickSummary> {
        for system in &mut self.systems {
            let mut stream = self.rng.stream(system.name());
            system.run(world, &mut stream)?;
        }
        world.advance_time();
        let snapshot_path = self
            .snapshot_writer
            .maybe_write(world, &self.settings.scenario_name)?;
        Ok(TickSummary {
            tick: world.tick(),
            births: world.bookkeeping.births,
            deaths: world.bookkeeping.deaths,
            populations: world.populations(),
            snapshot_path,
        })
    }

    pub fn run(&mut self, world: &mut World, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.tick(world)?;
        }
        Ok(())
    }

    /// Like `run`, but hands a fresh snapshot to `hook` after every tick.
    /// The web viewer feeds its frame stream from this.
    pub fn run_with_hook(
        &mut self,
        world: &mut World,
        ticks: u64,
        mut hook: impl FnMut(WorldSnapshot),
    ) -> Result<()> {
        for _ in 0..ticks {
            self.tick(world)?;
            hook(world.snapshot(&self.settings.scenario_name));
        }
        Ok(())
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }
}

#[derive(Clone, Debug)]
pub struct TickSummary {
    pub tick: u64,
    pub births: u64,
    pub deaths: u64,
    pub populations: PopulationCounts,
    pub snapshot_path: Option<PathBuf>,
}

pub trait System: Send {
    fn name(&self) -> &str;
    fn run(&mut self, world: &mut World, rng: &mut SystemRng<'_>) -> Result<()>;
}
