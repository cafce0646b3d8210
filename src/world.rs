use std::collections::HashMap;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::entity::{AnimalState, Entity, EntityId, Kind, Species, VegetationState};
use crate::error::ConfigError;
use crate::grid::{Grid, Position, CARDINAL};
use crate::rng::SystemRng;

fn default_vegetation_health() -> u32 {
    10
}

fn default_vegetation_lifespan() -> u32 {
    100
}

fn default_vegetation_food_value() -> u32 {
    5
}

fn default_regrowth_rate() -> u32 {
    10
}

fn default_spawn_chance() -> f64 {
    0.02
}

fn default_herbivore_health() -> u32 {
    10
}

fn default_herbivore_lifespan() -> u32 {
    200
}

fn default_carnivore_health() -> u32 {
    12
}

fn default_carnivore_lifespan() -> u32 {
    250
}

fn default_reproduction_threshold() -> u32 {
    8
}

fn default_flee_distance() -> u32 {
    5
}

fn default_herbivore_cap() -> Option<u32> {
    Some(500)
}

/// Per-species templates applied when an entity is spawned. Entities copy
/// what they need at spawn time; the templates stay on the world for
/// offspring and seeded plants.
#[derive(Debug, Clone, Deserialize)]
pub struct VegetationParams {
    #[serde(default = "default_vegetation_health")]
    pub initial_health: u32,
    #[serde(default = "default_vegetation_lifespan")]
    pub lifespan: u32,
    #[serde(default = "default_vegetation_food_value")]
    pub food_value: u32,
    #[serde(default = "default_regrowth_rate")]
    pub regrowth_rate: u32,
    /// Chance per empty cell per tick to sprout a new plant.
    #[serde(default = "default_spawn_chance")]
    pub spawn_chance: f64,
}

impl Default for VegetationParams {
    fn default() -> Self {
        Self {
            initial_health: default_vegetation_health(),
            lifespan: default_vegetation_lifespan(),
            food_value: default_vegetation_food_value(),
            regrowth_rate: default_regrowth_rate(),
            spawn_chance: default_spawn_chance(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HerbivoreParams {
    #[serde(default = "default_herbivore_health")]
    pub initial_health: u32,
    #[serde(default = "default_herbivore_lifespan")]
    pub lifespan: u32,
    #[serde(default = "default_reproduction_threshold")]
    pub reproduction_threshold: u32,
    #[serde(default = "default_flee_distance")]
    pub flee_distance: u32,
    #[serde(default = "default_herbivore_cap")]
    pub max_population: Option<u32>,
}

impl Default for HerbivoreParams {
    fn default() -> Self {
        Self {
            initial_health: default_herbivore_health(),
            lifespan: default_herbivore_lifespan(),
            reproduction_threshold: default_reproduction_threshold(),
            flee_distance: default_flee_distance(),
            max_population: default_herbivore_cap(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarnivoreParams {
    #[serde(default = "default_carnivore_health")]
    pub initial_health: u32,
    #[serde(default = "default_carnivore_lifespan")]
    pub lifespan: u32,
    #[serde(default = "default_reproduction_threshold")]
    pub reproduction_threshold: u32,
    #[serde(default)]
    pub max_population: Option<u32>,
}

impl Default for CarnivoreParams {
    fn default() -> Self {
        Self {
            initial_health: default_carnivore_health(),
            lifespan: default_carnivore_lifespan(),
            reproduction_threshold: default_reproduction_threshold(),
            max_population: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpeciesParams {
    #[serde(default)]
    pub vegetation: VegetationParams,
    #[serde(default)]
    pub herbivore: HerbivoreParams,
    #[serde(default)]
    pub carnivore: CarnivoreParams,
}

#[derive(Debug, Default, Clone)]
pub struct BookkeepingState {
    pub births: u64,
    pub deaths: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCounts {
    pub vegetation: usize,
    pub herbivores: usize,
    pub carnivores: usize,
}

/// Read-only projection handed to consumers (renderers, snapshots). This is
/// the only shape the shell sees; it cannot reach back into the arena.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: u64,
    pub kind: Kind,
    pub x: i32,
    pub y: i32,
    pub health: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub width: i32,
    pub height: i32,
    pub populations: PopulationCounts,
    pub entities: Vec<EntityView>,
}

/// Owner of every entity's lifetime. Entities live in an id-ordered arena;
/// ids are allocated monotonically and a stale id simply resolves to "not
/// found". Spawns requested during a tick queue up and join the arena at the
/// bookkeeping phase, so nothing created in a tick is updated in that tick.
pub struct World {
    grid: Grid,
    tick: u64,
    next_entity: u64,
    entities: Vec<Entity>,
    occupancy: HashMap<Position, Vec<EntityId>>,
    pending: Vec<Entity>,
    pub(crate) params: SpeciesParams,
    pub(crate) bookkeeping: BookkeepingState,
}

impl World {
    pub fn new(width: i32, height: i32, params: SpeciesParams) -> Result<Self, ConfigError> {
        Ok(Self {
            grid: Grid::new(width, height)?,
            tick: 0,
            next_entity: 0,
            entities: Vec::new(),
            occupancy: HashMap::new(),
            pending: Vec::new(),
            params,
            bookkeeping: BookkeepingState::default(),
        })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub(crate) fn advance_time(&mut self) {
        self.tick += 1;
    }

    /// Spawn an entity immediately (world seeding and tests). During a tick,
    /// systems must use `queue_spawn` instead.
    pub fn spawn(&mut self, kind: Kind, position: Position) -> EntityId {
        let entity = self.make_entity(kind, position);
        let id = entity.id;
        self.occupancy.entry(position).or_default().push(id);
        self.entities.push(entity);
        id
    }

    /// Queue a spawn for the end of the current tick. The newborn claims its
    /// cell right away (so no other spawn or move double-books it) but is
    /// not part of the update pass until next tick.
    pub(crate) fn queue_spawn(&mut self, kind: Kind, position: Position) -> EntityId {
        let entity = self.make_entity(kind, position);
        let id = entity.id;
        self.occupancy.entry(position).or_default().push(id);
        self.pending.push(entity);
        id
    }

    fn make_entity(&mut self, kind: Kind, position: Position) -> Entity {
        let id = EntityId::new(self.next_entity);
        self.next_entity += 1;
        let position = self.grid.clamp(position);
        match kind {
            Kind::Vegetation => {
                let p = &self.params.vegetation;
                Entity::new(
                    id,
                    position,
                    p.initial_health,
                    p.lifespan,
                    Species::Vegetation(VegetationState {
                        max_health: p.initial_health,
                        food_value: p.food_value,
                        regrowth_rate: p.regrowth_rate,
                    }),
                )
            }
            Kind::Herbivore => {
                let p = &self.params.herbivore;
                Entity::new(
                    id,
                    position,
                    p.initial_health,
                    p.lifespan,
                    Species::Herbivore(AnimalState {
                        hunger: 0,
                        reproduction_threshold: p.reproduction_threshold,
                    }),
                )
            }
            Kind::Carnivore => {
                let p = &self.params.carnivore;
                Entity::new(
                    id,
                    position,
                    p.initial_health,
                    p.lifespan,
                    Species::Carnivore(AnimalState {
                        hunger: 0,
                        reproduction_threshold: p.reproduction_threshold,
                    }),
                )
            }
        }
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        match self.entities.binary_search_by_key(&id, |e| e.id) {
            Ok(index) => Some(&self.entities[index]),
            Err(_) => self.pending.iter().find(|e| e.id == id),
        }
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        match self.entities.binary_search_by_key(&id, |e| e.id) {
            Ok(index) => Some(&mut self.entities[index]),
            Err(_) => self.pending.iter_mut().find(|e| e.id == id),
        }
    }

    /// Snapshot of live ids at this instant, in arena order. Systems iterate
    /// this and re-resolve each id, so entities killed mid-pass are skipped.
    pub fn live_ids(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| !e.is_dead())
            .map(|e| e.id)
            .collect()
    }

    pub fn live_ids_of(&self, kind: Kind) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| !e.is_dead() && e.kind() == kind)
            .map(|e| e.id)
            .collect()
    }

    pub fn count(&self, kind: Kind) -> usize {
        self.entities
            .iter()
            .filter(|e| !e.is_dead() && e.kind() == kind)
            .count()
    }

    pub(crate) fn pending_count(&self, kind: Kind) -> usize {
        self.pending.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn populations(&self) -> PopulationCounts {
        let mut counts = PopulationCounts::default();
        for entity in self.entities.iter().filter(|e| !e.is_dead()) {
            match entity.kind() {
                Kind::Vegetation => counts.vegetation += 1,
                Kind::Herbivore => counts.herbivores += 1,
                Kind::Carnivore => counts.carnivores += 1,
            }
        }
        counts
    }

    fn live_occupants(&self, pos: Position) -> impl Iterator<Item = &Entity> + '_ {
        self.occupancy
            .get(&pos)
            .into_iter()
            .flatten()
            .filter_map(|id| self.entity(*id))
            .filter(|e| !e.is_dead())
    }

    pub fn live_occupant_of(&self, pos: Position, kind: Kind) -> Option<EntityId> {
        self.live_occupants(pos)
            .find(|e| e.kind() == kind)
            .map(|e| e.id)
    }

    /// A cell is empty when nothing alive (or queued to be born) sits on it.
    pub fn cell_is_empty(&self, pos: Position) -> bool {
        self.live_occupants(pos).next().is_none()
    }

    pub fn cell_blocks_animal(&self, pos: Position) -> bool {
        self.live_occupants(pos).any(|e| e.kind().is_animal())
    }

    pub(crate) fn move_entity(&mut self, id: EntityId, to: Position) {
        let from = match self.entity(id) {
            Some(entity) => entity.position,
            None => return,
        };
        if from == to {
            return;
        }
        if let Some(ids) = self.occupancy.get_mut(&from) {
            ids.retain(|&other| other != id);
        }
        self.occupancy.entry(to).or_default().push(id);
        if let Some(entity) = self.entity_mut(id) {
            entity.position = to;
        }
    }

    /// Nearest live entity of `kind` by Manhattan distance; ties resolve to
    /// the lowest id. Linear scan over the arena, as the populations here
    /// stay small.
    pub fn find_nearest(&self, from: EntityId, kind: Kind) -> Option<EntityId> {
        let origin = self.entity(from)?.position;
        let mut best: Option<(u32, EntityId)> = None;
        for entity in self
            .entities
            .iter()
            .filter(|e| !e.is_dead() && e.kind() == kind && e.id != from)
        {
            let dist = self.grid.distance(origin, entity.position);
            if best.map_or(true, |(best_dist, _)| dist < best_dist) {
                best = Some((dist, entity.id));
            }
        }
        best.map(|(_, id)| id)
    }

    /// First truly empty in-bounds cardinal neighbor, tried in RNG-shuffled
    /// order. Used for offspring placement.
    pub fn find_empty_adjacent(&self, pos: Position, rng: &mut SystemRng<'_>) -> Option<Position> {
        let mut dirs = CARDINAL;
        dirs.shuffle(rng);
        dirs.iter()
            .map(|&(dx, dy)| pos.step(dx, dy))
            .find(|&cell| self.grid.contains(cell) && self.cell_is_empty(cell))
    }

    /// Apply the tick's deferred mutations atomically: prune the dead,
    /// append the newborns, record both in the bookkeeping state.
    pub(crate) fn finish_tick(&mut self) {
        let occupancy = &mut self.occupancy;
        let mut deaths = 0u64;
        for entity in self.entities.iter().filter(|e| e.is_dead()) {
            if let Some(ids) = occupancy.get_mut(&entity.position) {
                ids.retain(|&id| id != entity.id);
            }
            deaths += 1;
        }
        occupancy.retain(|_, ids| !ids.is_empty());
        self.entities.retain(|e| !e.is_dead());

        let births = self.pending.len() as u64;
        self.entities.append(&mut self.pending);

        self.bookkeeping = BookkeepingState { births, deaths };
    }

    /// Lazy read-only iteration over the live population, in id order. The
    /// only per-entity data a consumer may read.
    pub fn entities(&self) -> impl Iterator<Item = EntityView> + '_ {
        self.entities.iter().filter(|e| !e.is_dead()).map(|e| EntityView {
            id: e.id.raw(),
            kind: e.kind(),
            x: e.position.x,
            y: e.position.y,
            health: e.health,
        })
    }

    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        WorldSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            width: self.grid.width(),
            height: self.grid.height(),
            populations: self.populations(),
            entities: self.entities().collect(),
        }
    }
}
