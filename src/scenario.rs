use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::entity::Kind;
use crate::error::ConfigError;
use crate::grid::Position;
use crate::world::{CarnivoreParams, HerbivoreParams, SpeciesParams, VegetationParams, World};

fn default_width() -> i32 {
    80
}

fn default_height() -> i32 {
    60
}

fn default_snapshot_interval_ticks() -> u64 {
    50
}

fn default_initial_vegetation() -> u32 {
    500
}

fn default_initial_herbivores() -> u32 {
    200
}

fn default_initial_carnivores() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub seed: u64,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default = "default_snapshot_interval_ticks")]
    pub snapshot_interval_ticks: u64,
    #[serde(default)]
    pub seeding: SeedCounts,
    #[serde(default)]
    pub vegetation: VegetationParams,
    #[serde(default)]
    pub herbivore: HerbivoreParams,
    #[serde(default)]
    pub carnivore: CarnivoreParams,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCounts {
    #[serde(default = "default_initial_vegetation")]
    pub vegetation: u32,
    #[serde(default = "default_initial_herbivores")]
    pub herbivores: u32,
    #[serde(default = "default_initial_carnivores")]
    pub carnivores: u32,
}

impl Default for SeedCounts {
    fn default() -> Self {
        Self {
            vegetation: default_initial_vegetation(),
            herbivores: default_initial_herbivores(),
            carnivores: default_initial_carnivores(),
        }
    }
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::Dimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.vegetation.initial_health == 0 {
            return Err(ConfigError::InitialHealth {
                species: "vegetation",
            });
        }
        if self.vegetation.lifespan == 0 {
            return Err(ConfigError::Lifespan {
                species: "vegetation",
            });
        }
        if self.vegetation.regrowth_rate > 100 {
            return Err(ConfigError::RegrowthRate(self.vegetation.regrowth_rate));
        }
        if !(0.0..=1.0).contains(&self.vegetation.spawn_chance) {
            return Err(ConfigError::SpawnChance(self.vegetation.spawn_chance));
        }
        if self.herbivore.initial_health == 0 {
            return Err(ConfigError::InitialHealth {
                species: "herbivore",
            });
        }
        if self.herbivore.lifespan == 0 {
            return Err(ConfigError::Lifespan {
                species: "herbivore",
            });
        }
        if self.herbivore.reproduction_threshold == 0 {
            return Err(ConfigError::ReproductionThreshold {
                species: "herbivore",
            });
        }
        if self.carnivore.initial_health == 0 {
            return Err(ConfigError::InitialHealth {
                species: "carnivore",
            });
        }
        if self.carnivore.lifespan == 0 {
            return Err(ConfigError::Lifespan {
                species: "carnivore",
            });
        }
        if self.carnivore.reproduction_threshold == 0 {
            return Err(ConfigError::ReproductionThreshold {
                species: "carnivore",
            });
        }
        Ok(())
    }

    /// Validate, then seed a world deterministically from the scenario seed.
    /// Initial placement draws independent cells and may stack entities;
    /// movement separates them within a few ticks.
    pub fn build_world(&self) -> Result<World, ConfigError> {
        self.validate()?;
        let params = SpeciesParams {
            vegetation: self.vegetation.clone(),
            herbivore: self.herbivore.clone(),
            carnivore: self.carnivore.clone(),
        };
        let mut world = World::new(self.width, self.height, params)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut scatter = |world: &mut World, kind: Kind, count: u32| {
            for _ in 0..count {
                let pos = Position::new(
                    rng.gen_range(0..self.width),
                    rng.gen_range(0..self.height),
                );
                world.spawn(kind, pos);
            }
        };
        scatter(&mut world, Kind::Vegetation, self.seeding.vegetation);
        scatter(&mut world, Kind::Herbivore, self.seeding.herbivores);
        scatter(&mut world, Kind::Carnivore, self.seeding.carnivores);
        Ok(world)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(500)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal(yaml: &str) -> Scenario {
        serde_yaml::from_str(yaml).expect("scenario parses")
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let scenario = minimal("name: tiny\nseed: 3\n");
        assert_eq!(scenario.width, 80);
        assert_eq!(scenario.height, 60);
        assert_eq!(scenario.seeding.vegetation, 500);
        assert_eq!(scenario.herbivore.reproduction_threshold, 8);
        assert_eq!(scenario.herbivore.max_population, Some(500));
        assert_eq!(scenario.carnivore.max_population, None);
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn rejects_flat_world() {
        let scenario = minimal("name: flat\nseed: 3\nwidth: 0\n");
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::Dimensions { .. })
        ));
        assert!(scenario.build_world().is_err());
    }

    #[test]
    fn rejects_zero_reproduction_threshold() {
        let scenario = minimal("name: t\nseed: 3\nherbivore: { reproduction_threshold: 0 }\n");
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::ReproductionThreshold { .. })
        ));
    }

    #[test]
    fn rejects_out_of_range_regrowth_and_spawn_chance() {
        let scenario = minimal("name: t\nseed: 3\nvegetation: { regrowth_rate: 150 }\n");
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::RegrowthRate(150))
        ));
        let scenario = minimal("name: t\nseed: 3\nvegetation: { spawn_chance: 1.5 }\n");
        assert!(matches!(
            scenario.validate(),
            Err(ConfigError::SpawnChance(_))
        ));
    }

    #[test]
    fn build_world_seeds_requested_counts() {
        let scenario = minimal(
            "name: t\nseed: 3\nwidth: 10\nheight: 10\nseeding: { vegetation: 12, herbivores: 4, carnivores: 2 }\n",
        );
        let world = scenario.build_world().unwrap();
        let populations = world.populations();
        assert_eq!(populations.vegetation, 12);
        assert_eq!(populations.herbivores, 4);
        assert_eq!(populations.carnivores, 2);
    }
}
