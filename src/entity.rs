use serde::{Deserialize, Serialize};

use crate::grid::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Vegetation,
    Herbivore,
    Carnivore,
}

impl Kind {
    pub fn is_animal(self) -> bool {
        matches!(self, Kind::Herbivore | Kind::Carnivore)
    }
}

/// Per-plant constants copied from the scenario at spawn time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VegetationState {
    pub max_health: u32,
    pub food_value: u32,
    /// Percent chance per tick to regain 1 health while below `max_health`.
    pub regrowth_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimalState {
    pub hunger: u32,
    pub reproduction_threshold: u32,
}

/// Tagged species variant; Herbivore and Carnivore share `AnimalState` and
/// diverge only in their behavior systems.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Species {
    Vegetation(VegetationState),
    Herbivore(AnimalState),
    Carnivore(AnimalState),
}

impl Species {
    pub fn kind(&self) -> Kind {
        match self {
            Species::Vegetation(_) => Kind::Vegetation,
            Species::Herbivore(_) => Kind::Herbivore,
            Species::Carnivore(_) => Kind::Carnivore,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub position: Position,
    pub health: u32,
    pub age: u32,
    pub lifespan: u32,
    dead: bool,
    pub species: Species,
}

impl Entity {
    pub(crate) fn new(
        id: EntityId,
        position: Position,
        health: u32,
        lifespan: u32,
        species: Species,
    ) -> Self {
        Self {
            id,
            position,
            health,
            age: 0,
            lifespan,
            dead: false,
            species,
        }
    }

    pub fn kind(&self) -> Kind {
        self.species.kind()
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Alive -> Dead is the only transition; there is no way back.
    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// Base lifecycle step shared by every species: advance age, die at
    /// end of lifespan. Dead entities are never mutated again.
    pub fn grow_older(&mut self) {
        if self.dead {
            return;
        }
        self.age += 1;
        if self.age >= self.lifespan {
            self.kill();
        }
    }

    /// What a consumer gains by eating this entity. Plants yield their
    /// configured value; animals yield half their health at the instant of
    /// predation (integer division, never cached).
    pub fn food_value(&self) -> u32 {
        match &self.species {
            Species::Vegetation(veg) => veg.food_value,
            Species::Herbivore(_) | Species::Carnivore(_) => self.health / 2,
        }
    }

    /// Take a bite out of this entity. Health saturates at 0, and reaching 0
    /// is death.
    pub fn be_eaten(&mut self, amount: u32) {
        if self.dead {
            return;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.kill();
        }
    }

    pub fn animal(&self) -> Option<&AnimalState> {
        match &self.species {
            Species::Herbivore(state) | Species::Carnivore(state) => Some(state),
            Species::Vegetation(_) => None,
        }
    }

    pub fn animal_mut(&mut self) -> Option<&mut AnimalState> {
        match &mut self.species {
            Species::Herbivore(state) | Species::Carnivore(state) => Some(state),
            Species::Vegetation(_) => None,
        }
    }

    pub fn vegetation(&self) -> Option<&VegetationState> {
        match &self.species {
            Species::Vegetation(state) => Some(state),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn herbivore(health: u32) -> Entity {
        Entity::new(
            EntityId::new(0),
            Position::new(0, 0),
            health,
            100,
            Species::Herbivore(AnimalState {
                hunger: 0,
                reproduction_threshold: 5,
            }),
        )
    }

    fn plant(health: u32) -> Entity {
        Entity::new(
            EntityId::new(1),
            Position::new(0, 0),
            health,
            100,
            Species::Vegetation(VegetationState {
                max_health: health,
                food_value: 5,
                regrowth_rate: 0,
            }),
        )
    }

    #[test]
    fn animal_food_value_is_half_health_floored() {
        assert_eq!(herbivore(7).food_value(), 3);
        assert_eq!(herbivore(1).food_value(), 0);
        assert_eq!(herbivore(0).food_value(), 0);
    }

    #[test]
    fn plant_food_value_is_fixed() {
        let mut p = plant(10);
        assert_eq!(p.food_value(), 5);
        p.be_eaten(7);
        assert_eq!(p.food_value(), 5);
    }

    #[test]
    fn be_eaten_floors_at_zero_and_kills() {
        let mut p = plant(10);
        p.be_eaten(15);
        assert_eq!(p.health, 0);
        assert!(p.is_dead());
    }

    #[test]
    fn partial_bite_leaves_plant_alive() {
        let mut p = plant(10);
        p.be_eaten(4);
        assert_eq!(p.health, 6);
        assert!(!p.is_dead());
    }

    #[test]
    fn ages_out_after_exactly_lifespan_ticks() {
        let mut e = herbivore(50);
        e.lifespan = 3;
        e.grow_older();
        e.grow_older();
        assert!(!e.is_dead());
        e.grow_older();
        assert!(e.is_dead());
    }

    #[test]
    fn dead_entities_stop_aging() {
        let mut e = herbivore(50);
        e.kill();
        e.grow_older();
        assert_eq!(e.age, 0);
        assert!(e.is_dead());
    }
}
