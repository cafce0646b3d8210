use std::path::PathBuf;

use savanna::{
    engine::{Engine, EngineBuilder, EngineSettings},
    entity::Kind,
    grid::Position,
    scenario::Scenario,
    systems::{
        AgingSystem, BookkeepingSystem, CarnivoreSystem, GrowthSystem, HerbivoreSystem,
        MetabolismSystem,
    },
};

fn scenario_from(yaml: &str) -> Scenario {
    serde_yaml::from_str(yaml).expect("scenario parses")
}

fn build_engine(seed: u64) -> Engine {
    let settings = EngineSettings {
        scenario_name: "fixture".into(),
        seed,
        snapshot_interval_ticks: 0,
        snapshot_dir: PathBuf::from("snapshots_reproduction_tests"),
    };
    EngineBuilder::new(settings)
        .with_system(AgingSystem::new())
        .with_system(GrowthSystem::new())
        .with_system(MetabolismSystem::new())
        .with_system(HerbivoreSystem::new())
        .with_system(CarnivoreSystem::new())
        .with_system(BookkeepingSystem::new())
        .build()
}

#[test]
fn hunger_threshold_gates_reproduction_and_resets_on_spawn() {
    let scenario = scenario_from(
        "
name: fixture
seed: 23
width: 3
height: 3
seeding: { vegetation: 0, herbivores: 0, carnivores: 0 }
vegetation: { spawn_chance: 0.0 }
herbivore: { initial_health: 20, reproduction_threshold: 5, flee_distance: 0 }
",
    );
    let mut world = scenario.build_world().unwrap();
    let parent = world.spawn(Kind::Herbivore, Position::new(1, 1));
    let mut engine = build_engine(scenario.seed);

    for tick in 1..=4 {
        let summary = engine.tick(&mut world).unwrap();
        assert_eq!(summary.births, 0, "no offspring before the threshold (tick {tick})");
        assert_eq!(world.populations().herbivores, 1);
    }

    let parent_pos = world.entity(parent).unwrap().position;
    let summary = engine.tick(&mut world).unwrap();
    assert_eq!(summary.births, 1, "hunger reaches 5 on tick 5 and triggers one spawn");
    assert_eq!(world.populations().herbivores, 2);
    assert_eq!(
        world.entity(parent).unwrap().animal().unwrap().hunger,
        0,
        "spawning charges the parent's hunger"
    );

    let offspring = world
        .entities()
        .find(|view| view.id != parent.raw())
        .expect("offspring exists");
    let dist = (offspring.x - parent_pos.x).abs() + (offspring.y - parent_pos.y).abs();
    assert_eq!(dist, 1, "offspring appears in an adjacent cell");

    let summary = engine.tick(&mut world).unwrap();
    assert_eq!(summary.births, 0, "both animals are below the threshold again");
}

#[test]
fn dead_parents_do_not_reproduce() {
    let scenario = scenario_from(
        "
name: fixture
seed: 23
width: 3
height: 3
seeding: { vegetation: 0, herbivores: 0, carnivores: 0 }
vegetation: { spawn_chance: 0.0 }
herbivore: { initial_health: 5, reproduction_threshold: 5, flee_distance: 0 }
",
    );
    let mut world = scenario.build_world().unwrap();
    world.spawn(Kind::Herbivore, Position::new(1, 1));
    let mut engine = build_engine(scenario.seed);

    // Hunger hits the threshold on the same tick starvation kills: the
    // corpse must not spawn anything.
    let mut births = 0;
    for _ in 0..6 {
        births += engine.tick(&mut world).unwrap().births;
    }
    assert_eq!(births, 0);
    assert_eq!(world.populations().herbivores, 0);
}

#[test]
fn population_cap_blocks_further_spawns() {
    let scenario = scenario_from(
        "
name: fixture
seed: 23
width: 4
height: 4
seeding: { vegetation: 0, herbivores: 0, carnivores: 0 }
vegetation: { spawn_chance: 0.0 }
herbivore: { initial_health: 50, reproduction_threshold: 1, flee_distance: 0, max_population: 2 }
",
    );
    let mut world = scenario.build_world().unwrap();
    world.spawn(Kind::Herbivore, Position::new(1, 1));
    let mut engine = build_engine(scenario.seed);

    let mut births = 0;
    for _ in 0..8 {
        births += engine.tick(&mut world).unwrap().births;
        assert!(world.populations().herbivores <= 2);
    }
    assert_eq!(births, 1, "only the spawn that filled the cap happened");
    assert_eq!(world.populations().herbivores, 2);
}

#[test]
fn carnivores_share_the_same_reproduction_gating() {
    let scenario = scenario_from(
        "
name: fixture
seed: 23
width: 3
height: 3
seeding: { vegetation: 0, herbivores: 0, carnivores: 0 }
vegetation: { spawn_chance: 0.0 }
carnivore: { initial_health: 20, reproduction_threshold: 5 }
",
    );
    let mut world = scenario.build_world().unwrap();
    world.spawn(Kind::Carnivore, Position::new(1, 1));
    let mut engine = build_engine(scenario.seed);

    for _ in 0..4 {
        assert_eq!(engine.tick(&mut world).unwrap().births, 0);
    }
    let summary = engine.tick(&mut world).unwrap();
    assert_eq!(summary.births, 1);
    assert_eq!(world.populations().carnivores, 2);
}
