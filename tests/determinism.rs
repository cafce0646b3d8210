use std::path::PathBuf;

use savanna::{
    engine::{Engine, EngineBuilder, EngineSettings},
    scenario::{Scenario, ScenarioLoader},
    systems::{
        AgingSystem, BookkeepingSystem, CarnivoreSystem, GrowthSystem, HerbivoreSystem,
        MetabolismSystem,
    },
};

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario_path() -> PathBuf {
    PathBuf::from("scenarios/meadow.yaml")
}

fn build_engine(scenario: &Scenario, snapshot_dir: PathBuf, snapshot_interval: u64) -> Engine {
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
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
fn scenario_loader_reads_fixture() {
    let scenario = scenario_loader()
        .load(scenario_path())
        .expect("scenario parses");
    assert_eq!(scenario.name, "meadow");
    assert_eq!(scenario.width, 80);
    assert_eq!(scenario.height, 60);
    assert_eq!(scenario.seeding.vegetation, 500);
    assert_eq!(scenario.seeding.herbivores, 200);
    assert_eq!(scenario.seeding.carnivores, 20);
}

#[test]
fn same_seed_replays_an_identical_history() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let ticks = 40;

    let mut world_a = scenario.build_world().unwrap();
    let mut engine_a = build_engine(&scenario, PathBuf::from("snapshots_det_a"), 0);
    engine_a.run(&mut world_a, ticks).unwrap();

    let mut world_b = scenario.build_world().unwrap();
    let mut engine_b = build_engine(&scenario, PathBuf::from("snapshots_det_b"), 0);
    engine_b.run(&mut world_b, ticks).unwrap();

    let a = serde_json::to_string(&world_a.snapshot(&scenario.name)).unwrap();
    let b = serde_json::to_string(&world_b.snapshot(&scenario.name)).unwrap();
    assert_eq!(a, b, "identical seeds must replay identical worlds");
}

#[test]
fn different_seeds_diverge() {
    let mut scenario = scenario_loader().load(scenario_path()).unwrap();
    let ticks = 20;

    scenario.seed = 1;
    let mut world_a = scenario.build_world().unwrap();
    let mut engine_a = build_engine(&scenario, PathBuf::from("snapshots_div_a"), 0);
    engine_a.run(&mut world_a, ticks).unwrap();

    scenario.seed = 2;
    let mut world_b = scenario.build_world().unwrap();
    let mut engine_b = build_engine(&scenario, PathBuf::from("snapshots_div_b"), 0);
    engine_b.run(&mut world_b, ticks).unwrap();

    let a = serde_json::to_string(&world_a.snapshot(&scenario.name)).unwrap();
    let b = serde_json::to_string(&world_b.snapshot(&scenario.name)).unwrap();
    assert_ne!(a, b, "different seeds should produce different worlds");
}

#[test]
fn engine_emits_snapshots_at_the_configured_cadence() {
    let scenario = scenario_loader().load(scenario_path()).unwrap();
    let temp_dir = tempfile::tempdir().unwrap();
    let snapshot_dir = temp_dir.path().join("snaps");

    let mut world = scenario.build_world().unwrap();
    let mut engine = build_engine(&scenario, snapshot_dir.clone(), 10);
    engine.run(&mut world, 30).unwrap();

    let expected = snapshot_dir.join("meadow").join("tick_000010.json");
    assert!(
        expected.exists(),
        "expected snapshot {} to exist",
        expected.display()
    );

    let data = std::fs::read_to_string(expected).unwrap();
    assert!(
        data.contains("\"scenario\": \"meadow\""),
        "snapshot should carry scenario metadata"
    );
    assert!(
        data.contains("\"generated_at\""),
        "snapshot should carry its write timestamp"
    );
}
