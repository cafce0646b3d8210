use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use savanna::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    systems::{
        AgingSystem, BookkeepingSystem, CarnivoreSystem, GrowthSystem, HerbivoreSystem,
        MetabolismSystem,
    },
    web,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Savanna ecosystem runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/meadow.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override snapshot interval in ticks
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Serve the live web viewer instead of running headless
    #[arg(long)]
    serve: bool,

    /// Host for the web viewer
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port for the web viewer
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Delay between ticks while serving, in milliseconds
    #[arg(long, default_value_t = 150)]
    tick_ms: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let ticks = scenario.ticks(cli.ticks);
    let snapshot_interval = cli
        .snapshot_interval
        .unwrap_or(scenario.snapshot_interval_ticks);
    let snapshot_dir = cli
        .snapshot_dir
        .unwrap_or_else(|| PathBuf::from("snapshots"));

    if cli.serve {
        let config = web::WebServerConfig {
            scenario,
            ticks,
            snapshot_interval,
            snapshot_dir,
            host: cli.host,
            port: cli.port,
            tick_ms: cli.tick_ms,
        };
        return tokio::runtime::Runtime::new()?.block_on(web::run(config));
    }

    let mut world = scenario.build_world()?;
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.seed,
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
    };
    let mut engine = EngineBuilder::new(settings)
        .with_system(AgingSystem::new())
        .with_system(GrowthSystem::new())
        .with_system(MetabolismSystem::new())
        .with_system(HerbivoreSystem::new())
        .with_system(CarnivoreSystem::new())
        .with_system(BookkeepingSystem::new())
        .build();

    engine.run(&mut world, ticks)?;
    let populations = world.populations();
    println!(
        "Scenario '{}' completed for {} ticks. Final populations: {} plants, {} herbivores, {} carnivores.",
        scenario.name, ticks, populations.vegetation, populations.herbivores, populations.carnivores
    );
    Ok(())
}
