pub mod engine;
pub mod entity;
pub mod error;
pub mod grid;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod systems;
pub mod web;
pub mod world;

pub use engine::{Engine, EngineBuilder, EngineSettings, TickSummary};
pub use scenario::{Scenario, ScenarioLoader};
pub use world::World;
