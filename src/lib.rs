pub mod actions;
pub mod config;
pub mod engine;
pub mod io;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod session;
pub mod systems;
pub mod weather;
pub mod world;

pub use config::GameConfig;
pub use engine::{EngineBuilder, EngineSettings, RoundEngine, RoundReport};
pub use scenario::{Scenario, ScenarioLoader};
pub use session::{Outcome, Session};
