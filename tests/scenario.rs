use std::fs;

use agricap::{
    actions::Action,
    engine::EngineSettings,
    io::{BufferConsole, ScriptedInput, Step},
    scenario::{Scenario, ScenarioLoader},
    session::{Outcome, Session},
};

const ORCHARD: &str = r#"
name: orchard
seed: 2024
starting_balance: 800
horizon_years: 3
weather:
  max_draws: 500
crops:
  - name: Apples
    description: Crisp and reliable.
    cost: 20
    sale_price: 45
    ideal_heat: 1.0
    ideal_wetness: 1.0
    heat_factor: 1.0
    wetness_factor: 1.0
fields:
  - name: Orchard
    description: Rows of young trees.
    price: 400
    capacity: 30
    soil_quality: 0.9
  - name: Far Paddock
    price: 250
    capacity: 10
    soil_quality: 0.5
"#;

#[test]
fn loader_reads_scenario_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("orchard.yaml"), ORCHARD).unwrap();

    let scenario = ScenarioLoader::new(dir.path())
        .load("orchard.yaml")
        .expect("scenario parses");
    assert_eq!(scenario.name, "orchard");
    assert_eq!(scenario.seed, Some(2024));
    assert_eq!(scenario.rules.horizon_years, 3);
    assert_eq!(scenario.rules.weather.max_draws, 500);
    assert_eq!(scenario.rules.weather.wetness.bands.len(), 11);
    assert_eq!(scenario.fields[1].description, "");
}

#[test]
fn missing_file_names_the_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = ScenarioLoader::new(dir.path())
        .load("nowhere.yaml")
        .unwrap_err();
    assert!(err.to_string().contains("nowhere.yaml"), "{err}");
}

#[test]
fn invalid_catalog_is_rejected_on_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let broken = ORCHARD.replace("sale_price: 45", "sale_price: -1");
    fs::write(dir.path().join("broken.yaml"), broken).unwrap();

    let err = ScenarioLoader::new(dir.path())
        .load("broken.yaml")
        .unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("sale price must not be negative"), "{chain}");
}

#[test]
fn scenario_drives_a_full_game() {
    let scenario = Scenario::from_yaml(ORCHARD).unwrap();
    let world = scenario.build_world().unwrap();
    let settings = EngineSettings {
        seed: scenario.seed.unwrap(),
        config: scenario.rules.clone(),
    };
    let input = ScriptedInput::new([
        Step::Act(Action::BuyCrops),
        Step::Pick(0),
        Step::Pick(0),
        Step::Quantity(30),
        Step::Act(Action::Play),
    ])
    .then_repeat(Action::Play);
    let mut session = Session::new(world, settings, BufferConsole::new(), input);

    let outcome = session.run().unwrap();
    let world = session.world();
    let Outcome::Completed { score } = outcome else {
        panic!("expected a completed game, got {outcome:?}");
    };
    assert_eq!(score, world.balance() + 400);
    assert_eq!(world.year(), 4);
    assert!(session.console().contains("Final score:"));
}

#[test]
fn builtin_scenario_loads() {
    let scenario = Scenario::builtin().unwrap();
    assert_eq!(scenario.name, "green_valley");
    assert_eq!(scenario.rules.horizon_years, 20);
    assert!(scenario.crops.len() >= 3);
}
