use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    config::{GameConfig, LoggingConfig},
    world::{Crop, FieldSpec, World},
};

const BUILTIN: &str = include_str!("../scenarios/default.yaml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("the catalog must offer at least one crop")]
    NoCrops,
    #[error("the catalog must offer at least one field")]
    NoFields,
    #[error("crop '{name}': {reason}")]
    Crop { name: String, reason: &'static str },
    #[error("field '{name}': {reason}")]
    Field { name: String, reason: &'static str },
    #[error("invalid rules: {0}")]
    Rules(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    /// Fixed seed for reproducible weather; drawn at random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub rules: GameConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub crops: Vec<Crop>,
    pub fields: Vec<FieldSpec>,
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
        Scenario::from_yaml(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Scenario {
    /// The catalog shipped with the game.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN).context("Failed to parse the built-in scenario")
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        let scenario: Scenario = serde_yaml::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.crops.is_empty() {
            return Err(CatalogError::NoCrops);
        }
        if self.fields.is_empty() {
            return Err(CatalogError::NoFields);
        }
        for crop in &self.crops {
            let problem = if crop.cost <= 0 {
                Some("cost must be positive")
            } else if crop.sale_price < 0 {
                Some("sale price must not be negative")
            } else if ![
                crop.ideal_heat,
                crop.ideal_wetness,
                crop.heat_factor,
                crop.wetness_factor,
            ]
            .iter()
            .all(|value| value.is_finite())
            {
                Some("weather preferences must be finite numbers")
            } else {
                None
            };
            if let Some(reason) = problem {
                return Err(CatalogError::Crop {
                    name: crop.name.clone(),
                    reason,
                });
            }
        }
        for field in &self.fields {
            let problem = if field.capacity == 0 {
                Some("capacity must be positive")
            } else if field.price < 0 {
                Some("price must not be negative")
            } else if !(field.soil_quality.is_finite() && field.soil_quality > 0.0) {
                Some("soil quality must be positive")
            } else {
                None
            };
            if let Some(reason) = problem {
                return Err(CatalogError::Field {
                    name: field.name.clone(),
                    reason,
                });
            }
        }
        self.rules.validate()
    }

    pub fn build_world(&self) -> Result<World> {
        let world = World::new(
            self.rules.starting_balance,
            self.crops.clone(),
            self.fields.clone(),
        )?;
        Ok(world)
    }
}
