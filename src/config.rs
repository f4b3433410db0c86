//! Game rules and weather tables
//!
//! Everything here is read-only once a session starts and is handed to the
//! components that need it.

use serde::{Deserialize, Deserializer, Serialize};

use crate::scenario::CatalogError;

fn default_horizon_years() -> u32 {
    20
}

fn default_starting_balance() -> i64 {
    500
}

fn default_max_draws() -> u32 {
    10_000
}

fn default_mean() -> f64 {
    1.0
}

fn default_deviation() -> f64 {
    0.1
}

fn default_cutoff() -> f64 {
    3.0
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Rules of a single play-through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default = "default_horizon_years")]
    pub horizon_years: u32,
    #[serde(default = "default_starting_balance")]
    pub starting_balance: i64,
    #[serde(default)]
    pub weather: WeatherConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            horizon_years: default_horizon_years(),
            starting_balance: default_starting_balance(),
            weather: WeatherConfig::default(),
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.horizon_years == 0 {
            return Err(CatalogError::Rules(
                "horizon_years must be at least 1".into(),
            ));
        }
        if self.starting_balance < 0 {
            return Err(CatalogError::Rules(
                "starting_balance must not be negative".into(),
            ));
        }
        self.weather.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Ceiling on rejection-sampling draws for a single value.
    #[serde(default = "default_max_draws")]
    pub max_draws: u32,
    #[serde(default = "AxisConfig::heat", deserialize_with = "heat_axis")]
    pub heat: AxisConfig,
    #[serde(default = "AxisConfig::wetness", deserialize_with = "wetness_axis")]
    pub wetness: AxisConfig,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            max_draws: default_max_draws(),
            heat: AxisConfig::heat(),
            wetness: AxisConfig::wetness(),
        }
    }
}

impl WeatherConfig {
    fn validate(&self) -> Result<(), CatalogError> {
        if self.max_draws == 0 {
            return Err(CatalogError::Rules(
                "weather.max_draws must be at least 1".into(),
            ));
        }
        self.heat.validate("heat")?;
        self.wetness.validate("wetness")
    }
}

/// Distribution and reporting bands for one weather variable.
#[derive(Debug, Clone, Serialize)]
pub struct AxisConfig {
    pub mean: f64,
    pub deviation: f64,
    /// Draws further than `cutoff` deviations from the mean are rejected.
    pub cutoff: f64,
    pub bands: Vec<WeatherBand>,
}

/// An axis as written in a scenario. Omitted bands keep the stock table.
#[derive(Deserialize)]
struct AxisOverride {
    #[serde(default = "default_mean")]
    mean: f64,
    #[serde(default = "default_deviation")]
    deviation: f64,
    #[serde(default = "default_cutoff")]
    cutoff: f64,
    #[serde(default)]
    bands: Option<Vec<WeatherBand>>,
}

impl AxisOverride {
    fn into_axis(self, stock: fn() -> AxisConfig) -> AxisConfig {
        AxisConfig {
            mean: self.mean,
            deviation: self.deviation,
            cutoff: self.cutoff,
            bands: self.bands.unwrap_or_else(|| stock().bands),
        }
    }
}

fn heat_axis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AxisConfig, D::Error> {
    AxisOverride::deserialize(deserializer).map(|axis| axis.into_axis(AxisConfig::heat))
}

fn wetness_axis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<AxisConfig, D::Error> {
    AxisOverride::deserialize(deserializer).map(|axis| axis.into_axis(AxisConfig::wetness))
}

impl AxisConfig {
    pub fn heat() -> Self {
        Self::with_bands(&[
            (-3.0, "This was a glacial year "),
            (-2.5, "This was a freezing year "),
            (-2.0, "This was a frigid year "),
            (-1.5, "This was a bracing year "),
            (-1.0, "This was a chilly year "),
            (-0.5, "This was a mild year "),
            (0.5, "This was a warm year "),
            (1.0, "This was a hot year "),
            (1.5, "This was a sultry year "),
            (2.0, "This was a sweltering year "),
            (2.5, "This was a scorching year "),
        ])
    }

    pub fn wetness() -> Self {
        Self::with_bands(&[
            (-3.0, "with an arid climate."),
            (-2.5, "with minimal precipitation."),
            (-2.0, "with scattered drizzle."),
            (-1.5, "with scarce rainfall."),
            (-1.0, "with light showers."),
            (-0.5, "with moderate rainfall."),
            (0.5, "with considerable precipitation."),
            (1.0, "with heavy rainfall."),
            (1.5, "with some squalling."),
            (2.0, "with torrential downpours."),
            (2.5, "with monsoon storms."),
        ])
    }

    fn with_bands(table: &[(f64, &str)]) -> Self {
        Self {
            mean: default_mean(),
            deviation: default_deviation(),
            cutoff: default_cutoff(),
            bands: table
                .iter()
                .map(|&(threshold, message)| WeatherBand::new(threshold, message))
                .collect(),
        }
    }

    pub fn min(&self) -> f64 {
        self.mean - self.cutoff * self.deviation
    }

    pub fn max(&self) -> f64 {
        self.mean + self.cutoff * self.deviation
    }

    fn validate(&self, axis: &str) -> Result<(), CatalogError> {
        if !(self.deviation.is_finite() && self.deviation > 0.0) {
            return Err(CatalogError::Rules(format!(
                "weather.{axis}.deviation must be positive"
            )));
        }
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(CatalogError::Rules(format!(
                "weather.{axis}.cutoff must be positive"
            )));
        }
        if self
            .bands
            .windows(2)
            .any(|pair| pair[0].threshold >= pair[1].threshold)
        {
            return Err(CatalogError::Rules(format!(
                "weather.{axis}.bands must be listed in ascending threshold order"
            )));
        }
        Ok(())
    }
}

/// A labelled lower bound, in deviations from the mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherBand {
    pub threshold: f64,
    pub message: String,
}

impl WeatherBand {
    pub fn new(threshold: f64, message: impl Into<String>) -> Self {
        Self {
            threshold,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
