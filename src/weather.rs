//! Yearly weather: bounded normal draws and their plain-English reading.

use rand::Rng;
use thiserror::Error;
use tracing::trace;

use crate::config::{AxisConfig, WeatherBand, WeatherConfig};
use crate::rng::RngExt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherKind {
    Heat,
    Wetness,
}

impl WeatherKind {
    pub fn label(self) -> &'static str {
        match self {
            WeatherKind::Heat => "heat",
            WeatherKind::Wetness => "wetness",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weather {
    pub heat: f64,
    pub wetness: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum WeatherError {
    #[error("no {kind} value within [{min}, {max}] after {draws} draws")]
    RetriesExhausted {
        kind: &'static str,
        min: f64,
        max: f64,
        draws: u32,
    },
}

pub struct WeatherGenerator<'a> {
    config: &'a WeatherConfig,
}

impl<'a> WeatherGenerator<'a> {
    pub fn new(config: &'a WeatherConfig) -> Self {
        Self { config }
    }

    fn axis(&self, kind: WeatherKind) -> &'a AxisConfig {
        match kind {
            WeatherKind::Heat => &self.config.heat,
            WeatherKind::Wetness => &self.config.wetness,
        }
    }

    /// Draw from the axis' normal distribution until the value lands inside
    /// the cutoff bounds (inclusive).
    pub fn generate<R: Rng + ?Sized>(
        &self,
        kind: WeatherKind,
        rng: &mut R,
    ) -> Result<f64, WeatherError> {
        let axis = self.axis(kind);
        let (min, max) = (axis.min(), axis.max());
        for attempt in 1..=self.config.max_draws {
            let value = rng.normal(axis.mean, axis.deviation);
            if (min..=max).contains(&value) {
                return Ok(value);
            }
            trace!(kind = kind.label(), value, attempt, "weather draw rejected");
        }
        Err(WeatherError::RetriesExhausted {
            kind: kind.label(),
            min,
            max,
            draws: self.config.max_draws,
        })
    }

    /// One year of weather. Wetness is drawn before heat.
    pub fn draw_year<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Weather, WeatherError> {
        let wetness = self.generate(WeatherKind::Wetness, rng)?;
        let heat = self.generate(WeatherKind::Heat, rng)?;
        Ok(Weather { heat, wetness })
    }
}

/// Message of the highest band whose lower bound `value` reaches, or an
/// empty string when it sits below every band.
pub fn check_bands<'b>(value: f64, mean: f64, deviation: f64, bands: &'b [WeatherBand]) -> &'b str {
    bands
        .iter()
        .rev()
        .find(|band| value >= mean + deviation * band.threshold)
        .map_or("", |band| band.message.as_str())
}

pub fn describe_axis(value: f64, axis: &AxisConfig) -> &str {
    check_bands(value, axis.mean, axis.deviation, &axis.bands)
}

/// Heat reading followed by the wetness reading.
pub fn narrative(weather: &Weather, config: &WeatherConfig) -> String {
    let mut report = describe_axis(weather.heat, &config.heat).to_string();
    report.push_str(describe_axis(weather.wetness, &config.wetness));
    report
}
