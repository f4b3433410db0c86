use anyhow::Result;
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    weather::WeatherGenerator,
    world::World,
};

pub struct WeatherSystem;

impl WeatherSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeatherSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for WeatherSystem {
    fn name(&self) -> &str {
        "weather"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let weather = WeatherGenerator::new(&ctx.config.weather).draw_year(rng)?;
        debug!(
            year = ctx.year,
            heat = weather.heat,
            wetness = weather.wetness,
            "weather drawn"
        );
        world.season.weather = Some(weather);
        Ok(())
    }
}
