use anyhow::{anyhow, Result};
use tracing::debug;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    weather::Weather,
    world::{Crop, Field, World},
};

pub struct HarvestSystem;

impl HarvestSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HarvestSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for HarvestSystem {
    fn name(&self) -> &str {
        "harvest"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let weather = world
            .season
            .weather
            .ok_or_else(|| anyhow!("harvest for year {} ran before the weather", ctx.year))?;
        let (fields, crops) = world.fields_and_crops_mut();
        let profit = calculate_profit(&weather, fields, crops);
        debug!(year = ctx.year, profit, "harvest collected");
        world.season.revenue = profit;
        Ok(())
    }
}

/// Revenue of every planted field under `weather`, recorded on the field
/// as its last revenue. Returns the total.
///
/// Yield starts at 1 and loses the weighted distance from the crop's ideal
/// heat and wetness. It is not clamped, so a bad enough year turns a field's
/// revenue negative. Revenue is truncated toward zero.
pub fn calculate_profit(weather: &Weather, fields: &mut [Field], crops: &[Crop]) -> i64 {
    let mut profit = 0;
    for field in fields.iter_mut() {
        let Some(planting) = field.planting() else {
            continue;
        };
        let Some(crop) = crops.get(planting.crop.raw()) else {
            continue;
        };

        let heat_score = (weather.heat - crop.ideal_heat).abs() * crop.heat_factor;
        let wetness_score = (weather.wetness - crop.ideal_wetness).abs() * crop.wetness_factor;
        let crop_yield = 1.0 - heat_score - wetness_score;

        let revenue = (crop_yield
            * f64::from(planting.quantity)
            * crop.sale_price as f64
            * field.soil_quality) as i64;
        field.set_last_revenue(revenue);
        profit += revenue;
    }
    profit
}
