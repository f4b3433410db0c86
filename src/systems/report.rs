use anyhow::{anyhow, Result};

use crate::{
    engine::{FieldPerformance, NetResult, RoundReport, System, SystemContext},
    rng::SystemRng,
    weather::narrative,
    world::World,
};

/// Captures the year's results before bookkeeping wipes the fields.
pub struct ReportSystem;

impl ReportSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReportSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ReportSystem {
    fn name(&self) -> &str {
        "report"
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
            .ok_or_else(|| anyhow!("no weather recorded for year {}", ctx.year))?;

        let fields = world
            .owned_fields()
            .iter()
            .filter_map(|field| {
                let planting = field.planting()?;
                let crop = world.crop(planting.crop)?;
                Some(FieldPerformance {
                    field: field.name.clone(),
                    crop: crop.name.clone(),
                    revenue: field.last_revenue(),
                    cost: crop.cost * i64::from(planting.quantity),
                })
            })
            .collect();

        let revenue = world.season.revenue;
        let net_profit = revenue + world.new_assets() - world.expenditure();
        world.season.report = Some(RoundReport {
            year: ctx.year,
            weather,
            narrative: narrative(&weather, &ctx.config.weather),
            fields,
            new_assets: world.new_assets(),
            revenue,
            expenditure: world.expenditure(),
            net_profit,
            outcome: NetResult::classify(net_profit),
            balance: world.balance(),
            asset_value: world.asset_value(),
        });
        Ok(())
    }
}
