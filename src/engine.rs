use anyhow::{anyhow, Result};
use tracing::{debug, info};

use crate::{
    config::GameConfig,
    rng::{RngManager, SystemRng},
    systems::{BookkeepingSystem, HarvestSystem, LedgerSystem, ReportSystem, WeatherSystem},
    weather::Weather,
    world::World,
};

pub struct EngineSettings {
    pub seed: u64,
    pub config: GameConfig,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    /// The yearly pipeline in resolution order.
    pub fn standard(settings: EngineSettings) -> Self {
        Self::new(settings)
            .with_system(WeatherSystem::new())
            .with_system(HarvestSystem::new())
            .with_system(LedgerSystem::new())
            .with_system(ReportSystem::new())
            .with_system(BookkeepingSystem::new())
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> RoundEngine {
        RoundEngine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            config: self.settings.config,
        }
    }
}

pub struct RoundEngine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    config: GameConfig,
}

impl RoundEngine {
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Resolve one year against `world` and hand back its report.
    pub fn resolve_round(&mut self, world: &mut World) -> Result<RoundReport> {
        let ctx = SystemContext {
            year: world.year(),
            config: &self.config,
        };
        for system in &mut self.systems {
            debug!(system = system.name(), year = ctx.year, "running system");
            let mut rng_stream = self.rng.stream();
            system.run(&ctx, world, &mut rng_stream)?;
        }
        let report = world
            .season
            .report
            .take()
            .ok_or_else(|| anyhow!("round pipeline produced no report"))?;
        info!(
            year = report.year,
            revenue = report.revenue,
            balance = report.balance,
            "round resolved"
        );
        Ok(report)
    }
}

/// Read-only inputs shared by every system during a round.
pub struct SystemContext<'a> {
    /// The year being resolved, before the ledger advances it.
    pub year: u32,
    pub config: &'a GameConfig,
}

pub trait System {
    fn name(&self) -> &str;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut SystemRng<'_>,
    ) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FieldPerformance {
    pub field: String,
    pub crop: String,
    pub revenue: i64,
    pub cost: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetResult {
    Profit,
    BreakEven,
    Loss,
}

impl NetResult {
    pub fn classify(net: i64) -> Self {
        match net {
            n if n > 0 => NetResult::Profit,
            0 => NetResult::BreakEven,
            _ => NetResult::Loss,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoundReport {
    pub year: u32,
    pub weather: Weather,
    pub narrative: String,
    pub fields: Vec<FieldPerformance>,
    pub new_assets: i64,
    pub revenue: i64,
    pub expenditure: i64,
    pub net_profit: i64,
    pub outcome: NetResult,
    pub balance: i64,
    pub asset_value: i64,
}
