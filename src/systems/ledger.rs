use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    rng::SystemRng,
    world::World,
};

/// Books the harvest into the balance and closes the year.
pub struct LedgerSystem;

impl LedgerSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LedgerSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for LedgerSystem {
    fn name(&self) -> &str {
        "ledger"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        world: &mut World,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let revenue = world.season.revenue;
        world.credit(revenue);
        world.advance_year();
        Ok(())
    }
}
