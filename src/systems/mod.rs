mod bookkeeping;
mod harvest;
mod ledger;
mod report;
mod weather;

pub use bookkeeping::BookkeepingSystem;
pub use harvest::{calculate_profit, HarvestSystem};
pub use ledger::LedgerSystem;
pub use report::ReportSystem;
pub use weather::WeatherSystem;
