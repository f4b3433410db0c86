use crate::engine::{NetResult, RoundReport};
use crate::io::Console;

/// Print a year's results the way the player reads them.
pub fn render_round(console: &mut dyn Console, report: &RoundReport) {
    console.section_break();
    console.print(&report.narrative);
    console.new_line();

    console.print(&format!("Year {} performance:", report.year));
    console.new_line();
    for field in &report.fields {
        console.print(&format!(
            "{} - {}, Revenue {}, Cost {}",
            field.field, field.crop, field.revenue, field.cost
        ));
    }
    console.new_line();
    console.print(&format!("Asset acquisitions: {}", report.new_assets));
    console.print(&format!("Revenue: {}", report.revenue));
    console.print(&format!("Expenses: {}", report.expenditure));
    console.new_line();
    console.print("---------------------");

    match report.outcome {
        NetResult::Profit => console.print(&format!(
            "Congratulations! You made a net profit of {}.",
            report.net_profit
        )),
        NetResult::BreakEven => console.print("It could be worse; you broke even."),
        NetResult::Loss => console.print(&format!(
            "Commiserations! You made a loss of {}.",
            report.net_profit
        )),
    }

    console.print(&format!("Year end balance: {}", report.balance));
    console.print(&format!("Total asset value: {}", report.asset_value));
    console.section_break();
    console.new_line();
}
