//! The turn menu: which actions are open to the player right now, and what
//! each one does to the world.

use anyhow::{bail, Result};
use tracing::debug;

use crate::io::{Console, InputProvider};
use crate::world::{World, WorldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ListCrops,
    Status,
    BuyCrops,
    BuyFields,
    Play,
    Exit,
}

impl Action {
    pub fn prompt(self) -> &'static str {
        match self {
            Action::ListCrops => "List available crops for purchase",
            Action::Status => "Report farm status",
            Action::BuyCrops => "Buy and plant crops",
            Action::BuyFields => "Buy more fields",
            Action::Play => "Finish planting and see how the year goes",
            Action::Exit => "Exit the game",
        }
    }

    /// Whether choosing this action closes the planting phase.
    pub fn ends_round(self) -> bool {
        matches!(self, Action::Play | Action::Exit)
    }

    pub fn execute(self, ctx: &mut ActionContext<'_>) -> Result<()> {
        match self {
            Action::ListCrops => {
                list_crops(ctx);
                Ok(())
            }
            Action::Status => {
                report_status(ctx);
                Ok(())
            }
            Action::BuyCrops => buy_crops(ctx),
            Action::BuyFields => buy_fields(ctx),
            Action::Play => Ok(()),
            Action::Exit => {
                ctx.world.request_exit();
                Ok(())
            }
        }
    }
}

/// Menu for the current state, in display order.
pub fn available_actions(world: &World) -> Vec<Action> {
    let mut actions = vec![Action::ListCrops, Action::Status];
    if world.has_empty_field() && world.can_afford_crops() {
        actions.push(Action::BuyCrops);
    }
    if !world.available_fields().is_empty() {
        actions.push(Action::BuyFields);
    }
    actions.push(Action::Play);
    actions.push(Action::Exit);
    actions
}

/// Everything an action may touch while it runs.
pub struct ActionContext<'a> {
    pub world: &'a mut World,
    pub console: &'a mut dyn Console,
    pub input: &'a mut dyn InputProvider,
}

fn list_crops(ctx: &mut ActionContext<'_>) {
    for crop in ctx.world.crops() {
        ctx.console.print(&format!("**{}", crop.name));
        ctx.console.print(&crop.description);
        ctx.console.print(&format!("Cost: {}", crop.cost));
        ctx.console.print(&format!("Sale Price: {}", crop.sale_price));
        ctx.console.new_line();
    }
}

fn report_status(ctx: &mut ActionContext<'_>) {
    let world = &*ctx.world;
    let console = &mut *ctx.console;
    console.print(&format!("Year: {}", world.year()));
    console.print(&format!("Balance: {}", world.balance()));
    console.print(&format!("Asset value: {}", world.asset_value()));
    console.new_line();

    console.print("Fields:");
    for field in world.owned_fields() {
        let line = match field.crop().and_then(|id| world.crop(id)) {
            Some(crop) => format!(
                "{}, size {}, value {} - {} ({} / {})",
                field.name,
                field.capacity,
                field.price,
                crop.name,
                field.quantity(),
                field.capacity
            ),
            None => format!(
                "{}, size {}, value {}, is empty!",
                field.name, field.capacity, field.price
            ),
        };
        console.print(&line);
    }
    console.new_line();
}

fn buy_crops(ctx: &mut ActionContext<'_>) -> Result<()> {
    let empty_fields = ctx.world.empty_fields();
    if empty_fields.is_empty() {
        bail!("buy crops chosen with no empty field");
    }
    ctx.console.print("Your available fields:");
    for (index, field) in empty_fields.iter().enumerate() {
        ctx.console.print(&format!("{}) {}", index + 1, field.name));
    }
    ctx.console.new_line();
    ctx.console.print("Which field would you like to plant in?");
    let field_id = ctx.input.field_to_plant(&empty_fields)?;

    ctx.console.new_line();
    ctx.console.print("Available crops for planting:");
    let affordable = ctx.world.affordable_crops();
    if affordable.is_empty() {
        bail!("buy crops chosen with no affordable crop");
    }
    for (index, (_, crop)) in affordable.iter().enumerate() {
        ctx.console.print(&format!(
            "{}) {}, {} per unit",
            index + 1,
            crop.name,
            crop.cost
        ));
    }
    ctx.console.new_line();
    ctx.console.print("Which crop would you like to plant?");
    let field = ctx
        .world
        .owned_field(field_id)
        .ok_or(WorldError::NotOwned(field_id.raw()))?;
    let crop_id = ctx
        .input
        .crop_to_plant(field, ctx.world.balance(), &affordable)?;

    let max_volume = ctx.world.max_volume(field_id, crop_id)?;
    ctx.console.new_line();
    ctx.console.print(&format!(
        "How many units would you like to purchase (maximum {max_volume})?"
    ));
    ctx.console.print("Enter 0 to exit to menu.");
    let quantity = ctx.input.crop_quantity(max_volume)?;
    ctx.console.new_line();

    if quantity == 0 {
        return Ok(());
    }
    if quantity > max_volume {
        bail!("quantity {quantity} exceeds the maximum of {max_volume}");
    }
    let spent = ctx.world.plant(field_id, crop_id, quantity)?;
    debug!(field = field_id.raw(), crop = crop_id.raw(), quantity, spent, "crops planted");
    Ok(())
}

fn buy_fields(ctx: &mut ActionContext<'_>) -> Result<()> {
    let available = ctx.world.available_fields();
    ctx.console.print("Here are the fields available for purchase:");
    ctx.console.new_line();
    for (index, field) in available.iter().enumerate() {
        ctx.console
            .print(&format!("{}) {}, {}", index + 1, field.name, field.description));
        ctx.console.print(&format!("Price: {}", field.price));
        ctx.console.new_line();
    }
    ctx.console.print(&format!(
        "Which field would you like to purchase? Enter {} to return to menu.",
        available.len() + 1
    ));
    let choice = ctx.input.field_to_buy(available)?;
    ctx.console.new_line();

    let Some(field_id) = choice else {
        return Ok(());
    };
    match ctx.world.purchase_field(field_id) {
        Ok(price) => {
            debug!(field = field_id.raw(), price, "field purchased");
            ctx.console.new_line();
            Ok(())
        }
        Err(WorldError::InsufficientFunds { .. }) => {
            ctx.console.print("Sorry, you have insufficient funds.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
