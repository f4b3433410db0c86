use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::RoundReport;
use crate::weather::Weather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CropId(usize);

impl CropId {
    pub fn raw(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldId(usize);

impl FieldId {
    pub fn raw(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crop {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: i64,
    pub sale_price: i64,
    pub ideal_heat: f64,
    pub ideal_wetness: f64,
    pub heat_factor: f64,
    pub wetness_factor: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planting {
    pub crop: CropId,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
pub struct Field {
    id: FieldId,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub capacity: u32,
    pub soil_quality: f64,
    planting: Option<Planting>,
    last_revenue: i64,
}

impl Field {
    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn planting(&self) -> Option<Planting> {
        self.planting
    }

    pub fn is_empty(&self) -> bool {
        self.planting.is_none()
    }

    pub fn crop(&self) -> Option<CropId> {
        self.planting.map(|p| p.crop)
    }

    pub fn quantity(&self) -> u32 {
        self.planting.map_or(0, |p| p.quantity)
    }

    pub fn last_revenue(&self) -> i64 {
        self.last_revenue
    }

    pub(crate) fn set_last_revenue(&mut self, revenue: i64) {
        self.last_revenue = revenue;
    }

    pub fn clear(&mut self) {
        self.planting = None;
        self.last_revenue = 0;
    }
}

/// Catalog entry for a field before it gets an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    pub capacity: u32,
    pub soil_quality: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("the catalog must contain at least one field")]
    NoFields,
    #[error("unknown crop id {0}")]
    UnknownCrop(usize),
    #[error("field id {0} is not owned by the player")]
    NotOwned(usize),
    #[error("field id {0} is not available for purchase")]
    NotAvailable(usize),
    #[error("field '{0}' is already planted")]
    FieldNotEmpty(String),
    #[error("field '{field}' holds at most {capacity} units, {requested} requested")]
    CapacityExceeded {
        field: String,
        capacity: u32,
        requested: u32,
    },
    #[error("insufficient funds: {required} required, {balance} available")]
    InsufficientFunds { required: i64, balance: i64 },
}

/// Per-round scratch data written by the round pipeline.
#[derive(Debug, Default, Clone)]
pub struct Season {
    pub weather: Option<Weather>,
    pub revenue: i64,
    pub report: Option<RoundReport>,
}

/// The whole mutable state of a game.
#[derive(Debug, Clone)]
pub struct World {
    balance: i64,
    expenditure: i64,
    new_assets: i64,
    year: u32,
    score: Option<i64>,
    crops: Vec<Crop>,
    owned: Vec<Field>,
    available: Vec<Field>,
    exiting: bool,
    pub(crate) season: Season,
}

impl World {
    /// Build a world from the catalog. The first field is handed to the
    /// player as starting inventory.
    pub fn new(
        starting_balance: i64,
        crops: Vec<Crop>,
        fields: Vec<FieldSpec>,
    ) -> Result<Self, WorldError> {
        let mut available: Vec<Field> = fields
            .into_iter()
            .enumerate()
            .map(|(index, spec)| Field {
                id: FieldId(index),
                name: spec.name,
                description: spec.description,
                price: spec.price,
                capacity: spec.capacity,
                soil_quality: spec.soil_quality,
                planting: None,
                last_revenue: 0,
            })
            .collect();
        if available.is_empty() {
            return Err(WorldError::NoFields);
        }
        let starter = available.remove(0);
        Ok(Self {
            balance: starting_balance,
            expenditure: 0,
            new_assets: 0,
            year: 1,
            score: None,
            crops,
            owned: vec![starter],
            available,
            exiting: false,
            season: Season::default(),
        })
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn expenditure(&self) -> i64 {
        self.expenditure
    }

    pub fn new_assets(&self) -> i64 {
        self.new_assets
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn score(&self) -> Option<i64> {
        self.score
    }

    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    pub fn crop_ids(&self) -> impl Iterator<Item = CropId> + '_ {
        (0..self.crops.len()).map(CropId)
    }

    pub fn crop(&self, id: CropId) -> Option<&Crop> {
        self.crops.get(id.0)
    }

    pub fn owned_fields(&self) -> &[Field] {
        &self.owned
    }

    /// Owned fields alongside the catalog they reference.
    pub(crate) fn fields_and_crops_mut(&mut self) -> (&mut [Field], &[Crop]) {
        (&mut self.owned, &self.crops)
    }

    pub fn available_fields(&self) -> &[Field] {
        &self.available
    }

    pub fn owned_field(&self, id: FieldId) -> Option<&Field> {
        self.owned.iter().find(|field| field.id == id)
    }

    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    pub fn request_exit(&mut self) {
        self.exiting = true;
    }

    pub fn empty_fields(&self) -> Vec<&Field> {
        self.owned.iter().filter(|field| field.is_empty()).collect()
    }

    pub fn has_empty_field(&self) -> bool {
        self.owned.iter().any(Field::is_empty)
    }

    /// Crops whose unit cost does not exceed the current balance.
    pub fn affordable_crops(&self) -> Vec<(CropId, &Crop)> {
        self.crops
            .iter()
            .enumerate()
            .filter(|(_, crop)| crop.cost <= self.balance)
            .map(|(index, crop)| (CropId(index), crop))
            .collect()
    }

    pub fn lowest_crop_cost(&self) -> Option<i64> {
        self.crops.iter().map(|crop| crop.cost).min()
    }

    /// The player is solvent while the balance exceeds the cheapest crop.
    pub fn can_afford_crops(&self) -> bool {
        self.lowest_crop_cost()
            .is_some_and(|cheapest| self.balance > cheapest)
    }

    pub fn asset_value(&self) -> i64 {
        self.owned.iter().map(|field| field.price).sum()
    }

    /// Largest quantity of `crop` that fits in `field` and the balance.
    pub fn max_volume(&self, field: FieldId, crop: CropId) -> Result<u32, WorldError> {
        let field = self
            .owned_field(field)
            .ok_or(WorldError::NotOwned(field.0))?;
        let crop = self.crop(crop).ok_or(WorldError::UnknownCrop(crop.0))?;
        let by_funds = self.balance.checked_div(crop.cost).unwrap_or(0).max(0);
        Ok(u32::try_from(by_funds)
            .unwrap_or(u32::MAX)
            .min(field.capacity))
    }

    /// Plant `quantity` units of `crop` in an empty owned field, paying for
    /// them out of the balance. Returns the amount spent.
    pub fn plant(
        &mut self,
        field_id: FieldId,
        crop_id: CropId,
        quantity: u32,
    ) -> Result<i64, WorldError> {
        let cost = self
            .crop(crop_id)
            .ok_or(WorldError::UnknownCrop(crop_id.0))?
            .cost;
        let balance = self.balance;
        let field = self
            .owned
            .iter_mut()
            .find(|field| field.id == field_id)
            .ok_or(WorldError::NotOwned(field_id.0))?;
        if !field.is_empty() {
            return Err(WorldError::FieldNotEmpty(field.name.clone()));
        }
        if quantity > field.capacity {
            return Err(WorldError::CapacityExceeded {
                field: field.name.clone(),
                capacity: field.capacity,
                requested: quantity,
            });
        }
        let total = cost * i64::from(quantity);
        if total > balance {
            return Err(WorldError::InsufficientFunds {
                required: total,
                balance,
            });
        }
        if quantity > 0 {
            field.planting = Some(Planting {
                crop: crop_id,
                quantity,
            });
        }
        self.balance -= total;
        self.expenditure += total;
        Ok(total)
    }

    /// Move an available field into the player's ownership. Returns the
    /// price paid.
    pub fn purchase_field(&mut self, id: FieldId) -> Result<i64, WorldError> {
        let index = self
            .available
            .iter()
            .position(|field| field.id == id)
            .ok_or(WorldError::NotAvailable(id.0))?;
        let price = self.available[index].price;
        if price > self.balance {
            return Err(WorldError::InsufficientFunds {
                required: price,
                balance: self.balance,
            });
        }
        let field = self.available.remove(index);
        self.owned.push(field);
        self.balance -= price;
        self.expenditure += price;
        self.new_assets += price;
        Ok(price)
    }

    pub(crate) fn credit(&mut self, amount: i64) {
        self.balance += amount;
    }

    pub(crate) fn advance_year(&mut self) {
        self.year += 1;
    }

    pub(crate) fn reset_accumulators(&mut self) {
        self.expenditure = 0;
        self.new_assets = 0;
    }

    pub(crate) fn clear_fields(&mut self) {
        for field in &mut self.owned {
            field.clear();
        }
    }

    /// Fix the final score. Only the first call has an effect.
    pub fn settle_score(&mut self) -> i64 {
        let value = self.balance + self.asset_value();
        *self.score.get_or_insert(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crop(name: &str, cost: i64) -> Crop {
        Crop {
            name: name.into(),
            description: String::new(),
            cost,
            sale_price: cost * 2,
            ideal_heat: 1.0,
            ideal_wetness: 1.0,
            heat_factor: 1.0,
            wetness_factor: 1.0,
        }
    }

    fn field(name: &str, price: i64, capacity: u32) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            description: String::new(),
            price,
            capacity,
            soil_quality: 1.0,
        }
    }

    fn world(balance: i64) -> World {
        World::new(
            balance,
            vec![crop("Oats", 50), crop("Barley", 80)],
            vec![field("Home", 300, 20), field("Meadow", 400, 30)],
        )
        .unwrap()
    }

    #[test]
    fn first_field_is_granted() {
        let world = world(500);
        assert_eq!(world.owned_fields().len(), 1);
        assert_eq!(world.owned_fields()[0].name, "Home");
        assert_eq!(world.available_fields().len(), 1);
        assert_eq!(world.asset_value(), 300);
        assert_eq!(world.year(), 1);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = World::new(500, vec![crop("Oats", 50)], Vec::new()).unwrap_err();
        assert_eq!(err, WorldError::NoFields);
    }

    #[test]
    fn solvency_requires_strictly_more_than_cheapest_crop() {
        assert!(world(51).can_afford_crops());
        assert!(!world(50).can_afford_crops());
        assert!(!world(49).can_afford_crops());
    }

    #[test]
    fn max_volume_is_bounded_by_funds_and_capacity() {
        let home = world(500).owned_fields()[0].id();
        assert_eq!(world(500).max_volume(home, CropId(0)).unwrap(), 10);
        assert_eq!(world(5_000).max_volume(home, CropId(0)).unwrap(), 20);
    }

    #[test]
    fn planting_charges_balance_and_expenditure() {
        let mut world = world(500);
        let home = world.owned_fields()[0].id();
        let spent = world.plant(home, CropId(0), 9).unwrap();
        assert_eq!(spent, 450);
        assert_eq!(world.balance(), 50);
        assert_eq!(world.expenditure(), 450);
        assert_eq!(world.owned_fields()[0].quantity(), 9);
        assert_eq!(world.owned_fields()[0].crop(), Some(CropId(0)));
        assert!(!world.has_empty_field());
    }

    #[test]
    fn planting_rejects_overfill_and_overspend() {
        let mut world = world(5_000);
        let home = world.owned_fields()[0].id();
        assert!(matches!(
            world.plant(home, CropId(0), 21),
            Err(WorldError::CapacityExceeded { .. })
        ));
        let mut poor = self::world(100);
        assert!(matches!(
            poor.plant(home, CropId(0), 3),
            Err(WorldError::InsufficientFunds { .. })
        ));
        assert_eq!(poor.balance(), 100);
        assert!(poor.has_empty_field());
    }

    #[test]
    fn purchase_moves_field_once() {
        let mut world = world(500);
        let meadow = world.available_fields()[0].id();
        assert_eq!(world.purchase_field(meadow).unwrap(), 400);
        assert_eq!(world.balance(), 100);
        assert_eq!(world.new_assets(), 400);
        assert_eq!(world.expenditure(), 400);
        assert!(world.available_fields().is_empty());
        assert_eq!(
            world.purchase_field(meadow),
            Err(WorldError::NotAvailable(meadow.raw()))
        );
        assert_eq!(world.owned_fields().len(), 2);
    }

    #[test]
    fn unaffordable_purchase_changes_nothing() {
        let mut world = world(399);
        let meadow = world.available_fields()[0].id();
        assert!(matches!(
            world.purchase_field(meadow),
            Err(WorldError::InsufficientFunds { .. })
        ));
        assert_eq!(world.balance(), 399);
        assert_eq!(world.available_fields().len(), 1);
        assert_eq!(world.expenditure(), 0);
    }

    #[test]
    fn score_is_settled_once() {
        let mut world = world(500);
        assert_eq!(world.settle_score(), 800);
        world.credit(100);
        assert_eq!(world.settle_score(), 800);
        assert_eq!(world.score(), Some(800));
    }
}
