use std::collections::HashMap;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::FromRow;
use time::Date;

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub type Id = i64;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Dish {
    pub id: Id,
    pub name: String,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub season: Option<String>,
    pub notes: Option<String>,
    pub is_quick: bool,
    pub is_meal_prep: bool,
}

/// Link row between a dish and an ingredient. `qty`/`unit` may be null
/// (assignment-only); they never enter the savings math.
#[derive(Debug, Clone, FromRow)]
pub struct DishIngredientLink {
    pub dish_id: Id,
    pub ingredient_id: Id,
    pub qty: Option<f64>,
    pub unit: Option<String>,
    pub optional: bool,
    pub role: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct IngredientBaseline {
    pub id: Id,
    pub name: String,
    pub unit_default: Option<String>,
    pub price_baseline_per_unit: Option<f64>,
}

/// A date-valid promotional price, already joined with its chain name.
#[derive(Debug, Clone, FromRow)]
pub struct OfferRow {
    pub id: Id,
    pub ingredient_id: Id,
    pub region_id: Id,
    pub chain_id: Id,
    pub chain_name: String,
    pub price_total: f64,
    pub pack_size: f64,
    pub unit_base: Option<String>,
    pub valid_from: Date,
    pub valid_to: Date,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Region {
    pub id: Id,
    pub chain_id: Id,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Chain {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct DishFilter {
    pub category: Option<String>,
    pub quick: Option<bool>,
    pub meal_prep: Option<bool>,
}

/// Read-only query boundary of the pricing core. The core never writes;
/// offers and catalog rows are ingested elsewhere.
#[async_trait]
pub trait PricingStore: Send + Sync {
    /// All regions mapped to a postal code. Empty is a valid outcome
    /// ("no offers available for this code"), not an error.
    async fn resolve_regions(&self, plz: &str) -> sqlx::Result<Vec<Region>>;

    async fn fetch_dish(&self, dish_id: Id) -> sqlx::Result<Option<Dish>>;

    async fn list_dishes(
        &self,
        filter: &DishFilter,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Dish>>;

    /// Links for a whole page of dishes in one round trip.
    async fn fetch_dish_ingredients(
        &self,
        dish_ids: &[Id],
    ) -> sqlx::Result<Vec<DishIngredientLink>>;

    async fn fetch_ingredient_baselines(
        &self,
        ingredient_ids: &[Id],
    ) -> sqlx::Result<HashMap<Id, IngredientBaseline>>;

    /// Offers valid at `as_of` (inclusive on both window ends) in any of the
    /// given regions, grouped by ingredient, ascending `price_total` within
    /// each group. Definitive ordering is applied later by the selector.
    async fn fetch_valid_offers(
        &self,
        ingredient_ids: &[Id],
        region_ids: &[Id],
        as_of: Date,
    ) -> sqlx::Result<HashMap<Id, Vec<OfferRow>>>;

    async fn fetch_chains_by_ids(&self, chain_ids: &[Id]) -> sqlx::Result<HashMap<Id, String>>;

    async fn list_chains(&self) -> sqlx::Result<Vec<Chain>>;
}
