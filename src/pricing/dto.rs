use serde::{Deserialize, Serialize};
use time::Date;

use crate::store::Id;

/// Dish-level savings figures, computed fresh per request. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DishPricing {
    pub dish_id: Id,
    pub total_aggregated_savings: f64,
    pub ingredients_with_offers_count: u32,
    pub available_offers_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedOffer {
    pub offer_id: Id,
    pub price_total: f64,
    pub pack_size: f64,
    pub unit_base: Option<String>,
    pub source: Option<String>,
    pub valid_from: Date,
    pub valid_to: Date,
    pub chain_id: Id,
    pub chain_name: String,
    pub price_per_unit: f64,
    pub is_lowest_price: bool,
}

/// Display row for one ingredient of a dish, with the full ranked offer
/// list. Savings are per base unit; `qty`/`unit` are informational only.
#[derive(Debug, Clone, Serialize)]
pub struct DishIngredientView {
    pub dish_id: Id,
    pub ingredient_id: Id,
    pub ingredient_name: String,
    pub qty: Option<f64>,
    pub unit: Option<String>,
    pub unit_default: Option<String>,
    pub optional: bool,
    pub role: Option<String>,
    pub price_baseline_per_unit: Option<f64>,
    pub offer_price_per_unit: Option<f64>,
    pub savings_per_unit: Option<f64>,
    pub has_offer: bool,
    pub all_offers: Vec<RankedOffer>,
}

#[derive(Debug, Deserialize)]
pub struct PricingQuery {
    pub plz: Option<String>,
    pub chain_id: Option<Id>,
}
