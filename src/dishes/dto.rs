use serde::{Deserialize, Serialize};

use crate::pricing::dto::{DishIngredientView, DishPricing};
use crate::store::{Dish, Id};

#[derive(Debug, Deserialize)]
pub struct DishListQuery {
    pub plz: Option<String>,
    pub chain_id: Option<Id>,
    pub category: Option<String>,
    pub quick: Option<bool>,
    pub meal_prep: Option<bool>,
    #[serde(default)]
    pub only_with_offers: bool,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize)]
pub struct DishListItem {
    pub id: Id,
    pub name: String,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub season: Option<String>,
    pub is_quick: bool,
    pub is_meal_prep: bool,
    pub pricing: DishPricing,
}

#[derive(Debug, Serialize)]
pub struct DishDetails {
    #[serde(flatten)]
    pub dish: Dish,
    pub pricing: DishPricing,
    pub ingredients: Vec<DishIngredientView>,
}
