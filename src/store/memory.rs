//! In-memory `PricingStore` used by service-level tests; mirrors the
//! filter and ordering semantics of the Postgres queries.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use time::Date;

use super::{
    Chain, Dish, DishFilter, DishIngredientLink, Id, IngredientBaseline, OfferRow, PricingStore,
    Region,
};

#[derive(Default)]
pub struct MemoryStore {
    pub dishes: Vec<Dish>,
    pub links: Vec<DishIngredientLink>,
    pub ingredients: Vec<IngredientBaseline>,
    pub offers: Vec<OfferRow>,
    pub plz_regions: Vec<(String, Region)>,
    pub chains: Vec<Chain>,
    /// Number of times the offer query actually ran, for asserting the
    /// empty-set short-circuit.
    pub offer_queries: AtomicUsize,
}

#[async_trait]
impl PricingStore for MemoryStore {
    async fn resolve_regions(&self, plz: &str) -> sqlx::Result<Vec<Region>> {
        Ok(self
            .plz_regions
            .iter()
            .filter(|(p, _)| p == plz)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn fetch_dish(&self, dish_id: Id) -> sqlx::Result<Option<Dish>> {
        Ok(self.dishes.iter().find(|d| d.id == dish_id).cloned())
    }

    async fn list_dishes(
        &self,
        filter: &DishFilter,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Dish>> {
        let mut dishes: Vec<Dish> = self
            .dishes
            .iter()
            .filter(|d| {
                filter
                    .category
                    .as_ref()
                    .map_or(true, |c| d.category.as_deref() == Some(c))
                    && filter.quick.map_or(true, |q| d.is_quick == q)
                    && filter.meal_prep.map_or(true, |m| d.is_meal_prep == m)
            })
            .cloned()
            .collect();
        dishes.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(dishes
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn fetch_dish_ingredients(
        &self,
        dish_ids: &[Id],
    ) -> sqlx::Result<Vec<DishIngredientLink>> {
        Ok(self
            .links
            .iter()
            .filter(|l| dish_ids.contains(&l.dish_id))
            .cloned()
            .collect())
    }

    async fn fetch_ingredient_baselines(
        &self,
        ingredient_ids: &[Id],
    ) -> sqlx::Result<HashMap<Id, IngredientBaseline>> {
        Ok(self
            .ingredients
            .iter()
            .filter(|i| ingredient_ids.contains(&i.id))
            .map(|i| (i.id, i.clone()))
            .collect())
    }

    async fn fetch_valid_offers(
        &self,
        ingredient_ids: &[Id],
        region_ids: &[Id],
        as_of: Date,
    ) -> sqlx::Result<HashMap<Id, Vec<OfferRow>>> {
        self.offer_queries.fetch_add(1, Ordering::SeqCst);
        let mut rows: Vec<OfferRow> = self
            .offers
            .iter()
            .filter(|o| {
                ingredient_ids.contains(&o.ingredient_id)
                    && region_ids.contains(&o.region_id)
                    && o.valid_from <= as_of
                    && o.valid_to >= as_of
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.price_total.total_cmp(&b.price_total).then(a.id.cmp(&b.id)));

        let mut by_ingredient: HashMap<Id, Vec<OfferRow>> = HashMap::new();
        for row in rows {
            by_ingredient.entry(row.ingredient_id).or_default().push(row);
        }
        Ok(by_ingredient)
    }

    async fn fetch_chains_by_ids(&self, chain_ids: &[Id]) -> sqlx::Result<HashMap<Id, String>> {
        Ok(self
            .chains
            .iter()
            .filter(|c| chain_ids.contains(&c.id))
            .map(|c| (c.id, c.name.clone()))
            .collect())
    }

    async fn list_chains(&self) -> sqlx::Result<Vec<Chain>> {
        let mut chains = self.chains.clone();
        chains.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(chains)
    }
}
