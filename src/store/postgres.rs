use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;

use super::{
    Chain, Dish, DishFilter, DishIngredientLink, Id, IngredientBaseline, OfferRow, PricingStore,
    Region,
};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PricingStore for PgStore {
    async fn resolve_regions(&self, plz: &str) -> sqlx::Result<Vec<Region>> {
        sqlx::query_as::<_, Region>(
            r#"
            SELECT r.id, r.chain_id, r.label
            FROM plz_regions pr
            JOIN ad_regions r ON r.id = pr.region_id
            WHERE pr.plz = $1
            ORDER BY r.id
            "#,
        )
        .bind(plz)
        .fetch_all(&self.db)
        .await
    }

    async fn fetch_dish(&self, dish_id: Id) -> sqlx::Result<Option<Dish>> {
        sqlx::query_as::<_, Dish>(
            r#"
            SELECT id, name, category, cuisine, season, notes, is_quick, is_meal_prep
            FROM dishes
            WHERE id = $1
            "#,
        )
        .bind(dish_id)
        .fetch_optional(&self.db)
        .await
    }

    async fn list_dishes(
        &self,
        filter: &DishFilter,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Dish>> {
        sqlx::query_as::<_, Dish>(
            r#"
            SELECT id, name, category, cuisine, season, notes, is_quick, is_meal_prep
            FROM dishes
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::bool IS NULL OR is_quick = $2)
              AND ($3::bool IS NULL OR is_meal_prep = $3)
            ORDER BY name, id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(filter.category.as_deref())
        .bind(filter.quick)
        .bind(filter.meal_prep)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
    }

    async fn fetch_dish_ingredients(
        &self,
        dish_ids: &[Id],
    ) -> sqlx::Result<Vec<DishIngredientLink>> {
        sqlx::query_as::<_, DishIngredientLink>(
            r#"
            SELECT dish_id, ingredient_id, qty, unit, optional, role
            FROM dish_ingredients
            WHERE dish_id = ANY($1)
            ORDER BY dish_id, ingredient_id
            "#,
        )
        .bind(dish_ids)
        .fetch_all(&self.db)
        .await
    }

    async fn fetch_ingredient_baselines(
        &self,
        ingredient_ids: &[Id],
    ) -> sqlx::Result<HashMap<Id, IngredientBaseline>> {
        let rows = sqlx::query_as::<_, IngredientBaseline>(
            r#"
            SELECT id, name, unit_default, price_baseline_per_unit
            FROM ingredients
            WHERE id = ANY($1)
            "#,
        )
        .bind(ingredient_ids)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|r| (r.id, r)).collect())
    }

    async fn fetch_valid_offers(
        &self,
        ingredient_ids: &[Id],
        region_ids: &[Id],
        as_of: Date,
    ) -> sqlx::Result<HashMap<Id, Vec<OfferRow>>> {
        let rows = sqlx::query_as::<_, OfferRow>(
            r#"
            SELECT o.id, o.ingredient_id, o.region_id, o.chain_id,
                   c.name AS chain_name,
                   o.price_total, o.pack_size, o.unit_base,
                   o.valid_from, o.valid_to, o.source
            FROM offers o
            JOIN chains c ON c.id = o.chain_id
            WHERE o.ingredient_id = ANY($1)
              AND o.region_id = ANY($2)
              AND o.valid_from <= $3
              AND o.valid_to >= $3
            ORDER BY o.price_total ASC, o.id ASC
            "#,
        )
        .bind(ingredient_ids)
        .bind(region_ids)
        .bind(as_of)
        .fetch_all(&self.db)
        .await?;

        let mut by_ingredient: HashMap<Id, Vec<OfferRow>> = HashMap::new();
        for row in rows {
            by_ingredient.entry(row.ingredient_id).or_default().push(row);
        }
        Ok(by_ingredient)
    }

    async fn fetch_chains_by_ids(&self, chain_ids: &[Id]) -> sqlx::Result<HashMap<Id, String>> {
        let rows = sqlx::query_as::<_, Chain>(
            r#"
            SELECT id, name
            FROM chains
            WHERE id = ANY($1)
            "#,
        )
        .bind(chain_ids)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(|c| (c.id, c.name)).collect())
    }

    async fn list_chains(&self) -> sqlx::Result<Vec<Chain>> {
        sqlx::query_as::<_, Chain>(
            r#"
            SELECT id, name
            FROM chains
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.db)
        .await
    }
}
