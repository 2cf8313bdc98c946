//! The pricing facade: region resolution, batched fetches, per-ingredient
//! selection and dish-level aggregation.

use std::collections::HashMap;

use time::Date;
use tracing::debug;

use crate::store::{Dish, DishFilter, DishIngredientLink, Id, IngredientBaseline, OfferRow, PricingStore};

use super::aggregate::{self, IngredientPricing};
use super::dto::{DishIngredientView, DishPricing};
use super::select;
use super::units;

pub async fn resolve_region_ids(
    store: &dyn PricingStore,
    plz: Option<&str>,
) -> sqlx::Result<Vec<Id>> {
    match plz {
        Some(plz) => {
            let regions = store.resolve_regions(plz).await?;
            debug!(plz, regions = regions.len(), "resolved pricing regions");
            Ok(regions.into_iter().map(|r| r.id).collect())
        }
        None => Ok(Vec::new()),
    }
}

/// Offer lookup with the empty-set short-circuit: an empty region set means
/// "no known regional offers for this postal code", so no query is issued.
async fn find_valid_offers(
    store: &dyn PricingStore,
    ingredient_ids: &[Id],
    region_ids: &[Id],
    as_of: Date,
) -> sqlx::Result<HashMap<Id, Vec<OfferRow>>> {
    if ingredient_ids.is_empty() || region_ids.is_empty() {
        return Ok(HashMap::new());
    }
    store.fetch_valid_offers(ingredient_ids, region_ids, as_of).await
}

fn resolve_ingredient(
    link: &DishIngredientLink,
    baseline: Option<&IngredientBaseline>,
    offers: &[OfferRow],
    chain_id: Option<Id>,
) -> DishIngredientView {
    let selection = select::select(offers, chain_id);
    let offer_price_per_unit = selection
        .winner
        .as_ref()
        .map(|w| units::offer_unit_price(w.price_total, w.pack_size));
    let price_baseline_per_unit = baseline.and_then(|b| b.price_baseline_per_unit);

    DishIngredientView {
        dish_id: link.dish_id,
        ingredient_id: link.ingredient_id,
        ingredient_name: baseline.map(|b| b.name.clone()).unwrap_or_default(),
        qty: link.qty,
        unit: link.unit.clone(),
        unit_default: baseline.and_then(|b| b.unit_default.clone()),
        optional: link.optional,
        role: link.role.clone(),
        price_baseline_per_unit,
        offer_price_per_unit,
        savings_per_unit: aggregate::savings_per_unit(
            price_baseline_per_unit,
            offer_price_per_unit,
        ),
        has_offer: offer_price_per_unit.is_some(),
        all_offers: selection.ranked,
    }
}

fn pricing_from_views(dish_id: Id, views: &[DishIngredientView]) -> DishPricing {
    let rows: Vec<IngredientPricing> = views
        .iter()
        .map(|v| IngredientPricing {
            price_baseline_per_unit: v.price_baseline_per_unit,
            offer_price_per_unit: v.offer_price_per_unit,
        })
        .collect();
    aggregate::aggregate(dish_id, &rows)
}

/// Views and pricing for a whole page of dishes with three batched reads:
/// links, baselines, offers. Every requested dish id gets an entry; dishes
/// without links or offers come back zeroed.
pub async fn price_dishes(
    store: &dyn PricingStore,
    dish_ids: &[Id],
    plz: Option<&str>,
    chain_id: Option<Id>,
    as_of: Date,
) -> sqlx::Result<HashMap<Id, (DishPricing, Vec<DishIngredientView>)>> {
    let region_ids = resolve_region_ids(store, plz).await?;

    let links = if dish_ids.is_empty() {
        Vec::new()
    } else {
        store.fetch_dish_ingredients(dish_ids).await?
    };

    let mut ingredient_ids: Vec<Id> = links.iter().map(|l| l.ingredient_id).collect();
    ingredient_ids.sort_unstable();
    ingredient_ids.dedup();

    let baselines = if ingredient_ids.is_empty() {
        HashMap::new()
    } else {
        store.fetch_ingredient_baselines(&ingredient_ids).await?
    };
    let offers = find_valid_offers(store, &ingredient_ids, &region_ids, as_of).await?;

    let mut links_by_dish: HashMap<Id, Vec<&DishIngredientLink>> = HashMap::new();
    for link in &links {
        links_by_dish.entry(link.dish_id).or_default().push(link);
    }

    let mut out = HashMap::with_capacity(dish_ids.len());
    for &dish_id in dish_ids {
        let views: Vec<DishIngredientView> = links_by_dish
            .get(&dish_id)
            .map(|dish_links| {
                dish_links
                    .iter()
                    .map(|link| {
                        resolve_ingredient(
                            link,
                            baselines.get(&link.ingredient_id),
                            offers
                                .get(&link.ingredient_id)
                                .map(Vec::as_slice)
                                .unwrap_or_default(),
                            chain_id,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();
        let pricing = pricing_from_views(dish_id, &views);
        out.insert(dish_id, (pricing, views));
    }
    Ok(out)
}

/// List-view suppression predicate: with the offer filter active, dishes
/// with zero valid offers in the resolved regions are not shown.
pub fn should_list_dish(pricing: &DishPricing, only_with_offers: bool) -> bool {
    !only_with_offers || pricing.available_offers_count > 0
}

/// One catalog page with per-dish pricing, suppression already applied.
pub async fn list_dishes_priced(
    store: &dyn PricingStore,
    filter: &DishFilter,
    only_with_offers: bool,
    plz: Option<&str>,
    chain_id: Option<Id>,
    limit: i64,
    offset: i64,
    as_of: Date,
) -> sqlx::Result<Vec<(Dish, DishPricing)>> {
    let dishes = store.list_dishes(filter, limit, offset).await?;
    let dish_ids: Vec<Id> = dishes.iter().map(|d| d.id).collect();
    let mut priced = price_dishes(store, &dish_ids, plz, chain_id, as_of).await?;
    Ok(dishes
        .into_iter()
        .filter_map(|d| {
            let (pricing, _) = priced.remove(&d.id)?;
            should_list_dish(&pricing, only_with_offers).then_some((d, pricing))
        })
        .collect())
}

/// `None` when the dish id does not exist; an unmapped postal code is a
/// successful all-zero result, never an error.
pub async fn dish_pricing(
    store: &dyn PricingStore,
    dish_id: Id,
    plz: Option<&str>,
    chain_id: Option<Id>,
    as_of: Date,
) -> sqlx::Result<Option<DishPricing>> {
    if store.fetch_dish(dish_id).await?.is_none() {
        return Ok(None);
    }
    let mut priced = price_dishes(store, &[dish_id], plz, chain_id, as_of).await?;
    Ok(priced.remove(&dish_id).map(|(pricing, _)| pricing))
}

pub async fn dish_ingredients_view(
    store: &dyn PricingStore,
    dish_id: Id,
    plz: Option<&str>,
    chain_id: Option<Id>,
    as_of: Date,
) -> sqlx::Result<Option<Vec<DishIngredientView>>> {
    if store.fetch_dish(dish_id).await?.is_none() {
        return Ok(None);
    }
    let mut priced = price_dishes(store, &[dish_id], plz, chain_id, as_of).await?;
    Ok(priced.remove(&dish_id).map(|(_, views)| views))
}
