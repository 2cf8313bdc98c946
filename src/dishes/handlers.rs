use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;

use crate::error::AppError;
use crate::pricing::dto::PricingQuery;
use crate::pricing::handlers::validate_plz;
use crate::pricing::service;
use crate::state::AppState;
use crate::store::{DishFilter, Id};

use super::dto::{DishDetails, DishListItem, DishListQuery};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dishes", get(list_dishes))
        .route("/dishes/:id", get(get_dish))
}

/// The offer filter needs resolved regions, so it is meaningless without a
/// postal code.
fn check_offer_filter(only_with_offers: bool, plz: Option<&str>) -> Result<(), AppError> {
    if only_with_offers && plz.is_none() {
        return Err(AppError::BadRequest(
            "only_with_offers requires a plz".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state))]
async fn list_dishes(
    State(state): State<AppState>,
    Query(q): Query<DishListQuery>,
) -> Result<Json<Vec<DishListItem>>, AppError> {
    let plz = validate_plz(q.plz.as_deref())?;
    check_offer_filter(q.only_with_offers, plz)?;

    let filter = DishFilter {
        category: q.category.clone(),
        quick: q.quick,
        meal_prep: q.meal_prep,
    };
    let as_of = OffsetDateTime::now_utc().date();
    let listed = service::list_dishes_priced(
        state.store.as_ref(),
        &filter,
        q.only_with_offers,
        plz,
        q.chain_id,
        q.limit,
        q.offset,
        as_of,
    )
    .await?;

    let items = listed
        .into_iter()
        .map(|(d, pricing)| DishListItem {
            id: d.id,
            name: d.name,
            category: d.category,
            cuisine: d.cuisine,
            season: d.season,
            is_quick: d.is_quick,
            is_meal_prep: d.is_meal_prep,
            pricing,
        })
        .collect();
    Ok(Json(items))
}

#[instrument(skip(state))]
async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Query(q): Query<PricingQuery>,
) -> Result<Json<DishDetails>, AppError> {
    let plz = validate_plz(q.plz.as_deref())?;
    let dish = state
        .store
        .fetch_dish(id)
        .await?
        .ok_or(AppError::NotFound("dish"))?;

    let as_of = OffsetDateTime::now_utc().date();
    let mut priced =
        service::price_dishes(state.store.as_ref(), &[id], plz, q.chain_id, as_of).await?;
    // price_dishes returns an entry for every requested id
    let (pricing, ingredients) = priced.remove(&id).ok_or(AppError::NotFound("dish"))?;

    Ok(Json(DishDetails {
        dish,
        pricing,
        ingredients,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offer_filter_without_plz_is_rejected() {
        let err = check_offer_filter(true, None).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn offer_filter_with_plz_passes() {
        assert!(check_offer_filter(true, Some("04109")).is_ok());
        assert!(check_offer_filter(false, None).is_ok());
    }
}
