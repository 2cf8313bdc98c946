use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;
use crate::store::Id;

use super::dto::{DishIngredientView, DishPricing, PricingQuery};
use super::service;

lazy_static! {
    static ref PLZ_RE: Regex = Regex::new(r"^\d{5}$").unwrap();
}

/// PLZ syntax is checked at the boundary; the core only has to cope with
/// well-formed codes that map to zero regions.
pub(crate) fn validate_plz(plz: Option<&str>) -> Result<Option<&str>, AppError> {
    match plz {
        Some(p) if !PLZ_RE.is_match(p) => Err(AppError::BadRequest(format!(
            "invalid postal code: {p}"
        ))),
        other => Ok(other),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dishes/:id/pricing", get(get_dish_pricing))
        .route("/dishes/:id/ingredients", get(get_dish_ingredients))
}

#[instrument(skip(state))]
async fn get_dish_pricing(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Query(q): Query<PricingQuery>,
) -> Result<Json<DishPricing>, AppError> {
    let plz = validate_plz(q.plz.as_deref())?;
    let as_of = OffsetDateTime::now_utc().date();
    let pricing = service::dish_pricing(state.store.as_ref(), id, plz, q.chain_id, as_of).await?;
    pricing.map(Json).ok_or(AppError::NotFound("dish"))
}

#[instrument(skip(state))]
async fn get_dish_ingredients(
    State(state): State<AppState>,
    Path(id): Path<Id>,
    Query(q): Query<PricingQuery>,
) -> Result<Json<Vec<DishIngredientView>>, AppError> {
    let plz = validate_plz(q.plz.as_deref())?;
    let as_of = OffsetDateTime::now_utc().date();
    let views =
        service::dish_ingredients_view(state.store.as_ref(), id, plz, q.chain_id, as_of).await?;
    views.map(Json).ok_or(AppError::NotFound("dish"))
}
