//! Chain and region lookups backing the filter UI.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::AppError;
use crate::pricing::handlers::validate_plz;
use crate::state::AppState;
use crate::store::{Chain, Id};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chains", get(list_chains))
        .route("/regions", get(resolve_regions))
}

#[derive(Debug, Deserialize)]
struct RegionQuery {
    plz: String,
}

#[derive(Debug, Serialize)]
struct RegionInfo {
    id: Id,
    chain_id: Id,
    chain_name: Option<String>,
    label: String,
}

#[instrument(skip(state))]
async fn list_chains(State(state): State<AppState>) -> Result<Json<Vec<Chain>>, AppError> {
    Ok(Json(state.store.list_chains().await?))
}

#[instrument(skip(state))]
async fn resolve_regions(
    State(state): State<AppState>,
    Query(q): Query<RegionQuery>,
) -> Result<Json<Vec<RegionInfo>>, AppError> {
    validate_plz(Some(&q.plz))?;
    let regions = state.store.resolve_regions(&q.plz).await?;

    let mut chain_ids: Vec<Id> = regions.iter().map(|r| r.chain_id).collect();
    chain_ids.sort_unstable();
    chain_ids.dedup();
    let chain_names = if chain_ids.is_empty() {
        Default::default()
    } else {
        state.store.fetch_chains_by_ids(&chain_ids).await?
    };

    let infos = regions
        .into_iter()
        .map(|r| RegionInfo {
            id: r.id,
            chain_id: r.chain_id,
            chain_name: chain_names.get(&r.chain_id).cloned(),
            label: r.label,
        })
        .collect();
    Ok(Json(infos))
}
