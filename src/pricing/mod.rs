mod aggregate;
pub mod dto;
pub mod handlers;
mod select;
pub mod service;
pub mod units;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::router()
}
