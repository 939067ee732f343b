use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tatra_catalog::{Quote, Tour};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub participants: Option<u64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tours", get(list_tours))
        .route("/tours/{slug}/quote", get(quote_tour))
}

/// GET /tours
async fn list_tours() -> Json<&'static [Tour]> {
    Json(tatra_catalog::tours())
}

/// GET /tours/{slug}/quote?participants=N
/// Price summary shown beside the booking form
async fn quote_tour(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<QuoteQuery>, QueryRejection>,
) -> Result<Json<Quote>, AppError> {
    let Query(query) = query?;
    let participants = state
        .validator
        .check_participants(query.participants.unwrap_or(1))?;

    Ok(Json(tatra_catalog::quote(&slug, participants)?))
}
