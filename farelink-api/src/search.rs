use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, Json};
use farelink_core::search::{SearchRequest, SearchResponse};
use farelink_core::CoreError;
use tracing::info;

pub async fn search_flights(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    info!(
        origin = %request.origin,
        destinations = ?request.destinations,
        "flight search received"
    );

    let response = state.search.search(request).await.map_err(|err| match err {
        CoreError::ValidationError(msg) => AppError::ValidationError(msg),
        other => AppError::InternalServerError(other.to_string()),
    })?;

    Ok(Json(response))
}
