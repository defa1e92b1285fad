pub mod error;
pub mod search;
pub mod state;

pub use state::AppState;

use axum::{routing::post, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/v1/flights/search", post(search::search_flights))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
