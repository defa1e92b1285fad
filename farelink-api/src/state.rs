use farelink_engine::FlightSearchService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<FlightSearchService>,
}
