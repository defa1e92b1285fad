use farelink_api::{app, AppState};
use farelink_core::airports::AirportRegistry;
use farelink_engine::FlightSearchService;
use farelink_providers::ProviderRegistry;
use farelink_store::{FlightCache, KeyValueStore, RedisStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "farelink_api=debug,farelink_engine=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = farelink_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Farelink API on port {}", config.server.port);

    let store: Arc<dyn KeyValueStore> =
        Arc::new(RedisStore::new(&config.redis.url).expect("Failed to open Redis client"));
    let cache = FlightCache::new(store, Duration::from_secs(config.cache.ttl_seconds));

    let airports = Arc::new(AirportRegistry::new());
    let registry = ProviderRegistry::from_config(&config.providers, airports);

    let search = Arc::new(FlightSearchService::new(
        registry,
        cache,
        config.scoring.clone(),
    ));

    let app = app(AppState { search });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
