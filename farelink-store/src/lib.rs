pub mod app_config;
pub mod flight_cache;
pub mod kv;
pub mod redis_store;

pub use flight_cache::FlightCache;
pub use kv::{CacheError, KeyValueStore, MemoryStore};
pub use redis_store::RedisStore;
