use crate::kv::KeyValueStore;
use farelink_core::flight::Flight;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Typed cache-aside gateway over the key-value store. A malfunctioning
/// cache degrades to a miss on read and a no-op on write; it is never
/// allowed to fail a search.
#[derive(Clone)]
pub struct FlightCache {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl FlightCache {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Stable key format, used identically for reads and writes.
    pub fn key(origin: &str, scope: &str, provider: &str) -> String {
        format!("flights:{}:{}:{}", origin, scope, provider)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached flights for a key, or None on miss. A backend
    /// or deserialization failure is logged and reported as a miss.
    pub async fn get_flights(&self, key: &str) -> Option<Vec<Flight>> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key, error = %err, "cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(flights) => Some(flights),
            Err(err) => {
                warn!(key, error = %err, "cached payload unreadable, treating as miss");
                None
            }
        }
    }

    /// Best-effort write-back after a successful live fetch. Failures are
    /// logged, never surfaced.
    pub async fn put_flights(&self, key: &str, flights: &[Flight]) {
        let raw = match serde_json::to_string(flights) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(key, error = %err, "failed to serialize flights for cache");
                return;
            }
        };

        if let Err(err) = self.store.set(key, &raw, self.ttl).await {
            warn!(key, error = %err, "cache write failed");
        }
    }

    pub async fn invalidate(&self, key: &str) {
        if let Err(err) = self.store.delete(key).await {
            warn!(key, error = %err, "cache delete failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use chrono::DateTime;
    use farelink_core::flight::{
        AirlineInfo, BaggageDetails, DurationDetails, LocationDetails, PriceDetails,
    };

    fn sample_flight() -> Flight {
        let dep = DateTime::parse_from_rfc3339("2025-12-15T08:00:00+07:00").unwrap();
        let arr = DateTime::parse_from_rfc3339("2025-12-15T09:30:00+07:00").unwrap();
        Flight {
            id: "GA-421_Garuda".to_string(),
            provider: "Garuda Indonesia".to_string(),
            airline: AirlineInfo {
                name: "Garuda Indonesia".to_string(),
                code: "GA".to_string(),
            },
            flight_number: "GA-421".to_string(),
            departure: LocationDetails {
                airport: "Soekarno-Hatta International Airport".to_string(),
                city: "Jakarta".to_string(),
                code: "CGK".to_string(),
                datetime: dep,
                timestamp: dep.timestamp(),
            },
            arrival: LocationDetails {
                airport: "Juanda International Airport".to_string(),
                city: "Surabaya".to_string(),
                code: "SBY".to_string(),
                datetime: arr,
                timestamp: arr.timestamp(),
            },
            duration: DurationDetails::from_minutes(90),
            stops: 0,
            price: PriceDetails {
                amount: 1_200_000.0,
                currency: "IDR".to_string(),
                formatted: Some("Rp 1.200.000".to_string()),
            },
            available_seats: 12,
            cabin_class: "economy".to_string(),
            aircraft: Some("Boeing 737-800".to_string()),
            amenities: vec!["wifi".to_string()],
            baggage: BaggageDetails {
                carry_on: "7kg".to_string(),
                checked: "20kg".to_string(),
            },
        }
    }

    #[test]
    fn test_key_format() {
        assert_eq!(
            FlightCache::key("CGK", "2025-12-15", "Garuda"),
            "flights:CGK:2025-12-15:Garuda"
        );
    }

    #[tokio::test]
    async fn test_round_trip_through_store() {
        let cache = FlightCache::new(Arc::new(MemoryStore::new()), Duration::from_secs(60));
        let key = FlightCache::key("CGK", "2025-12-15", "Garuda");

        assert!(cache.get_flights(&key).await.is_none());

        let flights = vec![sample_flight()];
        cache.put_flights(&key, &flights).await;

        let cached = cache.get_flights(&key).await.expect("expected a hit");
        assert_eq!(cached, flights);
    }

    #[tokio::test]
    async fn test_invalidate_removes_the_entry() {
        let cache = FlightCache::new(Arc::new(MemoryStore::new()), Duration::from_secs(60));
        let key = FlightCache::key("CGK", "2025-12-15", "Garuda");

        cache.put_flights(&key, &[sample_flight()]).await;
        assert!(cache.get_flights(&key).await.is_some());

        cache.invalidate(&key).await;
        assert!(cache.get_flights(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_payload_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        let cache = FlightCache::new(store.clone(), Duration::from_secs(60));
        let key = FlightCache::key("CGK", "2025-12-15", "Garuda");

        store
            .set(&key, "not-json", Duration::from_secs(60))
            .await
            .unwrap();

        assert!(cache.get_flights(&key).await.is_none());
    }
}
