use crate::source::RawSource;
use crate::RecordError;
use async_trait::async_trait;
use chrono::DateTime;
use farelink_core::adapter::{ProviderAdapter, ProviderError};
use farelink_core::airports::AirportRegistry;
use farelink_core::flight::{
    AirlineInfo, BaggageDetails, DurationDetails, Flight, LocationDetails, PriceDetails,
};
use farelink_core::money::format_price;
use farelink_core::provider::ProviderKind;
use farelink_core::search::SearchRequest;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const KIND: ProviderKind = ProviderKind::Garuda;

/// Garuda ships RFC3339 timestamps and nested departure/arrival objects.
#[derive(Debug, Deserialize)]
struct GarudaResponse {
    flights: Vec<GarudaFlight>,
}

#[derive(Debug, Deserialize)]
struct GarudaFlight {
    flight_id: String,
    airline: String,
    airline_code: String,
    departure: GarudaStop,
    arrival: GarudaStop,
    stops: u32,
    aircraft: String,
    price: GarudaPrice,
    available_seats: i32,
    fare_class: String,
    baggage: GarudaBaggage,
    #[serde(default)]
    amenities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GarudaStop {
    airport: String,
    city: String,
    time: String,
}

#[derive(Debug, Deserialize)]
struct GarudaPrice {
    amount: f64,
    currency: String,
}

#[derive(Debug, Deserialize)]
struct GarudaBaggage {
    carry_on: u32,
    checked: u32,
}

impl GarudaFlight {
    fn validate(&self) -> Result<(), RecordError> {
        let dep = DateTime::parse_from_rfc3339(&self.departure.time).map_err(|err| {
            RecordError::BadTimestamp {
                id: self.flight_id.clone(),
                field: "departure",
                message: err.to_string(),
            }
        })?;
        let arr = DateTime::parse_from_rfc3339(&self.arrival.time).map_err(|err| {
            RecordError::BadTimestamp {
                id: self.flight_id.clone(),
                field: "arrival",
                message: err.to_string(),
            }
        })?;
        if arr <= dep {
            return Err(RecordError::ArrivalBeforeDeparture {
                id: self.flight_id.clone(),
            });
        }
        if self.departure.airport == self.arrival.airport {
            return Err(RecordError::CircularRoute {
                id: self.flight_id.clone(),
                code: self.departure.airport.clone(),
            });
        }
        if self.price.amount <= 0.0 {
            return Err(RecordError::BadPrice {
                id: self.flight_id.clone(),
                amount: self.price.amount,
            });
        }
        if self.available_seats < 0 {
            return Err(RecordError::NegativeSeats {
                id: self.flight_id.clone(),
                seats: self.available_seats,
            });
        }
        Ok(())
    }
}

pub struct GarudaAdapter {
    source: Arc<dyn RawSource>,
    airports: Arc<AirportRegistry>,
    deadline: Duration,
}

impl GarudaAdapter {
    pub fn new(
        source: Arc<dyn RawSource>,
        airports: Arc<AirportRegistry>,
        deadline: Duration,
    ) -> Self {
        Self {
            source,
            airports,
            deadline,
        }
    }

    async fn fetch_inner(&self) -> Result<Vec<Flight>, ProviderError> {
        let payload = self
            .source
            .fetch_payload()
            .await
            .map_err(|err| ProviderError::Fetch {
                provider: KIND.code(),
                message: err.to_string(),
            })?;

        let response: GarudaResponse =
            serde_json::from_str(&payload).map_err(|err| ProviderError::Parse {
                provider: KIND.code(),
                message: err.to_string(),
            })?;

        Ok(self.map_flights(response.flights))
    }

    fn map_flights(&self, raw_flights: Vec<GarudaFlight>) -> Vec<Flight> {
        let mut flights = Vec::with_capacity(raw_flights.len());
        for raw in raw_flights {
            if let Err(err) = raw.validate() {
                warn!(provider = %KIND, error = %err, "dropping record failing integrity checks");
                continue;
            }
            match self.map_flight(&raw) {
                Ok(flight) => flights.push(flight),
                Err(err) => {
                    warn!(provider = %KIND, flight = %raw.flight_id, error = %err, "dropping unmappable record");
                }
            }
        }
        flights
    }

    fn map_flight(&self, raw: &GarudaFlight) -> Result<Flight, chrono::ParseError> {
        let dep = DateTime::parse_from_rfc3339(&raw.departure.time)?;
        let arr = DateTime::parse_from_rfc3339(&raw.arrival.time)?;
        // Derived from the timestamp delta, never the provider's own
        // duration field.
        let total_minutes = (arr - dep).num_minutes();

        let aircraft = if raw.aircraft.is_empty() {
            None
        } else {
            Some(raw.aircraft.clone())
        };

        Ok(Flight {
            id: format!("{}_{}", raw.flight_id, KIND.code()),
            provider: KIND.display_name().to_string(),
            airline: AirlineInfo {
                name: raw.airline.clone(),
                code: raw.airline_code.clone(),
            },
            flight_number: raw.flight_id.clone(),
            departure: LocationDetails {
                airport: self.airports.airport_name(&raw.departure.airport).to_string(),
                city: raw.departure.city.clone(),
                code: raw.departure.airport.clone(),
                datetime: dep,
                timestamp: dep.timestamp(),
            },
            arrival: LocationDetails {
                airport: self.airports.airport_name(&raw.arrival.airport).to_string(),
                city: raw.arrival.city.clone(),
                code: raw.arrival.airport.clone(),
                datetime: arr,
                timestamp: arr.timestamp(),
            },
            duration: DurationDetails::from_minutes(total_minutes),
            stops: raw.stops,
            price: PriceDetails {
                amount: raw.price.amount,
                currency: raw.price.currency.clone(),
                formatted: format_price(raw.price.amount, &raw.price.currency),
            },
            available_seats: raw.available_seats,
            cabin_class: raw.fare_class.clone(),
            aircraft,
            amenities: raw.amenities.clone(),
            baggage: BaggageDetails {
                carry_on: format!("{} piece(s)", raw.baggage.carry_on),
                checked: format!("{} piece(s)", raw.baggage.checked),
            },
        })
    }
}

#[async_trait]
impl ProviderAdapter for GarudaAdapter {
    fn kind(&self) -> ProviderKind {
        KIND
    }

    async fn fetch(&self, _request: &SearchRequest) -> Result<Vec<Flight>, ProviderError> {
        match tokio::time::timeout(self.deadline, self.fetch_inner()).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: KIND.code(),
                deadline_ms: self.deadline.as_millis() as u64,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StaticSource;

    const PAYLOAD: &str = r#"
    {
        "status": "success",
        "flights": [
            {
                "flight_id": "GA-421",
                "airline": "Garuda Indonesia",
                "airline_code": "GA",
                "departure": {"airport": "CGK", "city": "Jakarta", "time": "2025-12-15T06:00:00+07:00", "terminal": "3"},
                "arrival": {"airport": "SBY", "city": "Surabaya", "time": "2025-12-15T07:30:00+07:00", "terminal": "1"},
                "duration_minutes": 85,
                "stops": 0,
                "aircraft": "Boeing 737-800",
                "price": {"amount": 1450000, "currency": "IDR"},
                "available_seats": 23,
                "fare_class": "economy",
                "baggage": {"carry_on": 1, "checked": 2},
                "amenities": ["wifi", "meals"]
            }
        ]
    }
    "#;

    fn adapter(source: StaticSource) -> GarudaAdapter {
        GarudaAdapter::new(
            Arc::new(source),
            Arc::new(AirportRegistry::new()),
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn test_maps_valid_payload() {
        let flights = adapter(StaticSource::new(PAYLOAD))
            .fetch(&SearchRequest::default())
            .await
            .unwrap();

        assert_eq!(flights.len(), 1);
        let flight = &flights[0];
        assert_eq!(flight.id, "GA-421_Garuda");
        assert_eq!(flight.provider, "Garuda Indonesia");
        assert_eq!(flight.departure.airport, "Soekarno-Hatta International Airport");
        assert_eq!(flight.departure.city, "Jakarta");
        // 90 minutes from the timestamps, not the 85 the payload claims.
        assert_eq!(flight.duration.total_minutes, 90);
        assert_eq!(flight.price.formatted.as_deref(), Some("Rp 1.450.000"));
        assert_eq!(flight.baggage.checked, "2 piece(s)");
    }

    #[tokio::test]
    async fn test_malformed_record_does_not_suppress_siblings() {
        let payload = r#"
        {
            "flights": [
                {
                    "flight_id": "GA-700",
                    "airline": "Garuda Indonesia",
                    "airline_code": "GA",
                    "departure": {"airport": "CGK", "city": "Jakarta", "time": "not-a-time"},
                    "arrival": {"airport": "SBY", "city": "Surabaya", "time": "2025-12-15T07:30:00+07:00"},
                    "stops": 0,
                    "aircraft": "",
                    "price": {"amount": 900000, "currency": "IDR"},
                    "available_seats": 5,
                    "fare_class": "economy",
                    "baggage": {"carry_on": 1, "checked": 1}
                },
                {
                    "flight_id": "GA-421",
                    "airline": "Garuda Indonesia",
                    "airline_code": "GA",
                    "departure": {"airport": "CGK", "city": "Jakarta", "time": "2025-12-15T06:00:00+07:00"},
                    "arrival": {"airport": "SBY", "city": "Surabaya", "time": "2025-12-15T07:30:00+07:00"},
                    "stops": 0,
                    "aircraft": "Boeing 737-800",
                    "price": {"amount": 1450000, "currency": "IDR"},
                    "available_seats": 23,
                    "fare_class": "economy",
                    "baggage": {"carry_on": 1, "checked": 2}
                }
            ]
        }
        "#;

        let flights = adapter(StaticSource::new(payload))
            .fetch(&SearchRequest::default())
            .await
            .unwrap();

        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].id, "GA-421_Garuda");
    }

    #[tokio::test]
    async fn test_unparsable_payload_fails_the_call() {
        let err = adapter(StaticSource::new("{ not json"))
            .fetch(&SearchRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_empty_flight_list_is_not_an_error() {
        let flights = adapter(StaticSource::new(r#"{"status": "success", "flights": []}"#))
            .fetch(&SearchRequest::default())
            .await
            .unwrap();
        assert!(flights.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_elapse_reports_timeout() {
        let source = StaticSource::new(PAYLOAD).with_delay(Duration::from_secs(5));
        let err = adapter(source)
            .fetch(&SearchRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout { deadline_ms: 2000, .. }));
    }

    #[tokio::test]
    async fn test_source_failure_reports_fetch_error() {
        let err = adapter(StaticSource::failing("connection refused"))
            .fetch(&SearchRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Fetch { .. }));
    }
}
