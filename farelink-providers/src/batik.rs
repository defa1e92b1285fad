use crate::source::RawSource;
use crate::RecordError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
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

const KIND: ProviderKind = ProviderKind::BatikAir;
// Offset without a colon, e.g. "2025-12-15T06:30:00+0700".
const DATETIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Batik Air uses camelCase field names and numeric-offset timestamps.
#[derive(Debug, Deserialize)]
struct BatikResponse {
    results: Vec<BatikFlight>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatikFlight {
    flight_number: String,
    airline_name: String,
    #[serde(rename = "airlineIATA")]
    airline_iata: String,
    origin: String,
    destination: String,
    departure_date_time: String,
    arrival_date_time: String,
    number_of_stops: u32,
    fare: BatikFare,
    seats_available: i32,
    aircraft_model: String,
    #[serde(default)]
    baggage_info: String,
    #[serde(default)]
    onboard_services: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatikFare {
    total_price: f64,
    currency_code: String,
    class: String,
}

fn parse_batik_time(
    id: &str,
    value: &str,
    field: &'static str,
) -> Result<DateTime<FixedOffset>, RecordError> {
    DateTime::parse_from_str(value, DATETIME_LAYOUT).map_err(|err| RecordError::BadTimestamp {
        id: id.to_string(),
        field,
        message: err.to_string(),
    })
}

impl BatikFlight {
    fn validate(&self) -> Result<(), RecordError> {
        let dep = parse_batik_time(&self.flight_number, &self.departure_date_time, "departure")?;
        let arr = parse_batik_time(&self.flight_number, &self.arrival_date_time, "arrival")?;
        if arr <= dep {
            return Err(RecordError::ArrivalBeforeDeparture {
                id: self.flight_number.clone(),
            });
        }
        if self.fare.total_price <= 0.0 {
            return Err(RecordError::BadPrice {
                id: self.flight_number.clone(),
                amount: self.fare.total_price,
            });
        }
        if self.origin == self.destination {
            return Err(RecordError::CircularRoute {
                id: self.flight_number.clone(),
                code: self.origin.clone(),
            });
        }
        if self.seats_available < 0 {
            return Err(RecordError::NegativeSeats {
                id: self.flight_number.clone(),
                seats: self.seats_available,
            });
        }
        Ok(())
    }

    /// "7kg cabin, 20kg checked" style notes; anything else keeps the
    /// route defaults.
    fn baggage(&self) -> BaggageDetails {
        let mut baggage = BaggageDetails {
            carry_on: "7kg".to_string(),
            checked: "20kg".to_string(),
        };
        let parts: Vec<&str> = self.baggage_info.split(',').collect();
        if parts.len() == 2 {
            baggage.carry_on = parts[0].replace("cabin", "").trim().to_string();
            baggage.checked = parts[1].replace("checked", "").trim().to_string();
        }
        baggage
    }
}

pub struct BatikAirAdapter {
    source: Arc<dyn RawSource>,
    airports: Arc<AirportRegistry>,
    deadline: Duration,
}

impl BatikAirAdapter {
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

        let response: BatikResponse =
            serde_json::from_str(&payload).map_err(|err| ProviderError::Parse {
                provider: KIND.code(),
                message: err.to_string(),
            })?;

        Ok(self.map_flights(response.results))
    }

    fn map_flights(&self, raw_flights: Vec<BatikFlight>) -> Vec<Flight> {
        let mut flights = Vec::with_capacity(raw_flights.len());
        for raw in raw_flights {
            if let Err(err) = raw.validate() {
                warn!(provider = %KIND, error = %err, "dropping record failing integrity checks");
                continue;
            }
            match self.map_flight(&raw) {
                Ok(flight) => flights.push(flight),
                Err(err) => {
                    warn!(provider = %KIND, flight = %raw.flight_number, error = %err, "dropping unmappable record");
                }
            }
        }
        flights
    }

    fn map_flight(&self, raw: &BatikFlight) -> Result<Flight, RecordError> {
        let dep = parse_batik_time(&raw.flight_number, &raw.departure_date_time, "departure")?;
        let arr = parse_batik_time(&raw.flight_number, &raw.arrival_date_time, "arrival")?;
        let total_minutes = (arr - dep).num_minutes();

        let aircraft = if raw.aircraft_model.is_empty() {
            None
        } else {
            Some(raw.aircraft_model.clone())
        };

        Ok(Flight {
            id: format!("{}_{}", raw.flight_number, KIND.code()),
            provider: KIND.display_name().to_string(),
            airline: AirlineInfo {
                name: raw.airline_name.clone(),
                code: raw.airline_iata.clone(),
            },
            flight_number: raw.flight_number.clone(),
            departure: LocationDetails {
                airport: self.airports.airport_name(&raw.origin).to_string(),
                city: self.airports.city_name(&raw.origin).to_string(),
                code: raw.origin.clone(),
                datetime: dep,
                timestamp: dep.timestamp(),
            },
            arrival: LocationDetails {
                airport: self.airports.airport_name(&raw.destination).to_string(),
                city: self.airports.city_name(&raw.destination).to_string(),
                code: raw.destination.clone(),
                datetime: arr,
                timestamp: arr.timestamp(),
            },
            duration: DurationDetails::from_minutes(total_minutes),
            stops: raw.number_of_stops,
            price: PriceDetails {
                amount: raw.fare.total_price,
                currency: raw.fare.currency_code.clone(),
                formatted: format_price(raw.fare.total_price, &raw.fare.currency_code),
            },
            available_seats: raw.seats_available,
            cabin_class: raw.fare.class.clone(),
            aircraft,
            amenities: raw.onboard_services.clone(),
            baggage: raw.baggage(),
        })
    }
}

#[async_trait]
impl ProviderAdapter for BatikAirAdapter {
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
        "code": 200,
        "message": "OK",
        "results": [
            {
                "flightNumber": "ID-6372",
                "airlineName": "Batik Air",
                "airlineIATA": "ID",
                "origin": "CGK",
                "destination": "SBY",
                "departureDateTime": "2025-12-15T06:30:00+0700",
                "arrivalDateTime": "2025-12-15T08:05:00+0700",
                "travelTime": "1h 35m",
                "numberOfStops": 0,
                "fare": {
                    "basePrice": 1000000,
                    "taxes": 100000,
                    "totalPrice": 1100000,
                    "currencyCode": "IDR",
                    "class": "economy"
                },
                "seatsAvailable": 17,
                "aircraftModel": "Airbus A320-200",
                "baggageInfo": "10kg cabin, 30kg checked",
                "onboardServices": ["meals", "entertainment"]
            }
        ]
    }
    "#;

    fn adapter(source: StaticSource) -> BatikAirAdapter {
        BatikAirAdapter::new(
            Arc::new(source),
            Arc::new(AirportRegistry::new()),
            Duration::from_secs(2),
        )
    }

    #[tokio::test]
    async fn test_maps_numeric_offset_timestamps() {
        let flights = adapter(StaticSource::new(PAYLOAD))
            .fetch(&SearchRequest::default())
            .await
            .unwrap();

        assert_eq!(flights.len(), 1);
        let flight = &flights[0];
        assert_eq!(flight.id, "ID-6372_BatikAir");
        assert_eq!(flight.airline.code, "ID");
        assert_eq!(flight.duration.total_minutes, 95);
        assert_eq!(flight.departure.city, "Jakarta");
        assert_eq!(flight.price.formatted.as_deref(), Some("Rp 1.100.000"));
        assert_eq!(flight.baggage.carry_on, "10kg");
        assert_eq!(flight.baggage.checked, "30kg");
    }

    #[tokio::test]
    async fn test_missing_baggage_note_keeps_defaults() {
        let payload = PAYLOAD.replace("\"10kg cabin, 30kg checked\"", "\"\"");
        let flights = adapter(StaticSource::new(payload))
            .fetch(&SearchRequest::default())
            .await
            .unwrap();
        assert_eq!(flights[0].baggage.carry_on, "7kg");
        assert_eq!(flights[0].baggage.checked, "20kg");
    }

    #[tokio::test]
    async fn test_zero_price_record_is_dropped() {
        let payload = PAYLOAD.replace("\"totalPrice\": 1100000", "\"totalPrice\": 0");
        let flights = adapter(StaticSource::new(payload))
            .fetch(&SearchRequest::default())
            .await
            .unwrap();
        assert!(flights.is_empty());
    }
}
