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

const KIND: ProviderKind = ProviderKind::AirAsia;
const AIRLINE_CODE: &str = "QZ";
const CURRENCY: &str = "IDR";

/// AirAsia is the flattest schema of the four: top-level airport codes,
/// IDR-only pricing and a single free-text baggage note.
#[derive(Debug, Deserialize)]
struct AirAsiaResponse {
    flights: Vec<AirAsiaFlight>,
}

#[derive(Debug, Deserialize)]
struct AirAsiaFlight {
    flight_code: String,
    airline: String,
    from_airport: String,
    to_airport: String,
    depart_time: String,
    arrive_time: String,
    duration_hours: f64,
    #[serde(default)]
    stops: Vec<AirAsiaStop>,
    price_idr: f64,
    seats: i32,
    cabin_class: String,
    #[serde(default)]
    baggage_note: String,
}

#[derive(Debug, Deserialize)]
struct AirAsiaStop {
    #[allow(dead_code)]
    airport: String,
}

impl AirAsiaFlight {
    fn validate(&self) -> Result<(), RecordError> {
        let dep = DateTime::parse_from_rfc3339(&self.depart_time).map_err(|err| {
            RecordError::BadTimestamp {
                id: self.flight_code.clone(),
                field: "departure",
                message: err.to_string(),
            }
        })?;
        let arr = DateTime::parse_from_rfc3339(&self.arrive_time).map_err(|err| {
            RecordError::BadTimestamp {
                id: self.flight_code.clone(),
                field: "arrival",
                message: err.to_string(),
            }
        })?;
        if arr <= dep {
            return Err(RecordError::ArrivalBeforeDeparture {
                id: self.flight_code.clone(),
            });
        }
        if self.duration_hours <= 0.0 {
            return Err(RecordError::BadDuration {
                id: self.flight_code.clone(),
                hours: self.duration_hours,
            });
        }
        if self.from_airport == self.to_airport {
            return Err(RecordError::CircularRoute {
                id: self.flight_code.clone(),
                code: self.from_airport.clone(),
            });
        }
        if self.price_idr < 0.0 {
            return Err(RecordError::BadPrice {
                id: self.flight_code.clone(),
                amount: self.price_idr,
            });
        }
        if self.seats < 0 {
            return Err(RecordError::NegativeSeats {
                id: self.flight_code.clone(),
                seats: self.seats,
            });
        }
        Ok(())
    }

    /// "1 x 7kg cabin bag, 20kg checked" style; first comma splits
    /// carry-on from checked.
    fn baggage(&self) -> BaggageDetails {
        let mut baggage = BaggageDetails {
            carry_on: "No information".to_string(),
            checked: "No information".to_string(),
        };
        let parts: Vec<&str> = self.baggage_note.split(',').collect();
        if parts.len() >= 2 {
            baggage.carry_on = parts[0].trim().to_string();
            baggage.checked = parts[1].trim().to_string();
        } else if parts.len() == 1 && !parts[0].trim().is_empty() {
            baggage.carry_on = parts[0].trim().to_string();
        }
        baggage
    }
}

pub struct AirAsiaAdapter {
    source: Arc<dyn RawSource>,
    airports: Arc<AirportRegistry>,
    deadline: Duration,
}

impl AirAsiaAdapter {
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

        let response: AirAsiaResponse =
            serde_json::from_str(&payload).map_err(|err| ProviderError::Parse {
                provider: KIND.code(),
                message: err.to_string(),
            })?;

        Ok(self.map_flights(response.flights))
    }

    fn map_flights(&self, raw_flights: Vec<AirAsiaFlight>) -> Vec<Flight> {
        let mut flights = Vec::with_capacity(raw_flights.len());
        for raw in raw_flights {
            if let Err(err) = raw.validate() {
                warn!(provider = %KIND, error = %err, "dropping record failing integrity checks");
                continue;
            }
            match self.map_flight(&raw) {
                Ok(flight) => flights.push(flight),
                Err(err) => {
                    warn!(provider = %KIND, flight = %raw.flight_code, error = %err, "dropping unmappable record");
                }
            }
        }
        flights
    }

    fn map_flight(&self, raw: &AirAsiaFlight) -> Result<Flight, chrono::ParseError> {
        let dep = DateTime::parse_from_rfc3339(&raw.depart_time)?;
        let arr = DateTime::parse_from_rfc3339(&raw.arrive_time)?;
        let total_minutes = (arr - dep).num_minutes();

        Ok(Flight {
            id: format!("{}_{}", raw.flight_code, KIND.code()),
            provider: KIND.display_name().to_string(),
            airline: AirlineInfo {
                name: raw.airline.clone(),
                code: AIRLINE_CODE.to_string(),
            },
            flight_number: raw.flight_code.clone(),
            departure: LocationDetails {
                airport: self.airports.airport_name(&raw.from_airport).to_string(),
                city: self.airports.city_name(&raw.from_airport).to_string(),
                code: raw.from_airport.clone(),
                datetime: dep,
                timestamp: dep.timestamp(),
            },
            arrival: LocationDetails {
                airport: self.airports.airport_name(&raw.to_airport).to_string(),
                city: self.airports.city_name(&raw.to_airport).to_string(),
                code: raw.to_airport.clone(),
                datetime: arr,
                timestamp: arr.timestamp(),
            },
            duration: DurationDetails::from_minutes(total_minutes),
            stops: raw.stops.len() as u32,
            price: PriceDetails {
                amount: raw.price_idr,
                currency: CURRENCY.to_string(),
                formatted: format_price(raw.price_idr, CURRENCY),
            },
            available_seats: raw.seats,
            cabin_class: raw.cabin_class.clone(),
            aircraft: None,
            amenities: Vec::new(),
            baggage: raw.baggage(),
        })
    }
}

#[async_trait]
impl ProviderAdapter for AirAsiaAdapter {
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
