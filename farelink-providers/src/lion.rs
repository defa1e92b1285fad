use crate::source::RawSource;
use crate::RecordError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use farelink_core::adapter::{ProviderAdapter, ProviderError};
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

const KIND: ProviderKind = ProviderKind::LionAir;
const LOCAL_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S";

/// Lion Air sends local wall-clock times plus IANA timezone names, and
/// nests everything under route/schedule/pricing/services objects.
#[derive(Debug, Deserialize)]
struct LionResponse {
    data: LionData,
}

#[derive(Debug, Deserialize)]
struct LionData {
    available_flights: Vec<LionFlight>,
}

#[derive(Debug, Deserialize)]
struct LionFlight {
    id: String,
    carrier: LionCarrier,
    route: LionRoute,
    schedule: LionSchedule,
    stop_count: u32,
    pricing: LionPricing,
    seats_left: i32,
    plane_type: String,
    services: LionServices,
}

#[derive(Debug, Deserialize)]
struct LionCarrier {
    name: String,
    iata: String,
}

#[derive(Debug, Deserialize)]
struct LionRoute {
    from: LionLocation,
    to: LionLocation,
}

#[derive(Debug, Deserialize)]
struct LionLocation {
    code: String,
    name: String,
    city: String,
}

#[derive(Debug, Deserialize)]
struct LionSchedule {
    departure: String,
    departure_timezone: String,
    arrival: String,
    arrival_timezone: String,
}

#[derive(Debug, Deserialize)]
struct LionPricing {
    total: f64,
    currency: String,
    fare_type: String,
}

#[derive(Debug, Deserialize)]
struct LionServices {
    #[serde(default)]
    wifi_available: bool,
    #[serde(default)]
    meals_included: bool,
    baggage_allowance: LionBaggage,
}

#[derive(Debug, Deserialize)]
struct LionBaggage {
    cabin: String,
    hold: String,
}

fn parse_local(
    id: &str,
    value: &str,
    tz_name: &str,
    field: &'static str,
) -> Result<DateTime<FixedOffset>, RecordError> {
    let tz: Tz = tz_name.parse().map_err(|_| RecordError::BadTimezone {
        id: id.to_string(),
        name: tz_name.to_string(),
    })?;
    let naive = NaiveDateTime::parse_from_str(value, LOCAL_LAYOUT).map_err(|err| {
        RecordError::BadTimestamp {
            id: id.to_string(),
            field,
            message: err.to_string(),
        }
    })?;
    tz.from_local_datetime(&naive)
        .single()
        .map(|local| local.fixed_offset())
        .ok_or_else(|| RecordError::BadTimestamp {
            id: id.to_string(),
            field,
            message: "ambiguous or nonexistent local time".to_string(),
        })
}

impl LionFlight {
    fn validate(&self) -> Result<(), RecordError> {
        parse_local(
            &self.id,
            &self.schedule.departure,
            &self.schedule.departure_timezone,
            "departure",
        )?;
        parse_local(
            &self.id,
            &self.schedule.arrival,
            &self.schedule.arrival_timezone,
            "arrival",
        )?;
        if self.route.from.code == self.route.to.code {
            return Err(RecordError::CircularRoute {
                id: self.id.clone(),
                code: self.route.from.code.clone(),
            });
        }
        if self.pricing.total <= 0.0 {
            return Err(RecordError::BadPrice {
                id: self.id.clone(),
                amount: self.pricing.total,
            });
        }
        if self.seats_left < 0 {
            return Err(RecordError::NegativeSeats {
                id: self.id.clone(),
                seats: self.seats_left,
            });
        }
        Ok(())
    }
}

/// Lion Air payloads carry their own airport and city names, so this
/// adapter has no registry dependency.
pub struct LionAirAdapter {
    source: Arc<dyn RawSource>,
    deadline: Duration,
}

impl LionAirAdapter {
    pub fn new(source: Arc<dyn RawSource>, deadline: Duration) -> Self {
        Self { source, deadline }
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

        let response: LionResponse =
            serde_json::from_str(&payload).map_err(|err| ProviderError::Parse {
                provider: KIND.code(),
                message: err.to_string(),
            })?;

        Ok(self.map_flights(response.data.available_flights))
    }

    fn map_flights(&self, raw_flights: Vec<LionFlight>) -> Vec<Flight> {
        let mut flights = Vec::with_capacity(raw_flights.len());
        for raw in raw_flights {
            if let Err(err) = raw.validate() {
                warn!(provider = %KIND, error = %err, "dropping record failing integrity checks");
                continue;
            }
            match self.map_flight(&raw) {
                Ok(flight) => flights.push(flight),
                Err(err) => {
                    warn!(provider = %KIND, flight = %raw.id, error = %err, "dropping unmappable record");
                }
            }
        }
        flights
    }

    fn map_flight(&self, raw: &LionFlight) -> Result<Flight, RecordError> {
        let dep = parse_local(
            &raw.id,
            &raw.schedule.departure,
            &raw.schedule.departure_timezone,
            "departure",
        )?;
        let arr = parse_local(
            &raw.id,
            &raw.schedule.arrival,
            &raw.schedule.arrival_timezone,
            "arrival",
        )?;
        let total_minutes = (arr - dep).num_minutes();

        let mut amenities = Vec::new();
        if raw.services.wifi_available {
            amenities.push("wifi".to_string());
        }
        if raw.services.meals_included {
            amenities.push("meals".to_string());
        }

        let aircraft = if raw.plane_type.is_empty() {
            None
        } else {
            Some(raw.plane_type.clone())
        };

        Ok(Flight {
            id: format!("{}_{}", raw.id, KIND.code()),
            provider: KIND.display_name().to_string(),
            airline: AirlineInfo {
                name: raw.carrier.name.clone(),
                code: raw.carrier.iata.clone(),
            },
            flight_number: raw.id.clone(),
            departure: LocationDetails {
                airport: raw.route.from.name.clone(),
                city: raw.route.from.city.clone(),
                code: raw.route.from.code.clone(),
                datetime: dep,
                timestamp: dep.timestamp(),
            },
            arrival: LocationDetails {
                airport: raw.route.to.name.clone(),
                city: raw.route.to.city.clone(),
                code: raw.route.to.code.clone(),
                datetime: arr,
                timestamp: arr.timestamp(),
            },
            duration: DurationDetails::from_minutes(total_minutes),
            stops: raw.stop_count,
            price: PriceDetails {
                amount: raw.pricing.total,
                currency: raw.pricing.currency.clone(),
                formatted: format_price(raw.pricing.total, &raw.pricing.currency),
            },
            available_seats: raw.seats_left,
            cabin_class: raw.pricing.fare_type.clone(),
            aircraft,
            amenities,
            baggage: BaggageDetails {
                carry_on: raw.services.baggage_allowance.cabin.clone(),
                checked: raw.services.baggage_allowance.hold.clone(),
            },
        })
    }
}

#[async_trait]
impl ProviderAdapter for LionAirAdapter {
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
