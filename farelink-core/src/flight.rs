use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Provider-agnostic flight representation. Every adapter maps its raw
/// schema into this shape; nothing downstream ever sees provider fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    /// Composed as `{flight_number}_{provider_code}`, unique within a response.
    pub id: String,
    pub provider: String,
    pub airline: AirlineInfo,
    pub flight_number: String,
    pub departure: LocationDetails,
    pub arrival: LocationDetails,
    pub duration: DurationDetails,
    pub stops: u32,
    pub price: PriceDetails,
    pub available_seats: i32,
    pub cabin_class: String,
    pub aircraft: Option<String>,
    pub amenities: Vec<String>,
    pub baggage: BaggageDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirlineInfo {
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDetails {
    pub airport: String,
    pub city: String,
    pub code: String,
    /// Local wall-clock time with its UTC offset preserved.
    pub datetime: DateTime<FixedOffset>,
    /// Unix seconds, used for cross-timezone comparisons.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationDetails {
    pub total_minutes: i64,
    pub formatted: String,
}

impl DurationDetails {
    /// Duration is always derived from the arrival/departure delta, never
    /// from a provider-supplied duration field.
    pub fn from_minutes(total_minutes: i64) -> Self {
        let hours = total_minutes / 60;
        let mins = total_minutes % 60;
        Self {
            total_minutes,
            formatted: format!("{}h {}m", hours, mins),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDetails {
    pub amount: f64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaggageDetails {
    pub carry_on: String,
    pub checked: String,
}
