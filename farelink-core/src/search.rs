use crate::flight::Flight;
use crate::{CoreError, CoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchRequest {
    pub origin: String,
    /// One or more 3-letter destination codes.
    pub destinations: Vec<String>,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub passengers: u32,
    pub cabin_class: String,
    pub price_min: f64,
    pub price_max: f64,
    pub max_stops: Option<u32>,
    /// Provider allow-list; empty means the full registry.
    pub airlines: Vec<String>,
    /// "HH:MM" departure window bounds, compared lexicographically.
    pub min_dep_time: String,
    pub max_dep_time: String,
    /// Maximum total duration in minutes; zero means unset.
    pub max_duration: i64,
    pub sort_by: String,
    pub sort_order: String,
}

impl SearchRequest {
    /// Structural validation. The only error a search caller ever sees.
    pub fn validate(&self) -> CoreResult<()> {
        if !is_iata_code(&self.origin) {
            return Err(CoreError::ValidationError(format!(
                "origin must be a 3-letter IATA code, got {:?}",
                self.origin
            )));
        }
        if self.destinations.is_empty() {
            return Err(CoreError::ValidationError(
                "at least one destination is required".to_string(),
            ));
        }
        for dest in &self.destinations {
            if !is_iata_code(dest) {
                return Err(CoreError::ValidationError(format!(
                    "destination must be a 3-letter IATA code, got {:?}",
                    dest
                )));
            }
            if dest.eq_ignore_ascii_case(&self.origin) {
                return Err(CoreError::ValidationError(format!(
                    "origin and destination cannot both be {}",
                    self.origin
                )));
            }
        }
        if !self.departure_date.is_empty()
            && NaiveDate::parse_from_str(&self.departure_date, "%Y-%m-%d").is_err()
        {
            return Err(CoreError::ValidationError(format!(
                "departureDate must be YYYY-MM-DD, got {:?}",
                self.departure_date
            )));
        }
        if self.price_min > 0.0 && self.price_max > 0.0 && self.price_min > self.price_max {
            return Err(CoreError::ValidationError(
                "priceMin cannot exceed priceMax".to_string(),
            ));
        }
        for bound in [&self.min_dep_time, &self.max_dep_time] {
            if !bound.is_empty() && !is_hhmm(bound) {
                return Err(CoreError::ValidationError(format!(
                    "departure time bounds must be HH:MM, got {:?}",
                    bound
                )));
            }
        }
        Ok(())
    }

    /// Uppercases airport codes so cache keys and route matching are stable.
    pub fn normalize(&mut self) {
        self.origin = self.origin.to_ascii_uppercase();
        for dest in &mut self.destinations {
            *dest = dest.to_ascii_uppercase();
        }
    }

    /// Middle component of the cache key: the departure date when given,
    /// otherwise the destination set.
    pub fn cache_scope(&self) -> String {
        if self.departure_date.is_empty() {
            self.destinations.join("-")
        } else {
            self.departure_date.clone()
        }
    }

    pub fn sort_key(&self) -> SortKey {
        SortKey::parse(&self.sort_by)
    }

    pub fn sort_descending(&self) -> bool {
        self.sort_order.eq_ignore_ascii_case("desc")
    }
}

fn is_iata_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_hhmm(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4]
            .iter()
            .all(|&i| (bytes[i] as char).is_ascii_digit())
}

/// Result ordering requested by the caller. Unknown values fall back to
/// price rather than rejecting the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Price,
    Duration,
    DepartureTime,
    ArrivalTime,
}

impl SortKey {
    pub fn parse(raw: &str) -> SortKey {
        match raw.to_ascii_lowercase().as_str() {
            "duration" => SortKey::Duration,
            "departure_time" => SortKey::DepartureTime,
            "arrival_time" => SortKey::ArrivalTime,
            _ => SortKey::Price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub origin: String,
    pub destinations: Vec<String>,
    pub departure_date: String,
    pub passengers: u32,
    pub cabin_class: String,
}

impl From<&SearchRequest> for SearchCriteria {
    fn from(req: &SearchRequest) -> Self {
        Self {
            origin: req.origin.clone(),
            destinations: req.destinations.clone(),
            departure_date: req.departure_date.clone(),
            passengers: req.passengers,
            cabin_class: req.cabin_class.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMetadata {
    pub search_id: Uuid,
    pub total_results: usize,
    /// Live fetch attempts only; cache hits are not queries.
    pub providers_queried: u32,
    pub providers_succeeded: u32,
    pub providers_failed: u32,
    pub search_time_ms: u64,
    pub cache_hit: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub flights: Vec<Flight>,
    pub search_criteria: SearchCriteria,
    pub metadata: SearchMetadata,
    pub best_value: Option<Flight>,
}
