use farelink_core::flight::Flight;
use farelink_core::search::SearchRequest;
use farelink_store::app_config::ScoringConfig;

/// One pass over the merged list: hard route filter, optional soft
/// filters, and best-value tracking. The returned list keeps input order;
/// sorting happens afterwards.
pub fn apply_filters_and_best(
    flights: Vec<Flight>,
    request: &SearchRequest,
    scoring: &ScoringConfig,
) -> (Vec<Flight>, Option<Flight>) {
    let mut filtered = Vec::with_capacity(flights.len());
    let mut best: Option<(f64, usize)> = None;

    for flight in flights {
        if !route_matches(&flight, request) {
            continue;
        }

        if request.price_min > 0.0 && flight.price.amount < request.price_min {
            continue;
        }
        if request.price_max > 0.0 && flight.price.amount > request.price_max {
            continue;
        }
        if let Some(max_stops) = request.max_stops {
            if flight.stops > max_stops {
                continue;
            }
        }
        if request.max_duration > 0 && flight.duration.total_minutes > request.max_duration {
            continue;
        }

        // Local clock time, compared lexicographically as "HH:MM".
        let dep_clock = flight.departure.datetime.format("%H:%M").to_string();
        if !request.min_dep_time.is_empty() && dep_clock.as_str() < request.min_dep_time.as_str() {
            continue;
        }
        if !request.max_dep_time.is_empty() && dep_clock.as_str() > request.max_dep_time.as_str() {
            continue;
        }

        let score = best_value_score(&flight, scoring);
        // Strict < keeps the first-seen record on a tie.
        if best.map_or(true, |(min_score, _)| score < min_score) {
            best = Some((score, filtered.len()));
        }

        filtered.push(flight);
    }

    let best_value = best.map(|(_, index)| filtered[index].clone());
    (filtered, best_value)
}

fn route_matches(flight: &Flight, request: &SearchRequest) -> bool {
    flight
        .departure
        .code
        .eq_ignore_ascii_case(&request.origin)
        && request
            .destinations
            .iter()
            .any(|dest| flight.arrival.code.eq_ignore_ascii_case(dest))
}

/// Composite score, lower is better.
pub fn best_value_score(flight: &Flight, scoring: &ScoringConfig) -> f64 {
    flight.price.amount
        + flight.duration.total_minutes as f64 * scoring.time_weight
        + flight.stops as f64 * scoring.stop_penalty
        - flight.amenities.len() as f64 * scoring.amenity_bonus
}
