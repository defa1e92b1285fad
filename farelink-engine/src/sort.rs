use farelink_core::flight::Flight;
use farelink_core::search::SortKey;
use std::cmp::Ordering;

/// Stable sort on the requested key. Only the key comparison is reversed
/// for descending order, so equal keys always keep their pre-sort order.
pub fn sort_flights(flights: &mut [Flight], key: SortKey, descending: bool) {
    flights.sort_by(|a, b| {
        let ordering = match key {
            SortKey::Price => a
                .price
                .amount
                .partial_cmp(&b.price.amount)
                .unwrap_or(Ordering::Equal),
            SortKey::Duration => a.duration.total_minutes.cmp(&b.duration.total_minutes),
            SortKey::DepartureTime => a.departure.timestamp.cmp(&b.departure.timestamp),
            SortKey::ArrivalTime => a.arrival.timestamp.cmp(&b.arrival.timestamp),
        };
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}
