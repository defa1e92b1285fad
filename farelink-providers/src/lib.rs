pub mod airasia;
pub mod batik;
pub mod garuda;
pub mod lion;
pub mod registry;
pub mod source;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use registry::ProviderRegistry;
pub use source::{FileSource, RawSource, SourceError};

/// Single-record integrity failure. Drops the record, never the batch.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("[{id}] invalid {field} time: {message}")]
    BadTimestamp {
        id: String,
        field: &'static str,
        message: String,
    },

    #[error("[{id}] arrival must be after departure")]
    ArrivalBeforeDeparture { id: String },

    #[error("[{id}] origin and destination are both {code}")]
    CircularRoute { id: String, code: String },

    #[error("[{id}] invalid price: {amount}")]
    BadPrice { id: String, amount: f64 },

    #[error("[{id}] negative seat inventory: {seats}")]
    NegativeSeats { id: String, seats: i32 },

    #[error("[{id}] invalid duration: {hours} hours")]
    BadDuration { id: String, hours: f64 },

    #[error("[{id}] unknown timezone: {name}")]
    BadTimezone { id: String, name: String },
}
