pub mod booking;
pub mod repository;
pub mod stats;
pub mod validation;

pub use booking::{Booking, BookingPatch, BookingStatus};
pub use repository::BookingRepository;
pub use stats::BookingStats;
pub use validation::PayloadValidator;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Booking not found: {0}")]
    NotFound(String),
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Booking document is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Booking store is not running")]
    Unavailable,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Booking payload must be a JSON object")]
    NotAnObject,
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("Field {0} cannot be changed")]
    Immutable(String),
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
