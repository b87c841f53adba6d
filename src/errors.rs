use thiserror::Error;
use uuid::Uuid;

/// Error type covering trip persistence and mutation failures.
///
/// The statistics engine itself never fails; degenerate inputs produce
/// zero-valued results instead of errors.
#[derive(Debug, Error)]
pub enum TripError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Trip not found: {0}")]
    TripNotFound(Uuid),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
}
