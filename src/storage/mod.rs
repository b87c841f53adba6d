pub mod json_backend;

use std::path::PathBuf;

use uuid::Uuid;

use crate::{errors::TripError, trip::Trip};

pub type Result<T> = std::result::Result<T, TripError>;

/// Abstraction over the persistence collaborator.
///
/// The aggregation engine never touches this; it operates on in-memory trip
/// snapshots only. Frontends load trips and the current selection through a
/// store, mutate in memory, and persist back.
pub trait TripStore: Send + Sync {
    /// Loads all trips. A store with no data yet yields an empty list.
    fn load_trips(&self) -> Result<Vec<Trip>>;
    /// Persists the full trip collection, replacing the previous snapshot.
    fn save_trips(&self, trips: &[Trip]) -> Result<()>;
    /// The id of the currently selected trip, if one was recorded.
    fn selected_trip_id(&self) -> Result<Option<Uuid>>;
    fn set_selected_trip_id(&self, id: Option<Uuid>) -> Result<()>;
    /// Writes a timestamped snapshot of the trip collection.
    fn backup(&self, note: Option<&str>) -> Result<PathBuf>;
    /// Backup file names, newest first.
    fn list_backups(&self) -> Result<Vec<String>>;
    /// Replaces the live trip collection with a backup's contents.
    fn restore(&self, backup_name: &str) -> Result<Vec<Trip>>;
}

pub use json_backend::JsonStore;
