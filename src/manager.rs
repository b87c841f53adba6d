use std::path::PathBuf;

use uuid::Uuid;

use crate::{
    errors::TripError,
    storage::TripStore,
    trip::{Category, Expense, Trip},
};

/// Facade coordinating the in-memory trip collection, the current selection,
/// and the persistence collaborator.
///
/// All mutations validate at this boundary, stamp the owning trip, and
/// persist through the store before returning. The stats engine never goes
/// through here; it consumes trip snapshots handed to it by the caller.
pub struct TripManager {
    trips: Vec<Trip>,
    selected: Option<Uuid>,
    store: Box<dyn TripStore>,
}

impl TripManager {
    /// Creates a manager over the given store and loads its current state.
    pub fn new(store: Box<dyn TripStore>) -> Result<Self, TripError> {
        let mut manager = Self {
            trips: Vec::new(),
            selected: None,
            store,
        };
        manager.reload()?;
        Ok(manager)
    }

    /// Re-reads trips and selection from the store. A recorded selection
    /// pointing at a deleted trip falls back to the first trip.
    pub fn reload(&mut self) -> Result<(), TripError> {
        self.trips = self.store.load_trips()?;
        let recorded = self.store.selected_trip_id()?;
        self.selected = recorded
            .filter(|id| self.trips.iter().any(|t| &t.id == id))
            .or_else(|| self.trips.first().map(|t| t.id));
        Ok(())
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    pub fn trip(&self, id: Uuid) -> Option<&Trip> {
        self.trips.iter().find(|t| t.id == id)
    }

    pub fn selected_trip(&self) -> Option<&Trip> {
        self.selected.and_then(|id| self.trip(id))
    }

    pub fn selected_trip_id(&self) -> Option<Uuid> {
        self.selected
    }

    fn selected_trip_mut(&mut self) -> Result<&mut Trip, TripError> {
        let id = self
            .selected
            .ok_or_else(|| TripError::Storage("no trip selected".into()))?;
        self.trips
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TripError::TripNotFound(id))
    }

    fn persist(&self) -> Result<(), TripError> {
        self.store.save_trips(&self.trips)
    }

    /// Adds a trip, selects it, and persists. Returns the new trip's id.
    pub fn create_trip(&mut self, trip: Trip) -> Result<Uuid, TripError> {
        let id = trip.id;
        self.trips.push(trip);
        self.persist()?;
        self.select_trip(id)?;
        tracing::info!(trip = %id, "trip created");
        Ok(id)
    }

    /// Deletes a trip. Its expenses and categories go with it by ownership;
    /// the selection falls back to the first remaining trip.
    pub fn delete_trip(&mut self, id: Uuid) -> Result<(), TripError> {
        let before = self.trips.len();
        self.trips.retain(|t| t.id != id);
        if self.trips.len() == before {
            return Err(TripError::TripNotFound(id));
        }
        self.persist()?;
        if self.selected == Some(id) {
            let fallback = self.trips.first().map(|t| t.id);
            self.selected = fallback;
            self.store.set_selected_trip_id(fallback)?;
        }
        tracing::info!(trip = %id, "trip deleted");
        Ok(())
    }

    pub fn select_trip(&mut self, id: Uuid) -> Result<(), TripError> {
        if self.trip(id).is_none() {
            return Err(TripError::TripNotFound(id));
        }
        self.selected = Some(id);
        self.store.set_selected_trip_id(Some(id))
    }

    /// Adds an expense to the selected trip and persists.
    pub fn add_expense(&mut self, expense: Expense) -> Result<Uuid, TripError> {
        let id = self.selected_trip_mut()?.add_expense(expense)?;
        self.persist()?;
        tracing::debug!(expense = %id, "expense added");
        Ok(id)
    }

    /// Replaces every entry carrying `id` on the selected trip and persists.
    pub fn update_expense(&mut self, id: Uuid, updated: Expense) -> Result<(), TripError> {
        self.selected_trip_mut()?.update_expense(id, updated)?;
        self.persist()?;
        tracing::debug!(expense = %id, "expense updated");
        Ok(())
    }

    /// Removes every entry carrying `id` from the selected trip and persists.
    pub fn remove_expense(&mut self, id: Uuid) -> Result<(), TripError> {
        self.selected_trip_mut()?.remove_expense(id)?;
        self.persist()?;
        tracing::debug!(expense = %id, "expense removed");
        Ok(())
    }

    pub fn upsert_category(&mut self, category: Category) -> Result<(), TripError> {
        self.selected_trip_mut()?.upsert_category(category);
        self.persist()
    }

    pub fn remove_category(&mut self, id: &str) -> Result<(), TripError> {
        self.selected_trip_mut()?.remove_category(id)?;
        self.persist()
    }

    pub fn backup(&self, note: Option<&str>) -> Result<PathBuf, TripError> {
        self.store.backup(note)
    }

    pub fn list_backups(&self) -> Result<Vec<String>, TripError> {
        self.store.list_backups()
    }

    /// Restores a backup and reloads the in-memory state from it.
    pub fn restore_backup(&mut self, backup_name: &str) -> Result<(), TripError> {
        self.store.restore(backup_name)?;
        self.reload()
    }
}
