use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TripError;
use crate::reference;

use super::{Category, CategoryMap, Expense};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The planned span of a trip. `to` may be open-ended while the trip is
/// still running.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

/// Aggregation root: a trip exclusively owns its expenses and its category
/// map. Deleting a trip cascades over both.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    pub currency: String,
    pub date_range: DateRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_budget: Option<f64>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    /// Trip-scoped categories. An empty map means "use the shared default
    /// set"; see [`Trip::category_map`].
    #[serde(default)]
    pub categories: CategoryMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Trip::schema_version_default")]
    pub schema_version: u8,
}

impl Trip {
    pub fn new(name: impl Into<String>, currency: impl Into<String>, from: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            currency: currency.into(),
            date_range: DateRange { from, to: None },
            daily_budget: None,
            total_budget: None,
            expenses: Vec::new(),
            categories: CategoryMap::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn with_date_range(mut self, from: NaiveDate, to: Option<NaiveDate>) -> Self {
        self.date_range = DateRange { from, to };
        self
    }

    pub fn with_budgets(mut self, daily: Option<f64>, total: Option<f64>) -> Self {
        self.daily_budget = daily;
        self.total_budget = total;
        self
    }

    /// The categories in effect for this trip: its own map, or the shared
    /// default set when it defines none.
    pub fn category_map(&self) -> &CategoryMap {
        if self.categories.is_empty() {
            reference::default_categories()
        } else {
            &self.categories
        }
    }

    /// Appends a validated expense and returns its id.
    pub fn add_expense(&mut self, expense: Expense) -> Result<Uuid, TripError> {
        expense.validate()?;
        let id = expense.id;
        self.expenses.push(expense);
        self.touch();
        Ok(id)
    }

    /// Replaces every stored entry carrying `id` with the updated expense.
    ///
    /// Multi-day expenses split for display share one id across their
    /// per-day entries, so edits address the whole original record.
    pub fn update_expense(&mut self, id: Uuid, mut updated: Expense) -> Result<(), TripError> {
        updated.id = id;
        updated.validate()?;
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            return Err(TripError::ExpenseNotFound(id));
        }
        self.expenses.push(updated);
        self.touch();
        Ok(())
    }

    /// Removes every entry carrying `id` (see [`Trip::update_expense`]).
    pub fn remove_expense(&mut self, id: Uuid) -> Result<(), TripError> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            return Err(TripError::ExpenseNotFound(id));
        }
        self.touch();
        Ok(())
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Inserts or replaces a trip-scoped category. A trip that previously
    /// relied on the default set takes a private copy first, so defaults are
    /// never mutated in place.
    pub fn upsert_category(&mut self, category: Category) {
        if self.categories.is_empty() {
            self.categories = reference::default_categories().clone();
        }
        self.categories.insert(category.id.clone(), category);
        self.touch();
    }

    /// Removes a category. Expenses referencing it are left untouched and
    /// degrade to the "Unknown" display fallback.
    pub fn remove_category(&mut self, id: &str) -> Result<(), TripError> {
        if self.categories.is_empty() {
            self.categories = reference::default_categories().clone();
        }
        if self.categories.remove(id).is_none() {
            return Err(TripError::Validation(format!("category `{id}` not found")));
        }
        self.touch();
        Ok(())
    }

    /// Expenses sorted for display: newest date first.
    pub fn expenses_by_date_desc(&self) -> Vec<&Expense> {
        let mut sorted: Vec<&Expense> = self.expenses.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
