use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TripError;

/// A single recorded cost, possibly spanning multiple consecutive days.
///
/// `amount` is the total for the full `date..=end_date` span; the stats
/// engine splits multi-day expenses into per-day fractions before
/// aggregating. Field names serialize in camelCase to stay compatible with
/// the JSON shape frontends persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    /// Free-text label; may be empty, in which case displays fall back to
    /// the category name.
    #[serde(default)]
    pub name: String,
    pub amount: f64,
    pub currency: String,
    pub date: NaiveDate,
    /// Inclusive end of a multi-day span. `None` or equal to `date` means a
    /// single-day expense.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub category_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Keeps the expense in raw totals while removing it from daily-average
    /// and country-breakdown computations.
    #[serde(default)]
    pub exclude_from_avg: bool,
}

impl Expense {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        currency: impl Into<String>,
        date: NaiveDate,
        category_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            currency: currency.into(),
            date,
            end_date: None,
            category_id: category_id.into(),
            description: String::new(),
            country: None,
            location: None,
            tags: None,
            latitude: None,
            longitude: None,
            exclude_from_avg: false,
        }
    }

    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn excluded_from_avg(mut self) -> Self {
        self.exclude_from_avg = true;
        self
    }

    /// True when the expense covers more than one calendar day.
    pub fn is_multi_day(&self) -> bool {
        matches!(self.end_date, Some(end) if end != self.date)
    }

    /// Inclusive number of calendar days the expense covers.
    pub fn day_span(&self) -> i64 {
        match self.end_date {
            Some(end) => (end - self.date).num_days() + 1,
            None => 1,
        }
    }

    /// Structural validation applied at the edit/persistence boundary. The
    /// stats engine assumes expenses passed this check.
    pub fn validate(&self) -> Result<(), TripError> {
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(TripError::Validation(format!(
                "expense amount must be a non-negative number, got {}",
                self.amount
            )));
        }
        if let Some(end) = self.end_date {
            if end < self.date {
                return Err(TripError::Validation(format!(
                    "expense end date {} is before start date {}",
                    end, self.date
                )));
            }
        }
        Ok(())
    }
}
