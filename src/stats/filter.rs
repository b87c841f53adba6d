use chrono::NaiveDate;

use crate::trip::Expense;

/// Composable predicate set over a normalized expense list.
///
/// Every field is optional; unset fields impose no constraint. Set fields
/// combine with AND semantics. Matching is a pure function of the expense:
/// applying a filter twice yields the same subset as applying it once.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    /// Case-insensitive substring of the expense name.
    pub name: Option<String>,
    /// Exact category id.
    pub category: Option<String>,
    /// Exact country code, case-insensitive.
    pub country: Option<String>,
    /// Case-insensitive substring of the location.
    pub location: Option<String>,
    /// Inclusive lower bound on the expense date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the expense date.
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
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

    pub fn with_start_date(mut self, start: NaiveDate) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_end_date(mut self, end: NaiveDate) -> Self {
        self.end_date = Some(end);
        self
    }

    /// True when no field is set, i.e. the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.country.is_none()
            && self.location.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(name) = &self.name {
            if !expense
                .name
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &expense.category_id != category {
                return false;
            }
        }
        if let Some(country) = &self.country {
            match &expense.country {
                Some(code) if code.eq_ignore_ascii_case(country) => {}
                _ => return false,
            }
        }
        if let Some(location) = &self.location {
            match &expense.location {
                Some(loc) if loc.to_lowercase().contains(&location.to_lowercase()) => {}
                _ => return false,
            }
        }
        if let Some(start) = self.start_date {
            if expense.date < start {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if expense.date > end {
                return false;
            }
        }
        true
    }

    /// Returns the matching subset, preserving input order.
    pub fn apply(&self, expenses: &[Expense]) -> Vec<Expense> {
        expenses
            .iter()
            .filter(|e| self.matches(e))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_expenses() -> Vec<Expense> {
        vec![
            Expense::new("Pastel de Nata", 2.0, "EUR", date(2024, 5, 1), "snacks")
                .with_country("pt")
                .with_location("Lisbon"),
            Expense::new("Metro ticket", 1.5, "EUR", date(2024, 5, 2), "transportation")
                .with_country("pt")
                .with_location("Porto"),
            Expense::new("Tapas night", 30.0, "EUR", date(2024, 5, 4), "restaurants")
                .with_country("es")
                .with_location("Madrid"),
        ]
    }

    #[test]
    fn empty_filter_returns_input_unchanged() {
        let expenses = sample_expenses();
        let filter = ExpenseFilter::new();
        assert!(filter.is_empty());
        let result = filter.apply(&expenses);
        assert_eq!(result.len(), expenses.len());
        for (a, b) in result.iter().zip(&expenses) {
            assert_eq!(a.id, b.id);
        }
    }

    #[test]
    fn filtering_is_idempotent() {
        let expenses = sample_expenses();
        let filter = ExpenseFilter::new().with_country("PT");
        let once = filter.apply(&expenses);
        let twice = filter.apply(&once);
        assert_eq!(once.len(), twice.len());
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn name_and_location_match_substrings_case_insensitively() {
        let expenses = sample_expenses();
        let by_name = ExpenseFilter::new().with_name("pastel").apply(&expenses);
        assert_eq!(by_name.len(), 1);

        let by_location = ExpenseFilter::new().with_location("lisb").apply(&expenses);
        assert_eq!(by_location.len(), 1);
        assert_eq!(by_location[0].name, "Pastel de Nata");
    }

    #[test]
    fn missing_optional_fields_never_match_set_predicates() {
        let no_location = Expense::new("Ferry", 8.0, "EUR", date(2024, 5, 3), "transportation");
        let filter = ExpenseFilter::new().with_location("any");
        assert!(!filter.matches(&no_location));
        let filter = ExpenseFilter::new().with_country("pt");
        assert!(!filter.matches(&no_location));
    }

    #[test]
    fn date_bounds_are_inclusive_and_combine_with_and() {
        let expenses = sample_expenses();
        let filter = ExpenseFilter::new()
            .with_start_date(date(2024, 5, 2))
            .with_end_date(date(2024, 5, 4))
            .with_country("pt");
        let result = filter.apply(&expenses);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Metro ticket");
    }
}
