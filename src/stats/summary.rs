use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::trip::Trip;

use super::{split_expenses, ExpenseFilter};

/// Derived statistics over a trip's filtered working set. Ephemeral: never
/// persisted, recomputed on every evaluation (`days` depends on `today`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripStats {
    /// Sum of amounts over the working set, excluded entries included.
    pub total: f64,
    /// Average spent per day with at least one non-excluded entry.
    pub daily_avg: f64,
    /// Inclusive days from the first expense to `today`, minimum 1.
    pub days: i64,
    /// Working-set entries per elapsed day.
    pub avg_count_per_day: f64,
    pub daily_budget: f64,
    pub total_budget: f64,
    /// `daily_avg` as a percentage of the daily budget; 0 when unbudgeted.
    pub daily_percentage: f64,
    /// `total` as a percentage of the total budget; 0 when unbudgeted.
    pub total_percentage: f64,
    pub total_expenses: usize,
    /// Inclusive days from the first expense to the trip end (or the last
    /// expense when the trip is open-ended), minimum 1.
    pub total_trip_days: i64,
    /// Count of distinct dates carrying at least one working-set entry.
    pub total_days_from_expenses: usize,
}

/// Spend-so-far summary used for over-budget signaling. Covers the full
/// normalized expense set up to and including `today`; excluded entries are
/// skipped entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpTodayStats {
    /// Amount spent on `today` itself.
    pub today_total: f64,
    pub daily_avg: f64,
    /// Distinct dates counted so far.
    pub days: usize,
    pub total: f64,
    /// `daily_avg` as a percentage of the daily budget; 0 when unbudgeted.
    pub percentage: f64,
    /// True when the daily average runs past 100% of the daily budget.
    pub overflown: bool,
}

fn percentage_of(value: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        value / budget * 100.0
    } else {
        0.0
    }
}

/// Computes the full trip statistics over the normalized, filtered working
/// set.
///
/// `today` is injected by the caller (see [`crate::time::Clock`]) because
/// `days` and `avg_count_per_day` are time-dependent. Empty working sets
/// yield a zero-valued record with the budgets echoed; no degenerate input
/// produces `NaN` or infinity.
pub fn general_stats(trip: &Trip, filters: &ExpenseFilter, today: NaiveDate) -> TripStats {
    let mut stats = TripStats {
        daily_budget: trip.daily_budget.unwrap_or(0.0),
        total_budget: trip.total_budget.unwrap_or(0.0),
        ..TripStats::default()
    };

    let working_set = filters.apply(&split_expenses(&trip.expenses));
    if working_set.is_empty() {
        return stats;
    }

    // min/max exist: the working set is non-empty.
    let first_expense_date = working_set.iter().map(|e| e.date).min().unwrap();
    let last_expense_date = working_set.iter().map(|e| e.date).max().unwrap();
    let last_day_of_trip = trip.date_range.to.unwrap_or(last_expense_date);

    let mut all_dates = BTreeSet::new();
    let mut avg_dates = BTreeSet::new();
    let mut avg_total = 0.0;
    for expense in &working_set {
        all_dates.insert(expense.date);
        stats.total += expense.amount;
        if !expense.exclude_from_avg {
            avg_dates.insert(expense.date);
            avg_total += expense.amount;
        }
    }

    stats.total_expenses = working_set.len();
    stats.total_trip_days = ((last_day_of_trip - first_expense_date).num_days() + 1).max(1);
    stats.days = ((today - first_expense_date).num_days() + 1).max(1);
    stats.total_days_from_expenses = all_dates.len();
    stats.daily_avg = if avg_dates.is_empty() {
        0.0
    } else {
        avg_total / avg_dates.len() as f64
    };
    stats.daily_percentage = percentage_of(stats.daily_avg, stats.daily_budget);
    stats.total_percentage = percentage_of(stats.total, stats.total_budget);
    stats.avg_count_per_day = stats.total_expenses as f64 / stats.days as f64;

    stats
}

/// Computes the spend-so-far summary over the full normalized expense set.
///
/// Entries dated after `today` and entries flagged `exclude_from_avg` are
/// skipped entirely. Unlike [`general_stats`] this takes no external filter.
pub fn up_today_stats(trip: &Trip, today: NaiveDate) -> UpTodayStats {
    let mut stats = UpTodayStats::default();
    if trip.expenses.is_empty() {
        return stats;
    }

    let daily_budget = trip.daily_budget.unwrap_or(0.0);
    let mut dates = BTreeSet::new();
    for expense in split_expenses(&trip.expenses) {
        if expense.date > today || expense.exclude_from_avg {
            continue;
        }
        dates.insert(expense.date);
        stats.total += expense.amount;
        if expense.date == today {
            stats.today_total += expense.amount;
        }
    }

    stats.days = dates.len();
    stats.daily_avg = if stats.days == 0 {
        0.0
    } else {
        stats.total / stats.days as f64
    };
    stats.percentage = percentage_of(stats.daily_avg, daily_budget);
    stats.overflown = stats.percentage > 100.0;

    stats
}
