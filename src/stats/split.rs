use chrono::Duration;

use crate::trip::Expense;

/// Normalizes a raw expense list so every entry covers exactly one day.
///
/// An expense spanning `date..=end_date` is replaced by one entry per covered
/// day, each carrying an even fraction of the amount and a cleared
/// `end_date`. All other fields pass through unchanged, the id included:
/// split entries deliberately share the source id so edits and deletions can
/// address the original record. Single-day expenses are returned as-is.
///
/// The per-entry amounts sum back to the source amount up to floating-point
/// rounding; round only at display, never here.
///
/// Precondition: ranges are already validated (`end_date >= date`). Invalid
/// ranges are a caller error and are not defended against.
pub fn split_expenses(expenses: &[Expense]) -> Vec<Expense> {
    let mut separated = Vec::with_capacity(expenses.len());
    for expense in expenses {
        if expense.is_multi_day() {
            let days = expense.day_span();
            for offset in 0..days {
                let mut entry = expense.clone();
                entry.date = expense.date + Duration::days(offset);
                entry.amount = expense.amount / days as f64;
                entry.end_date = None;
                separated.push(entry);
            }
        } else {
            separated.push(expense.clone());
        }
    }
    separated
}
