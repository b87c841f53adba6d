use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::reference;
use crate::trip::{CategoryMap, Expense};

/// Display fallbacks for dangling category references.
const UNKNOWN_CATEGORY_NAME: &str = "Unknown";
const UNKNOWN_CATEGORY_COLOR: &str = "#ffffff";
const OTHER_CATEGORY_ID: &str = "other";
const OTHER_CATEGORY_NAME: &str = "Other";
const OTHER_CATEGORY_COLOR: &str = "#6B7280";
const OTHER_CATEGORY_ICON: &str = "Ellipsis";

/// How many categories are listed individually before the rest are merged
/// into the synthetic "Other" aggregate.
const TOP_CATEGORY_COUNT: usize = 4;

/// One category's share of the working set's spend.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub amount: f64,
}

/// A chart-ready category row: either a top category, or the "Other"
/// aggregate carrying the merged tail groups as expandable sub-items.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdownEntry {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
    pub amount: f64,
    /// Empty for named categories; the merged tail for the "Other" entry.
    pub sub_items: Vec<CategoryGroup>,
}

/// Groups working-set entries by category, summing amounts and resolving
/// display metadata from the trip's category map (dangling references fall
/// back to "Unknown"). Groups are ordered descending by amount; the top
/// four stay individual rows and the remainder, when any, is merged into a
/// trailing "Other" row listing its tail groups in descending order.
pub fn category_breakdown(
    expenses: &[Expense],
    categories: &CategoryMap,
) -> Vec<CategoryBreakdownEntry> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.category_id.as_str()).or_insert(0.0) += expense.amount;
    }

    let mut groups: Vec<CategoryGroup> = totals
        .into_iter()
        .map(|(id, amount)| match categories.get(id) {
            Some(category) => CategoryGroup {
                id: id.to_string(),
                name: category.name.clone(),
                color: category.color.clone(),
                icon: category.icon.clone(),
                amount,
            },
            None => CategoryGroup {
                id: id.to_string(),
                name: UNKNOWN_CATEGORY_NAME.to_string(),
                color: UNKNOWN_CATEGORY_COLOR.to_string(),
                icon: String::new(),
                amount,
            },
        })
        .collect();
    groups.sort_by(|a, b| b.amount.total_cmp(&a.amount));

    let tail = if groups.len() > TOP_CATEGORY_COUNT {
        groups.split_off(TOP_CATEGORY_COUNT)
    } else {
        Vec::new()
    };

    let mut entries: Vec<CategoryBreakdownEntry> = groups
        .into_iter()
        .map(|group| CategoryBreakdownEntry {
            id: group.id,
            name: group.name,
            color: group.color,
            icon: group.icon,
            amount: group.amount,
            sub_items: Vec::new(),
        })
        .collect();

    if !tail.is_empty() {
        entries.push(CategoryBreakdownEntry {
            id: OTHER_CATEGORY_ID.to_string(),
            name: OTHER_CATEGORY_NAME.to_string(),
            color: OTHER_CATEGORY_COLOR.to_string(),
            icon: OTHER_CATEGORY_ICON.to_string(),
            amount: tail.iter().map(|g| g.amount).sum(),
            sub_items: tail,
        });
    }

    entries
}

/// Per-country spend, distinct-day count, and the day-derived budget.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryBreakdownEntry {
    /// Lowercased country code as recorded on the expenses.
    pub code: String,
    /// Display name from the country table, or the raw code when unknown.
    pub name: String,
    pub total_spent: f64,
    /// Number of distinct dates with spend in this country.
    pub days: usize,
    /// `days * daily_budget`.
    pub budget: f64,
}

/// Groups working-set entries by country. Entries without a country and
/// entries flagged `exclude_from_avg` are skipped entirely, not merely
/// removed from averages. Sorted descending by amount spent.
pub fn country_breakdown(expenses: &[Expense], daily_budget: f64) -> Vec<CountryBreakdownEntry> {
    struct Tally {
        total: f64,
        dates: std::collections::BTreeSet<NaiveDate>,
    }

    let mut tallies: BTreeMap<String, Tally> = BTreeMap::new();
    for expense in expenses {
        if expense.exclude_from_avg {
            continue;
        }
        let Some(country) = &expense.country else {
            continue;
        };
        let code = country.trim().to_ascii_lowercase();
        if code.is_empty() {
            continue;
        }
        let tally = tallies.entry(code).or_insert_with(|| Tally {
            total: 0.0,
            dates: std::collections::BTreeSet::new(),
        });
        tally.total += expense.amount;
        tally.dates.insert(expense.date);
    }

    let mut entries: Vec<CountryBreakdownEntry> = tallies
        .into_iter()
        .map(|(code, tally)| {
            let days = tally.dates.len();
            CountryBreakdownEntry {
                name: reference::country_name(&code)
                    .map(str::to_string)
                    .unwrap_or_else(|| code.clone()),
                code,
                total_spent: tally.total,
                days,
                budget: days as f64 * daily_budget,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    entries
}

/// Calendar granularity for the time-bucketed breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBucket {
    Daily,
    Weekly,
    Monthly,
    Annual,
}

/// One time bucket's total, labeled for charting and carrying its parent
/// period labels for the grouped list view.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucketEntry {
    pub label: String,
    /// First calendar day of the bucket; the chronological sort key.
    pub start: NaiveDate,
    pub amount: f64,
    pub year: String,
    /// Month abbreviation for daily/weekly/monthly buckets; `None` for
    /// annual buckets.
    pub month: Option<String>,
}

fn bucket_start(date: NaiveDate, bucket: TimeBucket) -> NaiveDate {
    match bucket {
        TimeBucket::Daily => date,
        TimeBucket::Weekly => {
            // ISO weeks start on Monday.
            date - Duration::days(date.weekday().num_days_from_monday() as i64)
        }
        // First-of-period dates always exist for a valid source date.
        TimeBucket::Monthly => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap(),
        TimeBucket::Annual => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap(),
    }
}

fn bucket_entry(start: NaiveDate, bucket: TimeBucket, amount: f64) -> TimeBucketEntry {
    let (label, month) = match bucket {
        TimeBucket::Daily => (
            start.format("%-d/%-m").to_string(),
            Some(start.format("%b").to_string()),
        ),
        TimeBucket::Weekly => {
            let end = start + Duration::days(6);
            (
                format!("{} - {}", start.format("%-d/%-m/%y"), end.format("%-d/%-m/%y")),
                Some(start.format("%b").to_string()),
            )
        }
        TimeBucket::Monthly => (
            start.format("%b").to_string(),
            Some(start.format("%b").to_string()),
        ),
        TimeBucket::Annual => (start.format("%Y").to_string(), None),
    };
    TimeBucketEntry {
        label,
        start,
        amount,
        year: start.format("%Y").to_string(),
        month,
    }
}

/// Groups working-set entries into calendar buckets, summing amounts per
/// bucket. Buckets are sorted chronologically ascending by their
/// first-of-period date, never by label text, so month order is always
/// calendar order.
pub fn time_breakdown(expenses: &[Expense], bucket: TimeBucket) -> Vec<TimeBucketEntry> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(bucket_start(expense.date, bucket)).or_insert(0.0) += expense.amount;
    }
    totals
        .into_iter()
        .map(|(start, amount)| bucket_entry(start, bucket, amount))
        .collect()
}

fn bucket_count(expenses: &[Expense], bucket: TimeBucket) -> usize {
    let mut starts = std::collections::BTreeSet::new();
    for expense in expenses {
        starts.insert(bucket_start(expense.date, bucket));
    }
    starts.len()
}

/// Picks the coarsest sensible default bucket size for a history: daily
/// while the history is short, escalating to weekly, monthly, and annual as
/// it grows. A presentation default, not a computation invariant.
pub fn preferred_bucket(expenses: &[Expense]) -> TimeBucket {
    if bucket_count(expenses, TimeBucket::Daily) < 8 {
        TimeBucket::Daily
    } else if bucket_count(expenses, TimeBucket::Weekly) < 5 {
        TimeBucket::Weekly
    } else if bucket_count(expenses, TimeBucket::Monthly) < 13 {
        TimeBucket::Monthly
    } else {
        TimeBucket::Annual
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::default_categories;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(amount: f64, on: NaiveDate, category: &str) -> Expense {
        Expense::new("", amount, "EUR", on, category)
    }

    #[test]
    fn top_four_categories_plus_other_aggregate() {
        let day = date(2024, 1, 1);
        let expenses = vec![
            expense(50.0, day, "restaurants"),
            expense(40.0, day, "accommodation"),
            expense(30.0, day, "transportation"),
            expense(20.0, day, "activities"),
            expense(10.0, day, "drinks"),
            expense(5.0, day, "snacks"),
        ];
        let breakdown = category_breakdown(&expenses, default_categories());

        assert_eq!(breakdown.len(), 5);
        let amounts: Vec<f64> = breakdown.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![50.0, 40.0, 30.0, 20.0, 15.0]);

        let other = &breakdown[4];
        assert_eq!(other.id, "other");
        assert_eq!(other.name, "Other");
        assert_eq!(other.sub_items.len(), 2);
        assert_eq!(other.sub_items[0].amount, 10.0);
        assert_eq!(other.sub_items[1].amount, 5.0);
    }

    #[test]
    fn no_other_entry_when_four_or_fewer_categories() {
        let day = date(2024, 1, 1);
        let expenses = vec![
            expense(10.0, day, "restaurants"),
            expense(20.0, day, "drinks"),
        ];
        let breakdown = category_breakdown(&expenses, default_categories());
        assert_eq!(breakdown.len(), 2);
        assert!(breakdown.iter().all(|e| e.id != "other"));
        assert_eq!(breakdown[0].name, "Drinks");
    }

    #[test]
    fn dangling_category_reference_degrades_to_unknown() {
        let expenses = vec![expense(12.0, date(2024, 1, 1), "deleted-category")];
        let breakdown = category_breakdown(&expenses, default_categories());
        assert_eq!(breakdown[0].name, "Unknown");
        assert_eq!(breakdown[0].color, "#ffffff");
        assert_eq!(breakdown[0].icon, "");
    }

    #[test]
    fn country_breakdown_counts_distinct_days_and_budget() {
        let expenses = vec![
            expense(30.0, date(2024, 1, 1), "fees").with_country("pt"),
            expense(20.0, date(2024, 1, 1), "fees").with_country("PT"),
            expense(10.0, date(2024, 1, 2), "fees").with_country("pt"),
            expense(5.0, date(2024, 1, 3), "fees").with_country("es"),
        ];
        let breakdown = country_breakdown(&expenses, 50.0);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].code, "pt");
        assert_eq!(breakdown[0].name, "Portugal");
        assert_eq!(breakdown[0].total_spent, 60.0);
        assert_eq!(breakdown[0].days, 2);
        assert_eq!(breakdown[0].budget, 100.0);
        assert_eq!(breakdown[1].code, "es");
    }

    #[test]
    fn country_breakdown_skips_excluded_and_countryless_entries() {
        let excluded = expense(100.0, date(2024, 1, 1), "flights")
            .with_country("pt")
            .excluded_from_avg();
        let countryless = expense(10.0, date(2024, 1, 1), "fees");
        let counted = expense(5.0, date(2024, 1, 1), "fees").with_country("pt");
        let breakdown = country_breakdown(&[excluded, countryless, counted], 0.0);

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].total_spent, 5.0);
    }

    #[test]
    fn unknown_country_code_falls_back_to_raw_code() {
        let expenses = vec![expense(5.0, date(2024, 1, 1), "fees").with_country("zz")];
        let breakdown = country_breakdown(&expenses, 0.0);
        assert_eq!(breakdown[0].name, "zz");
    }

    #[test]
    fn monthly_buckets_sort_by_calendar_order_not_label() {
        // "Oct" < "Sep" lexically; chronological order must win.
        let expenses = vec![
            expense(10.0, date(2023, 10, 5), "fees"),
            expense(20.0, date(2023, 9, 20), "fees"),
            expense(30.0, date(2024, 2, 1), "fees"),
        ];
        let buckets = time_breakdown(&expenses, TimeBucket::Monthly);
        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Sep", "Oct", "Feb"]);
        assert_eq!(buckets[0].year, "2023");
        assert_eq!(buckets[2].year, "2024");
    }

    #[test]
    fn weekly_buckets_start_on_monday_and_span_a_range_label() {
        // 2024-01-03 is a Wednesday; its ISO week starts Monday 2024-01-01.
        let expenses = vec![
            expense(10.0, date(2024, 1, 3), "fees"),
            expense(15.0, date(2024, 1, 7), "fees"),
            expense(20.0, date(2024, 1, 8), "fees"),
        ];
        let buckets = time_breakdown(&expenses, TimeBucket::Weekly);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].start, date(2024, 1, 1));
        assert_eq!(buckets[0].amount, 25.0);
        assert_eq!(buckets[0].label, "1/1/24 - 7/1/24");
        assert_eq!(buckets[1].start, date(2024, 1, 8));
    }

    #[test]
    fn daily_and_annual_bucket_labels() {
        let expenses = vec![
            expense(10.0, date(2024, 3, 5), "fees"),
            expense(20.0, date(2024, 3, 5), "fees"),
            expense(5.0, date(2023, 12, 31), "fees"),
        ];
        let daily = time_breakdown(&expenses, TimeBucket::Daily);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[1].label, "5/3");
        assert_eq!(daily[1].amount, 30.0);

        let annual = time_breakdown(&expenses, TimeBucket::Annual);
        assert_eq!(annual.len(), 2);
        assert_eq!(annual[0].label, "2023");
        assert_eq!(annual[0].month, None);
    }

    #[test]
    fn preferred_bucket_escalates_with_history_size() {
        let mut expenses: Vec<Expense> = Vec::new();
        assert_eq!(preferred_bucket(&expenses), TimeBucket::Daily);

        // A week of entries still prefers the daily view.
        for d in 1..=7 {
            expenses.push(expense(1.0, date(2024, 1, d), "fees"));
        }
        assert_eq!(preferred_bucket(&expenses), TimeBucket::Daily);

        // Four weeks of daily history escalates to weekly.
        for d in 8..=28 {
            expenses.push(expense(1.0, date(2024, 1, d), "fees"));
        }
        assert_eq!(preferred_bucket(&expenses), TimeBucket::Weekly);

        // Several months escalates to monthly.
        for m in 2..=6 {
            for d in [1, 8, 15, 22] {
                expenses.push(expense(1.0, date(2024, m, d), "fees"));
            }
        }
        assert_eq!(preferred_bucket(&expenses), TimeBucket::Monthly);

        // Years of history lands on annual.
        for year in 2020..=2023 {
            for m in 1..=12 {
                expenses.push(expense(1.0, date(year, m, 1), "fees"));
            }
        }
        assert_eq!(preferred_bucket(&expenses), TimeBucket::Annual);
    }
}
