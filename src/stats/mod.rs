//! The expense aggregation and statistics engine.
//!
//! A small pipeline of pure functions over in-memory expense collections:
//! normalize multi-day expenses into per-day entries, filter by composable
//! predicates, aggregate into derived stats, and group into chart-ready
//! breakdowns. No function here mutates its inputs or touches persistence;
//! callers inject "today" explicitly and recompute per render.

pub mod breakdown;
pub mod filter;
pub mod split;
pub mod summary;

pub use breakdown::{
    category_breakdown, country_breakdown, preferred_bucket, time_breakdown,
    CategoryBreakdownEntry, CategoryGroup, CountryBreakdownEntry, TimeBucket, TimeBucketEntry,
};
pub use filter::ExpenseFilter;
pub use split::split_expenses;
pub use summary::{general_stats, up_today_stats, TripStats, UpTodayStats};
