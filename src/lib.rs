#![doc(test(attr(deny(warnings))))]

//! Trip Core provides the trip ledger, expense normalization, filtering, and
//! statistics primitives that power travel-expense tracking frontends.

pub mod errors;
pub mod manager;
pub mod reference;
pub mod stats;
pub mod storage;
pub mod time;
pub mod trip;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("trip_core=info".parse().unwrap());
        fmt().with_env_filter(filter).init();
        tracing::info!("Trip Core tracing initialized.");
    });
}
