//! Static lookup tables supplied by configuration, not computed: the shared
//! default category set and the country-code table.

pub mod categories;
pub mod countries;

pub use categories::default_categories;
pub use countries::country_name;
