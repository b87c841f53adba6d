use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Categorises expenses for budgeting and breakdowns.
///
/// Ids are string slugs (`"restaurants"`, `"flights"`, ...) matching the keys
/// of the trip's category map; custom categories pick their own slug.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub icon: String,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        color: impl Into<String>,
        icon: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            icon: icon.into(),
        }
    }
}

/// Trip-scoped category lookup, keyed by category id.
pub type CategoryMap = BTreeMap<String, Category>;
