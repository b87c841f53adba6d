use once_cell::sync::Lazy;

use crate::trip::{Category, CategoryMap};

static DEFAULT_CATEGORIES: Lazy<CategoryMap> = Lazy::new(|| {
    [
        ("transportation", "Transportation", "#F97316", "Car"),
        ("restaurants", "Restaurants", "#0D9488", "UtensilsCrossed"),
        ("accommodation", "Accommodation", "#22C55E", "BedDouble"),
        ("groceries", "Groceries", "#8B5CF6", "ShoppingCart"),
        ("shopping", "Shopping", "#D946EF", "ShoppingBag"),
        ("activities", "Activities", "#0EA5E9", "Activity"),
        ("drinks", "Drinks", "#9333EA", "Beer"),
        ("flights", "Flights", "#06B6D4", "Plane"),
        ("fees", "Fees & Charges", "#64748B", "Receipt"),
        ("sightseeing", "Sightseeing", "#EAB308", "Camera"),
        ("laundry", "Laundry", "#14B8A6", "Shirt"),
        ("gifts", "Gifts", "#EC4899", "Gift"),
        ("snacks", "Snacks", "#F59E0B", "Candy"),
        ("grooming", "Grooming", "#6366F1", "Scissors"),
        ("sim", "Sim", "#10B981", "Smartphone"),
        ("visa", "Visa", "#3B82F6", "CreditCard"),
        ("work", "Work Related", "#475569", "Briefcase"),
        ("workout", "Workout", "#EF4444", "Dumbbell"),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| (id.to_string(), Category::new(id, name, color, icon)))
    .collect()
});

/// The shared default category set, used by trips that define no categories
/// of their own.
pub fn default_categories() -> &'static CategoryMap {
    &DEFAULT_CATEGORIES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_complete_and_keyed_by_id() {
        let categories = default_categories();
        assert_eq!(categories.len(), 18);
        for (key, category) in categories {
            assert_eq!(key, &category.id);
            assert!(category.color.starts_with('#'));
        }
        assert_eq!(categories["fees"].name, "Fees & Charges");
    }
}
