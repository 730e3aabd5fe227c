//! Filter stage.

use serde::{Deserialize, Serialize};

use crate::{Category, ClassificationId, ClassificationLookup, LogEntry, Role};

/// Filters for the log entries of a session.
///
/// `None` on a field means "all". Set fields are combined with AND.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    pub role: Option<Role>,
    pub weight_classification_id: Option<ClassificationId>,
    /// Matched through the classification lookup; entries whose
    /// classification is unknown never match an active category.
    pub category: Option<Category>,
}

impl EntryFilter {
    #[must_use]
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    #[must_use]
    pub fn weight_classification_id(mut self, id: ClassificationId) -> Self {
        self.weight_classification_id = Some(id);
        self
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.role.is_none() && self.weight_classification_id.is_none() && self.category.is_none()
    }

    pub fn matches(&self, entry: &LogEntry, lookup: &ClassificationLookup) -> bool {
        self.role.is_none_or(|role| entry.role == role)
            && self
                .weight_classification_id
                .is_none_or(|id| entry.weight_classification_id == id)
            && self
                .category
                .is_none_or(|category| lookup.category(entry.weight_classification_id) == Some(category))
    }
}

/// Returns the entries matching `filter`, in their original order.
pub fn filter_entries(
    entries: &[LogEntry],
    filter: &EntryFilter,
    lookup: &ClassificationLookup,
) -> Vec<LogEntry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry, lookup))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{Weight, WeightClassification};

    fn entry(id: i64, role: Role, wc: i64) -> LogEntry {
        LogEntry::new(
            id,
            1,
            wc,
            role,
            Weight::from_grams(1_000),
            Utc.timestamp_opt(id, 0).unwrap(),
        )
        .unwrap()
    }

    fn lookup() -> ClassificationLookup {
        [
            WeightClassification::new(5, 1, "Small", Category::Dressed).unwrap(),
            WeightClassification::new(7, 1, "Liver", Category::Byproduct).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    fn ids(entries: &[LogEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.id).collect()
    }

    fn sample() -> Vec<LogEntry> {
        vec![
            entry(1, Role::Tally, 5),
            entry(2, Role::Dispatcher, 5),
            entry(3, Role::Tally, 7),
            entry(4, Role::Dispatcher, 99),
        ]
    }

    #[test]
    fn unfiltered_keeps_everything_in_order() {
        let filter = EntryFilter::default();
        assert!(filter.is_unfiltered());
        assert_eq!(ids(&filter_entries(&sample(), &filter, &lookup())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn role_and_classification_filters() {
        let lookup = lookup();
        let tally = EntryFilter::default().role(Role::Tally);
        assert_eq!(ids(&filter_entries(&sample(), &tally, &lookup)), vec![1, 3]);

        let wc = EntryFilter::default().weight_classification_id(5);
        assert_eq!(ids(&filter_entries(&sample(), &wc, &lookup)), vec![1, 2]);
    }

    #[test]
    fn category_filter_excludes_unresolved_classifications() {
        let lookup = lookup();
        let dressed = EntryFilter::default().category(Category::Dressed);
        assert_eq!(ids(&filter_entries(&sample(), &dressed, &lookup)), vec![1, 2]);

        let frozen = EntryFilter::default().category(Category::Frozen);
        assert!(filter_entries(&sample(), &frozen, &lookup).is_empty());

        let empty_lookup = ClassificationLookup::new();
        assert!(filter_entries(&sample(), &dressed, &empty_lookup).is_empty());
    }

    #[test]
    fn filtering_nothing_returns_empty() {
        let filter = EntryFilter::default().role(Role::Tally);
        assert!(filter_entries(&[], &filter, &lookup()).is_empty());
    }
}
