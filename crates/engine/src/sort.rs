//! Sort stage.
//!
//! The requested direction only flips the primary comparator. Ties on any key
//! other than `time` are broken by `created_at`, newest first, whatever the
//! requested direction.
//!
//! Class labels compare like a dictionary: letters first with accents and
//! case ignored, so `large` comes before `Small`. Case only breaks ties,
//! lowercase first. Unresolved classifications sort as an empty label.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{ClassificationLookup, EngineError, LogEntry, util::collate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Time,
    Class,
    Weight,
    Id,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Class => "class",
            Self::Weight => "weight",
            Self::Id => "id",
        }
    }
}

impl TryFrom<&str> for SortKey {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "time" => Ok(Self::Time),
            "class" => Ok(Self::Class),
            "weight" => Ok(Self::Weight),
            "id" => Ok(Self::Id),
            other => Err(EngineError::InvalidValue(format!("invalid sort key: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl TryFrom<&str> for SortOrder {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(EngineError::InvalidValue(format!("invalid sort order: {other}"))),
        }
    }
}

fn compare_primary(
    a: &LogEntry,
    b: &LogEntry,
    key: SortKey,
    lookup: &ClassificationLookup,
) -> Ordering {
    match key {
        SortKey::Time => a.created_at.cmp(&b.created_at),
        SortKey::Weight => a.weight.cmp(&b.weight),
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Class => {
            let label_a = lookup.label(a.weight_classification_id).unwrap_or("");
            let label_b = lookup.label(b.weight_classification_id).unwrap_or("");
            collate(label_a, label_b)
        }
    }
}

/// Total order used by [`sort_entries`].
pub fn compare_entries(
    a: &LogEntry,
    b: &LogEntry,
    key: SortKey,
    order: SortOrder,
    lookup: &ClassificationLookup,
) -> Ordering {
    let primary = order.apply(compare_primary(a, b, key, lookup));
    if primary != Ordering::Equal || key == SortKey::Time {
        return primary;
    }
    b.created_at.cmp(&a.created_at)
}

/// Returns a sorted copy of `entries`. The sort is stable.
pub fn sort_entries(
    entries: &[LogEntry],
    key: SortKey,
    order: SortOrder,
    lookup: &ClassificationLookup,
) -> Vec<LogEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| compare_entries(a, b, key, order, lookup));
    sorted
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{Category, Role, Weight, WeightClassification};

    fn entry(id: i64, wc: i64, grams: i64, secs: i64) -> LogEntry {
        LogEntry::new(
            id,
            1,
            wc,
            Role::Tally,
            Weight::from_grams(grams),
            Utc.timestamp_opt(secs, 0).unwrap(),
        )
        .unwrap()
    }

    fn ids(entries: &[LogEntry]) -> Vec<i64> {
        entries.iter().map(|e| e.id).collect()
    }

    fn lookup() -> ClassificationLookup {
        [
            WeightClassification::new(1, 1, "Large", Category::Dressed).unwrap(),
            WeightClassification::new(2, 1, "Small", Category::Dressed).unwrap(),
            WeightClassification::new(3, 1, "large", Category::Dressed).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn sorts_by_time_both_directions() {
        let entries = vec![entry(1, 1, 10, 30), entry(2, 1, 10, 10), entry(3, 1, 10, 20)];
        let lookup = lookup();
        assert_eq!(
            ids(&sort_entries(&entries, SortKey::Time, SortOrder::Asc, &lookup)),
            vec![2, 3, 1]
        );
        assert_eq!(
            ids(&sort_entries(&entries, SortKey::Time, SortOrder::Desc, &lookup)),
            vec![1, 3, 2]
        );
    }

    #[test]
    fn time_ties_keep_input_order() {
        let entries = vec![entry(1, 1, 10, 5), entry(2, 1, 20, 5), entry(3, 1, 30, 5)];
        let lookup = lookup();
        assert_eq!(
            ids(&sort_entries(&entries, SortKey::Time, SortOrder::Asc, &lookup)),
            vec![1, 2, 3]
        );
        assert_eq!(
            ids(&sort_entries(&entries, SortKey::Time, SortOrder::Desc, &lookup)),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn weight_ties_break_newest_first_in_both_directions() {
        let entries = vec![entry(1, 1, 10, 1), entry(2, 1, 10, 2), entry(3, 1, 5, 3)];
        let lookup = lookup();
        assert_eq!(
            ids(&sort_entries(&entries, SortKey::Weight, SortOrder::Asc, &lookup)),
            vec![3, 2, 1]
        );
        assert_eq!(
            ids(&sort_entries(&entries, SortKey::Weight, SortOrder::Desc, &lookup)),
            vec![2, 1, 3]
        );
    }

    #[test]
    fn class_sort_orders_letters_before_case_and_unresolved_first() {
        let entries = vec![
            entry(1, 2, 10, 1),
            entry(2, 3, 10, 2),
            entry(3, 1, 10, 3),
            entry(4, 42, 10, 4),
        ];
        let sorted = sort_entries(&entries, SortKey::Class, SortOrder::Asc, &lookup());
        // "" < "large" < "Large" < "Small"
        assert_eq!(ids(&sorted), vec![4, 2, 3, 1]);
        let sorted = sort_entries(&entries, SortKey::Class, SortOrder::Desc, &lookup());
        assert_eq!(ids(&sorted), vec![1, 3, 2, 4]);
    }

    #[test]
    fn sorts_by_id() {
        let entries = vec![entry(3, 1, 10, 1), entry(1, 1, 10, 1), entry(2, 1, 10, 1)];
        let lookup = lookup();
        assert_eq!(
            ids(&sort_entries(&entries, SortKey::Id, SortOrder::Asc, &lookup)),
            vec![1, 2, 3]
        );
        assert_eq!(
            ids(&sort_entries(&entries, SortKey::Id, SortOrder::Desc, &lookup)),
            vec![3, 2, 1]
        );
    }

    #[test]
    fn parses_keys_and_orders() {
        assert_eq!(SortKey::try_from("class").unwrap(), SortKey::Class);
        assert_eq!(SortOrder::try_from("asc").unwrap(), SortOrder::Asc);
        assert!(SortKey::try_from("heads").is_err());
        assert!(SortOrder::try_from("up").is_err());
    }
}
