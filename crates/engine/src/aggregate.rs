//! Aggregation stage: tally vs. dispatcher totals per classification and
//! overall.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{ClassificationId, ClassificationLookup, LogEntry, Role, Status, Weight, classify_status};

/// Running totals for one group of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    /// Classification id, `None` for the overall row.
    pub weight_classification_id: Option<ClassificationId>,
    pub classification: String,
    pub tally_total: Weight,
    pub dispatcher_total: Weight,
    /// `tally_total - dispatcher_total`.
    pub difference: Weight,
}

impl Aggregation {
    fn new(weight_classification_id: Option<ClassificationId>, classification: String) -> Self {
        Self {
            weight_classification_id,
            classification,
            ..Self::default()
        }
    }

    fn add(&mut self, entry: &LogEntry) {
        match entry.role {
            Role::Tally => self.tally_total += entry.weight,
            Role::Dispatcher => self.dispatcher_total += entry.weight,
        }
        self.difference = self.tally_total - self.dispatcher_total;
    }

    /// True when neither side recorded any weight.
    #[must_use]
    pub fn is_not_started(&self) -> bool {
        self.tally_total.is_zero() && self.dispatcher_total.is_zero()
    }

    #[must_use]
    pub fn status(&self, threshold: Weight) -> Status {
        classify_status(self.difference, self.is_not_started(), threshold)
    }
}

/// Result of [`aggregate`]. Per-classification rows carry no order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregates {
    pub by_classification: HashMap<ClassificationId, Aggregation>,
    pub overall: Aggregation,
}

pub const OVERALL_LABEL: &str = "Total";

/// Sums tally and dispatcher weights per classification and overall.
///
/// Order of `entries` is irrelevant. Unknown classifications get a
/// `"WC <id>"` label.
pub fn aggregate(entries: &[LogEntry], lookup: &ClassificationLookup) -> Aggregates {
    let mut by_classification: HashMap<ClassificationId, Aggregation> = HashMap::new();
    let mut overall = Aggregation::new(None, OVERALL_LABEL.to_string());

    for entry in entries {
        by_classification
            .entry(entry.weight_classification_id)
            .or_insert_with(|| {
                Aggregation::new(
                    Some(entry.weight_classification_id),
                    lookup.display_label(entry.weight_classification_id),
                )
            })
            .add(entry);
        overall.add(entry);
    }

    Aggregates {
        by_classification,
        overall,
    }
}
