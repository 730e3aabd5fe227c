//! Session view: the whole pipeline (filter → sort → aggregate → classify)
//! behind one call, configured once from the user's preferences.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    Aggregation, ClassificationId, ClassificationLookup, EngineError, EntryFilter, LogEntry,
    ResultEngine, SortKey, SortOrder, Status, Weight, aggregate, filter_entries, sort_entries,
    util::collate,
};

/// One line of a reconciliation summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub aggregation: Aggregation,
    pub status: Status,
}

impl SummaryRow {
    fn new(aggregation: Aggregation, threshold: Weight) -> Self {
        let status = aggregation.status(threshold);
        Self {
            aggregation,
            status,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Filtered and sorted entries.
    pub entries: Vec<LogEntry>,
    /// Per-classification rows, in display order.
    pub rows: Vec<SummaryRow>,
    pub overall: SummaryRow,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionView {
    filter: EntryFilter,
    sort_key: SortKey,
    sort_order: SortOrder,
    threshold: Weight,
    classification_order: Vec<ClassificationId>,
}

impl SessionView {
    /// Return a builder for `SessionView`.
    pub fn builder() -> SessionViewBuilder {
        SessionViewBuilder::default()
    }

    pub fn filter(&self) -> &EntryFilter {
        &self.filter
    }

    pub fn threshold(&self) -> Weight {
        self.threshold
    }

    /// Runs the pipeline over the entries of one session.
    pub fn run(&self, entries: &[LogEntry], lookup: &ClassificationLookup) -> SessionSummary {
        let filtered = filter_entries(entries, &self.filter, lookup);
        let aggregates = aggregate(&filtered, lookup);
        let sorted = sort_entries(&filtered, self.sort_key, self.sort_order, lookup);

        let mut rows: Vec<SummaryRow> = aggregates
            .by_classification
            .into_values()
            .map(|aggregation| SummaryRow::new(aggregation, self.threshold))
            .collect();
        self.order_rows(&mut rows);

        tracing::debug!(
            total = entries.len(),
            kept = sorted.len(),
            rows = rows.len(),
            "session view computed"
        );

        SessionSummary {
            entries: sorted,
            rows,
            overall: SummaryRow::new(aggregates.overall, self.threshold),
        }
    }

    /// Classifications listed in the user order come first, in that order;
    /// the rest follow by label, then id.
    fn order_rows(&self, rows: &mut [SummaryRow]) {
        let rank: HashMap<ClassificationId, usize> = self
            .classification_order
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .rev()
            .collect();
        rows.sort_by(|a, b| {
            let a_id = a.aggregation.weight_classification_id;
            let b_id = b.aggregation.weight_classification_id;
            let a_rank = a_id.and_then(|id| rank.get(&id)).copied().unwrap_or(usize::MAX);
            let b_rank = b_id.and_then(|id| rank.get(&id)).copied().unwrap_or(usize::MAX);
            a_rank
                .cmp(&b_rank)
                .then_with(|| collate(&a.aggregation.classification, &b.aggregation.classification))
                .then_with(|| a_id.cmp(&b_id))
        });
    }
}

/// The builder for `SessionView`.
#[derive(Default)]
pub struct SessionViewBuilder {
    filter: EntryFilter,
    sort_key: SortKey,
    sort_order: SortOrder,
    threshold: Weight,
    classification_order: Vec<ClassificationId>,
}

impl SessionViewBuilder {
    pub fn filter(mut self, filter: EntryFilter) -> SessionViewBuilder {
        self.filter = filter;
        self
    }

    pub fn sort(mut self, key: SortKey, order: SortOrder) -> SessionViewBuilder {
        self.sort_key = key;
        self.sort_order = order;
        self
    }

    /// Acceptable difference between the two sides. Must not be negative.
    pub fn threshold(mut self, threshold: Weight) -> SessionViewBuilder {
        self.threshold = threshold;
        self
    }

    pub fn classification_order(mut self, order: Vec<ClassificationId>) -> SessionViewBuilder {
        self.classification_order = order;
        self
    }

    /// Construct `SessionView`
    pub fn build(self) -> ResultEngine<SessionView> {
        if self.threshold.is_negative() {
            return Err(EngineError::InvalidThreshold(format!(
                "threshold must not be negative, got {}",
                self.threshold
            )));
        }
        Ok(SessionView {
            filter: self.filter,
            sort_key: self.sort_key,
            sort_order: self.sort_order,
            threshold: self.threshold,
            classification_order: self.classification_order,
        })
    }
}
