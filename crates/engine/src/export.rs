//! Export summary: bags logged by the tally side, grouped per customer,
//! category and classification, with grand totals per category.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    Category, ClassificationLookup, Customer, CustomerId, LogEntry, PlantId, Role, SessionId,
    TallySession, util::collate,
};

/// Which sessions to export. A non-empty `session_ids` wins over the other
/// fields; dates are inclusive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub session_ids: Vec<SessionId>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub customer_id: Option<CustomerId>,
    pub plant_id: Option<PlantId>,
}

impl ExportRequest {
    pub fn selects(&self, session: &TallySession) -> bool {
        if !self.session_ids.is_empty() {
            return self.session_ids.contains(&session.id);
        }
        self.date_from.is_none_or(|from| session.date >= from)
            && self.date_to.is_none_or(|to| session.date <= to)
            && self.customer_id.is_none_or(|id| session.customer_id == id)
            && self.plant_id.is_none_or(|id| session.plant_id == id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportItem {
    pub category: Category,
    pub classification: String,
    pub bags: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerExport {
    pub customer_name: String,
    pub items: Vec<ExportItem>,
    pub subtotal: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub customers: Vec<CustomerExport>,
    pub grand_totals: BTreeMap<Category, u64>,
}

impl ExportSummary {
    pub fn grand_total(&self, category: Category) -> u64 {
        self.grand_totals.get(&category).copied().unwrap_or(0)
    }
}

/// Builds the export summary of the sessions selected by `request`.
///
/// Only tally entries count, one bag each. Entries whose classification is
/// unknown are skipped since they have no category to report under.
/// Customers are ordered by name, items by category name descending
/// (Frozen, Dressed, Byproduct) then classification label.
pub fn export_summary(
    request: &ExportRequest,
    sessions: &[TallySession],
    customers: &[Customer],
    entries: &[LogEntry],
    lookup: &ClassificationLookup,
) -> ExportSummary {
    let selected: HashMap<SessionId, &TallySession> = sessions
        .iter()
        .filter(|s| request.selects(s))
        .map(|s| (s.id, s))
        .collect();
    let names: HashMap<CustomerId, &str> =
        customers.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut grouped: BTreeMap<String, HashMap<(Category, String), u64>> = BTreeMap::new();
    let mut skipped = HashSet::new();
    for entry in entries.iter().filter(|e| e.role == Role::Tally) {
        let Some(session) = selected.get(&entry.tally_session_id) else {
            continue;
        };
        let Some(wc) = lookup.get(entry.weight_classification_id) else {
            skipped.insert(entry.weight_classification_id);
            continue;
        };
        let customer_name = names
            .get(&session.customer_id)
            .map_or_else(|| format!("Customer {}", session.customer_id), ToString::to_string);
        *grouped
            .entry(customer_name)
            .or_default()
            .entry((wc.category, wc.classification.clone()))
            .or_default() += 1;
    }
    if !skipped.is_empty() {
        tracing::warn!(
            count = skipped.len(),
            "export skipped entries with unknown weight classifications"
        );
    }

    let mut summary = ExportSummary::default();
    for (customer_name, groups) in grouped {
        let mut items: Vec<ExportItem> = groups
            .into_iter()
            .map(|((category, classification), bags)| ExportItem {
                category,
                classification,
                bags,
            })
            .collect();
        items.sort_by(|a, b| {
            b.category
                .as_str()
                .cmp(a.category.as_str())
                .then_with(|| collate(&a.classification, &b.classification))
        });

        let mut subtotal = 0;
        for item in &items {
            subtotal += item.bags;
            *summary.grand_totals.entry(item.category).or_default() += item.bags;
        }
        summary.customers.push(CustomerExport {
            customer_name,
            items,
            subtotal,
        });
    }
    summary
}
