//! Allocation progress: how many bags each side has logged per
//! classification, against the number of bags the session requires.
//!
//! Every log entry is one bag.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    ClassificationId, ClassificationLookup, EngineError, LogEntry, ResultEngine, Role, SessionId,
};

/// Required bags of one classification in one session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllocationTarget {
    pub tally_session_id: SessionId,
    pub weight_classification_id: ClassificationId,
    pub required_bags: f64,
}

impl AllocationTarget {
    pub fn new(
        tally_session_id: SessionId,
        weight_classification_id: ClassificationId,
        required_bags: f64,
    ) -> ResultEngine<Self> {
        if !required_bags.is_finite() || required_bags < 0.0 {
            return Err(EngineError::InvalidValue(format!(
                "required_bags must be a non-negative number, got {required_bags}"
            )));
        }
        Ok(Self {
            tally_session_id,
            weight_classification_id,
            required_bags,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AllocationProgress {
    pub weight_classification_id: ClassificationId,
    pub classification: String,
    pub required_bags: f64,
    pub bags_tally: u64,
    pub bags_dispatcher: u64,
    pub heads: f64,
}

impl AllocationProgress {
    pub fn bags(&self, role: Role) -> u64 {
        match role {
            Role::Tally => self.bags_tally,
            Role::Dispatcher => self.bags_dispatcher,
        }
    }

    pub fn remaining_bags(&self, role: Role) -> f64 {
        (self.required_bags - self.bags(role) as f64).max(0.0)
    }

    pub fn is_complete(&self, role: Role) -> bool {
        self.required_bags > 0.0 && self.bags(role) as f64 >= self.required_bags
    }
}

fn progress_row<'a>(
    progress: &'a mut HashMap<ClassificationId, AllocationProgress>,
    lookup: &ClassificationLookup,
    id: ClassificationId,
) -> &'a mut AllocationProgress {
    progress.entry(id).or_insert_with(|| AllocationProgress {
        weight_classification_id: id,
        classification: lookup.display_label(id),
        ..AllocationProgress::default()
    })
}

/// Computes progress per classification.
///
/// Targets and entries are expected to belong to one session; classifications
/// with a target but no entries are reported with zero bags.
pub fn allocation_progress(
    entries: &[LogEntry],
    targets: &[AllocationTarget],
    lookup: &ClassificationLookup,
) -> HashMap<ClassificationId, AllocationProgress> {
    let mut progress: HashMap<ClassificationId, AllocationProgress> = HashMap::new();

    for target in targets {
        progress_row(&mut progress, lookup, target.weight_classification_id).required_bags +=
            target.required_bags;
    }
    for entry in entries {
        let heads = entry.effective_heads(lookup);
        let row = progress_row(&mut progress, lookup, entry.weight_classification_id);
        match entry.role {
            Role::Tally => row.bags_tally += 1,
            Role::Dispatcher => row.bags_dispatcher += 1,
        }
        row.heads += heads;
    }

    progress
}
