//! The module contains the `LogEntry` type, one weight recorded in a tally
//! session by either side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    ClassificationId, EngineError, EntryId, ResultEngine, SessionId, Weight,
    classification::{ClassificationLookup, DEFAULT_HEADS},
    util::{normalize_optional_text, validate_heads},
};

/// Which side recorded a weight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tally,
    Dispatcher,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tally => "tally",
            Self::Dispatcher => "dispatcher",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tally" => Ok(Self::Tally),
            "dispatcher" => Ok(Self::Dispatcher),
            other => Err(EngineError::InvalidValue(format!("invalid role: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: EntryId,
    pub tally_session_id: SessionId,
    pub weight_classification_id: ClassificationId,
    pub role: Role,
    pub weight: Weight,
    pub heads: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Session the entry was moved from, if it was transferred.
    pub original_session_id: Option<SessionId>,
}

impl LogEntry {
    pub fn new(
        id: EntryId,
        tally_session_id: SessionId,
        weight_classification_id: ClassificationId,
        role: Role,
        weight: Weight,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if !weight.is_positive() {
            return Err(EngineError::InvalidWeight(
                "weight must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            id,
            tally_session_id,
            weight_classification_id,
            role,
            weight,
            heads: None,
            notes: None,
            created_at,
            original_session_id: None,
        })
    }

    pub fn with_heads(mut self, heads: Option<f64>) -> ResultEngine<Self> {
        validate_heads(heads, "heads")?;
        self.heads = heads;
        Ok(self)
    }

    #[must_use]
    pub fn with_notes(mut self, notes: Option<&str>) -> Self {
        self.notes = normalize_optional_text(notes);
        self
    }

    #[must_use]
    pub fn transferred_from(mut self, session_id: Option<SessionId>) -> Self {
        self.original_session_id = session_id;
        self
    }

    #[must_use]
    pub fn is_transferred(&self) -> bool {
        self.original_session_id.is_some()
    }

    /// Heads carried by the entry, falling back to the classification
    /// default and then to [`DEFAULT_HEADS`].
    pub fn effective_heads(&self, lookup: &ClassificationLookup) -> f64 {
        self.heads
            .or_else(|| {
                lookup
                    .get(self.weight_classification_id)
                    .map(|wc| wc.default_heads)
            })
            .unwrap_or(DEFAULT_HEADS)
    }
}
