//! Sessions and the reference data they point to.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{CustomerId, PlantId, ResultEngine, SessionId, util::normalize_required_name};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Ongoing,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
}

impl Customer {
    pub fn new(id: CustomerId, name: &str) -> ResultEngine<Self> {
        Ok(Self {
            id,
            name: normalize_required_name(name, "customer name")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
}

impl Plant {
    pub fn new(id: PlantId, name: &str) -> ResultEngine<Self> {
        Ok(Self {
            id,
            name: normalize_required_name(name, "plant name")?,
        })
    }
}

/// A dated unit of work for one customer at one plant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallySession {
    pub id: SessionId,
    pub customer_id: CustomerId,
    pub plant_id: PlantId,
    pub date: NaiveDate,
    pub status: SessionStatus,
}

impl TallySession {
    #[must_use]
    pub fn is_ongoing(&self) -> bool {
        self.status == SessionStatus::Ongoing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ongoing_sessions_accept_entries() {
        let mut session = TallySession {
            id: 1,
            customer_id: 1,
            plant_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            status: SessionStatus::default(),
        };
        assert!(session.is_ongoing());
        session.status = SessionStatus::Completed;
        assert!(!session.is_ongoing());
        assert_eq!(session.status.as_str(), "completed");
    }

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(Customer::new(1, "  Acme ").unwrap().name, "Acme");
        assert!(Plant::new(1, "   ").is_err());
    }
}
