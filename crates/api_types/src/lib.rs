use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod customer {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Customer {
        pub id: i64,
        pub name: String,
    }
}

pub mod plant {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Plant {
        pub id: i64,
        pub name: String,
    }
}

pub mod weight_classification {
    use super::*;

    /// A classification of a plant.
    ///
    /// Weights are kilograms. A missing bound is open; both missing means the
    /// classification takes every size.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct WeightClassification {
        pub id: i64,
        pub plant_id: i64,
        pub classification: String,
        /// `Dressed`, `Byproduct` or `Frozen`.
        pub category: String,
        #[serde(default)]
        pub min_weight: Option<f64>,
        #[serde(default)]
        pub max_weight: Option<f64>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub default_heads: Option<f64>,
    }
}

pub mod tally_session {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TallySessionStatus {
        #[default]
        Ongoing,
        Completed,
        Cancelled,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct TallySession {
        pub id: i64,
        pub customer_id: i64,
        pub plant_id: i64,
        pub date: NaiveDate,
        #[serde(default)]
        pub status: TallySessionStatus,
    }
}

pub mod tally_log_entry {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TallyLogEntryRole {
        Tally,
        Dispatcher,
    }

    /// One recorded weight, in kilograms.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct TallyLogEntry {
        pub id: i64,
        pub tally_session_id: i64,
        pub weight_classification_id: i64,
        pub role: TallyLogEntryRole,
        pub weight: f64,
        #[serde(default)]
        pub heads: Option<f64>,
        #[serde(default)]
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        /// Set when the entry was moved here from another session.
        #[serde(default)]
        pub original_session_id: Option<i64>,
    }
}

pub mod allocation_details {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct AllocationDetails {
        pub tally_session_id: i64,
        pub weight_classification_id: i64,
        #[serde(default)]
        pub required_bags: f64,
        #[serde(default)]
        pub allocated_bags_tally: f64,
        #[serde(default)]
        pub allocated_bags_dispatcher: f64,
    }
}

pub mod preferences {
    use super::*;

    /// Per-user display preferences. Missing fields fall back to the
    /// application settings.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct UserPreferences {
        pub timezone: Option<String>,
        /// Kilograms.
        pub acceptable_difference_threshold: Option<f64>,
        pub active_plant_id: Option<i64>,
        pub classification_order: Option<Vec<i64>>,
    }
}

pub mod snapshot {
    use super::*;
    use crate::{
        allocation_details::AllocationDetails, customer::Customer, plant::Plant,
        preferences::UserPreferences, tally_log_entry::TallyLogEntry,
        tally_session::TallySession, weight_classification::WeightClassification,
    };

    /// Everything a session screen loads at once.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SessionSnapshot {
        pub customers: Vec<Customer>,
        pub plants: Vec<Plant>,
        pub weight_classifications: Vec<WeightClassification>,
        pub sessions: Vec<TallySession>,
        pub entries: Vec<TallyLogEntry>,
        pub allocations: Vec<AllocationDetails>,
        pub preferences: UserPreferences,
    }
}

pub mod export {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct ExportRequest {
        pub session_ids: Vec<i64>,
        pub date_from: Option<NaiveDate>,
        pub date_to: Option<NaiveDate>,
        pub customer_id: Option<i64>,
        pub plant_id: Option<i64>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExportItem {
        /// Category code: `DC`, `BP` or `FR`.
        pub category: String,
        pub classification: String,
        pub bags: u64,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CustomerExportData {
        pub customer_name: String,
        pub items: Vec<ExportItem>,
        pub subtotal: u64,
    }

    #[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct ExportResponse {
        pub customers: Vec<CustomerExportData>,
        pub grand_total_dc: u64,
        pub grand_total_bp: u64,
        pub grand_total_fr: u64,
    }
}
