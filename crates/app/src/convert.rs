//! Conversions between the wire types and the engine types.
//!
//! Wire values are validated here, so a malformed snapshot fails before any
//! computation runs.

use api_types::{
    allocation_details::AllocationDetails,
    customer::Customer,
    plant::Plant,
    export::{CustomerExportData, ExportItem, ExportRequest, ExportResponse},
    snapshot::SessionSnapshot,
    tally_log_entry::{TallyLogEntry, TallyLogEntryRole},
    tally_session::{TallySession, TallySessionStatus},
    weight_classification::WeightClassification,
};
use engine::{
    AllocationTarget, Category, ClassificationLookup, ExportSummary, LogEntry, PlantId, Role,
    SessionId, SessionStatus, Weight, WeightRange,
};

use crate::error::Result;

/// A snapshot converted into engine values.
#[derive(Debug, Clone)]
pub struct SessionData {
    pub lookup: ClassificationLookup,
    pub customers: Vec<engine::Customer>,
    pub plants: Vec<engine::Plant>,
    pub sessions: Vec<engine::TallySession>,
    pub entries: Vec<LogEntry>,
    pub targets: Vec<AllocationTarget>,
}

impl SessionData {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Result<Self> {
        let lookup = snapshot
            .weight_classifications
            .iter()
            .map(classification)
            .collect::<Result<ClassificationLookup>>()?;
        Ok(Self {
            lookup,
            customers: snapshot.customers.iter().map(customer).collect::<Result<_>>()?,
            plants: snapshot.plants.iter().map(plant).collect::<Result<_>>()?,
            sessions: snapshot.sessions.iter().map(session).collect(),
            entries: snapshot.entries.iter().map(entry).collect::<Result<_>>()?,
            targets: snapshot
                .allocations
                .iter()
                .map(allocation_target)
                .collect::<Result<_>>()?,
        })
    }

    /// Whether entries of `session_id` fall in scope: one explicit session,
    /// else the sessions of `plant_id`, else everything.
    fn in_scope(&self, session_id: SessionId, scope: Scope) -> bool {
        match scope {
            Scope::Session(id) => session_id == id,
            Scope::Plant(plant_id) => self
                .sessions
                .iter()
                .any(|s| s.id == session_id && s.plant_id == plant_id),
            Scope::All => true,
        }
    }

    pub fn entries_of(&self, scope: Scope) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|e| self.in_scope(e.tally_session_id, scope))
            .cloned()
            .collect()
    }

    pub fn targets_of(&self, scope: Scope) -> Vec<AllocationTarget> {
        self.targets
            .iter()
            .filter(|t| self.in_scope(t.tally_session_id, scope))
            .copied()
            .collect()
    }

    /// Plant name for headings; unknown plants show their id.
    pub fn plant_name(&self, plant_id: PlantId) -> String {
        self.plants
            .iter()
            .find(|p| p.id == plant_id)
            .map_or_else(|| format!("plant {plant_id}"), |p| p.name.clone())
    }
}

/// Which entries a command looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scope {
    Session(SessionId),
    Plant(PlantId),
    All,
}

impl Scope {
    /// An explicit session wins over the active plant preference.
    pub fn new(session_id: Option<SessionId>, active_plant_id: Option<PlantId>) -> Self {
        match (session_id, active_plant_id) {
            (Some(id), _) => Self::Session(id),
            (None, Some(plant_id)) => Self::Plant(plant_id),
            (None, None) => Self::All,
        }
    }
}

fn optional_weight(kg: Option<f64>) -> Result<Option<Weight>> {
    Ok(kg.map(Weight::from_kg).transpose()?)
}

pub fn classification(wc: &WeightClassification) -> Result<engine::WeightClassification> {
    let category = Category::try_from(wc.category.as_str())?;
    let range = WeightRange::new(
        optional_weight(wc.min_weight)?,
        optional_weight(wc.max_weight)?,
    )?;
    let mut converted =
        engine::WeightClassification::new(wc.id, wc.plant_id, &wc.classification, category)?
            .with_range(range)
            .with_description(wc.description.as_deref());
    if let Some(heads) = wc.default_heads {
        converted = converted.with_default_heads(heads)?;
    }
    Ok(converted)
}

pub fn plant(plant: &Plant) -> Result<engine::Plant> {
    Ok(engine::Plant::new(plant.id, &plant.name)?)
}

pub fn customer(customer: &Customer) -> Result<engine::Customer> {
    Ok(engine::Customer::new(customer.id, &customer.name)?)
}

pub fn session(session: &TallySession) -> engine::TallySession {
    engine::TallySession {
        id: session.id,
        customer_id: session.customer_id,
        plant_id: session.plant_id,
        date: session.date,
        status: match session.status {
            TallySessionStatus::Ongoing => SessionStatus::Ongoing,
            TallySessionStatus::Completed => SessionStatus::Completed,
            TallySessionStatus::Cancelled => SessionStatus::Cancelled,
        },
    }
}

pub fn role(role: TallyLogEntryRole) -> Role {
    match role {
        TallyLogEntryRole::Tally => Role::Tally,
        TallyLogEntryRole::Dispatcher => Role::Dispatcher,
    }
}

pub fn entry(entry: &TallyLogEntry) -> Result<LogEntry> {
    let converted = LogEntry::new(
        entry.id,
        entry.tally_session_id,
        entry.weight_classification_id,
        role(entry.role),
        Weight::from_kg(entry.weight)?,
        entry.created_at,
    )?
    .with_heads(entry.heads)?
    .with_notes(entry.notes.as_deref())
    .transferred_from(entry.original_session_id);
    Ok(converted)
}

pub fn allocation_target(details: &AllocationDetails) -> Result<AllocationTarget> {
    Ok(AllocationTarget::new(
        details.tally_session_id,
        details.weight_classification_id,
        details.required_bags,
    )?)
}

pub fn export_request(request: &ExportRequest) -> engine::ExportRequest {
    engine::ExportRequest {
        session_ids: request.session_ids.clone(),
        date_from: request.date_from,
        date_to: request.date_to,
        customer_id: request.customer_id,
        plant_id: request.plant_id,
    }
}

pub fn export_response(summary: &ExportSummary) -> ExportResponse {
    ExportResponse {
        customers: summary
            .customers
            .iter()
            .map(|customer| CustomerExportData {
                customer_name: customer.customer_name.clone(),
                items: customer
                    .items
                    .iter()
                    .map(|item| ExportItem {
                        category: item.category.code().to_string(),
                        classification: item.classification.clone(),
                        bags: item.bags,
                    })
                    .collect(),
                subtotal: customer.subtotal,
            })
            .collect(),
        grand_total_dc: summary.grand_total(Category::Dressed),
        grand_total_bp: summary.grand_total(Category::Byproduct),
        grand_total_fr: summary.grand_total(Category::Frozen),
    }
}
