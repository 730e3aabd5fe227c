//! Tally reconciliation engine.
//!
//! Pure, synchronous computations over the log entries of tally sessions:
//! filtering, sorting, per-classification aggregation of tally and dispatcher
//! weights, and classification of the difference against an acceptable
//! threshold. Around that core live the catalog rules for weight
//! classifications, allocation progress, transfer planning and the export
//! summary.
//!
//! Nothing in this crate performs I/O or reads ambient state: preferences
//! such as the threshold are passed in explicitly.

pub use aggregate::{Aggregates, Aggregation, OVERALL_LABEL, aggregate};
pub use allocation::{AllocationProgress, AllocationTarget, allocation_progress};
pub use classification::{
    Category, ClassificationLookup, DEFAULT_HEADS, WeightClassification, WeightRange,
};
pub use entry::{LogEntry, Role};
pub use error::EngineError;
pub use export::{CustomerExport, ExportItem, ExportRequest, ExportSummary, export_summary};
pub use filter::{EntryFilter, filter_entries};
pub use session::{Customer, Plant, SessionStatus, TallySession};
pub use sort::{SortKey, SortOrder, compare_entries, sort_entries};
pub use status::{Status, classify_status};
pub use transfer::plan_transfer;
pub use view::{SessionSummary, SessionView, SessionViewBuilder, SummaryRow};
pub use weight::Weight;

mod aggregate;
mod allocation;
mod classification;
mod entry;
mod error;
mod export;
mod filter;
mod session;
mod sort;
mod status;
mod transfer;
mod util;
mod view;
mod weight;

pub type EntryId = i64;
pub type SessionId = i64;
pub type ClassificationId = i64;
pub type PlantId = i64;
pub type CustomerId = i64;

pub type ResultEngine<T> = Result<T, EngineError>;
