//! Plain text tables and the CSV export.

use std::io::Write;

use api_types::export::ExportResponse;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use csv::Writer;
use engine::{AllocationProgress, ClassificationLookup, LogEntry, Role, SessionSummary, SummaryRow};
use serde::Serialize;

use crate::error::Result;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(at: DateTime<Utc>, tz: Tz) -> String {
    at.with_timezone(&tz).format(TIME_FORMAT).to_string()
}

fn format_heads(heads: f64) -> String {
    if heads.fract() == 0.0 {
        format!("{heads:.0}")
    } else {
        format!("{heads:.2}")
    }
}

pub fn log_table(entries: &[LogEntry], lookup: &ClassificationLookup, tz: Tz) -> String {
    let mut lines = vec![format!(
        "{:>6}  {:<19}  {:<10}  {:<16}  {:>12}  {:>5}  {}",
        "ID", "TIME", "ROLE", "CLASS", "WEIGHT", "HEADS", "NOTES"
    )];
    for entry in entries {
        let mut notes = entry.notes.clone().unwrap_or_default();
        if let Some(origin) = entry.original_session_id {
            if !notes.is_empty() {
                notes.push(' ');
            }
            notes.push_str(&format!("[moved from session {origin}]"));
        }
        lines.push(format!(
            "{:>6}  {:<19}  {:<10}  {:<16}  {:>12}  {:>5}  {}",
            entry.id,
            format_timestamp(entry.created_at, tz),
            entry.role.as_str(),
            lookup.display_label(entry.weight_classification_id),
            entry.weight.to_string(),
            format_heads(entry.effective_heads(lookup)),
            notes
        ));
    }
    lines.push(format!("{} entries", entries.len()));
    lines.join("\n")
}

fn summary_line(row: &SummaryRow) -> String {
    let aggregation = &row.aggregation;
    format!(
        "{:<16}  {:>12}  {:>12}  {:>12}  {}",
        aggregation.classification,
        aggregation.tally_total.to_string(),
        aggregation.dispatcher_total.to_string(),
        aggregation.difference.to_string(),
        row.status
    )
}

pub fn summary_table(summary: &SessionSummary) -> String {
    let mut lines = vec![format!(
        "{:<16}  {:>12}  {:>12}  {:>12}  {}",
        "CLASS", "TALLY", "DISPATCHER", "DIFFERENCE", "STATUS"
    )];
    lines.extend(summary.rows.iter().map(summary_line));
    lines.push(summary_line(&summary.overall));
    lines.join("\n")
}

pub fn progress_table(rows: &[AllocationProgress]) -> String {
    let mut lines = vec![format!(
        "{:<16}  {:>8}  {:>8}  {:>10}  {:>8}",
        "CLASS", "REQUIRED", "TALLY", "DISPATCHER", "HEADS"
    )];
    for row in rows {
        let mark = |role: Role| if row.is_complete(role) { "*" } else { " " };
        lines.push(format!(
            "{:<16}  {:>8}  {:>7}{}  {:>9}{}  {:>8}",
            row.classification,
            format_heads(row.required_bags),
            row.bags_tally,
            mark(Role::Tally),
            row.bags_dispatcher,
            mark(Role::Dispatcher),
            format_heads(row.heads)
        ));
    }
    lines.join("\n")
}

#[derive(Serialize)]
struct ExportRow<'a> {
    customer: &'a str,
    category: &'a str,
    classification: &'a str,
    bags: u64,
}

/// Writes one row per item, a subtotal row per customer and the grand totals.
pub fn write_export_csv<W: Write>(response: &ExportResponse, out: W) -> Result<()> {
    let mut writer = Writer::from_writer(out);
    for customer in &response.customers {
        for item in &customer.items {
            writer.serialize(ExportRow {
                customer: &customer.customer_name,
                category: &item.category,
                classification: &item.classification,
                bags: item.bags,
            })?;
        }
        writer.serialize(ExportRow {
            customer: &customer.customer_name,
            category: "",
            classification: "Subtotal",
            bags: customer.subtotal,
        })?;
    }
    for (code, bags) in [
        ("DC", response.grand_total_dc),
        ("BP", response.grand_total_bp),
        ("FR", response.grand_total_fr),
    ] {
        writer.serialize(ExportRow {
            customer: "Grand total",
            category: code,
            classification: "",
            bags,
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use api_types::export::{CustomerExportData, ExportItem};
    use chrono::TimeZone;
    use engine::{Category, SessionView, Weight, WeightClassification};

    use super::*;

    #[test]
    fn timestamps_use_the_display_timezone() {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 23, 30, 0).unwrap();
        assert_eq!(format_timestamp(at, chrono_tz::UTC), "2025-05-01 23:30:00");
        assert_eq!(
            format_timestamp(at, chrono_tz::Asia::Manila),
            "2025-05-02 07:30:00"
        );
    }

    #[test]
    fn log_table_marks_transferred_entries() {
        let lookup: ClassificationLookup =
            [WeightClassification::new(5, 1, "Small", Category::Dressed).unwrap()]
                .into_iter()
                .collect();
        let entries = vec![
            LogEntry::new(1, 1, 5, Role::Tally, Weight::from_grams(10_500), Utc.timestamp_opt(0, 0).unwrap())
                .unwrap()
                .transferred_from(Some(4)),
        ];
        let table = log_table(&entries, &lookup, chrono_tz::UTC);
        assert!(table.contains("10.500 kg"));
        assert!(table.contains("[moved from session 4]"));
        assert!(table.ends_with("1 entries"));
    }

    #[test]
    fn summary_table_ends_with_total() {
        let summary = SessionView::builder()
            .build()
            .unwrap()
            .run(&[], &ClassificationLookup::new());
        let table = summary_table(&summary);
        let last = table.lines().last().unwrap();
        assert!(last.starts_with("Total"));
        assert!(last.ends_with("not started"));
    }

    #[test]
    fn csv_export_has_subtotals_and_grand_totals() {
        let response = ExportResponse {
            customers: vec![CustomerExportData {
                customer_name: "Alpha Foods".to_string(),
                items: vec![ExportItem {
                    category: "DC".to_string(),
                    classification: "Small".to_string(),
                    bags: 3,
                }],
                subtotal: 3,
            }],
            grand_total_dc: 3,
            grand_total_bp: 0,
            grand_total_fr: 0,
        };
        let mut out = Vec::new();
        write_export_csv(&response, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "customer,category,classification,bags\n\
             Alpha Foods,DC,Small,3\n\
             Alpha Foods,,Subtotal,3\n\
             Grand total,DC,,3\n\
             Grand total,BP,,0\n\
             Grand total,FR,,0\n"
        );
    }
}
