//! Moving log entries to another ongoing session of the same plant.

use std::collections::{BTreeSet, HashMap};

use crate::{
    ClassificationLookup, EngineError, EntryId, LogEntry, ResultEngine, SessionId, TallySession,
};

/// Validates a transfer of `entry_ids` into `target_session_id` and returns
/// the moved entries.
///
/// Nothing is mutated: the caller persists the returned entries. Each moved
/// entry remembers the session it came from in `original_session_id`; an
/// entry that was already transferred keeps its first origin.
pub fn plan_transfer(
    entries: &[LogEntry],
    entry_ids: &[EntryId],
    target_session_id: SessionId,
    sessions: &[TallySession],
    lookup: &ClassificationLookup,
) -> ResultEngine<Vec<LogEntry>> {
    if entry_ids.is_empty() {
        return Err(EngineError::InvalidTransfer(
            "no entry ids provided".to_string(),
        ));
    }

    let by_id: HashMap<EntryId, &LogEntry> = entries.iter().map(|e| (e.id, e)).collect();
    let missing: BTreeSet<EntryId> = entry_ids
        .iter()
        .copied()
        .filter(|id| !by_id.contains_key(id))
        .collect();
    if !missing.is_empty() {
        let missing: Vec<String> = missing.iter().map(ToString::to_string).collect();
        return Err(EngineError::KeyNotFound(format!(
            "entries {}",
            missing.join(", ")
        )));
    }

    let selected: BTreeSet<EntryId> = entry_ids.iter().copied().collect();
    let moving: Vec<&LogEntry> = selected.iter().map(|id| by_id[id]).collect();

    if let Some(entry) = moving
        .iter()
        .find(|entry| entry.tally_session_id == target_session_id)
    {
        return Err(EngineError::InvalidTransfer(format!(
            "entry {} is already in the target session",
            entry.id
        )));
    }

    let sessions_by_id: HashMap<SessionId, &TallySession> =
        sessions.iter().map(|s| (s.id, s)).collect();
    let source_ids: BTreeSet<SessionId> = moving.iter().map(|e| e.tally_session_id).collect();
    let mut source_plants = BTreeSet::new();
    for id in &source_ids {
        let session = sessions_by_id.get(id).ok_or_else(|| {
            EngineError::KeyNotFound(format!("source session {id}"))
        })?;
        source_plants.insert(session.plant_id);
    }
    if source_plants.len() > 1 {
        return Err(EngineError::InvalidTransfer(
            "entries must be from sessions in the same plant".to_string(),
        ));
    }
    let Some(&plant_id) = source_plants.first() else {
        return Err(EngineError::InvalidTransfer(
            "no source session found".to_string(),
        ));
    };

    let target = sessions_by_id
        .get(&target_session_id)
        .ok_or_else(|| EngineError::KeyNotFound(format!("target session {target_session_id}")))?;
    if target.plant_id != plant_id {
        return Err(EngineError::InvalidTransfer(
            "target session must be in the same plant as source entries".to_string(),
        ));
    }
    if !target.is_ongoing() {
        return Err(EngineError::InvalidTransfer(format!(
            "target session must be ongoing, it is {}",
            target.status.as_str()
        )));
    }

    let classification_ids: BTreeSet<_> =
        moving.iter().map(|e| e.weight_classification_id).collect();
    for id in classification_ids {
        let wc = lookup
            .get(id)
            .ok_or_else(|| EngineError::KeyNotFound(format!("weight classification {id}")))?;
        if wc.plant_id != plant_id {
            return Err(EngineError::InvalidTransfer(format!(
                "weight classification {id} does not belong to the same plant"
            )));
        }
    }

    let moved: Vec<LogEntry> = moving
        .into_iter()
        .map(|entry| {
            let mut moved = entry.clone();
            moved.original_session_id = entry.original_session_id.or(Some(entry.tally_session_id));
            moved.tally_session_id = target_session_id;
            moved
        })
        .collect();
    tracing::debug!(
        target_session_id,
        count = moved.len(),
        "planned log entry transfer"
    );
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::*;
    use crate::{Category, Role, SessionStatus, Weight, WeightClassification};

    fn session(id: i64, plant_id: i64, status: SessionStatus) -> TallySession {
        TallySession {
            id,
            customer_id: 1,
            plant_id,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            status,
        }
    }

    fn entry(id: i64, session_id: i64, wc: i64) -> LogEntry {
        LogEntry::new(
            id,
            session_id,
            wc,
            Role::Tally,
            Weight::from_grams(1_000),
            Utc.timestamp_opt(id, 0).unwrap(),
        )
        .unwrap()
    }

    fn fixture() -> (Vec<LogEntry>, Vec<TallySession>, ClassificationLookup) {
        let entries = vec![entry(1, 10, 5), entry(2, 10, 5), entry(3, 30, 9)];
        let sessions = vec![
            session(10, 1, SessionStatus::Completed),
            session(20, 1, SessionStatus::Ongoing),
            session(21, 1, SessionStatus::Cancelled),
            session(30, 2, SessionStatus::Ongoing),
            session(40, 2, SessionStatus::Ongoing),
        ];
        let lookup = [
            WeightClassification::new(5, 1, "Small", Category::Dressed).unwrap(),
            WeightClassification::new(9, 3, "Foreign", Category::Dressed).unwrap(),
        ]
        .into_iter()
        .collect();
        (entries, sessions, lookup)
    }

    #[test]
    fn moves_entries_and_records_origin() {
        let (entries, sessions, lookup) = fixture();
        let moved = plan_transfer(&entries, &[2, 1], 20, &sessions, &lookup).unwrap();
        assert_eq!(moved.len(), 2);
        assert!(moved.iter().all(|e| e.tally_session_id == 20));
        assert!(moved.iter().all(|e| e.original_session_id == Some(10)));
        // Inputs stay untouched.
        assert_eq!(entries[0].tally_session_id, 10);
    }

    #[test]
    fn keeps_first_origin_on_second_transfer() {
        let (mut entries, sessions, lookup) = fixture();
        entries[0].original_session_id = Some(99);
        let moved = plan_transfer(&entries, &[1], 20, &sessions, &lookup).unwrap();
        assert_eq!(moved[0].original_session_id, Some(99));
    }

    #[test]
    fn rejects_empty_and_missing_ids() {
        let (entries, sessions, lookup) = fixture();
        assert!(matches!(
            plan_transfer(&entries, &[], 20, &sessions, &lookup),
            Err(EngineError::InvalidTransfer(_))
        ));
        assert_eq!(
            plan_transfer(&entries, &[1, 8, 7], 20, &sessions, &lookup).unwrap_err(),
            EngineError::KeyNotFound("entries 7, 8".to_string())
        );
    }

    #[test]
    fn rejects_entries_already_in_target() {
        let (entries, sessions, lookup) = fixture();
        assert!(matches!(
            plan_transfer(&entries, &[1], 10, &sessions, &lookup),
            Err(EngineError::InvalidTransfer(_))
        ));
    }

    #[test]
    fn rejects_mixed_plants_and_foreign_target() {
        let (entries, sessions, lookup) = fixture();
        assert!(matches!(
            plan_transfer(&entries, &[1, 3], 20, &sessions, &lookup),
            Err(EngineError::InvalidTransfer(_))
        ));
        assert!(matches!(
            plan_transfer(&entries, &[1], 30, &sessions, &lookup),
            Err(EngineError::InvalidTransfer(_))
        ));
        assert!(matches!(
            plan_transfer(&entries, &[1], 404, &sessions, &lookup),
            Err(EngineError::KeyNotFound(_))
        ));
    }

    #[test]
    fn rejects_target_that_is_not_ongoing() {
        let (entries, sessions, lookup) = fixture();
        let err = plan_transfer(&entries, &[1], 21, &sessions, &lookup).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidTransfer("target session must be ongoing, it is cancelled".to_string())
        );
    }

    #[test]
    fn rejects_classification_of_another_plant() {
        let (entries, sessions, lookup) = fixture();
        let err = plan_transfer(&entries, &[3], 40, &sessions, &lookup).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTransfer(_)));
    }
}
