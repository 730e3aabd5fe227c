use api_types::{
    snapshot::SessionSnapshot, tally_log_entry::TallyLogEntryRole,
    tally_session::TallySessionStatus,
};

const DEMO: &str = include_str!("../../../demos/snapshot.json");

#[test]
fn demo_snapshot_parses() {
    let snapshot: SessionSnapshot = serde_json::from_str(DEMO).unwrap();
    assert_eq!(snapshot.customers.len(), 2);
    assert_eq!(snapshot.weight_classifications.len(), 4);
    assert_eq!(snapshot.sessions[1].status, TallySessionStatus::Completed);
    assert_eq!(snapshot.entries.len(), 8);
    assert_eq!(snapshot.entries[1].role, TallyLogEntryRole::Dispatcher);
    assert_eq!(snapshot.entries[5].original_session_id, Some(2));
    assert_eq!(snapshot.allocations[0].allocated_bags_tally, 0.0);
    assert_eq!(
        snapshot.preferences.classification_order,
        Some(vec![2, 1])
    );
    assert_eq!(snapshot.preferences.timezone, None);
    assert_eq!(snapshot.preferences.active_plant_id, Some(1));
}

#[test]
fn snapshot_survives_a_json_round_trip() {
    let snapshot: SessionSnapshot = serde_json::from_str(DEMO).unwrap();
    let encoded = serde_json::to_string(&snapshot).unwrap();
    let decoded: SessionSnapshot = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, snapshot);
}
