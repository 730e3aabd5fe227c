use std::{
    collections::{BTreeMap, HashMap},
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use api_types::{export::ExportRequest, snapshot::SessionSnapshot};
use engine::{
    AllocationProgress, Category, EntryFilter, Role, SessionView, SortKey, SortOrder,
    WeightClassification, allocation_progress, export_summary, plan_transfer,
};

use crate::{
    cli::{Command, GlobalArgs, ViewArgs},
    convert::{self, Scope, SessionData},
    error::Result,
    render,
    settings::Settings,
};

fn read_snapshot(path: &Path) -> Result<SessionSnapshot> {
    let file = File::open(path)?;
    let snapshot: SessionSnapshot = serde_json::from_reader(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        entries = snapshot.entries.len(),
        sessions = snapshot.sessions.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Output file, or stdout.
fn output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    })
}

/// Loads a snapshot and settles the settings: its user preferences override
/// the configured values, command line flags override both.
fn prepare(
    path: &Path,
    args: &GlobalArgs,
    mut settings: Settings,
) -> Result<(SessionSnapshot, SessionData, Settings)> {
    let snapshot = read_snapshot(path)?;
    settings.apply_preferences(&snapshot.preferences);
    settings.apply_args(args);
    let data = SessionData::from_snapshot(&snapshot)?;
    Ok((snapshot, data, settings))
}

fn entry_filter(args: &ViewArgs) -> Result<EntryFilter> {
    let mut filter = EntryFilter::default();
    if let Some(role) = args.role.as_deref() {
        filter = filter.role(Role::try_from(role)?);
    }
    if let Some(id) = args.class {
        filter = filter.weight_classification_id(id);
    }
    if let Some(category) = args.category.as_deref() {
        filter = filter.category(Category::try_from(category)?);
    }
    Ok(filter)
}

fn session_view(args: &ViewArgs, settings: &Settings) -> Result<SessionView> {
    let key = match args.sort.as_deref() {
        Some(key) => SortKey::try_from(key)?,
        None => settings.sort_key()?,
    };
    let order = match args.order.as_deref() {
        Some(order) => SortOrder::try_from(order)?,
        None => settings.sort_order()?,
    };
    let view = SessionView::builder()
        .filter(entry_filter(args)?)
        .sort(key, order)
        .threshold(settings.threshold_weight()?)
        .classification_order(settings.classification_order.clone())
        .build()?;
    Ok(view)
}

/// Progress rows in the user's classification order, then by label.
fn ordered_progress(
    progress: HashMap<i64, AllocationProgress>,
    classification_order: &[i64],
) -> Vec<AllocationProgress> {
    let mut rows: Vec<AllocationProgress> = progress.into_values().collect();
    let rank = |id: i64| {
        classification_order
            .iter()
            .position(|candidate| *candidate == id)
            .unwrap_or(usize::MAX)
    };
    rows.sort_by(|a, b| {
        rank(a.weight_classification_id)
            .cmp(&rank(b.weight_classification_id))
            .then_with(|| a.classification.cmp(&b.classification))
            .then_with(|| a.weight_classification_id.cmp(&b.weight_classification_id))
    });
    rows
}

/// Each plant's classifications sorted by id, plants in id order.
fn catalog_by_plant(data: &SessionData) -> BTreeMap<i64, Vec<&WeightClassification>> {
    let mut plants: BTreeMap<i64, Vec<&WeightClassification>> =
        data.plants.iter().map(|p| (p.id, Vec::new())).collect();
    for plant_id in data.lookup.iter().map(|wc| wc.plant_id) {
        plants.entry(plant_id).or_default();
    }
    for (plant_id, catalog) in &mut plants {
        catalog.extend(data.lookup.for_plant(*plant_id));
        catalog.sort_by_key(|wc| wc.id);
    }
    plants
}

pub fn run(command: Command, args: &GlobalArgs, settings: Settings) -> Result<()> {
    match command {
        Command::Log { snapshot, view } => {
            let (_, data, settings) = prepare(&snapshot, args, settings)?;
            let scope = Scope::new(view.session, settings.active_plant_id);
            let summary = session_view(&view, &settings)?.run(&data.entries_of(scope), &data.lookup);
            println!(
                "{}",
                render::log_table(&summary.entries, &data.lookup, settings.tz()?)
            );
        }
        Command::Summary { snapshot, view } => {
            let (_, data, settings) = prepare(&snapshot, args, settings)?;
            let view_config = session_view(&view, &settings)?;
            let scope = Scope::new(view.session, settings.active_plant_id);
            let summary = view_config.run(&data.entries_of(scope), &data.lookup);
            println!("{}", render::summary_table(&summary));
            println!("threshold: {}", view_config.threshold());
        }
        Command::Progress { snapshot, session } => {
            let (_, data, settings) = prepare(&snapshot, args, settings)?;
            let scope = Scope::new(session, settings.active_plant_id);
            let progress = allocation_progress(
                &data.entries_of(scope),
                &data.targets_of(scope),
                &data.lookup,
            );
            let rows = ordered_progress(progress, &settings.classification_order);
            println!("{}", render::progress_table(&rows));
        }
        Command::Export {
            snapshot,
            from,
            to,
            customer,
            plant,
            sessions,
            out,
        } => {
            let (_, data, _) = prepare(&snapshot, args, settings)?;
            let request = ExportRequest {
                session_ids: sessions,
                date_from: from,
                date_to: to,
                customer_id: customer,
                plant_id: plant,
            };
            let summary = export_summary(
                &convert::export_request(&request),
                &data.sessions,
                &data.customers,
                &data.entries,
                &data.lookup,
            );
            let response = convert::export_response(&summary);
            render::write_export_csv(&response, output(out.as_deref())?)?;
            tracing::info!(customers = response.customers.len(), "export written");
        }
        Command::Transfer {
            snapshot: path,
            entries,
            to,
            out,
        } => {
            let (mut snapshot, data, _) = prepare(&path, args, settings)?;
            let moved = plan_transfer(&data.entries, &entries, to, &data.sessions, &data.lookup)?;
            let moved: HashMap<i64, _> = moved.into_iter().map(|e| (e.id, e)).collect();
            for entry in &mut snapshot.entries {
                if let Some(planned) = moved.get(&entry.id) {
                    entry.tally_session_id = planned.tally_session_id;
                    entry.original_session_id = planned.original_session_id;
                }
            }
            let mut writer = output(out.as_deref())?;
            serde_json::to_writer_pretty(&mut writer, &snapshot)?;
            writeln!(writer)?;
            writer.flush()?;
            tracing::info!(count = moved.len(), target = to, "entries transferred");
        }
        Command::Check { snapshot } => {
            let (_, data, _) = prepare(&snapshot, args, settings)?;
            let mut problems = 0;
            for (plant_id, catalog) in catalog_by_plant(&data) {
                println!("{}", data.plant_name(plant_id));
                for wc in catalog {
                    if let Err(err) = data.lookup.validate_candidate(wc, Some(wc.id)) {
                        problems += 1;
                        tracing::warn!(id = wc.id, plant_id, "invalid weight classification");
                        println!("  {} ({}): {err}", wc.classification, wc.id);
                    }
                }
            }
            println!("{} classifications, {problems} problems", data.lookup.len());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(id: i64, label: &str) -> (i64, AllocationProgress) {
        (
            id,
            AllocationProgress {
                weight_classification_id: id,
                classification: label.to_string(),
                ..AllocationProgress::default()
            },
        )
    }

    #[test]
    fn progress_follows_classification_order() {
        let rows = ordered_progress(
            [progress(1, "Small"), progress(2, "Large"), progress(3, "Medium")]
                .into_iter()
                .collect(),
            &[3],
        );
        let labels: Vec<&str> = rows.iter().map(|r| r.classification.as_str()).collect();
        assert_eq!(labels, vec!["Medium", "Large", "Small"]);
    }

    #[test]
    fn view_args_fall_back_to_settings() {
        let settings = Settings {
            default_sort: "weight".to_string(),
            default_order: "asc".to_string(),
            threshold: 1.0,
            ..Settings::default()
        };
        let view = session_view(&ViewArgs::default(), &settings).unwrap();
        assert!(view.filter().is_unfiltered());
        assert_eq!(view.threshold(), engine::Weight::from_grams(1_000));
    }

    #[test]
    fn bad_filter_values_are_rejected() {
        let args = ViewArgs {
            role: Some("packer".to_string()),
            ..ViewArgs::default()
        };
        assert!(entry_filter(&args).is_err());
        let args = ViewArgs {
            category: Some("bp".to_string()),
            ..ViewArgs::default()
        };
        assert_eq!(entry_filter(&args).unwrap().category, Some(Category::Byproduct));
    }

    #[test]
    fn catalog_groups_by_plant() {
        let snapshot: SessionSnapshot = serde_json::from_str(
            r#"{
                "plants": [{ "id": 1, "name": "North" }, { "id": 3, "name": "South" }],
                "weight_classifications": [
                    { "id": 5, "plant_id": 2, "classification": "Small", "category": "Dressed" },
                    { "id": 2, "plant_id": 1, "classification": "Large", "category": "Dressed" },
                    { "id": 1, "plant_id": 1, "classification": "Liver", "category": "Byproduct" }
                ]
            }"#,
        )
        .unwrap();
        let data = SessionData::from_snapshot(&snapshot).unwrap();
        let grouped: Vec<(i64, Vec<i64>)> = catalog_by_plant(&data)
            .into_iter()
            .map(|(plant, catalog)| (plant, catalog.iter().map(|wc| wc.id).collect()))
            .collect();
        assert_eq!(grouped, vec![(1, vec![1, 2]), (2, vec![5]), (3, vec![])]);
        assert_eq!(data.plant_name(2), "plant 2");
    }
}
