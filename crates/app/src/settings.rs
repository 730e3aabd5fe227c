//! Application settings.
//!
//! Layers, lowest first: built-in defaults, the optional TOML file,
//! `TALLY_*` environment variables, the user preferences stored in a
//! snapshot, and finally command line flags.

use api_types::preferences::UserPreferences;
use chrono_tz::Tz;
use engine::{SortKey, SortOrder, Weight};
use serde::Deserialize;

use crate::{
    cli::GlobalArgs,
    error::{AppError, Result},
};

pub const DEFAULT_CONFIG_PATH: &str = "config/tally.toml";
const ENV_PREFIX: &str = "TALLY";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Acceptable difference threshold, in kilograms.
    pub threshold: f64,
    pub timezone: String,
    pub log_level: String,
    /// Classification ids shown first in summaries.
    pub classification_order: Vec<i64>,
    pub default_sort: String,
    pub default_order: String,
    /// Plant whose sessions are shown when no session is named. Only the
    /// snapshot preferences set it.
    #[serde(skip)]
    pub active_plant_id: Option<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            timezone: "UTC".to_string(),
            log_level: "info".to_string(),
            classification_order: Vec::new(),
            default_sort: SortKey::default().as_str().to_string(),
            default_order: SortOrder::default().as_str().to_string(),
            active_plant_id: None,
        }
    }
}

impl Settings {
    /// Reads the config file named by `args` (or the default path) and the
    /// environment. Command line flags are applied later by
    /// [`Settings::apply_args`].
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        Self::from_sources(
            config::File::with_name(path).required(args.config.is_some()),
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("classification_order"),
        )
    }

    fn from_sources<F, E>(file: F, env: E) -> Result<Self>
    where
        F: config::Source + Send + Sync + 'static,
        E: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn apply_preferences(&mut self, preferences: &UserPreferences) {
        if let Some(timezone) = &preferences.timezone {
            self.timezone.clone_from(timezone);
        }
        if let Some(threshold) = preferences.acceptable_difference_threshold {
            self.threshold = threshold;
        }
        if let Some(order) = &preferences.classification_order {
            self.classification_order.clone_from(order);
        }
        if preferences.active_plant_id.is_some() {
            self.active_plant_id = preferences.active_plant_id;
        }
    }

    pub fn apply_args(&mut self, args: &GlobalArgs) {
        if let Some(threshold) = args.threshold {
            self.threshold = threshold;
        }
        if let Some(timezone) = &args.timezone {
            self.timezone.clone_from(timezone);
        }
        if let Some(level) = &args.log_level {
            self.log_level.clone_from(level);
        }
    }

    pub fn threshold_weight(&self) -> Result<Weight> {
        let threshold = Weight::from_kg(self.threshold)?;
        if threshold.is_negative() {
            return Err(engine::EngineError::InvalidThreshold(format!(
                "threshold must not be negative, got {}",
                self.threshold
            ))
            .into());
        }
        Ok(threshold)
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|err| AppError::Timezone(format!("{}: {err}", self.timezone)))
    }

    pub fn sort_key(&self) -> Result<SortKey> {
        Ok(SortKey::try_from(self.default_sort.as_str())?)
    }

    pub fn sort_order(&self) -> Result<SortOrder> {
        Ok(SortOrder::try_from(self.default_order.as_str())?)
    }

    /// `tracing_subscriber` filter directives for the configured level.
    pub fn log_filter(&self) -> String {
        format!("tally={level},engine={level}", level = self.log_level)
    }
}
