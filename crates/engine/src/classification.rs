//! Weight classifications and the lookup every stage resolves entries against.
//!
//! A classification is a named bucket of a plant ("Small", "Large", "Liver")
//! with an optional weight range. Ranges may be open on either side; a range
//! with no bounds at all is a catch-all.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    ClassificationId, EngineError, PlantId, ResultEngine, Weight,
    util::{normalize_key, normalize_optional_text, normalize_required_name, validate_heads},
};

/// Heads assumed for an entry when neither the entry nor its classification
/// carries a value.
pub const DEFAULT_HEADS: f64 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Dressed,
    Byproduct,
    Frozen,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dressed => "Dressed",
            Self::Byproduct => "Byproduct",
            Self::Frozen => "Frozen",
        }
    }

    /// Short code used in export reports.
    pub fn code(self) -> &'static str {
        match self {
            Self::Dressed => "DC",
            Self::Byproduct => "BP",
            Self::Frozen => "FR",
        }
    }

    /// Byproducts are matched by name, every other category by weight range.
    pub fn uses_weight_ranges(self) -> bool {
        !matches!(self, Self::Byproduct)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        [Self::Dressed, Self::Byproduct, Self::Frozen]
            .into_iter()
            .find(|category| {
                category.as_str().eq_ignore_ascii_case(value)
                    || category.code().eq_ignore_ascii_case(value)
            })
            .ok_or_else(|| EngineError::InvalidValue(format!("invalid category: {value}")))
    }
}

/// Inclusive weight range. A missing bound is unbounded on that side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRange {
    pub min: Option<Weight>,
    pub max: Option<Weight>,
}

impl WeightRange {
    pub fn new(min: Option<Weight>, max: Option<Weight>) -> ResultEngine<Self> {
        if let (Some(min), Some(max)) = (min, max)
            && max < min
        {
            return Err(EngineError::InvalidRange(format!(
                "max_weight ({max}) must be greater than or equal to min_weight ({min})"
            )));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub const fn catch_all() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    #[must_use]
    pub fn is_catch_all(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    #[must_use]
    pub fn contains(&self, weight: Weight) -> bool {
        self.min.is_none_or(|min| weight >= min) && self.max.is_none_or(|max| weight <= max)
    }

    /// Two ranges overlap when they share at least one weight. A catch-all
    /// overlaps everything.
    #[must_use]
    pub fn overlaps(&self, other: &WeightRange) -> bool {
        if self.is_catch_all() || other.is_catch_all() {
            return true;
        }
        let min1 = self.min.map_or(i64::MIN, Weight::grams);
        let max1 = self.max.map_or(i64::MAX, Weight::grams);
        let min2 = other.min.map_or(i64::MIN, Weight::grams);
        let max2 = other.max.map_or(i64::MAX, Weight::grams);
        min1 <= max2 && min2 <= max1
    }
}

impl fmt::Display for WeightRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (None, None) => f.write_str("All Sizes"),
            (Some(min), None) => write!(f, "{} and up", min.kg_string()),
            (None, Some(max)) => write!(f, "Up to {}", max.kg_string()),
            (Some(min), Some(max)) => write!(f, "{}-{}", min.kg_string(), max.kg_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightClassification {
    pub id: ClassificationId,
    pub plant_id: PlantId,
    pub classification: String,
    pub category: Category,
    pub range: WeightRange,
    pub description: Option<String>,
    pub default_heads: f64,
}

impl WeightClassification {
    /// Creates a catch-all classification with the default heads.
    pub fn new(
        id: ClassificationId,
        plant_id: PlantId,
        classification: &str,
        category: Category,
    ) -> ResultEngine<Self> {
        Ok(Self {
            id,
            plant_id,
            classification: normalize_required_name(classification, "classification")?,
            category,
            range: WeightRange::catch_all(),
            description: None,
            default_heads: DEFAULT_HEADS,
        })
    }

    #[must_use]
    pub fn with_range(mut self, range: WeightRange) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: Option<&str>) -> Self {
        self.description = normalize_optional_text(description);
        self
    }

    pub fn with_default_heads(mut self, heads: f64) -> ResultEngine<Self> {
        validate_heads(Some(heads), "default_heads")?;
        self.default_heads = heads;
        Ok(self)
    }
}

/// Classifications indexed by id.
///
/// Every stage takes the lookup by reference; unresolved ids are never an
/// error, they just fall back (empty label for sorting, `"WC <id>"` for
/// summaries, no match for category filters).
#[derive(Clone, Debug, Default)]
pub struct ClassificationLookup {
    by_id: HashMap<ClassificationId, WeightClassification>,
}

impl ClassificationLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ClassificationId) -> Option<&WeightClassification> {
        self.by_id.get(&id)
    }

    pub fn label(&self, id: ClassificationId) -> Option<&str> {
        self.get(id).map(|wc| wc.classification.as_str())
    }

    pub fn category(&self, id: ClassificationId) -> Option<Category> {
        self.get(id).map(|wc| wc.category)
    }

    /// Label for summaries; never fails.
    pub fn display_label(&self, id: ClassificationId) -> String {
        self.label(id)
            .map_or_else(|| format!("WC {id}"), ToString::to_string)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightClassification> {
        self.by_id.values()
    }

    pub fn for_plant(&self, plant_id: PlantId) -> impl Iterator<Item = &WeightClassification> {
        self.iter().filter(move |wc| wc.plant_id == plant_id)
    }

    /// Finds the classification of `plant_id`/`category` whose range holds
    /// `weight`. Bounded ranges win over a catch-all; remaining ties resolve
    /// to the lowest id.
    pub fn resolve_weight(
        &self,
        plant_id: PlantId,
        category: Category,
        weight: Weight,
    ) -> Option<&WeightClassification> {
        self.for_plant(plant_id)
            .filter(|wc| wc.category == category && wc.range.contains(weight))
            .min_by_key(|wc| (wc.range.is_catch_all(), wc.id))
    }

    /// Checks that `candidate` can join the catalog of its plant.
    ///
    /// `exclude_id` skips the classification being edited.
    pub fn validate_candidate(
        &self,
        candidate: &WeightClassification,
        exclude_id: Option<ClassificationId>,
    ) -> ResultEngine<()> {
        WeightRange::new(candidate.range.min, candidate.range.max)?;
        validate_heads(Some(candidate.default_heads), "default_heads")?;

        let others = self
            .for_plant(candidate.plant_id)
            .filter(|wc| Some(wc.id) != exclude_id && wc.category == candidate.category);

        if candidate.category.uses_weight_ranges() {
            for existing in others {
                if existing.range.overlaps(&candidate.range) {
                    return Err(EngineError::InvalidRange(format!(
                        "weight range overlaps with existing classification \"{}\" ({}) for the same plant and category",
                        existing.classification, existing.range
                    )));
                }
            }
            return Ok(());
        }

        let name_key = normalize_key(&candidate.classification);
        let description_key = candidate.description.as_deref().and_then(normalize_key);
        for existing in others {
            if name_key.is_some() && normalize_key(&existing.classification) == name_key {
                return Err(EngineError::ExistingKey(format!(
                    "byproduct classification {}",
                    existing.classification
                )));
            }
            if let Some(key) = &description_key
                && existing.description.as_deref().and_then(normalize_key).as_ref() == Some(key)
            {
                return Err(EngineError::ExistingKey(format!(
                    "byproduct description {}",
                    existing.description.as_deref().unwrap_or_default()
                )));
            }
        }
        Ok(())
    }
}

impl FromIterator<WeightClassification> for ClassificationLookup {
    fn from_iter<T: IntoIterator<Item = WeightClassification>>(iter: T) -> Self {
        Self {
            by_id: iter.into_iter().map(|wc| (wc.id, wc)).collect(),
        }
    }
}
