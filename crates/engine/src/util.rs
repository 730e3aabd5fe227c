//! Internal helpers for text normalization and validation.
//!
//! These utilities are **not** part of the public API. They centralize
//! comparison and validation logic so the engine enforces consistent rules.

use std::cmp::Ordering;

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

/// Comparison key for user-entered names: compatibility decomposed,
/// accents stripped, trimmed and lowercased.
pub(crate) fn normalize_key(input: &str) -> Option<String> {
    let folded = fold(input.trim());
    if folded.is_empty() { None } else { Some(folded) }
}

/// NFKD without combining marks, lowercased.
fn fold(input: &str) -> String {
    input
        .nfkd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lowercased characters, each flagged when it was uppercase, so that
/// lowercase sorts before uppercase.
fn case_key(input: &str) -> Vec<(char, bool)> {
    input
        .chars()
        .flat_map(|ch| {
            let upper = ch.is_uppercase();
            ch.to_lowercase().map(move |lower| (lower, upper))
        })
        .collect()
}

/// Locale-style comparison of display labels.
///
/// Letters compare first with accents and case ignored, then accents break
/// ties, then case (lowercase first), then raw code points so the order is
/// total.
pub(crate) fn collate(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(&fold(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| case_key(a).cmp(&case_key(b)))
        .then_with(|| a.cmp(b))
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidValue(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Validate an optional heads count: finite and non-negative.
pub(crate) fn validate_heads(heads: Option<f64>, label: &str) -> ResultEngine<()> {
    if let Some(value) = heads
        && (!value.is_finite() || value < 0.0)
    {
        return Err(EngineError::InvalidValue(format!(
            "{label} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}
