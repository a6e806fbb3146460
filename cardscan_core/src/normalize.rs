//! Whitespace normalization for extracted records.

use crate::card::{BusinessCard, Field};

/// Trim a value and collapse internal whitespace runs to one space.
///
/// Returns `None` when nothing but whitespace remains.
#[must_use]
pub fn normalize_text(value: &str) -> Option<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

/// Normalize every present field of a card. Absent fields stay absent.
#[must_use]
pub fn normalize(card: &BusinessCard) -> BusinessCard {
    let mut cleaned = BusinessCard::default();
    for (field, value) in card.present_fields() {
        cleaned.set(field, normalize_text(value));
    }
    cleaned
}

/// Fields whose normalized value differs from the input, for logging.
#[must_use]
pub fn changed_fields(before: &BusinessCard, after: &BusinessCard) -> Vec<Field> {
    Field::ALL
        .into_iter()
        .filter(|field| before.get(*field) != after.get(*field))
        .collect()
}
