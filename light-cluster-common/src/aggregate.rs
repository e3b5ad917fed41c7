//! Combine the attributes of several entities into one value
use itertools::Itertools;

use crate::entities::EntityState;

/// The value returned by [`min_attribute`] when no entity has the attribute.
pub const UNDEFINED: f64 = -1.0;

/// The smallest value of a numeric attribute across all entities.
///
/// Entities without the attribute are skipped. If no entity has it the
/// result is [`UNDEFINED`].
#[must_use]
#[allow(clippy::float_cmp)]
pub fn min_attribute(entities: &[&EntityState], attr: &str) -> f64 {
    entities
        .iter()
        .filter_map(|e| e.number(attr))
        .fold(UNDEFINED, |min, value| {
            if min == UNDEFINED || value < min {
                value
            } else {
                min
            }
        })
}

/// Like [`min_attribute`], but [`UNDEFINED`] is mapped to `None`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn min_attribute_opt(entities: &[&EntityState], attr: &str) -> Option<f64> {
    let value = min_attribute(entities, attr);
    if value == UNDEFINED {
        None
    } else {
        Some(value)
    }
}

/// The union of a list attribute across all entities, without duplicates.
#[must_use]
pub fn attribute_union(entities: &[&EntityState], attr: &str) -> Vec<String> {
    entities
        .iter()
        .filter_map(|e| e.list(attr))
        .flatten()
        .unique()
        .cloned()
        .collect()
}

/// The position of `value` within the range `[min, max)` as a whole percentage.
///
/// A degenerate range gives `0`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn percent(value: f64, min: f64, max: f64) -> i32 {
    let percent = ((value - min) * 100.0 / (max - min)).trunc();
    if percent.is_finite() {
        percent as i32
    } else {
        0
    }
}
