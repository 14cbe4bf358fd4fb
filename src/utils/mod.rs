// Shared scoring helpers.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Exponential age decay: `exp(-age / horizon)`.
pub fn exponential_decay(age_hours: f64, horizon_hours: f64) -> f64 {
    (-age_hours / horizon_hours).exp()
}

/// Age in hours, clamped at zero so future-dated records neither inflate
/// decay factors nor produce negative velocities.
pub fn age_hours(now: DateTime<Utc>, created_at: DateTime<Utc>) -> f64 {
    (now - created_at).num_seconds().max(0) as f64 / 3600.0
}

/// Lexical similarity between two names.
///
/// Case-insensitive; a substring match short-circuits to 0.8, otherwise
/// word-level Jaccard overlap. Empty input yields 0.0.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a = a.to_lowercase();
    let b = b.to_lowercase();

    if a.contains(&b) || b.contains(&a) {
        return 0.8;
    }

    let words_a: HashSet<&str> = a.split_whitespace().collect();
    let words_b: HashSet<&str> = b.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}
