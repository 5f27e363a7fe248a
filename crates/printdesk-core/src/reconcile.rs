//! Declared-vs-received attachment reconciliation.
//!
//! The order form may carry the list of filenames the client intended to
//! send. Comparing it against what actually arrived detects transport loss.
//! The result is informational only; it surfaces as a warning block in the
//! notification and never blocks the request.

use std::collections::HashSet;

/// Compute `declared − received` as an order-insensitive set difference.
///
/// Both sides are expected to hold normalized filenames. Duplicate
/// declarations are reported once. Never fails; an empty declared list
/// yields an empty result regardless of what was received.
pub fn missing_files(declared: &[String], received: &[String]) -> Vec<String> {
    let received: HashSet<&str> = received.iter().map(String::as_str).collect();

    let mut seen: HashSet<&str> = HashSet::new();
    declared
        .iter()
        .filter(|name| !received.contains(name.as_str()))
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}
