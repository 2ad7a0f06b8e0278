//! Catalogue helpers: combo/instructor/unit enumeration, ingestion-side row
//! sanitization, and ideal-instructor expansion.

use rustc_hash::FxHashSet;

use crate::conflict::parse_day;
use crate::models::Session;

/// Unique (unit_id, session_type) combos observed in the catalogue, sorted.
pub fn available_combos(sessions: &[Session]) -> Vec<(String, String)> {
    let mut combos: Vec<(String, String)> = sessions
        .iter()
        .map(|s| (s.unit_id.clone(), s.session_type.clone()))
        .collect();
    combos.sort();
    combos.dedup();
    combos
}

/// Unique (instructor, unit_id, session_type) triples, sorted by unit,
/// session type, then instructor name.
pub fn available_instructors(sessions: &[Session]) -> Vec<(String, String, String)> {
    let mut triples: Vec<(String, String, String)> = sessions
        .iter()
        .map(|s| {
            (
                s.instructor.clone(),
                s.unit_id.clone(),
                s.session_type.clone(),
            )
        })
        .collect();
    triples.sort_by(|a, b| (&a.1, &a.2, &a.0).cmp(&(&b.1, &b.2, &b.0)));
    triples.dedup();
    triples
}

/// Unique (unit_id, unit_name) pairs, sorted.
pub fn units(sessions: &[Session]) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = sessions
        .iter()
        .map(|s| (s.unit_id.clone(), s.unit_name.clone()))
        .collect();
    pairs.sort();
    pairs.dedup();
    pairs
}

/// Expand a partial instructor selection so that every observed combo has at
/// least one representative.
///
/// For each combo no chosen triple covers, all of that combo's instructors
/// are added. The result is flattened to instructor names, deduplicated
/// while preserving order (chosen names first).
pub fn expand_ideal_instructors(
    chosen: &[(String, String, String)],
    sessions: &[Session],
) -> Vec<String> {
    let covered: FxHashSet<(&str, &str)> = chosen
        .iter()
        .map(|(_, unit, session_type)| (unit.as_str(), session_type.as_str()))
        .collect();

    let all = available_instructors(sessions);
    let mut expanded: Vec<&str> = chosen.iter().map(|(name, _, _)| name.as_str()).collect();
    for (unit, session_type) in available_combos(sessions) {
        if covered.contains(&(unit.as_str(), session_type.as_str())) {
            continue;
        }
        for (name, cand_unit, cand_type) in &all {
            if *cand_unit == unit && *cand_type == session_type {
                expanded.push(name);
            }
        }
    }

    // Remove duplicate names while preserving order
    let mut seen = FxHashSet::default();
    expanded.retain(|name| seen.insert(*name));
    expanded.into_iter().map(str::to_string).collect()
}

/// Ingestion-side filter: drop rows whose time range is inverted (or empty)
/// or whose day label does not parse as a weekday.
///
/// The generator errors on bad days instead of dropping, so callers feeding
/// it raw uploads should sanitize first.
pub fn sanitize_catalogue(sessions: Vec<Session>) -> Vec<Session> {
    sessions
        .into_iter()
        .filter(|s| s.end_time > s.start_time && parse_day(&s.day).is_ok())
        .collect()
}
