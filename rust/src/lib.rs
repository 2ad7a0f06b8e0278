//! Rust implementation of the timetable generation core.
//!
//! Given a catalogue of candidate class sessions and a preference profile,
//! this module scores every candidate against the profile, partitions the
//! catalogue by (unit, session-type), and greedily selects exactly one
//! session per group - preferring critical-compliant, conflict-free
//! candidates and recording a fallback whenever a group can only be resolved
//! by accepting a time overlap.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use pyo3::prelude::*;

pub mod catalogue;
mod config;
pub mod conflict;
pub mod features;
mod generator;
pub mod grouping;
pub mod logging;
mod models;
pub mod report;
pub mod scoring;
pub mod selection;

pub use config::GeneratorConfig;
pub use generator::{GenerateError, TimetableGenerator};
pub use models::{
    ConflictFallback, FeatureDiagnostic, GenerationResult, Preferences, Session, TimetableRow,
};

/// Generate a timetable from a session catalogue and a preference profile.
///
/// Scores every session, then selects one per (unit, session-type) group in
/// unit-rank order, avoiding time conflicts whenever a conflict-free
/// candidate exists.
///
/// # Arguments
/// * `sessions` - Candidate sessions (the caller keeps its own copy; this
///   run works on fresh scored copies)
/// * `preferences` - The preference profile; must rank all six features
/// * `config` - Optional tunables; defaults to the production scoring model
///
/// # Returns
/// * GenerationResult with the selection, score totals, conflict fallbacks,
///   and underperformance diagnostics
///
/// # Raises
/// * ValueError on an incomplete profile, an unknown day label, or a group
///   with no candidate sessions
#[pyfunction]
#[pyo3(signature = (sessions, preferences, config=None))]
fn generate_timetable(
    sessions: Vec<Session>,
    preferences: Preferences,
    config: Option<GeneratorConfig>,
) -> PyResult<GenerationResult> {
    let config = config.unwrap_or_default();
    let generator = match TimetableGenerator::new(sessions, preferences, config) {
        Ok(generator) => generator,
        Err(e) => return Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    };
    match generator.generate() {
        Ok(result) => Ok(result),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// Catalogue option lists for the upstream preference form.
///
/// # Returns
/// * Tuple of (instructor triples sorted by unit/type/name, unit pairs)
#[pyfunction]
fn catalogue_options(
    sessions: Vec<Session>,
) -> (Vec<(String, String, String)>, Vec<(String, String)>) {
    (
        catalogue::available_instructors(&sessions),
        catalogue::units(&sessions),
    )
}

/// Expand a partial instructor selection so every (unit, session-type)
/// combo keeps at least one representative instructor.
///
/// # Arguments
/// * `chosen` - (instructor, unit_id, session_type) triples the user picked
/// * `sessions` - The session catalogue defining the observed combos
///
/// # Returns
/// * Deduplicated instructor names, chosen names first
#[pyfunction]
fn expand_ideal_instructors(
    chosen: Vec<(String, String, String)>,
    sessions: Vec<Session>,
) -> Vec<String> {
    catalogue::expand_ideal_instructors(&chosen, &sessions)
}

/// Drop catalogue rows with an inverted time range or an unparseable day.
#[pyfunction]
fn sanitize_catalogue(sessions: Vec<Session>) -> Vec<Session> {
    catalogue::sanitize_catalogue(sessions)
}

/// Order a selection by weekday and start time as display rows.
///
/// # Raises
/// * ValueError if a session carries an unknown day label
#[pyfunction]
fn timetable_rows(selected: Vec<Session>) -> PyResult<Vec<TimetableRow>> {
    match report::timetable_rows(&selected) {
        Ok(rows) => Ok(rows),
        Err(e) => Err(pyo3::exceptions::PyValueError::new_err(e.to_string())),
    }
}

/// The timetable.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Core data types
    m.add_class::<Session>()?;
    m.add_class::<Preferences>()?;
    m.add_class::<GeneratorConfig>()?;
    m.add_class::<GenerationResult>()?;
    m.add_class::<ConflictFallback>()?;
    m.add_class::<FeatureDiagnostic>()?;
    m.add_class::<TimetableRow>()?;

    // Pipeline and catalogue helpers
    m.add_function(wrap_pyfunction!(generate_timetable, m)?)?;
    m.add_function(wrap_pyfunction!(catalogue_options, m)?)?;
    m.add_function(wrap_pyfunction!(expand_ideal_instructors, m)?)?;
    m.add_function(wrap_pyfunction!(sanitize_catalogue, m)?)?;
    m.add_function(wrap_pyfunction!(timetable_rows, m)?)?;

    Ok(())
}
