//! Core data types for the timetable generator.

use chrono::{Duration, NaiveTime};
use pyo3::prelude::*;
use std::collections::{HashMap, HashSet};

// Note: We use std HashMap/HashSet here for PyO3 interface compatibility

/// A candidate class session: one concrete occurrence of a unit's
/// session-type offering on a fixed day/time, taught by one instructor.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Session {
    #[pyo3(get, set)]
    pub unit_id: String,
    #[pyo3(get, set)]
    pub unit_name: String,
    #[pyo3(get, set)]
    pub session_type: String,
    /// Weekday label; compared case-insensitively throughout.
    #[pyo3(get, set)]
    pub day: String,
    #[pyo3(get, set)]
    pub start_time: NaiveTime,
    #[pyo3(get, set)]
    pub end_time: NaiveTime,
    #[pyo3(get, set)]
    pub duration: Duration,
    #[pyo3(get, set)]
    pub instructor: String,
    /// Weighted preference score; fully recomputed on every scoring pass.
    #[pyo3(get, set)]
    pub score: f64,
    /// Signed per-feature contribution, rebuilt alongside `score`.
    #[pyo3(get, set)]
    pub feature_contributions: HashMap<String, f64>,
    /// False once any critical feature has failed for this session.
    #[pyo3(get, set)]
    pub critical_constraints_satisfied: bool,
    /// Score band label, set by the scoring pass.
    #[pyo3(get, set)]
    pub desirability: Option<String>,
}

#[pymethods]
impl Session {
    #[new]
    #[pyo3(signature = (
        unit_id,
        unit_name,
        session_type,
        day,
        start_time,
        end_time,
        duration,
        instructor
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        unit_id: String,
        unit_name: String,
        session_type: String,
        day: String,
        start_time: NaiveTime,
        end_time: NaiveTime,
        duration: Duration,
        instructor: String,
    ) -> Self {
        Self {
            unit_id,
            unit_name,
            session_type,
            day,
            start_time,
            end_time,
            duration,
            instructor,
            score: 0.0,
            feature_contributions: HashMap::new(),
            critical_constraints_satisfied: true,
            desirability: None,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Session({} {}: [{} {} - {}], {})",
            self.unit_id, self.session_type, self.day, self.start_time, self.end_time,
            self.instructor
        )
    }
}

/// The preference profile for one generation run. Read-only to the core.
#[pyclass]
#[derive(Clone, Debug)]
pub struct Preferences {
    /// Instructor names the user favors. Upstream guarantees every
    /// (unit, session-type) group has at least one representative here.
    #[pyo3(get, set)]
    pub ideal_instructors: HashSet<String>,
    /// Unit name -> rank; higher ranks are scheduled first.
    #[pyo3(get, set)]
    pub unit_ranks: HashMap<String, i32>,
    /// Weekday labels to keep free.
    #[pyo3(get, set)]
    pub days_off: HashSet<String>,
    #[pyo3(get, set)]
    pub preferred_start_time: NaiveTime,
    #[pyo3(get, set)]
    pub preferred_end_time: NaiveTime,
    /// True clusters sessions onto busy days; false spreads them out.
    #[pyo3(get, set)]
    pub cluster_or_spread: bool,
    /// Feature name -> whether violating it disqualifies a session.
    #[pyo3(get, set)]
    pub critical_features: HashMap<String, bool>,
    /// Feature name -> rank 1..K (ties allowed); drives relative weight.
    #[pyo3(get, set)]
    pub preference_order: HashMap<String, i32>,
}

#[pymethods]
impl Preferences {
    #[new]
    #[pyo3(signature = (
        ideal_instructors,
        unit_ranks,
        days_off,
        preferred_start_time,
        preferred_end_time,
        cluster_or_spread,
        critical_features,
        preference_order
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        ideal_instructors: HashSet<String>,
        unit_ranks: HashMap<String, i32>,
        days_off: HashSet<String>,
        preferred_start_time: NaiveTime,
        preferred_end_time: NaiveTime,
        cluster_or_spread: bool,
        critical_features: HashMap<String, bool>,
        preference_order: HashMap<String, i32>,
    ) -> Self {
        Self {
            ideal_instructors,
            unit_ranks,
            days_off,
            preferred_start_time,
            preferred_end_time,
            cluster_or_spread,
            critical_features,
            preference_order,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Preferences(ideal_instructors={}, unit_ranks={}, days_off={:?}, cluster_or_spread={})",
            self.ideal_instructors.len(),
            self.unit_ranks.len(),
            self.days_off,
            self.cluster_or_spread
        )
    }
}

/// A group that could only be resolved by accepting a time conflict.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictFallback {
    #[pyo3(get)]
    pub unit_id: String,
    #[pyo3(get)]
    pub session_type: String,
}

#[pymethods]
impl ConflictFallback {
    fn __repr__(&self) -> String {
        format!(
            "ConflictFallback(unit_id={:?}, session_type={:?})",
            self.unit_id, self.session_type
        )
    }
}

/// An underperforming feature surfaced by the report, with a remediation hint.
#[pyclass]
#[derive(Clone, Debug)]
pub struct FeatureDiagnostic {
    #[pyo3(get)]
    pub feature: String,
    #[pyo3(get)]
    pub contribution: f64,
    #[pyo3(get)]
    pub hint: String,
}

#[pymethods]
impl FeatureDiagnostic {
    fn __repr__(&self) -> String {
        format!(
            "FeatureDiagnostic(feature={:?}, contribution={:.1})",
            self.feature, self.contribution
        )
    }
}

/// One display row of the final timetable, ordered by day then start time.
#[pyclass]
#[derive(Clone, Debug)]
pub struct TimetableRow {
    #[pyo3(get)]
    pub day: String,
    #[pyo3(get)]
    pub start: String,
    #[pyo3(get)]
    pub end: String,
    #[pyo3(get)]
    pub unit_id: String,
    #[pyo3(get)]
    pub session_type: String,
    #[pyo3(get)]
    pub instructor: String,
    #[pyo3(get)]
    pub duration: String,
}

#[pymethods]
impl TimetableRow {
    fn __repr__(&self) -> String {
        format!(
            "TimetableRow({} {} - {} {} {})",
            self.day, self.start, self.end, self.unit_id, self.session_type
        )
    }
}

/// Result of one generation run.
#[pyclass]
#[derive(Clone, Debug)]
pub struct GenerationResult {
    /// Exactly one session per (unit, session-type) group, in selection order.
    #[pyo3(get)]
    pub selected: Vec<Session>,
    #[pyo3(get)]
    pub total_score: f64,
    /// Feature name -> summed contribution across the selection.
    #[pyo3(get)]
    pub feature_totals: HashMap<String, f64>,
    /// Groups resolved by the conflict fallback (recorded, not fatal).
    #[pyo3(get)]
    pub fallbacks: Vec<ConflictFallback>,
    /// Underperforming features when the total falls below the review threshold.
    #[pyo3(get)]
    pub diagnostics: Vec<FeatureDiagnostic>,
}

#[pymethods]
impl GenerationResult {
    fn __repr__(&self) -> String {
        format!(
            "GenerationResult(selected={}, total_score={:.1}, fallbacks={})",
            self.selected.len(),
            self.total_score,
            self.fallbacks.len()
        )
    }
}
