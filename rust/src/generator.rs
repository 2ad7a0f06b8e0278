//! Run orchestration: upfront validation, the generation pipeline, and the
//! error taxonomy.

use thiserror::Error;

use crate::catalogue::available_combos;
use crate::config::GeneratorConfig;
use crate::conflict::parse_day;
use crate::features::FeatureWeights;
use crate::grouping::{ComboKey, GroupedCatalogue};
use crate::models::{GenerationResult, Preferences, Session};
use crate::report;
use crate::scoring::{parse_days_off, score_sessions};
use crate::selection::select_sessions;

/// Errors that abort a generation run.
///
/// A group resolved by conflict fallback is not an error - it is recorded on
/// the result. No partial timetable is returned on any of these.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("no candidate sessions for {unit_id} {session_type}")]
    EmptyGroup {
        unit_id: String,
        session_type: String,
    },
    #[error("preference profile is missing {feature:?} in {map}")]
    IncompleteProfile {
        feature: &'static str,
        map: &'static str,
    },
    #[error("invalid preference profile: {0}")]
    InvalidProfile(String),
    #[error("unknown day label: {0:?}")]
    UnknownDay(String),
}

/// One-shot timetable generation: score, group, select, report.
///
/// Stateless between runs - construct a new generator per request. The
/// catalogue and profile are owned for the duration of the run and never
/// mutated.
#[derive(Debug)]
pub struct TimetableGenerator {
    sessions: Vec<Session>,
    preferences: Preferences,
    config: GeneratorConfig,
    expected_combos: Option<Vec<ComboKey>>,
}

impl TimetableGenerator {
    /// Create a generator, validating the profile and day labels upfront so
    /// a malformed request fails before any scheduling work.
    pub fn new(
        sessions: Vec<Session>,
        preferences: Preferences,
        config: GeneratorConfig,
    ) -> Result<Self, GenerateError> {
        FeatureWeights::derive(
            &preferences.preference_order,
            &preferences.critical_features,
            &config,
        )?;
        parse_days_off(&preferences.days_off)?;
        for session in &sessions {
            parse_day(&session.day)?;
        }

        Ok(Self {
            sessions,
            preferences,
            config,
            expected_combos: None,
        })
    }

    /// Schedule against an explicit combo list (e.g. replayed from a
    /// persisted catalogue snapshot) instead of the combos observed in the
    /// session list. A combo left without candidates fails the run.
    pub fn with_expected_combos(mut self, combos: Vec<ComboKey>) -> Self {
        self.expected_combos = Some(combos);
        self
    }

    /// Run the generation pipeline.
    pub fn generate(&self) -> Result<GenerationResult, GenerateError> {
        let scored = score_sessions(&self.sessions, &self.preferences, &self.config)?;

        let combos = match &self.expected_combos {
            Some(combos) => combos.clone(),
            None => available_combos(&scored),
        };
        let catalogue =
            GroupedCatalogue::organize(&scored, &combos, &self.preferences.unit_ranks)?;

        let selection = select_sessions(&catalogue, &self.preferences, &self.config)?;

        let total_score = report::total_score(&selection.selected);
        let feature_totals = report::feature_totals(&selection.selected);
        let diagnostics = report::diagnose(total_score, &feature_totals, &self.config);

        Ok(GenerationResult {
            selected: selection.selected,
            total_score,
            feature_totals,
            fallbacks: selection.fallbacks,
            diagnostics,
        })
    }
}
