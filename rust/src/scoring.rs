//! Per-session preference scoring.
//!
//! Implements the weighted multi-feature scoring model:
//! - weight(f) = (rank(f) / max_rank) * base_multiplier, x critical_multiplier
//! - pass -> +weight(f); fail -> -soft_penalty, or -critical_penalty when the
//!   feature is critical (which also disqualifies the session from the
//!   compliant candidate pool)
//! - Unit Importance always contributes weight(f) + unit_rank * unit_rank_scale
//!
//! Scoring is a pure transform: it returns freshly scored copies and never
//! mutates its input, so one catalogue can back concurrent runs.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::Weekday;
use rustc_hash::FxHashSet;

use crate::config::GeneratorConfig;
use crate::conflict::parse_day;
use crate::features::{Feature, FeatureWeights};
use crate::generator::GenerateError;
use crate::models::{Preferences, Session};

/// Score band thresholds (inclusive lower bounds).
const HIGHLY_DESIRABLE_MIN: f64 = 600.0;
const GOOD_MIN: f64 = 500.0;
const ACCEPTABLE_MIN: f64 = 400.0;
const MARGINAL_MIN: f64 = 300.0;

/// Classification of a session's total score into one of five bands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Desirability {
    HighlyDesirable,
    Good,
    Acceptable,
    Marginal,
    Undesirable,
}

impl Desirability {
    pub fn classify(score: f64) -> Self {
        if score >= HIGHLY_DESIRABLE_MIN {
            Desirability::HighlyDesirable
        } else if score >= GOOD_MIN {
            Desirability::Good
        } else if score >= ACCEPTABLE_MIN {
            Desirability::Acceptable
        } else if score >= MARGINAL_MIN {
            Desirability::Marginal
        } else {
            Desirability::Undesirable
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Desirability::HighlyDesirable => "Highly Desirable",
            Desirability::Good => "Good",
            Desirability::Acceptable => "Acceptable",
            Desirability::Marginal => "Marginal",
            Desirability::Undesirable => "Undesirable",
        }
    }
}

/// Parse and normalize the profile's days-off labels.
pub(crate) fn parse_days_off(
    days_off: &HashSet<String>,
) -> Result<FxHashSet<Weekday>, GenerateError> {
    let mut days = FxHashSet::default();
    for label in days_off {
        let day = parse_day(label).map_err(|_| {
            GenerateError::InvalidProfile(format!("unknown day in days_off: {label}"))
        })?;
        days.insert(day);
    }
    Ok(days)
}

/// Score every session against the preference profile.
///
/// Returns freshly scored copies sorted by score descending; the sort is
/// stable, so equal scores keep their input order. The fallback selection
/// path later relies on this ordering.
pub fn score_sessions(
    sessions: &[Session],
    prefs: &Preferences,
    config: &GeneratorConfig,
) -> Result<Vec<Session>, GenerateError> {
    let weights =
        FeatureWeights::derive(&prefs.preference_order, &prefs.critical_features, config)?;
    let ideal: FxHashSet<&str> = prefs.ideal_instructors.iter().map(String::as_str).collect();
    let days_off = parse_days_off(&prefs.days_off)?;

    let mut scored = Vec::with_capacity(sessions.len());
    for session in sessions {
        scored.push(score_session(
            session, prefs, &weights, &ideal, &days_off, config,
        )?);
    }
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    Ok(scored)
}

/// Pass condition for one scored feature.
fn feature_passes(
    feature: Feature,
    session: &Session,
    day: Weekday,
    prefs: &Preferences,
    ideal: &FxHashSet<&str>,
    days_off: &FxHashSet<Weekday>,
) -> bool {
    match feature {
        Feature::IdealInstructor => ideal.contains(session.instructor.as_str()),
        Feature::DaysOff => !days_off.contains(&day),
        Feature::PreferredStartTime => session.start_time >= prefs.preferred_start_time,
        Feature::PreferredEndTime => session.end_time <= prefs.preferred_end_time,
        // Unit Importance has no pass condition; Busyness is not scored here.
        Feature::UnitImportance | Feature::BusynessLevel => true,
    }
}

fn score_session(
    session: &Session,
    prefs: &Preferences,
    weights: &FeatureWeights,
    ideal: &FxHashSet<&str>,
    days_off: &FxHashSet<Weekday>,
    config: &GeneratorConfig,
) -> Result<Session, GenerateError> {
    let day = parse_day(&session.day)?;
    let unit_rank = prefs.unit_ranks.get(&session.unit_name).copied().unwrap_or(0);

    let mut scored = session.clone();
    scored.score = 0.0;
    scored.feature_contributions = HashMap::with_capacity(Feature::ALL.len());
    let mut satisfied = true;

    for feature in Feature::ALL {
        let contribution = match feature {
            // Applied during selection, once day occupancy is known.
            Feature::BusynessLevel => 0.0,
            Feature::UnitImportance => {
                weights.weight(feature) + f64::from(unit_rank) * config.unit_rank_scale
            }
            _ if feature_passes(feature, session, day, prefs, ideal, days_off) => {
                weights.weight(feature)
            }
            _ if weights.is_critical(feature) => {
                // Sticky for the remainder of the pass.
                satisfied = false;
                -config.critical_penalty
            }
            _ => -config.soft_penalty,
        };

        scored
            .feature_contributions
            .insert(feature.name().to_string(), contribution);
        scored.score += contribution;
    }

    scored.critical_constraints_satisfied = satisfied;
    scored.desirability = Some(Desirability::classify(scored.score).as_str().to_string());
    Ok(scored)
}
