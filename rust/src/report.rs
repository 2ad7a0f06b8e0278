//! Selection report: score totals, per-feature breakdown, underperformance
//! diagnostics, and display rows for the final timetable.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{Duration, NaiveTime, Weekday};

use crate::config::GeneratorConfig;
use crate::conflict::parse_day;
use crate::features::Feature;
use crate::generator::GenerateError;
use crate::models::{FeatureDiagnostic, Session, TimetableRow};

/// Sum of raw scores across the selection.
pub fn total_score(selected: &[Session]) -> f64 {
    selected.iter().map(|s| s.score).sum()
}

/// Per-feature contribution sums across the selection.
pub fn feature_totals(selected: &[Session]) -> HashMap<String, f64> {
    let mut totals = HashMap::with_capacity(Feature::ALL.len());
    for feature in Feature::ALL {
        let sum = selected
            .iter()
            .map(|s| {
                s.feature_contributions
                    .get(feature.name())
                    .copied()
                    .unwrap_or(0.0)
            })
            .sum();
        totals.insert(feature.name().to_string(), sum);
    }
    totals
}

/// Fixed remediation hint per feature.
fn hint_for(feature: Feature) -> &'static str {
    match feature {
        Feature::IdealInstructor => "Expand the preferred instructor selection",
        Feature::UnitImportance => "Re-evaluate the unit priority rankings",
        Feature::DaysOff => "Reduce the number of requested days off",
        Feature::PreferredStartTime | Feature::PreferredEndTime => {
            "Widen the preferred time window"
        }
        Feature::BusynessLevel => "Try the opposite clustering/spreading preference",
    }
}

/// Flag underperforming features when the total falls below the review
/// threshold.
///
/// A feature underperforms when its summed contribution is below
/// `underperformance_ratio` of the mean per-feature contribution
/// (total / 6). Worst offenders first. Purely informational - selection
/// never consults this.
pub fn diagnose(
    total: f64,
    totals: &HashMap<String, f64>,
    config: &GeneratorConfig,
) -> Vec<FeatureDiagnostic> {
    if total >= config.review_threshold {
        return Vec::new();
    }

    let mean = total / Feature::ALL.len() as f64;
    let mut diagnostics: Vec<FeatureDiagnostic> = Feature::ALL
        .iter()
        .filter_map(|&feature| {
            let contribution = totals.get(feature.name()).copied().unwrap_or(0.0);
            (contribution < mean * config.underperformance_ratio).then(|| FeatureDiagnostic {
                feature: feature.name().to_string(),
                contribution,
                hint: hint_for(feature).to_string(),
            })
        })
        .collect();
    diagnostics.sort_by(|a, b| {
        a.contribution
            .partial_cmp(&b.contribution)
            .unwrap_or(Ordering::Equal)
    });
    diagnostics
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// "09:00AM" reads better without the leading zero.
fn format_time(time: NaiveTime) -> String {
    let formatted = time.format("%I:%M%p").to_string();
    formatted
        .strip_prefix('0')
        .map_or(formatted.clone(), str::to_string)
}

fn format_duration(duration: Duration) -> String {
    let hours = duration.num_hours();
    let minutes = duration.num_minutes() % 60;
    format!("{hours}h{minutes:02}m")
}

/// The selection as display rows, ordered by weekday then start time.
pub fn timetable_rows(selected: &[Session]) -> Result<Vec<TimetableRow>, GenerateError> {
    let mut keyed: Vec<(Weekday, &Session)> = Vec::with_capacity(selected.len());
    for session in selected {
        keyed.push((parse_day(&session.day)?, session));
    }
    keyed.sort_by_key(|(day, session)| (day.num_days_from_monday(), session.start_time));

    Ok(keyed
        .into_iter()
        .map(|(day, session)| TimetableRow {
            day: day_name(day).to_string(),
            start: format_time(session.start_time),
            end: format_time(session.end_time),
            unit_id: session.unit_id.clone(),
            session_type: session.session_type.clone(),
            instructor: session.instructor.clone(),
            duration: format_duration(session.duration),
        })
        .collect())
}
