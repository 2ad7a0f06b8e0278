//! Sequential session selection.
//!
//! Walks the groups in priority order and commits exactly one winner per
//! group. Critical-compliant candidates are preferred; candidate scores are
//! adjusted for day busyness against the running selection; when every
//! candidate conflicts with the selection so far, the highest raw score wins
//! anyway and the group is recorded as a conflict fallback.

use chrono::Weekday;

use crate::config::GeneratorConfig;
use crate::conflict::TimeBlock;
use crate::generator::GenerateError;
use crate::grouping::GroupedCatalogue;
use crate::logging::{Level, WalkLog};
use crate::models::{ConflictFallback, Preferences, Session};
use crate::walk_log;

/// Outcome of one selection walk.
#[derive(Clone, Debug)]
pub struct Selection {
    /// One winner per group, in visit order.
    pub selected: Vec<Session>,
    /// Groups that could only be resolved by accepting a conflict.
    pub fallbacks: Vec<ConflictFallback>,
}

/// Running selection state: committed sessions plus their time footprints.
///
/// May be seeded with prior placements, which count toward both conflicts
/// and day busyness but not toward the returned selection.
#[derive(Clone, Debug, Default)]
pub struct SelectionState {
    selected: Vec<Session>,
    placed: Vec<TimeBlock>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prior(placed: Vec<TimeBlock>) -> Self {
        Self {
            selected: Vec::new(),
            placed,
        }
    }

    fn conflicts(&self, block: &TimeBlock) -> bool {
        self.placed.iter().any(|p| p.conflicts_with(block))
    }

    fn day_count(&self, day: Weekday) -> usize {
        self.placed.iter().filter(|p| p.day == day).count()
    }

    fn commit(&mut self, session: &Session, block: TimeBlock) {
        self.selected.push(session.clone());
        self.placed.push(block);
    }
}

/// Busyness adjustment: clustering rewards already-busy days, spreading
/// penalizes them. Depends on the mutable selection state, so it is
/// recomputed from scratch for every group.
fn adjusted_score(
    score: f64,
    day_count: usize,
    prefs: &Preferences,
    config: &GeneratorConfig,
) -> f64 {
    if prefs.cluster_or_spread {
        score + day_count as f64 * config.cluster_bonus
    } else {
        score - day_count as f64 * config.spread_penalty
    }
}

/// Walk every group in visit order and commit one winner per group.
///
/// Diagnostics go to stderr at the config's verbosity.
pub fn select_sessions(
    catalogue: &GroupedCatalogue,
    prefs: &Preferences,
    config: &GeneratorConfig,
) -> Result<Selection, GenerateError> {
    let mut state = SelectionState::new();
    let mut log = WalkLog::stderr(config.verbosity);
    select_into(&mut state, catalogue, prefs, config, &mut log)
}

/// As [`select_sessions`], but continuing from an existing state and writing
/// diagnostics to `log`.
pub fn select_into(
    state: &mut SelectionState,
    catalogue: &GroupedCatalogue,
    prefs: &Preferences,
    config: &GeneratorConfig,
    log: &mut WalkLog<'_>,
) -> Result<Selection, GenerateError> {
    let mut fallbacks = Vec::new();

    for key in catalogue.visit_order() {
        let group = catalogue.group(key);

        let compliant: Vec<&Session> = group
            .iter()
            .filter(|s| s.critical_constraints_satisfied)
            .collect();
        let rest: Vec<&Session> = group
            .iter()
            .filter(|s| !s.critical_constraints_satisfied)
            .collect();
        let compliant_count = compliant.len();
        let pool = if compliant.is_empty() { rest } else { compliant };
        walk_log!(
            log,
            Level::Candidates,
            "{} {}: {} candidates, {} critical-compliant",
            key.0,
            key.1,
            group.len(),
            compliant_count
        );

        // Conflict-free arg-max on the adjusted score; ties keep the first
        // candidate in pool order.
        let mut best_clear: Option<(usize, f64)> = None;
        let mut blocks = Vec::with_capacity(pool.len());
        for (idx, &candidate) in pool.iter().enumerate() {
            let block = TimeBlock::from_session(candidate)?;
            let conflict = state.conflicts(&block);
            let day_count = state.day_count(block.day);
            let adjusted = adjusted_score(candidate.score, day_count, prefs, config);
            walk_log!(
                log,
                Level::Debug,
                "  {} {} {}: raw {:.1}, adjusted {:.1} ({} on day), conflict={}",
                candidate.day,
                candidate.start_time,
                candidate.instructor,
                candidate.score,
                adjusted,
                day_count,
                conflict
            );
            if !conflict && best_clear.map_or(true, |(_, best)| adjusted > best) {
                best_clear = Some((idx, adjusted));
            }
            blocks.push(block);
        }

        match best_clear {
            Some((idx, adjusted)) => {
                let winner = pool[idx];
                walk_log!(
                    log,
                    Level::Decisions,
                    "{} {}: selected {} {} {} (adjusted {:.1})",
                    key.0,
                    key.1,
                    winner.day,
                    winner.start_time,
                    winner.instructor,
                    adjusted
                );
                state.commit(winner, blocks[idx]);
            }
            None => {
                // Every candidate overlaps the selection so far; take the
                // highest raw score, conflict notwithstanding.
                let mut best = 0;
                for idx in 1..pool.len() {
                    if pool[idx].score > pool[best].score {
                        best = idx;
                    }
                }
                walk_log!(
                    log,
                    Level::Decisions,
                    "{} {}: no conflict-free option, selecting highest-scored",
                    key.0,
                    key.1
                );
                fallbacks.push(ConflictFallback {
                    unit_id: key.0.clone(),
                    session_type: key.1.clone(),
                });
                state.commit(pool[best], blocks[best]);
            }
        }
    }

    Ok(Selection {
        selected: state.selected.clone(),
        fallbacks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};
    use std::collections::{HashMap, HashSet};

    use crate::catalogue::available_combos;
    use crate::features::Feature;

    fn t(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    fn make_session(
        unit: &str,
        session_type: &str,
        day: &str,
        start: (u32, u32),
        end: (u32, u32),
        instructor: &str,
        score: f64,
        compliant: bool,
    ) -> Session {
        Session {
            unit_id: unit.to_string(),
            unit_name: format!("{unit} Name"),
            session_type: session_type.to_string(),
            day: day.to_string(),
            start_time: t(start.0, start.1),
            end_time: t(end.0, end.1),
            duration: Duration::minutes(60),
            instructor: instructor.to_string(),
            score,
            feature_contributions: HashMap::new(),
            critical_constraints_satisfied: compliant,
            desirability: None,
        }
    }

    fn make_prefs(cluster: bool) -> Preferences {
        Preferences {
            ideal_instructors: HashSet::new(),
            unit_ranks: HashMap::new(),
            days_off: HashSet::new(),
            preferred_start_time: t(8, 0),
            preferred_end_time: t(18, 0),
            cluster_or_spread: cluster,
            critical_features: Feature::ALL
                .iter()
                .map(|f| (f.name().to_string(), false))
                .collect(),
            preference_order: Feature::ALL
                .iter()
                .map(|f| (f.name().to_string(), 1))
                .collect(),
        }
    }

    fn organize(sessions: &[Session], ranks: &HashMap<String, i32>) -> GroupedCatalogue {
        GroupedCatalogue::organize(sessions, &available_combos(sessions), ranks).unwrap()
    }

    #[test]
    fn test_prefers_conflict_free_candidate() {
        // AAA1000 is ranked higher, so its Monday 9:00-10:00 lands first;
        // BBB2000 must then pick its lower-scored but conflict-free slot.
        let sessions = vec![
            make_session("AAA1000", "tutorial", "monday", (9, 0), (10, 0), "Smith", 500.0, true),
            make_session("BBB2000", "tutorial", "monday", (9, 30), (10, 30), "Jones", 400.0, true),
            make_session("BBB2000", "tutorial", "monday", (10, 0), (11, 0), "Wu", 300.0, true),
        ];
        let ranks = HashMap::from([("AAA1000 Name".to_string(), 5)]);
        let prefs = make_prefs(false);
        let config = GeneratorConfig::default();

        let selection = select_sessions(&organize(&sessions, &ranks), &prefs, &config).unwrap();
        assert_eq!(selection.selected.len(), 2);
        assert_eq!(selection.selected[1].instructor, "Wu");
        assert!(selection.fallbacks.is_empty());
    }

    #[test]
    fn test_all_conflicting_falls_back_to_raw_score() {
        let sessions = vec![
            make_session("AAA1000", "tutorial", "monday", (9, 0), (11, 0), "Smith", 500.0, true),
            make_session("BBB2000", "tutorial", "monday", (9, 0), (9, 45), "Jones", 500.0, true),
            make_session("BBB2000", "tutorial", "monday", (9, 30), (10, 30), "Wu", 400.0, true),
        ];
        let ranks = HashMap::from([("AAA1000 Name".to_string(), 5)]);
        let prefs = make_prefs(true);
        let config = GeneratorConfig::default();

        let selection = select_sessions(&organize(&sessions, &ranks), &prefs, &config).unwrap();
        assert_eq!(selection.selected.len(), 2);
        // Raw score decides the fallback, busyness adjustment is ignored
        assert_eq!(selection.selected[1].instructor, "Jones");
        assert_eq!(
            selection.fallbacks,
            vec![ConflictFallback {
                unit_id: "BBB2000".to_string(),
                session_type: "tutorial".to_string(),
            }]
        );
    }

    #[test]
    fn test_cluster_bonus_rewards_busy_day() {
        // Two prior placements on Tuesday: +60 adjustment for a third there.
        let prior = vec![
            TimeBlock {
                day: Weekday::Tue,
                start: t(9, 0),
                end: t(10, 0),
            },
            TimeBlock {
                day: Weekday::Tue,
                start: t(11, 0),
                end: t(12, 0),
            },
        ];
        let sessions = vec![
            make_session("AAA1000", "tutorial", "tuesday", (15, 0), (16, 0), "Smith", 100.0, true),
            make_session("AAA1000", "tutorial", "wednesday", (15, 0), (16, 0), "Jones", 150.0, true),
        ];
        let prefs = make_prefs(true);
        let config = GeneratorConfig::default();
        let catalogue = organize(&sessions, &HashMap::new());

        let mut state = SelectionState::with_prior(prior.clone());
        let mut log = WalkLog::stderr(0);
        let selection = select_into(&mut state, &catalogue, &prefs, &config, &mut log).unwrap();
        // 100 + 2 * 30 = 160 beats 150 + 0
        assert_eq!(selection.selected[0].instructor, "Smith");

        // Spreading flips the preference: 100 - 2 * 25 = 50 loses to 150
        let prefs = make_prefs(false);
        let mut state = SelectionState::with_prior(prior);
        let selection = select_into(&mut state, &catalogue, &prefs, &config, &mut log).unwrap();
        assert_eq!(selection.selected[0].instructor, "Jones");
    }

    #[test]
    fn test_compliant_pool_beats_higher_scored_disqualified() {
        let sessions = vec![
            make_session("AAA1000", "tutorial", "monday", (9, 0), (10, 0), "Smith", 900.0, false),
            make_session("AAA1000", "tutorial", "tuesday", (9, 0), (10, 0), "Jones", 100.0, true),
        ];
        let prefs = make_prefs(false);
        let config = GeneratorConfig::default();

        let selection =
            select_sessions(&organize(&sessions, &HashMap::new()), &prefs, &config).unwrap();
        assert_eq!(selection.selected[0].instructor, "Jones");
    }

    #[test]
    fn test_fully_disqualified_group_still_selects() {
        let sessions = vec![
            make_session("AAA1000", "tutorial", "monday", (9, 0), (10, 0), "Smith", -2200.0, false),
            make_session("AAA1000", "tutorial", "tuesday", (9, 0), (10, 0), "Jones", -2500.0, false),
        ];
        let prefs = make_prefs(false);
        let config = GeneratorConfig::default();

        let selection =
            select_sessions(&organize(&sessions, &HashMap::new()), &prefs, &config).unwrap();
        assert_eq!(selection.selected.len(), 1);
        assert_eq!(selection.selected[0].instructor, "Smith");
        // Conflict-free, so not a fallback
        assert!(selection.fallbacks.is_empty());
    }

    #[test]
    fn test_one_winner_per_group() {
        let sessions = vec![
            make_session("AAA1000", "tutorial", "monday", (9, 0), (10, 0), "Smith", 100.0, true),
            make_session("AAA1000", "workshop", "tuesday", (9, 0), (10, 0), "Smith", 100.0, true),
            make_session("BBB2000", "tutorial", "wednesday", (9, 0), (10, 0), "Wu", 100.0, true),
        ];
        let prefs = make_prefs(false);
        let config = GeneratorConfig::default();

        let selection =
            select_sessions(&organize(&sessions, &HashMap::new()), &prefs, &config).unwrap();
        assert_eq!(selection.selected.len(), 3);
    }

    #[test]
    fn test_silent_walk_emits_nothing() {
        // Forces both a committed winner and a conflict fallback, so every
        // diagnostic path in the walk is reached.
        let sessions = vec![
            make_session("AAA1000", "tutorial", "monday", (9, 0), (10, 0), "Smith", 500.0, true),
            make_session("BBB2000", "tutorial", "monday", (9, 0), (10, 0), "Wu", 400.0, true),
        ];
        let catalogue = organize(&sessions, &HashMap::new());
        let prefs = make_prefs(false);
        let config = GeneratorConfig::default();
        assert_eq!(config.verbosity, 0);

        let mut out = Vec::new();
        let selection = {
            let mut log = WalkLog::to_writer(config.verbosity, &mut out);
            let mut state = SelectionState::new();
            select_into(&mut state, &catalogue, &prefs, &config, &mut log).unwrap()
        };

        assert_eq!(selection.selected.len(), 2);
        assert_eq!(selection.fallbacks.len(), 1);
        assert!(out.is_empty(), "verbosity 0 must keep the walk silent");
    }

    #[test]
    fn test_decisions_verbosity_narrates_the_walk() {
        let sessions = vec![
            make_session("AAA1000", "tutorial", "monday", (9, 0), (10, 0), "Smith", 500.0, true),
            make_session("BBB2000", "tutorial", "monday", (9, 0), (10, 0), "Wu", 400.0, true),
        ];
        let catalogue = organize(&sessions, &HashMap::new());
        let prefs = make_prefs(false);
        let mut config = GeneratorConfig::default();
        config.verbosity = 1;

        let mut out = Vec::new();
        {
            let mut log = WalkLog::to_writer(config.verbosity, &mut out);
            let mut state = SelectionState::new();
            select_into(&mut state, &catalogue, &prefs, &config, &mut log).unwrap();
        }

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("AAA1000 tutorial: selected"));
        assert!(text.contains("BBB2000 tutorial: no conflict-free option"));
        // Pool composition only appears from the candidates level up
        assert!(!text.contains("critical-compliant"));
    }

    #[test]
    fn test_adjusted_tie_keeps_pool_order() {
        let sessions = vec![
            make_session("AAA1000", "tutorial", "monday", (9, 0), (10, 0), "Smith", 100.0, true),
            make_session("AAA1000", "tutorial", "tuesday", (9, 0), (10, 0), "Jones", 100.0, true),
        ];
        let prefs = make_prefs(false);
        let config = GeneratorConfig::default();

        let selection =
            select_sessions(&organize(&sessions, &HashMap::new()), &prefs, &config).unwrap();
        assert_eq!(selection.selected[0].instructor, "Smith");
    }
}
