//! Grouping of the scored catalogue and the deterministic group visit order.

use std::cmp::Reverse;
use std::collections::HashMap;

use rustc_hash::FxHashMap;

use crate::generator::GenerateError;
use crate::models::Session;

/// Grouping key: (unit_id, session_type). Exactly one session is selected
/// per key.
pub type ComboKey = (String, String);

/// The scored catalogue partitioned by combo, plus the order in which the
/// selector visits the groups.
#[derive(Clone, Debug)]
pub struct GroupedCatalogue {
    groups: FxHashMap<ComboKey, Vec<Session>>,
    order: Vec<ComboKey>,
}

impl GroupedCatalogue {
    /// Partition `sessions` by the observed combo list.
    ///
    /// The combo list is threaded in explicitly (it may be replayed from a
    /// persisted catalogue snapshot); a combo with zero sessions fails the
    /// whole run, since it can never satisfy the one-winner-per-group
    /// contract. Sessions outside `combos` are ignored as stray rows.
    ///
    /// Visit order: unit rank descending (looked up via unit name, absent
    /// units rank 0), then unit_id, then session_type. Higher-ranked units
    /// are visited first so they get first pick of low-conflict slots.
    pub fn organize(
        sessions: &[Session],
        combos: &[ComboKey],
        unit_ranks: &HashMap<String, i32>,
    ) -> Result<Self, GenerateError> {
        let mut groups: FxHashMap<ComboKey, Vec<Session>> =
            combos.iter().map(|c| (c.clone(), Vec::new())).collect();
        for session in sessions {
            let key = (session.unit_id.clone(), session.session_type.clone());
            if let Some(group) = groups.get_mut(&key) {
                group.push(session.clone());
            }
        }

        // Checked in combo order so the reported pair is deterministic.
        for key in combos {
            if groups.get(key).map_or(true, |group| group.is_empty()) {
                return Err(GenerateError::EmptyGroup {
                    unit_id: key.0.clone(),
                    session_type: key.1.clone(),
                });
            }
        }

        // unit_id -> unit_name for the rank lookup; first occurrence wins.
        let mut names: FxHashMap<&str, &str> = FxHashMap::default();
        for session in sessions {
            names
                .entry(session.unit_id.as_str())
                .or_insert(session.unit_name.as_str());
        }

        let mut order: Vec<ComboKey> = groups.keys().cloned().collect();
        order.sort_by_key(|(unit_id, session_type)| {
            let rank = names
                .get(unit_id.as_str())
                .and_then(|name| unit_ranks.get(*name))
                .copied()
                .unwrap_or(0);
            (Reverse(rank), unit_id.clone(), session_type.clone())
        });

        Ok(Self { groups, order })
    }

    /// Groups in visit order.
    pub fn visit_order(&self) -> &[ComboKey] {
        &self.order
    }

    /// Candidates for one group, in scored (descending) order.
    pub fn group(&self, key: &ComboKey) -> &[Session] {
        self.groups.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveTime};

    fn t(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    fn make_session(unit: &str, session_type: &str, instructor: &str) -> Session {
        Session {
            unit_id: unit.to_string(),
            unit_name: format!("{unit} Name"),
            session_type: session_type.to_string(),
            day: "monday".to_string(),
            start_time: t(9, 0),
            end_time: t(10, 0),
            duration: Duration::minutes(60),
            instructor: instructor.to_string(),
            score: 0.0,
            feature_contributions: HashMap::new(),
            critical_constraints_satisfied: true,
            desirability: None,
        }
    }

    fn combos_of(sessions: &[Session]) -> Vec<ComboKey> {
        crate::catalogue::available_combos(sessions)
    }

    #[test]
    fn test_groups_by_unit_and_type() {
        let sessions = vec![
            make_session("FIT1045", "tutorial", "Smith"),
            make_session("FIT1045", "tutorial", "Jones"),
            make_session("FIT1045", "workshop", "Smith"),
            make_session("MAT1830", "tutorial", "Wu"),
        ];
        let catalogue =
            GroupedCatalogue::organize(&sessions, &combos_of(&sessions), &HashMap::new()).unwrap();

        assert_eq!(catalogue.len(), 3);
        let key = ("FIT1045".to_string(), "tutorial".to_string());
        let group = catalogue.group(&key);
        assert_eq!(group.len(), 2);
        // Input order preserved within a group
        assert_eq!(group[0].instructor, "Smith");
        assert_eq!(group[1].instructor, "Jones");
    }

    #[test]
    fn test_visit_order_rank_descending_then_type() {
        let sessions = vec![
            make_session("FIT1045", "workshop", "Smith"),
            make_session("FIT1045", "applied", "Smith"),
            make_session("MAT1830", "tutorial", "Wu"),
            make_session("ENG1001", "tutorial", "Lee"),
        ];
        let ranks = HashMap::from([
            ("MAT1830 Name".to_string(), 9),
            ("FIT1045 Name".to_string(), 4),
            ("ENG1001 Name".to_string(), 4),
        ]);
        let catalogue =
            GroupedCatalogue::organize(&sessions, &combos_of(&sessions), &ranks).unwrap();

        let order: Vec<&ComboKey> = catalogue.visit_order().iter().collect();
        assert_eq!(order[0].0, "MAT1830");
        // Rank tie between ENG1001 and FIT1045 broken by unit_id
        assert_eq!(order[1].0, "ENG1001");
        // Within FIT1045, session types alphabetical
        assert_eq!(order[2], &("FIT1045".to_string(), "applied".to_string()));
        assert_eq!(order[3], &("FIT1045".to_string(), "workshop".to_string()));
    }

    #[test]
    fn test_unranked_units_visit_last() {
        let sessions = vec![
            make_session("ZZZ9999", "tutorial", "Smith"),
            make_session("AAA1111", "tutorial", "Wu"),
        ];
        let ranks = HashMap::from([("ZZZ9999 Name".to_string(), 1)]);
        let catalogue =
            GroupedCatalogue::organize(&sessions, &combos_of(&sessions), &ranks).unwrap();

        assert_eq!(catalogue.visit_order()[0].0, "ZZZ9999");
        assert_eq!(catalogue.visit_order()[1].0, "AAA1111");
    }

    #[test]
    fn test_empty_group_fails_the_run() {
        let sessions = vec![make_session("FIT1045", "tutorial", "Smith")];
        let mut combos = combos_of(&sessions);
        combos.push(("FIT1045".to_string(), "workshop".to_string()));

        let err = GroupedCatalogue::organize(&sessions, &combos, &HashMap::new()).unwrap_err();
        match err {
            GenerateError::EmptyGroup {
                unit_id,
                session_type,
            } => {
                assert_eq!(unit_id, "FIT1045");
                assert_eq!(session_type, "workshop");
            }
            other => panic!("expected EmptyGroup, got {other:?}"),
        }
    }

    #[test]
    fn test_stray_sessions_ignored() {
        let sessions = vec![
            make_session("FIT1045", "tutorial", "Smith"),
            make_session("XXX0000", "tutorial", "Nobody"),
        ];
        let combos = vec![("FIT1045".to_string(), "tutorial".to_string())];
        let catalogue = GroupedCatalogue::organize(&sessions, &combos, &HashMap::new()).unwrap();

        assert_eq!(catalogue.len(), 1);
        assert_eq!(catalogue.visit_order()[0].0, "FIT1045");
    }
}
