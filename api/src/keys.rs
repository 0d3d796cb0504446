//! Natural keys used by callers to diff normalized rows against what storage
//! already holds. The normalizer itself never de-duplicates.

use crate::{Card, Goal, IncidentId, OtherIncident, PeriodMarker, PlayerId, Shot, Substitution, TeamId};
use std::collections::HashSet;
use std::hash::Hash;

pub trait NaturalKey {
    type Key: Eq + Hash + Clone;

    fn natural_key(&self) -> Self::Key;
}

/// (player_id, team_id, card_minute, added_time, yellow, yellow_2, red)
pub type CardKey = (Option<PlayerId>, Option<TeamId>, Option<i64>, Option<i64>, bool, bool, bool);

/// (player_id, team_id, goal_minute, added_time, goal_type, is_own_goal)
pub type GoalKey = (Option<PlayerId>, Option<TeamId>, Option<i64>, Option<i64>, String, bool);

/// (player_in_id, player_out_id, minute, added_time)
pub type SubstitutionKey = (Option<PlayerId>, Option<PlayerId>, Option<i64>, Option<i64>);

/// (incident_type, incident_id, minute, added_time)
pub type IncidentKey = (String, Option<IncidentId>, Option<i64>, Option<i64>);

impl NaturalKey for Card {
    type Key = CardKey;

    fn natural_key(&self) -> CardKey {
        (
            self.player_id,
            self.timing.team_id,
            self.card_minute,
            self.timing.added_time,
            self.yellow,
            self.yellow_2,
            self.red,
        )
    }
}

impl NaturalKey for Goal {
    type Key = GoalKey;

    fn natural_key(&self) -> GoalKey {
        (
            self.player_id,
            self.timing.team_id,
            self.goal_minute,
            self.timing.added_time,
            self.goal_type.clone(),
            self.is_own_goal,
        )
    }
}

impl NaturalKey for Substitution {
    type Key = SubstitutionKey;

    fn natural_key(&self) -> SubstitutionKey {
        (self.player_in_id, self.player_out_id, self.timing.minute, self.timing.added_time)
    }
}

impl NaturalKey for PeriodMarker {
    type Key = IncidentKey;

    fn natural_key(&self) -> IncidentKey {
        ("period".to_owned(), self.timing.incident_id, self.timing.minute, self.timing.added_time)
    }
}

impl NaturalKey for OtherIncident {
    type Key = IncidentKey;

    fn natural_key(&self) -> IncidentKey {
        (
            self.incident_type.clone(),
            self.timing.incident_id,
            self.timing.minute,
            self.timing.added_time,
        )
    }
}

/// Shots are keyed by their feed id; storage pairs it with the fixture id.
impl NaturalKey for Shot {
    type Key = IncidentId;

    fn natural_key(&self) -> IncidentId {
        self.shot_id
    }
}

/// Rows whose key is not in `existing`, keeping the first of any repeats
/// within `rows`.
pub fn retain_new<T: NaturalKey>(rows: Vec<T>, existing: &HashSet<T::Key>) -> Vec<T> {
    let mut seen: HashSet<T::Key> = HashSet::new();
    rows.into_iter()
        .filter(|row| {
            let key = row.natural_key();
            !existing.contains(&key) && seen.insert(key)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;
    use serde_json::json;

    fn feed() -> serde_json::Value {
        json!([
            {"incidentType": "card", "incidentClass": "yellow", "time": 30, "isHome": true, "player": {"id": 7}},
            {"incidentType": "card", "incidentClass": "yellow", "time": 30, "isHome": true, "player": {"id": 7}},
            {"incidentType": "card", "incidentClass": "secondYellow", "time": 70, "isHome": true, "player": {"id": 7}},
            {"incidentType": "goal", "time": 45, "addedTime": 0, "isHome": false, "player": {"id": 9}},
            {"incidentType": "goal", "time": 45, "isHome": false, "player": {"id": 9}},
            {"incidentType": "period", "id": 11, "text": "HT", "time": 45, "addedTime": 999}
        ])
    }

    #[test]
    fn card_key_matches_storage_columns() {
        let set = normalize(&feed(), Some(1), Some(2));
        assert_eq!(set.cards[2].natural_key(), (Some(7), Some(1), Some(70), None, true, true, true));
    }

    #[test]
    fn zero_and_missing_added_time_are_different_keys() {
        let set = normalize(&feed(), Some(1), Some(2));
        assert_ne!(set.goals[0].natural_key(), set.goals[1].natural_key());
        assert_eq!(set.goals[0].natural_key().3, Some(0));
        assert_eq!(set.goals[1].natural_key().3, None);
    }

    #[test]
    fn retain_new_skips_existing_and_in_batch_repeats() {
        let set = normalize(&feed(), Some(1), Some(2));
        let existing: HashSet<CardKey> = [set.cards[2].natural_key()].into_iter().collect();
        let fresh = retain_new(set.cards, &existing);
        assert_eq!(fresh.len(), 1);
        assert!(!fresh[0].red);
    }

    #[test]
    fn period_key_uses_incident_type() {
        let set = normalize(&feed(), Some(1), Some(2));
        assert_eq!(set.periods[0].natural_key(), ("period".to_owned(), Some(11), Some(45), None));
    }
}
