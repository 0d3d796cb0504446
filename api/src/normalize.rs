//! Incident Normalizer: raw feed payload → typed incident records.
//!
//! Total over arbitrary JSON. Items that cannot be decoded are counted in
//! [`IncidentSet::malformed`] and skipped; the batch always completes.

use crate::sofascore::{self, RawIncident};
use crate::{
    Card, CardClass, DEFAULT_GOAL_TYPE, Goal, IncidentSet, IncidentTiming, NormalizedIncident,
    OWN_GOAL_CLASS, OtherDetail, OtherIncident, PeriodMarker, Shot, ShotType, Substitution, TeamId,
};
use log::{debug, trace};
use serde_json::Value;

/// Container key of the incidents feed.
pub const INCIDENTS_KEY: &str = "incidents";
/// Container key of the shotmap feed.
pub const SHOTMAP_KEY: &str = "shotmap";

/// Closed vocabulary of incident discriminators. Matching is exact and
/// case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IncidentKind {
    Card,
    Goal,
    Substitution,
    Shot,
    Period,
    InjuryTime,
    VarDecision,
    InGamePenalty,
    Unrecognized(String),
}

impl IncidentKind {
    pub fn parse(discriminator: &str) -> Self {
        match discriminator {
            "card" => IncidentKind::Card,
            "goal" => IncidentKind::Goal,
            "substitution" => IncidentKind::Substitution,
            "shot" => IncidentKind::Shot,
            "period" => IncidentKind::Period,
            "injuryTime" => IncidentKind::InjuryTime,
            "varDecision" => IncidentKind::VarDecision,
            "inGamePenalty" => IncidentKind::InGamePenalty,
            other => IncidentKind::Unrecognized(other.to_owned()),
        }
    }
}

/// Discriminator of a single feed item, `None` when the item is not an object.
pub fn classify(item: &Value) -> Option<IncidentKind> {
    RawIncident::from_value(item).map(|raw| IncidentKind::parse(raw.discriminator()))
}

/// Items of a feed payload: either a bare array or an array under `key`.
/// Any other shape has no items.
pub fn feed_items<'a>(payload: &'a Value, key: &str) -> &'a [Value] {
    match payload {
        Value::Array(items) => items,
        Value::Object(map) => map
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    }
}

/// Normalize an incidents payload (`{"incidents": [...]}` or `[...]`).
pub fn normalize(
    payload: &Value,
    home_team_id: Option<TeamId>,
    away_team_id: Option<TeamId>,
) -> IncidentSet {
    let sides = Sides { home: home_team_id, away: away_team_id };
    let mut set = IncidentSet::default();

    for (index, item) in feed_items(payload, INCIDENTS_KEY).iter().enumerate() {
        let Some(raw) = RawIncident::from_value(item) else {
            debug!("skipping incident #{index}: not an object");
            set.malformed += 1;
            continue;
        };
        match map_incident(&raw, item, sides) {
            Mapped::Record(incident) => set.push(incident),
            Mapped::Dropped => trace!("dropping incident #{index}: substitution without players"),
            Mapped::Malformed(why) => {
                debug!("skipping incident #{index}: {why}");
                set.malformed += 1;
            }
        }
    }

    trace!(
        "normalized {} incidents ({} cards, {} goals, {} substitutions, {} malformed)",
        set.len(),
        set.cards.len(),
        set.goals.len(),
        set.substitutions.len(),
        set.malformed
    );
    set
}

/// Normalize a shotmap payload (`{"shotmap": [...]}` or `[...]`). Every object
/// is read as a shot; shots without an id are skipped.
pub fn normalize_shotmap(
    payload: &Value,
    home_team_id: Option<TeamId>,
    away_team_id: Option<TeamId>,
) -> Vec<Shot> {
    let sides = Sides { home: home_team_id, away: away_team_id };
    feed_items(payload, SHOTMAP_KEY)
        .iter()
        .filter_map(RawIncident::from_value)
        .filter_map(|raw| {
            let shot = map_shot(&raw, sides);
            if shot.is_none() {
                debug!("skipping shotmap item without an id");
            }
            shot
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Mapping: SofaScore wire types → clean domain types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Sides {
    home: Option<TeamId>,
    away: Option<TeamId>,
}

impl Sides {
    /// An explicit team on the item wins over the `isHome` flag. Both shapes
    /// exist across feed versions.
    fn resolve(&self, raw: &RawIncident) -> Option<TeamId> {
        raw.explicit_team_id().or_else(|| match raw.home_flag()? {
            true => self.home,
            false => self.away,
        })
    }
}

enum Mapped {
    Record(NormalizedIncident),
    Dropped,
    Malformed(&'static str),
}

fn map_incident(raw: &RawIncident, item: &Value, sides: Sides) -> Mapped {
    let kind = IncidentKind::parse(raw.discriminator());
    let timing = IncidentTiming::new(raw.incident_id(), sides.resolve(raw), raw.minute(), raw.added_time());

    let incident = match kind {
        IncidentKind::Card => NormalizedIncident::Card(map_card(raw, timing)),
        IncidentKind::Goal => NormalizedIncident::Goal(map_goal(raw, timing)),
        IncidentKind::Substitution => match map_substitution(raw, timing) {
            Some(sub) => NormalizedIncident::Substitution(sub),
            None => return Mapped::Dropped,
        },
        IncidentKind::Shot => match map_shot(raw, sides) {
            Some(shot) => NormalizedIncident::Shot(shot),
            None => return Mapped::Malformed("shot without an id"),
        },
        IncidentKind::Period => NormalizedIncident::Period(map_period(raw, item, timing)),
        IncidentKind::InjuryTime => NormalizedIncident::Other(other(
            raw,
            item,
            timing,
            OtherDetail::InjuryTime { length: raw.length.as_ref().and_then(sofascore::safe_int) },
        )),
        IncidentKind::VarDecision => NormalizedIncident::Other(other(
            raw,
            item,
            timing,
            OtherDetail::VarDecision {
                player_id: raw.player_id(),
                confirmed: sofascore::flag(raw.confirmed.as_ref()),
                incident_class: raw.class().map(str::to_owned),
            },
        )),
        IncidentKind::InGamePenalty => NormalizedIncident::Other(other(
            raw,
            item,
            timing,
            OtherDetail::InGamePenalty {
                player_id: raw.player_id(),
                reason: sofascore::string(raw.reason.as_ref()),
                description: sofascore::string(raw.description.as_ref()),
                incident_class: raw.class().map(str::to_owned),
            },
        )),
        IncidentKind::Unrecognized(_) => {
            NormalizedIncident::Other(other(raw, item, timing, OtherDetail::Unrecognized))
        }
    };
    Mapped::Record(incident)
}

fn map_card(raw: &RawIncident, timing: IncidentTiming) -> Card {
    let (yellow, yellow_2, red) = CardClass::flags(raw.class().and_then(CardClass::parse));
    Card {
        player_id: raw.player_id(),
        card_minute: timing.minute,
        yellow,
        yellow_2,
        red,
        reason: sofascore::string(raw.reason.as_ref()),
        // Strict: a truthy 1 or "yes" is not a rescinded card.
        rescinded: sofascore::flag(raw.rescinded.as_ref()),
        timing,
    }
}

fn map_goal(raw: &RawIncident, timing: IncidentTiming) -> Goal {
    let class = raw.class();
    Goal {
        player_id: raw.player_id(),
        player_name: raw.player_name(),
        assist_player_id: sofascore::nested_id(raw.assist1.as_ref()),
        goal_minute: timing.minute,
        goal_type: class.unwrap_or(DEFAULT_GOAL_TYPE).to_owned(),
        is_own_goal: class == Some(OWN_GOAL_CLASS),
        timing,
    }
}

/// A substitution needs at least one of the two players.
fn map_substitution(raw: &RawIncident, timing: IncidentTiming) -> Option<Substitution> {
    let player_in_id = sofascore::nested_id(raw.player_in.as_ref());
    let player_out_id = sofascore::nested_id(raw.player_out.as_ref());
    if player_in_id.is_none() && player_out_id.is_none() {
        return None;
    }
    Some(Substitution {
        timing,
        player_in_id,
        player_out_id,
        // Strict like every other flag: only JSON `true`.
        injury: sofascore::flag(raw.injury.as_ref()),
    })
}

fn map_shot(raw: &RawIncident, sides: Sides) -> Option<Shot> {
    let shot_id = raw.incident_id()?;
    let timing = IncidentTiming::new(Some(shot_id), sides.resolve(raw), raw.minute(), raw.added_time());
    let shot_type = sofascore::string(raw.shot_type.as_ref()).map(|s| ShotType::parse(&s));
    let outcome = |check: fn(&ShotType) -> bool| shot_type.as_ref().is_some_and(check);

    Some(Shot {
        shot_id,
        player_id: raw.player_id(),
        is_goal: outcome(ShotType::is_goal),
        is_on_target: outcome(ShotType::is_on_target),
        is_blocked: outcome(ShotType::is_blocked),
        hit_post: outcome(ShotType::hit_post),
        shot_type,
        goal_type: sofascore::string(raw.goal_type.as_ref()),
        situation: sofascore::string(raw.situation.as_ref()),
        body_part: sofascore::string(raw.body_part.as_ref()),
        goal_mouth_location: sofascore::string(raw.goal_mouth_location.as_ref()),
        player_coordinates: sofascore::coordinates(raw.player_coordinates.as_ref()),
        goal_mouth_coordinates: sofascore::coordinates(raw.goal_mouth_coordinates.as_ref()),
        xg: raw.xg.as_ref().and_then(sofascore::safe_float),
        xgot: raw.xgot.as_ref().and_then(sofascore::safe_float),
        time_seconds: raw.time_seconds.as_ref().and_then(sofascore::safe_int),
        incident_type: sofascore::string(raw.incident_type.as_ref()),
        timing,
    })
}

fn map_period(raw: &RawIncident, item: &Value, timing: IncidentTiming) -> PeriodMarker {
    PeriodMarker {
        timing: IncidentTiming { team_id: None, ..timing },
        text: sofascore::string(raw.text.as_ref()),
        home_score: raw.home_score.as_ref().and_then(sofascore::safe_int),
        away_score: raw.away_score.as_ref().and_then(sofascore::safe_int),
        // Strict: only JSON `true`, not 1 or "yes".
        is_live: sofascore::flag(raw.is_live.as_ref()),
        time_seconds: raw.time_seconds.as_ref().and_then(sofascore::safe_int),
        period_time_seconds: raw.period_time_seconds.as_ref().and_then(sofascore::safe_int),
        incident_data: item.clone(),
    }
}

fn other(raw: &RawIncident, item: &Value, timing: IncidentTiming, detail: OtherDetail) -> OtherIncident {
    OtherIncident {
        timing,
        incident_type: raw.discriminator().to_owned(),
        detail,
        incident_data: item.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{IncidentHalf, NaturalKey};
    use serde_json::json;

    const HOME: Option<TeamId> = Some(1);
    const AWAY: Option<TeamId> = Some(2);

    fn card(class: &str) -> Card {
        let set = normalize(
            &json!([{"incidentType": "card", "incidentClass": class, "time": 30, "isHome": false, "player": {"id": 7}}]),
            HOME,
            AWAY,
        );
        assert_eq!(set.cards.len(), 1);
        set.cards.into_iter().next().unwrap()
    }

    #[test]
    fn single_home_goal_maps_to_goal_row() {
        let set = normalize(
            &json!([{"incidentType": "goal", "time": 23, "isHome": true, "player": {"id": 10}}]),
            HOME,
            AWAY,
        );
        assert_eq!(set.goals.len(), 1);
        let goal = &set.goals[0];
        assert_eq!(goal.player_id, Some(10));
        assert_eq!(goal.timing.team_id, Some(1));
        assert_eq!(goal.goal_minute, Some(23));
        assert_eq!(goal.goal_type, "regular");
        assert!(!goal.is_own_goal);
        assert_eq!(goal.timing.half, Some(IncidentHalf::First));
        assert_eq!(goal.timing.match_minute, Some(23));
    }

    #[test]
    fn own_goal_keeps_scorer_team() {
        let set = normalize(
            &json!({"incidents": [{
                "incidentType": "goal", "incidentClass": "ownGoal",
                "isHome": true, "time": 10, "player": {"id": 5}
            }]}),
            HOME,
            AWAY,
        );
        let goal = &set.goals[0];
        assert!(goal.is_own_goal);
        assert_eq!(goal.goal_type, "ownGoal");
        assert_eq!(goal.timing.team_id, Some(1));
        assert_eq!(set.final_score(HOME, AWAY), (0, 1));
    }

    #[test]
    fn goal_with_assist_and_added_time() {
        let set = normalize(
            &json!([{
                "incidentType": "goal", "incidentClass": "penalty", "time": 90, "addedTime": 4,
                "isHome": false, "player": {"id": 3, "name": "Bukayo Saka"}, "assist1": {"id": 8}
            }]),
            HOME,
            AWAY,
        );
        let goal = &set.goals[0];
        assert_eq!(goal.goal_type, "penalty");
        assert_eq!(goal.assist_player_id, Some(8));
        assert_eq!(goal.player_name.as_deref(), Some("Bukayo Saka"));
        assert_eq!(goal.timing.team_id, Some(2));
        assert_eq!(goal.timing.added_time, Some(4));
        assert_eq!(goal.timing.match_minute, Some(94));
        assert_eq!(goal.timing.half, Some(IncidentHalf::Second));
    }

    #[test]
    fn second_yellow_and_yellow_red_set_all_flags() {
        for class in ["secondYellow", "yellowRed"] {
            let c = card(class);
            assert!(c.yellow && c.yellow_2 && c.red, "{class}");
        }
    }

    #[test]
    fn plain_yellow_and_red_set_one_flag() {
        let y = card("yellow");
        assert_eq!((y.yellow, y.yellow_2, y.red), (true, false, false));
        let r = card("red");
        assert_eq!((r.yellow, r.yellow_2, r.red), (false, false, true));
        assert_eq!(r.timing.team_id, Some(2));
    }

    #[test]
    fn card_class_matching_is_case_sensitive() {
        let c = card("Yellow");
        assert_eq!((c.yellow, c.yellow_2, c.red), (false, false, false));
    }

    #[test]
    fn substitution_without_players_is_dropped_not_malformed() {
        let set = normalize(
            &json!([
                {"incidentType": "substitution", "time": 60, "isHome": true},
                {"incidentType": "substitution", "time": 61, "playerIn": {}, "playerOut": null}
            ]),
            HOME,
            AWAY,
        );
        assert!(set.substitutions.is_empty());
        assert_eq!(set.malformed, 0);
    }

    #[test]
    fn substitution_with_one_player_is_kept() {
        let set = normalize(
            &json!([{"incidentType": "substitution", "time": 70, "isHome": true,
                     "playerIn": {"id": 21}, "injury": true}]),
            HOME,
            AWAY,
        );
        let sub = &set.substitutions[0];
        assert_eq!(sub.player_in_id, Some(21));
        assert_eq!(sub.player_out_id, None);
        assert!(sub.injury);
    }

    #[test]
    fn period_with_sentinel_added_time() {
        let set = normalize(
            &json!([{"incidentType": "period", "text": "HT", "time": 45, "addedTime": 999,
                     "homeScore": 1, "awayScore": 0, "isHome": true}]),
            HOME,
            AWAY,
        );
        assert!(set.cards.is_empty() && set.goals.is_empty() && set.substitutions.is_empty());
        let period = &set.periods[0];
        assert_eq!(period.timing.added_time, None);
        assert_eq!(period.timing.match_minute, Some(45));
        assert_eq!(period.timing.team_id, None);
        assert_eq!(period.text.as_deref(), Some("HT"));
        assert_eq!((period.home_score, period.away_score), (Some(1), Some(0)));
    }

    #[test]
    fn sentinel_never_survives_on_any_kind() {
        let set = normalize(
            &json!([
                {"incidentType": "goal", "time": 45, "addedTime": 999, "isHome": true},
                {"incidentType": "card", "incidentClass": "yellow", "time": 45, "addedTime": 950},
                {"incidentType": "injuryTime", "time": 45, "addedTime": 900, "length": 3}
            ]),
            HOME,
            AWAY,
        );
        assert_eq!(set.goals[0].timing.added_time, None);
        assert_eq!(set.cards[0].timing.added_time, None);
        assert_eq!(set.others[0].timing.added_time, None);
    }

    #[test]
    fn explicit_team_wins_over_home_flag() {
        let set = normalize(
            &json!([{"incidentType": "goal", "time": 5, "isHome": true, "team": {"id": 2}}]),
            HOME,
            AWAY,
        );
        assert_eq!(set.goals[0].timing.team_id, Some(2));
    }

    #[test]
    fn missing_side_leaves_team_unresolved() {
        let set = normalize(&json!([{"incidentType": "goal", "time": 5, "isHome": "true"}]), HOME, AWAY);
        assert_eq!(set.goals[0].timing.team_id, None);
    }

    #[test]
    fn other_incident_kinds() {
        let set = normalize(
            &json!([
                {"incidentType": "injuryTime", "time": 45, "length": 4},
                {"incidentType": "varDecision", "incidentClass": "goalAwarded", "confirmed": true,
                 "isHome": false, "time": 33, "player": {"id": 4}},
                {"incidentType": "inGamePenalty", "incidentClass": "missed", "reason": "saved",
                 "isHome": true, "time": 70},
                {"incidentType": "Goal", "time": 12}
            ]),
            HOME,
            AWAY,
        );
        assert!(set.goals.is_empty(), "discriminators are case-sensitive");
        assert_eq!(set.others.len(), 4);
        assert_eq!(set.others[0].detail, OtherDetail::InjuryTime { length: Some(4) });
        assert_eq!(
            set.others[1].detail,
            OtherDetail::VarDecision {
                player_id: Some(4),
                confirmed: true,
                incident_class: Some("goalAwarded".into())
            }
        );
        assert_eq!(set.others[1].timing.team_id, Some(2));
        assert!(matches!(set.others[2].detail, OtherDetail::InGamePenalty { .. }));
        assert_eq!(set.others[3].detail, OtherDetail::Unrecognized);
        assert_eq!(set.others[3].incident_type, "Goal");
    }

    #[test]
    fn type_field_is_a_fallback_discriminator() {
        let set = normalize(&json!([{"type": "card", "incidentClass": "red", "time": 80}]), HOME, AWAY);
        assert_eq!(set.cards.len(), 1);
    }

    #[test]
    fn unsupported_containers_yield_empty_sets() {
        for payload in [json!(null), json!("incidents"), json!(42), json!({"events": []}), json!({"incidents": {}})] {
            let set = normalize(&payload, HOME, AWAY);
            assert!(set.is_empty());
            assert_eq!(set.malformed, 0);
        }
    }

    #[test]
    fn malformed_items_are_skipped_without_failing_the_batch() {
        let set = normalize(
            &json!([
                "garbage",
                null,
                [1, 2],
                {"incidentType": "goal", "time": "not a minute", "isHome": true, "player": {"id": "x"}},
                {"incidentType": "shot", "time": 12}
            ]),
            HOME,
            AWAY,
        );
        assert_eq!(set.malformed, 4);
        assert_eq!(set.goals.len(), 1);
        assert_eq!(set.goals[0].goal_minute, None);
        assert_eq!(set.goals[0].timing.match_minute, None);
        assert_eq!(set.goals[0].timing.half, None);
        assert_eq!(set.goals[0].player_id, None);
    }

    #[test]
    fn works_without_team_ids() {
        let set = normalize(&json!([{"incidentType": "goal", "time": 5, "isHome": true}]), None, None);
        assert_eq!(set.goals[0].timing.team_id, None);
    }

    #[test]
    fn natural_keys_are_stable_across_runs() {
        let feed = json!({"incidents": [
            {"incidentType": "card", "incidentClass": "yellow", "time": 30, "isHome": true, "player": {"id": 7}},
            {"incidentType": "goal", "time": 45, "addedTime": 2, "isHome": false, "player": {"id": 9}},
            {"incidentType": "substitution", "time": 60, "playerIn": {"id": 1}, "playerOut": {"id": 2}}
        ]});
        let first = normalize(&feed, HOME, AWAY);
        let second = normalize(&feed, HOME, AWAY);
        assert_eq!(first, second);
        assert_eq!(first.cards[0].natural_key(), second.cards[0].natural_key());
        assert_eq!(first.goals[0].natural_key(), second.goals[0].natural_key());
        assert_eq!(first.substitutions[0].natural_key(), second.substitutions[0].natural_key());
    }

    #[test]
    fn shot_outcome_flags() {
        let shots = normalize_shotmap(
            &json!({"shotmap": [
                {"id": 1, "shotType": "goal", "isHome": true, "time": 10, "xg": 0.4, "xgot": "0.8",
                 "playerCoordinates": {"x": 10.5, "y": 48.0, "z": 0}},
                {"id": 2, "shotType": "save", "isHome": false, "time": 20},
                {"id": 3, "shotType": "block", "time": 30},
                {"id": 4, "shotType": "post", "time": 40},
                {"id": 5, "shotType": "miss", "time": 50},
                {"shotType": "goal", "time": 60}
            ]}),
            HOME,
            AWAY,
        );
        assert_eq!(shots.len(), 5, "shot without id is skipped");

        let goal = &shots[0];
        assert!(goal.is_goal && goal.is_on_target && !goal.is_blocked && !goal.hit_post);
        assert_eq!(goal.timing.team_id, Some(1));
        assert_eq!(goal.xg, Some(0.4));
        assert_eq!(goal.xgot, Some(0.8));
        assert_eq!(goal.player_coordinates.and_then(|c| c.x), Some(10.5));

        let save = &shots[1];
        assert!(!save.is_goal && save.is_on_target);
        assert_eq!(save.timing.team_id, Some(2));

        assert!(shots[2].is_blocked && !shots[2].is_on_target);
        assert!(shots[3].hit_post && !shots[3].is_on_target);
        let miss = &shots[4];
        assert!(!miss.is_goal && !miss.is_on_target && !miss.is_blocked && !miss.hit_post);
        assert_eq!(miss.shot_type, Some(ShotType::Miss));
    }

    #[test]
    fn shot_incidents_inside_the_incidents_feed() {
        let set = normalize(
            &json!([{"incidentType": "shot", "id": 77, "shotType": "woodwork", "time": 15}]),
            HOME,
            AWAY,
        );
        assert_eq!(set.shots.len(), 1);
        assert_eq!(set.shots[0].shot_type, Some(ShotType::Other("woodwork".into())));
        assert!(!set.shots[0].hit_post);
    }

    #[test]
    fn extra_time_halves_use_clock_minute() {
        let set = normalize(
            &json!([
                {"incidentType": "goal", "time": 105, "addedTime": 1, "isHome": true},
                {"incidentType": "goal", "time": 118, "isHome": true},
                {"incidentType": "goal", "time": 121, "isHome": true}
            ]),
            HOME,
            AWAY,
        );
        let halves: Vec<_> = set.goals.iter().map(|g| g.timing.half).collect();
        assert_eq!(halves, vec![Some(IncidentHalf::ExtraFirst), Some(IncidentHalf::ExtraSecond), None]);
    }

    #[test]
    fn classify_reports_discriminators() {
        assert_eq!(classify(&json!({"incidentType": "goal"})), Some(IncidentKind::Goal));
        assert_eq!(
            classify(&json!({"incidentType": "corner"})),
            Some(IncidentKind::Unrecognized("corner".into()))
        );
        assert_eq!(classify(&json!(1)), None);
    }

    #[test]
    fn numeric_extremes_never_panic() {
        let set = normalize(
            &json!([
                {"incidentType": "goal", "time": i64::MAX, "addedTime": 5, "isHome": true},
                {"incidentType": "goal", "time": i64::MIN, "addedTime": -1, "isHome": false},
                {"incidentType": "goal", "time": -7, "addedTime": 2, "isHome": true},
                {"incidentType": "card", "incidentClass": "red", "time": 1e300, "isHome": true},
                {"incidentType": "injuryTime", "time": 90, "length": i64::MIN},
                {"incidentType": "goal", "time": 12, "isHome": true}
            ]),
            HOME,
            AWAY,
        );
        assert_eq!(set.malformed, 0);
        assert_eq!(set.goals.len(), 4);
        assert_eq!(set.goals[0].timing.minute, Some(i64::MAX));
        assert_eq!(set.goals[0].timing.match_minute, None);
        assert_eq!(set.goals[0].timing.half, None);
        assert_eq!(set.goals[1].timing.match_minute, None);
        assert_eq!(set.goals[2].timing.match_minute, Some(-5));
        assert_eq!(set.goals[3].timing.match_minute, Some(12));
        assert_eq!(set.cards[0].card_minute, None);
        assert_eq!(set.others[0].detail, OtherDetail::InjuryTime { length: Some(i64::MIN) });
    }

    #[test]
    fn flags_need_a_json_true() {
        let set = normalize(
            &json!([
                {"incidentType": "card", "incidentClass": "yellow", "time": 5, "rescinded": 1},
                {"incidentType": "card", "incidentClass": "yellow", "time": 6, "rescinded": true},
                {"incidentType": "substitution", "time": 60, "playerIn": {"id": 1}, "injury": "yes"},
                {"incidentType": "period", "text": "HT", "time": 45, "isLive": 1}
            ]),
            HOME,
            AWAY,
        );
        assert_eq!(set.cards.iter().map(|c| c.rescinded).collect::<Vec<_>>(), vec![false, true]);
        assert!(!set.substitutions[0].injury);
        assert!(!set.periods[0].is_live);
    }
}
