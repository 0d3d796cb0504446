pub mod client;
pub mod discovery;
pub mod keys;
pub mod normalize;
pub mod sofascore;
pub mod timeline;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use keys::{NaturalKey, retain_new};
pub use normalize::{normalize, normalize_shotmap};
pub use timeline::{MatchClock, MatchTimeline, reconstruct};

pub type TeamId = i64;
pub type PlayerId = i64;
pub type FixtureId = i64;
pub type IncidentId = i64;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the SofaScore wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

/// Half an incident belongs to, derived from the raw clock minute only.
///
/// Not the same boundary the timeline uses for its segments, see
/// [`timeline::SegmentHalf`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncidentHalf {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "ET1")]
    ExtraFirst,
    #[serde(rename = "ET2")]
    ExtraSecond,
}

impl IncidentHalf {
    pub fn from_minute(minute: Option<i64>) -> Option<Self> {
        match minute? {
            ..=45 => Some(IncidentHalf::First),
            46..=90 => Some(IncidentHalf::Second),
            91..=105 => Some(IncidentHalf::ExtraFirst),
            106..=120 => Some(IncidentHalf::ExtraSecond),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IncidentHalf::First => "1",
            IncidentHalf::Second => "2",
            IncidentHalf::ExtraFirst => "ET1",
            IncidentHalf::ExtraSecond => "ET2",
        }
    }
}

/// Fields every normalized incident carries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentTiming {
    pub incident_id: Option<IncidentId>,
    pub team_id: Option<TeamId>,
    pub minute: Option<i64>,
    /// `None` both when the feed had no added time and when it sent a period
    /// sentinel; `Some(0)` only when the feed said 0.
    pub added_time: Option<i64>,
    pub match_minute: Option<i64>,
    pub half: Option<IncidentHalf>,
}

impl IncidentTiming {
    pub fn new(
        incident_id: Option<IncidentId>,
        team_id: Option<TeamId>,
        minute: Option<i64>,
        added_time: Option<i64>,
    ) -> Self {
        Self {
            incident_id,
            team_id,
            minute,
            added_time,
            match_minute: match_minute(minute, added_time),
            half: IncidentHalf::from_minute(minute),
        }
    }
}

/// Clock minute plus added time. A missing minute stays missing; missing added
/// time adds nothing. A sum that does not fit is missing too.
pub fn match_minute(minute: Option<i64>, added_time: Option<i64>) -> Option<i64> {
    minute?.checked_add(added_time.unwrap_or(0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardClass {
    Yellow,
    Red,
    SecondYellow,
    YellowRed,
}

impl CardClass {
    pub fn parse(class: &str) -> Option<Self> {
        match class {
            "yellow" => Some(CardClass::Yellow),
            "red" => Some(CardClass::Red),
            "secondYellow" => Some(CardClass::SecondYellow),
            "yellowRed" => Some(CardClass::YellowRed),
            _ => None,
        }
    }

    /// (yellow, yellow_2, red)
    pub fn flags(class: Option<Self>) -> (bool, bool, bool) {
        match class {
            Some(CardClass::Yellow) => (true, false, false),
            Some(CardClass::Red) => (false, false, true),
            Some(CardClass::SecondYellow) | Some(CardClass::YellowRed) => (true, true, true),
            None => (false, false, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(flatten)]
    pub timing: IncidentTiming,
    pub player_id: Option<PlayerId>,
    pub card_minute: Option<i64>,
    pub yellow: bool,
    pub yellow_2: bool,
    pub red: bool,
    pub reason: Option<String>,
    pub rescinded: bool,
}

pub const DEFAULT_GOAL_TYPE: &str = "regular";
pub const OWN_GOAL_CLASS: &str = "ownGoal";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(flatten)]
    pub timing: IncidentTiming,
    pub player_id: Option<PlayerId>,
    pub player_name: Option<String>,
    pub assist_player_id: Option<PlayerId>,
    pub goal_minute: Option<i64>,
    /// Raw incident class: "regular", "penalty", "ownGoal", ...
    pub goal_type: String,
    pub is_own_goal: bool,
}

impl Goal {
    /// Side credited with the goal. An own goal counts for the opponent of
    /// the side that scored it.
    pub fn credited_side(&self, scorer: Side) -> Side {
        if self.is_own_goal { scorer.opponent() } else { scorer }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    #[serde(flatten)]
    pub timing: IncidentTiming,
    pub player_in_id: Option<PlayerId>,
    pub player_out_id: Option<PlayerId>,
    pub injury: bool,
}

/// Closed shot outcome vocabulary; anything new lands in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShotType {
    Goal,
    Save,
    Block,
    Miss,
    Post,
    #[serde(untagged)]
    Other(String),
}

impl ShotType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "goal" => ShotType::Goal,
            "save" => ShotType::Save,
            "block" => ShotType::Block,
            "miss" => ShotType::Miss,
            "post" => ShotType::Post,
            other => ShotType::Other(other.to_owned()),
        }
    }

    pub fn is_goal(&self) -> bool {
        matches!(self, ShotType::Goal)
    }

    pub fn is_on_target(&self) -> bool {
        matches!(self, ShotType::Goal | ShotType::Save)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, ShotType::Block)
    }

    pub fn hit_post(&self) -> bool {
        matches!(self, ShotType::Post)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    #[serde(flatten)]
    pub timing: IncidentTiming,
    pub shot_id: IncidentId,
    pub player_id: Option<PlayerId>,
    pub shot_type: Option<ShotType>,
    pub goal_type: Option<String>,
    pub situation: Option<String>,
    pub body_part: Option<String>,
    pub goal_mouth_location: Option<String>,
    pub player_coordinates: Option<Coordinates>,
    pub goal_mouth_coordinates: Option<Coordinates>,
    pub xg: Option<f64>,
    pub xgot: Option<f64>,
    pub time_seconds: Option<i64>,
    pub incident_type: Option<String>,
    pub is_goal: bool,
    pub is_on_target: bool,
    pub is_blocked: bool,
    pub hit_post: bool,
}

/// Period markers ("HT", "FT", ...) with the score at that point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodMarker {
    #[serde(flatten)]
    pub timing: IncidentTiming,
    pub text: Option<String>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub is_live: bool,
    pub time_seconds: Option<i64>,
    pub period_time_seconds: Option<i64>,
    pub incident_data: Value,
}

/// What an "other" incident carries beyond the common timing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "detail", rename_all = "snake_case")]
pub enum OtherDetail {
    InjuryTime {
        length: Option<i64>,
    },
    VarDecision {
        player_id: Option<PlayerId>,
        confirmed: bool,
        incident_class: Option<String>,
    },
    InGamePenalty {
        player_id: Option<PlayerId>,
        reason: Option<String>,
        description: Option<String>,
        incident_class: Option<String>,
    },
    Unrecognized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OtherIncident {
    #[serde(flatten)]
    pub timing: IncidentTiming,
    /// Discriminator as sent by the feed.
    pub incident_type: String,
    #[serde(flatten)]
    pub detail: OtherDetail,
    pub incident_data: Value,
}

/// One decoded feed item.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedIncident {
    Card(Card),
    Goal(Goal),
    Substitution(Substitution),
    Shot(Shot),
    Period(PeriodMarker),
    Other(OtherIncident),
}

impl NormalizedIncident {
    pub fn timing(&self) -> &IncidentTiming {
        match self {
            NormalizedIncident::Card(c) => &c.timing,
            NormalizedIncident::Goal(g) => &g.timing,
            NormalizedIncident::Substitution(s) => &s.timing,
            NormalizedIncident::Shot(s) => &s.timing,
            NormalizedIncident::Period(p) => &p.timing,
            NormalizedIncident::Other(o) => &o.timing,
        }
    }
}

/// Everything one normalization pass produced, split by record kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentSet {
    pub cards: Vec<Card>,
    pub goals: Vec<Goal>,
    pub substitutions: Vec<Substitution>,
    pub shots: Vec<Shot>,
    pub periods: Vec<PeriodMarker>,
    pub others: Vec<OtherIncident>,
    /// Items skipped because they were not decodable.
    pub malformed: usize,
}

impl IncidentSet {
    pub fn push(&mut self, incident: NormalizedIncident) {
        match incident {
            NormalizedIncident::Card(c) => self.cards.push(c),
            NormalizedIncident::Goal(g) => self.goals.push(g),
            NormalizedIncident::Substitution(s) => self.substitutions.push(s),
            NormalizedIncident::Shot(s) => self.shots.push(s),
            NormalizedIncident::Period(p) => self.periods.push(p),
            NormalizedIncident::Other(o) => self.others.push(o),
        }
    }

    pub fn extend(&mut self, other: IncidentSet) {
        self.cards.extend(other.cards);
        self.goals.extend(other.goals);
        self.substitutions.extend(other.substitutions);
        self.shots.extend(other.shots);
        self.periods.extend(other.periods);
        self.others.extend(other.others);
        self.malformed += other.malformed;
    }

    pub fn len(&self) -> usize {
        self.cards.len()
            + self.goals.len()
            + self.substitutions.len()
            + self.shots.len()
            + self.periods.len()
            + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Final (home, away) score from the goal rows. Goals whose team cannot be
    /// matched to either side are ignored.
    pub fn final_score(&self, home_team_id: Option<TeamId>, away_team_id: Option<TeamId>) -> (u16, u16) {
        let mut score = (0u16, 0u16);
        for goal in &self.goals {
            let Some(scorer) = side_of(goal.timing.team_id, home_team_id, away_team_id) else {
                continue;
            };
            match goal.credited_side(scorer) {
                Side::Home => score.0 = score.0.saturating_add(1),
                Side::Away => score.1 = score.1.saturating_add(1),
            }
        }
        score
    }
}

/// Which side a team id belongs to, if it matches either.
pub fn side_of(team_id: Option<TeamId>, home_team_id: Option<TeamId>, away_team_id: Option<TeamId>) -> Option<Side> {
    let team_id = team_id?;
    if Some(team_id) == home_team_id {
        Some(Side::Home)
    } else if Some(team_id) == away_team_id {
        Some(Side::Away)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn incident_half_follows_the_raw_minute() {
        assert_eq!(IncidentHalf::from_minute(Some(45)), Some(IncidentHalf::First));
        assert_eq!(IncidentHalf::from_minute(Some(46)), Some(IncidentHalf::Second));
        assert_eq!(IncidentHalf::from_minute(Some(105)), Some(IncidentHalf::ExtraFirst));
        assert_eq!(IncidentHalf::from_minute(Some(120)), Some(IncidentHalf::ExtraSecond));
        assert_eq!(IncidentHalf::from_minute(Some(121)), None);
        assert_eq!(IncidentHalf::from_minute(None), None);
        assert_eq!(serde_json::to_value(IncidentHalf::ExtraFirst).unwrap(), json!("ET1"));
    }

    #[test]
    fn match_minute_ignores_missing_added_time() {
        assert_eq!(match_minute(Some(90), Some(4)), Some(94));
        assert_eq!(match_minute(Some(45), None), Some(45));
        assert_eq!(match_minute(None, Some(3)), None);
    }

    #[test]
    fn match_minute_out_of_range_is_missing() {
        assert_eq!(match_minute(Some(i64::MAX), Some(5)), None);
        assert_eq!(match_minute(Some(i64::MIN), Some(-1)), None);
        assert_eq!(match_minute(Some(-3), Some(2)), Some(-1));
    }

    #[test]
    fn second_yellow_sets_every_flag() {
        assert_eq!(CardClass::flags(CardClass::parse("secondYellow")), (true, true, true));
        assert_eq!(CardClass::flags(CardClass::parse("yellowRed")), (true, true, true));
        assert_eq!(CardClass::flags(CardClass::parse("Yellow")), (false, false, false));
    }

    #[test]
    fn unknown_shot_types_round_trip_as_plain_strings() {
        assert_eq!(serde_json::to_value(ShotType::Save).unwrap(), json!("save"));
        assert_eq!(serde_json::to_value(ShotType::parse("woodwork")).unwrap(), json!("woodwork"));
        let parsed: ShotType = serde_json::from_value(json!("woodwork")).unwrap();
        assert_eq!(parsed, ShotType::Other("woodwork".into()));
    }

    #[test]
    fn final_score_credits_own_goals_to_the_opponent() {
        let set = normalize(
            &json!([
                {"incidentType": "goal", "time": 10, "isHome": true},
                {"incidentType": "goal", "incidentClass": "ownGoal", "time": 20, "isHome": true},
                {"incidentType": "goal", "time": 30, "teamId": 99}
            ]),
            Some(1),
            Some(2),
        );
        assert_eq!(set.goals.len(), 3);
        assert_eq!(set.final_score(Some(1), Some(2)), (1, 1));
    }
}
