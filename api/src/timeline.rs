//! Timeline Reconstructor: goal events → winning/drawing/losing segments.

use crate::{Goal, OtherDetail, OtherIncident, Side, TeamId, side_of};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Regulation length of one half, in minutes.
pub const HALF_LENGTH: i64 = 45;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    Winning,
    Drawing,
    Losing,
}

impl GameState {
    pub fn from_scores(own: u16, other: u16) -> Self {
        match own.cmp(&other) {
            std::cmp::Ordering::Greater => GameState::Winning,
            std::cmp::Ordering::Less => GameState::Losing,
            std::cmp::Ordering::Equal => GameState::Drawing,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            GameState::Winning => GameState::Losing,
            GameState::Losing => GameState::Winning,
            GameState::Drawing => GameState::Drawing,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameState::Winning => "winning",
            GameState::Drawing => "drawing",
            GameState::Losing => "losing",
        }
    }
}

/// Half a timeline segment falls in. Boundaries move with injury time:
/// first half up to `45 + injury_time_1`, second half up to
/// `90 + injury_time_2`, extra time after that.
///
/// Deliberately independent from [`crate::IncidentHalf`], which only looks at
/// the clock minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentHalf {
    First,
    Second,
    Extra,
}

impl SegmentHalf {
    pub fn at(minute: i64, injury_time_1: i64, injury_time_2: i64) -> Self {
        if minute < first_half_end(injury_time_1) {
            SegmentHalf::First
        } else if minute < second_half_end(injury_time_2) {
            SegmentHalf::Second
        } else {
            SegmentHalf::Extra
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SegmentHalf::First => "1st Half",
            SegmentHalf::Second => "2nd Half",
            SegmentHalf::Extra => "Extra Time",
        }
    }
}

/// Injury times come from the feed unchecked, so the boundaries saturate.
pub fn first_half_end(injury_time_1: i64) -> i64 {
    HALF_LENGTH.saturating_add(injury_time_1)
}

pub fn second_half_end(injury_time_2: i64) -> i64 {
    (2 * HALF_LENGTH).saturating_add(injury_time_2)
}

/// A goal as the reconstructor sees it: which side scored it and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEvent {
    pub side: Side,
    pub minute: i64,
    pub added_time: Option<i64>,
    pub match_minute: i64,
    pub player: String,
    pub is_own_goal: bool,
}

impl GoalEvent {
    /// Side whose score goes up. Own goals count for the opponent.
    pub fn credited_side(&self) -> Side {
        if self.is_own_goal { self.side.opponent() } else { self.side }
    }
}

impl fmt::Display for GoalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.added_time {
            Some(added) if added > 0 => write!(f, "{}+{added}' {}", self.minute, self.player)?,
            _ => write!(f, "{}' {}", self.minute, self.player)?,
        }
        if self.is_own_goal {
            write!(f, " (OG)")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub home: u16,
    pub away: u16,
}

impl ScoreLine {
    pub fn record(&mut self, goal: &GoalEvent) {
        match goal.credited_side() {
            Side::Home => self.home = self.home.saturating_add(1),
            Side::Away => self.away = self.away.saturating_add(1),
        }
    }

    pub fn state(&self, side: Side) -> GameState {
        match side {
            Side::Home => GameState::from_scores(self.home, self.away),
            Side::Away => GameState::from_scores(self.away, self.home),
        }
    }
}

/// A stretch of the match during which neither side's standing changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSegment {
    pub start: i64,
    pub end: i64,
    pub home: GameState,
    pub away: GameState,
    pub half: SegmentHalf,
    pub score: ScoreLine,
}

impl StateSegment {
    fn new(start: i64, end: i64, score: ScoreLine, injury_time_1: i64, injury_time_2: i64) -> Self {
        let home = score.state(Side::Home);
        Self {
            start,
            end,
            home,
            away: home.opposite(),
            half: SegmentHalf::at(start, injury_time_1, injury_time_2),
            score,
        }
    }

    pub fn duration(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    pub fn state(&self, side: Side) -> GameState {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

/// Rebuild the game-state timeline from goal events.
///
/// Goals are walked in non-decreasing `match_minute` order (ties keep their
/// input order). Every goal closes the running segment and opens a new one,
/// so goals sharing a minute leave zero-width segments between them. The last
/// segment runs to `total_minutes`, or to the last goal if that is later.
pub fn reconstruct(
    goal_events: &[GoalEvent],
    total_minutes: i64,
    injury_time_1: i64,
    injury_time_2: i64,
) -> Vec<StateSegment> {
    let mut ordered: Vec<&GoalEvent> = goal_events.iter().collect();
    ordered.sort_by_key(|goal| goal.match_minute);

    let mut segments = Vec::with_capacity(ordered.len() + 1);
    let mut score = ScoreLine::default();
    let mut start = 0;

    for goal in ordered {
        let end = goal.match_minute.max(start);
        segments.push(StateSegment::new(start, end, score, injury_time_1, injury_time_2));
        score.record(goal);
        start = end;
    }
    segments.push(StateSegment::new(
        start,
        total_minutes.max(start),
        score,
        injury_time_1,
        injury_time_2,
    ));
    segments
}

/// Cut segments that straddle a half boundary, relabelling each piece.
/// Zero-width segments are kept as they are.
pub fn split_at_halves(segments: &[StateSegment], injury_time_1: i64, injury_time_2: i64) -> Vec<StateSegment> {
    let mut boundaries = [first_half_end(injury_time_1), second_half_end(injury_time_2)];
    boundaries.sort_unstable();

    let mut split = Vec::with_capacity(segments.len() + boundaries.len());
    for segment in segments {
        let mut start = segment.start;
        for &boundary in &boundaries {
            if start < boundary && boundary < segment.end {
                split.push(StateSegment::new(start, boundary, segment.score, injury_time_1, injury_time_2));
                start = boundary;
            }
        }
        split.push(StateSegment::new(start, segment.end, segment.score, injury_time_1, injury_time_2));
    }
    split
}

/// One side's view of a segment, the shape a Gantt-style chart wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSegment {
    pub side: Side,
    pub start: i64,
    pub end: i64,
    pub duration: i64,
    pub state: GameState,
    pub half: SegmentHalf,
}

pub fn team_segments(segments: &[StateSegment], side: Side) -> Vec<TeamSegment> {
    segments
        .iter()
        .map(|s| TeamSegment {
            side,
            start: s.start,
            end: s.end,
            duration: s.duration(),
            state: s.state(side),
            half: s.half,
        })
        .collect()
}

/// Goal rows → goal events, ordered by match minute. Goals without a clock
/// minute, or whose team is neither side, are left out.
pub fn goal_events(goals: &[Goal], home_team_id: Option<TeamId>, away_team_id: Option<TeamId>) -> Vec<GoalEvent> {
    let mut events: Vec<GoalEvent> = goals
        .iter()
        .filter_map(|goal| {
            let side = side_of(goal.timing.team_id, home_team_id, away_team_id)?;
            let minute = goal.goal_minute?;
            let player = goal
                .player_name
                .clone()
                .or_else(|| goal.player_id.map(|id| id.to_string()))
                .unwrap_or_else(|| "Unknown".to_owned());
            Some(GoalEvent {
                side,
                minute,
                added_time: goal.timing.added_time,
                match_minute: goal.timing.match_minute.unwrap_or(minute),
                player,
                is_own_goal: goal.is_own_goal,
            })
        })
        .collect();
    events.sort_by_key(|event| event.match_minute);
    events
}

/// Injury time per half, grown to cover the latest goal scored in it. A goal
/// at clock minute 45 or earlier belongs to the first half.
pub fn extend_injury_times(events: &[GoalEvent], injury_time_1: i64, injury_time_2: i64) -> (i64, i64) {
    events
        .iter()
        .fold((injury_time_1, injury_time_2), |(first, second), event| match event.added_time {
            Some(added) if event.minute <= HALF_LENGTH => (first.max(added), second),
            Some(added) => (first, second.max(added)),
            None => (first, second),
        })
}

/// Announced injury time per half from `injuryTime` incidents.
pub fn injury_times_from(others: &[OtherIncident]) -> (Option<i64>, Option<i64>) {
    let mut first = None;
    let mut second = None;
    for incident in others {
        let OtherDetail::InjuryTime { length: Some(length) } = incident.detail else {
            continue;
        };
        let slot = match incident.timing.minute {
            Some(minute) if minute <= HALF_LENGTH => &mut first,
            Some(minute) if minute <= 2 * HALF_LENGTH => &mut second,
            _ => continue,
        };
        *slot = Some(slot.map_or(length, |current: i64| current.max(length)));
    }
    (first, second)
}

/// Injury times (and optionally the total length) a timeline is built with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchClock {
    pub injury_time_1: i64,
    pub injury_time_2: i64,
    /// Defaults to the end of the second half including its injury time.
    pub total_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTimeline {
    pub injury_time_1: i64,
    pub injury_time_2: i64,
    pub total_minutes: i64,
    pub events: Vec<GoalEvent>,
    pub segments: Vec<StateSegment>,
}

impl MatchTimeline {
    pub fn build(
        goals: &[Goal],
        home_team_id: Option<TeamId>,
        away_team_id: Option<TeamId>,
        clock: MatchClock,
    ) -> Self {
        let events = goal_events(goals, home_team_id, away_team_id);
        Self::from_events(events, clock)
    }

    pub fn from_events(events: Vec<GoalEvent>, clock: MatchClock) -> Self {
        let (injury_time_1, injury_time_2) = extend_injury_times(&events, clock.injury_time_1, clock.injury_time_2);
        let total_minutes = clock.total_minutes.unwrap_or_else(|| second_half_end(injury_time_2));
        let segments = reconstruct(&events, total_minutes, injury_time_1, injury_time_2);
        Self { injury_time_1, injury_time_2, total_minutes, events, segments }
    }

    pub fn final_score(&self) -> ScoreLine {
        self.segments.last().map(|s| s.score).unwrap_or_default()
    }

    pub fn team_segments(&self, side: Side) -> Vec<TeamSegment> {
        team_segments(&self.segments, side)
    }
}
