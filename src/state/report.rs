use chrono::{DateTime, Utc};
use match_feed::discovery::Discovery;
use match_feed::timeline::{ScoreLine, StateSegment, TeamSegment, split_at_halves};
use match_feed::{
    Card, FixtureId, Goal, IncidentSet, MatchTimeline, OtherIncident, PeriodMarker, Shot, Side, Substitution,
    TeamId,
};
use serde::Serialize;

/// A normalized row tagged with the fixture it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureRow<T> {
    pub fixture_id: FixtureId,
    #[serde(flatten)]
    pub row: T,
}

fn tag<T>(fixture_id: FixtureId, rows: Vec<T>) -> impl Iterator<Item = FixtureRow<T>> {
    rows.into_iter().map(move |row| FixtureRow { fixture_id, row })
}

/// A fixture that could not be processed. Recorded, never fatal to the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixtureError {
    pub fixture_id: FixtureId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureTimeline {
    pub fixture_id: FixtureId,
    pub home_team_id: Option<TeamId>,
    pub away_team_id: Option<TeamId>,
    pub final_score: ScoreLine,
    #[serde(flatten)]
    pub timeline: MatchTimeline,
    /// Segments cut again at the end of each half.
    pub by_half: Vec<StateSegment>,
    pub home: Vec<TeamSegment>,
    pub away: Vec<TeamSegment>,
}

impl FixtureTimeline {
    pub fn new(
        fixture_id: FixtureId,
        home_team_id: Option<TeamId>,
        away_team_id: Option<TeamId>,
        timeline: MatchTimeline,
    ) -> Self {
        Self {
            fixture_id,
            home_team_id,
            away_team_id,
            final_score: timeline.final_score(),
            by_half: split_at_halves(&timeline.segments, timeline.injury_time_1, timeline.injury_time_2),
            home: timeline.team_segments(Side::Home),
            away: timeline.team_segments(Side::Away),
            timeline,
        }
    }
}

/// Everything one fixture produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRows {
    pub fixture_id: FixtureId,
    pub incidents: IncidentSet,
    pub timeline: FixtureTimeline,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FixtureOutcome {
    Processed(Box<FixtureRows>),
    /// The feed had nothing for this fixture.
    NoIncidents(FixtureId),
    Failed(FixtureError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowCounts {
    pub cards: usize,
    pub goals: usize,
    pub substitutions: usize,
    pub shots: usize,
    pub periods: usize,
    pub others: usize,
    pub malformed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonReport {
    pub generated_at: DateTime<Utc>,
    pub fixtures: usize,
    pub processed: usize,
    pub no_incidents: Vec<FixtureId>,
    pub errors: Vec<FixtureError>,
    pub totals: RowCounts,
    pub cards: Vec<FixtureRow<Card>>,
    pub goals: Vec<FixtureRow<Goal>>,
    pub substitutions: Vec<FixtureRow<Substitution>>,
    pub shots: Vec<FixtureRow<Shot>>,
    pub periods: Vec<FixtureRow<PeriodMarker>>,
    pub others: Vec<FixtureRow<OtherIncident>>,
    pub timelines: Vec<FixtureTimeline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discovery: Option<Discovery>,
}

impl SeasonReport {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            fixtures: 0,
            processed: 0,
            no_incidents: Vec::new(),
            errors: Vec::new(),
            totals: RowCounts::default(),
            cards: Vec::new(),
            goals: Vec::new(),
            substitutions: Vec::new(),
            shots: Vec::new(),
            periods: Vec::new(),
            others: Vec::new(),
            timelines: Vec::new(),
            discovery: None,
        }
    }

    pub fn record(&mut self, outcome: FixtureOutcome) {
        self.fixtures += 1;
        match outcome {
            FixtureOutcome::Processed(rows) => self.record_rows(*rows),
            FixtureOutcome::NoIncidents(fixture_id) => self.no_incidents.push(fixture_id),
            FixtureOutcome::Failed(error) => self.errors.push(error),
        }
    }

    /// Errors from a later pass over the same fixtures; repeats are skipped.
    pub fn merge_errors(&mut self, errors: Vec<FixtureError>) {
        for e in errors {
            if !self.errors.contains(&e) {
                self.errors.push(e);
            }
        }
    }

    fn record_rows(&mut self, rows: FixtureRows) {
        let FixtureRows { fixture_id, incidents, timeline } = rows;
        self.processed += 1;

        self.totals.cards += incidents.cards.len();
        self.totals.goals += incidents.goals.len();
        self.totals.substitutions += incidents.substitutions.len();
        self.totals.shots += incidents.shots.len();
        self.totals.periods += incidents.periods.len();
        self.totals.others += incidents.others.len();
        self.totals.malformed += incidents.malformed;

        self.cards.extend(tag(fixture_id, incidents.cards));
        self.goals.extend(tag(fixture_id, incidents.goals));
        self.substitutions.extend(tag(fixture_id, incidents.substitutions));
        self.shots.extend(tag(fixture_id, incidents.shots));
        self.periods.extend(tag(fixture_id, incidents.periods));
        self.others.extend(tag(fixture_id, incidents.others));
        self.timelines.push(timeline);
    }
}
