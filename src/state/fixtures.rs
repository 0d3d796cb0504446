use anyhow::Context;
use chrono::{DateTime, Utc};
use log::warn;
use match_feed::{FixtureId, MatchClock, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// One fixture row of a season, as exported from the fixtures table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub fixture_id: FixtureId,
    #[serde(default)]
    pub home_team_id: Option<TeamId>,
    #[serde(default)]
    pub away_team_id: Option<TeamId>,
    #[serde(default)]
    pub injury_time_1: Option<i64>,
    #[serde(default)]
    pub injury_time_2: Option<i64>,
    #[serde(default)]
    pub kickoff: Option<DateTime<Utc>>,
}

impl Fixture {
    /// Clock for the timeline. Injury times missing on the fixture row fall
    /// back to what the feed announced, then to zero.
    pub fn clock(&self, announced: (Option<i64>, Option<i64>)) -> MatchClock {
        MatchClock {
            injury_time_1: self.injury_time_1.or(announced.0).unwrap_or(0),
            injury_time_2: self.injury_time_2.or(announced.1).unwrap_or(0),
            total_minutes: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FixturesFile {
    List(Vec<Fixture>),
    Wrapped { fixtures: Vec<Fixture> },
}

pub fn load_fixtures(path: &Path) -> anyhow::Result<Vec<Fixture>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read fixtures from {}", path.display()))?;
    parse_fixtures(&content).with_context(|| format!("invalid fixtures json at {}", path.display()))
}

/// Fixtures from a JSON array or `{"fixtures": [...]}`. Repeated fixture ids
/// keep their first row.
pub fn parse_fixtures(content: &str) -> anyhow::Result<Vec<Fixture>> {
    let fixtures = match serde_json::from_str::<FixturesFile>(content)? {
        FixturesFile::List(fixtures) | FixturesFile::Wrapped { fixtures } => fixtures,
    };

    let mut seen = HashSet::new();
    Ok(fixtures
        .into_iter()
        .filter(|f| {
            let first = seen.insert(f.fixture_id);
            if !first {
                warn!("fixture {} listed more than once, keeping the first row", f.fixture_id);
            }
            first
        })
        .collect())
}
