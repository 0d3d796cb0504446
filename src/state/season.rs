use crate::state::cache::LookupCache;
use crate::state::fixtures::Fixture;
use crate::state::report::{FixtureError, FixtureOutcome, FixtureRows, FixtureTimeline, SeasonReport};
use chrono::Utc;
use futures_util::FutureExt;
use futures_util::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use match_feed::client::{ApiResult, FeedSource};
use match_feed::discovery::{Discovery, discover};
use match_feed::timeline::injury_times_from;
use match_feed::{
    FixtureId, IncidentSet, MatchTimeline, NaturalKey, Shot, normalize, normalize_shotmap, retain_new,
};
use serde_json::Value;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

type FeedCache = LookupCache<FixtureId, Option<Arc<Value>>>;

/// Drives a whole season through the normalizer and the reconstructor.
/// Feeds are fetched through `source` and cached per fixture, so a discovery
/// pass after a run does not fetch again.
pub struct SeasonRunner<S> {
    source: S,
    incidents: FeedCache,
    shotmaps: FeedCache,
    concurrency: usize,
    with_shots: bool,
}

impl<S: FeedSource> SeasonRunner<S> {
    pub fn new(source: S, concurrency: usize, with_shots: bool) -> Self {
        Self {
            source,
            incidents: LookupCache::new(),
            shotmaps: LookupCache::new(),
            concurrency: concurrency.max(1),
            with_shots,
        }
    }

    /// Process every fixture. A failing fixture is recorded in the report and
    /// the rest carry on. Entries keep the order of `fixtures`.
    pub async fn run(&self, fixtures: &[Fixture]) -> SeasonReport {
        let mut outcomes: Vec<(usize, FixtureOutcome)> = stream::iter(fixtures.iter().enumerate())
            .map(|(index, fixture)| async move { (index, self.process(fixture).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        outcomes.sort_by_key(|(index, _)| *index);

        let mut report = SeasonReport::new(Utc::now());
        for (_, outcome) in outcomes {
            report.record(outcome);
        }
        info!(
            "season run done: {} processed, {} without incidents, {} failed",
            report.processed,
            report.no_incidents.len(),
            report.errors.len()
        );
        report
    }

    /// Merged discriminator survey over every fixture's incidents feed.
    /// Fixtures whose feed cannot be fetched are reported and left out.
    pub async fn discover(&self, fixtures: &[Fixture]) -> (Discovery, Vec<FixtureError>) {
        let mut results: Vec<(usize, FixtureId, ApiResult<Option<Arc<Value>>>)> =
            stream::iter(fixtures.iter().enumerate())
                .map(|(index, fixture)| async move {
                    (index, fixture.fixture_id, self.incidents_feed(fixture.fixture_id).await)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;
        results.sort_by_key(|(index, _, _)| *index);

        let mut discovery = Discovery::default();
        let mut errors = Vec::new();
        for (_, fixture_id, result) in results {
            match result {
                Ok(Some(payload)) => discovery.merge(discover(&payload)),
                Ok(None) => debug!("fixture {fixture_id}: nothing to discover"),
                Err(e) => {
                    warn!("fixture {fixture_id}: {e}");
                    errors.push(FixtureError { fixture_id, message: e.to_string() });
                }
            }
        }
        (discovery, errors)
    }

    async fn process(&self, fixture: &Fixture) -> FixtureOutcome {
        let fixture_id = fixture.fixture_id;
        debug!("processing fixture {fixture_id}");

        // All fixtures are polled on one task, so a panic must stop here.
        match AssertUnwindSafe(self.load_rows(fixture)).catch_unwind().await {
            Ok(Ok(Some(rows))) => FixtureOutcome::Processed(Box::new(rows)),
            Ok(Ok(None)) => {
                debug!("fixture {fixture_id}: no incidents");
                FixtureOutcome::NoIncidents(fixture_id)
            }
            Ok(Err(e)) => {
                warn!("fixture {fixture_id} failed: {e}");
                FixtureOutcome::Failed(FixtureError { fixture_id, message: e.to_string() })
            }
            Err(panic) => {
                let message = format!("processing panicked: {}", panic_message(&*panic));
                error!("fixture {fixture_id}: {message}");
                FixtureOutcome::Failed(FixtureError { fixture_id, message })
            }
        }
    }

    async fn load_rows(&self, fixture: &Fixture) -> ApiResult<Option<FixtureRows>> {
        let fixture_id = fixture.fixture_id;
        let (home, away) = (fixture.home_team_id, fixture.away_team_id);

        let Some(payload) = self.incidents_feed(fixture_id).await? else {
            return Ok(None);
        };
        let mut incidents = normalize(&payload, home, away);

        if self.with_shots {
            match self.shotmap_feed(fixture_id).await {
                Ok(Some(shotmap)) => merge_shotmap(&mut incidents, normalize_shotmap(&shotmap, home, away)),
                Ok(None) => debug!("fixture {fixture_id}: no shotmap"),
                Err(e) => {
                    // Retry the whole fixture next time, not half of it.
                    self.incidents.invalidate(&fixture_id).await;
                    return Err(e);
                }
            }
        }

        let clock = fixture.clock(injury_times_from(&incidents.others));
        let timeline = MatchTimeline::build(&incidents.goals, home, away, clock);

        let feed_score = incidents.final_score(home, away);
        let score = timeline.final_score();
        if feed_score != (score.home, score.away) {
            debug!(
                "fixture {fixture_id}: {} goals left out of the timeline",
                incidents.goals.len().saturating_sub(timeline.events.len())
            );
        }

        Ok(Some(FixtureRows {
            fixture_id,
            timeline: FixtureTimeline::new(fixture_id, home, away, timeline),
            incidents,
        }))
    }

    async fn incidents_feed(&self, fixture_id: FixtureId) -> ApiResult<Option<Arc<Value>>> {
        self.incidents
            .get_or_load(fixture_id, || async move {
                self.source.fetch_incidents(fixture_id).await.map(|feed| feed.map(Arc::new))
            })
            .await
    }

    async fn shotmap_feed(&self, fixture_id: FixtureId) -> ApiResult<Option<Arc<Value>>> {
        self.shotmaps
            .get_or_load(fixture_id, || async move {
                self.source.fetch_shotmap(fixture_id).await.map(|feed| feed.map(Arc::new))
            })
            .await
    }

    /// (hits, misses) of the incidents cache.
    pub fn cache_stats(&self) -> (usize, usize) {
        self.incidents.stats()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// A shot can arrive both as a "shot" incident and in the shotmap. Shot ids
/// are feed ids, so only those repeats are dropped. Every other row is kept
/// as normalized; two goals may share a natural key and both count.
fn merge_shotmap(incidents: &mut IncidentSet, shotmap: Vec<Shot>) {
    let known: HashSet<_> = incidents.shots.iter().map(|shot| shot.natural_key()).collect();
    incidents.shots.extend(retain_new(shotmap, &known));
}
