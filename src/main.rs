mod state;

use crate::state::fixtures::{Fixture, load_fixtures};
use crate::state::season::SeasonRunner;
use crate::state::settings::Settings;
use anyhow::Context;
use log::{debug, error, info};
use match_feed::client::{FeedSource, LocalFeed, SofascoreApi};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Run { fixtures: PathBuf, discover: bool },
    Discover { fixtures: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(command) = handle_cli_args(std::env::args().skip(1))? else {
        return Ok(());
    };

    better_panic::install();

    let settings = Settings::load();
    env_logger::Builder::new()
        .parse_filters(&settings.log_filter)
        .format_timestamp_millis()
        .init();

    let fixtures = match &command {
        Command::Run { fixtures, .. } | Command::Discover { fixtures } => load_fixtures(fixtures)?,
    };
    info!("loaded {} fixtures", fixtures.len());

    match &settings.feed_dir {
        Some(dir) => {
            info!("reading feeds from {}", dir.display());
            execute(LocalFeed::new(dir), &settings, &command, &fixtures).await
        }
        None => {
            info!("fetching feeds from {}", settings.api_base);
            let api = SofascoreApi::new(settings.api_base.clone(), settings.timeout);
            execute(api, &settings, &command, &fixtures).await
        }
    }
}

async fn execute<S: FeedSource>(
    source: S,
    settings: &Settings,
    command: &Command,
    fixtures: &[Fixture],
) -> anyhow::Result<()> {
    let runner = SeasonRunner::new(source, settings.concurrency, settings.with_shots);

    match command {
        Command::Run { discover, .. } => {
            let mut report = runner.run(fixtures).await;
            if *discover {
                let (discovery, errors) = runner.discover(fixtures).await;
                report.discovery = Some(discovery);
                report.merge_errors(errors);
            }
            for e in &report.errors {
                error!("fixture {}: {}", e.fixture_id, e.message);
            }
            debug!("feed cache (hits, misses): {:?}", runner.cache_stats());
            print_json(&report)
        }
        Command::Discover { .. } => {
            let (discovery, errors) = runner.discover(fixtures).await;
            for e in &errors {
                error!("fixture {}: {}", e.fixture_id, e.message);
            }
            print_json(&discovery)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).context("could not write report")?;
    writeln!(stdout)?;
    Ok(())
}

fn handle_cli_args(mut args: impl Iterator<Item = String>) -> anyhow::Result<Option<Command>> {
    let Some(arg) = args.next() else {
        eprintln!("{}", usage_text());
        std::process::exit(2);
    };

    let command = match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            return Ok(None);
        }
        "-V" | "--version" => {
            println!("matchstate {}", env!("CARGO_PKG_VERSION"));
            return Ok(None);
        }
        "run" => {
            let mut discover = false;
            let mut fixtures = None;
            for arg in args {
                match arg.as_str() {
                    "--discover" => discover = true,
                    _ if fixtures.is_none() && !arg.starts_with('-') => fixtures = Some(PathBuf::from(arg)),
                    _ => anyhow::bail!("unexpected argument to run: {arg}\n\n{}", usage_text()),
                }
            }
            let fixtures = fixtures.with_context(|| format!("run needs a fixtures file\n\n{}", usage_text()))?;
            Command::Run { fixtures, discover }
        }
        "discover" => {
            let fixtures = args
                .next()
                .map(PathBuf::from)
                .with_context(|| format!("discover needs a fixtures file\n\n{}", usage_text()))?;
            if let Some(extra) = args.next() {
                anyhow::bail!("unexpected argument to discover: {extra}");
            }
            Command::Discover { fixtures }
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };
    Ok(Some(command))
}

fn usage_text() -> &'static str {
    "matchstate - football incident normalizer and game-state timelines

Usage:
  matchstate run [--discover] <fixtures.json>
  matchstate discover <fixtures.json>
  matchstate --help
  matchstate --version

The fixtures file is a JSON array (or {\"fixtures\": [...]}) of
  {fixture_id, home_team_id?, away_team_id?, injury_time_1?, injury_time_2?, kickoff?}

Environment:
  MATCHSTATE_FEED_DIR      Read {dir}/{fixture_id}/incidents.json and shotmap.json instead of HTTP
  MATCHSTATE_API_BASE      Feed API base URL (default https://www.sofascore.com/api/v1)
  MATCHSTATE_CONCURRENCY   Fixtures fetched at once (default 4)
  MATCHSTATE_TIMEOUT_SECS  Per-request timeout (default 10)
  MATCHSTATE_SHOTS         Set to 0/false/off to skip the shotmap feed
  MATCHSTATE_LOG           Log filter, falls back to RUST_LOG (default warn)"
}
