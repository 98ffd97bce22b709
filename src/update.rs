use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use crate::bucket;
use crate::cache;
use crate::config::{BucketSource, LeagueConfig};
use crate::model::snapshot::GameEntry;
use crate::pipeline::{self, Collected};
use crate::show_api::HistorySource;
use crate::standings;

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub standings_refreshed: bool,
    pub had_previous_snapshot: bool,
    pub games_today: usize,
    pub games_yesterday: usize,
}

/// Run one full reconciliation pass: ingest, filter, dedup, bucket, merge
/// with the previous snapshot, and persist.
///
/// `now_utc` is taken once so the whole pass buckets against a single
/// reference date even when it straddles local midnight, and so the pass is
/// deterministic under test. Transport and per-record failures never abort
/// the pass; only a persistence failure (or an unusable config) returns
/// `Err`, leaving the previous snapshot as the source of truth.
#[instrument(level = "info", skip(source, config, cache_path))]
pub fn run_update<S: HistorySource>(
    source: &S,
    config: &LeagueConfig,
    cache_path: &Path,
    now_utc: DateTime<Utc>,
) -> Result<RunReport, String> {
    let today = bucket::local_today(now_utc);

    let previous = cache::load(cache_path);
    let had_previous_snapshot = !previous.last_updated.is_empty();
    let mut cached: Vec<GameEntry> = Vec::new();
    cached.extend(previous.games_today.iter().cloned());
    cached.extend(previous.games_yesterday.iter().cloned());

    let fresh = match config.bucket_source {
        BucketSource::Windowed48h => {
            pipeline::collect_games(source, config, Some(pipeline::window_cutoff(now_utc)))?
        }
        BucketSource::LegacyStringFilter => Collected {
            records: Vec::new(),
            seen: HashSet::new(),
            pages_fetched: 0,
        },
    };

    let standings_result = standings::compute_standings(source, config);

    let mut seen = fresh.seen;
    let (games_today, games_yesterday) =
        bucket::bucket_games(fresh.records, cached, today, &mut seen);

    let (snapshot, standings_refreshed) =
        cache::reconcile(previous, standings_result, games_today, games_yesterday, now_utc);

    let report = RunReport {
        standings_refreshed,
        had_previous_snapshot,
        games_today: snapshot.games_today.len(),
        games_yesterday: snapshot.games_yesterday.len(),
    };

    cache::store(cache_path, &snapshot)?;

    info!(
        games_today = report.games_today,
        games_yesterday = report.games_yesterday,
        standings_refreshed = report.standings_refreshed,
        "Reconciliation pass complete"
    );
    Ok(report)
}
