use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument};

use crate::bucket;
use crate::config::LeagueConfig;
use crate::model::game::{CanonicalGameRecord, RawGameRecord, score_from_value};
use crate::show_api::HistorySource;
use crate::teams::resolve_team;

/// How far back the bounded-window fetch looks. Anything older cannot land
/// in either bucket, so it is excluded at ingestion time.
pub const WINDOW_HOURS: i64 = 48;

/// Result of one ingestion pass over all participants.
#[derive(Debug)]
pub struct Collected {
    /// Canonical records in local-timestamp order, deduplicated by id.
    pub records: Vec<CanonicalGameRecord>,
    /// Ids admitted during this pass; threaded into the bucketing stage so
    /// cached entries cannot duplicate freshly fetched ones.
    pub seen: HashSet<String>,
    /// Pages that returned a usable payload. Zero means the upstream gave us
    /// nothing at all.
    pub pages_fetched: u32,
}

/// Walk every participant's paginated history and collect eligible,
/// deduplicated canonical records.
///
/// Paging stops for a participant at the first page with no usable payload
/// (the upstream returns history newest-first, so a gap means nothing newer
/// remains), but always proceeds to the next participant. A cooldown sleep
/// between calls keeps the upstream rate limiter happy. With
/// `since_cutoff = None` the walk covers everything since league start.
#[instrument(level = "info", skip(source, config, since_cutoff))]
pub fn collect_games<S: HistorySource>(
    source: &S,
    config: &LeagueConfig,
    since_cutoff: Option<DateTime<Utc>>,
) -> Result<Collected, String> {
    let league_start = config.league_start_utc()?;
    let codes = config.team_codes();
    let cooldown =
        std::time::Duration::from_secs_f64(config.fetch.sleep_seconds_between_calls.max(0.0));

    let mut records: Vec<CanonicalGameRecord> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut pages_fetched: u32 = 0;

    for participant in &config.participants {
        for page in 1..=config.fetch.max_pages_per_user {
            let Some(page_records) =
                source.fetch_page(&participant.username, &participant.platform, page)
            else {
                // A gap ends pagination for this participant only.
                break;
            };
            pages_fetched += 1;

            for raw in &page_records {
                let Some((record, ended_at)) = eligible_record(raw, config, &codes, league_start)
                else {
                    continue;
                };
                if let Some(cutoff) = since_cutoff {
                    if ended_at < cutoff {
                        continue;
                    }
                }
                // First eligible sighting of an id wins, regardless of which
                // participant's history it came through.
                if !seen.insert(record.id.clone()) {
                    continue;
                }
                records.push(record);
            }

            if !cooldown.is_zero() {
                std::thread::sleep(cooldown);
            }
        }
    }

    records.sort_by(|a, b| a.ended_at_local.cmp(&b.ended_at_local));
    info!(
        kept = records.len(),
        pages_fetched, "Collected game history across participants"
    );
    Ok(Collected {
        records,
        seen,
        pages_fetched,
    })
}

/// The bounded-window cutoff for today/yesterday bucketing.
pub fn window_cutoff(now_utc: DateTime<Utc>) -> DateTime<Utc> {
    now_utc - Duration::hours(WINDOW_HOURS)
}

/// Apply the eligibility contract to one raw record and extract its canonical
/// form. Returns `None` when any condition fails; a record is never partially
/// accepted.
fn eligible_record(
    raw: &RawGameRecord,
    config: &LeagueConfig,
    codes: &[String],
    league_start: DateTime<Utc>,
) -> Option<(CanonicalGameRecord, DateTime<Utc>)> {
    let id = raw.id_string()?;
    let ended_at = bucket::parse_instant(raw.ended_at.as_deref()?)?;
    let home_full = raw.home_full_name.as_deref()?;
    let away_full = raw.away_full_name.as_deref()?;

    // Exact, case-sensitive mode match; exhibition play never counts.
    if raw.game_mode.as_deref() != Some(config.game_mode.as_str()) {
        return None;
    }
    // Games before league inception are permanently excluded.
    if ended_at < league_start {
        return None;
    }

    let home_team = resolve_team(home_full, codes)?.to_string();
    let away_team = resolve_team(away_full, codes)?.to_string();

    let record = CanonicalGameRecord {
        id,
        home_team,
        away_team,
        home_score: score_from_value(raw.home_score.as_ref()),
        away_score: score_from_value(raw.away_score.as_ref()),
        ended_at_local: bucket::format_local(ended_at),
    };
    Some((record, ended_at))
}

/// Whether a raw record would survive the eligibility filter.
pub fn is_eligible(raw: &RawGameRecord, config: &LeagueConfig) -> bool {
    let Ok(league_start) = config.league_start_utc() else {
        return false;
    };
    eligible_record(raw, config, &config.team_codes(), league_start).is_some()
}
