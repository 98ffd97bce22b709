use tracing::{info, instrument};

use crate::config::LeagueConfig;
use crate::model::snapshot::StandingsRow;
use crate::pipeline;
use crate::show_api::HistorySource;

/// Points awarded per win in the cascade.
const POINTS_PER_WIN: u32 = 2;

/// Compute the league table from the full game history since league start.
///
/// This is an external collaborator to the bucketing core: its failure is
/// reported to the caller but never blocks bucket computation. It fails only
/// when the upstream produced no usable page for any participant, i.e. there
/// is nothing to tally from.
#[instrument(level = "info", skip(source, config))]
pub fn compute_standings<S: HistorySource>(
    source: &S,
    config: &LeagueConfig,
) -> Result<Vec<StandingsRow>, String> {
    let collected = pipeline::collect_games(source, config, None)?;
    if collected.pages_fetched == 0 {
        return Err(
            "No history pages available from upstream; standings not recomputed".to_string(),
        );
    }

    let mut rows: Vec<StandingsRow> = config
        .team_codes()
        .into_iter()
        .map(|team| StandingsRow {
            team,
            wins: 0,
            losses: 0,
            points: 0,
        })
        .collect();

    for record in &collected.records {
        let (Some(home_score), Some(away_score)) = (record.home_score, record.away_score) else {
            continue;
        };
        if home_score == away_score {
            continue;
        }
        let (winner, loser) = if home_score > away_score {
            (&record.home_team, &record.away_team)
        } else {
            (&record.away_team, &record.home_team)
        };
        for row in rows.iter_mut() {
            if row.team == *winner {
                row.wins += 1;
            } else if row.team == *loser {
                row.losses += 1;
            }
        }
    }

    for row in rows.iter_mut() {
        row.points = row.wins * POINTS_PER_WIN;
    }

    // Points descending, then wins, then team code for a total, stable order.
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.wins.cmp(&a.wins))
            .then(a.team.cmp(&b.team))
    });

    info!(teams = rows.len(), games = collected.records.len(), "Computed standings");
    Ok(rows)
}
