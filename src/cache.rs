use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use crate::bucket::LEAGUE_TZ;
use crate::model::snapshot::{GameEntry, Snapshot, StandingsRow};

/// Read the previously persisted snapshot. A missing or corrupt file is
/// treated as an empty snapshot; the pipeline then rebuilds from scratch.
pub fn load(path: &Path) -> Snapshot {
    match std::fs::read_to_string(path) {
        Ok(body) => match serde_json::from_str::<Snapshot>(&body) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, path = %path.display(), "Snapshot file unreadable; starting from empty");
                Snapshot::default()
            }
        },
        Err(_) => Snapshot::default(),
    }
}

/// Persist the snapshot. The document is staged to a `.tmp` sibling and
/// renamed over the target, so a reader never observes a partial snapshot
/// and an interrupted write leaves the previous file intact.
pub fn store(path: &Path, snapshot: &Snapshot) -> Result<(), String> {
    let body = serde_json::to_string_pretty(snapshot)
        .map_err(|e| format!("Failed to serialize snapshot: {}", e))?;

    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, body).map_err(|e| {
        error!(error = %e, path = %tmp_path.display(), "Failed to stage snapshot");
        format!("Failed to stage snapshot {}: {}", tmp_path.display(), e)
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        error!(error = %e, path = %path.display(), "Failed to replace snapshot");
        format!("Failed to replace snapshot {}: {}", path.display(), e)
    })?;

    info!(path = %path.display(), "Snapshot persisted");
    Ok(())
}

/// Merge the run's results against the previous snapshot.
///
/// Game buckets are replaced wholesale; each run re-derives them from a fresh
/// bounded-window fetch, which is self-healing against upstream corrections.
/// Standings are replaced only when the external computation succeeded; on
/// failure the previous snapshot's standings are preserved rather than
/// fabricated. Returns the new snapshot and whether standings were refreshed.
pub fn reconcile(
    previous: Snapshot,
    standings: Result<Vec<StandingsRow>, String>,
    games_today: Vec<GameEntry>,
    games_yesterday: Vec<GameEntry>,
    now_utc: DateTime<Utc>,
) -> (Snapshot, bool) {
    let (standings, refreshed) = match standings {
        Ok(rows) => (rows, true),
        Err(e) => {
            warn!(error = %e, "Standings computation failed; keeping previous standings");
            (previous.standings, false)
        }
    };

    let snapshot = Snapshot {
        standings,
        games_today,
        games_yesterday,
        last_updated: now_utc
            .with_timezone(&LEAGUE_TZ)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
    };
    (snapshot, refreshed)
}
