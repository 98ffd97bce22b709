use serde::{Deserialize, Serialize};

use crate::model::game::CanonicalGameRecord;

/// A game-list entry in the persisted snapshot. Current snapshots store
/// structured records; legacy snapshot generations stored bare display
/// strings, and readers must accept both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameEntry {
    Record(CanonicalGameRecord),
    Text(String),
}

/// One row of the league table, computed externally to the bucketing core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team: String,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
}

/// The complete persisted artifact. Replaced wholesale on every successful
/// run; a failed run leaves the previous snapshot untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub standings: Vec<StandingsRow>,
    #[serde(default)]
    pub games_today: Vec<GameEntry>,
    #[serde(default)]
    pub games_yesterday: Vec<GameEntry>,
    #[serde(default)]
    pub last_updated: String,
}
