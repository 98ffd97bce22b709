use serde::{Deserialize, Serialize};
use tracing::info;

/// Static league roster entry. Immutable for the lifetime of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub username: String,
    pub platform: String,
    /// Short canonical team code, e.g. "Mets".
    pub team: String,
}

/// Fetch tuning for the upstream game-history API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_max_pages")]
    pub max_pages_per_user: u32,
    #[serde(default = "default_sleep_seconds")]
    pub sleep_seconds_between_calls: f64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            api_version: default_api_version(),
            max_pages_per_user: default_max_pages(),
            sleep_seconds_between_calls: default_sleep_seconds(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_api_version() -> String {
    "mlb25".to_string()
}

fn default_max_pages() -> u32 {
    3
}

fn default_sleep_seconds() -> f64 {
    0.5
}

fn default_timeout_seconds() -> u64 {
    15
}

/// Where the today/yesterday buckets are derived from. Resolved once at
/// startup; no call-site probing for optional behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketSource {
    /// Fresh bounded-window fetch (48h) merged with re-bucketed cache entries.
    #[default]
    Windowed48h,
    /// No fresh fetch; re-derive buckets solely from the previous snapshot's
    /// entries via their display-string dates.
    LegacyStringFilter,
}

/// Immutable league configuration, constructed once per run and passed by
/// reference into every component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub participants: Vec<Participant>,
    #[serde(default = "default_game_mode")]
    pub game_mode: String,
    /// League inception date, `YYYY-MM-DD`. Games before midnight UTC of this
    /// date are permanently excluded.
    #[serde(default = "default_league_start")]
    pub league_start_date: String,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub bucket_source: BucketSource,
}

fn default_game_mode() -> String {
    "LEAGUE".to_string()
}

fn default_league_start() -> String {
    "1970-01-01".to_string()
}

impl LeagueConfig {
    /// Load the configuration from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, String> {
        let body = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path, e))?;
        let config: LeagueConfig = serde_json::from_str(&body)
            .map_err(|e| format!("Failed to parse config {}: {}", path, e))?;
        info!(
            participants = config.participants.len(),
            game_mode = %config.game_mode,
            "Loaded league config"
        );
        Ok(config)
    }

    /// The roster's short team codes, in roster order.
    pub fn team_codes(&self) -> Vec<String> {
        self.participants.iter().map(|p| p.team.clone()).collect()
    }

    /// League start as a UTC instant (midnight of the configured date).
    pub fn league_start_utc(&self) -> Result<chrono::DateTime<chrono::Utc>, String> {
        let date = chrono::NaiveDate::parse_from_str(&self.league_start_date, "%Y-%m-%d")
            .map_err(|e| format!("Invalid league_start_date {:?}: {}", self.league_start_date, e))?;
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| format!("Invalid league_start_date {:?}", self.league_start_date))?;
        Ok(chrono::TimeZone::from_utc_datetime(&chrono::Utc, &naive))
    }
}
