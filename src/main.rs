use std::env;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use show_league_cache::config::LeagueConfig;
use show_league_cache::show_api::ShowApi;
use show_league_cache::update::{RunReport, run_update};

fn run_pass(config: &LeagueConfig, cache_path: &Path) -> Result<RunReport, String> {
    let api = ShowApi::new(&config.fetch);
    run_update(&api, config, cache_path, chrono::Utc::now())
}

/// A failed pass exits non-zero in one-shot mode, as does a standings failure
/// with no previous snapshot to fall back on.
fn pass_succeeded(outcome: &Result<RunReport, String>) -> bool {
    match outcome {
        Ok(report) => report.standings_refreshed || report.had_previous_snapshot,
        Err(_) => false,
    }
}

#[tokio::main]
async fn main() {
    // Initialize structured logging with tracing
    let _ = tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::INFO)
        .with_current_span(false)
        .with_target(false)
        .with_ansi(false)
        .try_init();

    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "league_config.json".to_string());
    let cache_path =
        PathBuf::from(env::var("CACHE_FILE").unwrap_or_else(|_| "standings_cache.json".to_string()));

    let config = match LeagueConfig::from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Cannot start without a league config");
            std::process::exit(1);
        }
    };

    let run_once = env::args().any(|arg| arg == "--once")
        || env::var("RUN_ONCE").ok().as_deref() == Some("1");
    let interval_seconds: u64 = env::var("UPDATE_INTERVAL_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(300);

    loop {
        // Clone because spawn_blocking's 'move' closure requires 'static owned
        // data; each pass must own its inputs.
        let pass_config = config.clone();
        let pass_cache_path = cache_path.clone();
        let outcome = tokio::task::spawn_blocking(move || run_pass(&pass_config, &pass_cache_path))
            .await
            .unwrap_or_else(|e| Err(format!("Update pass panicked: {}", e)));

        match &outcome {
            Ok(report) => info!(
                games_today = report.games_today,
                games_yesterday = report.games_yesterday,
                standings_refreshed = report.standings_refreshed,
                "Cache update finished"
            ),
            Err(e) => error!(error = %e, "Cache update failed"),
        }

        if run_once {
            std::process::exit(if pass_succeeded(&outcome) { 0 } else { 1 });
        }

        info!(interval_seconds, "Waiting for the next update");
        tokio::time::sleep(std::time::Duration::from_secs(interval_seconds)).await;
    }
}
