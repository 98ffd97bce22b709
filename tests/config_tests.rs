use chrono::{TimeZone, Utc};

use show_league_cache::config::{BucketSource, FetchConfig, LeagueConfig};

#[test]
fn loads_a_full_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("league_config.json");
    let body = serde_json::json!({
        "participants": [
            { "username": "slugger01", "platform": "psn", "team": "Blue Jays" },
            { "username": "metsfan", "platform": "xbl", "team": "Mets" }
        ],
        "game_mode": "LEAGUE",
        "league_start_date": "2025-01-01",
        "fetch": {
            "api_version": "mlb25",
            "max_pages_per_user": 5,
            "sleep_seconds_between_calls": 0.25,
            "timeout_seconds": 10
        },
        "bucket_source": "legacy_string_filter"
    });
    std::fs::write(&path, serde_json::to_string_pretty(&body).unwrap()).unwrap();

    let config = LeagueConfig::from_file(path.to_str().unwrap()).expect("load failed");

    assert_eq!(config.participants.len(), 2);
    assert_eq!(config.participants[0].username, "slugger01");
    assert_eq!(config.team_codes(), vec!["Blue Jays".to_string(), "Mets".to_string()]);
    assert_eq!(config.fetch.max_pages_per_user, 5);
    assert_eq!(config.fetch.timeout_seconds, 10);
    assert_eq!(config.bucket_source, BucketSource::LegacyStringFilter);
}

#[test]
fn omitted_fields_fall_back_to_the_upstream_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("league_config.json");
    let body = serde_json::json!({
        "participants": [
            { "username": "slugger01", "platform": "psn", "team": "Blue Jays" }
        ]
    });
    std::fs::write(&path, serde_json::to_string(&body).unwrap()).unwrap();

    let config = LeagueConfig::from_file(path.to_str().unwrap()).expect("load failed");

    assert_eq!(config.game_mode, "LEAGUE");
    assert_eq!(config.league_start_date, "1970-01-01");
    assert_eq!(config.fetch.api_version, "mlb25");
    assert_eq!(config.fetch.max_pages_per_user, 3);
    assert_eq!(config.fetch.sleep_seconds_between_calls, 0.5);
    assert_eq!(config.fetch.timeout_seconds, 15);
    assert_eq!(config.bucket_source, BucketSource::Windowed48h);
}

#[test]
fn bucket_source_serde_names_are_stable() {
    let windowed: BucketSource = serde_json::from_str("\"windowed48h\"").unwrap();
    assert_eq!(windowed, BucketSource::Windowed48h);
    let legacy: BucketSource = serde_json::from_str("\"legacy_string_filter\"").unwrap();
    assert_eq!(legacy, BucketSource::LegacyStringFilter);
    assert_eq!(
        serde_json::to_string(&BucketSource::Windowed48h).unwrap(),
        "\"windowed48h\""
    );
}

#[test]
fn league_start_is_midnight_utc_of_the_configured_date() {
    let config = LeagueConfig {
        participants: Vec::new(),
        game_mode: "LEAGUE".to_string(),
        league_start_date: "2025-01-01".to_string(),
        fetch: FetchConfig::default(),
        bucket_source: BucketSource::default(),
    };
    assert_eq!(
        config.league_start_utc().unwrap(),
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    );

    let broken = LeagueConfig {
        league_start_date: "soon".to_string(),
        ..config
    };
    assert!(broken.league_start_utc().is_err());
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(LeagueConfig::from_file("/nonexistent/league_config.json").is_err());
}
