use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::America::Santiago;
use chrono_tz::Tz;

use crate::legacy::{self, Standardized};
use crate::model::game::CanonicalGameRecord;
use crate::model::snapshot::GameEntry;

/// The league's fixed display timezone. All bucketing and every persisted
/// timestamp use this zone; cross-timezone display is out of scope.
pub const LEAGUE_TZ: Tz = Santiago;

/// Calendar-day classification of a game relative to the run's reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Today,
    Yesterday,
    Discard,
}

/// Parse an upstream ISO-8601 instant. Timestamps without an offset are
/// treated as UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .ok()
}

/// Render an instant as the persisted display string, e.g.
/// `07-09-2025 - 11:00 pm (local)`. This format is a durable contract: it is
/// the sole signal used when re-deriving bucket membership from cached
/// entries, so it must not change shape between runs.
pub fn format_local(instant: DateTime<Utc>) -> String {
    let local = instant.with_timezone(&LEAGUE_TZ);
    format!("{} (local)", local.format("%d-%m-%Y - %I:%M %P"))
}

/// The run's reference calendar date in the league timezone. Computed exactly
/// once per reconciliation pass so bucketing stays self-consistent even when
/// a run straddles local midnight.
pub fn local_today(now_utc: DateTime<Utc>) -> NaiveDate {
    now_utc.with_timezone(&LEAGUE_TZ).date_naive()
}

/// The leading `dd-mm-yyyy` of a display timestamp, if it has one.
pub fn leading_date(text: &str) -> Option<&str> {
    let prefix = text.get(..10)?;
    let ok = prefix.bytes().enumerate().all(|(i, b)| match i {
        2 | 5 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    if ok { Some(prefix) } else { None }
}

/// Classify a display timestamp against the run's reference date using only
/// its calendar-date component.
pub fn bucket_for(ended_at_local: &str, today: NaiveDate) -> Bucket {
    let date_str = match leading_date(ended_at_local.trim()) {
        Some(d) => d,
        None => return Bucket::Discard,
    };
    if date_str == today.format("%d-%m-%Y").to_string() {
        Bucket::Today
    } else if date_str == (today - Duration::days(1)).format("%d-%m-%Y").to_string() {
        Bucket::Yesterday
    } else {
        Bucket::Discard
    }
}

/// Produce the final (today, yesterday) buckets from freshly fetched
/// canonical records and the previous snapshot's entries.
///
/// Fresh records are placed first, so on an id collision the fresh sighting
/// wins over the cached one. Cached entries go through the legacy normalizer;
/// unparseable legacy strings carry no usable date and are conservatively
/// kept in the yesterday bucket rather than silently dropped.
pub fn bucket_games(
    fresh: Vec<CanonicalGameRecord>,
    cached: Vec<GameEntry>,
    today: NaiveDate,
    seen: &mut HashSet<String>,
) -> (Vec<GameEntry>, Vec<GameEntry>) {
    let mut games_today = Vec::new();
    let mut games_yesterday = Vec::new();

    for record in fresh {
        match bucket_for(&record.ended_at_local, today) {
            Bucket::Today => games_today.push(GameEntry::Record(record)),
            Bucket::Yesterday => games_yesterday.push(GameEntry::Record(record)),
            Bucket::Discard => {}
        }
    }

    for entry in cached {
        match legacy::standardize(entry) {
            Standardized::Record(record) => {
                if !record.id.is_empty() && !seen.insert(record.id.clone()) {
                    continue;
                }
                match bucket_for(&record.ended_at_local, today) {
                    Bucket::Today => games_today.push(GameEntry::Record(record)),
                    Bucket::Yesterday => games_yesterday.push(GameEntry::Record(record)),
                    Bucket::Discard => {}
                }
            }
            Standardized::Opaque(raw) => games_yesterday.push(GameEntry::Text(raw)),
        }
    }

    (games_today, games_yesterday)
}
