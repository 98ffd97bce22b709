use crate::model::game::CanonicalGameRecord;
use crate::model::snapshot::GameEntry;

/// Outcome of normalizing an already-bucketed cache entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Standardized {
    /// Structured fields suitable for re-bucketing.
    Record(CanonicalGameRecord),
    /// A legacy string that does not follow the known display grammar; kept
    /// as best-effort data, excluded from date-based decisions.
    Opaque(String),
}

/// Normalize a snapshot game entry to structured form.
///
/// Legacy snapshot generations stored games as display strings shaped
/// `"<home> <hs> - <away> <as> - <date> - <time>"`. Those split on the
/// literal `" - "` separator: the first two segments carry team and trailing
/// score, the remaining segments rejoin into the display timestamp. Fewer
/// than four segments means the string is unparseable. Structured entries
/// pass through unchanged.
pub fn standardize(entry: GameEntry) -> Standardized {
    match entry {
        GameEntry::Record(record) => Standardized::Record(record),
        GameEntry::Text(raw) => {
            let segments: Vec<&str> = raw.split(" - ").collect();
            if segments.len() < 4 {
                return Standardized::Opaque(raw);
            }
            let (home_team, home_score) = split_name_score(segments[0]);
            let (away_team, away_score) = split_name_score(segments[1]);
            let ended_at_local = segments[2..].join(" - ");
            Standardized::Record(CanonicalGameRecord {
                id: String::new(),
                home_team,
                away_team,
                home_score,
                away_score,
                ended_at_local,
            })
        }
    }
}

/// Render a structured record in the legacy display grammar. Kept as the
/// writer-side counterpart of [`standardize`] so the two sides of the format
/// contract live next to each other.
pub fn to_display_string(record: &CanonicalGameRecord) -> String {
    let hs = record.home_score.map(|n| n.to_string()).unwrap_or_default();
    let as_ = record.away_score.map(|n| n.to_string()).unwrap_or_default();
    format!(
        "{} {} - {} {} - {}",
        record.home_team, hs, record.away_team, as_, record.ended_at_local
    )
}

/// Split a `"<name> <score>"` segment at its last internal space. A segment
/// with no space, or a non-numeric trailing token, yields an absent score.
fn split_name_score(segment: &str) -> (String, Option<i64>) {
    let trimmed = segment.trim_end();
    match trimmed.rsplit_once(' ') {
        Some((name, token)) => match token.parse::<i64>() {
            Ok(score) => (name.to_string(), Some(score)),
            Err(_) => (trimmed.to_string(), None),
        },
        None => (trimmed.to_string(), None),
    }
}
