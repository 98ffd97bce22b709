use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of the upstream game-history document.
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(default)]
    pub data: Vec<RawGameRecord>,
}

/// A raw game fragment as the upstream API returns it. Field names drift
/// across payload generations, so every field is optional and the known
/// aliases are accepted; ids and scores arrive as either numbers or strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGameRecord {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default, alias = "home_team", alias = "home_name")]
    pub home_full_name: Option<String>,
    #[serde(default, alias = "away_team", alias = "away_name")]
    pub away_full_name: Option<String>,
    #[serde(default, alias = "display_home_score")]
    pub home_score: Option<Value>,
    #[serde(default, alias = "display_away_score")]
    pub away_score: Option<Value>,
    #[serde(default)]
    pub game_mode: Option<String>,
}

impl RawGameRecord {
    /// Game identifier as a string, if present and non-empty.
    pub fn id_string(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Best-effort integer coercion for score fields (number or numeric string);
/// anything else is treated as an absent score.
pub fn score_from_value(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// A game record after filtering, team resolution, and deduplication.
/// `ended_at_local` is the display string persisted to the snapshot and later
/// used to re-derive bucket membership, so its format is a durable contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalGameRecord {
    #[serde(default)]
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(with = "score_serde", default)]
    pub home_score: Option<i64>,
    #[serde(with = "score_serde", default)]
    pub away_score: Option<i64>,
    pub ended_at_local: String,
}

/// Persisted score convention inherited from older cache generations: an
/// absent score is stored as the empty string, not null.
mod score_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(score: &Option<i64>, ser: S) -> Result<S::Ok, S::Error> {
        match score {
            Some(n) => ser.serialize_i64(*n),
            None => ser.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
        let value = Option::<Value>::deserialize(de)?;
        Ok(super::score_from_value(value.as_ref()))
    }
}
