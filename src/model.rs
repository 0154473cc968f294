use anyhow::{Result, bail};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const UNKNOWN_PLAYER: &str = "Unknown Player";
pub const UNKNOWN_POSITION: &str = "Unknown";
pub const UNKNOWN_NATIONALITY: &str = "Unknown";
pub const UNKNOWN_CLUB: &str = "Unknown Club";
pub const UNKNOWN_LEAGUE: &str = "Unknown League";
pub const DEFAULT_CURRENCY: &str = "EUR";
pub const DEFAULT_TRANSFER_TYPE: &str = "Permanent";
pub const DEFAULT_SEASON: &str = "2025";

/// One completed player move between two clubs. Every field is populated by
/// the normalizer, so downstream code never deals with missing values.
/// Fees and market values are in millions of `transfer_fee_currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub player_id: String,
    pub player_name: String,
    pub player_age: u32,
    pub player_position: String,
    pub player_nationality: String,
    pub from_club_id: String,
    pub from_club_name: String,
    pub from_club_league: String,
    pub to_club_id: String,
    pub to_club_name: String,
    pub to_club_league: String,
    pub transfer_fee: f64,
    pub transfer_fee_currency: String,
    pub transfer_date: String,
    pub transfer_type: String,
    pub season: String,
    pub market_value: f64,
}

impl Transfer {
    /// Calendar date of the move, if the stored text parses.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_transfer_date(&self.transfer_date)
    }
}

/// Parse a collection payload. Accepts a bare array of raw records, an object
/// with a `transfers` array, or the full snapshot document (which also carries
/// `metadata` and `summary`). Anything else is a hard error; individual
/// records never fail to normalize.
pub fn parse_collection_json(raw: &str) -> Result<Vec<Transfer>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        bail!("transfer payload is empty");
    }
    let root: Value = serde_json::from_str(trimmed)
        .map_err(|err| anyhow::anyhow!("invalid transfer payload json: {err}"))?;
    transfers_from_value(&root)
}

pub fn transfers_from_value(root: &Value) -> Result<Vec<Transfer>> {
    let rows = match root {
        Value::Array(rows) => rows,
        Value::Object(map) => match map.get("transfers") {
            Some(Value::Array(rows)) => rows,
            _ => bail!("transfer payload object has no `transfers` array"),
        },
        other => bail!("transfer payload is not a collection: {other}"),
    };
    Ok(rows.iter().map(normalize_record).collect())
}

/// Total normalization of a single raw record. Understands both the nested
/// upstream shape (`player`/`from_club`/`to_club` sub-objects with a textual
/// `fee`) and the flat snapshot shape; every missing or malformed field falls
/// back to its documented default.
pub fn normalize_record(raw: &Value) -> Transfer {
    let player = raw.get("player");
    let from_club = raw.get("from_club");
    let to_club = raw.get("to_club");

    let transfer_fee = pick_number(raw, &["transfer_fee"])
        .or_else(|| pick_text(raw, &["fee"]).map(|text| parse_fee_text(&text)))
        .unwrap_or(0.0)
        .max(0.0);
    let market_value = pick_number(raw, &["market_value"])
        .or_else(|| nested_number(player, "market_value"))
        .unwrap_or(0.0)
        .max(0.0);
    let age = pick_number(raw, &["player_age"])
        .or_else(|| nested_number(player, "age"))
        .filter(|v| *v >= 0.0)
        .map(|v| v as u32)
        .unwrap_or(0);

    Transfer {
        player_id: string_field(raw, player, &["player_id"], "id", ""),
        player_name: string_field(raw, player, &["player_name"], "name", UNKNOWN_PLAYER),
        player_age: age,
        player_position: string_field(raw, player, &["player_position"], "position", UNKNOWN_POSITION),
        player_nationality: string_field(
            raw,
            player,
            &["player_nationality"],
            "nationality",
            UNKNOWN_NATIONALITY,
        ),
        from_club_id: string_field(raw, from_club, &["from_club_id"], "id", ""),
        from_club_name: string_field(raw, from_club, &["from_club_name"], "name", UNKNOWN_CLUB),
        from_club_league: string_field(raw, from_club, &["from_club_league"], "league", UNKNOWN_LEAGUE),
        to_club_id: string_field(raw, to_club, &["to_club_id"], "id", ""),
        to_club_name: string_field(raw, to_club, &["to_club_name"], "name", UNKNOWN_CLUB),
        to_club_league: string_field(raw, to_club, &["to_club_league"], "league", UNKNOWN_LEAGUE),
        transfer_fee,
        transfer_fee_currency: string_field(
            raw,
            None,
            &["transfer_fee_currency", "fee_currency"],
            "",
            DEFAULT_CURRENCY,
        ),
        transfer_date: string_field(raw, None, &["transfer_date", "date"], "", &today()),
        transfer_type: string_field(raw, None, &["transfer_type", "type"], "", DEFAULT_TRANSFER_TYPE),
        season: string_field(raw, None, &["season"], "", DEFAULT_SEASON),
        market_value,
    }
}

/// Fee text as published upstream: "€100M", "£40.5M", "800K", "12000000",
/// or one of the no-fee sentinels. Unparsable text is a free transfer.
pub fn parse_fee_text(raw: &str) -> f64 {
    let lowered = raw.trim().to_lowercase();
    if lowered.is_empty() || matches!(lowered.as_str(), "free" | "free transfer" | "loan" | "-") {
        return 0.0;
    }
    let cleaned: String = lowered
        .chars()
        .filter(|c| !matches!(c, '€' | '£' | '$') && !c.is_whitespace())
        .collect();
    let parsed = if let Some(body) = cleaned.strip_suffix('m') {
        body.parse::<f64>().ok()
    } else if let Some(body) = cleaned.strip_suffix('k') {
        body.parse::<f64>().ok().map(|v| v / 1_000.0)
    } else {
        // Plain numbers are absolute amounts, convert to millions.
        cleaned.parse::<f64>().ok().map(|v| v / 1_000_000.0)
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
}

/// Dates arrive in a handful of formats; an ISO date (optionally with a time
/// part) is the common case. Unparsable text yields `None`, which filtering
/// treats as satisfying every date bound.
pub fn parse_transfer_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let head = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%d.%m.%Y"))
        .or_else(|_| NaiveDate::parse_from_str(head, "%d/%m/%Y"))
        .ok()
}

fn today() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

fn string_field(
    raw: &Value,
    nested: Option<&Value>,
    flat_keys: &[&str],
    nested_key: &str,
    default: &str,
) -> String {
    for key in flat_keys {
        if let Some(text) = value_to_text(raw.get(*key)) {
            return text;
        }
    }
    if !nested_key.is_empty() {
        if let Some(text) = value_to_text(nested.and_then(|v| v.get(nested_key))) {
            return text;
        }
    }
    default.to_string()
}

fn value_to_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn pick_text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match raw.get(*key) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    })
}

fn pick_number(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| coerce_number(raw.get(*key)))
}

fn nested_number(nested: Option<&Value>, key: &str) -> Option<f64> {
    coerce_number(nested.and_then(|v| v.get(key)))
}

fn coerce_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fee_text_covers_upstream_formats() {
        assert_eq!(parse_fee_text("€100M"), 100.0);
        assert_eq!(parse_fee_text("£40.5M"), 40.5);
        assert_eq!(parse_fee_text("800K"), 0.8);
        assert_eq!(parse_fee_text("12000000"), 12.0);
        assert_eq!(parse_fee_text("Free transfer"), 0.0);
        assert_eq!(parse_fee_text("loan"), 0.0);
        assert_eq!(parse_fee_text("-"), 0.0);
        assert_eq!(parse_fee_text("tbd"), 0.0);
    }

    #[test]
    fn transfer_date_accepts_iso_and_dotted() {
        assert!(parse_transfer_date("2025-07-01").is_some());
        assert!(parse_transfer_date("2025-07-01T12:30:00Z").is_some());
        assert!(parse_transfer_date("01.07.2025").is_some());
        assert!(parse_transfer_date("summer window").is_none());
        assert!(parse_transfer_date("").is_none());
    }

    #[test]
    fn empty_record_gets_all_defaults() {
        let t = normalize_record(&json!({}));
        assert_eq!(t.player_name, UNKNOWN_PLAYER);
        assert_eq!(t.player_age, 0);
        assert_eq!(t.from_club_name, UNKNOWN_CLUB);
        assert_eq!(t.to_club_league, UNKNOWN_LEAGUE);
        assert_eq!(t.transfer_fee, 0.0);
        assert_eq!(t.transfer_fee_currency, DEFAULT_CURRENCY);
        assert_eq!(t.transfer_type, DEFAULT_TRANSFER_TYPE);
        assert_eq!(t.season, DEFAULT_SEASON);
        assert!(!t.transfer_date.is_empty());
    }

    #[test]
    fn nested_record_is_flattened() {
        let t = normalize_record(&json!({
            "player": {"id": 42, "name": "K. Rook", "age": "23", "position": "Forward",
                        "nationality": "Brazil", "market_value": 35.0},
            "from_club": {"id": "c1", "name": "Alpha FC", "league": "Serie A"},
            "to_club": {"id": "c2", "name": "Omega United", "league": "Premier League"},
            "fee": "€55M",
            "date": "2025-08-02",
            "type": "Permanent",
            "season": "2025"
        }));
        assert_eq!(t.player_id, "42");
        assert_eq!(t.player_age, 23);
        assert_eq!(t.player_nationality, "Brazil");
        assert_eq!(t.transfer_fee, 55.0);
        assert_eq!(t.market_value, 35.0);
        assert_eq!(t.from_club_league, "Serie A");
        assert_eq!(t.to_club_name, "Omega United");
    }

    #[test]
    fn malformed_numeric_fields_default_to_zero() {
        let t = normalize_record(&json!({
            "player_name": "J. Nox",
            "player_age": "twenty",
            "transfer_fee": "n/a",
            "market_value": {"raw": 10},
        }));
        assert_eq!(t.player_age, 0);
        assert_eq!(t.transfer_fee, 0.0);
        assert_eq!(t.market_value, 0.0);
    }

    #[test]
    fn scalar_payload_is_rejected() {
        assert!(parse_collection_json("3").is_err());
        assert!(parse_collection_json("\"transfers\"").is_err());
        assert!(parse_collection_json("{\"total\": 2}").is_err());
        assert!(parse_collection_json("null").is_err());
    }
}
