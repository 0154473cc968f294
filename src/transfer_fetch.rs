use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_cache::{fetch_json_cached, invalidate};
use crate::http_client::http_client;
use crate::model::{Transfer, parse_collection_json};
use crate::sample_feed;

const DEFAULT_API_BASE: &str = "https://transfermarkt-api.vercel.app";

pub const DEFAULT_LEAGUE_ID: &str = "GB1";

fn api_base() -> String {
    std::env::var("TRANSFER_API_BASE")
        .ok()
        .filter(|base| !base.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

fn cache_max_age() -> u64 {
    std::env::var("TRANSFER_CACHE_SECS")
        .ok()
        .and_then(|val| val.parse::<u64>().ok())
        .unwrap_or(900)
        .clamp(60, 86_400)
}

fn transfers_url(league_id: &str, season: &str) -> String {
    format!(
        "{}/transfers?league_id={league_id}&season={season}",
        api_base()
    )
}

/// Fetch and normalize the transfer window for one league and season.
pub fn fetch_transfers(league_id: &str, season: &str) -> Result<Vec<Transfer>> {
    let client = http_client()?;
    let body = fetch_json_cached(client, &transfers_url(league_id, season), cache_max_age())
        .context("transfers request failed")?;
    parse_collection_json(&body)
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PlayerProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub market_value: Option<f64>,
}

pub fn fetch_player_profile(player_id: &str) -> Result<PlayerProfile> {
    let client = http_client()?;
    let url = format!("{}/players/{player_id}", api_base());
    let body =
        fetch_json_cached(client, &url, cache_max_age()).context("player request failed")?;
    serde_json::from_str(&body).context("invalid player json")
}

/// Drop the cached window for one league/season so the next load refetches.
pub fn invalidate_transfers(league_id: &str, season: &str) {
    invalidate(&transfers_url(league_id, season));
}

/// Acquisition entry point for the session: always yields a loadable
/// collection. A failed fetch or unrecognizable payload falls back to the
/// synthetic sample window and reports what happened alongside it.
pub fn load_or_sample(league_id: &str, season: &str) -> (Vec<Transfer>, Option<String>) {
    match fetch_transfers(league_id, season) {
        Ok(transfers) if !transfers.is_empty() => (transfers, None),
        Ok(_) => (
            sample_feed::sample_transfers(season),
            Some(format!(
                "[WARN] No transfers published for {league_id} {season}, showing sample window"
            )),
        ),
        Err(err) => (
            sample_feed::sample_transfers(season),
            Some(format!("[WARN] Transfer fetch failed ({err}), showing sample window")),
        ),
    }
}
