use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::GameRow;
use crate::stats_fetch;

/// Today's slate from the stats backend. Row order is the backend's
/// scoreboard order.
pub fn fetch_today_games() -> Result<Vec<GameRow>> {
    let url = format!("{}/matches", stats_fetch::api_base());
    let raw = stats_fetch::fetch_text_with_retry(&url).context("scoreboard fetch failed")?;
    parse_scoreboard_json(&raw)
}

pub fn parse_scoreboard_json(raw: &str) -> Result<Vec<GameRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<RawGameRow> = serde_json::from_str(trimmed).context("invalid scoreboard json")?;
    Ok(rows
        .into_iter()
        .map(|raw| GameRow {
            game_id: raw.game_id.unwrap_or_default(),
            home_team: raw.home_team.unwrap_or_default(),
            away_team: raw.away_team.unwrap_or_default(),
            home_abbr: raw.home_abbr,
            away_abbr: raw.away_abbr,
            start_time_est: raw.start_time_est,
            start_date_est: raw.start_date_est,
            start_time_rome: raw.start_time_rome,
            start_date_rome: raw.start_date_rome,
            start_iso_est: raw.start_iso_est,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct RawGameRow {
    #[serde(rename = "gameId", default)]
    game_id: Option<String>,
    #[serde(default)]
    home_team: Option<String>,
    #[serde(default)]
    away_team: Option<String>,
    #[serde(default)]
    home_abbr: Option<String>,
    #[serde(default)]
    away_abbr: Option<String>,
    #[serde(default)]
    start_time_est: Option<String>,
    #[serde(default)]
    start_date_est: Option<String>,
    #[serde(default)]
    start_time_rome: Option<String>,
    #[serde(default)]
    start_date_rome: Option<String>,
    #[serde(default)]
    start_iso_est: Option<String>,
}
