use std::collections::HashMap;
use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use reqwest::Url;
use serde::Deserialize;

use crate::http_cache::get_cached_text;
use crate::http_client::http_client;
use crate::model::{
    MatchSnapshot, PlayerStatSnapshot, PositionAllowance, Side, StatObservation,
    TeamDefenseProfile,
};
use crate::roles::RoleBucket;
use crate::teams;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
const DEFAULT_DEFENSE_LAST_N: u32 = 10;
const FETCH_ATTEMPTS: u32 = 3;
const RETRY_PAUSE_MS: u64 = 300;

/// A fetched matchup plus the warnings collected along the way. Defense
/// profiles degrade to `None` instead of failing the whole fetch.
pub struct SnapshotFetch {
    pub snapshot: MatchSnapshot,
    pub errors: Vec<String>,
}

pub fn api_base() -> String {
    env::var("STATS_API_BASE")
        .ok()
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

pub fn default_defense_last_n() -> u32 {
    env::var("DEFENSE_LAST_N")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_DEFENSE_LAST_N)
        .clamp(1, 82)
}

fn exclude_dnp() -> bool {
    let Some(raw) = env::var("EXCLUDE_DNP").ok() else {
        return true;
    };
    let v = raw.trim().to_ascii_lowercase();
    !(v == "0" || v == "false" || v == "no")
}

/// Season label for a given date. The league year rolls over in October:
/// 2026-11-01 plays in "2026-27", 2026-03-15 still in "2025-26".
pub fn season_for_date(date: NaiveDate) -> String {
    let year = date.year();
    if date.month() >= 10 {
        format!("{}-{:02}", year, (year + 1) % 100)
    } else {
        format!("{}-{:02}", year - 1, year % 100)
    }
}

pub fn default_season() -> String {
    season_for_date(Local::now().date_naive())
}

/// Fetch everything the engine needs for one matchup. A failed player
/// stats fetch is fatal; a failed or unresolvable defense fetch only
/// drops that side's profile and records a warning.
pub fn fetch_match_snapshot(
    home_team: &str,
    away_team: &str,
    season: &str,
    last_n: u32,
) -> Result<SnapshotFetch> {
    let mut errors = Vec::new();

    let url = stats_url(home_team, away_team, season)?;
    let raw = fetch_text_with_retry(url.as_str())
        .with_context(|| format!("player stats fetch failed for {home_team} vs {away_team}"))?;
    let players = parse_players_json(&raw)?;
    if players.is_empty() {
        errors.push(format!(
            "no eligible players returned for {home_team} vs {away_team}"
        ));
    }

    let home_abbr = teams::abbr_for_team(home_team);
    let away_abbr = teams::abbr_for_team(away_team);
    if home_abbr.is_none() {
        errors.push(format!("unknown home team '{home_team}', skipping defense profile"));
    }
    if away_abbr.is_none() {
        errors.push(format!("unknown away team '{away_team}', skipping defense profile"));
    }

    let (home_result, away_result) = with_fetch_pool(|| {
        rayon::join(
            || home_abbr.map(|abbr| fetch_defense_profile(abbr, season, last_n)),
            || away_abbr.map(|abbr| fetch_defense_profile(abbr, season, last_n)),
        )
    });
    let home_defense = settle_defense(home_result, "home", &mut errors);
    let away_defense = settle_defense(away_result, "away", &mut errors);

    Ok(SnapshotFetch {
        snapshot: MatchSnapshot {
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
            season: season.to_string(),
            last_n,
            players,
            home_defense,
            away_defense,
        },
        errors,
    })
}

fn settle_defense(
    result: Option<Result<TeamDefenseProfile>>,
    side: &str,
    errors: &mut Vec<String>,
) -> Option<TeamDefenseProfile> {
    match result {
        Some(Ok(profile)) => Some(profile),
        Some(Err(err)) => {
            errors.push(format!("{side} defense fetch failed: {err}"));
            None
        }
        None => None,
    }
}

fn stats_url(home: &str, away: &str, season: &str) -> Result<Url> {
    Url::parse_with_params(
        &format!("{}/stats", api_base()),
        &[("home", home), ("away", away), ("season", season)],
    )
    .context("invalid player stats url")
}

fn fetch_defense_profile(abbr: &str, season: &str, last_n: u32) -> Result<TeamDefenseProfile> {
    let mut params = vec![
        ("team", abbr.to_string()),
        ("season", season.to_string()),
        ("last_n", last_n.to_string()),
    ];
    if !exclude_dnp() {
        params.push(("exclude_dnp", "false".to_string()));
    }
    let url = Url::parse_with_params(&format!("{}/team-defense", api_base()), &params)
        .context("invalid team defense url")?;
    let raw = fetch_text_with_retry(url.as_str())?;
    parse_defense_json(&raw).with_context(|| format!("defense profile parse failed for {abbr}"))
}

/// GET with the standard retry policy. Shared by every backend endpoint.
pub fn fetch_text_with_retry(url: &str) -> Result<String> {
    let client = http_client()?;
    let mut last_err = None;
    for attempt in 0..FETCH_ATTEMPTS {
        match get_cached_text(client, url) {
            Ok(body) => return Ok(body),
            Err(err) => {
                last_err = Some(err);
                if attempt + 1 < FETCH_ATTEMPTS {
                    std::thread::sleep(Duration::from_millis(RETRY_PAUSE_MS));
                }
            }
        }
    }
    Err(last_err.unwrap_or_else(|| anyhow::anyhow!("fetch failed")))
}

/// Parse the `/stats` payload. An empty or `null` body is an empty slate,
/// not an error.
pub fn parse_players_json(raw: &str) -> Result<Vec<PlayerStatSnapshot>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<RawPlayerRow> =
        serde_json::from_str(trimmed).context("invalid player stats json")?;
    Ok(rows.into_iter().map(player_from_raw).collect())
}

fn player_from_raw(raw: RawPlayerRow) -> PlayerStatSnapshot {
    let stats: HashMap<String, StatObservation> = raw
        .stats
        .into_iter()
        .map(|(code, obs)| {
            (
                code.trim().to_uppercase(),
                StatObservation {
                    value: obs.value,
                    last5_avg: obs.last5_avg,
                },
            )
        })
        .collect();
    // The backend reports full franchise names here; the board displays
    // abbreviations, so resolve them up front and pass through anything
    // the table does not know.
    let team = raw
        .team
        .filter(|t| !t.trim().is_empty())
        .map(|t| match teams::abbr_for_team(&t) {
            Some(abbr) => abbr.to_string(),
            None => t,
        });
    PlayerStatSnapshot {
        player: raw.player,
        team,
        side: raw.side.as_deref().and_then(Side::from_str),
        position: raw.position.filter(|p| !p.trim().is_empty()),
        stats,
    }
}

/// Parse the `/team-defense` payload. Unknown bucket keys and the extra
/// diagnostic fields the backend attaches are dropped silently.
pub fn parse_defense_json(raw: &str) -> Result<TeamDefenseProfile> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(TeamDefenseProfile::default());
    }
    let parsed: RawDefenseProfile =
        serde_json::from_str(trimmed).context("invalid team defense json")?;
    let by_position = parsed.by_position_per_game.map(|buckets| {
        buckets
            .into_iter()
            .filter_map(|(code, allow)| {
                RoleBucket::from_code(&code).map(|bucket| {
                    (
                        bucket,
                        PositionAllowance {
                            pts_per_game: allow.pts_per_game,
                            reb_per_game: allow.reb_per_game,
                            ast_per_game: allow.ast_per_game,
                            games_scanned: allow.games_scanned,
                        },
                    )
                })
            })
            .collect::<HashMap<_, _>>()
    });
    Ok(TeamDefenseProfile {
        target_team_abbr: parsed.target_team_abbr,
        season: parsed.season,
        by_position_per_game: by_position,
    })
}

fn with_fetch_pool<T>(action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    let threads = fetch_parallelism();
    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

fn fetch_parallelism() -> usize {
    env::var("FETCH_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())
        .unwrap_or(4)
        .clamp(2, 32)
}

#[derive(Debug, Deserialize)]
struct RawPlayerRow {
    player: String,
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    side: Option<String>,
    #[serde(default)]
    position: Option<String>,
    #[serde(default)]
    stats: HashMap<String, RawObservation>,
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    last5_avg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDefenseProfile {
    #[serde(default)]
    target_team_abbr: Option<String>,
    #[serde(default)]
    season: Option<String>,
    #[serde(default)]
    by_position_per_game: Option<HashMap<String, RawAllowance>>,
}

#[derive(Debug, Deserialize)]
struct RawAllowance {
    #[serde(default)]
    pts_per_game: Option<f64>,
    #[serde(default)]
    reb_per_game: Option<f64>,
    #[serde(default)]
    ast_per_game: Option<f64>,
    #[serde(default)]
    games_scanned: Option<u32>,
}
