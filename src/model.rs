use std::collections::HashMap;

use crate::roles::RoleBucket;

/// Which team a player belongs to within one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }

    pub fn from_str(raw: &str) -> Option<Side> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "home" => Some(Side::Home),
            "away" => Some(Side::Away),
            _ => None,
        }
    }
}

/// The three categories the bounce engine scores. Minutes (`MIN`) stay a
/// plain stats-map entry because they feed weighting, not scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKey {
    Pts,
    Reb,
    Ast,
}

impl StatKey {
    pub const ALL: [StatKey; 3] = [StatKey::Pts, StatKey::Reb, StatKey::Ast];

    pub fn code(&self) -> &'static str {
        match self {
            StatKey::Pts => "PTS",
            StatKey::Reb => "REB",
            StatKey::Ast => "AST",
        }
    }
}

pub const MINUTES_CODE: &str = "MIN";

/// One value per scored category. Most derived per-player figures
/// (deviation, ratio, bounce) come in this shape.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PerCategory<T> {
    pub pts: T,
    pub reb: T,
    pub ast: T,
}

impl<T> PerCategory<T> {
    pub fn from_fn(mut f: impl FnMut(StatKey) -> T) -> Self {
        PerCategory {
            pts: f(StatKey::Pts),
            reb: f(StatKey::Reb),
            ast: f(StatKey::Ast),
        }
    }

    pub fn get(&self, key: StatKey) -> &T {
        match key {
            StatKey::Pts => &self.pts,
            StatKey::Reb => &self.reb,
            StatKey::Ast => &self.ast,
        }
    }
}

/// Most recent game result plus the trailing five-game average that
/// preceded it. Either side can be missing; arithmetic applies defaults at
/// the point of use, never here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatObservation {
    pub value: Option<f64>,
    pub last5_avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStatSnapshot {
    pub player: String,
    pub team: Option<String>,
    pub side: Option<Side>,
    pub position: Option<String>,
    pub stats: HashMap<String, StatObservation>,
}

impl PlayerStatSnapshot {
    pub fn observation(&self, code: &str) -> Option<&StatObservation> {
        self.stats.get(code)
    }

    pub fn last5(&self, code: &str) -> Option<f64> {
        self.stats.get(code).and_then(|o| o.last5_avg)
    }

    pub fn latest(&self, code: &str) -> Option<f64> {
        self.stats.get(code).and_then(|o| o.value)
    }
}

/// Average stats an opposing defense concedes to one role bucket.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositionAllowance {
    pub pts_per_game: Option<f64>,
    pub reb_per_game: Option<f64>,
    pub ast_per_game: Option<f64>,
    pub games_scanned: Option<u32>,
}

impl PositionAllowance {
    pub fn per_game(&self, key: StatKey) -> Option<f64> {
        match key {
            StatKey::Pts => self.pts_per_game,
            StatKey::Reb => self.reb_per_game,
            StatKey::Ast => self.ast_per_game,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamDefenseProfile {
    pub target_team_abbr: Option<String>,
    pub season: Option<String>,
    pub by_position_per_game: Option<HashMap<RoleBucket, PositionAllowance>>,
}

impl TeamDefenseProfile {
    pub fn allowance(&self, bucket: RoleBucket) -> Option<&PositionAllowance> {
        self.by_position_per_game.as_ref().and_then(|m| m.get(&bucket))
    }
}

/// Everything the engine needs for one matchup, assembled by the fetch
/// layer. A missing defense profile is valid input (neutral ratios).
#[derive(Debug, Clone, PartialEq)]
pub struct MatchSnapshot {
    pub home_team: String,
    pub away_team: String,
    pub season: String,
    pub last_n: u32,
    pub players: Vec<PlayerStatSnapshot>,
    pub home_defense: Option<TeamDefenseProfile>,
    pub away_defense: Option<TeamDefenseProfile>,
}

/// A player snapshot plus every derived figure the board displays. Built
/// fresh on each enrichment pass; the source snapshot is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedPlayerRow {
    pub player: String,
    pub team: Option<String>,
    pub side: Option<Side>,
    pub position: Option<String>,
    pub role_bucket: RoleBucket,
    pub stats: HashMap<String, StatObservation>,
    pub under_pct: PerCategory<f64>,
    pub opp_role_allow: PerCategory<Option<f64>>,
    pub opp_ratio: PerCategory<f64>,
    pub bounce_score: PerCategory<f64>,
    pub weighted_bounce: f64,
}

impl EnrichedPlayerRow {
    pub fn last5(&self, code: &str) -> Option<f64> {
        self.stats.get(code).and_then(|o| o.last5_avg)
    }

    pub fn latest(&self, code: &str) -> Option<f64> {
        self.stats.get(code).and_then(|o| o.value)
    }
}

/// One scheduled game from today's scoreboard. Times come pre-formatted
/// from the backend in both EST and Rome local time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameRow {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_abbr: Option<String>,
    pub away_abbr: Option<String>,
    pub start_time_est: Option<String>,
    pub start_date_est: Option<String>,
    pub start_time_rome: Option<String>,
    pub start_date_rome: Option<String>,
    pub start_iso_est: Option<String>,
}
