use std::collections::HashMap;

use rand::Rng;

use crate::model::{
    MatchSnapshot, PlayerStatSnapshot, PositionAllowance, Side, StatObservation,
    TeamDefenseProfile,
};
use crate::roles::RoleBucket;
use crate::teams;

// Nine-man rotations with a spread of listed positions, including the
// hyphenated and blank forms the classifier has to cope with.
const HOME_ROSTER: &[(&str, &str)] = &[
    ("Avery Cole", "PG"),
    ("Jalen Brooks", "SG"),
    ("Marcus Webb", "PG-SG"),
    ("Theo Grant", "SF"),
    ("Darius Mills", "PF"),
    ("Cam Whitfield", "SF-PF"),
    ("Noah Okafor", "C"),
    ("Reggie Lane", "G"),
    ("Emeka Obi", ""),
];
const AWAY_ROSTER: &[(&str, &str)] = &[
    ("Zion Parks", "PG"),
    ("Tyrese Hall", "SG"),
    ("Kofi Mensah", "SF"),
    ("Luka Petrov", "PF"),
    ("Andre Boakye", "C"),
    ("Miles Turner Jr", "C-PF"),
    ("Devin Cross", "SG-SF"),
    ("Rashad King", "F"),
    ("Ivan Sola", "PF-C"),
];

/// Build a full offline snapshot with plausible stat lines on both sides.
/// Shapes match what the fetch layer would return; values are random, so
/// this is for running the board without a backend, not for tests.
pub fn demo_snapshot(home_team: &str, away_team: &str, season: &str, last_n: u32) -> MatchSnapshot {
    let mut rng = rand::thread_rng();
    let mut players = Vec::new();
    for (name, pos) in HOME_ROSTER {
        players.push(demo_player(name, pos, Side::Home, home_team, &mut rng));
    }
    for (name, pos) in AWAY_ROSTER {
        players.push(demo_player(name, pos, Side::Away, away_team, &mut rng));
    }
    MatchSnapshot {
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        season: season.to_string(),
        last_n,
        players,
        home_defense: Some(demo_defense(home_team, season, last_n, &mut rng)),
        away_defense: Some(demo_defense(away_team, season, last_n, &mut rng)),
    }
}

fn demo_player(
    name: &str,
    pos: &str,
    side: Side,
    team: &str,
    rng: &mut impl Rng,
) -> PlayerStatSnapshot {
    let minutes = rng.gen_range(20.0..37.0);
    let pts_avg = rng.gen_range(8.0..28.0);
    let reb_avg = rng.gen_range(2.0..12.0);
    let ast_avg = rng.gen_range(1.0..9.0);

    let mut stats = HashMap::new();
    stats.insert("MIN".to_string(), observation(minutes, rng));
    stats.insert("PTS".to_string(), observation(pts_avg, rng));
    stats.insert("REB".to_string(), observation(reb_avg, rng));
    stats.insert("AST".to_string(), observation(ast_avg, rng));

    PlayerStatSnapshot {
        player: name.to_string(),
        team: teams::abbr_for_team(team)
            .map(|a| a.to_string())
            .or_else(|| Some(team.to_string())),
        side: Some(side),
        position: if pos.is_empty() {
            None
        } else {
            Some(pos.to_string())
        },
        stats,
    }
}

// Latest game lands between a bad night and a hot one, so some categories
// come out under the average and some over.
fn observation(avg: f64, rng: &mut impl Rng) -> StatObservation {
    let value = (avg * rng.gen_range(0.55..1.35)).round();
    StatObservation {
        value: Some(value),
        last5_avg: Some(round1(avg)),
    }
}

fn demo_defense(
    team: &str,
    season: &str,
    last_n: u32,
    rng: &mut impl Rng,
) -> TeamDefenseProfile {
    let mut by_position = HashMap::new();
    by_position.insert(
        RoleBucket::G,
        allowance(rng, 20.0..27.0, 6.0..9.5, 9.0..13.0, last_n),
    );
    by_position.insert(
        RoleBucket::F,
        allowance(rng, 17.0..24.0, 11.0..16.0, 5.0..8.0, last_n),
    );
    by_position.insert(
        RoleBucket::C,
        allowance(rng, 13.0..20.0, 12.0..18.0, 2.5..6.0, last_n),
    );
    // The OTHER bucket is sparse in real profiles; leave it out half the
    // time so the cross-bucket mean path sees both shapes.
    if rng.gen_bool(0.5) {
        by_position.insert(
            RoleBucket::Other,
            allowance(rng, 2.0..8.0, 1.0..4.0, 0.5..3.0, last_n),
        );
    }

    TeamDefenseProfile {
        target_team_abbr: teams::abbr_for_team(team).map(|a| a.to_string()),
        season: Some(season.to_string()),
        by_position_per_game: Some(by_position),
    }
}

fn allowance(
    rng: &mut impl Rng,
    pts: std::ops::Range<f64>,
    reb: std::ops::Range<f64>,
    ast: std::ops::Range<f64>,
    last_n: u32,
) -> PositionAllowance {
    PositionAllowance {
        pts_per_game: Some(round1(rng.gen_range(pts))),
        reb_per_game: Some(round1(rng.gen_range(reb))),
        ast_per_game: Some(round1(rng.gen_range(ast))),
        games_scanned: Some(last_n),
    }
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
