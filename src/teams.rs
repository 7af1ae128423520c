use std::collections::HashMap;

use once_cell::sync::Lazy;

/// One league franchise, named the way the stats backend reports it.
#[derive(Debug, Clone, Copy)]
pub struct TeamInfo {
    pub full_name: &'static str,
    pub abbr: &'static str,
}

pub const NBA_TEAMS: &[TeamInfo] = &[
    TeamInfo {
        full_name: "Atlanta Hawks",
        abbr: "ATL",
    },
    TeamInfo {
        full_name: "Boston Celtics",
        abbr: "BOS",
    },
    TeamInfo {
        full_name: "Brooklyn Nets",
        abbr: "BKN",
    },
    TeamInfo {
        full_name: "Charlotte Hornets",
        abbr: "CHA",
    },
    TeamInfo {
        full_name: "Chicago Bulls",
        abbr: "CHI",
    },
    TeamInfo {
        full_name: "Cleveland Cavaliers",
        abbr: "CLE",
    },
    TeamInfo {
        full_name: "Dallas Mavericks",
        abbr: "DAL",
    },
    TeamInfo {
        full_name: "Denver Nuggets",
        abbr: "DEN",
    },
    TeamInfo {
        full_name: "Detroit Pistons",
        abbr: "DET",
    },
    TeamInfo {
        full_name: "Golden State Warriors",
        abbr: "GSW",
    },
    TeamInfo {
        full_name: "Houston Rockets",
        abbr: "HOU",
    },
    TeamInfo {
        full_name: "Indiana Pacers",
        abbr: "IND",
    },
    TeamInfo {
        full_name: "Los Angeles Clippers",
        abbr: "LAC",
    },
    TeamInfo {
        full_name: "Los Angeles Lakers",
        abbr: "LAL",
    },
    TeamInfo {
        full_name: "Memphis Grizzlies",
        abbr: "MEM",
    },
    TeamInfo {
        full_name: "Miami Heat",
        abbr: "MIA",
    },
    TeamInfo {
        full_name: "Milwaukee Bucks",
        abbr: "MIL",
    },
    TeamInfo {
        full_name: "Minnesota Timberwolves",
        abbr: "MIN",
    },
    TeamInfo {
        full_name: "New Orleans Pelicans",
        abbr: "NOP",
    },
    TeamInfo {
        full_name: "New York Knicks",
        abbr: "NYK",
    },
    TeamInfo {
        full_name: "Oklahoma City Thunder",
        abbr: "OKC",
    },
    TeamInfo {
        full_name: "Orlando Magic",
        abbr: "ORL",
    },
    TeamInfo {
        full_name: "Philadelphia 76ers",
        abbr: "PHI",
    },
    TeamInfo {
        full_name: "Phoenix Suns",
        abbr: "PHX",
    },
    TeamInfo {
        full_name: "Portland Trail Blazers",
        abbr: "POR",
    },
    TeamInfo {
        full_name: "Sacramento Kings",
        abbr: "SAC",
    },
    TeamInfo {
        full_name: "San Antonio Spurs",
        abbr: "SAS",
    },
    TeamInfo {
        full_name: "Toronto Raptors",
        abbr: "TOR",
    },
    TeamInfo {
        full_name: "Utah Jazz",
        abbr: "UTA",
    },
    TeamInfo {
        full_name: "Washington Wizards",
        abbr: "WAS",
    },
];

static ABBR_BY_NAME: Lazy<HashMap<String, &'static str>> = Lazy::new(|| {
    NBA_TEAMS
        .iter()
        .map(|t| (t.full_name.to_lowercase(), t.abbr))
        .collect()
});

static NAME_BY_ABBR: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| NBA_TEAMS.iter().map(|t| (t.abbr, t.full_name)).collect());

/// Abbreviation for a full franchise name, case-insensitively. Unknown
/// names yield None; callers skip that side's defense lookup and the
/// ratios stay neutral.
pub fn abbr_for_team(full_name: &str) -> Option<&'static str> {
    ABBR_BY_NAME.get(&full_name.trim().to_lowercase()).copied()
}

pub fn team_for_abbr(abbr: &str) -> Option<&'static str> {
    NAME_BY_ABBR
        .get(abbr.trim().to_uppercase().as_str())
        .copied()
}
