use std::env;

use anyhow::{Context, Result, anyhow};

use bounce_terminal::board::{self, BoardConfig, SortDir, SortKey};
use bounce_terminal::bounce::{self, BounceStrategy};
use bounce_terminal::demo_feed;
use bounce_terminal::model::{EnrichedPlayerRow, GameRow, MINUTES_CODE, StatKey};
use bounce_terminal::schedule_fetch;
use bounce_terminal::stats_fetch;
use bounce_terminal::teams;

const USAGE: &str = "\
Usage:
  bounce_terminal --games
  bounce_terminal --home <team> --away <team> [options]
  bounce_terminal --game <gameId> [options]
  bounce_terminal --demo [--home <team> --away <team>] [options]

Teams accept full names (\"Boston Celtics\") or abbreviations (BOS).

Options:
  --game <id>         take both teams from today's scoreboard entry <id>
  --season <label>    season label, e.g. 2025-26 (default: current season)
  --last-n <games>    defense lookback window (default: DEFENSE_LAST_N or 10)
  --sort <key>        bounce | pts | reb | ast | player (default: player)
  --dir <asc|desc>    sort direction (default: desc for numeric keys)
  --query <text>      case-insensitive player name filter
  --role <pos>        exact listed-position filter, e.g. PG (default: All)
  --plain             rank on the plain bounce average instead of the
                      minutes/production weighted score
  --help              print this help
";

const DEMO_HOME: &str = "Boston Celtics";
const DEMO_AWAY: &str = "Los Angeles Lakers";

#[derive(Debug, Default)]
struct CliArgs {
    games: bool,
    demo: bool,
    plain: bool,
    help: bool,
    home: Option<String>,
    away: Option<String>,
    game: Option<String>,
    season: Option<String>,
    last_n: Option<u32>,
    sort: SortKey,
    dir: Option<SortDir>,
    query: String,
    role: String,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = parse_args()?;
    if args.help {
        print!("{USAGE}");
        return Ok(());
    }
    if args.games {
        return run_games();
    }
    run_board(args)
}

fn parse_args() -> Result<CliArgs> {
    let raw: Vec<String> = env::args().skip(1).collect();
    let mut out = CliArgs::default();
    let mut idx = 0;
    while idx < raw.len() {
        let arg = raw[idx].as_str();
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) => (f, Some(v)),
            None => (arg, None),
        };
        match flag {
            "--games" => out.games = true,
            "--demo" => out.demo = true,
            "--plain" => out.plain = true,
            "--help" | "-h" => out.help = true,
            "--home" => out.home = Some(flag_value(&raw, &mut idx, inline, flag)?),
            "--away" => out.away = Some(flag_value(&raw, &mut idx, inline, flag)?),
            "--game" => out.game = Some(flag_value(&raw, &mut idx, inline, flag)?),
            "--season" => out.season = Some(flag_value(&raw, &mut idx, inline, flag)?),
            "--last-n" => {
                let value = flag_value(&raw, &mut idx, inline, flag)?;
                let parsed: u32 = value
                    .trim()
                    .parse()
                    .with_context(|| format!("--last-n expects a number, got '{value}'"))?;
                out.last_n = Some(parsed.clamp(1, 82));
            }
            "--sort" => {
                let value = flag_value(&raw, &mut idx, inline, flag)?;
                out.sort = SortKey::parse(&value)
                    .ok_or_else(|| anyhow!("unknown sort key '{value}'"))?;
            }
            "--dir" => {
                let value = flag_value(&raw, &mut idx, inline, flag)?;
                out.dir = Some(
                    SortDir::parse(&value)
                        .ok_or_else(|| anyhow!("unknown sort direction '{value}'"))?,
                );
            }
            "--query" => out.query = flag_value(&raw, &mut idx, inline, flag)?,
            "--role" => out.role = flag_value(&raw, &mut idx, inline, flag)?,
            _ => {
                eprint!("{USAGE}");
                return Err(anyhow!("unknown flag '{arg}'"));
            }
        }
        idx += 1;
    }
    Ok(out)
}

fn flag_value(raw: &[String], idx: &mut usize, inline: Option<&str>, flag: &str) -> Result<String> {
    if let Some(v) = inline {
        return Ok(v.to_string());
    }
    *idx += 1;
    raw.get(*idx)
        .cloned()
        .ok_or_else(|| anyhow!("missing value for {flag}"))
}

fn run_games() -> Result<()> {
    println!(
        "[INFO] fetching today's games from {}",
        stats_fetch::api_base()
    );
    let games = schedule_fetch::fetch_today_games()?;
    if games.is_empty() {
        println!("no games scheduled today");
        return Ok(());
    }
    println!(
        "{:<11} {:>5} {:>6}   {}",
        "DATE (EST)", "EST", "ROME", "MATCHUP"
    );
    for game in &games {
        println!(
            "{:<11} {:>5} {:>6}   {} @ {}",
            game.start_date_est.as_deref().unwrap_or("-"),
            game.start_time_est.as_deref().unwrap_or("-"),
            game.start_time_rome.as_deref().unwrap_or("-"),
            team_label(&game.away_team, game.away_abbr.as_deref()),
            team_label(&game.home_team, game.home_abbr.as_deref()),
        );
    }
    Ok(())
}

fn team_label(name: &str, abbr: Option<&str>) -> String {
    if name.is_empty() {
        return abbr.unwrap_or("-").to_string();
    }
    match abbr {
        Some(abbr) if abbr != name => format!("{name} ({abbr})"),
        _ => name.to_string(),
    }
}

fn run_board(args: CliArgs) -> Result<()> {
    let mut home = args.home.as_deref().map(resolve_team);
    let mut away = args.away.as_deref().map(resolve_team);
    if let Some(game_id) = scoreboard_game_id(&args) {
        let game = find_scheduled_game(game_id)?;
        home = Some(game.home_team);
        away = Some(game.away_team);
    }
    let season = args
        .season
        .clone()
        .unwrap_or_else(stats_fetch::default_season);
    let last_n = args
        .last_n
        .unwrap_or_else(stats_fetch::default_defense_last_n);
    let strategy = if args.plain {
        BounceStrategy::PlainAverage
    } else {
        BounceStrategy::Weighted
    };

    let snapshot = if args.demo {
        let home = home.unwrap_or_else(|| DEMO_HOME.to_string());
        let away = away.unwrap_or_else(|| DEMO_AWAY.to_string());
        println!("[INFO] demo matchup {away} @ {home}, season {season}");
        demo_feed::demo_snapshot(&home, &away, &season, last_n)
    } else {
        let (Some(home), Some(away)) = (home, away) else {
            eprint!("{USAGE}");
            return Err(anyhow!(
                "--home and --away are required (or use --game / --demo)"
            ));
        };
        println!(
            "[INFO] fetching {away} @ {home}, season {season}, defense window {last_n}, api {}",
            stats_fetch::api_base()
        );
        let fetch = stats_fetch::fetch_match_snapshot(&home, &away, &season, last_n)?;
        for warn in &fetch.errors {
            eprintln!("[WARN] {warn}");
        }
        fetch.snapshot
    };

    let rows = bounce::enrich_players(&snapshot, strategy);
    let cfg = BoardConfig {
        sort_key: args.sort,
        dir: args.dir.unwrap_or(match args.sort {
            SortKey::Player => SortDir::Asc,
            _ => SortDir::Desc,
        }),
        query: args.query,
        role_filter: args.role,
    };
    let picked = board::ranked_rows(&rows, &cfg);

    print_board(&picked, &cfg);
    print_top_lists(&rows);
    Ok(())
}

fn resolve_team(input: &str) -> String {
    teams::team_for_abbr(input)
        .map(str::to_string)
        .unwrap_or_else(|| input.to_string())
}

// --game resolves teams from the live scoreboard, which demo mode never
// touches.
fn scoreboard_game_id(args: &CliArgs) -> Option<&str> {
    match (args.game.as_deref(), args.demo) {
        (Some(id), false) => Some(id),
        (Some(_), true) => {
            eprintln!("[WARN] --game is ignored with --demo; use --home/--away to pick demo teams");
            None
        }
        (None, _) => None,
    }
}

fn find_scheduled_game(game_id: &str) -> Result<GameRow> {
    let games = schedule_fetch::fetch_today_games()?;
    games
        .into_iter()
        .find(|g| g.game_id == game_id)
        .with_context(|| format!("game '{game_id}' is not on today's scoreboard (run --games)"))
}

fn print_board(rows: &[&EnrichedPlayerRow], cfg: &BoardConfig) {
    if rows.is_empty() {
        println!("no players match the current filters");
        return;
    }
    println!();
    println!(
        "{:<24} {:<5} {:<6} {:<5} {:<4} {:>5} {:>6} {:>6} {:>6} {:>7} {:>7} {:>7} {:>8}",
        "PLAYER",
        "TEAM",
        "POS",
        "ROLE",
        "SIDE",
        "MIN5",
        "PTS5",
        "REB5",
        "AST5",
        "B.PTS",
        "B.REB",
        "B.AST",
        "BOUNCE"
    );
    for row in rows {
        println!(
            "{:<24} {:<5} {:<6} {:<5} {:<4} {:>5} {:>6} {:>6} {:>6} {:>7.3} {:>7.3} {:>7.3} {:>8.3}",
            clip(&row.player, 24),
            row.team.as_deref().unwrap_or("-"),
            row.position.as_deref().unwrap_or("-"),
            row.role_bucket.as_str(),
            row.side.map(|s| s.as_str()).unwrap_or("-"),
            fmt_avg(row.last5(MINUTES_CODE)),
            fmt_avg(row.last5(StatKey::Pts.code())),
            fmt_avg(row.last5(StatKey::Reb.code())),
            fmt_avg(row.last5(StatKey::Ast.code())),
            row.bounce_score.pts,
            row.bounce_score.reb,
            row.bounce_score.ast,
            row.weighted_bounce,
        );
    }
    let dir = match cfg.dir {
        SortDir::Asc => "asc",
        SortDir::Desc => "desc",
    };
    println!(
        "({} players, sorted by {} {})",
        rows.len(),
        cfg.sort_key.as_str(),
        dir
    );
}

fn print_top_lists(rows: &[EnrichedPlayerRow]) {
    let tops = board::top_bounce_per_category(rows);
    println!();
    println!("Top bounce per category");
    for key in StatKey::ALL {
        println!("  {}:", key.code());
        for row in tops.get(key) {
            println!(
                "    {:<24} bounce {:>6.3}  weighted {:>6.3}",
                clip(&row.player, 24),
                *row.bounce_score.get(key),
                row.weighted_bounce,
            );
        }
    }
}

fn fmt_avg(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

fn clip(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return name.to_string();
    }
    let cut: String = name.chars().take(max.saturating_sub(2)).collect();
    format!("{cut}..")
}
