use std::collections::{HashMap, HashSet};

use bounce_terminal::board::{self, BoardConfig, SortDir, SortKey};
use bounce_terminal::model::{EnrichedPlayerRow, PerCategory, StatObservation};
use bounce_terminal::roles::RoleBucket;

fn row(
    name: &str,
    position: Option<&str>,
    pts_avg: Option<f64>,
    bounce_pts: f64,
    weighted: f64,
) -> EnrichedPlayerRow {
    let mut stats = HashMap::new();
    if let Some(avg) = pts_avg {
        stats.insert(
            "PTS".to_string(),
            StatObservation {
                value: None,
                last5_avg: Some(avg),
            },
        );
    }
    EnrichedPlayerRow {
        player: name.to_string(),
        team: None,
        side: None,
        position: position.map(str::to_string),
        role_bucket: RoleBucket::Other,
        stats,
        under_pct: PerCategory::default(),
        opp_role_allow: PerCategory::default(),
        opp_ratio: PerCategory::default(),
        bounce_score: PerCategory {
            pts: bounce_pts,
            reb: 0.0,
            ast: 0.0,
        },
        weighted_bounce: weighted,
    }
}

fn cfg(sort_key: SortKey, dir: SortDir) -> BoardConfig {
    BoardConfig {
        sort_key,
        dir,
        query: String::new(),
        role_filter: String::new(),
    }
}

fn names(ranked: &[&EnrichedPlayerRow]) -> Vec<String> {
    ranked.iter().map(|r| r.player.clone()).collect()
}

#[test]
fn default_player_sort_ignores_case() {
    let rows = vec![
        row("zeke", None, None, 0.0, 0.0),
        row("Alice", None, None, 0.0, 0.0),
        row("bob", None, None, 0.0, 0.0),
    ];
    let ranked = board::ranked_rows(&rows, &cfg(SortKey::Player, SortDir::Asc));
    assert_eq!(names(&ranked), ["Alice", "bob", "zeke"]);
}

#[test]
fn missing_average_sorts_last_in_descending_order() {
    let rows = vec![
        row("No Avg", None, None, 0.0, 0.0),
        row("Mid", None, Some(18.0), 0.0, 0.0),
        row("High", None, Some(25.0), 0.0, 0.0),
    ];
    let ranked = board::ranked_rows(&rows, &cfg(SortKey::Pts, SortDir::Desc));
    assert_eq!(names(&ranked), ["High", "Mid", "No Avg"]);

    let ranked = board::ranked_rows(&rows, &cfg(SortKey::Pts, SortDir::Asc));
    assert_eq!(names(&ranked), ["No Avg", "Mid", "High"]);
}

#[test]
fn equal_keys_keep_fetch_order() {
    let rows = vec![
        row("First In", None, Some(20.0), 0.2, 0.5),
        row("Second In", None, Some(20.0), 0.2, 0.5),
        row("Third In", None, Some(20.0), 0.2, 0.5),
    ];
    for dir in [SortDir::Asc, SortDir::Desc] {
        let ranked = board::ranked_rows(&rows, &cfg(SortKey::Bounce, dir));
        assert_eq!(names(&ranked), ["First In", "Second In", "Third In"]);
    }
}

#[test]
fn query_filters_by_name_substring() {
    let rows = vec![
        row("Jayson Tatum", None, None, 0.0, 0.0),
        row("Jaylen Brown", None, None, 0.0, 0.0),
        row("Luka Doncic", None, None, 0.0, 0.0),
    ];
    let mut config = cfg(SortKey::Player, SortDir::Asc);
    config.query = "JAY".to_string();
    let ranked = board::ranked_rows(&rows, &config);
    assert_eq!(names(&ranked), ["Jaylen Brown", "Jayson Tatum"]);

    config.query = "  ".to_string();
    let ranked = board::ranked_rows(&rows, &config);
    assert_eq!(ranked.len(), 3);
}

#[test]
fn role_filter_matches_listed_position_exactly() {
    let rows = vec![
        row("Pure Point", Some("PG"), None, 0.0, 0.0),
        row("Combo", Some("PG-SG"), None, 0.0, 0.0),
        row("Unlisted", None, None, 0.0, 0.0),
    ];
    let mut config = cfg(SortKey::Player, SortDir::Asc);
    config.role_filter = "pg".to_string();
    let ranked = board::ranked_rows(&rows, &config);
    assert_eq!(names(&ranked), ["Pure Point"]);

    // "All" and blank both disable the filter.
    for sentinel in ["All", "", "  "] {
        config.role_filter = sentinel.to_string();
        let ranked = board::ranked_rows(&rows, &config);
        assert_eq!(ranked.len(), 3, "sentinel {sentinel:?}");
    }
}

#[test]
fn near_equal_bounce_breaks_ties_on_weighted_score() {
    let rows = vec![
        row("Raw Leader", None, None, 0.50000, 0.1),
        row("Weighted Leader", None, None, 0.49996, 0.9),
        row("Distant", None, None, 0.30, 0.99),
    ];
    let top = board::top_bounce_per_category(&rows);
    assert_eq!(
        names(&top.pts),
        ["Weighted Leader", "Raw Leader", "Distant"]
    );
}

#[test]
fn clear_bounce_gap_ignores_weighted_score() {
    let rows = vec![
        row("Second", None, None, 0.49, 1.0),
        row("First", None, None, 0.50, 0.0),
    ];
    let top = board::top_bounce_per_category(&rows);
    assert_eq!(names(&top.pts), ["First", "Second"]);
}

#[test]
fn shortlists_hold_at_most_four_rows() {
    let rows: Vec<EnrichedPlayerRow> = (0..6)
        .map(|i| {
            row(
                &format!("Player {i}"),
                None,
                None,
                f64::from(i) * 0.1,
                0.0,
            )
        })
        .collect();
    let top = board::top_bounce_per_category(&rows);
    assert_eq!(names(&top.pts), ["Player 5", "Player 4", "Player 3", "Player 2"]);
    // REB and AST scores are all zero here: weighted ties too, so the
    // shortlist keeps fetch order.
    assert_eq!(names(&top.reb), ["Player 0", "Player 1", "Player 2", "Player 3"]);
}

#[test]
fn all_zero_bounce_falls_back_to_weighted_then_fetch_order() {
    let rows = vec![
        row("Low", None, None, 0.0, 0.2),
        row("High", None, None, 0.0, 0.8),
        row("Mid A", None, None, 0.0, 0.5),
        row("Mid B", None, None, 0.0, 0.5),
    ];
    let top = board::top_bounce_per_category(&rows);
    assert_eq!(names(&top.pts), ["High", "Mid A", "Mid B", "Low"]);
}

#[test]
fn chained_near_ties_resolve_head_to_head() {
    // Steps of 6e-5: neighbours fall inside the near-tie band while
    // rows two apart clear it, so no single ordering satisfies every
    // pair at once.
    let rows = vec![
        row("Base", None, None, 0.50000, 0.5),
        row("Step One", None, None, 0.50006, 0.4),
        row("Step Two", None, None, 0.50012, 0.3),
    ];
    let top = board::top_bounce_per_category(&rows);
    // Step Two beats Base outright; Base then beats Step One on the
    // weighted fallback.
    assert_eq!(names(&top.pts), ["Step Two", "Base", "Step One"]);
}

#[test]
fn tightly_clustered_scores_fill_all_four_slots() {
    // A full slate of rows packed into a 3e-4 bounce band, every pair
    // either inside or just past the near-tie threshold.
    let rows: Vec<EnrichedPlayerRow> = (0..220)
        .map(|i| {
            let bounce = 0.5 + f64::from((i * 37) % 100) * 3.0e-6;
            let weighted = f64::from((i * 53) % 100) / 100.0;
            row(&format!("Player {i}"), None, None, bounce, weighted)
        })
        .collect();
    let top = board::top_bounce_per_category(&rows);
    assert_eq!(top.pts.len(), 4);
    let picked: HashSet<&str> = top.pts.iter().map(|r| r.player.as_str()).collect();
    assert_eq!(picked.len(), 4);
}
