use std::collections::HashMap;

use bounce_terminal::bounce::{self, BounceStrategy};
use bounce_terminal::model::{
    MatchSnapshot, PerCategory, PlayerStatSnapshot, PositionAllowance, Side, StatKey,
    StatObservation, TeamDefenseProfile,
};
use bounce_terminal::roles::RoleBucket;

fn obs(value: f64, last5_avg: f64) -> StatObservation {
    StatObservation {
        value: Some(value),
        last5_avg: Some(last5_avg),
    }
}

fn player(
    name: &str,
    position: Option<&str>,
    side: Option<Side>,
    stats: &[(&str, StatObservation)],
) -> PlayerStatSnapshot {
    PlayerStatSnapshot {
        player: name.to_string(),
        team: None,
        side,
        position: position.map(str::to_string),
        stats: stats
            .iter()
            .map(|(code, o)| (code.to_string(), *o))
            .collect(),
    }
}

fn defense_pts(buckets: &[(RoleBucket, f64)]) -> TeamDefenseProfile {
    let by_position: HashMap<RoleBucket, PositionAllowance> = buckets
        .iter()
        .map(|(bucket, pts)| {
            (
                *bucket,
                PositionAllowance {
                    pts_per_game: Some(*pts),
                    ..PositionAllowance::default()
                },
            )
        })
        .collect();
    TeamDefenseProfile {
        target_team_abbr: None,
        season: None,
        by_position_per_game: Some(by_position),
    }
}

fn snapshot(
    players: Vec<PlayerStatSnapshot>,
    home_defense: Option<TeamDefenseProfile>,
    away_defense: Option<TeamDefenseProfile>,
) -> MatchSnapshot {
    MatchSnapshot {
        home_team: "Boston Celtics".to_string(),
        away_team: "Los Angeles Lakers".to_string(),
        season: "2025-26".to_string(),
        last_n: 10,
        players,
        home_defense,
        away_defense,
    }
}

#[test]
fn deviation_reference_values() {
    assert!((bounce::deviation(10.0, 20.0) - (-0.5)).abs() < 1e-12);
    assert!((bounce::deviation(20.0, 10.0) - 1.0).abs() < 1e-12);
    // Zero baseline falls back to the epsilon divisor instead of dividing
    // by zero.
    assert_eq!(bounce::deviation(5.0, 0.0), 5_000_000.0);
}

#[test]
fn opponent_ratio_neutral_without_usable_profile() {
    assert_eq!(
        bounce::opponent_ratio(None, RoleBucket::G, StatKey::Pts),
        1.0
    );
    let missing_mapping = TeamDefenseProfile::default();
    assert_eq!(
        bounce::opponent_ratio(Some(&missing_mapping), RoleBucket::G, StatKey::Pts),
        1.0
    );
}

#[test]
fn opponent_ratio_means_only_present_buckets() {
    let profile = defense_pts(&[(RoleBucket::G, 20.0), (RoleBucket::F, 10.0)]);
    let ratio = bounce::opponent_ratio(Some(&profile), RoleBucket::G, StatKey::Pts);
    assert!((ratio - 20.0 / 15.0).abs() < 1e-9);

    // A bucket missing from the mapping reads as zero allowance.
    let ratio_c = bounce::opponent_ratio(Some(&profile), RoleBucket::C, StatKey::Pts);
    assert!((ratio_c - 0.0).abs() < 1e-9);
}

#[test]
fn opponent_ratio_empty_mapping_scores_zero() {
    // Mapping present but without a single bucket: the allowance is 0 and
    // the mean falls back to 1, so the ratio is 0, not neutral.
    let profile = defense_pts(&[]);
    let ratio = bounce::opponent_ratio(Some(&profile), RoleBucket::G, StatKey::Pts);
    assert_eq!(ratio, 0.0);
}

#[test]
fn bounce_needs_both_conditions() {
    assert!((bounce::bounce(-0.5, 1.2) - 0.10).abs() < 1e-9);
    assert_eq!(bounce::bounce(0.3, 1.2), 0.0);
    assert_eq!(bounce::bounce(-0.5, 0.8), 0.0);
    assert_eq!(bounce::bounce(0.0, 1.0), 0.0);
}

#[test]
fn weighted_bounce_reference_player() {
    // Full minutes and full points production, a maximal PTS bounce of
    // 1.0, nothing on REB/AST.
    let stats: HashMap<String, StatObservation> = [
        ("MIN", 32.0),
        ("PTS", 18.0),
        ("REB", 0.0),
        ("AST", 0.0),
    ]
    .into_iter()
    .map(|(code, avg)| {
        (
            code.to_string(),
            StatObservation {
                value: None,
                last5_avg: Some(avg),
            },
        )
    })
    .collect();
    let scores = PerCategory {
        pts: 1.0,
        reb: 0.0,
        ast: 0.0,
    };

    let weighted = bounce::weighted_bounce(&stats, &scores);
    assert!(weighted > 0.0 && weighted < 1.0, "weighted = {weighted}");
    // PTS weight 1.0, REB/AST floors 0.675 each, boost 1.0.
    let expected = 1.0 / (1.0 + 0.675 + 0.675);
    assert!((weighted - expected).abs() < 1e-9, "weighted = {weighted}");
}

#[test]
fn celtics_scenario_end_to_end() {
    let bos_defense = defense_pts(&[
        (RoleBucket::G, 24.0),
        (RoleBucket::F, 20.0),
        (RoleBucket::C, 18.0),
    ]);
    let guard = player(
        "Away Guard",
        Some("PG"),
        Some(Side::Away),
        &[("PTS", obs(15.0, 22.0)), ("MIN", obs(34.0, 33.0))],
    );
    let snap = snapshot(vec![guard], Some(bos_defense), None);

    let rows = bounce::enrich_players(&snap, BounceStrategy::Weighted);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];

    assert_eq!(row.role_bucket, RoleBucket::G);
    assert!((row.under_pct.pts - (15.0 - 22.0) / 22.0).abs() < 1e-9);
    assert!((row.under_pct.pts - (-0.318)).abs() < 1e-3);
    assert_eq!(row.opp_role_allow.pts, Some(24.0));
    let mean = (24.0 + 20.0 + 18.0) / 3.0;
    assert!((row.opp_ratio.pts - 24.0 / mean).abs() < 1e-9);
    assert!((row.opp_ratio.pts - 1.161).abs() < 1e-3);
    assert!((row.bounce_score.pts - 0.051).abs() < 1e-3);
}

#[test]
fn unknown_side_keeps_ratios_neutral() {
    let defense = defense_pts(&[(RoleBucket::G, 24.0), (RoleBucket::F, 18.0)]);
    let drifter = player(
        "No Side",
        Some("PG"),
        None,
        &[("PTS", obs(10.0, 20.0)), ("MIN", obs(30.0, 30.0))],
    );
    let snap = snapshot(vec![drifter], Some(defense.clone()), Some(defense));

    let rows = bounce::enrich_players(&snap, BounceStrategy::Weighted);
    let row = &rows[0];
    assert_eq!(row.opp_ratio.pts, 1.0);
    assert_eq!(row.opp_role_allow.pts, None);
    // Underperformed but no matchup edge, so no bounce.
    assert_eq!(row.bounce_score.pts, 0.0);
}

#[test]
fn home_players_face_away_defense() {
    let home_defense = defense_pts(&[(RoleBucket::G, 10.0), (RoleBucket::F, 10.0)]);
    let away_defense = defense_pts(&[(RoleBucket::G, 30.0), (RoleBucket::F, 10.0)]);
    let home_guard = player(
        "Home Guard",
        Some("SG"),
        Some(Side::Home),
        &[("PTS", obs(12.0, 20.0))],
    );
    let snap = snapshot(vec![home_guard], Some(home_defense), Some(away_defense));

    let rows = bounce::enrich_players(&snap, BounceStrategy::Weighted);
    let row = &rows[0];
    // 30 over a cross-bucket mean of 20 comes from the away profile.
    assert!((row.opp_ratio.pts - 1.5).abs() < 1e-9);
    assert_eq!(row.opp_role_allow.pts, Some(30.0));
}

#[test]
fn plain_strategy_averages_the_three_scores() {
    let defense = defense_pts(&[(RoleBucket::G, 24.0), (RoleBucket::F, 16.0)]);
    let guard = player(
        "Plain Guard",
        Some("PG"),
        Some(Side::Away),
        &[
            ("PTS", obs(10.0, 20.0)),
            ("REB", obs(3.0, 3.0)),
            ("AST", obs(4.0, 4.0)),
            ("MIN", obs(30.0, 28.0)),
        ],
    );
    let snap = snapshot(vec![guard], Some(defense), None);

    let rows = bounce::enrich_players(&snap, BounceStrategy::PlainAverage);
    let row = &rows[0];
    let expected =
        (row.bounce_score.pts + row.bounce_score.reb + row.bounce_score.ast) / 3.0;
    assert!((row.weighted_bounce - expected).abs() < 1e-12);

    let weighted_rows = bounce::enrich_players(&snap, BounceStrategy::Weighted);
    assert!(
        (weighted_rows[0].weighted_bounce - row.weighted_bounce).abs() > 1e-9,
        "strategies should disagree when weights are uneven"
    );
}

#[test]
fn enrichment_is_idempotent() {
    let defense = defense_pts(&[
        (RoleBucket::G, 22.0),
        (RoleBucket::F, 19.0),
        (RoleBucket::C, 17.0),
    ]);
    let players = vec![
        player(
            "Guard One",
            Some("PG"),
            Some(Side::Home),
            &[
                ("PTS", obs(14.0, 18.0)),
                ("REB", obs(4.0, 3.5)),
                ("AST", obs(6.0, 7.2)),
                ("MIN", obs(32.0, 30.5)),
            ],
        ),
        player(
            "Forward Two",
            Some("SF-PF"),
            Some(Side::Away),
            &[
                ("PTS", obs(9.0, 15.0)),
                ("REB", obs(7.0, 6.1)),
                ("MIN", obs(28.0, 26.0)),
            ],
        ),
        player("Mystery Man", None, None, &[]),
    ];
    let snap = snapshot(players, Some(defense.clone()), Some(defense));

    let first = bounce::enrich_players(&snap, BounceStrategy::Weighted);
    let second = bounce::enrich_players(&snap, BounceStrategy::Weighted);
    assert_eq!(first, second);
    // Output keeps the snapshot's player order.
    assert_eq!(first[0].player, "Guard One");
    assert_eq!(first[2].player, "Mystery Man");
}
