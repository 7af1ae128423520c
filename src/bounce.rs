use std::collections::HashMap;

use crate::model::{
    EnrichedPlayerRow, MINUTES_CODE, MatchSnapshot, PerCategory, PlayerStatSnapshot, Side,
    StatKey, StatObservation, TeamDefenseProfile,
};
use crate::roles::{self, RoleBucket};

const DIV_EPSILON: f64 = 1e-6;

// Minutes at which a player counts as carrying a full rotation load.
const FULL_MINUTES: f64 = 32.0;

const COMPONENT_WEIGHT_FLOOR: f64 = 0.35;
const COMPONENT_WEIGHT_SPAN: f64 = 0.65;
const RELIABILITY_FLOOR: f64 = 0.4;
const RELIABILITY_SPAN: f64 = 0.6;

/// How the three per-category bounce scores collapse into one ranking
/// number. `Weighted` is the production metric; `PlainAverage` is the
/// legacy unweighted mean kept for parity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BounceStrategy {
    #[default]
    Weighted,
    PlainAverage,
}

fn safe_div(numer: f64, denom: f64) -> f64 {
    let denom = if denom.abs() > DIV_EPSILON {
        denom
    } else {
        DIV_EPSILON
    };
    numer / denom
}

fn clamp01(v: f64) -> f64 {
    v.max(0.0).min(1.0)
}

// Trailing-average production at which a category counts as fully loaded.
fn production_full(key: StatKey) -> f64 {
    match key {
        StatKey::Pts => 18.0,
        StatKey::Reb => 8.0,
        StatKey::Ast => 7.0,
    }
}

/// Signed relative deviation of the latest game from the trailing
/// average. Negative means the latest game came in under the average.
pub fn deviation(value: f64, last5_avg: f64) -> f64 {
    safe_div(value - last5_avg, last5_avg)
}

/// `deviation` over an observation, with missing values counting as 0.
pub fn under_pct(obs: Option<&StatObservation>) -> f64 {
    let value = obs.and_then(|o| o.value).unwrap_or(0.0);
    let last5_avg = obs.and_then(|o| o.last5_avg).unwrap_or(0.0);
    deviation(value, last5_avg)
}

/// How generous the opposing defense is toward one role bucket in one
/// category, relative to its own cross-bucket average. 1.0 is neutral and
/// also the fallback whenever no usable profile data exists.
pub fn opponent_ratio(
    defense: Option<&TeamDefenseProfile>,
    bucket: RoleBucket,
    key: StatKey,
) -> f64 {
    let Some(by_position) = defense.and_then(|d| d.by_position_per_game.as_ref()) else {
        return 1.0;
    };

    let val = by_position
        .get(&bucket)
        .and_then(|a| a.per_game(key))
        .unwrap_or(0.0);

    // Mean over buckets that actually report this category; absent buckets
    // are excluded rather than counted as zero.
    let mut sum = 0.0;
    let mut present = 0u32;
    for b in RoleBucket::ALL {
        if let Some(v) = by_position.get(&b).and_then(|a| a.per_game(key)) {
            if v.is_finite() {
                sum += v;
                present += 1;
            }
        }
    }
    let mean_all = if present > 0 {
        sum / f64::from(present)
    } else {
        1.0
    };

    safe_div(val, mean_all)
}

/// Positive only when the player just underperformed their baseline AND
/// the opponent concedes above its average to their role; either condition
/// alone yields zero.
pub fn bounce(under_pct: f64, ratio: f64) -> f64 {
    (-under_pct).max(0.0) * (ratio - 1.0).max(0.0)
}

/// Minutes/production weighted aggregate of the three category bounce
/// scores. Categories where the player is more active count for more, and
/// low-minute players are discounted once more at the end.
pub fn weighted_bounce(
    stats: &HashMap<String, StatObservation>,
    scores: &PerCategory<f64>,
) -> f64 {
    let minutes_avg = stats
        .get(MINUTES_CODE)
        .and_then(|o| o.last5_avg)
        .unwrap_or(0.0);
    let minute_weight = clamp01(minutes_avg / FULL_MINUTES);

    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;
    for key in StatKey::ALL {
        let avg = stats.get(key.code()).and_then(|o| o.last5_avg).unwrap_or(0.0);
        let production_weight = clamp01(avg / production_full(key));
        let component_weight = COMPONENT_WEIGHT_FLOOR
            + COMPONENT_WEIGHT_SPAN * ((minute_weight + production_weight) / 2.0);
        total_weight += component_weight;
        weighted_sum += *scores.get(key) * component_weight;
    }

    let base = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };
    let reliability_boost = RELIABILITY_FLOOR + RELIABILITY_SPAN * minute_weight;
    base * reliability_boost
}

/// Legacy unweighted mean of the three category scores.
pub fn plain_average(scores: &PerCategory<f64>) -> f64 {
    (scores.pts + scores.reb + scores.ast) / 3.0
}

pub fn aggregate(
    strategy: BounceStrategy,
    stats: &HashMap<String, StatObservation>,
    scores: &PerCategory<f64>,
) -> f64 {
    match strategy {
        BounceStrategy::Weighted => weighted_bounce(stats, scores),
        BounceStrategy::PlainAverage => plain_average(scores),
    }
}

/// Run the full per-player derivation over a snapshot. Pure and
/// deterministic; rows come out in the snapshot's player order.
pub fn enrich_players(snapshot: &MatchSnapshot, strategy: BounceStrategy) -> Vec<EnrichedPlayerRow> {
    snapshot
        .players
        .iter()
        .map(|player| enrich_player(player, snapshot, strategy))
        .collect()
}

fn enrich_player(
    player: &PlayerStatSnapshot,
    snapshot: &MatchSnapshot,
    strategy: BounceStrategy,
) -> EnrichedPlayerRow {
    let role_bucket = roles::classify(player.position.as_deref());
    // A home player faces the away defense and vice versa; unknown side
    // gets no profile, which means neutral ratios downstream.
    let defense = match player.side {
        Some(Side::Home) => snapshot.away_defense.as_ref(),
        Some(Side::Away) => snapshot.home_defense.as_ref(),
        None => None,
    };

    let under_pct_by_cat =
        PerCategory::from_fn(|key| under_pct(player.observation(key.code())));
    let opp_role_allow = PerCategory::from_fn(|key| {
        defense
            .and_then(|d| d.allowance(role_bucket))
            .and_then(|a| a.per_game(key))
    });
    let opp_ratio = PerCategory::from_fn(|key| opponent_ratio(defense, role_bucket, key));
    let bounce_score =
        PerCategory::from_fn(|key| bounce(*under_pct_by_cat.get(key), *opp_ratio.get(key)));
    let weighted = aggregate(strategy, &player.stats, &bounce_score);

    EnrichedPlayerRow {
        player: player.player.clone(),
        team: player.team.clone(),
        side: player.side,
        position: player.position.clone(),
        role_bucket,
        stats: player.stats.clone(),
        under_pct: under_pct_by_cat,
        opp_role_allow,
        opp_ratio,
        bounce_score,
        weighted_bounce: weighted,
    }
}
