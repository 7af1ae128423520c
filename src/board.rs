use std::cmp::Ordering;

use crate::model::{EnrichedPlayerRow, PerCategory, StatKey};

const TOP_PER_CATEGORY: usize = 4;

// Bounce gaps below this are treated as ties and broken on the weighted
// aggregate instead.
const BOUNCE_TIE_EPSILON: f64 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Bounce,
    Pts,
    Reb,
    Ast,
    #[default]
    Player,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<SortKey> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "bounce" => Some(SortKey::Bounce),
            "pts" => Some(SortKey::Pts),
            "reb" => Some(SortKey::Reb),
            "ast" => Some(SortKey::Ast),
            "player" => Some(SortKey::Player),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Bounce => "bounce",
            SortKey::Pts => "pts",
            SortKey::Reb => "reb",
            SortKey::Ast => "ast",
            SortKey::Player => "player",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn parse(raw: &str) -> Option<SortDir> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDir::Asc),
            "desc" => Some(SortDir::Desc),
            _ => None,
        }
    }
}

/// One board request: which key to order by, which way, and the optional
/// name / listed-position filters.
#[derive(Debug, Clone, Default)]
pub struct BoardConfig {
    pub sort_key: SortKey,
    pub dir: SortDir,
    pub query: String,
    pub role_filter: String,
}

/// Filter and order the enriched rows for display. The input order is the
/// fetch order and is the tie-break for equal keys, so the sort must stay
/// stable and the input is never reordered in place.
pub fn ranked_rows<'a>(rows: &'a [EnrichedPlayerRow], cfg: &BoardConfig) -> Vec<&'a EnrichedPlayerRow> {
    let query = cfg.query.trim().to_lowercase();
    let role = cfg.role_filter.trim();
    let role_active = !role.is_empty() && !role.eq_ignore_ascii_case("all");

    let mut picked: Vec<&EnrichedPlayerRow> = rows
        .iter()
        .filter(|row| {
            if !query.is_empty() && !row.player.to_lowercase().contains(&query) {
                return false;
            }
            if role_active {
                return row
                    .position
                    .as_deref()
                    .is_some_and(|p| p.trim().eq_ignore_ascii_case(role));
            }
            true
        })
        .collect();

    picked.sort_by(|a, b| {
        let ord = compare_rows(a, b, cfg.sort_key);
        match cfg.dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
    picked
}

/// Per-category shortlists ordered by raw bounce, not the weighted
/// aggregate; near-equal bounce falls back to the weighted score.
pub fn top_bounce_per_category(
    rows: &[EnrichedPlayerRow],
) -> PerCategory<Vec<&EnrichedPlayerRow>> {
    PerCategory::from_fn(|key| {
        // The near-tie rule is not transitive across a chain of close
        // scores, so it cannot feed a comparison sort; fill the slots
        // with repeated head-to-head scans instead.
        let mut remaining: Vec<&EnrichedPlayerRow> = rows.iter().collect();
        let mut picked = Vec::new();
        while picked.len() < TOP_PER_CATEGORY && !remaining.is_empty() {
            let mut best = 0;
            for idx in 1..remaining.len() {
                if outscores(remaining[idx], remaining[best], key) {
                    best = idx;
                }
            }
            picked.push(remaining.remove(best));
        }
        picked
    })
}

// Shortlist head-to-head: near-equal bounce falls back to the weighted
// aggregate. Only strict wins count, so exact ties keep fetch order.
fn outscores(a: &EnrichedPlayerRow, b: &EnrichedPlayerRow, key: StatKey) -> bool {
    let bounce_a = *a.bounce_score.get(key);
    let bounce_b = *b.bounce_score.get(key);
    if (bounce_a - bounce_b).abs() < BOUNCE_TIE_EPSILON {
        a.weighted_bounce > b.weighted_bounce
    } else {
        bounce_a > bounce_b
    }
}

fn compare_rows(a: &EnrichedPlayerRow, b: &EnrichedPlayerRow, key: SortKey) -> Ordering {
    match key {
        SortKey::Player => a.player.to_lowercase().cmp(&b.player.to_lowercase()),
        SortKey::Bounce => num_cmp(a.weighted_bounce, b.weighted_bounce),
        SortKey::Pts => num_cmp(avg_or_neg_inf(a, StatKey::Pts), avg_or_neg_inf(b, StatKey::Pts)),
        SortKey::Reb => num_cmp(avg_or_neg_inf(a, StatKey::Reb), avg_or_neg_inf(b, StatKey::Reb)),
        SortKey::Ast => num_cmp(avg_or_neg_inf(a, StatKey::Ast), avg_or_neg_inf(b, StatKey::Ast)),
    }
}

// Missing averages sort below every real number, so descending order puts
// them last.
fn avg_or_neg_inf(row: &EnrichedPlayerRow, key: StatKey) -> f64 {
    row.last5(key.code()).unwrap_or(f64::NEG_INFINITY)
}

fn num_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
