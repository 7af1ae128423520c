/// Coarse positional grouping used to match players against opponent
/// defensive splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleBucket {
    G,
    F,
    C,
    Other,
}

impl RoleBucket {
    pub const ALL: [RoleBucket; 4] =
        [RoleBucket::G, RoleBucket::F, RoleBucket::C, RoleBucket::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleBucket::G => "G",
            RoleBucket::F => "F",
            RoleBucket::C => "C",
            RoleBucket::Other => "OTHER",
        }
    }

    /// Wire key as it appears in defense-profile JSON. Distinct from
    /// `classify`, which handles free-form listed positions.
    pub fn from_code(raw: &str) -> Option<RoleBucket> {
        match raw.trim().to_uppercase().as_str() {
            "G" => Some(RoleBucket::G),
            "F" => Some(RoleBucket::F),
            "C" => Some(RoleBucket::C),
            "OTHER" => Some(RoleBucket::Other),
            _ => None,
        }
    }
}

/// Total classification of a listed position such as "PG", "SF-PF" or "c".
/// Hyphenated listings count only the primary (first) position; anything
/// unrecognized, empty or absent lands in `Other`.
pub fn classify(raw: Option<&str>) -> RoleBucket {
    let Some(raw) = raw else {
        return RoleBucket::Other;
    };
    let upper = raw.trim().to_uppercase();
    let primary = upper.split('-').next().unwrap_or("").trim();
    match primary {
        "PG" | "SG" | "G" => RoleBucket::G,
        "SF" | "PF" | "F" => RoleBucket::F,
        "C" => RoleBucket::C,
        _ => RoleBucket::Other,
    }
}
