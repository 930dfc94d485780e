//! Ranking configuration and scoring constants.
//!
//! Which convention applies to a season comes from the sport catalog, outside
//! this engine. The `points` column is always 3/1/0 regardless of sport; the
//! convention only changes how teams are *ordered*.

use serde::{Deserialize, Serialize};

/// Points awarded for a win in the aggregated table.
pub const WIN_POINTS: u32 = 3;
/// Points awarded to each side for a draw.
pub const DRAW_POINTS: u32 = 1;

/// Win percentages are ratios; equality within this tolerance counts as tied.
pub const WIN_PCT_EPSILON: f64 = 1e-9;

/// Assumed outs per game (9 innings x 3 outs) for the runs-allowed quotient.
/// The quotient is an approximation over this constant because recorded outs
/// are not part of the data model; keep it that way.
pub const INNINGS_OUTS_PER_GAME: u32 = 27;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingConvention {
    /// Association-football convention: points, then hierarchical
    /// head-to-head, then global goal differential.
    RoundRobinPoints,
    /// Bat-and-ball convention: win percentage, sweep rule, runs-allowed
    /// quotient.
    WinPercentageSweep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentRules {
    pub ranking_convention: RankingConvention,
    /// Whether third-place teams are cross-compared for qualification.
    #[serde(default)]
    pub third_place_enabled: bool,
    /// Whether knockout bracket slots are resolved.
    #[serde(default)]
    pub bracket_enabled: bool,
    /// How many third-place teams qualify when enabled.
    #[serde(default = "default_qualification_quota")]
    pub qualification_quota: u32,
}

fn default_qualification_quota() -> u32 {
    8
}

impl TournamentRules {
    pub fn round_robin() -> Self {
        TournamentRules {
            ranking_convention: RankingConvention::RoundRobinPoints,
            third_place_enabled: false,
            bracket_enabled: false,
            qualification_quota: default_qualification_quota(),
        }
    }

    pub fn win_percentage() -> Self {
        TournamentRules {
            ranking_convention: RankingConvention::WinPercentageSweep,
            ..TournamentRules::round_robin()
        }
    }
}
