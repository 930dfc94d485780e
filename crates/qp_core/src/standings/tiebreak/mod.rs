//! Tie-break strategies.
//!
//! Two conventions exist and are mutually exclusive per sport: the
//! round-robin points procedure (association football) and the
//! win-percentage/sweep procedure (bat-and-ball). Both take a block of teams
//! tied on the primary key and return a total order plus the residue that
//! stays genuinely undecidable. Blocks are worked on as ordered index
//! partitions, never keyed maps, so iteration order can't leak into results.

pub mod round_robin;
pub mod win_percentage;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Range;

use crate::models::{MatchResult, RankingConvention, TeamStandingRow};

pub use round_robin::RoundRobinPoints;
pub use win_percentage::WinPercentageSweep;

/// Outcome of resolving one tied block: a total order over the block's team
/// ids, plus each chunk that remains undecidable (in stable original order).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockResolution {
    pub ordered: Vec<u32>,
    pub unresolved: Vec<Vec<u32>>,
}

pub trait TieBreak {
    /// Primary-key comparator over full-group rows, best first.
    fn primary_cmp(&self, a: &TeamStandingRow, b: &TeamStandingRow) -> Ordering;

    /// True when two rows cannot be separated by the primary key.
    fn primary_tied(&self, a: &TeamStandingRow, b: &TeamStandingRow) -> bool;

    /// Order one tied block. `block` preserves the stable pre-tie-break
    /// order; `matches` is the full confirmed match list of the group.
    fn resolve_block(&self, block: &[&TeamStandingRow], matches: &[MatchResult])
        -> BlockResolution;
}

pub fn strategy_for(convention: RankingConvention) -> &'static dyn TieBreak {
    match convention {
        RankingConvention::RoundRobinPoints => &RoundRobinPoints,
        RankingConvention::WinPercentageSweep => &WinPercentageSweep,
    }
}

/// Split `len` indices into maximal runs of adjacent elements that `tied`
/// declares inseparable. Input is assumed already sorted by the key.
pub(crate) fn partition_adjacent(
    len: usize,
    mut tied: impl FnMut(usize, usize) -> bool,
) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for index in 1..len {
        if !tied(index - 1, index) {
            ranges.push(start..index);
            start = index;
        }
    }
    if len > 0 {
        ranges.push(start..len);
    }
    ranges
}

/// Per-team record restricted to confirmed matches played among `ids`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct HeadToHead {
    pub points: u32,
    pub goals_for: i64,
    pub goals_against: i64,
    pub wins: u32,
    pub losses: u32,
    pub games: u32,
}

impl HeadToHead {
    pub fn goal_diff(&self) -> i64 {
        self.goals_for - self.goals_against
    }

    /// Restricted comparison key, best first.
    pub fn key(&self) -> (u32, i64, i64) {
        (self.points, self.goal_diff(), self.goals_for)
    }
}

pub(crate) fn head_to_head(ids: &[u32], matches: &[MatchResult]) -> HashMap<u32, HeadToHead> {
    use crate::models::{DRAW_POINTS, WIN_POINTS};

    let mut table: HashMap<u32, HeadToHead> = ids.iter().map(|id| (*id, HeadToHead::default())).collect();
    for result in matches {
        let Some((home_score, away_score)) = result.scores() else {
            continue;
        };
        if !table.contains_key(&result.home_team_id) || !table.contains_key(&result.away_team_id) {
            continue;
        }
        for (id, scored, conceded) in [
            (result.home_team_id, home_score, away_score),
            (result.away_team_id, away_score, home_score),
        ] {
            let entry = table.get_mut(&id).expect("id filtered above");
            entry.games += 1;
            entry.goals_for += i64::from(scored);
            entry.goals_against += i64::from(conceded);
            if scored > conceded {
                entry.wins += 1;
                entry.points += WIN_POINTS;
            } else if scored == conceded {
                entry.points += DRAW_POINTS;
            } else {
                entry.losses += 1;
            }
        }
    }
    table
}
