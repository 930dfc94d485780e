//! Bat-and-ball tie-break.
//!
//! Primary key is win percentage (draws never reach the standings in this
//! convention, so the denominator is decisions only), compared under a small
//! epsilon because the key is a ratio. Inside a tied block the sweep rule
//! applies first; blocks without a sweep fall back to the runs-allowed
//! quotient, an approximation over an assumed 27-outs game.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{MatchResult, TeamStandingRow, WIN_PCT_EPSILON};

use super::{head_to_head, partition_adjacent, BlockResolution, TieBreak};

pub struct WinPercentageSweep;

impl TieBreak for WinPercentageSweep {
    fn primary_cmp(&self, a: &TeamStandingRow, b: &TeamStandingRow) -> Ordering {
        b.win_percentage().total_cmp(&a.win_percentage())
    }

    fn primary_tied(&self, a: &TeamStandingRow, b: &TeamStandingRow) -> bool {
        (a.win_percentage() - b.win_percentage()).abs() <= WIN_PCT_EPSILON
    }

    fn resolve_block(
        &self,
        block: &[&TeamStandingRow],
        matches: &[MatchResult],
    ) -> BlockResolution {
        let rows: HashMap<u32, &TeamStandingRow> =
            block.iter().map(|row| (row.team_id, *row)).collect();
        let ids: Vec<u32> = block.iter().map(|row| row.team_id).collect();

        let mut unresolved = Vec::new();
        let ordered = order_by_sweep(ids, &rows, matches, &mut unresolved);
        BlockResolution {
            ordered,
            unresolved,
        }
    }
}

/// Sweep extraction: a team that won every head-to-head game against the rest
/// of the block ranks first, one that lost every such game ranks last; both
/// leave the block and the remainder recurses. Blocks without a sweep go to
/// the quotient.
fn order_by_sweep(
    ids: Vec<u32>,
    rows: &HashMap<u32, &TeamStandingRow>,
    matches: &[MatchResult],
    unresolved: &mut Vec<Vec<u32>>,
) -> Vec<u32> {
    if ids.len() <= 1 {
        return ids;
    }

    let restricted = head_to_head(&ids, matches);
    let swept_all: Vec<u32> = ids
        .iter()
        .copied()
        .filter(|id| restricted[id].games > 0 && restricted[id].wins == restricted[id].games)
        .collect();
    let lost_all: Vec<u32> = ids
        .iter()
        .copied()
        .filter(|id| restricted[id].games > 0 && restricted[id].losses == restricted[id].games)
        .collect();

    let front = (swept_all.len() == 1).then(|| swept_all[0]);
    let back = (lost_all.len() == 1).then(|| lost_all[0]);

    if front.is_none() && back.is_none() {
        return quotient_fallback(ids, rows, unresolved);
    }

    let remainder: Vec<u32> = ids
        .iter()
        .copied()
        .filter(|id| Some(*id) != front && Some(*id) != back)
        .collect();

    let mut ordered = Vec::with_capacity(ids.len());
    if let Some(id) = front {
        ordered.push(id);
    }
    ordered.extend(order_by_sweep(remainder, rows, matches, unresolved));
    if let Some(id) = back {
        ordered.push(id);
    }
    ordered
}

/// Runs allowed per assumed defensive out, ascending. Compared by integer
/// cross-multiplication (the outs constant cancels), so equality is exact
/// and float rounding can't reorder teams.
fn quotient_fallback(
    ids: Vec<u32>,
    rows: &HashMap<u32, &TeamStandingRow>,
    unresolved: &mut Vec<Vec<u32>>,
) -> Vec<u32> {
    let cross = |a: u32, b: u32| -> Ordering {
        let left = u64::from(rows[&a].goals_against) * u64::from(rows[&b].played);
        let right = u64::from(rows[&b].goals_against) * u64::from(rows[&a].played);
        left.cmp(&right)
    };

    let mut sorted = ids;
    sorted.sort_by(|a, b| cross(*a, *b));

    let ranges = partition_adjacent(sorted.len(), |a, b| {
        cross(sorted[a], sorted[b]) == Ordering::Equal
    });
    for range in ranges {
        if range.len() > 1 {
            unresolved.push(sorted[range].to_vec());
        }
    }
    sorted
}
