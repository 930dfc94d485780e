//! Association-football tie-break.
//!
//! The official multi-step procedure, in order: head-to-head points, goal
//! differential and goals-for over a table restricted to the tied teams,
//! re-restricted recursively for every sub-block that survives; then global
//! goal differential and goals-for; whatever still ties needs an
//! administrator. Deviating from this order changes outcomes.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{MatchResult, TeamStandingRow};

use super::{head_to_head, partition_adjacent, BlockResolution, TieBreak};

pub struct RoundRobinPoints;

impl TieBreak for RoundRobinPoints {
    fn primary_cmp(&self, a: &TeamStandingRow, b: &TeamStandingRow) -> Ordering {
        b.points.cmp(&a.points)
    }

    fn primary_tied(&self, a: &TeamStandingRow, b: &TeamStandingRow) -> bool {
        a.points == b.points
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
        let ordered = order_by_head_to_head(ids, &rows, matches, &mut unresolved);
        BlockResolution {
            ordered,
            unresolved,
        }
    }
}

/// Sort `ids` by the table restricted to matches among them, recursing with a
/// further-restricted table on every strictly smaller sub-block that stays
/// tied. A block the restricted table cannot split at all falls through to
/// the global key.
fn order_by_head_to_head(
    ids: Vec<u32>,
    rows: &HashMap<u32, &TeamStandingRow>,
    matches: &[MatchResult],
    unresolved: &mut Vec<Vec<u32>>,
) -> Vec<u32> {
    if ids.len() <= 1 {
        return ids;
    }

    let restricted = head_to_head(&ids, matches);
    let mut sorted = ids.clone();
    sorted.sort_by(|a, b| restricted[b].key().cmp(&restricted[a].key()));

    let ranges = partition_adjacent(sorted.len(), |a, b| {
        restricted[&sorted[a]].key() == restricted[&sorted[b]].key()
    });

    let mut ordered = Vec::with_capacity(sorted.len());
    for range in ranges {
        let sub: Vec<u32> = sorted[range].to_vec();
        if sub.len() == 1 {
            ordered.extend(sub);
        } else if sub.len() < ids.len() {
            ordered.extend(order_by_head_to_head(sub, rows, matches, unresolved));
        } else {
            ordered.extend(global_fallback(sub, rows, unresolved));
        }
    }
    ordered
}

/// Final automatic tie-breakers: global goal differential, then global
/// goals-for. Exact residue is flagged for manual decision and kept in the
/// stable original order.
fn global_fallback(
    ids: Vec<u32>,
    rows: &HashMap<u32, &TeamStandingRow>,
    unresolved: &mut Vec<Vec<u32>>,
) -> Vec<u32> {
    let key = |id: u32| {
        let row = rows[&id];
        (row.goal_diff(), i64::from(row.goals_for))
    };

    let mut sorted = ids;
    sorted.sort_by(|a, b| key(*b).cmp(&key(*a)));

    let ranges = partition_adjacent(sorted.len(), |a, b| key(sorted[a]) == key(sorted[b]));
    for range in ranges {
        if range.len() > 1 {
            unresolved.push(sorted[range].to_vec());
        }
    }
    sorted
}
