//! Per-group ranking.
//!
//! Orchestrates table aggregation, primary-key block partitioning, the
//! configured tie-break strategy, position assignment, and the layering of
//! manual order decisions over the ambiguous chunks.

use log::debug;

use crate::error::{EngineError, Result};
use crate::models::{
    GroupCode, GroupStandings, MatchPhase, MatchResult, TeamEntry, TeamStandingRow,
    TournamentRules,
};
use crate::overrides::{GroupOrderOverride, OverrideLedger};

use super::table::build_group_table;
use super::tiebreak::{partition_adjacent, strategy_for};

pub struct GroupRanker<'a> {
    rules: &'a TournamentRules,
    ledger: &'a OverrideLedger,
}

impl<'a> GroupRanker<'a> {
    pub fn new(rules: &'a TournamentRules, ledger: &'a OverrideLedger) -> Self {
        GroupRanker { rules, ledger }
    }

    pub fn rank(
        &self,
        group: &GroupCode,
        teams: &[TeamEntry],
        matches: &[MatchResult],
    ) -> Result<GroupStandings> {
        let table = build_group_table(group, teams, matches)?;
        let strategy = strategy_for(self.rules.ranking_convention);

        // Head-to-head restriction only ever looks at this group's results.
        let group_matches: Vec<MatchResult> = matches
            .iter()
            .filter(|m| m.phase == MatchPhase::Group && m.group.as_ref() == Some(group))
            .cloned()
            .collect();

        let mut rows = table.rows;
        rows.sort_by(|a, b| strategy.primary_cmp(a, b));

        let ranges = partition_adjacent(rows.len(), |a, b| strategy.primary_tied(&rows[a], &rows[b]));

        let mut ordered_ids: Vec<u32> = Vec::with_capacity(rows.len());
        let mut manual_chunks: Vec<Vec<u32>> = Vec::new();
        for range in ranges {
            if range.len() == 1 {
                ordered_ids.push(rows[range.start].team_id);
                continue;
            }
            let block: Vec<&TeamStandingRow> = rows[range.clone()].iter().collect();
            let resolution = strategy.resolve_block(&block, &group_matches);
            debug_assert_eq!(resolution.ordered.len(), range.len());
            ordered_ids.extend(resolution.ordered);
            manual_chunks.extend(resolution.unresolved);
        }

        let mut final_rows = reorder(rows, &ordered_ids);

        if let Some(decision) = self.ledger.group_order(group) {
            apply_group_order(group, &mut final_rows, &mut manual_chunks, decision)?;
        }

        assign_positions(&mut final_rows, &manual_chunks);

        if !manual_chunks.is_empty() {
            debug!(
                "group {}: {} tie chunk(s) left for manual decision",
                group,
                manual_chunks.len()
            );
        }

        let is_complete = table.expected_matches > 0
            && table.confirmed_matches == table.expected_matches;
        Ok(GroupStandings {
            group: group.clone(),
            rows: final_rows,
            confirmed_matches: table.confirmed_matches,
            expected_matches: table.expected_matches,
            is_complete,
        })
    }
}

fn reorder(rows: Vec<TeamStandingRow>, ordered_ids: &[u32]) -> Vec<TeamStandingRow> {
    let mut by_id: Vec<Option<TeamStandingRow>> = rows.into_iter().map(Some).collect();
    ordered_ids
        .iter()
        .map(|id| {
            let slot = by_id
                .iter_mut()
                .find(|row| row.as_ref().map(|r| r.team_id) == Some(*id))
                .expect("ordered ids are a permutation of the table rows");
            slot.take().expect("each id consumed once")
        })
        .collect()
}

/// Reorder each ambiguous chunk by the administrator's relative order and
/// consider it decided. Rows outside the chunks are untouched.
fn apply_group_order(
    group: &GroupCode,
    rows: &mut [TeamStandingRow],
    manual_chunks: &mut Vec<Vec<u32>>,
    decision: &GroupOrderOverride,
) -> Result<()> {
    let expected = rows.len();
    let valid = decision.order.len() == expected
        && rows
            .iter()
            .all(|row| decision.order.contains(&row.team_id));
    if !valid {
        return Err(EngineError::InvalidGroupOrder {
            group: group.to_string(),
            expected,
        });
    }

    let rank_of = |id: u32| decision.order.iter().position(|o| *o == id).unwrap_or(expected);
    for chunk in manual_chunks.drain(..) {
        let mut indices: Vec<usize> = rows
            .iter()
            .enumerate()
            .filter(|(_, row)| chunk.contains(&row.team_id))
            .map(|(index, _)| index)
            .collect();
        indices.sort_unstable();

        let mut decided: Vec<TeamStandingRow> = indices
            .iter()
            .map(|index| rows[*index].clone())
            .collect();
        decided.sort_by_key(|row| rank_of(row.team_id));

        for (index, row) in indices.into_iter().zip(decided) {
            rows[index] = row;
        }
    }
    Ok(())
}

/// 1-based positions. Rows inside an unresolved chunk share the chunk's
/// first position provisionally; everything else is definite.
fn assign_positions(rows: &mut [TeamStandingRow], manual_chunks: &[Vec<u32>]) {
    let chunk_of = |id: u32| manual_chunks.iter().position(|chunk| chunk.contains(&id));

    let mut index = 0;
    while index < rows.len() {
        match chunk_of(rows[index].team_id) {
            None => {
                rows[index].position = Some(index as u32 + 1);
                rows[index].needs_manual = false;
                index += 1;
            }
            Some(chunk) => {
                let start = index;
                while index < rows.len() && chunk_of(rows[index].team_id) == Some(chunk) {
                    rows[index].position = Some(start as u32 + 1);
                    rows[index].needs_manual = true;
                    index += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RankingConvention;

    fn group_match(match_number: u32, home: u32, away: u32, score: (u32, u32)) -> MatchResult {
        MatchResult {
            match_number,
            phase: MatchPhase::Group,
            round: 0,
            group: Some(GroupCode::new("A")),
            home_team_id: home,
            away_team_id: away,
            home_score: Some(score.0),
            away_score: Some(score.1),
            confirmed: true,
            advances_on_level: None,
        }
    }

    fn roster() -> Vec<TeamEntry> {
        (1..=4).map(|id| TeamEntry::concrete(id, "A")).collect()
    }

    fn rules() -> TournamentRules {
        TournamentRules {
            ranking_convention: RankingConvention::RoundRobinPoints,
            ..TournamentRules::round_robin()
        }
    }

    /// Full round robin where team 1 wins everything, 2 beats 3 and 4,
    /// 3 beats 4: points 9/6/3/0.
    fn decisive_matches() -> Vec<MatchResult> {
        vec![
            group_match(1, 1, 2, (2, 0)),
            group_match(2, 1, 3, (3, 1)),
            group_match(3, 1, 4, (1, 0)),
            group_match(4, 2, 3, (2, 1)),
            group_match(5, 2, 4, (3, 0)),
            group_match(6, 3, 4, (2, 0)),
        ]
    }

    #[test]
    fn decisive_group_gets_positions_in_point_order() {
        let ledger = OverrideLedger::default();
        let standings = GroupRanker::new(&rules(), &ledger)
            .rank(&GroupCode::new("A"), &roster(), &decisive_matches())
            .unwrap();

        assert!(standings.is_complete);
        assert_eq!(standings.confirmed_matches, 6);
        let ids: Vec<u32> = standings.rows.iter().map(|r| r.team_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        let positions: Vec<u32> = standings.rows.iter().map(|r| r.position.unwrap()).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
        assert!(standings.rows.iter().all(|r| !r.needs_manual));
    }

    #[test]
    fn head_to_head_orders_a_two_way_points_tie() {
        // 1 and 2 both finish on 6; their direct meeting was 2-1 for team 2.
        let matches = vec![
            group_match(1, 2, 1, (2, 1)),
            group_match(2, 1, 3, (3, 0)),
            group_match(3, 1, 4, (2, 0)),
            group_match(4, 2, 3, (1, 0)),
            group_match(5, 4, 2, (2, 0)),
            group_match(6, 3, 4, (1, 1)),
        ];
        let ledger = OverrideLedger::default();
        let standings = GroupRanker::new(&rules(), &ledger)
            .rank(&GroupCode::new("A"), &roster(), &matches)
            .unwrap();

        let ids: Vec<u32> = standings.rows.iter().map(|r| r.team_id).collect();
        assert_eq!(ids[0], 2);
        assert_eq!(ids[1], 1);
        assert!(standings.rows.iter().all(|r| !r.needs_manual));
    }

    /// All six pairings drawn 1-1: nothing separates anyone automatically.
    fn all_drawn_matches() -> Vec<MatchResult> {
        vec![
            group_match(1, 1, 2, (1, 1)),
            group_match(2, 1, 3, (1, 1)),
            group_match(3, 1, 4, (1, 1)),
            group_match(4, 2, 3, (1, 1)),
            group_match(5, 2, 4, (1, 1)),
            group_match(6, 3, 4, (1, 1)),
        ]
    }

    #[test]
    fn undecidable_chunk_shares_a_provisional_position() {
        let ledger = OverrideLedger::default();
        let standings = GroupRanker::new(&rules(), &ledger)
            .rank(&GroupCode::new("A"), &roster(), &all_drawn_matches())
            .unwrap();

        assert!(standings.rows.iter().all(|r| r.needs_manual));
        assert!(standings.rows.iter().all(|r| r.position == Some(1)));
        assert!(standings.needs_manual());
    }

    #[test]
    fn manual_order_decides_the_ambiguous_chunk() {
        let ledger = OverrideLedger {
            group_orders: vec![GroupOrderOverride {
                group: GroupCode::new("A"),
                order: vec![3, 1, 4, 2],
                reason: Some("drawing of lots".to_string()),
                decided_at: None,
            }],
            ..OverrideLedger::default()
        };
        let standings = GroupRanker::new(&rules(), &ledger)
            .rank(&GroupCode::new("A"), &roster(), &all_drawn_matches())
            .unwrap();

        let ids: Vec<u32> = standings.rows.iter().map(|r| r.team_id).collect();
        assert_eq!(ids, vec![3, 1, 4, 2]);
        let positions: Vec<u32> = standings.rows.iter().map(|r| r.position.unwrap()).collect();
        assert_eq!(positions, vec![1, 2, 3, 4]);
        assert!(standings.rows.iter().all(|r| !r.needs_manual));
    }

    #[test]
    fn manual_order_does_not_disturb_decided_rows() {
        // Team 1 wins everything; 2, 3, 4 draw among themselves with
        // identical keys. The admin order lists team 1 last, but team 1's
        // computed first place is not ambiguous and must stand.
        let matches = vec![
            group_match(1, 1, 2, (2, 0)),
            group_match(2, 1, 3, (2, 0)),
            group_match(3, 1, 4, (2, 0)),
            group_match(4, 2, 3, (1, 1)),
            group_match(5, 2, 4, (1, 1)),
            group_match(6, 3, 4, (1, 1)),
        ];
        let ledger = OverrideLedger {
            group_orders: vec![GroupOrderOverride {
                group: GroupCode::new("A"),
                order: vec![4, 3, 2, 1],
                reason: None,
                decided_at: None,
            }],
            ..OverrideLedger::default()
        };
        let standings = GroupRanker::new(&rules(), &ledger)
            .rank(&GroupCode::new("A"), &roster(), &matches)
            .unwrap();

        let ids: Vec<u32> = standings.rows.iter().map(|r| r.team_id).collect();
        assert_eq!(ids, vec![1, 4, 3, 2]);
        assert!(standings.rows.iter().all(|r| !r.needs_manual));
    }

    #[test]
    fn manual_order_must_be_a_permutation_of_the_group() {
        let ledger = OverrideLedger {
            group_orders: vec![GroupOrderOverride {
                group: GroupCode::new("A"),
                order: vec![1, 2, 3],
                reason: None,
                decided_at: None,
            }],
            ..OverrideLedger::default()
        };
        let err = GroupRanker::new(&rules(), &ledger)
            .rank(&GroupCode::new("A"), &roster(), &all_drawn_matches())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidGroupOrder { expected: 4, .. }));
    }

    #[test]
    fn win_percentage_convention_orders_by_percentage() {
        let rules = TournamentRules::win_percentage();
        // Team 3 wins twice, team 1 once, teams 2 and 4 never; no draws.
        let matches = vec![
            group_match(1, 3, 1, (5, 2)),
            group_match(2, 3, 2, (4, 1)),
            group_match(3, 1, 4, (6, 3)),
        ];
        let ledger = OverrideLedger::default();
        let standings = GroupRanker::new(&rules, &ledger)
            .rank(&GroupCode::new("A"), &roster(), &matches)
            .unwrap();

        assert_eq!(standings.rows[0].team_id, 3);
        assert_eq!(standings.rows[1].team_id, 1);
        assert!(!standings.is_complete);
    }
}
