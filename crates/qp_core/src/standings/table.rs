//! Group table aggregation.
//!
//! Pure fold of confirmed results into per-team rows. No ordering happens
//! here; ranking and tie-breaking are layered on top by the group ranker.

use crate::error::{EngineError, Result};
use crate::models::{
    GroupCode, MatchPhase, MatchResult, TeamEntry, TeamStandingRow, DRAW_POINTS, WIN_POINTS,
};

/// Aggregated but still unordered group table.
#[derive(Debug, Clone)]
pub struct GroupTable {
    pub rows: Vec<TeamStandingRow>,
    pub confirmed_matches: u32,
    pub expected_matches: u32,
}

impl GroupTable {
    /// Single round robin: every pair meets once.
    pub fn is_complete(&self) -> bool {
        self.expected_matches > 0 && self.confirmed_matches == self.expected_matches
    }
}

/// Build the table for `group` from the season roster and result list.
///
/// Placeholder entries assigned to the group accumulate statistics like any
/// other competitor. Teams without a confirmed match yet get a zeroed row.
pub fn build_group_table(
    group: &GroupCode,
    teams: &[TeamEntry],
    matches: &[MatchResult],
) -> Result<GroupTable> {
    let mut rows: Vec<TeamStandingRow> = teams
        .iter()
        .filter(|team| team.group.as_ref() == Some(group))
        .map(|team| TeamStandingRow::zeroed(team.team_id, group.clone(), team.is_placeholder))
        .collect();

    if rows.is_empty() {
        return Err(EngineError::EmptyGroup {
            group: group.to_string(),
        });
    }

    let mut confirmed = 0;
    for result in matches {
        if result.phase != MatchPhase::Group || result.group.as_ref() != Some(group) {
            continue;
        }
        let Some((home_score, away_score)) = result.scores() else {
            continue;
        };

        let home = row_index(&rows, result.home_team_id).ok_or(EngineError::GroupMismatch {
            match_number: result.match_number,
            group: group.to_string(),
            team_id: result.home_team_id,
        })?;
        let away = row_index(&rows, result.away_team_id).ok_or(EngineError::GroupMismatch {
            match_number: result.match_number,
            group: group.to_string(),
            team_id: result.away_team_id,
        })?;

        apply_result(&mut rows[home], home_score, away_score);
        apply_result(&mut rows[away], away_score, home_score);
        confirmed += 1;
    }

    let n = rows.len() as u32;
    Ok(GroupTable {
        rows,
        confirmed_matches: confirmed,
        expected_matches: n * (n - 1) / 2,
    })
}

fn row_index(rows: &[TeamStandingRow], team_id: u32) -> Option<usize> {
    rows.iter().position(|row| row.team_id == team_id)
}

fn apply_result(row: &mut TeamStandingRow, scored: u32, conceded: u32) {
    row.played += 1;
    row.goals_for += scored;
    row.goals_against += conceded;
    if scored > conceded {
        row.won += 1;
        row.points += WIN_POINTS;
    } else if scored == conceded {
        row.drawn += 1;
        row.points += DRAW_POINTS;
    } else {
        row.lost += 1;
    }
}
