use serde::{Deserialize, Serialize};

use super::rules::INNINGS_OUTS_PER_GAME;
use super::team::GroupCode;

/// One team's aggregated state within one group. Rebuilt from scratch on
/// every standings pass; manual decisions are layered on afterwards, never
/// merged into the aggregation itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStandingRow {
    pub team_id: u32,
    pub group: GroupCode,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    /// 1-based final position; rows inside an unresolved tie share the
    /// block's first position provisionally.
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub needs_manual: bool,
    #[serde(default)]
    pub is_placeholder: bool,
}

impl TeamStandingRow {
    pub fn zeroed(team_id: u32, group: GroupCode, is_placeholder: bool) -> Self {
        TeamStandingRow {
            team_id,
            group,
            played: 0,
            won: 0,
            drawn: 0,
            lost: 0,
            goals_for: 0,
            goals_against: 0,
            points: 0,
            position: None,
            needs_manual: false,
            is_placeholder,
        }
    }

    pub fn goal_diff(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }

    /// Decisive games only; the win-percentage convention has no draws.
    pub fn decisions(&self) -> u32 {
        self.won + self.lost
    }

    pub fn win_percentage(&self) -> f64 {
        if self.decisions() == 0 {
            0.0
        } else {
            f64::from(self.won) / f64::from(self.decisions())
        }
    }

    /// Runs allowed per assumed defensive out. Approximation: the data model
    /// carries no recorded outs, so a fixed 27-outs game is assumed.
    pub fn runs_allowed_quotient(&self) -> f64 {
        if self.played == 0 {
            0.0
        } else {
            f64::from(self.goals_against) / f64::from(self.played * INNINGS_OUTS_PER_GAME)
        }
    }
}

/// Final state of one group after ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStandings {
    pub group: GroupCode,
    /// Rows in final order, positions assigned.
    pub rows: Vec<TeamStandingRow>,
    pub confirmed_matches: u32,
    pub expected_matches: u32,
    pub is_complete: bool,
}

impl GroupStandings {
    /// Row occupying 1-based `position` in the final order. For positions
    /// inside an unresolved tie this returns the row currently slotted there,
    /// which still carries `needs_manual`.
    pub fn row_at(&self, position: u32) -> Option<&TeamStandingRow> {
        self.rows.get(position.checked_sub(1)? as usize)
    }

    pub fn needs_manual(&self) -> bool {
        self.rows.iter().any(|row| row.needs_manual)
    }

    /// Plain-text table for admin surfaces and logs.
    pub fn render_text(&self) -> String {
        let mut out = String::from("Pos\tTeam\tP\tW\tD\tL\tGF\tGA\tDiff\tPts");
        for (index, row) in self.rows.iter().enumerate() {
            let marker = if row.needs_manual { "*" } else { "" };
            out += &format!(
                "\n{}{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                index + 1,
                marker,
                row.team_id,
                row.played,
                row.won,
                row.drawn,
                row.lost,
                row.goals_for,
                row.goals_against,
                row.goal_diff(),
                row.points,
            );
        }
        out
    }
}

/// One group's third-place team in the cross-group comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThirdPlaceEntry {
    pub team_id: u32,
    pub group: GroupCode,
    pub points: u32,
    pub goal_diff: i64,
    pub goals_for: u32,
    #[serde(default)]
    pub global_rank: Option<u32>,
    #[serde(default)]
    pub is_qualified: bool,
    #[serde(default)]
    pub needs_manual: bool,
    #[serde(default)]
    pub manual_override: bool,
    #[serde(default)]
    pub override_reason: Option<String>,
}

impl ThirdPlaceEntry {
    pub fn from_row(row: &TeamStandingRow) -> Self {
        ThirdPlaceEntry {
            team_id: row.team_id,
            group: row.group.clone(),
            points: row.points,
            goal_diff: row.goal_diff(),
            goals_for: row.goals_for,
            global_rank: None,
            is_qualified: false,
            needs_manual: row.needs_manual,
            manual_override: false,
            override_reason: None,
        }
    }

    /// Global comparison key, best first. Head-to-head is meaningless across
    /// groups, so only points, differential and goals apply.
    pub fn global_key(&self) -> (u32, i64, u32) {
        (self.points, self.goal_diff, self.goals_for)
    }
}

/// Cross-group third-place ranking with the qualification cutoff applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThirdPlaceRanking {
    /// Entries in global order.
    pub entries: Vec<ThirdPlaceEntry>,
    pub quota: u32,
    /// True when the cutoff falls inside a tie block; qualification for the
    /// block is withheld until an administrator decides.
    pub needs_manual_cut: bool,
    /// Qualification slots still open at the boundary (0 when unambiguous).
    pub open_slots: u32,
}

impl ThirdPlaceRanking {
    pub fn qualified_ids(&self) -> Vec<u32> {
        self.entries
            .iter()
            .filter(|entry| entry.is_qualified)
            .map(|entry| entry.team_id)
            .collect()
    }
}
