use serde::{Deserialize, Serialize};

use super::team::GroupCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Group,
    Knockout,
}

/// One match as reported by the results feed. Only `confirmed` results with
/// both scores present participate in standings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub match_number: u32,
    pub phase: MatchPhase,
    /// Knockout round ordinal (1 = first knockout round). 0 for group play.
    #[serde(default)]
    pub round: u8,
    #[serde(default)]
    pub group: Option<GroupCode>,
    pub home_team_id: u32,
    pub away_team_id: u32,
    #[serde(default)]
    pub home_score: Option<u32>,
    #[serde(default)]
    pub away_score: Option<u32>,
    pub confirmed: bool,
    /// Team that advances when a knockout result is level after the decider
    /// (shoot-out or drawing of lots). Ignored for decisive results.
    #[serde(default)]
    pub advances_on_level: Option<u32>,
}

impl MatchResult {
    pub fn has_confirmed_score(&self) -> bool {
        self.confirmed && self.home_score.is_some() && self.away_score.is_some()
    }

    pub fn involves(&self, team_id: u32) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    pub fn scores(&self) -> Option<(u32, u32)> {
        if self.confirmed {
            Some((self.home_score?, self.away_score?))
        } else {
            None
        }
    }

    /// Winner of a confirmed match, through the advance decision when level.
    pub fn winner(&self) -> Option<u32> {
        let (home, away) = self.scores()?;
        if home > away {
            Some(self.home_team_id)
        } else if away > home {
            Some(self.away_team_id)
        } else {
            self.advances_on_level.filter(|id| self.involves(*id))
        }
    }

    pub fn loser(&self) -> Option<u32> {
        let winner = self.winner()?;
        if winner == self.home_team_id {
            Some(self.away_team_id)
        } else {
            Some(self.home_team_id)
        }
    }
}
