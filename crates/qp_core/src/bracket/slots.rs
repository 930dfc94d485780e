//! Bracket slots.
//!
//! One slot per placeholder side of a knockout match. Sides whose
//! participant is already a concrete team need no resolution and produce no
//! slot.

use serde::{Deserialize, Serialize};

use crate::models::{GroupCode, MatchPhase, MatchResult, TeamEntry};

use super::reference::{parse_reference, SlotReference};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSide {
    Home,
    Away,
}

/// Why a slot could not be resolved in the latest pass. Most of these are
/// the expected steady state of an in-progress tournament, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingReason {
    /// The reference text did not parse; an administrator has to assign.
    UnparseableReference,
    /// The referenced match number does not exist in the season.
    UnknownMatch { match_number: u32 },
    /// The referenced group does not exist in the season, or lacks the
    /// referenced position.
    UnknownGroup { group: GroupCode },
    /// The referenced match has no confirmed score yet.
    MatchUnconfirmed { match_number: u32 },
    /// The referenced match ended level and no advance decision was
    /// recorded; an administrator has to decide.
    MatchLevelNoDecision { match_number: u32 },
    /// The referenced match outcome points at a still-unresolved
    /// placeholder.
    UpstreamPlaceholder { match_number: u32 },
    /// The referenced group has unplayed matches.
    GroupIncomplete { group: GroupCode },
    /// The referenced position sits inside an unresolved tie.
    PositionUnsettled { group: GroupCode },
    /// The referenced position is occupied by a placeholder competitor.
    PlaceholderOccupant { group: GroupCode },
    /// Third-place qualification is not final yet.
    ThirdPlaceNotFinal,
    /// Every allowed qualified third-place team is already taken.
    NoCandidateAvailable,
}

/// One side of one knockout match that still awaits a concrete team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BracketSlot {
    pub round: u8,
    pub match_number: u32,
    pub side: SlotSide,
    /// The placeholder roster entry occupying the side.
    pub placeholder_team_id: u32,
    /// Original catalog text for the slot.
    pub source_text: String,
    #[serde(default)]
    pub reference: Option<SlotReference>,
    #[serde(default)]
    pub resolved_team_id: Option<u32>,
    #[serde(default)]
    pub needs_manual: bool,
    #[serde(default)]
    pub manual_override: bool,
    #[serde(default)]
    pub pending: Option<PendingReason>,
}

impl BracketSlot {
    pub fn is_resolved(&self) -> bool {
        self.resolved_team_id.is_some()
    }
}

/// Derive the resolvable slots for a season, in ascending bracket order.
/// Prior resolutions persist outside the engine as updated match
/// participants, so a side only yields a slot while its participant is still
/// a placeholder.
pub fn build_slots(teams: &[TeamEntry], matches: &[MatchResult]) -> Vec<BracketSlot> {
    let mut knockout: Vec<&MatchResult> = matches
        .iter()
        .filter(|m| m.phase == MatchPhase::Knockout)
        .collect();
    knockout.sort_by_key(|m| (m.round, m.match_number));

    let mut slots = Vec::new();
    for result in knockout {
        for (side, team_id) in [
            (SlotSide::Home, result.home_team_id),
            (SlotSide::Away, result.away_team_id),
        ] {
            let Some(entry) = teams.iter().find(|t| t.team_id == team_id) else {
                continue;
            };
            if !entry.is_placeholder {
                continue;
            }
            let source_text = entry.placeholder_rule.clone().unwrap_or_default();
            let reference = parse_reference(&source_text);
            slots.push(BracketSlot {
                round: result.round,
                match_number: result.match_number,
                side,
                placeholder_team_id: team_id,
                source_text,
                reference,
                resolved_team_id: None,
                needs_manual: false,
                manual_override: false,
                pending: None,
            });
        }
    }
    slots
}
