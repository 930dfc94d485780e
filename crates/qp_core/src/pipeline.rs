//! One recompute pass.
//!
//! Synchronous and stateless: tables, tie-breaks, third-place ranking and
//! placeholder resolution run as one sequential pipeline over the inputs and
//! produce a complete snapshot, or fail with a specific reason and produce
//! nothing. Concurrent passes for the same season must be serialized at the
//! persistence boundary; the pipeline assumes it is the sole writer while it
//! runs.

use std::collections::HashSet;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::bracket::{build_slots, BracketSlot, PlaceholderResolver};
use crate::error::{EngineError, Result};
use crate::models::{
    GroupCode, GroupStandings, MatchPhase, MatchResult, TeamEntry, ThirdPlaceRanking,
    TournamentRules,
};
use crate::overrides::OverrideLedger;
use crate::standings::{collect_third_place, rank_third_places, GroupRanker};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageInputs {
    pub rules: TournamentRules,
    pub teams: Vec<TeamEntry>,
    pub matches: Vec<MatchResult>,
    #[serde(default)]
    pub overrides: OverrideLedger,
}

/// Complete output of one pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSnapshot {
    pub groups: Vec<GroupStandings>,
    /// Present only when the sport uses third-place qualification and every
    /// group is complete.
    pub third_place: Option<ThirdPlaceRanking>,
    pub slots: Vec<BracketSlot>,
    pub resolved_this_pass: u32,
    pub changed_matches: u32,
}

impl StageSnapshot {
    pub fn group(&self, code: &GroupCode) -> Option<&GroupStandings> {
        self.groups.iter().find(|standings| &standings.group == code)
    }

    /// Whether the whole group stage may be declared closed: everything
    /// played and no tie waiting on an administrator.
    pub fn group_stage_closed(&self) -> bool {
        !self.groups.is_empty()
            && self
                .groups
                .iter()
                .all(|standings| standings.is_complete && !standings.needs_manual())
    }
}

pub fn recompute(inputs: &StageInputs) -> Result<StageSnapshot> {
    validate(inputs)?;

    let mut group_codes: Vec<GroupCode> = Vec::new();
    for team in &inputs.teams {
        if let Some(group) = &team.group {
            if !group_codes.contains(group) {
                group_codes.push(group.clone());
            }
        }
    }
    group_codes.sort();

    let ranker = GroupRanker::new(&inputs.rules, &inputs.overrides);
    let mut groups = Vec::with_capacity(group_codes.len());
    for code in &group_codes {
        let standings = ranker.rank(code, &inputs.teams, &inputs.matches)?;
        debug!(
            "group {}: {}/{} matches, complete={}",
            code, standings.confirmed_matches, standings.expected_matches, standings.is_complete
        );
        groups.push(standings);
    }

    let all_complete = !groups.is_empty() && groups.iter().all(|g| g.is_complete);
    let third_place = if inputs.rules.third_place_enabled && all_complete {
        let entries = collect_third_place(&groups);
        Some(rank_third_places(
            entries,
            inputs.rules.qualification_quota,
            &inputs.overrides,
        )?)
    } else {
        None
    };

    let (slots, resolved_this_pass, changed_matches) = if inputs.rules.bracket_enabled {
        let slots = build_slots(&inputs.teams, &inputs.matches);
        let resolver = PlaceholderResolver::new(
            &inputs.teams,
            &inputs.matches,
            &groups,
            third_place.as_ref(),
            &inputs.overrides,
        );
        let report = resolver.resolve(slots)?;
        (report.slots, report.resolved_this_pass, report.changed_matches)
    } else {
        (Vec::new(), 0, 0)
    };

    info!(
        "recompute: {} group(s), thirds={}, {} slot(s) open, {} resolved",
        groups.len(),
        third_place.is_some(),
        slots.iter().filter(|slot| !slot.is_resolved()).count(),
        resolved_this_pass
    );

    Ok(StageSnapshot {
        groups,
        third_place,
        slots,
        resolved_this_pass,
        changed_matches,
    })
}

/// Input-consistency checks. Failing any of them rejects the pass before
/// anything is computed, so a caller never sees partial output.
fn validate(inputs: &StageInputs) -> Result<()> {
    let mut seen = HashSet::new();
    for result in &inputs.matches {
        if !seen.insert(result.match_number) {
            return Err(EngineError::DuplicateMatchNumber {
                match_number: result.match_number,
            });
        }

        for team_id in [result.home_team_id, result.away_team_id] {
            let entry = inputs
                .teams
                .iter()
                .find(|team| team.team_id == team_id)
                .ok_or(EngineError::UnknownTeam {
                    team_id,
                    match_number: result.match_number,
                })?;

            if result.phase == MatchPhase::Group {
                let group = result.group.as_ref().ok_or(EngineError::MissingGroupCode {
                    match_number: result.match_number,
                })?;
                if entry.group.as_ref() != Some(group) {
                    return Err(EngineError::GroupMismatch {
                        match_number: result.match_number,
                        group: group.to_string(),
                        team_id,
                    });
                }
            }
        }
    }
    Ok(())
}
