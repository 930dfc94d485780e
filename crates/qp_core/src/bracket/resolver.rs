//! Automatic slot resolution.
//!
//! One pass over the season's unresolved slots, strictly forward: group
//! standings and confirmed results feed later rounds, never the other way
//! around. Resolving a match outcome fans out to every slot referencing that
//! match in the same pass. Third-place combinations are assigned in an
//! explicit allocation step: collect eligible slots and candidates, then one
//! deterministic greedy pass in ascending bracket order. A slot an
//! administrator has forced is never touched.

use std::collections::HashSet;

use log::{debug, info};

use crate::error::{EngineError, Result};
use crate::models::{
    GroupCode, GroupStandings, MatchPhase, MatchResult, TeamEntry, ThirdPlaceRanking,
};
use crate::overrides::OverrideLedger;

use super::reference::{MatchOutcomeKind, SlotReference};
use super::slots::{BracketSlot, PendingReason};

pub struct PlaceholderResolver<'a> {
    teams: &'a [TeamEntry],
    matches: &'a [MatchResult],
    groups: &'a [GroupStandings],
    thirds: Option<&'a ThirdPlaceRanking>,
    ledger: &'a OverrideLedger,
}

#[derive(Debug, Clone)]
pub struct ResolutionReport {
    pub slots: Vec<BracketSlot>,
    /// Slots that gained a team in this pass.
    pub resolved_this_pass: u32,
    /// Distinct downstream matches whose participants changed; collaborators
    /// use this for cache invalidation.
    pub changed_matches: u32,
}

enum Outcome {
    Resolved(u32),
    /// Cannot resolve yet; expected steady state.
    Waiting(PendingReason),
    /// Cannot resolve without an administrator.
    Manual(PendingReason),
}

impl<'a> PlaceholderResolver<'a> {
    pub fn new(
        teams: &'a [TeamEntry],
        matches: &'a [MatchResult],
        groups: &'a [GroupStandings],
        thirds: Option<&'a ThirdPlaceRanking>,
        ledger: &'a OverrideLedger,
    ) -> Self {
        PlaceholderResolver {
            teams,
            matches,
            groups,
            thirds,
            ledger,
        }
    }

    pub fn resolve(&self, mut slots: Vec<BracketSlot>) -> Result<ResolutionReport> {
        slots.sort_by_key(|slot| (slot.round, slot.match_number, slot.side));
        let before: Vec<Option<u32>> = slots.iter().map(|slot| slot.resolved_team_id).collect();

        self.apply_slot_overrides(&mut slots)?;

        // Teams already standing in the bracket, concretely or via an earlier
        // resolution, are out of reach for the combination allocator.
        let mut taken = self.concrete_bracket_teams();
        for slot in &slots {
            if let Some(team_id) = slot.resolved_team_id {
                taken.insert(team_id);
            }
        }

        let mut combo_slots = Vec::new();
        for (index, slot) in slots.iter_mut().enumerate() {
            if slot.manual_override || slot.is_resolved() {
                continue;
            }
            let outcome = match &slot.reference {
                None => Outcome::Manual(PendingReason::UnparseableReference),
                Some(SlotReference::GroupPosition { group, position }) => {
                    self.group_position(group, *position)
                }
                Some(SlotReference::MatchOutcome {
                    match_number,
                    outcome,
                }) => self.match_outcome(*match_number, *outcome),
                Some(SlotReference::ThirdPlaceCombo { .. }) => {
                    combo_slots.push(index);
                    continue;
                }
            };
            apply_outcome(slot, outcome, &mut taken);
        }

        self.allocate_third_places(&mut slots, &combo_slots, &taken);

        let changed: Vec<&BracketSlot> = slots
            .iter()
            .zip(&before)
            .filter(|(slot, prior)| slot.resolved_team_id != **prior)
            .map(|(slot, _)| slot)
            .collect();
        let resolved_this_pass = changed.len() as u32;
        let changed_matches = changed
            .iter()
            .map(|slot| slot.match_number)
            .collect::<HashSet<u32>>()
            .len() as u32;

        if resolved_this_pass > 0 {
            info!(
                "placeholder pass resolved {} slot(s) across {} match(es)",
                resolved_this_pass, changed_matches
            );
        }

        Ok(ResolutionReport {
            slots,
            resolved_this_pass,
            changed_matches,
        })
    }

    /// Forced assignments are validated up front so a bad ledger entry
    /// rejects the pass before anything is touched.
    fn apply_slot_overrides(&self, slots: &mut [BracketSlot]) -> Result<()> {
        let mut decided = Vec::new();
        for (index, slot) in slots.iter().enumerate() {
            if let Some(decision) = self.ledger.slot_assignment(slot.match_number, slot.side) {
                let eligible = self
                    .teams
                    .iter()
                    .any(|team| team.team_id == decision.team_id && !team.is_placeholder);
                if !eligible {
                    return Err(EngineError::InvalidSlotAssignment {
                        match_number: decision.match_number,
                        team_id: decision.team_id,
                    });
                }
                decided.push((index, decision.team_id));
            }
        }
        for (index, team_id) in decided {
            let slot = &mut slots[index];
            slot.resolved_team_id = Some(team_id);
            slot.manual_override = true;
            slot.needs_manual = false;
            slot.pending = None;
        }
        Ok(())
    }

    /// Non-placeholder participants already seated in knockout matches.
    fn concrete_bracket_teams(&self) -> HashSet<u32> {
        let mut taken = HashSet::new();
        for result in self.matches {
            if result.phase != MatchPhase::Knockout {
                continue;
            }
            for team_id in [result.home_team_id, result.away_team_id] {
                let concrete = self
                    .teams
                    .iter()
                    .any(|team| team.team_id == team_id && !team.is_placeholder);
                if concrete {
                    taken.insert(team_id);
                }
            }
        }
        taken
    }

    fn group_position(&self, group: &GroupCode, position: u32) -> Outcome {
        let Some(standings) = self.groups.iter().find(|g| &g.group == group) else {
            return Outcome::Manual(PendingReason::UnknownGroup {
                group: group.clone(),
            });
        };
        if !standings.is_complete {
            return Outcome::Waiting(PendingReason::GroupIncomplete {
                group: group.clone(),
            });
        }
        let Some(row) = standings.row_at(position) else {
            return Outcome::Manual(PendingReason::UnknownGroup {
                group: group.clone(),
            });
        };
        if row.needs_manual {
            return Outcome::Waiting(PendingReason::PositionUnsettled {
                group: group.clone(),
            });
        }
        if row.is_placeholder {
            return Outcome::Waiting(PendingReason::PlaceholderOccupant {
                group: group.clone(),
            });
        }
        Outcome::Resolved(row.team_id)
    }

    fn match_outcome(&self, match_number: u32, outcome: MatchOutcomeKind) -> Outcome {
        let Some(result) = self
            .matches
            .iter()
            .find(|m| m.match_number == match_number)
        else {
            return Outcome::Manual(PendingReason::UnknownMatch { match_number });
        };
        if !result.has_confirmed_score() {
            return Outcome::Waiting(PendingReason::MatchUnconfirmed { match_number });
        }
        let team = match outcome {
            MatchOutcomeKind::Winner => result.winner(),
            MatchOutcomeKind::Loser => result.loser(),
        };
        let Some(team_id) = team else {
            return Outcome::Manual(PendingReason::MatchLevelNoDecision { match_number });
        };
        let placeholder = self
            .teams
            .iter()
            .any(|entry| entry.team_id == team_id && entry.is_placeholder);
        if placeholder {
            return Outcome::Waiting(PendingReason::UpstreamPlaceholder { match_number });
        }
        Outcome::Resolved(team_id)
    }

    /// Greedy assignment of qualified third-place teams to combination
    /// slots, best global rank first, ascending bracket order, never
    /// reusing a team. The consumed set lives only inside this pass.
    fn allocate_third_places(
        &self,
        slots: &mut [BracketSlot],
        combo_slots: &[usize],
        taken: &HashSet<u32>,
    ) {
        let Some(ranking) = self.thirds else {
            for index in combo_slots {
                let slot = &mut slots[*index];
                slot.needs_manual = false;
                slot.pending = Some(PendingReason::ThirdPlaceNotFinal);
            }
            return;
        };

        let candidates: Vec<_> = ranking
            .entries
            .iter()
            .filter(|entry| entry.is_qualified && !taken.contains(&entry.team_id))
            .collect();

        let mut consumed: HashSet<u32> = HashSet::new();
        for index in combo_slots {
            let slot = &mut slots[*index];
            let Some(SlotReference::ThirdPlaceCombo { allowed_groups }) = &slot.reference else {
                continue;
            };
            let pick = candidates.iter().find(|entry| {
                !consumed.contains(&entry.team_id) && allowed_groups.contains(&entry.group)
            });
            match pick {
                Some(entry) => {
                    debug!(
                        "slot {}/{:?} takes third-place {} from group {}",
                        slot.match_number, slot.side, entry.team_id, entry.group
                    );
                    slot.resolved_team_id = Some(entry.team_id);
                    slot.needs_manual = false;
                    slot.pending = None;
                    consumed.insert(entry.team_id);
                }
                None => {
                    slot.needs_manual = false;
                    slot.pending = Some(if ranking.needs_manual_cut {
                        PendingReason::ThirdPlaceNotFinal
                    } else {
                        PendingReason::NoCandidateAvailable
                    });
                }
            }
        }
    }
}

fn apply_outcome(slot: &mut BracketSlot, outcome: Outcome, taken: &mut HashSet<u32>) {
    match outcome {
        Outcome::Resolved(team_id) => {
            slot.resolved_team_id = Some(team_id);
            slot.needs_manual = false;
            slot.pending = None;
            taken.insert(team_id);
        }
        Outcome::Waiting(reason) => {
            slot.needs_manual = false;
            slot.pending = Some(reason);
        }
        Outcome::Manual(reason) => {
            slot.needs_manual = true;
            slot.pending = Some(reason);
        }
    }
}
