//! Cross-group third-place ranking and the qualification cutoff.
//!
//! Head-to-head is meaningless across groups, so the global key (points,
//! goal differential, goals-for) is the whole comparison. The only ambiguity
//! that matters is a tie block spanning the cutoff rank; everything above it
//! is locked, everything below it is out, and the block itself waits for an
//! administrator.

use log::warn;

use crate::error::{EngineError, Result};
use crate::models::{GroupStandings, ThirdPlaceEntry, ThirdPlaceRanking};
use crate::overrides::{OverrideLedger, QualificationOverride};

/// One entry per group: whoever occupies the third row of the final order.
/// An entry whose identity is still inside an unresolved group tie carries
/// `needs_manual` from its row.
pub fn collect_third_place(groups: &[GroupStandings]) -> Vec<ThirdPlaceEntry> {
    groups
        .iter()
        .filter_map(|standings| standings.rows.get(2).map(ThirdPlaceEntry::from_row))
        .collect()
}

pub fn rank_third_places(
    entries: Vec<ThirdPlaceEntry>,
    quota: u32,
    ledger: &OverrideLedger,
) -> Result<ThirdPlaceRanking> {
    let mut entries = entries;
    entries.sort_by(|a, b| b.global_key().cmp(&a.global_key()));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.global_rank = Some(index as u32 + 1);
    }

    let mut ranking = ThirdPlaceRanking {
        entries,
        quota,
        needs_manual_cut: false,
        open_slots: 0,
    };

    let cut = quota as usize;
    let boundary_tied = cut > 0
        && ranking.entries.len() > cut
        && ranking.entries[cut - 1].global_key() == ranking.entries[cut].global_key();

    if boundary_tied {
        let cut_key = ranking.entries[cut - 1].global_key();
        let start = ranking
            .entries
            .iter()
            .position(|entry| entry.global_key() == cut_key)
            .expect("boundary entry exists");
        let end = ranking
            .entries
            .iter()
            .rposition(|entry| entry.global_key() == cut_key)
            .expect("boundary entry exists")
            + 1;

        ranking.needs_manual_cut = true;
        ranking.open_slots = quota - start as u32;
        for (index, entry) in ranking.entries.iter_mut().enumerate() {
            entry.is_qualified = index < start;
            if (start..end).contains(&index) {
                entry.needs_manual = true;
            }
        }
        warn!(
            "third-place cutoff falls inside a {}-team tie, {} slot(s) open",
            end - start,
            ranking.open_slots
        );
    } else {
        for (index, entry) in ranking.entries.iter_mut().enumerate() {
            entry.is_qualified = index < cut;
        }
    }

    if let Some(decision) = &ledger.qualification {
        apply_qualification(&mut ranking, decision)?;
    }
    Ok(ranking)
}

impl ThirdPlaceRanking {
    fn tie_block_ids(&self) -> Vec<u32> {
        self.entries
            .iter()
            .filter(|entry| entry.needs_manual)
            .map(|entry| entry.team_id)
            .collect()
    }

    fn locked_ids(&self) -> Vec<u32> {
        self.entries
            .iter()
            .filter(|entry| entry.is_qualified)
            .map(|entry| entry.team_id)
            .collect()
    }

    /// Check an administrator's full qualified set against the contract:
    /// exactly quota entries, every locked qualifier kept, exactly the open
    /// number of picks from the tie block, nobody from outside either set.
    /// Violations are rejected, never corrected.
    pub fn validate_manual_selection(&self, picks: &[u32]) -> Result<()> {
        if picks.len() != self.quota as usize {
            return Err(EngineError::QualificationSizeMismatch {
                expected: self.quota,
                got: picks.len() as u32,
            });
        }
        for (index, pick) in picks.iter().enumerate() {
            if picks[..index].contains(pick) {
                return Err(EngineError::DuplicateQualificationPick { team_id: *pick });
            }
        }

        let locked = self.locked_ids();
        let block = self.tie_block_ids();

        for id in &locked {
            if !picks.contains(id) {
                return Err(EngineError::LockedQualifierDropped { team_id: *id });
            }
        }
        for pick in picks {
            if !locked.contains(pick) && !block.contains(pick) {
                return Err(EngineError::QualificationOutsideCandidates { team_id: *pick });
            }
        }

        let from_block = picks.iter().filter(|pick| block.contains(pick)).count() as u32;
        if from_block != self.open_slots {
            return Err(EngineError::TieBlockCountMismatch {
                open: self.open_slots,
                got: from_block,
            });
        }
        Ok(())
    }
}

fn apply_qualification(
    ranking: &mut ThirdPlaceRanking,
    decision: &QualificationOverride,
) -> Result<()> {
    ranking.validate_manual_selection(&decision.team_ids)?;

    for entry in &mut ranking.entries {
        entry.is_qualified = decision.team_ids.contains(&entry.team_id);
        if entry.needs_manual {
            entry.needs_manual = false;
            entry.manual_override = true;
            entry.override_reason = decision.reason.clone();
        }
    }
    ranking.needs_manual_cut = false;
    ranking.open_slots = 0;
    Ok(())
}
