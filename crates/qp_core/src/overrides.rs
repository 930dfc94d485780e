//! Administrator decisions that supersede computed order.
//!
//! The ledger is plain data handed in by the persistence collaborator and
//! re-applied at the start of every pass, so recomputation is idempotent with
//! respect to existing decisions. Application is scoped strictly to the
//! ambiguous subset of each output; decisions never leak into rows the engine
//! decided on its own. Two administrators racing on the same season are kept
//! apart by the collaborator's per-season serialization, not in here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bracket::slots::SlotSide;
use crate::models::GroupCode;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverrideLedger {
    #[serde(default)]
    pub group_orders: Vec<GroupOrderOverride>,
    #[serde(default)]
    pub qualification: Option<QualificationOverride>,
    #[serde(default)]
    pub slot_assignments: Vec<SlotAssignmentOverride>,
}

/// Full group order as decided by an administrator. Only the ambiguous
/// chunks of the computed order take their relative order from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupOrderOverride {
    pub group: GroupCode,
    pub order: Vec<u32>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

/// The complete qualified third-place set, exactly quota-sized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualificationOverride {
    pub team_ids: Vec<u32>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

/// Direct assignment of one bracket slot. A slot set this way is never
/// touched by automatic resolution again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotAssignmentOverride {
    pub match_number: u32,
    pub side: SlotSide,
    pub team_id: u32,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
}

impl OverrideLedger {
    /// Latest recorded order for `group`, if any. Re-submissions append, so
    /// the newest entry wins on replay.
    pub fn group_order(&self, group: &GroupCode) -> Option<&GroupOrderOverride> {
        self.group_orders.iter().rev().find(|o| &o.group == group)
    }

    pub fn slot_assignment(&self, match_number: u32, side: SlotSide) -> Option<&SlotAssignmentOverride> {
        self.slot_assignments
            .iter()
            .rev()
            .find(|o| o.match_number == match_number && o.side == side)
    }

    pub fn is_empty(&self) -> bool {
        self.group_orders.is_empty()
            && self.qualification.is_none()
            && self.slot_assignments.is_empty()
    }
}
