//! Group-stage standings: aggregation, ranking, tie-breaking, and the
//! cross-group third-place comparison.

pub mod group;
pub mod table;
pub mod third_place;
pub mod tiebreak;

#[cfg(test)]
mod tests;

pub use group::GroupRanker;
pub use table::{build_group_table, GroupTable};
pub use third_place::{collect_third_place, rank_third_places};
pub use tiebreak::{strategy_for, BlockResolution, TieBreak};
