//! # qp_core - Group-Stage Standings & Bracket Resolution Engine
//!
//! This library turns confirmed match results into ranked group tables,
//! resolves ties under two sporting conventions, ranks cross-group
//! third-place finishers against a qualification cutoff, and resolves
//! placeholder bracket participants ("Ganador Partido 77", "1º Grupo A") as
//! a tournament progresses. It backs the prediction-pool web application; the
//! web/persistence layers talk to it through the JSON API.
//!
//! ## Properties
//! - Pure and synchronous: every pass is a function of results, roster and
//!   recorded overrides, all-or-nothing
//! - Deterministic: identical inputs give identical output, including the
//!   set of ties left for manual decision
//! - Ambiguity is state, not failure: unresolvable ties and pending slots
//!   come back flagged, never as errors

pub mod api;
pub mod bracket;
pub mod error;
pub mod models;
pub mod overrides;
pub mod pipeline;
pub mod standings;

// Re-export the collaborator surface
pub use api::{parse_slot_reference_json, recompute_stage_json, validate_qualification_json};
pub use error::{EngineError, Result};

// Re-export the core model types
pub use bracket::{BracketSlot, MatchOutcomeKind, PendingReason, SlotReference, SlotSide};
pub use models::{
    GroupCode, GroupStandings, MatchPhase, MatchResult, RankingConvention, TeamEntry,
    TeamStandingRow, ThirdPlaceEntry, ThirdPlaceRanking, TournamentRules,
};
pub use overrides::OverrideLedger;
pub use pipeline::{recompute, StageInputs, StageSnapshot};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
