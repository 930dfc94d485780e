//! Knockout bracket: slot references, their parser, and automatic
//! resolution of placeholder participants.

pub mod reference;
pub mod resolver;
pub mod slots;

pub use reference::{parse_reference, MatchOutcomeKind, SlotReference};
pub use resolver::{PlaceholderResolver, ResolutionReport};
pub use slots::{build_slots, BracketSlot, PendingReason, SlotSide};
