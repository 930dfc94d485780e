pub mod stage_json;

pub use stage_json::{
    parse_slot_reference_json, recompute_stage_json, validate_qualification_json, ReferenceRequest,
    StageRequest,
};

/// Stable error code prefixes for collaborator-side handling.
pub mod error_codes {
    pub const INVALID_SCHEMA_VERSION: &str = "INVALID_SCHEMA_VERSION";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INVALID_INPUT: &str = "INVALID_INPUT";
    pub const SERIALIZATION: &str = "SERIALIZATION";
}
