//! JSON boundary for collaborators.
//!
//! The web layer talks to the engine through these functions: plain JSON in,
//! plain JSON out, errors as "CODE: message" strings. Requests carry a
//! schema version so both sides can evolve independently.

use serde::{Deserialize, Serialize};

use crate::bracket::reference::{parse_reference, SlotReference};
use crate::error::EngineError;
use crate::models::{MatchResult, TeamEntry, TournamentRules};
use crate::overrides::OverrideLedger;
use crate::pipeline::{recompute, StageInputs, StageSnapshot};
use crate::SCHEMA_VERSION;

use super::error_codes;

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn check_schema_version(found: u8) -> Result<(), String> {
    if found == SCHEMA_VERSION {
        Ok(())
    } else {
        Err(err_code(
            error_codes::INVALID_SCHEMA_VERSION,
            EngineError::SchemaVersion {
                found,
                expected: SCHEMA_VERSION,
            },
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct StageRequest {
    pub schema_version: u8,
    pub rules: TournamentRules,
    pub teams: Vec<TeamEntry>,
    pub matches: Vec<MatchResult>,
    #[serde(default)]
    pub overrides: OverrideLedger,
}

#[derive(Debug, Serialize)]
struct StageResponse {
    schema_version: u8,
    #[serde(flatten)]
    snapshot: StageSnapshot,
    group_stage_closed: bool,
}

/// Run one full recompute pass over a season.
pub fn recompute_stage_json(request_json: &str) -> Result<String, String> {
    let request: StageRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, e))?;
    check_schema_version(request.schema_version)?;

    let inputs = StageInputs {
        rules: request.rules,
        teams: request.teams,
        matches: request.matches,
        overrides: request.overrides,
    };
    let snapshot = recompute(&inputs).map_err(|e| err_code(error_codes::INVALID_INPUT, e))?;

    let response = StageResponse {
        schema_version: SCHEMA_VERSION,
        group_stage_closed: snapshot.group_stage_closed(),
        snapshot,
    };
    serde_json::to_string(&response).map_err(|e| err_code(error_codes::SERIALIZATION, e))
}

#[derive(Debug, Deserialize)]
pub struct ReferenceRequest {
    pub schema_version: u8,
    pub text: String,
}

#[derive(Debug, Serialize)]
struct ReferenceResponse {
    schema_version: u8,
    reference: Option<SlotReference>,
}

/// Parse slot reference text at data-entry time. Unrecognized text yields a
/// null reference, not an error; the slot will wait for an administrator.
pub fn parse_slot_reference_json(request_json: &str) -> Result<String, String> {
    let request: ReferenceRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, e))?;
    check_schema_version(request.schema_version)?;

    let response = ReferenceResponse {
        schema_version: SCHEMA_VERSION,
        reference: parse_reference(&request.text),
    };
    serde_json::to_string(&response).map_err(|e| err_code(error_codes::SERIALIZATION, e))
}

#[derive(Debug, Deserialize)]
pub struct QualificationCheckRequest {
    pub schema_version: u8,
    pub rules: TournamentRules,
    pub teams: Vec<TeamEntry>,
    pub matches: Vec<MatchResult>,
    #[serde(default)]
    pub overrides: OverrideLedger,
    /// Candidate qualified set to validate, before recording it.
    pub picks: Vec<u32>,
}

#[derive(Debug, Serialize)]
struct QualificationCheckResponse {
    schema_version: u8,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Validate a manual third-place qualification against the current automatic
/// state without recording anything. Meant for submission-time checks in the
/// admin surface.
pub fn validate_qualification_json(request_json: &str) -> Result<String, String> {
    let request: QualificationCheckRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, e))?;
    check_schema_version(request.schema_version)?;

    let inputs = StageInputs {
        rules: request.rules,
        teams: request.teams,
        matches: request.matches,
        overrides: request.overrides,
    };
    let snapshot = recompute(&inputs).map_err(|e| err_code(error_codes::INVALID_INPUT, e))?;
    let Some(third_place) = snapshot.third_place else {
        return Err(err_code(
            error_codes::INVALID_INPUT,
            "third-place ranking is not available for this season yet",
        ));
    };

    let (valid, reason) = match third_place.validate_manual_selection(&request.picks) {
        Ok(()) => (true, None),
        Err(e) => (false, Some(e.to_string())),
    };
    let response = QualificationCheckResponse {
        schema_version: SCHEMA_VERSION,
        valid,
        reason,
    };
    serde_json::to_string(&response).map_err(|e| err_code(error_codes::SERIALIZATION, e))
}
