use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("group {group} has no teams")]
    EmptyGroup { group: String },

    #[error("unknown team id {team_id} in match {match_number}")]
    UnknownTeam { team_id: u32, match_number: u32 },

    #[error("duplicate match number {match_number}")]
    DuplicateMatchNumber { match_number: u32 },

    #[error("group-phase match {match_number} carries no group code")]
    MissingGroupCode { match_number: u32 },

    #[error("match {match_number} is listed under group {group} but team {team_id} is not")]
    GroupMismatch {
        match_number: u32,
        group: String,
        team_id: u32,
    },

    #[error("manual order for group {group} must list each of its {expected} teams exactly once")]
    InvalidGroupOrder { group: String, expected: usize },

    #[error("manual qualification must select exactly {expected} teams, got {got}")]
    QualificationSizeMismatch { expected: u32, got: u32 },

    #[error("duplicate team {team_id} in manual qualification")]
    DuplicateQualificationPick { team_id: u32 },

    #[error("manual qualification must keep locked qualifier {team_id}")]
    LockedQualifierDropped { team_id: u32 },

    #[error("team {team_id} is not a legal qualification candidate")]
    QualificationOutsideCandidates { team_id: u32 },

    #[error("manual qualification must take exactly {open} teams from the tied block, got {got}")]
    TieBlockCountMismatch { open: u32, got: u32 },

    #[error("manual assignment for match {match_number} names team {team_id} which is not an eligible candidate")]
    InvalidSlotAssignment { match_number: u32, team_id: u32 },

    #[error("unsupported schema version {found}, expected {expected}")]
    SchemaVersion { found: u8, expected: u8 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// True for errors caused by a bad request or override submission, as
    /// opposed to engine-internal failures. Validation errors are safe to
    /// surface verbatim to an administrator.
    pub fn is_validation(&self) -> bool {
        !matches!(self, EngineError::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
