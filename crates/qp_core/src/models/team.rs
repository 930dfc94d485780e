use serde::{Deserialize, Serialize};
use std::fmt;

/// Group identifier within a season ("A", "B", ...). Codes are kept verbatim
/// as supplied by the catalog; the reference parser normalizes to uppercase
/// before producing one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupCode(String);

impl GroupCode {
    pub fn new(code: impl Into<String>) -> Self {
        GroupCode(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupCode {
    fn from(code: &str) -> Self {
        GroupCode::new(code)
    }
}

/// One roster entry for a season. Placeholder entries are provisional
/// competitors ("Ganador Partido 77") that accumulate group statistics like
/// any other team until their identity is resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamEntry {
    pub team_id: u32,
    /// None for knockout-only entries.
    #[serde(default)]
    pub group: Option<GroupCode>,
    #[serde(default)]
    pub is_placeholder: bool,
    /// Free-form slot reference text as entered in the catalog.
    #[serde(default)]
    pub placeholder_rule: Option<String>,
}

impl TeamEntry {
    pub fn concrete(team_id: u32, group: impl Into<GroupCode>) -> Self {
        TeamEntry {
            team_id,
            group: Some(group.into()),
            is_placeholder: false,
            placeholder_rule: None,
        }
    }

    pub fn placeholder(team_id: u32, rule: impl Into<String>) -> Self {
        TeamEntry {
            team_id,
            group: None,
            is_placeholder: true,
            placeholder_rule: Some(rule.into()),
        }
    }
}
