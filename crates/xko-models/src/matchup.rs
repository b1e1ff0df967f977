//! Matchup types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of matchup being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchupType {
    /// Both players on the same character.
    #[default]
    Mirror,
    /// Different characters. Recognized but not analyzed yet.
    Different,
}

impl MatchupType {
    pub const ALL: [MatchupType; 2] = [MatchupType::Mirror, MatchupType::Different];

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchupType::Mirror => "mirror",
            MatchupType::Different => "different",
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, MatchupType::Mirror)
    }

    /// Names of the matchups that can be analyzed.
    pub fn supported() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .filter(|m| m.is_supported())
            .map(|m| m.as_str())
            .collect()
    }
}

impl fmt::Display for MatchupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MatchupType {
    type Err = MatchupParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mirror" => Ok(MatchupType::Mirror),
            "different" => Ok(MatchupType::Different),
            _ => Err(MatchupParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("Unknown matchup type: {0}")]
pub struct MatchupParseError(pub String);
