//! Mistakes, missed punishes and their enrichment context.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Actor, Leader};

/// How costly a mistake is.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        };
        write!(f, "{}", s)
    }
}

/// Mistake taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MistakeKind {
    /// Negative-on-block move thrown out without conditioning.
    UnsafeMove,
    /// Assist-dependent special used without an assist call.
    UnsafeSpecial,
    /// Opponent's unsafe move went unpunished.
    MissedPunish,
}

impl MistakeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MistakeKind::UnsafeMove => "unsafe_move",
            MistakeKind::UnsafeSpecial => "unsafe_special",
            MistakeKind::MissedPunish => "missed_punish",
        }
    }

    /// Whether this counts toward the unsafe-moves stat.
    pub fn is_unsafe(&self) -> bool {
        matches!(self, MistakeKind::UnsafeMove | MistakeKind::UnsafeSpecial)
    }
}

impl fmt::Display for MistakeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Context added after classification by the enrichment pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MistakeContext {
    pub player_name: String,
    /// Plain-English move name.
    pub move_plain: String,
    pub description_plain: String,
    /// Opponent move notations inside the context window.
    pub opponent_response: Vec<String>,
    pub opponent_response_description: String,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub round: u32,
    pub leader: Leader,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_suggestion: Option<String>,
}

/// A notable negative situation for one player.
///
/// Missed punishes share this record and are reported as opportunities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Mistake {
    pub timestamp: f64,
    pub frame_index: u64,
    #[serde(rename = "player")]
    pub actor: Actor,
    #[serde(rename = "type")]
    pub kind: MistakeKind,
    #[serde(default, rename = "move", skip_serializing_if = "Option::is_none")]
    pub move_ref: Option<String>,
    pub severity: Severity,
    pub description: String,
    pub suggestion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<MistakeContext>,
}

impl Mistake {
    pub fn new(
        timestamp: f64,
        frame_index: u64,
        actor: Actor,
        kind: MistakeKind,
        severity: Severity,
    ) -> Self {
        Self {
            timestamp,
            frame_index,
            actor,
            kind,
            move_ref: None,
            severity,
            description: String::new(),
            suggestion: String::new(),
            context: None,
        }
    }

    pub fn with_move(mut self, notation: impl Into<String>) -> Self {
        self.move_ref = Some(notation.into());
        self
    }

    pub fn with_text(mut self, description: impl Into<String>, suggestion: impl Into<String>) -> Self {
        self.description = description.into();
        self.suggestion = suggestion.into();
        self
    }

    /// Best description available: the enriched one when present.
    pub fn best_description(&self) -> &str {
        self.context
            .as_ref()
            .map(|c| c.description_plain.as_str())
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.description)
    }
}
