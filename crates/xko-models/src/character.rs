//! Character profiles and move frame data.
//!
//! Every character is described by the same data-driven record. Frame data
//! that is not known is `None`; nothing is estimated.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a move must be guarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GuardType {
    High,
    Air,
    Low,
    Unblockable,
}

/// Coarse risk rating for a move.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

/// Frame data and metadata for one move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MoveData {
    pub name: String,
    pub notation: String,
    #[serde(default)]
    pub damage: Option<u32>,
    #[serde(default)]
    pub guard: Vec<GuardType>,
    #[serde(default)]
    pub startup: Option<u32>,
    #[serde(default)]
    pub active: Option<u32>,
    #[serde(default)]
    pub recovery: Option<u32>,
    /// Frame advantage on block. Negative favors the defender.
    #[serde(default)]
    pub on_block: Option<i32>,
    /// Unsafe unless covered by an assist.
    #[serde(default)]
    pub requires_assist: bool,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub is_super: bool,
    #[serde(default)]
    pub is_grab: bool,
    /// Ranged move that whiffs or loses when used point-blank.
    #[serde(default)]
    pub mid_range: bool,
    #[serde(default)]
    pub description: String,
}

impl MoveData {
    pub fn new(notation: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notation: notation.into(),
            damage: None,
            guard: Vec::new(),
            startup: None,
            active: None,
            recovery: None,
            on_block: None,
            requires_assist: false,
            risk_level: RiskLevel::Low,
            is_special: false,
            is_super: false,
            is_grab: false,
            mid_range: false,
            description: String::new(),
        }
    }

    /// Safe on block. Unknown frame data is not treated as safe.
    pub fn is_safe(&self) -> bool {
        matches!(self.on_block, Some(adv) if adv >= 0)
    }

    /// Frames the opponent has to punish after a block.
    pub fn punish_window(&self) -> u32 {
        match self.on_block {
            Some(adv) if adv < 0 => adv.unsigned_abs(),
            _ => 0,
        }
    }

    /// Total frames from input to recovery, when all parts are known.
    pub fn total_frames(&self) -> Option<u32> {
        Some(self.startup? + self.active? + self.recovery?)
    }
}

/// A documented combo route for a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComboRoute {
    pub name: String,
    pub notation: Vec<String>,
    #[serde(default)]
    pub damage: Option<u32>,
    #[serde(default)]
    pub difficulty: String,
}

/// Everything the analyzer knows about one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CharacterProfile {
    pub name: String,
    pub archetype: String,
    pub health: u32,
    #[serde(default)]
    pub playstyle: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub moves: BTreeMap<String, MoveData>,
    #[serde(default)]
    pub combos: Vec<ComboRoute>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

impl CharacterProfile {
    pub fn move_data(&self, notation: &str) -> Option<&MoveData> {
        self.moves.get(notation)
    }

    pub fn special_moves(&self) -> impl Iterator<Item = &MoveData> {
        self.moves.values().filter(|m| m.is_special)
    }

    pub fn unsafe_moves(&self) -> impl Iterator<Item = &MoveData> {
        self.moves.values().filter(|m| m.punish_window() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_safe_and_punish_window() {
        let mut mv = MoveData::new("5L", "Light Punch");
        assert!(!mv.is_safe());
        assert_eq!(mv.punish_window(), 0);

        mv.on_block = Some(-2);
        assert!(!mv.is_safe());
        assert_eq!(mv.punish_window(), 2);

        mv.on_block = Some(44);
        assert!(mv.is_safe());
        assert_eq!(mv.punish_window(), 0);
    }

    #[test]
    fn test_total_frames_requires_all_parts() {
        let mut mv = MoveData::new("5L", "Light Punch");
        mv.startup = Some(8);
        mv.active = Some(5);
        assert_eq!(mv.total_frames(), None);
        mv.recovery = Some(12);
        assert_eq!(mv.total_frames(), Some(25));
    }

    #[test]
    fn test_profile_defaults_from_json() {
        let json = r#"{"name":"Ahri","archetype":"Mage","health":1000,
            "moves":{"5L":{"name":"Light","notation":"5L","on_block":-1}}}"#;
        let profile: CharacterProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.moves["5L"].punish_window(), 1);
        assert_eq!(profile.moves["5L"].risk_level, RiskLevel::Low);
        assert!(profile.strengths.is_empty());
    }
}
