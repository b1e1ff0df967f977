//! The assembled analysis report.

use schemars::schema::RootSchema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Actor, CharacterProfile, Combo, ComboSummary, Event, MatchupType, Mistake};

/// Whether the report reflects measured detection or generated demo data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataQuality {
    #[default]
    Measured,
    /// Move observations were generated, not detected. Never present as measured.
    Synthetic,
}

impl DataQuality {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, DataQuality::Synthetic)
    }
}

/// Properties of the analyzed video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoMetadata {
    pub path: String,
    /// Seconds.
    pub duration: f64,
    pub fps: f64,
    pub frame_count: u64,
    /// "WIDTHxHEIGHT".
    pub resolution: String,
}

/// Summary of the analyzed character, copied from its profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CharacterInfo {
    pub archetype: String,
    pub health: u32,
    pub playstyle: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

impl From<&CharacterProfile> for CharacterInfo {
    fn from(profile: &CharacterProfile) -> Self {
        Self {
            archetype: profile.archetype.clone(),
            health: profile.health,
            playstyle: profile.playstyle.clone(),
            strengths: profile.strengths.clone(),
            weaknesses: profile.weaknesses.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchupInfo {
    #[serde(rename = "type")]
    pub matchup_type: MatchupType,
    pub character1: String,
    pub character2: String,
    pub character_info: CharacterInfo,
}

/// Per-player counters. All zero for an empty analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PlayerStats {
    pub unsafe_moves_used: u32,
    pub punish_opportunities_missed: u32,
    pub grabs_landed: u32,
    pub grabs_whiffed: u32,
    pub blocked_attacks: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PlayerAnalysis {
    pub stats: PlayerStats,
    pub mistakes: Vec<Mistake>,
    /// Missed punishes.
    pub opportunities: Vec<Mistake>,
    pub good_plays: Vec<Event>,
    pub playstyle: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ComboReport {
    pub player1: ComboSummary,
    pub player2: ComboSummary,
    pub combos: Vec<Combo>,
}

/// Aggregate root of one analysis run. Immutable after assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Report {
    pub data_quality: DataQuality,
    pub video_info: VideoMetadata,
    pub matchup: MatchupInfo,
    pub player1_analysis: PlayerAnalysis,
    pub player2_analysis: PlayerAnalysis,
    pub key_events: Vec<Event>,
    pub recommendations: Vec<String>,
    pub combos: ComboReport,
}

impl Report {
    pub fn analysis(&self, actor: Actor) -> Option<&PlayerAnalysis> {
        match actor {
            Actor::Player1 => Some(&self.player1_analysis),
            Actor::Player2 => Some(&self.player2_analysis),
            Actor::Unknown => None,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// JSON schema of [`Report`], for downstream consumers of the report file.
pub fn report_json_schema() -> RootSchema {
    schemars::schema_for!(Report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EventKind, MistakeKind, Severity};

    fn sample() -> Report {
        let profile = CharacterProfile {
            name: "Blitzcrank".to_string(),
            archetype: "Grappler".to_string(),
            health: 1050,
            playstyle: String::new(),
            strengths: vec!["Command grabs".to_string()],
            weaknesses: Vec::new(),
            moves: Default::default(),
            combos: Vec::new(),
            recommendations: Vec::new(),
        };
        let mistake = Mistake::new(1.0 / 3.0, 20, Actor::Player1, MistakeKind::UnsafeMove, Severity::Medium)
            .with_move("5H")
            .with_text("d", "s");
        Report {
            data_quality: DataQuality::Synthetic,
            video_info: VideoMetadata {
                path: "match.mp4".to_string(),
                duration: 10.1,
                fps: 59.94,
                frame_count: 605,
                resolution: "1920x1080".to_string(),
            },
            matchup: MatchupInfo {
                matchup_type: MatchupType::Mirror,
                character1: "Blitzcrank".to_string(),
                character2: "Blitzcrank".to_string(),
                character_info: CharacterInfo::from(&profile),
            },
            player1_analysis: PlayerAnalysis {
                mistakes: vec![mistake],
                ..Default::default()
            },
            player2_analysis: PlayerAnalysis::default(),
            key_events: vec![Event::new(0.1, 6, Actor::Player2, EventKind::HitOrBlock, "x")],
            recommendations: vec!["r".to_string()],
            combos: ComboReport::default(),
        }
    }

    #[test]
    fn test_report_round_trip() {
        let report = sample();
        let json = report.to_json_pretty().unwrap();
        let parsed = Report::from_json(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_report_top_level_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        for key in [
            "video_info",
            "matchup",
            "player1_analysis",
            "player2_analysis",
            "key_events",
            "recommendations",
            "combos",
            "data_quality",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["matchup"]["type"], "mirror");
        assert_eq!(value["data_quality"], "synthetic");
    }

    #[test]
    fn test_schema_names_report() {
        let schema = serde_json::to_value(report_json_schema()).unwrap();
        assert_eq!(schema["title"], "Report");
    }
}
