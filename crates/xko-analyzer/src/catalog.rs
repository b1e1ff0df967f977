//! Character move catalog.
//!
//! Character data lives behind [`MoveCatalog`] so the analysis never
//! hardcodes a character. [`StaticCatalog::builtin`] carries the bundled
//! data; a JSON file can replace it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use tracing::info;
use xko_models::{CharacterProfile, GuardType, MoveData, RiskLevel};

use crate::error::{AnalyzerError, AnalyzerResult};

/// Frame gap above which a blockstring can be interrupted.
const INTERRUPTIBLE_GAP_FRAMES: u32 = 3;

/// Source of character profiles.
pub trait MoveCatalog {
    fn profile(&self, name: &str) -> Option<&CharacterProfile>;

    fn character_names(&self) -> Vec<String>;
}

/// Look up `name`, or fail listing every character the catalog knows.
pub fn require<'a, C: MoveCatalog + ?Sized>(
    catalog: &'a C,
    name: &str,
) -> AnalyzerResult<&'a CharacterProfile> {
    catalog
        .profile(name)
        .ok_or_else(|| AnalyzerError::unsupported_character(name, catalog.character_names()))
}

/// In-memory catalog keyed by character name.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    profiles: BTreeMap<String, CharacterProfile>,
}

impl StaticCatalog {
    pub fn new(profiles: impl IntoIterator<Item = CharacterProfile>) -> Self {
        Self {
            profiles: profiles.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }

    /// Catalog with the bundled character data.
    pub fn builtin() -> Self {
        Self::new([blitzcrank()])
    }

    /// Load a JSON array of character profiles.
    pub fn from_json_file(path: impl AsRef<Path>) -> AnalyzerResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AnalyzerError::io(path, e))?;
        let profiles: Vec<CharacterProfile> = serde_json::from_str(&text)?;
        if profiles.is_empty() {
            return Err(AnalyzerError::catalog(format!(
                "{} contains no characters",
                path.display()
            )));
        }
        for profile in &profiles {
            if let Some((key, _)) = profile.moves.iter().find(|(k, m)| **k != m.notation) {
                return Err(AnalyzerError::catalog(format!(
                    "{}: move key {} does not match its notation",
                    profile.name, key
                )));
            }
        }
        info!("Loaded {} characters from {}", profiles.len(), path.display());
        Ok(Self::new(profiles))
    }
}

impl MoveCatalog for StaticCatalog {
    fn profile(&self, name: &str) -> Option<&CharacterProfile> {
        self.profiles.get(name)
    }

    fn character_names(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }
}

fn normal(notation: &str, name: &str, description: &str) -> MoveData {
    MoveData {
        guard: vec![GuardType::Low, GuardType::High, GuardType::Air],
        description: description.to_string(),
        ..MoveData::new(notation, name)
    }
}

fn blitzcrank() -> CharacterProfile {
    let five_l = MoveData {
        damage: Some(45),
        startup: Some(8),
        active: Some(5),
        recovery: Some(12),
        on_block: Some(-2),
        ..normal(
            "5L",
            "Light Punch",
            "Standard, albeit slow 5L. Gives a frame trap after 5S1/2S1 restand on hit or block.",
        )
    };

    let rocket_grab = MoveData {
        is_special: true,
        requires_assist: true,
        risk_level: RiskLevel::High,
        mid_range: true,
        ..normal(
            "5S1",
            "Rocket Grab",
            "Pulls the opponent close. Can be enhanced with Steam Steam to shock on hit.",
        )
    };

    let air_purifier = MoveData {
        damage: Some(1),
        startup: Some(23),
        active: Some(11),
        recovery: Some(119),
        on_block: Some(44),
        is_special: true,
        ..normal(
            "2S1",
            "Air Purifier",
            "Diagonal long ranged hit grab that pulls the point opponent toward Blitzcrank. Anti-air version of Rocket Grab.",
        )
    };

    let garbage_collection = MoveData {
        guard: vec![GuardType::Unblockable],
        is_special: true,
        is_grab: true,
        risk_level: RiskLevel::Medium,
        description:
            "Command grab. Enhanced with Steam Steam adds 1 hit of armor and increases damage."
                .to_string(),
        ..MoveData::new("2S2", "Garbage Collection")
    };

    let moves = [
        five_l,
        normal("5M", "Medium Punch", "Medium standing normal"),
        normal("5H", "Heavy Punch", "Heavy standing normal"),
        normal("2L", "Crouching Light Kick", "Crouching light"),
        normal("2M", "Crouching Medium Kick", "Crouching medium"),
        normal("2H", "Crouching Heavy Kick", "Crouching heavy"),
        rocket_grab,
        air_purifier,
        garbage_collection,
    ];

    CharacterProfile {
        name: "Blitzcrank".to_string(),
        archetype: "Grappler".to_string(),
        health: 1050,
        playstyle:
            "Point character with risky but rewarding gameplan. Get close, then hit or grab."
                .to_string(),
        strengths: [
            "Rocket Grab forces opponent close",
            "Command grab (Garbage Collection) for mix-ups",
            "Excellent assist character",
            "Steam Steam enhanced specials",
            "Air Purifier assist provides restand",
        ]
        .map(String::from)
        .to_vec(),
        weaknesses: [
            "Risky neutral",
            "Slow dash speed",
            "Committal normals",
            "Bad defense",
            "Dependency on 50-50 mix-ups",
        ]
        .map(String::from)
        .to_vec(),
        moves: moves.into_iter().map(|m| (m.notation.clone(), m)).collect(),
        combos: Vec::new(),
        recommendations: [
            "Both players should work on safe blockstrings",
            "Consider using assists to cover unsafe moves",
            "Practice Steam Steam management for enhanced specials",
            "Work on anti-air defense against Air Purifier",
        ]
        .map(String::from)
        .to_vec(),
    }
}

/// An interruptible gap between two moves of a blockstring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockstringGap {
    pub after_move: String,
    pub before_move: String,
    pub gap_frames: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockstringAnalysis {
    pub is_safe: bool,
    pub gaps: Vec<BlockstringGap>,
    /// Sum of startup, active and recovery over moves with full data.
    pub total_frames: u32,
    /// Moves skipped for lack of frame data.
    pub unknown_moves: Vec<String>,
}

/// Check a move sequence for gaps the opponent can interrupt.
///
/// A gap between consecutive moves is the previous move's recovery plus the
/// next move's startup. Pairs with unknown frame data are not judged.
pub fn blockstring_gaps<S: AsRef<str>>(
    profile: &CharacterProfile,
    moves: &[S],
) -> BlockstringAnalysis {
    let mut gaps = Vec::new();
    let mut total_frames = 0;
    let mut unknown_moves = Vec::new();

    for (i, notation) in moves.iter().enumerate() {
        let notation = notation.as_ref();
        let current = profile.move_data(notation);
        match current.and_then(MoveData::total_frames) {
            Some(frames) => total_frames += frames,
            None => unknown_moves.push(notation.to_string()),
        }

        if i == 0 {
            continue;
        }
        let previous_notation = moves[i - 1].as_ref();
        let previous = profile.move_data(previous_notation);
        if let (Some(recovery), Some(startup)) = (
            previous.and_then(|m| m.recovery),
            current.and_then(|m| m.startup),
        ) {
            let gap = recovery + startup;
            if gap > INTERRUPTIBLE_GAP_FRAMES {
                gaps.push(BlockstringGap {
                    after_move: previous_notation.to_string(),
                    before_move: notation.to_string(),
                    gap_frames: gap,
                });
            }
        }
    }

    BlockstringAnalysis {
        is_safe: gaps.is_empty(),
        gaps,
        total_frames,
        unknown_moves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_blitzcrank() {
        let catalog = StaticCatalog::builtin();
        let profile = require(&catalog, "Blitzcrank").unwrap();
        assert_eq!(profile.health, 1050);
        assert_eq!(profile.moves["5L"].on_block, Some(-2));
        assert!(profile.moves["5S1"].requires_assist);
        assert!(profile.moves["2S1"].is_safe());
        assert!(profile.moves["2S2"].is_grab);
        // Unknown frame data stays unknown
        assert_eq!(profile.moves["5H"].on_block, None);
    }

    #[test]
    fn test_require_unknown_lists_names() {
        let catalog = StaticCatalog::builtin();
        let err = require(&catalog, "Ekko").unwrap_err();
        match err {
            AnalyzerError::UnsupportedCharacter { name, available } => {
                assert_eq!(name, "Ekko");
                assert_eq!(available, vec!["Blitzcrank".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_catalog_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(
            &path,
            r#"[{"name":"Ahri","archetype":"Mage","health":1000,
                "moves":{"5S1":{"name":"Orb","notation":"5S1","on_block":-12}}}]"#,
        )
        .unwrap();

        let catalog = StaticCatalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.character_names(), vec!["Ahri".to_string()]);
        assert!(catalog.profile("Blitzcrank").is_none());
        assert_eq!(catalog.profile("Ahri").unwrap().moves["5S1"].punish_window(), 12);
    }

    #[test]
    fn test_catalog_rejects_empty_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            StaticCatalog::from_json_file(&path),
            Err(AnalyzerError::Catalog(_))
        ));
        assert!(matches!(
            StaticCatalog::from_json_file(dir.path().join("missing.json")),
            Err(AnalyzerError::Io { .. })
        ));
    }

    #[test]
    fn test_blockstring_gaps() {
        let catalog = StaticCatalog::builtin();
        let profile = require(&catalog, "Blitzcrank").unwrap();

        // 5L recovery 12 + 5L startup 8 = 20 frame gap
        let analysis = blockstring_gaps(profile, &["5L", "5L"]);
        assert!(!analysis.is_safe);
        assert_eq!(analysis.gaps[0].gap_frames, 20);
        assert_eq!(analysis.total_frames, 50);

        let analysis = blockstring_gaps(profile, &["5L", "5M"]);
        assert!(analysis.is_safe);
        assert_eq!(analysis.unknown_moves, vec!["5M".to_string()]);

        let empty: [&str; 0] = [];
        assert!(blockstring_gaps(profile, &empty).is_safe);
    }
}
