//! Shared data models for the 2XKO gameplay analyzer.
//!
//! This crate provides Serde-serializable types for:
//! - Players, detected events and move observations
//! - Mistakes, missed punishes and their enrichment context
//! - Clip manifests
//! - Character profiles and move frame data
//! - The assembled analysis report
//! - Recorded match results for statistics

pub mod actor;
pub mod character;
pub mod clip;
pub mod combo;
pub mod event;
pub mod match_record;
pub mod matchup;
pub mod mistake;
pub mod report;
pub mod timestamp;

// Re-export common types
pub use actor::{Actor, Leader};
pub use character::{CharacterProfile, ComboRoute, GuardType, MoveData, RiskLevel};
pub use clip::{Clip, ClipAnnotation};
pub use combo::{Combo, ComboEnd, ComboSummary, PerformanceLevel};
pub use event::{Event, EventKind, MoveObservation, MoveOutcome};
pub use match_record::{MatchPlayerStats, MatchRecord, MatchSummary, MatchupRecord, PlayerRecord};
pub use matchup::{MatchupParseError, MatchupType};
pub use mistake::{Mistake, MistakeContext, MistakeKind, Severity};
pub use report::{
    report_json_schema, CharacterInfo, ComboReport, DataQuality, MatchupInfo, PlayerAnalysis,
    PlayerStats, Report, VideoMetadata,
};
pub use timestamp::format_clock;
