//! 2XKO gameplay analyzer.
//!
//! Turns a match recording into a coaching report:
//! sampled frames are diffed into hit/block activity, debounced into
//! per-player events, matched against the character's frame data to find
//! unsafe moves and missed punishes, enriched with match context, and
//! assembled into a [`xko_models::Report`].
//!
//! Also hosts the match-statistics aggregator used by `xko-match-stats`.

pub mod aggregator;
pub mod catalog;
pub mod classifier;
pub mod combo;
pub mod comparison;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod logging;
pub mod match_stats;
pub mod metrics;
pub mod recognizer;
pub mod render;
pub mod report;
pub mod session;
pub mod translator;

pub use aggregator::EventAggregator;
pub use catalog::{blockstring_gaps, require, BlockstringAnalysis, MoveCatalog, StaticCatalog};
pub use classifier::{Classification, Classifier, ClassifierSettings};
pub use combo::{ComboTracker, DamageTimeline};
pub use comparison::{
    compare_assist_dependent_moves, compare_fastest_moves, compare_safest_moves,
    fastest_moves_in_game, move_efficiency_ranking, MoveEfficiency, MoveSummary,
};
pub use config::AnalyzerConfig;
pub use enrichment::Enricher;
pub use error::{AnalyzerError, AnalyzerResult};
pub use logging::{init_tracing, SessionLogger};
pub use match_stats::{load_matches, sample_matches, MatchStatsAnalyzer};
pub use recognizer::{MoveRecognizer, NoMoveRecognizer, SyntheticMoveRecognizer};
pub use render::{render, Document, Section};
pub use report::{assemble, ReportInputs};
pub use session::{write_report, AnalysisOutcome, AnalysisSession};
