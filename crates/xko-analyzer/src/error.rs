//! Analyzer error types.

use std::path::PathBuf;
use thiserror::Error;

pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("Unsupported character: {name} (available: {})", available.join(", "))]
    UnsupportedCharacter { name: String, available: Vec<String> },

    #[error("Unsupported matchup: {name} (available: {})", available.join(", "))]
    UnsupportedMatchup { name: String, available: Vec<String> },

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Media error: {0}")]
    Media(#[from] xko_media::MediaError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyzerError {
    pub fn unsupported_character(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnsupportedCharacter {
            name: name.into(),
            available,
        }
    }

    pub fn unsupported_matchup(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::UnsupportedMatchup {
            name: name.into(),
            available,
        }
    }

    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
