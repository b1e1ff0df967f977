//! Clip manifest entries.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Actor, Event, Mistake};

/// What a clip illustrates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ClipAnnotation {
    Mistake(Mistake),
    Event(Event),
}

impl ClipAnnotation {
    pub fn actor(&self) -> Actor {
        match self {
            ClipAnnotation::Mistake(m) => m.actor,
            ClipAnnotation::Event(e) => e.actor,
        }
    }

    /// Tag shown on the overlay ("unsafe_special", "hit_or_block", ...).
    pub fn kind_label(&self) -> &'static str {
        match self {
            ClipAnnotation::Mistake(m) => m.kind.as_str(),
            ClipAnnotation::Event(e) => e.kind.as_str(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            ClipAnnotation::Mistake(m) => m.best_description(),
            ClipAnnotation::Event(e) => &e.description,
        }
    }

    /// Seconds into the source video where the annotated moment happens.
    pub fn timestamp(&self) -> f64 {
        match self {
            ClipAnnotation::Mistake(m) => m.timestamp,
            ClipAnnotation::Event(e) => e.timestamp,
        }
    }
}

impl From<Mistake> for ClipAnnotation {
    fn from(mistake: Mistake) -> Self {
        ClipAnnotation::Mistake(mistake)
    }
}

impl From<Event> for ClipAnnotation {
    fn from(event: Event) -> Self {
        ClipAnnotation::Event(event)
    }
}

/// One written clip, as recorded in `clips_manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Clip {
    pub id: String,
    pub path: String,
    pub start_time: f64,
    pub end_time: f64,
    pub duration: f64,
    /// FourCC of the encoder that produced the file.
    pub codec: String,
    pub annotations: ClipAnnotation,
}

impl Clip {
    pub fn new(
        id: impl Into<String>,
        path: impl Into<String>,
        start_time: f64,
        end_time: f64,
        codec: impl Into<String>,
        annotations: ClipAnnotation,
    ) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            start_time,
            end_time,
            duration: (end_time - start_time).max(0.0),
            codec: codec.into(),
            annotations,
        }
    }
}
