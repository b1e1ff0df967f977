//! Timestamped gameplay events.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Actor;

/// Event category tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Motion burst large enough to be a hit or a block.
    HitOrBlock,
    /// A move that is unsafe on block was used without setup.
    UnsafeMove,
    /// A special that needs assist cover was used without it.
    UnsafeSpecial,
    /// A safe move that went unpunished.
    GoodMove,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::HitOrBlock => "hit_or_block",
            EventKind::UnsafeMove => "unsafe_move",
            EventKind::UnsafeSpecial => "unsafe_special",
            EventKind::GoodMove => "good_move",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a recognized move resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MoveOutcome {
    Hit,
    Blocked,
    Whiffed,
}

/// What a move recognizer claims happened at an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MoveObservation {
    /// Move notation, e.g. "5S1".
    pub notation: String,
    pub outcome: MoveOutcome,
    /// Whether an assist was called to cover the move.
    #[serde(default)]
    pub assist_called: bool,
}

impl MoveObservation {
    pub fn new(notation: impl Into<String>, outcome: MoveOutcome) -> Self {
        Self {
            notation: notation.into(),
            outcome,
            assist_called: false,
        }
    }

    /// Mark the move as covered by an assist.
    pub fn with_assist(mut self) -> Self {
        self.assist_called = true;
        self
    }
}

/// A discrete gameplay event. Immutable once appended to the event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Event {
    /// Seconds from the start of the video.
    pub timestamp: f64,
    pub frame_index: u64,
    pub actor: Actor,
    pub kind: EventKind,
    pub description: String,
    /// Move notation when one is known.
    #[serde(default, rename = "move", skip_serializing_if = "Option::is_none")]
    pub move_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<MoveObservation>,
}

impl Event {
    pub fn new(
        timestamp: f64,
        frame_index: u64,
        actor: Actor,
        kind: EventKind,
        description: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            frame_index,
            actor,
            kind,
            description: description.into(),
            move_ref: None,
            observation: None,
        }
    }

    /// Attach a recognized move, also setting the move reference.
    pub fn with_observation(mut self, observation: MoveObservation) -> Self {
        self.move_ref = Some(observation.notation.clone());
        self.observation = Some(observation);
        self
    }

    /// Attach a move reference without an observation.
    pub fn with_move(mut self, notation: impl Into<String>) -> Self {
        self.move_ref = Some(notation.into());
        self
    }
}
