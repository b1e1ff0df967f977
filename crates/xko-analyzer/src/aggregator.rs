//! Debounced per-player event aggregation.

use tracing::debug;
use xko_media::Activity;
use xko_models::{Actor, Event, EventKind};

use crate::metrics;

/// Turns per-frame classifications into spaced-out events.
///
/// Each player has an independent cooldown: after an event for a player,
/// further activity for that player is suppressed until more than
/// `cooldown_frames` frames have passed.
#[derive(Debug, Clone)]
pub struct EventAggregator {
    cooldown_frames: u64,
    /// `None` until the player's first event.
    last_event_frame: [Option<u64>; 2],
    suppressed: u64,
}

impl EventAggregator {
    pub fn new(cooldown_frames: u64) -> Self {
        Self {
            cooldown_frames,
            last_event_frame: [None; 2],
            suppressed: 0,
        }
    }

    pub fn cooldown_frames(&self) -> u64 {
        self.cooldown_frames
    }

    /// Events dropped by the cooldown so far.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }

    /// Feed one classified frame. Returns the event to append, if any.
    pub fn observe(
        &mut self,
        frame_index: u64,
        timestamp: f64,
        actor: Actor,
        activity: Activity,
    ) -> Option<Event> {
        if activity != Activity::HitOrBlock {
            return None;
        }
        let slot = actor.index()?;

        if let Some(last) = self.last_event_frame[slot] {
            let frames_since = frame_index.saturating_sub(last);
            if frames_since <= self.cooldown_frames {
                self.suppressed += 1;
                metrics::record_suppressed(actor.as_str());
                return None;
            }
        }

        self.last_event_frame[slot] = Some(frame_index);
        metrics::record_event(actor.as_str());
        debug!(frame = frame_index, actor = %actor, "Event emitted");
        Some(Event::new(
            timestamp,
            frame_index,
            actor,
            EventKind::HitOrBlock,
            format!("{} interaction detected", actor.display_name()),
        ))
    }
}

impl Default for EventAggregator {
    fn default() -> Self {
        Self::new(30)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(agg: &mut EventAggregator, frame: u64, actor: Actor) -> bool {
        agg.observe(frame, frame as f64 / 60.0, actor, Activity::HitOrBlock)
            .is_some()
    }

    #[test]
    fn test_first_event_at_frame_zero() {
        let mut agg = EventAggregator::new(30);
        assert!(hit(&mut agg, 0, Actor::Player1));
    }

    #[test]
    fn test_burst_emits_once() {
        let mut agg = EventAggregator::new(30);
        let emitted = (100..110).filter(|f| hit(&mut agg, *f, Actor::Player1)).count();
        assert_eq!(emitted, 1);
        assert_eq!(agg.suppressed(), 9);
    }

    #[test]
    fn test_cooldown_is_strict() {
        let mut agg = EventAggregator::new(30);
        assert!(hit(&mut agg, 10, Actor::Player1));
        assert!(!hit(&mut agg, 40, Actor::Player1));
        assert!(hit(&mut agg, 41, Actor::Player1));
    }

    #[test]
    fn test_players_are_independent() {
        let mut agg = EventAggregator::new(30);
        assert!(hit(&mut agg, 10, Actor::Player1));
        assert!(hit(&mut agg, 12, Actor::Player2));
        assert!(!hit(&mut agg, 14, Actor::Player1));
    }

    #[test]
    fn test_none_and_unknown_never_emit() {
        let mut agg = EventAggregator::new(30);
        assert!(agg.observe(0, 0.0, Actor::Player1, Activity::None).is_none());
        assert!(!hit(&mut agg, 1, Actor::Unknown));
        // Neither changed state
        assert!(hit(&mut agg, 2, Actor::Player1));
    }

    #[test]
    fn test_event_text() {
        let mut agg = EventAggregator::default();
        let event = agg
            .observe(60, 1.0, Actor::Player2, Activity::HitOrBlock)
            .unwrap();
        assert_eq!(event.description, "Player 2 interaction detected");
        assert_eq!(event.kind, EventKind::HitOrBlock);
        assert_eq!(event.frame_index, 60);
    }
}
