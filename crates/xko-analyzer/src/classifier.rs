//! Mistake and opportunity classification.
//!
//! Works on the ordered event log. Only events carrying a move observation
//! for a move in the character profile are judged; everything else stays a
//! plain event.

use std::ops::RangeBounds;

use tracing::debug;
use xko_models::{
    Actor, CharacterProfile, Event, EventKind, Mistake, MistakeKind, MoveData, MoveObservation,
    MoveOutcome, PlayerStats, Severity,
};

use crate::metrics;
use crate::translator::translate;

/// Thresholds for the classification rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierSettings {
    /// Moves worse than this on block are unsafe without setup.
    pub unsafe_on_block: i32,
    /// Punish windows shorter than this are not reported.
    pub min_punish_window: u32,
    /// Own activity this many frames before a move counts as setup.
    pub conditioning_window_frames: u64,
    /// Frames the opponent has to answer a safe move.
    pub reaction_window_frames: u64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            unsafe_on_block: -5,
            min_punish_window: 1,
            conditioning_window_frames: 90,
            reaction_window_frames: 30,
        }
    }
}

/// Per-player results, indexed by [`Actor::index`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub mistakes: [Vec<Mistake>; 2],
    /// Missed punishes, filed under the player who missed them.
    pub opportunities: [Vec<Mistake>; 2],
    pub good_plays: [Vec<Event>; 2],
    pub stats: [PlayerStats; 2],
    /// `unsafe_move`, `unsafe_special` and `good_move` events to add to the log.
    pub extra_events: Vec<Event>,
}

impl Classification {
    /// The input log plus the extra events, ordered by frame. Events on the
    /// same frame keep their relative order, originals first.
    pub fn merge_events(&self, events: &[Event]) -> Vec<Event> {
        let mut merged: Vec<Event> = events.iter().chain(&self.extra_events).cloned().collect();
        merged.sort_by_key(|e| e.frame_index);
        merged
    }

    /// Every mistake and missed punish, ordered by frame.
    pub fn all_mistakes(&self) -> Vec<Mistake> {
        let mut all: Vec<Mistake> = self
            .mistakes
            .iter()
            .chain(&self.opportunities)
            .flatten()
            .cloned()
            .collect();
        all.sort_by_key(|m| m.frame_index);
        all
    }

    pub fn mistake_count(&self) -> usize {
        self.mistakes.iter().map(Vec::len).sum::<usize>()
            + self.opportunities.iter().map(Vec::len).sum::<usize>()
    }
}

/// Applies the classification rules for one character.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    profile: &'a CharacterProfile,
    settings: ClassifierSettings,
}

fn missed_punish_severity(window: u32) -> Severity {
    if window > 10 {
        Severity::High
    } else if window > 5 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

fn has_event(events: &[Event], actor: Actor, frames: impl RangeBounds<u64>) -> bool {
    events
        .iter()
        .any(|e| e.actor == actor && frames.contains(&e.frame_index))
}

impl<'a> Classifier<'a> {
    pub fn new(profile: &'a CharacterProfile, settings: ClassifierSettings) -> Self {
        Self { profile, settings }
    }

    /// Classify an event log ordered by frame index.
    pub fn classify(&self, events: &[Event]) -> Classification {
        let mut result = Classification::default();

        for event in events {
            let Some(slot) = event.actor.index() else {
                continue;
            };
            let Some(observation) = &event.observation else {
                continue;
            };
            let Some(move_data) = self.profile.move_data(&observation.notation) else {
                debug!(notation = %observation.notation, "Move not in profile, skipping");
                continue;
            };

            self.count_outcome(&mut result.stats[slot], move_data, observation);
            self.check_unsafe(&mut result, slot, event, events, move_data, observation);
            self.check_missed_punish(&mut result, event, events, move_data, observation);
            self.check_good_play(&mut result, slot, event, events, move_data, observation);
        }

        result
    }

    fn count_outcome(&self, stats: &mut PlayerStats, move_data: &MoveData, obs: &MoveObservation) {
        match obs.outcome {
            MoveOutcome::Blocked => stats.blocked_attacks += 1,
            MoveOutcome::Hit if move_data.is_grab => stats.grabs_landed += 1,
            MoveOutcome::Whiffed if move_data.is_grab => stats.grabs_whiffed += 1,
            _ => {}
        }
    }

    fn check_unsafe(
        &self,
        result: &mut Classification,
        slot: usize,
        event: &Event,
        events: &[Event],
        move_data: &MoveData,
        obs: &MoveObservation,
    ) {
        if obs.outcome == MoveOutcome::Hit {
            return;
        }
        let actor = event.actor;
        let notation = &obs.notation;
        let name = translate(notation);

        let (kind, severity, description, suggestion) =
            if move_data.requires_assist && !obs.assist_called {
                (
                    MistakeKind::UnsafeSpecial,
                    Severity::High,
                    format!(
                        "{} used {} ({}) without assist cover",
                        actor.display_name(),
                        name,
                        notation
                    ),
                    format!(
                        "{name} is risky in neutral. Use it after conditioning the opponent or with assist cover."
                    ),
                )
            } else {
                let Some(advantage) = move_data.on_block else {
                    return;
                };
                let conditioned = has_event(
                    events,
                    actor,
                    event
                        .frame_index
                        .saturating_sub(self.settings.conditioning_window_frames)
                        ..event.frame_index,
                );
                if advantage >= self.settings.unsafe_on_block || conditioned {
                    return;
                }
                (
                    MistakeKind::UnsafeMove,
                    Severity::Medium,
                    format!(
                        "{} used {} ({}), {} on block, without setup",
                        actor.display_name(),
                        name,
                        notation,
                        advantage
                    ),
                    format!(
                        "{name} is {advantage} on block. Use it inside pressure or cover it with an assist."
                    ),
                )
            };

        let event_kind = match kind {
            MistakeKind::UnsafeSpecial => EventKind::UnsafeSpecial,
            _ => EventKind::UnsafeMove,
        };
        result.extra_events.push(
            Event::new(
                event.timestamp,
                event.frame_index,
                actor,
                event_kind,
                format!("{} used unsafe {}", actor.display_name(), name),
            )
            .with_move(notation.clone()),
        );
        result.stats[slot].unsafe_moves_used += 1;
        metrics::record_mistake(actor.as_str(), kind.as_str());
        result.mistakes[slot].push(
            Mistake::new(event.timestamp, event.frame_index, actor, kind, severity)
                .with_move(notation.clone())
                .with_text(description, suggestion),
        );
    }

    fn check_missed_punish(
        &self,
        result: &mut Classification,
        event: &Event,
        events: &[Event],
        move_data: &MoveData,
        obs: &MoveObservation,
    ) {
        if obs.outcome != MoveOutcome::Blocked {
            return;
        }
        let window = move_data.punish_window();
        if window == 0 || window < self.settings.min_punish_window {
            return;
        }

        let punisher = event.actor.opponent();
        let Some(punisher_slot) = punisher.index() else {
            return;
        };
        let window_end = event.frame_index + u64::from(window);
        if has_event(events, punisher, (event.frame_index + 1)..=window_end) {
            return;
        }

        let name = translate(&obs.notation);
        let suggestion = match self.fastest_punish(window) {
            Some(punish) => format!(
                "{name} is -{window} on block. Punish it with {} ({}, {}f startup).",
                translate(&punish.notation),
                punish.notation,
                punish.startup.unwrap_or_default()
            ),
            None => format!(
                "{name} is -{window} on block. Block it and answer with your fastest normal."
            ),
        };

        result.stats[punisher_slot].punish_opportunities_missed += 1;
        metrics::record_mistake(punisher.as_str(), MistakeKind::MissedPunish.as_str());
        result.opportunities[punisher_slot].push(
            Mistake::new(
                event.timestamp,
                event.frame_index,
                punisher,
                MistakeKind::MissedPunish,
                missed_punish_severity(window),
            )
            .with_move(obs.notation.clone())
            .with_text(
                format!(
                    "{} had a punish opportunity after {}'s {} ({}) but didn't take it",
                    punisher.display_name(),
                    event.actor.display_name(),
                    name,
                    obs.notation
                ),
                suggestion,
            ),
        );
    }

    /// Fastest non-special move whose startup fits inside `window`.
    fn fastest_punish(&self, window: u32) -> Option<&'a MoveData> {
        self.profile
            .moves
            .values()
            .filter(|m| !m.is_special && !m.is_super)
            .filter(|m| m.startup.is_some_and(|s| s <= window))
            .min_by_key(|m| m.startup)
    }

    fn check_good_play(
        &self,
        result: &mut Classification,
        slot: usize,
        event: &Event,
        events: &[Event],
        move_data: &MoveData,
        obs: &MoveObservation,
    ) {
        if !move_data.is_safe() || obs.outcome == MoveOutcome::Whiffed {
            return;
        }
        let window_end = event.frame_index + self.settings.reaction_window_frames;
        if has_event(
            events,
            event.actor.opponent(),
            (event.frame_index + 1)..=window_end,
        ) {
            return;
        }

        let good = Event::new(
            event.timestamp,
            event.frame_index,
            event.actor,
            EventKind::GoodMove,
            format!(
                "{} used {} ({}) - safe on block ({:+})",
                event.actor.display_name(),
                translate(&obs.notation),
                obs.notation,
                move_data.on_block.unwrap_or_default()
            ),
        )
        .with_move(obs.notation.clone());
        result.good_plays[slot].push(good.clone());
        result.extra_events.push(good);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{require, StaticCatalog};

    fn profile() -> CharacterProfile {
        let catalog = StaticCatalog::builtin();
        let mut profile = require(&catalog, "Blitzcrank").unwrap().clone();
        let mut heavy = profile.moves["5H"].clone();
        heavy.on_block = Some(-12);
        heavy.startup = Some(14);
        profile.moves.insert("5H".to_string(), heavy);
        profile
    }

    fn observed(frame: u64, actor: Actor, notation: &str, outcome: MoveOutcome) -> Event {
        Event::new(frame as f64 / 60.0, frame, actor, EventKind::HitOrBlock, "x")
            .with_observation(MoveObservation::new(notation, outcome))
    }

    fn plain(frame: u64, actor: Actor) -> Event {
        Event::new(frame as f64 / 60.0, frame, actor, EventKind::HitOrBlock, "x")
    }

    fn classify(events: &[Event]) -> Classification {
        let profile = profile();
        Classifier::new(&profile, ClassifierSettings::default()).classify(events)
    }

    #[test]
    fn test_plain_events_produce_nothing() {
        let result = classify(&[plain(10, Actor::Player1), plain(50, Actor::Player2)]);
        assert_eq!(result, Classification::default());
    }

    #[test]
    fn test_unsafe_special_without_assist() {
        let result = classify(&[observed(100, Actor::Player1, "5S1", MoveOutcome::Whiffed)]);
        let mistake = &result.mistakes[0][0];
        assert_eq!(mistake.kind, MistakeKind::UnsafeSpecial);
        assert_eq!(mistake.severity, Severity::High);
        assert_eq!(
            mistake.description,
            "Player 1 used Rocket Grab (5S1) without assist cover"
        );
        assert_eq!(result.stats[0].unsafe_moves_used, 1);
        assert_eq!(result.extra_events[0].kind, EventKind::UnsafeSpecial);
    }

    #[test]
    fn test_assist_covers_special() {
        let event = Event::new(1.0, 60, Actor::Player1, EventKind::HitOrBlock, "x")
            .with_observation(MoveObservation::new("5S1", MoveOutcome::Blocked).with_assist());
        let result = classify(&[event]);
        assert!(result.mistakes[0].is_empty());
    }

    #[test]
    fn test_unsafe_move_needs_no_conditioning() {
        let raw = classify(&[observed(200, Actor::Player2, "5H", MoveOutcome::Whiffed)]);
        assert_eq!(raw.mistakes[1][0].kind, MistakeKind::UnsafeMove);
        assert_eq!(raw.mistakes[1][0].severity, Severity::Medium);

        let conditioned = classify(&[
            plain(150, Actor::Player2),
            observed(200, Actor::Player2, "5H", MoveOutcome::Whiffed),
        ]);
        assert!(conditioned.mistakes[1].is_empty());
    }

    #[test]
    fn test_hit_is_never_unsafe() {
        let result = classify(&[observed(100, Actor::Player1, "5S1", MoveOutcome::Hit)]);
        assert!(result.mistakes[0].is_empty());
    }

    #[test]
    fn test_missed_punish_goes_to_opponent() {
        let result = classify(&[observed(300, Actor::Player1, "5H", MoveOutcome::Blocked)]);
        let missed = &result.opportunities[1][0];
        assert_eq!(missed.actor, Actor::Player2);
        assert_eq!(missed.kind, MistakeKind::MissedPunish);
        assert_eq!(missed.severity, Severity::High);
        assert!(missed.suggestion.contains("5L"));
        assert_eq!(result.stats[1].punish_opportunities_missed, 1);
        assert_eq!(result.stats[0].blocked_attacks, 1);
    }

    #[test]
    fn test_punish_taken_is_not_missed() {
        let result = classify(&[
            observed(300, Actor::Player1, "5H", MoveOutcome::Blocked),
            plain(308, Actor::Player2),
        ]);
        assert!(result.opportunities[1].is_empty());
    }

    #[test]
    fn test_small_window_severity_low() {
        let result = classify(&[observed(10, Actor::Player1, "5L", MoveOutcome::Blocked)]);
        assert_eq!(result.opportunities[1][0].severity, Severity::Low);
        // -2 is not unsafe enough to be a mistake
        assert!(result.mistakes[0].is_empty());
    }

    #[test]
    fn test_min_punish_window() {
        let profile = profile();
        let settings = ClassifierSettings {
            min_punish_window: 5,
            ..Default::default()
        };
        let result = Classifier::new(&profile, settings)
            .classify(&[observed(10, Actor::Player1, "5L", MoveOutcome::Blocked)]);
        assert!(result.opportunities[1].is_empty());
    }

    #[test]
    fn test_good_play_for_safe_move() {
        let result = classify(&[observed(400, Actor::Player2, "2S1", MoveOutcome::Blocked)]);
        assert_eq!(result.good_plays[1].len(), 1);
        assert_eq!(result.good_plays[1][0].kind, EventKind::GoodMove);
        assert!(result.good_plays[1][0].description.contains("(+44)"));
        assert!(result.mistakes[1].is_empty());

        let answered = classify(&[
            observed(400, Actor::Player2, "2S1", MoveOutcome::Blocked),
            plain(420, Actor::Player1),
        ]);
        assert!(answered.good_plays[1].is_empty());
    }

    #[test]
    fn test_grab_stats() {
        let result = classify(&[
            observed(10, Actor::Player1, "2S2", MoveOutcome::Hit),
            observed(200, Actor::Player1, "2S2", MoveOutcome::Whiffed),
        ]);
        assert_eq!(result.stats[0].grabs_landed, 1);
        assert_eq!(result.stats[0].grabs_whiffed, 1);
    }

    #[test]
    fn test_merge_keeps_frame_order() {
        let events = vec![
            observed(100, Actor::Player1, "5S1", MoveOutcome::Whiffed),
            plain(150, Actor::Player2),
        ];
        let result = classify(&events);
        let merged = result.merge_events(&events);
        let frames: Vec<u64> = merged.iter().map(|e| e.frame_index).collect();
        assert_eq!(frames, vec![100, 100, 150]);
        assert_eq!(merged[0].kind, EventKind::HitOrBlock);
        assert_eq!(merged[1].kind, EventKind::UnsafeSpecial);
    }
}
