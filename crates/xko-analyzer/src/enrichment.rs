//! Mistake enrichment.
//!
//! Adds what happened around a mistake: the opponent's answer, damage
//! totals, round, who was ahead, and plain-English text.

use xko_models::{
    Actor, CharacterProfile, Event, EventKind, Mistake, MistakeContext, MistakeKind,
};

use crate::classifier::Classification;
use crate::combo::DamageTimeline;
use crate::translator::{describe_response, translate};

const MID_RANGE_SUGGESTION: &str = "Consider using at mid-range (not point-blank)";

#[derive(Debug, Clone, Copy)]
pub struct Enricher<'a> {
    profile: &'a CharacterProfile,
    context_window_secs: f64,
}

impl<'a> Enricher<'a> {
    pub fn new(profile: &'a CharacterProfile, context_window_secs: f64) -> Self {
        Self {
            profile,
            context_window_secs,
        }
    }

    /// Enrich every mistake and missed punish in place.
    pub fn enrich_all(
        &self,
        classification: &mut Classification,
        events: &[Event],
        timeline: &DamageTimeline,
    ) {
        for list in classification
            .mistakes
            .iter_mut()
            .chain(classification.opportunities.iter_mut())
        {
            for mistake in list.iter_mut() {
                self.enrich(mistake, events, timeline);
            }
        }
    }

    /// Attach context to one mistake. Already enriched mistakes are left alone.
    pub fn enrich(&self, mistake: &mut Mistake, events: &[Event], timeline: &DamageTimeline) {
        if mistake.context.is_some() {
            return;
        }
        let window_end = mistake.timestamp + self.context_window_secs;
        let opponent_response = opponent_moves(
            events,
            mistake.actor.opponent(),
            mistake.timestamp,
            window_end,
        );
        let snapshot = timeline.at(window_end);

        let notation = mistake.move_ref.clone().unwrap_or_default();
        let move_plain = if notation.is_empty() {
            String::new()
        } else {
            translate(&notation)
        };
        let player_name = mistake.actor.display_name().to_string();
        let opponent_response_description = describe_response(&notation, &opponent_response);

        let lead = match mistake.kind {
            MistakeKind::UnsafeMove | MistakeKind::UnsafeSpecial => {
                format!("{player_name} used {move_plain}, which left them vulnerable")
            }
            MistakeKind::MissedPunish => {
                format!("{player_name} missed an opportunity to punish the opponent")
            }
        };
        let description_plain = format!("{lead}. {opponent_response_description}");

        let range_suggestion = self
            .profile
            .move_data(&notation)
            .filter(|m| m.mid_range && mistake.kind.is_unsafe())
            .map(|_| MID_RANGE_SUGGESTION.to_string());
        if let Some(range) = &range_suggestion {
            mistake.suggestion = if mistake.suggestion.is_empty() {
                range.clone()
            } else {
                format!("{} {}", mistake.suggestion, range)
            };
        }

        mistake.context = Some(MistakeContext {
            player_name,
            move_plain,
            description_plain,
            opponent_response,
            opponent_response_description,
            damage_dealt: snapshot.dealt_by(mistake.actor),
            damage_taken: snapshot.taken_by(mistake.actor),
            round: snapshot.round,
            leader: snapshot.leader(),
            range_suggestion,
        });
    }
}

/// Notations recognized for `actor` within `[start, end]` seconds.
fn opponent_moves(events: &[Event], actor: Actor, start: f64, end: f64) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.kind == EventKind::HitOrBlock && e.actor == actor)
        .filter(|e| e.timestamp >= start && e.timestamp <= end)
        .filter_map(|e| e.observation.as_ref().map(|o| o.notation.clone()))
        .collect()
}
