//! Report assembly.
//!
//! [`assemble`] is a pure fold over the pipeline outputs: the same inputs
//! always give an equal report.

use std::collections::BTreeSet;

use xko_models::{
    Actor, CharacterInfo, CharacterProfile, Combo, ComboReport, ComboSummary, DataQuality, Event,
    MatchupInfo, MatchupType, Mistake, MistakeKind, PlayerAnalysis, PlayerStats, Report,
    VideoMetadata,
};

use crate::classifier::Classification;
use crate::translator::translate;

/// Everything a report is built from.
#[derive(Debug, Clone, Copy)]
pub struct ReportInputs<'a> {
    pub video: &'a VideoMetadata,
    pub matchup: MatchupType,
    pub profile: &'a CharacterProfile,
    /// Merged, frame-ordered event log.
    pub events: &'a [Event],
    pub classification: &'a Classification,
    pub combos: &'a [Combo],
    pub data_quality: DataQuality,
}

pub fn assemble(inputs: &ReportInputs<'_>) -> Report {
    let classification = inputs.classification;
    let analysis = |actor: Actor| {
        let slot = actor.index().unwrap_or_default();
        player_analysis(
            inputs.profile,
            &classification.stats[slot],
            &classification.mistakes[slot],
            &classification.opportunities[slot],
            &classification.good_plays[slot],
        )
    };

    let combos_for = |actor: Actor| {
        ComboSummary::from_combos(inputs.combos.iter().filter(|c| c.actor == actor))
    };

    Report {
        data_quality: inputs.data_quality,
        video_info: inputs.video.clone(),
        matchup: MatchupInfo {
            matchup_type: inputs.matchup,
            character1: inputs.profile.name.clone(),
            character2: inputs.profile.name.clone(),
            character_info: CharacterInfo::from(inputs.profile),
        },
        player1_analysis: analysis(Actor::Player1),
        player2_analysis: analysis(Actor::Player2),
        key_events: inputs.events.to_vec(),
        recommendations: recommendations(inputs.profile, &classification.stats),
        combos: ComboReport {
            player1: combos_for(Actor::Player1),
            player2: combos_for(Actor::Player2),
            combos: inputs.combos.to_vec(),
        },
    }
}

fn player_analysis(
    profile: &CharacterProfile,
    stats: &PlayerStats,
    mistakes: &[Mistake],
    opportunities: &[Mistake],
    good_plays: &[Event],
) -> PlayerAnalysis {
    PlayerAnalysis {
        stats: *stats,
        mistakes: mistakes.to_vec(),
        opportunities: opportunities.to_vec(),
        good_plays: good_plays.to_vec(),
        playstyle: playstyle(stats).to_string(),
        pros: pros(profile, stats, good_plays.len()),
        cons: cons(stats, mistakes),
    }
}

pub fn playstyle(stats: &PlayerStats) -> &'static str {
    if stats.unsafe_moves_used > 3 {
        "Aggressive but risky - uses many unsafe moves without proper setup"
    } else if stats.punish_opportunities_missed > 2 {
        "Defensive but passive - misses punish opportunities"
    } else {
        "Balanced - mixes offense and defense appropriately"
    }
}

fn pros(profile: &CharacterProfile, stats: &PlayerStats, good_plays: usize) -> Vec<String> {
    let mut pros = Vec::new();

    if stats.grabs_landed > 0 {
        let grabs: Vec<&str> = profile
            .moves
            .values()
            .filter(|m| m.is_grab)
            .map(|m| m.name.as_str())
            .collect();
        if grabs.is_empty() {
            pros.push("Effective use of command grabs".to_string());
        } else {
            pros.push(format!("Effective use of command grabs ({})", grabs.join(", ")));
        }
    }
    if stats.unsafe_moves_used < 2 {
        pros.push("Good move selection - avoids overly risky options".to_string());
    }
    if good_plays > 0 {
        pros.push(format!(
            "Safe pressure - {good_plays} safe moves went unpunished"
        ));
    }
    if pros.is_empty() {
        pros.push(format!(
            "Shows understanding of {}'s {} archetype",
            profile.name,
            profile.archetype.to_lowercase()
        ));
    }
    pros
}

fn cons(stats: &PlayerStats, mistakes: &[Mistake]) -> Vec<String> {
    let mut cons = Vec::new();

    if stats.unsafe_moves_used > 0 {
        cons.push(format!(
            "Uses unsafe moves ({} instances) without proper setup or assist cover",
            stats.unsafe_moves_used
        ));
    }
    if stats.punish_opportunities_missed > 0 {
        cons.push(format!(
            "Missed {} punish opportunities - could improve reaction to unsafe moves",
            stats.punish_opportunities_missed
        ));
    }

    let risky_specials: BTreeSet<String> = mistakes
        .iter()
        .filter(|m| m.kind == MistakeKind::UnsafeSpecial)
        .filter_map(|m| m.move_ref.as_deref().map(translate))
        .collect();
    if !risky_specials.is_empty() {
        let names: Vec<String> = risky_specials.into_iter().collect();
        cons.push(format!(
            "Uses risky specials ({}) in neutral without conditioning",
            names.join(", ")
        ));
    }
    if stats.grabs_whiffed > 0 {
        cons.push(format!(
            "Whiffed {} command grab attempts",
            stats.grabs_whiffed
        ));
    }
    if cons.is_empty() {
        cons.push("Could work on optimizing blockstrings and mix-ups".to_string());
    }
    cons
}

fn recommendations(profile: &CharacterProfile, stats: &[PlayerStats; 2]) -> Vec<String> {
    let mut recs = profile.recommendations.clone();
    let mut push = |rec: &str| {
        if !recs.iter().any(|r| r == rec) {
            recs.push(rec.to_string());
        }
    };

    if stats.iter().any(|s| s.unsafe_moves_used > 0) {
        push("Consider using assists to cover unsafe moves");
    }
    if stats.iter().any(|s| s.punish_opportunities_missed > 0) {
        push("Practice punishing blocked unsafe moves with your fastest normal");
    }
    if stats.iter().any(|s| s.grabs_whiffed > 0) {
        push("Condition the opponent to block before going for command grabs");
    }
    recs
}
