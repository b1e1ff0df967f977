//! Cross-character move comparisons over a [`MoveCatalog`].
//!
//! Rankings only judge moves whose relevant frame data is known; a move
//! with no recorded startup is never "fastest", one with no on-block value
//! never "safest".

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use xko_models::{CharacterProfile, MoveData, RiskLevel};

use crate::catalog::{require, MoveCatalog};
use crate::error::AnalyzerResult;

/// One move in a comparison, tagged with its character.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveSummary {
    pub character: String,
    pub notation: String,
    pub name: String,
    pub startup: Option<u32>,
    pub recovery: Option<u32>,
    pub on_block: Option<i32>,
    pub damage: Option<u32>,
    pub requires_assist: bool,
    pub risk_level: RiskLevel,
}

impl MoveSummary {
    fn new(character: &str, data: &MoveData) -> Self {
        Self {
            character: character.to_string(),
            notation: data.notation.clone(),
            name: data.name.clone(),
            startup: data.startup,
            recovery: data.recovery,
            on_block: data.on_block,
            damage: data.damage,
            requires_assist: data.requires_assist,
            risk_level: data.risk_level,
        }
    }
}

/// A move with its efficiency score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveEfficiency {
    #[serde(flatten)]
    pub summary: MoveSummary,
    pub efficiency_score: f64,
}

fn profiles<'a>(catalog: &'a dyn MoveCatalog) -> impl Iterator<Item = &'a CharacterProfile> + 'a {
    catalog
        .character_names()
        .into_iter()
        .filter_map(move |name| catalog.profile(&name))
}

/// Per character, moves with a known startup, fastest first.
pub fn compare_fastest_moves(catalog: &dyn MoveCatalog) -> BTreeMap<String, Vec<MoveSummary>> {
    profiles(catalog)
        .map(|profile| {
            let mut moves: Vec<MoveSummary> = timed_moves(profile).collect();
            moves.sort_by(|a, b| a.startup.cmp(&b.startup).then_with(|| a.notation.cmp(&b.notation)));
            (profile.name.clone(), moves)
        })
        .collect()
}

/// The `limit` fastest moves across every character.
///
/// Ties are ordered by character, then notation.
pub fn fastest_moves_in_game(catalog: &dyn MoveCatalog, limit: usize) -> Vec<MoveSummary> {
    let mut moves: Vec<MoveSummary> = profiles(catalog).flat_map(timed_moves).collect();
    moves.sort_by(|a, b| {
        a.startup
            .cmp(&b.startup)
            .then_with(|| a.character.cmp(&b.character))
            .then_with(|| a.notation.cmp(&b.notation))
    });
    moves.truncate(limit);
    moves
}

fn timed_moves(profile: &CharacterProfile) -> impl Iterator<Item = MoveSummary> + '_ {
    profile
        .moves
        .values()
        .filter(|m| m.startup.is_some_and(|s| s > 0))
        .map(|m| MoveSummary::new(&profile.name, m))
}

/// Per character, moves with a known on-block value, most plus first.
pub fn compare_safest_moves(catalog: &dyn MoveCatalog) -> BTreeMap<String, Vec<MoveSummary>> {
    profiles(catalog)
        .map(|profile| {
            let mut moves: Vec<MoveSummary> = profile
                .moves
                .values()
                .filter(|m| m.on_block.is_some())
                .map(|m| MoveSummary::new(&profile.name, m))
                .collect();
            moves.sort_by(|a, b| b.on_block.cmp(&a.on_block).then_with(|| a.notation.cmp(&b.notation)));
            (profile.name.clone(), moves)
        })
        .collect()
}

/// Per character, moves that need assist cover.
pub fn compare_assist_dependent_moves(
    catalog: &dyn MoveCatalog,
) -> BTreeMap<String, Vec<MoveSummary>> {
    profiles(catalog)
        .map(|profile| {
            let moves = profile
                .moves
                .values()
                .filter(|m| m.requires_assist)
                .map(|m| MoveSummary::new(&profile.name, m))
                .collect();
            (profile.name.clone(), moves)
        })
        .collect()
}

/// Speed + safety + damage, rounded to one decimal.
///
/// `max(0, 30 - startup) + (on_block + 10) + damage / 10`. `None` unless both
/// startup and on-block are known; unknown damage scores zero.
pub fn efficiency_score(data: &MoveData) -> Option<f64> {
    let startup = data.startup.filter(|s| *s > 0)?;
    let on_block = data.on_block?;
    let speed = 30.0 - f64::from(startup);
    let safety = f64::from(on_block) + 10.0;
    let damage = f64::from(data.damage.unwrap_or(0)) / 10.0;
    let score = speed.max(0.0) + safety + damage;
    Some((score * 10.0).round() / 10.0)
}

/// Moves of `character` ranked by [`efficiency_score`], best first.
pub fn move_efficiency_ranking(
    catalog: &dyn MoveCatalog,
    character: &str,
) -> AnalyzerResult<Vec<MoveEfficiency>> {
    let profile = require(catalog, character)?;
    let mut ranked: Vec<MoveEfficiency> = profile
        .moves
        .values()
        .filter_map(|m| {
            efficiency_score(m).map(|score| MoveEfficiency {
                summary: MoveSummary::new(&profile.name, m),
                efficiency_score: score,
            })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.efficiency_score
            .partial_cmp(&a.efficiency_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.summary.notation.cmp(&b.summary.notation))
    });
    Ok(ranked)
}
