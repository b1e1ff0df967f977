//! Combo tracking records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Actor;

/// How a combo ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComboEnd {
    /// Ran out of hits within the timeout.
    Finished,
    /// Interrupted by the opponent.
    Dropped,
}

/// A run of consecutive hits by one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Combo {
    pub actor: Actor,
    pub round: u32,
    pub start_frame: u64,
    pub end_frame: u64,
    pub start_time: f64,
    pub end_time: f64,
    pub hit_count: u32,
    pub moves_used: Vec<String>,
    pub damage: u32,
    pub ended_by: ComboEnd,
}

impl Combo {
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}

/// Skill bucket derived from the longest combo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Learning,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl PerformanceLevel {
    pub fn from_max_combo(max_hits: u32) -> Self {
        match max_hits {
            n if n >= 10 => PerformanceLevel::Expert,
            n if n >= 7 => PerformanceLevel::Advanced,
            n if n >= 5 => PerformanceLevel::Intermediate,
            n if n >= 3 => PerformanceLevel::Beginner,
            _ => PerformanceLevel::Learning,
        }
    }
}

impl fmt::Display for PerformanceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PerformanceLevel::Learning => "Learning",
            PerformanceLevel::Beginner => "Beginner",
            PerformanceLevel::Intermediate => "Intermediate",
            PerformanceLevel::Advanced => "Advanced",
            PerformanceLevel::Expert => "Expert",
        };
        write!(f, "{}", s)
    }
}

/// Per-actor combo statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComboSummary {
    pub total_combos: u32,
    /// Average hits per combo, rounded to one decimal.
    pub average_length: f64,
    pub max_combo: u32,
    pub total_damage: u32,
    pub performance_level: PerformanceLevel,
}

impl Default for ComboSummary {
    fn default() -> Self {
        Self {
            total_combos: 0,
            average_length: 0.0,
            max_combo: 0,
            total_damage: 0,
            performance_level: PerformanceLevel::Learning,
        }
    }
}

impl ComboSummary {
    pub fn from_combos<'a>(combos: impl IntoIterator<Item = &'a Combo>) -> Self {
        let mut total = 0u32;
        let mut hits = 0u32;
        let mut max_combo = 0u32;
        let mut damage = 0u32;
        for combo in combos {
            total += 1;
            hits += combo.hit_count;
            max_combo = max_combo.max(combo.hit_count);
            damage += combo.damage;
        }
        if total == 0 {
            return Self::default();
        }
        let average = (f64::from(hits) / f64::from(total) * 10.0).round() / 10.0;
        Self {
            total_combos: total,
            average_length: average,
            max_combo,
            total_damage: damage,
            performance_level: PerformanceLevel::from_max_combo(max_combo),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(hits: u32, damage: u32) -> Combo {
        Combo {
            actor: Actor::Player1,
            round: 1,
            start_frame: 0,
            end_frame: 60,
            start_time: 0.0,
            end_time: 1.0,
            hit_count: hits,
            moves_used: Vec::new(),
            damage,
            ended_by: ComboEnd::Finished,
        }
    }

    #[test]
    fn test_performance_levels() {
        assert_eq!(PerformanceLevel::from_max_combo(12), PerformanceLevel::Expert);
        assert_eq!(PerformanceLevel::from_max_combo(7), PerformanceLevel::Advanced);
        assert_eq!(PerformanceLevel::from_max_combo(5), PerformanceLevel::Intermediate);
        assert_eq!(PerformanceLevel::from_max_combo(3), PerformanceLevel::Beginner);
        assert_eq!(PerformanceLevel::from_max_combo(2), PerformanceLevel::Learning);
    }

    #[test]
    fn test_summary_rounds_average() {
        let combos = vec![combo(2, 100), combo(3, 50), combo(3, 0)];
        let summary = ComboSummary::from_combos(&combos);
        assert_eq!(summary.total_combos, 3);
        assert_eq!(summary.average_length, 2.7);
        assert_eq!(summary.max_combo, 3);
        assert_eq!(summary.total_damage, 150);
        assert_eq!(summary.performance_level, PerformanceLevel::Beginner);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(ComboSummary::from_combos(&[]), ComboSummary::default());
    }
}
