//! Recorded match results and the statistics derived from them.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One player's numbers in a recorded match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchPlayerStats {
    pub player_name: String,
    pub character: String,
    #[serde(default)]
    pub damage_dealt: u32,
    #[serde(default)]
    pub damage_taken: u32,
    #[serde(default)]
    pub combos_landed: u32,
    #[serde(default)]
    pub rounds_won: u32,
    #[serde(default)]
    pub special_moves_used: u32,
    #[serde(default)]
    pub blocks_successful: u32,
}

fn default_total_rounds() -> u32 {
    3
}

/// A finished match between two players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchRecord {
    pub match_id: String,
    pub player1: MatchPlayerStats,
    pub player2: MatchPlayerStats,
    /// Name of the winning player.
    pub winner: String,
    /// Match length in seconds.
    #[serde(default, alias = "match_duration_seconds")]
    pub duration: f64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default = "default_total_rounds")]
    pub total_rounds: u32,
}

impl MatchRecord {
    pub fn players(&self) -> [&MatchPlayerStats; 2] {
        [&self.player1, &self.player2]
    }

    pub fn winner_stats(&self) -> Option<&MatchPlayerStats> {
        self.players()
            .into_iter()
            .find(|p| p.player_name == self.winner)
    }
}

/// Aggregate view over every loaded match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct MatchSummary {
    pub total_matches: usize,
    pub unique_players: usize,
    pub character_usage: BTreeMap<String, u32>,
    /// Percent of appearances won, per character.
    pub character_win_rates: BTreeMap<String, f64>,
    /// Percent of matches won, per player.
    pub player_win_rates: BTreeMap<String, f64>,
    pub average_damage_per_match: f64,
    pub average_combos_per_match: f64,
    pub most_used_character: Option<String>,
    pub highest_win_rate_character: Option<String>,
}

/// Career numbers for one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlayerRecord {
    pub player_name: String,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub win_rate: f64,
    pub total_damage_dealt: u32,
    pub total_damage_taken: u32,
    pub total_combos: u32,
    pub average_damage_per_match: f64,
    pub average_combos_per_match: f64,
    pub characters_used: Vec<String>,
    pub favorite_character: Option<String>,
}

/// Head-to-head record between two characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchupRecord {
    pub character1: String,
    pub character2: String,
    pub total_matches: u32,
    pub character1_wins: u32,
    pub character2_wins: u32,
    pub character1_win_rate: f64,
    pub character2_win_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_defaults() {
        let json = r#"{
            "match_id": "m1",
            "player1": {"player_name": "A", "character": "Ahri"},
            "player2": {"player_name": "B", "character": "Darius", "damage_dealt": 900},
            "winner": "B"
        }"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.total_rounds, 3);
        assert!(record.timestamp.is_none());
        assert_eq!(record.winner_stats().unwrap().damage_dealt, 900);
    }

    #[test]
    fn test_timestamp_rfc3339() {
        let json = r#"{
            "match_id": "m2",
            "player1": {"player_name": "A", "character": "Ahri"},
            "player2": {"player_name": "B", "character": "Ahri"},
            "winner": "A",
            "timestamp": "2025-01-15T14:30:00Z"
        }"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp.unwrap().to_rfc3339(), "2025-01-15T14:30:00+00:00");
    }
}
