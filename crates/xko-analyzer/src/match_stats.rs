//! Statistics over recorded match results.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::info;
use xko_models::{MatchPlayerStats, MatchRecord, MatchSummary, MatchupRecord, PlayerRecord};

use crate::error::{AnalyzerError, AnalyzerResult};

fn percent(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        f64::from(part) / f64::from(whole) * 100.0
    }
}

/// Key with the largest value. Ties go to the smallest key.
fn arg_max<V: PartialOrd + Copy>(map: &BTreeMap<String, V>) -> Option<String> {
    let mut best: Option<(&String, V)> = None;
    for (key, &value) in map {
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((key, value)),
        }
    }
    best.map(|(key, _)| key.clone())
}

/// Accumulates match records and answers questions about them.
#[derive(Debug, Clone, Default)]
pub struct MatchStatsAnalyzer {
    matches: Vec<MatchRecord>,
}

impl MatchStatsAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_match(&mut self, record: MatchRecord) {
        self.matches.push(record);
    }

    pub fn add_matches(&mut self, records: impl IntoIterator<Item = MatchRecord>) {
        self.matches.extend(records);
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Every player name, sorted.
    pub fn player_names(&self) -> Vec<String> {
        self.matches
            .iter()
            .flat_map(|m| m.players())
            .map(|p| p.player_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn analyze(&self) -> MatchSummary {
        if self.matches.is_empty() {
            return MatchSummary::default();
        }

        let mut character_usage: BTreeMap<String, u32> = BTreeMap::new();
        let mut character_wins: BTreeMap<String, u32> = BTreeMap::new();
        let mut player_matches: BTreeMap<String, u32> = BTreeMap::new();
        let mut player_wins: BTreeMap<String, u32> = BTreeMap::new();
        let mut total_damage = 0u64;
        let mut total_combos = 0u64;

        for record in &self.matches {
            for player in record.players() {
                *character_usage.entry(player.character.clone()).or_default() += 1;
                *player_matches.entry(player.player_name.clone()).or_default() += 1;
                total_damage += u64::from(player.damage_dealt);
                total_combos += u64::from(player.combos_landed);
            }
            if let Some(winner) = record.winner_stats() {
                *character_wins.entry(winner.character.clone()).or_default() += 1;
                *player_wins.entry(winner.player_name.clone()).or_default() += 1;
            }
        }

        let character_win_rates: BTreeMap<String, f64> = character_usage
            .iter()
            .map(|(c, &n)| {
                let wins = character_wins.get(c).copied().unwrap_or(0);
                (c.clone(), percent(wins, n))
            })
            .collect();
        let player_win_rates: BTreeMap<String, f64> = player_matches
            .iter()
            .map(|(p, &n)| {
                let wins = player_wins.get(p).copied().unwrap_or(0);
                (p.clone(), percent(wins, n))
            })
            .collect();

        let total = self.matches.len() as f64;
        MatchSummary {
            total_matches: self.matches.len(),
            unique_players: player_matches.len(),
            most_used_character: arg_max(&character_usage),
            highest_win_rate_character: arg_max(&character_win_rates),
            character_usage,
            character_win_rates,
            player_win_rates,
            average_damage_per_match: total_damage as f64 / total,
            average_combos_per_match: total_combos as f64 / total,
        }
    }

    /// Career record for `player_name`, or `None` if they never played.
    pub fn player_stats(&self, player_name: &str) -> Option<PlayerRecord> {
        let appearances: Vec<(&MatchRecord, &MatchPlayerStats)> = self
            .matches
            .iter()
            .filter_map(|m| {
                m.players()
                    .into_iter()
                    .find(|p| p.player_name == player_name)
                    .map(|p| (m, p))
            })
            .collect();
        if appearances.is_empty() {
            return None;
        }

        let played = appearances.len() as u32;
        let wins = appearances
            .iter()
            .filter(|(m, _)| m.winner == player_name)
            .count() as u32;
        let mut usage: BTreeMap<String, u32> = BTreeMap::new();
        let (mut dealt, mut taken, mut combos) = (0u32, 0u32, 0u32);
        for (_, stats) in &appearances {
            dealt += stats.damage_dealt;
            taken += stats.damage_taken;
            combos += stats.combos_landed;
            *usage.entry(stats.character.clone()).or_default() += 1;
        }

        let mut characters_used: Vec<(String, u32)> = usage.clone().into_iter().collect();
        characters_used.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Some(PlayerRecord {
            player_name: player_name.to_string(),
            matches_played: played,
            wins,
            losses: played - wins,
            win_rate: percent(wins, played),
            total_damage_dealt: dealt,
            total_damage_taken: taken,
            total_combos: combos,
            average_damage_per_match: f64::from(dealt) / f64::from(played),
            average_combos_per_match: f64::from(combos) / f64::from(played),
            favorite_character: arg_max(&usage),
            characters_used: characters_used.into_iter().map(|(c, _)| c).collect(),
        })
    }

    /// Head-to-head record between two characters, either side.
    pub fn character_matchup(&self, character1: &str, character2: &str) -> Option<MatchupRecord> {
        let relevant: Vec<&MatchRecord> = self
            .matches
            .iter()
            .filter(|m| {
                let (a, b) = (&m.player1.character, &m.player2.character);
                (a == character1 && b == character2) || (a == character2 && b == character1)
            })
            .collect();
        if relevant.is_empty() {
            return None;
        }

        let total = relevant.len() as u32;
        // Matches whose winner is neither player count for nobody.
        let wins_for = |character: &str| {
            relevant
                .iter()
                .filter(|m| m.winner_stats().is_some_and(|w| w.character == character))
                .count() as u32
        };
        let character1_wins = wins_for(character1);
        let character2_wins = wins_for(character2);

        Some(MatchupRecord {
            character1: character1.to_string(),
            character2: character2.to_string(),
            total_matches: total,
            character1_wins,
            character2_wins,
            character1_win_rate: percent(character1_wins, total),
            character2_win_rate: percent(character2_wins, total),
        })
    }
}

/// Read a JSON array of match records.
pub fn load_matches(path: impl AsRef<Path>) -> AnalyzerResult<Vec<MatchRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| AnalyzerError::io(path, e))?;
    let matches: Vec<MatchRecord> = serde_json::from_str(&text)?;
    info!("Loaded {} matches from {}", matches.len(), path.display());
    Ok(matches)
}

fn player(
    name: &str,
    character: &str,
    [damage_dealt, damage_taken, combos_landed, rounds_won, special_moves_used, blocks_successful]: [u32; 6],
) -> MatchPlayerStats {
    MatchPlayerStats {
        player_name: name.to_string(),
        character: character.to_string(),
        damage_dealt,
        damage_taken,
        combos_landed,
        rounds_won,
        special_moves_used,
        blocks_successful,
    }
}

fn sample(
    id: &str,
    player1: MatchPlayerStats,
    player2: MatchPlayerStats,
    winner: &str,
    duration: f64,
) -> MatchRecord {
    MatchRecord {
        match_id: id.to_string(),
        player1,
        player2,
        winner: winner.to_string(),
        duration,
        timestamp: None,
        total_rounds: 3,
    }
}

/// Built-in demonstration data.
pub fn sample_matches() -> Vec<MatchRecord> {
    vec![
        sample(
            "match_001",
            player("Alice", "Darius", [850, 420, 12, 2, 8, 15]),
            player("Bob", "Ahri", [420, 850, 6, 1, 5, 10]),
            "Alice",
            180.0,
        ),
        sample(
            "match_002",
            player("Bob", "Yasuo", [920, 380, 15, 2, 10, 12]),
            player("Charlie", "Ekko", [380, 920, 5, 1, 4, 8]),
            "Bob",
            165.0,
        ),
        sample(
            "match_003",
            player("Alice", "Darius", [780, 520, 10, 2, 7, 14]),
            player("Charlie", "Ahri", [520, 780, 7, 1, 6, 11]),
            "Alice",
            195.0,
        ),
        sample(
            "match_004",
            player("Charlie", "Ekko", [900, 450, 14, 2, 9, 13]),
            player("Alice", "Yasuo", [450, 900, 8, 1, 5, 9]),
            "Charlie",
            172.0,
        ),
        sample(
            "match_005",
            player("Bob", "Ahri", [650, 600, 9, 2, 7, 11]),
            player("Alice", "Darius", [600, 650, 8, 1, 6, 10]),
            "Bob",
            188.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> MatchStatsAnalyzer {
        let mut analyzer = MatchStatsAnalyzer::new();
        analyzer.add_matches(sample_matches());
        analyzer
    }

    #[test]
    fn test_empty_analysis() {
        let summary = MatchStatsAnalyzer::new().analyze();
        assert_eq!(summary, MatchSummary::default());
        assert!(MatchStatsAnalyzer::new().player_stats("Alice").is_none());
    }

    #[test]
    fn test_sample_summary() {
        let summary = analyzer().analyze();
        assert_eq!(summary.total_matches, 5);
        assert_eq!(summary.unique_players, 3);
        assert_eq!(summary.character_usage["Darius"], 3);
        assert_eq!(summary.most_used_character.as_deref(), Some("Ahri"));
        // Darius wins 2 of 3, Yasuo and Ekko 1 of 2
        assert_eq!(summary.highest_win_rate_character.as_deref(), Some("Darius"));
        assert!((summary.average_damage_per_match - 1294.0).abs() < 1e-9);
        assert!((summary.average_combos_per_match - 18.8).abs() < 1e-9);
        assert!((summary.player_win_rates["Bob"] - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_most_used_tie_breaks_by_name() {
        // Ahri and Darius both appear three times
        let summary = analyzer().analyze();
        assert_eq!(summary.character_usage["Ahri"], 3);
        assert_eq!(summary.character_usage["Darius"], 3);
        assert_eq!(summary.most_used_character.as_deref(), Some("Ahri"));
    }

    #[test]
    fn test_player_stats() {
        let alice = analyzer().player_stats("Alice").unwrap();
        assert_eq!(alice.matches_played, 4);
        assert_eq!(alice.wins, 2);
        assert_eq!(alice.losses, 2);
        assert_eq!(alice.total_damage_dealt, 850 + 780 + 450 + 600);
        assert_eq!(alice.favorite_character.as_deref(), Some("Darius"));
        assert_eq!(alice.characters_used, vec!["Darius", "Yasuo"]);
    }

    #[test]
    fn test_character_matchup() {
        let record = analyzer().character_matchup("Darius", "Ahri").unwrap();
        assert_eq!(record.total_matches, 3);
        assert_eq!(record.character1_wins, 2);
        assert_eq!(record.character2_wins, 1);
        assert!(analyzer().character_matchup("Ekko", "Darius").is_none());
    }

    #[test]
    fn test_matchup_ignores_unknown_winner() {
        let mut analyzer = MatchStatsAnalyzer::new();
        let mut forfeited = sample_matches().remove(0);
        forfeited.winner = "Nobody".to_string();
        analyzer.add_match(forfeited);

        let record = analyzer.character_matchup("Darius", "Ahri").unwrap();
        assert_eq!(record.total_matches, 1);
        assert_eq!(record.character1_wins, 0);
        assert_eq!(record.character2_wins, 0);
        assert_eq!(record.character2_win_rate, 0.0);
    }

    #[test]
    fn test_load_matches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matches.json");
        std::fs::write(
            &path,
            r#"[{"match_id": "m1",
                 "player1": {"player_name": "A", "character": "Ahri"},
                 "player2": {"player_name": "B", "character": "Ekko"},
                 "winner": "A", "match_duration_seconds": 90}]"#,
        )
        .unwrap();

        let matches = load_matches(&path).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].duration, 90.0);

        let err = load_matches(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, AnalyzerError::Io { .. }));
    }
}
