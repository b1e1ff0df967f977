//! Match statistics over recorded results.
//!
//! Usage: `xko-match-stats [matches.json]`. Without a file, built-in sample
//! data is used.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use xko_analyzer::{init_tracing, load_matches, sample_matches, MatchStatsAnalyzer};
use xko_models::{MatchSummary, PlayerRecord};

#[derive(Parser, Debug)]
#[command(name = "xko-match-stats")]
#[command(about = "Win rates and usage statistics from recorded 2XKO matches")]
#[command(version)]
struct Args {
    /// JSON array of match records
    file: Option<PathBuf>,
}

fn rule() -> String {
    "=".repeat(60)
}

/// Entries sorted by value, highest first.
fn ranked<V: PartialOrd + Copy>(map: &std::collections::BTreeMap<String, V>) -> Vec<(&str, V)> {
    let mut entries: Vec<(&str, V)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    entries
}

fn print_summary(summary: &MatchSummary) {
    println!("\n{}", rule());
    println!("2XKO MATCH STATISTICS");
    println!("{}", rule());
    println!("\nTotal Matches Analyzed: {}", summary.total_matches);
    println!("Total Players: {}", summary.unique_players);

    println!("\n--- CHARACTER STATISTICS ---");
    println!(
        "Most Used Character: {}",
        summary.most_used_character.as_deref().unwrap_or("-")
    );
    println!(
        "Highest Win Rate Character: {}",
        summary.highest_win_rate_character.as_deref().unwrap_or("-")
    );
    println!("\nCharacter Usage:");
    for (character, count) in ranked(&summary.character_usage) {
        println!("  {character}: {count} times");
    }
    println!("\nCharacter Win Rates:");
    for (character, rate) in ranked(&summary.character_win_rates) {
        println!("  {character}: {rate:.1}%");
    }

    println!("\n--- PLAYER STATISTICS ---");
    println!("Player Win Rates:");
    for (player, rate) in ranked(&summary.player_win_rates) {
        println!("  {player}: {rate:.1}%");
    }

    println!("\n--- GAMEPLAY METRICS ---");
    println!("Average Damage per Match: {:.1}", summary.average_damage_per_match);
    println!("Average Combos per Match: {:.1}", summary.average_combos_per_match);
    println!("{}", rule());
}

fn print_player(record: &PlayerRecord) {
    println!("\n{}", rule());
    println!("PLAYER STATISTICS: {}", record.player_name);
    println!("{}", rule());
    println!("\nTotal Matches: {}", record.matches_played);
    println!("Wins: {}", record.wins);
    println!("Losses: {}", record.losses);
    println!("Win Rate: {:.1}%", record.win_rate);
    println!("\nTotal Damage Dealt: {}", record.total_damage_dealt);
    println!("Total Damage Taken: {}", record.total_damage_taken);
    println!("Average Damage Dealt: {:.1}", record.average_damage_per_match);
    println!("\nTotal Combos: {}", record.total_combos);
    println!("Average Combos per Match: {:.1}", record.average_combos_per_match);
    println!(
        "\nFavorite Character: {}",
        record.favorite_character.as_deref().unwrap_or("-")
    );
    println!("Characters Used: {}", record.characters_used.join(", "));
    println!("{}", rule());
}

fn run(args: Args) -> Result<()> {
    let matches = match &args.file {
        Some(path) => load_matches(path)
            .with_context(|| format!("Failed to load matches from {}", path.display()))?,
        None => {
            println!("No input file provided. Using sample data for demonstration.");
            sample_matches()
        }
    };

    let mut analyzer = MatchStatsAnalyzer::new();
    analyzer.add_matches(matches);
    let summary = analyzer.analyze();
    print_summary(&summary);

    if summary.unique_players > 0 {
        println!("\n--- DETAILED PLAYER ANALYSIS ---");
        for name in analyzer.player_names() {
            if let Some(record) = analyzer.player_stats(&name) {
                print_player(&record);
            }
        }
    }
    Ok(())
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e:?}");
        std::process::exit(1);
    }
}
