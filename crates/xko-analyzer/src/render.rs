//! Plain-text rendering of a [`Report`].

use std::fmt;

use xko_models::{format_clock, Actor, PlayerAnalysis, Report};

const RULE_WIDTH: usize = 60;

/// A titled block of output lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }

    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

/// Rendered report, printable with `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub sections: Vec<Section>,
}

impl Document {
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{rule}")?;
            writeln!(f, "{}", section.title)?;
            writeln!(f, "{rule}")?;
            for line in &section.lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}

pub fn render(report: &Report) -> Document {
    let mut sections = Vec::new();

    if report.data_quality.is_synthetic() {
        let mut banner = Section::new("SYNTHETIC DATA");
        banner.line("Move observations in this report were generated, not recognized.");
        banner.line("Mistakes and statistics below do not describe the real match.");
        sections.push(banner);
    }

    let mut header = Section::new("2XKO GAMEPLAY ANALYSIS REPORT");
    header.line(format!("Video: {}", report.video_info.path));
    header.line(format!(
        "Duration: {} ({} frames at {:.2} fps, {})",
        format_clock(report.video_info.duration),
        report.video_info.frame_count,
        report.video_info.fps,
        report.video_info.resolution
    ));
    header.line(format!(
        "Matchup: {} vs {} ({})",
        report.matchup.character1, report.matchup.character2, report.matchup.matchup_type
    ));
    sections.push(header);

    for actor in Actor::PLAYERS {
        if let Some(analysis) = report.analysis(actor) {
            sections.push(player_section(actor, analysis));
        }
    }

    let mut combos = Section::new("COMBOS");
    for actor in Actor::PLAYERS {
        let summary = match actor {
            Actor::Player1 => &report.combos.player1,
            _ => &report.combos.player2,
        };
        combos.line(format!(
            "{}: {} combos, max {} hits, avg {:.1}, {} damage ({})",
            actor.display_name(),
            summary.total_combos,
            summary.max_combo,
            summary.average_length,
            summary.total_damage,
            summary.performance_level
        ));
    }
    sections.push(combos);

    let mut events = Section::new("KEY EVENTS");
    if report.key_events.is_empty() {
        events.line("No events detected");
    }
    for event in &report.key_events {
        events.line(format!(
            "[{}] {}: {}",
            format_clock(event.timestamp),
            event.kind.as_str().to_uppercase(),
            event.description
        ));
    }
    sections.push(events);

    let mut recs = Section::new("RECOMMENDATIONS");
    for (i, rec) in report.recommendations.iter().enumerate() {
        recs.line(format!("{}. {}", i + 1, rec));
    }
    sections.push(recs);

    Document { sections }
}

fn player_section(actor: Actor, analysis: &PlayerAnalysis) -> Section {
    let mut section = Section::new(format!("{} ANALYSIS", actor.display_name().to_uppercase()));
    section.line(format!("Playstyle: {}", analysis.playstyle));

    section.line("");
    section.line("Pros:");
    for pro in &analysis.pros {
        section.line(format!("  + {pro}"));
    }

    section.line("");
    section.line("Cons:");
    for con in &analysis.cons {
        section.line(format!("  - {con}"));
    }

    section.line("");
    if analysis.mistakes.is_empty() && analysis.opportunities.is_empty() {
        section.line("No major mistakes detected");
        return section;
    }

    section.line(format!(
        "Mistakes ({}):",
        analysis.mistakes.len() + analysis.opportunities.len()
    ));
    for mistake in analysis.mistakes.iter().chain(&analysis.opportunities) {
        section.line(format!(
            "  [{}] {}",
            format_clock(mistake.timestamp),
            mistake.best_description()
        ));
        if let Some(context) = &mistake.context {
            if !context.opponent_response_description.is_empty() {
                section.line(format!(
                    "      Opponent Response: {}",
                    context.opponent_response_description
                ));
            }
        }
        if !mistake.suggestion.is_empty() {
            section.line(format!("      Suggestion: {}", mistake.suggestion));
        }
    }
    section
}
