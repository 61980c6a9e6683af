//! Renderers for chat results: colored console text or raw JSON

use crate::config::OutputFormat;
use crate::conversation::response::{ChatResult, Visualization};
use crate::error::Result;
use crate::output::report::{score_emoji, score_level};
use colored::{Color, Colorize};

/// Trait for rendering one chat turn
pub trait OutputFormatter {
    fn format_result(&self, result: &ChatResult) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal renderer: bold markup, bullets, visualization summaries and numbered quick replies
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON renderer, the shape an HTTP layer would return
pub struct JsonFormatter {
    pretty: bool,
}

/// Picks the formatter matching the configured output format
pub struct ChatRenderer {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        if self.use_colors {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// `**x**` segments become bold, `• ` bullets get highlighted
    fn render_markup(&self, text: &str) -> String {
        text.lines()
            .map(|line| {
                let (bullet, body) = match line.strip_prefix("• ") {
                    Some(rest) => (Some(self.colorize("•", Color::Cyan)), rest),
                    None => (None, line),
                };
                let rendered: String = body
                    .split("**")
                    .enumerate()
                    .map(|(i, segment)| if i % 2 == 1 { self.bold(segment) } else { segment.to_string() })
                    .collect();
                match bullet {
                    Some(bullet) => format!("  {} {}", bullet, rendered),
                    None => rendered,
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn progress_bar(&self, current: usize, total: usize) -> String {
        let filled = current.min(total);
        let bar = format!("{}{}", "■".repeat(filled), "□".repeat(total - filled));
        self.colorize(&bar, Color::Green)
    }

    fn score_color(score: u8) -> Color {
        match score {
            80..=u8::MAX => Color::Green,
            60..=79 => Color::Yellow,
            _ => Color::Red,
        }
    }

    fn format_visualization(&self, visualization: &Visualization) -> String {
        match visualization {
            Visualization::Progress { current, total, steps } => {
                format!("{} {}", self.progress_bar(*current, *total), steps.join(" → "))
            }
            Visualization::StepIndicator { current, total, title } => format!(
                "{} Étape {}/{} : {}",
                self.progress_bar(*current, *total),
                current,
                total,
                self.bold(title)
            ),
            Visualization::CvAnalysis(profile) => {
                let mut line = format!(
                    "📄 {} compétences, {} ans, niveau {}, profil complet à {}%",
                    profile.skills.len(),
                    profile.experience_years,
                    profile.level,
                    profile.completeness
                );
                if self.detailed && !profile.skills.is_empty() {
                    line.push_str(&format!("\n   {}", profile.skills.join(", ")));
                }
                line
            }
            Visualization::MatchingResults(matching) => {
                let score = format!("{}/100", matching.overall_score);
                let mut line = format!(
                    "🎯 Matching {} (compétences {}%, expérience {}%, niveau {}%)",
                    self.colorize(&score, Self::score_color(matching.overall_score)),
                    matching.skills_match,
                    matching.experience_match,
                    matching.level_match
                );
                if !matching.missing_skills.is_empty() {
                    line.push_str(&format!(
                        "\n   Manquant : {}",
                        self.colorize(&matching.missing_skills.join(", "), Color::Red)
                    ));
                }
                line
            }
            Visualization::InterviewProgress { current, total } => {
                format!("💬 {} Question {}/{}", self.progress_bar(*current, *total), current, total)
            }
            Visualization::AnswerFeedback(analysis) => format!(
                "📝 Réponse : {:.1}/10 ({} mots-clés, {} caractères)",
                analysis.score, analysis.keywords, analysis.length
            ),
            Visualization::FinalResults(report) => {
                let score = format!("{}/100", report.final_score);
                format!(
                    "{} Score final {} [{}]",
                    score_emoji(report.final_score),
                    self.colorize(&score, Self::score_color(report.final_score)),
                    self.bold(score_level(report.final_score))
                )
            }
            Visualization::DetailedAnalysis(report) => format!(
                "📊 {} points forts, {} axes d'amélioration, sentiment {}",
                report.strengths.len(),
                report.improvements.len(),
                report.sentiment
            ),
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_result(&self, result: &ChatResult) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.colorize("🤖 ATS Assistant", Color::Blue));
        output.push('\n');
        output.push_str(&self.render_markup(&result.response));
        output.push('\n');

        if !result.visualizations.is_empty() {
            output.push('\n');
            for visualization in &result.visualizations {
                output.push_str(&self.format_visualization(visualization));
                output.push('\n');
            }
        }

        if !result.quick_replies.is_empty() {
            output.push('\n');
            for (i, reply) in result.quick_replies.iter().enumerate() {
                output.push_str(&format!("  [{}] {}\n", i + 1, self.colorize(reply, Color::Cyan)));
            }
        }

        if self.detailed {
            let analytics = &result.analytics;
            output.push_str(&self.colorize(
                &format!(
                    "\n[{}] {} messages, {} sujets, {}s\n",
                    result.step,
                    analytics.total_messages,
                    analytics.topics_discussed.len(),
                    analytics.session_duration / 1000
                ),
                Color::BrightBlack,
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, result: &ChatResult) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(result)?)
        } else {
            Ok(serde_json::to_string(result)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl ChatRenderer {
    pub fn new() -> Self {
        Self::with_options(true, false, true)
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
        }
    }

    pub fn render(&self, result: &ChatResult, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_result(result),
            OutputFormat::Json => self.json_formatter.format_result(result),
        }
    }

    /// Resolve a typed answer: a quick-reply number picks that reply, anything else is sent as is
    pub fn resolve_quick_reply<'a>(result: &'a ChatResult, input: &'a str) -> &'a str {
        input
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| result.quick_replies.get(i))
            .map(String::as_str)
            .unwrap_or(input)
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::response::AnalyticsSnapshot;
    use crate::conversation::state::Step;

    fn result() -> ChatResult {
        ChatResult {
            response: "**Titre**\n• un point\nTexte **gras** ici".to_string(),
            quick_replies: vec!["🚀 Commencer".to_string(), "❓ Aide".to_string()],
            step: Step::WaitingStart,
            visualizations: vec![Visualization::step_indicator(1, "Analyse CV")],
            analytics: AnalyticsSnapshot::default(),
            typing: true,
        }
    }

    #[test]
    fn test_plain_console_output() {
        let formatter = ConsoleFormatter::new(false, false);
        let output = formatter.format_result(&result()).unwrap();

        assert!(output.contains("Titre\n  • un point\nTexte gras ici"));
        assert!(output.contains("■□□ Étape 1/3 : Analyse CV"));
        assert!(output.contains("  [1] 🚀 Commencer\n  [2] ❓ Aide"));
        assert!(!output.contains("**"));
        assert!(!output.contains("waiting_start"));
    }

    #[test]
    fn test_detailed_console_shows_step() {
        let formatter = ConsoleFormatter::new(false, true);
        let output = formatter.format_result(&result()).unwrap();
        assert!(output.contains("[waiting_start] 0 messages"));
    }

    #[test]
    fn test_json_output() {
        let renderer = ChatRenderer::with_options(false, false, false);
        let output = renderer.render(&result(), &OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["step"], "waiting_start");
        assert_eq!(json["visualizations"][0]["type"], "step_indicator");
    }

    #[test]
    fn test_resolve_quick_reply() {
        let result = result();
        assert_eq!(ChatRenderer::resolve_quick_reply(&result, "2"), "❓ Aide");
        assert_eq!(ChatRenderer::resolve_quick_reply(&result, "0"), "0");
        assert_eq!(ChatRenderer::resolve_quick_reply(&result, "9"), "9");
        assert_eq!(ChatRenderer::resolve_quick_reply(&result, "Bonjour"), "Bonjour");
    }
}
