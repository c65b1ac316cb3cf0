//! Terminal interpreter for session effects.
//!
//! This is the stand-in for the browser DOM: it holds the purely visual
//! bits (active theme marker, chart view model, panel visibility) and turns
//! each [`Effect`] into colored terminal output. No synchronization logic
//! lives here.

use colored::Colorize;
use rand::Rng;

use crate::chart::RadarChart;
use crate::session::{Effect, EffectSink, Role};
use crate::theme::Theme;

pub struct TerminalRenderer {
    theme: Theme,
    chart: RadarChart,
    /// Cached panel content so `/status` can re-print the latest snapshot.
    affection_line: String,
    memory_lines: Vec<String>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            theme: Theme::Natural,
            chart: RadarChart::new(Theme::Natural),
            affection_line: String::new(),
            memory_lines: Vec::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    fn print_bubble(&self, role: Role, text: &str) {
        match role {
            Role::User => println!("{} {}", "you ▸".dimmed(), text),
            Role::Ai => {
                println!("{} {}", "ai  ▸".color(self.theme.terminal_color()).bold(), text)
            }
        }
    }

    fn print_panel(&self) {
        println!("{}", "── status ──────────────────────".dimmed());
        println!("  persona   {}", self.theme.as_str().color(self.theme.terminal_color()).bold());
        if !self.affection_line.is_empty() {
            println!("{}", self.affection_line);
        }
        for line in self.chart.render_lines() {
            println!("{line}");
        }
        println!("  memories");
        if self.memory_lines.is_empty() {
            println!("    {}", "No memories yet".dimmed());
        } else {
            for memory in &self.memory_lines {
                println!("    • {memory}");
            }
        }
        println!("{}", "────────────────────────────────".dimmed());
    }

    fn print_particles(&self, theme: Theme, count: usize) {
        // Cosmetic only: one line of themed dots at random densities.
        let mut rng = rand::thread_rng();
        let color = theme.terminal_color();
        let line: String = (0..count)
            .map(|_| if rng.gen_bool(0.5) { '✦' } else { '·' })
            .collect();
        println!("{}", line.color(color));
    }
}

impl EffectSink for TerminalRenderer {
    fn handle(&mut self, effect: &Effect) {
        match effect {
            Effect::AppendBubble { role, text } => self.print_bubble(*role, text),
            Effect::ClearInput => {}
            Effect::SetInputEnabled(_) => {}
            Effect::FocusInput => {}
            Effect::ShowTyping => println!("{}", "ai is typing…".dimmed().italic()),
            Effect::HideTyping => {}
            Effect::SetThemeMarker(theme) => {
                // Atomic swap: old marker gone the moment the new one lands.
                self.theme = *theme;
                self.chart.set_theme(*theme);
                println!(
                    "{}",
                    format!("── theme: {} ──", theme.as_str())
                        .color(theme.terminal_color())
                        .bold()
                );
            }
            Effect::RedrawChart { scores, theme } => {
                self.chart.set_theme(*theme);
                self.chart.set_scores(scores);
            }
            Effect::SetAffectionBar { percent, label } => {
                let filled = (*percent as usize) / 5;
                let bar = "♥".repeat(filled) + &"·".repeat(20 - filled);
                self.affection_line =
                    format!("  affection {} {}", bar.color(self.theme.terminal_color()), label);
            }
            Effect::ReplaceMemoryList(memories) => {
                self.memory_lines = memories.clone();
            }
            Effect::ReplaceTranscriptWithWelcome => {
                println!();
                self.print_bubble(Role::Ai, crate::session::WELCOME_MESSAGE);
            }
            Effect::RunEvolution { .. } => {
                // Driven by the controller, which replays it as stage effects.
            }
            Effect::MemoryHint(true) => {
                println!("{}", "💾 This message will be saved as long-term memory".bold());
            }
            Effect::MemoryHint(false) => {}
            Effect::ShowDemoIndicator => {
                println!("{}", "🚀 Demo Mode Activated".bold());
            }
            Effect::SetPanelOpen(open) => {
                if *open {
                    self.print_panel();
                }
            }
            Effect::RenderEventIndicator(snapshot) => {
                // Replace-not-merge: nothing survives from a prior indicator.
                if !snapshot.has_active_events() {
                    return;
                }
                println!("{}", "🎊 Active Events".bold());
                for event in &snapshot.active_events {
                    let bonus = if event.affection_bonus > 0 {
                        format!(" +{}💖", event.affection_bonus)
                    } else {
                        String::new()
                    };
                    println!("  {} {}{}", event.icon, event.name, bonus);
                }
                if snapshot.affection_bonus > 0 {
                    println!("  Total Affection Bonus: +{}", snapshot.affection_bonus);
                }
            }
            Effect::OverrideWelcome(message) => {
                self.print_bubble(Role::Ai, message);
            }
            Effect::ShowOverlay => println!("{}", "════════════════════════════════".bold()),
            Effect::FlashOverlay => println!("{}", "✨ ✨ ✨".bold()),
            Effect::SpawnParticles { theme, count } => self.print_particles(*theme, *count),
            Effect::ShowFactors(factors) => {
                if factors.is_empty() {
                    return;
                }
                println!("Evolution Factors:");
                for factor in factors {
                    println!("  - {factor}");
                }
            }
            Effect::ShowModal(theme) => {
                println!(
                    "{} {}",
                    "EVOLVED TO:".bold(),
                    theme.as_str().to_uppercase().color(theme.terminal_color()).bold()
                );
            }
            Effect::HideModal => {}
            Effect::ClearParticles => {}
            Effect::HideOverlay => println!("{}", "════════════════════════════════".dimmed()),
        }
    }
}

/// Sink that records effects instead of printing, for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub effects: Vec<Effect>,
}

impl EffectSink for RecordingSink {
    fn handle(&mut self, effect: &Effect) {
        self.effects.push(effect.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::PersonalityScores;

    #[test]
    fn theme_marker_swaps_renderer_and_chart_theme() {
        let mut renderer = TerminalRenderer::new();
        renderer.handle(&Effect::SetThemeMarker(Theme::Kuudere));
        assert_eq!(renderer.theme(), Theme::Kuudere);
        assert_eq!(renderer.chart.theme(), Theme::Kuudere);
    }

    #[test]
    fn redraw_chart_replaces_data_and_colors() {
        let mut renderer = TerminalRenderer::new();
        renderer.handle(&Effect::RedrawChart {
            scores: PersonalityScores { tsundere: 5, yandere: 0, kuudere: 0, dandere: 0 },
            theme: Theme::Tsundere,
        });
        assert_eq!(renderer.chart.data(), [5, 0, 0, 0]);
        assert_eq!(renderer.chart.theme(), Theme::Tsundere);
    }

    #[test]
    fn memory_list_is_replaced_not_appended() {
        let mut renderer = TerminalRenderer::new();
        renderer.handle(&Effect::ReplaceMemoryList(vec!["a".to_string(), "b".to_string()]));
        renderer.handle(&Effect::ReplaceMemoryList(vec!["c".to_string()]));
        assert_eq!(renderer.memory_lines, vec!["c"]);
    }

    #[test]
    fn recording_sink_captures_in_order() {
        let mut sink = RecordingSink::default();
        sink.handle(&Effect::ShowTyping);
        sink.handle(&Effect::HideTyping);
        assert_eq!(sink.effects, vec![Effect::ShowTyping, Effect::HideTyping]);
    }
}
