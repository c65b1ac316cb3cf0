//! Radar chart view model for personality tendencies.
//!
//! Every status change replaces the chart data wholesale; there is no
//! incremental update path.

use colored::Colorize;

use crate::gateway::PersonalityScores;
use crate::theme::Theme;

/// Axis labels in fixed order, matching [`PersonalityScores::as_axes`].
pub const AXES: [&str; 4] = ["Tsundere", "Yandere", "Kuudere", "Dandere"];

/// Chart scale maximum. Scores above this render as a full bar.
pub const SCALE_MAX: u32 = 30;

/// Terminal stand-in for the radar chart: one horizontal bar per axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadarChart {
    data: [u32; 4],
    theme: Theme,
}

impl RadarChart {
    pub fn new(theme: Theme) -> Self {
        Self { data: [0; 4], theme }
    }

    /// Replace all four axis values with the given scores.
    pub fn set_scores(&mut self, scores: &PersonalityScores) {
        self.data = scores.as_axes();
    }

    /// Replace both color channels (the next render picks them up).
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn data(&self) -> [u32; 4] {
        self.data
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Render one line per axis: padded label, filled bar, raw value.
    pub fn render_lines(&self) -> Vec<String> {
        let color = self.theme.terminal_color();
        AXES.iter()
            .zip(self.data.iter())
            .map(|(label, &value)| {
                let filled = value.min(SCALE_MAX) as usize;
                let bar: String = "█".repeat(filled) + &"░".repeat(SCALE_MAX as usize - filled);
                format!("  {:<9} {} {}", label, bar.color(color), value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_chart_starts_at_zero() {
        let chart = RadarChart::new(Theme::Natural);
        assert_eq!(chart.data(), [0, 0, 0, 0]);
    }

    #[test]
    fn set_scores_replaces_all_axes() {
        let mut chart = RadarChart::new(Theme::Natural);
        chart.set_scores(&PersonalityScores { tsundere: 5, yandere: 1, kuudere: 2, dandere: 3 });
        assert_eq!(chart.data(), [5, 1, 2, 3]);

        // A second update replaces, never accumulates.
        chart.set_scores(&PersonalityScores { tsundere: 0, yandere: 0, kuudere: 0, dandere: 9 });
        assert_eq!(chart.data(), [0, 0, 0, 9]);
    }

    #[test]
    fn set_theme_replaces_colors() {
        let mut chart = RadarChart::new(Theme::Natural);
        chart.set_theme(Theme::Tsundere);
        assert_eq!(chart.theme(), Theme::Tsundere);
    }

    #[test]
    fn render_has_one_line_per_axis() {
        let chart = RadarChart::new(Theme::Kuudere);
        let lines = chart.render_lines();
        assert_eq!(lines.len(), AXES.len());
        for (line, label) in lines.iter().zip(AXES.iter()) {
            assert!(line.contains(label), "missing label {label} in {line}");
        }
    }

    #[test]
    fn render_clamps_overscale_values_to_full_bar() {
        colored::control::set_override(false);
        let mut chart = RadarChart::new(Theme::Natural);
        chart.set_scores(&PersonalityScores { tsundere: 45, yandere: 0, kuudere: 0, dandere: 0 });
        let lines = chart.render_lines();
        let filled = lines[0].matches('█').count();
        assert_eq!(filled, SCALE_MAX as usize);
        // The raw value still appears unclamped.
        assert!(lines[0].contains("45"));
        colored::control::unset_override();
    }
}
