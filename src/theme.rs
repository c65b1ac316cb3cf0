//! Personality theme mapping.
//!
//! Five fixed personalities drive both the chat palette and the radar chart
//! colors. Exactly one theme is active at a time; unknown personality names
//! silently degrade to [`Theme::Natural`].

use colored::Color;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Closed set of visual/behavioral modes reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Natural,
    Tsundere,
    Yandere,
    Kuudere,
    Dandere,
}

/// CSS-style color pair used for the radar chart's two channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    /// Fill channel (translucent).
    pub background: &'static str,
    /// Line/point channel.
    pub border: &'static str,
}

/// Fixed palette table, one entry per theme. The [`Theme::Natural`] entry
/// doubles as the fallback for unrecognized personality names.
static PALETTE: Lazy<Vec<(Theme, ThemeColors)>> = Lazy::new(|| {
    vec![
        (
            Theme::Natural,
            ThemeColors { background: "rgba(76, 175, 80, 0.2)", border: "#4CAF50" },
        ),
        (
            Theme::Tsundere,
            ThemeColors { background: "rgba(255, 105, 180, 0.2)", border: "#FF69B4" },
        ),
        (
            Theme::Yandere,
            ThemeColors { background: "rgba(220, 20, 60, 0.2)", border: "#DC143C" },
        ),
        (
            Theme::Kuudere,
            ThemeColors { background: "rgba(0, 191, 255, 0.2)", border: "#00BFFF" },
        ),
        (
            Theme::Dandere,
            ThemeColors { background: "rgba(216, 191, 216, 0.2)", border: "#D8BFD8" },
        ),
    ]
});

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Natural,
        Theme::Tsundere,
        Theme::Yandere,
        Theme::Kuudere,
        Theme::Dandere,
    ];

    /// Parse a personality name case-insensitively.
    ///
    /// Unknown names fall back to `Natural` — silent degradation, never an
    /// error. The gateway owns the vocabulary; the client must not reject
    /// names it does not know.
    pub fn parse_loose(name: &str) -> Theme {
        match name.trim().to_lowercase().as_str() {
            "natural" => Theme::Natural,
            "tsundere" => Theme::Tsundere,
            "yandere" => Theme::Yandere,
            "kuudere" => Theme::Kuudere,
            "dandere" => Theme::Dandere,
            _ => Theme::Natural,
        }
    }

    /// Color pair for this theme.
    pub fn colors(self) -> ThemeColors {
        PALETTE
            .iter()
            .find(|(t, _)| *t == self)
            .map(|(_, c)| *c)
            .unwrap_or(PALETTE[0].1)
    }

    /// Terminal color matching the border channel.
    pub fn terminal_color(self) -> Color {
        match self {
            Theme::Natural => Color::TrueColor { r: 0x4c, g: 0xaf, b: 0x50 },
            Theme::Tsundere => Color::TrueColor { r: 0xff, g: 0x69, b: 0xb4 },
            Theme::Yandere => Color::TrueColor { r: 0xdc, g: 0x14, b: 0x3c },
            Theme::Kuudere => Color::TrueColor { r: 0x00, g: 0xbf, b: 0xff },
            Theme::Dandere => Color::TrueColor { r: 0xd8, g: 0xbf, b: 0xd8 },
        }
    }

    /// Three-color palette for evolution particles.
    pub fn particle_palette(self) -> [&'static str; 3] {
        match self {
            Theme::Natural => ["#4CAF50", "#66BB6A", "#81C784"],
            Theme::Tsundere => ["#FF69B4", "#FF85C2", "#FFA1D0"],
            Theme::Yandere => ["#DC143C", "#E91E63", "#F06292"],
            Theme::Kuudere => ["#00BFFF", "#4FC3F7", "#81D4FA"],
            Theme::Dandere => ["#D8BFD8", "#E6E6FA", "#F0E8F0"],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Natural => "natural",
            Theme::Tsundere => "tsundere",
            Theme::Yandere => "yandere",
            Theme::Kuudere => "kuudere",
            Theme::Dandere => "dandere",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("natural", Theme::Natural)]
    #[case("tsundere", Theme::Tsundere)]
    #[case("yandere", Theme::Yandere)]
    #[case("kuudere", Theme::Kuudere)]
    #[case("dandere", Theme::Dandere)]
    fn parse_loose_known_names(#[case] name: &str, #[case] expected: Theme) {
        assert_eq!(Theme::parse_loose(name), expected);
    }

    #[rstest]
    #[case("Tsundere")]
    #[case("TSUNDERE")]
    #[case("  tsundere  ")]
    fn parse_loose_is_case_and_whitespace_insensitive(#[case] name: &str) {
        assert_eq!(Theme::parse_loose(name), Theme::Tsundere);
    }

    #[rstest]
    #[case("")]
    #[case("unknown")]
    #[case("himedere")]
    #[case("NATURAL-ish")]
    fn parse_loose_unknown_falls_back_to_natural(#[case] name: &str) {
        assert_eq!(Theme::parse_loose(name), Theme::Natural);
    }

    #[test]
    fn unknown_personality_gets_natural_color_pair() {
        let fallback = Theme::parse_loose("no-such-personality").colors();
        assert_eq!(fallback, Theme::Natural.colors());
        assert_eq!(fallback.border, "#4CAF50");
    }

    #[test]
    fn every_theme_has_a_distinct_border_color() {
        let mut borders: Vec<&str> = Theme::ALL.iter().map(|t| t.colors().border).collect();
        borders.sort_unstable();
        borders.dedup();
        assert_eq!(borders.len(), Theme::ALL.len());
    }

    #[test]
    fn palette_covers_all_themes() {
        for theme in Theme::ALL {
            // colors() must never hit the unwrap_or fallback for known themes
            let colors = theme.colors();
            assert!(colors.background.starts_with("rgba("));
            assert!(colors.border.starts_with('#'));
        }
    }

    #[test]
    fn particle_palette_first_entry_matches_border() {
        for theme in Theme::ALL {
            assert_eq!(theme.particle_palette()[0], theme.colors().border);
        }
    }

    #[test]
    fn display_is_lowercase_name() {
        assert_eq!(Theme::Yandere.to_string(), "yandere");
        assert_eq!(Theme::Natural.to_string(), "natural");
    }

    #[test]
    fn serde_roundtrip_lowercase() {
        let json = serde_json::to_string(&Theme::Kuudere).unwrap();
        assert_eq!(json, "\"kuudere\"");
        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Theme::Kuudere);
    }
}
