//! Palette for the board, HUD and overlays.
//!
//! [`Theme`] is the serializable form (hex strings, as written in the config
//! file). [`Palette`] is the resolved form handed to the drawers; it is built
//! once at startup.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Theme configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    /// Background color.
    #[serde(default = "default_background")]
    pub background: String,

    /// Default text color.
    #[serde(default = "default_foreground")]
    pub foreground: String,

    /// Empty board cell dots.
    #[serde(default = "default_grid")]
    pub grid: String,

    /// Snake head.
    #[serde(default = "default_snake_head")]
    pub snake_head: String,

    /// Snake body at full brightness; fades toward the tail.
    #[serde(default = "default_snake_body")]
    pub snake_body: String,

    /// Food.
    #[serde(default = "default_food")]
    pub food: String,

    /// High score text and pause banner.
    #[serde(default = "default_highlight")]
    pub highlight: String,

    /// Level indicator.
    #[serde(default = "default_level")]
    pub level: String,

    /// Lives indicator, game over banner and error text.
    #[serde(default = "default_alert")]
    pub alert: String,
}

fn default_background() -> String {
    "#000000".to_string()
}
fn default_foreground() -> String {
    "#FFFFFF".to_string()
}
fn default_grid() -> String {
    "#282828".to_string()
}
fn default_snake_head() -> String {
    "#00FF00".to_string()
}
fn default_snake_body() -> String {
    "#00FF00".to_string()
}
fn default_food() -> String {
    "#FF0000".to_string()
}
fn default_highlight() -> String {
    "#FFFF00".to_string()
}
fn default_level() -> String {
    "#0000FF".to_string()
}
fn default_alert() -> String {
    "#FF0000".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: default_background(),
            foreground: default_foreground(),
            grid: default_grid(),
            snake_head: default_snake_head(),
            snake_body: default_snake_body(),
            food: default_food(),
            highlight: default_highlight(),
            level: default_level(),
            alert: default_alert(),
        }
    }
}

impl Theme {
    /// Resolves every hex string into a terminal color.
    #[must_use]
    pub fn palette(&self) -> Palette {
        Palette {
            background: parse_color(&self.background),
            foreground: parse_color(&self.foreground),
            grid: parse_color(&self.grid),
            snake_head: parse_color(&self.snake_head),
            snake_body: parse_color(&self.snake_body),
            food: parse_color(&self.food),
            highlight: parse_color(&self.highlight),
            level: parse_color(&self.level),
            alert: parse_color(&self.alert),
        }
    }
}

/// Resolved colors used by the drawers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Background color.
    pub background: Color,
    /// Default text color.
    pub foreground: Color,
    /// Empty board cell dots.
    pub grid: Color,
    /// Snake head.
    pub snake_head: Color,
    /// Snake body at full brightness.
    pub snake_body: Color,
    /// Food.
    pub food: Color,
    /// High score text and pause banner.
    pub highlight: Color,
    /// Level indicator.
    pub level: Color,
    /// Lives indicator, game over banner and error text.
    pub alert: Color,
}

impl Palette {
    /// Color of the body segment at `index` (1 is the segment behind the head).
    ///
    /// Brightness falls by 5/255 per segment and bottoms out at 100/255.
    #[must_use]
    pub fn body_segment(&self, index: usize) -> Color {
        let falloff = index.saturating_mul(5).min(155) as u16;
        let brightness = 255u16.saturating_sub(falloff).max(100);
        scale_color(self.snake_body, brightness)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Theme::default().palette()
    }
}

/// Parses a hex color string to a ratatui Color.
fn parse_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');

    if hex.len() != 6 || !hex.is_ascii() {
        return Color::White;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

    Color::Rgb(r, g, b)
}

/// Scales an RGB color by `brightness / 255`.
fn scale_color(color: Color, brightness: u16) -> Color {
    let (r, g, b) = color_to_rgb(color);
    let scale = |c: u8| (u16::from(c) * brightness / 255) as u8;
    Color::Rgb(scale(r), scale(g), scale(b))
}

/// Extracts RGB values from a Color.
fn color_to_rgb(color: Color) -> (u8, u8, u8) {
    match color {
        Color::Rgb(r, g, b) => (r, g, b),
        _ => (255, 255, 255),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FF0000"), Color::Rgb(255, 0, 0));
        assert_eq!(parse_color("#00FF00"), Color::Rgb(0, 255, 0));
        assert_eq!(parse_color("0000FF"), Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_parse_color_invalid_falls_back_to_white() {
        assert_eq!(parse_color("#FFF"), Color::White);
        assert_eq!(parse_color("#GG0000"), Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_parse_color_non_ascii_falls_back_to_white() {
        assert_eq!(parse_color("#1é234"), Color::White);
        assert_eq!(parse_color("ééé"), Color::White);
    }

    #[test]
    fn test_non_ascii_theme_value_resolves() {
        let theme: Theme = serde_yaml_ng::from_str("food: '#1é234'").unwrap();
        assert_eq!(theme.palette().food, Color::White);
    }

    #[test]
    fn test_default_palette_matches_classic_colors() {
        let palette = Palette::default();
        assert_eq!(palette.background, Color::Rgb(0, 0, 0));
        assert_eq!(palette.snake_head, Color::Rgb(0, 255, 0));
        assert_eq!(palette.highlight, Color::Rgb(255, 255, 0));
        assert_eq!(palette.level, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn test_body_segment_fades_with_floor() {
        let palette = Palette::default();

        assert_eq!(palette.body_segment(1), Color::Rgb(0, 250, 0));
        assert_eq!(palette.body_segment(10), Color::Rgb(0, 205, 0));
        assert_eq!(palette.body_segment(31), Color::Rgb(0, 100, 0));
        assert_eq!(palette.body_segment(500), Color::Rgb(0, 100, 0));
    }

    #[test]
    fn test_theme_from_yaml_overrides_one_color() {
        let theme: Theme = serde_yaml_ng::from_str("food: '#FFA500'").unwrap();
        let palette = theme.palette();

        assert_eq!(palette.food, Color::Rgb(255, 165, 0));
        assert_eq!(palette.foreground, Color::Rgb(255, 255, 255));
    }
}
