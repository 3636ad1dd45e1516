//! Theme loading: btop-style `theme[key]="value"` files mapped to quiz colours.

use ratatui::style::Color;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Colours for the quiz screens, loaded from a theme file or One Dark defaults.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Screen background.
    pub bg: Color,
    /// Borders and dividers.
    pub div_line: Color,
    /// Body text.
    pub main_fg: Color,
    /// Titles and the timer.
    pub title: Color,
    /// Tray block accent.
    pub block: Color,
    /// Placed (unavailable) blocks.
    pub used: Color,
    /// Drop target under the cursor while dragging.
    pub highlight: Color,
    /// Zone judged correct on the results screen.
    pub correct: Color,
    /// Zone judged incorrect on the results screen.
    pub incorrect: Color,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid hex: {0}")]
    InvalidHex(String),
}

impl Default for Theme {
    fn default() -> Self {
        Self::onedark_default()
    }
}

impl Theme {
    /// Hardcoded One Dark defaults (hex values from onedark.theme).
    pub fn onedark_default() -> Self {
        Self {
            bg: hex("#282C34"),
            div_line: hex("#3F444F"),
            main_fg: hex("#ABB2BF"),
            title: hex("#E5C07B"),
            block: hex("#61AFEF"),
            used: hex("#5C6370"),
            highlight: hex("#56B6C2"),
            correct: hex("#98C379"),
            incorrect: hex("#E06C75"),
        }
    }

    /// Load a btop-style file: `theme[key]="value"`. Falls back to One Dark
    /// defaults when the path is unset or missing; `palette` then overrides
    /// the judgement colours.
    pub fn load(path: Option<&Path>, palette: Palette) -> Result<Self, ThemeError> {
        let mut theme = match path {
            Some(p) if p.exists() => Self::from_map(&parse_theme_file(&std::fs::read_to_string(p)?)),
            _ => Self::onedark_default(),
        };
        theme.apply_palette(palette);
        Ok(theme)
    }

    /// Override correct/incorrect/highlight for high-contrast or colorblind use.
    pub fn apply_palette(&mut self, palette: Palette) {
        match palette {
            Palette::Normal => {}
            Palette::HighContrast => {
                self.correct = hex("#00FF00");
                self.incorrect = hex("#FF0000");
                self.highlight = hex("#FFFF00");
                self.block = hex("#00FFFF");
                self.main_fg = Color::White;
            }
            Palette::Colorblind => {
                // Avoid red/green alone: blue for correct, orange for wrong.
                self.correct = hex("#0077BB");
                self.incorrect = hex("#EE7733");
                self.highlight = hex("#BBBB00");
            }
        }
    }

    fn from_map(map: &HashMap<String, String>) -> Self {
        let defaults = Self::onedark_default();
        let get = |key: &str, fallback: Color| {
            map.get(key)
                .and_then(|v| parse_hex(v).ok())
                .unwrap_or(fallback)
        };
        // Keys follow btop theme naming so existing theme files drop in.
        Self {
            bg: get("main_bg", defaults.bg),
            div_line: get("div_line", defaults.div_line),
            main_fg: get("main_fg", defaults.main_fg),
            title: get("title", defaults.title),
            block: get("cpu_box", defaults.block),
            used: get("inactive_fg", defaults.used),
            highlight: get("hi_fg", defaults.highlight),
            correct: get("mem_box", defaults.correct),
            incorrect: get("cpu_end", defaults.incorrect),
        }
    }
}

/// CLI-selectable colour variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

/// Unwrap for known-good literals.
fn hex(s: &str) -> Color {
    parse_hex(s).expect("valid hex literal")
}

/// Parse btop-style theme file into a key -> value map.
fn parse_theme_file(s: &str) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some(stripped) = line.strip_prefix("theme[") else {
            continue;
        };
        let Some(end) = stripped.find(']') else {
            continue;
        };
        let key = stripped[..end].trim();
        let rest = stripped[end + 1..].trim();
        if let Some(eq) = rest.find('=') {
            let value = rest[eq + 1..]
                .trim()
                .trim_matches('"')
                .trim_matches('\'')
                .to_string();
            if !value.is_empty() {
                map.insert(key.to_string(), value);
            }
        }
    }
    map
}

/// Parse "#RRGGBB" or "#RGB" into a ratatui Color.
pub fn parse_hex(s: &str) -> Result<Color, ThemeError> {
    let raw = s.trim().trim_start_matches('#');
    let channel = |range: &str, wide: bool| -> Result<u8, ThemeError> {
        let v = u8::from_str_radix(range, 16).map_err(|_| ThemeError::InvalidHex(s.to_string()))?;
        Ok(if wide { v } else { v * 17 })
    };
    match raw.len() {
        6 => Ok(Color::Rgb(
            channel(&raw[0..2], true)?,
            channel(&raw[2..4], true)?,
            channel(&raw[4..6], true)?,
        )),
        3 => Ok(Color::Rgb(
            channel(&raw[0..1], false)?,
            channel(&raw[1..2], false)?,
            channel(&raw[2..3], false)?,
        )),
        _ => Err(ThemeError::InvalidHex(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_6() {
        let c = parse_hex("#98C379").unwrap();
        assert!(matches!(c, Color::Rgb(0x98, 0xC3, 0x79)));
    }

    #[test]
    fn test_parse_hex_3() {
        let c = parse_hex("#FFF").unwrap();
        assert!(matches!(c, Color::Rgb(255, 255, 255)));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert!(parse_hex("#12345").is_err());
        assert!(parse_hex("zzz").is_err());
    }

    #[test]
    fn test_theme_map_override() {
        let map = parse_theme_file(r##"theme[mem_box]="#112233""##);
        let t = Theme::from_map(&map);
        assert!(matches!(t.correct, Color::Rgb(0x11, 0x22, 0x33)));
        // Untouched keys keep defaults.
        assert!(matches!(t.incorrect, Color::Rgb(0xE0, 0x6C, 0x75)));
    }

    #[test]
    fn test_colorblind_palette_overrides_judgement() {
        let mut t = Theme::onedark_default();
        t.apply_palette(Palette::Colorblind);
        assert!(matches!(t.correct, Color::Rgb(0x00, 0x77, 0xBB)));
    }
}
