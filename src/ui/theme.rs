use std::fs;
use std::path::PathBuf;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

pub const DEFAULT_THEME: &str = "default";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    #[serde(default)]
    pub colors: ThemeColors,
}

/// Hex colours; any key left out of a theme file keeps the built-in value.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
    pub celebrate: String,
}

impl Theme {
    pub fn themes_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mathdrill").join("themes"))
    }

    /// Looks in the user themes directory; `default` is always available.
    pub fn load(name: &str) -> Option<Self> {
        if let Some(dir) = Self::themes_dir() {
            let path = dir.join(format!("{name}.toml"));
            if let Ok(content) = fs::read_to_string(&path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "invalid theme file")
                    }
                }
            }
        }

        (name == DEFAULT_THEME).then(Self::default)
    }

    pub fn available_themes() -> Vec<String> {
        let mut names = vec![DEFAULT_THEME.to_string()];
        if let Some(entries) = Self::themes_dir().and_then(|d| fs::read_dir(d).ok()) {
            let mut user: Vec<String> = entries
                .filter_map(|e| e.ok())
                .filter_map(|e| {
                    e.file_name()
                        .to_str()
                        .and_then(|f| f.strip_suffix(".toml"))
                        .map(str::to_string)
                })
                .filter(|n| n != DEFAULT_THEME)
                .collect();
            user.sort();
            names.extend(user);
        }
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: DEFAULT_THEME.to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            muted: "#6c7086".to_string(),
            accent: "#89b4fa".to_string(),
            accent_dim: "#45475a".to_string(),
            border: "#45475a".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            bar_filled: "#89b4fa".to_string(),
            bar_empty: "#313244".to_string(),
            error: "#f38ba8".to_string(),
            warning: "#f9e2af".to_string(),
            success: "#a6e3a1".to_string(),
            celebrate: "#f5c2e7".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
    pub fn celebrate(&self) -> Color { Self::parse_color(&self.celebrate) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }

    #[test]
    fn test_partial_theme_file_keeps_defaults() {
        let theme: Theme = toml::from_str(
            r##"
name = "paper"
[colors]
bg = "#ffffff"
"##,
        )
        .unwrap();
        assert_eq!(theme.colors.bg, "#ffffff");
        assert_eq!(theme.colors.success, ThemeColors::default().success);
    }

    #[test]
    fn test_default_theme_always_loads() {
        assert!(Theme::load(DEFAULT_THEME).is_some());
        assert!(Theme::available_themes().contains(&DEFAULT_THEME.to_string()));
    }
}
