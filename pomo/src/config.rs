use anyhow::{Context, Result};
use directories::ProjectDirs;
use ratatui::style::Color;
use serde::Deserialize;
use std::fs;

/// User configuration, read once at startup from `pomo.toml` in the
/// platform config dir. Everything has a default; the file is optional.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub theme: Theme,
    pub icons: Icons,
    pub alerts: Alerts,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    #[serde(deserialize_with = "hex_to_color")]
    pub background: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub foreground: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub selection: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub black: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub red: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub green: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub yellow: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub blue: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub magenta: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub cyan: Color,
    #[serde(deserialize_with = "hex_to_color")]
    pub gray: Color,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Icons {
    pub play: String,
    pub pause: String,
    pub stop: String,
    pub select: String,
    pub pending: String,
    pub done: String,
    pub cycle_filled: String,
    pub cycle_empty: String,
    pub input_cursor: String,
    pub separator: String,
    pub header_left: String,
    pub header_right: String,
}

/// Which alerts fire when a session changes.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Alerts {
    pub notifications: bool,
    pub sound: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(24, 20, 18),
            foreground: Color::Rgb(214, 203, 189),
            selection: Color::Rgb(235, 188, 132),
            black: Color::Rgb(16, 13, 12),
            red: Color::Rgb(220, 87, 75),
            green: Color::Rgb(142, 163, 112),
            yellow: Color::Rgb(216, 166, 87),
            blue: Color::Rgb(109, 158, 191),
            magenta: Color::Rgb(176, 128, 163),
            cyan: Color::Rgb(115, 170, 158),
            gray: Color::Rgb(146, 140, 132),
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            play: "▶".to_string(),
            pause: "⏸".to_string(),
            stop: "■".to_string(),
            select: "▸".to_string(),
            pending: "☐".to_string(),
            done: "☑".to_string(),
            cycle_filled: "●".to_string(),
            cycle_empty: "○".to_string(),
            input_cursor: "▊".to_string(),
            separator: "│".to_string(),
            header_left: "⟪ ".to_string(),
            header_right: " ⟫".to_string(),
        }
    }
}

impl Default for Alerts {
    fn default() -> Self {
        Self {
            notifications: true,
            sound: true,
        }
    }
}

fn hex_to_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    if !s.starts_with('#') || s.len() != 7 {
        return Err(serde::de::Error::custom("invalid hex color format"));
    }
    let r = u8::from_str_radix(&s[1..3], 16).map_err(serde::de::Error::custom)?;
    let g = u8::from_str_radix(&s[3..5], 16).map_err(serde::de::Error::custom)?;
    let b = u8::from_str_radix(&s[5..7], 16).map_err(serde::de::Error::custom)?;
    Ok(Color::Rgb(r, g, b))
}

pub fn load_config() -> Result<Config> {
    match ProjectDirs::from("com", "pomo", "pomo") {
        Some(proj_dirs) => {
            let path = proj_dirs.config_dir().join("pomo.toml");
            if path.exists() {
                let config_str = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file at {:?}", path))?;
                toml::from_str(&config_str)
                    .with_context(|| format!("Failed to parse config file at {:?}", path))
            } else {
                Ok(Config::default())
            }
        }
        None => Ok(Config::default()),
    }
}
