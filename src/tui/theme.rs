use ratatui::style::Color;

use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub accent: Color,
    pub dim: Color,
    pub selection_bg: Color,
    /// Title color of completed tasks
    pub done: Color,
    /// Confirm-close banner
    pub banner: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x1B, 0x1D, 0x24),
            text: Color::Rgb(0xE6, 0xE1, 0xD6),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            accent: Color::Rgb(0xF2, 0x8C, 0x45),
            dim: Color::Rgb(0x7A, 0x7F, 0x8C),
            selection_bg: Color::Rgb(0x3A, 0x30, 0x2A),
            done: Color::Rgb(0xB0, 0x7A, 0x55),
            banner: Color::Rgb(0xFF, 0xD7, 0x00),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Mix `fg` toward `bg`; alpha 1.0 keeps `fg`. Non-RGB colors pass through.
fn blend(fg: Color, bg: Color, alpha: f64) -> Color {
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
            let mix = |f: u8, b: u8| (b as f64 + (f as f64 - b as f64) * alpha).round() as u8;
            Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
        }
        _ => fg,
    }
}

impl Theme {
    /// Create a theme from UI config: color overrides, then opacity
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "accent" => theme.accent = color,
                    "dim" => theme.dim = color,
                    "selection_bg" => theme.selection_bg = color,
                    "done" => theme.done = color,
                    "banner" => theme.banner = color,
                    _ => {}
                }
            }
        }

        theme.with_opacity(ui.effective_opacity())
    }

    /// Fade every foreground color into the background. A terminal can't
    /// make its window translucent, so this is how opacity shows.
    pub fn with_opacity(mut self, alpha: f64) -> Self {
        let bg = self.background;
        for color in [
            &mut self.text,
            &mut self.text_bright,
            &mut self.accent,
            &mut self.dim,
            &mut self.done,
            &mut self.banner,
        ] {
            *color = blend(*color, bg, alpha);
        }
        self.selection_bg = blend(self.selection_bg, bg, alpha);
        self
    }
}
