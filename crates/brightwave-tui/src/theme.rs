use brightwave_core::config::PaletteConfig;
use ratatui::style::{Color, Style};

/// Runtime palette with configurable colors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub success: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_palette(&PaletteConfig::default())
    }
}

impl Theme {
    /// Base (light) theme from config
    pub fn from_palette(palette: &PaletteConfig) -> Self {
        let defaults = PaletteConfig::default();
        let bg = color_or(&palette.background, &defaults.background);
        let fg = color_or(&palette.foreground, &defaults.foreground);
        Self::build(bg, fg, color_or(&palette.accent, &defaults.accent))
    }

    /// Dark theme used by sections that invert the page
    pub fn inverted_from(palette: &PaletteConfig) -> Self {
        let defaults = PaletteConfig::default();
        let bg = color_or(&palette.inverted_background, &defaults.inverted_background);
        let fg = color_or(&palette.inverted_foreground, &defaults.inverted_foreground);
        Self::build(bg, fg, color_or(&palette.accent, &defaults.accent))
    }

    fn build(bg: Color, fg: Color, accent: Color) -> Self {
        Self {
            bg,
            fg,
            accent,
            muted: blend(fg, bg, 0.55),
            error: Color::Rgb(0xd6, 0x3b, 0x2f),
            success: Color::Rgb(0x2f, 0x8f, 0x4e),
        }
    }

    /// Plain text on the page background
    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// `color` at `opacity` over the page background
    pub fn fade(&self, color: Color, opacity: f64) -> Color {
        blend(color, self.bg, opacity)
    }
}

fn color_or(hex: &str, fallback: &str) -> Color {
    parse_hex_color(hex).unwrap_or_else(|| {
        tracing::warn!(color = hex, "Invalid palette color, using default");
        parse_hex_color(fallback).unwrap_or(Color::Reset)
    })
}

/// Parse a hex color string into a ratatui Color
/// Accepts formats: "#RRGGBB", "RRGGBB", "#RGB", "RGB"
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Mix `fg` over `bg`; `opacity` 1 keeps `fg`, 0 gives `bg`.
/// Non-RGB colors cannot be mixed and are returned as is.
pub fn blend(fg: Color, bg: Color, opacity: f64) -> Color {
    match (fg, bg) {
        (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
            let t = opacity.clamp(0.0, 1.0);
            let mix = |f: u8, b: u8| (b as f64 + (f as f64 - b as f64) * t).round() as u8;
            Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
        }
        _ => fg,
    }
}
