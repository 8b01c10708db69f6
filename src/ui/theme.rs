use crate::data::settings::ColorScheme;
use crate::ui::colors::{hex_to_rgb, Rgb};
use crossterm::style::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorCapability {
    TrueColor,
    Ansi256,
    NoColor,
}

/// Terminal palette for the live scheme. Unparseable entries fall back to the default orange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemePalette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
}

const FALLBACK_RGB: Rgb = Rgb::new(255, 140, 66);

impl SchemePalette {
    pub fn from_scheme(colors: &ColorScheme) -> Self {
        let pick = |s: &str| hex_to_rgb(s).unwrap_or(FALLBACK_RGB);
        Self {
            primary: pick(&colors.primary),
            secondary: pick(&colors.secondary),
            accent: pick(&colors.accent),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub palette: SchemePalette,
    pub capability: ColorCapability,
}

impl Theme {
    pub fn new(colors: &ColorScheme, capability: ColorCapability) -> Self {
        Self {
            palette: SchemePalette::from_scheme(colors),
            capability,
        }
    }

    pub fn color_primary(&self) -> Color {
        map_color(self.capability, self.palette.primary)
    }
    pub fn color_secondary(&self) -> Color {
        map_color(self.capability, self.palette.secondary)
    }
    pub fn color_accent(&self) -> Color {
        map_color(self.capability, self.palette.accent)
    }
    pub fn color_rgb(&self, rgb: Rgb) -> Color {
        map_color(self.capability, rgb)
    }
}

pub fn detect_color_capability() -> ColorCapability {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorCapability::NoColor;
    }

    let colorterm = std::env::var("COLORTERM").unwrap_or_default().to_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorCapability::TrueColor;
    }

    let term = std::env::var("TERM").unwrap_or_default().to_lowercase();
    if term.contains("256color") {
        return ColorCapability::Ansi256;
    }

    ColorCapability::NoColor
}

pub fn map_color(cap: ColorCapability, c: Rgb) -> Color {
    match cap {
        ColorCapability::TrueColor => Color::Rgb { r: c.r, g: c.g, b: c.b },
        ColorCapability::Ansi256 => Color::AnsiValue(rgb_to_ansi256(c)),
        ColorCapability::NoColor => Color::Reset,
    }
}

fn rgb_to_ansi256(c: Rgb) -> u8 {
    // 6x6x6 color cube, 16..231
    let r6 = (c.r as u16 * 5 / 255) as u8;
    let g6 = (c.g as u16 * 5 / 255) as u8;
    let b6 = (c.b as u16 * 5 / 255) as u8;
    16 + 36 * r6 + 6 * g6 + b6
}
