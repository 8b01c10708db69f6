use crate::data::settings::ColorScheme;
use crate::render::ray_gradient::{ray_gradient, GradientCanvas};
use crate::ui::colors::{Rgb, Rgba};
use crate::ui::style::{VAR_ACCENT, VAR_PRIMARY, VAR_PRIMARY_GLOW, VAR_SECONDARY};
use crate::ui::theme::Theme;
use crossterm::queue;
use crossterm::style::{Print, ResetColor, SetForegroundColor};
use std::io::{self, Write};

const BAR_CHARS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

pub fn print_swatches<W: Write>(out: &mut W, theme: &Theme, colors: &ColorScheme) -> io::Result<()> {
    let rows = [
        (VAR_PRIMARY, &colors.primary, theme.color_primary()),
        (VAR_PRIMARY_GLOW, &colors.primary_glow, theme.color_primary()),
        (VAR_SECONDARY, &colors.secondary, theme.color_secondary()),
        (VAR_ACCENT, &colors.accent, theme.color_accent()),
    ];
    for (name, value, color) in rows {
        queue!(
            out,
            SetForegroundColor(color),
            Print("██ "),
            ResetColor,
            Print(format!("{name:<22}{value}\n"))
        )?;
    }
    out.flush()
}

/// One row of the ray gradient, `width` cells wide.
pub fn print_ray<W: Write>(
    out: &mut W,
    theme: &Theme,
    colors: &ColorScheme,
    has_sound: bool,
    width: usize,
) -> io::Result<()> {
    let gradient = ray_gradient(&mut GradientCanvas, (0.0, 0.0), (width as f64, 0.0), colors, has_sound);
    for x in 0..width {
        let t = if width > 1 { x as f64 / (width - 1) as f64 } else { 0.0 };
        let Some(c) = gradient.sample(t) else { break };
        queue!(out, SetForegroundColor(theme.color_rgb(over_black(c))), Print('█'))?;
    }
    queue!(out, ResetColor, Print('\n'))?;
    out.flush()
}

fn over_black(c: Rgba) -> Rgb {
    let a = c.a.clamp(0.0, 1.0) as f64;
    Rgb::from_f64_clamped(c.rgb.r as f64 * a, c.rgb.g as f64 * a, c.rgb.b as f64 * a)
}

/// Band levels as a single row of block characters.
pub fn level_line(levels: &[f32]) -> String {
    levels
        .iter()
        .map(|v| {
            let idx = (v.clamp(0.0, 1.0) * (BAR_CHARS.len() - 1) as f32).round() as usize;
            BAR_CHARS[idx]
        })
        .collect()
}

pub fn print_levels<W: Write>(out: &mut W, theme: &Theme, levels: &[f32]) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(theme.color_primary()),
        Print(level_line(levels)),
        ResetColor,
        Print('\n')
    )?;
    out.flush()
}
