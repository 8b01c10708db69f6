use crate::data::settings::ColorScheme;
use crate::ui::colors::{hex_to_rgb, Rgb, Rgba};

/// A gradient under construction on some drawing surface.
pub trait ColorStops {
    fn add_color_stop(&mut self, offset: f64, color: Rgba);
}

pub trait GradientSurface {
    type Gradient: ColorStops;

    fn create_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> Self::Gradient;
}

const SILENT_GRAY: Rgb = Rgb::new(100, 100, 100);

/// Builds the gradient for one visualizer ray. Colored while sound plays, flat gray otherwise.
pub fn ray_gradient<S: GradientSurface>(
    surface: &mut S,
    start: (f64, f64),
    end: (f64, f64),
    colors: &ColorScheme,
    has_sound: bool,
) -> S::Gradient {
    let mut gradient = surface.create_linear_gradient(start.0, start.1, end.0, end.1);

    if !has_sound {
        gradient.add_color_stop(0.0, SILENT_GRAY.with_alpha(0.3));
        gradient.add_color_stop(1.0, SILENT_GRAY.with_alpha(0.1));
        return gradient;
    }

    let parsed = (
        hex_to_rgb(&colors.primary),
        hex_to_rgb(&colors.accent),
        hex_to_rgb(&colors.secondary),
    );
    let (primary, accent, secondary) = match parsed {
        (Some(p), Some(a), Some(s)) => (p, a, s),
        _ => (Rgb::new(255, 140, 66), Rgb::new(255, 170, 102), Rgb::new(255, 107, 53)),
    };

    gradient.add_color_stop(0.0, primary.with_alpha(0.8));
    gradient.add_color_stop(0.5, accent.with_alpha(0.6));
    gradient.add_color_stop(1.0, secondary.with_alpha(0.2));
    gradient
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

/// In-memory gradient that records its stops and can be sampled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearGradient {
    pub start: (f64, f64),
    pub end: (f64, f64),
    stops: Vec<GradientStop>,
}

impl LinearGradient {
    #[cfg(test)]
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at `t` in 0..=1, interpolated between the surrounding stops.
    pub fn sample(&self, t: f64) -> Option<Rgba> {
        let first = self.stops.first()?;
        let last = self.stops.last()?;
        let t = t.clamp(0.0, 1.0);
        if t <= first.offset {
            return Some(first.color);
        }
        if t >= last.offset {
            return Some(last.color);
        }

        let pair = self.stops.windows(2).find(|w| t >= w[0].offset && t <= w[1].offset)?;
        let (a, b) = (pair[0], pair[1]);
        let span = b.offset - a.offset;
        let k = if span > 0.0 { (t - a.offset) / span } else { 0.0 };
        let lerp = |x: u8, y: u8| x as f64 + (y as f64 - x as f64) * k;
        Some(Rgba {
            rgb: Rgb::from_f64_clamped(
                lerp(a.color.rgb.r, b.color.rgb.r),
                lerp(a.color.rgb.g, b.color.rgb.g),
                lerp(a.color.rgb.b, b.color.rgb.b),
            ),
            a: a.color.a + (b.color.a - a.color.a) * k as f32,
        })
    }
}

impl ColorStops for LinearGradient {
    fn add_color_stop(&mut self, offset: f64, color: Rgba) {
        let offset = offset.clamp(0.0, 1.0);
        let at = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(at, GradientStop { offset, color });
    }
}

/// Surface that hands out [`LinearGradient`] recorders.
#[derive(Debug, Default, Clone, Copy)]
pub struct GradientCanvas;

impl GradientSurface for GradientCanvas {
    type Gradient = LinearGradient;

    fn create_linear_gradient(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) -> LinearGradient {
        LinearGradient {
            start: (x0, y0),
            end: (x1, y1),
            stops: Vec::new(),
        }
    }
}
