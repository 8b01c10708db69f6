use crate::data::settings::ColorScheme;
use std::fmt;

/// Glow used when the primary color cannot be parsed.
pub const FALLBACK_GLOW: &str = "rgba(255, 140, 66, 0.6)";

const GLOW_ALPHA: f32 = 0.6;
const SECONDARY_DELTA: i32 = -10;
const ACCENT_DELTA: i32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Rounds and clamps float channels into 0..=255.
    pub fn from_f64_clamped(r: f64, g: f64, b: f64) -> Self {
        let ch = |v: f64| {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, 255.0) as u8
            }
        };
        Self::new(ch(r), ch(g), ch(b))
    }

    pub fn with_alpha(self, a: f32) -> Rgba {
        Rgba { rgb: self, a }
    }
}

/// HSL with hue in degrees and saturation/lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub a: f32,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.rgb.r, self.rgb.g, self.rgb.b, self.a)
    }
}

/// Parses `#rrggbb` or `rrggbb`, case-insensitive. Shorthand and alpha forms are rejected.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Rgb::new(r, g, b))
}

pub fn rgb_to_hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
}

pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s)
    };

    Hsl {
        h: ((h * 360.0).round() as u16) % 360,
        s: (s * 100.0).round() as u8,
        l: (l * 100.0).round() as u8,
    }
}

/// Out-of-range input is normalized: hue wraps at 360, saturation and lightness clamp to 100.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let h = (hsl.h % 360) as f64 / 360.0;
    let s = hsl.s.min(100) as f64 / 100.0;
    let l = hsl.l.min(100) as f64 / 100.0;

    if s == 0.0 {
        let v = l * 255.0;
        return Rgb::from_f64_clamped(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb::from_f64_clamped(
        hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0,
        hue_to_channel(p, q, h) * 255.0,
        hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0,
    )
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Shifts HSL lightness by `percent` points. Unparseable input comes back unchanged.
pub fn adjust_lightness(hex: &str, percent: i32) -> String {
    let Some(rgb) = hex_to_rgb(hex) else {
        return hex.to_string();
    };
    let mut hsl = rgb_to_hsl(rgb);
    hsl.l = (hsl.l as i32 + percent).clamp(0, 100) as u8;
    rgb_to_hex(hsl_to_rgb(hsl))
}

/// Derives the full scheme from one seed color. `primary` is kept verbatim.
pub fn generate_color_scheme(primary_hex: &str) -> ColorScheme {
    let primary_glow = match hex_to_rgb(primary_hex) {
        Some(rgb) => rgb.with_alpha(GLOW_ALPHA).to_string(),
        None => {
            log::debug!("primary color {primary_hex:?} is not #rrggbb; using fallback glow");
            FALLBACK_GLOW.to_string()
        }
    };

    ColorScheme {
        primary: primary_hex.to_string(),
        primary_glow,
        secondary: adjust_lightness(primary_hex, SECONDARY_DELTA),
        accent: adjust_lightness(primary_hex, ACCENT_DELTA),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lightness(hex: &str) -> u8 {
        rgb_to_hsl(hex_to_rgb(hex).unwrap()).l
    }

    fn is_hex6(s: &str) -> bool {
        s.len() == 7
            && s.starts_with('#')
            && s[1..].bytes().all(|c| c.is_ascii_digit() || (b'a'..=b'f').contains(&c))
    }

    #[test]
    fn test_hex_to_rgb_accepts_optional_hash_and_any_case() {
        assert_eq!(hex_to_rgb("#ff8c42"), Some(Rgb::new(255, 140, 66)));
        assert_eq!(hex_to_rgb("FF8C42"), Some(Rgb::new(255, 140, 66)));
        assert_eq!(hex_to_rgb("#000000"), Some(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn test_hex_to_rgb_rejects_other_shapes() {
        for bad in ["", "#", "#fff", "#ff8c4", "#ff8c42ff", "##ff8c42", "#gg8c42", "#+f8c42", "ff 8c42", "#ff8c42 "] {
            assert_eq!(hex_to_rgb(bad), None, "{bad:?}");
        }
    }

    #[test]
    fn test_rgb_to_hex_is_lowercase_and_padded() {
        assert_eq!(rgb_to_hex(Rgb::new(255, 140, 66)), "#ff8c42");
        assert_eq!(rgb_to_hex(Rgb::new(0, 5, 10)), "#00050a");
    }

    #[test]
    fn test_hex_round_trip_exhaustive() {
        for v in 0..=0xff_ffffu32 {
            let rgb = Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8);
            assert_eq!(hex_to_rgb(&rgb_to_hex(rgb)), Some(rgb));
        }
    }

    #[test]
    fn test_hex_round_trip_ignores_case() {
        for v in (0..=0xff_ffffu32).step_by(997) {
            let hex = rgb_to_hex(Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8));
            assert_eq!(hex_to_rgb(&hex.to_uppercase()).map(rgb_to_hex), Some(hex));
        }
    }

    #[test]
    fn test_rgb_to_hsl_known_values() {
        assert_eq!(rgb_to_hsl(Rgb::new(255, 0, 0)), Hsl { h: 0, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(Rgb::new(0, 255, 0)), Hsl { h: 120, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(Rgb::new(0, 0, 255)), Hsl { h: 240, s: 100, l: 50 });
        assert_eq!(rgb_to_hsl(Rgb::new(255, 140, 66)), Hsl { h: 23, s: 100, l: 63 });
    }

    #[test]
    fn test_rgb_to_hsl_achromatic() {
        assert_eq!(rgb_to_hsl(Rgb::new(128, 128, 128)), Hsl { h: 0, s: 0, l: 50 });
        assert_eq!(rgb_to_hsl(Rgb::new(255, 255, 255)), Hsl { h: 0, s: 0, l: 100 });
    }

    #[test]
    fn test_rgb_to_hsl_hue_stays_below_360() {
        // Hue just under 360 would round up to 360.
        let hsl = rgb_to_hsl(Rgb::new(255, 0, 1));
        assert!(hsl.h < 360);
    }

    fn within_one(a: Hsl, b: Hsl) -> bool {
        let dh = (a.h as i32 - b.h as i32).rem_euclid(360);
        dh.min(360 - dh) <= 1 && (a.s as i32 - b.s as i32).abs() <= 1 && (a.l as i32 - b.l as i32).abs() <= 1
    }

    // Hue and saturation are only stable away from grey and the black/white ends.
    #[test]
    fn test_hsl_round_trip_within_one_unit() {
        for h in (0..360).step_by(3) {
            for s in 50..=100 {
                for l in 20..=80 {
                    let hsl = Hsl { h, s, l };
                    let back = rgb_to_hsl(hsl_to_rgb(hsl));
                    assert!(within_one(hsl, back), "{hsl:?} came back as {back:?}");
                }
            }
        }
    }

    #[test]
    fn test_rgb_through_hsl_within_one_unit() {
        for v in (0..=0xff_ffffu32).step_by(997) {
            let hsl = rgb_to_hsl(Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8));
            if hsl.s < 50 || !(20..=80).contains(&hsl.l) {
                continue;
            }
            let back = rgb_to_hsl(hsl_to_rgb(hsl));
            assert!(within_one(hsl, back), "{hsl:?} came back as {back:?}");
        }
    }

    #[test]
    fn test_hsl_to_rgb_normalizes_out_of_range() {
        assert_eq!(hsl_to_rgb(Hsl { h: 480, s: 100, l: 50 }), hsl_to_rgb(Hsl { h: 120, s: 100, l: 50 }));
        assert_eq!(hsl_to_rgb(Hsl { h: 0, s: 0, l: 250 }), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_from_f64_clamped() {
        assert_eq!(Rgb::from_f64_clamped(-3.0, 300.0, 127.5), Rgb::new(0, 255, 128));
        assert_eq!(Rgb::from_f64_clamped(f64::NAN, 1.4, 1.6), Rgb::new(0, 1, 2));
    }

    #[test]
    fn test_adjust_lightness_returns_valid_hex() {
        for hex in ["#ff8c42", "#000000", "#FFFFFF", "123456"] {
            for p in [-100, -50, -10, 0, 15, 50, 100] {
                let out = adjust_lightness(hex, p);
                assert!(is_hex6(&out), "{hex} {p} -> {out}");
            }
        }
    }

    #[test]
    fn test_adjust_lightness_extremes() {
        assert_eq!(adjust_lightness("#ff8c42", -100), "#000000");
        assert_eq!(adjust_lightness("#ff8c42", 100), "#ffffff");
    }

    #[test]
    fn test_adjust_lightness_invalid_passthrough() {
        assert_eq!(adjust_lightness("not-a-color", 10), "not-a-color");
    }

    #[test]
    fn test_generate_color_scheme() {
        let scheme = generate_color_scheme("#ff8c42");
        assert_eq!(scheme.primary, "#ff8c42");
        assert_eq!(scheme.primary_glow, "rgba(255, 140, 66, 0.6)");
        assert_eq!(scheme.secondary, "#ff6b0f");
        assert_eq!(scheme.accent, "#ffba8f");
        assert!(lightness(&scheme.secondary) < lightness("#ff8c42"));
        assert!(lightness(&scheme.accent) > lightness("#ff8c42"));
    }

    #[test]
    fn test_generate_color_scheme_keeps_primary_verbatim() {
        let scheme = generate_color_scheme("FF8C42");
        assert_eq!(scheme.primary, "FF8C42");
        assert_eq!(scheme.primary_glow, "rgba(255, 140, 66, 0.6)");
    }

    #[test]
    fn test_generate_color_scheme_invalid() {
        let scheme = generate_color_scheme("zzzzzz");
        assert_eq!(scheme.primary, "zzzzzz");
        assert_eq!(scheme.primary_glow, FALLBACK_GLOW);
        assert_eq!(scheme.secondary, "zzzzzz");
        assert_eq!(scheme.accent, "zzzzzz");
    }

    #[test]
    fn test_rgba_display() {
        assert_eq!(Rgb::new(1, 2, 3).with_alpha(0.25).to_string(), "rgba(1, 2, 3, 0.25)");
        assert_eq!(Rgb::new(1, 2, 3).with_alpha(1.0).to_string(), "rgba(1, 2, 3, 1)");
    }
}
