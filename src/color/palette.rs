use crate::config::PaletteSettings;
use crate::foundation::core::{FlashColor, FlashKey};
use crate::foundation::math::fnv1a_str;

/// Hues (degrees) the palette cycles through: red, yellow, green, cyan, blue, magenta.
const BASE_HUES: [f64; 6] = [0.0, 60.0, 120.0, 180.0, 240.0, 300.0];

/// `(saturation, value)` variants per hue: normal, dark, light.
const VARIANTS: [(f64, f64); 3] = [(0.70, 0.60), (0.80, 0.45), (0.50, 0.75)];

/// Lowest value a color is darkened to before giving up on the contrast target.
const VALUE_FLOOR: f64 = 0.1;

/// Lowest saturation a color is washed out to while lightening.
const SATURATION_FLOOR: f64 = 0.05;

const ADJUST_STEP: f64 = 0.9;

/// WCAG relative luminance of an sRGB color.
pub fn relative_luminance(rgb: [u8; 3]) -> f64 {
    fn linear(c: u8) -> f64 {
        let c = f64::from(c) / 255.0;
        if c <= 0.039_28 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    let [r, g, b] = rgb;
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// WCAG contrast ratio between two colors, in `[1, 21]`.
pub fn contrast_ratio(a: [u8; 3], b: [u8; 3]) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// HSV (all components in `[0, 1]`) to RGB8, truncating channels.
pub(crate) fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [u8; 3] {
    let to_u8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0) as u8;
    if s <= 0.0 {
        return [to_u8(v); 3];
    }
    let h6 = h.rem_euclid(1.0) * 6.0;
    let i = h6.floor();
    let f = h6 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match (i as u8) % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    [to_u8(r), to_u8(g), to_u8(b)]
}

/// Adjust an HSV color until it reaches `min_ratio` against `background`.
///
/// Light backgrounds darken the color (value down to [`VALUE_FLOOR`]); dark backgrounds lighten
/// it (value up, saturation down to [`SATURATION_FLOOR`]). Returns the floor color when the target
/// cannot be met.
fn ensure_contrast(h: f64, s: f64, v: f64, background: [u8; 3], min_ratio: f64) -> [u8; 3] {
    let rgb = hsv_to_rgb(h, s, v);
    if contrast_ratio(rgb, background) >= min_ratio {
        return rgb;
    }

    let darken = relative_luminance(background) >= relative_luminance(rgb);
    let (mut s, mut v) = (s, v);
    if darken {
        while v > VALUE_FLOOR {
            v *= ADJUST_STEP;
            let candidate = hsv_to_rgb(h, s, v);
            if contrast_ratio(candidate, background) >= min_ratio {
                return candidate;
            }
        }
        hsv_to_rgb(h, s, VALUE_FLOOR)
    } else {
        while s > SATURATION_FLOOR {
            v = 1.0 - (1.0 - v) * ADJUST_STEP;
            s *= ADJUST_STEP;
            let candidate = hsv_to_rgb(h, s, v);
            if contrast_ratio(candidate, background) >= min_ratio {
                return candidate;
            }
        }
        hsv_to_rgb(h, 0.0, 1.0)
    }
}

/// Fixed, contrast-validated colors indexed by a stable hash of the flash key.
#[derive(Clone, Debug, PartialEq)]
pub struct FlashPalette {
    colors: Vec<FlashColor>,
}

impl FlashPalette {
    /// Generate the 18-color palette (6 hues x 3 variants) for the given background.
    pub fn generate(settings: &PaletteSettings) -> Self {
        let mut colors = Vec::with_capacity(BASE_HUES.len() * VARIANTS.len());
        for hue in BASE_HUES {
            for (s, v) in VARIANTS {
                let rgb = ensure_contrast(
                    hue / 360.0,
                    s,
                    v,
                    settings.background,
                    settings.min_contrast,
                );
                colors.push(FlashColor::from(rgb));
            }
        }
        Self { colors }
    }

    /// All palette entries, opaque.
    pub fn colors(&self) -> &[FlashColor] {
        &self.colors
    }

    /// Palette entry for `key`.
    ///
    /// With `by_parent_scope`, only the text before the first `::` is hashed, so every entity
    /// under one parent scope shares a color.
    pub fn color_for(&self, key: &FlashKey, by_parent_scope: bool) -> FlashColor {
        let hashed = if by_parent_scope {
            key.parent_scope()
        } else {
            key.as_str()
        };
        let idx = (fnv1a_str(hashed) % self.colors.len() as u64) as usize;
        self.colors[idx]
    }
}

impl Default for FlashPalette {
    fn default() -> Self {
        Self::generate(&PaletteSettings::default())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/palette.rs"]
mod tests;
