use serde::{Deserialize, Serialize};

/// Couleur RGB 8 bits.
pub type Rgb = (u8, u8, u8);

/// How a layer picks its ink color.
///
/// # Example
/// ```
/// use gd_core::color::ColorPolicy;
/// let p = ColorPolicy::DarknessMapped { light: (200, 200, 200), dark: (0, 0, 0) };
/// assert_eq!(p.ink(1.0), (0, 0, 0));
/// assert_eq!(p.ink(0.0), (200, 200, 200));
/// ```
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub enum ColorPolicy {
    /// One ink for every glyph of the layer.
    Monochrome(Rgb),
    /// Ink interpolated from `light` (darkness 0) to `dark` (darkness 1).
    DarknessMapped {
        /// Ink used over light regions.
        light: Rgb,
        /// Ink used over dark regions.
        dark: Rgb,
    },
}

impl Default for ColorPolicy {
    fn default() -> Self {
        Self::Monochrome((0, 0, 0))
    }
}

impl ColorPolicy {
    /// Ink for a cell of the given darkness [0.0, 1.0].
    #[must_use]
    pub fn ink(&self, darkness: f32) -> Rgb {
        match *self {
            Self::Monochrome(c) => c,
            Self::DarknessMapped { light, dark } => {
                let t = darkness.clamp(0.0, 1.0);
                (
                    lerp_u8(light.0, dark.0, t),
                    lerp_u8(light.1, dark.1, t),
                    lerp_u8(light.2, dark.2, t),
                )
            }
        }
    }
}

/// Linear interpolation between two channel values, rounded.
///
/// # Example
/// ```
/// use gd_core::color::lerp_u8;
/// assert_eq!(lerp_u8(0, 200, 0.5), 100);
/// ```
#[inline(always)]
#[must_use]
pub fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let t = t.clamp(0.0, 1.0);
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Alpha-over d'une source RGB d'opacité `alpha` sur un pixel RGBA non prémultiplié.
///
/// Sur une destination opaque on retrouve `src·α + dst·(1−α)` par canal.
///
/// # Example
/// ```
/// use gd_core::color::blend_over;
/// let out = blend_over([255, 255, 255, 255], (0, 0, 0), 1.0);
/// assert_eq!(out, [0, 0, 0, 255]);
/// let out = blend_over([255, 255, 255, 255], (0, 0, 0), 0.0);
/// assert_eq!(out, [255, 255, 255, 255]);
/// ```
#[inline(always)]
#[must_use]
pub fn blend_over(dst: [u8; 4], src: Rgb, alpha: f32) -> [u8; 4] {
    let a_s = alpha.clamp(0.0, 1.0);
    if a_s <= 0.0 {
        return dst;
    }
    let a_d = f32::from(dst[3]) / 255.0;
    let out_a = a_s + a_d * (1.0 - a_s);
    if out_a <= f32::EPSILON {
        return [0, 0, 0, 0];
    }
    let channel = |s: u8, d: u8| -> u8 {
        ((f32::from(s) * a_s + f32::from(d) * a_d * (1.0 - a_s)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    [
        channel(src.0, dst[0]),
        channel(src.1, dst[1]),
        channel(src.2, dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Composite a full RGBA source pixel over `dst` using the source's own alpha.
#[inline(always)]
#[must_use]
pub fn composite_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    blend_over(dst, (src[0], src[1], src[2]), f32::from(src[3]) / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_over_opaque_matches_formula() {
        let out = blend_over([200, 100, 50, 255], (0, 0, 0), 0.25);
        assert_eq!(out, [150, 75, 38, 255]);
    }

    #[test]
    fn blend_over_transparent_destination_keeps_source_color() {
        let out = blend_over([0, 0, 0, 0], (10, 20, 30), 0.5);
        assert_eq!(out[..3], [10, 20, 30]);
        assert_eq!(out[3], 128);
    }

    #[test]
    fn darkness_mapped_is_monotone() {
        let p = ColorPolicy::DarknessMapped {
            light: (240, 240, 240),
            dark: (10, 10, 10),
        };
        let mut prev = 255u8;
        for i in 0..=20 {
            let (r, _, _) = p.ink(i as f32 / 20.0);
            assert!(r <= prev);
            prev = r;
        }
    }
}
