use gd_core::color::lerp_u8;
use gd_core::frame::FrameBuffer;
use rayon::prelude::*;

/// Below this radius a blur is invisible and skipped.
pub const MIN_BLUR: f32 = 0.1;

/// Noyau gaussien normalisé, demi-largeur ceil(3σ).
fn kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut k: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i * i) as f32 / denom).exp())
        .collect();
    let sum: f32 = k.iter().sum();
    for w in &mut k {
        *w /= sum;
    }
    k
}

/// Flou gaussien séparable en alpha prémultiplié.
///
/// Le prémultiplié évite les franges sombres autour des glyphes d'un calque
/// transparent. Bords étendus. Lignes puis colonnes, chaque passe
/// parallélisée par ligne de sortie.
///
/// # Example
/// ```
/// use gd_core::frame::FrameBuffer;
/// use gd_render::effects::gaussian_blur;
///
/// let flat = FrameBuffer::filled(8, 8, (40, 80, 120));
/// assert_eq!(gaussian_blur(&flat, 1.5), flat);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn gaussian_blur(src: &FrameBuffer, sigma: f32) -> FrameBuffer {
    if !sigma.is_finite() || sigma < MIN_BLUR || src.width == 0 || src.height == 0 {
        return src.clone();
    }
    let k = kernel(sigma);
    let radius = (k.len() / 2) as i64;
    let w = src.width as usize;
    let h = src.height as usize;

    let premul: Vec<[f32; 4]> = src
        .data
        .chunks_exact(4)
        .map(|px| {
            let a = f32::from(px[3]) / 255.0;
            [
                f32::from(px[0]) * a,
                f32::from(px[1]) * a,
                f32::from(px[2]) * a,
                f32::from(px[3]),
            ]
        })
        .collect();

    let mut horizontal = vec![[0.0f32; 4]; w * h];
    horizontal
        .par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| {
            let line = &premul[y * w..(y + 1) * w];
            for (x, out) in row.iter_mut().enumerate() {
                let mut acc = [0.0f32; 4];
                for (i, weight) in k.iter().enumerate() {
                    let sx = (x as i64 + i as i64 - radius).clamp(0, w as i64 - 1) as usize;
                    for (sum, v) in acc.iter_mut().zip(line[sx]) {
                        *sum += v * weight;
                    }
                }
                *out = acc;
            }
        });

    let mut out = FrameBuffer::new(src.width, src.height);
    out.data
        .par_chunks_mut(w * 4)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (i, weight) in k.iter().enumerate() {
                    let sy = (y as i64 + i as i64 - radius).clamp(0, h as i64 - 1) as usize;
                    for (sum, v) in acc.iter_mut().zip(horizontal[sy * w + x]) {
                        *sum += v * weight;
                    }
                }
                let a = acc[3].clamp(0.0, 255.0);
                let px = &mut row[x * 4..x * 4 + 4];
                if a <= f32::EPSILON {
                    px.copy_from_slice(&[0, 0, 0, 0]);
                    continue;
                }
                let unmul = 255.0 / a;
                for (channel, v) in px.iter_mut().zip(&acc[..3]) {
                    *channel = (v * unmul).round().clamp(0.0, 255.0) as u8;
                }
                px[3] = a.round() as u8;
            }
        });
    out
}

/// Mélange linéaire RGBA de `a` vers `b` (`t` = 0 → `a`, 1 → `b`).
///
/// Les deux frames doivent avoir la même taille.
pub(crate) fn blend_frames(a: &FrameBuffer, b: &FrameBuffer, t: f32) -> FrameBuffer {
    let t = t.clamp(0.0, 1.0);
    if t <= 0.0 {
        return a.clone();
    }
    if t >= 1.0 {
        return b.clone();
    }
    let data = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(&x, &y)| lerp_u8(x, y, t))
        .collect();
    FrameBuffer {
        data,
        width: a.width,
        height: a.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = kernel(1.2);
        assert_eq!(k.len(), 9);
        assert!((k.iter().sum::<f32>() - 1.0).abs() < 1e-5);
        assert!((k[0] - k[8]).abs() < 1e-7);
        assert!(k[4] > k[3]);
    }

    #[test]
    fn tiny_radius_is_a_no_op() {
        let mut fb = FrameBuffer::filled(4, 4, (255, 255, 255));
        fb.set_pixel(1, 1, [0, 0, 0, 255]);
        assert_eq!(gaussian_blur(&fb, 0.05), fb);
    }

    #[test]
    fn blur_spreads_a_dot() {
        let mut fb = FrameBuffer::filled(9, 9, (255, 255, 255));
        fb.set_pixel(4, 4, [0, 0, 0, 255]);
        let out = gaussian_blur(&fb, 1.0);
        let (centre, ..) = out.pixel(4, 4);
        let (near, ..) = out.pixel(5, 4);
        let (far, ..) = out.pixel(0, 0);
        assert!(centre > 0 && centre < near && near < 255);
        assert_eq!(far, 255);
    }

    #[test]
    fn transparent_overlay_keeps_its_ink_color() {
        // Ink on a transparent layer keeps its colour, no dark fringe.
        let mut fb = FrameBuffer::new(9, 9);
        fb.set_pixel(4, 4, [10, 20, 30, 255]);
        let out = gaussian_blur(&fb, 1.0);
        let (r, g, b, a) = out.pixel(5, 4);
        assert!(a > 0 && a < 255);
        assert_eq!((r, g, b), (10, 20, 30));
        assert_eq!(out.pixel(0, 0), (0, 0, 0, 0));
    }

    #[test]
    fn blend_endpoints_are_exact() {
        let a = FrameBuffer::filled(3, 2, (10, 20, 30));
        let b = FrameBuffer::filled(3, 2, (200, 100, 0));
        assert_eq!(blend_frames(&a, &b, 0.0), a);
        assert_eq!(blend_frames(&a, &b, 1.0), b);
        let mid = FrameBuffer::filled(1, 1, (0, 0, 0));
        let end = FrameBuffer::filled(1, 1, (200, 200, 200));
        assert_eq!(blend_frames(&mid, &end, 0.5).pixel(0, 0), (100, 100, 100, 255));
    }
}
