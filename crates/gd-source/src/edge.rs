use rayon::prelude::*;

/// Magnitude Sobel maximale théorique : sqrt(2) * 1020 ≈ 1442.
const SOBEL_MAX: f32 = 1442.0;

/// Sobel gradient (gx, gy) at (x, y) of a row-major 8-bit luminance plane.
///
/// Border pixels return (0, 0).
///
/// # Example
/// ```
/// use gd_source::edge::gradient;
/// // Vertical edge: black left column, white elsewhere.
/// let lum = [0, 255, 255, 0, 255, 255, 0, 255, 255];
/// let (gx, gy) = gradient(&lum, 3, 3, 1, 1);
/// assert!(gx > 0.0);
/// assert_eq!(gy, 0.0);
/// ```
#[must_use]
pub fn gradient(lum: &[u8], width: u32, height: u32, x: u32, y: u32) -> (f32, f32) {
    if x == 0 || y == 0 || x + 1 >= width || y + 1 >= height {
        return (0.0, 0.0);
    }
    let w = width as usize;
    let at = |px: u32, py: u32| f32::from(lum[py as usize * w + px as usize]);

    let tl = at(x - 1, y - 1);
    let tc = at(x, y - 1);
    let tr = at(x + 1, y - 1);
    let ml = at(x - 1, y);
    let mr = at(x + 1, y);
    let bl = at(x - 1, y + 1);
    let bc = at(x, y + 1);
    let br = at(x + 1, y + 1);

    let gx = -tl + tr - 2.0 * ml + 2.0 * mr - bl + br;
    let gy = -tl - 2.0 * tc - tr + bl + 2.0 * bc + br;
    (gx, gy)
}

/// Normalized edge magnitude [0.0, 1.0] at (x, y).
#[must_use]
pub fn detect_edge(lum: &[u8], width: u32, height: u32, x: u32, y: u32) -> f32 {
    let (gx, gy) = gradient(lum, width, height, x, y);
    ((gx * gx + gy * gy).sqrt() / SOBEL_MAX).min(1.0)
}

/// Plan complet des contours, une valeur par pixel. Parallélisé par ligne.
#[must_use]
pub fn edge_plane(lum: &[u8], width: u32, height: u32) -> Vec<f32> {
    let mut out = vec![0.0f32; width as usize * height as usize];
    if width == 0 {
        return out;
    }
    out.par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, v) in row.iter_mut().enumerate() {
                *v = detect_edge(lum, width, height, x as u32, y as u32);
            }
        });
    out
}
