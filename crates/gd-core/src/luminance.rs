use crate::error::CoreError;

/// Mean values over one sampled block of the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionSample {
    /// Mean luminance, 0 = noir, 1 = blanc.
    pub luminance: f32,
    /// Mean Sobel edge magnitude [0.0, 1.0].
    pub edge: f32,
}

impl RegionSample {
    /// `1 - luminance`: what the planner actually biases on.
    #[inline(always)]
    #[must_use]
    pub fn darkness(&self) -> f32 {
        1.0 - self.luminance
    }
}

/// Carte de luminance et de contours alignée sur l'image redimensionnée.
///
/// Immuable une fois construite. Les moyennes de blocs sont servies en O(1)
/// par des tables de sommes cumulées, donc n'importe quelle grille de couche
/// (pas de 10 px comme de 70 px) lit la même carte.
///
/// # Example
/// ```
/// use gd_core::luminance::LuminanceMap;
/// let map = LuminanceMap::uniform(40, 30, 0.25);
/// let s = map.region_mean(0, 0, 10);
/// assert!((s.darkness() - 0.75).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct LuminanceMap {
    width: u32,
    height: u32,
    edge: Vec<f32>,
    lum_sum: Vec<f64>,
    edge_sum: Vec<f64>,
}

impl LuminanceMap {
    /// Build a map from per-pixel planes (row-major, `width * height` values each).
    ///
    /// # Errors
    /// `InvalidDimensions` for an empty map, `Config` if a plane has the wrong length.
    pub fn from_planes(
        width: u32,
        height: u32,
        luminance: Vec<f32>,
        edge: Vec<f32>,
    ) -> Result<Self, CoreError> {
        if width == 0 || height == 0 {
            return Err(CoreError::InvalidDimensions { width, height });
        }
        let n = width as usize * height as usize;
        if luminance.len() != n || edge.len() != n {
            return Err(CoreError::config(format!(
                "plans de luminance incohérents : {} / {} valeurs pour {width}×{height}",
                luminance.len(),
                edge.len()
            )));
        }
        let lum_sum = integral(width, height, &luminance);
        let edge_sum = integral(width, height, &edge);
        Ok(Self {
            width,
            height,
            edge,
            lum_sum,
            edge_sum,
        })
    }

    /// A flat map with no edges. Zero dimensions are bumped to 1.
    #[must_use]
    pub fn uniform(width: u32, height: u32, luminance: f32) -> Self {
        let (w, h) = (width.max(1), height.max(1));
        let n = w as usize * h as usize;
        let lum = vec![luminance.clamp(0.0, 1.0); n];
        let lum_sum = integral(w, h, &lum);
        let edge = vec![0.0; n];
        let edge_sum = integral(w, h, &edge);
        Self {
            width: w,
            height: h,
            edge,
            lum_sum,
            edge_sum,
        }
    }

    /// Width in pixels (same as the resized image).
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels (same as the resized image).
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Edge magnitude of one pixel.
    #[inline(always)]
    #[must_use]
    pub fn edge_at(&self, x: u32, y: u32) -> f32 {
        self.edge[y as usize * self.width as usize + x as usize]
    }

    /// Moyenne sur le bloc `step × step` de coin (x, y), tronqué aux bords.
    ///
    /// Un bloc vide (entièrement hors carte) vaut du blanc sans contour.
    #[must_use]
    pub fn region_mean(&self, x: u32, y: u32, step: u32) -> RegionSample {
        let x2 = x.saturating_add(step).min(self.width);
        let y2 = y.saturating_add(step).min(self.height);
        if x >= x2 || y >= y2 {
            return RegionSample {
                luminance: 1.0,
                edge: 0.0,
            };
        }
        let area = f64::from(x2 - x) * f64::from(y2 - y);
        let lum = self.block_sum(&self.lum_sum, x, y, x2, y2) / area;
        let edge = self.block_sum(&self.edge_sum, x, y, x2, y2) / area;
        RegionSample {
            luminance: (lum as f32).clamp(0.0, 1.0),
            edge: (edge as f32).clamp(0.0, 1.0),
        }
    }

    fn block_sum(&self, table: &[f64], x1: u32, y1: u32, x2: u32, y2: u32) -> f64 {
        let stride = self.width as usize + 1;
        let at = |x: u32, y: u32| table[y as usize * stride + x as usize];
        at(x2, y2) - at(x1, y2) - at(x2, y1) + at(x1, y1)
    }
}

/// Summed-area table with a zero row/column in front.
fn integral(width: u32, height: u32, plane: &[f32]) -> Vec<f64> {
    let stride = width as usize + 1;
    let mut table = vec![0.0f64; stride * (height as usize + 1)];
    for y in 0..height as usize {
        let mut row = 0.0f64;
        for x in 0..width as usize {
            row += f64::from(plane[y * width as usize + x]);
            table[(y + 1) * stride + x + 1] = table[y * stride + x + 1] + row;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_map() -> LuminanceMap {
        // Left half black, right half white.
        let (w, h) = (8u32, 4u32);
        let lum: Vec<f32> = (0..h)
            .flat_map(|_| (0..w).map(|x| if x < 4 { 0.0 } else { 1.0 }))
            .collect();
        LuminanceMap::from_planes(w, h, lum, vec![0.0; 32]).unwrap()
    }

    #[test]
    fn region_mean_matches_halves() {
        let map = gradient_map();
        assert!((map.region_mean(0, 0, 4).luminance - 0.0).abs() < 1e-6);
        assert!((map.region_mean(4, 0, 4).luminance - 1.0).abs() < 1e-6);
        assert!((map.region_mean(2, 0, 4).luminance - 0.5).abs() < 1e-6);
    }

    #[test]
    fn region_mean_clamps_to_bounds() {
        let map = gradient_map();
        // Block runs past the right edge: only columns 6..8 count.
        assert!((map.region_mean(6, 2, 10).luminance - 1.0).abs() < 1e-6);
        // Fully outside: white.
        assert_eq!(map.region_mean(8, 0, 4).luminance, 1.0);
    }

    #[test]
    fn wrong_plane_length_is_rejected() {
        assert!(matches!(
            LuminanceMap::from_planes(2, 2, vec![0.0; 3], vec![0.0; 4]),
            Err(CoreError::Config(_))
        ));
        assert!(matches!(
            LuminanceMap::from_planes(0, 2, vec![], vec![]),
            Err(CoreError::InvalidDimensions { .. })
        ));
    }
}
