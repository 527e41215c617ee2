use gd_core::frame::GlyphBitmap;

/// Tourne une carte de couverture autour de son centre.
///
/// Reverse mapping : pour chaque pixel de sortie on remonte à sa position
/// source via la rotation inverse, puis interpolation bilinéaire. La sortie
/// est agrandie pour contenir tout le glyphe tourné.
///
/// # Example
/// ```
/// use gd_core::frame::GlyphBitmap;
/// use gd_layers::transform::rotate_bitmap;
///
/// let mut bmp = GlyphBitmap::new(10, 4);
/// bmp.coverage.fill(255);
/// let turned = rotate_bitmap(&bmp, 90.0);
/// assert_eq!((turned.width, turned.height), (4, 10));
/// ```
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
#[must_use]
pub fn rotate_bitmap(src: &GlyphBitmap, degrees: f32) -> GlyphBitmap {
    if degrees.abs() < f32::EPSILON || src.is_blank() {
        return src.clone();
    }

    let rad = degrees.to_radians();
    let (sin_a, cos_a) = rad.sin_cos();
    let in_w = src.width as f32;
    let in_h = src.height as f32;

    // Boîte englobante du rectangle tourné. L'epsilon évite qu'un quart de
    // tour exact ajoute une colonne parasite.
    let out_w = ((in_w * cos_a.abs() + in_h * sin_a.abs()) - 1e-3).ceil().max(1.0) as u32;
    let out_h = ((in_w * sin_a.abs() + in_h * cos_a.abs()) - 1e-3).ceil().max(1.0) as u32;

    let mut out = GlyphBitmap::new(out_w, out_h);
    let center_x = out_w as f32 / 2.0;
    let center_y = out_h as f32 / 2.0;
    let in_center_x = in_w / 2.0;
    let in_center_y = in_h / 2.0;
    let in_width = src.width as i32;
    let in_height = src.height as i32;

    let sample = |x: i32, y: i32| -> f32 {
        if x < 0 || y < 0 || x >= in_width || y >= in_height {
            0.0
        } else {
            f32::from(src.coverage[y as usize * src.width as usize + x as usize])
        }
    };

    for (y_out, row) in out.coverage.chunks_exact_mut(out_w as usize).enumerate() {
        let y_f = y_out as f32 + 0.5 - center_y;
        for (x_out, px) in row.iter_mut().enumerate() {
            let x_f = x_out as f32 + 0.5 - center_x;

            // Rotation inverse, centres de pixels.
            let x_src = x_f * cos_a + y_f * sin_a + in_center_x - 0.5;
            let y_src = -x_f * sin_a + y_f * cos_a + in_center_y - 0.5;

            let x0 = x_src.floor() as i32;
            let y0 = y_src.floor() as i32;
            let fx = x_src - x0 as f32;
            let fy = y_src - y0 as f32;

            let v = sample(x0, y0) * (1.0 - fx) * (1.0 - fy)
                + sample(x0 + 1, y0) * fx * (1.0 - fy)
                + sample(x0, y0 + 1) * (1.0 - fx) * fy
                + sample(x0 + 1, y0 + 1) * fx * fy;
            *px = v.round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32) -> GlyphBitmap {
        let mut bmp = GlyphBitmap::new(w, h);
        bmp.coverage.fill(255);
        bmp
    }

    #[test]
    fn zero_rotation_is_identity() {
        let mut bmp = GlyphBitmap::new(3, 3);
        bmp.coverage[4] = 200;
        assert_eq!(rotate_bitmap(&bmp, 0.0), bmp);
    }

    #[test]
    fn rotation_expands_bounds() {
        let turned = rotate_bitmap(&solid(20, 20), 45.0);
        // 20·√2 ≈ 28.3
        assert_eq!((turned.width, turned.height), (29, 29));
        // Centre stays inked, corners stay empty.
        assert!(turned.at(14, 14) > 250);
        assert_eq!(turned.at(0, 0), 0);
    }

    #[test]
    fn coverage_mass_is_roughly_preserved() {
        let src = solid(16, 8);
        let mass = |b: &GlyphBitmap| b.coverage.iter().map(|&c| f32::from(c)).sum::<f32>();
        let turned = rotate_bitmap(&src, 25.0);
        let ratio = mass(&turned) / mass(&src);
        assert!((0.9..1.1).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn half_turn_mirrors_both_axes() {
        let mut bmp = GlyphBitmap::new(4, 2);
        bmp.coverage[0] = 255; // top-left
        let turned = rotate_bitmap(&bmp, 180.0);
        assert_eq!((turned.width, turned.height), (4, 2));
        assert!(turned.at(3, 1) > 250);
        assert_eq!(turned.at(0, 0), 0);
    }
}
