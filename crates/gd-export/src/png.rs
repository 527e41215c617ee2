use std::path::Path;

use anyhow::{Context, Result};
use gd_core::frame::FrameBuffer;

/// Écrit un `FrameBuffer` RGBA en PNG, dossiers parents créés au besoin.
///
/// # Errors
/// Returns an error if the directory or the file cannot be written.
///
/// # Example
/// ```no_run
/// use gd_core::frame::FrameBuffer;
/// use gd_export::save_png;
/// use std::path::Path;
/// save_png(Path::new("out/classic.png"), &FrameBuffer::filled(8, 8, (255, 255, 255))).unwrap();
/// ```
pub fn save_png(path: &Path, frame: &FrameBuffer) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Création du dossier {}", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("Écriture PNG {}", path.display()))?;
    log::info!("Sauvegardé : {} ({}×{})", path.display(), frame.width, frame.height);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_keeps_pixels_and_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.png");
        let mut fb = FrameBuffer::filled(5, 4, (255, 255, 255));
        fb.set_pixel(4, 3, [1, 2, 3, 255]);

        save_png(&path, &fb).unwrap();

        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (5, 4));
        assert_eq!(back.get_pixel(4, 3).0, [1, 2, 3, 255]);
    }
}
