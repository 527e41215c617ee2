use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{Context, Result};
use gd_core::frame::FrameBuffer;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

/// Vitesse de quantification NeuQuant (1 = meilleure palette, 30 = plus rapide).
const QUANTIZE_SPEED: i32 = 10;

/// Encode des frames RGBA en GIF animé bouclant à l'infini.
///
/// Les frames sont écrites au fil de l'eau : l'animateur peut produire,
/// encoder puis jeter chaque frame.
///
/// # Example
/// ```no_run
/// use gd_core::frame::FrameBuffer;
/// use gd_export::GifWriter;
/// use std::path::Path;
///
/// let mut gif = GifWriter::new(Path::new("depth.gif"), 120).unwrap();
/// gif.write_frame(&FrameBuffer::filled(64, 48, (255, 255, 255))).unwrap();
/// gif.finish().unwrap();
/// ```
pub struct GifWriter {
    encoder: GifEncoder<BufWriter<File>>,
    delay: Delay,
    size: Option<(u32, u32)>,
    frames: usize,
}

impl GifWriter {
    /// Crée le fichier (et ses dossiers parents) et configure la boucle infinie.
    ///
    /// # Errors
    /// Returns an error if the file cannot be created.
    pub fn new(path: &Path, frame_delay_ms: u32) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Création du dossier {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Impossible de créer {}", path.display()))?;
        let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), QUANTIZE_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .context("Configuration de la boucle GIF")?;
        Ok(Self {
            encoder,
            delay: Delay::from_numer_denom_ms(frame_delay_ms, 1),
            size: None,
            frames: 0,
        })
    }

    /// Ajoute une frame. Toutes les frames doivent avoir la taille de la première.
    ///
    /// # Errors
    /// Returns an error on a size change or an encoder failure.
    pub fn write_frame(&mut self, fb: &FrameBuffer) -> Result<()> {
        match self.size {
            None => self.size = Some((fb.width, fb.height)),
            Some((w, h)) if (w, h) != (fb.width, fb.height) => anyhow::bail!(
                "Frame {} : {}×{} au lieu de {w}×{h}",
                self.frames,
                fb.width,
                fb.height
            ),
            Some(_) => {}
        }
        let img = RgbaImage::from_raw(fb.width, fb.height, fb.data.clone())
            .context("FrameBuffer incohérent avec ses dimensions")?;
        self.encoder
            .encode_frame(Frame::from_parts(img, 0, 0, self.delay))
            .with_context(|| format!("Encodage GIF de la frame {}", self.frames))?;
        self.frames += 1;
        Ok(())
    }

    /// Finalise le fichier (trailer GIF) et retourne le nombre de frames.
    ///
    /// # Errors
    /// Returns an error if no frame was written.
    pub fn finish(self) -> Result<usize> {
        if self.frames == 0 {
            anyhow::bail!("GIF vide : aucune frame écrite");
        }
        let frames = self.frames;
        // Le trailer est écrit à la destruction de l'encodeur.
        drop(self.encoder);
        log::debug!("GIF finalisé : {frames} frames");
        Ok(frames)
    }
}
