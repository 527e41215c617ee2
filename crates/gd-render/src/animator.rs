use gd_core::color::Rgb;
use gd_core::config::AnimationConfig;
use gd_core::error::CoreError;
use gd_core::frame::FrameBuffer;
use gd_core::placement::LayerPlan;
use gd_core::traits::GlyphRasterizer;
use gd_layers::{derive_seed, Compositor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::effects::{blend_frames, gaussian_blur, MIN_BLUR};

/// Sel du flux aléatoire des points de départ, distinct de celui du planificateur.
const FLIGHT_SALT: u64 = 0x00F1_1647;

/// État courant de l'animateur.
///
/// `Settled` ne produit pas de frame : il fige la couche sur le canevas
/// accumulé puis enchaîne sur la couche suivante ou sur le fondu final.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Layer `layer` in flight, `frame` of `frames_per_layer`.
    FlyingIn { layer: usize, frame: u32 },
    /// Layer `layer` has landed and is baked into the accumulated canvas.
    Settled { layer: usize },
    /// Cross-fade from the full composite to the original, `frame` of `final_original_frames`.
    FadingToOriginal { frame: u32 },
    /// Every frame has been produced.
    Done,
}

/// Une couche et le point de départ hors-champ de chacun de ses glyphes.
struct Flight {
    plan: LayerPlan,
    starts: Vec<(f32, f32)>,
}

/// Point de départ juste hors du canevas, sur un côté tiré au hasard.
///
/// La distance au bord vaut 10 à 50 % de la dimension correspondante ;
/// l'autre coordonnée est uniforme le long du côté.
fn offscreen_start<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> (f32, f32) {
    let away = rng.gen_range(0.1f32..=0.5);
    match rng.gen_range(0..4u8) {
        0 => (-width * away, rng.gen_range(0.0..=height)),
        1 => (width * (1.0 + away), rng.gen_range(0.0..=height)),
        2 => (rng.gen_range(0.0..=width), -height * away),
        _ => (rng.gen_range(0.0..=width), height * (1.0 + away)),
    }
}

/// Animation de construction en profondeur : les couches arrivent en vol
/// l'une après l'autre, s'accumulent, puis l'ensemble se fond dans l'image
/// originale.
///
/// Itérateur de frames à longueur fixe :
/// Σ `frames_per_layer` sur les couches + `final_original_frames`.
/// Chaque frame est produite à la demande et peut être encodée puis jetée.
///
/// # Example
/// ```
/// use gd_core::{AnimationConfig, CoreError, FrameBuffer, GlyphBitmap, GlyphRasterizer};
/// use gd_render::DepthAnimator;
///
/// struct Blocks;
/// impl GlyphRasterizer for Blocks {
///     fn rasterize(&self, _: char, size: u32) -> Result<GlyphBitmap, CoreError> {
///         Ok(GlyphBitmap { width: size, height: size, coverage: vec![255; (size * size) as usize] })
///     }
/// }
///
/// let original = FrameBuffer::filled(32, 24, (90, 120, 150));
/// let animator = DepthAnimator::new(&original, Vec::new(), &Blocks, &AnimationConfig::default(), (255, 255, 255), 1).unwrap();
/// let frames: Vec<_> = animator.collect();
/// assert_eq!(frames.len(), 6);
/// assert_eq!(frames.last(), Some(&original));
/// ```
pub struct DepthAnimator<'r> {
    compositor: Compositor<'r>,
    original: FrameBuffer,
    settled: FrameBuffer,
    flights: Vec<Flight>,
    config: AnimationConfig,
    phase: Phase,
    emitted: usize,
}

impl<'r> DepthAnimator<'r> {
    /// Prépare l'animation : valide le rythme, tire un point de départ par glyphe.
    ///
    /// `plans` sont les couches dans leur ordre d'arrivée ; `original` fixe les
    /// dimensions de toutes les frames.
    ///
    /// # Errors
    /// `CoreError::Config` for a zero frame count or layers out of order,
    /// `CoreError::InvalidDimensions` for an empty original.
    pub fn new(
        original: &FrameBuffer,
        plans: Vec<LayerPlan>,
        rasterizer: &'r dyn GlyphRasterizer,
        config: &AnimationConfig,
        background: Rgb,
        seed: u64,
    ) -> Result<Self, CoreError> {
        config.validate()?;
        if original.width == 0 || original.height == 0 {
            return Err(CoreError::InvalidDimensions {
                width: original.width,
                height: original.height,
            });
        }
        if plans.windows(2).any(|w| w[0].index >= w[1].index) {
            return Err(CoreError::config(
                "les couches animées doivent arriver de la plus grossière à la plus fine",
            ));
        }

        let mut rng = StdRng::seed_from_u64(derive_seed(seed, FLIGHT_SALT));
        let (w, h) = (original.width as f32, original.height as f32);
        let flights: Vec<Flight> = plans
            .into_iter()
            .map(|plan| {
                let starts = plan
                    .placements
                    .iter()
                    .map(|_| offscreen_start(&mut rng, w, h))
                    .collect();
                Flight { plan, starts }
            })
            .collect();

        let phase = if flights.is_empty() {
            Phase::FadingToOriginal { frame: 0 }
        } else {
            Phase::FlyingIn { layer: 0, frame: 0 }
        };

        Ok(Self {
            compositor: Compositor::new(rasterizer),
            original: original.clone(),
            settled: FrameBuffer::filled(original.width, original.height, background),
            flights,
            config: config.clone(),
            phase,
            emitted: 0,
        })
    }

    /// Nombre total de frames produites par l'itérateur.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.flights.len() * self.config.frames_per_layer as usize
            + self.config.final_original_frames as usize
    }

    /// Current state.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Le canevas des couches déjà posées.
    #[must_use]
    pub fn settled(&self) -> &FrameBuffer {
        &self.settled
    }

    /// Fallback and skip counters of the glyphs drawn so far.
    #[must_use]
    pub fn stats(&self) -> gd_layers::RenderStats {
        self.compositor.stats()
    }

    /// Frame `frame` of layer `layer` in flight: settled canvas plus the moving
    /// layer, blurred in proportion to its speed.
    fn flight_frame(&mut self, layer: usize, frame: u32) -> FrameBuffer {
        let t = (frame + 1) as f32 / self.config.frames_per_layer as f32;
        let progress = self.config.easing.apply(t);

        let flight = &self.flights[layer];
        let mut overlay = FrameBuffer::new(self.original.width, self.original.height);
        for (placement, &(sx, sy)) in flight.plan.placements.iter().zip(&flight.starts) {
            let x = sx + (placement.x - sx) * progress;
            let y = sy + (placement.y - sy) * progress;
            self.compositor.draw_placement(&mut overlay, &placement.at(x, y));
        }

        // Posé : plus de flou.
        let radius = if t < 1.0 {
            self.config.motion_blur * self.config.easing.relative_speed(t)
        } else {
            0.0
        };
        if radius >= MIN_BLUR {
            overlay = gaussian_blur(&overlay, radius);
        }

        let mut out = self.settled.clone();
        out.composite(&overlay, 0, 0);
        out
    }

    /// Frame `frame` of the final cross-fade. The last one is the original.
    fn fade_frame(&self, frame: u32) -> FrameBuffer {
        let alpha = (frame + 1) as f32 / self.config.final_original_frames as f32;
        let blended = blend_frames(&self.settled, &self.original, alpha);
        let radius = self.config.fade_blur * (1.0 - alpha);
        if radius >= MIN_BLUR {
            gaussian_blur(&blended, radius)
        } else {
            blended
        }
    }
}

impl Iterator for DepthAnimator<'_> {
    type Item = FrameBuffer;

    fn next(&mut self) -> Option<FrameBuffer> {
        loop {
            match self.phase {
                Phase::FlyingIn { layer, frame } => {
                    if frame == 0 {
                        log::info!(
                            "Couche {}/{} en vol ({} glyphes)",
                            layer + 1,
                            self.flights.len(),
                            self.flights[layer].plan.len()
                        );
                    }
                    let out = self.flight_frame(layer, frame);
                    self.phase = if frame + 1 < self.config.frames_per_layer {
                        Phase::FlyingIn {
                            layer,
                            frame: frame + 1,
                        }
                    } else {
                        Phase::Settled { layer }
                    };
                    self.emitted += 1;
                    return Some(out);
                }
                Phase::Settled { layer } => {
                    self.compositor
                        .draw_layer(&mut self.settled, &self.flights[layer].plan);
                    self.phase = if layer + 1 < self.flights.len() {
                        Phase::FlyingIn {
                            layer: layer + 1,
                            frame: 0,
                        }
                    } else {
                        Phase::FadingToOriginal { frame: 0 }
                    };
                }
                Phase::FadingToOriginal { frame } => {
                    let out = self.fade_frame(frame);
                    self.phase = if frame + 1 < self.config.final_original_frames {
                        Phase::FadingToOriginal { frame: frame + 1 }
                    } else {
                        Phase::Done
                    };
                    self.emitted += 1;
                    return Some(out);
                }
                Phase::Done => return None,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.frame_count().saturating_sub(self.emitted);
        (left, Some(left))
    }
}

impl ExactSizeIterator for DepthAnimator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use gd_core::charset::GlyphSource;
    use gd_core::config::LayerConfig;
    use gd_core::frame::GlyphBitmap;
    use gd_core::luminance::LuminanceMap;
    use gd_layers::plan_style;

    struct Squares;

    impl GlyphRasterizer for Squares {
        fn rasterize(&self, _glyph: char, size: u32) -> Result<GlyphBitmap, CoreError> {
            let mut bmp = GlyphBitmap::new(size, size);
            bmp.coverage.fill(255);
            Ok(bmp)
        }
    }

    fn three_layers(map: &LuminanceMap) -> Vec<LayerPlan> {
        let layers = [
            LayerConfig::new(16, 16, 40, 200, 0.8),
            LayerConfig::new(10, 10, 40, 200, 1.0),
            LayerConfig::new(6, 6, 40, 200, 1.2),
        ];
        plan_style(map, &layers, &GlyphSource::default(), 42).unwrap()
    }

    fn config(frames_per_layer: u32, final_original_frames: u32) -> AnimationConfig {
        AnimationConfig {
            frames_per_layer,
            final_original_frames,
            ..AnimationConfig::default()
        }
    }

    #[test]
    fn frame_count_is_layers_times_frames_plus_fade() {
        let map = LuminanceMap::uniform(48, 32, 0.2);
        let original = FrameBuffer::filled(48, 32, (50, 50, 50));
        let animator = DepthAnimator::new(
            &original,
            three_layers(&map),
            &Squares,
            &config(5, 10),
            (255, 255, 255),
            7,
        )
        .unwrap();
        assert_eq!(animator.frame_count(), 25);
        assert_eq!(animator.len(), 25);
        let frames: Vec<FrameBuffer> = animator.collect();
        assert_eq!(frames.len(), 25);
        assert!(frames.iter().all(|f| f.same_size(&original)));
    }

    #[test]
    fn last_frame_is_the_original() {
        let map = LuminanceMap::uniform(40, 30, 0.0);
        let mut original = FrameBuffer::filled(40, 30, (200, 180, 160));
        original.set_pixel(3, 4, [0, 10, 20, 255]);
        let animator = DepthAnimator::new(
            &original,
            three_layers(&map),
            &Squares,
            &config(2, 3),
            (255, 255, 255),
            1,
        )
        .unwrap();
        let last = animator.last().unwrap();
        assert_eq!(last, original);
    }

    #[test]
    fn settled_canvas_matches_static_render() {
        let map = LuminanceMap::uniform(40, 30, 0.3);
        let plans = three_layers(&map);
        let original = FrameBuffer::filled(40, 30, (0, 0, 0));
        let expected = Compositor::new(&Squares)
            .render(&plans, 40, 30, Some((255, 255, 255)))
            .unwrap();

        let mut animator =
            DepthAnimator::new(&original, plans, &Squares, &config(3, 2), (255, 255, 255), 9)
                .unwrap();
        // 3 layers × 3 frames, then the fade begins.
        for _ in 0..9 {
            animator.next();
        }
        animator.next();
        assert_eq!(animator.phase(), Phase::FadingToOriginal { frame: 1 });
        assert_eq!(animator.settled(), &expected);
    }

    #[test]
    fn layers_accumulate_and_phases_advance() {
        let map = LuminanceMap::uniform(40, 30, 0.0);
        let original = FrameBuffer::filled(40, 30, (0, 0, 0));
        let mut animator = DepthAnimator::new(
            &original,
            three_layers(&map),
            &Squares,
            &config(2, 1),
            (255, 255, 255),
            3,
        )
        .unwrap();
        assert_eq!(animator.phase(), Phase::FlyingIn { layer: 0, frame: 0 });
        animator.next();
        assert_eq!(animator.phase(), Phase::FlyingIn { layer: 0, frame: 1 });
        animator.next();
        assert_eq!(animator.phase(), Phase::Settled { layer: 0 });
        let blank = FrameBuffer::filled(40, 30, (255, 255, 255));
        assert_eq!(animator.settled(), &blank);
        animator.next();
        assert_eq!(animator.phase(), Phase::FlyingIn { layer: 1, frame: 1 });
        assert_ne!(animator.settled(), &blank);
        assert_eq!(animator.by_ref().count(), 4);
        assert_eq!(animator.phase(), Phase::Done);
    }

    #[test]
    fn start_positions_are_off_canvas() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..500 {
            let (x, y) = offscreen_start(&mut rng, 100.0, 50.0);
            let outside = x <= -10.0 || x >= 110.0 || y <= -5.0 || y >= 55.0;
            assert!(outside, "({x}, {y})");
        }
    }

    #[test]
    fn same_seed_same_frames() {
        let map = LuminanceMap::uniform(32, 24, 0.1);
        let original = FrameBuffer::filled(32, 24, (10, 10, 10));
        let run = |seed| {
            DepthAnimator::new(&original, three_layers(&map), &Squares, &config(2, 2), (255, 255, 255), seed)
                .unwrap()
                .collect::<Vec<_>>()
        };
        assert_eq!(run(5), run(5));
    }

    #[test]
    fn zero_frames_are_rejected() {
        let original = FrameBuffer::filled(8, 8, (0, 0, 0));
        for cfg in [config(0, 4), config(4, 0)] {
            assert!(matches!(
                DepthAnimator::new(&original, Vec::new(), &Squares, &cfg, (255, 255, 255), 0),
                Err(CoreError::Config(_))
            ));
        }
    }
}
