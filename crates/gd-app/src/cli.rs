use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gd_core::config::RunConfig;
use gd_core::error::CoreError;
use gd_core::presets::Style;

/// glyphdepth : reconstruction d'images en couches de caractères chinois.
#[derive(Parser, Debug)]
#[command(name = "glyphdepth", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Une image composée avec un style.
    Render(RenderArgs),
    /// Plusieurs styles, planche d'évaluation et bande de comparaison.
    Variations(VariationsArgs),
    /// GIF animé : les couches arrivent en vol puis se fondent dans l'original.
    Animate(AnimateArgs),
}

/// Options shared by every command.
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Image source (JPEG, PNG, BMP, GIF).
    #[arg(long, default_value = "example.jpg")]
    pub input: PathBuf,

    /// Police couvrant les caractères chinois (ex. simhei.ttf, NotoSansSC).
    #[arg(long)]
    pub font: PathBuf,

    /// Largeur cible ; la hauteur suit le ratio.
    #[arg(long)]
    pub max_width: Option<u32>,

    /// Graine du générateur. Absente : tirée au hasard et journalisée.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Banque de glyphes à utiliser.
    #[arg(long)]
    pub glyphs: Option<String>,

    /// Poids des contours dans l'occupation, pour toutes les couches.
    #[arg(long)]
    pub edge_weight: Option<f32>,

    /// Obscurité sous laquelle les cellules restent vides, pour toutes les couches.
    #[arg(long)]
    pub background_threshold: Option<f32>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// PNG de sortie.
    #[arg(long, default_value = "output.png")]
    pub output: PathBuf,

    /// Style : classic, subtle_soft, graphic_bold, deep_dense, minimal_airy.
    #[arg(long, default_value = "classic")]
    pub style: String,
}

#[derive(Args, Debug)]
pub struct VariationsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Dossier des images produites.
    #[arg(long, default_value = "variations")]
    pub out_dir: PathBuf,

    /// Styles à rendre, dans l'ordre.
    #[arg(
        long,
        num_args = 1..,
        default_values_t = Style::VARIATIONS.map(|s| s.name().to_string())
    )]
    pub styles: Vec<String>,

    /// Nom de la bande de comparaison dans `out_dir`.
    #[arg(long, default_value = "comparison.png")]
    pub comparison_output: String,
}

#[derive(Args, Debug)]
pub struct AnimateArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// GIF de sortie.
    #[arg(long, default_value = "depth_transition.gif")]
    pub output_gif: PathBuf,

    /// Frames de vol par couche.
    #[arg(long)]
    pub frames_per_layer: Option<u32>,

    /// Frames du fondu vers l'original.
    #[arg(long)]
    pub final_original_frames: Option<u32>,

    /// Styles empilés, dans l'ordre d'arrivée.
    #[arg(long, num_args = 1..)]
    pub styles: Option<Vec<String>>,
}

impl CommonArgs {
    /// Apply the shared overrides on top of the file configuration.
    pub fn apply(&self, config: &mut RunConfig) {
        if let Some(w) = self.max_width {
            config.max_width = w;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(ref glyphs) = self.glyphs {
            config.glyphs.clone_from(glyphs);
        }
        if self.edge_weight.is_some() {
            config.edge_weight = self.edge_weight;
        }
        if self.background_threshold.is_some() {
            config.background_threshold = self.background_threshold;
        }
    }
}

impl AnimateArgs {
    /// Apply the animation overrides.
    ///
    /// # Errors
    /// `CoreError::Config` for an unknown style name.
    pub fn apply(&self, config: &mut RunConfig) -> Result<(), CoreError> {
        self.common.apply(config);
        if let Some(n) = self.frames_per_layer {
            config.animation.frames_per_layer = n;
        }
        if let Some(n) = self.final_original_frames {
            config.animation.final_original_frames = n;
        }
        if let Some(ref names) = self.styles {
            config.animation.styles = parse_styles(names, &Style::ANIMATION)?;
        }
        Ok(())
    }
}

/// Noms de styles → `Style`, en rejetant le premier nom inconnu.
/// Une liste vide donne `default`.
///
/// # Errors
/// `CoreError::Config` listing the available styles.
pub fn parse_styles(names: &[String], default: &[Style]) -> Result<Vec<Style>, CoreError> {
    if names.is_empty() {
        return Ok(default.to_vec());
    }
    names.iter().map(|n| n.parse::<Style>()).collect()
}
