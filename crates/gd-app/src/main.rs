use anyhow::Result;
use clap::Parser;
use gd_core::config::{load_config, RunConfig};

pub mod cli;
pub mod pipeline;

use cli::{Cli, Command};

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config (les options CLI sont appliquées par commande)
    let config = resolve_config(&cli)?;

    // 4. Lancer la commande
    match &cli.command {
        Command::Render(args) => pipeline::run_render(args, config),
        Command::Variations(args) => {
            let out = pipeline::run_variations(args, config)?;
            log::info!(
                "{} styles rendus, original : {}",
                out.styles.len(),
                out.original.display()
            );
            if let Some(ref evaluation) = out.evaluation {
                log::info!("Évaluation : {}", evaluation.display());
            }
            log::info!("Comparaison : {}", out.comparison.display());
            Ok(())
        }
        Command::Animate(args) => {
            let frames = pipeline::run_animate(args, config)?;
            log::info!("{frames} frames écrites");
            Ok(())
        }
    }
}

/// Config file if present, defaults otherwise.
fn resolve_config(cli: &Cli) -> Result<RunConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(RunConfig::default())
    }
}
