mod gui;

use std::path::PathBuf;

use clap::Parser;

use holomotion::config::ViewerConfig;

use gui::HolomotionApp;

/// Viewer interactif : déplacer le pointeur sur l'ensemble de Mandelbrot
/// pour suivre l'ensemble de Julia du paramètre c correspondant.
#[derive(Parser, Debug)]
#[command(name = "holomotion-gui", version)]
struct Cli {
    /// Fichier de configuration TOML
    #[arg(long, value_name = "FICHIER")]
    config: Option<PathBuf>,

    /// Palette de couleurs (magma, inferno, grayscale)
    #[arg(long)]
    palette: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match ViewerConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Erreur: {e}");
                std::process::exit(1);
            }
        },
        None => ViewerConfig::default(),
    };
    if let Some(palette) = cli.palette {
        config.palette = palette;
    }

    let app = match HolomotionApp::new(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Erreur: {e}");
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Holomotion - Mandelbrot & Julia")
            .with_inner_size([1000.0, 540.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native("Holomotion", options, Box::new(move |_cc| Box::new(app))) {
        eprintln!("Erreur lors du lancement de l'application: {}", e);
        std::process::exit(1);
    }
}
