use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};
use log::info;
use num_complex::Complex64;

use holomotion::color::terminal::preview;
use holomotion::config::ViewerConfig;
use holomotion::fractal::GridParams;
use holomotion::render::sample_grid;

/// Calcule une grille Mandelbrot ou Julia et l'affiche dans le terminal.
///
/// Exemples :
///   holomotion --width 160 --height 160 mandelbrot
///   holomotion --palette inferno julia --re -0.8 --im 0.156
#[derive(Parser, Debug)]
#[command(
    name = "holomotion",
    about = "Ensembles de Mandelbrot et de Julia (z² + c) en ligne de commande",
    version,
    propagate_version = true,
    disable_help_subcommand = true
)]
struct Cli {
    /// Fichier de configuration TOML (valeurs par défaut sinon)
    #[arg(long, value_name = "FICHIER", global = true)]
    config: Option<PathBuf>,

    /// Largeur de la grille en pixels
    #[arg(long, global = true)]
    width: Option<u32>,

    /// Hauteur de la grille en pixels
    #[arg(long, global = true)]
    height: Option<u32>,

    /// Nombre maximal d'itérations (sinon valeur par défaut du type)
    #[arg(long, global = true)]
    iterations: Option<u32>,

    /// Palette de couleurs (magma, inferno, grayscale)
    #[arg(long, global = true)]
    palette: Option<String>,

    /// Largeur de l'aperçu texte en colonnes (0 = pas d'aperçu)
    #[arg(long, default_value_t = 80, global = true)]
    preview_cols: usize,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensemble de Mandelbrot sur une région rectangulaire
    Mandelbrot {
        /// Coordonnée minimale X
        #[arg(long, allow_hyphen_values = true)]
        xmin: Option<f64>,

        /// Coordonnée maximale X
        #[arg(long, allow_hyphen_values = true)]
        xmax: Option<f64>,

        /// Coordonnée minimale Y
        #[arg(long, allow_hyphen_values = true)]
        ymin: Option<f64>,

        /// Coordonnée maximale Y
        #[arg(long, allow_hyphen_values = true)]
        ymax: Option<f64>,
    },

    /// Ensemble de Julia du paramètre c, sur un carré centré sur l'origine
    Julia {
        /// Partie réelle de c
        #[arg(long = "re", default_value_t = 0.0, allow_hyphen_values = true)]
        c_re: f64,

        /// Partie imaginaire de c
        #[arg(long = "im", default_value_t = 0.0, allow_hyphen_values = true)]
        c_im: f64,

        /// Demi-étendue du carré
        #[arg(long)]
        half_extent: Option<f64>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ViewerConfig::load(path).unwrap_or_else(|e| fail(e)),
        None => ViewerConfig::default(),
    };
    apply_overrides(&mut config, &cli);
    if let Err(e) = config.validate() {
        fail(e);
    }
    let params = grid_params(&config, &cli.cmd).unwrap_or_else(|e| fail(e));

    let started = Instant::now();
    let map = sample_grid(&params).unwrap_or_else(|e| fail(e));
    let elapsed = started.elapsed();
    info!("grille {}x{} calculée", map.width(), map.height());

    let region = map.region();
    let center = region.center();
    println!(
        "{} {}x{}, max_iter = {}",
        params.mode.kind().name(),
        map.width(),
        map.height(),
        map.max_iter()
    );
    if let Command::Julia { c_re, c_im, .. } = cli.cmd {
        println!("c = {} + {}i", c_re, c_im);
    }
    println!(
        "région x=[{}, {}] y=[{}, {}], centre {} + {}i",
        region.xmin, region.xmax, region.ymin, region.ymax, center.re, center.im
    );
    println!("palette: {}", config.palette);
    println!("temps: {:.1} ms", elapsed.as_secs_f64() * 1000.0);
    println!(
        "points non échappés: {} / {}",
        map.bounded_count(),
        map.cells().len()
    );
    match map.max_escape_iteration() {
        Some(n) => println!("échappement le plus lent: {} itérations", n),
        None => println!("aucun point échappé"),
    }

    if cli.preview_cols > 0 {
        println!();
        print!("{}", preview(&map, cli.preview_cols));
    }
}

/// Override des valeurs de configuration par les options fournies.
fn apply_overrides(config: &mut ViewerConfig, cli: &Cli) {
    if let Some(width) = cli.width {
        config.width = width;
    }
    if let Some(height) = cli.height {
        config.height = height;
    }
    if let Some(palette) = &cli.palette {
        config.palette = palette.clone();
    }
    match &cli.cmd {
        Command::Mandelbrot { xmin, xmax, ymin, ymax } => {
            if let Some(xmin) = *xmin {
                config.mandelbrot_region.xmin = xmin;
            }
            if let Some(xmax) = *xmax {
                config.mandelbrot_region.xmax = xmax;
            }
            if let Some(ymin) = *ymin {
                config.mandelbrot_region.ymin = ymin;
            }
            if let Some(ymax) = *ymax {
                config.mandelbrot_region.ymax = ymax;
            }
            if let Some(iters) = cli.iterations {
                config.mandelbrot_iterations = iters;
            }
        }
        Command::Julia { half_extent, .. } => {
            if let Some(half_extent) = *half_extent {
                config.julia_half_extent = half_extent;
            }
            if let Some(iters) = cli.iterations {
                config.julia_iterations = iters;
            }
        }
    }
}

fn grid_params(config: &ViewerConfig, cmd: &Command) -> holomotion::Result<GridParams> {
    match *cmd {
        Command::Mandelbrot { .. } => Ok(config.mandelbrot_params()),
        Command::Julia { c_re, c_im, .. } => config.julia_params(Complex64::new(c_re, c_im)),
    }
}

fn fail(e: holomotion::Error) -> ! {
    eprintln!("Erreur: {e}");
    std::process::exit(1);
}
