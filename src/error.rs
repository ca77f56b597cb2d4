use std::path::PathBuf;

use thiserror::Error;

/// Erreurs de contrat du noyau et de la configuration.
///
/// Aucune n'est récupérée en interne : elles remontent à l'appelant,
/// qui décide (les binaires affichent le message et sortent en code 1).
#[derive(Debug, Error)]
pub enum Error {
    #[error("résolution invalide: {width}x{height} (largeur et hauteur doivent être > 0)")]
    InvalidResolution { width: u32, height: u32 },

    #[error("région invalide: x=[{xmin}, {xmax}], y=[{ymin}, {ymax}] (bornes finies, min < max)")]
    InvalidRegion { xmin: f64, xmax: f64, ymin: f64, ymax: f64 },

    #[error("demi-étendue invalide: {0} (doit être finie et > 0)")]
    InvalidHalfExtent(f64),

    #[error("paramètre c non fini: ({re}, {im})")]
    NonFiniteParameter { re: f64, im: f64 },

    #[error("lecture de la configuration {path:?} impossible: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration {path:?} invalide: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("palette inconnue: '{0}' (options: magma, inferno, grayscale)")]
    UnknownPalette(String),
}

pub type Result<T> = std::result::Result<T, Error>;
