//! Ensemble de Mandelbrot et ensembles de Julia de z² + c.
//!
//! Le noyau (`fractal`, `render`) est pur : chaque grille est une fonction
//! de ses paramètres. `session` ajoute le rendu en arrière-plan annulable
//! utilisé par le viewer, `color` la colorisation.

pub mod color;
pub mod config;
pub mod error;
pub mod fractal;
pub mod render;
pub mod session;

pub use error::{Error, Result};
pub use fractal::{ComplexSample, EscapeResult, GridParams, Region, ResultMap, SampleMode};
pub use render::{compute_julia, compute_mandelbrot, sample_grid};
