use num_complex::Complex64;

use crate::error::Result;
use crate::fractal::types::{ComplexSample, GridParams, Region, SampleMode};

/// Rayon d'échappement exact de z² + c : toute orbite avec |z| > 2 diverge.
pub const ESCAPE_RADIUS: f64 = 2.0;
pub const ESCAPE_RADIUS_SQR: f64 = ESCAPE_RADIUS * ESCAPE_RADIUS;

/// Vue par défaut de l'ensemble de Mandelbrot.
pub const DEFAULT_MANDELBROT_REGION: Region = Region {
    xmin: -2.5,
    xmax: 1.5,
    ymin: -2.0,
    ymax: 2.0,
};
pub const DEFAULT_MANDELBROT_ITERATIONS: u32 = 5000;

/// Les ensembles de Julia sont toujours cadrés sur l'origine, quel que soit c.
pub const DEFAULT_JULIA_HALF_EXTENT: f64 = 2.0;
pub const DEFAULT_JULIA_ITERATIONS: u32 = 1000;

pub const DEFAULT_WIDTH: u32 = 800;
pub const DEFAULT_HEIGHT: u32 = 800;

pub const DEFAULT_PARAMETER: ComplexSample = Complex64::new(0.0, 0.0);

pub fn mandelbrot_params(region: Region, width: u32, height: u32, max_iter: u32) -> GridParams {
    GridParams {
        region,
        width,
        height,
        max_iter,
        mode: SampleMode::Mandelbrot,
    }
}

/// Requête Julia sur le carré centré `[-half_extent, half_extent]²`.
pub fn julia_params(
    c: ComplexSample,
    half_extent: f64,
    width: u32,
    height: u32,
    max_iter: u32,
) -> Result<GridParams> {
    Ok(GridParams {
        region: Region::centered(half_extent)?,
        width,
        height,
        max_iter,
        mode: SampleMode::Julia { c },
    })
}
