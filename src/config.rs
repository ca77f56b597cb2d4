//! Réglages du viewer : valeurs par défaut, puis fichier TOML, puis options CLI.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::color::PaletteId;
use crate::error::{Error, Result};
use crate::fractal::definitions::{
    DEFAULT_HEIGHT, DEFAULT_JULIA_HALF_EXTENT, DEFAULT_JULIA_ITERATIONS, DEFAULT_MANDELBROT_ITERATIONS,
    DEFAULT_MANDELBROT_REGION, DEFAULT_PARAMETER, DEFAULT_WIDTH,
};
use crate::fractal::{julia_params, mandelbrot_params, ComplexSample, GridParams, Region};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Résolution de chaque panneau, en pixels.
    pub width: u32,
    pub height: u32,
    pub mandelbrot_region: Region,
    pub mandelbrot_iterations: u32,
    pub julia_half_extent: f64,
    pub julia_iterations: u32,
    pub palette: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mandelbrot_region: DEFAULT_MANDELBROT_REGION,
            mandelbrot_iterations: DEFAULT_MANDELBROT_ITERATIONS,
            julia_half_extent: DEFAULT_JULIA_HALF_EXTENT,
            julia_iterations: DEFAULT_JULIA_ITERATIONS,
            palette: PaletteId::default().name().to_string(),
        }
    }
}

impl ViewerConfig {
    /// Charge un fichier TOML ; les clés absentes gardent leur valeur par défaut.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ViewerConfig = toml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.mandelbrot_params().validate()?;
        self.julia_params(DEFAULT_PARAMETER)?.validate()?;
        self.palette_id()?;
        Ok(())
    }

    pub fn palette_id(&self) -> Result<PaletteId> {
        PaletteId::from_name(&self.palette)
    }

    pub fn mandelbrot_params(&self) -> GridParams {
        mandelbrot_params(self.mandelbrot_region, self.width, self.height, self.mandelbrot_iterations)
    }

    pub fn julia_params(&self, c: ComplexSample) -> Result<GridParams> {
        julia_params(c, self.julia_half_extent, self.width, self.height, self.julia_iterations)
    }
}
