use image::RgbImage;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::fractal::{EscapeResult, ResultMap};

/// Part basse du gradient réservée : les points échappés commencent à
/// `ESCAPED_FLOOR`, l'intérieur a sa propre couleur.
const ESCAPED_FLOOR: f64 = 0.15;

/// Palettes disponibles (Magma par défaut, comme la version matplotlib).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PaletteId {
    #[default]
    Magma,
    Inferno,
    Grayscale,
}

impl PaletteId {
    pub fn all() -> &'static [PaletteId] {
        &[PaletteId::Magma, PaletteId::Inferno, PaletteId::Grayscale]
    }

    pub fn name(self) -> &'static str {
        match self {
            PaletteId::Magma => "magma",
            PaletteId::Inferno => "inferno",
            PaletteId::Grayscale => "grayscale",
        }
    }

    pub fn from_name(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "magma" => Ok(PaletteId::Magma),
            "inferno" => Ok(PaletteId::Inferno),
            "grayscale" | "gray" | "grey" => Ok(PaletteId::Grayscale),
            _ => Err(Error::UnknownPalette(value.to_string())),
        }
    }

    /// Palette suivante (cycle).
    pub fn next(self) -> Self {
        match self {
            PaletteId::Magma => PaletteId::Inferno,
            PaletteId::Inferno => PaletteId::Grayscale,
            PaletteId::Grayscale => PaletteId::Magma,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct GradientStop {
    position: f64, // [0.0, 1.0]
    r: u8,
    g: u8,
    b: u8,
}

#[derive(Clone, Copy, Debug)]
struct Gradient {
    stops: &'static [GradientStop],
    interior: (u8, u8, u8),
}

// Échantillons des colormaps matplotlib
const MAGMA_STOPS: [GradientStop; 9] = [
    GradientStop { position: 0.000, r: 0, g: 0, b: 4 },
    GradientStop { position: 0.125, r: 28, g: 16, b: 68 },
    GradientStop { position: 0.250, r: 79, g: 18, b: 123 },
    GradientStop { position: 0.375, r: 129, g: 37, b: 129 },
    GradientStop { position: 0.500, r: 181, g: 54, b: 122 },
    GradientStop { position: 0.625, r: 229, g: 80, b: 100 },
    GradientStop { position: 0.750, r: 251, g: 135, b: 97 },
    GradientStop { position: 0.875, r: 254, g: 194, b: 135 },
    GradientStop { position: 1.000, r: 252, g: 253, b: 191 },
];

const INFERNO_STOPS: [GradientStop; 8] = [
    GradientStop { position: 0.000, r: 0, g: 0, b: 4 },
    GradientStop { position: 0.143, r: 31, g: 12, b: 72 },
    GradientStop { position: 0.286, r: 85, g: 15, b: 109 },
    GradientStop { position: 0.429, r: 136, g: 34, b: 106 },
    GradientStop { position: 0.571, r: 186, g: 54, b: 85 },
    GradientStop { position: 0.714, r: 227, g: 89, b: 51 },
    GradientStop { position: 0.857, r: 249, g: 140, b: 10 },
    GradientStop { position: 1.000, r: 252, g: 255, b: 164 },
];

const GRAYSCALE_STOPS: [GradientStop; 2] = [
    GradientStop { position: 0.0, r: 0, g: 0, b: 0 },
    GradientStop { position: 1.0, r: 255, g: 255, b: 255 },
];

const MAGMA: Gradient = Gradient { stops: &MAGMA_STOPS, interior: (0, 0, 0) };
const INFERNO: Gradient = Gradient { stops: &INFERNO_STOPS, interior: (0, 0, 0) };
const GRAYSCALE: Gradient = Gradient { stops: &GRAYSCALE_STOPS, interior: (0, 0, 0) };

fn palette_for(id: PaletteId) -> Gradient {
    match id {
        PaletteId::Magma => MAGMA,
        PaletteId::Inferno => INFERNO,
        PaletteId::Grayscale => GRAYSCALE,
    }
}

fn gradient_interpolate(g: Gradient, t: f64) -> (u8, u8, u8) {
    let stops = g.stops;
    let t = t.clamp(0.0, 1.0);

    let first = stops[0];
    if t <= first.position {
        return (first.r, first.g, first.b);
    }
    let last = stops[stops.len() - 1];
    if t >= last.position {
        return (last.r, last.g, last.b);
    }

    // Trouver le segment contenant t
    for w in stops.windows(2) {
        let (a, b) = (w[0], w[1]);
        if t >= a.position && t <= b.position {
            let denom = b.position - a.position;
            let factor = if denom.abs() < f64::EPSILON {
                0.0
            } else {
                (t - a.position) / denom
            };
            let lerp = |u: u8, v: u8| -> u8 {
                let u = u as f64;
                let v = v as f64;
                (u + factor * (v - u)).round().clamp(0.0, 255.0) as u8
            };
            return (lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b));
        }
    }

    (last.r, last.g, last.b)
}

/// Position dans le gradient d'un point échappé, échelle logarithmique,
/// dans `[ESCAPED_FLOOR, 1]`.
pub fn escape_fraction(iteration: u32, max_iter: u32) -> f64 {
    let max = (max_iter.max(1) as f64).ln_1p();
    let frac = ((iteration as f64).ln_1p() / max).clamp(0.0, 1.0);
    ESCAPED_FLOOR + (1.0 - ESCAPED_FLOOR) * frac
}

/// Couleur RGB d'un résultat. L'intérieur (`Bounded`) a une couleur dédiée,
/// jamais atteinte par un point échappé.
pub fn color_for_result(result: EscapeResult, max_iter: u32, palette: PaletteId) -> (u8, u8, u8) {
    let gradient = palette_for(palette);
    match result {
        EscapeResult::Bounded => gradient.interior,
        EscapeResult::Escaped(n) => gradient_interpolate(gradient, escape_fraction(n, max_iter)),
    }
}

/// Colorise une carte en image d'affichage : la ligne du haut est `ymax`.
///
/// La carte stocke `ymin` en ligne 0, on retourne donc verticalement.
/// Colorisation parallélisée par lignes.
pub fn colorize(map: &ResultMap, palette: PaletteId) -> RgbImage {
    let width = map.width();
    let height = map.height();
    let max_iter = map.max_iter();
    let mut img = RgbImage::new(width, height);
    if width == 0 || height == 0 {
        return img;
    }

    let stride = width as usize * 3;
    let last_row = height as usize - 1;
    let buffer: &mut [u8] = &mut img;
    buffer
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, pixels)| {
            let Some(row) = map.row(last_row - y) else {
                return;
            };
            for (px, &result) in pixels.chunks_exact_mut(3).zip(row) {
                let (r, g, b) = color_for_result(result, max_iter, palette);
                px[0] = r;
                px[1] = g;
                px[2] = b;
            }
        });

    img
}
