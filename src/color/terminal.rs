//! Rendu caractère pour l'aperçu en ligne de commande.

use crate::color::palettes::escape_fraction;
use crate::fractal::{EscapeResult, ResultMap};

/// Rampe des points échappés, du plus rapide au plus lent.
const RAMP: &[char] = &[' ', '.', ',', ':', ';', '-', '=', '+', '*', '%'];
/// Glyphe réservé aux points non échappés.
pub const INTERIOR_GLYPH: char = '@';

pub fn shade(result: EscapeResult, max_iter: u32) -> char {
    match result {
        EscapeResult::Bounded => INTERIOR_GLYPH,
        EscapeResult::Escaped(n) => {
            let last = RAMP.len() - 1;
            // escape_fraction vit dans [floor, 1], on le ramène sur [0, 1]
            let t = (escape_fraction(n, max_iter) - escape_fraction(0, max_iter))
                / (1.0 - escape_fraction(0, max_iter));
            RAMP[((t * last as f64).round() as usize).min(last)]
        }
    }
}

/// Aperçu texte de `cols` colonnes, `ymax` en haut.
///
/// Les cellules de terminal étant environ deux fois plus hautes que larges,
/// on garde une ligne sur deux du ratio de la carte.
pub fn preview(map: &ResultMap, cols: usize) -> String {
    let width = map.width() as usize;
    let height = map.height() as usize;
    if width == 0 || height == 0 || cols == 0 {
        return String::new();
    }
    let cols = cols.min(width);
    let rows = ((cols * height) / (width * 2)).clamp(1, height);

    let mut out = String::with_capacity((cols + 1) * rows);
    for line in 0..rows {
        // nearest-neighbor, ligne 0 du texte = dernière ligne de la carte
        let src_row = height - 1 - (line * height / rows).min(height - 1);
        for col in 0..cols {
            let src_col = (col * width / cols).min(width - 1);
            if let Some(result) = map.get(src_row, src_col) {
                out.push(shade(result, map.max_iter()));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::definitions::DEFAULT_MANDELBROT_REGION;
    use crate::render::{compute_julia, compute_mandelbrot};
    use num_complex::Complex64;

    #[test]
    fn test_shade_extremes() {
        assert_eq!(shade(EscapeResult::Bounded, 100), INTERIOR_GLYPH);
        assert_eq!(shade(EscapeResult::Escaped(0), 100), ' ');
        assert_eq!(shade(EscapeResult::Escaped(99), 100), '%');
    }

    #[test]
    fn test_preview_shape() {
        let map = compute_mandelbrot(DEFAULT_MANDELBROT_REGION, 80, 80, 100).unwrap();
        let text = preview(&map, 40);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|l| l.chars().count() == 40));
        assert!(text.contains(INTERIOR_GLYPH));
    }

    #[test]
    fn test_preview_of_dust_has_no_interior() {
        let map = compute_julia(Complex64::new(2.0, 2.0), 2.0, 32, 32, 200).unwrap();
        assert!(!preview(&map, 32).contains(INTERIOR_GLYPH));
    }
}
