use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::debug;
use num_complex::Complex64;
use rayon::prelude::*;

use crate::error::Result;
use crate::fractal::iterations::iterate_point;
use crate::fractal::{julia_params, mandelbrot_params, ComplexSample, EscapeResult, GridParams, Region, ResultMap};

/// Échantillonnage linéaire inclusif des deux bornes, comme `numpy.linspace`.
///
/// `n == 1` renvoie `[start]` ; `n == 0` renvoie un vecteur vide.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut values: Vec<f64> = (0..n).map(|k| start + k as f64 * step).collect();
            // la dernière valeur tombe exactement sur la borne
            values[n - 1] = end;
            values
        }
    }
}

/// Calcule la carte des résultats pour toute la grille.
///
/// Le calcul est parallélisé par lignes avec rayon ; chaque ligne écrit
/// dans une tranche disjointe du buffer `row * width + col`.
pub fn sample_grid(params: &GridParams) -> Result<ResultMap> {
    params.validate()?;
    let started = Instant::now();

    let (xs, ys) = axes(params);
    let mut cells = vec![EscapeResult::Bounded; params.cell_count()];

    cells
        .par_chunks_mut(params.width as usize)
        .enumerate()
        .for_each(|(i, row)| fill_row(params, &xs, ys[i], row));

    debug!(
        "{} {}x{} (max_iter={}) en {:.1} ms",
        params.mode.kind().name(),
        params.width,
        params.height,
        params.max_iter,
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(ResultMap::from_cells(params, cells))
}

/// Version annulable de `sample_grid`.
/// Retourne `Ok(None)` si `cancel` est levé avant la fin, jamais de carte partielle.
pub fn sample_grid_cancellable(params: &GridParams, cancel: &Arc<AtomicBool>) -> Result<Option<ResultMap>> {
    params.validate()?;
    if cancel.load(Ordering::Relaxed) {
        return Ok(None);
    }
    let started = Instant::now();

    let (xs, ys) = axes(params);
    let mut cells = vec![EscapeResult::Bounded; params.cell_count()];

    // Flag interne pour propager l'annulation aux threads rayon
    let cancelled = AtomicBool::new(false);

    cells
        .par_chunks_mut(params.width as usize)
        .enumerate()
        .for_each(|(i, row)| {
            if cancelled.load(Ordering::Relaxed) {
                return;
            }
            if cancel.load(Ordering::Relaxed) {
                cancelled.store(true, Ordering::Relaxed);
                return;
            }
            fill_row(params, &xs, ys[i], row);
        });

    if cancelled.load(Ordering::Relaxed) {
        debug!(
            "{} {}x{} annulé après {:.1} ms",
            params.mode.kind().name(),
            params.width,
            params.height,
            started.elapsed().as_secs_f64() * 1000.0
        );
        return Ok(None);
    }
    Ok(Some(ResultMap::from_cells(params, cells)))
}

fn axes(params: &GridParams) -> (Vec<f64>, Vec<f64>) {
    let r = &params.region;
    (
        linspace(r.xmin, r.xmax, params.width as usize),
        linspace(r.ymin, r.ymax, params.height as usize),
    )
}

#[inline]
fn fill_row(params: &GridParams, xs: &[f64], y: f64, row: &mut [EscapeResult]) {
    for (cell, &x) in row.iter_mut().zip(xs) {
        *cell = iterate_point(params.mode, Complex64::new(x, y), params.max_iter);
    }
}

/// Ensemble de Mandelbrot sur `region` (appelé une fois au démarrage).
pub fn compute_mandelbrot(region: Region, width: u32, height: u32, max_iter: u32) -> Result<ResultMap> {
    sample_grid(&mandelbrot_params(region, width, height, max_iter))
}

/// Ensemble de Julia de `c`, cadré sur `[-half_extent, half_extent]²` indépendamment de c.
pub fn compute_julia(
    c: ComplexSample,
    half_extent: f64,
    width: u32,
    height: u32,
    max_iter: u32,
) -> Result<ResultMap> {
    sample_grid(&julia_params(c, half_extent, width, height, max_iter)?)
}

pub fn compute_julia_cancellable(
    c: ComplexSample,
    half_extent: f64,
    width: u32,
    height: u32,
    max_iter: u32,
    cancel: &Arc<AtomicBool>,
) -> Result<Option<ResultMap>> {
    sample_grid_cancellable(&julia_params(c, half_extent, width, height, max_iter)?, cancel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::fractal::definitions::DEFAULT_MANDELBROT_REGION;
    use crate::fractal::SampleMode;

    #[test]
    fn test_linspace_endpoints() {
        let xs = linspace(-2.5, 1.5, 4);
        assert_eq!(xs.len(), 4);
        assert_eq!(xs[0], -2.5);
        assert_eq!(xs[3], 1.5);
        assert!((xs[1] - (-2.5 + 4.0 / 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_linspace_degenerate() {
        assert_eq!(linspace(-1.0, 1.0, 1), vec![-1.0]);
        assert!(linspace(-1.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_rejects_invalid_requests_before_computing() {
        assert!(matches!(
            compute_mandelbrot(DEFAULT_MANDELBROT_REGION, 0, 10, 50),
            Err(Error::InvalidResolution { .. })
        ));
        let inverted = Region { xmin: 1.0, xmax: -1.0, ymin: -1.0, ymax: 1.0 };
        assert!(matches!(
            compute_mandelbrot(inverted, 10, 10, 50),
            Err(Error::InvalidRegion { .. })
        ));
        assert!(matches!(
            compute_julia(Complex64::new(0.0, f64::INFINITY), 2.0, 5, 5, 10),
            Err(Error::NonFiniteParameter { .. })
        ));
    }

    #[test]
    fn test_mandelbrot_corners_escape_quickly() {
        let map = compute_mandelbrot(DEFAULT_MANDELBROT_REGION, 4, 4, 50).unwrap();
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 4);
        for (row, col) in [(0, 0), (0, 3), (3, 0), (3, 3)] {
            let count = map.get(row, col).unwrap().mandelbrot_count(50);
            assert!(count <= 5, "coin ({row}, {col}) = {count}");
        }
    }

    #[test]
    fn test_julia_origin_center_is_bounded() {
        let map = compute_julia(Complex64::new(0.0, 0.0), 2.0, 5, 5, 1000).unwrap();
        assert_eq!(map.get(2, 2), Some(EscapeResult::Bounded));
        // les coins (|z0| = 2√2) échappent au premier contrôle
        assert_eq!(map.get(0, 0), Some(EscapeResult::Escaped(0)));
    }

    #[test]
    fn test_julia_outside_mandelbrot_escapes_everywhere() {
        for size in [5, 16] {
            let map = compute_julia(Complex64::new(2.0, 2.0), 2.0, size, size, 1000).unwrap();
            assert_eq!(map.bounded_count(), 0);
            assert!(map.max_escape_iteration().unwrap() <= 8);
        }
    }

    #[test]
    fn test_row_orientation() {
        // ligne 0 = ymin, colonne 0 = xmin
        let region = Region::new(-1.0, 3.0, -3.0, 1.0).unwrap();
        let map = compute_mandelbrot(region, 2, 2, 20).unwrap();
        // (xmin, ymin) = (-1, -3) : |c| > 2
        assert_eq!(map.get(0, 0), Some(EscapeResult::Escaped(1)));
        // (xmin, ymax) = (-1, 1) : 0, -1+i, -1-i, -1+3i -> échappe au contrôle 3
        assert_eq!(map.get(1, 0), Some(EscapeResult::Escaped(3)));
    }

    #[test]
    fn test_conjugation_symmetry() {
        // pas exacts (0.5) : ys[i] == -ys[h-1-i] au bit près
        let map = compute_mandelbrot(DEFAULT_MANDELBROT_REGION, 9, 9, 100).unwrap();
        let h = map.height() as usize;
        for i in 0..h {
            assert_eq!(map.row(i), map.row(h - 1 - i), "ligne {i}");
        }
        // axe réel : cardioïde et bulbe de période 2
        assert!(map.row(4).unwrap().iter().filter(|r| r.is_bounded()).count() >= 4);
    }

    #[test]
    fn test_sampling_is_idempotent() {
        let params = GridParams {
            region: DEFAULT_MANDELBROT_REGION,
            width: 37,
            height: 23,
            max_iter: 200,
            mode: SampleMode::Mandelbrot,
        };
        assert_eq!(sample_grid(&params).unwrap(), sample_grid(&params).unwrap());
    }

    #[test]
    fn test_max_iter_one_yields_zero_or_one() {
        let map = compute_mandelbrot(DEFAULT_MANDELBROT_REGION, 16, 16, 1).unwrap();
        assert!(map.counts().iter().all(|&n| n <= 1));
    }

    #[test]
    fn test_zero_budget_is_all_bounded() {
        let map = compute_julia(Complex64::new(0.0, 0.0), 2.0, 6, 6, 0).unwrap();
        assert_eq!(map.bounded_count(), 36);
        assert!(map.counts().iter().all(|&n| n == 0));
    }

    #[test]
    fn test_single_row_grid_samples_lower_bound() {
        let region = Region::new(-0.5, 0.5, -0.1, 3.0).unwrap();
        let map = compute_mandelbrot(region, 3, 1, 100).unwrap();
        // y = ymin = -0.1, x = 0 : dans le cardioïde
        assert_eq!(map.get(0, 1), Some(EscapeResult::Bounded));
    }

    #[test]
    fn test_cancelled_request_returns_none() {
        let cancel = Arc::new(AtomicBool::new(true));
        let result = compute_julia_cancellable(Complex64::new(-0.8, 0.156), 2.0, 64, 64, 500, &cancel);
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_cancellable_matches_plain_when_not_cancelled() {
        let cancel = Arc::new(AtomicBool::new(false));
        let c = Complex64::new(-0.8, 0.156);
        let a = compute_julia_cancellable(c, 2.0, 32, 24, 300, &cancel).unwrap().unwrap();
        let b = compute_julia(c, 2.0, 32, 24, 300).unwrap();
        assert_eq!(a, b);
    }
}
