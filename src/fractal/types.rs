use num_complex::Complex64;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Point du plan complexe, utilisé à la fois comme paramètre `c` et comme itéré `z`.
pub type ComplexSample = Complex64;

/// Famille de fractale rendue par le viewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FractalKind {
    Mandelbrot,
    Julia,
}

impl FractalKind {
    pub fn name(self) -> &'static str {
        match self {
            FractalKind::Mandelbrot => "Mandelbrot",
            FractalKind::Julia => "Julia",
        }
    }
}

/// Convention d'appel de l'évaluateur pour une grille.
///
/// - `Mandelbrot` : z0 = 0, c = point échantillonné.
/// - `Julia { c }` : z0 = point échantillonné, c fixé.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleMode {
    Mandelbrot,
    Julia { c: ComplexSample },
}

impl SampleMode {
    pub fn kind(self) -> FractalKind {
        match self {
            SampleMode::Mandelbrot => FractalKind::Mandelbrot,
            SampleMode::Julia { .. } => FractalKind::Julia,
        }
    }

    /// Couple (c, z0) à itérer pour le point échantillonné.
    #[inline]
    pub fn seed_for(self, sample: ComplexSample) -> (ComplexSample, ComplexSample) {
        match self {
            SampleMode::Mandelbrot => (sample, Complex64::new(0.0, 0.0)),
            SampleMode::Julia { c } => (c, sample),
        }
    }
}

/// Rectangle du plan complexe. Bornes finies, `xmin < xmax`, `ymin < ymax`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Region {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Region {
    pub fn new(xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Result<Self> {
        let region = Region { xmin, xmax, ymin, ymax };
        region.validate()?;
        Ok(region)
    }

    /// Carré `[-h, h] x [-h, h]` centré sur l'origine.
    pub fn centered(half_extent: f64) -> Result<Self> {
        if !half_extent.is_finite() || half_extent <= 0.0 {
            return Err(Error::InvalidHalfExtent(half_extent));
        }
        Region::new(-half_extent, half_extent, -half_extent, half_extent)
    }

    /// Les champs sont publics (désérialisation), d'où une validation séparée.
    pub fn validate(&self) -> Result<()> {
        let finite = [self.xmin, self.xmax, self.ymin, self.ymax]
            .iter()
            .all(|v| v.is_finite());
        // `!(a < b)` rejette aussi les NaN
        if !finite || !(self.xmin < self.xmax) || !(self.ymin < self.ymax) {
            return Err(Error::InvalidRegion {
                xmin: self.xmin,
                xmax: self.xmax,
                ymin: self.ymin,
                ymax: self.ymax,
            });
        }
        Ok(())
    }

    pub fn span_x(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn span_y(&self) -> f64 {
        self.ymax - self.ymin
    }

    pub fn center(&self) -> ComplexSample {
        Complex64::new((self.xmin + self.xmax) / 2.0, (self.ymin + self.ymax) / 2.0)
    }

    /// Inclusif sur les quatre bords.
    pub fn contains(&self, point: ComplexSample) -> bool {
        point.re >= self.xmin && point.re <= self.xmax && point.im >= self.ymin && point.im <= self.ymax
    }
}

/// Requête d'échantillonnage complète : région, résolution, budget et mode.
#[derive(Clone, Debug, PartialEq)]
pub struct GridParams {
    pub region: Region,
    pub width: u32,
    pub height: u32,
    pub max_iter: u32,
    pub mode: SampleMode,
}

impl GridParams {
    /// Vérifie le contrat avant tout calcul.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidResolution {
                width: self.width,
                height: self.height,
            });
        }
        self.region.validate()?;
        if let SampleMode::Julia { c } = self.mode {
            if !c.re.is_finite() || !c.im.is_finite() {
                return Err(Error::NonFiniteParameter { re: c.re, im: c.im });
            }
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Résultat d'une orbite.
///
/// `Escaped(n)` : |z| a dépassé 2 au contrôle numéro n (0 = dès le départ).
/// `Bounded` : le budget a été épuisé sans échappement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EscapeResult {
    Escaped(u32),
    Bounded,
}

impl EscapeResult {
    /// Convention Mandelbrot : `max_iter` pour les points non échappés.
    #[inline]
    pub fn mandelbrot_count(self, max_iter: u32) -> u32 {
        match self {
            EscapeResult::Escaped(n) => n,
            EscapeResult::Bounded => max_iter,
        }
    }

    /// Convention frontière de Julia : `None` pour les points non échappés.
    #[inline]
    pub fn escape_iteration(self) -> Option<u32> {
        match self {
            EscapeResult::Escaped(n) => Some(n),
            EscapeResult::Bounded => None,
        }
    }

    pub fn is_bounded(self) -> bool {
        self == EscapeResult::Bounded
    }
}

/// Carte dense `height x width` des résultats, row-major.
///
/// La ligne `i` échantillonne `ys[i]` (ligne 0 = `ymin`), la colonne `j`
/// échantillonne `xs[j]` (colonne 0 = `xmin`). Immuable une fois construite.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultMap {
    width: u32,
    height: u32,
    max_iter: u32,
    region: Region,
    cells: Vec<EscapeResult>,
}

impl ResultMap {
    pub(crate) fn from_cells(params: &GridParams, cells: Vec<EscapeResult>) -> Self {
        debug_assert_eq!(cells.len(), params.cell_count());
        Self {
            width: params.width,
            height: params.height,
            max_iter: params.max_iter,
            region: params.region,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn cells(&self) -> &[EscapeResult] {
        &self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Option<EscapeResult> {
        if row >= self.height as usize || col >= self.width as usize {
            return None;
        }
        self.cells.get(row * self.width as usize + col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[EscapeResult]> {
        let w = self.width as usize;
        if row >= self.height as usize {
            return None;
        }
        Some(&self.cells[row * w..(row + 1) * w])
    }

    /// Comptes d'itérations façon Mandelbrot (`max_iter` pour l'intérieur).
    pub fn counts(&self) -> Vec<u32> {
        self.cells
            .iter()
            .map(|r| r.mandelbrot_count(self.max_iter))
            .collect()
    }

    pub fn bounded_count(&self) -> usize {
        self.cells.iter().filter(|r| r.is_bounded()).count()
    }

    /// Plus grand nombre d'itérations parmi les points échappés.
    pub fn max_escape_iteration(&self) -> Option<u32> {
        self.cells.iter().filter_map(|r| r.escape_iteration()).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_rejects_inverted_bounds() {
        assert!(Region::new(1.0, -1.0, -1.0, 1.0).is_err());
        assert!(Region::new(-1.0, 1.0, 1.0, 1.0).is_err());
        assert!(Region::new(f64::NAN, 1.0, -1.0, 1.0).is_err());
        assert!(Region::new(-1.0, f64::INFINITY, -1.0, 1.0).is_err());
        assert!(Region::new(-2.5, 1.5, -2.0, 2.0).is_ok());
    }

    #[test]
    fn test_region_centered() {
        let r = Region::centered(2.0).unwrap();
        assert_eq!(r, Region { xmin: -2.0, xmax: 2.0, ymin: -2.0, ymax: 2.0 });
        assert_eq!(r.center(), Complex64::new(0.0, 0.0));
        assert!(matches!(Region::centered(0.0), Err(Error::InvalidHalfExtent(_))));
        assert!(Region::centered(-1.0).is_err());
    }

    #[test]
    fn test_region_contains_is_inclusive() {
        let r = Region::new(-2.5, 1.5, -2.0, 2.0).unwrap();
        assert!(r.contains(Complex64::new(-2.5, 2.0)));
        assert!(r.contains(Complex64::new(0.0, 0.0)));
        assert!(!r.contains(Complex64::new(1.6, 0.0)));
        assert!(!r.contains(Complex64::new(0.0, f64::NAN)));
    }

    #[test]
    fn test_grid_params_validation() {
        let region = Region::centered(2.0).unwrap();
        let mut params = GridParams {
            region,
            width: 0,
            height: 4,
            max_iter: 10,
            mode: SampleMode::Mandelbrot,
        };
        assert!(matches!(params.validate(), Err(Error::InvalidResolution { .. })));
        params.width = 4;
        assert!(params.validate().is_ok());
        params.mode = SampleMode::Julia { c: Complex64::new(f64::NAN, 0.0) };
        assert!(matches!(params.validate(), Err(Error::NonFiniteParameter { .. })));
    }

    #[test]
    fn test_escape_result_conventions() {
        assert_eq!(EscapeResult::Escaped(0).mandelbrot_count(50), 0);
        assert_eq!(EscapeResult::Bounded.mandelbrot_count(50), 50);
        assert_eq!(EscapeResult::Escaped(0).escape_iteration(), Some(0));
        assert_eq!(EscapeResult::Bounded.escape_iteration(), None);
        assert_ne!(EscapeResult::Escaped(0), EscapeResult::Bounded);
    }

    #[test]
    fn test_seed_for_modes() {
        let p = Complex64::new(0.3, -0.2);
        let c = Complex64::new(-0.8, 0.156);
        assert_eq!(SampleMode::Mandelbrot.seed_for(p), (p, Complex64::new(0.0, 0.0)));
        assert_eq!(SampleMode::Julia { c }.seed_for(p), (c, p));
    }

    #[test]
    fn test_mode_kind_names() {
        assert_eq!(SampleMode::Mandelbrot.kind().name(), "Mandelbrot");
        let julia = SampleMode::Julia { c: Complex64::new(0.3, 0.5) };
        assert_eq!(julia.kind(), FractalKind::Julia);
        assert_eq!(julia.kind().name(), "Julia");
    }

    #[test]
    fn test_region_center() {
        let r = Region::new(-2.5, 1.5, -2.0, 2.0).unwrap();
        assert_eq!(r.center(), Complex64::new(-0.5, 0.0));
        assert_eq!(r.span_x(), 4.0);
    }
}
