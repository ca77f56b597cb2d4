use crate::fractal::definitions::ESCAPE_RADIUS_SQR;
use crate::fractal::types::{ComplexSample, EscapeResult, SampleMode};

/// Itère `z <- z² + c` depuis `z0` et renvoie le contrôle où |z| > 2.
///
/// Le contrôle précède la mise à jour : `Escaped(0)` signifie que |z0| > 2.
/// Après `max_iter` contrôles sans échappement, renvoie `Bounded`.
#[inline]
pub fn escape_time(c: ComplexSample, z0: ComplexSample, max_iter: u32) -> EscapeResult {
    let mut z = z0;
    for n in 0..max_iter {
        // négation plutôt que `>` : un |z|² NaN compte comme échappé
        if !(z.norm_sqr() <= ESCAPE_RADIUS_SQR) {
            return EscapeResult::Escaped(n);
        }
        z = z * z + c;
    }
    EscapeResult::Bounded
}

/// Calcule le résultat d'un point de grille selon la convention du mode.
#[inline]
pub fn iterate_point(mode: SampleMode, sample: ComplexSample, max_iter: u32) -> EscapeResult {
    let (c, z0) = mode.seed_for(sample);
    escape_time(c, z0, max_iter)
}

/// Appartenance de `c` à M : orbite de 0, `max_iter` si pas d'échappement.
pub fn mandelbrot(c: ComplexSample, max_iter: u32) -> u32 {
    escape_time(c, ComplexSample::new(0.0, 0.0), max_iter).mandelbrot_count(max_iter)
}

/// Vitesse d'échappement de `z` sous `z² + c`, `None` s'il reste borné.
pub fn julia_boundary(c: ComplexSample, z: ComplexSample, max_iter: u32) -> Option<u32> {
    escape_time(c, z, max_iter).escape_iteration()
}
