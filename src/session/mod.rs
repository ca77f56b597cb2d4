//! Session interactive : le paramètre c suit le pointeur sur le panneau
//! Mandelbrot et chaque changement relance le calcul de Julia.

pub mod worker;

use std::time::Duration;

use log::{trace, warn};
use num_complex::Complex64;

use crate::config::ViewerConfig;
use crate::error::Result;
use crate::fractal::definitions::DEFAULT_PARAMETER;
use crate::fractal::{ComplexSample, Region, ResultMap, SampleMode};

pub use worker::{CompletedRender, GridWorker, RenderMessage};

/// Événement pointeur, déjà converti en coordonnées du plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down(ComplexSample),
    Move(ComplexSample),
}

impl PointerEvent {
    pub fn position(self) -> ComplexSample {
        match self {
            PointerEvent::Down(p) | PointerEvent::Move(p) => p,
        }
    }
}

/// Ce qui a changé depuis le dernier `update`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameUpdate {
    pub mandelbrot: bool,
    pub julia: bool,
}

/// État du viewer : c courant, dernières cartes reçues et workers.
pub struct Explorer {
    config: ViewerConfig,
    parameter: ComplexSample,
    mandelbrot: Option<ResultMap>,
    julia: Option<ResultMap>,
    /// c de la carte Julia affichée (peut retarder sur `parameter`).
    julia_parameter: Option<ComplexSample>,
    mandelbrot_worker: GridWorker,
    julia_worker: GridWorker,
    last_julia_time: Option<Duration>,
    last_mandelbrot_time: Option<Duration>,
}

impl Explorer {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            parameter: DEFAULT_PARAMETER,
            mandelbrot: None,
            julia: None,
            julia_parameter: None,
            mandelbrot_worker: GridWorker::new("mandelbrot"),
            julia_worker: GridWorker::new("julia"),
            last_julia_time: None,
            last_mandelbrot_time: None,
        })
    }

    /// Lance le rendu Mandelbrot (une seule fois) et le Julia du c courant.
    pub fn start(&mut self) -> Result<()> {
        self.mandelbrot_worker.submit(self.config.mandelbrot_params());
        self.submit_julia()
    }

    pub fn parameter(&self) -> ComplexSample {
        self.parameter
    }

    pub fn julia_parameter(&self) -> Option<ComplexSample> {
        self.julia_parameter
    }

    pub fn mandelbrot(&self) -> Option<&ResultMap> {
        self.mandelbrot.as_ref()
    }

    pub fn julia(&self) -> Option<&ResultMap> {
        self.julia.as_ref()
    }

    pub fn last_mandelbrot_time(&self) -> Option<Duration> {
        self.last_mandelbrot_time
    }

    pub fn last_julia_time(&self) -> Option<Duration> {
        self.last_julia_time
    }

    pub fn is_busy(&self) -> bool {
        self.mandelbrot_worker.is_busy() || self.julia_worker.is_busy()
    }

    /// Zone de saisie du paramètre : la région Mandelbrot.
    pub fn input_region(&self) -> Region {
        self.config.mandelbrot_region
    }

    /// Applique un événement pointeur. Renvoie `true` si un nouveau calcul Julia
    /// a été lancé ; un point hors de la région est ignoré.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<bool> {
        let position = event.position();
        if !self.input_region().contains(position) {
            trace!("pointeur ignoré hors région: {:?}", event);
            return Ok(false);
        }
        if position == self.parameter && self.julia_worker.is_busy() {
            return Ok(false);
        }
        self.parameter = position;
        self.submit_julia()?;
        Ok(true)
    }

    /// Convertit une position pixel du panneau Mandelbrot en point du plan.
    /// Le haut du panneau correspond à `ymax`.
    pub fn plane_from_pixel(&self, pixel_x: f32, pixel_y: f32, view_width: f32, view_height: f32) -> ComplexSample {
        let region = self.input_region();
        let x_ratio = pixel_x as f64 / view_width as f64;
        let y_ratio = pixel_y as f64 / view_height as f64;
        Complex64::new(
            region.xmin + x_ratio * region.span_x(),
            region.ymax - y_ratio * region.span_y(), // Inverser Y
        )
    }

    /// Récupère les cartes terminées. À appeler à chaque frame.
    pub fn update(&mut self) -> FrameUpdate {
        let mut changed = FrameUpdate::default();
        if let Some(result) = self.mandelbrot_worker.poll() {
            changed.mandelbrot = self.accept_mandelbrot(result);
        }
        if let Some(result) = self.julia_worker.poll() {
            changed.julia = self.accept_julia(result);
        }
        changed
    }

    /// Attend la fin des rendus en cours.
    pub fn wait_idle(&mut self) -> FrameUpdate {
        let mut changed = FrameUpdate::default();
        while self.mandelbrot_worker.is_busy() {
            if let Some(result) = self.mandelbrot_worker.wait() {
                changed.mandelbrot |= self.accept_mandelbrot(result);
            }
        }
        while self.julia_worker.is_busy() {
            if let Some(result) = self.julia_worker.wait() {
                changed.julia |= self.accept_julia(result);
            }
        }
        changed
    }

    fn submit_julia(&mut self) -> Result<()> {
        let params = self.config.julia_params(self.parameter)?;
        self.julia_worker.submit(params);
        Ok(())
    }

    fn accept_mandelbrot(&mut self, result: Result<CompletedRender>) -> bool {
        match result {
            Ok(done) => {
                self.last_mandelbrot_time = Some(done.elapsed);
                self.mandelbrot = Some(done.map);
                true
            }
            Err(e) => {
                warn!("rendu Mandelbrot impossible: {}", e);
                false
            }
        }
    }

    fn accept_julia(&mut self, result: Result<CompletedRender>) -> bool {
        match result {
            Ok(done) => {
                self.last_julia_time = Some(done.elapsed);
                if let SampleMode::Julia { c } = done.params.mode {
                    self.julia_parameter = Some(c);
                }
                self.julia = Some(done.map);
                true
            }
            Err(e) => {
                warn!("rendu Julia impossible: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fractal::EscapeResult;

    fn small_config() -> ViewerConfig {
        ViewerConfig {
            width: 21,
            height: 21,
            mandelbrot_iterations: 200,
            julia_iterations: 200,
            ..ViewerConfig::default()
        }
    }

    #[test]
    fn test_startup_renders_both_panels() {
        let mut explorer = Explorer::new(small_config()).unwrap();
        explorer.start().unwrap();
        let changed = explorer.wait_idle();
        assert!(changed.mandelbrot && changed.julia);
        assert!(!explorer.is_busy());
        assert_eq!(explorer.julia_parameter(), Some(Complex64::new(0.0, 0.0)));
        // c = 0 : disque unité, le centre ne s'échappe pas
        assert_eq!(explorer.julia().unwrap().get(10, 10), Some(EscapeResult::Bounded));
    }

    #[test]
    fn test_pointer_inside_region_updates_parameter() {
        let mut explorer = Explorer::new(small_config()).unwrap();
        explorer.start().unwrap();
        let c = Complex64::new(-0.8, 0.156);
        assert!(explorer.handle_pointer(PointerEvent::Move(c)).unwrap());
        assert_eq!(explorer.parameter(), c);
        explorer.wait_idle();
        assert_eq!(explorer.julia_parameter(), Some(c));
    }

    #[test]
    fn test_pointer_down_inside_region_renders_julia() {
        let mut explorer = Explorer::new(small_config()).unwrap();
        explorer.start().unwrap();
        explorer.wait_idle();
        let c = Complex64::new(0.285, 0.01);
        assert!(explorer.handle_pointer(PointerEvent::Down(c)).unwrap());
        assert!(explorer.is_busy());
        assert_eq!(explorer.parameter(), c);
        let changed = explorer.wait_idle();
        assert!(changed.julia && !changed.mandelbrot);
        assert_eq!(explorer.julia_parameter(), Some(c));
        assert_eq!(explorer.julia().unwrap().region(), Region::centered(2.0).unwrap());
    }

    #[test]
    fn test_pointer_outside_region_is_ignored() {
        let mut explorer = Explorer::new(small_config()).unwrap();
        let before = explorer.parameter();
        let outside = Complex64::new(3.0, 0.0);
        assert!(!explorer.handle_pointer(PointerEvent::Down(outside)).unwrap());
        assert!(!explorer.handle_pointer(PointerEvent::Move(Complex64::new(f64::NAN, 0.0))).unwrap());
        assert_eq!(explorer.parameter(), before);
        assert!(!explorer.is_busy());
    }

    #[test]
    fn test_fast_moves_keep_only_latest() {
        let mut explorer = Explorer::new(small_config()).unwrap();
        let mut last = DEFAULT_PARAMETER;
        for k in 0..10 {
            last = Complex64::new(-1.0 + 0.1 * k as f64, 0.2);
            explorer.handle_pointer(PointerEvent::Move(last)).unwrap();
        }
        explorer.wait_idle();
        assert_eq!(explorer.julia_parameter(), Some(last));
    }

    #[test]
    fn test_plane_from_pixel_corners() {
        let explorer = Explorer::new(ViewerConfig::default()).unwrap();
        assert_eq!(explorer.plane_from_pixel(0.0, 0.0, 400.0, 400.0), Complex64::new(-2.5, 2.0));
        assert_eq!(explorer.plane_from_pixel(400.0, 400.0, 400.0, 400.0), Complex64::new(1.5, -2.0));
        assert_eq!(explorer.plane_from_pixel(200.0, 200.0, 400.0, 400.0), Complex64::new(-0.5, 0.0));
    }
}
