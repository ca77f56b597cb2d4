use egui::{Context, TextureHandle};
use log::warn;

use holomotion::color::PaletteId;
use holomotion::config::ViewerConfig;
use holomotion::session::{Explorer, PointerEvent};
use holomotion::Result;

use crate::gui::texture::map_texture;

/// Application egui : Mandelbrot à gauche, Julia du c courant à droite.
pub struct HolomotionApp {
    explorer: Explorer,
    palette: PaletteId,

    // Textures egui pour l'affichage
    mandelbrot_texture: Option<TextureHandle>,
    julia_texture: Option<TextureHandle>,

    // Dernière position pointeur traitée (évite de relancer Julia sans mouvement)
    last_pointer: Option<egui::Pos2>,
}

impl HolomotionApp {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let palette = config.palette_id()?;
        let mut explorer = Explorer::new(config)?;
        // Mandelbrot une seule fois au démarrage, Julia pour c = 0
        explorer.start()?;
        Ok(Self {
            explorer,
            palette,
            mandelbrot_texture: None,
            julia_texture: None,
            last_pointer: None,
        })
    }

    fn refresh_mandelbrot(&mut self, ctx: &Context) {
        if let Some(map) = self.explorer.mandelbrot() {
            self.mandelbrot_texture = Some(map_texture(ctx, "mandelbrot", map, self.palette));
        }
    }

    fn refresh_julia(&mut self, ctx: &Context) {
        if let Some(map) = self.explorer.julia() {
            self.julia_texture = Some(map_texture(ctx, "julia", map, self.palette));
        }
    }

    /// Traduit le survol / clic du panneau Mandelbrot en événement pointeur.
    fn handle_mandelbrot_input(&mut self, ctx: &Context, response: &egui::Response) {
        let Some(pos) = response.hover_pos() else {
            return;
        };
        let pressed = ctx.input(|i| i.pointer.primary_pressed());
        if !pressed && self.last_pointer == Some(pos) {
            return;
        }
        self.last_pointer = Some(pos);

        let rect = response.rect;
        let local = pos - rect.min;
        let point = self
            .explorer
            .plane_from_pixel(local.x, local.y, rect.width(), rect.height());
        let event = if pressed {
            PointerEvent::Down(point)
        } else {
            PointerEvent::Move(point)
        };
        if let Err(e) = self.explorer.handle_pointer(event) {
            warn!("événement pointeur rejeté: {}", e);
        }
    }
}

impl eframe::App for HolomotionApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        // Récupérer les grilles terminées
        let changed = self.explorer.update();
        if changed.mandelbrot {
            self.refresh_mandelbrot(ctx);
        }
        if changed.julia {
            self.refresh_julia(ctx);
        }

        // P pour cycle palette
        if ctx.input(|i| i.key_pressed(egui::Key::P)) {
            self.palette = self.palette.next();
            self.refresh_mandelbrot(ctx);
            self.refresh_julia(ctx);
        }

        // Barre d'état en bas
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let c = self.explorer.parameter();
                ui.label(format!("c = {:.6} {:+.6}i", c.re, c.im));
                ui.separator();
                ui.label(format!("Palette: {}", self.palette.name()));
                if let Some(time) = self.explorer.last_mandelbrot_time() {
                    ui.separator();
                    ui.label(format!("Mandelbrot: {:.0} ms", time.as_secs_f64() * 1000.0));
                }
                if let Some(time) = self.explorer.last_julia_time() {
                    ui.separator();
                    ui.label(format!("Julia: {:.0} ms", time.as_secs_f64() * 1000.0));
                }
                if self.explorer.is_busy() {
                    ui.separator();
                    ui.spinner();
                }
            });
        });

        // Les deux panneaux côte à côte, carrés
        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let side = (available.x / 2.0 - ui.spacing().item_spacing.x).min(available.y).max(1.0);
            let size = egui::vec2(side, side);

            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label("Ensemble de Mandelbrot");
                    match self.mandelbrot_texture.clone() {
                        Some(texture) => {
                            let response = ui.add(
                                egui::Image::new(&texture)
                                    .fit_to_exact_size(size)
                                    .sense(egui::Sense::click_and_drag()),
                            );
                            self.handle_mandelbrot_input(ctx, &response);
                        }
                        None => {
                            ui.spinner();
                        }
                    }
                });

                ui.vertical(|ui| {
                    match self.explorer.julia_parameter() {
                        Some(c) => ui.label(format!("Ensemble de Julia pour c = {:.4} {:+.4}i", c.re, c.im)),
                        None => ui.label("Ensemble de Julia"),
                    };
                    match &self.julia_texture {
                        Some(texture) => {
                            ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                        }
                        None => {
                            ui.spinner();
                        }
                    }
                });
            });
        });

        if self.explorer.is_busy() {
            ctx.request_repaint();
        }
    }
}
