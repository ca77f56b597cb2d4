use egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbImage;

use holomotion::color::{colorize, PaletteId};
use holomotion::ResultMap;

/// Convertit une RgbImage en ColorImage egui pour affichage.
pub fn rgb_image_to_color_image(img: &RgbImage) -> ColorImage {
    let size = [img.width() as usize, img.height() as usize];
    ColorImage::from_rgb(size, img.as_raw())
}

/// Colorise une carte et la charge comme texture (nearest : un texel par point).
pub fn map_texture(ctx: &Context, name: &str, map: &ResultMap, palette: PaletteId) -> TextureHandle {
    let img = colorize(map, palette);
    ctx.load_texture(name, rgb_image_to_color_image(&img), TextureOptions::NEAREST)
}
