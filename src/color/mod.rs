pub mod palettes;
pub mod terminal;

pub use palettes::{color_for_result, colorize, PaletteId};
