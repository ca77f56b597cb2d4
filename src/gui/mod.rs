mod app;
mod texture;

pub use app::HolomotionApp;
