pub mod types;
pub mod definitions;
pub mod iterations;

pub use types::{ComplexSample, EscapeResult, FractalKind, GridParams, Region, ResultMap, SampleMode};
pub use definitions::{julia_params, mandelbrot_params};
pub use iterations::{escape_time, julia_boundary, mandelbrot};
