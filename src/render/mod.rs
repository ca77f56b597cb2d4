pub mod escape_time;

pub use escape_time::{
    compute_julia,
    compute_julia_cancellable,
    compute_mandelbrot,
    linspace,
    sample_grid,
    sample_grid_cancellable,
};
