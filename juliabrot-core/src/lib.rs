pub mod complex;
pub mod error;
pub mod escape;
pub mod fractal;
pub mod viewport;

// Re-export primary types for convenience.
pub use complex::Complex;
pub use error::CoreError;
pub use escape::{escape_time, PixelResult, BAILOUT_NORM_SQ};
pub use fractal::FractalMode;
pub use viewport::Viewport;

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
