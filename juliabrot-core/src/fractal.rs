use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::escape::{escape_time, PixelResult};

/// Which quadratic family is being rendered.
///
/// Both modes iterate `z ← z² + c`; they differ only in which operand comes
/// from the pixel. In Mandelbrot mode the pixel is `c` and `z₀ = 0`; in Julia
/// mode `c` is the fixed seed and the pixel is `z₀`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FractalMode {
    #[default]
    Mandelbrot,
    Julia { seed: Complex },
}

impl FractalMode {
    /// Iterate the mapped pixel `point` under this mode.
    #[inline]
    pub fn evaluate(&self, point: Complex, max_iterations: u32) -> PixelResult {
        match *self {
            Self::Mandelbrot => escape_time(Complex::ZERO, point, max_iterations),
            Self::Julia { seed } => escape_time(point, seed, max_iterations),
        }
    }

    pub fn is_julia(&self) -> bool {
        matches!(self, Self::Julia { .. })
    }

    /// The Julia seed, if any.
    pub fn seed(&self) -> Option<Complex> {
        match *self {
            Self::Mandelbrot => None,
            Self::Julia { seed } => Some(seed),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Mandelbrot => "Mandelbrot",
            Self::Julia { .. } => "Julia",
        }
    }
}
