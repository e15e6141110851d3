use serde::{Deserialize, Serialize};

use crate::complex::Complex;
use crate::error::CoreError;

/// Real × imaginary span shown by the default Mandelbrot view.
const MANDELBROT_SPAN: (f64, f64) = (3.6, 2.6);
/// Side of the square region shown by the default Julia view.
const JULIA_SPAN: f64 = 4.2;

/// Defines the visible region of the complex plane and the iteration budget
/// used to render it.
///
/// The viewport is centred on `center`; `scale` is the number of pixels per
/// complex-plane unit, so larger scales show a smaller region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Centre of the viewport in the complex plane.
    pub center: Complex,

    /// Pixels per complex-plane unit.
    pub scale: f64,

    /// Viewport width in pixels.
    pub width: u32,

    /// Viewport height in pixels.
    pub height: u32,

    /// Iteration limit; a pixel reaching it is considered in the set.
    pub max_iterations: u32,
}

impl Viewport {
    /// Default view: centred on the Mandelbrot set with the full set visible.
    ///
    /// The set fits in roughly `[-2.0, 0.47] × [-1.12, 1.12]`; the chosen
    /// scale keeps a `3.6 × 2.6` region visible whatever the aspect ratio.
    pub fn default_mandelbrot(width: u32, height: u32, max_iterations: u32) -> Self {
        let (span_re, span_im) = MANDELBROT_SPAN;
        Self {
            center: Complex::new(-0.75, 0.0),
            scale: fit_scale(width, height, span_re, span_im),
            width,
            height,
            max_iterations,
        }
    }

    /// Default view for Julia sets, centred on the origin.
    ///
    /// Julia sets of the quadratic family lie within `|z| <= 2`, so a square
    /// of side 4.2 around the origin always contains the whole set.
    pub fn default_julia(width: u32, height: u32, max_iterations: u32) -> Self {
        Self {
            center: Complex::ZERO,
            scale: fit_scale(width, height, JULIA_SPAN, JULIA_SPAN),
            width,
            height,
            max_iterations,
        }
    }

    /// Create a viewport with explicit parameters.
    pub fn new(
        center: Complex,
        scale: f64,
        width: u32,
        height: u32,
        max_iterations: u32,
    ) -> crate::Result<Self> {
        let viewport = Self {
            center,
            scale,
            width,
            height,
            max_iterations,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Check every invariant a renderable viewport must hold.
    pub fn validate(&self) -> crate::Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CoreError::InvalidViewport {
                reason: format!("dimensions must be > 0, got {}×{}", self.width, self.height),
            });
        }
        if self.scale <= 0.0 || !self.scale.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("scale must be positive and finite, got {}", self.scale),
            });
        }
        if !self.center.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("center must be finite, got {}", self.center),
            });
        }
        if !self.complex_width().is_finite() || !self.complex_height().is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("scale {} is too small to map pixels", self.scale),
            });
        }
        if self.max_iterations == 0 {
            return Err(CoreError::InvalidMaxIterations(self.max_iterations));
        }
        Ok(())
    }

    /// Map a pixel coordinate to a point on the complex plane.
    ///
    /// `(0, 0)` is the top-left pixel. Pixel rows grow downward while the
    /// imaginary axis grows upward, so `py` is subtracted.
    #[inline]
    pub fn pixel_to_complex(&self, px: u32, py: u32) -> Complex {
        self.subpixel_to_complex(px as f64, py as f64)
    }

    /// Map fractional pixel coordinates to a complex-plane point.
    ///
    /// Used for mouse positions and the centre of selection rectangles.
    #[inline]
    pub fn subpixel_to_complex(&self, px: f64, py: f64) -> Complex {
        let w = self.width as f64;
        let h = self.height as f64;
        Complex::new(
            self.center.re - w / (2.0 * self.scale) + px / self.scale,
            self.center.im + h / (2.0 * self.scale) - py / self.scale,
        )
    }

    /// Inverse of [`subpixel_to_complex`](Self::subpixel_to_complex).
    ///
    /// Returns fractional pixel coordinates; exact up to rounding.
    pub fn complex_to_pixel(&self, point: Complex) -> (f64, f64) {
        let w = self.width as f64;
        let h = self.height as f64;
        (
            (point.re - self.center.re + w / (2.0 * self.scale)) * self.scale,
            (self.center.im + h / (2.0 * self.scale) - point.im) * self.scale,
        )
    }

    /// The aspect ratio of the viewport (width / height).
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Visible extent along the real axis, in complex-plane units.
    pub fn complex_width(&self) -> f64 {
        self.width as f64 / self.scale
    }

    /// Visible extent along the imaginary axis, in complex-plane units.
    pub fn complex_height(&self) -> f64 {
        self.height as f64 / self.scale
    }

    /// Copy with the centre moved by the given complex-plane offsets.
    pub fn offset(&self, d_re: f64, d_im: f64) -> crate::Result<Self> {
        let moved = Self {
            center: Complex::new(self.center.re + d_re, self.center.im + d_im),
            ..*self
        };
        moved.validate()?;
        Ok(moved)
    }

    /// Copy with the scale multiplied by `factor` around the same centre.
    pub fn zoomed(&self, factor: f64) -> crate::Result<Self> {
        let zoomed = Self {
            scale: self.scale * factor,
            ..*self
        };
        zoomed.validate()?;
        Ok(zoomed)
    }
}

/// Largest pixels-per-unit scale that still shows `span_re × span_im`.
fn fit_scale(width: u32, height: u32, span_re: f64, span_im: f64) -> f64 {
    (width as f64 / span_re).min(height as f64 / span_im)
}
