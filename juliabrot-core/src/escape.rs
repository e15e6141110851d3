use crate::complex::Complex;

/// `|z|²` at or beyond which an orbit has escaped (escape radius 2).
pub const BAILOUT_NORM_SQ: f64 = 4.0;

/// The result of iterating a single point.
///
/// `iterations == max_iterations` is the in-set sentinel; any smaller value is
/// the zero-based index of the step at which the orbit escaped. `magnitude` is
/// `|z|` of the last computed value and feeds the smooth coloring formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelResult {
    pub iterations: u32,
    pub magnitude: f64,
}

impl PixelResult {
    #[inline]
    pub fn new(iterations: u32, magnitude: f64) -> Self {
        Self {
            iterations,
            magnitude,
        }
    }

    /// Whether the point is treated as inside the set for `max_iterations`.
    #[inline]
    pub fn is_interior(&self, max_iterations: u32) -> bool {
        self.iterations >= max_iterations
    }
}

/// Run the escape-time iteration `z ← z² + c` starting from `z0`.
///
/// Stops when `|z|² >= 4` (escape), when `max_iterations` steps have been
/// taken without escaping, or when a step reproduces the previous `z`
/// bit-for-bit. The last case is a period-1 cycle and is reported as
/// interior straight away.
///
/// The fixed-point check is an approximation: longer cycles are not
/// detected and simply run to `max_iterations`.
pub fn escape_time(z0: Complex, c: Complex, max_iterations: u32) -> PixelResult {
    let mut z = z0;
    let mut norm_sq = z.norm_sq();
    if norm_sq >= BAILOUT_NORM_SQ {
        return PixelResult::new(0, norm_sq.sqrt());
    }

    for n in 0..max_iterations {
        let next = z.square_add(c);
        norm_sq = next.norm_sq();
        if norm_sq >= BAILOUT_NORM_SQ {
            return PixelResult::new(n, norm_sq.sqrt());
        }
        if next.bits_eq(z) {
            return PixelResult::new(max_iterations, norm_sq.sqrt());
        }
        z = next;
    }

    PixelResult::new(max_iterations, norm_sq.sqrt())
}
