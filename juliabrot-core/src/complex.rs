use serde::{Deserialize, Serialize};

/// A point on the complex plane as two `f64` components.
///
/// Only the operations the escape-time loop and the viewport mapping need are
/// provided; the hot loop works on the scalar parts directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub const ZERO: Self = Self { re: 0.0, im: 0.0 };

    #[inline]
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    /// Returns `re² + im²` without taking the square root.
    #[inline]
    pub fn norm_sq(self) -> f64 {
        self.re * self.re + self.im * self.im
    }

    /// One step of `z ← z² + c`.
    #[inline]
    pub fn square_add(self, c: Self) -> Self {
        Self {
            re: self.re * self.re - self.im * self.im + c.re,
            im: 2.0 * self.re * self.im + c.im,
        }
    }

    /// Bit-for-bit equality of both components.
    ///
    /// Unlike `==`, this distinguishes `0.0` from `-0.0` and treats identical
    /// NaN payloads as equal.
    #[inline]
    pub fn bits_eq(self, other: Self) -> bool {
        self.re.to_bits() == other.re.to_bits() && self.im.to_bits() == other.im.to_bits()
    }

    pub fn is_finite(self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Honour `{:.3}` and friends on both components.
        let sign = if self.im >= 0.0 { '+' } else { '-' };
        match f.precision() {
            Some(p) => write!(f, "{:.*} {sign} {:.*}i", p, self.re, p, self.im.abs()),
            None => write!(f, "{} {sign} {}i", self.re, self.im.abs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn squared_norm() {
        let z = Complex::new(3.0, -4.0);
        assert!((z.norm_sq() - 25.0).abs() < EPSILON);
    }

    #[test]
    fn square_add_matches_expansion() {
        // (1 + 2i)² + (0.5 - i) = (1 - 4 + 0.5) + (4 - 1)i
        let z = Complex::new(1.0, 2.0).square_add(Complex::new(0.5, -1.0));
        assert!((z.re - (-2.5)).abs() < EPSILON);
        assert!((z.im - 3.0).abs() < EPSILON);
    }

    #[test]
    fn origin_is_fixed_under_zero_constant() {
        let z = Complex::ZERO.square_add(Complex::ZERO);
        assert!(z.bits_eq(Complex::ZERO));
    }

    #[test]
    fn bits_eq_separates_signed_zero() {
        assert_eq!(Complex::new(0.0, 0.0), Complex::new(-0.0, 0.0));
        assert!(!Complex::new(0.0, 0.0).bits_eq(Complex::new(-0.0, 0.0)));
    }

    #[test]
    fn display_with_precision() {
        assert_eq!(format!("{:.3}", Complex::new(-0.75, 0.1)), "-0.750 + 0.100i");
        assert_eq!(format!("{:.3}", Complex::new(0.25, -0.5)), "0.250 - 0.500i");
        assert_eq!(Complex::new(1.0, -2.0).to_string(), "1 - 2i");
    }
}
