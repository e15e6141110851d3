//! Brushes: strategies that turn an escape-time result into a color.
//!
//! Every brush paints in-set pixels black. A brush is immutable once built,
//! so one instance can be shared by all slice workers of a render and reused
//! across renders; palette-based kinds generate their random palette exactly
//! once, in the constructor.

use std::f64::consts::{LN_2, PI};
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use juliabrot_core::PixelResult;

/// An RGBA color, 8 bits per channel.
pub type Rgba = [u8; 4];

pub const BLACK: Rgba = [0, 0, 0, 255];

const RAINBOW: [Rgba; 7] = [
    [255, 0, 0, 255],     // red
    [255, 165, 0, 255],   // orange
    [255, 255, 0, 255],   // yellow
    [0, 128, 0, 255],     // green
    [0, 0, 255, 255],     // blue
    [75, 0, 130, 255],    // indigo
    [238, 130, 238, 255], // violet
];

// ---------------------------------------------------------------------------
// Brush kind
// ---------------------------------------------------------------------------

/// The closed set of coloring strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrushKind {
    /// One offset-derived hue for every escaped pixel.
    Binary,
    /// Grayscale cosine ripple over the iteration count.
    Elegant,
    /// Hue from the continuous (log-log) escape count.
    #[default]
    Smooth,
    /// Random palette indexed by the offset-shifted iteration count.
    Banded,
    /// Hue from the raw iteration count.
    Tropical,
    /// Seven-color rainbow table.
    Rainbow,
    /// Random palette indexed by the raw iteration count.
    Random,
    /// Linear grayscale ramp over the iteration range.
    Graydient,
}

impl BrushKind {
    pub const ALL: [BrushKind; 8] = [
        Self::Binary,
        Self::Elegant,
        Self::Smooth,
        Self::Banded,
        Self::Tropical,
        Self::Rainbow,
        Self::Random,
        Self::Graydient,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Binary => "Binary",
            Self::Elegant => "Elegant",
            Self::Smooth => "Smooth",
            Self::Banded => "Banded",
            Self::Tropical => "Tropical",
            Self::Rainbow => "Rainbow",
            Self::Random => "Random",
            Self::Graydient => "Graydient",
        }
    }

    /// Whether this kind looks colors up in a random palette.
    pub fn uses_palette(self) -> bool {
        matches!(self, Self::Banded | Self::Random)
    }
}

impl fmt::Display for BrushKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BrushKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown brush '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Brush
// ---------------------------------------------------------------------------

/// A coloring strategy bound to an iteration limit.
///
/// `color` is a pure function of its arguments and the brush's fixed state,
/// so it is safe to call concurrently from every render slice.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    kind: BrushKind,
    max_iterations: u32,
    palette: Option<Vec<Rgba>>,
}

impl Brush {
    /// Build a brush; palette kinds draw their colors from an entropy seed.
    pub fn new(kind: BrushKind, max_iterations: u32) -> Self {
        Self::build(kind, max_iterations, StdRng::from_entropy())
    }

    /// Build a brush whose palette is reproducible from `seed`.
    pub fn with_seed(kind: BrushKind, max_iterations: u32, seed: u64) -> Self {
        Self::build(kind, max_iterations, StdRng::seed_from_u64(seed))
    }

    fn build(kind: BrushKind, max_iterations: u32, mut rng: StdRng) -> Self {
        let palette = kind.uses_palette().then(|| {
            (0..max_iterations)
                .map(|_| -> Rgba {
                    [
                        rng.gen_range(0..255u8),
                        rng.gen_range(0..255u8),
                        rng.gen_range(0..255u8),
                        255,
                    ]
                })
                .collect()
        });
        Self {
            kind,
            max_iterations,
            palette,
        }
    }

    pub fn kind(&self) -> BrushKind {
        self.kind
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The random palette of palette-based kinds.
    pub fn palette(&self) -> Option<&[Rgba]> {
        self.palette.as_deref()
    }

    /// Map one pixel's iteration result to a color.
    ///
    /// `offset` is the user color offset in `[0, 1]`; each kind folds it into
    /// its mapping differently.
    pub fn color(&self, result: PixelResult, offset: f32) -> Rgba {
        if result.is_interior(self.max_iterations) {
            return BLACK;
        }
        let iteration = result.iterations;
        let max = self.max_iterations;
        let offset = offset as f64;

        match self.kind {
            BrushKind::Binary => hsb_to_rgba(offset * 360.0, 1.0, 1.0),
            BrushKind::Elegant => {
                let phase = (iteration as f64 + offset * max as f64 / 10.0) * PI / max as f64 * 10.0;
                gray(0.5 + 0.5 * phase.cos())
            }
            BrushKind::Smooth => {
                let smooth = smooth_iteration(iteration, result.magnitude);
                hsb_to_rgba(offset * 360.0 + 10.0 * smooth, 0.6, 1.0)
            }
            BrushKind::Banded => {
                let shift = (offset * max as f64) as u64;
                self.palette_entry(((iteration as u64 + shift) % max as u64) as usize)
            }
            BrushKind::Tropical => hsb_to_rgba((iteration % 360) as f64, 0.8, 0.8),
            BrushKind::Rainbow => {
                let shift = (offset * RAINBOW.len() as f64) as usize;
                RAINBOW[(iteration as usize + shift) % RAINBOW.len()]
            }
            BrushKind::Random => self.palette_entry(iteration as usize),
            BrushKind::Graydient => gray((iteration as f64 / max as f64 + offset).fract()),
        }
    }

    fn palette_entry(&self, index: usize) -> Rgba {
        self.palette
            .as_ref()
            .and_then(|p| p.get(index))
            .copied()
            .unwrap_or(BLACK)
    }
}

// ---------------------------------------------------------------------------
// Color helpers
// ---------------------------------------------------------------------------

/// Continuous escape count `ν = n + 1 − log₂(ln |z|)`.
///
/// Falls back to the integer count when the formula is undefined.
fn smooth_iteration(iterations: u32, magnitude: f64) -> f64 {
    let smooth = iterations as f64 + 1.0 - magnitude.ln().ln() / LN_2;
    if smooth.is_finite() {
        smooth
    } else {
        iterations as f64
    }
}

fn gray(brightness: f64) -> Rgba {
    let v = channel(brightness);
    [v, v, v, 255]
}

#[inline]
fn channel(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert hue (degrees, any range), saturation and brightness to RGBA.
///
/// Hue wraps modulo 360 (non-finite hues read as 0); saturation and
/// brightness are clamped to `[0, 1]`.
pub fn hsb_to_rgba(hue: f64, saturation: f64, brightness: f64) -> Rgba {
    let hue = if hue.is_finite() { hue.rem_euclid(360.0) } else { 0.0 };
    let s = saturation.clamp(0.0, 1.0);
    let b = brightness.clamp(0.0, 1.0);

    let h = hue / 60.0;
    let chroma = b * s;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let m = b - chroma;
    let (r, g, bl) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    [channel(r + m), channel(g + m), channel(bl + m), 255]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
