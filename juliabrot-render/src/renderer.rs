use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use juliabrot_core::{FractalMode, Viewport};

use crate::brush::Brush;
use crate::error::RenderError;
use crate::frame::Frame;
use crate::slice::{build_slices, Slice};

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Advisory progress for the render in flight.
///
/// Counts completed pixel columns. Slices update it concurrently and in no
/// particular order, so readers only get an approximate fraction; nothing
/// in the pipeline depends on it.
#[derive(Debug, Default)]
pub struct RenderProgress {
    generation: AtomicU64,
    columns_done: AtomicUsize,
    columns_total: AtomicUsize,
}

impl RenderProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the progress with the generation about to be rendered.
    pub fn set_generation(&self, generation: u64) {
        self.generation.store(generation, Ordering::SeqCst);
    }

    /// The generation last passed to [`set_generation`](Self::set_generation).
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Reset progress for a new render of `total` columns.
    pub fn reset(&self, total: usize) {
        self.columns_total.store(total, Ordering::Relaxed);
        self.columns_done.store(0, Ordering::Relaxed);
    }

    /// Mark one more column as finished.
    pub fn advance(&self) {
        self.columns_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Read the current progress as `(done, total)`.
    pub fn progress(&self) -> (usize, usize) {
        (
            self.columns_done.load(Ordering::Relaxed),
            self.columns_total.load(Ordering::Relaxed),
        )
    }

    /// Completed fraction in `[0, 1]`; `0` before any render started.
    pub fn fraction(&self) -> f64 {
        let (done, total) = self.progress();
        if total == 0 {
            0.0
        } else {
            (done as f64 / total as f64).min(1.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Job & result
// ---------------------------------------------------------------------------

/// Everything one render needs.
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    pub viewport: Viewport,
    pub mode: FractalMode,
    pub brush: &'a Brush,
    pub color_offset: f32,
}

/// The result of a full-frame render.
#[derive(Debug)]
pub struct RenderResult {
    pub frame: Frame,
    pub elapsed: Duration,
    pub slices: usize,
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders frames as fixed column slices on a dedicated thread pool.
///
/// The pool has exactly `workers` threads and the frame is cut into one
/// slice per worker, so the output never depends on how the slices are
/// scheduled.
pub struct Renderer {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl Renderer {
    /// Build a renderer with `workers` threads; `0` means one per core.
    pub fn new(workers: usize) -> crate::Result<Self> {
        let workers = if workers == 0 {
            rayon::current_num_threads()
        } else {
            workers
        };
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("slice-worker-{i}"))
            .build()?;
        debug!(workers, "Slice pool ready");
        Ok(Self { pool, workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Render a full frame.
    ///
    /// Each slice is mapped, iterated and colored independently into its own
    /// buffer; the buffers are composed in slice order once all of them have
    /// finished. The first failing slice fails the whole render and no
    /// partial frame is returned.
    pub fn render(&self, job: &RenderJob<'_>, progress: &RenderProgress) -> crate::Result<RenderResult> {
        let start = Instant::now();
        let viewport = &job.viewport;
        viewport.validate()?;

        let slices = build_slices(viewport.width, viewport.height, self.workers);
        progress.reset(viewport.width as usize);
        debug!(
            width = viewport.width,
            height = viewport.height,
            slices = slices.len(),
            workers = self.workers,
            mode = job.mode.label(),
            brush = job.brush.kind().label(),
            "Starting sliced render"
        );

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                slices
                    .par_iter()
                    .map(|slice| render_slice(job, slice, progress))
                    .collect::<crate::Result<Vec<Vec<u8>>>>()
            })
        }));
        let slice_pixels = match outcome {
            Ok(result) => result?,
            Err(payload) => return Err(RenderError::WorkerPanicked(panic_message(payload.as_ref()))),
        };

        let mut frame = Frame::new(viewport.width, viewport.height);
        for (slice, pixels) in slices.iter().zip(&slice_pixels) {
            frame.blit_slice(slice, pixels);
        }

        let elapsed = start.elapsed();
        info!(
            elapsed_ms = elapsed.as_millis(),
            slices = slices.len(),
            "Render complete"
        );

        Ok(RenderResult {
            frame,
            elapsed,
            slices: slices.len(),
        })
    }
}

/// Compute one slice column by column into a row-major RGBA buffer.
fn render_slice(job: &RenderJob<'_>, slice: &Slice, progress: &RenderProgress) -> crate::Result<Vec<u8>> {
    let mut pixels = vec![0u8; slice.pixel_count() * 4];
    let row_len = slice.width as usize * 4;
    let max_iterations = job.viewport.max_iterations;

    for px in slice.x..slice.end() {
        let column = (px - slice.x) as usize * 4;
        for py in 0..slice.height {
            let point = job.viewport.pixel_to_complex(px, py);
            if !point.is_finite() {
                return Err(RenderError::NonFiniteCoordinate { px, py });
            }
            let result = job.mode.evaluate(point, max_iterations);
            let color = job.brush.color(result, job.color_offset);
            let idx = py as usize * row_len + column;
            pixels[idx..idx + 4].copy_from_slice(&color);
        }
        progress.advance();
    }
    Ok(pixels)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
