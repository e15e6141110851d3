use std::collections::HashMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use juliabrot_core::{Complex, FractalMode, Viewport};
use juliabrot_render::{Brush, BrushKind, Frame, RenderProgress, Renderer};

use crate::bridge::{self, RenderRequest, RenderResponse};
use crate::error::ExplorerError;
use crate::history::{HistoryEntry, NavigationHistory};
use crate::settings::ExplorerSettings;
use crate::state::{Generation, RenderEvent, RenderState};

// ---------------------------------------------------------------------------
// Explorer
// ---------------------------------------------------------------------------

/// The parts of the explorer a render is drawn from.
#[derive(Debug, Clone)]
pub(crate) struct View {
    pub(crate) viewport: Viewport,
    pub(crate) mode: FractalMode,
    pub(crate) brush: Arc<Brush>,
    pub(crate) color_offset: f32,
}

/// Interactive viewport state driving a background renderer.
///
/// Commands mutate the view and dispatch a render to the `render-worker`
/// thread, returning immediately. While that render is in flight every
/// command is ignored; the caller learns about completion through
/// [`poll`](Self::poll) or [`wait`](Self::wait), which publish the new frame.
pub struct Explorer {
    pub(crate) settings: ExplorerSettings,
    pub(crate) viewport: Viewport,
    pub(crate) mode: FractalMode,
    pub(crate) brush: Arc<Brush>,
    pub(crate) color_offset: f32,
    pub(crate) history: NavigationHistory,
    /// Palette brushes already drawn, by kind and iteration limit.
    palettes: HashMap<(BrushKind, u32), Arc<Brush>>,

    state: RenderState,
    last_generation: Generation,
    frame: Option<Arc<Frame>>,
    /// Whether `frame` shows the current view and color settings.
    frame_is_current: bool,
    last_render_time: Option<Duration>,

    progress: Arc<RenderProgress>,
    tx_request: Option<mpsc::Sender<RenderRequest>>,
    rx_response: mpsc::Receiver<RenderResponse>,
    worker: Option<JoinHandle<()>>,
}

impl Explorer {
    /// Validate `settings`, start the render thread and dispatch the first
    /// render of the default Mandelbrot view.
    pub fn new(settings: ExplorerSettings) -> crate::Result<Self> {
        settings.validate()?;

        let viewport =
            Viewport::default_mandelbrot(settings.width, settings.height, settings.max_iterations);
        let brush = Arc::new(build_brush(
            settings.brush,
            settings.max_iterations,
            settings.palette_seed,
        ));
        let renderer = Renderer::new(settings.workers.unwrap_or(0))?;
        let progress = Arc::new(RenderProgress::new());
        let bridge = bridge::spawn(renderer, Arc::clone(&progress))?;

        info!(
            width = settings.width,
            height = settings.height,
            max_iterations = settings.max_iterations,
            brush = settings.brush.label(),
            "Explorer started"
        );

        let mut palettes = HashMap::new();
        if brush.kind().uses_palette() {
            palettes.insert((brush.kind(), brush.max_iterations()), Arc::clone(&brush));
        }

        let mut explorer = Self {
            history: NavigationHistory::new(settings.max_history),
            palettes,
            color_offset: settings.color_offset,
            settings,
            viewport,
            mode: FractalMode::Mandelbrot,
            brush,
            state: RenderState::Idle,
            last_generation: 0,
            frame: None,
            frame_is_current: false,
            last_render_time: None,
            progress,
            tx_request: Some(bridge.tx_request),
            rx_response: bridge.rx_response,
            worker: Some(bridge.handle),
        };
        explorer.request_render()?;
        Ok(explorer)
    }

    // -----------------------------------------------------------------------
    // Render dispatch & polling
    // -----------------------------------------------------------------------

    pub(crate) fn current_view(&self) -> View {
        View {
            viewport: self.viewport,
            mode: self.mode,
            brush: Arc::clone(&self.brush),
            color_offset: self.color_offset,
        }
    }

    fn adopt(&mut self, view: View) {
        self.viewport = view.viewport;
        self.mode = view.mode;
        self.brush = view.brush;
        self.color_offset = view.color_offset;
    }

    /// Re-render the current view.
    pub(crate) fn request_render(&mut self) -> crate::Result<RenderState> {
        self.dispatch(self.current_view())
    }

    /// Send `view` to the render thread, then adopt it and enter
    /// `Rendering`. If the request cannot be sent nothing changes.
    pub(crate) fn dispatch(&mut self, view: View) -> crate::Result<RenderState> {
        let generation = self.last_generation + 1;
        debug!(
            generation,
            scale = view.viewport.scale,
            max_iterations = view.viewport.max_iterations,
            mode = view.mode.label(),
            "Requesting render"
        );

        let req = RenderRequest {
            generation,
            viewport: view.viewport,
            mode: view.mode,
            brush: Arc::clone(&view.brush),
            color_offset: view.color_offset,
        };
        let sender = self
            .tx_request
            .as_ref()
            .ok_or(ExplorerError::RenderThreadUnavailable)?;
        sender
            .send(req)
            .map_err(|_| ExplorerError::RenderThreadUnavailable)?;

        self.adopt(view);
        self.last_generation = generation;
        self.state = RenderState::Rendering(generation);
        self.frame_is_current = false;
        Ok(self.state)
    }

    /// Apply any finished render without blocking.
    ///
    /// Returns the event for the render that settled the explorer, if one
    /// arrived since the last call.
    pub fn poll(&mut self) -> Option<RenderEvent> {
        let mut event = None;
        loop {
            match self.rx_response.try_recv() {
                Ok(resp) => {
                    if let Some(e) = self.apply_response(resp) {
                        event = Some(e);
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if let Some(e) = self.render_thread_lost() {
                        event = Some(e);
                    }
                    break;
                }
            }
        }
        event
    }

    /// Block until the render in flight settles or `timeout` elapses.
    ///
    /// Returns `None` straight away when idle, or when the timeout expires
    /// with the render still running.
    pub fn wait(&mut self, timeout: Duration) -> Option<RenderEvent> {
        let deadline = Instant::now() + timeout;
        while self.state.is_rendering() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx_response.recv_timeout(remaining) {
                Ok(resp) => {
                    if let Some(event) = self.apply_response(resp) {
                        return Some(event);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => return self.render_thread_lost(),
            }
        }
        None
    }

    pub(crate) fn apply_response(&mut self, resp: RenderResponse) -> Option<RenderEvent> {
        if self.state != RenderState::Rendering(resp.generation) {
            debug!(
                generation = resp.generation,
                current = ?self.state,
                "Discarding stale render"
            );
            return None;
        }

        self.state = RenderState::Idle;
        match resp.result {
            Ok(result) => {
                info!(
                    generation = resp.generation,
                    elapsed_ms = result.elapsed.as_millis(),
                    "Frame published"
                );
                self.frame = Some(Arc::new(result.frame));
                self.frame_is_current = true;
                self.last_render_time = Some(result.elapsed);
                Some(RenderEvent::Published {
                    generation: resp.generation,
                    elapsed: result.elapsed,
                })
            }
            Err(e) => {
                warn!(generation = resp.generation, "Render failed: {e}");
                Some(RenderEvent::Failed {
                    generation: resp.generation,
                    error: e.into(),
                })
            }
        }
    }

    fn render_thread_lost(&mut self) -> Option<RenderEvent> {
        let generation = self.state.generation()?;
        error!(generation, "Render thread exited with a render in flight");
        self.state = RenderState::Idle;
        Some(RenderEvent::Failed {
            generation,
            error: ExplorerError::RenderThreadUnavailable,
        })
    }

    /// `true` (and logs) when `command` must be ignored because a render is
    /// in flight.
    pub(crate) fn reject_if_busy(&self, command: &'static str) -> bool {
        match self.state {
            RenderState::Idle => false,
            RenderState::Rendering(generation) => {
                debug!(command, generation, "Ignoring command while rendering");
                true
            }
        }
    }

    // -----------------------------------------------------------------------
    // History snapshots
    // -----------------------------------------------------------------------

    pub(crate) fn snapshot(&self) -> HistoryEntry {
        HistoryEntry {
            viewport: self.viewport,
            brush_kind: self.brush.kind(),
            color_offset: self.color_offset,
            max_iterations: self.viewport.max_iterations,
            frame: if self.frame_is_current {
                self.frame.clone()
            } else {
                None
            },
        }
    }

    /// The view an entry describes, at the current size and iteration limit.
    pub(crate) fn restored_viewport(&self, entry: &HistoryEntry) -> crate::Result<Viewport> {
        let viewport = Viewport {
            center: entry.viewport.center,
            scale: entry.viewport.scale,
            ..self.viewport
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Show `view`, reusing the entry's frame when it is compatible and
    /// rendering otherwise.
    pub(crate) fn restore(&mut self, view: View, entry: &HistoryEntry) -> crate::Result<RenderState> {
        match entry.reusable_frame(&view.viewport, view.brush.kind(), view.color_offset) {
            Some(frame) => {
                debug!("Reusing cached frame from history");
                self.adopt(view);
                self.frame = Some(frame);
                self.frame_is_current = true;
                Ok(self.state)
            }
            None => self.dispatch(view),
        }
    }

    /// The brush for `kind` at `max_iterations`.
    ///
    /// Palette brushes are kept once drawn, so returning to a pair reuses
    /// its palette instead of drawing a new one.
    pub(crate) fn brush_for(&mut self, kind: BrushKind, max_iterations: u32) -> Arc<Brush> {
        if self.brush.kind() == kind && self.brush.max_iterations() == max_iterations {
            return Arc::clone(&self.brush);
        }
        let seed = self.settings.palette_seed;
        if !kind.uses_palette() {
            return Arc::new(build_brush(kind, max_iterations, seed));
        }
        let brush = self
            .palettes
            .entry((kind, max_iterations))
            .or_insert_with(|| Arc::new(build_brush(kind, max_iterations, seed)));
        Arc::clone(brush)
    }

    // -----------------------------------------------------------------------
    // Configuration commands
    // -----------------------------------------------------------------------

    /// Change the iteration limit. The current limit is a no-op.
    pub fn set_max_iterations(&mut self, max_iterations: u32) -> crate::Result<RenderState> {
        if self.reject_if_busy("set_max_iterations")
            || max_iterations == self.viewport.max_iterations
        {
            return Ok(self.state);
        }
        let viewport = Viewport {
            max_iterations,
            ..self.viewport
        };
        viewport.validate()?;

        let brush = self.brush_for(self.brush.kind(), max_iterations);
        self.dispatch(View {
            viewport,
            brush,
            ..self.current_view()
        })
    }

    /// Switch coloring strategy. Selecting the active kind is a no-op.
    pub fn set_brush(&mut self, kind: BrushKind) -> crate::Result<RenderState> {
        if self.reject_if_busy("set_brush") || kind == self.brush.kind() {
            return Ok(self.state);
        }
        let brush = self.brush_for(kind, self.viewport.max_iterations);
        self.dispatch(View {
            brush,
            ..self.current_view()
        })
    }

    /// Set the color offset, which must lie in `[0, 1]`.
    pub fn set_color_offset(&mut self, offset: f32) -> crate::Result<RenderState> {
        if self.reject_if_busy("set_color_offset") {
            return Ok(self.state);
        }
        if !(0.0..=1.0).contains(&offset) {
            return Err(ExplorerError::InvalidColorOffset(offset));
        }
        self.dispatch(View {
            color_offset: offset,
            ..self.current_view()
        })
    }

    /// Change the frame size, keeping centre and scale.
    pub fn resize(&mut self, width: u32, height: u32) -> crate::Result<RenderState> {
        if self.reject_if_busy("resize") {
            return Ok(self.state);
        }
        let viewport = Viewport {
            width,
            height,
            ..self.viewport
        };
        viewport.validate()?;
        self.dispatch(View {
            viewport,
            ..self.current_view()
        })
    }

    // -----------------------------------------------------------------------
    // Readouts
    // -----------------------------------------------------------------------

    /// The latest published frame.
    pub fn frame(&self) -> Option<Arc<Frame>> {
        self.frame.clone()
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn is_rendering(&self) -> bool {
        self.state.is_rendering()
    }

    /// Advisory completion of the render in flight; `1.0` when idle.
    pub fn progress(&self) -> f64 {
        match self.state {
            RenderState::Idle => 1.0,
            RenderState::Rendering(generation) if self.progress.generation() == generation => {
                self.progress.fraction()
            }
            RenderState::Rendering(_) => 0.0,
        }
    }

    /// Magnification relative to the mode's default view.
    pub fn zoom_level(&self) -> f64 {
        self.viewport.scale / self.default_viewport(&self.mode).scale
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> FractalMode {
        self.mode
    }

    pub fn brush_kind(&self) -> BrushKind {
        self.brush.kind()
    }

    pub fn color_offset(&self) -> f32 {
        self.color_offset
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn settings(&self) -> &ExplorerSettings {
        &self.settings
    }

    /// Duration of the last successful render.
    pub fn last_render_time(&self) -> Option<Duration> {
        self.last_render_time
    }

    /// The complex-plane point under a (fractional) pixel position.
    pub fn pointer_coords(&self, px: f64, py: f64) -> Complex {
        self.viewport.subpixel_to_complex(px, py)
    }

    /// The default view for `mode` at the current size.
    pub(crate) fn default_viewport(&self, mode: &FractalMode) -> Viewport {
        let Viewport {
            width,
            height,
            max_iterations,
            ..
        } = self.viewport;
        match mode {
            FractalMode::Mandelbrot => Viewport::default_mandelbrot(width, height, max_iterations),
            FractalMode::Julia { .. } => Viewport::default_julia(width, height, max_iterations),
        }
    }
}

impl Drop for Explorer {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop after any render in flight.
        self.tx_request.take();
        if let Some(handle) = self.worker.take() {
            if handle.join().is_err() {
                error!("Render worker panicked");
            }
        }
    }
}

pub(crate) fn build_brush(kind: BrushKind, max_iterations: u32, seed: Option<u64>) -> Brush {
    match seed {
        Some(seed) => Brush::with_seed(kind, max_iterations, seed),
        None => Brush::new(kind, max_iterations),
    }
}
