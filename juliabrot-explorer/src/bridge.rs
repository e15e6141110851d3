use std::io;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use juliabrot_core::{FractalMode, Viewport};
use juliabrot_render::{Brush, RenderJob, RenderProgress, RenderResult, Renderer};

use crate::state::Generation;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything the render thread needs, copied out of the explorer at
/// dispatch time.
pub(crate) struct RenderRequest {
    pub(crate) generation: Generation,
    pub(crate) viewport: Viewport,
    pub(crate) mode: FractalMode,
    pub(crate) brush: Arc<Brush>,
    pub(crate) color_offset: f32,
}

pub(crate) struct RenderResponse {
    pub(crate) generation: Generation,
    pub(crate) result: juliabrot_render::Result<RenderResult>,
}

/// The explorer's end of the render thread.
pub(crate) struct RenderBridge {
    pub(crate) tx_request: mpsc::Sender<RenderRequest>,
    pub(crate) rx_response: mpsc::Receiver<RenderResponse>,
    pub(crate) handle: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// Render thread
// ---------------------------------------------------------------------------

/// Move `renderer` onto a dedicated `render-worker` thread.
pub(crate) fn spawn(renderer: Renderer, progress: Arc<RenderProgress>) -> io::Result<RenderBridge> {
    let (tx_request, rx_request) = mpsc::channel::<RenderRequest>();
    let (tx_response, rx_response) = mpsc::channel::<RenderResponse>();

    let handle = thread::Builder::new()
        .name("render-worker".into())
        .spawn(move || render_worker(renderer, progress, rx_request, tx_response))?;

    Ok(RenderBridge {
        tx_request,
        rx_response,
        handle,
    })
}

/// Serve requests until the explorer hangs up.
///
/// Every request is rendered to completion; nothing is cancelled or
/// skipped, since the explorer never has more than one render in flight.
fn render_worker(
    renderer: Renderer,
    progress: Arc<RenderProgress>,
    rx: mpsc::Receiver<RenderRequest>,
    tx: mpsc::Sender<RenderResponse>,
) {
    while let Ok(req) = rx.recv() {
        progress.reset(0);
        progress.set_generation(req.generation);
        debug!(generation = req.generation, "Render request received");

        let job = RenderJob {
            viewport: req.viewport,
            mode: req.mode,
            brush: &req.brush,
            color_offset: req.color_offset,
        };
        let result = renderer.render(&job, &progress);

        if tx
            .send(RenderResponse {
                generation: req.generation,
                result,
            })
            .is_err()
        {
            return;
        }
    }
    debug!("Render worker shutting down");
}
