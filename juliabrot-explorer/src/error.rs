use std::time::Duration;

use thiserror::Error;

use juliabrot_core::CoreError;
use juliabrot_render::RenderError;

/// Errors surfaced by the explorer: rejected configuration and failed
/// renders. A command rejected because a render is in flight is not an
/// error.
#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("color offset must lie in [0, 1], got {0}")]
    InvalidColorOffset(f32),

    #[error("selection rectangle must be non-empty, got {width}×{height}")]
    InvalidRect { width: u32, height: u32 },

    #[error("render thread is not running")]
    RenderThreadUnavailable,

    #[error("render did not finish within {0:?}")]
    Timeout(Duration),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}
