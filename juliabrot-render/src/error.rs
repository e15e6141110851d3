use thiserror::Error;

/// Errors originating from the rendering pipeline.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("pixel ({px}, {py}) mapped to a non-finite point")]
    NonFiniteCoordinate { px: u32, py: u32 },

    #[error("render worker panicked: {0}")]
    WorkerPanicked(String),

    #[error(transparent)]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Core(#[from] juliabrot_core::CoreError),
}
