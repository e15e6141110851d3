pub mod brush;
pub mod error;
pub mod frame;
pub mod renderer;
pub mod slice;

pub use brush::{hsb_to_rgba, Brush, BrushKind, Rgba, BLACK};
pub use error::RenderError;
pub use frame::Frame;
pub use renderer::{RenderJob, RenderProgress, RenderResult, Renderer};
pub use slice::{build_slices, Slice};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
