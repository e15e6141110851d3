pub mod command;
pub mod error;
pub mod explorer;
pub mod history;
pub mod settings;
pub mod state;

mod bridge;
mod navigation;

pub use command::Command;
pub use error::ExplorerError;
pub use explorer::Explorer;
pub use history::{HistoryEntry, NavigationHistory};
pub use settings::ExplorerSettings;
pub use state::{Generation, RenderEvent, RenderState};

/// Convenience result type for the explorer crate.
pub type Result<T> = std::result::Result<T, ExplorerError>;
