use std::time::Duration;

use crate::error::ExplorerError;

/// Monotonic id of a dispatched render.
pub type Generation = u64;

/// Whether a render is in flight, and which one.
///
/// The explorer accepts commands only while `Idle`. A response carrying a
/// generation other than the one in flight is stale and gets dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Idle,
    Rendering(Generation),
}

impl RenderState {
    pub fn is_rendering(self) -> bool {
        matches!(self, Self::Rendering(_))
    }

    /// The in-flight generation, if any.
    pub fn generation(self) -> Option<Generation> {
        match self {
            Self::Idle => None,
            Self::Rendering(generation) => Some(generation),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Rendering(_) => "Rendering\u{2026}",
        }
    }
}

/// Outcome of a render, reported once the explorer has settled.
#[derive(Debug)]
pub enum RenderEvent {
    /// A new frame replaced the previous one.
    Published {
        generation: Generation,
        elapsed: Duration,
    },
    /// The render failed; the previous frame stays on display.
    Failed {
        generation: Generation,
        error: ExplorerError,
    },
}

impl RenderEvent {
    pub fn generation(&self) -> Generation {
        match self {
            Self::Published { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }
}
