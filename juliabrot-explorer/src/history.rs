use std::collections::VecDeque;
use std::sync::Arc;

use juliabrot_core::{FractalMode, Viewport};
use juliabrot_render::{BrushKind, Frame};

/// A navigation snapshot taken before a command changed the view.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub viewport: Viewport,
    pub brush_kind: BrushKind,
    pub color_offset: f32,
    pub max_iterations: u32,
    /// The frame on display when the snapshot was taken, if it matched.
    pub frame: Option<Arc<Frame>>,
}

impl HistoryEntry {
    /// Whether the cached frame was drawn with exactly these color settings.
    pub fn is_compatible(&self, brush_kind: BrushKind, color_offset: f32, max_iterations: u32) -> bool {
        self.brush_kind == brush_kind
            && self.color_offset.to_bits() == color_offset.to_bits()
            && self.max_iterations == max_iterations
    }

    /// The cached frame, if it can stand in for a render of `viewport`
    /// with the given color settings.
    pub fn reusable_frame(
        &self,
        viewport: &Viewport,
        brush_kind: BrushKind,
        color_offset: f32,
    ) -> Option<Arc<Frame>> {
        if !self.is_compatible(brush_kind, color_offset, viewport.max_iterations) {
            return None;
        }
        self.frame
            .as_ref()
            .filter(|frame| frame.width == viewport.width && frame.height == viewport.height)
            .cloned()
    }
}

/// Two independent undo stacks, one per fractal mode.
///
/// Switching mode touches both stacks; [`enter_julia`](Self::enter_julia)
/// and [`leave_julia`](Self::leave_julia) do so in a single call.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    mandelbrot: VecDeque<HistoryEntry>,
    julia: VecDeque<HistoryEntry>,
    max_entries: usize,
}

impl NavigationHistory {
    /// `max_entries` caps each stack; the oldest entry is dropped beyond it.
    pub fn new(max_entries: usize) -> Self {
        Self {
            mandelbrot: VecDeque::new(),
            julia: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    pub fn push(&mut self, mode: &FractalMode, entry: HistoryEntry) {
        let max = self.max_entries;
        let stack = self.stack_mut(mode);
        stack.push_back(entry);
        if stack.len() > max {
            stack.pop_front();
        }
    }

    pub fn pop(&mut self, mode: &FractalMode) -> Option<HistoryEntry> {
        self.stack_mut(mode).pop_back()
    }

    pub fn peek(&self, mode: &FractalMode) -> Option<&HistoryEntry> {
        self.stack(mode).back()
    }

    /// Record the Mandelbrot view being left for a Julia exploration.
    pub fn enter_julia(&mut self, entry: HistoryEntry) {
        self.push(&FractalMode::Mandelbrot, entry);
    }

    /// Pop the Mandelbrot view to return to and forget the Julia history.
    pub fn leave_julia(&mut self) -> Option<HistoryEntry> {
        self.julia.clear();
        self.mandelbrot.pop_back()
    }

    pub fn len(&self, mode: &FractalMode) -> usize {
        self.stack(mode).len()
    }

    pub fn is_empty(&self, mode: &FractalMode) -> bool {
        self.stack(mode).is_empty()
    }

    fn stack(&self, mode: &FractalMode) -> &VecDeque<HistoryEntry> {
        if mode.is_julia() {
            &self.julia
        } else {
            &self.mandelbrot
        }
    }

    fn stack_mut(&mut self, mode: &FractalMode) -> &mut VecDeque<HistoryEntry> {
        if mode.is_julia() {
            &mut self.julia
        } else {
            &mut self.mandelbrot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use juliabrot_core::Complex;

    const JULIA: FractalMode = FractalMode::Julia {
        seed: Complex { re: -0.4, im: 0.6 },
    };

    fn entry(scale: f64) -> HistoryEntry {
        let mut viewport = Viewport::default_mandelbrot(40, 30, 100);
        viewport.scale = scale;
        HistoryEntry {
            viewport,
            brush_kind: BrushKind::Smooth,
            color_offset: 0.0,
            max_iterations: 100,
            frame: None,
        }
    }

    #[test]
    fn stacks_are_independent() {
        let mut history = NavigationHistory::new(10);
        history.push(&FractalMode::Mandelbrot, entry(1.0));
        history.push(&JULIA, entry(2.0));
        history.push(&JULIA, entry(3.0));

        assert_eq!(history.len(&FractalMode::Mandelbrot), 1);
        assert_eq!(history.len(&JULIA), 2);
        assert_eq!(history.pop(&JULIA).map(|e| e.viewport.scale), Some(3.0));
        assert_eq!(history.peek(&FractalMode::Mandelbrot).map(|e| e.viewport.scale), Some(1.0));
    }

    #[test]
    fn oldest_entry_dropped_at_capacity() {
        let mut history = NavigationHistory::new(3);
        for scale in 1..=5 {
            history.push(&FractalMode::Mandelbrot, entry(scale as f64));
        }
        let scales: Vec<f64> = std::iter::from_fn(|| history.pop(&FractalMode::Mandelbrot))
            .map(|e| e.viewport.scale)
            .collect();
        assert_eq!(scales, vec![5.0, 4.0, 3.0]);
    }

    #[test]
    fn leaving_julia_clears_julia_stack() {
        let mut history = NavigationHistory::new(10);
        history.enter_julia(entry(7.0));
        history.push(&JULIA, entry(8.0));
        history.push(&JULIA, entry(9.0));

        let restored = history.leave_julia().unwrap();
        assert_eq!(restored.viewport.scale, 7.0);
        assert!(history.is_empty(&JULIA));
        assert!(history.is_empty(&FractalMode::Mandelbrot));
    }

    #[test]
    fn pop_on_empty_stack() {
        let mut history = NavigationHistory::new(4);
        assert!(history.pop(&FractalMode::Mandelbrot).is_none());
        assert!(history.leave_julia().is_none());
    }

    #[test]
    fn compatibility_requires_exact_match() {
        let e = entry(1.0);
        assert!(e.is_compatible(BrushKind::Smooth, 0.0, 100));
        assert!(!e.is_compatible(BrushKind::Banded, 0.0, 100));
        assert!(!e.is_compatible(BrushKind::Smooth, 0.01, 100));
        assert!(!e.is_compatible(BrushKind::Smooth, 0.0, 101));
    }

    #[test]
    fn reusable_frame_checks_size() {
        let mut e = entry(1.0);
        e.frame = Some(Arc::new(Frame::new(40, 30)));
        let same = e.viewport;
        assert!(e.reusable_frame(&same, BrushKind::Smooth, 0.0).is_some());

        let resized = Viewport { width: 80, ..same };
        assert!(e.reusable_frame(&resized, BrushKind::Smooth, 0.0).is_none());
        assert!(e.reusable_frame(&same, BrushKind::Tropical, 0.0).is_none());
    }
}
