use tracing::{debug, info};

use juliabrot_core::{CoreError, FractalMode, Viewport};

use crate::error::ExplorerError;
use crate::explorer::{Explorer, View};
use crate::state::RenderState;

impl Explorer {
    // -----------------------------------------------------------------------
    // Pan & zoom
    // -----------------------------------------------------------------------

    pub fn move_left(&mut self) -> crate::Result<RenderState> {
        let d = -self.viewport.complex_width() * self.settings.pan_fraction;
        self.pan("move_left", d, 0.0)
    }

    pub fn move_right(&mut self) -> crate::Result<RenderState> {
        let d = self.viewport.complex_width() * self.settings.pan_fraction;
        self.pan("move_right", d, 0.0)
    }

    /// Move the view towards larger imaginary parts.
    pub fn move_up(&mut self) -> crate::Result<RenderState> {
        let d = self.viewport.complex_height() * self.settings.pan_fraction;
        self.pan("move_up", 0.0, d)
    }

    pub fn move_down(&mut self) -> crate::Result<RenderState> {
        let d = -self.viewport.complex_height() * self.settings.pan_fraction;
        self.pan("move_down", 0.0, d)
    }

    pub fn zoom_in(&mut self) -> crate::Result<RenderState> {
        let factor = self.settings.zoom_factor;
        self.zoom("zoom_in", factor)
    }

    pub fn zoom_out(&mut self) -> crate::Result<RenderState> {
        let factor = 1.0 / self.settings.zoom_factor;
        self.zoom("zoom_out", factor)
    }

    /// Zoom so the pixel rectangle `(x, y, width, height)` fills the frame.
    ///
    /// The rectangle is expected to share the frame's aspect ratio; only its
    /// width sets the new scale.
    pub fn zoom_into_rect(&mut self, x: u32, y: u32, width: u32, height: u32) -> crate::Result<RenderState> {
        if self.reject_if_busy("zoom_into_rect") {
            return Ok(self.state());
        }
        if width == 0 || height == 0 {
            return Err(ExplorerError::InvalidRect { width, height });
        }
        let center = self.viewport.subpixel_to_complex(
            x as f64 + width as f64 / 2.0,
            y as f64 + height as f64 / 2.0,
        );
        let viewport = Viewport {
            center,
            scale: self.viewport.scale * self.viewport.width as f64 / width as f64,
            ..self.viewport
        };
        viewport.validate()?;
        self.navigate_to(viewport)
    }

    /// Return to the default view of the current mode.
    pub fn reset_view(&mut self) -> crate::Result<RenderState> {
        if self.reject_if_busy("reset_view") {
            return Ok(self.state());
        }
        let viewport = self.default_viewport(&self.mode);
        viewport.validate()?;
        self.navigate_to(viewport)
    }

    fn pan(&mut self, command: &'static str, d_re: f64, d_im: f64) -> crate::Result<RenderState> {
        if self.reject_if_busy(command) {
            return Ok(self.state());
        }
        let viewport = self.viewport.offset(d_re, d_im)?;
        self.navigate_to(viewport)
    }

    fn zoom(&mut self, command: &'static str, factor: f64) -> crate::Result<RenderState> {
        if self.reject_if_busy(command) {
            return Ok(self.state());
        }
        let viewport = self.viewport.zoomed(factor)?;
        self.navigate_to(viewport)
    }

    /// Render `viewport`, recording the view it replaces.
    fn navigate_to(&mut self, viewport: Viewport) -> crate::Result<RenderState> {
        let entry = self.snapshot();
        let state = self.dispatch(View {
            viewport,
            ..self.current_view()
        })?;
        self.history.push(&self.mode, entry);
        Ok(state)
    }

    // -----------------------------------------------------------------------
    // Undo
    // -----------------------------------------------------------------------

    /// Step back to the previous view of the current mode.
    ///
    /// An empty stack is a no-op. The restored view keeps the current frame
    /// size and iteration limit.
    pub fn undo(&mut self) -> crate::Result<RenderState> {
        if self.reject_if_busy("undo") {
            return Ok(self.state());
        }
        let Some(entry) = self.history.peek(&self.mode).cloned() else {
            debug!(mode = self.mode.label(), "Nothing to undo");
            return Ok(self.state());
        };
        let viewport = self.restored_viewport(&entry)?;
        let state = self.restore(
            View {
                viewport,
                ..self.current_view()
            },
            &entry,
        )?;
        self.history.pop(&self.mode);
        Ok(state)
    }

    // -----------------------------------------------------------------------
    // Julia mode
    // -----------------------------------------------------------------------

    /// Explore the Julia set seeded by the point under pixel `(px, py)`.
    ///
    /// Returns the seed formatted as `Seed: re ± |im|i`, or `None` when the
    /// command was ignored (busy, or already in Julia mode).
    pub fn enable_julia(&mut self, px: f64, py: f64) -> crate::Result<Option<String>> {
        if self.reject_if_busy("enable_julia") {
            return Ok(None);
        }
        if self.mode.is_julia() {
            debug!("Already exploring a Julia set");
            return Ok(None);
        }
        let seed = self.pointer_coords(px, py);
        if !seed.is_finite() {
            return Err(CoreError::InvalidViewport {
                reason: format!("pixel ({px}, {py}) maps to a non-finite seed"),
            }
            .into());
        }
        let viewport = Viewport::default_julia(
            self.viewport.width,
            self.viewport.height,
            self.viewport.max_iterations,
        );
        viewport.validate()?;

        let entry = self.snapshot();
        self.dispatch(View {
            viewport,
            mode: FractalMode::Julia { seed },
            ..self.current_view()
        })?;
        self.history.enter_julia(entry);

        let label = format!("Seed: {seed:.3}");
        info!(seed = %label, "Entered Julia mode");
        Ok(Some(label))
    }

    /// Go back to the Mandelbrot view that was left for Julia mode.
    ///
    /// The Julia history is discarded.
    pub fn disable_julia(&mut self) -> crate::Result<RenderState> {
        if self.reject_if_busy("disable_julia") {
            return Ok(self.state());
        }
        if !self.mode.is_julia() {
            return Ok(self.state());
        }

        let mode = FractalMode::Mandelbrot;
        let fallback = self.default_viewport(&mode);
        let state = match self.history.peek(&mode).cloned() {
            Some(entry) => {
                let viewport = self.restored_viewport(&entry).unwrap_or(fallback);
                self.restore(
                    View {
                        viewport,
                        mode,
                        ..self.current_view()
                    },
                    &entry,
                )?
            }
            None => self.dispatch(View {
                viewport: fallback,
                mode,
                ..self.current_view()
            })?,
        };
        self.history.leave_julia();
        info!("Left Julia mode");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use juliabrot_core::Complex;

    use crate::settings::ExplorerSettings;
    use crate::state::RenderState;
    use crate::Explorer;

    const TIMEOUT: Duration = Duration::from_secs(60);

    fn settled() -> Explorer {
        let mut explorer = Explorer::new(ExplorerSettings {
            width: 40,
            height: 20,
            max_iterations: 50,
            workers: Some(2),
            ..Default::default()
        })
        .unwrap();
        explorer.wait(TIMEOUT).unwrap();
        explorer
    }

    #[test]
    fn pan_moves_by_fraction_of_extent() {
        let mut explorer = settled();
        let before = *explorer.viewport();
        explorer.move_right().unwrap();
        let after = *explorer.viewport();
        assert!((after.center.re - before.center.re - before.complex_width() * 0.2).abs() < 1e-12);
        assert_eq!(after.center.im, before.center.im);
        assert_eq!(after.scale, before.scale);
        explorer.wait(TIMEOUT).unwrap();

        explorer.move_up().unwrap();
        assert!(explorer.viewport().center.im > after.center.im);
    }

    #[test]
    fn zoom_changes_scale_by_factor() {
        let mut explorer = settled();
        let scale = explorer.viewport().scale;
        explorer.zoom_in().unwrap();
        assert_eq!(explorer.viewport().scale, scale * 2.0);
        explorer.wait(TIMEOUT).unwrap();
        explorer.zoom_out().unwrap();
        assert_eq!(explorer.viewport().scale, scale);
        assert!((explorer.zoom_level() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rect_zoom_centres_on_rectangle() {
        let mut explorer = settled();
        let before = *explorer.viewport();
        explorer.zoom_into_rect(10, 5, 10, 5).unwrap();
        let after = *explorer.viewport();
        let expected = before.subpixel_to_complex(15.0, 7.5);
        assert_eq!(after.center, expected);
        assert_eq!(after.scale, before.scale * 4.0);
    }

    #[test]
    fn empty_rect_is_rejected() {
        let mut explorer = settled();
        let before = *explorer.viewport();
        assert!(explorer.zoom_into_rect(3, 3, 0, 4).is_err());
        assert_eq!(*explorer.viewport(), before);
        assert_eq!(explorer.state(), RenderState::Idle);
    }

    #[test]
    fn seed_label_uses_three_decimals() {
        let mut explorer = settled();
        let seed = explorer.pointer_coords(30.0, 15.0);
        let label = explorer.enable_julia(30.0, 15.0).unwrap().unwrap();
        assert_eq!(label, format!("Seed: {seed:.3}"));
        assert!(label.starts_with("Seed: "));
        assert!(label.contains(" - ") || label.contains(" + "));
        assert_eq!(explorer.mode().seed(), Some(seed));
        assert_eq!(explorer.viewport().center, Complex::ZERO);
    }

    #[test]
    fn enable_julia_twice_is_ignored() {
        let mut explorer = settled();
        explorer.enable_julia(1.0, 1.0).unwrap().unwrap();
        explorer.wait(TIMEOUT).unwrap();
        let mode = explorer.mode();
        assert_eq!(explorer.enable_julia(5.0, 5.0).unwrap(), None);
        assert_eq!(explorer.mode(), mode);
    }

    #[test]
    fn reset_view_is_undoable() {
        let mut explorer = settled();
        explorer.zoom_in().unwrap();
        explorer.wait(TIMEOUT).unwrap();
        let zoomed = *explorer.viewport();

        explorer.reset_view().unwrap();
        explorer.wait(TIMEOUT).unwrap();
        assert!((explorer.zoom_level() - 1.0).abs() < 1e-12);

        explorer.undo().unwrap();
        assert_eq!(explorer.viewport().scale, zoomed.scale);
    }
}
