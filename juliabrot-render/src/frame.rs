use crate::brush::{Rgba, BLACK};
use crate::slice::Slice;

/// A rendered RGBA image.
///
/// Frames are built once by the renderer and never modified after they are
/// published; a newer render produces a new frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl Frame {
    /// Create a new frame filled with opaque black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: BLACK.repeat(width as usize * height as usize),
        }
    }

    /// The color at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.pixels[idx..idx + 4]);
        Some(px)
    }

    /// Copy a slice's row-major RGBA data into its column range.
    pub fn blit_slice(&mut self, slice: &Slice, slice_pixels: &[u8]) {
        debug_assert_eq!(slice_pixels.len(), slice.pixel_count() * 4);
        debug_assert!(slice.end() <= self.width);
        let stride = self.width as usize * 4;
        let row_len = slice.width as usize * 4;
        for row in 0..slice.height.min(self.height) as usize {
            let src_start = row * row_len;
            let dst_start = row * stride + slice.x as usize * 4;
            self.pixels[dst_start..dst_start + row_len]
                .copy_from_slice(&slice_pixels[src_start..src_start + row_len]);
        }
    }
}
