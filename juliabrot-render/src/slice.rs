/// A contiguous range of pixel columns spanning the full frame height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    /// First pixel column of the slice.
    pub x: u32,
    /// Number of columns (the last slice may be wider).
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
}

impl Slice {
    /// Number of pixels in this slice.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// One past the last column of the slice.
    pub fn end(&self) -> u32 {
        self.x + self.width
    }
}

/// Partition `[0, width)` into `count` fixed column slices.
///
/// `count` is clamped to `1..=width` so no slice is empty. Every slice is
/// `width / count` columns wide except the last, which absorbs the
/// remainder. The partition depends only on its inputs, never on scheduling.
pub fn build_slices(width: u32, height: u32, count: usize) -> Vec<Slice> {
    if width == 0 {
        return Vec::new();
    }
    let count = count.clamp(1, width as usize) as u32;
    let base = width / count;
    (0..count)
        .map(|i| {
            let x = i * base;
            let w = if i + 1 == count { width - x } else { base };
            Slice {
                x,
                width: w,
                height,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_partition(width: u32, count: usize) {
        let slices = build_slices(width, 3, count);
        let mut covered = vec![false; width as usize];
        for s in &slices {
            assert!(s.width > 0, "empty slice in {slices:?}");
            for x in s.x..s.end() {
                assert!(!covered[x as usize], "column {x} covered twice");
                covered[x as usize] = true;
            }
        }
        assert!(covered.iter().all(|&c| c), "all columns must be covered");
    }

    #[test]
    fn slices_cover_every_column_once() {
        for width in [1, 7, 64, 100, 333, 1024] {
            for count in [1, 2, 3, 8, 16, 2000] {
                assert_partition(width, count);
            }
        }
    }

    #[test]
    fn last_slice_absorbs_remainder() {
        let slices = build_slices(10, 4, 3);
        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0], Slice { x: 0, width: 3, height: 4 });
        assert_eq!(slices[1], Slice { x: 3, width: 3, height: 4 });
        assert_eq!(slices[2], Slice { x: 6, width: 4, height: 4 });
    }

    #[test]
    fn count_is_clamped() {
        assert_eq!(build_slices(5, 1, 0).len(), 1);
        assert_eq!(build_slices(5, 1, 64).len(), 5);
        assert!(build_slices(0, 1, 4).is_empty());
    }

    #[test]
    fn pixel_count_spans_full_height() {
        let total: usize = build_slices(123, 45, 8).iter().map(Slice::pixel_count).sum();
        assert_eq!(total, 123 * 45);
    }
}
