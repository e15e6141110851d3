use juliabrot_core::{Complex, FractalMode, Viewport};
use juliabrot_render::{Brush, BrushKind, RenderError, RenderJob, RenderProgress, Renderer, BLACK};

fn job(viewport: Viewport, mode: FractalMode, brush: &Brush) -> RenderJob<'_> {
    RenderJob {
        viewport,
        mode,
        brush,
        color_offset: 0.0,
    }
}

#[test]
fn end_to_end_mandelbrot_render() {
    let viewport = Viewport::default_mandelbrot(200, 150, 256);
    let brush = Brush::new(BrushKind::Smooth, 256);
    let renderer = Renderer::new(4).unwrap();
    let progress = RenderProgress::new();

    let result = renderer
        .render(&job(viewport, FractalMode::Mandelbrot, &brush), &progress)
        .unwrap();

    assert_eq!(result.frame.width, 200);
    assert_eq!(result.frame.height, 150);
    assert_eq!(result.frame.pixels.len(), 200 * 150 * 4);
    assert_eq!(result.slices, 4);
    assert!(result.elapsed.as_nanos() > 0);

    let chunks: Vec<&[u8]> = result.frame.pixels.chunks_exact(4).collect();
    assert!(
        chunks.iter().any(|px| px[0] > 0 || px[1] > 0 || px[2] > 0),
        "rendered image should contain non-black pixels"
    );
    assert!(
        chunks.iter().any(|px| *px == BLACK),
        "interior pixels should be black"
    );
    assert!(chunks.iter().all(|px| px[3] == 255), "frames are opaque");
}

#[test]
fn end_to_end_julia_render() {
    let viewport = Viewport::default_julia(100, 100, 256);
    let mode = FractalMode::Julia {
        seed: Complex::new(-0.7, 0.27015),
    };
    let brush = Brush::new(BrushKind::Tropical, 256);
    let result = Renderer::new(3)
        .unwrap()
        .render(&job(viewport, mode, &brush), &RenderProgress::new())
        .unwrap();

    assert_eq!(result.frame.pixels.len(), 100 * 100 * 4);
    let black = result
        .frame
        .pixels
        .chunks_exact(4)
        .filter(|px| *px == BLACK)
        .count();
    assert!(black > 0 && black < 100 * 100);
}

#[test]
fn output_independent_of_worker_count() {
    let viewport = Viewport::new(Complex::new(-0.745, 0.11), 4_000.0, 137, 91, 400).unwrap();
    let brush = Brush::with_seed(BrushKind::Banded, 400, 42);
    let reference = Renderer::new(1)
        .unwrap()
        .render(&job(viewport, FractalMode::Mandelbrot, &brush), &RenderProgress::new())
        .unwrap();

    for workers in [2, 3, 8, 200] {
        let other = Renderer::new(workers)
            .unwrap()
            .render(&job(viewport, FractalMode::Mandelbrot, &brush), &RenderProgress::new())
            .unwrap();
        assert_eq!(reference.frame, other.frame, "workers = {workers}");
    }
}

#[test]
fn render_determinism() {
    let viewport = Viewport::default_mandelbrot(128, 96, 300);
    let brush = Brush::new(BrushKind::Random, 300);
    let renderer = Renderer::new(4).unwrap();
    let progress = RenderProgress::new();

    let first = renderer
        .render(&job(viewport, FractalMode::Mandelbrot, &brush), &progress)
        .unwrap();
    let second = renderer
        .render(&job(viewport, FractalMode::Mandelbrot, &brush), &progress)
        .unwrap();
    assert_eq!(first.frame, second.frame);
}

#[test]
fn color_offset_shifts_banded_output() {
    let viewport = Viewport::default_mandelbrot(64, 48, 100);
    let brush = Brush::with_seed(BrushKind::Banded, 100, 7);
    let renderer = Renderer::new(2).unwrap();

    let plain = renderer
        .render(&job(viewport, FractalMode::Mandelbrot, &brush), &RenderProgress::new())
        .unwrap();
    let shifted = renderer
        .render(
            &RenderJob {
                color_offset: 0.5,
                ..job(viewport, FractalMode::Mandelbrot, &brush)
            },
            &RenderProgress::new(),
        )
        .unwrap();
    assert_ne!(plain.frame, shifted.frame);
}

#[test]
fn non_finite_mapping_is_an_error() {
    let viewport = Viewport::new(Complex::new(-f64::MAX, 0.0), 1e-300, 600, 4, 16).unwrap();
    let brush = Brush::new(BrushKind::Binary, 16);
    let err = Renderer::new(2)
        .unwrap()
        .render(&job(viewport, FractalMode::Mandelbrot, &brush), &RenderProgress::new())
        .unwrap_err();
    assert!(matches!(err, RenderError::NonFiniteCoordinate { .. }));
}
