use criterion::{criterion_group, criterion_main, Criterion};

use juliabrot_core::{Complex, FractalMode, PixelResult, Viewport};
use juliabrot_render::{Brush, BrushKind, RenderJob, RenderProgress, Renderer};

fn bench_full_frame_render(c: &mut Criterion) {
    let viewport = Viewport::default_mandelbrot(640, 480, 1000);
    let brush = Brush::new(BrushKind::Smooth, 1000);
    let renderer = Renderer::new(0).unwrap();
    let progress = RenderProgress::new();
    let job = RenderJob {
        viewport,
        mode: FractalMode::Mandelbrot,
        brush: &brush,
        color_offset: 0.0,
    };

    c.bench_function("full_frame_640x480", |b| {
        b.iter(|| renderer.render(&job, &progress).unwrap());
    });
}

fn bench_julia_render(c: &mut Criterion) {
    let viewport = Viewport::default_julia(256, 256, 1000);
    let brush = Brush::new(BrushKind::Banded, 1000);
    let renderer = Renderer::new(0).unwrap();
    let progress = RenderProgress::new();
    let job = RenderJob {
        viewport,
        mode: FractalMode::Julia {
            seed: Complex::new(-0.8, 0.156),
        },
        brush: &brush,
        color_offset: 0.25,
    };

    c.bench_function("julia_256x256_1000iter", |b| {
        b.iter(|| renderer.render(&job, &progress).unwrap());
    });
}

fn bench_brushes(c: &mut Criterion) {
    let results: Vec<PixelResult> = (0..4096)
        .map(|i| PixelResult::new(i % 1000, 2.0 + (i % 17) as f64))
        .collect();

    for kind in BrushKind::ALL {
        let brush = Brush::new(kind, 1000);
        c.bench_function(&format!("brush_{}", kind.label().to_lowercase()), |b| {
            b.iter(|| {
                results
                    .iter()
                    .map(|r| brush.color(*r, 0.1)[0] as u32)
                    .sum::<u32>()
            });
        });
    }
}

criterion_group!(
    benches,
    bench_full_frame_render,
    bench_julia_render,
    bench_brushes
);
criterion_main!(benches);
