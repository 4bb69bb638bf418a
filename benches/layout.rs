//! Benchmarks for layout computation and painting.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use revgrid::data::{DataValue, FieldListSchemaServer, RowArrayDataServer};
use revgrid::grid::Grid;
use revgrid::layout::{Axis, AxisExtents, ScrollDimension};
use revgrid::render::RecordingCanvas;
use revgrid::scheduler::ManualScheduler;
use revgrid::GridSettings;

fn build_grid(columns: usize, rows: usize) -> Grid {
    let names: Vec<String> = (0..columns).map(|c| format!("Col{c}")).collect();
    let data: Vec<Vec<DataValue>> = (0..rows)
        .map(|r| {
            (0..columns)
                .map(|c| DataValue::from(format!("r{r}c{c}")))
                .collect()
        })
        .collect();
    let mut grid = Grid::with_header(
        GridSettings::default(),
        Box::new(FieldListSchemaServer::from_names(&names)),
        Box::new(RowArrayDataServer::new(data)),
        Box::new(ManualScheduler::new()),
    )
    .expect("grid builds");
    grid.resize_canvas(1600.0, 900.0);
    grid
}

/// Recompute the visible columns and rows after a one-row scroll
fn bench_compute_after_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_after_scroll");
    for rows in [1_000usize, 100_000] {
        let mut grid = build_grid(50, rows);
        grid.compute_layout();
        let mut down = true;
        group.bench_with_input(BenchmarkId::new("rows", rows), &rows, |b, _| {
            b.iter(|| {
                if !grid.scroll_rows_by(if down { 1 } else { -1 }) {
                    down = !down;
                }
                black_box(grid.compute_layout())
            })
        });
    }
    group.finish();
}

/// Pixel to anchor conversion over a long axis
fn bench_scroll_anchor(c: &mut Criterion) {
    let sizes: Vec<f32> = (0..100_000).map(|i| 18.0 + (i % 7) as f32).collect();
    let mut dim = ScrollDimension::new(Axis::Vertical);
    dim.compute(AxisExtents {
        item_sizes: sizes,
        fixed_count: 2,
        gap: 1.0,
        fixed_gap: 2.0,
        leading: 20.0,
        trailing: 0.0,
        canvas_extent: 900.0,
        smooth: true,
        right_aligned: false,
    });
    let max = dim.max_viewport_start();

    c.bench_function("calculate_scroll_anchor", |b| {
        let mut start = 0.0f32;
        b.iter(|| {
            start = (start + 977.0) % max;
            black_box(dim.calculate_scroll_anchor(black_box(start)))
        })
    });

    c.bench_function("scroll_into_view", |b| {
        let mut index = 2usize;
        b.iter(|| {
            index = (index + 7919) % 100_000;
            black_box(dim.calculate_scroll_anchor_to_scroll_into_view(index.max(2), false))
        })
    });
}

/// Paint a frame with everything dirty, then one where the memo skips all cells
fn bench_render(c: &mut Criterion) {
    let mut grid = build_grid(30, 10_000);
    let mut canvas = RecordingCanvas::new();
    grid.on_animation_frame(&mut canvas).expect("frame paints");
    let cells = grid.core().view_layout.columns().len() * grid.core().view_layout.rows().len();

    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(cells as u64));

    group.bench_function("full_repaint", |b| {
        b.iter(|| {
            canvas.take_ops();
            grid.renderer_mut().force_repaint();
            grid.core_mut().invalidate_paint();
            black_box(grid.on_animation_frame(&mut canvas).expect("frame paints"))
        })
    });

    group.bench_function("unchanged_frame", |b| {
        b.iter(|| {
            grid.core_mut().invalidate_paint();
            black_box(grid.on_animation_frame(&mut canvas).expect("frame paints"))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_compute_after_scroll,
    bench_scroll_anchor,
    bench_render,
);

criterion_main!(benches);
