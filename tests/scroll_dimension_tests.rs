//! Scroll anchor tests
//!
//! Anchor round trips, limit invariants, reset behaviour and scroll-into-view
//! for one axis, plus the same checks through a live grid.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::TestGrid;
use proptest::prelude::*;
use revgrid::layout::{Axis, AxisExtents, ScrollAnchor, ScrollDimension};

fn extents(sizes: Vec<f32>, fixed: usize, canvas: f32, smooth: bool, right: bool) -> AxisExtents {
    AxisExtents {
        item_sizes: sizes,
        fixed_count: fixed,
        gap: 0.0,
        fixed_gap: 0.0,
        leading: 0.0,
        trailing: 0.0,
        canvas_extent: canvas,
        smooth,
        right_aligned: right,
    }
}

fn dimension(extents: AxisExtents) -> ScrollDimension {
    let mut dim = ScrollDimension::new(Axis::Horizontal);
    dim.compute(extents);
    dim
}

/// Item sizes in whole pixels so pixel positions stay exact in f32.
fn item_sizes() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec((5u16..200).prop_map(f32::from), 1..40)
}

// ============================================================================
// Anchor round trip and limits
// ============================================================================

proptest! {
    #[test]
    fn test_smooth_anchor_round_trips_viewport_start(
        sizes in item_sizes(),
        fixed in 0usize..3,
        canvas in 100u16..800,
        right in any::<bool>(),
        gap in 0u8..4,
        fixed_gap in 0u8..4,
        fraction in 0.0f32..1.0,
    ) {
        prop_assume!(fixed < sizes.len());
        let dim = dimension(AxisExtents {
            gap: f32::from(gap),
            fixed_gap: f32::from(fixed_gap),
            ..extents(sizes, fixed, f32::from(canvas), true, right)
        });
        prop_assume!(dim.overflowed());

        let min = dim.min_viewport_start();
        let max = dim.max_viewport_start();
        let start = min + (max - min) * fraction;
        let anchor = dim.calculate_scroll_anchor(start);
        let back = dim.viewport_start_for_anchor(anchor);
        prop_assert!((back - start).abs() < 1e-2, "start {start} came back as {back}");
    }

    #[test]
    fn test_anchor_stays_within_limits(
        sizes in item_sizes(),
        fixed in 0usize..3,
        canvas in 100u16..800,
        smooth in any::<bool>(),
        right in any::<bool>(),
        fraction in -0.5f32..1.5,
    ) {
        prop_assume!(fixed < sizes.len());
        let dim = dimension(extents(sizes, fixed, f32::from(canvas), smooth, right));

        let min = dim.min_viewport_start();
        let max = dim.max_viewport_start().max(min);
        let anchor = dim.calculate_scroll_anchor(min + (max - min) * fraction);
        let limits = dim.anchor_limits();
        prop_assert!(anchor.index >= limits.start().index);
        prop_assert!(anchor.index <= limits.finish().index);
        prop_assert!(anchor.index >= fixed);
        if !smooth {
            prop_assert_eq!(anchor.offset, 0.0);
        }
    }

    #[test]
    fn test_step_anchor_never_leaves_limits(
        sizes in item_sizes(),
        canvas in 100u16..800,
        delta in -50isize..50,
    ) {
        let dim = dimension(extents(sizes, 0, f32::from(canvas), false, false));
        let stepped = dim.step_anchor(dim.anchor_limits().start(), delta);
        prop_assert!(stepped.index >= dim.anchor_limits().start().index);
        prop_assert!(stepped.index <= dim.anchor_limits().finish().index);
    }
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn test_reset_puts_both_limits_on_first_scrollable_item() {
    let mut grid = TestGrid::new(
        revgrid::GridSettings {
            fixed_column_count: 2,
            ..common::settings()
        },
        10,
        50,
        450.0,
        200.0,
    );
    grid.grid.scroll_columns_by(3);
    grid.frame();
    assert_eq!(grid.grid.core().view_layout.column_scroll_anchor().index, 5);

    grid.grid.core_mut().view_layout.reset();
    let limits = grid.grid.core().view_layout.horizontal().anchor_limits();
    assert_eq!(limits.start(), ScrollAnchor::new(2, 0.0));
    assert_eq!(limits.finish(), ScrollAnchor::new(2, 0.0));
    assert_eq!(
        grid.grid.core().view_layout.column_scroll_anchor(),
        ScrollAnchor::new(2, 0.0)
    );
}

// ============================================================================
// Scroll into view
// ============================================================================

fn mixed_widths() -> Vec<f32> {
    let mut sizes = vec![50.0, 50.0];
    sizes.extend(std::iter::repeat(100.0).take(8));
    sizes
}

#[test]
fn test_scroll_into_view_snapped_left_aligned() {
    // Fixed columns take 100 of 400: scrollable viewport is 300.
    let dim = dimension(extents(mixed_widths(), 2, 400.0, false, false));
    assert_eq!(dim.viewport_size(), 300.0);
    assert_eq!(dim.calculate_scroll_anchor(0.0), ScrollAnchor::new(2, 0.0));

    let anchor = dim.calculate_scroll_anchor_to_scroll_into_view(9, false);
    assert_eq!(anchor, ScrollAnchor::new(7, 0.0));

    // Column 9 spans 700..800 in scrollable space; the viewport now shows 500..800.
    let start = dim.viewport_start_for_anchor(anchor);
    let column_left = dim.scrollable_item_left(9);
    assert!(column_left >= start);
    assert!(column_left + dim.item_size(9) <= start + dim.viewport_size());
    let limits = dim.anchor_limits();
    assert!(anchor.index >= limits.start().index && anchor.index <= limits.finish().index);
}

#[test]
fn test_scroll_into_view_smooth_aligns_right_edge() {
    let dim = dimension(extents(mixed_widths(), 2, 400.0, true, false));
    let anchor = dim.calculate_scroll_anchor_to_scroll_into_view(8, false);
    let start = dim.viewport_start_for_anchor(anchor);
    let right = dim.scrollable_item_left(8) + dim.item_size(8);
    assert!((start + dim.viewport_size() - right).abs() < 1e-3);
}

#[test]
fn test_scroll_into_view_through_grid() {
    let mut grid = TestGrid::new(
        revgrid::GridSettings {
            fixed_column_count: 2,
            ..common::settings()
        },
        10,
        50,
        400.0,
        200.0,
    );
    grid.grid.core_mut().set_active_column_width(0, 50.0);
    grid.grid.core_mut().set_active_column_width(1, 50.0);
    grid.grid.flush();
    grid.grid.set_column_scroll_anchor(5, 0.0);
    grid.frame();
    assert_eq!(
        grid.grid.core().view_layout.column_scroll_anchor(),
        ScrollAnchor::new(5, 0.0)
    );

    let anchor = grid
        .grid
        .core_mut()
        .with_layout(|layout, inputs| layout.calculate_column_scroll_anchor_to_scroll_into_view(inputs, 9));
    assert_eq!(anchor, ScrollAnchor::new(7, 0.0));

    grid.grid.set_column_scroll_anchor(anchor.index, anchor.offset);
    grid.frame();
    let column = *grid
        .grid
        .core()
        .view_layout
        .try_get_column_with_active_index(9)
        .expect("column 9 laid out");
    assert!(column.left >= 100.0);
    assert!(column.left + column.width <= 400.0);
}

#[test]
fn test_ensure_column_in_view_is_noop_when_visible() {
    let mut grid = TestGrid::narrow();
    assert!(!grid.grid.core_mut().ensure_column_in_view(1, false));
    assert!(grid.grid.core_mut().ensure_column_in_view(8, false));
    grid.grid.flush();
    grid.frame();
    let column = *grid
        .grid
        .core()
        .view_layout
        .try_get_column_with_active_index(8)
        .expect("column 8 laid out");
    assert!(column.left + column.width <= 450.0);
}
