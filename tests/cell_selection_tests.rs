//! Mouse selection tests
//!
//! Click, modifier clicks, drag extension, header column selection and
//! autoscroll while dragging outside the scrollable area.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{TestGrid, MAIN};
use revgrid::behavior::Propagation;
use revgrid::geometry::Point;
use revgrid::grid::GridEvent;
use revgrid::scheduler::TimerPurpose;
use revgrid::selection::SelectionAreaType;
use revgrid::settings::ModifierKeys;

// ============================================================================
// Click and drag
// ============================================================================

#[test]
fn test_click_selects_single_cell_and_focuses_it() {
    let mut t = TestGrid::standard();
    t.click_cell(3, 4, ModifierKeys::NONE);

    let selection = t.grid.selection();
    assert_eq!(selection.area_count(), 1);
    assert_eq!(t.last_area(), (3, 4, 1, 1));
    assert_eq!(selection.last_area().unwrap().subgrid, MAIN);
    assert_eq!(t.grid.focus().current_subgrid_point(), Some(Point::new(3, 4)));
    assert_eq!(t.grid.focus().subgrid(), Some(MAIN));
}

#[test]
fn test_drag_extends_from_origin_in_both_directions() {
    let mut t = TestGrid::standard();
    let start = t.cell_center(3, 4);
    assert_eq!(t.down(start, ModifierKeys::NONE), Propagation::Handled);
    assert_eq!(t.last_area(), (3, 4, 1, 1));

    let right = t.cell_center(6, 4);
    t.move_to(right);
    assert_eq!(t.last_area(), (3, 4, 4, 1));

    let left = t.cell_center(1, 4);
    t.move_to(left);
    assert_eq!(t.last_area(), (1, 4, 3, 1));

    let below = t.cell_center(1, 7);
    t.move_to(below);
    assert_eq!(t.last_area(), (1, 4, 3, 4));

    t.up(below);
    assert_eq!(t.grid.selection().area_count(), 1);
    // Focus stays where the press happened.
    assert_eq!(t.grid.focus().current_subgrid_point(), Some(Point::new(3, 4)));
}

#[test]
fn test_move_without_press_changes_nothing() {
    let mut t = TestGrid::standard();
    let at = t.cell_center(2, 2);
    t.move_to(at);
    assert!(t.grid.selection().is_empty());
}

#[test]
fn test_click_emits_clicked_selection_and_focus_events() {
    let mut t = TestGrid::standard();
    t.click_cell(2, 5, ModifierKeys::NONE);
    let events = t.grid.drain_events();
    assert!(events.contains(&GridEvent::CellClicked {
        point: Point::new(2, 5),
        subgrid: MAIN
    }));
    assert!(events
        .iter()
        .any(|e| matches!(e, GridEvent::SelectionChanged { .. })));
    assert!(events.contains(&GridEvent::FocusChanged {
        point: Some(Point::new(2, 5)),
        subgrid: Some(MAIN)
    }));
}

#[test]
fn test_click_requests_one_frame() {
    let mut t = TestGrid::standard();
    let before = t.scheduler.frame_request_count();
    t.click_cell(2, 5, ModifierKeys::NONE);
    assert_eq!(t.scheduler.frame_request_count(), before + 1);
    assert!(t.scheduler.take_frame_request());
}

// ============================================================================
// Modifier clicks
// ============================================================================

#[test]
fn test_ctrl_click_toggles_cells() {
    let mut t = TestGrid::standard();
    t.click_cell(2, 2, ModifierKeys::NONE);
    t.click_cell(5, 5, ModifierKeys::ctrl());
    assert_eq!(t.grid.selection().area_count(), 2);
    assert!(t.grid.selection().is_cell_selected(2, 2, MAIN));
    assert!(t.grid.selection().is_cell_selected(5, 5, MAIN));

    t.click_cell(5, 5, ModifierKeys::ctrl());
    assert_eq!(t.grid.selection().area_count(), 1);
    assert!(!t.grid.selection().is_cell_selected(5, 5, MAIN));
}

#[test]
fn test_shift_click_extends_last_area_and_keeps_focus() {
    let mut t = TestGrid::standard();
    t.click_cell(2, 2, ModifierKeys::NONE);
    t.click_cell(4, 5, ModifierKeys::shift());
    assert_eq!(t.grid.selection().area_count(), 1);
    assert_eq!(t.last_area(), (2, 2, 3, 4));
    assert_eq!(t.grid.focus().current_subgrid_point(), Some(Point::new(2, 2)));
}

#[test]
fn test_alt_click_selects_row() {
    let mut t = TestGrid::standard();
    t.click_cell(3, 6, ModifierKeys::alt());
    let area = *t.grid.selection().last_area().unwrap();
    assert_eq!(area.area_type, SelectionAreaType::Row);
    assert!(t.grid.selection().is_row_selected(6, MAIN));
    assert_eq!(t.grid.selection().selected_row_indices(MAIN), vec![6]);
}

#[test]
fn test_single_area_mode_ctrl_click_replaces() {
    let mut t = TestGrid::new(
        revgrid::GridSettings {
            multiple_selection_areas: false,
            ..common::settings()
        },
        10,
        50,
        1000.0,
        400.0,
    );
    t.click_cell(2, 2, ModifierKeys::NONE);
    t.click_cell(5, 5, ModifierKeys::ctrl());
    assert_eq!(t.grid.selection().area_count(), 1);
    assert_eq!(t.last_area(), (5, 5, 1, 1));
}

#[test]
fn test_mouse_cell_selection_off_leaves_selection_alone() {
    let mut t = TestGrid::new(
        revgrid::GridSettings {
            mouse_cell_selection: false,
            ..common::settings()
        },
        10,
        50,
        1000.0,
        400.0,
    );
    t.click_cell(2, 2, ModifierKeys::NONE);
    assert!(t.grid.selection().is_empty());
}

// ============================================================================
// Header column selection
// ============================================================================

#[test]
fn test_header_click_and_drag_selects_columns() {
    let mut t = TestGrid::standard();
    let start = t.header_center(3);
    t.down(start, ModifierKeys::NONE);
    assert!(t.grid.selection().is_column_selected(3));

    let end = t.header_center(5);
    t.move_to(end);
    t.up(end);
    assert_eq!(t.grid.selection().selected_column_indices(), vec![3, 4, 5]);
    assert_eq!(t.grid.selection().area_count(), 1);
}

// ============================================================================
// Autoscroll
// ============================================================================

#[test]
fn test_drag_below_viewport_autoscrolls_until_release() {
    let mut t = TestGrid::narrow();
    let start = t.cell_center(1, 2);
    t.down(start, ModifierKeys::NONE);

    // Below the canvas: the first step happens at once, then every 25 ms.
    t.move_to((start.0, 250.0));
    assert_eq!(t.last_area(), (1, 2, 1, 2));
    assert_eq!(t.scheduler.pending_purposes(), vec![TimerPurpose::SelectionAutoScroll]);

    let fired = t.advance(25 * 10);
    assert_eq!(fired.len(), 10);
    assert!(fired.iter().all(|p| *p == TimerPurpose::SelectionAutoScroll));
    assert_eq!(t.last_area(), (1, 2, 1, 12));
    assert!(t.grid.core().view_layout.row_scroll_anchor().index > 0);

    t.up((start.0, 250.0));
    assert!(t.scheduler.pending_purposes().is_empty());
    let settled = t.last_area();
    t.advance(100);
    assert_eq!(t.last_area(), settled);
}

#[test]
fn test_autoscroll_stops_when_pointer_returns_inside() {
    let mut t = TestGrid::narrow();
    let start = t.cell_center(1, 2);
    t.down(start, ModifierKeys::NONE);
    t.move_to((start.0, 250.0));
    t.advance(50);
    t.frame();

    let inside = t.cell_center(2, 3);
    t.move_to(inside);
    assert!(t.scheduler.pending_purposes().is_empty());
    assert_eq!(t.last_area(), (1, 2, 2, 2));
}

#[test]
fn test_autoscroll_clamps_at_last_row() {
    let mut t = TestGrid::new(common::settings(), 4, 12, 400.0, 200.0);
    let start = t.cell_center(0, 0);
    t.down(start, ModifierKeys::NONE);
    t.move_to((start.0, 250.0));
    t.advance(25 * 40);
    assert_eq!(t.last_area(), (0, 0, 1, 12));
    t.up((start.0, 250.0));
}
