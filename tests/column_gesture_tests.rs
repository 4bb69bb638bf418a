//! Column header gesture tests
//!
//! Drag-to-move with its dead zone, hiding by dropping off the grid, edge
//! scrolling, behaviour detach/reattach, and grid line resizing.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{TestGrid, MAIN};
use revgrid::behavior::{BehaviorId, ColumnMovingBehavior, Cursor, DragAction, ScrollDirection};
use revgrid::geometry::Point;
use revgrid::grid::GridEvent;
use revgrid::scheduler::TimerPurpose;
use revgrid::settings::ModifierKeys;
use revgrid::GridSettings;

fn field_order(t: &TestGrid) -> Vec<usize> {
    let columns = &t.grid.core().columns;
    (0..columns.active_column_count())
        .map(|i| columns.field_index_of_active(i).unwrap())
        .collect()
}

fn hideable() -> GridSettings {
    GridSettings {
        columns_reorderable_hideable: true,
        ..common::settings()
    }
}

// ============================================================================
// Classification
// ============================================================================

#[test]
fn test_classify_regions() {
    let t = TestGrid::narrow();
    let core = t.grid.core();
    // Column 1 spans 100..200; the dead zone widens it by half a neighbour.
    assert_eq!(ColumnMovingBehavior::classify(core, 1, 120.0, 10.0), DragAction::None);
    assert_eq!(ColumnMovingBehavior::classify(core, 1, 240.0, 10.0), DragAction::None);
    assert_eq!(
        ColumnMovingBehavior::classify(core, 1, 330.0, 10.0),
        DragAction::Move {
            target: 3,
            after: false
        }
    );
    assert_eq!(
        ColumnMovingBehavior::classify(core, 1, 370.0, 10.0),
        DragAction::Move {
            target: 3,
            after: true
        }
    );
    assert_eq!(
        ColumnMovingBehavior::classify(core, 1, 460.0, 10.0),
        DragAction::Scroll {
            direction: Some(ScrollDirection::Right),
            off_grid: true
        }
    );
    assert_eq!(
        ColumnMovingBehavior::classify(core, 1, 200.0, 250.0),
        DragAction::Scroll {
            direction: None,
            off_grid: true
        }
    );
}

#[test]
fn test_classify_fixed_columns_are_not_targets() {
    let t = TestGrid::new(
        GridSettings {
            fixed_column_count: 1,
            ..common::settings()
        },
        10,
        50,
        450.0,
        200.0,
    );
    let core = t.grid.core();
    assert_eq!(
        ColumnMovingBehavior::classify(core, 4, 50.0, 10.0),
        DragAction::Scroll {
            direction: Some(ScrollDirection::Left),
            off_grid: false
        }
    );
}

// ============================================================================
// Moving
// ============================================================================

#[test]
fn test_drag_header_moves_column() {
    let mut t = TestGrid::standard();
    t.click_cell(2, 3, ModifierKeys::NONE);
    t.grid.drain_events();

    let start = t.header_center(2);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((650.0, 10.0));
    assert!(!t.grid.chain().is_enabled(BehaviorId::Hover));
    assert!(!t.grid.chain().is_enabled(BehaviorId::CellSelection));
    assert_eq!(t.grid.shared().cursor, Cursor::Move);
    let drag = t.grid.shared().column_drag.unwrap();
    assert_eq!(drag.active_column_index, 2);
    assert_eq!(
        drag.action,
        DragAction::Move {
            target: 6,
            after: true
        }
    );

    t.up((650.0, 10.0));
    assert_eq!(field_order(&t), vec![0, 1, 3, 4, 5, 6, 2, 7, 8, 9]);
    assert!(t.grid.drain_events().contains(&GridEvent::ColumnsChanged));
    assert!(t.grid.shared().column_drag.is_none());
    assert_eq!(t.grid.shared().cursor, Cursor::Default);

    // Selection and focus travel with the column.
    assert_eq!(t.last_area(), (6, 3, 1, 1));
    assert_eq!(t.grid.focus().current_subgrid_point(), Some(Point::new(6, 3)));
}

#[test]
fn test_release_in_dead_zone_keeps_order() {
    let mut t = TestGrid::standard();
    let start = t.header_center(2);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((320.0, 10.0));
    assert_eq!(t.grid.shared().column_drag.unwrap().action, DragAction::None);
    t.up((320.0, 10.0));
    assert_eq!(field_order(&t), (0..10).collect::<Vec<_>>());
}

#[test]
fn test_ctrl_press_on_fixed_column_does_not_drag() {
    let mut t = TestGrid::new(
        GridSettings {
            fixed_column_count: 1,
            ..common::settings()
        },
        10,
        50,
        1000.0,
        400.0,
    );
    let start = t.header_center(0);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((650.0, 10.0));
    t.up((650.0, 10.0));
    assert!(t.grid.chain().is_enabled(BehaviorId::Hover));
    assert_eq!(field_order(&t), (0..10).collect::<Vec<_>>());
}

#[test]
fn test_reorder_disabled_leaves_header_to_selection() {
    let mut t = TestGrid::new(
        GridSettings {
            columns_reorderable: false,
            ..common::settings()
        },
        10,
        50,
        1000.0,
        400.0,
    );
    let start = t.header_center(2);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((650.0, 10.0));
    t.up((650.0, 10.0));
    assert!(t.grid.shared().column_drag.is_none());
    assert_eq!(field_order(&t), (0..10).collect::<Vec<_>>());
    assert!(t.grid.selection().is_column_selected(2));
}

// ============================================================================
// Hiding
// ============================================================================

#[test]
fn test_drop_off_grid_hides_when_hideable() {
    let mut t = TestGrid::new(hideable(), 10, 50, 1000.0, 400.0);
    let start = t.header_center(4);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((1005.0, 10.0));
    t.up((1005.0, 10.0));
    assert_eq!(t.grid.core().columns.active_column_count(), 9);
    assert_eq!(field_order(&t), vec![0, 1, 2, 3, 5, 6, 7, 8, 9]);
    assert_eq!(t.grid.core().columns.all_column_count(), 10);
}

#[test]
fn test_hidden_column_can_be_shown_again() {
    let mut t = TestGrid::new(hideable(), 10, 50, 1000.0, 400.0);
    t.click_cell(6, 1, ModifierKeys::NONE);
    assert!(t.grid.core_mut().hide_active_column(4));
    assert_eq!(t.last_area(), (5, 1, 1, 1));
    t.grid.drain_events();

    assert!(t.grid.core_mut().show_field(4, Some(4)));
    assert!(!t.grid.core_mut().show_field(4, None));
    assert_eq!(field_order(&t), (0..10).collect::<Vec<_>>());
    assert_eq!(t.last_area(), (6, 1, 1, 1));
    assert_eq!(t.grid.focus().current_subgrid_point(), Some(Point::new(6, 1)));
    assert!(t.grid.drain_events().contains(&GridEvent::ColumnsChanged));
}

#[test]
fn test_drop_off_grid_keeps_column_when_not_hideable() {
    let mut t = TestGrid::standard();
    let start = t.header_center(4);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((1005.0, 10.0));
    t.up((1005.0, 10.0));
    assert_eq!(t.grid.core().columns.active_column_count(), 10);
}

#[test]
fn test_drop_below_grid_inside_columns_hides() {
    let mut t = TestGrid::new(hideable(), 10, 50, 1000.0, 400.0);
    let start = t.header_center(4);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((450.0, 420.0));
    t.up((450.0, 420.0));
    assert_eq!(t.grid.core().columns.active_column_count(), 9);
}

// ============================================================================
// Edge scrolling and reattach
// ============================================================================

#[test]
fn test_edge_scroll_steps_every_400ms() {
    let mut t = TestGrid::narrow();
    let start = t.header_center(1);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((460.0, 10.0));
    assert_eq!(t.grid.core().view_layout.column_scroll_anchor().index, 1);
    assert_eq!(t.scheduler.pending_purposes(), vec![TimerPurpose::ColumnMoveEdgeScroll]);

    t.advance(399);
    assert_eq!(t.grid.core().view_layout.column_scroll_anchor().index, 1);
    t.advance(1);
    assert_eq!(t.grid.core().view_layout.column_scroll_anchor().index, 2);

    // Back inside: scrolling stops.
    t.frame();
    t.move_to((300.0, 10.0));
    assert!(t.scheduler.pending_purposes().is_empty());
    t.advance(800);
    assert_eq!(t.grid.core().view_layout.column_scroll_anchor().index, 2);
    t.up((300.0, 10.0));
}

#[test]
fn test_drag_keeps_tracking_after_pointer_leaves_canvas() {
    let mut t = TestGrid::narrow();
    let start = t.header_center(1);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((300.0, 10.0));
    t.move_to((449.0, 10.0));
    assert_eq!(t.grid.core().view_layout.column_scroll_anchor().index, 0);

    // Leaving the canvas only drops hover; the drag stays live and moves
    // keep arriving in canvas coordinates past the right edge.
    t.grid.pointer_leave().unwrap();
    assert!(t.grid.shared().column_drag.is_some());
    t.move_to((470.0, 10.0));
    assert_eq!(t.grid.core().view_layout.column_scroll_anchor().index, 1);
    t.advance(400);
    assert_eq!(t.grid.core().view_layout.column_scroll_anchor().index, 2);

    // Released outside the canvas: the drag ends there.
    t.up((470.0, 10.0));
    assert!(t.grid.shared().column_drag.is_none());
    assert_eq!(t.grid.shared().cursor, Cursor::Default);
    assert_eq!(field_order(&t), (0..10).collect::<Vec<_>>());
    assert_eq!(t.scheduler.pending_purposes(), vec![TimerPurpose::ReattachBehaviors]);
    t.advance(50);
    assert!(t.grid.chain().is_enabled(BehaviorId::Hover));
}

#[test]
fn test_behaviours_reattach_50ms_after_release() {
    let mut t = TestGrid::standard();
    let start = t.header_center(2);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((650.0, 30.0));
    t.up((650.0, 30.0));
    assert_eq!(t.scheduler.pending_purposes(), vec![TimerPurpose::ReattachBehaviors]);
    assert!(!t.grid.chain().is_enabled(BehaviorId::Hover));

    t.advance(49);
    assert!(!t.grid.chain().is_enabled(BehaviorId::CellSelection));
    let fired = t.advance(1);
    assert_eq!(fired, vec![TimerPurpose::ReattachBehaviors]);
    assert!(t.grid.chain().is_enabled(BehaviorId::Hover));
    assert!(t.grid.chain().is_enabled(BehaviorId::CellSelection));

    // The replayed pointer move brings hover back under the pointer.
    let hover = t.grid.shared().hover.expect("hover restored");
    assert_eq!(hover.row.subgrid, MAIN);
    assert_eq!(hover.row.subgrid_row_index, 0);
}

#[test]
fn test_press_before_reattach_reattaches_at_once() {
    let mut t = TestGrid::standard();
    let start = t.header_center(2);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((650.0, 10.0));
    t.up((650.0, 10.0));

    t.frame();
    t.click_cell(1, 1, ModifierKeys::NONE);
    assert!(t.grid.chain().is_enabled(BehaviorId::CellSelection));
    assert!(t.scheduler.pending_purposes().is_empty());
}

#[test]
fn test_detach_cancels_every_timer() {
    let mut t = TestGrid::narrow();
    let start = t.header_center(1);
    t.down(start, ModifierKeys::ctrl());
    t.move_to((460.0, 10.0));
    assert!(!t.scheduler.pending_purposes().is_empty());

    t.grid.detach();
    assert!(t.scheduler.pending_purposes().is_empty());
    assert!(t.grid.chain().is_enabled(BehaviorId::Hover));
    assert!(t.grid.chain().is_enabled(BehaviorId::CellSelection));
    assert!(t.grid.shared().column_drag.is_none());
}

// ============================================================================
// Resizing
// ============================================================================

#[test]
fn test_drag_grid_line_resizes_column() {
    let mut t = TestGrid::standard();
    t.move_to((201.0, 10.0));
    assert_eq!(t.grid.shared().cursor, Cursor::ColResize);

    t.down((200.0, 10.0), ModifierKeys::NONE);
    t.move_to((240.0, 10.0));
    assert_eq!(t.grid.core().columns.active_column_width(1), Some(140.0));
    t.move_to((0.0, 10.0));
    assert_eq!(t.grid.core().columns.active_column_width(1), Some(5.0));
    t.up((0.0, 10.0));
    assert!(t.grid.drain_events().contains(&GridEvent::ColumnsChanged));
    assert!(t.grid.selection().is_empty());
}
