//! Keyboard navigation tests
//!
//! Focus movement, shift extension, paging, select-all, escape and copy.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{TestGrid, MAIN};
use revgrid::behavior::{Key, KeyEvent, Propagation};
use revgrid::geometry::Point;
use revgrid::grid::GridEvent;
use revgrid::settings::ModifierKeys;
use test_case::test_case;

fn press(t: &mut TestGrid, key: Key, modifiers: ModifierKeys) -> Propagation {
    t.grid
        .key_down(KeyEvent::new(key).with_modifiers(modifiers))
        .expect("key handled")
}

fn focus(t: &TestGrid) -> Option<Point> {
    t.grid.focus().current_subgrid_point()
}

// ============================================================================
// Focus movement
// ============================================================================

#[test]
fn test_arrow_without_focus_focuses_first_cell() {
    let mut t = TestGrid::standard();
    assert_eq!(press(&mut t, Key::ArrowDown, ModifierKeys::NONE), Propagation::Handled);
    assert_eq!(focus(&t), Some(Point::new(0, 0)));
    assert_eq!(t.grid.focus().subgrid(), Some(MAIN));
    assert_eq!(t.last_area(), (0, 0, 1, 1));
}

#[test_case(Key::ArrowRight, (4, 3) ; "right")]
#[test_case(Key::ArrowLeft, (2, 3) ; "left")]
#[test_case(Key::ArrowDown, (3, 4) ; "down")]
#[test_case(Key::ArrowUp, (3, 2) ; "up")]
#[test_case(Key::Home, (0, 3) ; "home")]
#[test_case(Key::End, (9, 3) ; "end")]
fn test_navigation_key_moves_focus_and_selects_only(key: Key, expected: (usize, usize)) {
    let mut t = TestGrid::standard();
    t.click_cell(3, 3, ModifierKeys::NONE);
    t.click_cell(7, 7, ModifierKeys::ctrl());
    t.grid.core_mut().focus.set(Point::new(3, 3), MAIN);
    t.grid.flush();

    press(&mut t, key, ModifierKeys::NONE);
    assert_eq!(focus(&t), Some(Point::new(expected.0, expected.1)));
    assert_eq!(t.grid.selection().area_count(), 1);
    assert_eq!(t.last_area(), (expected.0, expected.1, 1, 1));
}

#[test]
fn test_arrow_at_edge_does_not_move() {
    let mut t = TestGrid::standard();
    t.click_cell(0, 0, ModifierKeys::NONE);
    t.grid.drain_events();
    press(&mut t, Key::ArrowLeft, ModifierKeys::NONE);
    press(&mut t, Key::ArrowUp, ModifierKeys::NONE);
    assert_eq!(focus(&t), Some(Point::new(0, 0)));
    assert!(t.grid.drain_events().is_empty());
}

#[test]
fn test_shift_arrow_extends_from_origin() {
    let mut t = TestGrid::standard();
    t.click_cell(2, 2, ModifierKeys::NONE);
    press(&mut t, Key::ArrowRight, ModifierKeys::shift());
    press(&mut t, Key::ArrowRight, ModifierKeys::shift());
    press(&mut t, Key::ArrowDown, ModifierKeys::shift());
    assert_eq!(t.grid.selection().area_count(), 1);
    assert_eq!(t.last_area(), (2, 2, 3, 2));
    assert_eq!(focus(&t), Some(Point::new(4, 3)));

    // Moving back past the origin flips the rectangle.
    for _ in 0..4 {
        press(&mut t, Key::ArrowLeft, ModifierKeys::shift());
    }
    assert_eq!(t.last_area(), (0, 2, 3, 2));
}

#[test]
fn test_shift_arrow_after_row_click_extends_rows() {
    let mut t = TestGrid::standard();
    t.click_cell(1, 4, ModifierKeys::alt());
    press(&mut t, Key::ArrowDown, ModifierKeys::shift());
    press(&mut t, Key::ArrowDown, ModifierKeys::shift());
    assert_eq!(t.grid.selection().selected_row_indices(MAIN), vec![4, 5, 6]);
}

// ============================================================================
// Paging and scrolling into view
// ============================================================================

#[test]
fn test_page_down_moves_by_visible_rows_and_scrolls() {
    let mut t = TestGrid::narrow();
    assert_eq!(t.grid.core().view_layout.fully_visible_scrollable_row_count(), 9);
    t.click_cell(0, 0, ModifierKeys::NONE);

    press(&mut t, Key::PageDown, ModifierKeys::NONE);
    assert_eq!(focus(&t), Some(Point::new(0, 9)));
    assert_eq!(t.grid.core().view_layout.row_scroll_anchor().index, 1);

    t.frame();
    press(&mut t, Key::PageUp, ModifierKeys::NONE);
    assert_eq!(focus(&t), Some(Point::new(0, 0)));
    assert_eq!(t.grid.core().view_layout.row_scroll_anchor().index, 0);
}

#[test]
fn test_ctrl_home_and_end_jump_rows() {
    let mut t = TestGrid::narrow();
    t.click_cell(2, 3, ModifierKeys::NONE);

    press(&mut t, Key::End, ModifierKeys::ctrl());
    assert_eq!(focus(&t), Some(Point::new(2, 49)));
    assert_eq!(t.grid.core().view_layout.row_scroll_anchor().index, 41);

    t.frame();
    let row = t
        .grid
        .core()
        .view_layout
        .try_get_row_with_subgrid_row_index(MAIN, 49)
        .copied()
        .expect("last row laid out");
    assert!(row.bottom_plus1 <= 200.0);

    press(&mut t, Key::Home, ModifierKeys::ctrl());
    assert_eq!(focus(&t), Some(Point::new(2, 0)));
    assert_eq!(t.grid.core().view_layout.row_scroll_anchor().index, 0);
}

#[test]
fn test_arrow_right_scrolls_column_into_view() {
    let mut t = TestGrid::narrow();
    t.click_cell(3, 0, ModifierKeys::NONE);
    assert_eq!(t.grid.core().view_layout.column_scroll_anchor().index, 0);
    press(&mut t, Key::ArrowRight, ModifierKeys::NONE);
    assert_eq!(focus(&t), Some(Point::new(4, 0)));
    t.frame();
    let column = *t
        .grid
        .core()
        .view_layout
        .try_get_column_with_active_index(4)
        .expect("column 4 laid out");
    assert!(column.right_plus1 <= 450.0 + 1e-3);
}

// ============================================================================
// Shortcuts
// ============================================================================

#[test]
fn test_ctrl_a_selects_all_rows() {
    let mut t = TestGrid::standard();
    let handled = press(&mut t, Key::Character('a'), ModifierKeys::ctrl());
    assert_eq!(handled, Propagation::Handled);
    assert!(t.grid.selection().all_rows_selected());
    assert!(t.grid.selection().is_cell_selected(9, 49, MAIN));
}

#[test]
fn test_escape_clears_selection_but_keeps_focus() {
    let mut t = TestGrid::standard();
    t.click_cell(2, 2, ModifierKeys::NONE);
    t.grid.drain_events();
    press(&mut t, Key::Escape, ModifierKeys::NONE);
    assert!(t.grid.selection().is_empty());
    assert_eq!(focus(&t), Some(Point::new(2, 2)));
    let events = t.grid.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, GridEvent::SelectionChanged { .. })));
}

#[test]
fn test_ctrl_c_copies_selection_as_tsv() {
    let mut t = TestGrid::standard();
    t.click_cell(1, 1, ModifierKeys::NONE);
    t.click_cell(2, 2, ModifierKeys::shift());
    t.grid.drain_events();

    press(&mut t, Key::Character('c'), ModifierKeys::ctrl());
    let events = t.grid.drain_events();
    assert_eq!(
        events,
        vec![GridEvent::Copy {
            text: "r1c1\tr1c2\nr2c1\tr2c2".to_string()
        }]
    );
}

#[test]
fn test_ctrl_c_with_gap_leaves_empty_cells() {
    let mut t = TestGrid::standard();
    t.click_cell(0, 0, ModifierKeys::NONE);
    t.click_cell(2, 2, ModifierKeys::ctrl());
    assert_eq!(
        t.grid.selection_to_text().as_deref(),
        Some("r0c0\t\t\n\t\tr2c2")
    );
}

#[test]
fn test_ctrl_c_without_selection_emits_nothing() {
    let mut t = TestGrid::standard();
    press(&mut t, Key::Character('c'), ModifierKeys::ctrl());
    assert!(t.grid.drain_events().is_empty());
}

#[test]
fn test_unbound_key_continues() {
    let mut t = TestGrid::standard();
    assert_eq!(
        press(&mut t, Key::Character('x'), ModifierKeys::NONE),
        Propagation::Continue
    );
    assert_eq!(
        press(&mut t, Key::Other("F2".to_string()), ModifierKeys::NONE),
        Propagation::Continue
    );
}
