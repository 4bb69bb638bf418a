//! Data notification tests
//!
//! Selection and focus across sort/filter reindexing, row structure changes
//! and notifications for unknown subgrids.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use common::{TestGrid, MAIN};
use revgrid::behavior::{Key, KeyEvent};
use revgrid::data::{DataNotification, DataValue, RowArrayDataServer};
use revgrid::geometry::Point;
use revgrid::selection::SelectionAreaType;
use revgrid::settings::ModifierKeys;
use revgrid::subgrid::SubgridId;
use revgrid::{GridError, GridSettings};

/// Rows `[i, 10 * i, 100 * i]` for `i in 0..count`.
fn numeric_rows(count: usize) -> Vec<Vec<DataValue>> {
    (0..count)
        .map(|i| {
            let v = f64::from(u32::try_from(i).unwrap());
            vec![
                DataValue::from(v),
                DataValue::from(v * 10.0),
                DataValue::from(v * 100.0),
            ]
        })
        .collect()
}

fn numeric_grid(settings: GridSettings, data: RowArrayDataServer) -> TestGrid {
    TestGrid::with_data(settings, 3, data, 400.0, 400.0)
}

/// Cell (1, 2) selected and focused, plus row 5 as a row area.
fn select_cell_and_row(t: &mut TestGrid) {
    t.click_cell(1, 2, ModifierKeys::NONE);
    t.click_cell(
        0,
        5,
        ModifierKeys {
            alt: true,
            ctrl: true,
            ..ModifierKeys::NONE
        },
    );
    // Focus follows the last click; put it back on the cell.
    t.grid.core_mut().focus.set(Point::new(1, 2), MAIN);
    t.grid.flush();
}

fn sort_descending(t: &mut TestGrid) {
    t.grid
        .on_data_notification(MAIN, DataNotification::PreReindex)
        .unwrap();
    let [_, post] = t
        .grid
        .with_main_data(|data: &mut RowArrayDataServer| data.sort_by_field(0, false))
        .unwrap();
    t.grid.on_data_notification(MAIN, post).unwrap();
}

fn areas(t: &TestGrid) -> Vec<(SelectionAreaType, usize, usize, usize, usize)> {
    t.grid
        .selection()
        .areas()
        .iter()
        .map(|a| {
            let r = a.rectangle;
            (a.area_type, r.x, r.y, r.width, r.height)
        })
        .collect()
}

// ============================================================================
// Reindex
// ============================================================================

#[test]
fn test_sort_keeps_selection_on_same_rows() {
    let mut t = numeric_grid(common::settings(), RowArrayDataServer::new(numeric_rows(10)));
    select_cell_and_row(&mut t);
    assert_eq!(
        areas(&t),
        vec![
            (SelectionAreaType::Rectangle, 1, 2, 1, 1),
            (SelectionAreaType::Row, 0, 5, 3, 1),
        ]
    );

    sort_descending(&mut t);

    assert_eq!(
        areas(&t),
        vec![
            (SelectionAreaType::Rectangle, 1, 7, 1, 1),
            (SelectionAreaType::Row, 0, 4, 3, 1),
        ]
    );
    assert_eq!(t.grid.focus().current_subgrid_point(), Some(Point::new(1, 7)));
}

#[test]
fn test_filter_drops_selection_of_removed_rows() {
    let mut t = numeric_grid(common::settings(), RowArrayDataServer::new(numeric_rows(10)));
    t.click_cell(1, 3, ModifierKeys::NONE);
    t.click_cell(
        0,
        4,
        ModifierKeys {
            alt: true,
            ctrl: true,
            ..ModifierKeys::NONE
        },
    );
    t.grid.core_mut().focus.set(Point::new(1, 3), MAIN);
    t.grid.flush();

    t.grid
        .on_data_notification(MAIN, DataNotification::PreReindex)
        .unwrap();
    let [_, post] = t
        .grid
        .with_main_data(|data: &mut RowArrayDataServer| {
            data.retain_rows(|row| {
                matches!(row.first(), Some(DataValue::Number(v)) if v % 2.0 == 0.0)
            })
        })
        .unwrap();
    assert_eq!(post, DataNotification::PostReindex { all_rows_kept: false });
    t.grid.on_data_notification(MAIN, post).unwrap();

    // Row 3 is gone; row 4 is now the third row.
    assert_eq!(areas(&t), vec![(SelectionAreaType::Row, 0, 2, 3, 1)]);
    assert_eq!(t.grid.focus().current_subgrid_point(), None);
    assert_eq!(t.grid.core().main_row_count(), 5);
}

#[test]
fn test_reindex_without_row_ids_keeps_positions() {
    let data = RowArrayDataServer::new(numeric_rows(10)).without_row_ids();
    let mut t = numeric_grid(common::settings(), data);
    t.click_cell(1, 2, ModifierKeys::NONE);

    sort_descending(&mut t);

    assert_eq!(areas(&t), vec![(SelectionAreaType::Rectangle, 1, 2, 1, 1)]);
    assert_eq!(t.grid.focus().current_subgrid_point(), Some(Point::new(1, 2)));
}

#[test]
fn test_restore_flags_limit_what_survives() {
    let settings = GridSettings {
        restore_single_cell_selection: false,
        restore_focus: false,
        ..common::settings()
    };
    let mut t = numeric_grid(settings, RowArrayDataServer::new(numeric_rows(10)));
    select_cell_and_row(&mut t);

    sort_descending(&mut t);

    assert_eq!(areas(&t), vec![(SelectionAreaType::Row, 0, 4, 3, 1)]);
    assert_eq!(t.grid.focus().current_subgrid_point(), None);
}

#[test]
fn test_multi_cell_rectangles_do_not_survive_reindex() {
    let mut t = numeric_grid(common::settings(), RowArrayDataServer::new(numeric_rows(10)));
    t.click_cell(0, 1, ModifierKeys::NONE);
    t.click_cell(2, 3, ModifierKeys::shift());
    assert_eq!(areas(&t), vec![(SelectionAreaType::Rectangle, 0, 1, 3, 3)]);

    sort_descending(&mut t);

    assert!(t.grid.selection().is_empty());
    // Focus stayed on the pressed cell, which follows its row.
    assert_eq!(t.grid.focus().current_subgrid_point(), Some(Point::new(0, 8)));
}

#[test]
fn test_post_reindex_without_snapshot_clears() {
    let mut t = numeric_grid(common::settings(), RowArrayDataServer::new(numeric_rows(10)));
    t.click_cell(1, 2, ModifierKeys::NONE);
    t.grid
        .on_data_notification(MAIN, DataNotification::PostReindex { all_rows_kept: true })
        .unwrap();
    assert!(t.grid.selection().is_empty());
    assert_eq!(t.grid.focus().current_subgrid_point(), None);
}

#[test]
fn test_select_all_survives_reindex() {
    let mut t = numeric_grid(common::settings(), RowArrayDataServer::new(numeric_rows(10)));
    let select_all = KeyEvent::new(Key::Character('a')).with_modifiers(ModifierKeys::ctrl());
    t.grid.key_down(select_all).unwrap();
    assert!(t.grid.selection().all_rows_selected());
    sort_descending(&mut t);
    assert!(t.grid.selection().all_rows_selected());
}

// ============================================================================
// Row structure changes
// ============================================================================

#[test]
fn test_rows_inserted_and_deleted_shift_selection() {
    let mut t = numeric_grid(common::settings(), RowArrayDataServer::new(numeric_rows(10)));
    t.click_cell(1, 5, ModifierKeys::NONE);

    let inserted = t
        .grid
        .with_main_data(|data: &mut RowArrayDataServer| data.insert_rows(0, numeric_rows(2)))
        .unwrap();
    t.grid.on_data_notification(MAIN, inserted).unwrap();
    assert_eq!(areas(&t), vec![(SelectionAreaType::Rectangle, 1, 7, 1, 1)]);
    assert_eq!(t.grid.focus().current_subgrid_point(), Some(Point::new(1, 7)));
    assert_eq!(t.grid.core().main_row_count(), 12);

    let deleted = t
        .grid
        .with_main_data(|data: &mut RowArrayDataServer| data.delete_rows(7, 1))
        .unwrap();
    t.grid.on_data_notification(MAIN, deleted).unwrap();
    assert!(t.grid.selection().is_empty());
    assert_eq!(t.grid.focus().current_subgrid_point(), None);
}

#[test]
fn test_rows_moved_carry_single_cell() {
    let mut t = numeric_grid(common::settings(), RowArrayDataServer::new(numeric_rows(10)));
    t.click_cell(1, 2, ModifierKeys::NONE);
    let moved = t
        .grid
        .with_main_data(|data: &mut RowArrayDataServer| data.move_rows(2, 6, 1))
        .unwrap();
    t.grid.on_data_notification(MAIN, moved).unwrap();
    assert_eq!(areas(&t), vec![(SelectionAreaType::Rectangle, 1, 6, 1, 1)]);
}

#[test]
fn test_all_rows_deleted_clears_selection_and_focus() {
    let mut t = numeric_grid(common::settings(), RowArrayDataServer::new(numeric_rows(10)));
    t.click_cell(1, 2, ModifierKeys::NONE);
    let cleared = t
        .grid
        .with_main_data(|data: &mut RowArrayDataServer| data.clear())
        .unwrap();
    t.grid.on_data_notification(MAIN, cleared).unwrap();
    assert!(t.grid.selection().is_empty());
    assert_eq!(t.grid.focus().current_subgrid_point(), None);
    assert_eq!(t.grid.core().main_row_count(), 0);
}

#[test]
fn test_batched_changes_bump_selection_version_once() {
    let mut t = numeric_grid(common::settings(), RowArrayDataServer::new(numeric_rows(10)));
    t.click_cell(1, 5, ModifierKeys::NONE);
    let version = t.grid.selection().version();

    t.grid
        .on_data_notification(MAIN, DataNotification::BeginChange)
        .unwrap();
    for _ in 0..3 {
        let inserted = t
            .grid
            .with_main_data(|data: &mut RowArrayDataServer| data.insert_rows(0, numeric_rows(1)))
            .unwrap();
        t.grid.on_data_notification(MAIN, inserted).unwrap();
    }
    assert_eq!(t.grid.selection().version(), version);
    t.grid
        .on_data_notification(MAIN, DataNotification::EndChange)
        .unwrap();
    assert_eq!(t.grid.selection().version(), version + 1);
    assert_eq!(areas(&t), vec![(SelectionAreaType::Rectangle, 1, 8, 1, 1)]);
}

#[test]
fn test_unknown_subgrid_is_an_error() {
    let mut t = TestGrid::standard();
    let err = t
        .grid
        .on_data_notification(SubgridId(7), DataNotification::InvalidateAll)
        .unwrap_err();
    assert!(matches!(err, GridError::UnknownSubgrid(7)));
}
