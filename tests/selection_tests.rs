//! Selection model tests
//!
//! Rectangle normalisation, toggle semantics, the single-area mode and
//! structural updates to selected areas.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use proptest::prelude::*;
use revgrid::geometry::{Point, Rectangle};
use revgrid::selection::{Selection, SelectionAreaType, SelectionAreaTypeSpecifier};
use revgrid::settings::GridSettings;
use revgrid::subgrid::SubgridId;
use test_case::test_case;

const MAIN: SubgridId = SubgridId(1);

fn geometry(r: &Rectangle) -> (usize, usize, usize, usize) {
    (r.x, r.y, r.width, r.height)
}

fn selection(multiple: bool) -> Selection {
    let settings = GridSettings {
        multiple_selection_areas: multiple,
        ..GridSettings::default()
    };
    let mut selection = Selection::new(&settings);
    selection.set_bounds(100, 100);
    selection
}

fn area_geometries(selection: &Selection) -> Vec<(usize, usize, usize, usize)> {
    selection
        .areas()
        .iter()
        .map(|a| geometry(&a.rectangle))
        .collect()
}

// ============================================================================
// Rectangle normalisation
// ============================================================================

proptest! {
    #[test]
    fn test_first_last_is_symmetric(
        x1 in 0usize..1000, y1 in 0usize..1000,
        x2 in 0usize..1000, y2 in 0usize..1000,
    ) {
        let a = Rectangle::from_first_last(Point::new(x1, y1), Point::new(x2, y2));
        let b = Rectangle::from_first_last(Point::new(x2, y2), Point::new(x1, y1));
        prop_assert_eq!(geometry(&a), geometry(&b));
        prop_assert_eq!(a.x, x1.min(x2));
        prop_assert_eq!(a.y, y1.min(y2));
        prop_assert_eq!(a.width, x1.abs_diff(x2) + 1);
        prop_assert_eq!(a.height, y1.abs_diff(y2) + 1);
    }
}

#[test_case((3, 4), (6, 4), (3, 4, 4, 1) ; "forward along row")]
#[test_case((6, 4), (3, 4), (3, 4, 4, 1) ; "backward along row")]
#[test_case((2, 9), (2, 2), (2, 2, 1, 8) ; "upward column")]
#[test_case((5, 5), (5, 5), (5, 5, 1, 1) ; "single cell")]
fn test_first_last_geometry(
    first: (usize, usize),
    last: (usize, usize),
    expected: (usize, usize, usize, usize),
) {
    let r = Rectangle::from_first_last(Point::new(first.0, first.1), Point::new(last.0, last.1));
    assert_eq!(geometry(&r), expected);
}

// ============================================================================
// Toggle
// ============================================================================

proptest! {
    #[test]
    fn test_toggle_twice_restores_areas(
        seed in prop::collection::vec((0usize..20, 0usize..20), 0..6),
        x in 0usize..20,
        y in 0usize..20,
    ) {
        let mut selection = selection(true);
        for (sx, sy) in &seed {
            selection.select_add_cell(*sx, *sy, MAIN, SelectionAreaTypeSpecifier::Primary);
        }
        prop_assume!(!seed.contains(&(x, y)));
        let before = area_geometries(&selection);

        prop_assert!(selection.select_toggle_cell(x, y, MAIN, SelectionAreaTypeSpecifier::Primary));
        prop_assert!(selection.is_cell_selected(x, y, MAIN));
        prop_assert!(!selection.select_toggle_cell(x, y, MAIN, SelectionAreaTypeSpecifier::Primary));
        prop_assert_eq!(area_geometries(&selection), before);
    }

    // ============================================================================
    // Single area mode
    // ============================================================================

    #[test]
    fn test_single_area_mode_never_holds_two_areas(
        ops in prop::collection::vec((0u8..6, 0usize..30, 0usize..30), 1..30),
    ) {
        let mut selection = selection(false);
        for (op, x, y) in ops {
            match op {
                0 => selection.select_only_cell(x, y, MAIN, SelectionAreaTypeSpecifier::Primary),
                1 => selection.select_add_cell(x, y, MAIN, SelectionAreaTypeSpecifier::Primary),
                2 => {
                    selection.select_toggle_cell(x, y, MAIN, SelectionAreaTypeSpecifier::Primary);
                }
                3 => selection.select_rows(x.min(y), x.max(y), MAIN),
                4 => selection.select_columns(x.min(y), x.max(y), MAIN),
                _ => {
                    let _ = selection.update_last_selection_area(x, y, MAIN);
                }
            }
            prop_assert!(selection.area_count() <= 1);
        }
    }
}

#[test]
fn test_toggle_of_selected_cell_removes_it() {
    let mut selection = selection(true);
    selection.select_add_cell(1, 1, MAIN, SelectionAreaTypeSpecifier::Primary);
    selection.select_add_cell(4, 4, MAIN, SelectionAreaTypeSpecifier::Primary);
    assert!(!selection.select_toggle_cell(1, 1, MAIN, SelectionAreaTypeSpecifier::Primary));
    assert_eq!(area_geometries(&selection), vec![(4, 4, 1, 1)]);
}

// ============================================================================
// Drag updates
// ============================================================================

#[test]
fn test_update_without_origin_is_an_error() {
    let mut selection = selection(true);
    let err = selection.update_last_selection_area(3, 3, MAIN).unwrap_err();
    assert!(err.to_string().contains("CSUL33812"));
}

#[test]
fn test_update_spans_origin_to_pointer() {
    let mut selection = selection(true);
    selection.select_only_cell(3, 4, MAIN, SelectionAreaTypeSpecifier::Primary);
    assert!(selection.update_last_selection_area(6, 4, MAIN).unwrap());
    assert_eq!(area_geometries(&selection), vec![(3, 4, 4, 1)]);
    assert!(selection.update_last_selection_area(1, 2, MAIN).unwrap());
    assert_eq!(area_geometries(&selection), vec![(1, 2, 3, 3)]);
    // Same geometry again is not a change.
    assert!(!selection.update_last_selection_area(1, 2, MAIN).unwrap());
}

#[test]
fn test_update_into_other_subgrid_is_ignored() {
    let mut selection = selection(true);
    selection.select_only_cell(3, 4, MAIN, SelectionAreaTypeSpecifier::Primary);
    assert!(!selection.update_last_selection_area(5, 0, SubgridId(0)).unwrap());
    assert_eq!(area_geometries(&selection), vec![(3, 4, 1, 1)]);
}

// ============================================================================
// Area types
// ============================================================================

#[test]
fn test_secondary_specifier_selects_row_area() {
    let mut selection = selection(true);
    selection.select_only_cell(3, 7, MAIN, SelectionAreaTypeSpecifier::Secondary);
    let area = selection.last_area().unwrap();
    assert_eq!(area.area_type, SelectionAreaType::Row);
    assert!(selection.is_row_selected(7, MAIN));
    assert!(selection.is_cell_selected(0, 7, MAIN));
    assert!(selection.is_cell_selected(99, 7, MAIN));
    assert!(!selection.is_cell_selected(3, 8, MAIN));
}

#[test]
fn test_select_all_rows_covers_every_cell() {
    let mut selection = selection(true);
    selection.select_add_cell(1, 1, MAIN, SelectionAreaTypeSpecifier::Primary);
    selection.select_all_rows(MAIN);
    assert!(selection.all_rows_selected());
    assert_eq!(selection.area_count(), 0);
    assert!(selection.is_cell_selected(42, 77, MAIN));
    assert!(!selection.is_cell_selected(0, 0, SubgridId(0)));
    assert!(selection.clear());
    assert!(selection.is_empty());
}

#[test]
fn test_version_bumps_once_per_batch() {
    let mut selection = selection(true);
    let start = selection.version();
    selection.begin_change();
    selection.select_add_cell(1, 1, MAIN, SelectionAreaTypeSpecifier::Primary);
    selection.select_add_cell(2, 2, MAIN, SelectionAreaTypeSpecifier::Primary);
    assert_eq!(selection.version(), start);
    selection.end_change();
    assert_eq!(selection.version(), start + 1);
}

// ============================================================================
// Structural updates
// ============================================================================

#[test]
fn test_rows_inserted_above_shift_area() {
    let mut selection = selection(true);
    selection.select_only_cell(2, 10, MAIN, SelectionAreaTypeSpecifier::Primary);
    selection.rows_inserted(MAIN, 5, 3);
    assert_eq!(area_geometries(&selection), vec![(2, 13, 1, 1)]);
    selection.rows_inserted(MAIN, 20, 3);
    assert_eq!(area_geometries(&selection), vec![(2, 13, 1, 1)]);
}

#[test]
fn test_rows_deleted_through_area_shrink_or_drop_it() {
    let mut selection = selection(true);
    selection.select_rows(10, 14, MAIN);
    selection.rows_deleted(MAIN, 12, 5);
    assert!(selection.is_row_selected(10, MAIN));
    assert!(selection.is_row_selected(11, MAIN));
    assert!(!selection.is_row_selected(12, MAIN));

    selection.rows_deleted(MAIN, 9, 10);
    assert!(selection.is_empty());
}

#[test]
fn test_rows_in_other_subgrid_are_untouched() {
    let mut selection = selection(true);
    selection.select_only_cell(2, 10, MAIN, SelectionAreaTypeSpecifier::Primary);
    selection.rows_inserted(SubgridId(0), 0, 4);
    assert_eq!(area_geometries(&selection), vec![(2, 10, 1, 1)]);
}

#[test]
fn test_columns_deleted_before_area_shift_it_left() {
    let mut selection = selection(true);
    selection.select_only_cell(5, 1, MAIN, SelectionAreaTypeSpecifier::Primary);
    selection.columns_deleted(1, 2);
    assert_eq!(area_geometries(&selection), vec![(3, 1, 1, 1)]);
    selection.columns_deleted(3, 1);
    assert!(selection.is_empty());
}
