//! The selection model.

use std::collections::BTreeSet;

use tracing::debug;

use super::area::{CellSelectedAreaTypes, SelectionArea, SelectionAreaType, SelectionAreaTypeSpecifier};
use super::index_after_move;
use crate::error::{GridError, Result};
use crate::geometry::{Point, Rectangle, StartLength};
use crate::settings::GridSettings;
use crate::subgrid::SubgridId;

/// Ordered selection areas plus the all-rows flag.
///
/// Insertion order is overlay z-order; the last area is the one gestures
/// replace and extend. Every effective change bumps [`Selection::version`],
/// once per [`Selection::begin_change`]/[`Selection::end_change`] batch.
#[derive(Debug, Clone)]
pub struct Selection {
    areas: Vec<SelectionArea>,
    all_rows_selected: Option<SubgridId>,
    extend_origin: Option<(Point, SubgridId)>,
    version: u64,
    change_depth: u32,
    change_pending: bool,
    multiple_selection_areas: bool,
    primary_area_type: SelectionAreaType,
    secondary_area_type: SelectionAreaType,
    column_count: usize,
    row_count: usize,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(&GridSettings::default())
    }
}

impl Selection {
    pub fn new(settings: &GridSettings) -> Self {
        let mut selection = Self {
            areas: Vec::new(),
            all_rows_selected: None,
            extend_origin: None,
            version: 0,
            change_depth: 0,
            change_pending: false,
            multiple_selection_areas: true,
            primary_area_type: SelectionAreaType::Rectangle,
            secondary_area_type: SelectionAreaType::Row,
            column_count: 0,
            row_count: 0,
        };
        selection.apply_settings(settings);
        selection
    }

    /// Pick up selection related settings. Turning off multiple areas keeps
    /// only the last one.
    pub fn apply_settings(&mut self, settings: &GridSettings) {
        self.multiple_selection_areas = settings.multiple_selection_areas;
        self.primary_area_type = settings.primary_selection_area_type;
        self.secondary_area_type = settings.secondary_selection_area_type;
        if !self.multiple_selection_areas && self.areas.len() > 1 {
            let keep = self.areas.len() - 1;
            self.areas.drain(..keep);
            self.changed();
        }
    }

    /// Extent used for whole-row and whole-column areas.
    pub fn set_bounds(&mut self, column_count: usize, row_count: usize) {
        if self.column_count == column_count && self.row_count == row_count {
            return;
        }
        self.column_count = column_count;
        self.row_count = row_count;
        for area in &mut self.areas {
            area.rectangle = shaped(area.area_type, area.rectangle, column_count, row_count);
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn begin_change(&mut self) {
        self.change_depth += 1;
    }

    pub fn end_change(&mut self) {
        self.change_depth = self.change_depth.saturating_sub(1);
        if self.change_depth == 0 && self.change_pending {
            self.change_pending = false;
            self.version += 1;
        }
    }

    fn changed(&mut self) {
        if self.change_depth > 0 {
            self.change_pending = true;
        } else {
            self.version += 1;
        }
    }

    pub fn areas(&self) -> &[SelectionArea] {
        &self.areas
    }

    pub fn area_count(&self) -> usize {
        self.areas.len()
    }

    pub fn last_area(&self) -> Option<&SelectionArea> {
        self.areas.last()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty() && self.all_rows_selected.is_none()
    }

    pub fn all_rows_selected(&self) -> bool {
        self.all_rows_selected.is_some()
    }

    pub fn extend_origin(&self) -> Option<(Point, SubgridId)> {
        self.extend_origin
    }

    pub fn set_extend_origin(&mut self, point: Point, subgrid: SubgridId) {
        self.extend_origin = Some((point, subgrid));
    }

    pub fn clear_extend_origin(&mut self) {
        self.extend_origin = None;
    }

    /// Concrete area type for a specifier.
    pub fn resolve_area_type(&self, specifier: SelectionAreaTypeSpecifier) -> SelectionAreaType {
        match specifier {
            SelectionAreaTypeSpecifier::Primary => self.primary_area_type,
            SelectionAreaTypeSpecifier::Secondary => self.secondary_area_type,
            SelectionAreaTypeSpecifier::Rectangle => SelectionAreaType::Rectangle,
            SelectionAreaTypeSpecifier::Row => SelectionAreaType::Row,
            SelectionAreaTypeSpecifier::Column => SelectionAreaType::Column,
            SelectionAreaTypeSpecifier::LastOrPrimary => self
                .areas
                .last()
                .map_or(self.primary_area_type, |a| a.area_type),
        }
    }

    fn make_area(
        &self,
        area_type: SelectionAreaType,
        rectangle: Rectangle,
        subgrid: SubgridId,
    ) -> SelectionArea {
        SelectionArea::new(
            area_type,
            shaped(area_type, rectangle, self.column_count, self.row_count),
            subgrid,
        )
    }

    /// Clear everything and select one cell.
    pub fn select_only_cell(
        &mut self,
        x: usize,
        y: usize,
        subgrid: SubgridId,
        specifier: SelectionAreaTypeSpecifier,
    ) {
        let area_type = self.resolve_area_type(specifier);
        let area = self.make_area(area_type, Rectangle::single_cell(Point::new(x, y)), subgrid);
        self.areas.clear();
        self.all_rows_selected = None;
        self.areas.push(area);
        self.extend_origin = Some((Point::new(x, y), subgrid));
        self.changed();
    }

    /// [`Selection::select_only_cell`] at the focused cell. False without focus.
    pub fn select_only_focused_cell(
        &mut self,
        focus: &super::Focus,
        specifier: SelectionAreaTypeSpecifier,
    ) -> bool {
        match (focus.current_subgrid_point(), focus.subgrid()) {
            (Some(point), Some(subgrid)) => {
                self.select_only_cell(point.x, point.y, subgrid, specifier);
                true
            }
            _ => false,
        }
    }

    /// Append a 1x1 area; replaces everything when multiple areas are off.
    pub fn select_add_cell(
        &mut self,
        x: usize,
        y: usize,
        subgrid: SubgridId,
        specifier: SelectionAreaTypeSpecifier,
    ) {
        if !self.multiple_selection_areas {
            self.select_only_cell(x, y, subgrid, specifier);
            return;
        }
        let area_type = self.resolve_area_type(specifier);
        let area = self.make_area(area_type, Rectangle::single_cell(Point::new(x, y)), subgrid);
        self.areas.push(area);
        self.extend_origin = Some((Point::new(x, y), subgrid));
        self.changed();
    }

    /// Remove the matching 1x1 area if present (returns false), otherwise add
    /// it (returns true).
    pub fn select_toggle_cell(
        &mut self,
        x: usize,
        y: usize,
        subgrid: SubgridId,
        specifier: SelectionAreaTypeSpecifier,
    ) -> bool {
        let area_type = self.resolve_area_type(specifier);
        let candidate =
            self.make_area(area_type, Rectangle::single_cell(Point::new(x, y)), subgrid);
        match self.areas.iter().position(|a| a.covers_same_cells(&candidate)) {
            Some(position) => {
                self.areas.remove(position);
                if self.extend_origin == Some((Point::new(x, y), subgrid)) {
                    self.extend_origin = None;
                }
                self.changed();
                false
            }
            None => {
                self.select_add_cell(x, y, subgrid, SelectionAreaTypeSpecifier::from(area_type));
                true
            }
        }
    }

    fn set_last_area(&mut self, area: SelectionArea) -> bool {
        match self.areas.last_mut() {
            Some(last) if *last == area => false,
            Some(last) => {
                *last = area;
                self.changed();
                true
            }
            None => {
                self.areas.push(area);
                self.changed();
                true
            }
        }
    }

    /// Replace the last area's geometry (adds one when empty).
    pub fn replace_last_area(
        &mut self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        subgrid: SubgridId,
        specifier: SelectionAreaTypeSpecifier,
    ) -> bool {
        let area_type = self.resolve_area_type(specifier);
        let area = self.make_area(area_type, Rectangle::new(x, y, width, height), subgrid);
        self.set_last_area(area)
    }

    /// Replace the last area from exclusive start/length pairs, which may run
    /// backwards. The last area's type is kept.
    pub fn replace_last_area_with_rectangle(
        &mut self,
        start_x: isize,
        start_y: isize,
        length_x: isize,
        length_y: isize,
        subgrid: SubgridId,
    ) -> bool {
        let area_type = self.resolve_area_type(SelectionAreaTypeSpecifier::LastOrPrimary);
        let rectangle = Rectangle::from_start_lengths(
            StartLength::new(start_x, length_x),
            StartLength::new(start_y, length_y),
        );
        let area = self.make_area(area_type, rectangle, subgrid);
        self.set_last_area(area)
    }

    fn replace_last_area_from_first_last(
        &mut self,
        first: Point,
        last: Point,
        subgrid: SubgridId,
        area_type: SelectionAreaType,
    ) -> bool {
        let area = self.make_area(area_type, Rectangle::from_first_last(first, last), subgrid);
        self.set_last_area(area)
    }

    /// Extend by rows from `first` to `last`: a row area when the last area
    /// is a row area, otherwise a rectangle.
    pub fn replace_last_area_with_rows(
        &mut self,
        first: Point,
        last: Point,
        subgrid: SubgridId,
    ) -> bool {
        let area_type = match self.resolve_area_type(SelectionAreaTypeSpecifier::LastOrPrimary) {
            SelectionAreaType::Row => SelectionAreaType::Row,
            SelectionAreaType::Column | SelectionAreaType::Rectangle => SelectionAreaType::Rectangle,
        };
        self.replace_last_area_from_first_last(first, last, subgrid, area_type)
    }

    /// Column analogue of [`Selection::replace_last_area_with_rows`].
    pub fn replace_last_area_with_columns(
        &mut self,
        first: Point,
        last: Point,
        subgrid: SubgridId,
    ) -> bool {
        let area_type = match self.resolve_area_type(SelectionAreaTypeSpecifier::LastOrPrimary) {
            SelectionAreaType::Column => SelectionAreaType::Column,
            SelectionAreaType::Row | SelectionAreaType::Rectangle => SelectionAreaType::Rectangle,
        };
        self.replace_last_area_from_first_last(first, last, subgrid, area_type)
    }

    /// Drag update: last area spans the extend origin to `(x, y)`.
    ///
    /// Moving into a different subgrid than the origin's is ignored. Calling
    /// this with no origin recorded is a gesture sequencing bug.
    pub fn update_last_selection_area(
        &mut self,
        x: usize,
        y: usize,
        subgrid: SubgridId,
    ) -> Result<bool> {
        let (origin, origin_subgrid) = self.extend_origin.ok_or_else(|| {
            GridError::assertion(
                "CSUL33812",
                format!("update_last_selection_area({x}, {y}) without extend origin"),
            )
        })?;
        if origin_subgrid != subgrid {
            return Ok(false);
        }
        let xs = StartLength::create_exclusive_from_first_last(origin.x, x);
        let ys = StartLength::create_exclusive_from_first_last(origin.y, y);
        Ok(self.replace_last_area_with_rectangle(xs.start, ys.start, xs.length, ys.length, subgrid))
    }

    /// Add a row area over `first..=last` (replacing everything when multiple
    /// areas are off).
    pub fn select_rows(&mut self, first: usize, last: usize, subgrid: SubgridId) {
        let area = self.make_area(
            SelectionAreaType::Row,
            Rectangle::from_first_last(Point::new(0, first), Point::new(0, last)),
            subgrid,
        );
        self.push_area(area);
    }

    pub fn select_columns(&mut self, first: usize, last: usize, subgrid: SubgridId) {
        let area = self.make_area(
            SelectionAreaType::Column,
            Rectangle::from_first_last(Point::new(first, 0), Point::new(last, 0)),
            subgrid,
        );
        self.push_area(area);
    }

    fn push_area(&mut self, area: SelectionArea) {
        if !self.multiple_selection_areas {
            self.areas.clear();
            self.all_rows_selected = None;
        }
        self.areas.push(area);
        self.changed();
    }

    /// Select every row of `subgrid`; clears all areas.
    pub fn select_all_rows(&mut self, subgrid: SubgridId) {
        self.areas.clear();
        self.all_rows_selected = Some(subgrid);
        self.extend_origin = None;
        self.changed();
        debug!(%subgrid, "all rows selected");
    }

    pub fn clear(&mut self) -> bool {
        self.extend_origin = None;
        if self.is_empty() {
            return false;
        }
        self.areas.clear();
        self.all_rows_selected = None;
        self.changed();
        true
    }

    pub fn delete_last_area(&mut self) -> Option<SelectionArea> {
        let area = self.areas.pop()?;
        self.changed();
        Some(area)
    }

    pub fn is_cell_selected(&self, x: usize, y: usize, subgrid: SubgridId) -> bool {
        self.all_rows_selected == Some(subgrid)
            || self.areas.iter().any(|a| a.contains_cell(x, y, subgrid))
    }

    pub fn get_cell_selected_area_types(
        &self,
        x: usize,
        y: usize,
        subgrid: SubgridId,
    ) -> CellSelectedAreaTypes {
        let mut types = CellSelectedAreaTypes {
            row_selected: self.all_rows_selected == Some(subgrid),
            ..CellSelectedAreaTypes::default()
        };
        for area in self.areas.iter().filter(|a| a.contains_cell(x, y, subgrid)) {
            match area.area_type {
                SelectionAreaType::Rectangle => types.cell_selected = true,
                SelectionAreaType::Column => types.column_selected = true,
                SelectionAreaType::Row => types.row_selected = true,
            }
        }
        types
    }

    /// Distinct types of the areas containing the cell, in area order.
    pub fn get_all_cell_selection_area_type_ids(
        &self,
        x: usize,
        y: usize,
        subgrid: SubgridId,
    ) -> Vec<SelectionAreaType> {
        let mut ids = Vec::new();
        if self.all_rows_selected == Some(subgrid) {
            ids.push(SelectionAreaType::Row);
        }
        for area in self.areas.iter().filter(|a| a.contains_cell(x, y, subgrid)) {
            if !ids.contains(&area.area_type) {
                ids.push(area.area_type);
            }
        }
        ids
    }

    pub fn is_point_in_last_area(&self, x: usize, y: usize) -> bool {
        self.areas.last().is_some_and(|a| match a.area_type {
            SelectionAreaType::Rectangle => a.rectangle.contains(x, y),
            SelectionAreaType::Column => a.rectangle.contains_x(x),
            SelectionAreaType::Row => a.rectangle.contains_y(y),
        })
    }

    pub fn is_row_selected(&self, y: usize, subgrid: SubgridId) -> bool {
        self.all_rows_selected == Some(subgrid)
            || self.areas.iter().any(|a| {
                a.area_type == SelectionAreaType::Row
                    && a.subgrid == subgrid
                    && a.rectangle.contains_y(y)
            })
    }

    pub fn is_column_selected(&self, x: usize) -> bool {
        self.areas
            .iter()
            .any(|a| a.area_type == SelectionAreaType::Column && a.rectangle.contains_x(x))
    }

    pub fn selected_row_indices(&self, subgrid: SubgridId) -> Vec<usize> {
        if self.all_rows_selected == Some(subgrid) {
            return (0..self.row_count).collect();
        }
        let rows: BTreeSet<usize> = self
            .areas
            .iter()
            .filter(|a| a.area_type == SelectionAreaType::Row && a.subgrid == subgrid)
            .flat_map(|a| a.rectangle.y..a.rectangle.exclusive_bottom())
            .collect();
        rows.into_iter().collect()
    }

    pub fn selected_column_indices(&self) -> Vec<usize> {
        let columns: BTreeSet<usize> = self
            .areas
            .iter()
            .filter(|a| a.area_type == SelectionAreaType::Column)
            .flat_map(|a| a.rectangle.x..a.rectangle.exclusive_right())
            .collect();
        columns.into_iter().collect()
    }

    // Data adjustments

    pub fn rows_inserted(&mut self, subgrid: SubgridId, index: usize, count: usize) {
        let mut changed = false;
        for area in self.areas.iter_mut().filter(|a| a.subgrid == subgrid) {
            if area.area_type != SelectionAreaType::Column {
                let moved = area.rectangle.y_range_inserted(index, count);
                changed |= moved != area.rectangle;
                area.rectangle = moved;
            }
        }
        if let Some((origin, origin_subgrid)) = &mut self.extend_origin {
            if *origin_subgrid == subgrid && origin.y >= index {
                origin.y += count;
            }
        }
        if changed {
            self.changed();
        }
    }

    pub fn rows_deleted(&mut self, subgrid: SubgridId, index: usize, count: usize) {
        let before = self.areas.clone();
        self.areas = before
            .iter()
            .filter_map(|area| {
                if area.subgrid != subgrid || area.area_type == SelectionAreaType::Column {
                    return Some(*area);
                }
                let rectangle = area.rectangle.y_range_deleted(index, count)?;
                Some(SelectionArea { rectangle, ..*area })
            })
            .collect();
        if let Some((origin, origin_subgrid)) = self.extend_origin {
            if origin_subgrid == subgrid && origin.y >= index {
                self.extend_origin = if origin.y < index + count {
                    None
                } else {
                    Some((origin.with_y(origin.y - count), subgrid))
                };
            }
        }
        if self.areas != before {
            self.changed();
        }
    }

    pub fn rows_moved(&mut self, subgrid: SubgridId, old_index: usize, new_index: usize, count: usize) {
        let mut changed = false;
        for area in self.areas.iter_mut().filter(|a| a.subgrid == subgrid) {
            if area.area_type == SelectionAreaType::Column {
                continue;
            }
            let r = area.rectangle;
            let inside = r.y >= old_index && r.exclusive_bottom() <= old_index + count;
            if r.height == 1 || inside {
                let y = index_after_move(r.y, old_index, new_index, count);
                changed |= y != r.y;
                area.rectangle.y = y;
            }
        }
        if let Some((origin, origin_subgrid)) = &mut self.extend_origin {
            if *origin_subgrid == subgrid {
                origin.y = index_after_move(origin.y, old_index, new_index, count);
            }
        }
        if changed {
            self.changed();
        }
    }

    pub fn columns_inserted(&mut self, index: usize, count: usize) {
        let mut changed = false;
        for area in &mut self.areas {
            if area.area_type != SelectionAreaType::Row {
                let moved = area.rectangle.x_range_inserted(index, count);
                changed |= moved != area.rectangle;
                area.rectangle = moved;
            }
        }
        if let Some((origin, _)) = &mut self.extend_origin {
            if origin.x >= index {
                origin.x += count;
            }
        }
        if changed {
            self.changed();
        }
    }

    pub fn columns_deleted(&mut self, index: usize, count: usize) {
        let before = self.areas.clone();
        self.areas = before
            .iter()
            .filter_map(|area| {
                if area.area_type == SelectionAreaType::Row {
                    return Some(*area);
                }
                let rectangle = area.rectangle.x_range_deleted(index, count)?;
                Some(SelectionArea { rectangle, ..*area })
            })
            .collect();
        if let Some((origin, _)) = self.extend_origin {
            if origin.x >= index {
                self.extend_origin = if origin.x < index + count {
                    None
                } else {
                    self.extend_origin.map(|(p, s)| (p.with_x(p.x - count), s))
                };
            }
        }
        if self.areas != before {
            self.changed();
        }
    }

    pub fn columns_moved(&mut self, old_index: usize, new_index: usize, count: usize) {
        let mut changed = false;
        for area in &mut self.areas {
            if area.area_type == SelectionAreaType::Row {
                continue;
            }
            let r = area.rectangle;
            let inside = r.x >= old_index && r.exclusive_right() <= old_index + count;
            if r.width == 1 || inside {
                let x = index_after_move(r.x, old_index, new_index, count);
                changed |= x != r.x;
                area.rectangle.x = x;
            }
        }
        if let Some((origin, _)) = &mut self.extend_origin {
            origin.x = index_after_move(origin.x, old_index, new_index, count);
        }
        if changed {
            self.changed();
        }
    }

    /// Replace every area at once (reindex restore).
    pub(crate) fn replace_all(
        &mut self,
        areas: Vec<SelectionArea>,
        all_rows_selected: Option<SubgridId>,
    ) {
        let mut areas = areas;
        if !self.multiple_selection_areas && areas.len() > 1 {
            let keep = areas.len() - 1;
            areas.drain(..keep);
        }
        for area in &mut areas {
            area.rectangle = shaped(area.area_type, area.rectangle, self.column_count, self.row_count);
        }
        if areas != self.areas || all_rows_selected != self.all_rows_selected {
            self.areas = areas;
            self.all_rows_selected = all_rows_selected;
            self.changed();
        }
        self.extend_origin = None;
    }

    pub(crate) fn all_rows_selected_subgrid(&self) -> Option<SubgridId> {
        self.all_rows_selected
    }
}

impl From<SelectionAreaType> for SelectionAreaTypeSpecifier {
    fn from(area_type: SelectionAreaType) -> Self {
        match area_type {
            SelectionAreaType::Rectangle => SelectionAreaTypeSpecifier::Rectangle,
            SelectionAreaType::Column => SelectionAreaTypeSpecifier::Column,
            SelectionAreaType::Row => SelectionAreaTypeSpecifier::Row,
        }
    }
}

/// Stretch column areas over every row and row areas over every column.
fn shaped(
    area_type: SelectionAreaType,
    rectangle: Rectangle,
    column_count: usize,
    row_count: usize,
) -> Rectangle {
    match area_type {
        SelectionAreaType::Rectangle => rectangle,
        SelectionAreaType::Column => Rectangle {
            y: 0,
            height: row_count,
            ..rectangle
        },
        SelectionAreaType::Row => Rectangle {
            x: 0,
            width: column_count,
            ..rectangle
        },
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    const MAIN: SubgridId = SubgridId(1);

    fn selection() -> Selection {
        let mut s = Selection::default();
        s.set_bounds(10, 100);
        s
    }

    #[test]
    fn version_bumps_once_per_batch() {
        let mut s = selection();
        s.begin_change();
        s.select_only_cell(1, 1, MAIN, SelectionAreaTypeSpecifier::Primary);
        s.select_add_cell(2, 2, MAIN, SelectionAreaTypeSpecifier::Primary);
        assert_eq!(s.version(), 0);
        s.end_change();
        assert_eq!(s.version(), 1);
    }

    #[test]
    fn secondary_specifier_makes_row_area() {
        let mut s = selection();
        s.select_only_cell(3, 7, MAIN, SelectionAreaTypeSpecifier::Secondary);
        let area = s.last_area().unwrap();
        assert_eq!(area.area_type, SelectionAreaType::Row);
        assert_eq!(area.rectangle, Rectangle::new(0, 7, 10, 1));
        assert!(s.is_row_selected(7, MAIN));
        assert!(s.is_cell_selected(9, 7, MAIN));
    }

    #[test]
    fn update_without_origin_is_assertion() {
        let mut s = selection();
        let err = s.update_last_selection_area(1, 1, MAIN).unwrap_err();
        assert!(matches!(err, GridError::Assertion { code: "CSUL33812", .. }));
    }

    #[test]
    fn update_in_other_subgrid_is_noop() {
        let mut s = selection();
        s.select_only_cell(1, 1, MAIN, SelectionAreaTypeSpecifier::Primary);
        assert!(!s.update_last_selection_area(4, 0, SubgridId(0)).unwrap());
        assert_eq!(s.last_area().unwrap().rectangle.size(), 1);
    }

    #[test]
    fn selected_area_types_combine() {
        let mut s = selection();
        s.select_columns(2, 2, MAIN);
        s.select_rows(5, 6, MAIN);
        s.select_add_cell(2, 5, MAIN, SelectionAreaTypeSpecifier::Rectangle);
        let types = s.get_cell_selected_area_types(2, 5, MAIN);
        assert!(types.row_selected && types.column_selected && types.cell_selected);
        assert_eq!(
            s.get_all_cell_selection_area_type_ids(2, 5, MAIN),
            vec![
                SelectionAreaType::Column,
                SelectionAreaType::Row,
                SelectionAreaType::Rectangle
            ]
        );
        assert_eq!(s.selected_row_indices(MAIN), vec![5, 6]);
        assert_eq!(s.selected_column_indices(), vec![2]);
    }

    #[test]
    fn rows_deleted_drops_and_shifts_areas() {
        let mut s = selection();
        s.select_only_cell(0, 3, MAIN, SelectionAreaTypeSpecifier::Rectangle);
        s.select_add_cell(0, 10, MAIN, SelectionAreaTypeSpecifier::Rectangle);
        s.rows_deleted(MAIN, 2, 2);
        assert_eq!(s.area_count(), 1);
        assert_eq!(s.areas()[0].rectangle.y, 8);
        assert_eq!(s.extend_origin(), Some((Point::new(0, 8), MAIN)));
    }

    #[test]
    fn columns_moved_follows_single_column() {
        let mut s = selection();
        s.select_columns(1, 1, MAIN);
        s.columns_moved(1, 4, 1);
        assert!(s.is_column_selected(4));
        assert!(!s.is_column_selected(1));
    }

    #[test]
    fn disabling_multiple_areas_keeps_last() {
        let mut s = selection();
        s.select_only_cell(0, 0, MAIN, SelectionAreaTypeSpecifier::Primary);
        s.select_add_cell(1, 1, MAIN, SelectionAreaTypeSpecifier::Primary);
        let settings = GridSettings {
            multiple_selection_areas: false,
            ..GridSettings::default()
        };
        s.apply_settings(&settings);
        assert_eq!(s.area_count(), 1);
        assert_eq!(s.last_area().unwrap().rectangle.top_left(), Point::new(1, 1));
    }
}
