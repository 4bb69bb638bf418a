//! Column collection: which schema fields are shown, in what order, how wide.
//!
//! Columns are addressed two ways. The field index is the column's position in
//! the schema and never changes while the schema is stable. The active index
//! is the column's position among shown columns, left to right, and changes on
//! every move, hide or show. Layout, selection and focus all speak in active
//! indexes.

use tracing::debug;

use crate::data::SchemaField;
use crate::settings::GridSettings;

/// One column of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub field: SchemaField,
    pub width: f32,
    /// Widest content seen by painters since the last autosize.
    pub auto_sized_width: Option<f32>,
    /// True once the user (or host) set a width; autosizing leaves it alone.
    pub width_set_explicitly: bool,
}

impl Column {
    fn new(field: SchemaField, settings: &GridSettings) -> Self {
        let width = field.default_width.unwrap_or(settings.default_column_width);
        Self {
            field,
            width: settings.clamp_column_width(width),
            auto_sized_width: None,
            width_set_explicitly: false,
        }
    }

    pub fn field_index(&self) -> usize {
        self.field.index
    }
}

/// Owns every column (one per schema field) and the active ordering.
#[derive(Debug, Clone, Default)]
pub struct ColumnsManager {
    columns: Vec<Column>,
    active: Vec<usize>,
    requested_fixed_column_count: usize,
}

impl ColumnsManager {
    /// Create with every field active in schema order.
    pub fn new(fields: &[SchemaField], settings: &GridSettings) -> Self {
        let columns: Vec<Column> = fields
            .iter()
            .map(|f| Column::new(f.clone(), settings))
            .collect();
        let active = (0..columns.len()).collect();
        Self {
            columns,
            active,
            requested_fixed_column_count: settings.fixed_column_count,
        }
    }

    pub fn all_column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn active_column_count(&self) -> usize {
        self.active.len()
    }

    pub fn active_column(&self, active_index: usize) -> Option<&Column> {
        let field_index = *self.active.get(active_index)?;
        self.columns.get(field_index)
    }

    pub fn active_field(&self, active_index: usize) -> Option<&SchemaField> {
        self.active_column(active_index).map(|c| &c.field)
    }

    pub fn active_column_width(&self, active_index: usize) -> Option<f32> {
        self.active_column(active_index).map(|c| c.width)
    }

    /// Widths of all active columns in display order.
    pub fn active_column_widths(&self) -> Vec<f32> {
        self.active
            .iter()
            .filter_map(|&f| self.columns.get(f))
            .map(|c| c.width)
            .collect()
    }

    pub fn field_index_of_active(&self, active_index: usize) -> Option<usize> {
        self.active.get(active_index).copied()
    }

    pub fn active_index_of_field(&self, field_index: usize) -> Option<usize> {
        self.active.iter().position(|&f| f == field_index)
    }

    /// Effective fixed count: the requested count clamped to active columns.
    pub fn fixed_column_count(&self) -> usize {
        self.requested_fixed_column_count.min(self.active.len())
    }

    pub fn set_fixed_column_count(&mut self, count: usize) {
        self.requested_fixed_column_count = count;
    }

    pub fn is_fixed(&self, active_index: usize) -> bool {
        active_index < self.fixed_column_count()
    }

    /// Set a column width. Returns whether it changed.
    pub fn set_active_column_width(
        &mut self,
        active_index: usize,
        width: f32,
        settings: &GridSettings,
    ) -> bool {
        let width = settings.clamp_column_width(width);
        let Some(&field_index) = self.active.get(active_index) else {
            return false;
        };
        let Some(column) = self.columns.get_mut(field_index) else {
            return false;
        };
        column.width_set_explicitly = true;
        if (column.width - width).abs() > f32::EPSILON {
            column.width = width;
            true
        } else {
            false
        }
    }

    /// Remember the widest painted content of a column.
    pub fn record_content_width(&mut self, active_index: usize, content_width: f32) {
        let Some(&field_index) = self.active.get(active_index) else {
            return;
        };
        if let Some(column) = self.columns.get_mut(field_index) {
            let widest = column
                .auto_sized_width
                .map_or(content_width, |w| w.max(content_width));
            column.auto_sized_width = Some(widest);
        }
    }

    /// Size a column to its widest painted content. Returns whether the width changed.
    pub fn autosize_active_column(
        &mut self,
        active_index: usize,
        settings: &GridSettings,
    ) -> bool {
        let Some(&field_index) = self.active.get(active_index) else {
            return false;
        };
        let Some(column) = self.columns.get_mut(field_index) else {
            return false;
        };
        let Some(content) = column.auto_sized_width else {
            return false;
        };
        let width = settings.clamp_column_width(content + 2.0 * settings.cell_padding);
        column.width_set_explicitly = false;
        if (column.width - width).abs() > f32::EPSILON {
            column.width = width;
            true
        } else {
            false
        }
    }

    /// Move the active column at `from` so it sits just before the column
    /// currently at `target`. Fixed columns cannot move and nothing can be
    /// dropped into the fixed partition.
    pub fn move_column_before(&mut self, from: usize, target: usize) -> bool {
        self.move_column(from, target, false)
    }

    /// Move the active column at `from` so it sits just after the column
    /// currently at `target`.
    pub fn move_column_after(&mut self, from: usize, target: usize) -> bool {
        self.move_column(from, target, true)
    }

    /// Active index the column at `from` ends up at when moved before (or
    /// after) the column at `target`.
    pub fn moved_to(from: usize, target: usize, after: bool) -> usize {
        let insert_at = if after { target + 1 } else { target };
        if from < insert_at {
            insert_at - 1
        } else {
            insert_at
        }
    }

    fn move_column(&mut self, from: usize, target: usize, after: bool) -> bool {
        let count = self.active.len();
        if from >= count || target >= count || from == target {
            return false;
        }
        let fixed = self.fixed_column_count();
        if from < fixed || target < fixed {
            return false;
        }
        let insert_at = Self::moved_to(from, target, after);
        if insert_at == from {
            return false;
        }
        let field_index = self.active.remove(from);
        self.active.insert(insert_at, field_index);
        debug!(from, to = insert_at, field_index, "column moved");
        true
    }

    /// Hide an active column. The last remaining column can be hidden too.
    pub fn hide_active_column(&mut self, active_index: usize) -> bool {
        if active_index >= self.active.len() {
            return false;
        }
        let field_index = self.active.remove(active_index);
        debug!(active_index, field_index, "column hidden");
        true
    }

    /// Show a hidden field at `at` (or at the end). Returns false if already shown.
    pub fn show_field(&mut self, field_index: usize, at: Option<usize>) -> bool {
        if field_index >= self.columns.len() || self.active.contains(&field_index) {
            return false;
        }
        let at = at.unwrap_or(self.active.len()).min(self.active.len());
        self.active.insert(at, field_index);
        true
    }

    /// Fields were inserted into the schema at `index`. New fields become active,
    /// placed in front of the first active column that follows them in schema order.
    pub fn fields_inserted(
        &mut self,
        fields: &[SchemaField],
        index: usize,
        count: usize,
        settings: &GridSettings,
    ) {
        for field_index in self.active.iter_mut() {
            if *field_index >= index {
                *field_index += count;
            }
        }
        for column in self.columns.iter_mut() {
            if column.field.index >= index {
                column.field.index += count;
            }
        }
        let new_columns: Vec<Column> = (index..index + count)
            .filter_map(|i| fields.get(i))
            .map(|f| Column::new(f.clone(), settings))
            .collect();
        let at = index.min(self.columns.len());
        self.columns.splice(at..at, new_columns);

        let insert_pos = self
            .active
            .iter()
            .position(|&f| f >= index + count)
            .unwrap_or(self.active.len());
        self.active.splice(insert_pos..insert_pos, index..index + count);
        self.refresh_fields(fields);
    }

    /// Fields `index..index + count` were removed from the schema.
    pub fn fields_deleted(&mut self, fields: &[SchemaField], index: usize, count: usize) {
        let end = index + count;
        self.active.retain(|&f| f < index || f >= end);
        for field_index in self.active.iter_mut() {
            if *field_index >= end {
                *field_index -= count;
            }
        }
        let start = index.min(self.columns.len());
        let stop = end.min(self.columns.len());
        self.columns.drain(start..stop);
        for column in self.columns.iter_mut() {
            if column.field.index >= end {
                column.field.index -= count;
            }
        }
        self.refresh_fields(fields);
    }

    pub fn all_fields_deleted(&mut self) {
        self.columns.clear();
        self.active.clear();
    }

    /// Rebuild against a new schema, keeping width and order for fields whose
    /// name survived.
    pub fn schema_changed(&mut self, fields: &[SchemaField], settings: &GridSettings) {
        let old_columns = std::mem::take(&mut self.columns);
        let old_active: Vec<String> = self
            .active
            .iter()
            .filter_map(|&f| old_columns.get(f))
            .map(|c| c.field.name.clone())
            .collect();

        self.columns = fields
            .iter()
            .map(|field| {
                match old_columns.iter().find(|c| c.field.name == field.name) {
                    Some(old) => Column {
                        field: field.clone(),
                        ..old.clone()
                    },
                    None => Column::new(field.clone(), settings),
                }
            })
            .collect();

        let mut active: Vec<usize> = old_active
            .iter()
            .filter_map(|name| fields.iter().position(|f| &f.name == name))
            .collect();
        for (i, field) in fields.iter().enumerate() {
            let was_known = old_columns.iter().any(|c| c.field.name == field.name);
            if !was_known {
                active.push(i);
            }
        }
        self.active = active;
    }

    fn refresh_fields(&mut self, fields: &[SchemaField]) {
        for column in self.columns.iter_mut() {
            if let Some(field) = fields.get(column.field.index) {
                column.field = field.clone();
            }
        }
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
    use crate::data::FieldListSchemaServer;
    use crate::data::SchemaServer;

    fn manager(n: usize, fixed: usize) -> ColumnsManager {
        let names: Vec<String> = (0..n).map(|i| format!("f{i}")).collect();
        let schema = FieldListSchemaServer::from_names(&names);
        let settings = GridSettings {
            fixed_column_count: fixed,
            ..GridSettings::default()
        };
        ColumnsManager::new(schema.get_fields(), &settings)
    }

    fn order(m: &ColumnsManager) -> Vec<usize> {
        (0..m.active_column_count())
            .map(|i| m.field_index_of_active(i).unwrap())
            .collect()
    }

    #[test]
    fn move_before_and_after() {
        let mut m = manager(5, 0);
        assert!(m.move_column_before(4, 1));
        assert_eq!(order(&m), vec![0, 4, 1, 2, 3]);
        assert!(m.move_column_after(0, 3));
        assert_eq!(order(&m), vec![4, 1, 2, 0, 3]);
    }

    #[test]
    fn move_to_same_slot_is_noop() {
        let mut m = manager(4, 0);
        assert!(!m.move_column_before(1, 2));
        assert!(!m.move_column_after(2, 1));
        assert_eq!(order(&m), vec![0, 1, 2, 3]);
    }

    #[test]
    fn fixed_columns_do_not_move() {
        let mut m = manager(5, 2);
        assert!(!m.move_column_before(3, 1));
        assert!(!m.move_column_before(0, 3));
        assert!(m.move_column_before(4, 2));
        assert_eq!(order(&m), vec![0, 1, 4, 2, 3]);
    }

    #[test]
    fn fixed_count_is_clamped_to_active() {
        let mut m = manager(3, 5);
        assert_eq!(m.fixed_column_count(), 3);
        m.hide_active_column(0);
        assert_eq!(m.fixed_column_count(), 2);
    }

    #[test]
    fn hide_and_show() {
        let mut m = manager(3, 0);
        assert!(m.hide_active_column(1));
        assert_eq!(order(&m), vec![0, 2]);
        assert!(m.show_field(1, Some(0)));
        assert_eq!(order(&m), vec![1, 0, 2]);
        assert!(!m.show_field(1, None));
    }

    #[test]
    fn width_is_clamped() {
        let mut m = manager(2, 0);
        let settings = GridSettings {
            minimum_column_width: 20.0,
            maximum_column_width: Some(200.0),
            ..GridSettings::default()
        };
        assert!(m.set_active_column_width(0, 5.0, &settings));
        assert_eq!(m.active_column_width(0), Some(20.0));
        m.set_active_column_width(0, 500.0, &settings);
        assert_eq!(m.active_column_width(0), Some(200.0));
    }

    #[test]
    fn autosize_uses_recorded_width() {
        let mut m = manager(2, 0);
        let settings = GridSettings::default();
        m.record_content_width(1, 40.0);
        m.record_content_width(1, 30.0);
        assert!(m.autosize_active_column(1, &settings));
        assert_eq!(
            m.active_column_width(1),
            Some(40.0 + 2.0 * settings.cell_padding)
        );
    }

    #[test]
    fn fields_inserted_become_active_in_place() {
        let mut m = manager(3, 0);
        let mut schema = FieldListSchemaServer::from_names(&["f0", "f1", "f2"]);
        schema.insert_fields(1, vec![SchemaField::new(0, "new")]);
        m.fields_inserted(schema.get_fields(), 1, 1, &GridSettings::default());
        assert_eq!(order(&m), vec![0, 1, 2, 3]);
        assert_eq!(m.active_field(1).unwrap().name, "new");
        assert_eq!(m.active_field(2).unwrap().name, "f1");
    }

    #[test]
    fn fields_deleted_removes_active_columns() {
        let mut m = manager(4, 0);
        m.move_column_before(3, 0);
        let mut schema = FieldListSchemaServer::from_names(&["f0", "f1", "f2", "f3"]);
        schema.delete_fields(1, 2);
        m.fields_deleted(schema.get_fields(), 1, 2);
        assert_eq!(order(&m), vec![1, 0]);
        assert_eq!(m.active_field(0).unwrap().name, "f3");
    }

    #[test]
    fn schema_changed_keeps_known_columns() {
        let mut m = manager(3, 0);
        let settings = GridSettings::default();
        m.set_active_column_width(2, 77.0, &settings);
        m.move_column_before(2, 0);
        let schema = FieldListSchemaServer::from_names(&["f2", "x", "f0"]);
        m.schema_changed(schema.get_fields(), &settings);
        let names: Vec<&str> = (0..m.active_column_count())
            .map(|i| m.active_field(i).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["f2", "f0", "x"]);
        assert_eq!(m.active_column_width(0), Some(77.0));
    }
}
