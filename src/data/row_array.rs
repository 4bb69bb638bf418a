//! In-memory data servers.

use std::any::Any;
use std::cmp::Ordering;

use super::{DataNotification, DataServer, DataValue, RowId, SchemaField};
use crate::error::Result;

/// Data server over a vector of rows, each row a vector of field values.
///
/// Every row gets a stable [`RowId`] on insertion so selections and focus can
/// follow rows across sorting and filtering. Mutating methods return the
/// notifications the host must forward to the grid.
#[derive(Debug, Clone)]
pub struct RowArrayDataServer {
    rows: Vec<Vec<DataValue>>,
    row_ids: Vec<RowId>,
    next_row_id: RowId,
    row_ids_enabled: bool,
}

impl Default for RowArrayDataServer {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl RowArrayDataServer {
    pub fn new(rows: Vec<Vec<DataValue>>) -> Self {
        let mut server = Self {
            rows: Vec::new(),
            row_ids: Vec::new(),
            next_row_id: 0,
            row_ids_enabled: true,
        };
        server.rows.reserve(rows.len());
        for row in rows {
            let id = server.allocate_row_id();
            server.rows.push(row);
            server.row_ids.push(id);
        }
        server
    }

    /// Disable stable row ids, forcing index based restore after reindexing.
    pub fn without_row_ids(mut self) -> Self {
        self.row_ids_enabled = false;
        self
    }

    pub fn rows(&self) -> &[Vec<DataValue>] {
        &self.rows
    }

    fn allocate_row_id(&mut self) -> RowId {
        let id = self.next_row_id;
        self.next_row_id += 1;
        id
    }

    pub fn insert_rows(&mut self, index: usize, rows: Vec<Vec<DataValue>>) -> DataNotification {
        let index = index.min(self.rows.len());
        let count = rows.len();
        let ids: Vec<RowId> = (0..count).map(|_| self.allocate_row_id()).collect();
        self.rows.splice(index..index, rows);
        self.row_ids.splice(index..index, ids);
        DataNotification::RowsInserted { index, count }
    }

    pub fn delete_rows(&mut self, index: usize, count: usize) -> DataNotification {
        let start = index.min(self.rows.len());
        let end = index.saturating_add(count).min(self.rows.len());
        self.rows.drain(start..end);
        self.row_ids.drain(start..end);
        DataNotification::RowsDeleted {
            index: start,
            count: end - start,
        }
    }

    pub fn clear(&mut self) -> DataNotification {
        self.rows.clear();
        self.row_ids.clear();
        DataNotification::AllRowsDeleted
    }

    /// Move `count` rows from `old_index` so they start at `new_index`
    /// (an index into the list after the rows were removed).
    pub fn move_rows(
        &mut self,
        old_index: usize,
        new_index: usize,
        count: usize,
    ) -> DataNotification {
        let start = old_index.min(self.rows.len());
        let end = old_index.saturating_add(count).min(self.rows.len());
        let moved: Vec<Vec<DataValue>> = self.rows.drain(start..end).collect();
        let moved_ids: Vec<RowId> = self.row_ids.drain(start..end).collect();
        let target = new_index.min(self.rows.len());
        let moved_count = moved.len();
        self.rows.splice(target..target, moved);
        self.row_ids.splice(target..target, moved_ids);
        DataNotification::RowsMoved {
            old_index: start,
            new_index: target,
            count: moved_count,
        }
    }

    pub fn set_value(
        &mut self,
        field_index: usize,
        row_index: usize,
        value: DataValue,
    ) -> Option<DataNotification> {
        let cell = self.rows.get_mut(row_index)?.get_mut(field_index)?;
        *cell = value;
        Some(DataNotification::InvalidateCell {
            field_index,
            row_index,
        })
    }

    /// Stable sort on one field. Returns the reindex notification pair.
    pub fn sort_by_field(
        &mut self,
        field_index: usize,
        ascending: bool,
    ) -> [DataNotification; 2] {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| {
            let va = self.rows.get(a).and_then(|r| r.get(field_index));
            let vb = self.rows.get(b).and_then(|r| r.get(field_index));
            let ord = compare_values(va, vb);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
        self.apply_order(&order);
        [
            DataNotification::PreReindex,
            DataNotification::PostReindex {
                all_rows_kept: true,
            },
        ]
    }

    /// Keep only rows matching `keep`. Returns the reindex notification pair.
    pub fn retain_rows<F>(&mut self, mut keep: F) -> [DataNotification; 2]
    where
        F: FnMut(&[DataValue]) -> bool,
    {
        let order: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| keep(row))
            .map(|(i, _)| i)
            .collect();
        let all_rows_kept = order.len() == self.rows.len();
        self.apply_order(&order);
        [
            DataNotification::PreReindex,
            DataNotification::PostReindex { all_rows_kept },
        ]
    }

    fn apply_order(&mut self, order: &[usize]) {
        let mut rows = Vec::with_capacity(order.len());
        let mut ids = Vec::with_capacity(order.len());
        for &i in order {
            if let (Some(row), Some(&id)) = (self.rows.get(i), self.row_ids.get(i)) {
                rows.push(row.clone());
                ids.push(id);
            }
        }
        self.rows = rows;
        self.row_ids = ids;
    }
}

fn compare_values(a: Option<&DataValue>, b: Option<&DataValue>) -> Ordering {
    match (a, b) {
        (Some(DataValue::Number(x)), Some(DataValue::Number(y))) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl DataServer for RowArrayDataServer {
    fn get_row_count(&self) -> usize {
        self.rows.len()
    }

    fn get_view_value(&self, field: &SchemaField, row_index: usize) -> DataValue {
        self.rows
            .get(row_index)
            .and_then(|row| row.get(field.index))
            .cloned()
            .unwrap_or_default()
    }

    fn get_edit_value(&self, field: &SchemaField, row_index: usize) -> Option<DataValue> {
        self.rows.get(row_index)?.get(field.index).cloned()
    }

    fn set_edit_value(
        &mut self,
        field: &SchemaField,
        row_index: usize,
        value: DataValue,
    ) -> Result<()> {
        match self.set_value(field.index, row_index, value) {
            Some(_) => Ok(()),
            None => Err(format!("No cell at field {} row {row_index}", field.index).into()),
        }
    }

    fn get_row_id_from_index(&self, row_index: usize) -> Option<RowId> {
        if !self.row_ids_enabled {
            return None;
        }
        self.row_ids.get(row_index).copied()
    }

    fn get_row_index_from_id(&self, row_id: RowId) -> Option<usize> {
        if !self.row_ids_enabled {
            return None;
        }
        self.row_ids.iter().position(|&id| id == row_id)
    }

    fn supports_row_ids(&self) -> bool {
        self.row_ids_enabled
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(self)
    }
}

/// Serves column headers: one row whose values are the field header texts.
#[derive(Debug, Clone)]
pub struct HeaderDataServer {
    row_count: usize,
}

impl Default for HeaderDataServer {
    fn default() -> Self {
        Self { row_count: 1 }
    }
}

impl HeaderDataServer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DataServer for HeaderDataServer {
    fn get_row_count(&self) -> usize {
        self.row_count
    }

    fn get_view_value(&self, field: &SchemaField, _row_index: usize) -> DataValue {
        DataValue::Text(field.header_text().to_string())
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

    fn server() -> RowArrayDataServer {
        RowArrayDataServer::new(vec![
            vec![DataValue::from("c"), DataValue::from(3.0)],
            vec![DataValue::from("a"), DataValue::from(1.0)],
            vec![DataValue::from("b"), DataValue::from(2.0)],
        ])
    }

    #[test]
    fn sort_keeps_row_ids_with_rows() {
        let mut s = server();
        let id_of_a = s.get_row_id_from_index(1).unwrap();
        let notes = s.sort_by_field(1, true);
        assert_eq!(notes[0], DataNotification::PreReindex);
        assert_eq!(s.get_row_index_from_id(id_of_a), Some(0));
        assert_eq!(
            s.get_view_value(&SchemaField::new(0, "k"), 0),
            DataValue::from("a")
        );
    }

    #[test]
    fn retain_reports_dropped_rows() {
        let mut s = server();
        let notes = s.retain_rows(|row| row.first() != Some(&DataValue::from("b")));
        assert_eq!(
            notes[1],
            DataNotification::PostReindex {
                all_rows_kept: false
            }
        );
        assert_eq!(s.get_row_count(), 2);
    }

    #[test]
    fn move_rows_reports_clamped_indices() {
        let mut s = server();
        let note = s.move_rows(0, 5, 1);
        assert_eq!(
            note,
            DataNotification::RowsMoved {
                old_index: 0,
                new_index: 2,
                count: 1
            }
        );
        assert_eq!(
            s.get_view_value(&SchemaField::new(0, "k"), 2),
            DataValue::from("c")
        );
    }

    #[test]
    fn ids_disabled_hides_ids() {
        let s = server().without_row_ids();
        assert!(!s.supports_row_ids());
        assert_eq!(s.get_row_id_from_index(0), None);
    }

    #[test]
    fn header_server_serves_header_text() {
        let mut field = SchemaField::new(0, "price");
        let header = HeaderDataServer::new();
        assert_eq!(header.get_view_value(&field, 0), DataValue::from("price"));
        field.header = Some("Price".to_string());
        assert_eq!(header.get_view_value(&field, 0), DataValue::from("Price"));
    }
}
