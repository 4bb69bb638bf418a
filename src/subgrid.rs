//! Subgrids: stacked row regions sharing the grid's columns.
//!
//! A grid shows one main subgrid plus optional header/filter subgrids above it
//! and summary subgrids below it. Only the main subgrid scrolls vertically.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::DataServer;

/// Index of a subgrid in the grid's subgrid list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubgridId(pub usize);

impl fmt::Display for SubgridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "subgrid#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubgridRole {
    Header,
    Filter,
    Main,
    Summary,
}

/// One row region and the data server feeding it.
pub struct Subgrid {
    id: SubgridId,
    role: SubgridRole,
    data_server: Box<dyn DataServer>,
    default_row_height: Option<f32>,
    row_heights: HashMap<usize, f32>,
}

impl fmt::Debug for Subgrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subgrid")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("row_count", &self.row_count())
            .finish()
    }
}

impl Subgrid {
    pub fn new(id: SubgridId, role: SubgridRole, data_server: Box<dyn DataServer>) -> Self {
        Self {
            id,
            role,
            data_server,
            default_row_height: None,
            row_heights: HashMap::new(),
        }
    }

    pub fn id(&self) -> SubgridId {
        self.id
    }

    pub fn role(&self) -> SubgridRole {
        self.role
    }

    pub fn is_main(&self) -> bool {
        self.role == SubgridRole::Main
    }

    pub fn is_header(&self) -> bool {
        self.role == SubgridRole::Header
    }

    pub fn data_server(&self) -> &dyn DataServer {
        self.data_server.as_ref()
    }

    pub fn data_server_mut(&mut self) -> &mut dyn DataServer {
        self.data_server.as_mut()
    }

    /// Swap in a new data server. Row height overrides are dropped.
    pub fn set_data_server(&mut self, data_server: Box<dyn DataServer>) {
        self.data_server = data_server;
        self.row_heights.clear();
    }

    pub fn row_count(&self) -> usize {
        self.data_server.get_row_count()
    }

    /// Override the grid-wide default row height for this subgrid.
    pub fn set_default_row_height(&mut self, height: Option<f32>) {
        self.default_row_height = height;
    }

    pub fn set_row_height(&mut self, row_index: usize, height: f32) {
        self.row_heights.insert(row_index, height);
    }

    pub fn row_height(&self, row_index: usize, grid_default: f32) -> f32 {
        self.row_heights
            .get(&row_index)
            .copied()
            .unwrap_or_else(|| self.default_row_height.unwrap_or(grid_default))
    }

    /// Heights of every row, in order.
    pub fn row_heights(&self, grid_default: f32) -> Vec<f32> {
        (0..self.row_count())
            .map(|i| self.row_height(i, grid_default))
            .collect()
    }

    /// Pixel height of the whole subgrid including one horizontal line per row.
    pub fn total_height(&self, grid_default: f32, line_width: f32) -> f32 {
        (0..self.row_count())
            .map(|i| self.row_height(i, grid_default) + line_width)
            .sum()
    }

    /// Keep per-row height overrides attached to their rows.
    pub fn rows_inserted(&mut self, index: usize, count: usize) {
        if self.row_heights.is_empty() {
            return;
        }
        self.row_heights = self
            .row_heights
            .drain()
            .map(|(row, h)| if row >= index { (row + count, h) } else { (row, h) })
            .collect();
    }

    pub fn rows_deleted(&mut self, index: usize, count: usize) {
        if self.row_heights.is_empty() {
            return;
        }
        let end = index + count;
        self.row_heights = self
            .row_heights
            .drain()
            .filter(|(row, _)| *row < index || *row >= end)
            .map(|(row, h)| if row >= end { (row - count, h) } else { (row, h) })
            .collect();
    }

    pub fn clear_row_heights(&mut self) {
        self.row_heights.clear();
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
    use crate::data::{DataValue, RowArrayDataServer};

    fn subgrid(rows: usize) -> Subgrid {
        let data = (0..rows).map(|i| vec![DataValue::from(i as f64)]).collect();
        Subgrid::new(
            SubgridId(0),
            SubgridRole::Main,
            Box::new(RowArrayDataServer::new(data)),
        )
    }

    #[test]
    fn row_height_overrides() {
        let mut s = subgrid(3);
        s.set_row_height(1, 40.0);
        assert_eq!(s.row_heights(20.0), vec![20.0, 40.0, 20.0]);
        assert_eq!(s.total_height(20.0, 1.0), 83.0);
        s.set_default_row_height(Some(10.0));
        assert_eq!(s.row_height(0, 20.0), 10.0);
    }

    #[test]
    fn row_height_overrides_follow_rows() {
        let mut s = subgrid(5);
        s.set_row_height(2, 40.0);
        s.rows_inserted(0, 2);
        assert_eq!(s.row_height(4, 20.0), 40.0);
        s.rows_deleted(0, 1);
        assert_eq!(s.row_height(3, 20.0), 40.0);
        s.rows_deleted(3, 1);
        assert_eq!(s.row_height(3, 20.0), 20.0);
    }
}
