//! Data and schema provider interfaces.
//!
//! The grid never owns a dataset. Each subgrid pulls values from a
//! [`DataServer`]; column definitions come from a [`SchemaServer`]. Providers
//! push change notifications to the grid as [`DataNotification`] and
//! [`SchemaNotification`] values.

mod notifications;
mod row_array;
mod schema;
mod value;

pub use notifications::{DataNotification, SchemaNotification};
pub use row_array::{HeaderDataServer, RowArrayDataServer};
pub use schema::{FieldListSchemaServer, SchemaField, SchemaServer};
pub use value::DataValue;

use std::any::Any;

use crate::error::{GridError, Result};

/// Stable row identity offered by servers that can track rows across reindexing.
pub type RowId = u64;

/// Row data provider for one subgrid.
pub trait DataServer {
    fn get_row_count(&self) -> usize;

    /// Display value of `field` in row `row_index`.
    fn get_view_value(&self, field: &SchemaField, row_index: usize) -> DataValue;

    /// Value handed to an editor. `None` when the server does not support editing.
    fn get_edit_value(&self, _field: &SchemaField, _row_index: usize) -> Option<DataValue> {
        None
    }

    fn set_edit_value(
        &mut self,
        _field: &SchemaField,
        _row_index: usize,
        _value: DataValue,
    ) -> Result<()> {
        Err(GridError::ReadOnly)
    }

    /// Stable id for the row currently at `row_index`, if the server tracks ids.
    fn get_row_id_from_index(&self, _row_index: usize) -> Option<RowId> {
        None
    }

    /// Current index of the row with `row_id`, if it still exists.
    fn get_row_index_from_id(&self, _row_id: RowId) -> Option<usize> {
        None
    }

    /// Whether [`DataServer::get_row_id_from_index`] is implemented.
    fn supports_row_ids(&self) -> bool {
        false
    }

    /// Downcasting hook for hosts that keep a concrete server inside the grid.
    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}
