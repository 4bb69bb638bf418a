//! Push notifications from data and schema servers.

/// Change pushed by a subgrid's data server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataNotification {
    BeginChange,
    EndChange,
    RowsInserted { index: usize, count: usize },
    RowsDeleted { index: usize, count: usize },
    AllRowsDeleted,
    RowsMoved {
        old_index: usize,
        new_index: usize,
        count: usize,
    },
    RowsLoaded,
    InvalidateAll,
    InvalidateRows { index: usize, count: usize },
    InvalidateRow { index: usize },
    InvalidateRowColumns {
        row_index: usize,
        field_index: usize,
        count: usize,
    },
    InvalidateRowCells {
        row_index: usize,
        field_indexes: Vec<usize>,
    },
    InvalidateCell { field_index: usize, row_index: usize },
    /// Rows are about to be reordered or filtered; snapshot index based state.
    PreReindex,
    /// Reindex finished. `all_rows_kept` is false when rows were filtered out.
    PostReindex { all_rows_kept: bool },
}

/// Change pushed by the schema server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNotification {
    BeginChange,
    EndChange,
    FieldsInserted { index: usize, count: usize },
    FieldsDeleted { index: usize, count: usize },
    AllFieldsDeleted,
    SchemaChanged,
}
