//! Events queued for the host.

use serde::Serialize;

use crate::geometry::Point;
use crate::subgrid::SubgridId;

/// Something the host may want to react to. Drained with
/// [`crate::grid::Grid::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GridEvent {
    /// The selection model version moved on.
    SelectionChanged { version: u64 },
    FocusChanged {
        point: Option<Point>,
        subgrid: Option<SubgridId>,
    },
    /// Column order, visibility or widths changed.
    ColumnsChanged,
    CellClicked { point: Point, subgrid: SubgridId },
    /// Selection text produced by a copy gesture.
    Copy { text: String },
}
