//! Selection area types.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rectangle};
use crate::subgrid::SubgridId;

/// Concrete kind of a selection area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionAreaType {
    /// Cells inside the rectangle.
    Rectangle,
    /// Whole columns: every row of the subgrid for the rectangle's columns.
    Column,
    /// Whole rows: every active column for the rectangle's rows.
    Row,
}

/// How a gesture picks the type of the area it creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectionAreaTypeSpecifier {
    /// `primary_selection_area_type` setting.
    Primary,
    /// `secondary_selection_area_type` setting.
    Secondary,
    Rectangle,
    Row,
    Column,
    /// Type of the last area, or primary when there is none.
    LastOrPrimary,
}

/// One rectangle, row range or column range of the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionArea {
    pub area_type: SelectionAreaType,
    pub rectangle: Rectangle,
    pub subgrid: SubgridId,
}

impl SelectionArea {
    pub fn new(area_type: SelectionAreaType, rectangle: Rectangle, subgrid: SubgridId) -> Self {
        Self {
            area_type,
            rectangle,
            subgrid,
        }
    }

    /// Column areas ignore the row, row areas ignore the column.
    pub fn contains_cell(&self, x: usize, y: usize, subgrid: SubgridId) -> bool {
        if self.subgrid != subgrid {
            return false;
        }
        match self.area_type {
            SelectionAreaType::Rectangle => self.rectangle.contains(x, y),
            SelectionAreaType::Column => self.rectangle.contains_x(x),
            SelectionAreaType::Row => self.rectangle.contains_y(y),
        }
    }

    /// Cell `point` is the first corner of this area.
    pub fn is_anchored_at(&self, point: Point) -> bool {
        self.rectangle.first_corner_point() == point
    }

    /// Same type and cells, ignoring the first corner.
    pub fn covers_same_cells(&self, other: &SelectionArea) -> bool {
        self.area_type == other.area_type
            && self.subgrid == other.subgrid
            && self.rectangle.x == other.rectangle.x
            && self.rectangle.y == other.rectangle.y
            && self.rectangle.width == other.rectangle.width
            && self.rectangle.height == other.rectangle.height
    }
}

/// Which kinds of area contain a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellSelectedAreaTypes {
    pub row_selected: bool,
    pub column_selected: bool,
    pub cell_selected: bool,
}

impl CellSelectedAreaTypes {
    pub fn any(&self) -> bool {
        self.row_selected || self.column_selected || self.cell_selected
    }
}
