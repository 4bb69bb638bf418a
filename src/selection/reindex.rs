//! Carrying selection and focus across a reindex of the main subgrid.
//!
//! A reindex (sort, filter) reorders rows without per-row notifications.
//! Before it, row positions are captured as row ids when the data server has
//! them, raw indices otherwise; afterwards they are resolved back. Index keys
//! restore to the same position, which selects different rows when the
//! reindex reordered them.

use tracing::debug;

use super::{Focus, Selection, SelectionArea, SelectionAreaType};
use crate::data::{DataServer, RowId};
use crate::geometry::{Point, Rectangle};
use crate::settings::GridSettings;
use crate::subgrid::SubgridId;

/// Stable reference to a main subgrid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    Id(RowId),
    Index(usize),
}

impl RowKey {
    fn capture(server: &dyn DataServer, row_index: usize) -> Self {
        if server.supports_row_ids() {
            if let Some(id) = server.get_row_id_from_index(row_index) {
                return RowKey::Id(id);
            }
        }
        RowKey::Index(row_index)
    }

    fn resolve(self, server: &dyn DataServer) -> Option<usize> {
        match self {
            RowKey::Id(id) => server.get_row_index_from_id(id),
            RowKey::Index(index) => (index < server.get_row_count()).then_some(index),
        }
    }
}

/// Which parts of the selection survive a reindex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreOptions {
    pub row_selections: bool,
    pub column_selections: bool,
    pub single_cell_selection: bool,
    pub focus: bool,
}

impl From<&GridSettings> for RestoreOptions {
    fn from(settings: &GridSettings) -> Self {
        Self {
            row_selections: settings.restore_row_selections,
            column_selections: settings.restore_column_selections,
            single_cell_selection: settings.restore_single_cell_selection,
            focus: settings.restore_focus,
        }
    }
}

#[derive(Debug, Clone)]
enum AreaSnapshot {
    /// Area outside the main subgrid, or a column area; rows don't matter.
    Unchanged(SelectionArea),
    Rows(Vec<RowKey>),
    SingleCell { x: usize, row: RowKey },
    /// Multi-cell rectangles are not carried over.
    Dropped,
}

/// Selection and focus captured before a reindex.
#[derive(Debug, Clone)]
pub struct ReindexSnapshot {
    main_subgrid: SubgridId,
    areas: Vec<AreaSnapshot>,
    all_rows_selected: Option<SubgridId>,
    focus: Option<FocusSnapshot>,
}

#[derive(Debug, Clone, Copy)]
enum FocusSnapshot {
    Main { x: usize, row: RowKey },
    Other { point: Point, subgrid: SubgridId },
}

impl ReindexSnapshot {
    pub fn capture(
        selection: &Selection,
        focus: &Focus,
        server: &dyn DataServer,
        main_subgrid: SubgridId,
    ) -> Self {
        let areas = selection
            .areas()
            .iter()
            .map(|area| {
                if area.subgrid != main_subgrid {
                    return AreaSnapshot::Unchanged(*area);
                }
                let r = area.rectangle;
                match area.area_type {
                    SelectionAreaType::Column => AreaSnapshot::Unchanged(*area),
                    SelectionAreaType::Row => AreaSnapshot::Rows(
                        (r.y..r.exclusive_bottom())
                            .map(|row| RowKey::capture(server, row))
                            .collect(),
                    ),
                    SelectionAreaType::Rectangle if r.is_single_cell() => AreaSnapshot::SingleCell {
                        x: r.x,
                        row: RowKey::capture(server, r.y),
                    },
                    SelectionAreaType::Rectangle => AreaSnapshot::Dropped,
                }
            })
            .collect();

        let focus = match (focus.current_subgrid_point(), focus.subgrid()) {
            (Some(point), Some(subgrid)) if subgrid == main_subgrid => Some(FocusSnapshot::Main {
                x: point.x,
                row: RowKey::capture(server, point.y),
            }),
            (Some(point), Some(subgrid)) => Some(FocusSnapshot::Other { point, subgrid }),
            _ => None,
        };

        debug!(
            areas = selection.area_count(),
            by_row_id = server.supports_row_ids(),
            "reindex snapshot captured"
        );
        Self {
            main_subgrid,
            areas,
            all_rows_selected: selection.all_rows_selected_subgrid(),
            focus,
        }
    }

    /// Resolve the snapshot against the reindexed data.
    pub fn restore(
        self,
        selection: &mut Selection,
        focus: &mut Focus,
        server: &dyn DataServer,
        options: RestoreOptions,
    ) {
        let main = self.main_subgrid;
        let mut areas = Vec::new();
        for snapshot in self.areas {
            match snapshot {
                AreaSnapshot::Unchanged(area) => {
                    let keep = area.subgrid != main
                        || area.area_type != SelectionAreaType::Column
                        || options.column_selections;
                    if keep {
                        areas.push(area);
                    }
                }
                AreaSnapshot::Rows(keys) if options.row_selections => {
                    let mut rows: Vec<usize> = keys.iter().filter_map(|k| k.resolve(server)).collect();
                    rows.sort_unstable();
                    rows.dedup();
                    for (start, length) in contiguous_runs(&rows) {
                        areas.push(SelectionArea::new(
                            SelectionAreaType::Row,
                            Rectangle::new(0, start, 0, length),
                            main,
                        ));
                    }
                }
                AreaSnapshot::SingleCell { x, row } if options.single_cell_selection => {
                    if let Some(y) = row.resolve(server) {
                        areas.push(SelectionArea::new(
                            SelectionAreaType::Rectangle,
                            Rectangle::single_cell(Point::new(x, y)),
                            main,
                        ));
                    }
                }
                AreaSnapshot::Rows(_) | AreaSnapshot::SingleCell { .. } | AreaSnapshot::Dropped => {}
            }
        }

        let all_rows = self.all_rows_selected.filter(|_| options.row_selections);
        let restored = areas.len();
        selection.replace_all(areas, all_rows);

        match self.focus {
            Some(FocusSnapshot::Main { x, row }) if options.focus => match row.resolve(server) {
                Some(y) => {
                    focus.set(Point::new(x, y), main);
                }
                None => {
                    focus.clear();
                }
            },
            Some(FocusSnapshot::Other { point, subgrid }) => {
                focus.set(point, subgrid);
            }
            Some(FocusSnapshot::Main { .. }) | None => {
                focus.clear();
            }
        }
        debug!(restored, focus = ?focus.current_subgrid_point(), "reindex snapshot restored");
    }
}

/// `(start, length)` for each run of consecutive values in sorted `values`.
fn contiguous_runs(values: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &value in values {
        match runs.last_mut() {
            Some((start, length)) if *start + *length == value => *length += 1,
            _ => runs.push((value, 1)),
        }
    }
    runs
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

    #[test]
    fn runs_split_on_gaps() {
        assert_eq!(contiguous_runs(&[1, 2, 3, 7, 9, 10]), vec![(1, 3), (7, 1), (9, 2)]);
        assert!(contiguous_runs(&[]).is_empty());
    }
}
