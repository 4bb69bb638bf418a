//! Copying the selection as tab separated text.
//!
//! The copied block is the bounding box of everything selected in the main
//! subgrid. Rows without a selected cell are skipped and unselected cells
//! inside the box are left empty.

use crate::columns::ColumnsManager;
use crate::data::DataServer;
use crate::selection::Selection;
use crate::subgrid::SubgridId;

/// Selection of `subgrid` rendered as TSV, or `None` when nothing in it is
/// selected.
pub fn selection_to_tsv(
    selection: &Selection,
    columns: &ColumnsManager,
    server: &dyn DataServer,
    subgrid: SubgridId,
) -> Option<String> {
    let column_count = columns.active_column_count();
    let row_count = server.get_row_count();
    if column_count == 0 || row_count == 0 {
        return None;
    }

    let (mut min_x, mut min_y, mut max_x, mut max_y) = if selection.all_rows_selected_subgrid() == Some(subgrid) {
        (0, 0, column_count - 1, row_count - 1)
    } else {
        (usize::MAX, usize::MAX, 0, 0)
    };
    for area in selection.areas().iter().filter(|a| a.subgrid == subgrid) {
        let r = area.rectangle;
        if r.is_empty() {
            continue;
        }
        min_x = min_x.min(r.x);
        min_y = min_y.min(r.y);
        max_x = max_x.max(r.exclusive_right() - 1);
        max_y = max_y.max(r.exclusive_bottom() - 1);
    }
    if min_x > max_x || min_y > max_y {
        return None;
    }
    let max_x = max_x.min(column_count - 1);
    let max_y = max_y.min(row_count - 1);

    let mut lines = Vec::new();
    for y in min_y..=max_y {
        if !(min_x..=max_x).any(|x| selection.is_cell_selected(x, y, subgrid)) {
            continue;
        }
        let cells: Vec<String> = (min_x..=max_x)
            .map(|x| {
                if !selection.is_cell_selected(x, y, subgrid) {
                    return String::new();
                }
                columns
                    .active_field(x)
                    .map(|field| escape_cell_value(&server.get_view_value(field, y).to_string()))
                    .unwrap_or_default()
            })
            .collect();
        lines.push(cells.join("\t"));
    }
    Some(lines.join("\n"))
}

/// Quote a value containing tabs, newlines or quotes, doubling inner quotes.
pub fn escape_cell_value(value: &str) -> String {
    let needs_quoting = value.contains('\t')
        || value.contains('\n')
        || value.contains('\r')
        || value.contains('"');
    if needs_quoting {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
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
    use crate::data::{DataValue, RowArrayDataServer, SchemaField};
    use crate::selection::SelectionAreaTypeSpecifier;
    use crate::settings::GridSettings;
    use test_case::test_case;

    const MAIN: SubgridId = SubgridId(1);

    #[test_case("plain" => "plain")]
    #[test_case("a\tb" => "\"a\tb\"")]
    #[test_case("say \"hi\"" => "\"say \"\"hi\"\"\"")]
    fn escaping(value: &str) -> String {
        escape_cell_value(value)
    }

    fn fixture() -> (ColumnsManager, RowArrayDataServer) {
        let fields: Vec<SchemaField> = (0..3).map(|i| SchemaField::new(i, format!("f{i}"))).collect();
        let columns = ColumnsManager::new(&fields, &GridSettings::default());
        let rows = (0..4)
            .map(|r| (0..3).map(|c| DataValue::from(format!("r{r}c{c}"))).collect())
            .collect();
        (columns, RowArrayDataServer::new(rows))
    }

    #[test]
    fn rectangle_copies_block() {
        let (columns, server) = fixture();
        let mut selection = Selection::default();
        selection.set_bounds(3, 4);
        selection.select_only_cell(1, 1, MAIN, SelectionAreaTypeSpecifier::Rectangle);
        selection.update_last_selection_area(2, 2, MAIN).unwrap();
        let text = selection_to_tsv(&selection, &columns, &server, MAIN).unwrap();
        assert_eq!(text, "r1c1\tr1c2\nr2c1\tr2c2");
    }

    #[test]
    fn gaps_between_areas_stay_empty() {
        let (columns, server) = fixture();
        let mut selection = Selection::default();
        selection.set_bounds(3, 4);
        selection.select_only_cell(0, 0, MAIN, SelectionAreaTypeSpecifier::Rectangle);
        selection.select_add_cell(2, 3, MAIN, SelectionAreaTypeSpecifier::Rectangle);
        let text = selection_to_tsv(&selection, &columns, &server, MAIN).unwrap();
        assert_eq!(text, "r0c0\t\t\n\t\tr3c2");
    }

    #[test]
    fn nothing_selected_is_none() {
        let (columns, server) = fixture();
        let selection = Selection::default();
        assert!(selection_to_tsv(&selection, &columns, &server, MAIN).is_none());
    }
}
