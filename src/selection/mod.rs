//! Selection and focus.
//!
//! [`Selection`] is the canonical selection state: an ordered list of areas
//! whose last entry is the target of the running gesture. [`Focus`] is the
//! single focused cell. Reindex snapshots carry both across sorting and
//! filtering of the main subgrid.

mod area;
mod focus;
mod model;
mod reindex;

pub use area::{CellSelectedAreaTypes, SelectionArea, SelectionAreaType, SelectionAreaTypeSpecifier};
pub use focus::Focus;
pub use model::Selection;
pub use reindex::{ReindexSnapshot, RestoreOptions, RowKey};

/// Where index `index` ends up after `count` items at `old_index` are moved
/// so they start at `new_index` (an index into the list after removal).
pub fn index_after_move(index: usize, old_index: usize, new_index: usize, count: usize) -> usize {
    let moved_end = old_index + count;
    if index >= old_index && index < moved_end {
        return new_index + (index - old_index);
    }
    let after_removal = if index >= moved_end { index - count } else { index };
    if after_removal >= new_index {
        after_removal + count
    } else {
        after_removal
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
    use test_case::test_case;

    // Moving [1, 2] of [0 1 2 3 4] to index 2 gives [0 3 1 2 4].
    #[test_case(0 => 0; "before block")]
    #[test_case(1 => 2; "first moved")]
    #[test_case(2 => 3; "second moved")]
    #[test_case(3 => 1; "shifted back")]
    #[test_case(4 => 4; "after target")]
    fn index_after_move_follows_items(index: usize) -> usize {
        index_after_move(index, 1, 2, 2)
    }
}
