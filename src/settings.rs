//! Grid settings.
//!
//! A flat configuration bag read by the layout, selection and behaviour code.
//! The grid never validates settings beyond what serde enforces; hosts load
//! them from JSON (or a JS object on wasm32) and hand them over whole.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::selection::SelectionAreaType;

/// Keyboard modifier that can be bound to a selection gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    Alt,
    Ctrl,
    Meta,
    Shift,
}

/// Modifier keys held while an input event was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModifierKeys {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl ModifierKeys {
    pub const NONE: ModifierKeys = ModifierKeys {
        alt: false,
        ctrl: false,
        meta: false,
        shift: false,
    };

    pub const fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub const fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    pub const fn alt() -> Self {
        Self {
            alt: true,
            ..Self::NONE
        }
    }

    /// Whether `key` is held. An unbound key (`None`) is never held.
    pub fn has(&self, key: Option<ModifierKey>) -> bool {
        match key {
            Some(ModifierKey::Alt) => self.alt,
            Some(ModifierKey::Ctrl) => self.ctrl,
            Some(ModifierKey::Meta) => self.meta,
            Some(ModifierKey::Shift) => self.shift,
            None => false,
        }
    }
}

/// All settings consulted by the grid engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridSettings {
    // Scrolling
    pub scrolling_enabled: bool,
    pub scroll_horizontally_smoothly: bool,
    pub scroll_vertically_smoothly: bool,
    pub grid_right_aligned: bool,

    // Fixed partitions
    pub fixed_column_count: usize,
    pub fixed_row_count: usize,

    // Grid lines
    pub grid_lines_v_width: f32,
    pub grid_lines_h_width: f32,
    pub fixed_lines_v_width: Option<f32>,
    pub fixed_lines_h_width: Option<f32>,

    // Sizes
    pub default_row_height: f32,
    pub default_column_width: f32,
    pub minimum_column_width: f32,
    pub maximum_column_width: Option<f32>,
    pub column_resize_grip_width: f32,

    // Selection
    pub multiple_selection_areas: bool,
    pub add_toggle_selection_area_modifier_key: Option<ModifierKey>,
    pub add_toggle_selection_area_modifier_key_does_toggle: bool,
    pub extend_last_selection_area_modifier_key: Option<ModifierKey>,
    pub secondary_selection_area_type_specifier_modifier_key: Option<ModifierKey>,
    pub primary_selection_area_type: SelectionAreaType,
    pub secondary_selection_area_type: SelectionAreaType,
    pub mouse_cell_selection: bool,
    pub mouse_column_selection: bool,
    pub mouse_row_selection: bool,

    // Column moving
    pub columns_reorderable: bool,
    pub columns_reorderable_hideable: bool,

    // Reindex restore
    pub restore_row_selections: bool,
    pub restore_column_selections: bool,
    pub restore_single_cell_selection: bool,
    pub restore_focus: bool,

    // Painting
    pub font: String,
    pub color: String,
    pub background_color: String,
    pub selection_background_color: String,
    pub hover_background_color: String,
    pub focus_border_color: String,
    pub grid_lines_color: String,
    pub cell_padding: f32,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            scrolling_enabled: true,
            scroll_horizontally_smoothly: true,
            scroll_vertically_smoothly: false,
            grid_right_aligned: false,

            fixed_column_count: 0,
            fixed_row_count: 0,

            grid_lines_v_width: 1.0,
            grid_lines_h_width: 1.0,
            fixed_lines_v_width: None,
            fixed_lines_h_width: None,

            default_row_height: 20.0,
            default_column_width: 100.0,
            minimum_column_width: 5.0,
            maximum_column_width: None,
            column_resize_grip_width: 4.0,

            multiple_selection_areas: true,
            add_toggle_selection_area_modifier_key: Some(ModifierKey::Ctrl),
            add_toggle_selection_area_modifier_key_does_toggle: true,
            extend_last_selection_area_modifier_key: Some(ModifierKey::Shift),
            secondary_selection_area_type_specifier_modifier_key: Some(ModifierKey::Alt),
            primary_selection_area_type: SelectionAreaType::Rectangle,
            secondary_selection_area_type: SelectionAreaType::Row,
            mouse_cell_selection: true,
            mouse_column_selection: true,
            mouse_row_selection: true,

            columns_reorderable: true,
            columns_reorderable_hideable: false,

            restore_row_selections: true,
            restore_column_selections: true,
            restore_single_cell_selection: true,
            restore_focus: true,

            font: "12px sans-serif".to_string(),
            color: "#333333".to_string(),
            background_color: "#FFFFFF".to_string(),
            selection_background_color: "#CFD8E8".to_string(),
            hover_background_color: "#F3F6FB".to_string(),
            focus_border_color: "#1A73E8".to_string(),
            grid_lines_color: "#D4D4D4".to_string(),
            cell_padding: 4.0,
        }
    }
}

impl GridSettings {
    /// Parse settings from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Width of the line separating fixed from scrollable columns.
    pub fn effective_fixed_lines_v_width(&self) -> f32 {
        self.fixed_lines_v_width.unwrap_or(self.grid_lines_v_width)
    }

    /// Height of the line separating fixed from scrollable rows.
    pub fn effective_fixed_lines_h_width(&self) -> f32 {
        self.fixed_lines_h_width.unwrap_or(self.grid_lines_h_width)
    }

    /// Clamp a requested column width to the configured limits.
    pub fn clamp_column_width(&self, width: f32) -> f32 {
        let width = width.max(self.minimum_column_width);
        match self.maximum_column_width {
            Some(max) => width.min(max.max(self.minimum_column_width)),
            None => width,
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

    #[test]
    fn partial_json_keeps_defaults() {
        let settings =
            GridSettings::from_json(r#"{"fixedColumnCount": 2, "gridRightAligned": true}"#)
                .unwrap();
        assert_eq!(settings.fixed_column_count, 2);
        assert!(settings.grid_right_aligned);
        assert!(settings.multiple_selection_areas);
        assert_eq!(settings.default_row_height, 20.0);
    }

    #[test]
    fn modifier_keys_from_json() {
        let settings = GridSettings::from_json(
            r#"{"extendLastSelectionAreaModifierKey": "Ctrl", "addToggleSelectionAreaModifierKey": null}"#,
        )
        .unwrap();
        assert_eq!(
            settings.extend_last_selection_area_modifier_key,
            Some(ModifierKey::Ctrl)
        );
        assert_eq!(settings.add_toggle_selection_area_modifier_key, None);
    }

    #[test]
    fn invalid_json_is_settings_error() {
        let err = GridSettings::from_json("{not json").unwrap_err();
        assert!(matches!(err, crate::error::GridError::Settings(_)));
    }

    #[test]
    fn unbound_modifier_is_never_held() {
        let keys = ModifierKeys {
            alt: true,
            ctrl: true,
            meta: true,
            shift: true,
        };
        assert!(!keys.has(None));
        assert!(keys.has(Some(ModifierKey::Meta)));
    }

    #[test]
    fn fixed_line_width_falls_back_to_grid_line_width() {
        let mut settings = GridSettings {
            grid_lines_v_width: 2.0,
            ..GridSettings::default()
        };
        assert_eq!(settings.effective_fixed_lines_v_width(), 2.0);
        settings.fixed_lines_v_width = Some(3.0);
        assert_eq!(settings.effective_fixed_lines_v_width(), 3.0);
    }
}
