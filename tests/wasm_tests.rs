//! Browser tests for the Canvas 2D view
//!
//! Run with: wasm-pack test --headless --chrome

#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use revgrid::RevGridView;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::HtmlCanvasElement;

wasm_bindgen_test_configure!(run_in_browser);

fn canvas(width: u32, height: u32) -> HtmlCanvasElement {
    let document = web_sys::window().unwrap().document().unwrap();
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")
        .unwrap()
        .dyn_into()
        .unwrap();
    canvas.set_width(width);
    canvas.set_height(height);
    document.body().unwrap().append_child(&canvas).unwrap();
    canvas
}

fn view(rows: usize) -> RevGridView {
    let names = serde_wasm_bindgen::to_value(&["Name", "Qty"]).unwrap();
    let mut view = RevGridView::new(canvas(400, 200), names, 1.0).unwrap();
    let data: Vec<(String, u32)> = (0..rows).map(|i| (format!("item{i}"), 10 * u32::try_from(i).unwrap())).collect();
    view.load_rows(serde_wasm_bindgen::to_value(&data).unwrap()).unwrap();
    view
}

#[wasm_bindgen_test]
fn test_view_renders_and_scrolls() {
    let mut view = view(100);
    view.render().unwrap();
    assert!(view.scroll_rows_by(3));
    view.render().unwrap();
    assert!(!view.scroll_columns_by(1));
    assert_eq!(view.selection_text(), None);
    assert!(view.selected_rows().is_empty());
    view.destroy();
}

#[wasm_bindgen_test]
fn test_settings_object_is_applied() {
    let mut view = view(10);
    let settings = js_sys::JSON::parse(r#"{"fixedColumnCount": 1}"#).unwrap();
    view.set_settings(settings).unwrap();
    view.render().unwrap();
    view.destroy();
}

#[wasm_bindgen_test]
fn test_bad_settings_json_is_a_js_error() {
    assert!(revgrid::resolve_settings("{nope").is_err());
    let resolved = revgrid::resolve_settings("{}").unwrap();
    assert!(resolved.contains("\"fixedColumnCount\":0"));
}
