//! Playback cursor wiring
//!
//! abcjs reports playback progress through a caller-supplied cursor-control
//! object. Ours keeps a highlight CSS class moving across the per-note
//! elements that `add_classes` rendering produces. The callbacks are
//! long-lived closures owned by the JS side for the life of the widget.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::wasm_warn;

/// Class toggled on the notes at the playback position.
pub const HIGHLIGHT_CLASS: &str = "abcjs-highlight";

/// Build the cursor-control object handed to `SynthController.load`.
pub fn build_cursor_control(document: &Document) -> JsValue {
    let control = Object::new();

    let doc = document.clone();
    let on_start = Closure::<dyn FnMut()>::new(move || clear_highlights(&doc));
    set_callback(&control, "onStart", on_start.as_ref());
    on_start.forget();

    let doc = document.clone();
    let on_event = Closure::<dyn FnMut(JsValue)>::new(move |event: JsValue| {
        clear_highlights(&doc);
        highlight_event(&event);
    });
    set_callback(&control, "onEvent", on_event.as_ref());
    on_event.forget();

    let doc = document.clone();
    let on_finished = Closure::<dyn FnMut()>::new(move || clear_highlights(&doc));
    set_callback(&control, "onFinished", on_finished.as_ref());
    on_finished.forget();

    control.into()
}

fn set_callback(control: &Object, name: &str, callback: &JsValue) {
    if Reflect::set(control, &JsValue::from_str(name), callback).is_err() {
        wasm_warn!("failed to install cursor callback {}", name);
    }
}

fn clear_highlights(document: &Document) {
    let selector = format!(".{}", HIGHLIGHT_CLASS);
    let Ok(nodes) = document.query_selector_all(&selector) else {
        return;
    };
    for i in 0..nodes.length() {
        if let Some(node) = nodes.item(i) {
            if let Ok(element) = node.dyn_into::<Element>() {
                let _ = element.class_list().remove_1(HIGHLIGHT_CLASS);
            }
        }
    }
}

/// `event.elements` is an array of arrays of the DOM elements making up the
/// notes sounding at this cursor position.
fn highlight_event(event: &JsValue) {
    let Ok(groups) = Reflect::get(event, &JsValue::from_str("elements")) else {
        return;
    };
    if groups.is_undefined() || groups.is_null() {
        return;
    }
    for group in Array::from(&groups).iter() {
        for member in Array::from(&group).iter() {
            if let Ok(element) = member.dyn_into::<Element>() {
                let _ = element.class_list().add_1(HIGHLIGHT_CLASS);
            }
        }
    }
}
