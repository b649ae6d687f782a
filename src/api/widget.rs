//! Exported widget class
//!
//! The loader page constructs one `AbcScoreWidget` over its container div,
//! calls `componentMounted()` once, and forwards every Streamlit render
//! event to `update(args)`. The theme object is merged into `args` by the
//! loader so the whole request arrives as one object.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::api::dom::{DomPlatform, DomWidget};
use crate::api::helpers;
use crate::models::config::RenderRequest;
use crate::models::tunes;
use crate::wasm_log;

/// Streamlit score widget: renders ABC notation and wires the synth
/// transport.
#[wasm_bindgen]
pub struct AbcScoreWidget {
    inner: Rc<RefCell<DomWidget>>,
}

#[wasm_bindgen]
impl AbcScoreWidget {
    /// Mount the widget inside the element with id `container_id`.
    #[wasm_bindgen(constructor)]
    pub fn new(container_id: &str) -> Result<AbcScoreWidget, JsValue> {
        let platform = DomPlatform::mount(container_id)?;
        let inner = Rc::new(RefCell::new(DomWidget::new(platform)));
        let weak = Rc::downgrade(&inner);
        inner.borrow_mut().platform_mut().bind_widget(weak);
        wasm_log!("score widget mounted in #{}", container_id);
        Ok(AbcScoreWidget { inner })
    }

    /// Tell Streamlit the component is ready; render events start after
    /// this. Safe to call more than once, the signal is sent once.
    #[wasm_bindgen(js_name = componentMounted)]
    pub fn component_mounted(&self) {
        self.inner.borrow_mut().mounted();
    }

    /// Handle one Streamlit render event. `args` is the host argument
    /// object (notation, height, width, scale, responsive, enable_audio,
    /// theme).
    pub fn update(&self, args: JsValue) -> Result<(), JsValue> {
        let request: RenderRequest =
            helpers::deserialize(args, "Failed to parse widget arguments")?;
        request
            .validate()
            .map_err(|e| helpers::validation_error(e.to_string()))?;
        self.inner.borrow_mut().update(&request);
        Ok(())
    }

    /// Binding state of the current score, for the loader page and tests:
    /// "unbound", "binding", "bound", or "failed".
    #[wasm_bindgen(js_name = connectionState)]
    pub fn connection_state(&self) -> String {
        self.inner.borrow().connection_state().to_string()
    }
}

/// Names of the bundled example tunes.
#[wasm_bindgen(js_name = listExamples)]
pub fn list_examples() -> Result<JsValue, JsValue> {
    helpers::serialize(&tunes::example_names(), "Failed to serialize example names")
}

/// Look up a bundled example tune by name.
#[wasm_bindgen(js_name = getExampleNotation)]
pub fn get_example_notation(name: &str) -> Result<String, JsValue> {
    tunes::example_notation(name)
        .map(|notation| notation.to_string())
        .map_err(helpers::validation_error)
}
