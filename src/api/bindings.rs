//! Raw bindings to the abcjs and Streamlit globals
//!
//! The component's loader page exposes `ABCJS` (the bundled abcjs build)
//! and `Streamlit` (the component-lib bridge) as globals inside the iframe;
//! these externs are the whole surface the widget consumes from either.

use wasm_bindgen::prelude::*;
use web_sys::Element;

#[wasm_bindgen]
extern "C" {
    /// `ABCJS.renderAbc(target, notation, options)`: synchronous visual
    /// render; throws on malformed notation, returns the visual objects.
    #[wasm_bindgen(js_namespace = ABCJS, js_name = renderAbc, catch)]
    pub fn render_abc(
        target: &Element,
        notation: &str,
        options: &JsValue,
    ) -> Result<js_sys::Array, JsValue>;

    /// `ABCJS.synth.supportsAudio()`: audio-synthesis capability probe.
    #[wasm_bindgen(js_namespace = ["ABCJS", "synth"], js_name = supportsAudio)]
    pub fn supports_audio() -> bool;

    /// abcjs transport controller: the play/pause/loop UI.
    #[wasm_bindgen(js_namespace = ["ABCJS", "synth"])]
    pub type SynthController;

    #[wasm_bindgen(constructor, js_namespace = ["ABCJS", "synth"])]
    pub fn new() -> SynthController;

    /// Mount the transport into `target`, with cursor callbacks and
    /// visual-option flags.
    #[wasm_bindgen(method)]
    pub fn load(
        this: &SynthController,
        target: &Element,
        cursor_control: &JsValue,
        visual_options: &JsValue,
    );

    /// Bind a visual object as the active tune. Resolves once the tune is
    /// playable.
    #[wasm_bindgen(method, js_name = setTune)]
    pub fn set_tune(
        this: &SynthController,
        visual_obj: &JsValue,
        user_action: bool,
    ) -> js_sys::Promise;

    /// Grey out (or restore) the transport buttons.
    #[wasm_bindgen(method)]
    pub fn disable(this: &SynthController, disabled: bool);

    /// abcjs synthesis buffer builder.
    #[wasm_bindgen(js_namespace = ["ABCJS", "synth"])]
    pub type CreateSynth;

    #[wasm_bindgen(constructor, js_namespace = ["ABCJS", "synth"])]
    pub fn new() -> CreateSynth;

    /// Build the audio buffer for `options.visualObj`. Resolves when the
    /// buffer is ready for the controller to use.
    #[wasm_bindgen(method)]
    pub fn init(this: &CreateSynth, options: &JsValue) -> js_sys::Promise;

    /// `Streamlit.setComponentReady()`: one-time mount handshake; no render
    /// events arrive before this.
    #[wasm_bindgen(js_namespace = Streamlit, js_name = setComponentReady)]
    pub fn set_component_ready();

    /// `Streamlit.setFrameHeight(px)`: ask the host to resize the iframe.
    #[wasm_bindgen(js_namespace = Streamlit, js_name = setFrameHeight)]
    pub fn set_frame_height(height: u32);
}
