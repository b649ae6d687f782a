//! DOM platform
//!
//! Implements the widget's [`Platform`] seam against the real iframe: two
//! child regions inside the host-provided container (score above, transport
//! below), abcjs for rendering and synthesis, `setTimeout` for the one-shot
//! timers, and the Streamlit bridge for the host signals.

use std::cell::RefCell;
use std::rc::Weak;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::api::{bindings, cursor, helpers};
use crate::error::WidgetError;
use crate::models::config::RenderRequest;
use crate::render::RenderOptions;
use crate::widget::{Platform, ScoreWidget, TimerKind};
use crate::{wasm_error, wasm_warn};

/// The widget instance as wired to the DOM.
pub type DomWidget = ScoreWidget<DomPlatform>;

/// Which asynchronous handoff step a promise completion belongs to.
#[derive(Clone, Copy)]
enum AsyncStep {
    Buffer,
    Tune,
}

/// Transport button flags passed to `SynthController.load`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransportOptions {
    display_loop: bool,
    display_restart: bool,
    display_play: bool,
    display_progress: bool,
    display_warp: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            display_loop: true,
            display_restart: true,
            display_play: true,
            display_progress: true,
            display_warp: true,
        }
    }
}

pub struct DomPlatform {
    document: Document,
    container: HtmlElement,
    visual: HtmlElement,
    audio: HtmlElement,
    controller: Option<bindings::SynthController>,
    /// Back-reference for timer and promise callbacks. Set right after the
    /// widget is wrapped in its `Rc`; empty only during construction.
    widget: Weak<RefCell<DomWidget>>,
}

impl DomPlatform {
    /// Create the score and transport regions inside `container_id`.
    pub fn mount(container_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window object"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document object"))?;
        let container = document
            .get_element_by_id(container_id)
            .ok_or_else(|| {
                helpers::validation_error(format!("container '#{}' not found", container_id))
            })?
            .dyn_into::<HtmlElement>()
            .map_err(|_| {
                helpers::validation_error(format!("container '#{}' is not an HTML element", container_id))
            })?;

        let visual = create_region(&document, "abc-score-visual")?;
        visual.set_attribute("style", "width: 100%; min-height: 100%;")?;
        let audio = create_region(&document, "abc-score-audio")?;
        container.append_child(&visual)?;
        container.append_child(&audio)?;

        Ok(Self {
            document,
            container,
            visual,
            audio,
            controller: None,
            widget: Weak::new(),
        })
    }

    pub fn bind_widget(&mut self, widget: Weak<RefCell<DomWidget>>) {
        self.widget = widget;
    }

    fn set_container_style(&self, property: &str, value: &str) {
        if self.container.style().set_property(property, value).is_err() {
            wasm_warn!("failed to set container style {}", property);
        }
    }

    /// Route a promise settlement back into the widget, tagged with the
    /// render generation. The chain is never cancelled; the generation makes
    /// stale completions inert, so the one-shot handlers can be handed to JS
    /// for good.
    fn settle(&self, promise: js_sys::Promise, step: AsyncStep, generation: u64) {
        let widget = self.widget.clone();
        let fulfilled = Closure::once(move |_value: JsValue| {
            if let Some(widget) = widget.upgrade() {
                let mut widget = widget.borrow_mut();
                match step {
                    AsyncStep::Buffer => widget.on_buffer_ready(generation, Ok(())),
                    AsyncStep::Tune => widget.on_tune_bound(generation, Ok(())),
                }
            }
        });
        let widget = self.widget.clone();
        let rejected = Closure::once(move |value: JsValue| {
            let err = WidgetError::Audio(helpers::js_error_string(&value));
            if let Some(widget) = widget.upgrade() {
                let mut widget = widget.borrow_mut();
                match step {
                    AsyncStep::Buffer => widget.on_buffer_ready(generation, Err(err)),
                    AsyncStep::Tune => widget.on_tune_bound(generation, Err(err)),
                }
            }
        });
        let _ = promise.then2(&fulfilled, &rejected);
        fulfilled.forget();
        rejected.forget();
    }
}

impl Platform for DomPlatform {
    /// First visual object returned by `renderAbc`.
    type Score = JsValue;

    fn clear_score(&mut self) {
        self.visual.set_inner_html("");
    }

    fn render_score(
        &mut self,
        notation: &str,
        options: &RenderOptions,
    ) -> Result<Self::Score, WidgetError> {
        let options = serde_wasm_bindgen::to_value(options)
            .map_err(|e| WidgetError::Render(format!("failed to build render options: {}", e)))?;
        let visuals = bindings::render_abc(&self.visual, notation, &options)
            .map_err(|e| WidgetError::Render(helpers::js_error_string(&e)))?;
        let score = visuals.get(0);
        if score.is_undefined() {
            return Err(WidgetError::Render(
                "renderer returned no visual object".to_string(),
            ));
        }
        Ok(score)
    }

    fn show_render_error(&mut self, reason: &str) {
        let markup = format!(
            "<div style=\"color: red; padding: 10px; text-align: center;\">\
             <strong>Error rendering ABC notation:</strong><br/>{}</div>",
            helpers::escape_html(reason)
        );
        self.visual.set_inner_html(&markup);
    }

    fn apply_container_style(&mut self, request: &RenderRequest) {
        let theme = request.theme.as_ref();
        let primary = theme
            .and_then(|t| t.primary_color.as_deref())
            .unwrap_or("#ddd");
        let background = theme
            .and_then(|t| t.background_color.as_deref())
            .unwrap_or("#ffffff");

        self.set_container_style("border", &format!("1px solid {}", primary));
        self.set_container_style("border-radius", "0.5rem");
        self.set_container_style("padding", "0.5rem");
        self.set_container_style("background-color", background);
        self.set_container_style("height", &format!("{}px", request.height));
        self.set_container_style("overflow", "auto");
        if let Some(width) = request.width {
            self.set_container_style("width", &format!("{}px", width));
        }
    }

    fn content_height(&self) -> u32 {
        let total = self.visual.scroll_height() + self.audio.scroll_height();
        total.max(0) as u32
    }

    fn audio_supported(&self) -> bool {
        bindings::supports_audio()
    }

    fn create_controller(&mut self) -> Result<(), WidgetError> {
        let transport_options = serde_wasm_bindgen::to_value(&TransportOptions::default())
            .map_err(|e| WidgetError::Audio(format!("failed to build transport options: {}", e)))?;
        let controller = bindings::SynthController::new();
        controller.load(
            &self.audio,
            &cursor::build_cursor_control(&self.document),
            &transport_options,
        );
        self.controller = Some(controller);
        Ok(())
    }

    fn controller_exists(&self) -> bool {
        self.controller.is_some()
    }

    fn show_audio_unsupported(&mut self) {
        self.audio.set_inner_html(
            "<div style=\"color: #888; padding: 10px; text-align: center;\">\
             Audio playback is not supported in this browser.</div>",
        );
    }

    fn set_transport_enabled(&mut self, enabled: bool) {
        if let Some(controller) = &self.controller {
            controller.disable(!enabled);
        }
    }

    fn start_buffer_init(&mut self, score: &Self::Score, generation: u64) {
        let options = js_sys::Object::new();
        if js_sys::Reflect::set(&options, &JsValue::from_str("visualObj"), score).is_err() {
            wasm_error!("failed to build synth buffer options");
            return;
        }
        let synth = bindings::CreateSynth::new();
        self.settle(synth.init(&options.into()), AsyncStep::Buffer, generation);
    }

    fn start_tune_bind(&mut self, score: &Self::Score, generation: u64) {
        let Some(controller) = &self.controller else {
            wasm_error!("tune bind requested without a transport controller");
            return;
        };
        self.settle(controller.set_tune(score, false), AsyncStep::Tune, generation);
    }

    fn schedule(&mut self, timer: TimerKind, delay_ms: u32, generation: u64) {
        let widget = self.widget.clone();
        let callback = Closure::once(move || {
            if let Some(widget) = widget.upgrade() {
                widget.borrow_mut().on_timer(timer, generation);
            }
        });
        let Some(window) = web_sys::window() else {
            wasm_error!("no window object to schedule {:?} timer", timer);
            return;
        };
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay_ms as i32,
            )
            .is_err()
        {
            wasm_error!("failed to schedule {:?} timer", timer);
        }
        callback.forget();
    }

    fn notify_ready(&mut self) {
        bindings::set_component_ready();
    }

    fn report_frame_height(&mut self, px: u32) {
        bindings::set_frame_height(px);
    }
}

fn create_region(document: &Document, class_name: &str) -> Result<HtmlElement, JsValue> {
    let element = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str("created region is not an HTML element"))?;
    element.set_class_name(class_name);
    Ok(element)
}
