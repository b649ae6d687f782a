//! Widget core
//!
//! Everything the widget decides (when to re-render, how to set up the
//! audio region, how to march a fresh score into the transport) lives
//! here, behind the [`Platform`] trait. The DOM, abcjs, Streamlit, and
//! `setTimeout` are all on the far side of that trait, which is what lets
//! the full lifecycle run under native `cargo test` with a mock platform.

use crate::audio::{ConnectAction, ConnectionSequencer, ConnectionState};
use crate::error::WidgetError;
use crate::models::config::{RenderRequest, DEFAULT_HEIGHT_PX};
use crate::render::{frame_height, ChangeGate, RenderOptions};

/// Delay before re-checking for the transport controller, bridging the gap
/// between the synchronous render and the controller's async construction.
pub const RETRY_DELAY_MS: u32 = 200;

/// Delay before measuring the rendered region, letting layout settle.
pub const MEASURE_DELAY_MS: u32 = 100;

/// One-shot timers the widget asks the platform to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Re-attempt the transport connection.
    ConnectRetry,
    /// Measure the rendered content and report the frame height.
    MeasureHeight,
}

/// Host-environment seam: DOM regions, abcjs, the Streamlit bridge, and
/// timer scheduling.
///
/// The two `start_*` operations and `schedule` are asynchronous: the
/// platform must later feed the outcome back into the widget
/// ([`ScoreWidget::on_buffer_ready`], [`ScoreWidget::on_tune_bound`],
/// [`ScoreWidget::on_timer`]) tagged with the same generation, from a fresh
/// callback rather than from inside the originating call.
pub trait Platform {
    /// Opaque score handle produced by the visual render.
    type Score;

    // --- visual region ---

    /// Drop any previously rendered content.
    fn clear_score(&mut self);

    /// Render `notation` into the visual region and return the score object.
    fn render_score(
        &mut self,
        notation: &str,
        options: &RenderOptions,
    ) -> std::result::Result<Self::Score, WidgetError>;

    /// Replace the visual region with an inline error message.
    fn show_render_error(&mut self, reason: &str);

    /// Restyle the outer container from the request (theme, width, height).
    fn apply_container_style(&mut self, request: &RenderRequest);

    /// Current scroll height of the visual plus audio regions, in pixels.
    fn content_height(&self) -> u32;

    // --- audio region ---

    /// Whether the environment can synthesize audio at all.
    fn audio_supported(&self) -> bool;

    /// Construct the transport controller and mount it in the audio region.
    fn create_controller(&mut self) -> std::result::Result<(), WidgetError>;

    /// Whether a transport controller currently exists.
    fn controller_exists(&self) -> bool;

    /// Render the static "audio not supported" placeholder.
    fn show_audio_unsupported(&mut self);

    /// Enable or disable the transport's play controls.
    fn set_transport_enabled(&mut self, enabled: bool);

    // --- asynchronous seams ---

    /// Start building the synthesis buffer for `score`.
    fn start_buffer_init(&mut self, score: &Self::Score, generation: u64);

    /// Start binding `score` to the transport as its active tune.
    fn start_tune_bind(&mut self, score: &Self::Score, generation: u64);

    /// Arrange for `on_timer(timer, generation)` after `delay_ms`.
    fn schedule(&mut self, timer: TimerKind, delay_ms: u32, generation: u64);

    // --- host bridge ---

    /// One-time "component ready" signal to the host.
    fn notify_ready(&mut self);

    /// Tell the host how tall the iframe should be.
    fn report_frame_height(&mut self, px: u32);
}

/// One widget instance: all mutable state, mutated only from its own entry
/// points. No globals.
pub struct ScoreWidget<P: Platform> {
    platform: P,
    gate: ChangeGate,
    sequencer: ConnectionSequencer,
    score: Option<P::Score>,
    /// The audio region is set up (controller or placeholder) at most once.
    audio_setup_done: bool,
    ready_sent: bool,
    /// Knobs from the latest request, read by later timer callbacks.
    min_height: u32,
}

impl<P: Platform> ScoreWidget<P> {
    pub fn new(platform: P) -> Self {
        Self {
            platform,
            gate: ChangeGate::new(),
            sequencer: ConnectionSequencer::new(),
            score: None,
            audio_setup_done: false,
            ready_sent: false,
            min_height: DEFAULT_HEIGHT_PX,
        }
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.sequencer.state()
    }

    /// Signal the host once that the component can receive render events.
    pub fn mounted(&mut self) {
        if !self.ready_sent {
            self.ready_sent = true;
            self.platform.notify_ready();
        }
    }

    /// Handle one host render event.
    pub fn update(&mut self, request: &RenderRequest) {
        self.min_height = request.height;
        self.platform.apply_container_style(request);
        self.setup_audio_region(request.enable_audio);

        if !self.gate.needs_render(&request.notation) {
            return;
        }

        let options = RenderOptions::from_request(request);
        self.platform.clear_score();
        match self.platform.render_score(&request.notation, &options) {
            Ok(score) => {
                self.gate.record_success(&request.notation);
                self.score = Some(score);
                let generation = self.sequencer.begin_cycle();
                self.platform
                    .schedule(TimerKind::MeasureHeight, MEASURE_DELAY_MS, generation);
                if request.enable_audio {
                    self.try_connect();
                }
            }
            Err(err) => {
                log::error!("{err}");
                self.gate.record_failure(&request.notation);
                let reason = match &err {
                    WidgetError::Render(reason) => reason.clone(),
                    other => other.to_string(),
                };
                self.platform.show_render_error(&reason);
            }
        }
    }

    /// A one-shot timer fired. Timers from superseded render cycles are
    /// dropped here.
    pub fn on_timer(&mut self, timer: TimerKind, generation: u64) {
        if generation != self.sequencer.generation() {
            log::debug!("dropping {timer:?} timer from superseded render cycle");
            return;
        }
        match timer {
            TimerKind::MeasureHeight => {
                let measured = self.platform.content_height();
                self.platform
                    .report_frame_height(frame_height(measured, self.min_height));
            }
            TimerKind::ConnectRetry => self.try_connect(),
        }
    }

    /// The synthesis buffer finished initializing (or failed to).
    pub fn on_buffer_ready(
        &mut self,
        generation: u64,
        result: std::result::Result<(), WidgetError>,
    ) {
        if let Err(err) = &result {
            log::error!("synth buffer init failed: {err}");
        }
        if self.sequencer.buffer_ready(generation, result.is_ok()) == ConnectAction::BindTune {
            if let Some(score) = &self.score {
                self.platform.start_tune_bind(score, generation);
            }
        }
    }

    /// The tune binding finished (or failed). Only success re-enables the
    /// transport; a failed or stale binding leaves it disabled.
    pub fn on_tune_bound(
        &mut self,
        generation: u64,
        result: std::result::Result<(), WidgetError>,
    ) {
        if let Err(err) = &result {
            log::error!("tune binding failed: {err}");
        }
        if self.sequencer.tune_bound(generation, result.is_ok()) == ConnectAction::EnableTransport {
            self.platform.set_transport_enabled(true);
            log::info!("transport bound to current score");
        }
    }

    /// Create the transport controller or the unsupported placeholder, at
    /// most once per widget lifetime. A controller that exists is never torn
    /// down, even if a later request disables audio.
    fn setup_audio_region(&mut self, enable_audio: bool) {
        if !enable_audio || self.audio_setup_done {
            return;
        }
        self.audio_setup_done = true;
        if self.platform.audio_supported() {
            if let Err(err) = self.platform.create_controller() {
                // Non-fatal: the score still renders, just without playback.
                log::error!("transport controller construction failed: {err}");
            }
        } else {
            log::warn!("audio synthesis not supported in this environment");
            self.platform.show_audio_unsupported();
        }
    }

    fn try_connect(&mut self) {
        let ready = self.platform.controller_exists() && self.score.is_some();
        match self.sequencer.attempt(ready) {
            ConnectAction::BeginLoad => {
                // Keep a stale tune from being playable while the new one loads.
                self.platform.set_transport_enabled(false);
                let generation = self.sequencer.generation();
                if let Some(score) = &self.score {
                    self.platform.start_buffer_init(score, generation);
                }
            }
            ConnectAction::ScheduleRetry => {
                let generation = self.sequencer.generation();
                self.platform
                    .schedule(TimerKind::ConnectRetry, RETRY_DELAY_MS, generation);
            }
            ConnectAction::Abandon => {
                log::warn!("transport controller still missing after retry; score stays unbound");
            }
            ConnectAction::BindTune | ConnectAction::EnableTransport | ConnectAction::Ignore => {}
        }
    }
}
