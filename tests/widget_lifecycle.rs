//! Full widget lifecycle against a mock platform
//!
//! Drives the render gate, audio-region setup, and the connection sequencer
//! through the same entry points the DOM layer uses, with timers and promise
//! completions fired by hand.

use abc_score_wasm::render::RenderOptions;
use abc_score_wasm::{
    ConnectionState, Platform, RenderRequest, ScoreWidget, TimerKind, WidgetError,
};

#[derive(Default)]
struct MockPlatform {
    // knobs
    audio_supported: bool,
    controller_construction_fails: bool,
    fail_renders_with: Option<String>,
    measured_height: u32,

    // observed effects
    controller: bool,
    create_calls: usize,
    render_attempts: usize,
    renders: Vec<(String, RenderOptions)>,
    clears: usize,
    render_error: Option<String>,
    placeholder_renders: usize,
    transport_enabled: Option<bool>,
    buffer_inits: Vec<u64>,
    tune_binds: Vec<u64>,
    timers: Vec<(TimerKind, u32, u64)>,
    ready_signals: usize,
    reported_heights: Vec<u32>,
    next_score: u32,
}

impl Platform for MockPlatform {
    type Score = u32;

    fn clear_score(&mut self) {
        self.clears += 1;
    }

    fn render_score(
        &mut self,
        notation: &str,
        options: &RenderOptions,
    ) -> Result<u32, WidgetError> {
        self.render_attempts += 1;
        if let Some(reason) = &self.fail_renders_with {
            return Err(WidgetError::Render(reason.clone()));
        }
        self.renders.push((notation.to_string(), options.clone()));
        self.next_score += 1;
        Ok(self.next_score)
    }

    fn show_render_error(&mut self, reason: &str) {
        self.render_error = Some(reason.to_string());
    }

    fn apply_container_style(&mut self, _request: &RenderRequest) {}

    fn content_height(&self) -> u32 {
        self.measured_height
    }

    fn audio_supported(&self) -> bool {
        self.audio_supported
    }

    fn create_controller(&mut self) -> Result<(), WidgetError> {
        self.create_calls += 1;
        if self.controller_construction_fails {
            return Err(WidgetError::Audio("AudioContext refused".to_string()));
        }
        self.controller = true;
        Ok(())
    }

    fn controller_exists(&self) -> bool {
        self.controller
    }

    fn show_audio_unsupported(&mut self) {
        self.placeholder_renders += 1;
    }

    fn set_transport_enabled(&mut self, enabled: bool) {
        self.transport_enabled = Some(enabled);
    }

    fn start_buffer_init(&mut self, _score: &u32, generation: u64) {
        self.buffer_inits.push(generation);
    }

    fn start_tune_bind(&mut self, _score: &u32, generation: u64) {
        self.tune_binds.push(generation);
    }

    fn schedule(&mut self, timer: TimerKind, delay_ms: u32, generation: u64) {
        self.timers.push((timer, delay_ms, generation));
    }

    fn notify_ready(&mut self) {
        self.ready_signals += 1;
    }

    fn report_frame_height(&mut self, px: u32) {
        self.reported_heights.push(px);
    }
}

fn widget() -> ScoreWidget<MockPlatform> {
    ScoreWidget::new(MockPlatform::default())
}

fn widget_with_audio() -> ScoreWidget<MockPlatform> {
    let mut w = widget();
    w.platform_mut().audio_supported = true;
    w
}

fn request(notation: &str) -> RenderRequest {
    RenderRequest {
        notation: notation.to_string(),
        ..Default::default()
    }
}

fn silent_request(notation: &str) -> RenderRequest {
    RenderRequest {
        enable_audio: false,
        ..request(notation)
    }
}

/// Fire all pending one-shot timers in order, returning how many fired.
fn fire_timers(w: &mut ScoreWidget<MockPlatform>) -> usize {
    let timers: Vec<_> = w.platform_mut().timers.drain(..).collect();
    for (kind, _delay, generation) in &timers {
        w.on_timer(*kind, *generation);
    }
    timers.len()
}

/// Drive the buffer-init and tune-bind completions successfully.
fn complete_audio_chain(w: &mut ScoreWidget<MockPlatform>) {
    for generation in w.platform_mut().buffer_inits.drain(..).collect::<Vec<_>>() {
        w.on_buffer_ready(generation, Ok(()));
    }
    for generation in w.platform_mut().tune_binds.drain(..).collect::<Vec<_>>() {
        w.on_tune_bound(generation, Ok(()));
    }
}

#[test]
fn identical_notation_renders_once_despite_other_changes() {
    let mut w = widget();
    w.update(&silent_request("X:1\nK:C\nC"));
    // Same text, different knobs (the host re-fires on theme changes etc).
    let mut changed = silent_request("X:1\nK:C\nC");
    changed.scale = 2.0;
    changed.responsive = false;
    w.update(&changed);

    assert_eq!(w.platform().renders.len(), 1);
}

#[test]
fn changed_notation_renders_again() {
    let mut w = widget();
    w.update(&silent_request("X:1\nK:C\nC"));
    w.update(&silent_request("X:1\nK:C\nD"));
    w.update(&silent_request("X:1\nK:C\nD"));

    let notations: Vec<&str> = w
        .platform()
        .renders
        .iter()
        .map(|(n, _)| n.as_str())
        .collect();
    assert_eq!(notations, vec!["X:1\nK:C\nC", "X:1\nK:C\nD"]);
    // The region is cleared before each render.
    assert_eq!(w.platform().clears, 2);
}

#[test]
fn audio_disabled_stays_unbound_without_controller() {
    let mut w = widget_with_audio();
    w.update(&silent_request("X:1\nK:C\nC"));

    assert_eq!(w.platform().renders.len(), 1);
    assert_eq!(w.platform().create_calls, 0);
    assert_eq!(w.platform().placeholder_renders, 0);
    assert!(w.platform().buffer_inits.is_empty());
    assert_eq!(w.connection_state(), ConnectionState::Unbound);
    // Per-note classes are only requested when audio is on.
    assert!(!w.platform().renders[0].1.add_classes);
}

#[test]
fn unsupported_environment_gets_placeholder_and_no_controller() {
    let mut w = widget();
    w.platform_mut().audio_supported = false;
    w.update(&request("X:1\nK:C\nC"));

    assert_eq!(w.platform().placeholder_renders, 1);
    assert_eq!(w.platform().create_calls, 0);
    // The placeholder is rendered once, not on every update.
    w.update(&request("X:1\nK:C\nD"));
    assert_eq!(w.platform().placeholder_renders, 1);
    assert_eq!(w.platform().create_calls, 0);
}

#[test]
fn prompt_controller_reaches_bound_without_retry() {
    let mut w = widget_with_audio();
    w.update(&request("X:1\nK:C\nC"));

    // Controller was constructed during the same update.
    assert_eq!(w.platform().create_calls, 1);
    // Transport is locked while the tune loads.
    assert_eq!(w.platform().transport_enabled, Some(false));
    assert_eq!(w.connection_state(), ConnectionState::Binding);
    // No retry was needed.
    assert!(w
        .platform()
        .timers
        .iter()
        .all(|(kind, _, _)| *kind != TimerKind::ConnectRetry));

    complete_audio_chain(&mut w);
    assert_eq!(w.connection_state(), ConnectionState::Bound);
    assert_eq!(w.platform().transport_enabled, Some(true));
}

#[test]
fn late_controller_binds_after_one_retry() {
    let mut w = widget_with_audio();
    w.platform_mut().controller_construction_fails = true;
    w.update(&request("X:1\nK:C\nC"));

    assert_eq!(w.connection_state(), ConnectionState::Binding);
    // The controller finishes constructing within the retry window.
    w.platform_mut().controller = true;
    fire_timers(&mut w);
    complete_audio_chain(&mut w);

    assert_eq!(w.connection_state(), ConnectionState::Bound);
    assert_eq!(w.platform().transport_enabled, Some(true));
}

#[test]
fn absent_controller_fails_after_single_retry() {
    let mut w = widget_with_audio();
    w.platform_mut().controller_construction_fails = true;
    w.update(&request("X:1\nK:C\nC"));

    assert_eq!(w.connection_state(), ConnectionState::Binding);
    fire_timers(&mut w);
    assert_eq!(w.connection_state(), ConnectionState::Failed);
    // The bounded retry policy schedules nothing further.
    assert!(w
        .platform()
        .timers
        .iter()
        .all(|(kind, _, _)| *kind != TimerKind::ConnectRetry));
    assert!(w.platform().buffer_inits.is_empty());
}

#[test]
fn empty_notation_never_renders_or_reports_height() {
    let mut w = widget_with_audio();
    w.update(&request(""));

    assert_eq!(w.platform().render_attempts, 0);
    assert_eq!(fire_timers(&mut w), 0);
    assert!(w.platform().reported_heights.is_empty());
}

#[test]
fn malformed_notation_shows_error_and_is_not_reattempted() {
    let mut w = widget();
    w.platform_mut().fail_renders_with = Some("unexpected token at line 2".to_string());
    w.update(&silent_request("X:1\nK:Q\n???"));

    let error = w.platform().render_error.clone().unwrap();
    assert!(error.contains("unexpected token at line 2"));
    assert_eq!(w.platform().render_attempts, 1);

    // Same broken text again: no new attempt until the text changes.
    w.update(&silent_request("X:1\nK:Q\n???"));
    assert_eq!(w.platform().render_attempts, 1);

    // A corrected string renders.
    w.platform_mut().fail_renders_with = None;
    w.update(&silent_request("X:1\nK:C\nC"));
    assert_eq!(w.platform().renders.len(), 1);
}

#[test]
fn failed_render_does_not_schedule_measurement() {
    let mut w = widget();
    w.platform_mut().fail_renders_with = Some("boom".to_string());
    w.update(&silent_request("X:1"));

    assert_eq!(fire_timers(&mut w), 0);
    assert!(w.platform().reported_heights.is_empty());
}

#[test]
fn height_reported_after_measurement_with_margin() {
    let mut w = widget();
    w.platform_mut().measured_height = 800;
    w.update(&silent_request("X:1\nK:C\nC"));
    fire_timers(&mut w);

    assert_eq!(w.platform().reported_heights, vec![820]);
}

#[test]
fn short_content_is_floored_at_configured_height() {
    let mut w = widget();
    w.platform_mut().measured_height = 100;
    let mut req = silent_request("X:1\nK:C\nC");
    req.height = 500;
    w.update(&req);
    fire_timers(&mut w);

    assert_eq!(w.platform().reported_heights, vec![500]);
}

#[test]
fn stale_async_completions_are_discarded() {
    let mut w = widget_with_audio();
    w.update(&request("X:1\nK:C\nC"));
    let old_generation = w.platform().buffer_inits[0];

    // A second render supersedes the first before its chain settles.
    w.update(&request("X:1\nK:C\nD"));
    let new_generation = *w.platform().buffer_inits.last().unwrap();
    assert_ne!(old_generation, new_generation);

    // The first cycle's completions arrive late and change nothing.
    w.on_buffer_ready(old_generation, Ok(()));
    assert!(w.platform().tune_binds.is_empty());
    w.on_tune_bound(old_generation, Ok(()));
    assert_ne!(w.connection_state(), ConnectionState::Bound);

    // The current cycle still completes normally.
    w.on_buffer_ready(new_generation, Ok(()));
    assert_eq!(w.platform().tune_binds, vec![new_generation]);
    w.on_tune_bound(new_generation, Ok(()));
    assert_eq!(w.connection_state(), ConnectionState::Bound);
}

#[test]
fn buffer_failure_leaves_transport_disabled() {
    let mut w = widget_with_audio();
    w.update(&request("X:1\nK:C\nC"));
    let generation = w.platform().buffer_inits[0];

    w.on_buffer_ready(
        generation,
        Err(WidgetError::Audio("sound font fetch failed".to_string())),
    );
    assert_eq!(w.connection_state(), ConnectionState::Failed);
    assert_eq!(w.platform().transport_enabled, Some(false));
    assert!(w.platform().tune_binds.is_empty());
}

#[test]
fn tune_bind_failure_leaves_transport_disabled() {
    let mut w = widget_with_audio();
    w.update(&request("X:1\nK:C\nC"));
    let generation = w.platform().buffer_inits[0];

    w.on_buffer_ready(generation, Ok(()));
    w.on_tune_bound(
        generation,
        Err(WidgetError::Audio("tune rejected".to_string())),
    );
    assert_eq!(w.connection_state(), ConnectionState::Failed);
    assert_eq!(w.platform().transport_enabled, Some(false));
}

#[test]
fn disabling_audio_later_keeps_the_controller() {
    let mut w = widget_with_audio();
    w.update(&request("X:1\nK:C\nC"));
    complete_audio_chain(&mut w);
    assert!(w.platform().controller);

    // Audio switched off: controller is not torn down, no placeholder.
    w.update(&silent_request("X:1\nK:C\nD"));
    assert!(w.platform().controller);
    assert_eq!(w.platform().placeholder_renders, 0);
    // The new score was rendered without note classes and never bound.
    assert!(!w.platform().renders[1].1.add_classes);
    assert_eq!(w.connection_state(), ConnectionState::Unbound);
}

#[test]
fn enabling_audio_later_creates_the_controller() {
    let mut w = widget_with_audio();
    w.update(&silent_request("X:1\nK:C\nC"));
    assert_eq!(w.platform().create_calls, 0);

    // Same notation, audio now on: no re-render, but the region is set up.
    w.update(&request("X:1\nK:C\nC"));
    assert_eq!(w.platform().create_calls, 1);
    assert_eq!(w.platform().renders.len(), 1);
}

#[test]
fn ready_signal_is_sent_once() {
    let mut w = widget();
    w.mounted();
    w.mounted();
    assert_eq!(w.platform().ready_signals, 1);
}

#[test]
fn request_parses_from_host_json() {
    let req: RenderRequest = serde_json::from_str(
        r#"{"notation": "X:1\nK:C\nC", "height": 300, "enable_audio": false}"#,
    )
    .unwrap();
    let mut w = widget();
    w.platform_mut().measured_height = 50;
    w.update(&req);
    fire_timers(&mut w);

    assert_eq!(w.platform().renders.len(), 1);
    assert_eq!(w.platform().reported_heights, vec![300]);
}
