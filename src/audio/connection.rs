//! Synth/score connection sequencer
//!
//! A rendered score and the audio transport initialize independently: the
//! visual render is synchronous, the transport's capability probe and
//! construction are not. This state machine bridges that race with a single
//! bounded retry, then drives the two-step asynchronous handoff (buffer
//! init, tune binding) and refuses to enable the transport until both steps
//! have succeeded for the score currently on screen.
//!
//! Completions are tagged with a generation that bumps on every new score.
//! A completion from a superseded render cycle is discarded instead of
//! overwriting the newer score's transport state.

use std::fmt;

/// Binding status of the current score against the audio transport.
///
/// `Bound` is only meaningful for the (score, controller) pair that produced
/// it; a new score resets to `Unbound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No binding attempted for the current score.
    #[default]
    Unbound,
    /// Waiting on the retry timer or on one of the async steps.
    Binding,
    /// The transport is playing-ready for the current score.
    Bound,
    /// Gave up for this score; the next render starts over.
    Failed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Unbound => "unbound",
            ConnectionState::Binding => "binding",
            ConnectionState::Bound => "bound",
            ConnectionState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What the caller must do after feeding an event to the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectAction {
    /// Prerequisites present: disable the transport and start buffer init.
    BeginLoad,
    /// A prerequisite is missing: ask again after one retry delay.
    ScheduleRetry,
    /// Retry budget exhausted with a prerequisite still missing.
    Abandon,
    /// Buffer ready: bind the score to the transport as its active tune.
    BindTune,
    /// Both async steps done: re-enable the transport.
    EnableTransport,
    /// Stale completion, terminal state, or failure already recorded.
    Ignore,
}

/// Drives one score at a time from `Unbound` to `Bound` or `Failed`.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSequencer {
    state: ConnectionState,
    retry_spent: bool,
    generation: u64,
}

impl ConnectionSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Generation of the current render cycle. Timer and promise callbacks
    /// carry this value back so stale ones can be told apart.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A new score replaces the old one; previous bindings are void.
    /// Returns the new cycle's generation.
    pub fn begin_cycle(&mut self) -> u64 {
        self.generation += 1;
        self.state = ConnectionState::Unbound;
        self.retry_spent = false;
        self.generation
    }

    /// Ask to connect the current score. `ready` means both the transport
    /// controller and the score object exist right now.
    pub fn attempt(&mut self, ready: bool) -> ConnectAction {
        match self.state {
            ConnectionState::Unbound | ConnectionState::Binding => {}
            // Bound: nothing to do. Failed: the retry budget is spent.
            ConnectionState::Bound | ConnectionState::Failed => return ConnectAction::Ignore,
        }
        if ready {
            self.state = ConnectionState::Binding;
            ConnectAction::BeginLoad
        } else if !self.retry_spent {
            self.retry_spent = true;
            self.state = ConnectionState::Binding;
            ConnectAction::ScheduleRetry
        } else {
            self.state = ConnectionState::Failed;
            ConnectAction::Abandon
        }
    }

    /// Completion of the synth buffer init for `generation`.
    pub fn buffer_ready(&mut self, generation: u64, ok: bool) -> ConnectAction {
        if generation != self.generation || self.state != ConnectionState::Binding {
            return ConnectAction::Ignore;
        }
        if ok {
            ConnectAction::BindTune
        } else {
            self.state = ConnectionState::Failed;
            ConnectAction::Ignore
        }
    }

    /// Completion of the tune binding for `generation`.
    pub fn tune_bound(&mut self, generation: u64, ok: bool) -> ConnectAction {
        if generation != self.generation || self.state != ConnectionState::Binding {
            return ConnectAction::Ignore;
        }
        if ok {
            self.state = ConnectionState::Bound;
            ConnectAction::EnableTransport
        } else {
            self.state = ConnectionState::Failed;
            ConnectAction::Ignore
        }
    }
}
