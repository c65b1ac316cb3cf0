//! Client-side synchronization state machine.
//!
//! The session keeps chat transcript, personality theme, and affection
//! display consistent with server-reported state across asynchronous
//! request/response cycles. All logic lives in the pure transition function
//! [`SessionState::apply`]: `(event, current state) → (new state, effects)`.
//! Side effects are data; the terminal renderer is one interpreter of them
//! and the test suite is another.
//!
//! [`SessionController`] is the async driver: it owns the state, mediates
//! all outgoing gateway requests, and feeds responses back in as events.

use tracing::{error, warn};

use crate::evolution::{EvolutionSequence, TokioClock};
use crate::gateway::{
    ChatReply, EventSnapshot, GatewayClient, PersonalityScores, QuickStartReply, StatusSnapshot,
};
use crate::theme::Theme;

/// Fixed welcome bubble shown on startup and after a reset.
pub const WELCOME_MESSAGE: &str =
    "Hello! I'm your AI partner. My personality evolves as we chat more.";

/// Generic failure bubble; no error detail leaks into the transcript.
pub const APOLOGY_MESSAGE: &str = "Sorry, an error occurred. Please try again.";

/// Literal substring that toggles the "will be memorized" hint.
pub const MEMORY_TAG: &str = "#memory";

/// Literal command that triggers the server-side evolution test path.
pub const EVOLVE_COMMAND: &str = "#evolve_now";

/// Display range for affection; the bar clamps at this value.
pub const AFFECTION_DISPLAY_MAX: i64 = 30;

/// Bar width percentage for an affection value, clamped to `[0, 100]`.
pub fn affection_percent(affection: i64) -> u8 {
    let ratio = affection.max(0) as f64 / AFFECTION_DISPLAY_MAX as f64;
    (ratio * 100.0).min(100.0) as u8
}

/// Who produced a chat bubble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Ai,
}

/// One rendered chat bubble. Ephemeral: lives only in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self { role: Role::Ai, text: text.into() }
    }
}

/// External stimuli: user actions, gateway responses, poll results.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// `/api/status` succeeded.
    StatusLoaded(StatusSnapshot),
    /// `/api/status` failed; prior UI state must stay untouched.
    StatusUnavailable,
    /// User submitted a message (may still be blank).
    MessageSubmitted(String),
    /// `/api/chat` succeeded.
    ReplyArrived(ChatReply),
    /// `/api/chat` failed (transport or non-OK status).
    RequestFailed,
    /// User confirmed the reset and `/api/reset` succeeded.
    ResetConfirmed(StatusSnapshot),
    /// User declined the reset confirmation.
    ResetDeclined,
    /// Input text changed (drives the `#memory` hint).
    InputChanged(String),
    /// Status panel open/closed toggle.
    PanelToggled,
    /// `/api/demo/quick-start` succeeded.
    DemoStarted(QuickStartReply),
    /// Event poll delivered a fresh snapshot.
    EventsPolled(EventSnapshot),
}

/// Side effects produced by a transition, to be interpreted by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    AppendBubble { role: Role, text: String },
    ClearInput,
    SetInputEnabled(bool),
    FocusInput,
    ShowTyping,
    HideTyping,
    /// Remove the previous theme marker and apply this one, atomically.
    SetThemeMarker(Theme),
    /// Full data + color replacement for the radar chart.
    RedrawChart { scores: PersonalityScores, theme: Theme },
    /// `percent` is pre-clamped to `[0, 100]`; `label` is the raw `n/30` text.
    SetAffectionBar { percent: u8, label: String },
    ReplaceMemoryList(Vec<String>),
    /// Clear the transcript down to the fixed welcome bubble.
    ReplaceTranscriptWithWelcome,
    /// Start the evolution animation sequence (intercepted by the driver).
    RunEvolution { personality: Theme, factors: Vec<String> },
    MemoryHint(bool),
    ShowDemoIndicator,
    SetPanelOpen(bool),
    /// Remove any prior event indicator, then render this snapshot's events
    /// (nothing when `active_events` is empty).
    RenderEventIndicator(EventSnapshot),
    /// One-time welcome text override from the first successful event poll.
    OverrideWelcome(String),

    // Evolution animation stages (emitted by the sequencer, not by apply).
    ShowOverlay,
    FlashOverlay,
    SpawnParticles { theme: Theme, count: usize },
    ShowFactors(Vec<String>),
    ShowModal(Theme),
    HideModal,
    ClearParticles,
    HideOverlay,
}

/// Interpreter of [`Effect`]s. The terminal renderer implements this; tests
/// use a recording sink.
pub trait EffectSink {
    fn handle(&mut self, effect: &Effect);
}

/// Current UI state. Transitions produce a new snapshot; nothing mutates a
/// live state in place.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub theme: Theme,
    /// Last status snapshot, replaced wholesale on each response. `None`
    /// until the first successful load.
    pub status: Option<StatusSnapshot>,
    pub transcript: Vec<ChatTurn>,
    pub input_enabled: bool,
    pub typing: bool,
    pub panel_open: bool,
    pub memory_hint: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            theme: Theme::Natural,
            status: None,
            transcript: vec![ChatTurn::ai(WELCOME_MESSAGE)],
            input_enabled: true,
            typing: false,
            panel_open: false,
            memory_hint: false,
        }
    }
}

impl SessionState {
    /// Pure transition function: returns the successor state and the side
    /// effects a renderer should perform, in order.
    pub fn apply(&self, event: UiEvent) -> (SessionState, Vec<Effect>) {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match event {
            UiEvent::StatusLoaded(status) => {
                next.reconcile(status, &mut effects);
            }
            UiEvent::StatusUnavailable => {
                // No status means no change; never show a blank view.
            }
            UiEvent::MessageSubmitted(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return (next, effects);
                }
                next.transcript.push(ChatTurn::user(trimmed));
                next.input_enabled = false;
                next.typing = true;
                if next.memory_hint {
                    next.memory_hint = false;
                    effects.push(Effect::MemoryHint(false));
                }
                effects.push(Effect::AppendBubble { role: Role::User, text: trimmed.to_string() });
                effects.push(Effect::ClearInput);
                effects.push(Effect::SetInputEnabled(false));
                effects.push(Effect::ShowTyping);
            }
            UiEvent::ReplyArrived(reply) => {
                next.typing = false;
                effects.push(Effect::HideTyping);
                next.transcript.push(ChatTurn::ai(reply.ai_response.clone()));
                effects.push(Effect::AppendBubble { role: Role::Ai, text: reply.ai_response });
                next.reconcile(reply.current_status, &mut effects);
                if reply.evolution_triggered {
                    if let Some(name) = reply.new_personality {
                        effects.push(Effect::RunEvolution {
                            personality: Theme::parse_loose(&name),
                            factors: Vec::new(),
                        });
                    }
                }
                next.restore_input(&mut effects);
            }
            UiEvent::RequestFailed => {
                next.typing = false;
                effects.push(Effect::HideTyping);
                next.transcript.push(ChatTurn::ai(APOLOGY_MESSAGE));
                effects.push(Effect::AppendBubble {
                    role: Role::Ai,
                    text: APOLOGY_MESSAGE.to_string(),
                });
                next.restore_input(&mut effects);
            }
            UiEvent::ResetConfirmed(status) => {
                next.transcript = vec![ChatTurn::ai(WELCOME_MESSAGE)];
                effects.push(Effect::ReplaceTranscriptWithWelcome);
                next.reconcile(status, &mut effects);
                // The reset contract forces natural regardless of what the
                // fresh snapshot reports.
                next.set_theme(Theme::Natural, &mut effects);
            }
            UiEvent::ResetDeclined => {
                // Decline is a complete no-op: transcript and status keep.
            }
            UiEvent::InputChanged(text) => {
                let hint = text.contains(MEMORY_TAG);
                if hint != next.memory_hint {
                    next.memory_hint = hint;
                    effects.push(Effect::MemoryHint(hint));
                }
            }
            UiEvent::PanelToggled => {
                next.panel_open = !next.panel_open;
                effects.push(Effect::SetPanelOpen(next.panel_open));
            }
            UiEvent::DemoStarted(reply) => {
                next.transcript.push(ChatTurn::ai(reply.message.clone()));
                effects.push(Effect::AppendBubble { role: Role::Ai, text: reply.message });
                next.reconcile(reply.current_status, &mut effects);
                effects.push(Effect::ShowDemoIndicator);
            }
            UiEvent::EventsPolled(snapshot) => {
                effects.push(Effect::RenderEventIndicator(snapshot));
            }
        }

        (next, effects)
    }

    /// Apply a fresh status snapshot: theme, affection bar, chart, memories.
    /// The snapshot is stored wholesale; no field-level merging.
    fn reconcile(&mut self, status: StatusSnapshot, effects: &mut Vec<Effect>) {
        let theme = Theme::parse_loose(&status.personality);
        self.set_theme(theme, effects);
        effects.push(Effect::SetAffectionBar {
            percent: affection_percent(status.affection),
            label: format!("{}/{}", status.affection, AFFECTION_DISPLAY_MAX),
        });
        effects.push(Effect::RedrawChart { scores: status.scores.clone(), theme });
        effects.push(Effect::ReplaceMemoryList(status.long_term_memories.clone()));
        self.status = Some(status);
    }

    /// Idempotent theme switch: no effect when `theme` is already active,
    /// otherwise one atomic marker swap.
    fn set_theme(&mut self, theme: Theme, effects: &mut Vec<Effect>) {
        if self.theme == theme {
            return;
        }
        self.theme = theme;
        effects.push(Effect::SetThemeMarker(theme));
    }

    /// Re-enable and refocus input. Both success and failure paths of a chat
    /// round trip end here.
    fn restore_input(&mut self, effects: &mut Vec<Effect>) {
        self.input_enabled = true;
        effects.push(Effect::SetInputEnabled(true));
        effects.push(Effect::FocusInput);
    }
}

/// Async driver: owns the state, a gateway client, and an effect sink.
pub struct SessionController<S: EffectSink> {
    state: SessionState,
    gateway: GatewayClient,
    sink: S,
    evolution_running: bool,
}

impl<S: EffectSink> SessionController<S> {
    pub fn new(gateway: GatewayClient, sink: S) -> Self {
        Self {
            state: SessionState::default(),
            gateway,
            sink,
            evolution_running: false,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Apply one event, forward its effects to the sink, and return them for
    /// the caller to inspect (the driver intercepts `RunEvolution`).
    pub fn dispatch(&mut self, event: UiEvent) -> Vec<Effect> {
        let (next, effects) = self.state.apply(event);
        self.state = next;
        for effect in &effects {
            self.sink.handle(effect);
        }
        effects
    }

    /// Fetch `/api/status` and reconcile the full UI from it. On failure the
    /// prior view stays untouched.
    pub async fn load_initial_status(&mut self) {
        match self.gateway.fetch_status().await {
            Ok(status) => {
                self.dispatch(UiEvent::StatusLoaded(status));
            }
            Err(e) => {
                warn!(error = %e, "initial status fetch failed, keeping prior view");
                self.dispatch(UiEvent::StatusUnavailable);
            }
        }
    }

    /// Send one chat message. Blank-after-trim input never triggers a
    /// request. Input is re-enabled and refocused on every exit path.
    pub async fn send_message(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        self.dispatch(UiEvent::MessageSubmitted(text.to_string()));
        match self.gateway.send_chat(trimmed).await {
            Ok(reply) => {
                let effects = self.dispatch(UiEvent::ReplyArrived(reply));
                for effect in effects {
                    if let Effect::RunEvolution { personality, factors } = effect {
                        self.run_evolution(personality, factors).await;
                    }
                }
            }
            Err(e) => {
                error!(error = %e, "chat request failed");
                self.dispatch(UiEvent::RequestFailed);
            }
        }
    }

    /// Reset the conversation. The caller gates this on explicit user
    /// confirmation; a declined confirmation is a complete no-op.
    pub async fn reset_conversation(&mut self, confirmed: bool) {
        if !confirmed {
            self.dispatch(UiEvent::ResetDeclined);
            return;
        }
        match self.gateway.reset().await {
            Ok(status) => {
                self.dispatch(UiEvent::ResetConfirmed(status));
            }
            Err(e) => {
                error!(error = %e, "reset failed");
            }
        }
    }

    /// Seed a demo session via `/api/demo/quick-start`.
    pub async fn start_demo(&mut self) {
        match self.gateway.quick_start().await {
            Ok(reply) => {
                self.dispatch(UiEvent::DemoStarted(reply));
            }
            Err(e) => {
                error!(error = %e, "demo quick-start failed");
            }
        }
    }

    /// Auto-submit the literal evolution test command.
    pub async fn quick_evolution_test(&mut self) {
        self.send_message(EVOLVE_COMMAND).await;
    }

    /// Track live input for the `#memory` hint.
    pub fn input_changed(&mut self, text: &str) {
        self.dispatch(UiEvent::InputChanged(text.to_string()));
    }

    pub fn toggle_status_panel(&mut self) {
        self.dispatch(UiEvent::PanelToggled);
    }

    /// Run the fixed-timing evolution sequence, then close the modal (the
    /// terminal has no click target to hold it open). Overlapping triggers
    /// are rejected while a sequence is in flight.
    async fn run_evolution(&mut self, personality: Theme, factors: Vec<String>) {
        if self.evolution_running {
            warn!(personality = %personality, "evolution already in progress, ignoring trigger");
            return;
        }
        self.evolution_running = true;
        let sequence = EvolutionSequence::new(TokioClock);
        let sink = &mut self.sink;
        sequence.run(personality, factors, &mut |e| sink.handle(e)).await;
        sequence.close_modal(&mut |e| sink.handle(e)).await;
        self.evolution_running = false;
    }
}
