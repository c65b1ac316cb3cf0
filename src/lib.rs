//! # evo-persona
//!
//! Client-side synchronization engine for an evolving-persona chat backend,
//! plus a terminal front end. The backend owns all domain state (personality
//! evolution, affection scoring, memory selection); this crate keeps the
//! local view — transcript, theme, affection bar, radar chart, event
//! indicator — consistent with server-reported state across asynchronous
//! request/response cycles.
//!
//! Architecture:
//!
//! - [`gateway`] — HTTP client for the five fixed JSON endpoints.
//! - [`session`] — the synchronization state machine: pure
//!   `(event, state) → (state, effects)` transitions plus the async driver.
//! - [`evolution`] — fixed-timing animation sequencer with injectable clock.
//! - [`poller`] — hourly event poll with a one-shot welcome override.
//! - [`theme`] / [`chart`] — personality→color mapping and chart view model.
//! - [`assets`] — network-first cache for static assets.
//! - [`render`] — terminal interpreter of session effects.

pub mod assets;
pub mod chart;
pub mod cli;
pub mod evolution;
pub mod gateway;
pub mod poller;
pub mod render;
pub mod session;
pub mod theme;

pub use gateway::{GatewayClient, GatewayError, StatusSnapshot};
pub use session::{Effect, EffectSink, SessionController, SessionState, UiEvent};
pub use theme::Theme;
