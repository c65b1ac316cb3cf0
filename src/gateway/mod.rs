//! # Gateway
//!
//! Boundary with the backend service that owns all domain state. The client
//! consumes five JSON endpoints and never mutates what they return:
//!
//! 1. **Status** — `GET /api/status`, the full [`StatusSnapshot`].
//! 2. **Chat** — `POST /api/chat`, one turn plus the post-turn snapshot.
//! 3. **Reset** — `POST /api/reset`, destructive, returns a fresh snapshot.
//! 4. **Events** — `GET /api/events/current`, polled hourly.
//! 5. **Demo** — `POST /api/demo/quick-start`, seeds a near-evolution session.

pub mod client;
pub mod types;

pub use client::{GatewayClient, GatewayClientBuilder, GatewayConfig, GatewayError};
pub use types::{
    ActiveEvent, ChatReply, ChatRequest, EventSnapshot, PersonalityScores, QuickStartReply,
    StatusSnapshot,
};
