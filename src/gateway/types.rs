//! JSON shapes exchanged with the persona gateway.
//!
//! These mirror the backend's fixed contracts and must stay bit-compatible
//! with them. Every response type is a replace-wholesale value: the client
//! never merges a new snapshot into an old one. Optional fields default to
//! empty/zero so a missing field degrades instead of failing the parse.

use serde::{Deserialize, Serialize};

/// Per-axis personality tendency scores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityScores {
    #[serde(default)]
    pub tsundere: u32,
    #[serde(default)]
    pub yandere: u32,
    #[serde(default)]
    pub kuudere: u32,
    #[serde(default)]
    pub dandere: u32,
}

impl PersonalityScores {
    /// Fixed axis order used by the radar chart.
    pub fn as_axes(&self) -> [u32; 4] {
        [self.tsundere, self.yandere, self.kuudere, self.dandere]
    }
}

/// Full domain state snapshot from `GET /api/status` (and embedded in chat
/// and reset responses). Owned by the gateway; the client only displays it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub affection: i64,
    #[serde(default)]
    pub scores: PersonalityScores,
    #[serde(default)]
    pub long_term_memories: Vec<String>,
}

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response from `POST /api/chat`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub ai_response: String,
    #[serde(default)]
    pub current_status: StatusSnapshot,
    #[serde(default)]
    pub evolution_triggered: bool,
    /// Only meaningful when `evolution_triggered` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_personality: Option<String>,
}

/// One active seasonal/time event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEvent {
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub affection_bonus: i64,
}

/// Response from `GET /api/events/current`. Replaced wholesale on every poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSnapshot {
    #[serde(default)]
    pub active_events: Vec<ActiveEvent>,
    #[serde(default)]
    pub current_themes: Vec<String>,
    #[serde(default)]
    pub affection_bonus: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_message: Option<String>,
}

impl EventSnapshot {
    pub fn has_active_events(&self) -> bool {
        !self.active_events.is_empty()
    }
}

/// Response from `POST /api/demo/quick-start`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuickStartReply {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub current_status: StatusSnapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_snapshot_parses_full_payload() {
        let json = r#"{
            "personality": "Tsundere",
            "affection": 5,
            "scores": {"tsundere": 5, "yandere": 0, "kuudere": 0, "dandere": 0},
            "long_term_memories": ["likes tea"]
        }"#;
        let status: StatusSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(status.personality, "Tsundere");
        assert_eq!(status.affection, 5);
        assert_eq!(status.scores.as_axes(), [5, 0, 0, 0]);
        assert_eq!(status.long_term_memories, vec!["likes tea"]);
    }

    #[test]
    fn status_snapshot_missing_fields_default() {
        let status: StatusSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(status.personality, "");
        assert_eq!(status.affection, 0);
        assert_eq!(status.scores.as_axes(), [0, 0, 0, 0]);
        assert!(status.long_term_memories.is_empty());
    }

    #[test]
    fn scores_missing_axis_defaults_to_zero() {
        let scores: PersonalityScores = serde_json::from_str(r#"{"tsundere": 3}"#).unwrap();
        assert_eq!(scores.as_axes(), [3, 0, 0, 0]);
    }

    #[test]
    fn chat_reply_without_new_personality() {
        let json = r#"{
            "ai_response": "hi!",
            "evolution_triggered": false,
            "current_status": {"personality": "natural", "affection": 1}
        }"#;
        let reply: ChatReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.ai_response, "hi!");
        assert!(!reply.evolution_triggered);
        assert!(reply.new_personality.is_none());
    }

    #[test]
    fn chat_reply_with_evolution() {
        let json = r#"{
            "ai_response": "...",
            "evolution_triggered": true,
            "new_personality": "yandere",
            "current_status": {}
        }"#;
        let reply: ChatReply = serde_json::from_str(json).unwrap();
        assert!(reply.evolution_triggered);
        assert_eq!(reply.new_personality.as_deref(), Some("yandere"));
    }

    #[test]
    fn chat_request_serializes_message_field() {
        let req = ChatRequest { message: "hello".into() };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"message":"hello"}"#);
    }

    #[test]
    fn event_snapshot_defaults_are_empty() {
        let snap: EventSnapshot = serde_json::from_str("{}").unwrap();
        assert!(snap.active_events.is_empty());
        assert!(snap.current_themes.is_empty());
        assert_eq!(snap.affection_bonus, 0);
        assert!(snap.welcome_message.is_none());
        assert!(!snap.has_active_events());
    }

    #[test]
    fn event_snapshot_parses_active_events() {
        let json = r#"{
            "active_events": [
                {"theme": "christmas", "icon": "🎄", "name": "Christmas", "affection_bonus": 2}
            ],
            "current_themes": ["christmas"],
            "affection_bonus": 2,
            "welcome_message": "Merry Christmas!"
        }"#;
        let snap: EventSnapshot = serde_json::from_str(json).unwrap();
        assert!(snap.has_active_events());
        assert_eq!(snap.active_events[0].name, "Christmas");
        assert_eq!(snap.active_events[0].icon, "🎄");
        assert_eq!(snap.affection_bonus, 2);
        assert_eq!(snap.welcome_message.as_deref(), Some("Merry Christmas!"));
    }

    #[test]
    fn event_snapshot_ignores_unknown_fields() {
        // The backend also sends event_icons and server_time; the client
        // reads neither.
        let json = r#"{"active_events": [], "event_icons": {}, "server_time": "2025-01-01T00:00:00"}"#;
        let snap: EventSnapshot = serde_json::from_str(json).unwrap();
        assert!(!snap.has_active_events());
    }

    #[test]
    fn quick_start_reply_parses() {
        let json = r#"{"message": "Demo mode initialized!", "current_status": {"affection": 28}}"#;
        let reply: QuickStartReply = serde_json::from_str(json).unwrap();
        assert_eq!(reply.message, "Demo mode initialized!");
        assert_eq!(reply.current_status.affection, 28);
    }
}
