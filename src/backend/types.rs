//! Wire types for the session backend.
//!
//! The backend is loose about which fields it sends, so every response type
//! defaults missing fields here, at the decoding boundary. Nothing past this
//! module ever sees an absent list or a missing title.

use serde::{Deserialize, Deserializer, Serialize};

/// Shown for sessions the backend has not titled yet.
pub const UNTITLED_SESSION: &str = "Untitled Flow";

/// One entry in a sidebar grouping.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: String,
    #[serde(default = "untitled", deserialize_with = "title_or_placeholder")]
    pub title: String,
}

fn untitled() -> String {
    UNTITLED_SESSION.to_string()
}

/// Accepts a missing, `null`, or blank title and substitutes the placeholder.
fn title_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let title: Option<String> = Option::deserialize(deserializer)?;
    Ok(title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(untitled))
}

/// The three disjoint session groupings, always replaced wholesale.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarData {
    #[serde(default)]
    pub recent: Vec<SessionSummary>,
    #[serde(default)]
    pub pinned: Vec<SessionSummary>,
    #[serde(default)]
    pub archived: Vec<SessionSummary>,
}

impl SidebarData {
    pub fn is_empty(&self) -> bool {
        self.recent.is_empty() && self.pinned.is_empty() && self.archived.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recent.len() + self.pinned.len() + self.archived.len()
    }
}

/// `POST /new_chat` response.
#[derive(Deserialize, Debug, Default)]
pub struct NewChatResponse {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// A persisted transcript entry. The role stays a raw string here; the
/// reducer decides which roles it can show.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// `GET /get_chat_history` response.
#[derive(Deserialize, Debug, Default)]
pub struct HistoryResponse {
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

/// `POST /chat` request body. `session_id` is omitted for a session the
/// backend has not identified yet.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// `POST /chat` response.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatResponse {
    #[serde(default)]
    pub reply: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_missing_groups_default_to_empty() {
        let data: SidebarData = serde_json::from_str(r#"{"recent": []}"#).unwrap();
        assert!(data.is_empty());
        assert_eq!(data, SidebarData::default());
    }

    #[test]
    fn test_summary_title_defaults() {
        let json = r#"{
            "recent": [
                {"session_id": "a", "title": "Rust questions"},
                {"session_id": "b"},
                {"session_id": "c", "title": null},
                {"session_id": "d", "title": "   "}
            ]
        }"#;
        let data: SidebarData = serde_json::from_str(json).unwrap();
        let titles: Vec<&str> = data.recent.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Rust questions", UNTITLED_SESSION, UNTITLED_SESSION, UNTITLED_SESSION]
        );
        assert_eq!(data.len(), 4);
    }

    #[test]
    fn test_sidebar_ignores_unknown_fields() {
        let json = r#"{
            "pinned": [{"session_id": "p1", "title": "Pinned", "created_at": 12}],
            "extra": true
        }"#;
        let data: SidebarData = serde_json::from_str(json).unwrap();
        assert_eq!(data.pinned.len(), 1);
        assert_eq!(data.pinned[0].session_id, "p1");
    }

    #[test]
    fn test_history_missing_messages() {
        let resp: HistoryResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.messages.is_empty());
    }

    #[test]
    fn test_chat_request_omits_unknown_session() {
        let req = ChatRequest {
            message: "hi".to_string(),
            session_id: None,
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"message":"hi"}"#);

        let req = ChatRequest {
            message: "hi".to_string(),
            session_id: Some("s1".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"message":"hi","session_id":"s1"}"#
        );
    }

    #[test]
    fn test_chat_response_fields_optional() {
        let resp: ChatResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp, ChatResponse::default());

        let resp: ChatResponse =
            serde_json::from_str(r#"{"reply": "hello", "session_id": "s1"}"#).unwrap();
        assert_eq!(resp.reply.as_deref(), Some("hello"));
        assert_eq!(resp.session_id.as_deref(), Some("s1"));
    }
}
