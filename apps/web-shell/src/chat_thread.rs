use serde::Serialize;
use talentlink_client_core::message::ChatMessageDirection;

/// One direct-message conversation with another marketplace user, as held
/// by the shell between renders. History arrives from the messages API;
/// locally-sent messages are appended optimistically and reconciled by id
/// when the next history page lands.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatThreadState {
    pub target_user_id: Option<String>,
    pub target_user_name: Option<String>,
    pub messages: Vec<ChatThreadMessage>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatThreadMessage {
    pub message_id: Option<String>,
    pub direction: ChatMessageDirection,
    pub text: String,
}

impl ChatThreadState {
    /// Points the thread at a new conversation partner. Switching partners
    /// drops the previous transcript; re-setting the same partner keeps it.
    pub fn set_target(&mut self, target_user_id: Option<String>, target_user_name: Option<String>) {
        if self.target_user_id != target_user_id {
            self.messages.clear();
            self.last_error = None;
        }
        self.target_user_id = target_user_id;
        self.target_user_name = target_user_name;
    }

    pub fn append_local_outbound(&mut self, text: &str) {
        self.messages.push(ChatThreadMessage {
            message_id: None,
            direction: ChatMessageDirection::Outbound,
            text: text.to_string(),
        });
    }

    pub fn append_system(&mut self, text: &str) {
        self.messages.push(ChatThreadMessage {
            message_id: None,
            direction: ChatMessageDirection::System,
            text: text.to_string(),
        });
    }

    /// Ingests a history payload of the form
    /// `{"data": {"messages": [{"messageId", "direction", "text"}]}}`.
    /// Returns whether the transcript changed. Replaces optimistic local
    /// entries when the authoritative list covers them.
    pub fn ingest_history_payload(&mut self, payload: &serde_json::Value) -> bool {
        let Some(records) = payload
            .get("data")
            .and_then(|data| data.get("messages"))
            .and_then(serde_json::Value::as_array)
        else {
            return false;
        };

        let mut next: Vec<ChatThreadMessage> = Vec::with_capacity(records.len());
        for record in records {
            let Some(text) = record.get("text").and_then(serde_json::Value::as_str) else {
                continue;
            };
            let message_id = record
                .get("messageId")
                .and_then(serde_json::Value::as_str)
                .map(ToString::to_string);
            let direction = record
                .get("direction")
                .and_then(serde_json::Value::as_str)
                .map(ChatMessageDirection::from_wire)
                .unwrap_or(ChatMessageDirection::System);
            next.push(ChatThreadMessage {
                message_id,
                direction,
                text: text.to_string(),
            });
        }

        // Keep optimistic sends that the server has not acknowledged yet.
        let acknowledged: Vec<String> = next
            .iter()
            .filter(|message| message.direction == ChatMessageDirection::Outbound)
            .map(|message| message.text.clone())
            .collect();
        for local in &self.messages {
            if local.message_id.is_none()
                && local.direction == ChatMessageDirection::Outbound
                && !acknowledged.contains(&local.text)
            {
                next.push(local.clone());
            }
        }

        if next == self.messages {
            return false;
        }
        self.messages = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn switching_partner_clears_the_transcript() {
        let mut state = ChatThreadState::default();
        state.set_target(Some("u-2".to_string()), Some("Jon".to_string()));
        state.append_local_outbound("hi Jon");
        state.set_target(Some("u-3".to_string()), Some("Mara".to_string()));
        assert!(state.messages.is_empty());
        assert_eq!(state.target_user_name.as_deref(), Some("Mara"));
    }

    #[test]
    fn resetting_same_partner_keeps_the_transcript() {
        let mut state = ChatThreadState::default();
        state.set_target(Some("u-2".to_string()), Some("Jon".to_string()));
        state.append_local_outbound("hi Jon");
        state.set_target(Some("u-2".to_string()), Some("Jon".to_string()));
        assert_eq!(state.messages.len(), 1);
    }

    #[test]
    fn history_ingest_replaces_acknowledged_optimistic_sends() {
        let mut state = ChatThreadState::default();
        state.set_target(Some("u-2".to_string()), Some("Jon".to_string()));
        state.append_local_outbound("hi Jon");

        let changed = state.ingest_history_payload(&json!({
            "data": {
                "messages": [
                    { "messageId": "m-1", "direction": "inbound", "text": "hello" },
                    { "messageId": "m-2", "direction": "outbound", "text": "hi Jon" },
                ]
            }
        }));

        assert!(changed);
        assert_eq!(state.messages.len(), 2);
        assert!(state.messages.iter().all(|message| message.message_id.is_some()));
    }

    #[test]
    fn history_ingest_keeps_unacknowledged_sends() {
        let mut state = ChatThreadState::default();
        state.append_local_outbound("still in flight");

        let changed = state.ingest_history_payload(&json!({
            "data": { "messages": [
                { "messageId": "m-1", "direction": "inbound", "text": "hello" },
            ]}
        }));

        assert!(changed);
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].text, "still in flight");
        assert_eq!(state.messages[1].message_id, None);
    }

    #[test]
    fn malformed_history_payload_is_ignored() {
        let mut state = ChatThreadState::default();
        assert!(!state.ingest_history_payload(&json!({ "data": {} })));
        assert!(!state.ingest_history_payload(&json!("nonsense")));
        assert!(state.messages.is_empty());
    }

    #[test]
    fn records_without_text_are_skipped() {
        let mut state = ChatThreadState::default();
        let changed = state.ingest_history_payload(&json!({
            "data": { "messages": [
                { "messageId": "m-1", "direction": "inbound" },
                { "messageId": "m-2", "direction": "inbound", "text": "kept" },
            ]}
        }));
        assert!(changed);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].text, "kept");
    }
}
