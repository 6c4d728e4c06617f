use serde::{Deserialize, Serialize};

use crate::error::ChatError;

/// One relayed chat payload. The relay forwards whatever the room's data
/// channel carried; only `message` is guaranteed, everything else is
/// best-effort and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatFrame {
    #[serde(default)]
    pub id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub from: Option<ChatAuthor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ChatAuthor {
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl ChatFrame {
    pub fn author_label(&self) -> &str {
        self.from
            .as_ref()
            .and_then(|author| author.name.as_deref().or(author.identity.as_deref()))
            .unwrap_or("anonymous")
    }
}

#[derive(Debug, Serialize)]
struct OutboundFrame<'msg> {
    message: &'msg str,
}

/// Decodes one inbound relay payload.
///
/// # Errors
///
/// Returns an error when the payload is not a chat object; the caller logs
/// and skips it.
pub fn decode_chat(text: &str) -> Result<ChatFrame, ChatError> {
    serde_json::from_str(text).map_err(|err| ChatError::MalformedPayload { source: err })
}

/// Encodes an outbound message for the relay.
///
/// # Errors
///
/// Returns an error when serialization fails.
pub fn encode_outbound(message: &str) -> Result<String, ChatError> {
    serde_json::to_string(&OutboundFrame { message })
        .map_err(|err| ChatError::Encode { source: err })
}
