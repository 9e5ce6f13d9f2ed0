use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    #[default]
    Assistant,
}

impl MessageKind {
    pub fn as_class(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Assistant => "assistant",
        }
    }
}

/// One chat exchange as it is rendered into the chat container.
///
/// Push payloads omit `type`, so a message without one is an assistant entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub user_text: Option<String>,
    #[serde(rename = "assistant", default, skip_serializing_if = "Option::is_none")]
    pub assistant_text: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub model: String,
    #[serde(rename = "type", default)]
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Local echo shown before the server answers.
    pub fn echo(
        text: impl Into<String>,
        model: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            user_text: Some(text.into()),
            assistant_text: Some(String::new()),
            timestamp: timestamp.into(),
            model: model.into(),
            kind: MessageKind::User,
        }
    }

    pub fn reply(
        user_text: impl Into<String>,
        assistant_text: impl Into<String>,
        model: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            user_text: Some(user_text.into()),
            assistant_text: Some(assistant_text.into()),
            timestamp: timestamp.into(),
            model: model.into(),
            kind: MessageKind::Assistant,
        }
    }
}
