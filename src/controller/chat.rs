use chrono::{SecondsFormat, Utc};

use super::{CortexApp, UiMsg};
use crate::client::events::PushEvent;
use crate::dom::{ids, render};
use crate::error::api::ApiError;
use crate::notify::{self, Severity};
use crate::types::chat::ChatMessage;
use crate::types::wire::{ApiReply, ChatReply};

impl CortexApp {
    /// Send whatever is in the message input, then clear it.
    pub fn send_message(&mut self) {
        let Some(raw) = self.document.value(ids::MESSAGE_INPUT).map(str::to_string) else {
            return;
        };
        self.send_text(&raw);
    }

    /// Echo the trimmed text locally, then post it with the current model.
    /// Replies render in the order they complete.
    pub fn send_text(&mut self, raw: &str) {
        let text = raw.trim();
        if text.is_empty() {
            return;
        }

        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.add_message(&ChatMessage::echo(text, self.current_model.clone(), now));
        self.document.set_value(ids::MESSAGE_INPUT, "");

        let client = self.client.clone();
        let model = self.current_model.clone();
        let text = text.to_string();
        tracing::debug!(%model, "sending chat message");
        self.spawn_request(async move {
            let result = client.chat(&text, &model).await;
            UiMsg::ChatReplied { text, result }
        });
    }

    pub fn add_message(&mut self, msg: &ChatMessage) {
        self.document
            .append_html(ids::CHAT_CONTAINER, render::message(msg));
    }

    pub(super) fn on_chat_reply(
        &mut self,
        text: String,
        result: Result<ApiReply<ChatReply>, ApiError>,
    ) {
        match result {
            Ok(ApiReply::Ok(reply)) => {
                let msg = ChatMessage::reply(
                    text,
                    reply.response,
                    self.current_model.clone(),
                    reply.timestamp,
                );
                self.add_message(&msg);
            }
            Ok(ApiReply::Failed(reason)) => self.notify_failure(reason, notify::SEND_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                self.show_notification(notify::SEND_FAILED, Severity::Error);
            }
        }
    }

    pub(super) fn on_push_event(&mut self, event: PushEvent) {
        match event {
            PushEvent::Connected => {
                tracing::info!("push channel connected");
                self.show_notification(notify::CONNECTED, Severity::Success);
            }
            PushEvent::Disconnected => {
                tracing::info!("push channel disconnected");
                self.show_notification(notify::DISCONNECTED, Severity::Warning);
            }
            PushEvent::MessageReceived(msg) => self.add_message(&msg),
            PushEvent::ErrorReceived(message) => {
                self.show_notification(&message, Severity::Error);
            }
            PushEvent::Status(message) => {
                self.show_notification(&message, Severity::Info);
            }
        }
    }
}
