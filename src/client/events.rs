use crate::error::events::EventsError;
use crate::types::chat::ChatMessage;
use futures_util::stream::StreamExt;
use reqwest::Url;
use reqwest_eventsource::{Event, EventSource};
use serde::Deserialize;
use tokio::sync::mpsc;

/// Server-initiated update delivered over the push channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    Connected,
    Disconnected,
    MessageReceived(ChatMessage),
    ErrorReceived(String),
    Status(String),
}

#[derive(Debug, Deserialize)]
struct TextPayload {
    #[serde(default)]
    message: String,
}

/// Map one named SSE message onto a push event.
pub fn parse_push_event(name: &str, data: &str) -> Option<PushEvent> {
    match name {
        "new_message" => serde_json::from_str::<ChatMessage>(data)
            .ok()
            .map(PushEvent::MessageReceived),
        "error" => serde_json::from_str::<TextPayload>(data)
            .ok()
            .map(|p| PushEvent::ErrorReceived(p.message)),
        "status" => serde_json::from_str::<TextPayload>(data)
            .ok()
            .map(|p| PushEvent::Status(p.message)),
        _ => None,
    }
}

/// Open the push stream and return a receiver of parsed events.
///
/// The stream reconnects on its own with the event source's retry policy.
/// The task ends as soon as the receiver is dropped, even mid-backoff.
pub fn subscribe_push(
    http: &reqwest::Client,
    url: Url,
) -> Result<mpsc::Receiver<PushEvent>, EventsError> {
    let mut es = EventSource::new(http.get(url)).map_err(|e| EventsError::Http(e.to_string()))?;
    let (tx, rx) = mpsc::channel(256);

    tokio::spawn(async move {
        let mut connected = false;
        loop {
            let next = tokio::select! {
                _ = tx.closed() => break,
                next = es.next() => next,
            };
            let Some(next) = next else { break };

            let event = match next {
                Ok(Event::Open) => {
                    connected = true;
                    Some(PushEvent::Connected)
                }
                Ok(Event::Message(message)) => {
                    let parsed = parse_push_event(&message.event, &message.data);
                    if parsed.is_none() {
                        tracing::debug!(event = %message.event, "ignoring push message");
                    }
                    parsed
                }
                Err(e) => {
                    tracing::debug!(error = %e, "push stream interrupted");
                    // One notice per outage, and only after a successful open.
                    std::mem::replace(&mut connected, false).then_some(PushEvent::Disconnected)
                }
            };

            if let Some(event) = event {
                if tx.send(event).await.is_err() {
                    break;
                }
            }
        }
        es.close();
    });

    Ok(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chat::MessageKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn new_message_payload_becomes_message_event() {
        let event = parse_push_event(
            "new_message",
            r#"{"user":"q","assistant":"a","timestamp":"t","model":"m"}"#,
        );
        match event {
            Some(PushEvent::MessageReceived(msg)) => {
                assert_eq!(msg.kind, MessageKind::Assistant);
                assert_eq!(msg.assistant_text.as_deref(), Some("a"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn error_payload_carries_message() {
        assert_eq!(
            parse_push_event("error", r#"{"message":"quota exceeded"}"#),
            Some(PushEvent::ErrorReceived("quota exceeded".to_string()))
        );
    }

    #[test]
    fn unknown_or_malformed_events_are_dropped() {
        assert_eq!(parse_push_event("join_chat", "{}"), None);
        assert_eq!(parse_push_event("new_message", "not json"), None);
    }

    #[tokio::test]
    async fn stream_reports_open_then_messages() {
        let server = MockServer::start().await;
        let body = "event: status\ndata: {\"message\":\"ready\"}\n\n\
                    event: new_message\ndata: {\"user\":\"q\",\"assistant\":\"a\",\"timestamp\":\"t\",\"model\":\"m\"}\n\n";
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
            .mount(&server)
            .await;

        let url = Url::parse(&format!("{}/api/events", server.uri())).unwrap();
        let mut rx = subscribe_push(&reqwest::Client::new(), url).unwrap();

        assert_eq!(rx.recv().await, Some(PushEvent::Connected));
        assert_eq!(rx.recv().await, Some(PushEvent::Status("ready".to_string())));
        match rx.recv().await {
            Some(PushEvent::MessageReceived(msg)) => {
                assert_eq!(msg.user_text.as_deref(), Some("q"))
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(rx.recv().await, Some(PushEvent::Disconnected));
    }

    #[tokio::test]
    async fn dropped_receiver_stops_reconnecting() {
        // Accepts and immediately closes every connection, so each attempt fails.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = accepted.clone();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(socket);
            }
        });

        let url = Url::parse(&format!("http://{addr}/api/events")).unwrap();
        let rx = subscribe_push(&reqwest::Client::new(), url).unwrap();
        tokio::time::timeout(Duration::from_secs(5), async {
            while accepted.load(Ordering::SeqCst) == 0 {
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
        })
        .await
        .unwrap();

        drop(rx);
        tokio::time::sleep(Duration::from_millis(200)).await;
        let settled = accepted.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(accepted.load(Ordering::SeqCst), settled);
    }
}
