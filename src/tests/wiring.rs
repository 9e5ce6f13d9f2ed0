use std::time::Duration;

use super::{app_for, chat_page, notices};
use crate::config::preferences::MemoryStore;
use crate::controller::{Action, UiEvent};
use crate::dom::{Document, ElementKind, ids};
use crate::notify::Severity;

#[tokio::test]
async fn full_page_binds_every_listener() {
    let app = app_for("http://127.0.0.1:9", Document::full_page(), MemoryStore::default());
    assert_eq!(app.bindings().len(), 7);
}

#[tokio::test]
async fn absent_elements_get_no_listener_and_their_events_are_dropped() {
    let page = Document::new().with(ids::CHAT_CONTAINER, ElementKind::Container);
    let mut app = app_for("http://127.0.0.1:9", page, MemoryStore::default());
    assert!(app.bindings().is_empty());

    app.dispatch(UiEvent::Submit { form: ids::CHAT_FORM.to_string() });
    app.dispatch(UiEvent::Click { element: ids::EXECUTE_CODE.to_string(), target: None });
    app.dispatch(UiEvent::Change {
        element: ids::MODEL_SELECT.to_string(),
        value: "x".to_string(),
    });

    assert_eq!(app.in_flight(), 0);
    assert_eq!(app.current_model(), "qwen2.5:72b");
    assert_eq!(app.document().inner_html(ids::CHAT_CONTAINER), Some(""));
}

#[tokio::test]
async fn chat_page_binds_only_chat_listeners() {
    let app = app_for("http://127.0.0.1:9", chat_page(), MemoryStore::default());
    let actions: Vec<Action> = app.bindings().iter().map(|b| b.action).collect();
    assert_eq!(actions, vec![Action::SendMessage, Action::SelectModel]);
}

#[tokio::test]
async fn event_of_the_wrong_kind_is_ignored() {
    let mut app = app_for("http://127.0.0.1:9", chat_page(), MemoryStore::default());
    app.document_mut().set_value(ids::MESSAGE_INPUT, "hello");
    app.dispatch(UiEvent::Click { element: ids::CHAT_FORM.to_string(), target: None });

    assert_eq!(app.in_flight(), 0);
    assert_eq!(app.document().value(ids::MESSAGE_INPUT), Some("hello"));
}

#[tokio::test(start_paused = true)]
async fn notification_is_removed_after_its_ttl() {
    let mut app = app_for("http://127.0.0.1:9", Document::new(), MemoryStore::default());
    let start = tokio::time::Instant::now();
    app.show_notification("saved", Severity::Success);

    tokio::time::sleep(Duration::from_millis(2999)).await;
    app.drain_ui_msgs();
    assert_eq!(notices(&app), vec![(Severity::Success, "saved".to_string())]);

    let msg = app.next_msg().await.unwrap();
    app.handle_msg(msg);
    assert!(notices(&app).is_empty());
    assert!(start.elapsed() >= Duration::from_millis(3000));
}

#[tokio::test(start_paused = true)]
async fn notifications_expire_independently() {
    let mut app = app_for("http://127.0.0.1:9", Document::new(), MemoryStore::default());
    app.show_notification("first", Severity::Info);
    tokio::time::sleep(Duration::from_millis(1000)).await;
    app.show_notification("second", Severity::Info);

    let msg = app.next_msg().await.unwrap();
    app.handle_msg(msg);
    assert_eq!(notices(&app), vec![(Severity::Info, "second".to_string())]);

    let msg = app.next_msg().await.unwrap();
    app.handle_msg(msg);
    assert!(notices(&app).is_empty());
}
