use std::io::Write;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{app_for, notices};
use crate::config::preferences::MemoryStore;
use crate::controller::{ClickTarget, UiEvent};
use crate::dom::render::{FILE_ITEM_CLASS, PLUGIN_TOGGLE_CLASS};
use crate::dom::{Document, ElementKind, ids};
use crate::notify::{self, Severity};

fn code_page() -> Document {
    Document::new()
        .with(ids::CODE_EDITOR, ElementKind::TextArea)
        .with_select(ids::LANGUAGE_SELECT, &["python", "javascript", "bash"])
        .with(ids::CODE_OUTPUT, ElementKind::Container)
        .with(ids::EXECUTE_CODE, ElementKind::Button)
}

fn run_click() -> UiEvent {
    UiEvent::Click { element: ids::EXECUTE_CODE.to_string(), target: None }
}

fn plugin_click(name: &str) -> UiEvent {
    UiEvent::Click {
        element: ids::PLUGINS_CONTAINER.to_string(),
        target: Some(ClickTarget {
            class: format!("btn btn-secondary btn-sm {PLUGIN_TOGGLE_CLASS}"),
            data: name.to_string(),
        }),
    }
}

fn output(app: &crate::controller::CortexApp) -> String {
    app.document().inner_html(ids::CODE_OUTPUT).unwrap_or_default().to_string()
}

#[tokio::test]
async fn given_empty_editor_when_run_then_warns_without_request() {
    let server = MockServer::start().await;
    Mock::given(path("/api/code/execute"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut app = app_for(&server.uri(), code_page(), MemoryStore::default());
    app.document_mut().set_value(ids::CODE_EDITOR, "  \n ");
    app.dispatch(run_click());

    assert_eq!(app.in_flight(), 0);
    assert_eq!(output(&app), "");
    assert_eq!(notices(&app), vec![(Severity::Warning, notify::ENTER_CODE.to_string())]);
}

#[tokio::test]
async fn given_code_when_run_then_indicator_then_escaped_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/code/execute"))
        .and(body_json(json!({"code": "print('<b>')", "language": "python"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "output": "<b>\n",
            "error": null,
            "execution_time": 0.5
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut app = app_for(&server.uri(), code_page(), MemoryStore::default());
    app.document_mut().set_value(ids::CODE_EDITOR, "print('<b>')");
    app.dispatch(run_click());

    assert!(output(&app).contains("Running..."));
    app.run_until_idle().await;

    let html = output(&app);
    assert!(html.contains("<strong>Success!</strong> Execution time: 0.5s"));
    assert!(html.contains("<pre>&lt;b&gt;\n</pre>"));
}

#[tokio::test]
async fn given_failed_execution_then_error_replaces_indicator() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/code/execute"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "NameError: name 'x' is not defined"
        })))
        .mount(&server)
        .await;

    let mut app = app_for(&server.uri(), code_page(), MemoryStore::default());
    app.document_mut().set_value(ids::CODE_EDITOR, "x");
    app.document_mut().set_value(ids::LANGUAGE_SELECT, "bash");
    app.dispatch(run_click());
    app.run_until_idle().await;

    let html = output(&app);
    assert!(!html.contains("Running..."));
    assert!(html.contains("<strong>Error!</strong> NameError: name 'x' is not defined"));
}

#[tokio::test]
async fn given_unreachable_server_then_execution_shows_generic_error() {
    let mut app = app_for("http://127.0.0.1:9", code_page(), MemoryStore::default());
    app.document_mut().set_value(ids::CODE_EDITOR, "echo hi");
    app.dispatch(run_click());
    app.run_until_idle().await;

    assert!(output(&app).contains(notify::EXECUTION_FAILED));
}

#[tokio::test]
async fn given_no_output_panel_then_run_does_nothing() {
    let page = Document::new()
        .with(ids::CODE_EDITOR, ElementKind::TextArea)
        .with_select(ids::LANGUAGE_SELECT, &["python"])
        .with(ids::EXECUTE_CODE, ElementKind::Button);
    let mut app = app_for("http://127.0.0.1:9", page, MemoryStore::default());
    app.document_mut().set_value(ids::CODE_EDITOR, "print(1)");
    app.dispatch(run_click());

    assert_eq!(app.in_flight(), 0);
    assert!(notices(&app).is_empty());
}

#[tokio::test]
async fn given_uploaded_file_then_notice_and_file_list_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(body_string_contains("filename=\"notes.txt\""))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true, "filename": "notes.txt"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "files": [
                {"name": "notes.txt", "type": "file", "size": 5},
                {"name": "src", "type": "directory"}
            ],
            "current_path": "/srv/files"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("notes.txt");
    std::fs::File::create(&file_path).unwrap().write_all(b"hello").unwrap();

    let page = Document::new()
        .with(ids::FILE_INPUT, ElementKind::FileInput)
        .with(ids::FILES_CONTAINER, ElementKind::Container);
    let mut app = app_for(&server.uri(), page, MemoryStore::default());
    app.dispatch(UiEvent::Change {
        element: ids::FILE_INPUT.to_string(),
        value: file_path.display().to_string(),
    });
    app.run_until_idle().await;

    assert_eq!(
        notices(&app),
        vec![(Severity::Success, "File uploaded: notes.txt".to_string())]
    );
    let files = app.document().inner_html(ids::FILES_CONTAINER).unwrap();
    assert!(files.contains("data-file=\"notes.txt\""));
    assert!(files.contains("📁 src"));
}

#[tokio::test]
async fn given_missing_local_file_then_upload_failure_is_shown() {
    let page = Document::new().with(ids::FILE_INPUT, ElementKind::FileInput);
    let mut app = app_for("http://127.0.0.1:9", page, MemoryStore::default());
    app.dispatch(UiEvent::Change {
        element: ids::FILE_INPUT.to_string(),
        value: "/definitely/not/here.bin".to_string(),
    });
    app.run_until_idle().await;

    assert_eq!(notices(&app), vec![(Severity::Error, notify::UPLOAD_FAILED.to_string())]);
}

#[tokio::test]
async fn given_unreachable_server_then_file_panel_shows_error_block() {
    let page = Document::new().with(ids::FILES_CONTAINER, ElementKind::Container);
    let mut app = app_for("http://127.0.0.1:9", page, MemoryStore::default());
    app.load_files();
    app.run_until_idle().await;

    let html = app.document().inner_html(ids::FILES_CONTAINER).unwrap();
    assert_eq!(html, format!("<div class=\"alert alert-error\">{}</div>", notify::FILES_FAILED));
}

#[tokio::test]
async fn clicking_a_file_item_renders_its_preview() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/file-preview"))
        .and(body_json(json!({"filepath": "main.rs"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "content": "fn main() { println!(\"<hi>\"); }",
            "has_more": true,
            "total_lines": 100
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = Document::new()
        .with(ids::FILES_CONTAINER, ElementKind::Container)
        .with(ids::FILE_PREVIEW, ElementKind::Container);
    let mut app = app_for(&server.uri(), page, MemoryStore::default());
    app.dispatch(UiEvent::Click {
        element: ids::FILES_CONTAINER.to_string(),
        target: Some(ClickTarget {
            class: format!("{FILE_ITEM_CLASS} file"),
            data: "main.rs".to_string(),
        }),
    });
    app.run_until_idle().await;

    let html = app.document().inner_html(ids::FILE_PREVIEW).unwrap();
    assert!(html.contains("println!(&quot;&lt;hi&gt;&quot;)"));
    assert!(html.contains("Showing the first 100 lines"));
}

#[tokio::test]
async fn plugin_toggles_keep_working_after_cards_are_rerendered() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/plugins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "plugins": [{"name": "web_search", "description": "Search the web", "active": true}]
        })))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/plugins/toggle"))
        .and(body_json(json!({"plugin": "web_search"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "active": false})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let page = Document::new().with(ids::PLUGINS_CONTAINER, ElementKind::Container);
    let mut app = app_for(&server.uri(), page, MemoryStore::default());
    app.load_plugins();
    app.run_until_idle().await;
    let cards = app.document().inner_html(ids::PLUGINS_CONTAINER).unwrap();
    assert!(cards.contains("data-plugin=\"web_search\">Disable</button>"));

    app.dispatch(plugin_click("web_search"));
    app.run_until_idle().await;
    app.dispatch(plugin_click("web_search"));
    app.run_until_idle().await;

    let toggled: Vec<_> = notices(&app)
        .into_iter()
        .filter(|(_, m)| m == "Plugin disabled: web_search")
        .collect();
    assert_eq!(toggled.len(), 2);
}

#[tokio::test]
async fn clicks_outside_a_toggle_button_are_ignored() {
    let page = Document::new().with(ids::PLUGINS_CONTAINER, ElementKind::Container);
    let mut app = app_for("http://127.0.0.1:9", page, MemoryStore::default());

    app.dispatch(UiEvent::Click { element: ids::PLUGINS_CONTAINER.to_string(), target: None });
    app.dispatch(UiEvent::Click {
        element: ids::PLUGINS_CONTAINER.to_string(),
        target: Some(ClickTarget { class: "plugin-card".to_string(), data: String::new() }),
    });

    assert_eq!(app.in_flight(), 0);
}
