mod wiring;
mod workspace;

use crate::config::AppConfig;
use crate::config::preferences::KeyValueStore;
use crate::controller::CortexApp;
use crate::dom::{Document, ElementKind, ids};
use crate::notify::Severity;

/// Config pointed at `base_url` with the push channel off.
pub(crate) fn test_config(base_url: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.server.base_url = base_url.to_string();
    config.server.push_enabled = false;
    config
}

pub(crate) fn app_for(
    base_url: &str,
    document: Document,
    store: impl KeyValueStore + 'static,
) -> CortexApp {
    let mut app = CortexApp::new(&test_config(base_url), document, Box::new(store)).unwrap();
    app.setup_event_listeners();
    app
}

pub(crate) fn chat_page() -> Document {
    Document::new()
        .with(ids::CHAT_FORM, ElementKind::Form)
        .with(ids::MESSAGE_INPUT, ElementKind::Input)
        .with(ids::MODEL_SELECT, ElementKind::Select)
        .with(ids::CHAT_CONTAINER, ElementKind::Container)
}

pub(crate) fn chat_html(app: &CortexApp) -> String {
    app.document()
        .inner_html(ids::CHAT_CONTAINER)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn message_count(app: &CortexApp) -> usize {
    chat_html(app).matches("<div class=\"message ").count()
}

pub(crate) fn notices(app: &CortexApp) -> Vec<(Severity, String)> {
    app.document()
        .notifications()
        .iter()
        .map(|n| (n.severity, n.message.clone()))
        .collect()
}
