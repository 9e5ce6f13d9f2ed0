//! The client controller: owns the page, the preferences and the push handle.
//!
//! All state lives on the task that owns [`CortexApp`]. Network calls and
//! timers run as spawned tasks and report back as [`UiMsg`] values, which
//! [`CortexApp::handle_msg`] applies one at a time.

mod chat;
mod settings;
mod wiring;
mod workspace;

pub use wiring::{Action, Binding, ClickTarget, UiEvent};

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::api::CortexClient;
use crate::client::events::{PushEvent, subscribe_push};
use crate::config::AppConfig;
use crate::config::preferences::KeyValueStore;
use crate::dom::{Document, ids};
use crate::error::api::ApiError;
use crate::notify::{NotificationId, Severity};
use crate::types::wire::{
    Ack, ApiReply, ChatReply, ExecutionReply, FileListReply, ModelListReply, PluginListReply,
    PreviewReply, ThemeListReply, ToggleReply, UploadReply,
};

pub enum UiMsg {
    // Front end
    Input(String),
    Shutdown,
    // Push channel
    Push(PushEvent),
    // Request completions
    ChatReplied {
        text: String,
        result: Result<ApiReply<ChatReply>, ApiError>,
    },
    CodeExecuted(Result<ApiReply<ExecutionReply>, ApiError>),
    FileUploaded(Result<ApiReply<UploadReply>, ApiError>),
    FilesLoaded(Result<ApiReply<FileListReply>, ApiError>),
    FilePreviewed(Result<ApiReply<PreviewReply>, ApiError>),
    PluginsLoaded(Result<ApiReply<PluginListReply>, ApiError>),
    PluginToggled {
        name: String,
        result: Result<ApiReply<ToggleReply>, ApiError>,
    },
    ThemeSet(Result<ApiReply<Ack>, ApiError>),
    ThemeCssLoaded {
        href: String,
        result: Result<String, ApiError>,
    },
    ModelsLoaded(Result<ApiReply<ModelListReply>, ApiError>),
    ThemesLoaded(Result<ApiReply<ThemeListReply>, ApiError>),
    // Timers
    NotificationExpired(NotificationId),
}

impl UiMsg {
    fn is_reply(&self) -> bool {
        !matches!(
            self,
            UiMsg::Input(_) | UiMsg::Shutdown | UiMsg::Push(_) | UiMsg::NotificationExpired(_)
        )
    }
}

pub struct CortexApp {
    document: Document,
    bindings: Vec<Binding>,
    client: CortexClient,
    store: Box<dyn KeyValueStore>,
    current_model: String,
    default_model: String,
    push_url: Option<Url>,
    push_task: Option<JoinHandle<()>>,
    notification_ttl: Duration,
    ui_tx: mpsc::UnboundedSender<UiMsg>,
    ui_rx: mpsc::UnboundedReceiver<UiMsg>,
    in_flight: usize,
}

impl CortexApp {
    pub fn new(
        config: &AppConfig,
        mut document: Document,
        store: Box<dyn KeyValueStore>,
    ) -> Result<Self, ApiError> {
        let client = CortexClient::new(&config.server.base_url, config.server.request_timeout())?;
        let push_url = if config.server.push_enabled {
            Some(client.endpoint(&config.server.push_path)?)
        } else {
            None
        };

        let default_model = config.ui.default_model.clone();
        document.set_value(ids::MODEL_SELECT, &default_model);

        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        Ok(Self {
            document,
            bindings: Vec::new(),
            client,
            store,
            current_model: default_model.clone(),
            default_model,
            push_url,
            push_task: None,
            notification_ttl: config.ui.notification_ttl(),
            ui_tx,
            ui_rx,
            in_flight: 0,
        })
    }

    /// Wire handlers, restore preferences, open the push channel and fill
    /// whichever lists the page shows.
    pub fn init(&mut self) {
        self.setup_event_listeners();
        self.load_settings();
        self.connect_push();

        if self.document.contains(ids::FILES_CONTAINER) {
            self.load_files();
        }
        if self.document.contains(ids::PLUGINS_CONTAINER) {
            self.load_plugins();
        }
        if self.document.contains(ids::MODEL_SELECT) {
            self.load_models();
        }
        if self.document.contains(ids::THEME_SELECT) {
            self.load_themes();
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn current_model(&self) -> &str {
        &self.current_model
    }

    /// Requests spawned and not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn sender(&self) -> mpsc::UnboundedSender<UiMsg> {
        self.ui_tx.clone()
    }

    pub async fn next_msg(&mut self) -> Option<UiMsg> {
        self.ui_rx.recv().await
    }

    /// Apply whatever has already arrived without waiting.
    pub fn drain_ui_msgs(&mut self) {
        while let Ok(msg) = self.ui_rx.try_recv() {
            self.handle_msg(msg);
        }
    }

    /// Apply messages until every spawned request has been answered.
    pub async fn run_until_idle(&mut self) {
        while self.in_flight > 0 {
            match self.ui_rx.recv().await {
                Some(msg) => self.handle_msg(msg),
                None => break,
            }
        }
    }

    pub fn handle_msg(&mut self, msg: UiMsg) {
        if msg.is_reply() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        match msg {
            UiMsg::Input(_) | UiMsg::Shutdown => {}
            UiMsg::Push(event) => self.on_push_event(event),
            UiMsg::ChatReplied { text, result } => self.on_chat_reply(text, result),
            UiMsg::CodeExecuted(result) => self.on_code_executed(result),
            UiMsg::FileUploaded(result) => self.on_file_uploaded(result),
            UiMsg::FilesLoaded(result) => self.on_files_loaded(result),
            UiMsg::FilePreviewed(result) => self.on_file_previewed(result),
            UiMsg::PluginsLoaded(result) => self.on_plugins_loaded(result),
            UiMsg::PluginToggled { name, result } => self.on_plugin_toggled(name, result),
            UiMsg::ThemeSet(result) => self.on_theme_set(result),
            UiMsg::ThemeCssLoaded { href, result } => self.on_theme_css_loaded(href, result),
            UiMsg::ModelsLoaded(result) => self.on_models_loaded(result),
            UiMsg::ThemesLoaded(result) => self.on_themes_loaded(result),
            UiMsg::NotificationExpired(id) => {
                self.document.remove_notification(id);
            }
        }
    }

    /// Append a banner that removes itself after the configured delay.
    pub fn show_notification(&mut self, message: &str, severity: Severity) -> NotificationId {
        let id = self.document.push_notification(message, severity);
        let tx = self.ui_tx.clone();
        let ttl = self.notification_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let _ = tx.send(UiMsg::NotificationExpired(id));
        });
        id
    }

    pub fn connect_push(&mut self) {
        let Some(url) = self.push_url.clone() else {
            return;
        };

        match subscribe_push(self.client.http(), url) {
            Ok(mut rx) => {
                let tx = self.ui_tx.clone();
                self.push_task = Some(tokio::spawn(async move {
                    while let Some(event) = rx.recv().await {
                        if tx.send(UiMsg::Push(event)).is_err() {
                            break;
                        }
                    }
                }));
            }
            Err(e) => tracing::warn!(error = %e, "push channel unavailable"),
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(task) = self.push_task.take() {
            task.abort();
        }
    }

    fn spawn_request<F>(&mut self, request: F)
    where
        F: Future<Output = UiMsg> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.ui_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(request.await);
        });
    }

    /// Surface an application-level failure, or `fallback` if the server sent no text.
    fn notify_failure(&mut self, reason: String, fallback: &str) {
        let message = if reason.trim().is_empty() {
            fallback.to_string()
        } else {
            reason
        };
        self.show_notification(&message, Severity::Error);
    }
}

impl Drop for CortexApp {
    fn drop(&mut self) {
        self.shutdown();
    }
}
