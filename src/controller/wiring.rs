use std::path::PathBuf;

use super::CortexApp;
use crate::dom::ids;
use crate::dom::render::{FILE_ITEM_CLASS, PLUGIN_TOGGLE_CLASS};

/// Element that actually received a click inside a delegating container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickTarget {
    /// The target's whole `class` attribute.
    pub class: String,
    /// Value of the target's `data-*` attribute.
    pub data: String,
}

impl ClickTarget {
    pub fn has_class(&self, class: &str) -> bool {
        self.class.split_whitespace().any(|c| c == class)
    }
}

/// Input delivered by the front end, addressed by element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Submit { form: String },
    Change { element: String, value: String },
    Click { element: String, target: Option<ClickTarget> },
}

impl UiEvent {
    fn element(&self) -> &str {
        match self {
            UiEvent::Submit { form } => form,
            UiEvent::Change { element, .. } | UiEvent::Click { element, .. } => element,
        }
    }

    fn kind(&self) -> EventKind {
        match self {
            UiEvent::Submit { .. } => EventKind::Submit,
            UiEvent::Change { .. } => EventKind::Change,
            UiEvent::Click { .. } => EventKind::Click,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Submit,
    Change,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    SendMessage,
    SelectModel,
    SelectTheme,
    ExecuteCode,
    UploadFile,
    /// Delegated: `.plugin-toggle` inside the plugins container.
    TogglePlugin,
    /// Delegated: `.file-item` inside the files container.
    OpenFile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub element: &'static str,
    pub kind: EventKind,
    pub action: Action,
}

const fn bind(element: &'static str, kind: EventKind, action: Action) -> Binding {
    Binding { element, kind, action }
}

const BINDINGS: [Binding; 7] = [
    bind(ids::CHAT_FORM, EventKind::Submit, Action::SendMessage),
    bind(ids::MODEL_SELECT, EventKind::Change, Action::SelectModel),
    bind(ids::THEME_SELECT, EventKind::Change, Action::SelectTheme),
    bind(ids::EXECUTE_CODE, EventKind::Click, Action::ExecuteCode),
    bind(ids::FILE_INPUT, EventKind::Change, Action::UploadFile),
    bind(ids::PLUGINS_CONTAINER, EventKind::Click, Action::TogglePlugin),
    bind(ids::FILES_CONTAINER, EventKind::Click, Action::OpenFile),
];

impl CortexApp {
    /// Bind every known element the page actually has. Missing ones are skipped.
    pub fn setup_event_listeners(&mut self) {
        self.bindings = BINDINGS
            .iter()
            .filter(|b| self.document.contains(b.element))
            .copied()
            .collect();
        tracing::debug!(bound = self.bindings.len(), "event listeners attached");
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn dispatch(&mut self, event: UiEvent) {
        // The element takes the new value whether or not anything listens.
        if let UiEvent::Change { element, value } = &event {
            self.document.set_value(element, value);
        }

        let Some(action) = self
            .bindings
            .iter()
            .find(|b| b.element == event.element() && b.kind == event.kind())
            .map(|b| b.action)
        else {
            tracing::trace!(element = event.element(), "no listener for event");
            return;
        };

        match (action, event) {
            (Action::SendMessage, _) => self.send_message(),
            (Action::SelectModel, UiEvent::Change { value, .. }) => {
                self.current_model = value;
                self.save_settings();
            }
            (Action::SelectTheme, UiEvent::Change { value, .. }) => {
                self.set_theme(&value);
                self.save_settings();
            }
            (Action::ExecuteCode, _) => self.execute_code(),
            (Action::UploadFile, UiEvent::Change { value, .. }) => {
                if !value.is_empty() {
                    self.upload_file(PathBuf::from(value));
                }
            }
            (Action::TogglePlugin, UiEvent::Click { target: Some(target), .. })
                if target.has_class(PLUGIN_TOGGLE_CLASS) =>
            {
                self.toggle_plugin(&target.data);
            }
            (Action::OpenFile, UiEvent::Click { target: Some(target), .. })
                if target.has_class(FILE_ITEM_CLASS) =>
            {
                self.open_file(&target.data);
            }
            _ => {}
        }
    }
}
