//! In-memory page the controller renders into.
//!
//! Elements are addressed by id and may be absent, the same as on a real page
//! that only carries some of the panels. Every mutation is also recorded as a
//! [`Change`] so a front end can mirror the page without diffing it.

pub mod markup;
pub mod render;

use std::collections::HashMap;

use maud::{DOCTYPE, Markup, PreEscaped, Render, html};

use crate::notify::{Notification, NotificationId, Severity};

pub mod ids {
    pub const CHAT_FORM: &str = "chat-form";
    pub const MESSAGE_INPUT: &str = "message-input";
    pub const MODEL_SELECT: &str = "model-select";
    pub const THEME_SELECT: &str = "theme-select";
    pub const CHAT_CONTAINER: &str = "chat-container";
    pub const CODE_EDITOR: &str = "code-editor";
    pub const LANGUAGE_SELECT: &str = "language-select";
    pub const CODE_OUTPUT: &str = "code-output";
    pub const EXECUTE_CODE: &str = "execute-code";
    pub const FILE_INPUT: &str = "file-input";
    pub const FILES_CONTAINER: &str = "files-container";
    pub const FILE_PREVIEW: &str = "file-preview";
    pub const PLUGINS_CONTAINER: &str = "plugins-container";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Form,
    Input,
    TextArea,
    Select,
    Button,
    FileInput,
    Container,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Element {
    pub id: String,
    pub kind: ElementKind,
    pub value: String,
    pub inner_html: String,
    pub options: Vec<SelectOption>,
}

impl Element {
    fn new(id: &str, kind: ElementKind) -> Self {
        Self {
            id: id.to_string(),
            kind,
            value: String::new(),
            inner_html: String::new(),
            options: Vec::new(),
        }
    }
}

impl Render for Element {
    fn render(&self) -> Markup {
        let id = self.id.as_str();
        match self.kind {
            ElementKind::Input | ElementKind::FileInput => {
                let kind = if self.kind == ElementKind::FileInput { "file" } else { "text" };
                html! { input id=(id) type=(kind) value=(self.value); }
            }
            ElementKind::TextArea => html! { textarea id=(id) { (self.value) } },
            ElementKind::Select => {
                // A value no option carries still shows as selected.
                let orphan = !self.value.is_empty()
                    && !self.options.iter().any(|o| o.value == self.value);
                html! {
                    select id=(id) {
                        @for o in &self.options {
                            option value=(o.value) selected[o.value == self.value] { (o.label) }
                        }
                        @if orphan {
                            option value=(self.value) selected { (self.value) }
                        }
                    }
                }
            }
            ElementKind::Button => html! { button id=(id) { (PreEscaped(&self.inner_html)) } },
            ElementKind::Form => html! { form id=(id) {} },
            ElementKind::Container => html! { div id=(id) { (PreEscaped(&self.inner_html)) } },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stylesheet {
    pub href: String,
    pub css: Option<String>,
}

/// Mutation record, drained by the front end after each dispatch.
#[derive(Debug, Clone)]
pub enum Change {
    Appended { element: String, markup: String },
    Replaced { element: String, markup: String },
    Notified(Notification),
    Dismissed(NotificationId),
    StylesheetLinked(String),
}

#[derive(Debug, Default)]
pub struct Document {
    order: Vec<String>,
    elements: HashMap<String, Element>,
    theme_stylesheet: Option<Stylesheet>,
    notifications: Vec<Notification>,
    next_notification: u64,
    changes: Vec<Change>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every panel the controller knows how to drive.
    pub fn full_page() -> Self {
        Self::new()
            .with(ids::CHAT_FORM, ElementKind::Form)
            .with(ids::MESSAGE_INPUT, ElementKind::Input)
            .with(ids::MODEL_SELECT, ElementKind::Select)
            .with(ids::THEME_SELECT, ElementKind::Select)
            .with(ids::CHAT_CONTAINER, ElementKind::Container)
            .with(ids::CODE_EDITOR, ElementKind::TextArea)
            .with_select(ids::LANGUAGE_SELECT, &["python", "javascript", "bash"])
            .with(ids::CODE_OUTPUT, ElementKind::Container)
            .with(ids::EXECUTE_CODE, ElementKind::Button)
            .with(ids::FILE_INPUT, ElementKind::FileInput)
            .with(ids::FILES_CONTAINER, ElementKind::Container)
            .with(ids::FILE_PREVIEW, ElementKind::Container)
            .with(ids::PLUGINS_CONTAINER, ElementKind::Container)
    }

    pub fn with(mut self, id: &str, kind: ElementKind) -> Self {
        if !self.elements.contains_key(id) {
            self.order.push(id.to_string());
        }
        self.elements.insert(id.to_string(), Element::new(id, kind));
        self
    }

    /// Add a select whose first option is selected.
    pub fn with_select(mut self, id: &str, values: &[&str]) -> Self {
        self = self.with(id, ElementKind::Select);
        if let Some(el) = self.elements.get_mut(id) {
            el.options = values
                .iter()
                .map(|v| SelectOption { value: v.to_string(), label: v.to_string() })
                .collect();
            el.value = values.first().map(|v| v.to_string()).unwrap_or_default();
        }
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn value(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|el| el.value.as_str())
    }

    pub fn inner_html(&self, id: &str) -> Option<&str> {
        self.elements.get(id).map(|el| el.inner_html.as_str())
    }

    /// Returns false when the element is absent.
    pub fn set_value(&mut self, id: &str, value: &str) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.value = value.to_string();
                true
            }
            None => false,
        }
    }

    pub fn set_options(&mut self, id: &str, options: Vec<SelectOption>) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.options = options;
                true
            }
            None => false,
        }
    }

    pub fn set_inner_html(&mut self, id: &str, markup: String) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.inner_html = markup.clone();
                self.changes.push(Change::Replaced { element: id.to_string(), markup });
                true
            }
            None => false,
        }
    }

    pub fn append_html(&mut self, id: &str, markup: String) -> bool {
        match self.elements.get_mut(id) {
            Some(el) => {
                el.inner_html.push_str(&markup);
                self.changes.push(Change::Appended { element: id.to_string(), markup });
                true
            }
            None => false,
        }
    }

    /// Point the theme `<link>` at `href`, replacing the previous one.
    pub fn link_theme_stylesheet(&mut self, href: String) {
        self.theme_stylesheet = Some(Stylesheet { href: href.clone(), css: None });
        self.changes.push(Change::StylesheetLinked(href));
    }

    /// Attach fetched CSS if `href` is still the linked stylesheet.
    pub fn set_stylesheet_css(&mut self, href: &str, css: String) -> bool {
        match self.theme_stylesheet.as_mut() {
            Some(sheet) if sheet.href == href => {
                sheet.css = Some(css);
                true
            }
            _ => false,
        }
    }

    pub fn theme_stylesheet(&self) -> Option<&Stylesheet> {
        self.theme_stylesheet.as_ref()
    }

    pub fn push_notification(&mut self, message: &str, severity: Severity) -> NotificationId {
        self.next_notification += 1;
        let notification = Notification {
            id: NotificationId(self.next_notification),
            message: message.to_string(),
            severity,
        };
        let id = notification.id;
        self.changes.push(Change::Notified(notification.clone()));
        self.notifications.push(notification);
        id
    }

    pub fn remove_notification(&mut self, id: NotificationId) -> bool {
        let before = self.notifications.len();
        self.notifications.retain(|n| n.id != id);
        let removed = self.notifications.len() != before;
        if removed {
            self.changes.push(Change::Dismissed(id));
        }
        removed
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    /// Standalone HTML rendering of the current page state.
    pub fn to_html(&self) -> String {
        let elements = self.order.iter().filter_map(|id| self.elements.get(id));
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { "Cortex" }
                    @if let Some(sheet) = &self.theme_stylesheet {
                        link rel="stylesheet" href=(sheet.href);
                        @if let Some(css) = &sheet.css {
                            // Closing tags can't appear inside <style>.
                            style { (PreEscaped(css.replace("</", "<\\/"))) }
                        }
                    }
                }
                body {
                    @for el in elements {
                        (el)
                    }
                    @for n in &self.notifications {
                        (n)
                    }
                }
            }
        }
        .into_string()
    }
}
