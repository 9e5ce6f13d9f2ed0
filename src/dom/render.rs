use maud::{Markup, PreEscaped, html};

use super::SelectOption;
use super::markup::format_response;
use crate::types::chat::ChatMessage;
use crate::types::files::FileEntry;
use crate::types::plugins::PluginDescriptor;
use crate::types::themes::ThemeDescriptor;

pub const PLUGIN_TOGGLE_CLASS: &str = "plugin-toggle";
pub const FILE_ITEM_CLASS: &str = "file-item";

pub fn message(msg: &ChatMessage) -> String {
    let user = msg.user_text.as_deref().filter(|t| !t.is_empty());
    let assistant = msg.assistant_text.as_deref().filter(|t| !t.is_empty());
    html! {
        div class={ "message " (msg.kind.as_class()) } {
            @if let Some(user) = user {
                div class="message-user" { strong { "You:" } " " (user) }
            }
            @if let Some(assistant) = assistant {
                div class="message-assistant" {
                    strong { "AI:" } " " (PreEscaped(format_response(assistant)))
                }
            }
            @if !msg.model.is_empty() {
                div class="message-model" { small { "Model: " (msg.model) } }
            }
        }
    }
    .into_string()
}

pub fn running_indicator() -> String {
    html! { div class="loading" {} " Running..." }.into_string()
}

pub fn execution_success(execution_time: f64, output: &str) -> String {
    html! {
        div class="alert alert-success" {
            strong { "Success!" } " Execution time: " (execution_time) "s"
        }
        div class="code-block" { pre { (output) } }
    }
    .into_string()
}

pub fn execution_error(error: &str) -> String {
    html! {
        div class="alert alert-error" { strong { "Error!" } " " (error) }
    }
    .into_string()
}

pub fn error_block(message: &str) -> String {
    html! { div class="alert alert-error" { (message) } }.into_string()
}

/// File list; items carry `data-file` for the delegated click handler.
pub fn file_tree(files: &[FileEntry]) -> String {
    html! {
        div class="file-tree" {
            @for file in files {
                div class={ (FILE_ITEM_CLASS) " " (file.kind.as_class()) } data-file=(file.name) {
                    (file.kind.icon()) " " (file.name)
                }
            }
        }
    }
    .into_string()
}

pub fn file_preview(content: &str, has_more: bool, total_lines: Option<usize>) -> String {
    let note = match total_lines {
        Some(n) => format!("Showing the first {n} lines"),
        None => "Preview truncated".to_string(),
    };
    html! {
        div class="code-block" { pre { (content) } }
        @if has_more {
            p class="preview-truncated" { (note) }
        }
    }
    .into_string()
}

/// Plugin cards; toggle buttons carry `data-plugin` for the delegated click handler.
pub fn plugin_cards(plugins: &[PluginDescriptor]) -> String {
    html! {
        @for plugin in plugins {
            (plugin_card(plugin))
        }
    }
    .into_string()
}

fn plugin_card(plugin: &PluginDescriptor) -> Markup {
    let (status, label) = if plugin.active {
        ("active", "Disable")
    } else {
        ("inactive", "Enable")
    };
    html! {
        div class="plugin-card" {
            div class="plugin-header" {
                span class={ "plugin-status " (status) } {}
                strong { (plugin.name) }
                button class={ "btn btn-secondary btn-sm " (PLUGIN_TOGGLE_CLASS) }
                    data-plugin=(plugin.name) { (label) }
            }
            p { (plugin.description) }
        }
    }
}

pub fn model_options(models: &[String]) -> Vec<SelectOption> {
    models
        .iter()
        .map(|m| SelectOption { value: m.clone(), label: m.clone() })
        .collect()
}

pub fn theme_options(themes: &[ThemeDescriptor]) -> Vec<SelectOption> {
    themes
        .iter()
        .map(|t| SelectOption {
            value: t.id.clone(),
            label: if t.name.is_empty() { t.id.clone() } else { t.name.clone() },
        })
        .collect()
}
