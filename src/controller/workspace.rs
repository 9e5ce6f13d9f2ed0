use std::path::PathBuf;

use super::{CortexApp, UiMsg};
use crate::dom::{ids, render};
use crate::error::api::ApiError;
use crate::notify::{self, Severity};
use crate::types::wire::{
    ApiReply, ExecutionReply, FileListReply, PluginListReply, PreviewReply, ToggleReply,
    UploadReply,
};

impl CortexApp {
    /// Run the editor contents. Does nothing unless the editor, language
    /// selector and output panel are all on the page.
    pub fn execute_code(&mut self) {
        let (Some(code), Some(language)) = (
            self.document.value(ids::CODE_EDITOR),
            self.document.value(ids::LANGUAGE_SELECT),
        ) else {
            return;
        };
        if !self.document.contains(ids::CODE_OUTPUT) {
            return;
        }

        let (code, language) = (code.to_string(), language.to_string());
        self.run_code(&code, &language);
    }

    pub fn run_code(&mut self, code: &str, language: &str) {
        if code.trim().is_empty() {
            self.show_notification(notify::ENTER_CODE, Severity::Warning);
            return;
        }

        self.document
            .set_inner_html(ids::CODE_OUTPUT, render::running_indicator());

        let client = self.client.clone();
        let (code, language) = (code.to_string(), language.to_string());
        self.spawn_request(async move {
            UiMsg::CodeExecuted(client.execute_code(&code, &language).await)
        });
    }

    pub(super) fn on_code_executed(&mut self, result: Result<ApiReply<ExecutionReply>, ApiError>) {
        let markup = match result {
            Ok(ApiReply::Ok(exec)) => render::execution_success(exec.execution_time, &exec.output),
            Ok(ApiReply::Failed(reason)) if !reason.trim().is_empty() => {
                render::execution_error(&reason)
            }
            Ok(ApiReply::Failed(_)) => render::execution_error(notify::EXECUTION_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "code execution request failed");
                render::execution_error(notify::EXECUTION_FAILED)
            }
        };
        self.document.set_inner_html(ids::CODE_OUTPUT, markup);
    }

    pub fn upload_file(&mut self, path: PathBuf) {
        let client = self.client.clone();
        self.spawn_request(async move { UiMsg::FileUploaded(client.upload_file(&path).await) });
    }

    pub(super) fn on_file_uploaded(&mut self, result: Result<ApiReply<UploadReply>, ApiError>) {
        match result {
            Ok(ApiReply::Ok(upload)) => {
                self.show_notification(
                    &format!("File uploaded: {}", upload.filename),
                    Severity::Success,
                );
                self.load_files();
            }
            Ok(ApiReply::Failed(reason)) => self.notify_failure(reason, notify::UPLOAD_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "upload failed");
                self.show_notification(notify::UPLOAD_FAILED, Severity::Error);
            }
        }
    }

    pub fn load_files(&mut self) {
        if !self.document.contains(ids::FILES_CONTAINER) {
            return;
        }
        let client = self.client.clone();
        self.spawn_request(async move { UiMsg::FilesLoaded(client.list_files().await) });
    }

    pub(super) fn on_files_loaded(&mut self, result: Result<ApiReply<FileListReply>, ApiError>) {
        match result {
            Ok(ApiReply::Ok(list)) => {
                tracing::debug!(
                    count = list.files.len(),
                    path = ?list.current_path,
                    "files loaded"
                );
                self.document
                    .set_inner_html(ids::FILES_CONTAINER, render::file_tree(&list.files));
            }
            Ok(ApiReply::Failed(reason)) => self.notify_failure(reason, notify::FILES_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "file list request failed");
                self.document.set_inner_html(
                    ids::FILES_CONTAINER,
                    render::error_block(notify::FILES_FAILED),
                );
            }
        }
    }

    pub fn open_file(&mut self, name: &str) {
        let client = self.client.clone();
        let name = name.to_string();
        self.spawn_request(async move { UiMsg::FilePreviewed(client.preview_file(&name).await) });
    }

    pub(super) fn on_file_previewed(&mut self, result: Result<ApiReply<PreviewReply>, ApiError>) {
        match result {
            Ok(ApiReply::Ok(preview)) => {
                self.document.set_inner_html(
                    ids::FILE_PREVIEW,
                    render::file_preview(&preview.content, preview.has_more, preview.total_lines),
                );
            }
            Ok(ApiReply::Failed(reason)) => self.notify_failure(reason, notify::OPEN_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "file preview request failed");
                self.show_notification(notify::OPEN_FAILED, Severity::Error);
            }
        }
    }

    pub fn load_plugins(&mut self) {
        if !self.document.contains(ids::PLUGINS_CONTAINER) {
            return;
        }
        let client = self.client.clone();
        self.spawn_request(async move { UiMsg::PluginsLoaded(client.list_plugins().await) });
    }

    /// Cards are replaced wholesale; the container's delegated listener
    /// covers the new toggle buttons.
    pub(super) fn on_plugins_loaded(
        &mut self,
        result: Result<ApiReply<PluginListReply>, ApiError>,
    ) {
        match result {
            Ok(ApiReply::Ok(list)) => {
                self.document
                    .set_inner_html(ids::PLUGINS_CONTAINER, render::plugin_cards(&list.plugins));
            }
            Ok(ApiReply::Failed(reason)) => self.notify_failure(reason, notify::PLUGINS_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "plugin list request failed");
                self.document.set_inner_html(
                    ids::PLUGINS_CONTAINER,
                    render::error_block(notify::PLUGINS_FAILED),
                );
            }
        }
    }

    pub fn toggle_plugin(&mut self, name: &str) {
        let client = self.client.clone();
        let name = name.to_string();
        self.spawn_request(async move {
            let result = client.toggle_plugin(&name).await;
            UiMsg::PluginToggled { name, result }
        });
    }

    pub(super) fn on_plugin_toggled(
        &mut self,
        name: String,
        result: Result<ApiReply<ToggleReply>, ApiError>,
    ) {
        match result {
            Ok(ApiReply::Ok(toggle)) => {
                let state = if toggle.active { "enabled" } else { "disabled" };
                self.show_notification(&format!("Plugin {state}: {name}"), Severity::Success);
                self.load_plugins();
            }
            Ok(ApiReply::Failed(reason)) => self.notify_failure(reason, notify::TOGGLE_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, plugin = %name, "plugin toggle failed");
                self.show_notification(notify::TOGGLE_FAILED, Severity::Error);
            }
        }
    }
}
