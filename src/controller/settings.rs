use super::{CortexApp, UiMsg};
use crate::config::preferences::Preferences;
use crate::dom::{ids, render};
use crate::error::api::ApiError;
use crate::notify::{self, Severity};
use crate::types::wire::{Ack, ApiReply, ModelListReply, ThemeListReply};

impl CortexApp {
    /// Persist the current model and the theme selector's value.
    pub fn save_settings(&mut self) {
        let theme = self
            .document
            .value(ids::THEME_SELECT)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let prefs = Preferences {
            model: Some(self.current_model.clone()),
            theme,
        };
        if let Err(e) = prefs.save(&mut *self.store) {
            tracing::warn!(error = %e, "failed to save settings");
        }
    }

    /// Restore stored preferences into the selectors. A stored theme is
    /// also pushed to the server so both sides agree.
    pub fn load_settings(&mut self) {
        let prefs = match Preferences::load(&*self.store) {
            Ok(Some(prefs)) => prefs,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring stored settings");
                return;
            }
        };

        self.current_model = prefs
            .model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.default_model.clone());
        let model = self.current_model.clone();
        self.document.set_value(ids::MODEL_SELECT, &model);

        if let Some(theme) = prefs.theme.filter(|t| !t.is_empty()) {
            if self.document.set_value(ids::THEME_SELECT, &theme) {
                self.set_theme(&theme);
            }
        }
    }

    pub fn set_theme(&mut self, theme_id: &str) {
        let client = self.client.clone();
        let theme_id = theme_id.to_string();
        self.spawn_request(async move { UiMsg::ThemeSet(client.set_theme(&theme_id).await) });
    }

    pub(super) fn on_theme_set(&mut self, result: Result<ApiReply<Ack>, ApiError>) {
        match result {
            Ok(ApiReply::Ok(_)) => {
                self.show_notification(notify::THEME_CHANGED, Severity::Success);
                self.load_theme_css();
            }
            Ok(ApiReply::Failed(reason)) => self.notify_failure(reason, notify::THEME_FAILED),
            Err(e) => {
                tracing::warn!(error = %e, "theme change failed");
                self.show_notification(notify::THEME_FAILED, Severity::Error);
            }
        }
    }

    /// Relink the theme stylesheet with a fresh cache-busting stamp and fetch it.
    pub fn load_theme_css(&mut self) {
        let stamp = chrono::Utc::now().timestamp_millis();
        let url = match self.client.theme_css_url(stamp) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "bad theme stylesheet url");
                return;
            }
        };

        let href = url.to_string();
        self.document.link_theme_stylesheet(href.clone());

        let client = self.client.clone();
        self.spawn_request(async move {
            let result = client.fetch_theme_css(url).await;
            UiMsg::ThemeCssLoaded { href, result }
        });
    }

    pub(super) fn on_theme_css_loaded(&mut self, href: String, result: Result<String, ApiError>) {
        match result {
            Ok(css) => {
                self.document.set_stylesheet_css(&href, css);
            }
            Err(e) => tracing::warn!(error = %e, %href, "theme stylesheet not loaded"),
        }
    }

    pub fn load_models(&mut self) {
        let client = self.client.clone();
        self.spawn_request(async move { UiMsg::ModelsLoaded(client.list_models().await) });
    }

    pub(super) fn on_models_loaded(&mut self, result: Result<ApiReply<ModelListReply>, ApiError>) {
        match result {
            Ok(ApiReply::Ok(list)) => {
                tracing::debug!(
                    count = list.models.len(),
                    server_model = ?list.current_model,
                    "models loaded"
                );
                self.document
                    .set_options(ids::MODEL_SELECT, render::model_options(&list.models));
            }
            Ok(ApiReply::Failed(reason)) => self.notify_failure(reason, notify::MODELS_FAILED),
            Err(e) => tracing::warn!(error = %e, "model list request failed"),
        }
    }

    pub fn load_themes(&mut self) {
        let client = self.client.clone();
        self.spawn_request(async move { UiMsg::ThemesLoaded(client.list_themes().await) });
    }

    pub(super) fn on_themes_loaded(&mut self, result: Result<ApiReply<ThemeListReply>, ApiError>) {
        match result {
            Ok(ApiReply::Ok(list)) => {
                self.document
                    .set_options(ids::THEME_SELECT, render::theme_options(&list.themes));
                // Show the server's active theme unless one was restored.
                let unset = self.document.value(ids::THEME_SELECT).is_some_and(str::is_empty);
                if let Some(current) = list.themes.iter().find(|t| t.current).filter(|_| unset) {
                    self.document.set_value(ids::THEME_SELECT, &current.id);
                }
            }
            Ok(ApiReply::Failed(reason)) => self.notify_failure(reason, notify::THEMES_FAILED),
            Err(e) => tracing::warn!(error = %e, "theme list request failed"),
        }
    }
}
