use std::path::Path;
use std::time::Duration;

use crate::error::api::ApiError;
use crate::types::wire::{
    Ack, ApiReply, ChatReply, ChatRequest, ExecuteRequest, ExecutionReply, FileListReply,
    ModelListReply, PluginListReply, PreviewReply, PreviewRequest, ThemeListReply, ThemeRequest,
    ToggleReply, ToggleRequest, UploadReply, decode_reply,
};
use reqwest::Url;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Clone)]
pub struct CortexClient {
    base: Url,
    http: reqwest::Client,
}

impl CortexClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        // Url::join drops the last path segment unless the base ends in '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalized).map_err(|e| ApiError::Url(e.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base,
            http: builder.build().map_err(|e| ApiError::Http(e.to_string()))?,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Url(e.to_string()))
    }

    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<ApiReply<T>, ApiError> {
        // Error statuses still carry a JSON envelope with success=false.
        let value = resp
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        decode_reply(value)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<ApiReply<T>, ApiError> {
        let url = self.endpoint(path)?;
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;
        Self::decode(resp).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<ApiReply<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;
        Self::decode(resp).await
    }

    pub async fn chat(&self, message: &str, model: &str) -> Result<ApiReply<ChatReply>, ApiError> {
        self.post_json("api/chat", &ChatRequest { message, model })
            .await
    }

    pub async fn execute_code(
        &self,
        code: &str,
        language: &str,
    ) -> Result<ApiReply<ExecutionReply>, ApiError> {
        self.post_json("api/code/execute", &ExecuteRequest { code, language })
            .await
    }

    /// Upload a local file as the multipart field `file`.
    pub async fn upload_file(&self, path: &Path) -> Result<ApiReply<UploadReply>, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name));
        let url = self.endpoint("api/upload")?;
        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;
        Self::decode(resp).await
    }

    pub async fn list_files(&self) -> Result<ApiReply<FileListReply>, ApiError> {
        self.get_json("api/files").await
    }

    pub async fn preview_file(&self, filepath: &str) -> Result<ApiReply<PreviewReply>, ApiError> {
        self.post_json("api/file-preview", &PreviewRequest { filepath })
            .await
    }

    pub async fn list_plugins(&self) -> Result<ApiReply<PluginListReply>, ApiError> {
        self.get_json("api/plugins").await
    }

    pub async fn toggle_plugin(&self, plugin: &str) -> Result<ApiReply<ToggleReply>, ApiError> {
        self.post_json("api/plugins/toggle", &ToggleRequest { plugin })
            .await
    }

    pub async fn set_theme(&self, theme_id: &str) -> Result<ApiReply<Ack>, ApiError> {
        self.post_json("api/themes/set", &ThemeRequest { theme_id })
            .await
    }

    pub async fn list_models(&self) -> Result<ApiReply<ModelListReply>, ApiError> {
        self.get_json("api/models").await
    }

    pub async fn list_themes(&self) -> Result<ApiReply<ThemeListReply>, ApiError> {
        self.get_json("api/themes").await
    }

    /// Theme stylesheet url, with the stamp as a bare query to defeat caches.
    pub fn theme_css_url(&self, stamp_millis: i64) -> Result<Url, ApiError> {
        let mut url = self.endpoint("api/themes/css")?;
        url.set_query(Some(&stamp_millis.to_string()));
        Ok(url)
    }

    pub async fn fetch_theme_css(&self, url: Url) -> Result<String, ApiError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ApiError::Http(format!("Status {}", resp.status())));
        }
        resp.text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}
