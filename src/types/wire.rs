//! Request and reply bodies for the Cortex HTTP API.
//!
//! Every reply carries a `success` flag. When it is false the body holds an
//! `error` string (theme endpoints use `message` instead).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::api::ApiError;
use crate::types::files::FileEntry;
use crate::types::plugins::PluginDescriptor;
use crate::types::themes::ThemeDescriptor;

/// Application-level outcome of a call that reached the server.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    Ok(T),
    Failed(String),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Split a decoded JSON body into the success or failure branch.
pub fn decode_reply<T: DeserializeOwned>(
    value: serde_json::Value,
) -> Result<ApiReply<T>, ApiError> {
    let envelope: Envelope =
        serde_json::from_value(value.clone()).map_err(|e| ApiError::Decode(e.to_string()))?;

    if !envelope.success {
        let reason = envelope
            .error
            .or(envelope.message)
            .unwrap_or_default();
        return Ok(ApiReply::Failed(reason));
    }

    serde_json::from_value(value)
        .map(ApiReply::Ok)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub model: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest<'a> {
    pub code: &'a str,
    pub language: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecutionReply {
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub execution_time: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UploadReply {
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FileListReply {
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub current_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewRequest<'a> {
    pub filepath: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreviewReply {
    pub content: String,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub total_lines: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PluginListReply {
    pub plugins: Vec<PluginDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleRequest<'a> {
    pub plugin: &'a str,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToggleReply {
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ThemeRequest<'a> {
    pub theme_id: &'a str,
}

/// Success body with no fields the client cares about.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ack {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelListReply {
    pub models: Vec<String>,
    #[serde(default)]
    pub current_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThemeListReply {
    pub themes: Vec<ThemeDescriptor>,
}
