use maud::{Markup, Render, html};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(pub u64);

/// Transient banner appended to the page body.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    pub severity: Severity,
}

impl Render for Notification {
    fn render(&self) -> Markup {
        html! {
            div class={ "alert alert-" (self.severity.as_str()) } { (self.message) }
        }
    }
}

// Fixed notices for transport-level failures and local validation.
pub const CONNECTED: &str = "Connected";
pub const DISCONNECTED: &str = "Disconnected";
pub const SEND_FAILED: &str = "Message could not be sent";
pub const ENTER_CODE: &str = "Enter some code";
pub const EXECUTION_FAILED: &str = "Code execution failed";
pub const UPLOAD_FAILED: &str = "File upload failed";
pub const FILES_FAILED: &str = "Could not load files";
pub const OPEN_FAILED: &str = "Could not open file";
pub const PLUGINS_FAILED: &str = "Could not load plugins";
pub const TOGGLE_FAILED: &str = "Could not change plugin state";
pub const THEME_CHANGED: &str = "Theme changed";
pub const THEME_FAILED: &str = "Could not change theme";
pub const MODELS_FAILED: &str = "Could not load models";
pub const THEMES_FAILED: &str = "Could not load themes";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_escapes_message_text() {
        let n = Notification {
            id: NotificationId(1),
            message: "<img src=x onerror=alert(1)>".to_string(),
            severity: Severity::Error,
        };
        assert_eq!(
            n.render().into_string(),
            "<div class=\"alert alert-error\">&lt;img src=x onerror=alert(1)&gt;</div>"
        );
    }
}
