//! The notification capability injected into table controllers.

use std::fmt;

use async_trait::async_trait;

/// Severity of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl AlertLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Info => "info",
            AlertLevel::Success => "success",
            AlertLevel::Warning => "warning",
            AlertLevel::Error => "error",
        }
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A yes/no question put to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub title: String,
    pub content: String,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// The user's answer to a [`ConfirmRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Confirmation {
    Positive,
    /// Also the answer for a prompt that was closed without a choice.
    #[default]
    Negative,
}

impl Confirmation {
    pub fn is_positive(self) -> bool {
        matches!(self, Confirmation::Positive)
    }
}

/// User-facing feedback for table actions.
///
/// Alerts are fire-and-forget. Confirmation resolves to exactly one
/// [`Confirmation`] per prompt.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Show a transient alert.
    fn alert(&self, level: AlertLevel, message: &str);

    /// Ask the user a yes/no question.
    async fn confirm(&self, request: ConfirmRequest) -> Confirmation;

    fn info(&self, message: &str) {
        self.alert(AlertLevel::Info, message);
    }

    fn success(&self, message: &str) {
        self.alert(AlertLevel::Success, message);
    }

    fn warning(&self, message: &str) {
        self.alert(AlertLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.alert(AlertLevel::Error, message);
    }
}
