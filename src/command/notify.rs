//! User-visible notifications.

use crate::error::Error;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Informational
    Info,
    /// Something failed
    Error,
}

/// A message meant for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Severity
    pub level: NotificationLevel,
    /// Text shown to the user
    pub message: String,
}

impl Notification {
    /// An informational notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    /// An error notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    /// The notification shown for an error that ended an invocation.
    pub fn from_error(err: &Error) -> Self {
        let message = match err {
            Error::Validation(message) => message.clone(),
            Error::Auth => "Please sign in to use AI features.".to_string(),
            Error::Timeout(after) => format!(
                "The AI request timed out after {} seconds. Please try again.",
                after.as_secs()
            ),
            Error::Service { message, .. } if !message.is_empty() => {
                format!("AI request failed: {message}")
            }
            _ => "Something went wrong with the AI request. Please try again.".to_string(),
        };
        Self::error(message)
    }
}

/// Receives notifications raised by the dispatcher.
pub trait Notifier: Send + Sync {
    /// Show a notification to the user.
    fn notify(&self, notification: Notification);
}

/// Notifier that writes notifications to the log.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => log::info!("{}", notification.message),
            NotificationLevel::Error => log::warn!("{}", notification.message),
        }
    }
}
